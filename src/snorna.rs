use crate::error::RecordError;
use crate::table::SnoRow;
use bio::alphabets::dna;
use bio::pattern_matching::horspool::Horspool;
use bio::utils::Interval;
use log::debug;
use std::fmt;

/// Default length of the interaction element (seed) upstream of the D-box
pub const DEFAULT_SEED_LENGTH: usize = 20;

/// Values that mark an empty box annotation
const MISSING: [&str; 6] = ["", "-", ".", "NA", "nan", "NaN"];

type RecordResult<T> = std::result::Result<T, RecordError>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// Genomic strand of a snoRNA locus
pub enum Strand {
    /// `+`
    Forward,
    /// `-`
    Reverse,
}

impl Strand {
    fn symbol(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
/// A box motif located on the transcript
pub struct BoxHit {
    /// Motif as annotated, normalised to upper case DNA
    pub motif: String,
    /// 0-based offset of the motif on the transcript (5' to 3')
    pub offset: usize,
    /// `true` if a C-box annotation had to be used as the D-box
    pub swapped: bool,
}

#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// Annotation carried through from the input table, not used for grouping
#[allow(missing_docs)]
pub struct Metadata {
    pub snor_type: String,
    pub accession: String,
    pub alias: String,
    pub gene_name: String,
    pub organism: String,
    pub host_gene: String,
    pub host_id: String,
    pub organization: String,
    pub mod_site: String,
    pub note: String,
}

/// A validated CD-box snoRNA. The D-box is located once on construction and the
/// record is not modified afterwards.
#[derive(Debug, Clone)]
pub struct CdSnoRna {
    snor_id: String,
    chrom: String,
    locus: Interval<u64>,
    strand: Strand,
    transcript: String,
    d_box: BoxHit,
    metadata: Metadata,
}

impl CdSnoRna {
    /// Validates a table row and locates its D-box. With `switch_boxes` the
    /// C-box annotation is tried as D-box when the annotated D-box is absent or
    /// misplaced.
    pub fn new(row: &SnoRow, switch_boxes: bool) -> RecordResult<Self> {
        let snor_id = row.snor_id.trim().to_string();
        let invalid = |field: &'static str, value: &str| RecordError::InvalidFieldType {
            snor_id: snor_id.clone(),
            field,
            value: value.to_string(),
        };

        let start = row
            .start
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid("start", &row.start))?;
        let end = row
            .end
            .trim()
            .parse::<u64>()
            .map_err(|_| invalid("end", &row.end))?;
        let strand = match row.strand.trim() {
            "+" => Strand::Forward,
            "-" => Strand::Reverse,
            other => return Err(invalid("strand", other)),
        };

        let sequence = normalize(&row.sequence);
        if sequence.is_empty() || !dna::iupac_alphabet().is_word(sequence.as_bytes()) {
            return Err(invalid("sequence", &row.sequence));
        }

        let incompatible = || RecordError::IncompatibleStrandAndCoords {
            snor_id: snor_id.clone(),
            strand: strand.symbol(),
            start,
            end,
            seq_len: sequence.len(),
        };
        let locus = Interval::new(start..end).map_err(|_| incompatible())?;
        if locus.start == locus.end || (locus.end - locus.start) as usize != sequence.len() {
            return Err(incompatible());
        }

        let d_boxes = parse_boxes(&row.box_d).ok_or_else(|| invalid("box_d", &row.box_d))?;
        let c_boxes = parse_boxes(&row.box_c).ok_or_else(|| invalid("box_c", &row.box_c))?;

        let transcript = match strand {
            Strand::Forward => sequence,
            Strand::Reverse => String::from_utf8(dna::revcomp(sequence.as_bytes()))
                .map_err(|_| invalid("sequence", &row.sequence))?,
        };

        let d_box = match locate_box(&transcript, &d_boxes) {
            Some(hit) => hit,
            None if switch_boxes => match locate_box(&transcript, &c_boxes) {
                Some(hit) => {
                    debug!(
                        "{}: using C-box {} as D-box at {}",
                        snor_id, hit.motif, hit.offset
                    );
                    BoxHit {
                        swapped: true,
                        ..hit
                    }
                }
                None => return Err(wrong_placement(&snor_id, &d_boxes)),
            },
            None => return Err(wrong_placement(&snor_id, &d_boxes)),
        };

        Ok(Self {
            snor_id,
            chrom: row.chrom.trim().to_string(),
            locus,
            strand,
            transcript,
            d_box,
            metadata: Metadata {
                snor_type: row.mod_type.trim().to_string(),
                accession: row.accession.clone(),
                alias: row.alias.clone(),
                gene_name: row.gene_name.clone(),
                organism: row.organism.clone(),
                host_gene: row.host_gene.clone(),
                host_id: row.host_id.clone(),
                organization: row.organization.clone(),
                mod_site: row.mod_site.clone(),
                note: row.note.clone(),
            },
        })
    }

    /// Returns the `length` nucleotides directly 5' of the D-box on the
    /// transcript. When fewer precede the box the available prefix is returned.
    pub fn d_interaction_region(&self, length: usize) -> &str {
        let end = self.d_box.offset;
        let start = end.saturating_sub(length);
        &self.transcript[start..end]
    }

    /// Genomic 0-based position of the leftmost base of the D-box
    pub fn d_box_genomic_start(&self) -> u64 {
        let offset = self.d_box.offset as u64;
        match self.strand {
            Strand::Forward => self.locus.start + offset,
            Strand::Reverse => self.locus.end - offset - self.d_box.motif.len() as u64,
        }
    }

    /// Identifier used in family listings
    pub fn snor_id(&self) -> &str {
        &self.snor_id
    }

    /// Chromosome of the locus
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    /// Strand the transcript was read from
    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// Sequence in 5' to 3' orientation of the snoRNA
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// D-box the interaction region is anchored on
    pub fn d_box(&self) -> &BoxHit {
        &self.d_box
    }

    /// Annotation carried through from the table
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }
}

fn normalize(seq: &str) -> String {
    seq.trim()
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'U' => 'T',
            c => c,
        })
        .collect()
}

/// Splits a box annotation on `,` or `;`. Returns `None` if any motif contains
/// non nucleotide characters.
fn parse_boxes(field: &str) -> Option<Vec<String>> {
    let field = field.trim();
    if MISSING.contains(&field) {
        return Some(Vec::new());
    }
    field
        .split(|c| c == ',' || c == ';')
        .map(str::trim)
        .filter(|motif| !motif.is_empty())
        .map(|motif| {
            let motif = normalize(motif);
            if dna::iupac_alphabet().is_word(motif.as_bytes()) {
                Some(motif)
            } else {
                None
            }
        })
        .collect()
}

/// First candidate, in annotation order, whose last occurrence lies in the 3'
/// half of the transcript
fn locate_box(transcript: &str, candidates: &[String]) -> Option<BoxHit> {
    let text = transcript.as_bytes();
    candidates.iter().find_map(|motif| {
        if motif.len() > text.len() {
            return None;
        }
        let offset = Horspool::new(motif.as_bytes()).find_all(text).last()?;
        if 2 * offset >= text.len() {
            Some(BoxHit {
                motif: motif.clone(),
                offset,
                swapped: false,
            })
        } else {
            debug!(
                "Box {} found at {} in the 5' half of a {} nt snoRNA",
                motif,
                offset,
                text.len()
            );
            None
        }
    })
}

fn wrong_placement(snor_id: &str, d_boxes: &[String]) -> RecordError {
    let motif = if d_boxes.is_empty() {
        String::from("-")
    } else {
        d_boxes.join(",")
    };
    RecordError::WrongCDBoxPlacement {
        snor_id: snor_id.to_string(),
        motif,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 50 nt snoRNA with `ACGT` at 36..40 and the D-box `ATGA` at 40..44
    pub(crate) fn transcript_50() -> String {
        format!("{}ACGTATGA{}", "C".repeat(36), "C".repeat(6))
    }

    pub(crate) fn cd_row(id: &str, strand: &str, seq: &str, box_d: &str, box_c: &str) -> SnoRow {
        SnoRow {
            chrom: String::from("chr1"),
            start: String::from("100"),
            end: (100 + seq.len()).to_string(),
            snor_id: id.to_string(),
            mod_type: String::from("CD"),
            strand: strand.to_string(),
            sequence: seq.to_string(),
            box_d: box_d.to_string(),
            box_c: box_c.to_string(),
            organism: String::from("human"),
            ..SnoRow::default()
        }
    }

    #[test]
    fn seed_upstream_of_d_box() {
        let row = cd_row("SNORD1", "+", &transcript_50(), "ATGA", "CTGA");
        let snor = CdSnoRna::new(&row, false).unwrap();

        assert_eq!(snor.d_box().offset, 40);
        assert!(!snor.d_box().swapped);
        assert_eq!(snor.d_interaction_region(4), "ACGT");
        assert_eq!(snor.d_interaction_region(4), &transcript_50()[36..40]);
        assert_eq!(snor.d_box_genomic_start(), 140);
        assert_eq!(snor.metadata().organism, "human");
    }

    #[test]
    fn reverse_strand_reads_transcript_from_revcomp() {
        let genomic = String::from_utf8(dna::revcomp(transcript_50().as_bytes())).unwrap();
        let row = cd_row("SNORD2", "-", &genomic, "ATGA", "CTGA");
        let snor = CdSnoRna::new(&row, false).unwrap();

        assert_eq!(snor.strand(), Strand::Reverse);
        assert_eq!(snor.transcript(), transcript_50());
        assert_eq!(snor.d_interaction_region(4), "ACGT");
        assert_eq!(snor.d_box_genomic_start(), 150 - 40 - 4);
        assert_eq!(&genomic[6..10], "TCAT");
    }

    #[test]
    fn seed_length_bounds() {
        let row = cd_row("SNORD1", "+", &transcript_50(), "ATGA", "");
        let snor = CdSnoRna::new(&row, false).unwrap();

        assert_eq!(snor.d_interaction_region(20).len(), 20);
        assert_eq!(snor.d_interaction_region(40).len(), 40);
        assert_eq!(snor.d_interaction_region(100), &transcript_50()[..40]);
        assert_eq!(snor.d_interaction_region(0), "");
    }

    #[test]
    fn rna_and_lower_case_are_normalised() {
        let rna = transcript_50().to_lowercase().replace('t', "u");
        let row = cd_row("SNORD1", "+", &rna, "auga", "");
        let snor = CdSnoRna::new(&row, false).unwrap();

        assert_eq!(snor.d_interaction_region(4), "ACGT");
    }

    #[test]
    fn inverted_coords_are_incompatible() {
        let mut row = cd_row("SNORD3", "+", &transcript_50(), "ATGA", "");
        row.start = String::from("150");
        row.end = String::from("100");

        match CdSnoRna::new(&row, true) {
            Err(RecordError::IncompatibleStrandAndCoords { snor_id, start, end, .. }) => {
                assert_eq!(snor_id, "SNORD3");
                assert_eq!((start, end), (150, 100));
            }
            other => panic!("expected incompatible coords, got {:?}", other),
        }
    }

    #[test]
    fn length_mismatch_is_incompatible() {
        let mut row = cd_row("SNORD3", "-", &transcript_50(), "ATGA", "");
        row.end = String::from("149");

        assert!(matches!(
            CdSnoRna::new(&row, false),
            Err(RecordError::IncompatibleStrandAndCoords { seq_len: 50, .. })
        ));
    }

    #[test]
    fn missing_d_box_without_switch() {
        let row = cd_row("SNORD4", "+", &transcript_50(), "TTTT", "ATGA");

        assert_eq!(
            CdSnoRna::new(&row, false).unwrap_err(),
            RecordError::WrongCDBoxPlacement {
                snor_id: String::from("SNORD4"),
                motif: String::from("TTTT"),
            }
        );
    }

    #[test]
    fn missing_d_box_with_switch_uses_c_box() {
        let row = cd_row("SNORD4", "+", &transcript_50(), "TTTT", "ATGA");
        let snor = CdSnoRna::new(&row, true).unwrap();

        assert!(snor.d_box().swapped);
        assert_eq!(snor.d_box().motif, "ATGA");
        assert_eq!(snor.d_interaction_region(4), "ACGT");
    }

    #[test]
    fn switch_fails_when_c_box_misplaced_too() {
        let seq = format!("GG{}", "C".repeat(48));
        let row = cd_row("SNORD5", "+", &seq, "TTTT", "GG");

        assert!(matches!(
            CdSnoRna::new(&row, true),
            Err(RecordError::WrongCDBoxPlacement { .. })
        ));
    }

    #[test]
    fn d_box_in_5_prime_half_is_misplaced() {
        let seq = format!("CCATGA{}", "C".repeat(44));
        let row = cd_row("SNORD6", "+", &seq, "ATGA", "");

        assert!(matches!(
            CdSnoRna::new(&row, false),
            Err(RecordError::WrongCDBoxPlacement { .. })
        ));
    }

    #[test]
    fn empty_d_box_reports_dash() {
        let row = cd_row("SNORD7", "+", &transcript_50(), "nan", "");

        assert_eq!(
            CdSnoRna::new(&row, true).unwrap_err(),
            RecordError::WrongCDBoxPlacement {
                snor_id: String::from("SNORD7"),
                motif: String::from("-"),
            }
        );
    }

    #[test]
    fn second_candidate_is_tried() {
        let row = cd_row("SNORD8", "+", &transcript_50(), "GGGG;ATGA", "");
        let snor = CdSnoRna::new(&row, false).unwrap();

        assert_eq!(snor.d_box().motif, "ATGA");
    }

    #[test]
    fn unusable_fields() {
        let mut row = cd_row("SNORD9", "+", &transcript_50(), "ATGA", "");
        row.start = String::from("one hundred");
        assert!(matches!(
            CdSnoRna::new(&row, false),
            Err(RecordError::InvalidFieldType { field: "start", .. })
        ));

        let row = cd_row("SNORD9", ".", &transcript_50(), "ATGA", "");
        assert!(matches!(
            CdSnoRna::new(&row, false),
            Err(RecordError::InvalidFieldType { field: "strand", .. })
        ));

        let row = cd_row("SNORD9", "+", &transcript_50(), "AT?A", "");
        assert!(matches!(
            CdSnoRna::new(&row, false),
            Err(RecordError::InvalidFieldType { field: "box_d", .. })
        ));

        let row = cd_row("SNORD9", "+", "ACGT ACGT", "ATGA", "");
        assert!(matches!(
            CdSnoRna::new(&row, false),
            Err(RecordError::InvalidFieldType { field: "sequence", .. })
        ));
    }
}
