use crate::error::Error;
use crate::snorna::{CdSnoRna, DEFAULT_SEED_LENGTH};
use crate::table::RowResult;
use crate::Result;
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// snoRNA classes that can be grouped
pub enum SnoType {
    /// CD-box snoRNAs, guide 2'-O-methylation
    Cd,
    /// H/ACA-box snoRNAs, guide pseudouridylation
    Haca,
}

impl SnoType {
    /// Values accepted on the command line
    pub const VARIANTS: [&'static str; 2] = ["CD", "HACA"];
}

impl FromStr for SnoType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CD" => Ok(SnoType::Cd),
            "HACA" => Ok(SnoType::Haca),
            other => Err(Error::UnsupportedType(other.to_string())),
        }
    }
}

impl fmt::Display for SnoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnoType::Cd => write!(f, "CD"),
            SnoType::Haca => write!(f, "HACA"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// Settings applied to every record of a batch
pub struct GroupOptions {
    /// Seed length extracted upstream of the D-box
    pub length: usize,
    /// Retry with the C-box when the D-box is misplaced
    pub switch_boxes: bool,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_SEED_LENGTH,
            switch_boxes: false,
        }
    }
}

/// snoRNA identifiers grouped by interaction region. Families are kept in the
/// order their region was first seen, members in input order.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Families {
    regions: Vec<String>,
    members: HashMap<String, Vec<String>>,
    skipped: usize,
}

impl Families {
    /// Appends `snor_id` to the family of `region`, creating it if needed
    pub fn insert(&mut self, region: &str, snor_id: &str) {
        match self.members.get_mut(region) {
            Some(ids) => ids.push(snor_id.to_string()),
            None => {
                self.regions.push(region.to_string());
                self.members
                    .insert(region.to_string(), vec![snor_id.to_string()]);
            }
        }
    }

    /// Members of the family keyed by `region`
    pub fn get(&self, region: &str) -> Option<&[String]> {
        self.members.get(region).map(Vec::as_slice)
    }

    /// Iterates `(region, members)` in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.regions
            .iter()
            .filter_map(move |region| self.get(region).map(|ids| (region.as_str(), ids)))
    }

    /// Number of distinct families
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// `true` if no record was grouped
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Number of rows rejected during grouping
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Writes one `region<TAB>id,id,...` line per family and a final count
    pub fn write<W: std::io::Write>(&self, mut out: W) -> Result<()> {
        for (region, ids) in self.iter() {
            writeln!(out, "{}\t{}", region, ids.join(","))?;
        }
        writeln!(out, "Found {} families", self.len())?;
        out.flush()?;
        Ok(())
    }
}

/// Fails unless every well formed row carries the same `mod_type`
pub fn check_uniform_type(rows: &[RowResult]) -> Result<Option<String>> {
    let types = rows
        .iter()
        .filter_map(|row| row.as_ref().ok())
        .map(|row| row.mod_type.trim())
        .collect::<BTreeSet<&str>>();

    match types.len() {
        0 => Ok(None),
        1 => Ok(types.into_iter().next().map(String::from)),
        _ => Err(Error::UnsupportedType(format!(
            "more than one type of snoRNAs detected: {:?}",
            types
        ))),
    }
}

/// Groups rows of one snoRNA type into families. Rows that cannot be turned
/// into a valid record are logged and skipped, batch level problems abort.
pub fn group_families(
    rows: &[RowResult],
    sno_type: SnoType,
    options: &GroupOptions,
) -> Result<Families> {
    if sno_type == SnoType::Haca {
        return Err(Error::NotImplemented(format!(
            "grouping of {} snoRNAs",
            sno_type
        )));
    }

    match check_uniform_type(rows)? {
        Some(ref found) if found != &sno_type.to_string() => warn!(
            "Input snoRNAs are labelled {} but are processed as {}",
            found, sno_type
        ),
        _ => {}
    }

    let mut families = Families::default();
    for row in rows {
        let record = row
            .as_ref()
            .map_err(Clone::clone)
            .and_then(|row| CdSnoRna::new(row, options.switch_boxes));

        match record {
            Ok(snor) => {
                let region = snor.d_interaction_region(options.length);
                debug!(
                    "{} D-box {} at {}:{} gives region {}",
                    snor.snor_id(),
                    snor.d_box().motif,
                    snor.chrom(),
                    snor.d_box_genomic_start(),
                    region
                );
                families.insert(region, snor.snor_id());
            }
            Err(e) => {
                warn!("{}", e);
                families.skipped += 1;
            }
        }
    }

    info!(
        "Grouped {} snoRNAs into {} families, skipped {}",
        rows.len() - families.skipped,
        families.len(),
        families.skipped
    );
    Ok(families)
}
