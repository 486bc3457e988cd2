use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
/// Reasons a single snoRNA row is rejected. None of these abort a run.
pub enum RecordError {
    #[error(
        "{snor_id}: strand {strand} is incompatible with coordinates {start}-{end} \
         and sequence of length {seq_len}"
    )]
    /// Locus is inverted/empty or does not match the sequence length
    IncompatibleStrandAndCoords {
        /// Identifier of the rejected record
        snor_id: String,
        /// Strand symbol as given
        strand: char,
        /// Genomic start
        start: u64,
        /// Genomic end
        end: u64,
        /// Length of the supplied sequence
        seq_len: usize,
    },
    #[error("{snor_id}: D-box {motif} is not located in the 3' half of the snoRNA")]
    /// D-box (and C-box when switching) could not be placed
    WrongCDBoxPlacement {
        /// Identifier of the rejected record
        snor_id: String,
        /// Annotated D-box, `-` when missing
        motif: String,
    },
    #[error("{snor_id}: field `{field}` has unusable value `{value}`")]
    /// A field could not be interpreted in its expected shape
    InvalidFieldType {
        /// Identifier of the rejected record
        snor_id: String,
        /// Name of the offending column
        field: &'static str,
        /// Raw value of the offending column
        value: String,
    },
}

#[derive(Debug, Error)]
/// Errors that stop a run, mostly I/O or input format related
pub enum Error {
    #[error("Could not find input file {0}")]
    /// Input path does not exist
    FileNotFound(PathBuf),
    #[error("Could not read or write file: {0}")]
    /// Generic I/O failure
    Io(#[from] std::io::Error),
    #[error("Could not open input table: {0}")]
    /// Compression detection failure
    Niffler(#[from] niffler::Error),
    #[error("Could not parse tab separated input: {0}")]
    /// Malformed TSV
    Csv(#[from] csv::Error),
    #[error("Unsupported snoRNA type: {0}")]
    /// Mixed or unknown `mod_type`
    UnsupportedType(String),
    #[error("Not implemented: {0}")]
    /// Requested a pathway that does not exist yet
    NotImplemented(String),
}
