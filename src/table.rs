use crate::error::{Error, RecordError};
use crate::Result;
use log::{debug, info};
use std::path::Path;

/// Column names of the snoRNA table, in positional order
pub const COLUMNS: [&str; 20] = [
    "chrom",
    "start",
    "end",
    "snor_id",
    "mod_type",
    "strand",
    "sequence",
    "box_d",
    "box_c",
    "box_h",
    "box_aca",
    "alias",
    "gene_name",
    "accession",
    "mod_site",
    "host_gene",
    "host_id",
    "organization",
    "organism",
    "note",
];

/// A row that either has the full schema or was rejected because of its shape
pub type RowResult = std::result::Result<SnoRow, RecordError>;

/// One unparsed line of the snoRNA table. Every column is kept as text, typed
/// interpretation happens when a record is built from it.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnoRow {
    pub chrom: String,
    pub start: String,
    pub end: String,
    pub snor_id: String,
    pub mod_type: String,
    pub strand: String,
    pub sequence: String,
    pub box_d: String,
    pub box_c: String,
    pub box_h: String,
    pub box_aca: String,
    pub alias: String,
    pub gene_name: String,
    pub accession: String,
    pub mod_site: String,
    pub host_gene: String,
    pub host_id: String,
    pub organization: String,
    pub organism: String,
    pub note: String,
}

impl SnoRow {
    /// Builds a row from exactly 20 positional fields
    pub fn from_fields<I, S>(fields: I) -> std::result::Result<Self, RecordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.len() != COLUMNS.len() {
            let snor_id = fields.get(3).cloned().unwrap_or_else(|| String::from("?"));
            return Err(RecordError::InvalidFieldType {
                snor_id,
                field: "columns",
                value: format!("{} columns instead of {}", fields.len(), COLUMNS.len()),
            });
        }

        let mut next = fields.drain(..);
        let mut take = || next.next().unwrap_or_default();
        Ok(Self {
            chrom: take(),
            start: take(),
            end: take(),
            snor_id: take(),
            mod_type: take(),
            strand: take(),
            sequence: take(),
            box_d: take(),
            box_c: take(),
            box_h: take(),
            box_aca: take(),
            alias: take(),
            gene_name: take(),
            accession: take(),
            mod_site: take(),
            host_gene: take(),
            host_id: take(),
            organization: take(),
            organism: take(),
            note: take(),
        })
    }
}

/// Reads the headerless snoRNA table, plain or compressed. Rows with the wrong
/// number of columns or non UTF-8 text are returned as errors rather than
/// aborting the read.
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<Vec<RowResult>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let (rdr, format) = niffler::from_path(path)?;
    debug!("Input {} detected as {:?}", path.display(), format);
    parse_rows(rdr)
}

/// Parses tab separated rows from any reader
pub fn parse_rows<R: std::io::Read>(rdr: R) -> Result<Vec<RowResult>> {
    let mut tsv = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(rdr);

    let mut rows = Vec::new();
    for record in tsv.byte_records() {
        let record = record?;
        rows.push(decode_row(&record));
    }
    info!("Read {} rows", rows.len());
    Ok(rows)
}

/// Decodes one raw row. A column that is not valid UTF-8 rejects only this row.
fn decode_row(record: &csv::ByteRecord) -> RowResult {
    let mut fields = Vec::with_capacity(record.len());
    for (i, field) in record.iter().enumerate() {
        match std::str::from_utf8(field) {
            Ok(field) => fields.push(field),
            Err(_) => {
                let snor_id = record
                    .get(3)
                    .map(|id| String::from_utf8_lossy(id).into_owned())
                    .unwrap_or_else(|| String::from("?"));
                return Err(RecordError::InvalidFieldType {
                    snor_id,
                    field: COLUMNS.get(i).copied().unwrap_or("columns"),
                    value: String::from_utf8_lossy(field).into_owned(),
                });
            }
        }
    }
    SnoRow::from_fields(fields)
}
