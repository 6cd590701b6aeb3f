use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The header/body structure could not be located. Fatal for the file.
    #[error("malformed file: {0}")]
    MalformedFile(String),

    /// A row names a metabolite the reference table does not know. Never
    /// returned from `ingest`; recorded as a diagnostic instead.
    #[error("row {row}: unknown metabolite '{name}'")]
    UnresolvedMetabolite { row: usize, name: String },
}

impl IngestError {
    pub fn malformed(message: impl Into<String>) -> Self {
        IngestError::MalformedFile(message.into())
    }
}

impl From<zip::result::ZipError> for IngestError {
    fn from(e: zip::result::ZipError) -> Self {
        IngestError::MalformedFile(format!("unreadable workbook: {e}"))
    }
}

impl From<quick_xml::Error> for IngestError {
    fn from(e: quick_xml::Error) -> Self {
        IngestError::MalformedFile(format!("invalid workbook XML: {e}"))
    }
}

impl From<quick_xml::events::attributes::AttrError> for IngestError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        IngestError::MalformedFile(format!("invalid workbook XML attribute: {e}"))
    }
}

impl From<csv::Error> for IngestError {
    fn from(e: csv::Error) -> Self {
        IngestError::MalformedFile(format!("unreadable delimited text: {e}"))
    }
}
