//! Report conversion error types.

/// Errors produced while reading, converting or writing reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input (or an existing report file) is not well-formed for the
    /// expected shape. Conversion fails fast, no partial output is written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
