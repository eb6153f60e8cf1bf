use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// Variants fall into two classes (see [`IngestionError::is_validation`]):
///
/// - **validation** errors are raised before any parsing work and cross the ingestion boundary;
/// - **parse** errors are format-specific and get absorbed into
///   [`crate::dataset::Dataset::processing_errors`] by [`crate::ingestion::ingest`].
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The file extension does not map to any known format.
    #[error("unsupported file type '{extension}'")]
    UnsupportedFormat { extension: String },

    /// No extension was given and no format override was configured.
    #[error("cannot infer format: '{name}' has no extension")]
    MissingExtension { name: String },

    /// The byte source produced zero bytes.
    #[error("input is empty")]
    EmptyInput,

    /// The input exceeds the configured upload limit.
    #[error("input is {size} bytes which exceeds the limit of {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON ingestion error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML ingestion error.
    #[error("xml error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Parquet ingestion error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The content is readable but does not have the shape the format requires.
    #[error("malformed {format} input: {message}")]
    Malformed { format: &'static str, message: String },
}

impl IngestionError {
    /// Whether this error is a validation failure (raised before parsing, never recorded on a
    /// dataset) as opposed to a per-format parse failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::UnsupportedFormat { .. }
                | Self::MissingExtension { .. }
                | Self::EmptyInput
                | Self::InputTooLarge { .. }
        )
    }

    pub(crate) fn malformed(format: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            message: message.into(),
        }
    }
}

/// Error type for the analysis layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A chart type name did not match any supported chart kind.
    #[error("unknown chart type '{name}'")]
    UnknownChartType { name: String },
}

#[cfg(test)]
mod tests {
    use super::IngestionError;

    #[test]
    fn validation_classification() {
        assert!(IngestionError::EmptyInput.is_validation());
        assert!(
            IngestionError::UnsupportedFormat {
                extension: "exe".to_string()
            }
            .is_validation()
        );
        assert!(!IngestionError::malformed("json", "row 1 is not a json object").is_validation());
    }

    #[test]
    fn malformed_message_names_format() {
        let err = IngestionError::malformed("xml", "document has no elements");
        assert_eq!(err.to_string(), "malformed xml input: document has no elements");
    }
}
