use std::path::PathBuf;

/// Represents the different types of errors that can occur while loading,
/// training or running the diagnosis pipeline.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    /// Training data is absent, unreadable or empty. Fatal at startup.
    #[error("Training data unavailable at {}: {reason}", path.display())]
    StartupDataMissing { path: PathBuf, reason: String },
    /// No symptom column survived schema construction. Fatal at startup.
    #[error("Feature schema is empty: no valid symptom columns")]
    EmptySchema,
    /// The ensemble could not be assembled or fitted
    #[error("Build error: {0}")]
    BuildError(String),
    /// A request reached inference before startup completed
    #[error("Model not ready")]
    ModelNotReady,
    /// Empty or malformed symptom selection
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A label or class index outside the fitted set
    #[error("Unknown label: {0}")]
    UnknownLabel(String),
    /// A feature vector whose length differs from the fitted schema
    #[error("Feature vector has {actual} entries, model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl DiagnosisError {
    /// Returns true for conditions the caller caused and can correct:
    /// an empty selection, or a request sent before the model is ready.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ModelNotReady | Self::InvalidInput(_))
    }

    pub(crate) fn startup(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::StartupDataMissing {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
