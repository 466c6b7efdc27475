use std::collections::{BTreeSet, HashMap};

use crate::error::DiagnosisError;

/// Bidirectional mapping between disease names and class indices.
///
/// Labels are trimmed and indexed in sorted order, so two codecs fitted on
/// the same label set always agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCodec {
    labels: Vec<String>,
    indices: HashMap<String, usize>,
}

impl LabelCodec {
    /// Fits a codec on the distinct trimmed labels. Empty labels are ignored.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = labels
            .into_iter()
            .map(|label| label.as_ref().trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();
        let labels: Vec<String> = distinct.into_iter().collect();
        let indices = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        Self { labels, indices }
    }

    pub fn encode(&self, label: &str) -> Result<usize, DiagnosisError> {
        self.indices
            .get(label.trim())
            .copied()
            .ok_or_else(|| DiagnosisError::UnknownLabel(label.to_string()))
    }

    /// Encodes every label, failing on the first one outside the fitted set
    pub fn encode_all<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>, DiagnosisError> {
        labels.iter().map(|label| self.encode(label.as_ref())).collect()
    }

    pub fn decode(&self, index: usize) -> Result<&str, DiagnosisError> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| DiagnosisError::UnknownLabel(format!("class index {}", index)))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
