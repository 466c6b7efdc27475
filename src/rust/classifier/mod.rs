mod bayes;
mod builder;
mod forest;
mod tree;
mod utils;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DiagnosisError;

pub use bayes::NaiveBayes;
pub use builder::{Ensemble, EnsembleBuilder};
pub use forest::RandomForest;
pub use tree::DecisionTree;

/// The model families the ensemble can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    DecisionTree,
    RandomForest,
    NaiveBayes,
}

impl ClassifierKind {
    pub const ALL: [ClassifierKind; 3] = [
        ClassifierKind::RandomForest,
        ClassifierKind::DecisionTree,
        ClassifierKind::NaiveBayes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DecisionTree => "decision_tree",
            Self::RandomForest => "random_forest",
            Self::NaiveBayes => "naive_bayes",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassifierKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "decision_tree" | "tree" => Ok(Self::DecisionTree),
            "random_forest" | "forest" => Ok(Self::RandomForest),
            "naive_bayes" | "bayes" => Ok(Self::NaiveBayes),
            other => Err(format!("unknown classifier '{}'", other)),
        }
    }
}

/// A fitted model mapping a binary symptom vector to a class index.
///
/// Implementors are immutable after fitting, so a single instance can serve
/// any number of threads.
pub trait Classifier: Send + Sync + fmt::Debug {
    fn kind(&self) -> ClassifierKind;

    /// Length of the feature vectors this model was fitted on
    fn n_features(&self) -> usize;

    /// Scores a vector already known to have `n_features()` entries
    fn decide(&self, features: &[u8]) -> usize;

    /// Predicts the class index for `features`.
    ///
    /// # Errors
    /// `DiagnosisError::DimensionMismatch` if the vector length differs from
    /// the fitted feature count.
    fn predict(&self, features: &[u8]) -> Result<usize, DiagnosisError> {
        if features.len() != self.n_features() {
            return Err(DiagnosisError::DimensionMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }
        Ok(self.decide(features))
    }
}
