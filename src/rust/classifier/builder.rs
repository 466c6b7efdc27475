use log::info;
use ndarray::ArrayView2;

use super::utils::check_training_data;
use super::{Classifier, ClassifierKind, DecisionTree, NaiveBayes, RandomForest};
use crate::config::TrainingConfig;
use crate::error::DiagnosisError;

/// One or more fitted classifiers sharing a feature schema and label codec.
///
/// The first member added is the primary model. Members are queried
/// independently; their answers are never merged.
///
/// # Thread Safety
///
/// Members are `Send + Sync` trait objects and nothing is mutated after
/// `build`, so an `Ensemble` can be shared behind an `Arc` without locking.
#[derive(Debug)]
pub struct Ensemble {
    members: Vec<Box<dyn Classifier>>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Ensemble>();
    }
};

impl Ensemble {
    /// Creates a new EnsembleBuilder for fluent construction
    pub fn builder() -> EnsembleBuilder {
        EnsembleBuilder::new()
    }

    /// Wraps already fitted models; the first one becomes the primary.
    pub fn from_members(members: Vec<Box<dyn Classifier>>) -> Result<Self, DiagnosisError> {
        if members.is_empty() {
            return Err(DiagnosisError::BuildError(
                "An ensemble needs at least one model".to_string(),
            ));
        }
        let n_features = members[0].n_features();
        if let Some(odd) = members.iter().find(|m| m.n_features() != n_features) {
            return Err(DiagnosisError::BuildError(format!(
                "Model '{}' was fitted on {} features, expected {}",
                odd.kind(),
                odd.n_features(),
                n_features
            )));
        }
        Ok(Self { members })
    }

    pub fn primary(&self) -> &dyn Classifier {
        self.members[0].as_ref()
    }

    pub fn members(&self) -> impl Iterator<Item = &dyn Classifier> {
        self.members.iter().map(|m| m.as_ref())
    }

    pub fn kinds(&self) -> Vec<ClassifierKind> {
        self.members.iter().map(|m| m.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.primary().n_features()
    }

    /// Predicts with the primary model only
    pub fn predict(&self, features: &[u8]) -> Result<usize, DiagnosisError> {
        self.primary().predict(features)
    }

    /// Predicts with every member, in insertion order
    pub fn predict_all(&self, features: &[u8]) -> Result<Vec<(ClassifierKind, usize)>, DiagnosisError> {
        self.members
            .iter()
            .map(|m| Ok((m.kind(), m.predict(features)?)))
            .collect()
    }
}

/// A builder for fitting an Ensemble with a fluent interface.
#[derive(Default, Debug, Clone)]
pub struct EnsembleBuilder {
    kinds: Vec<ClassifierKind>,
    training_config: TrainingConfig,
}

impl EnsembleBuilder {
    /// Creates a new empty EnsembleBuilder instance with default configuration
    ///
    /// # Example
    /// ```
    /// use neurodx::EnsembleBuilder;
    ///
    /// let builder = EnsembleBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            kinds: Vec::new(),
            training_config: TrainingConfig::default(),
        }
    }

    /// Sets the hyper-parameters used when fitting every member
    ///
    /// # Example
    /// ```
    /// use neurodx::{EnsembleBuilder, TrainingConfig};
    ///
    /// let config = TrainingConfig { n_estimators: 10, ..TrainingConfig::default() };
    /// let builder = EnsembleBuilder::new().with_training_config(config);
    /// ```
    pub fn with_training_config(mut self, config: TrainingConfig) -> Self {
        self.training_config = config;
        self
    }

    /// Adds a model family to fit. The first one added is the primary.
    ///
    /// # Returns
    /// * `Result<Self, DiagnosisError>` - The builder instance, or a
    ///   `BuildError` if the same family was already added
    ///
    /// # Example
    /// ```
    /// use neurodx::{ClassifierKind, EnsembleBuilder};
    ///
    /// let builder = EnsembleBuilder::new()
    ///     .add_model(ClassifierKind::RandomForest)
    ///     .and_then(|b| b.add_model(ClassifierKind::NaiveBayes));
    /// assert!(builder.is_ok());
    /// ```
    pub fn add_model(mut self, kind: ClassifierKind) -> Result<Self, DiagnosisError> {
        if self.kinds.contains(&kind) {
            return Err(DiagnosisError::BuildError(format!(
                "Model '{}' already added",
                kind
            )));
        }
        self.kinds.push(kind);
        Ok(self)
    }

    pub fn kinds(&self) -> &[ClassifierKind] {
        &self.kinds
    }

    /// Fits every requested model on the same data
    ///
    /// # Returns
    /// * `Result<Ensemble, DiagnosisError>` - The fitted ensemble, or an error if:
    ///   - No model has been added
    ///   - There are no training rows or no features
    ///   - The number of targets differs from the number of rows
    ///   - A target is not below `n_classes`
    pub fn build(
        self,
        features: ArrayView2<u8>,
        targets: &[usize],
        n_classes: usize,
    ) -> Result<Ensemble, DiagnosisError> {
        if self.kinds.is_empty() {
            return Err(DiagnosisError::BuildError("At least one model must be added".to_string()));
        }
        check_training_data(features, targets, n_classes)?;

        let config = &self.training_config;
        let mut members: Vec<Box<dyn Classifier>> = Vec::with_capacity(self.kinds.len());
        for kind in &self.kinds {
            info!("Fitting {} on {} rows", kind, features.nrows());
            let member: Box<dyn Classifier> = match kind {
                ClassifierKind::DecisionTree => {
                    Box::new(DecisionTree::fit(features, targets, n_classes, config)?)
                }
                ClassifierKind::RandomForest => {
                    Box::new(RandomForest::fit(features, targets, n_classes, config)?)
                }
                ClassifierKind::NaiveBayes => {
                    Box::new(NaiveBayes::fit(features, targets, n_classes, config)?)
                }
            };
            members.push(member);
        }

        Ensemble::from_members(members)
    }
}
