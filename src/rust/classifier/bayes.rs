use ndarray::{Array1, Array2, ArrayView2, Axis};

use super::utils::{argmax, check_training_data};
use super::{Classifier, ClassifierKind};
use crate::config::TrainingConfig;
use crate::error::DiagnosisError;

/// Bernoulli naive Bayes with additive (Laplace) smoothing.
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    /// log P(class)
    log_prior: Array1<f64>,
    /// log P(feature = 1 | class) - log P(feature = 0 | class)
    log_ratio: Array2<f64>,
    /// sum over features of log P(feature = 0 | class)
    log_absent_total: Array1<f64>,
}

impl NaiveBayes {
    /// # Errors
    /// Same checks as `DecisionTree::fit`.
    pub fn fit(
        features: ArrayView2<u8>,
        targets: &[usize],
        n_classes: usize,
        config: &TrainingConfig,
    ) -> Result<Self, DiagnosisError> {
        check_training_data(features, targets, n_classes)?;
        let alpha = config.smoothing.max(f64::EPSILON);
        let n_features = features.ncols();

        let mut class_counts = Array1::<f64>::zeros(n_classes);
        let mut present_counts = Array2::<f64>::zeros((n_classes, n_features));
        for (row, &class) in features.axis_iter(Axis(0)).zip(targets) {
            class_counts[class] += 1.0;
            let mut counts = present_counts.row_mut(class);
            for (count, &value) in counts.iter_mut().zip(row.iter()) {
                if value != 0 {
                    *count += 1.0;
                }
            }
        }

        let total = class_counts.sum().max(1.0);
        // classes never seen in training can't win
        let log_prior = class_counts.mapv(|c| if c > 0.0 { (c / total).ln() } else { f64::NEG_INFINITY });

        let denominators = class_counts.mapv(|c| c + 2.0 * alpha).insert_axis(Axis(1));
        let p_present = (&present_counts + alpha) / &denominators;
        let log_present = p_present.mapv(f64::ln);
        let log_absent = p_present.mapv(|p| (1.0 - p).ln());

        Ok(Self {
            log_prior,
            log_ratio: &log_present - &log_absent,
            log_absent_total: log_absent.sum_axis(Axis(1)),
        })
    }

    /// Unnormalized log posterior per class
    pub fn joint_log_likelihood(&self, features: &[u8]) -> Array1<f64> {
        let x: Array1<f64> = features.iter().map(|&v| if v != 0 { 1.0 } else { 0.0 }).collect();
        &self.log_prior + &self.log_absent_total + self.log_ratio.dot(&x)
    }
}

impl Classifier for NaiveBayes {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::NaiveBayes
    }

    fn n_features(&self) -> usize {
        self.log_ratio.ncols()
    }

    fn decide(&self, features: &[u8]) -> usize {
        argmax(&self.joint_log_likelihood(features))
    }
}
