use log::debug;
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::tree::DecisionTree;
use super::utils::{check_training_data, majority};
use super::{Classifier, ClassifierKind};
use crate::config::TrainingConfig;
use crate::error::DiagnosisError;

/// Bagged ensemble of decision trees with per-split feature subsampling.
///
/// Every random draw comes from one `StdRng` seeded with
/// `TrainingConfig::seed`, so the same data and config always grow the same
/// forest.
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
    n_features: usize,
}

impl RandomForest {
    /// # Errors
    /// Same checks as `DecisionTree::fit`.
    pub fn fit(
        features: ArrayView2<u8>,
        targets: &[usize],
        n_classes: usize,
        config: &TrainingConfig,
    ) -> Result<Self, DiagnosisError> {
        check_training_data(features, targets, n_classes)?;
        let n_rows = features.nrows();
        let n_features = features.ncols();
        let max_features = ((n_features as f64).sqrt() as usize).max(1);
        let mut rng = StdRng::seed_from_u64(config.seed);

        let trees = (0..config.n_estimators.max(1))
            .map(|_| {
                let sample: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
                DecisionTree::fit_sampled(
                    features,
                    targets,
                    &sample,
                    n_classes,
                    config,
                    max_features,
                    &mut rng,
                )
            })
            .collect::<Vec<_>>();

        debug!(
            "Grew {} trees (seed {}, {} features per split)",
            trees.len(),
            config.seed,
            max_features
        );
        Ok(Self {
            trees,
            n_classes,
            n_features,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Per-class vote counts for `features`
    pub fn votes(&self, features: &[u8]) -> Vec<usize> {
        let mut votes = vec![0; self.n_classes];
        for tree in &self.trees {
            votes[tree.decide(features)] += 1;
        }
        votes
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::RandomForest
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn decide(&self, features: &[u8]) -> usize {
        majority(&self.votes(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    fn data() -> (Array2<u8>, Vec<usize>) {
        let x = array![
            [1, 1, 0, 0, 0, 0],
            [1, 0, 0, 0, 0, 0],
            [0, 1, 0, 0, 0, 0],
            [0, 0, 1, 1, 0, 0],
            [0, 0, 1, 0, 0, 0],
            [0, 0, 0, 1, 0, 0],
            [0, 0, 0, 0, 1, 1],
            [0, 0, 0, 0, 1, 0],
            [0, 0, 0, 0, 0, 1],
        ];
        (x, vec![0, 0, 0, 1, 1, 1, 2, 2, 2])
    }

    #[test]
    fn test_same_seed_same_votes() {
        let (x, y) = data();
        let config = TrainingConfig {
            n_estimators: 15,
            ..TrainingConfig::default()
        };
        let a = RandomForest::fit(x.view(), &y, 3, &config).unwrap();
        let b = RandomForest::fit(x.view(), &y, 3, &config).unwrap();
        for row in x.rows() {
            let row = row.to_vec();
            assert_eq!(a.votes(&row), b.votes(&row));
        }
    }

    #[test]
    fn test_votes_cover_every_tree() {
        let (x, y) = data();
        let config = TrainingConfig {
            n_estimators: 11,
            ..TrainingConfig::default()
        };
        let forest = RandomForest::fit(x.view(), &y, 3, &config).unwrap();
        assert_eq!(forest.n_trees(), 11);
        let votes = forest.votes(&[1, 1, 0, 0, 0, 0]);
        assert_eq!(votes.iter().sum::<usize>(), 11);
        assert_eq!(forest.predict(&[1, 1, 0, 0, 0, 0]).unwrap(), 0);
        assert_eq!(forest.predict(&[0, 0, 0, 0, 1, 1]).unwrap(), 2);
    }

    #[test]
    fn test_predictions_stay_in_class_range() {
        let (x, y) = data();
        let forest = RandomForest::fit(x.view(), &y, 3, &TrainingConfig::default()).unwrap();
        assert!(forest.predict(&[0; 6]).unwrap() < 3);
        assert!(forest.predict(&[1; 6]).unwrap() < 3);
    }

    #[test]
    fn test_out_of_range_target_is_an_error() {
        let x = array![[1, 0], [0, 1]];
        let result = RandomForest::fit(x.view(), &[0, 5], 2, &TrainingConfig::default());
        assert!(matches!(result, Err(DiagnosisError::UnknownLabel(_))));
    }
}
