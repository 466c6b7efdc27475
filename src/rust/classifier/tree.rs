use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::utils::{check_training_data, gini, majority};
use super::{Classifier, ClassifierKind};
use crate::config::TrainingConfig;
use crate::error::DiagnosisError;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        class: usize,
    },
    Split {
        feature: usize,
        absent: Box<Node>,
        present: Box<Node>,
    },
}

/// CART decision tree over 0/1 features, split on Gini impurity.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    root: Node,
    n_features: usize,
}

/// Growth state shared by every node of one tree.
struct Grower<'f, 't> {
    features: ArrayView2<'f, u8>,
    targets: &'t [usize],
    n_classes: usize,
    max_depth: Option<usize>,
    min_samples_split: usize,
    /// Features examined per split when sampling; ignored without an rng
    max_features: usize,
}

impl DecisionTree {
    /// Fits a tree on every row, examining all features at each split.
    ///
    /// `targets[i]` is the class index of row `i` and must be below
    /// `n_classes`.
    ///
    /// # Errors
    /// `BuildError` for an empty matrix or a row/target count mismatch,
    /// `UnknownLabel` for a target outside `n_classes`.
    pub fn fit(
        features: ArrayView2<u8>,
        targets: &[usize],
        n_classes: usize,
        config: &TrainingConfig,
    ) -> Result<Self, DiagnosisError> {
        check_training_data(features, targets, n_classes)?;
        let rows: Vec<usize> = (0..features.nrows()).collect();
        Ok(Self::grow(features, targets, &rows, n_classes, config, features.ncols(), None))
    }

    /// Fits a tree on a row sample (duplicates allowed), examining a shuffled
    /// subset of `max_features` informative features at each split.
    pub(crate) fn fit_sampled(
        features: ArrayView2<u8>,
        targets: &[usize],
        rows: &[usize],
        n_classes: usize,
        config: &TrainingConfig,
        max_features: usize,
        rng: &mut StdRng,
    ) -> Self {
        Self::grow(features, targets, rows, n_classes, config, max_features, Some(rng))
    }

    fn grow(
        features: ArrayView2<u8>,
        targets: &[usize],
        rows: &[usize],
        n_classes: usize,
        config: &TrainingConfig,
        max_features: usize,
        rng: Option<&mut StdRng>,
    ) -> Self {
        let grower = Grower {
            features,
            targets,
            n_classes,
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split.max(2),
            max_features: max_features.max(1),
        };
        Self {
            root: grower.node(rows, 0, rng),
            n_features: features.ncols(),
        }
    }

    /// Longest root-to-leaf path, counted in splits
    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { absent, present, .. } => 1 + walk(absent).max(walk(present)),
            }
        }
        walk(&self.root)
    }

    pub fn n_leaves(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Split { absent, present, .. } => walk(absent) + walk(present),
            }
        }
        walk(&self.root)
    }
}

impl Classifier for DecisionTree {
    fn kind(&self) -> ClassifierKind {
        ClassifierKind::DecisionTree
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn decide(&self, features: &[u8]) -> usize {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf { class } => return *class,
                Node::Split { feature, absent, present } => {
                    node = if features[*feature] != 0 { present } else { absent };
                }
            }
        }
    }
}

impl Grower<'_, '_> {
    fn counts(&self, rows: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &r in rows {
            counts[self.targets[r]] += 1;
        }
        counts
    }

    fn node(&self, rows: &[usize], depth: usize, mut rng: Option<&mut StdRng>) -> Node {
        let counts = self.counts(rows);
        let class = majority(&counts);
        if counts[class] == rows.len()
            || rows.len() < self.min_samples_split
            || self.max_depth.is_some_and(|max| depth >= max)
        {
            return Node::Leaf { class };
        }

        let mut order: Vec<usize> = (0..self.features.ncols()).collect();
        let limit = match rng.as_deref_mut() {
            Some(rng) => {
                order.shuffle(rng);
                self.max_features
            }
            None => order.len(),
        };

        let Some(feature) = self.best_split(rows, &counts, &order, limit) else {
            return Node::Leaf { class };
        };

        let (present_rows, absent_rows): (Vec<usize>, Vec<usize>) = rows
            .iter()
            .partition(|&&r| self.features[[r, feature]] != 0);

        let absent = self.node(&absent_rows, depth + 1, rng.as_deref_mut());
        let present = self.node(&present_rows, depth + 1, rng);
        Node::Split {
            feature,
            absent: Box::new(absent),
            present: Box::new(present),
        }
    }

    /// Lowest weighted Gini over the first `limit` features that actually
    /// separate `rows`; constant features don't count toward the limit.
    fn best_split(
        &self,
        rows: &[usize],
        counts: &[usize],
        order: &[usize],
        limit: usize,
    ) -> Option<usize> {
        let total = rows.len();
        let mut best: Option<(usize, f64)> = None;
        let mut visited = 0;

        for &feature in order {
            let mut present = vec![0; self.n_classes];
            let mut n_present = 0;
            for &r in rows {
                if self.features[[r, feature]] != 0 {
                    present[self.targets[r]] += 1;
                    n_present += 1;
                }
            }
            if n_present == 0 || n_present == total {
                continue;
            }

            let absent: Vec<usize> = counts.iter().zip(&present).map(|(c, p)| c - p).collect();
            let n_absent = total - n_present;
            let impurity = (n_present as f64 * gini(&present, n_present)
                + n_absent as f64 * gini(&absent, n_absent))
                / total as f64;

            if best.map_or(true, |(_, b)| impurity < b) {
                best = Some((feature, impurity));
            }
            visited += 1;
            if visited >= limit {
                break;
            }
        }

        best.map(|(feature, _)| feature)
    }
}
