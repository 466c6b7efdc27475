use log::error;
use ndarray::{Array1, ArrayView2};

use crate::error::DiagnosisError;

/// Rejects training data that fitting could not index safely.
pub(crate) fn check_training_data(
    features: ArrayView2<u8>,
    targets: &[usize],
    n_classes: usize,
) -> Result<(), DiagnosisError> {
    if features.nrows() == 0 || features.ncols() == 0 {
        return Err(DiagnosisError::BuildError(format!(
            "Training matrix is empty ({} rows, {} features)",
            features.nrows(),
            features.ncols()
        )));
    }
    if features.nrows() != targets.len() {
        return Err(DiagnosisError::BuildError(format!(
            "{} training rows but {} targets",
            features.nrows(),
            targets.len()
        )));
    }
    if let Some(&bad) = targets.iter().find(|&&t| t >= n_classes) {
        error!("Target {} outside {} fitted classes", bad, n_classes);
        return Err(DiagnosisError::UnknownLabel(format!("class index {}", bad)));
    }
    Ok(())
}

/// Gini impurity of a class histogram holding `total` samples.
pub(crate) fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// Index of the largest count; ties resolve to the lowest index.
pub(crate) fn majority(counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, &c) in counts.iter().enumerate() {
        if c > counts[best] {
            best = i;
        }
    }
    best
}

/// Index of the largest score; ties and NaN resolve to the lowest index.
pub(crate) fn argmax(scores: &Array1<f64>) -> usize {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best
}
