//! The ordered symptom list that fixes the classifier's input layout.

use std::collections::{HashMap, HashSet};

use log::{debug, info};

use crate::error::DiagnosisError;

/// Ordered, duplicate-free list of symptom names.
///
/// Position `i` of every feature vector refers to `names()[i]`. The schema is
/// fixed once built; models fitted against it must only ever see vectors
/// produced by [`FeatureSchema::vectorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Builds the schema from the training columns (label column already
    /// removed) and an optional curated allow-list.
    ///
    /// With an allow-list the result is the intersection of both lists in the
    /// allow-list's order; without one every column is kept in file order.
    ///
    /// # Errors
    /// `DiagnosisError::EmptySchema` if no symptom survives.
    pub fn new(
        columns: &[impl AsRef<str>],
        allowed: Option<&[impl AsRef<str>]>,
    ) -> Result<Self, DiagnosisError> {
        let candidates: Vec<&str> = match allowed {
            Some(allowed) => {
                let present: HashSet<&str> = columns.iter().map(AsRef::as_ref).collect();
                let kept: Vec<&str> = allowed
                    .iter()
                    .map(AsRef::as_ref)
                    .filter(|name| present.contains(name))
                    .collect();
                debug!(
                    "Allow-list kept {} of {} curated symptoms",
                    kept.len(),
                    allowed.len()
                );
                kept
            }
            None => columns.iter().map(AsRef::as_ref).collect(),
        };

        let mut names = Vec::with_capacity(candidates.len());
        let mut positions = HashMap::with_capacity(candidates.len());
        for name in candidates {
            if name.is_empty() || positions.contains_key(name) {
                continue;
            }
            positions.insert(name.to_string(), names.len());
            names.push(name.to_string());
        }

        if names.is_empty() {
            return Err(DiagnosisError::EmptySchema);
        }
        info!("Feature schema built with {} symptoms", names.len());
        Ok(Self { names, positions })
    }

    /// Encodes a symptom selection as a 0/1 vector in schema order.
    ///
    /// Names not in the schema are ignored; the result always has
    /// `self.len()` entries.
    pub fn vectorize(&self, selected: &HashSet<String>) -> Vec<u8> {
        self.names
            .iter()
            .map(|name| u8::from(selected.contains(name)))
            .collect()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}
