//! Disease-indexed reference data used to enrich a prediction.
//!
//! Five tables are loaded independently. A table that fails to load is
//! replaced by an empty one, which only degrades the field it feeds: every
//! lookup resolves to a value, falling back to the defaults below.

mod list;
mod table;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::DataConfig;

pub use list::{list_or_single, parse_list_literal, ListParseError};
pub use table::{is_missing, ReferenceTable, DISEASE_COLUMN};

pub const DEFAULT_DESCRIPTION: &str = "Description not available.";
/// Workout advice for a disease the workout table does not list
pub const DEFAULT_WORKOUT: &str = "General rest and hydration.";
/// Workout advice when the workout table is empty or unkeyed
pub const FALLBACK_WORKOUT: &str = "Maintain moderate physical activity as tolerated.";

const PRECAUTION_COLUMNS: [&str; 4] = ["Precaution_1", "Precaution_2", "Precaution_3", "Precaution_4"];

/// Everything the knowledge base knows about one disease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub description: String,
    pub precautions: Vec<String>,
    pub medications: Vec<String>,
    pub diet: Vec<String>,
    pub workout: String,
}

#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    description: ReferenceTable,
    precautions: ReferenceTable,
    medications: ReferenceTable,
    diets: ReferenceTable,
    workout: ReferenceTable,
}

impl KnowledgeBase {
    /// Loads the five tables named in `config`; never fails.
    pub fn load(config: &DataConfig) -> Self {
        Self {
            description: ReferenceTable::load_or_empty(&config.description, "description"),
            precautions: ReferenceTable::load_or_empty(&config.precautions, "precautions"),
            medications: ReferenceTable::load_or_empty(&config.medications, "medications"),
            diets: ReferenceTable::load_or_empty(&config.diets, "diets"),
            workout: ReferenceTable::load_or_empty(&config.workout, "workout"),
        }
    }

    pub fn from_tables(
        description: ReferenceTable,
        precautions: ReferenceTable,
        medications: ReferenceTable,
        diets: ReferenceTable,
        workout: ReferenceTable,
    ) -> Self {
        Self {
            description,
            precautions,
            medications,
            diets,
            workout,
        }
    }

    /// A knowledge base where every lookup yields the defaults
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collects every field for `disease`, matched case-insensitively.
    pub fn lookup(&self, disease: &str) -> KnowledgeEntry {
        KnowledgeEntry {
            description: self.description(disease),
            precautions: self.precautions(disease),
            medications: self.medications(disease),
            diet: self.diet(disease),
            workout: self.workout(disease),
        }
    }

    /// Space-joined descriptions of every matching row
    pub fn description(&self, disease: &str) -> String {
        let parts = self.description.values(disease, "Description");
        if parts.is_empty() {
            debug!("No description for '{}'", disease);
            return DEFAULT_DESCRIPTION.to_string();
        }
        parts.join(" ")
    }

    /// Up to four precautions per matching row, in column order
    pub fn precautions(&self, disease: &str) -> Vec<String> {
        let columns: Vec<usize> = PRECAUTION_COLUMNS
            .iter()
            .filter_map(|name| self.precautions.column(name))
            .collect();
        self.precautions
            .matching(disease)
            .flat_map(|row| columns.iter().filter_map(move |&idx| row.get(idx)))
            .filter(|cell| !is_missing(cell))
            .map(str::to_string)
            .collect()
    }

    pub fn medications(&self, disease: &str) -> Vec<String> {
        list_field(&self.medications, disease, "Medication")
    }

    pub fn diet(&self, disease: &str) -> Vec<String> {
        list_field(&self.diets, disease, "Diet")
    }

    /// Advice from the first matching workout row
    pub fn workout(&self, disease: &str) -> String {
        if self.workout.is_empty() || !self.workout.has_disease_column() {
            return FALLBACK_WORKOUT.to_string();
        }
        match self.workout.values(disease, "workout").first() {
            Some(advice) => advice.to_string(),
            None => {
                debug!("No workout advice for '{}'", disease);
                DEFAULT_WORKOUT.to_string()
            }
        }
    }
}

/// Reads a list-valued field. A first cell written as a list literal is
/// parsed (keeping the raw text as one item if that fails); otherwise each
/// matching row contributes one plain item.
fn list_field(table: &ReferenceTable, disease: &str, column: &str) -> Vec<String> {
    let values = table.values(disease, column);
    match values.first() {
        None => Vec::new(),
        Some(first) if first.starts_with('[') => list_or_single(first),
        Some(_) => values.iter().map(|v| v.to_string()).collect(),
    }
}
