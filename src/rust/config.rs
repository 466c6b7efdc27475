use std::env;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the default dataset directory
pub const DATA_DIR_ENV: &str = "NEURODX_DATA_DIR";

const DEFAULT_DATA_DIR: &str = "datasets";
const DEFAULT_LABEL_COLUMN: &str = "prognosis";

/// Locations of the training file and the five knowledge base tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataConfig {
    pub training: PathBuf,
    pub description: PathBuf,
    pub precautions: PathBuf,
    pub medications: PathBuf,
    pub diets: PathBuf,
    pub workout: PathBuf,
    /// Name of the target column in the training file
    pub label_column: String,
    /// Curated symptom list; `None` keeps every training column
    pub allowed_symptoms: Option<Vec<String>>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self::from_dir(Self::default_data_dir())
    }
}

impl DataConfig {
    /// Builds a configuration with the conventional file names under `dir`
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            training: dir.join("Training.csv"),
            description: dir.join("description.csv"),
            precautions: dir.join("precautions_df.csv"),
            medications: dir.join("medications.csv"),
            diets: dir.join("diets.csv"),
            workout: dir.join("workout_df.csv"),
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            allowed_symptoms: None,
        }
    }

    /// Returns the default dataset directory
    pub fn default_data_dir() -> PathBuf {
        // 1. Check environment variable
        if let Ok(path) = env::var(DATA_DIR_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        // 2. Relative to the working directory
        PathBuf::from(DEFAULT_DATA_DIR)
    }

    pub fn with_label_column(mut self, column: impl Into<String>) -> Self {
        self.label_column = column.into();
        self
    }

    /// Restricts the feature schema to the given symptoms, in this order
    pub fn with_allowed_symptoms(mut self, symptoms: Vec<impl Into<String>>) -> Self {
        self.allowed_symptoms = Some(symptoms.into_iter().map(Into::into).collect());
        self
    }
}

/// Hyper-parameters for fitting the classifier ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Number of trees grown by the random forest
    pub n_estimators: usize,
    /// Seed for bootstrap sampling and feature subsampling
    pub seed: u64,
    /// Depth limit for every tree; `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    /// Laplace smoothing for naive Bayes
    pub smoothing: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
            smoothing: 1.0,
        }
    }
}
