//! Loading of the binary symptom training table.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use log::{info, warn};
use ndarray::{Array2, Axis};

use crate::error::DiagnosisError;
use crate::schema::FeatureSchema;

/// Training rows: one 0/1 column per symptom plus a disease label.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    columns: Vec<String>,
    features: Array2<u8>,
    labels: Vec<String>,
}

impl TrainingSet {
    /// Reads a training CSV from disk.
    ///
    /// # Errors
    /// `DiagnosisError::StartupDataMissing` if the file is absent, unreadable,
    /// lacks the label column, holds a non-numeric symptom cell or has no rows.
    pub fn from_path<P: AsRef<Path>>(path: P, label_column: &str) -> Result<Self, DiagnosisError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DiagnosisError::startup(path, "file not found"));
        }
        let file = std::fs::File::open(path).map_err(|e| DiagnosisError::startup(path, e))?;
        Self::from_reader(file, label_column, path)
    }

    /// Reads a training CSV from any reader. `origin` only labels errors.
    pub fn from_reader<R: Read>(
        reader: R,
        label_column: &str,
        origin: &Path,
    ) -> Result<Self, DiagnosisError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| DiagnosisError::startup(origin, e))?
            .clone();
        let label_idx = headers
            .iter()
            .position(|h| h == label_column)
            .ok_or_else(|| {
                DiagnosisError::startup(origin, format!("missing label column '{}'", label_column))
            })?;

        // pandas index artefacts and blank headers carry no symptom
        let feature_idx: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(i, h)| *i != label_idx && !h.is_empty() && !h.starts_with("Unnamed:"))
            .map(|(i, _)| i)
            .collect();
        let columns: Vec<String> = feature_idx.iter().map(|&i| headers[i].to_string()).collect();

        let mut flat = Vec::new();
        let mut labels = Vec::new();
        for (row_no, record) in reader.records().enumerate() {
            let record = record.map_err(|e| DiagnosisError::startup(origin, e))?;
            let label = record.get(label_idx).unwrap_or_default().trim();
            if label.is_empty() {
                warn!("Skipping training row {} with empty label", row_no + 1);
                continue;
            }
            for &i in &feature_idx {
                let cell = record.get(i).unwrap_or_default();
                flat.push(parse_indicator(cell).ok_or_else(|| {
                    DiagnosisError::startup(
                        origin,
                        format!(
                            "row {} column '{}': '{}' is not a number",
                            row_no + 1,
                            &headers[i],
                            cell
                        ),
                    )
                })?);
            }
            labels.push(label.to_string());
        }

        if labels.is_empty() {
            return Err(DiagnosisError::startup(origin, "no training rows"));
        }

        let features = Array2::from_shape_vec((labels.len(), columns.len()), flat)
            .map_err(|e| DiagnosisError::startup(origin, e))?;
        info!(
            "Loaded {} training rows with {} symptom columns from {}",
            labels.len(),
            columns.len(),
            origin.display()
        );
        Ok(Self { columns, features, labels })
    }

    /// Symptom columns in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
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

    /// Returns the feature matrix with columns reordered to match `schema`.
    pub fn feature_matrix(&self, schema: &FeatureSchema) -> Result<Array2<u8>, DiagnosisError> {
        // a repeated header resolves to its first column, as in the schema
        let mut positions: HashMap<&str, usize> = HashMap::with_capacity(self.columns.len());
        for (i, column) in self.columns.iter().enumerate() {
            positions.entry(column.as_str()).or_insert(i);
        }
        let selected = schema
            .names()
            .iter()
            .map(|name| {
                positions.get(name.as_str()).copied().ok_or_else(|| {
                    DiagnosisError::BuildError(format!(
                        "Symptom '{}' is not a training column",
                        name
                    ))
                })
            })
            .collect::<Result<Vec<usize>, _>>()?;
        Ok(self.features.select(Axis(1), &selected))
    }
}

/// Empty cells are absent; any non-zero number is present.
fn parse_indicator(cell: &str) -> Option<u8> {
    if cell.is_empty() {
        return Some(0);
    }
    cell.parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .map(|v| u8::from(v != 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
fever,cough,headache,prognosis,Unnamed: 4
1,1,0,Flu ,
0,0,1,Migraine,
1,0,0,,
0,1,1.0,Flu,
";

    fn load(text: &str) -> Result<TrainingSet, DiagnosisError> {
        TrainingSet::from_reader(text.as_bytes(), "prognosis", Path::new("memory.csv"))
    }

    #[test]
    fn test_loads_rows_and_skips_empty_labels() {
        let set = load(SAMPLE).unwrap();
        assert_eq!(set.columns(), &["fever", "cough", "headache"]);
        assert_eq!(set.labels(), &["Flu", "Migraine", "Flu"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_feature_matrix_follows_schema_order() {
        let set = load(SAMPLE).unwrap();
        let schema = FeatureSchema::new(set.columns(), Some(&["headache", "fever"][..])).unwrap();
        let matrix = set.feature_matrix(&schema).unwrap();
        assert_eq!(matrix.shape(), &[3, 2]);
        assert_eq!(matrix.row(0).to_vec(), vec![0, 1]);
        assert_eq!(matrix.row(2).to_vec(), vec![1, 0]);
    }

    #[test]
    fn test_duplicate_header_uses_first_column() {
        let set = load("fever,cough,fever,prognosis\n1,0,0,Flu\n0,1,1,Cold\n").unwrap();
        let schema = FeatureSchema::new(set.columns(), None::<&[String]>).unwrap();
        assert_eq!(schema.names(), &["fever", "cough"]);
        let matrix = set.feature_matrix(&schema).unwrap();
        assert_eq!(matrix.row(0).to_vec(), vec![1, 0]);
        assert_eq!(matrix.row(1).to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_missing_label_column() {
        let err = load("fever,cough\n1,0\n").unwrap_err();
        assert!(err.to_string().contains("missing label column 'prognosis'"));
    }

    #[test]
    fn test_non_numeric_cell_names_location() {
        let err = load("fever,prognosis\nyes,Flu\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("row 1"));
        assert!(message.contains("'fever'"));
    }

    #[test]
    fn test_no_rows_is_fatal() {
        assert!(matches!(
            load("fever,prognosis\n"),
            Err(DiagnosisError::StartupDataMissing { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = TrainingSet::from_path("/nonexistent/Training.csv", "prognosis");
        assert!(matches!(result, Err(DiagnosisError::StartupDataMissing { .. })));
    }

    #[test]
    fn test_parse_indicator() {
        assert_eq!(parse_indicator("1"), Some(1));
        assert_eq!(parse_indicator("0"), Some(0));
        assert_eq!(parse_indicator("0.0"), Some(0));
        assert_eq!(parse_indicator(""), Some(0));
        assert_eq!(parse_indicator("2"), Some(1));
        assert_eq!(parse_indicator("nan"), None);
        assert_eq!(parse_indicator("x"), None);
    }
}
