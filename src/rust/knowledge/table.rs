use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{info, warn};

/// Canonical name of the join column after normalization
pub const DISEASE_COLUMN: &str = "Disease";

/// One disease-keyed reference table held in memory.
///
/// The disease column is located once at load time, whichever of `Disease`
/// or `disease` the file uses; lookups only ever go through that index.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    headers: Vec<String>,
    disease_column: Option<usize>,
    rows: Vec<StringRecord>,
}

impl ReferenceTable {
    /// A table with no columns and no rows; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, csv::Error> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        // the lowercase spelling wins when a file carries both
        let disease_column = headers
            .iter()
            .position(|h| h == "disease")
            .or_else(|| headers.iter().position(|h| h == DISEASE_COLUMN));
        if let Some(idx) = disease_column {
            headers[idx] = DISEASE_COLUMN.to_string();
        }

        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            headers,
            disease_column,
            rows,
        })
    }

    /// Loads `path`, substituting an empty table when the file is missing or
    /// unreadable. `name` only appears in the log.
    pub fn load_or_empty<P: AsRef<Path>>(path: P, name: &str) -> Self {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(table) => {
                if !table.has_disease_column() {
                    warn!(
                        "Table '{}' at {} has no disease column; its lookups will use defaults",
                        name,
                        path.display()
                    );
                }
                info!("Loaded table '{}' with {} rows", name, table.len());
                table
            }
            Err(e) => {
                warn!(
                    "Could not load table '{}' from {}: {}; using an empty table",
                    name,
                    path.display(),
                    e
                );
                Self::empty()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_disease_column(&self) -> bool {
        self.disease_column.is_some()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Position of a column, matched case-insensitively
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Rows whose disease cell equals `disease`, ignoring case and
    /// surrounding whitespace, in file order.
    pub fn matching<'a>(&'a self, disease: &str) -> impl Iterator<Item = &'a StringRecord> + 'a {
        let key = disease.trim().to_lowercase();
        let column = self.disease_column;
        self.rows.iter().filter(move |row| match column {
            Some(idx) => row
                .get(idx)
                .is_some_and(|cell| cell.trim().to_lowercase() == key),
            None => false,
        })
    }

    /// Non-missing values of `column` across the rows matching `disease`
    pub fn values<'a>(&'a self, disease: &str, column: &str) -> Vec<&'a str> {
        let Some(idx) = self.column(column) else {
            return Vec::new();
        };
        self.matching(disease)
            .filter_map(|row| row.get(idx))
            .filter(|cell| !is_missing(cell))
            .collect()
    }
}

/// Cells pandas would read as NaN, plus explicit placeholders
pub fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty()
        || ["nan", "na", "none", "null", "n/a", "not available"]
            .iter()
            .any(|m| cell.eq_ignore_ascii_case(m))
}
