//! Named-column tables of raw records.
//!
//! A [`Table`] is what the preprocessing plan consumes: every column is either
//! numeric or categorical, and every column has the same number of rows.
//! Missing values are `None`.

use crate::error::{Error, Result};
use crate::preprocessing::PreprocessingError;
use csv::{ReaderBuilder, Trim};
use ndarray::Array2;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Tokens read as a missing value in CSV input.
pub const MISSING_TOKENS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null"];

/// A single column of raw values.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

impl Column {
    /// Build a categorical column from string slices with no missing values.
    pub fn categorical<S: AsRef<str>>(values: &[S]) -> Self {
        Column::Categorical(values.iter().map(|v| Some(v.as_ref().to_string())).collect())
    }

    /// Build a numeric column with no missing values.
    pub fn numeric(values: &[f64]) -> Self {
        Column::Numeric(values.iter().copied().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Column::Numeric(_) => "numeric",
            Column::Categorical(_) => "categorical",
        }
    }
}

/// An ordered collection of equally long named columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, builder style.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        column: Column,
    ) -> std::result::Result<Self, PreprocessingError> {
        self.push_column(name, column)?;
        Ok(self)
    }

    /// Append a column.
    ///
    /// # Errors
    /// - `InvalidParameter` if a column with this name already exists.
    /// - `InvalidShape` if the column length differs from the table's row count.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> std::result::Result<(), PreprocessingError> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "duplicate column '{name}'"
            )));
        }
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} rows", self.n_rows()),
                got: format!("{} rows in column '{}'", column.len(), name),
            });
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
    }

    fn require(&self, name: &str) -> std::result::Result<&Column, PreprocessingError> {
        self.column(name)
            .ok_or_else(|| PreprocessingError::MissingColumn(name.to_string()))
    }

    /// Split the table into every column except `target`, and the target values.
    ///
    /// # Errors
    /// - `MissingColumn` if `target` is absent.
    /// - `ColumnKind` if `target` is not numeric.
    /// - `MissingValues` if any target value is missing.
    pub fn split_target(
        &self,
        target: &str,
    ) -> std::result::Result<(Table, Vec<f64>), PreprocessingError> {
        let values = match self.require(target)? {
            Column::Numeric(values) => values,
            other => {
                return Err(PreprocessingError::ColumnKind {
                    column: target.to_string(),
                    expected: "numeric",
                    got: other.kind(),
                })
            }
        };

        let targets = values
            .iter()
            .enumerate()
            .map(|(row, value)| {
                value.ok_or_else(|| {
                    PreprocessingError::MissingValues(format!(
                        "target column '{target}' is missing at row {row}"
                    ))
                })
            })
            .collect::<std::result::Result<Vec<f64>, _>>()?;

        let mut features = Table::new();
        for (name, column) in self.names.iter().zip(&self.columns) {
            if name != target {
                features.names.push(name.clone());
                features.columns.push(column.clone());
            }
        }
        Ok((features, targets))
    }

    /// Gather numeric columns into a row-major matrix, missing values as NaN.
    pub fn numeric_matrix<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> std::result::Result<Array2<f64>, PreprocessingError> {
        let rows = self.n_rows();
        let mut out = Array2::<f64>::from_elem((rows, names.len()), f64::NAN);
        for (j, name) in names.iter().enumerate() {
            let name = name.as_ref();
            match self.require(name)? {
                Column::Numeric(values) => {
                    for (i, v) in values.iter().enumerate() {
                        if let Some(v) = v {
                            out[[i, j]] = *v;
                        }
                    }
                }
                other => {
                    return Err(PreprocessingError::ColumnKind {
                        column: name.to_string(),
                        expected: "numeric",
                        got: other.kind(),
                    })
                }
            }
        }
        Ok(out)
    }

    /// Gather categorical columns into a row-major matrix.
    pub fn categorical_matrix<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> std::result::Result<Array2<Option<String>>, PreprocessingError> {
        let rows = self.n_rows();
        let mut out = Array2::<Option<String>>::default((rows, names.len()));
        for (j, name) in names.iter().enumerate() {
            let name = name.as_ref();
            match self.require(name)? {
                Column::Categorical(values) => {
                    for (i, v) in values.iter().enumerate() {
                        out[[i, j]] = v.clone();
                    }
                }
                other => {
                    return Err(PreprocessingError::ColumnKind {
                        column: name.to_string(),
                        expected: "categorical",
                        got: other.kind(),
                    })
                }
            }
        }
        Ok(out)
    }

    /// Read a CSV file with a header row.
    ///
    /// Columns listed in `numeric_columns` are parsed as `f64`; every other
    /// column is categorical. Header names are kept exactly as written.
    pub fn from_csv_path<P: AsRef<Path>, S: AsRef<str>>(
        path: P,
        numeric_columns: &[S],
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        read_csv(std::io::BufReader::new(file), path, numeric_columns)
    }

    /// Read CSV from any reader; see [`Table::from_csv_path`].
    pub fn from_csv_reader<R: Read, S: AsRef<str>>(
        reader: R,
        numeric_columns: &[S],
    ) -> Result<Self> {
        read_csv(reader, Path::new("<reader>"), numeric_columns)
    }
}

fn is_missing(field: &str) -> bool {
    MISSING_TOKENS.contains(&field)
}

fn read_csv<R: Read, S: AsRef<str>>(
    reader: R,
    origin: &Path,
    numeric_columns: &[S],
) -> Result<Table> {
    let csv_err = |source: csv::Error| Error::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Fields)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut seen = HashSet::new();
    for h in &headers {
        if !seen.insert(h.as_str()) {
            return Err(Error::Config(format!(
                "duplicate header '{}' in {}",
                h,
                origin.display()
            )));
        }
    }

    let numeric: HashSet<&str> = numeric_columns.iter().map(AsRef::as_ref).collect();
    let mut columns: Vec<Column> = headers
        .iter()
        .map(|h| {
            if numeric.contains(h.as_str()) {
                Column::Numeric(Vec::new())
            } else {
                Column::Categorical(Vec::new())
            }
        })
        .collect();

    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_err)?;
        for (j, column) in columns.iter_mut().enumerate() {
            let field = record.get(j).unwrap_or("");
            match column {
                Column::Numeric(values) => {
                    if is_missing(field) {
                        values.push(None);
                    } else {
                        let parsed = field.parse::<f64>().map_err(|_| Error::Parse {
                            column: headers[j].clone(),
                            row,
                            value: field.to_string(),
                        })?;
                        values.push(Some(parsed));
                    }
                }
                Column::Categorical(values) => {
                    values.push((!is_missing(field)).then(|| field.to_string()));
                }
            }
        }
    }

    Ok(Table {
        names: headers,
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
gender,race/ethnicity,reading score,math score
female,group B,72,70
male,,NA,55
female,group C,90,
";

    #[test]
    fn test_csv_kinds_and_missing_values() {
        let table =
            Table::from_csv_reader(SAMPLE.as_bytes(), &["reading score", "math score"]).unwrap();

        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_columns(), 4);
        assert_eq!(
            table.column("race/ethnicity"),
            Some(&Column::Categorical(vec![
                Some("group B".to_string()),
                None,
                Some("group C".to_string())
            ]))
        );
        assert_eq!(
            table.column("reading score"),
            Some(&Column::Numeric(vec![Some(72.0), None, Some(90.0)]))
        );
    }

    #[test]
    fn test_csv_bad_number_reports_location() {
        let data = "reading score\n72\nseventy\n";
        let err = Table::from_csv_reader(data.as_bytes(), &["reading score"]).unwrap_err();
        match err {
            Error::Parse { column, row, value } => {
                assert_eq!(column, "reading score");
                assert_eq!(row, 1);
                assert_eq!(value, "seventy");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_csv_missing_file_is_io_error() {
        let err = Table::from_csv_path("/nonexistent/train.csv", &["x"]).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_split_target() {
        let table = Table::new()
            .with_column("gender", Column::categorical(&["female", "male"]))
            .unwrap()
            .with_column("math score", Column::numeric(&[70.0, 55.0]))
            .unwrap();

        let (features, target) = table.split_target("math score").unwrap();
        assert_eq!(features.column_names(), &["gender".to_string()]);
        assert_eq!(target, vec![70.0, 55.0]);
    }

    #[test]
    fn test_split_target_rejects_missing_target_value() {
        let table = Table::from_csv_reader(SAMPLE.as_bytes(), &["reading score", "math score"])
            .unwrap();
        let err = table.split_target("math score").unwrap_err();
        assert!(matches!(err, PreprocessingError::MissingValues(_)));
    }

    #[test]
    fn test_split_target_absent_column() {
        let table = Table::new()
            .with_column("gender", Column::categorical(&["female"]))
            .unwrap();
        assert!(matches!(
            table.split_target("math score"),
            Err(PreprocessingError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_push_column_length_mismatch() {
        let table = Table::new()
            .with_column("a", Column::numeric(&[1.0, 2.0]))
            .unwrap();
        let err = table
            .with_column("b", Column::numeric(&[1.0]))
            .unwrap_err();
        assert!(matches!(err, PreprocessingError::InvalidShape { .. }));
    }

    #[test]
    fn test_numeric_matrix_uses_nan_for_missing() {
        let table = Table::new()
            .with_column("a", Column::Numeric(vec![Some(1.0), None]))
            .unwrap();
        let m = table.numeric_matrix(&["a"]).unwrap();
        assert_eq!(m[[0, 0]], 1.0);
        assert!(m[[1, 0]].is_nan());
    }

    #[test]
    fn test_matrix_rejects_wrong_kind() {
        let table = Table::new()
            .with_column("gender", Column::categorical(&["female"]))
            .unwrap();
        assert!(matches!(
            table.numeric_matrix(&["gender"]),
            Err(PreprocessingError::ColumnKind { .. })
        ));
    }
}
