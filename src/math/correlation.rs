//! Pairwise Pearson correlation over the columns of a table.
use crate::HeatmapError;
use comfy_table::{Cell, Table};
use nalgebra::DMatrix;
use polars::prelude::*;
use serde::Serialize;

/// Pearson correlation coefficient between two equally long samples.
///
/// Returns NaN when either sample has zero variance or fewer than two
/// observations. The result is clamped to `[-1, 1]` to absorb rounding.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x[..n].iter().zip(&y[..n]) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let divisor = (sxx * syy).sqrt();
    if divisor == 0.0 {
        return f64::NAN;
    }
    (sxy / divisor).clamp(-1.0, 1.0)
}

/// A square correlation matrix labelled by column name on both axes.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: DMatrix<f64>,
}

#[derive(Serialize)]
struct MatrixExport<'a> {
    columns: &'a [String],
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Number of columns correlated, i.e. the side of the matrix.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.len() && col < self.len() {
            Some(self.values[(row, col)])
        } else {
            None
        }
    }

    pub fn get_by_name(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        self.get(i, j)
    }

    /// The matrix as a DataFrame with a leading `column` label column,
    /// matching the row/column indexing of a pandas-style correlation frame.
    pub fn to_dataframe(&self) -> Result<DataFrame, HeatmapError> {
        let mut series = Vec::with_capacity(self.len() + 1);
        series.push(Series::new("column", self.labels.clone()));
        for (j, label) in self.labels.iter().enumerate() {
            let col: Vec<f64> = self.values.column(j).iter().copied().collect();
            series.push(Series::new(label, col));
        }
        Ok(DataFrame::new(series)?)
    }

    /// Prints the matrix to the console as a table with two decimals.
    pub fn summary(&self) {
        println!("Correlation Matrix");
        println!("========================================");
        println!("{}", self.to_table());
    }

    fn to_table(&self) -> Table {
        let mut table = Table::new();
        let mut header = vec![Cell::new("")];
        header.extend(self.labels.iter().map(Cell::new));
        table.set_header(header);
        for (i, label) in self.labels.iter().enumerate() {
            let mut row = vec![Cell::new(label)];
            row.extend((0..self.len()).map(|j| Cell::new(format!("{:.2}", self.values[(i, j)]))));
            table.add_row(row);
        }
        table
    }

    /// Exports the matrix as a Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        md.push_str("| |");
        for label in &self.labels {
            md.push_str(&format!(" {} |", label));
        }
        md.push('\n');
        md.push_str("|---|");
        for _ in &self.labels {
            md.push_str("---:|");
        }
        md.push('\n');
        for (i, label) in self.labels.iter().enumerate() {
            md.push_str(&format!("| {} |", label));
            for j in 0..self.len() {
                md.push_str(&format!(" {:.2} |", self.values[(i, j)]));
            }
            md.push('\n');
        }
        md
    }

    /// Exports the matrix as JSON: `{"columns": [...], "values": [[...]]}`.
    /// Undefined coefficients are written as `null`.
    pub fn to_json(&self) -> Result<String, HeatmapError> {
        let values = (0..self.len())
            .map(|i| {
                (0..self.len())
                    .map(|j| {
                        let v = self.values[(i, j)];
                        if v.is_nan() {
                            None
                        } else {
                            Some(v)
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(serde_json::to_string_pretty(&MatrixExport {
            columns: &self.labels,
            values,
        })?)
    }
}

/// Reads a column of the table as `f64` values. Nulls become NaN.
fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>, HeatmapError> {
    let series = df
        .column(name)
        .map_err(|_| HeatmapError::ColumnNotFound(name.to_string()))?;
    let values = series
        .cast(&DataType::Float64)?
        .f64()?
        .into_iter()
        .map(|opt| opt.unwrap_or(f64::NAN))
        .collect();
    Ok(values)
}

/// Computes the Pearson correlation matrix over every column of `df`.
///
/// Only the upper triangle is computed; the lower triangle is mirrored from
/// it so the result is exactly symmetric. The diagonal is 1.0.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix, HeatmapError> {
    let labels: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let columns = labels
        .iter()
        .map(|name| column_as_f64(df, name))
        .collect::<Result<Vec<_>, _>>()?;

    let n = labels.len();
    let mut values = DMatrix::from_element(n, n, 1.0);
    for i in 0..n {
        for j in (i + 1)..n {
            let r = pearson(&columns[i], &columns[j]);
            values[(i, j)] = r;
            values[(j, i)] = r;
        }
    }

    Ok(CorrelationMatrix { labels, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pearson_perfect_relationships() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let up = [2.0, 4.0, 6.0, 8.0, 10.0];
        let down = [10.0, 8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&x, &up) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &down) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_known_value() {
        // Hand-computed: sxy = 8, sxx = 10, syy = 10.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        let expected = 8.0 / (10.0f64 * 10.0).sqrt();
        assert!((expected - 0.8).abs() < 1e-12);
        assert!((pearson(&x, &y) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_zero_variance_is_nan() {
        let x = [3.0, 3.0, 3.0];
        let y = [1.0, 2.0, 3.0];
        assert!(pearson(&x, &y).is_nan());
        assert!(pearson(&[1.0], &[2.0]).is_nan());
    }

    #[test]
    fn test_matrix_zero_variance_column() {
        let df = df!(
            "a" => &[1i64, 2, 3, 4],
            "flat" => &[7i64, 7, 7, 7],
            "b" => &[4i64, 3, 2, 1]
        )
        .unwrap();
        let m = correlation_matrix(&df).unwrap();
        assert_eq!(m.len(), 3);
        assert!(m.get_by_name("a", "flat").unwrap().is_nan());
        assert!(m.get_by_name("flat", "b").unwrap().is_nan());
        assert_eq!(m.get_by_name("flat", "flat"), Some(1.0));
        assert!((m.get_by_name("a", "b").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let df = crate::synthesis::generate_engagement_table(42).unwrap();
        let m = correlation_matrix(&df).unwrap();
        assert_eq!(m.len(), 6);
        for i in 0..m.len() {
            assert_eq!(m.get(i, i), Some(1.0));
            for j in 0..m.len() {
                let v = m.get(i, j).unwrap();
                assert_eq!(v.to_bits(), m.get(j, i).unwrap().to_bits());
                assert!((-1.0..=1.0).contains(&v), "({}, {}) = {}", i, j, v);
            }
        }
        assert_eq!(m.get(6, 0), None);
    }

    #[test]
    fn test_injected_correlations_are_positive() {
        use crate::synthesis::{PURCHASES, TIME_ON_SITE, WEBSITE_VISITS};
        let df = crate::synthesis::generate_engagement_table(42).unwrap();
        let m = correlation_matrix(&df).unwrap();
        assert!(m.get_by_name(WEBSITE_VISITS, TIME_ON_SITE).unwrap() > 0.0);
        assert!(m.get_by_name(WEBSITE_VISITS, PURCHASES).unwrap() > 0.0);
        assert!(m.get_by_name(TIME_ON_SITE, PURCHASES).unwrap() > 0.0);
    }

    #[test]
    fn test_column_as_f64_missing_column() {
        let df = df!("a" => &[1i64, 2, 3]).unwrap();
        match column_as_f64(&df, "Refunds") {
            Err(HeatmapError::ColumnNotFound(name)) => assert_eq!(name, "Refunds"),
            other => panic!("expected ColumnNotFound, got {:?}", other),
        }
        assert_eq!(column_as_f64(&df, "a").unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_exports() {
        let df = df!(
            "x" => &[1i64, 2, 3],
            "y" => &[3i64, 2, 1],
            "z" => &[5i64, 5, 5]
        )
        .unwrap();
        let m = correlation_matrix(&df).unwrap();

        let md = m.to_markdown();
        assert!(md.starts_with("| | x | y | z |"));
        assert!(md.contains("| x | 1.00 | -1.00 | NaN |"));

        let json: serde_json::Value = serde_json::from_str(&m.to_json().unwrap()).unwrap();
        assert_eq!(json["columns"][1], "y");
        assert_eq!(json["values"][0][1], -1.0);
        assert!(json["values"][0][2].is_null());

        let frame = m.to_dataframe().unwrap();
        assert_eq!(frame.shape(), (3, 4));
    }
}
