//! CSV format dataset implementation
//!
//! Supports loading datasets from CSV files where:
//! - The last column is the label
//! - All other columns are features
//! - First row can be headers (automatically detected)

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::{Dataset, QboostError, Result, Sample};

/// Dataset implementation for CSV format files
#[derive(Debug, Clone)]
pub struct CsvDataset {
    samples: Vec<Sample>,
    dimensions: usize,
}

impl CsvDataset {
    /// Load a dataset from a CSV file
    ///
    /// The last column is assumed to be the label.
    /// Headers are automatically detected if present.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(QboostError::IoError)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dataset from a reader
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut samples: Vec<Sample> = Vec::new();
        let mut dimensions = 0;
        let mut first_data_line = true;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(QboostError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if first_data_line {
                first_data_line = false;
                if Self::is_header_line(line) {
                    continue;
                }
            }

            let sample = Self::parse_data_line(line)
                .map_err(|e| QboostError::ParseError(format!("line {}: {e}", line_num + 1)))?;

            if dimensions == 0 {
                dimensions = sample.dim();
            } else if sample.dim() != dimensions {
                return Err(QboostError::DimensionMismatch {
                    expected: dimensions,
                    actual: sample.dim(),
                });
            }
            samples.push(sample);
        }

        if samples.is_empty() {
            return Err(QboostError::EmptyDataset);
        }

        Ok(Self {
            samples,
            dimensions,
        })
    }

    /// Check if a line appears to be a header: most non-label fields fail
    /// to parse as numbers
    fn is_header_line(line: &str) -> bool {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 2 {
            return false;
        }
        let non_numeric = fields
            .iter()
            .take(fields.len() - 1)
            .filter(|field| field.trim().parse::<f64>().is_err())
            .count();
        non_numeric > fields.len() / 2
    }

    /// Parse a CSV data line into a dense sample
    fn parse_data_line(line: &str) -> std::result::Result<Sample, String> {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim()).collect();
        if fields.len() < 2 {
            return Err(format!("too few fields: {line}"));
        }

        let label_str = fields[fields.len() - 1];
        let label = label_str
            .parse::<f64>()
            .map_err(|_| format!("invalid label: {label_str}"))?;
        // Remap arbitrary numeric labels onto the bipolar convention
        let label = if label == 1.0 || label == -1.0 {
            label
        } else if label > 0.0 {
            1.0
        } else {
            -1.0
        };

        let mut features = Vec::with_capacity(fields.len() - 1);
        for (idx, field) in fields.iter().take(fields.len() - 1).enumerate() {
            let value = field
                .parse::<f64>()
                .map_err(|_| format!("invalid feature value at column {}: {field}", idx + 1))?;
            if !value.is_finite() {
                return Err(format!("non-finite feature value at column {}", idx + 1));
            }
            features.push(value);
        }

        Ok(Sample::new(features, label))
    }
}

impl Dataset for CsvDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn dim(&self) -> usize {
        self.dimensions
    }

    fn get_sample(&self, i: usize) -> Sample {
        self.samples[i].clone()
    }

    fn get_labels(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_basic_csv_loading() {
        let data = "1.0,2.0,1\n-1.0,-2.0,-1\n0.5,1.5,1\n";
        let dataset = CsvDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.dim(), 2);
        assert_eq!(dataset.get_sample(0).features, vec![1.0, 2.0]);
        assert_eq!(dataset.get_labels(), vec![1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_header_detection() {
        let data = "feature1,feature2,label\n1.0,2.0,1\n-1.0,-2.0,-1\n";
        let dataset = CsvDataset::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let data = "# comment\n\n1.0,2.0,1\n\n# another\n-1.0,-2.0,-1\n";
        let dataset = CsvDataset::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_label_remapping() {
        // 0/1 labels map onto -1/+1
        let data = "1.0,1\n-1.0,0\n";
        let dataset = CsvDataset::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(dataset.get_labels(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let data = "1.0,2.0,1\n1.0,1\n";
        assert!(matches!(
            CsvDataset::from_reader(Cursor::new(data)),
            Err(QboostError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            CsvDataset::from_reader(Cursor::new("")),
            Err(QboostError::EmptyDataset)
        ));
        assert!(matches!(
            CsvDataset::from_reader(Cursor::new("# only comments\n")),
            Err(QboostError::EmptyDataset)
        ));
    }

    #[test]
    fn test_invalid_value_rejected() {
        let data = "1.0,abc,1\n";
        assert!(matches!(
            CsvDataset::from_reader(Cursor::new(data)),
            Err(QboostError::ParseError(_))
        ));
    }
}
