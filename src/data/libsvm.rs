//! LibSVM format dataset implementation
//!
//! Supports loading datasets in the libsvm text format:
//! label index:value index:value ...
//!
//! Example:
//! +1 1:0.5 3:1.2 7:0.8
//! -1 2:0.3 5:2.1
//!
//! Indices are 1-based and may be sparse; missing entries expand to 0.0
//! in the dense feature vectors this crate works with.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::core::{Dataset, QboostError, Result, Sample};

/// Dataset implementation for LibSVM format files
#[derive(Debug, Clone)]
pub struct LibsvmDataset {
    samples: Vec<Sample>,
    dimensions: usize,
}

impl LibsvmDataset {
    /// Load a dataset from a LibSVM format file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(QboostError::IoError)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a dataset from a reader (for testing and flexibility)
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut parsed: Vec<(f64, Vec<(usize, f64)>)> = Vec::new();
        let mut max_dimension = 0;

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(QboostError::IoError)?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (label, pairs) = Self::parse_line(line)
                .map_err(|e| QboostError::ParseError(format!("line {}: {e}", line_num + 1)))?;
            if let Some(max_idx) = pairs.iter().map(|&(i, _)| i).max() {
                max_dimension = max_dimension.max(max_idx + 1);
            }
            parsed.push((label, pairs));
        }

        if parsed.is_empty() {
            return Err(QboostError::EmptyDataset);
        }

        // Expand sparse pairs into dense vectors over the full dimension
        let samples = parsed
            .into_iter()
            .map(|(label, pairs)| {
                let mut features = vec![0.0; max_dimension];
                for (index, value) in pairs {
                    features[index] = value;
                }
                Sample::new(features, label)
            })
            .collect();

        Ok(Self {
            samples,
            dimensions: max_dimension,
        })
    }

    /// Parse a single libsvm line into (label, 0-based index/value pairs)
    fn parse_line(line: &str) -> std::result::Result<(f64, Vec<(usize, f64)>), String> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            return Err("empty line".to_string());
        }

        let label = parts[0]
            .parse::<f64>()
            .map_err(|_| format!("invalid label: {}", parts[0]))?;
        let label = if label == 1.0 || label == -1.0 {
            label
        } else if label > 0.0 {
            1.0
        } else {
            -1.0
        };

        let mut pairs = Vec::with_capacity(parts.len() - 1);
        for feature_str in &parts[1..] {
            let (index_str, value_str) = feature_str
                .split_once(':')
                .ok_or_else(|| format!("invalid feature format: {feature_str}"))?;

            let index = index_str
                .parse::<usize>()
                .map_err(|_| format!("invalid feature index: {index_str}"))?;
            if index == 0 {
                return Err(format!("feature index must be positive: {index}"));
            }
            let value = value_str
                .parse::<f64>()
                .map_err(|_| format!("invalid feature value: {value_str}"))?;

            // libsvm uses 1-based indexing
            pairs.push((index - 1, value));
        }

        Ok((label, pairs))
    }
}

impl Dataset for LibsvmDataset {
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
    fn test_basic_libsvm_loading() {
        let data = "+1 1:0.5 2:1.2\n-1 1:-0.3 2:-2.1\n";
        let dataset = LibsvmDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dim(), 2);
        assert_eq!(dataset.get_sample(0).features, vec![0.5, 1.2]);
        assert_eq!(dataset.get_labels(), vec![1.0, -1.0]);
    }

    #[test]
    fn test_sparse_indices_expand_to_dense() {
        let data = "+1 1:1.0 4:2.0\n-1 2:3.0\n";
        let dataset = LibsvmDataset::from_reader(Cursor::new(data)).unwrap();

        assert_eq!(dataset.dim(), 4);
        assert_eq!(dataset.get_sample(0).features, vec![1.0, 0.0, 0.0, 2.0]);
        assert_eq!(dataset.get_sample(1).features, vec![0.0, 3.0, 0.0, 0.0]);
    }

    #[test]
    fn test_comments_skipped() {
        let data = "# header comment\n+1 1:1.0\n\n-1 1:-1.0\n";
        let dataset = LibsvmDataset::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_zero_index_rejected() {
        let data = "+1 0:1.0\n";
        assert!(matches!(
            LibsvmDataset::from_reader(Cursor::new(data)),
            Err(QboostError::ParseError(_))
        ));
    }

    #[test]
    fn test_malformed_pair_rejected() {
        let data = "+1 1-0.5\n";
        assert!(matches!(
            LibsvmDataset::from_reader(Cursor::new(data)),
            Err(QboostError::ParseError(_))
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(
            LibsvmDataset::from_reader(Cursor::new("")),
            Err(QboostError::EmptyDataset)
        ));
    }
}
