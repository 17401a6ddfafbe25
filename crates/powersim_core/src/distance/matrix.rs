//! Square, symmetric, zero-diagonal dissimilarity matrices.

use serde::{Deserialize, Serialize};

use crate::types::{Result, SimError};

/// Symmetric matrix of non-negative dissimilarities indexed by sample id.
///
/// Invariants, checked by every constructor and on deserialisation:
/// - `get(i, j) == get(j, i)`
/// - `get(i, i) == 0`
/// - every entry is finite and `>= 0`
/// - sample ids are unique
///
/// Serialised as `{ "ids": [...], "data": [[...], ...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatrixRepr", into = "MatrixRepr")]
pub struct DistanceMatrix {
    ids: Vec<String>,
    /// Row-major `n * n` values.
    values: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
struct MatrixRepr {
    ids: Vec<String>,
    data: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Builds a matrix by evaluating `f(i, j)` once for every pair `i < j`.
    ///
    /// Pairs are visited row by row (`(0, 1), (0, 2), ..., (1, 2), ...`), so a
    /// closure that consumes randomness does so in a fixed order. The lower
    /// triangle mirrors the upper one and the diagonal is zero.
    pub fn from_upper<F>(ids: Vec<String>, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        check_ids(&ids)?;
        let n = ids.len();
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = f(i, j);
                check_entry(d, i, j)?;
                values[i * n + j] = d;
                values[j * n + i] = d;
            }
        }
        Ok(Self { ids, values })
    }

    /// Builds a matrix from explicit rows, validating every invariant.
    pub fn from_rows(ids: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        check_ids(&ids)?;
        let n = ids.len();
        if rows.len() != n {
            return Err(SimError::InvalidDistance(format!(
                "{} ids but {} rows",
                n,
                rows.len()
            )));
        }

        let mut values = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(SimError::InvalidDistance(format!(
                    "row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            values.extend_from_slice(row);
        }

        for i in 0..n {
            if values[i * n + i] != 0.0 {
                return Err(SimError::InvalidDistance(format!(
                    "diagonal entry {} is {}",
                    i,
                    values[i * n + i]
                )));
            }
            for j in (i + 1)..n {
                let (upper, lower) = (values[i * n + j], values[j * n + i]);
                check_entry(upper, i, j)?;
                if upper != lower {
                    return Err(SimError::InvalidDistance(format!(
                        "asymmetric at ({}, {}): {} vs {}",
                        i, j, upper, lower
                    )));
                }
            }
        }

        Ok(Self { ids, values })
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the matrix has no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sample identifiers, in row order.
    #[inline]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Row index of `id`.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|s| s == id)
    }

    /// Entry `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let n = self.len();
        assert!(i < n && j < n, "index ({}, {}) out of range for {}", i, j, n);
        self.values[i * n + j]
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.len();
        &self.values[i * n..(i + 1) * n]
    }

    /// Rows as owned vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.len()).map(|i| self.row(i).to_vec()).collect()
    }

    /// Upper triangle (excluding the diagonal) in row-major order.
    pub fn condensed(&self) -> Vec<f64> {
        let n = self.len();
        let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                out.push(self.values[i * n + j]);
            }
        }
        out
    }
}

/// Sequential sample identifiers `s0, s1, ...`.
pub fn sample_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("s{}", i)).collect()
}

fn check_ids(ids: &[String]) -> Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(SimError::InvalidDistance(format!("duplicate id '{}'", id)));
        }
    }
    Ok(())
}

fn check_entry(d: f64, i: usize, j: usize) -> Result<()> {
    if d.is_finite() && d >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidDistance(format!(
            "entry ({}, {}) is {}",
            i, j, d
        )))
    }
}

impl TryFrom<MatrixRepr> for DistanceMatrix {
    type Error = SimError;

    fn try_from(repr: MatrixRepr) -> Result<Self> {
        Self::from_rows(repr.ids, repr.data)
    }
}

impl From<DistanceMatrix> for MatrixRepr {
    fn from(matrix: DistanceMatrix) -> Self {
        Self {
            data: matrix.to_rows(),
            ids: matrix.ids,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        sample_ids(n)
    }

    #[test]
    fn test_from_upper_mirrors() {
        let m = DistanceMatrix::from_upper(ids(3), |i, j| (i + j) as f64).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.get(0, 1), 1.0);
        assert_eq!(m.get(1, 0), 1.0);
        assert_eq!(m.get(1, 2), 3.0);
        assert_eq!(m.get(2, 1), 3.0);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 0.0);
        }
    }

    #[test]
    fn test_from_upper_visit_order() {
        let mut visited = Vec::new();
        DistanceMatrix::from_upper(ids(4), |i, j| {
            visited.push((i, j));
            1.0
        })
        .unwrap();
        assert_eq!(
            visited,
            vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]
        );
    }

    #[test]
    fn test_negative_entry_rejected() {
        let err = DistanceMatrix::from_upper(ids(2), |_, _| -0.5).unwrap_err();
        assert!(matches!(err, SimError::InvalidDistance(_)));
    }

    #[test]
    fn test_from_rows_rejects_asymmetry() {
        let rows = vec![vec![0.0, 1.0], vec![2.0, 0.0]];
        assert!(DistanceMatrix::from_rows(ids(2), rows).is_err());
    }

    #[test]
    fn test_from_rows_rejects_diagonal() {
        let rows = vec![vec![0.5, 1.0], vec![1.0, 0.0]];
        assert!(DistanceMatrix::from_rows(ids(2), rows).is_err());
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows = vec![vec![0.0, 1.0], vec![1.0]];
        assert!(DistanceMatrix::from_rows(ids(2), rows).is_err());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let dup = vec!["a".to_string(), "a".to_string()];
        assert!(DistanceMatrix::from_upper(dup, |_, _| 1.0).is_err());
    }

    #[test]
    fn test_condensed() {
        let m = DistanceMatrix::from_upper(ids(3), |i, j| (10 * i + j) as f64).unwrap();
        assert_eq!(m.condensed(), vec![1.0, 2.0, 12.0]);
    }

    #[test]
    fn test_index_of() {
        let m = DistanceMatrix::from_upper(ids(3), |_, _| 1.0).unwrap();
        assert_eq!(m.index_of("s2"), Some(2));
        assert_eq!(m.index_of("x"), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let m = DistanceMatrix::from_upper(ids(3), |i, j| 0.1 * (i + 2 * j) as f64).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"data\""));

        let back: DistanceMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_deserialise_validates() {
        let json = r#"{"ids":["a","b"],"data":[[0.0,1.0],[3.0,0.0]]}"#;
        let result: std::result::Result<DistanceMatrix, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_matrix() {
        let m = DistanceMatrix::from_upper(Vec::new(), |_, _| 1.0).unwrap();
        assert!(m.is_empty());
        assert!(m.condensed().is_empty());
    }
}
