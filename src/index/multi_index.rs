use crate::column::{Column, DataType, Scalar};
use crate::error::{Error, Result};
use crate::index::{Index, SingleIndex};

/// Multi-level index
///
/// Stores one label column per level; row `i` of the index is the tuple formed
/// by row `i` of every level. Tuples are not required to be unique.
#[derive(Debug, Clone)]
pub struct MultiIndex {
    /// Label column of each level
    levels: Vec<Column>,

    /// Name of each level
    names: Vec<Option<String>>,
}

impl MultiIndex {
    /// Create a MultiIndex from per-level label columns
    ///
    /// # Arguments
    /// * `levels` - One column per level, all of the same length
    /// * `names` - Level names (defaults to unnamed levels)
    pub fn from_arrays(levels: Vec<Column>, names: Option<Vec<Option<String>>>) -> Result<Self> {
        if levels.is_empty() {
            return Err(Error::Index("a MultiIndex needs at least one level".into()));
        }

        let n_rows = levels[0].len();
        if let Some(bad) = levels.iter().find(|level| level.len() != n_rows) {
            return Err(Error::InconsistentRowCount {
                expected: n_rows,
                found: bad.len(),
            });
        }

        let names = match names {
            Some(names) if names.len() != levels.len() => {
                return Err(Error::LengthMismatch {
                    expected: levels.len(),
                    actual: names.len(),
                })
            }
            Some(names) => names,
            None => vec![None; levels.len()],
        };

        Ok(MultiIndex { levels, names })
    }

    /// Create a MultiIndex from label tuples, like `pandas.MultiIndex.from_tuples`
    pub fn from_tuples(tuples: Vec<Vec<Scalar>>, names: Option<Vec<Option<String>>>) -> Result<Self> {
        let n_levels = match tuples.first() {
            Some(first) => first.len(),
            None => return Err(Error::Index("empty tuple list".into())),
        };

        for (i, tuple) in tuples.iter().enumerate() {
            if tuple.len() != n_levels {
                return Err(Error::Index(format!(
                    "tuple {} has {} levels, expected {}",
                    i,
                    tuple.len(),
                    n_levels
                )));
            }
        }

        let mut levels = Vec::with_capacity(n_levels);
        for level in 0..n_levels {
            let values: Vec<Scalar> = tuples.iter().map(|t| t[level].clone()).collect();
            levels.push(Column::infer(&values)?);
        }

        Self::from_arrays(levels, names)
    }

    pub fn len(&self) -> usize {
        self.levels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Label columns of each level
    pub fn levels(&self) -> &[Column] {
        &self.levels
    }

    pub fn names(&self) -> &[Option<String>] {
        &self.names
    }

    pub fn dtypes(&self) -> Vec<DataType> {
        self.levels.iter().map(Column::data_type).collect()
    }

    /// Tuple at `pos`
    pub fn get_tuple(&self, pos: usize) -> Result<Vec<Scalar>> {
        self.levels.iter().map(|level| level.get(pos)).collect()
    }

    /// Labels of a single level as an index
    pub fn get_level_values(&self, level: usize) -> Result<SingleIndex> {
        let values = self.levels.get(level).ok_or_else(|| {
            Error::Index(format!(
                "level {} out of range for {} levels",
                level,
                self.levels.len()
            ))
        })?;
        Ok(SingleIndex::with_name(values.clone(), self.names[level].clone()))
    }

    /// Rows at `positions`
    pub fn take(&self, positions: &[usize]) -> Self {
        MultiIndex {
            levels: self.levels.iter().map(|level| level.take(positions)).collect(),
            names: self.names.clone(),
        }
    }

    /// Drop the `n` leftmost levels
    ///
    /// A single remaining level collapses into a single-level index named after
    /// that level.
    pub fn drop_levels(&self, n: usize) -> Result<Index> {
        if n >= self.levels.len() {
            return Err(Error::Index(format!(
                "cannot drop {} of {} levels",
                n,
                self.levels.len()
            )));
        }

        let levels = self.levels[n..].to_vec();
        let names = self.names[n..].to_vec();
        if levels.len() == 1 {
            let name = names.into_iter().next().flatten();
            let values = levels.into_iter().next().ok_or_else(|| Error::Index("no level left".into()))?;
            return Ok(Index::Single(SingleIndex::with_name(values, name)));
        }
        Ok(Index::Multi(MultiIndex { levels, names }))
    }

    /// Cast every level to the matching entry of `dtypes`
    pub fn cast_levels(&self, dtypes: &[DataType]) -> Result<Self> {
        if dtypes.len() != self.levels.len() {
            return Err(Error::LengthMismatch {
                expected: self.levels.len(),
                actual: dtypes.len(),
            });
        }
        let levels = self
            .levels
            .iter()
            .zip(dtypes)
            .map(|(level, &dtype)| Column::from_scalars(dtype, &level.to_scalars()))
            .collect::<Result<Vec<_>>>()?;
        Ok(MultiIndex {
            levels,
            names: self.names.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MultiIndex {
        MultiIndex::from_tuples(
            vec![
                vec!["a".into(), 1.into()],
                vec!["a".into(), 2.into()],
                vec!["b".into(), 1.into()],
            ],
            Some(vec![Some("letter".into()), Some("number".into())]),
        )
        .unwrap()
    }

    #[test]
    fn test_from_tuples_builds_levels() {
        let idx = sample();
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.n_levels(), 2);
        assert_eq!(idx.dtypes(), vec![DataType::Utf8, DataType::Int64]);
        assert_eq!(idx.get_tuple(2).unwrap(), vec![Scalar::from("b"), Scalar::Int64(1)]);
    }

    #[test]
    fn test_drop_levels_collapses_to_single() {
        let dropped = sample().drop_levels(1).unwrap();
        match dropped {
            Index::Single(single) => {
                assert_eq!(single.name(), Some("number"));
                assert_eq!(single.len(), 3);
            }
            Index::Multi(_) => panic!("expected a single-level index"),
        }
    }

    #[test]
    fn test_ragged_tuples_are_rejected() {
        let result = MultiIndex::from_tuples(vec![vec!["a".into()], vec!["b".into(), 1.into()]], None);
        assert!(result.is_err());
    }
}
