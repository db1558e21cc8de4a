//! Host-memory implementation of the engine contract

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::column::{Column, DataType, Scalar};
use crate::config::EngineConfig;
use crate::engine::join::hash_join;
use crate::engine::{ColumnarEngine, JoinHow};
use crate::error::{Error, Result};
use crate::index::SingleIndex;
use crate::indexing::slice_positions;
use crate::table::{ColumnLabel, Table};

/// Engine executing every primitive on host memory
///
/// Per-column work is spread over the rayon pool once a table has at least
/// `parallel_threshold` rows.
#[derive(Debug, Clone, Default)]
pub struct HostEngine {
    config: EngineConfig,
}

impl HostEngine {
    pub fn new(config: EngineConfig) -> Self {
        HostEngine { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply `f` to every column, in parallel for large tables
    fn map_columns<F>(&self, table: &Table, f: F) -> Vec<Column>
    where
        F: Fn(&Column) -> Column + Send + Sync,
    {
        if table.n_rows() >= self.config.parallel_threshold && table.n_columns() > 1 {
            table.columns().par_iter().map(f).collect()
        } else {
            table.columns().iter().map(f).collect()
        }
    }

    /// Rows at positions that are already known to be in range
    fn take_rows(&self, table: &Table, positions: &[usize]) -> Result<Table> {
        let columns = self.map_columns(table, |col| col.take(positions));
        let index = table.index().take(positions);
        Table::from_parts(table.labels().to_vec(), columns, index)
    }
}

fn check_positions(positions: &[usize], size: usize) -> Result<()> {
    match positions.iter().find(|&&p| p >= size) {
        Some(&bad) => Err(Error::IndexOutOfBounds {
            index: bad as i64,
            size,
        }),
        None => Ok(()),
    }
}

/// Ascending order with nulls last
fn null_last_order(a: &Scalar, b: &Scalar) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

impl ColumnarEngine for HostEngine {
    fn slice(&self, table: &Table, start: i64, stop: i64, step: i64) -> Result<Table> {
        if step == 0 {
            return Err(Error::InvalidKeyShape("slice step cannot be zero".into()));
        }
        log::trace!("slice [{}:{}:{}] over {} rows", start, stop, step, table.n_rows());

        let positions = slice_positions(start, stop, step, table.n_rows());
        self.take_rows(table, &positions)
    }

    fn gather(&self, table: &Table, positions: &[usize]) -> Result<Table> {
        log::trace!("gather {} positions over {} rows", positions.len(), table.n_rows());
        check_positions(positions, table.n_rows())?;
        self.take_rows(table, positions)
    }

    fn boolean_mask(&self, table: &Table, mask: &[bool]) -> Result<Table> {
        if mask.len() != table.n_rows() {
            return Err(Error::ShapeMismatch(format!(
                "boolean mask of length {} does not match {} rows",
                mask.len(),
                table.n_rows()
            )));
        }
        let positions: Vec<usize> = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &keep)| if keep { Some(i) } else { None })
            .collect();
        self.take_rows(table, &positions)
    }

    fn join(&self, left: &Table, right: &Table, how: JoinHow) -> Result<Table> {
        let joined = hash_join(left, right, how)?;
        log::trace!("{:?} join produced {} rows", how, joined.left.len());

        let mut labels = left.labels().to_vec();
        labels.extend(right.labels().iter().cloned());

        let mut columns = self.map_columns(left, |col| col.take(&joined.left));
        columns.extend(self.map_columns(right, |col| col.take_optional(&joined.right)));

        Table::from_parts(labels, columns, left.index().take(&joined.left))
    }

    fn sort_values(&self, table: &Table, by: &ColumnLabel) -> Result<Table> {
        let column = table
            .column_by_label(by)
            .ok_or_else(|| Error::ColumnNotFound(by.to_string()))?;
        let keys = column.to_scalars();

        let mut order: Vec<usize> = (0..keys.len()).collect();
        // `sort_by` is stable, which keeps duplicate matches in probe order
        order.sort_by(|&a, &b| null_last_order(&keys[a], &keys[b]));
        self.take_rows(table, &order)
    }

    fn find_label_range(
        &self,
        index: &SingleIndex,
        start: Option<&Scalar>,
        stop: Option<&Scalar>,
    ) -> Result<(usize, usize)> {
        let dtype = index.dtype();
        // Int64/Float64 bounds are compared as they are; casting 15.5 to Int64 fails
        let is_number = |t: DataType| matches!(t, DataType::Int64 | DataType::Float64);
        let bound = |s: &Scalar| match s.data_type() {
            Some(bound_type) if is_number(dtype) && is_number(bound_type) => Ok(s.clone()),
            _ => s.cast(dtype),
        };
        let start = start.map(bound).transpose()?;
        let stop = stop.map(bound).transpose()?;
        let labels = index.labels();
        let less = |a: &Scalar, b: &Scalar| a.compare(b) == Some(Ordering::Less);

        let (begin, end) = if index.is_monotonic_increasing() {
            let begin = start.as_ref().map_or(0, |s| labels.partition_point(|v| less(v, s)));
            let end = stop
                .as_ref()
                .map_or(labels.len(), |s| labels.partition_point(|v| !less(s, v)));
            (begin, end)
        } else if index.is_monotonic_decreasing() {
            let begin = start.as_ref().map_or(0, |s| labels.partition_point(|v| less(s, v)));
            let end = stop
                .as_ref()
                .map_or(labels.len(), |s| labels.partition_point(|v| !less(v, s)));
            (begin, end)
        } else {
            let begin = match &start {
                Some(s) => self.find_first_value(index, s, false)?,
                None => 0,
            };
            let end = match &stop {
                Some(s) => self.find_last_value(index, s, false)? + 1,
                None => labels.len(),
            };
            (begin, end)
        };

        Ok((begin, end.max(begin)))
    }

    fn find_first_value(&self, index: &SingleIndex, label: &Scalar, closest: bool) -> Result<usize> {
        let label = label.cast(index.dtype())?;
        let labels = index.labels();
        if let Some(pos) = labels.iter().position(|v| !v.is_null() && *v == label) {
            return Ok(pos);
        }
        if closest && index.is_monotonic_increasing() {
            let pos = labels.partition_point(|v| v.compare(&label) == Some(Ordering::Less));
            if pos < labels.len() {
                return Ok(pos);
            }
        }
        Err(Error::KeyNotFound(label.to_string()))
    }

    fn find_last_value(&self, index: &SingleIndex, label: &Scalar, closest: bool) -> Result<usize> {
        let label = label.cast(index.dtype())?;
        let labels = index.labels();
        if let Some(pos) = labels.iter().rposition(|v| !v.is_null() && *v == label) {
            return Ok(pos);
        }
        if closest && index.is_monotonic_increasing() {
            let pos = labels.partition_point(|v| v.compare(&label) != Some(Ordering::Greater));
            if pos > 0 {
                return Ok(pos - 1);
            }
        }
        Err(Error::KeyNotFound(label.to_string()))
    }

    fn cast(&self, column: &Column, dtype: DataType) -> Result<Column> {
        if column.data_type() == dtype {
            return Ok(column.clone());
        }
        log::trace!("cast {:?} column to {:?}", column.data_type(), dtype);
        Column::from_scalars(dtype, &column.to_scalars())
    }

    fn concat_columns(&self, columns: &[Column]) -> Result<Column> {
        let dtype = match columns.first() {
            Some(first) => first.data_type(),
            None => return Err(Error::ShapeMismatch("nothing to concatenate".into())),
        };
        if let Some(other) = columns.iter().find(|c| c.data_type() != dtype) {
            return Err(Error::Cast {
                from: other.data_type(),
                to: dtype,
            });
        }
        let values: Vec<Scalar> = columns.iter().flat_map(Column::to_scalars).collect();
        Column::from_scalars(dtype, &values)
    }

    fn scatter(&self, column: &Column, positions: &[usize], values: &Column) -> Result<Column> {
        check_positions(positions, column.len())?;
        if values.len() != positions.len() && values.len() != 1 {
            return Err(Error::ShapeMismatch(format!(
                "cannot assign {} values to {} positions",
                values.len(),
                positions.len()
            )));
        }

        let dtype = column.data_type();
        let incoming = self.cast(values, dtype)?.to_scalars();
        let mut data = column.to_scalars();
        for (i, &pos) in positions.iter().enumerate() {
            let value = if incoming.len() == 1 { &incoming[0] } else { &incoming[i] };
            data[pos] = value.clone();
        }
        Column::from_scalars(dtype, &data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Index;

    fn table(index: Vec<i64>, values: Vec<i64>) -> Table {
        Table::from_parts(
            vec!["v".into()],
            vec![Column::from(values)],
            Index::from(index),
        )
        .unwrap()
    }

    #[test]
    fn test_slice_negative_step() {
        let engine = HostEngine::default();
        let t = table(vec![0, 1, 2, 3], vec![10, 11, 12, 13]);
        let out = engine.slice(&t, 3, -1, -2).unwrap();
        assert_eq!(
            out.columns()[0].to_scalars(),
            vec![Scalar::Int64(13), Scalar::Int64(11)]
        );
    }

    #[test]
    fn test_label_range_inclusive_stop() {
        let engine = HostEngine::default();
        let idx = SingleIndex::new(vec![10i64, 20, 30]);
        let range = engine
            .find_label_range(&idx, Some(&Scalar::Int64(10)), Some(&Scalar::Int64(20)))
            .unwrap();
        assert_eq!(range, (0, 2));

        let empty = engine
            .find_label_range(&idx, Some(&Scalar::Int64(30)), Some(&Scalar::Int64(10)))
            .unwrap();
        assert_eq!(empty.0, empty.1);
    }

    #[test]
    fn test_label_range_float_bounds_on_int_index() {
        let engine = HostEngine::default();
        let idx = SingleIndex::new(vec![10i64, 20, 30]);
        let range = engine
            .find_label_range(&idx, Some(&Scalar::Float64(15.5)), Some(&Scalar::Float64(25.0)))
            .unwrap();
        assert_eq!(range, (1, 2));
    }

    #[test]
    fn test_label_range_decreasing_index() {
        let engine = HostEngine::default();
        let idx = SingleIndex::new(vec![30i64, 20, 10]);
        let range = engine
            .find_label_range(&idx, Some(&Scalar::Int64(25)), Some(&Scalar::Int64(10)))
            .unwrap();
        assert_eq!(range, (1, 3));
    }

    #[test]
    fn test_sort_values_is_stable() {
        let engine = HostEngine::default();
        let t = table(vec![0, 1, 2, 3], vec![1, 0, 1, 0]);
        let sorted = engine.sort_values(&t, &ColumnLabel::new("v")).unwrap();
        match sorted.index() {
            Index::Single(idx) => assert_eq!(
                idx.labels(),
                vec![Scalar::Int64(1), Scalar::Int64(3), Scalar::Int64(0), Scalar::Int64(2)]
            ),
            Index::Multi(_) => panic!("unexpected multi index"),
        }
    }

    #[test]
    fn test_left_join_keeps_unmatched_rows() {
        let engine = HostEngine::default();
        let left = table(vec![1, 9], vec![100, 900]);
        let right = Table::from_parts(
            vec!["r".into()],
            vec![Column::from(vec![5i64, 6])],
            Index::from(vec![1i64, 1]),
        )
        .unwrap();
        let joined = engine.join(&left, &right, JoinHow::Left).unwrap();
        assert_eq!(joined.n_rows(), 3);
        assert_eq!(joined.columns()[1].null_count(), 1);

        let inner = engine.join(&left, &right, JoinHow::Inner).unwrap();
        assert_eq!(inner.n_rows(), 2);
    }

    #[test]
    fn test_gather_out_of_bounds() {
        let engine = HostEngine::default();
        let t = table(vec![0, 1], vec![1, 2]);
        assert!(matches!(
            engine.gather(&t, &[0, 2]),
            Err(Error::IndexOutOfBounds { index: 2, size: 2 })
        ));
    }

    #[test]
    fn test_scatter_broadcasts_single_value() {
        let engine = HostEngine::default();
        let col = Column::from(vec![1i64, 2, 3]);
        let out = engine.scatter(&col, &[0, 2], &Column::from(vec![9i64])).unwrap();
        assert_eq!(
            out.to_scalars(),
            vec![Scalar::Int64(9), Scalar::Int64(2), Scalar::Int64(9)]
        );
    }
}
