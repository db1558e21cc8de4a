//! `.loc` / `.iloc` for DataFrame

use std::ops::{Deref, DerefMut};

use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::index::{Index, SingleIndex};
use crate::indexing::key::{self, Key, KeyKind};
use crate::indexing::{
    columns, label, multi_label, mutate, row_major, rows, shape, IndexingContext, Selection, Selector, Value,
};
use crate::table::{ColumnLabel, Table};

/// Label-based indexer of a DataFrame
#[derive(Debug)]
pub struct DataFrameLocIndexer<'c, F> {
    frame: F,
    ctx: IndexingContext<'c>,
}

/// Position-based indexer of a DataFrame
#[derive(Debug)]
pub struct DataFrameIlocIndexer<'c, F> {
    frame: F,
    ctx: IndexingContext<'c>,
}

impl DataFrame {
    /// Label-based reads
    pub fn loc(&self) -> DataFrameLocIndexer<'static, &DataFrame> {
        self.loc_with(IndexingContext::global())
    }

    pub fn loc_with<'c>(&self, ctx: IndexingContext<'c>) -> DataFrameLocIndexer<'c, &DataFrame> {
        DataFrameLocIndexer { frame: self, ctx }
    }

    /// Label-based reads and writes
    pub fn loc_mut(&mut self) -> DataFrameLocIndexer<'static, &mut DataFrame> {
        self.loc_mut_with(IndexingContext::global())
    }

    pub fn loc_mut_with<'c>(&mut self, ctx: IndexingContext<'c>) -> DataFrameLocIndexer<'c, &mut DataFrame> {
        DataFrameLocIndexer { frame: self, ctx }
    }

    /// Position-based reads
    pub fn iloc(&self) -> DataFrameIlocIndexer<'static, &DataFrame> {
        self.iloc_with(IndexingContext::global())
    }

    pub fn iloc_with<'c>(&self, ctx: IndexingContext<'c>) -> DataFrameIlocIndexer<'c, &DataFrame> {
        DataFrameIlocIndexer { frame: self, ctx }
    }

    /// Position-based reads and writes
    pub fn iloc_mut(&mut self) -> DataFrameIlocIndexer<'static, &mut DataFrame> {
        self.iloc_mut_with(IndexingContext::global())
    }

    pub fn iloc_mut_with<'c>(&mut self, ctx: IndexingContext<'c>) -> DataFrameIlocIndexer<'c, &mut DataFrame> {
        DataFrameIlocIndexer { frame: self, ctx }
    }
}

/// Rows of `table` addressed by a label row key, and the key's shape class
///
/// On a single-level index a scalar label selects every row carrying it. On a
/// multi-level index, keys that leave some levels unmatched shape like lists.
fn select_rows(ctx: IndexingContext<'_>, table: &Table, row: &Key) -> Result<(Table, KeyKind)> {
    if table.index().is_multi() {
        let selected = row_major::select(ctx, table, row)?;
        let depth = table.index().n_levels();
        let kind = match row {
            Key::Scalar(_) => KeyKind::ListLike,
            Key::Tuple(_) => match row.scalar_parts() {
                Some(parts) if parts.len() == depth => KeyKind::Scalar,
                Some(_) => KeyKind::ListLike,
                None => row.kind(),
            },
            other => other.kind(),
        };
        return Ok((selected, kind));
    }

    let selector = match row {
        Key::Scalar(value) => {
            let labels = Index::Single(SingleIndex::from_labels(std::slice::from_ref(value))?);
            let found = multi_label::resolve_many(ctx.engine, table.index(), &labels)?;
            Selector::PositionList(multi_label::require_all(found, &labels)?)
        }
        other => label::resolve(ctx, table.index().as_single()?, other)?,
    };
    let selected = rows::select(ctx.engine, table, &selector)?;
    if selected.n_rows() == 0 && !matches!(row, Key::List(values) if values.is_empty()) {
        log::warn!("row key {:?} matched no rows", row);
    }
    Ok((selected, row.kind()))
}

fn is_missing(err: &Error) -> bool {
    matches!(err, Error::KeyNotFound(_) | Error::Cast { .. })
}

fn positional_value(value: Value) -> Value {
    match value {
        Value::Series(series) => Value::Column(series.values().clone()),
        other => other,
    }
}

impl<'c, F: Deref<Target = DataFrame>> DataFrameLocIndexer<'c, F> {
    /// `df.loc[key]`
    ///
    /// `key` is a row key, or a `(row, column)` tuple. Row resolution failures
    /// are reported as [`Error::KeyNotFound`]; absent columns as
    /// [`Error::ColumnNotFound`].
    pub fn get(&self, key: impl Into<Key>) -> Result<Selection> {
        let key = key.into();
        log::debug!("DataFrame.loc[{:?}]", key);
        let table = self.frame.as_table();

        let (row, col) = key::split_label_key(key, table)?;
        let narrowed = columns::by_label(table, &col)?;
        let (selected, row_kind) =
            select_rows(self.ctx, &narrowed, &row).map_err(|err| err.into_key_not_found(&row))?;
        shape::shape(self.ctx.engine, selected, row_kind, col.kind())
    }
}

impl<'c, F: DerefMut<Target = DataFrame>> DataFrameLocIndexer<'c, F> {
    /// `df.loc[key] = value`
    ///
    /// An absent scalar row label with a scalar value appends a row
    /// (`allow_row_append`); an absent scalar column label inserts a column
    /// (`allow_column_insert`).
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        let ctx = self.ctx;
        let table = self.frame.table_mut();
        log::debug!("DataFrame.loc[{:?}] = ...", key);

        if table.index().is_multi() {
            return Err(Error::UnsupportedOperation(
                "label assignment on a multi-level index".into(),
            ));
        }

        let (row, col) = key::split_label_key(key, table)?;
        let targets = match columns::label_positions(table, &col) {
            Ok(positions) => positions,
            Err(Error::ColumnNotFound(missing)) => {
                return match &col {
                    Key::Scalar(name) if ctx.config.allow_column_insert => {
                        let label = ColumnLabel::new(columns::label_text(name));
                        mutate::insert_column(ctx, table, label, &row, &value)
                    }
                    _ => Err(Error::ColumnNotFound(missing)),
                };
            }
            Err(err) => return Err(err),
        };

        let index = table.index().as_single()?;
        match label::resolve(ctx, index, &row) {
            Ok(selector) => mutate::write(ctx, table, &targets, &selector, &value).map_err(|err| match err {
                Error::IndexOutOfBounds { .. } => err.into_key_not_found(&row),
                other => other,
            }),
            Err(err) => match (&row, &value) {
                (Key::Scalar(label), Value::Scalar(scalar)) if ctx.config.allow_row_append && is_missing(&err) => {
                    mutate::append_row(ctx, table, label, scalar, &targets)
                }
                _ => Err(err.into_key_not_found(&row)),
            },
        }
    }
}

impl<'c, F: Deref<Target = DataFrame>> DataFrameIlocIndexer<'c, F> {
    /// `df.iloc[key]`
    pub fn get(&self, key: impl Into<Key>) -> Result<Selection> {
        let key = key.into();
        log::debug!("DataFrame.iloc[{:?}]", key);

        let (row, col) = key::split_position_key(key)?;
        let narrowed = columns::by_position(self.frame.as_table(), &col)?;
        let selector = rows::iloc_selector(&row, narrowed.n_rows())?;
        let selected = rows::select(self.ctx.engine, &narrowed, &selector)?;
        shape::shape(self.ctx.engine, selected, row.kind(), col.kind())
    }
}

impl<'c, F: DerefMut<Target = DataFrame>> DataFrameIlocIndexer<'c, F> {
    /// `df.iloc[key] = value`; Series values are taken positionally
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<()> {
        let value = positional_value(value.into());
        let ctx = self.ctx;
        let table = self.frame.table_mut();

        let (row, col) = key::split_position_key(key.into())?;
        let targets = columns::index_positions(table, &col)?;
        let selector = rows::iloc_selector(&row, table.n_rows())?;
        mutate::write(ctx, table, &targets, &selector, &value)
    }
}
