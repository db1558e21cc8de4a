//! `.loc` / `.iloc` for Series

use std::ops::{Deref, DerefMut};

use crate::error::{Error, Result};
use crate::index::Index;
use crate::indexing::key::Key;
use crate::indexing::{label, mutate, row_major, rows, IndexingContext, Selection, Selector, Value};
use crate::series::Series;

/// Label-based indexer of a Series
#[derive(Debug)]
pub struct SeriesLocIndexer<'c, S> {
    series: S,
    ctx: IndexingContext<'c>,
}

/// Position-based indexer of a Series
#[derive(Debug)]
pub struct SeriesIlocIndexer<'c, S> {
    series: S,
    ctx: IndexingContext<'c>,
}

impl Series {
    /// Label-based reads
    pub fn loc(&self) -> SeriesLocIndexer<'static, &Series> {
        self.loc_with(IndexingContext::global())
    }

    pub fn loc_with<'c>(&self, ctx: IndexingContext<'c>) -> SeriesLocIndexer<'c, &Series> {
        SeriesLocIndexer { series: self, ctx }
    }

    /// Label-based reads and writes
    pub fn loc_mut(&mut self) -> SeriesLocIndexer<'static, &mut Series> {
        self.loc_mut_with(IndexingContext::global())
    }

    pub fn loc_mut_with<'c>(&mut self, ctx: IndexingContext<'c>) -> SeriesLocIndexer<'c, &mut Series> {
        SeriesLocIndexer { series: self, ctx }
    }

    /// Position-based reads
    pub fn iloc(&self) -> SeriesIlocIndexer<'static, &Series> {
        self.iloc_with(IndexingContext::global())
    }

    pub fn iloc_with<'c>(&self, ctx: IndexingContext<'c>) -> SeriesIlocIndexer<'c, &Series> {
        SeriesIlocIndexer { series: self, ctx }
    }

    /// Position-based reads and writes
    pub fn iloc_mut(&mut self) -> SeriesIlocIndexer<'static, &mut Series> {
        self.iloc_mut_with(IndexingContext::global())
    }

    pub fn iloc_mut_with<'c>(&mut self, ctx: IndexingContext<'c>) -> SeriesIlocIndexer<'c, &mut Series> {
        SeriesIlocIndexer { series: self, ctx }
    }
}

/// A single position reads a scalar; anything else a Series
fn take(ctx: IndexingContext<'_>, series: &Series, selector: &Selector) -> Result<Selection> {
    if let Selector::SingleScalarPosition(pos) = selector {
        let pos = rows::normalize_position(*pos, series.len())?;
        return Ok(Selection::Scalar(series.get(pos)?));
    }
    let table = rows::select(ctx.engine, series.as_table(), selector)?;
    Ok(Selection::Series(Series::from_table(table)?))
}

/// Whether a failed resolution means the label is absent
fn is_missing(err: &Error) -> bool {
    matches!(err, Error::KeyNotFound(_) | Error::Cast { .. })
}

impl<'c, S: Deref<Target = Series>> SeriesLocIndexer<'c, S> {
    /// `series.loc[key]`
    ///
    /// Any failure to resolve `key` is reported as [`Error::KeyNotFound`].
    pub fn get(&self, key: impl Into<Key>) -> Result<Selection> {
        let key = key.into();
        log::debug!("Series.loc[{:?}]", key);
        self.lookup(&key).map_err(|err| err.into_key_not_found(&key))
    }

    fn lookup(&self, key: &Key) -> Result<Selection> {
        let series: &Series = &self.series;
        let table = series.as_table();

        if table.index().is_multi() {
            let selected = Series::from_table(row_major::select(self.ctx, table, key)?)?;
            let full_depth = key
                .scalar_parts()
                .map_or(false, |parts| parts.len() == table.index().n_levels());
            if full_depth {
                return Ok(Selection::Scalar(selected.get(0)?));
            }
            return Ok(Selection::Series(selected));
        }

        let selector = label::resolve(self.ctx, table.index().as_single()?, key)?;
        take(self.ctx, series, &selector)
    }
}

impl<'c, S: DerefMut<Target = Series>> SeriesLocIndexer<'c, S> {
    /// `series.loc[key] = value`
    ///
    /// A scalar label missing from the index appends a new row when
    /// `allow_row_append` is set.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        let ctx = self.ctx;
        let table = self.series.table_mut();

        let index = match table.index() {
            Index::Single(index) => index,
            Index::Multi(_) => {
                return Err(Error::UnsupportedOperation(
                    "label assignment on a multi-level index".into(),
                ))
            }
        };

        match label::resolve(ctx, index, &key) {
            Ok(selector) => mutate::write(ctx, table, &[0], &selector, &value).map_err(|err| match err {
                Error::IndexOutOfBounds { .. } => err.into_key_not_found(&key),
                other => other,
            }),
            Err(err) => match (&key, &value) {
                (Key::Scalar(label), Value::Scalar(scalar)) if ctx.config.allow_row_append && is_missing(&err) => {
                    mutate::append_row(ctx, table, label, scalar, &[0])
                }
                _ => Err(err.into_key_not_found(&key)),
            },
        }
    }
}

/// An all-scalar tuple addresses several positions
fn positional_key(key: Key) -> Key {
    match key {
        Key::Tuple(parts) if parts.iter().all(Key::is_scalar) => Key::List(
            parts
                .into_iter()
                .filter_map(|part| match part {
                    Key::Scalar(value) => Some(value),
                    _ => None,
                })
                .collect(),
        ),
        other => other,
    }
}

impl<'c, S: Deref<Target = Series>> SeriesIlocIndexer<'c, S> {
    /// `series.iloc[key]`
    pub fn get(&self, key: impl Into<Key>) -> Result<Selection> {
        let key = positional_key(key.into());
        log::debug!("Series.iloc[{:?}]", key);
        let selector = rows::iloc_selector(&key, self.series.len())?;
        take(self.ctx, &self.series, &selector)
    }
}

impl<'c, S: DerefMut<Target = Series>> SeriesIlocIndexer<'c, S> {
    /// `series.iloc[key] = value`; Series values are taken positionally
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<()> {
        let key = positional_key(key.into());
        let value = match value.into() {
            Value::Series(series) => Value::Column(series.values().clone()),
            other => other,
        };
        let selector = rows::iloc_selector(&key, self.series.len())?;
        mutate::write(self.ctx, self.series.table_mut(), &[0], &selector, &value)
    }
}
