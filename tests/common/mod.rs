// Shared fixtures for the indexing tests

#![allow(dead_code)]

use pandrs_indexing::{Column, DataFrame, Index, MultiIndex, Scalar, Series};

/// `a: [1, 2, 3]`, `b: [1.5, 2.5, 3.5]` over the index `[10, 20, 30]`
pub fn numeric_frame() -> DataFrame {
    DataFrame::with_index(
        vec![
            ("a", Column::from(vec![1i64, 2, 3])),
            ("b", Column::from(vec![1.5f64, 2.5, 3.5])),
        ],
        vec![10i64, 20, 30],
    )
    .unwrap()
}

/// Numeric and string columns over a string index
pub fn mixed_frame() -> DataFrame {
    DataFrame::with_index(
        vec![
            ("x", Column::from(vec![1i64, 2, 3])),
            ("name", Column::from(vec!["one", "two", "three"])),
        ],
        vec!["r1", "r2", "r3"],
    )
    .unwrap()
}

/// Two-level `(letter, number)` index: `(a,1) (a,2) (b,1) (b,2)`
pub fn multi_index() -> MultiIndex {
    MultiIndex::from_tuples(
        vec![
            vec!["a".into(), 1i64.into()],
            vec!["a".into(), 2i64.into()],
            vec!["b".into(), 1i64.into()],
            vec!["b".into(), 2i64.into()],
        ],
        Some(vec![Some("letter".to_string()), Some("number".to_string())]),
    )
    .unwrap()
}

pub fn multi_frame() -> DataFrame {
    DataFrame::with_index(
        vec![
            ("v", Column::from(vec![10i64, 20, 30, 40])),
            ("w", Column::from(vec![1.0f64, 2.0, 3.0, 4.0])),
        ],
        Index::Multi(multi_index()),
    )
    .unwrap()
}

pub fn series(values: Vec<i64>, index: Vec<i64>) -> Series {
    Series::with_index(values, index, Some("s")).unwrap()
}

pub fn ints(values: &[i64]) -> Vec<Scalar> {
    values.iter().map(|&v| Scalar::Int64(v)).collect()
}

pub fn index_labels(index: &Index) -> Vec<Scalar> {
    (0..index.len()).map(|pos| index.label_at(pos).unwrap()).collect()
}
