mod common;

use pandrs_indexing::{Column, ColumnLabel, DataFrame, Error, Key, Scalar, SliceKey};

use common::{index_labels, ints, mixed_frame, multi_frame, numeric_frame, series};

fn single_column_frame() -> DataFrame {
    DataFrame::from_columns(vec![("a", Column::from(vec![1i64, 2, 3]))]).unwrap()
}

#[test]
fn test_negative_position_reads_last_row() {
    let df = numeric_frame();
    let row = df.iloc().get(-1i64).unwrap().into_series().unwrap();

    assert_eq!(row.label(), &ColumnLabel::new("30"));
    assert_eq!(row.to_scalars(), vec![Scalar::Float64(3.0), Scalar::Float64(3.5)]);
}

#[test]
fn test_one_row_slice_with_scalar_column() {
    let df = single_column_frame();

    // a sliced row key keeps the column axis: one-element Series
    let column = df.iloc().get((0i64..1, 0i64)).unwrap().into_series().unwrap();
    assert_eq!(column.to_scalars(), ints(&[1]));
    assert_eq!(column.label(), &ColumnLabel::new("a"));

    let frame = df.iloc().get((0i64..1, vec![0i64])).unwrap().into_frame().unwrap();
    assert_eq!(frame.shape(), (1, 1));

    let cell = df.iloc().get((0i64, 0i64)).unwrap();
    assert_eq!(cell.into_scalar(), Some(Scalar::Int64(1)));
}

#[test]
fn test_out_of_bounds_positions() {
    let df = numeric_frame();
    assert!(matches!(
        df.iloc().get(5i64),
        Err(Error::IndexOutOfBounds { index: 5, size: 3 })
    ));
    assert!(matches!(
        df.iloc().get(vec![0i64, 7]),
        Err(Error::IndexOutOfBounds { index: 7, .. })
    ));
    assert!(matches!(
        df.iloc().get((0i64, 5i64)),
        Err(Error::ColumnNotFound(_))
    ));
}

#[test]
fn test_slices_are_clamped() {
    let df = numeric_frame();
    let all = df.iloc().get(0i64..100).unwrap().into_frame().unwrap();
    assert_eq!(all.n_rows(), 3);

    let none = df.iloc().get(0i64..0).unwrap().into_frame().unwrap();
    assert_eq!(none.shape(), (0, 2));
}

#[test]
fn test_reverse_slice() {
    let df = numeric_frame();
    let out = df
        .iloc()
        .get(SliceKey::full().with_step(-1))
        .unwrap()
        .into_frame()
        .unwrap();
    assert_eq!(index_labels(out.index()), ints(&[30, 20, 10]));
}

#[test]
fn test_label_key_is_rejected() {
    let df = numeric_frame();
    assert!(matches!(df.iloc().get("a"), Err(Error::InvalidKeyShape(_))));
}

#[test]
fn test_mask_and_column_positions() {
    let df = numeric_frame();
    let out = df
        .iloc()
        .get((vec![true, false, true], Key::All))
        .unwrap()
        .into_frame()
        .unwrap();
    assert_eq!(index_labels(out.index()), ints(&[10, 30]));

    let b = df.iloc().get((Key::All, -1i64)).unwrap().into_series().unwrap();
    assert_eq!(b.label(), &ColumnLabel::new("b"));
}

#[test]
fn test_series_positions() {
    let s = series(vec![1, 2, 3], vec![10, 20, 30]);

    assert_eq!(s.iloc().get(0i64).unwrap().into_scalar(), Some(Scalar::Int64(1)));

    let picked = s.iloc().get(vec![2i64, 0]).unwrap().into_series().unwrap();
    assert_eq!(picked.to_scalars(), ints(&[3, 1]));
    assert_eq!(index_labels(picked.index()), ints(&[30, 10]));

    // a tuple of positions reads like a list
    let tupled = s.iloc().get((0i64, 2i64)).unwrap().into_series().unwrap();
    assert_eq!(tupled.to_scalars(), ints(&[1, 3]));
}

#[test]
fn test_mixed_row_stays_frame() {
    let df = mixed_frame();
    let out = df.iloc().get(0i64).unwrap().into_frame().unwrap();
    assert_eq!(out.shape(), (1, 2));
}

#[test]
fn test_row_of_multi_indexed_frame() {
    let df = multi_frame();
    let row = df.iloc().get(2i64).unwrap().into_series().unwrap();
    assert_eq!(row.to_scalars(), vec![Scalar::Float64(30.0), Scalar::Float64(3.0)]);
    assert_eq!(row.label(), &ColumnLabel::new("(b, 1)"));
}
