mod common;

use pandrs_indexing::{
    Column, DataFrame, DataType, Error, HostEngine, IndexingConfig, IndexingContext, Key, Scalar, Series, SliceKey,
    Value,
};

use common::{index_labels, ints, numeric_frame, series};

fn cell(df: &DataFrame, row: i64, column: &str) -> Scalar {
    df.loc().get((row, column)).unwrap().into_scalar().unwrap()
}

#[test]
fn test_set_then_get() {
    let mut df = numeric_frame();
    df.loc_mut().set((20i64, "a"), 99i64).unwrap();

    assert_eq!(cell(&df, 20, "a"), Scalar::Int64(99));
    assert_eq!(df.dtypes(), vec![DataType::Int64, DataType::Float64]);
}

#[test]
fn test_missing_label_appends_row() {
    let mut df = numeric_frame();
    df.loc_mut().set((5i64, "a"), 1i64).unwrap();

    assert_eq!(df.n_rows(), 4);
    assert_eq!(index_labels(df.index()), ints(&[10, 20, 30, 5]));
    assert_eq!(df.column("a").unwrap().to_scalars(), ints(&[1, 2, 3, 1]));
    // columns outside the key get a null
    assert_eq!(df.column("b").unwrap().get(3).unwrap(), Scalar::Null);
}

#[test]
fn test_missing_label_appends_full_row() {
    let mut df = numeric_frame();
    df.loc_mut().set(5i64, 1i64).unwrap();

    assert_eq!(cell(&df, 5, "a"), Scalar::Int64(1));
    assert_eq!(cell(&df, 5, "b"), Scalar::Float64(1.0));
}

#[test]
fn test_series_append() {
    let mut s = series(vec![1, 2, 3], vec![10, 20, 30]);
    s.loc_mut().set(40i64, 4i64).unwrap();

    assert_eq!(s.to_scalars(), ints(&[1, 2, 3, 4]));
    assert_eq!(index_labels(s.index()), ints(&[10, 20, 30, 40]));
}

#[test]
fn test_float_value_widens_int_column() {
    let mut df = numeric_frame();
    df.loc_mut().set((10i64, "a"), 0.5).unwrap();

    assert_eq!(df.column("a").unwrap().dtype(), DataType::Float64);
    assert_eq!(
        df.column("a").unwrap().to_scalars(),
        vec![Scalar::Float64(0.5), Scalar::Float64(2.0), Scalar::Float64(3.0)]
    );
}

#[test]
fn test_mask_assignment() {
    let mut df = numeric_frame();
    df.loc_mut().set((vec![true, false, true], "a"), 0i64).unwrap();
    assert_eq!(df.column("a").unwrap().to_scalars(), ints(&[0, 2, 0]));
}

#[test]
fn test_series_value_is_aligned_by_label() {
    let mut df = numeric_frame();
    let value = Series::with_index(vec![300i64, 100], vec![30i64, 10], None).unwrap();
    df.loc_mut().set((Key::All, "a"), value).unwrap();

    assert_eq!(
        df.column("a").unwrap().to_scalars(),
        vec![Scalar::Int64(100), Scalar::Null, Scalar::Int64(300)]
    );
}

#[test]
fn test_single_value_column_broadcasts_across_columns() {
    let mut df = numeric_frame();
    let value = Value::Columns(vec![Column::from(vec![7i64, 8])]);
    df.loc_mut().set(SliceKey::new(10i64, 20i64), value).unwrap();

    assert_eq!(df.column("a").unwrap().to_scalars(), ints(&[7, 8, 3]));
    assert_eq!(
        df.column("b").unwrap().to_scalars(),
        vec![Scalar::Float64(7.0), Scalar::Float64(8.0), Scalar::Float64(3.5)]
    );
}

#[test]
fn test_value_shape_mismatch() {
    let mut df = numeric_frame();
    let value = Value::Columns(vec![
        Column::from(vec![1i64]),
        Column::from(vec![2i64]),
        Column::from(vec![3i64]),
    ]);
    assert!(matches!(
        df.loc_mut().set(Key::All, value),
        Err(Error::ShapeMismatch(_))
    ));

    assert!(matches!(
        df.loc_mut().set((Key::All, "a"), vec![1i64, 2]),
        Err(Error::ShapeMismatch(_))
    ));
}

#[test]
fn test_failed_assignment_leaves_frame_untouched() {
    let mut df = numeric_frame();
    let value = Value::Columns(vec![Column::from(vec![9i64, 9, 9]), Column::from(vec![9i64, 9])]);

    assert!(df.loc_mut().set(Key::All, value).is_err());
    assert_eq!(df.column("a").unwrap().to_scalars(), ints(&[1, 2, 3]));
    assert_eq!(df.dtypes(), vec![DataType::Int64, DataType::Float64]);
}

#[test]
fn test_missing_label_in_list_is_not_appended() {
    let mut df = numeric_frame();
    assert!(matches!(
        df.loc_mut().set((vec![10i64, 99], "a"), 0i64),
        Err(Error::KeyNotFound(_))
    ));
    assert_eq!(df.n_rows(), 3);
}

#[test]
fn test_column_insert() {
    let mut df = numeric_frame();
    df.loc_mut().set((Key::All, "c"), 0i64).unwrap();
    assert_eq!(df.column("c").unwrap().to_scalars(), ints(&[0, 0, 0]));

    // a single row label fills the other rows with nulls
    df.loc_mut().set((20i64, "d"), 5i64).unwrap();
    assert_eq!(
        df.column("d").unwrap().to_scalars(),
        vec![Scalar::Null, Scalar::Int64(5), Scalar::Null]
    );
    assert_eq!(df.n_columns(), 4);
}

#[test]
fn test_column_insert_on_empty_frame() {
    let mut df = DataFrame::new();
    df.loc_mut().set((Key::All, "x"), vec![1i64, 2, 3]).unwrap();

    assert_eq!(df.shape(), (3, 1));
    assert_eq!(index_labels(df.index()), ints(&[0, 1, 2]));
}

#[test]
fn test_positional_assignment() {
    let mut df = numeric_frame();
    df.iloc_mut().set((0i64, 1i64), 9.5).unwrap();
    assert_eq!(cell(&df, 10, "b"), Scalar::Float64(9.5));

    assert!(matches!(
        df.iloc_mut().set(7i64, 0i64),
        Err(Error::IndexOutOfBounds { index: 7, .. })
    ));

    // Series values are taken in order, not by label
    let mut s = series(vec![1, 2, 3], vec![10, 20, 30]);
    s.iloc_mut()
        .set(vec![0i64, 1], Series::new(vec![7i64, 8], None).unwrap())
        .unwrap();
    assert_eq!(s.to_scalars(), ints(&[7, 8, 3]));
}

#[test]
fn test_disabled_growth() {
    let config = IndexingConfig {
        allow_row_append: false,
        allow_column_insert: false,
        ..IndexingConfig::default()
    };
    let engine = HostEngine::new(config.engine.clone());
    let ctx = IndexingContext::new(&engine, &config);
    let mut df = numeric_frame();

    assert!(matches!(
        df.loc_mut_with(ctx).set((5i64, "a"), 1i64),
        Err(Error::KeyNotFound(_))
    ));
    assert!(matches!(
        df.loc_mut_with(ctx).set((Key::All, "c"), 1i64),
        Err(Error::ColumnNotFound(_))
    ));
    assert_eq!(df.shape(), (3, 2));
}
