mod common;

use chrono::NaiveDate;
use pandrs_indexing::{
    ColumnLabel, DataFrame, DataType, Error, HostEngine, Index, IndexingConfig, IndexingContext, Key, Scalar,
    Series, SliceKey,
};

use common::{index_labels, ints, mixed_frame, numeric_frame, series};

#[test]
fn test_label_slice_includes_both_endpoints() {
    let df = numeric_frame();
    let out = df.loc().get(SliceKey::new(10i64, 20i64)).unwrap().into_frame().unwrap();

    assert_eq!(out.shape(), (2, 2));
    assert_eq!(index_labels(out.index()), ints(&[10, 20]));
}

#[test]
fn test_reversed_label_slice_is_empty() {
    let df = numeric_frame();
    let out = df.loc().get(SliceKey::new(30i64, 10i64)).unwrap().into_frame().unwrap();
    assert_eq!(out.n_rows(), 0);
    assert_eq!(out.n_columns(), 2);
}

#[test]
fn test_open_ended_label_slices() {
    let df = numeric_frame();
    let tail = df.loc().get(SliceKey::from_start(20i64)).unwrap().into_frame().unwrap();
    assert_eq!(index_labels(tail.index()), ints(&[20, 30]));

    let head = df.loc().get(SliceKey::until(20i64)).unwrap().into_frame().unwrap();
    assert_eq!(index_labels(head.index()), ints(&[10, 20]));
}

#[test]
fn test_scalar_row_downcasts_to_series() {
    let df = numeric_frame();
    let row = df.loc().get(20i64).unwrap().into_series().unwrap();

    // both columns are widened to float
    assert_eq!(row.dtype(), DataType::Float64);
    assert_eq!(row.to_scalars(), vec![Scalar::Float64(2.0), Scalar::Float64(2.5)]);
    assert_eq!(row.label(), &ColumnLabel::new("20"));
    assert_eq!(
        index_labels(row.index()),
        vec![Scalar::from("a"), Scalar::from("b")]
    );
}

#[test]
fn test_mixed_row_stays_a_frame() {
    let df = mixed_frame();
    let out = df.loc().get("r2").unwrap().into_frame().unwrap();
    assert_eq!(out.shape(), (1, 2));
}

#[test]
fn test_loc_and_iloc_cell_agree() {
    let df = numeric_frame();
    let by_label = df.loc().get((20i64, "a")).unwrap().into_scalar().unwrap();
    let by_position = df.iloc().get((1i64, 0i64)).unwrap().into_scalar().unwrap();

    assert_eq!(by_label, Scalar::Int64(2));
    assert_eq!(by_label, by_position);
}

#[test]
fn test_missing_row_label() {
    let df = numeric_frame();
    assert!(matches!(df.loc().get(99i64), Err(Error::KeyNotFound(_))));
    assert!(matches!(
        df.loc().get(vec![10i64, 99]),
        Err(Error::KeyNotFound(_))
    ));
}

#[test]
fn test_uncastable_label_reports_missing_key() {
    let df = numeric_frame();
    assert!(matches!(df.loc().get("not a number"), Err(Error::KeyNotFound(_))));
}

#[test]
fn test_mask_of_wrong_length() {
    let df = numeric_frame();
    assert!(matches!(
        df.loc().get(vec![true, false]),
        Err(Error::ShapeMismatch(_))
    ));
}

#[test]
fn test_mask_selects_rows() {
    let df = numeric_frame();
    let out = df.loc().get(vec![true, false, true]).unwrap().into_frame().unwrap();
    assert_eq!(index_labels(out.index()), ints(&[10, 30]));
}

#[test]
fn test_duplicate_labels_in_request_order() {
    let df = numeric_frame();
    let out = df.loc().get(vec![20i64, 20, 10]).unwrap().into_frame().unwrap();

    assert_eq!(index_labels(out.index()), ints(&[20, 20, 10]));
    assert_eq!(out.column("a").unwrap().to_scalars(), ints(&[2, 2, 1]));
}

#[test]
fn test_scalar_on_duplicate_index_returns_every_match() {
    let df = DataFrame::with_index(
        vec![("a", pandrs_indexing::Column::from(vec![10i64, 20, 30]))],
        vec![1i64, 2, 1],
    )
    .unwrap();
    let out = df.loc().get(1i64).unwrap().into_frame().unwrap();
    assert_eq!(out.column("a").unwrap().to_scalars(), ints(&[10, 30]));

    // a Series returns the first match only
    let s = df.column("a").unwrap();
    assert_eq!(s.loc().get(1i64).unwrap().into_scalar(), Some(Scalar::Int64(10)));
}

#[test]
fn test_column_selection() {
    let df = numeric_frame();

    let b = df.loc().get((Key::All, "b")).unwrap().into_series().unwrap();
    assert_eq!(b.label(), &ColumnLabel::new("b"));
    assert_eq!(index_labels(b.index()), ints(&[10, 20, 30]));

    let swapped = df.loc().get((Key::All, vec!["b", "a"])).unwrap().into_frame().unwrap();
    assert_eq!(
        swapped.column_labels(),
        &[ColumnLabel::new("b"), ColumnLabel::new("a")]
    );

    assert!(matches!(
        df.loc().get((Key::All, "zz")),
        Err(Error::ColumnNotFound(_))
    ));
}

#[test]
fn test_mask_row_with_scalar_column() {
    let df = numeric_frame();
    let out = df
        .loc()
        .get((vec![false, true, false], "a"))
        .unwrap()
        .into_series()
        .unwrap();
    assert_eq!(out.to_scalars(), ints(&[2]));
    assert_eq!(index_labels(out.index()), ints(&[20]));
}

#[test]
fn test_empty_label_list_keeps_columns() {
    let df = numeric_frame();
    let out = df.loc().get(Vec::<i64>::new()).unwrap().into_frame().unwrap();
    assert_eq!(out.shape(), (0, 2));
    assert_eq!(out.dtypes(), vec![DataType::Int64, DataType::Float64]);
}

#[test]
fn test_integer_key_on_string_index_is_positional() {
    let s = Series::with_index(vec![1i64, 2, 3], vec!["x", "y", "z"], Some("s")).unwrap();
    assert_eq!(s.loc().get(1i64).unwrap().into_scalar(), Some(Scalar::Int64(2)));
    assert_eq!(s.loc().get(-1i64).unwrap().into_scalar(), Some(Scalar::Int64(3)));
    assert!(matches!(s.loc().get(5i64), Err(Error::KeyNotFound(_))));

    let config = IndexingConfig {
        integer_position_fallback: false,
        ..IndexingConfig::default()
    };
    let engine = HostEngine::new(config.engine.clone());
    let ctx = IndexingContext::new(&engine, &config);
    assert!(matches!(s.loc_with(ctx).get(1i64), Err(Error::KeyNotFound(_))));
}

#[test]
fn test_series_label_slice_and_mask() {
    let s = Series::with_index(vec![1i64, 2, 3], vec!["x", "y", "z"], None).unwrap();

    let sliced = s.loc().get(SliceKey::new("x", "y")).unwrap().into_series().unwrap();
    assert_eq!(sliced.to_scalars(), ints(&[1, 2]));

    let masked = s.loc().get(vec![true, false, true]).unwrap().into_series().unwrap();
    assert_eq!(masked.to_scalars(), ints(&[1, 3]));
}

#[test]
fn test_series_reverse_label_slice() {
    let s = series(vec![1, 2, 3], vec![10, 20, 30]);
    let reversed = s
        .loc()
        .get(SliceKey::full().with_step(-1))
        .unwrap()
        .into_series()
        .unwrap();
    assert_eq!(reversed.to_scalars(), ints(&[3, 2, 1]));

    let bounded = s
        .loc()
        .get(SliceKey::new(30i64, 20i64).with_step(-1))
        .unwrap()
        .into_series()
        .unwrap();
    assert_eq!(bounded.to_scalars(), ints(&[3, 2]));
}

#[test]
fn test_unsorted_datetime_index_slice() {
    let day = |d: u32| NaiveDate::from_ymd_opt(2020, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
    let s = Series::with_index(vec![3i64, 1, 2], vec![day(3), day(1), day(2)], None).unwrap();

    let out = s
        .loc()
        .get(SliceKey::new("2020-01-01", "2020-01-02"))
        .unwrap()
        .into_series()
        .unwrap();
    assert_eq!(out.to_scalars(), ints(&[1, 2]));
}

#[test]
fn test_labels_key_from_index() {
    let df = numeric_frame();
    let out = df
        .loc()
        .get(Index::from(vec![30i64, 10]))
        .unwrap()
        .into_frame()
        .unwrap();
    assert_eq!(index_labels(out.index()), ints(&[30, 10]));
}

#[test]
fn test_float_slice_bounds_on_int_index() {
    let df = numeric_frame();
    let out = df
        .loc()
        .get(SliceKey::new(15.5f64, 25.0f64))
        .unwrap()
        .into_frame()
        .unwrap();
    assert_eq!(index_labels(out.index()), ints(&[20]));
}

#[test]
fn test_pair_key_over_multi_level_columns() {
    let df = DataFrame::with_index(
        vec![
            (ColumnLabel::from(["a", "x"]), pandrs_indexing::Column::from(vec![1i64, 2])),
            (ColumnLabel::from(["a", "y"]), pandrs_indexing::Column::from(vec![3i64, 4])),
            (ColumnLabel::from(["b", "x"]), pandrs_indexing::Column::from(vec![5i64, 6])),
        ],
        vec!["r1", "r2"],
    )
    .unwrap();

    let cell = df.loc().get(("r2", ("b", "x"))).unwrap();
    assert_eq!(cell.into_scalar(), Some(Scalar::Int64(6)));

    let row = df.loc().get(("r1", "a")).unwrap().into_series().unwrap();
    assert_eq!(row.to_scalars(), ints(&[1, 3]));

    // the pair is never retried as a whole-row label
    assert!(matches!(
        df.loc().get(("r1", "zz")),
        Err(Error::ColumnNotFound(_))
    ));
}
