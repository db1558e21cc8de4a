use std::collections::HashMap;

use crate::column::Scalar;
use crate::engine::JoinHow;
use crate::error::{Error, Result};
use crate::table::Table;

/// Row pairs produced by an index join
pub(crate) struct JoinPositions {
    pub left: Vec<usize>,
    pub right: Vec<Option<usize>>,
}

/// Hash join on index keys
///
/// The hash table is built over the left keys and probed with the right rows
/// in order, so matches come out grouped by right row; unmatched left rows of a
/// left join follow in left order. Null keys never match.
pub(crate) fn hash_join(left: &Table, right: &Table, how: JoinHow) -> Result<JoinPositions> {
    let left_levels = left.index().n_levels();
    let right_levels = right.index().n_levels();
    if left_levels != right_levels {
        return Err(Error::Index(format!(
            "cannot join a {}-level index with a {}-level index",
            left_levels, right_levels
        )));
    }

    let mut build: HashMap<Vec<Scalar>, Vec<usize>> = HashMap::with_capacity(left.n_rows());
    for pos in 0..left.n_rows() {
        let key = left.index().key_at(pos)?;
        if key.iter().any(Scalar::is_null) {
            continue;
        }
        build.entry(key).or_default().push(pos);
    }

    let mut matched = vec![false; left.n_rows()];
    let mut positions = JoinPositions {
        left: Vec::new(),
        right: Vec::new(),
    };

    for right_pos in 0..right.n_rows() {
        let key = right.index().key_at(right_pos)?;
        if let Some(left_rows) = build.get(&key) {
            for &left_pos in left_rows {
                matched[left_pos] = true;
                positions.left.push(left_pos);
                positions.right.push(Some(right_pos));
            }
        }
    }

    if how == JoinHow::Left {
        for (left_pos, _) in matched.iter().enumerate().filter(|(_, &m)| !m) {
            positions.left.push(left_pos);
            positions.right.push(None);
        }
    }

    Ok(positions)
}
