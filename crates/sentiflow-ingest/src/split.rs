//! Seeded, stratified train/test split.
//!
//! The test size is `round(test_size * n)`. Each class gets its proportional
//! share of that total: the integer part first, then the leftover slots go to
//! the classes with the largest fractional remainders (ties by label order).
//! Within a class, rows are shuffled with a `StdRng` seeded from `seed` and the
//! first ones go to the test split. Both outputs keep the input row order.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::config::validate_test_size;
use crate::error::{IngestError, IngestResult};
use crate::records::RecordSet;

/// Minimum members a class needs to appear on both sides of the split.
const MIN_CLASS_MEMBERS: usize = 2;

/// Train and test partitions of one record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    pub train: RecordSet,
    pub test: RecordSet,
}

/// Split `records` into train/test, stratified on `label_column`.
pub fn stratified_split(
    records: &RecordSet,
    label_column: &str,
    test_size: f64,
    seed: u64,
) -> IngestResult<SplitResult> {
    validate_test_size(test_size)?;

    let label_idx = records.column_index(label_column).ok_or_else(|| {
        IngestError::schema(format!("missing label column '{}'", label_column))
    })?;

    let mut classes: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, row) in records.rows().iter().enumerate() {
        classes.entry(row[label_idx].as_str()).or_default().push(idx);
    }

    if classes.is_empty() {
        return Err(IngestError::config("cannot split an empty dataset"));
    }
    if let Some((label, members)) = classes.iter().find(|(_, m)| m.len() < MIN_CLASS_MEMBERS) {
        return Err(IngestError::config(format!(
            "class '{}' has {} member(s); stratification needs at least {}",
            label,
            members.len(),
            MIN_CLASS_MEMBERS
        )));
    }

    let total = records.len();
    // Nearest, not scikit-learn's ceil: 101 rows at 0.2 give 20 test rows.
    let n_test = (test_size * total as f64).round() as usize;
    let n_train = total - n_test;
    if n_test < classes.len() || n_train < classes.len() {
        return Err(IngestError::config(format!(
            "test_size {} gives {} test / {} train rows for {} rows, \
             each side needs at least one row per class ({})",
            test_size,
            n_test,
            n_train,
            total,
            classes.len()
        )));
    }

    let counts: Vec<usize> = classes.values().map(Vec::len).collect();
    let test_counts = allocate(&counts, n_test, total);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_idx = Vec::with_capacity(n_train);
    let mut test_idx = Vec::with_capacity(n_test);

    for ((label, members), take) in classes.into_iter().zip(test_counts) {
        let mut members = members;
        members.shuffle(&mut rng);
        let (test_part, train_part) = members.split_at(take);
        debug!(
            label,
            test = test_part.len(),
            train = train_part.len(),
            "class allocation"
        );
        test_idx.extend_from_slice(test_part);
        train_idx.extend_from_slice(train_part);
    }

    train_idx.sort_unstable();
    test_idx.sort_unstable();

    debug!(
        train = train_idx.len(),
        test = test_idx.len(),
        seed,
        "dataset split"
    );

    Ok(SplitResult {
        train: records.select(&train_idx),
        test: records.select(&test_idx),
    })
}

/// Distribute `n_pick` slots over classes proportionally to `counts`.
///
/// Every class gets `floor(count * n_pick / total)` or one more, and the
/// result sums to `n_pick`.
fn allocate(counts: &[usize], n_pick: usize, total: usize) -> Vec<usize> {
    let mut picks: Vec<usize> = counts.iter().map(|&c| c * n_pick / total).collect();
    let assigned: usize = picks.iter().sum();

    let mut by_remainder: Vec<usize> = (0..counts.len()).collect();
    // Stable sort keeps label order among equal remainders.
    by_remainder.sort_by_key(|&i| std::cmp::Reverse((counts[i] * n_pick) % total));

    for &i in by_remainder.iter().take(n_pick - assigned) {
        picks[i] += 1;
    }
    picks
}
