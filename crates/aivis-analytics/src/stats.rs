//! Aggregation primitives shared by every analytic view.
//!
//! Grouping, running means and top-k selection are done the same way
//! everywhere so that conceptually identical numbers (a brand's visibility
//! on a platform, on a day, or on a prompt) cannot drift apart.

use std::cmp::Ordering;
use std::hash::Hash;

use indexmap::IndexMap;

/// Sum and count of observed values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    sum: f64,
    count: u32,
}

impl RunningMean {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Push `value` if present. Absent values stay out of the denominator.
    pub fn push_opt(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.push(v);
        }
    }

    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Mean of observed values; `0.0` when nothing was observed.
    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        }
    }
}

/// Running means keyed by `K`, iterated in first-insertion order.
#[derive(Debug, Clone)]
pub struct MeanTable<K: Hash + Eq> {
    entries: IndexMap<K, RunningMean>,
}

impl<K: Hash + Eq> Default for MeanTable<K> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq> MeanTable<K> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: K, value: f64) {
        self.entries.entry(key).or_default().push(value);
    }

    #[must_use]
    pub fn get(&self, key: &K) -> Option<&RunningMean> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &RunningMean)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group items by key, keeping groups and their members in first-seen order.
pub fn group_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> IndexMap<K, Vec<T>>
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut groups: IndexMap<K, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

/// Sort descending by `score` and keep the first `k`.
///
/// The sort is stable, so equal scores keep their input order.
#[must_use]
pub fn top_k_by<T, F>(mut items: Vec<T>, k: usize, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal));
    items.truncate(k);
    items
}

/// Fraction in `[0, 1]` as a whole percentage, rounded half away from zero
/// and clamped to `[0, 100]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_pct(fraction: f64) -> u32 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Same as [`round_pct`] but signed, for computing differences.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn signed_pct(fraction: f64) -> i32 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction * 100.0).round().clamp(0.0, 100.0) as i32
}

/// Round to one decimal place, half away from zero.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / whole` as a percentage with one decimal, clamped to `[0, 100]`.
/// Returns `0.0` when `whole` is zero.
#[must_use]
pub fn pct_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(as_f64(part) / as_f64(whole) * 100.0).clamp(0.0, 100.0)
}

/// Lossy count conversion used by the percentage helpers.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn as_f64(count: usize) -> f64 {
    count as f64
}
