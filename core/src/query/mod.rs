//! Pure filter / sort / search functions over task records.
//!
//! Every function takes any iterator of `&TaskRecord` and returns a new
//! `Vec<&TaskRecord>`, so calls compose in any order and never touch storage.

mod search;

pub use search::{search, SearchField, SearchOptions};

use std::cmp::Ordering;

use crate::task::TaskRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Created,
    Description,
    Id,
}

/// Records whose tags contain `tag` exactly (case-sensitive), in input order.
pub fn filter_by_tag<'a, I>(records: I, tag: &str) -> Vec<&'a TaskRecord>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    records.into_iter().filter(|r| r.has_tag(tag)).collect()
}

pub fn filter_by_completion<'a, I>(records: I, completed: bool) -> Vec<&'a TaskRecord>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    records
        .into_iter()
        .filter(|r| r.completed() == completed)
        .collect()
}

/// Stable sort: records with equal keys keep their input order.
pub fn sort_by<'a, I>(records: I, key: SortKey) -> Vec<&'a TaskRecord>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    let mut out: Vec<&TaskRecord> = records.into_iter().collect();
    out.sort_by(|a, b| compare(a, b, key));
    out
}

fn compare(a: &TaskRecord, b: &TaskRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Created => a.created().cmp(&b.created()),
        SortKey::Description => a.description().cmp(b.description()),
        SortKey::Id => a.id().cmp(b.id()),
    }
}

/// First `n` records. `None` or a non-positive `n` means no limit.
pub fn limit<'a, I>(records: I, n: Option<i64>) -> Vec<&'a TaskRecord>
where
    I: IntoIterator<Item = &'a TaskRecord>,
{
    match n.and_then(|n| usize::try_from(n).ok()).filter(|&n| n > 0) {
        Some(n) => records.into_iter().take(n).collect(),
        None => records.into_iter().collect(),
    }
}
