#![forbid(unsafe_code)]

use crate::model::TypeCount;
use std::collections::HashMap;

/// How many bars/slices the Insights page shows.
pub const TOP_N: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frequency {
    pub label: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: u64,
    pub percent: f64,
}

/// Counts distinct values, most frequent first. Equal counts keep the order in
/// which the value was first seen.
pub fn value_counts<I, S>(values: I) -> Vec<Frequency>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<Frequency> = Vec::new();
    for value in values {
        let value = value.as_ref();
        if let Some(&slot) = index.get(value) {
            out[slot].count += 1;
            continue;
        }
        index.insert(value.to_string(), out.len());
        out.push(Frequency {
            label: value.to_string(),
            count: 1,
        });
    }
    // sort_by is stable
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

pub fn top_n_by_frequency<I, S>(values: I, n: usize) -> Vec<Frequency>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts = value_counts(values);
    counts.truncate(n);
    counts
}

/// Top `n` categories with each slice's share of the displayed slices, not of
/// the whole population.
pub fn category_distribution<I, S>(values: I, n: usize) -> Vec<Share>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let top = top_n_by_frequency(values, n);
    shares(top.into_iter().map(|f| (f.label, f.count)))
}

/// Crime-type counts as pie slices, every category kept.
pub fn type_count_shares(rows: &[TypeCount]) -> Vec<Share> {
    shares(rows.iter().map(|row| (row.crime_type.clone(), row.count)))
}

fn shares(counts: impl IntoIterator<Item = (String, u64)>) -> Vec<Share> {
    let counts = counts.into_iter().collect::<Vec<_>>();
    let total: u64 = counts.iter().map(|(_, count)| count).sum();
    counts
        .into_iter()
        .map(|(label, count)| Share {
            percent: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            },
            label,
            count,
        })
        .collect()
}
