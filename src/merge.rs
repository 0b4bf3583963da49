use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::domain::{CalendarDate, Dataset, NameDay};
use crate::store;

/// Union every input into one record per date, dates ascending and names
/// sorted. Inputs are left untouched; their order does not matter.
pub fn merge<'a, I>(datasets: I) -> Dataset
where
    I: IntoIterator<Item = &'a [NameDay]>,
{
    let mut merged: BTreeMap<CalendarDate, BTreeSet<String>> = BTreeMap::new();

    for dataset in datasets {
        for record in dataset {
            merged
                .entry(record.date)
                .or_default()
                .extend(record.names.iter().cloned());
        }
    }

    merged
        .into_iter()
        .map(|(date, names)| NameDay::new(date, names.into_iter().collect()))
        .collect()
}

/// Merge previously persisted per-source files.
pub fn merge_files(paths: &[PathBuf]) -> Result<Dataset> {
    let datasets = paths
        .iter()
        .map(|p| store::load(p))
        .collect::<Result<Vec<_>>>()?;

    for (path, data) in paths.iter().zip(&datasets) {
        info!(path = %path.display(), records = data.len(), "Loaded source");
    }

    Ok(merge(datasets.iter().map(Vec::as_slice)))
}

// ── Tests ──
