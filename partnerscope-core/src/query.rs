// Filter selection over loaded tables

use crate::model::{FilterDimension, Relationship, ServiceEntry};
use std::collections::BTreeSet;

/// Distinct values of a column, sorted lexicographically.
pub fn distinct_values(rows: &[Relationship], dimension: FilterDimension) -> Vec<String> {
    rows.iter()
        .map(|row| row.field(dimension))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Every row whose `dimension` column equals `value` exactly, in table order.
pub fn filter_rows<'a>(
    rows: &'a [Relationship],
    dimension: FilterDimension,
    value: &str,
) -> Vec<&'a Relationship> {
    rows.iter()
        .filter(|row| row.field(dimension) == value)
        .collect()
}

/// Distinct providers named anywhere in the services catalog, sorted.
pub fn distinct_providers(entries: &[ServiceEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.providers.iter().map(String::as_str))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

/// Catalog entries offered by `provider`, or all entries when no provider is given.
pub fn filter_services<'a>(
    entries: &'a [ServiceEntry],
    provider: Option<&str>,
) -> Vec<&'a ServiceEntry> {
    entries
        .iter()
        .filter(|entry| provider.is_none_or(|p| entry.is_provided_by(p)))
        .collect()
}
