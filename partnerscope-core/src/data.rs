// Table loading: CSV sources into in-memory partnership tables and the services catalog

use crate::error::{LoadError, Result};
use crate::model::{
    Dataset, DatasetKind, NOT_SPECIFIED, Relationship, ServiceCatalog, ServiceEntry, Table,
};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cell contents that count as missing, on top of empty cells.
const NA_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "<NA>", "#N/A",
];

const PARTNERSHIP_COLUMNS: [&str; 7] = [
    "security_provider",
    "automation_company",
    "marketed_solution",
    "partnership_type",
    "services_offered",
    "sectors",
    "sources",
];

const SERVICE_COLUMNS: [&str; 4] = [
    "Security service",
    "Who provides it",
    "PERA layer(s)",
    "Regulation / guidance alignment",
];

pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NA_TOKENS.contains(&trimmed)
}

/// Return the cell contents, or the placeholder when the cell is absent or empty.
pub fn normalize_cell(cell: Option<&str>) -> String {
    match cell {
        Some(value) if !is_missing(value) => value.to_string(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

/// Parse a `['a', 'b']` style list literal into tags.
///
/// Never fails: missing cells and anything that is not a flat list of quoted
/// strings produce an empty list.
pub fn parse_service_tags(cell: Option<&str>) -> Vec<String> {
    let Some(raw) = cell else {
        return Vec::new();
    };
    if is_missing(raw) {
        return Vec::new();
    }

    match parse_list_literal(raw) {
        Some(tags) => tags,
        None => {
            warn!(cell = raw, "Unparsable service_tags cell, treating as empty");
            Vec::new()
        }
    }
}

fn parse_list_literal(raw: &str) -> Option<Vec<String>> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut chars = inner.chars().peekable();
    let mut tags = Vec::new();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        // End of list, either empty or after a trailing comma
        let Some(&quote) = chars.peek() else {
            break;
        };
        if quote != '\'' && quote != '"' {
            return None;
        }
        chars.next();

        let mut tag = String::new();
        loop {
            match chars.next()? {
                '\\' => match chars.next()? {
                    'n' => tag.push('\n'),
                    't' => tag.push('\t'),
                    other => tag.push(other),
                },
                c if c == quote => break,
                c => tag.push(c),
            }
        }
        tags.push(tag);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(tags)
}

/// Canonical form of a header: lower case, without a trailing parenthetical.
fn header_key(header: &str) -> String {
    let trimmed = header.trim();
    let base = match trimmed.rfind(" (") {
        Some(idx) if trimmed.ends_with(')') => &trimmed[..idx],
        _ => trimmed,
    };
    base.trim().to_lowercase()
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    let wanted = header_key(name);
    headers.iter().position(|h| header_key(h) == wanted)
}

fn required_columns<const N: usize>(
    headers: &StringRecord,
    names: [&str; N],
    path: &Path,
) -> Result<[usize; N]> {
    let mut indices = [0usize; N];
    for (slot, name) in indices.iter_mut().zip(names) {
        *slot = column_index(headers, name).ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })?;
    }
    Ok(indices)
}

fn is_index_header(header: &str) -> bool {
    let trimmed = header.trim();
    trimmed.is_empty() || trimmed.starts_with("Unnamed:")
}

fn open_source(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Read a partnership table from any reader. `origin` only labels errors.
pub fn read_partnerships<R: Read>(reader: R, kind: DatasetKind, origin: &Path) -> Result<Table> {
    let csv_error = |source| LoadError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();

    if kind == DatasetKind::WaterUtilities && headers.get(0).is_some_and(is_index_header) {
        debug!(path = %origin.display(), "Dropping leading index column");
    }

    let [provider, company, solution, partnership_type, services, sectors, sources] =
        required_columns(&headers, PARTNERSHIP_COLUMNS, origin)?;
    let tags = match kind {
        DatasetKind::WaterUtilities => column_index(&headers, "service_tags"),
        _ => None,
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(Relationship {
            automation_company: normalize_cell(record.get(company)),
            security_provider: normalize_cell(record.get(provider)),
            marketed_solution: normalize_cell(record.get(solution)),
            partnership_type: normalize_cell(record.get(partnership_type)),
            services_offered: normalize_cell(record.get(services)),
            sectors: normalize_cell(record.get(sectors)),
            sources: normalize_cell(record.get(sources)),
            service_tags: tags
                .map(|idx| parse_service_tags(record.get(idx)))
                .unwrap_or_default(),
        });
    }

    Ok(Table { kind, rows })
}

/// Read the services catalog from any reader. `origin` only labels errors.
pub fn read_services<R: Read>(reader: R, origin: &Path) -> Result<ServiceCatalog> {
    let csv_error = |source| LoadError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers().map_err(csv_error)?.clone();
    let [service, providers, layers, regulations] =
        required_columns(&headers, SERVICE_COLUMNS, origin)?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        entries.push(ServiceEntry {
            service: normalize_cell(record.get(service)),
            providers: split_providers(record.get(providers)),
            pera_layers: normalize_cell(record.get(layers)),
            regulations: normalize_cell(record.get(regulations)),
        });
    }

    Ok(ServiceCatalog { entries })
}

fn split_providers(cell: Option<&str>) -> Vec<String> {
    match cell {
        Some(value) if !is_missing(value) => value
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

/// Load a dataset of the given kind from disk.
pub fn load_dataset(path: &Path, kind: DatasetKind) -> Result<Dataset> {
    let file = open_source(path)?;
    let dataset = match kind {
        DatasetKind::Services => Dataset::Services(read_services(file, path)?),
        _ => Dataset::Partnerships(read_partnerships(file, kind, path)?),
    };
    info!(
        path = %path.display(),
        dataset = kind.as_str(),
        rows = dataset.len(),
        "Loaded dataset"
    );
    Ok(dataset)
}

/// Loaded datasets keyed by source path and dataset kind.
///
/// Entries live until `clear` is called; a file changing on disk is not noticed.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<(PathBuf, DatasetKind), Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&mut self, path: &Path, kind: DatasetKind) -> Result<Arc<Dataset>> {
        let key = (path.to_path_buf(), kind);
        if let Some(dataset) = self.entries.get(&key) {
            debug!(path = %path.display(), dataset = kind.as_str(), "Dataset cache hit");
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_dataset(path, kind)?);
        self.entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn contains(&self, path: &Path, kind: DatasetKind) -> bool {
        self.entries.contains_key(&(path.to_path_buf(), kind))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_key_ignores_parenthetical_and_case() {
        assert_eq!(header_key("Who provides it (comma-separated)"), "who provides it");
        assert_eq!(header_key("PERA layer(s)"), "pera layer(s)");
        assert_eq!(header_key(" security_provider "), "security_provider");
    }

    #[test]
    fn list_literal_accepts_double_quotes_and_trailing_comma() {
        assert_eq!(
            parse_list_literal(r#"["a", 'b',]"#),
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn list_literal_handles_escaped_quotes() {
        assert_eq!(
            parse_list_literal(r"['it\'s']"),
            Some(vec!["it's".to_string()])
        );
    }

    #[test]
    fn list_literal_rejects_bare_words() {
        assert_eq!(parse_list_literal("[a, b]"), None);
        assert_eq!(parse_list_literal("['a'"), None);
        assert_eq!(parse_list_literal("['a' 'b']"), None);
    }

    #[test]
    fn missing_tokens_are_detected() {
        assert!(is_missing(""));
        assert!(is_missing("   "));
        assert!(is_missing("NaN"));
        assert!(!is_missing("Claroty"));
    }
}
