// View model: explicit dashboard state rendered into a host-agnostic description

use crate::config::PhysicsConfig;
use crate::graph::{PartnershipGraph, build_bipartite_graph, build_star_graph};
use crate::model::{
    Dataset, DatasetKind, FilterDimension, NOT_SPECIFIED, Relationship, ServiceCatalog,
    ServiceEntry, Table,
};
use crate::query::{distinct_providers, distinct_values, filter_rows, filter_services};
use serde::{Deserialize, Serialize};
use url::Url;

pub const EMPTY_SELECTION_PROMPT: &str =
    "Select a filter from the sidebar to see partnership details.";
pub const EMPTY_CATALOG_PROMPT: &str = "No security services match the selected provider.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    /// One entity and its direct partners.
    PerEntity,
    /// Every partnership in the dataset.
    FullNetwork,
}

/// Everything the user has chosen in the dashboard controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    pub dataset: DatasetKind,
    pub view_mode: ViewMode,
    pub dimension: FilterDimension,
    /// Chosen filter value; `None` falls back to the first available value.
    pub selection: Option<String>,
    /// Provider narrowing the services catalog.
    pub provider: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            dataset: DatasetKind::Comprehensive,
            view_mode: ViewMode::PerEntity,
            dimension: FilterDimension::SecurityProvider,
            selection: None,
            provider: None,
        }
    }
}

impl DashboardState {
    pub fn new(dataset: DatasetKind) -> Self {
        Self {
            dataset,
            ..Self::default()
        }
    }

    pub fn with_dimension(mut self, dimension: FilterDimension) -> Self {
        self.dimension = dimension;
        self
    }

    pub fn with_selection(mut self, value: impl Into<String>) -> Self {
        self.selection = Some(value.into());
        self
    }

    pub fn with_view_mode(mut self, view_mode: ViewMode) -> Self {
        self.view_mode = view_mode;
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }
}

/// Filter controls as the host should draw them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sidebar {
    pub dimension: Option<FilterDimension>,
    pub values: Vec<String>,
    pub selected: Option<String>,
    pub view_mode: Option<ViewMode>,
}

/// Detail block for one partnership row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnershipCard {
    pub heading: String,
    pub marketed_solution: String,
    pub partnership_type: String,
    pub services_offered: String,
    pub sectors: String,
    pub service_tags: Vec<String>,
    pub source: String,
    /// Set when `source` parses as an absolute URL.
    pub source_link: Option<String>,
}

impl PartnershipCard {
    pub fn from_row(row: &Relationship) -> Self {
        let source_link = match row.sources.as_str() {
            NOT_SPECIFIED => None,
            source => Url::parse(source.trim()).ok().map(|url| url.to_string()),
        };
        Self {
            heading: format!("{} & {}", row.automation_company, row.security_provider),
            marketed_solution: row.marketed_solution.clone(),
            partnership_type: row.partnership_type.clone(),
            services_offered: row.services_offered.clone(),
            sectors: row.sectors.clone(),
            service_tags: row.service_tags.clone(),
            source: row.sources.clone(),
            source_link,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ViewBody {
    /// Nothing to show; an informational prompt takes the place of results.
    Info(String),
    Partnerships {
        header: String,
        cards: Vec<PartnershipCard>,
        graph: PartnershipGraph,
    },
    Network {
        header: String,
        graph: PartnershipGraph,
    },
    Services {
        header: String,
        entries: Vec<ServiceEntry>,
    },
}

#[derive(Debug, Clone)]
pub struct ViewDescription {
    pub title: String,
    pub caption: String,
    pub sidebar: Sidebar,
    pub body: ViewBody,
    pub physics: PhysicsConfig,
}

impl ViewDescription {
    pub fn graph(&self) -> Option<&PartnershipGraph> {
        match &self.body {
            ViewBody::Partnerships { graph, .. } | ViewBody::Network { graph, .. } => Some(graph),
            _ => None,
        }
    }

    pub fn header(&self) -> Option<&str> {
        match &self.body {
            ViewBody::Info(_) => None,
            ViewBody::Partnerships { header, .. }
            | ViewBody::Network { header, .. }
            | ViewBody::Services { header, .. } => Some(header),
        }
    }
}

pub fn dataset_title(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Comprehensive => "Comprehensive OT Security Partnerships Explorer",
        DatasetKind::WaterUtilities => "Water Utilities OT Security Partnerships Explorer",
        DatasetKind::Services => "OT Security Services Catalog",
    }
}

pub fn dataset_caption(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Comprehensive => {
            "This view shows all known partnerships between major automation vendors and OT security providers."
        }
        DatasetKind::WaterUtilities => {
            "This view shows partnerships with a specific focus on or relevance to the water and wastewater sector."
        }
        DatasetKind::Services => {
            "Security services mapped to PERA layers and regulatory frameworks, with the providers offering them."
        }
    }
}

fn selection_header(dimension: FilterDimension, value: &str) -> String {
    match dimension {
        FilterDimension::SecurityProvider => {
            format!("Automation companies partnering with: {}", value)
        }
        FilterDimension::AutomationCompany => {
            format!("Security providers partnering with: {}", value)
        }
    }
}

/// Render the dashboard for `state` over an already loaded dataset.
///
/// Pure: the same inputs always give the same description, and nothing is cached.
pub fn render(state: &DashboardState, dataset: &Dataset, physics: &PhysicsConfig) -> ViewDescription {
    let (sidebar, body) = match dataset {
        Dataset::Partnerships(table) => render_partnerships(state, table),
        Dataset::Services(catalog) => render_services(state, catalog),
    };

    ViewDescription {
        title: dataset_title(dataset.kind()).to_string(),
        caption: dataset_caption(dataset.kind()).to_string(),
        sidebar,
        body,
        physics: *physics,
    }
}

fn render_partnerships(state: &DashboardState, table: &Table) -> (Sidebar, ViewBody) {
    let values = distinct_values(&table.rows, state.dimension);
    let selected = state
        .selection
        .clone()
        .or_else(|| values.first().cloned());

    let sidebar = Sidebar {
        dimension: Some(state.dimension),
        values,
        selected: selected.clone(),
        view_mode: Some(state.view_mode),
    };

    if state.view_mode == ViewMode::FullNetwork {
        if table.rows.is_empty() {
            return (sidebar, ViewBody::Info(EMPTY_SELECTION_PROMPT.to_string()));
        }
        let body = ViewBody::Network {
            header: format!(
                "Full partnership network ({} partnerships)",
                table.rows.len()
            ),
            graph: build_bipartite_graph(&table.rows),
        };
        return (sidebar, body);
    }

    let Some(value) = selected else {
        return (sidebar, ViewBody::Info(EMPTY_SELECTION_PROMPT.to_string()));
    };

    let rows = filter_rows(&table.rows, state.dimension, &value);
    if rows.is_empty() {
        return (sidebar, ViewBody::Info(EMPTY_SELECTION_PROMPT.to_string()));
    }

    let body = ViewBody::Partnerships {
        header: selection_header(state.dimension, &value),
        cards: rows.iter().map(|row| PartnershipCard::from_row(row)).collect(),
        graph: build_star_graph(rows.iter().copied(), &value, state.dimension),
    };
    (sidebar, body)
}

fn render_services(state: &DashboardState, catalog: &ServiceCatalog) -> (Sidebar, ViewBody) {
    let sidebar = Sidebar {
        dimension: None,
        values: distinct_providers(&catalog.entries),
        selected: state.provider.clone(),
        view_mode: None,
    };

    let entries: Vec<ServiceEntry> = filter_services(&catalog.entries, state.provider.as_deref())
        .into_iter()
        .cloned()
        .collect();

    if entries.is_empty() {
        let message = if catalog.entries.is_empty() {
            EMPTY_SELECTION_PROMPT
        } else {
            EMPTY_CATALOG_PROMPT
        };
        return (sidebar, ViewBody::Info(message.to_string()));
    }

    let header = match &state.provider {
        Some(provider) => format!("Security services offered by: {}", provider),
        None => format!("All security services ({})", entries.len()),
    };
    (sidebar, ViewBody::Services { header, entries })
}
