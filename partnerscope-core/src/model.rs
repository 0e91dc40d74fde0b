// Data model shared by the loader, the filters and the graph builder

use serde::{Deserialize, Serialize};

/// Placeholder written into every cell that was missing in the source table.
pub const NOT_SPECIFIED: &str = "Not specified";

/// The datasets the explorer knows how to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    Comprehensive,
    WaterUtilities,
    Services,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Comprehensive,
        DatasetKind::WaterUtilities,
        DatasetKind::Services,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Comprehensive => "comprehensive",
            DatasetKind::WaterUtilities => "water",
            DatasetKind::Services => "services",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "comprehensive" | "all" => Some(DatasetKind::Comprehensive),
            "water" | "water-utilities" => Some(DatasetKind::WaterUtilities),
            "services" => Some(DatasetKind::Services),
            _ => None,
        }
    }

    /// Label shown in the dataset selector.
    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Comprehensive => "Comprehensive View",
            DatasetKind::WaterUtilities => "Water Utilities Focus",
            DatasetKind::Services => "Security Services Catalog",
        }
    }

    /// File name looked up inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetKind::Comprehensive => "ot_partnerships_relations.csv",
            DatasetKind::WaterUtilities => "Water_Utilities-focused_partnerships.csv",
            DatasetKind::Services => "ot_security_services.csv",
        }
    }

    pub fn is_partnership_table(&self) -> bool {
        !matches!(self, DatasetKind::Services)
    }
}

/// Column a partnership table can be filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterDimension {
    SecurityProvider,
    AutomationCompany,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 2] = [
        FilterDimension::SecurityProvider,
        FilterDimension::AutomationCompany,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            FilterDimension::SecurityProvider => "security_provider",
            FilterDimension::AutomationCompany => "automation_company",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "security_provider" | "provider" | "security" => Some(FilterDimension::SecurityProvider),
            "automation_company" | "company" | "automation" => {
                Some(FilterDimension::AutomationCompany)
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterDimension::SecurityProvider => "Security Provider",
            FilterDimension::AutomationCompany => "Automation Company",
        }
    }

    /// The column holding the other side of a partnership.
    pub fn opposite(&self) -> FilterDimension {
        match self {
            FilterDimension::SecurityProvider => FilterDimension::AutomationCompany,
            FilterDimension::AutomationCompany => FilterDimension::SecurityProvider,
        }
    }
}

/// One partnership fact between an automation vendor and an OT security provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub automation_company: String,
    pub security_provider: String,
    pub marketed_solution: String,
    pub partnership_type: String,
    pub services_offered: String,
    pub sectors: String,
    pub sources: String,
    #[serde(default)]
    pub service_tags: Vec<String>,
}

impl Relationship {
    /// Build a row with every descriptive field set to the placeholder.
    pub fn new(automation_company: impl Into<String>, security_provider: impl Into<String>) -> Self {
        Self {
            automation_company: automation_company.into(),
            security_provider: security_provider.into(),
            marketed_solution: NOT_SPECIFIED.to_string(),
            partnership_type: NOT_SPECIFIED.to_string(),
            services_offered: NOT_SPECIFIED.to_string(),
            sectors: NOT_SPECIFIED.to_string(),
            sources: NOT_SPECIFIED.to_string(),
            service_tags: Vec::new(),
        }
    }

    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.marketed_solution = solution.into();
        self
    }

    pub fn with_partnership_type(mut self, partnership_type: impl Into<String>) -> Self {
        self.partnership_type = partnership_type.into();
        self
    }

    pub fn field(&self, dimension: FilterDimension) -> &str {
        match dimension {
            FilterDimension::SecurityProvider => &self.security_provider,
            FilterDimension::AutomationCompany => &self.automation_company,
        }
    }

    /// Tooltip text attached to the graph edge this row produces.
    pub fn edge_title(&self) -> String {
        format!(
            "Solution: {}\nType: {}",
            self.marketed_solution, self.partnership_type
        )
    }
}

/// One entry of the security services catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEntry {
    pub service: String,
    pub providers: Vec<String>,
    pub pera_layers: String,
    pub regulations: String,
}

impl ServiceEntry {
    pub fn is_provided_by(&self, provider: &str) -> bool {
        self.providers.iter().any(|p| p == provider)
    }
}

/// A partnership dataset as loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub kind: DatasetKind,
    pub rows: Vec<Relationship>,
}

/// The services catalog as loaded from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCatalog {
    pub entries: Vec<ServiceEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Partnerships(Table),
    Services(ServiceCatalog),
}

impl Dataset {
    pub fn kind(&self) -> DatasetKind {
        match self {
            Dataset::Partnerships(table) => table.kind,
            Dataset::Services(_) => DatasetKind::Services,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dataset::Partnerships(table) => table.rows.len(),
            Dataset::Services(catalog) => catalog.entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
