pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod model;
pub mod query;
pub mod report;
pub mod view;

use colored::Colorize;

pub use config::{DataSources, PhysicsConfig, Solver};
pub use data::{DatasetCache, load_dataset, parse_service_tags};
pub use error::LoadError;
pub use graph::{GraphDescription, PartnershipGraph, build_bipartite_graph, build_star_graph};
pub use model::{Dataset, DatasetKind, FilterDimension, NOT_SPECIFIED, Relationship};
pub use query::{distinct_values, filter_rows};
pub use view::{DashboardState, ViewBody, ViewDescription, ViewMode, render};

const BANNER: &str = r#"
   ___  ___ _____ _  _ ___ ___  ___ ___ ___  ___  ___
  | _ \/   \| _ \ \| | __| _ \/ __/ __/ _ \| _ \| __|
  |  _/ - - |   / .` | _||   /\__ \(_| (_) |  _/| _|
  |_| /_/ \_\_|_\_|\_|___|_|_\|___/\___\___/|_|  |___|
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {}\n",
        "OT security partnerships explorer".bright_white()
    );
}
