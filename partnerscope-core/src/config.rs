// Where datasets live and how the graph host should lay graphs out

use crate::model::DatasetKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Maps each dataset to the file it is read from.
///
/// Every dataset defaults to its canonical file name inside `data_dir`;
/// individual datasets can be pointed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    data_dir: PathBuf,
    overrides: HashMap<DatasetKind, PathBuf>,
}

impl DataSources {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, kind: DatasetKind, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(kind, path.into());
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, kind: DatasetKind) -> PathBuf {
        self.overrides
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| self.data_dir.join(kind.file_name()))
    }
}

/// Force model the rendering host runs; the graph builder never computes layout itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Solver {
    BarnesHut,
    ForceAtlas2Based,
    Repulsion,
    HierarchicalRepulsion,
}

impl Solver {
    pub fn as_str(&self) -> &'static str {
        match self {
            Solver::BarnesHut => "barnesHut",
            Solver::ForceAtlas2Based => "forceAtlas2Based",
            Solver::Repulsion => "repulsion",
            Solver::HierarchicalRepulsion => "hierarchicalRepulsion",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "barneshut" => Some(Solver::BarnesHut),
            "forceatlas2based" | "forceatlas2" => Some(Solver::ForceAtlas2Based),
            "repulsion" => Some(Solver::Repulsion),
            "hierarchicalrepulsion" => Some(Solver::HierarchicalRepulsion),
            _ => None,
        }
    }
}

/// Physics parameters handed to the rendering host as-is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Solver the host simulates with.
    pub solver: Solver,
    /// Repulsion strength between nodes; negative values push nodes apart.
    pub gravitational_constant: f64,
    /// Pull of every node towards the canvas center.
    pub central_gravity: f64,
    /// Rest length of an edge spring, in pixels.
    pub spring_length: f64,
    /// Velocity below which the simulation is considered stable.
    pub min_velocity: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            solver: Solver::BarnesHut,
            gravitational_constant: -30000.0,
            central_gravity: 0.3,
            spring_length: 150.0,
            min_velocity: 0.75,
        }
    }
}

impl PhysicsConfig {
    /// The `physics` section of a vis-network options object.
    pub fn to_vis_options(&self) -> serde_json::Value {
        let mut solver_options = serde_json::Map::new();
        solver_options.insert(
            "gravitationalConstant".to_string(),
            serde_json::json!(self.gravitational_constant),
        );
        solver_options.insert(
            "centralGravity".to_string(),
            serde_json::json!(self.central_gravity),
        );
        solver_options.insert(
            "springLength".to_string(),
            serde_json::json!(self.spring_length),
        );

        let mut physics = serde_json::Map::new();
        physics.insert(
            "solver".to_string(),
            serde_json::json!(self.solver.as_str()),
        );
        physics.insert(
            self.solver.as_str().to_string(),
            serde_json::Value::Object(solver_options),
        );
        physics.insert(
            "minVelocity".to_string(),
            serde_json::json!(self.min_velocity),
        );

        serde_json::json!({ "physics": physics })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_uses_canonical_file_name() {
        let sources = DataSources::new("/data");
        assert_eq!(
            sources.path_for(DatasetKind::Comprehensive),
            PathBuf::from("/data/ot_partnerships_relations.csv")
        );
    }

    #[test]
    fn override_wins_over_data_dir() {
        let sources = DataSources::new("/data").with_override(DatasetKind::Services, "/tmp/s.csv");
        assert_eq!(
            sources.path_for(DatasetKind::Services),
            PathBuf::from("/tmp/s.csv")
        );
        assert_eq!(
            sources.path_for(DatasetKind::WaterUtilities),
            PathBuf::from("/data/Water_Utilities-focused_partnerships.csv")
        );
    }

    #[test]
    fn vis_options_nest_parameters_under_solver() {
        let options = PhysicsConfig::default().to_vis_options();
        assert_eq!(options["physics"]["solver"], "barnesHut");
        assert_eq!(
            options["physics"]["barnesHut"]["gravitationalConstant"],
            -30000.0
        );
        assert_eq!(options["physics"]["barnesHut"]["springLength"], 150.0);
        assert_eq!(options["physics"]["minVelocity"], 0.75);
    }

    #[test]
    fn solver_names_are_forgiving() {
        assert_eq!(Solver::from_str("barnes-hut"), Some(Solver::BarnesHut));
        assert_eq!(Solver::from_str("forceAtlas2Based"), Some(Solver::ForceAtlas2Based));
        assert_eq!(Solver::from_str("spring"), None);
    }
}
