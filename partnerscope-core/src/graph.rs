// Relationship graphs: star (one entity and its partners) and bipartite (whole network)

use crate::config::PhysicsConfig;
use crate::model::{FilterDimension, Relationship};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CENTER_COLOR: &str = "#ff4b4b";
pub const PARTNER_COLOR: &str = "#97c2fc";
pub const AUTOMATION_COLOR: &str = "#1f77b4";
pub const SECURITY_COLOR: &str = "#2ca02c";

pub const CENTER_SIZE: u32 = 30;
pub const CENTER_FONT_SIZE: u32 = 20;
pub const LEAF_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeRole {
    Center,
    Automation,
    Security,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Center => "center",
            NodeRole::Automation => "automation",
            NodeRole::Security => "security",
        }
    }

    /// Role of the entities stored in a given column.
    pub fn for_column(dimension: FilterDimension) -> Self {
        match dimension {
            FilterDimension::SecurityProvider => NodeRole::Security,
            FilterDimension::AutomationCompany => NodeRole::Automation,
        }
    }

    /// Category shown by hosts that group nodes in the full network.
    pub fn category(&self) -> Option<&'static str> {
        match self {
            NodeRole::Center => None,
            NodeRole::Automation => Some("Automation Company"),
            NodeRole::Security => Some("Security Provider"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    Star,
    Bipartite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub role: NodeRole,
    pub size: u32,
    pub color: String,
    pub shape: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
}

impl GraphNode {
    fn center(name: &str) -> Self {
        Self {
            id: node_id(NodeRole::Center, name),
            label: name.to_string(),
            role: NodeRole::Center,
            size: CENTER_SIZE,
            color: CENTER_COLOR.to_string(),
            shape: "dot".to_string(),
            group: None,
            font_size: Some(CENTER_FONT_SIZE),
        }
    }

    fn partner(role: NodeRole, name: &str) -> Self {
        Self {
            id: node_id(role, name),
            label: name.to_string(),
            role,
            size: LEAF_SIZE,
            color: PARTNER_COLOR.to_string(),
            shape: "dot".to_string(),
            group: None,
            font_size: None,
        }
    }

    fn partition(role: NodeRole, name: &str) -> Self {
        let (color, shape) = match role {
            NodeRole::Security => (SECURITY_COLOR, "diamond"),
            _ => (AUTOMATION_COLOR, "dot"),
        };
        Self {
            id: node_id(role, name),
            label: name.to_string(),
            role,
            size: LEAF_SIZE,
            color: color.to_string(),
            shape: shape.to_string(),
            group: role.category().map(String::from),
            font_size: None,
        }
    }
}

/// One partnership fact drawn as an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub title: String,
}

/// Node ids are namespaced by role so a name present in both columns stays two nodes.
pub fn node_id(role: NodeRole, name: &str) -> String {
    format!("{}:{}", role.as_str(), name)
}

/// Serialisable graph handed to a rendering host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDescription {
    pub topology: Topology,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<EdgeDescription>,
    pub physics: PhysicsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDescription {
    pub from: String,
    pub to: String,
    pub title: String,
}

impl GraphDescription {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Options object for vis-network.
    pub fn options(&self) -> serde_json::Value {
        self.physics.to_vis_options()
    }
}

/// A partnership multigraph. Parallel edges are kept: each edge is one row.
#[derive(Debug, Clone)]
pub struct PartnershipGraph {
    topology: Topology,
    graph: DiGraph<GraphNode, GraphEdge>,
    index: HashMap<String, NodeIndex>,
}

impl PartnershipGraph {
    fn new(topology: Topology) -> Self {
        Self {
            topology,
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Insert a node unless one with the same id exists; the first insertion wins.
    fn insert_node(&mut self, node: GraphNode) -> NodeIndex {
        if let Some(&existing) = self.index.get(&node.id) {
            return existing;
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        idx
    }

    fn insert_edge(&mut self, from: NodeIndex, to: NodeIndex, row: &Relationship) {
        self.graph.add_edge(
            from,
            to,
            GraphEdge {
                title: row.edge_title(),
            },
        );
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_weights()
    }

    /// `(source, target, edge)` triples in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&GraphNode, &GraphNode, &GraphEdge)> {
        self.graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()], e.weight()))
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn center(&self) -> Option<&GraphNode> {
        self.nodes().find(|node| node.role == NodeRole::Center)
    }

    /// Outgoing edges of `id` with their targets, in insertion order.
    pub fn edges_from(&self, id: &str) -> Vec<(&GraphNode, &GraphEdge)> {
        let Some(&source) = self.index.get(id) else {
            return Vec::new();
        };
        self.graph
            .edge_references()
            .filter(|e| e.source() == source)
            .map(|e| (&self.graph[e.target()], e.weight()))
            .collect()
    }

    pub fn describe(&self, physics: &PhysicsConfig) -> GraphDescription {
        GraphDescription {
            topology: self.topology,
            nodes: self.nodes().cloned().collect(),
            edges: self
                .edges()
                .map(|(from, to, edge)| EdgeDescription {
                    from: from.id.clone(),
                    to: to.id.clone(),
                    title: edge.title.clone(),
                })
                .collect(),
            physics: *physics,
        }
    }

    /// Graphviz rendering of the graph.
    pub fn to_dot(&self) -> String {
        let dot = Dot::with_attr_getters(
            &self.graph,
            &[Config::NodeNoLabel, Config::EdgeNoLabel],
            &|_, edge| format!("tooltip = {:?}", edge.weight().title),
            &|_, (_, node)| {
                let shape = if node.shape == "diamond" { "diamond" } else { "ellipse" };
                format!(
                    "label = {:?}, color = {:?}, shape = {}",
                    node.label, node.color, shape
                )
            },
        );
        format!("{:?}", dot)
    }
}

/// Star graph around `center_name`, whose value lives in the `center_role` column.
///
/// Partners come from the opposite column. Every row yields one edge from the
/// center, even when the partner node already exists or shares the center's name.
pub fn build_star_graph<'a, I>(
    rows: I,
    center_name: &str,
    center_role: FilterDimension,
) -> PartnershipGraph
where
    I: IntoIterator<Item = &'a Relationship>,
{
    let mut graph = PartnershipGraph::new(Topology::Star);
    let center = graph.insert_node(GraphNode::center(center_name));

    let partner_column = center_role.opposite();
    let partner_role = NodeRole::for_column(partner_column);

    for row in rows {
        let partner = graph.insert_node(GraphNode::partner(partner_role, row.field(partner_column)));
        graph.insert_edge(center, partner, row);
    }

    graph
}

/// Bipartite graph of automation companies and security providers, one edge per row.
pub fn build_bipartite_graph<'a, I>(rows: I) -> PartnershipGraph
where
    I: IntoIterator<Item = &'a Relationship>,
{
    let rows: Vec<&Relationship> = rows.into_iter().collect();
    let mut graph = PartnershipGraph::new(Topology::Bipartite);

    // Partition nodes first, each in order of first appearance
    for row in &rows {
        graph.insert_node(GraphNode::partition(NodeRole::Automation, &row.automation_company));
    }
    for row in &rows {
        graph.insert_node(GraphNode::partition(NodeRole::Security, &row.security_provider));
    }

    for row in rows {
        let from = graph.insert_node(GraphNode::partition(NodeRole::Automation, &row.automation_company));
        let to = graph.insert_node(GraphNode::partition(NodeRole::Security, &row.security_provider));
        graph.insert_edge(from, to, row);
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_ids_are_namespaced_by_role() {
        assert_eq!(node_id(NodeRole::Center, "Claroty"), "center:Claroty");
        assert_eq!(node_id(NodeRole::Automation, "ABB"), "automation:ABB");
    }

    #[test]
    fn first_insertion_wins() {
        let mut graph = PartnershipGraph::new(Topology::Star);
        let a = graph.insert_node(GraphNode::partner(NodeRole::Automation, "A"));
        let mut other = GraphNode::partner(NodeRole::Automation, "A");
        other.color = "#000000".to_string();
        let b = graph.insert_node(other);
        assert_eq!(a, b);
        assert_eq!(graph.node("automation:A").map(|n| n.color.as_str()), Some(PARTNER_COLOR));
    }
}
