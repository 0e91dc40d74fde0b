// Tests for rendering dashboard state into view descriptions

use partnerscope_core::config::PhysicsConfig;
use partnerscope_core::graph::Topology;
use partnerscope_core::model::{
    Dataset, DatasetKind, FilterDimension, Relationship, ServiceCatalog, ServiceEntry, Table,
};
use partnerscope_core::view::{
    DashboardState, EMPTY_CATALOG_PROMPT, EMPTY_SELECTION_PROMPT, ViewBody, ViewMode, render,
};

fn table(kind: DatasetKind, rows: Vec<Relationship>) -> Dataset {
    Dataset::Partnerships(Table { kind, rows })
}

fn sample_table() -> Dataset {
    let mut tagged = Relationship::new("A2", "S1").with_solution("Y");
    tagged.service_tags = vec!["monitoring".to_string()];
    table(
        DatasetKind::WaterUtilities,
        vec![
            Relationship::new("A1", "S1").with_solution("X"),
            tagged,
            Relationship::new("A1", "S2").with_solution("Z"),
        ],
    )
}

// ============================================================================
// Per-Entity View Tests
// ============================================================================

#[test]
fn test_render_selected_provider() {
    let state = DashboardState::new(DatasetKind::WaterUtilities).with_selection("S1");
    let view = render(&state, &sample_table(), &PhysicsConfig::default());

    assert_eq!(view.title, "Water Utilities OT Security Partnerships Explorer");
    assert_eq!(view.sidebar.values, vec!["S1", "S2"]);
    assert_eq!(view.sidebar.selected.as_deref(), Some("S1"));

    let ViewBody::Partnerships {
        header,
        cards,
        graph,
    } = &view.body
    else {
        panic!("expected partnership listing");
    };
    assert_eq!(header, "Automation companies partnering with: S1");
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].heading, "A1 & S1");
    assert_eq!(cards[1].service_tags, vec!["monitoring".to_string()]);
    assert_eq!(graph.topology(), Topology::Star);
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
}

#[test]
fn test_render_defaults_to_first_value() {
    let state = DashboardState::new(DatasetKind::WaterUtilities)
        .with_dimension(FilterDimension::AutomationCompany);
    let view = render(&state, &sample_table(), &PhysicsConfig::default());

    assert_eq!(view.sidebar.values, vec!["A1", "A2"]);
    assert_eq!(view.sidebar.selected.as_deref(), Some("A1"));
    assert_eq!(view.header(), Some("Security providers partnering with: A1"));
    assert_eq!(view.graph().map(|g| g.edge_count()), Some(2));
}

#[test]
fn test_render_unknown_selection_shows_prompt() {
    let state = DashboardState::new(DatasetKind::WaterUtilities).with_selection("Nobody");
    let view = render(&state, &sample_table(), &PhysicsConfig::default());

    match &view.body {
        ViewBody::Info(message) => assert_eq!(message, EMPTY_SELECTION_PROMPT),
        other => panic!("expected info prompt, got {:?}", other),
    }
    assert!(view.graph().is_none());
}

#[test]
fn test_render_empty_table_shows_prompt() {
    let state = DashboardState::new(DatasetKind::Comprehensive);
    let view = render(
        &state,
        &table(DatasetKind::Comprehensive, Vec::new()),
        &PhysicsConfig::default(),
    );

    assert!(view.sidebar.values.is_empty());
    assert!(matches!(view.body, ViewBody::Info(_)));
}

#[test]
fn test_render_is_repeatable() {
    let state = DashboardState::new(DatasetKind::WaterUtilities).with_selection("S1");
    let dataset = sample_table();

    let first = render(&state, &dataset, &PhysicsConfig::default());
    let second = render(&state, &dataset, &PhysicsConfig::default());
    assert_eq!(first.sidebar, second.sidebar);
    assert_eq!(first.header(), second.header());
    assert_eq!(
        first.graph().map(|g| g.describe(&first.physics)),
        second.graph().map(|g| g.describe(&second.physics))
    );
}

// ============================================================================
// Full Network View Tests
// ============================================================================

#[test]
fn test_render_full_network() {
    let state = DashboardState::new(DatasetKind::WaterUtilities).with_view_mode(ViewMode::FullNetwork);
    let view = render(&state, &sample_table(), &PhysicsConfig::default());

    let ViewBody::Network { graph, .. } = &view.body else {
        panic!("expected full network");
    };
    assert_eq!(graph.topology(), Topology::Bipartite);
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 3);
}

#[test]
fn test_render_full_network_on_empty_table() {
    let state = DashboardState::new(DatasetKind::Comprehensive).with_view_mode(ViewMode::FullNetwork);
    let view = render(
        &state,
        &table(DatasetKind::Comprehensive, Vec::new()),
        &PhysicsConfig::default(),
    );
    assert!(matches!(view.body, ViewBody::Info(_)));
}

// ============================================================================
// Services Catalog View Tests
// ============================================================================

fn catalog() -> Dataset {
    Dataset::Services(ServiceCatalog {
        entries: vec![
            ServiceEntry {
                service: "Asset inventory".to_string(),
                providers: vec!["Claroty".to_string(), "Dragos".to_string()],
                pera_layers: "Levels 0-3".to_string(),
                regulations: "IEC 62443-2-1".to_string(),
            },
            ServiceEntry {
                service: "Remote access".to_string(),
                providers: vec!["Claroty".to_string()],
                pera_layers: "Level 3.5".to_string(),
                regulations: "NERC CIP-005".to_string(),
            },
        ],
    })
}

#[test]
fn test_render_services_catalog() {
    let state = DashboardState::new(DatasetKind::Services);
    let view = render(&state, &catalog(), &PhysicsConfig::default());

    assert_eq!(view.title, "OT Security Services Catalog");
    assert_eq!(view.sidebar.values, vec!["Claroty", "Dragos"]);
    assert!(view.sidebar.dimension.is_none());
    let ViewBody::Services { entries, .. } = &view.body else {
        panic!("expected services listing");
    };
    assert_eq!(entries.len(), 2);
}

#[test]
fn test_render_services_for_provider() {
    let state = DashboardState::new(DatasetKind::Services).with_provider("Dragos");
    let view = render(&state, &catalog(), &PhysicsConfig::default());

    assert_eq!(view.header(), Some("Security services offered by: Dragos"));
    let ViewBody::Services { entries, .. } = &view.body else {
        panic!("expected services listing");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].service, "Asset inventory");
}

#[test]
fn test_render_services_unknown_provider() {
    let state = DashboardState::new(DatasetKind::Services).with_provider("Nobody");
    let view = render(&state, &catalog(), &PhysicsConfig::default());

    match &view.body {
        ViewBody::Info(message) => assert_eq!(message, EMPTY_CATALOG_PROMPT),
        other => panic!("expected info prompt, got {:?}", other),
    }
}
