// Tests for filter selection

use partnerscope_core::model::{FilterDimension, Relationship, ServiceEntry};
use partnerscope_core::query::{distinct_providers, distinct_values, filter_rows, filter_services};

fn sample_rows() -> Vec<Relationship> {
    vec![
        Relationship::new("Siemens", "Claroty").with_solution("1"),
        Relationship::new("ABB", "Nozomi Networks").with_solution("2"),
        Relationship::new("ABB", "Claroty").with_solution("3"),
        Relationship::new("abb", "claroty").with_solution("4"),
        Relationship::new("Rockwell Automation", "Claroty ").with_solution("5"),
    ]
}

#[test]
fn test_distinct_values_sorted_and_unique() {
    let rows = sample_rows();

    assert_eq!(
        distinct_values(&rows, FilterDimension::AutomationCompany),
        vec!["ABB", "Rockwell Automation", "Siemens", "abb"]
    );
    assert_eq!(
        distinct_values(&rows, FilterDimension::SecurityProvider),
        vec!["Claroty", "Claroty ", "Nozomi Networks", "claroty"]
    );
}

#[test]
fn test_filter_rows_exact_match_in_order() {
    let rows = sample_rows();
    let filtered = filter_rows(&rows, FilterDimension::SecurityProvider, "Claroty");

    let solutions: Vec<&str> = filtered.iter().map(|r| r.marketed_solution.as_str()).collect();
    assert_eq!(solutions, vec!["1", "3"]);
}

#[test]
fn test_filter_rows_is_case_sensitive_and_untrimmed() {
    let rows = sample_rows();

    let lower = filter_rows(&rows, FilterDimension::AutomationCompany, "abb");
    assert_eq!(lower.len(), 1);
    assert_eq!(lower[0].marketed_solution, "4");

    let padded = filter_rows(&rows, FilterDimension::SecurityProvider, "Claroty ");
    assert_eq!(padded.len(), 1);
    assert_eq!(padded[0].automation_company, "Rockwell Automation");
}

#[test]
fn test_filter_rows_unknown_value_is_empty() {
    let rows = sample_rows();
    assert!(filter_rows(&rows, FilterDimension::SecurityProvider, "Dragos").is_empty());
}

#[test]
fn test_filter_rows_returns_every_match() {
    let rows = sample_rows();
    for value in distinct_values(&rows, FilterDimension::AutomationCompany) {
        let filtered = filter_rows(&rows, FilterDimension::AutomationCompany, &value);
        let expected = rows.iter().filter(|r| r.automation_company == value).count();
        assert_eq!(filtered.len(), expected);
        assert!(filtered.iter().all(|r| r.automation_company == value));
    }
}

fn entry(service: &str, providers: &[&str]) -> ServiceEntry {
    ServiceEntry {
        service: service.to_string(),
        providers: providers.iter().map(|p| p.to_string()).collect(),
        pera_layers: "Level 3".to_string(),
        regulations: "IEC 62443".to_string(),
    }
}

#[test]
fn test_services_filtering_by_provider() {
    let entries = vec![
        entry("Asset inventory", &["Claroty", "Dragos"]),
        entry("Segmentation", &["Nozomi Networks"]),
        entry("Monitoring", &["Dragos"]),
    ];

    assert_eq!(
        distinct_providers(&entries),
        vec!["Claroty", "Dragos", "Nozomi Networks"]
    );

    let dragos: Vec<&str> = filter_services(&entries, Some("Dragos"))
        .iter()
        .map(|e| e.service.as_str())
        .collect();
    assert_eq!(dragos, vec!["Asset inventory", "Monitoring"]);

    assert_eq!(filter_services(&entries, None).len(), 3);
    assert!(filter_services(&entries, Some("dragos")).is_empty());
}
