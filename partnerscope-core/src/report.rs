// Report generation from rendered views

use crate::graph::{GraphDescription, NodeRole, PartnershipGraph, Topology};
use crate::model::ServiceEntry;
use crate::view::{PartnershipCard, ViewBody, ViewDescription};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const THIN_RULE: &str = "────────────────────────────────────────────────────────────────────────────────";

const VIS_NETWORK_CDN: &str = "https://unpkg.com/vis-network/standalone/umd/vis-network.min.js";
const GRAPH_BACKGROUND: &str = "#f0f2f6";
const GRAPH_HEIGHT: &str = "600px";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Html,
    Dot,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "html" => Some(ReportFormat::Html),
            "dot" | "graphviz" => Some(ReportFormat::Dot),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Html => "html",
            ReportFormat::Dot => "dot",
            ReportFormat::Markdown => "md",
        }
    }
}

/// Render a view in the requested format.
pub fn generate_report(view: &ViewDescription, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(view)),
        ReportFormat::Markdown => Ok(generate_markdown_report(view)),
        ReportFormat::Json => generate_json_report(view),
        ReportFormat::Html => Ok(generate_html_report(view)),
        ReportFormat::Dot => Ok(view
            .graph()
            .map(PartnershipGraph::to_dot)
            .unwrap_or_else(|| "digraph {\n}\n".to_string())),
    }
}

pub fn generate_text_report(view: &ViewDescription) -> String {
    let mut report = String::new();

    // Header
    report.push_str(RULE);
    report.push('\n');
    report.push_str(&format!("  {}\n", view.title.to_uppercase()));
    report.push_str(RULE);
    report.push_str("\n\n");
    report.push_str(&wrap_text(&view.caption, 80, ""));
    report.push('\n');

    match &view.body {
        ViewBody::Info(message) => {
            report.push_str(&format!("ℹ {}\n\n", message));
        }
        ViewBody::Partnerships {
            header,
            cards,
            graph,
        } => {
            push_section(&mut report, header);
            for card in cards {
                push_card_text(&mut report, card);
            }
            push_section(&mut report, "PARTNERSHIP NETWORK GRAPH");
            report.push_str(&generate_graph_tree(graph));
            report.push('\n');
        }
        ViewBody::Network { header, graph } => {
            push_section(&mut report, header);
            report.push_str(&generate_graph_tree(graph));
            report.push('\n');
        }
        ViewBody::Services { header, entries } => {
            push_section(&mut report, header);
            for entry in entries {
                push_service_text(&mut report, entry);
            }
        }
    }

    // Footer
    report.push_str(RULE);
    report.push('\n');
    report.push_str("Generated by partnerscope\n");

    report
}

fn push_section(report: &mut String, title: &str) {
    report.push_str(RULE);
    report.push('\n');
    report.push_str(title);
    report.push('\n');
    report.push_str(RULE);
    report.push_str("\n\n");
}

fn push_card_text(report: &mut String, card: &PartnershipCard) {
    report.push_str(&format!("{}\n", card.heading));
    report.push_str(&format!("Solution:     {}\n", card.marketed_solution));
    report.push_str(&format!("Type:         {}\n", card.partnership_type));
    report.push_str(&format!("Sectors:      {}\n", card.sectors));
    if !card.service_tags.is_empty() {
        report.push_str(&format!("Tags:         {}\n", card.service_tags.join(", ")));
    }
    report.push_str(&format!("Source:       {}\n", card.source));
    report.push_str("\nServices Offered:\n");
    report.push_str(&wrap_text(&card.services_offered, 80, "  "));
    report.push('\n');
    report.push_str(THIN_RULE);
    report.push_str("\n\n");
}

fn push_service_text(report: &mut String, entry: &ServiceEntry) {
    report.push_str(&format!("{}\n", entry.service));
    report.push_str(&format!("PERA layers:  {}\n", entry.pera_layers));
    report.push_str(&format!("Regulations:  {}\n", entry.regulations));
    report.push_str("Providers:\n");
    if entry.providers.is_empty() {
        report.push_str("  (none listed)\n");
    }
    for provider in &entry.providers {
        report.push_str(&format!("  • {}\n", provider));
    }
    report.push('\n');
    report.push_str(THIN_RULE);
    report.push_str("\n\n");
}

/// ASCII rendering of a graph: the star as a tree under its center, the
/// bipartite network as one subtree per automation company.
pub fn generate_graph_tree(graph: &PartnershipGraph) -> String {
    if graph.is_empty() {
        return "  (empty)\n".to_string();
    }

    let mut result = String::new();
    let roots: Vec<_> = match graph.topology() {
        Topology::Star => graph.center().into_iter().collect(),
        Topology::Bipartite => graph
            .nodes()
            .filter(|node| node.role == NodeRole::Automation)
            .collect(),
    };

    for root in roots {
        result.push_str(&format!("{}\n", root.label));
        let edges = graph.edges_from(&root.id);
        if edges.is_empty() {
            result.push_str("  (no partnerships)\n");
        }
        for (i, (target, edge)) in edges.iter().enumerate() {
            let prefix = if i == edges.len() - 1 { "└── " } else { "├── " };
            let solution = edge
                .title
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("Solution: ");
            result.push_str(&format!("{}{}  [{}]\n", prefix, target.label, solution));
        }
    }

    result.push_str(&format!(
        "\n{} nodes, {} edges\n",
        graph.node_count(),
        graph.edge_count()
    ));
    result
}

pub fn generate_markdown_report(view: &ViewDescription) -> String {
    let mut report = String::new();
    report.push_str(&format!("# {}\n\n", view.title));
    report.push_str(&format!("{}\n\n", view.caption));

    match &view.body {
        ViewBody::Info(message) => {
            report.push_str(&format!("> {}\n", message));
        }
        ViewBody::Partnerships {
            header,
            cards,
            graph,
        } => {
            report.push_str(&format!("## {}\n\n", header));
            for card in cards {
                report.push_str(&format!("### {}\n\n", card.heading));
                report.push_str(&format!("#### {}\n\n", card.marketed_solution));
                report.push_str(&format!("**Partnership Type:** {}\n\n", card.partnership_type));
                report.push_str(&format!("**Services Offered:** {}\n\n", card.services_offered));
                report.push_str(&format!("**Relevant Sectors:** {}\n\n", card.sectors));
                if !card.service_tags.is_empty() {
                    report.push_str(&format!(
                        "**Service Tags:** `{}`\n\n",
                        card.service_tags.join("`, `")
                    ));
                }
                match &card.source_link {
                    Some(link) => report.push_str(&format!("**Source:** [Link]({})\n\n", link)),
                    None => report.push_str(&format!("**Source:** {}\n\n", card.source)),
                }
            }
            report.push_str("## Partnership Network Graph\n\n```\n");
            report.push_str(&generate_graph_tree(graph));
            report.push_str("```\n");
        }
        ViewBody::Network { header, graph } => {
            report.push_str(&format!("## {}\n\n```\n", header));
            report.push_str(&generate_graph_tree(graph));
            report.push_str("```\n");
        }
        ViewBody::Services { header, entries } => {
            report.push_str(&format!("## {}\n\n", header));
            report.push_str("| Security service | Who provides it | PERA layer(s) | Regulation / guidance alignment |\n");
            report.push_str("|---|---|---|---|\n");
            for entry in entries {
                report.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    escape_table_cell(&entry.service),
                    escape_table_cell(&entry.providers.join(", ")),
                    escape_table_cell(&entry.pera_layers),
                    escape_table_cell(&entry.regulations)
                ));
            }
        }
    }

    report
}

fn escape_table_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}

pub fn generate_json_report(view: &ViewDescription) -> Result<String, serde_json::Error> {
    let (kind, header, cards, services, graph) = match &view.body {
        ViewBody::Info(_) => ("info", None, None, None, None),
        ViewBody::Partnerships {
            header,
            cards,
            graph,
        } => ("partnerships", Some(header), Some(cards), None, Some(graph)),
        ViewBody::Network { header, graph } => ("network", Some(header), None, None, Some(graph)),
        ViewBody::Services { header, entries } => ("services", Some(header), None, Some(entries), None),
    };
    let message = match &view.body {
        ViewBody::Info(message) => Some(message),
        _ => None,
    };

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "partnerscope",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "view": {
                "title": view.title,
                "caption": view.caption,
                "kind": kind,
                "header": header,
                "message": message,
                "sidebar": view.sidebar
            },
            "partnerships": cards,
            "services": services,
            "graph": graph.map(|g| g.describe(&view.physics)),
            "options": view.physics.to_vis_options()
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// Standalone HTML page: the detail listing followed by the view's graph
/// drawn with vis-network.
pub fn generate_html_report(view: &ViewDescription) -> String {
    let body = match &view.body {
        ViewBody::Info(message) => format!("<p class=\"info\">{}</p>", escape_html(message)),
        ViewBody::Partnerships { cards, graph, .. } => {
            let mut body = String::new();
            for card in cards {
                body.push_str(&card_html(card));
            }
            body.push_str("<h2>Partnership Network Graph</h2>\n");
            body.push_str(&generate_graph_html(&graph.describe(&view.physics)));
            body
        }
        ViewBody::Network { graph, .. } => generate_graph_html(&graph.describe(&view.physics)),
        ViewBody::Services { entries, .. } => services_table_html(entries),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
<style>
  body {{ font-family: sans-serif; margin: 1.5rem; }}
  #graph {{ width: 100%; height: {height}; background: {background}; border: 1px solid #d0d4dc; }}
  div.vis-tooltip {{ white-space: pre-line; }}
  .info {{ padding: 1rem; background: #e8f0fe; }}
  .card {{ border: 1px solid #d0d4dc; border-radius: 4px; padding: 0.5rem 1rem; margin-bottom: 0.75rem; }}
  .tag {{ background: #e0e7ff; border-radius: 3px; padding: 0 0.3rem; margin-right: 0.3rem; }}
  table {{ border-collapse: collapse; }}
  th, td {{ border: 1px solid #d0d4dc; padding: 0.3rem 0.6rem; text-align: left; vertical-align: top; }}
</style>
</head>
<body>
<h1>{title}</h1>
<p>{caption}</p>
<h2>{header}</h2>
{body}
</body>
</html>
"#,
        title = escape_html(&view.title),
        caption = escape_html(&view.caption),
        header = escape_html(view.header().unwrap_or_default()),
        cdn = VIS_NETWORK_CDN,
        height = GRAPH_HEIGHT,
        background = GRAPH_BACKGROUND,
        body = body,
    )
}

fn card_html(card: &PartnershipCard) -> String {
    let mut html = String::from("<div class=\"card\">\n");
    html.push_str(&format!("<h3>{}</h3>\n", escape_html(&card.heading)));
    html.push_str(&format!(
        "<p><strong>Marketed Solution:</strong> {}</p>\n",
        escape_html(&card.marketed_solution)
    ));
    html.push_str(&format!(
        "<p><strong>Partnership Type:</strong> {}</p>\n",
        escape_html(&card.partnership_type)
    ));
    html.push_str(&format!(
        "<p><strong>Services Offered:</strong> {}</p>\n",
        escape_html(&card.services_offered)
    ));
    html.push_str(&format!(
        "<p><strong>Sectors:</strong> {}</p>\n",
        escape_html(&card.sectors)
    ));
    if !card.service_tags.is_empty() {
        let tags: Vec<String> = card
            .service_tags
            .iter()
            .map(|tag| format!("<span class=\"tag\">{}</span>", escape_html(tag)))
            .collect();
        html.push_str(&format!(
            "<p><strong>Service Tags:</strong> {}</p>\n",
            tags.join("")
        ));
    }
    let source = match &card.source_link {
        Some(link) => format!("<a href=\"{}\">Link</a>", escape_html(link)),
        None => escape_html(&card.source),
    };
    html.push_str(&format!("<p><strong>Source:</strong> {}</p>\n", source));
    html.push_str("</div>\n");
    html
}

fn services_table_html(entries: &[ServiceEntry]) -> String {
    let mut html = String::from(
        "<table>\n<tr><th>Security Service</th><th>Providers</th><th>PERA Layers</th><th>Regulations</th></tr>\n",
    );
    for entry in entries {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&entry.service),
            escape_html(&entry.providers.join(", ")),
            escape_html(&entry.pera_layers),
            escape_html(&entry.regulations),
        ));
    }
    html.push_str("</table>");
    html
}

/// The graph container and the script instantiating the network.
pub fn generate_graph_html(graph: &GraphDescription) -> String {
    let nodes: Vec<serde_json::Value> = graph
        .nodes
        .iter()
        .map(|node| {
            let mut value = serde_json::json!({
                "id": node.id,
                "label": node.label,
                "size": node.size,
                "color": node.color,
                "shape": node.shape,
                "title": node.group.clone().unwrap_or_else(|| node.label.clone()),
            });
            if let Some(group) = &node.group {
                value["group"] = serde_json::json!(group);
            }
            if let Some(font_size) = node.font_size {
                value["font"] = serde_json::json!({ "size": font_size });
            }
            value
        })
        .collect();
    let edges: Vec<serde_json::Value> = graph
        .edges
        .iter()
        .map(|edge| serde_json::json!({ "from": edge.from, "to": edge.to, "title": edge.title }))
        .collect();

    format!(
        r#"<div id="graph"></div>
<script type="text/javascript">
  var nodes = new vis.DataSet({nodes});
  var edges = new vis.DataSet({edges});
  var options = {options};
  new vis.Network(document.getElementById("graph"), {{ nodes: nodes, edges: edges }}, options);
</script>"#,
        nodes = script_safe_json(&serde_json::Value::Array(nodes)),
        edges = script_safe_json(&serde_json::Value::Array(edges)),
        options = script_safe_json(&graph.options()),
    )
}

/// JSON that cannot terminate the surrounding `<script>` element.
fn script_safe_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.len() + word.len() + 1 > width - indent.len() && !current_line.is_empty() {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}
