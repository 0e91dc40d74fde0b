use crate::{App, Focus};
use partnerscope_core::model::{DatasetKind, FilterDimension, ServiceEntry};
use partnerscope_core::report::generate_graph_tree;
use partnerscope_core::view::{PartnershipCard, ViewBody, ViewMode};
use partnerscope_core::PartnershipGraph;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use thiserror::Error;

/// Largest graph the terminal view will draw.
pub const MAX_TUI_NODES: usize = 500;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphRenderError {
    #[error("Could not generate graph: {nodes} nodes exceeds the terminal limit of {limit}")]
    TooLarge { nodes: usize, limit: usize },
}

/// Text tree for the graph panel.
pub fn graph_lines(graph: &PartnershipGraph) -> Result<Vec<String>, GraphRenderError> {
    if graph.node_count() > MAX_TUI_NODES {
        return Err(GraphRenderError::TooLarge {
            nodes: graph.node_count(),
            limit: MAX_TUI_NODES,
        });
    }
    Ok(generate_graph_tree(graph)
        .lines()
        .map(|line| line.to_string())
        .collect())
}

pub(crate) fn draw(f: &mut Frame, app: &App) {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Main area
            Constraint::Length(1), // Hints bar
        ])
        .split(f.area());

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(34), // Sidebar
            Constraint::Min(40),    // Details
        ])
        .split(vertical_chunks[0]);

    render_sidebar(f, app, main_chunks[0]);
    match &app.load_error {
        Some(message) => render_error(f, message, main_chunks[1]),
        None => render_details(f, app, main_chunks[1]),
    }
    render_hints(f, app, vertical_chunks[1]);
}

fn focus_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn item_style(highlighted: bool, active: bool) -> Style {
    let mut style = if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    if highlighted {
        style = style.bg(Color::DarkGray);
    }
    style
}

fn render_sidebar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Dataset selector
            Constraint::Length(5), // Filter dimension + mode
            Constraint::Min(3),    // Values
        ])
        .split(area);

    // Dataset selector
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Dataset ")
        .border_style(focus_style(app, Focus::Dataset));
    let items: Vec<ListItem> = DatasetKind::ALL
        .iter()
        .enumerate()
        .map(|(idx, kind)| {
            let highlighted = app.focus == Focus::Dataset && idx == app.dataset_cursor;
            ListItem::new(kind.label()).style(item_style(highlighted, *kind == app.state.dataset))
        })
        .collect();
    f.render_widget(List::new(items).block(block), chunks[0]);

    // Filter dimension
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Filter by ")
        .border_style(focus_style(app, Focus::Dimension));
    if app.state.dataset.is_partnership_table() {
        let mut items: Vec<ListItem> = FilterDimension::ALL
            .iter()
            .enumerate()
            .map(|(idx, dimension)| {
                let highlighted = app.focus == Focus::Dimension && idx == app.dimension_cursor;
                ListItem::new(dimension.label())
                    .style(item_style(highlighted, *dimension == app.state.dimension))
            })
            .collect();
        let mode = match app.state.view_mode {
            ViewMode::PerEntity => "Mode: per entity",
            ViewMode::FullNetwork => "Mode: full network",
        };
        items.push(ListItem::new(mode).style(Style::default().fg(Color::Magenta)));
        f.render_widget(List::new(items).block(block), chunks[1]);
    } else {
        let hint = Paragraph::new("Security providers")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, chunks[1]);
    }

    render_values(f, app, chunks[2]);
}

fn render_values(f: &mut Frame, app: &App, area: Rect) {
    let values = app
        .view
        .as_ref()
        .map(|view| view.sidebar.values.as_slice())
        .unwrap_or_default();
    let selected = app
        .view
        .as_ref()
        .and_then(|view| view.sidebar.selected.as_deref());

    let title = format!(" Values ({}) ", values.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(focus_style(app, Focus::Values));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let height = inner.height as usize;
    if values.is_empty() {
        let empty_msg = Paragraph::new("Nothing to select")
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        f.render_widget(empty_msg, inner);
        return;
    }

    // Keep the cursor visible
    let scroll_offset = if app.value_cursor >= height {
        app.value_cursor + 1 - height
    } else {
        0
    };

    let items: Vec<ListItem> = values
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(height)
        .map(|(idx, value)| {
            let highlighted = app.focus == Focus::Values && idx == app.value_cursor;
            ListItem::new(value.as_str())
                .style(item_style(highlighted, Some(value.as_str()) == selected))
        })
        .collect();
    f.render_widget(List::new(items), inner);

    if values.len() > height {
        render_scrollbar(f, area, values.len(), height, scroll_offset);
    }
}

fn render_details(f: &mut Frame, app: &App, area: Rect) {
    let Some(view) = &app.view else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title + caption
            Constraint::Min(5),    // Body
        ])
        .split(area);

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            view.title.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            view.caption.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true });
    f.render_widget(heading, chunks[0]);

    match &view.body {
        ViewBody::Info(message) => {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(" Info ")
                .border_style(Style::default().fg(Color::Blue));
            let info = Paragraph::new(format!("ℹ {}", message))
                .style(Style::default().fg(Color::Blue))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(info, chunks[1]);
        }
        ViewBody::Partnerships {
            header,
            cards,
            graph,
        } => {
            let body_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(55), // Cards
                    Constraint::Percentage(45), // Graph
                ])
                .split(chunks[1]);
            let lines = card_lines(cards);
            render_scrolled(f, header, lines, app.scroll, Color::Cyan, body_chunks[0]);
            render_graph(f, graph, app.scroll, body_chunks[1]);
        }
        ViewBody::Network { header, graph } => {
            render_graph_titled(f, header, graph, app.scroll, chunks[1]);
        }
        ViewBody::Services { header, entries } => {
            let lines = service_lines(entries);
            render_scrolled(f, header, lines, app.scroll, Color::Green, chunks[1]);
        }
    }
}

fn card_lines(cards: &[PartnershipCard]) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();
    for card in cards {
        lines.push(Line::from(Span::styled(
            card.heading.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            card.marketed_solution.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::styled("Type:     ", label),
            Span::raw(card.partnership_type.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Services: ", label),
            Span::raw(card.services_offered.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Sectors:  ", label),
            Span::raw(card.sectors.clone()),
        ]));
        if !card.service_tags.is_empty() {
            let mut spans = vec![Span::styled("Tags:     ", label)];
            for tag in &card.service_tags {
                spans.push(Span::styled(
                    format!(" {} ", tag),
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                ));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
        let source_style = if card.source_link.is_some() {
            Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::styled("Source:   ", label),
            Span::styled(card.source.clone(), source_style),
        ]));
        lines.push(Line::from(""));
    }
    lines
}

fn service_lines(entries: &[ServiceEntry]) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();
    for entry in entries {
        lines.push(Line::from(Span::styled(
            entry.service.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(vec![
            Span::styled("PERA:        ", label),
            Span::raw(entry.pera_layers.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Regulations: ", label),
            Span::raw(entry.regulations.clone()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Providers:   ", label),
            Span::styled(entry.providers.join(", "), Style::default().fg(Color::Cyan)),
        ]));
        lines.push(Line::from(""));
    }
    lines
}

fn render_scrolled(
    f: &mut Frame,
    title: &str,
    lines: Vec<Line<'static>>,
    scroll: usize,
    color: Color,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let height = inner.height as usize;
    let total_lines = lines.len();
    let scroll_offset = scroll.min(total_lines.saturating_sub(height));

    let paragraph = Paragraph::new(lines).scroll((scroll_offset as u16, 0));
    f.render_widget(paragraph, inner);

    if total_lines > height {
        render_scrollbar(f, area, total_lines, height, scroll_offset);
    }
}

fn render_graph(f: &mut Frame, graph: &PartnershipGraph, scroll: usize, area: Rect) {
    render_graph_titled(f, "Partnership Network Graph", graph, scroll, area);
}

fn render_graph_titled(f: &mut Frame, title: &str, graph: &PartnershipGraph, scroll: usize, area: Rect) {
    match graph_lines(graph) {
        Ok(lines) => {
            let lines: Vec<Line<'static>> = lines
                .into_iter()
                .map(|line| {
                    if line.starts_with("├──") || line.starts_with("└──") {
                        Line::from(Span::styled(line, Style::default().fg(Color::Green)))
                    } else {
                        Line::from(Span::styled(
                            line,
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ))
                    }
                })
                .collect();
            render_scrolled(f, title, lines, scroll, Color::Magenta, area);
        }
        Err(e) => {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title))
                .border_style(Style::default().fg(Color::Red));
            let error = Paragraph::new(e.to_string())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(error, area);
        }
    }
}

fn render_error(f: &mut Frame, message: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Error ")
        .border_style(Style::default().fg(Color::Red));
    let text = vec![
        Line::from(Span::styled(
            format!("✗ {}", message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Run `partnerscope init` or point the dataset at another file."),
    ];
    let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
    f.render_widget(paragraph, area);
}

fn render_scrollbar(f: &mut Frame, area: Rect, total_items: usize, visible_items: usize, scroll_offset: usize) {
    let scrollbar_height = area.height.saturating_sub(2) as usize; // -2 for borders
    if scrollbar_height == 0 || total_items <= visible_items {
        return;
    }

    let thumb_size = ((visible_items as f32 / total_items as f32) * scrollbar_height as f32)
        .max(1.0)
        .floor() as usize;

    let scroll_ratio = scroll_offset as f32 / (total_items - visible_items) as f32;
    let thumb_position = (scroll_ratio * scrollbar_height.saturating_sub(thumb_size) as f32)
        .floor() as usize;

    let scrollbar_x = area.x + area.width - 1;
    let scrollbar_start_y = area.y + 1; // +1 for top border

    for i in 0..scrollbar_height {
        let in_thumb = i >= thumb_position && i < thumb_position + thumb_size;
        let (symbol, style) = if in_thumb {
            ("█", Style::default().fg(Color::Cyan))
        } else {
            ("│", Style::default().fg(Color::DarkGray))
        };

        f.render_widget(
            Paragraph::new(symbol).style(style),
            Rect {
                x: scrollbar_x,
                y: scrollbar_start_y + i as u16,
                width: 1,
                height: 1,
            },
        );
    }
}

fn render_hints(f: &mut Frame, app: &App, area: Rect) {
    let key = Style::default().fg(Color::Black).bg(Color::Gray);
    let mut spans = vec![
        Span::styled(" q/ESC ", key),
        Span::raw(" Exit  "),
        Span::styled(" Tab ", key),
        Span::raw(" Focus  "),
        Span::styled(" ↑/↓ ", key),
        Span::raw(" Move  "),
        Span::styled(" Enter ", key),
        Span::raw(" Select  "),
    ];
    if app.load_error.is_none() {
        if app.state.dataset.is_partnership_table() {
            spans.push(Span::styled(" n ", key));
            spans.push(Span::raw(" Network  "));
        }
        spans.push(Span::styled(" PgUp/PgDn ", key));
        spans.push(Span::raw(" Scroll"));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::Black).fg(Color::Gray));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use partnerscope_core::model::Relationship;
    use partnerscope_core::build_bipartite_graph;

    #[test]
    fn graph_lines_draws_small_graphs() {
        let rows = vec![Relationship::new("A1", "S1").with_solution("X")];
        let lines = graph_lines(&build_bipartite_graph(&rows)).unwrap();
        assert_eq!(lines[0], "A1");
        assert_eq!(lines[1], "└── S1  [X]");
    }

    #[test]
    fn graph_lines_refuses_large_graphs() {
        let rows: Vec<Relationship> = (0..MAX_TUI_NODES)
            .map(|i| Relationship::new(format!("A{}", i), "S"))
            .collect();
        let graph = build_bipartite_graph(&rows);
        assert_eq!(graph.node_count(), MAX_TUI_NODES + 1);

        let err = graph_lines(&graph).unwrap_err();
        assert_eq!(
            err,
            GraphRenderError::TooLarge {
                nodes: MAX_TUI_NODES + 1,
                limit: MAX_TUI_NODES
            }
        );
        assert!(err.to_string().starts_with("Could not generate graph"));
    }
}
