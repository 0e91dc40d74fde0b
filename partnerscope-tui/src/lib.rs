pub mod panels;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use partnerscope_core::model::{DatasetKind, FilterDimension};
use partnerscope_core::{
    DashboardState, DataSources, DatasetCache, PhysicsConfig, ViewDescription, ViewMode, render,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

pub use panels::{GraphRenderError, MAX_TUI_NODES, graph_lines};

const PAGE_SIZE: usize = 10;

/// Sidebar section receiving ↑/↓/Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Dataset,
    Dimension,
    Values,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Dataset => Focus::Dimension,
            Focus::Dimension => Focus::Values,
            Focus::Values => Focus::Dataset,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Dataset => Focus::Values,
            Focus::Dimension => Focus::Dataset,
            Focus::Values => Focus::Dimension,
        }
    }
}

/// Dashboard state plus the rendered view for the current selection.
pub struct App {
    sources: DataSources,
    cache: DatasetCache,
    physics: PhysicsConfig,
    pub(crate) state: DashboardState,
    pub(crate) view: Option<ViewDescription>,
    pub(crate) load_error: Option<String>,
    pub(crate) focus: Focus,
    pub(crate) dataset_cursor: usize,
    pub(crate) dimension_cursor: usize,
    pub(crate) value_cursor: usize,
    pub(crate) scroll: usize,
    should_quit: bool,
}

impl App {
    pub fn new(sources: DataSources, physics: PhysicsConfig) -> Self {
        Self::with_state(sources, physics, DashboardState::default())
    }

    pub fn with_state(sources: DataSources, physics: PhysicsConfig, state: DashboardState) -> Self {
        let dataset_cursor = DatasetKind::ALL
            .iter()
            .position(|kind| *kind == state.dataset)
            .unwrap_or(0);
        let dimension_cursor = FilterDimension::ALL
            .iter()
            .position(|dimension| *dimension == state.dimension)
            .unwrap_or(0);

        let mut app = Self {
            sources,
            cache: DatasetCache::new(),
            physics,
            state,
            view: None,
            load_error: None,
            focus: Focus::Values,
            dataset_cursor,
            dimension_cursor,
            value_cursor: 0,
            scroll: 0,
            should_quit: false,
        };
        app.refresh();
        app
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> Option<&ViewDescription> {
        self.view.as_ref()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Reload (through the cache) and re-render the current state.
    fn refresh(&mut self) {
        let path = self.sources.path_for(self.state.dataset);
        match self.cache.get_or_load(&path, self.state.dataset) {
            Ok(dataset) => {
                let view = render(&self.state, &dataset, &self.physics);
                self.value_cursor = view
                    .sidebar
                    .selected
                    .as_ref()
                    .and_then(|selected| view.sidebar.values.iter().position(|v| v == selected))
                    .unwrap_or(0);
                self.view = Some(view);
                self.load_error = None;
            }
            Err(e) => {
                self.view = None;
                self.load_error = Some(e.to_string());
            }
        }
        self.scroll = 0;
    }

    fn values_len(&self) -> usize {
        self.view
            .as_ref()
            .map(|view| view.sidebar.values.len())
            .unwrap_or(0)
    }

    fn move_cursor(&mut self, down: bool) {
        let (cursor, len) = match self.focus {
            Focus::Dataset => (&mut self.dataset_cursor, DatasetKind::ALL.len()),
            Focus::Dimension => (&mut self.dimension_cursor, FilterDimension::ALL.len()),
            Focus::Values => {
                let len = self.values_len();
                (&mut self.value_cursor, len)
            }
        };
        if len == 0 {
            return;
        }
        *cursor = if down {
            (*cursor + 1).min(len - 1)
        } else {
            cursor.saturating_sub(1)
        };
    }

    fn select(&mut self) {
        match self.focus {
            Focus::Dataset => {
                let kind = DatasetKind::ALL[self.dataset_cursor];
                if kind != self.state.dataset {
                    self.state = DashboardState::new(kind).with_dimension(self.state.dimension);
                    self.refresh();
                }
            }
            Focus::Dimension => {
                let dimension = FilterDimension::ALL[self.dimension_cursor];
                if self.state.dataset.is_partnership_table() && dimension != self.state.dimension {
                    self.state.dimension = dimension;
                    self.state.selection = None;
                    self.refresh();
                }
            }
            Focus::Values => {
                let Some(value) = self
                    .view
                    .as_ref()
                    .and_then(|view| view.sidebar.values.get(self.value_cursor))
                    .cloned()
                else {
                    return;
                };
                if self.state.dataset.is_partnership_table() {
                    self.state.selection = Some(value);
                    self.state.view_mode = ViewMode::PerEntity;
                } else if self.state.provider.as_deref() == Some(value.as_str()) {
                    // Selecting the active provider again shows the whole catalog
                    self.state.provider = None;
                } else {
                    self.state.provider = Some(value);
                }
                self.refresh();
            }
        }
    }

    fn toggle_network(&mut self) {
        if !self.state.dataset.is_partnership_table() || self.load_error.is_some() {
            return;
        }
        self.state.view_mode = match self.state.view_mode {
            ViewMode::PerEntity => ViewMode::FullNetwork,
            ViewMode::FullNetwork => ViewMode::PerEntity,
        };
        self.refresh();
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
            }
            KeyCode::Up => self.move_cursor(false),
            KeyCode::Down => self.move_cursor(true),
            KeyCode::Enter => self.select(),
            KeyCode::Char('n') => self.toggle_network(),
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(PAGE_SIZE);
            }
            KeyCode::PageDown => {
                self.scroll += PAGE_SIZE;
            }
            KeyCode::Home => {
                self.scroll = 0;
            }
            _ => {}
        }
    }
}

pub fn run(sources: DataSources, physics: PhysicsConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(sources, physics);

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| panels::draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Only process KeyPress events, ignore KeyRelease
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key.code);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use partnerscope_core::ViewBody;
    use ratatui::backend::TestBackend;
    use std::fs;
    use tempfile::TempDir;

    const PARTNERSHIPS_CSV: &str = "\
security_provider,automation_company,marketed_solution,partnership_type,services_offered,sectors,sources
Claroty,ABB,Solution A,Alliance,Monitoring,Energy,https://example.com/a
Claroty,Siemens,Solution B,Alliance,Monitoring,Water,
Dragos,Siemens,Solution C,Reseller,Response,Water,
";

    const SERVICES_CSV: &str = "\
Security service,Who provides it,PERA layer(s),Regulation / guidance alignment
Asset inventory,\"Claroty, Dragos\",Levels 0-3,IEC 62443-2-1
Remote access,Claroty,Level 3.5,NERC CIP-005
";

    fn fixture_sources(dir: &TempDir) -> DataSources {
        fs::write(
            dir.path().join(DatasetKind::Comprehensive.file_name()),
            PARTNERSHIPS_CSV,
        )
        .unwrap();
        fs::write(dir.path().join(DatasetKind::Services.file_name()), SERVICES_CSV).unwrap();
        DataSources::new(dir.path())
    }

    fn header(app: &App) -> Option<String> {
        app.view().and_then(|view| view.header()).map(str::to_string)
    }

    #[test]
    fn starts_on_first_provider() {
        let dir = TempDir::new().unwrap();
        let app = App::new(fixture_sources(&dir), PhysicsConfig::default());

        assert!(app.load_error().is_none());
        assert_eq!(
            header(&app).as_deref(),
            Some("Automation companies partnering with: Claroty")
        );
        assert_eq!(app.focus(), Focus::Values);
    }

    #[test]
    fn moving_and_selecting_values() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(fixture_sources(&dir), PhysicsConfig::default());

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.state().selection.as_deref(), Some("Dragos"));
        assert_eq!(
            header(&app).as_deref(),
            Some("Automation companies partnering with: Dragos")
        );

        // Cursor stops at the last value
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.state().selection.as_deref(), Some("Dragos"));
    }

    #[test]
    fn switching_dimension_resets_selection() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(fixture_sources(&dir), PhysicsConfig::default());

        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.focus(), Focus::Dimension);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.state().dimension, FilterDimension::AutomationCompany);
        assert_eq!(
            header(&app).as_deref(),
            Some("Security providers partnering with: ABB")
        );
    }

    #[test]
    fn toggling_the_full_network() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(fixture_sources(&dir), PhysicsConfig::default());

        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.state().view_mode, ViewMode::FullNetwork);
        let Some(ViewBody::Network { graph, .. }) = app.view().map(|view| &view.body) else {
            panic!("expected the full network");
        };
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 3);

        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.state().view_mode, ViewMode::PerEntity);
    }

    #[test]
    fn missing_dataset_shows_error() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(fixture_sources(&dir), PhysicsConfig::default());

        app.handle_key(KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Dataset);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.state().dataset, DatasetKind::WaterUtilities);
        assert!(app.view().is_none());
        let error = app.load_error().unwrap();
        assert!(error.contains("Water_Utilities-focused_partnerships.csv"));

        // Switching back recovers from the cache
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Enter);
        assert!(app.load_error().is_none());
        assert!(app.view().is_some());
    }

    #[test]
    fn services_provider_toggles() {
        let dir = TempDir::new().unwrap();
        let state = DashboardState::new(DatasetKind::Services);
        let mut app = App::with_state(fixture_sources(&dir), PhysicsConfig::default(), state);

        assert_eq!(header(&app).as_deref(), Some("All security services (2)"));

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        assert_eq!(
            header(&app).as_deref(),
            Some("Security services offered by: Dragos")
        );

        app.handle_key(KeyCode::Enter);
        assert_eq!(header(&app).as_deref(), Some("All security services (2)"));

        // No network mode for the catalog
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.state().view_mode, ViewMode::PerEntity);
    }

    #[test]
    fn scroll_and_quit_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(fixture_sources(&dir), PhysicsConfig::default());

        app.handle_key(KeyCode::PageDown);
        app.handle_key(KeyCode::PageDown);
        assert_eq!(app.scroll(), 2 * PAGE_SIZE);
        app.handle_key(KeyCode::PageUp);
        assert_eq!(app.scroll(), PAGE_SIZE);

        assert!(!app.should_quit());
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn long_star_graph_scrolls_with_the_details() {
        let dir = TempDir::new().unwrap();
        let mut csv = String::from(
            "security_provider,automation_company,marketed_solution,partnership_type,services_offered,sectors,sources\n",
        );
        for i in 0..40 {
            csv.push_str(&format!("Claroty,Company {:02},Sol,Alliance,Monitoring,Water,\n", i));
        }
        fs::write(dir.path().join(DatasetKind::Comprehensive.file_name()), csv).unwrap();
        let mut app = App::new(DataSources::new(dir.path()), PhysicsConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(120, 24)).unwrap();

        let screen = |terminal: &Terminal<TestBackend>| -> String {
            terminal
                .backend()
                .buffer()
                .content()
                .iter()
                .map(|cell| cell.symbol())
                .collect()
        };

        terminal.draw(|f| panels::draw(f, &app)).unwrap();
        assert!(!screen(&terminal).contains("└── Company 39"));

        for _ in 0..5 {
            app.handle_key(KeyCode::PageDown);
        }
        terminal.draw(|f| panels::draw(f, &app)).unwrap();
        assert!(screen(&terminal).contains("└── Company 39"));
    }

    #[test]
    fn draws_without_panicking() {
        let dir = TempDir::new().unwrap();
        let mut app = App::new(fixture_sources(&dir), PhysicsConfig::default());
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();

        terminal.draw(|f| panels::draw(f, &app)).unwrap();
        app.handle_key(KeyCode::Char('n'));
        terminal.draw(|f| panels::draw(f, &app)).unwrap();

        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        terminal.draw(|f| panels::draw(f, &app)).unwrap();
    }
}
