use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use pager::Pager;
use partnerscope_core::config::{DataSources, PhysicsConfig, Solver};
use partnerscope_core::data::load_dataset;
use partnerscope_core::model::{Dataset, DatasetKind, FilterDimension};
use partnerscope_core::query::{distinct_providers, distinct_values};
use partnerscope_core::report::{ReportFormat, generate_html_report, generate_report, save_report};
use partnerscope_core::view::{DashboardState, ViewDescription, ViewMode, render};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_DATA_DIR: &str = "~/.config/partnerscope/data/";

const BUNDLED_DATASETS: [(DatasetKind, &str); 3] = [
    (
        DatasetKind::Comprehensive,
        include_str!("../datasets/ot_partnerships_relations.csv"),
    ),
    (
        DatasetKind::WaterUtilities,
        include_str!("../datasets/Water_Utilities-focused_partnerships.csv"),
    ),
    (
        DatasetKind::Services,
        include_str!("../datasets/ot_security_services.csv"),
    ),
];

/// Install a stderr subscriber; DEBUG when verbose, INFO otherwise.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    // A second call (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Dataset locations from `--data-dir` and the per-dataset overrides.
pub fn sources_from_args(args: &ArgMatches) -> DataSources {
    let data_dir = args
        .get_one::<String>("data-dir")
        .map(String::as_str)
        .unwrap_or(DEFAULT_DATA_DIR);
    let mut sources = DataSources::new(expand_path(data_dir));

    for (kind, flag) in [
        (DatasetKind::Comprehensive, "comprehensive"),
        (DatasetKind::WaterUtilities, "water"),
        (DatasetKind::Services, "services"),
    ] {
        if let Some(path) = args.get_one::<PathBuf>(flag) {
            sources = sources.with_override(kind, expand_path(&path.to_string_lossy()));
        }
    }
    sources
}

pub fn physics_from_args(args: &ArgMatches) -> PhysicsConfig {
    let mut physics = PhysicsConfig::default();
    if let Some(solver) = args
        .get_one::<String>("solver")
        .and_then(|s| Solver::from_str(s))
    {
        physics.solver = solver;
    }
    if let Some(gravity) = args.get_one::<f64>("gravity") {
        physics.gravitational_constant = *gravity;
    }
    if let Some(spring_length) = args.get_one::<f64>("spring-length") {
        physics.spring_length = *spring_length;
    }
    physics
}

fn dataset_from_args(args: &ArgMatches) -> Result<DatasetKind> {
    let name = args
        .get_one::<String>("dataset")
        .map(String::as_str)
        .unwrap_or("comprehensive");
    DatasetKind::from_str(name).ok_or_else(|| anyhow!("Unknown dataset '{}'", name))
}

fn dimension_from_args(args: &ArgMatches) -> Result<FilterDimension> {
    let name = args
        .get_one::<String>("by")
        .map(String::as_str)
        .unwrap_or("provider");
    FilterDimension::from_str(name).ok_or_else(|| anyhow!("Unknown filter dimension '{}'", name))
}

/// Dashboard state described by the `explore` flags.
pub fn state_from_args(args: &ArgMatches) -> Result<DashboardState> {
    let mut state =
        DashboardState::new(dataset_from_args(args)?).with_dimension(dimension_from_args(args)?);

    if let Some(value) = args.get_one::<String>("value") {
        state = state.with_selection(value.clone());
    }
    if args.get_flag("network") {
        if !state.dataset.is_partnership_table() {
            bail!("--network needs a partnership dataset, not '{}'", state.dataset.as_str());
        }
        state = state.with_view_mode(ViewMode::FullNetwork);
    }
    if let Some(provider) = args.get_one::<String>("provider") {
        state = state.with_provider(provider.clone());
    }
    Ok(state)
}

/// Sorted filter values of a dataset; provider names for the services catalog.
pub fn dataset_values(
    sources: &DataSources,
    kind: DatasetKind,
    dimension: FilterDimension,
) -> Result<Vec<String>> {
    let dataset = load_dataset(&sources.path_for(kind), kind)?;
    Ok(match &dataset {
        Dataset::Partnerships(table) => distinct_values(&table.rows, dimension),
        Dataset::Services(catalog) => distinct_providers(&catalog.entries),
    })
}

pub fn render_view(
    sources: &DataSources,
    state: &DashboardState,
    physics: &PhysicsConfig,
) -> Result<ViewDescription> {
    let path = sources.path_for(state.dataset);
    let dataset = load_dataset(&path, state.dataset)?;
    debug!(dataset = state.dataset.as_str(), rows = dataset.len(), "Rendering view");
    Ok(render(state, &dataset, physics))
}

/// Write the view's graph as a standalone vis-network page.
pub fn write_graph_html(view: &ViewDescription, path: &Path) -> Result<()> {
    let graph = view
        .graph()
        .ok_or_else(|| anyhow!("the current view has no graph"))?;
    let description = graph.describe(&view.physics);
    if description.is_empty() {
        bail!("the graph has no nodes");
    }

    let page = generate_html_report(view);
    debug!(
        nodes = description.nodes.len(),
        edges = description.edges.len(),
        "Writing graph page"
    );
    save_report(&page, path).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Bundled datasets already present in `dir`.
pub fn existing_datasets(dir: &Path) -> Vec<PathBuf> {
    BUNDLED_DATASETS
        .iter()
        .map(|(kind, _)| dir.join(kind.file_name()))
        .filter(|path| path.exists())
        .collect()
}

/// Write the bundled sample datasets into `dir`, returning the written paths.
pub fn install_datasets(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create data directory {}", dir.display()))?;

    let mut written = Vec::new();
    for (kind, content) in BUNDLED_DATASETS {
        let path = dir.join(kind.file_name());
        fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_prompt(msg: &str) -> io::Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush()?;
    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().to_lowercase())
}

pub fn handle_init(args: &ArgMatches) -> Result<()> {
    print_divider();
    println!("{}", "  PARTNERSCOPE INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    let target = args
        .get_one::<String>("PATH")
        .or_else(|| args.get_one::<String>("data-dir"))
        .map(String::as_str)
        .unwrap_or(DEFAULT_DATA_DIR);
    let force = args.get_flag("force");
    let data_dir = expand_path(target);

    println!(
        "{} Target: {}",
        "→".blue(),
        data_dir.display().to_string().bright_white()
    );
    println!();

    let existing = existing_datasets(&data_dir);
    if !existing.is_empty() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!("Datasets already exist:");
        for path in &existing {
            println!(
                "  {} {}",
                "•".yellow(),
                path.display().to_string().bright_white()
            );
        }
        println!();
        println!("{}", "This operation will overwrite existing files.".yellow());

        let response = print_prompt("Do you want to continue? [y/N]:")?;
        println!();

        if response != "y" && response != "yes" {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return Ok(());
        }
        println!("{} Proceeding with overwrite", "→".yellow().bold());
        println!();
    }

    println!("{} Installing sample datasets...", "→".blue());
    let written = install_datasets(&data_dir)?;
    for path in &written {
        let rows = fs::read_to_string(path)
            .map(|content| content.lines().count().saturating_sub(1))
            .unwrap_or(0);
        println!(
            "  {} {} ({} rows)",
            "✓".green().bold(),
            path.display().to_string().bright_white(),
            rows.to_string().cyan()
        );
    }
    info!(dir = %data_dir.display(), files = written.len(), "Installed sample datasets");

    println!();
    print_divider();
    println!("{}", "  INITIALIZATION COMPLETE".green().bold());
    print_divider();
    println!();
    Ok(())
}

pub fn handle_values(args: &ArgMatches) -> Result<()> {
    let sources = sources_from_args(args);
    let kind = dataset_from_args(args)?;
    let dimension = dimension_from_args(args)?;

    let values = dataset_values(&sources, kind, dimension)?;
    let heading = if kind.is_partnership_table() {
        dimension.label()
    } else {
        "Security Provider"
    };
    println!(
        "{} ({})",
        heading.bright_white().bold(),
        values.len().to_string().cyan()
    );
    for value in values {
        println!("  {} {}", "•".blue(), value);
    }
    Ok(())
}

pub fn handle_explore(args: &ArgMatches) -> Result<()> {
    let sources = sources_from_args(args);
    let physics = physics_from_args(args);
    let state = state_from_args(args)?;
    debug!(data_dir = %sources.data_dir().display(), "Resolved data sources");
    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| anyhow!("Unknown report format '{}'", format_name))?;

    let view = render_view(&sources, &state, &physics)?;
    let report = generate_report(&view, format)?;

    // The graph page is optional; its failure never suppresses the listing
    if let Some(graph_path) = args.get_one::<PathBuf>("graph-output") {
        match write_graph_html(&view, graph_path) {
            Ok(()) => eprintln!(
                "{} Graph written to {}",
                "✓".green().bold(),
                graph_path.display().to_string().bright_white()
            ),
            Err(e) => eprintln!("{} Could not generate graph: {:#}", "⚠".yellow().bold(), e),
        }
    }

    if let Some(output) = args.get_one::<PathBuf>("output") {
        let output = if output.extension().is_none() {
            output.with_extension(format.extension())
        } else {
            output.clone()
        };
        save_report(&report, &output)
            .with_context(|| format!("failed to save report to {}", output.display()))?;
        println!(
            "{} Report saved to {}",
            "✓".green().bold(),
            output.display().to_string().bright_white()
        );
        return Ok(());
    }

    if format == ReportFormat::Text {
        Pager::with_pager("less -R").setup();
    }
    print!("{}", report);
    Ok(())
}

pub fn handle_ui(args: &ArgMatches) -> Result<()> {
    let sources = sources_from_args(args);
    let physics = physics_from_args(args);
    partnerscope_tui::run(sources, physics)
}
