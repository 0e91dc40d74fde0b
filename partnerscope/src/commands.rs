use crate::CLAP_STYLING;
use clap::{arg, command};
use std::path::PathBuf;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("partnerscope")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("partnerscope")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log debug output to stderr")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"data-dir" <PATH>)
                .required(false)
                .help("Directory holding the partnership datasets")
                .default_value(crate::handlers::DEFAULT_DATA_DIR)
                .global(true),
        )
        .arg(
            arg!(--"comprehensive" <PATH>)
                .required(false)
                .help("Read the comprehensive partnerships table from this file")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            arg!(--"water" <PATH>)
                .required(false)
                .help("Read the water utilities partnerships table from this file")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            arg!(--"services" <PATH>)
                .required(false)
                .help("Read the security services catalog from this file")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("init")
                .about("Installs the bundled sample datasets into the data directory")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Directory to install the datasets into (default: --data-dir)"),
                )
                .arg(
                    arg!(-f --"force")
                        .help("Overwrite existing datasets without asking")
                        .required(false),
                ),
        )
        .subcommand(
            command!("values")
                .about("Lists the distinct values a dataset can be filtered on")
                .arg(dataset_arg())
                .arg(dimension_arg()),
        )
        .subcommand(
            command!("explore")
                .about("Renders the partnerships of one entity, the full network or the services catalog")
                .arg(dataset_arg())
                .arg(dimension_arg())
                .arg(
                    arg!(--"value" <NAME>)
                        .required(false)
                        .help("Entity to center the graph on (default: first in sorted order)")
                        .conflicts_with("network"),
                )
                .arg(
                    arg!(--"network")
                        .required(false)
                        .help("Show every partnership in the dataset as one network")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"provider" <NAME>)
                        .required(false)
                        .help("Only list services offered by this provider (services dataset)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, html, dot, markdown")
                        .value_parser(["text", "json", "html", "dot", "markdown", "md"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--"graph-output" <PATH>)
                        .required(false)
                        .help("Also write the interactive HTML graph to this file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .args(physics_args()),
        )
        .subcommand(
            command!("ui")
                .about("Launches the interactive terminal dashboard")
                .args(physics_args()),
        )
}

fn dataset_arg() -> clap::Arg {
    arg!(-d --"dataset" <DATASET>)
        .required(false)
        .help("Dataset to read: comprehensive, water, services")
        .value_parser(["comprehensive", "water", "services"])
        .default_value("comprehensive")
}

fn dimension_arg() -> clap::Arg {
    arg!(-b --"by" <DIMENSION>)
        .required(false)
        .help("Column to filter on: provider, company")
        .value_parser(["provider", "company"])
        .default_value("provider")
}

fn physics_args() -> Vec<clap::Arg> {
    vec![
        arg!(--"solver" <SOLVER>)
            .required(false)
            .help("Layout solver used by the graph host")
            .value_parser([
                "barnesHut",
                "forceAtlas2Based",
                "repulsion",
                "hierarchicalRepulsion",
            ])
            .default_value("barnesHut"),
        arg!(--"gravity" <VALUE>)
            .required(false)
            .help("Gravitational constant; negative values push nodes apart")
            .value_parser(clap::value_parser!(f64))
            .allow_negative_numbers(true)
            .default_value("-30000"),
        arg!(--"spring-length" <VALUE>)
            .required(false)
            .help("Rest length of the edges")
            .value_parser(clap::value_parser!(f64))
            .default_value("150"),
    ]
}
