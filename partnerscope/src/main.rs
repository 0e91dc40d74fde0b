use colored::Colorize;
use partnerscope::commands::command_argument_builder;
use partnerscope::handlers::{handle_explore, handle_init, handle_ui, handle_values, init_logging};
use partnerscope_core::print_banner;

fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    // The dashboard owns the terminal, so it gets no log subscriber
    if !matches!(chosen_command.subcommand(), Some(("ui", _))) {
        init_logging(chosen_command.get_flag("verbose"));
    }

    let result = match chosen_command.subcommand() {
        Some(("ui", primary_command)) => handle_ui(primary_command),
        Some(("init", primary_command)) => handle_init(primary_command),
        Some(("values", primary_command)) => handle_values(primary_command),
        Some(("explore", primary_command)) => handle_explore(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
