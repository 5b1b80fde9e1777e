mod cli;
mod fill_cmd;
mod locate_cmd;
mod page_range;
mod search_cmd;
mod shared;
mod text_cmd;
mod words_cmd;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Fill {
            ref input,
            ref output,
            ref record,
            ref template,
            ref format,
        } => fill_cmd::run(input, output, record, template.as_deref(), format),
        cli::Commands::Words {
            ref file,
            ref pages,
            ref format,
            x_tolerance,
            y_tolerance,
        } => words_cmd::run(file, pages.as_deref(), format, x_tolerance, y_tolerance),
        cli::Commands::Search {
            ref file,
            ref term,
            ref pages,
            context,
            ref format,
        } => search_cmd::run(file, term, pages.as_deref(), context, format),
        cli::Commands::Text {
            ref file,
            ref pages,
            ref format,
        } => text_cmd::run(file, pages.as_deref(), format),
        cli::Commands::Locate {
            ref file,
            role,
            page,
            ref format,
        } => locate_cmd::run(file, role.into(), page, format),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v` when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
