use clap::Parser;
use dlt::cli::commands;
use dlt::cli::{Cli, Commands};
use miette::Result;

/// Environment variable holding the log filter (e.g. `DLT_LOG=debug`)
const LOG_ENV: &str = "DLT_LOG";

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => commands::init::run(args, &global),
        Commands::Case(cmd) => commands::case::run(cmd, &global),
        Commands::Note(cmd) => commands::note::run(cmd, &global),
        Commands::Attach(cmd) => commands::attach::run(cmd, &global),
        Commands::Dept(args) => commands::dept::run(args, &global),
        Commands::Dashboard(args) => commands::dashboard::run(args, &global),
        Commands::Workflow(cmd) => commands::workflow::run(cmd, &global),
        Commands::Whoami => commands::whoami::run(&global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
