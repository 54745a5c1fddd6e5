//! `dlt whoami` command - Show the configured operator

use console::style;
use miette::Result;

use crate::cli::output::print_structured;
use crate::cli::GlobalOpts;
use crate::core::config::Config;

pub fn run(global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let operator = config.operator();

    if print_structured(&operator, global.output)? {
        return Ok(());
    }

    println!("{}: {}", style("Author").bold(), operator.name);
    println!("{}: {}", style("Role").bold(), operator.role);
    if let Some(threshold) = config.final_status_threshold {
        println!("{}: {}%", style("Final-status gate").bold(), threshold);
    }
    Ok(())
}
