//! `dlt init` command - Create a lab workspace

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::success;
use crate::cli::GlobalOpts;
use crate::core::project::Lab;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Reinitialize an existing workspace, resetting its case store
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let lab = Lab::init(&cwd, args.force)?;

    success(
        global.quiet,
        format!("Initialized lab workspace at {}", style(lab.lab_dir().display()).cyan()),
    );
    if !global.quiet {
        println!();
        println!("Next steps:");
        println!("  dlt case new --category fixed --material zirconia_layered \\");
        println!("      --doctor \"Dr. Lee\" --patient \"A. Patient\" --due 2026-11-02");
        println!("  dlt case list");
    }
    Ok(())
}
