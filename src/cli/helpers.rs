//! Shared helper functions for CLI commands

use std::io::{self, BufRead, IsTerminal};

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{miette, IntoDiagnostic, Result};

use crate::core::config::Config;
use crate::core::identity::CaseId;
use crate::core::project::Lab;
use crate::core::store::CaseStore;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a case ID argument
pub fn parse_case_id(raw: &str) -> Result<CaseId> {
    raw.parse::<CaseId>().map_err(|e| miette!("{}", e))
}

/// Case IDs from arguments, or from stdin when none were given and it is piped
///
/// Enables pipelines like `dlt case list --format id | dlt case advance`.
pub fn case_ids_from_args_or_stdin(args: &[String]) -> Result<Vec<CaseId>> {
    if !args.is_empty() {
        return args.iter().map(|a| parse_case_id(a)).collect();
    }
    match read_ids_from_stdin() {
        Some(ids) => ids.iter().map(|a| parse_case_id(a)).collect(),
        None => Err(miette!("No case ID given")),
    }
}

/// Read IDs from stdin if it is piped, one per line, ignoring blank lines
pub fn read_ids_from_stdin() -> Option<Vec<String>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return None;
    }

    let ids: Vec<String> = stdin
        .lock()
        .lines()
        .map_while(|line| line.ok())
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if ids.is_empty() {
        None
    } else {
        Some(ids)
    }
}

/// Ask for confirmation, defaulting to yes when stdin is not interactive
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes || !io::stdin().is_terminal() {
        return Ok(true);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}

/// Everything a command needs to touch the case store
pub struct Session {
    pub lab: Lab,
    pub config: Config,
    pub store: CaseStore,
}

impl Session {
    /// Discover the workspace, load config and the store
    pub fn open() -> Result<Self> {
        let lab = Lab::discover()?;
        let config = Config::load();
        let store = lab.load_store(&config.sequence_prefix())?;
        Ok(Self { lab, config, store })
    }

    pub fn save(&self) -> Result<()> {
        self.lab.save_store(&self.store)?;
        Ok(())
    }
}

/// Print a success line unless quiet
pub fn success(quiet: bool, message: impl std::fmt::Display) {
    if !quiet {
        println!("{} {}", style("✓").green(), message);
    }
}
