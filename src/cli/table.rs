//! Tabular output shared by list commands
//!
//! Rows carry a value per column key; the formatter picks the visible columns
//! and renders them as TSV, CSV, Markdown, a boxed table or bare IDs.

use std::collections::HashMap;
use std::io;

use console::style;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::truncate_str;
use crate::cli::OutputFormat;

/// A column a list command can show
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    /// Maximum width in TSV output
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// One output row
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub id: String,
    cells: HashMap<&'static str, String>,
}

impl TableRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: HashMap::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: impl ToString) -> Self {
        self.cells.insert(key, value.to_string());
        self
    }

    fn get(&self, key: &str) -> &str {
        self.cells.get(key).map(|s| s.as_str()).unwrap_or("")
    }
}

pub struct TableFormatter {
    columns: &'static [ColumnDef],
    noun_plural: &'static str,
}

impl TableFormatter {
    pub fn new(columns: &'static [ColumnDef], noun_plural: &'static str) -> Self {
        Self {
            columns,
            noun_plural,
        }
    }

    fn visible_columns(&self, visible: &[&str]) -> Vec<&ColumnDef> {
        if visible.is_empty() {
            return self.columns.iter().collect();
        }
        visible
            .iter()
            .filter_map(|key| self.columns.iter().find(|c| c.key == *key))
            .collect()
    }

    /// Render rows in `format`
    pub fn output(&self, rows: &[TableRow], format: OutputFormat, visible: &[&str]) {
        let columns = self.visible_columns(visible);
        match format {
            OutputFormat::Id => {
                for row in rows {
                    println!("{}", row.id);
                }
            }
            OutputFormat::Csv => self.write_csv(rows, &columns),
            OutputFormat::Md => {
                let headers: Vec<&str> = columns.iter().map(|c| c.header).collect();
                println!("| {} |", headers.join(" | "));
                println!("|{}|", vec!["---"; headers.len()].join("|"));
                for row in rows {
                    let cells: Vec<String> = columns
                        .iter()
                        .map(|c| row.get(c.key).replace('|', "\\|"))
                        .collect();
                    println!("| {} |", cells.join(" | "));
                }
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(columns.iter().map(|c| c.header.to_string()));
                for row in rows {
                    builder.push_record(columns.iter().map(|c| row.get(c.key).to_string()));
                }
                let mut table = builder.build();
                table.with(Style::rounded());
                println!("{}", table);
            }
            _ => {
                let header: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{:<width$}", c.header, width = c.width))
                    .collect();
                println!("{}", style(header.join("\t").trim_end()).bold());
                for row in rows {
                    let cells: Vec<String> = columns
                        .iter()
                        .map(|c| {
                            format!(
                                "{:<width$}",
                                truncate_str(row.get(c.key), c.width),
                                width = c.width
                            )
                        })
                        .collect();
                    println!("{}", cells.join("\t").trim_end());
                }
                println!(
                    "\n{} {}",
                    style(rows.len()).cyan(),
                    self.noun_plural
                );
            }
        }
    }

    fn write_csv(&self, rows: &[TableRow], columns: &[&ColumnDef]) {
        let mut writer = csv::Writer::from_writer(io::stdout());
        let result = (|| -> Result<(), csv::Error> {
            writer.write_record(columns.iter().map(|c| c.key))?;
            for row in rows {
                writer.write_record(columns.iter().map(|c| row.get(c.key)))?;
            }
            writer.flush()?;
            Ok(())
        })();
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write CSV output");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", "ID", 12),
        ColumnDef::new("doctor", "DOCTOR", 20),
    ];

    #[test]
    fn test_visible_columns_follow_request_order() {
        let formatter = TableFormatter::new(COLUMNS, "cases");
        let cols = formatter.visible_columns(&["doctor", "id", "bogus"]);
        let keys: Vec<&str> = cols.iter().map(|c| c.key).collect();
        assert_eq!(keys, vec!["doctor", "id"]);
        assert_eq!(formatter.visible_columns(&[]).len(), 2);
    }

    #[test]
    fn test_missing_cell_is_blank() {
        let row = TableRow::new("DL-2026-0001").cell("doctor", "Dr. Lee");
        assert_eq!(row.get("doctor"), "Dr. Lee");
        assert_eq!(row.get("patient"), "");
    }
}
