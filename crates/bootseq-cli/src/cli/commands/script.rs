//! Script command handlers.

use std::path::Path;

use anyhow::{Context, Result};
use bootseq_core::config::Config;
use bootseq_core::{Line, Script};
use serde::Serialize;

pub fn validate(config: &Config, path: Option<&Path>) -> Result<()> {
    let script = config.load_script(path)?;
    println!(
        "Script OK: {} lines, total {}ms",
        script.len(),
        script.total_duration().as_millis()
    );
    Ok(())
}

pub fn show(config: &Config, path: Option<&Path>, json: bool) -> Result<()> {
    let script = config.load_script(path)?;
    if json {
        let rows: Vec<LineRow<'_>> = script.iter().map(LineRow::from).collect();
        let out = serde_json::to_string_pretty(&rows).context("serialize script")?;
        println!("{out}");
    } else {
        print!("{}", format_table(&script));
    }
    Ok(())
}

/// One line of `script show --json`, with the delay already resolved.
#[derive(Debug, Serialize)]
struct LineRow<'a> {
    id: &'a str,
    style: &'a str,
    delay_ms: u64,
    text: &'a str,
}

impl<'a> From<&'a Line> for LineRow<'a> {
    fn from(line: &'a Line) -> Self {
        Self {
            id: line.id(),
            style: line.style().as_str(),
            delay_ms: line.effective_delay().as_millis() as u64,
            text: line.text(),
        }
    }
}

fn format_table(script: &Script) -> String {
    if script.is_empty() {
        return "(empty script)\n".to_string();
    }

    let id_width = script
        .iter()
        .map(|line| line.id().chars().count())
        .max()
        .unwrap_or(0)
        .max(2);

    let mut out = format!("{:<id_width$}  {:<7}  {:>7}  TEXT\n", "ID", "STYLE", "DELAY");
    for line in script {
        out.push_str(&format!(
            "{:<id_width$}  {:<7}  {:>5}ms  {}\n",
            line.id(),
            line.style().as_str(),
            line.effective_delay().as_millis(),
            line.text()
        ));
    }
    out
}
