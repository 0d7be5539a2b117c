use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use rusty_carat::data::info::{describe, DEFAULT_HEAD_ROWS};
use rusty_carat::data::FilterSpec;
use rusty_carat::insight::InsightRow;
use rusty_carat::session::Session;

const USAGE: &str = "usage: rusty-carat <data-file> [filter.json]";

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args_os().skip(1);
    let data_path = PathBuf::from(args.next().context(USAGE)?);
    let filter_path = args.next().map(PathBuf::from);

    let mut session = Session::default();
    session.load(&data_path)?;

    if let Some(dataset) = &session.dataset {
        println!("{}", describe(dataset, DEFAULT_HEAD_ROWS)?);
    }

    if let Some(path) = filter_path {
        session.set_filters(read_filter(&path)?);
    }
    session.apply_filter()?;
    println!("\n{}\n", session.status());

    print_insights(&session.insights(true)?);
    Ok(())
}

/// Read a [`FilterSpec`] from a JSON file.
fn read_filter(path: &Path) -> Result<FilterSpec> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading filter {}", path.display()))?;
    let spec: FilterSpec = serde_json::from_str(&text).context("parsing filter JSON")?;
    log::debug!("using filter {spec:?}");
    Ok(spec)
}

/// Two aligned columns: label, value.
fn print_insights(rows: &[InsightRow]) {
    let width = rows
        .iter()
        .map(|r| r.label.chars().count())
        .max()
        .unwrap_or(0);
    for row in rows {
        println!("{:<width$}  {}", row.label, row.value);
    }
}
