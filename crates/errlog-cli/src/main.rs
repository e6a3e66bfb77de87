//! `errlog` — view, clear and rotate a webserver error log.
//!
//! Thin command-line surface over `errlog-store`; the log path comes
//! from the environment (`ERROR_LOG`, `LOG_ERRORS`) unless given
//! explicitly.

use anyhow::{bail, Context, Result};
use errlog_store::{EnvVarRuntime, LogRecord, LogStore, StoreConfig};
use std::path::PathBuf;

const USAGE: &str = "\
usage: errlog <command> [options] [path]

commands:
  tail [-n COUNT] [--json] [path]   show the last COUNT records (default 20)
  rotate [--keep COUNT] [path]      truncate, preserving the newest records
  clear [path]                      truncate to zero length
  check                             report the autodetected log path

the path defaults to the autodetected log (ERROR_LOG / LOG_ERRORS).";

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    log::debug!("running {command}");
    let mut store = LogStore::new(EnvVarRuntime, StoreConfig::default());

    match command.as_str() {
        "tail" => tail(&mut store, &args[1..]),
        "rotate" => rotate(&mut store, &args[1..]),
        "clear" => clear(&mut store, &args[1..]),
        "check" => check(&mut store),
        "-h" | "--help" | "help" => {
            println!("{USAGE}");
            Ok(())
        }
        other => bail!("unknown command {other:?}\n{USAGE}"),
    }
}

fn tail(store: &mut LogStore<EnvVarRuntime>, args: &[String]) -> Result<()> {
    let mut count = 20usize;
    let mut json = false;
    let mut path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-n" => {
                let value = iter.next().context("-n needs a value")?;
                count = value.parse().with_context(|| format!("bad count {value:?}"))?;
            }
            "--json" => json = true,
            other if !other.starts_with('-') => path = Some(PathBuf::from(other)),
            other => bail!("unknown option {other:?}"),
        }
    }

    let path = resolve_path(store, path)?;
    let records = store.get_last_records(&path, count)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("(log is empty)");
        return Ok(());
    }
    // Newest-first from the store; print chronologically.
    for record in records.iter().rev() {
        print_record(record);
    }
    Ok(())
}

fn rotate(store: &mut LogStore<EnvVarRuntime>, args: &[String]) -> Result<()> {
    let mut keep = None;
    let mut path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--keep" => {
                let value = iter.next().context("--keep needs a value")?;
                keep = Some(value.parse().with_context(|| format!("bad count {value:?}"))?);
            }
            other if !other.starts_with('-') => path = Some(PathBuf::from(other)),
            other => bail!("unknown option {other:?}"),
        }
    }

    let path = resolve_path(store, path)?;
    let outcome = match keep {
        Some(keep) => store.truncate_and_keep_tail(&path, keep)?,
        None => store.truncate_keeping_configured(&path)?,
    };
    println!(
        "rotated {}: kept {} records ({} lines)",
        path.display(),
        outcome.records_kept,
        outcome.lines_kept
    );
    Ok(())
}

fn clear(store: &mut LogStore<EnvVarRuntime>, args: &[String]) -> Result<()> {
    let path = resolve_path(store, args.first().map(PathBuf::from))?;
    store.clear(&path)?;
    println!("cleared {}", path.display());
    Ok(())
}

fn check(store: &mut LogStore<EnvVarRuntime>) -> Result<()> {
    match store.autodetect() {
        Ok(path) => {
            println!("error log: {}", path.display());
            Ok(())
        }
        Err(reason) => bail!("{reason}"),
    }
}

fn resolve_path(store: &mut LogStore<EnvVarRuntime>, given: Option<PathBuf>) -> Result<PathBuf> {
    match given {
        Some(path) => Ok(path),
        None => Ok(store.autodetect()?),
    }
}

fn print_record(record: &LogRecord) {
    let stamp = record
        .timestamp
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".repeat(19));
    println!("{stamp}  {:5}  {}", record.severity.short_label(), record.message);
    for frame in &record.stack_frames {
        println!("{}{frame}", " ".repeat(28));
    }
}
