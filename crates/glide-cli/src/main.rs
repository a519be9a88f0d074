mod commands;
mod logging;

use std::io::{self, Write};
use std::path::Path;
use std::process;

use anyhow::Context;
use chrono::{DateTime, Local, TimeZone, Utc};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use glide_core::format_size;
use glide_core::storage::Database;
use tracing::error;

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match glide_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();
    let db_path = args
        .db_path
        .clone()
        .unwrap_or_else(|| config.cache_db_path.clone());

    match args.command {
        Some(Commands::List) => run_list(&db_path)?,
        Some(Commands::Clean { days }) => run_clean(&db_path, days)?,
        Some(Commands::Delete { path }) => run_delete(&db_path, &path)?,
        Some(Commands::Stats) => run_stats(&db_path)?,
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn open_database(db_path: &str) -> anyhow::Result<Database> {
    Database::open(db_path)
        .with_context(|| format!("opening folder-size cache at '{}'", db_path))
}

fn require_database(db_path: &str) -> anyhow::Result<Option<Database>> {
    if !Path::new(db_path).exists() {
        println!("No cache database at '{}'.", db_path);
        return Ok(None);
    }
    Ok(Some(open_database(db_path)?))
}

fn run_list(db_path: &str) -> anyhow::Result<()> {
    let db = match require_database(db_path)? {
        Some(db) => db,
        None => return Ok(()),
    };

    let records = db.list_cache_records().context("listing cache records")?;
    if records.is_empty() {
        println!("No cached folder sizes.");
        return Ok(());
    }

    println!(
        "{:<60} | {:<12} | {:<19} | {:<19}",
        "Path".bold(),
        "Size".bold(),
        "Last modified".bold(),
        "Updated at".bold()
    );
    println!("{}", "-".repeat(120));
    for record in &records {
        println!(
            "{:<60} | {:<12} | {:<19} | {:<19}",
            shorten_path(&record.path),
            format_size(record.size_bytes as u64),
            render_epoch(record.last_modified),
            render_rfc3339(&record.updated_at),
        );
    }
    println!("\n{} records", records.len().to_string().green());
    Ok(())
}

fn run_clean(db_path: &str, days: Option<i64>) -> anyhow::Result<()> {
    let db = match require_database(db_path)? {
        Some(db) => db,
        None => return Ok(()),
    };

    let deleted = match days {
        Some(days) => {
            let cutoff = (Utc::now() - chrono::Duration::days(days)).to_rfc3339();
            db.delete_older_than(&cutoff)
                .context("deleting aged cache records")?
        }
        None => {
            match prompt_confirm(
                "Delete ALL cached folder sizes?",
                Some(false),
            ) {
                Ok(true) => db.delete_all().context("deleting all cache records")?,
                _ => {
                    process::exit(0);
                }
            }
        }
    };

    println!("Deleted {} cache records", deleted.to_string().red());
    Ok(())
}

fn run_delete(db_path: &str, path: &str) -> anyhow::Result<()> {
    let db = match require_database(db_path)? {
        Some(db) => db,
        None => return Ok(()),
    };

    if db.delete_folder_size(path).context("deleting cache record")? {
        println!("Deleted record for '{}'", path);
    } else {
        println!("No record for '{}'", path);
    }
    Ok(())
}

fn run_stats(db_path: &str) -> anyhow::Result<()> {
    let db = match require_database(db_path)? {
        Some(db) => db,
        None => return Ok(()),
    };

    let stats = db.cache_stats().context("reading cache stats")?;
    println!(
        "{} records, {} cached in total",
        stats.records.to_string().green(),
        format_size(stats.total_bytes as u64).green()
    );
    Ok(())
}

fn shorten_path(path: &str) -> String {
    if path.chars().count() > 60 {
        let head: String = path.chars().take(57).collect();
        format!("{}...", head)
    } else {
        path.to_string()
    }
}

fn render_epoch(secs: i64) -> String {
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

fn render_rfc3339(value: &str) -> String {
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => value.to_string(),
    }
}

fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let mut input = String::new();

    loop {
        input.clear();

        match default {
            Some(true) => print!("{} (Y/n): ", prompt),
            Some(false) | None => print!("{} (y/N): ", prompt),
        }
        io::stdout().flush()?;

        io::stdin().read_line(&mut input)?;

        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            "" => match default {
                Some(default) => return Ok(default),
                None => continue,
            },
            _ => continue,
        }
    }
}
