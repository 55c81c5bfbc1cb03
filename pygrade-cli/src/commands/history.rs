use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use pygrade_core::store::{AnalysisStore, SqliteStore};
use pygrade_core::types::{AnalysisId, AnalysisRecord};

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Maximum number of analyses to show
    #[arg(long, default_value_t = 50)]
    pub limit: u32,

    /// SQLite database file
    #[arg(long, env = "PYGRADE_DB", default_value = "pygrade.db")]
    pub db: PathBuf,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Analysis id
    pub id: i64,

    /// SQLite database file
    #[arg(long, env = "PYGRADE_DB", default_value = "pygrade.db")]
    pub db: PathBuf,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Analysis id
    pub id: i64,

    /// SQLite database file
    #[arg(long, env = "PYGRADE_DB", default_value = "pygrade.db")]
    pub db: PathBuf,
}

fn open_store(db: &PathBuf) -> anyhow::Result<SqliteStore> {
    SqliteStore::open(db).with_context(|| format!("Cannot open database: {}", db.display()))
}

pub fn run_list(args: HistoryArgs) -> anyhow::Result<()> {
    let store = open_store(&args.db)?;
    let records = store
        .list(Some(args.limit))
        .context("Failed to list analyses")?;

    if records.is_empty() {
        println!("No stored analyses.");
        return Ok(());
    }

    println!(
        "{:>5}  {:<24}  {:<12}  {:>5}  {:<19}",
        "id", "filename", "level", "score", "created"
    );
    for record in &records {
        println!(
            "{:>5}  {:<24}  {:<12}  {:>5}  {:<19}",
            record.id,
            truncate(&record.filename, 24),
            record.skill_level.as_str(),
            record.skill_score,
            record.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}

pub fn run_show(args: ShowArgs) -> anyhow::Result<()> {
    let store = open_store(&args.db)?;
    let record = store
        .get(AnalysisId(args.id))
        .context("Failed to read analysis")?;

    let Some(record) = record else {
        anyhow::bail!("Analysis {} not found", args.id);
    };

    print_record(&record);
    Ok(())
}

pub fn run_delete(args: DeleteArgs) -> anyhow::Result<()> {
    let store = open_store(&args.db)?;
    let deleted = store
        .delete(AnalysisId(args.id))
        .context("Failed to delete analysis")?;

    if !deleted {
        anyhow::bail!("Analysis {} not found", args.id);
    }
    println!("Deleted analysis {}.", args.id);
    Ok(())
}

fn print_record(record: &AnalysisRecord) {
    println!("== {} (id {})", record.filename, record.id);
    println!("  Created:  {}", record.created_at.format("%Y-%m-%d %H:%M:%S"));
    if record.is_valid {
        println!("  Syntax:   valid");
    } else if record.error_line >= 0 {
        println!(
            "  Syntax:   {} (line {})",
            record.error_message, record.error_line
        );
    } else {
        println!("  Syntax:   {}", record.error_message);
    }
    println!(
        "  Level:    {} ({}/100)",
        record.skill_level.as_str(),
        record.skill_score
    );
    if record.is_domain_match {
        println!(
            "  BMI exercise: {} (calculation: {}, classification: {})",
            record.domain_level.as_str(),
            if record.has_calculation { "yes" } else { "no" },
            if record.has_classification { "yes" } else { "no" },
        );
    }
    println!();
    println!("{}", record.code_content);
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let prefix: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{prefix}…")
    }
}
