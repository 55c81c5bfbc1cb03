use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use pygrade_core::config::AnalyzerConfig;
use pygrade_core::pipeline::Analyzer;
use pygrade_core::store::{AnalysisStore, SqliteStore};
use pygrade_core::types::{AnalysisRecord, AnalysisReport, PythonVersion, Submission};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Python files to analyze; use '-' to read from stdin
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Python version hint applied to the whole batch (2 or 3)
    #[arg(long, default_value = "3")]
    pub python_version: String,

    /// Analyzer configuration file (TOML); defaults apply when absent
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit the full reports as JSON
    #[arg(long)]
    pub json: bool,

    /// Persist each analysis to the database
    #[arg(long)]
    pub save: bool,

    /// SQLite database file for --save
    #[arg(long, env = "PYGRADE_DB", default_value = "pygrade.db")]
    pub db: PathBuf,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let version: PythonVersion = args
        .python_version
        .parse()
        .map_err(|e: String| anyhow::anyhow!("Configuration error: {e}"))?;

    let config = match &args.config {
        Some(path) => AnalyzerConfig::load(path)
            .with_context(|| format!("Cannot load config: {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    let submissions = read_submissions(&args.files)?;
    info!(count = submissions.len(), "Analyzing submissions");

    let analyzer = Analyzer::new(config);
    let reports = analyzer.analyze_batch(&submissions, version);

    if args.save {
        let store = SqliteStore::open(&args.db)
            .with_context(|| format!("Cannot open database: {}", args.db.display()))?;
        for (submission, report) in submissions.iter().zip(&reports) {
            let record =
                AnalysisRecord::from_result(&report.filename, &submission.source, &report.result);
            let id = store.save(&record).context("Failed to save analysis")?;
            info!(%id, filename = %report.filename, "Analysis saved");
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    Ok(())
}

fn read_submissions(files: &[PathBuf]) -> anyhow::Result<Vec<Submission>> {
    let mut submissions = Vec::with_capacity(files.len());
    for path in files {
        if path.as_os_str() == "-" {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .context("Failed to read stdin")?;
            submissions.push(Submission {
                filename: "code_snippet.py".to_string(),
                source,
            });
        } else {
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read file: {}", path.display()))?;
            submissions.push(Submission {
                filename: path.to_string_lossy().to_string(),
                source,
            });
        }
    }
    Ok(submissions)
}

fn print_report(report: &AnalysisReport) {
    let skill = &report.result.skill_assessment;

    println!("== {}", report.filename);
    if report.result.valid {
        println!("  Syntax:   valid");
    } else if report.result.error_line >= 0 {
        println!(
            "  Syntax:   {} (line {})",
            report.result.error_message, report.result.error_line
        );
    } else {
        println!("  Syntax:   {}", report.result.error_message);
    }
    println!("  Level:    {} ({}/100)", skill.level, skill.score);

    let domain = &skill.domain_analysis;
    if domain.is_domain_match {
        println!(
            "  BMI exercise: {} (calculation: {}, classification: {})",
            domain.level,
            yes_no(domain.has_functional_calculation),
            yes_no(domain.has_classification)
        );
    }

    if report.suggestions.is_empty() {
        println!();
        return;
    }
    println!("  Suggestions:");
    for suggestion in &report.suggestions {
        println!(
            "    [{}] line {}: {}",
            suggestion.category.as_str(),
            suggestion.line,
            suggestion.message
        );
    }
    println!();
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}
