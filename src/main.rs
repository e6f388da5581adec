use apexlog::apexlog_truncation::{recommended_debug_levels, SuspectedIssue};
use apexlog::{Analysis, Config};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apexlog", about = "Apex debug log truncation analysis")]
struct Cli {
    /// Debug log to analyze.
    #[arg(required_unless_present = "issue")]
    file: Option<PathBuf>,

    /// Config file (defaults to ~/.config/apexlog/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the full analysis as JSON.
    #[arg(long)]
    json: bool,

    /// Print recommended debug levels for a suspected issue instead
    /// (performance, governor-limits, exceptions, integrations, automation).
    #[arg(long)]
    issue: Option<SuspectedIssue>,

    /// Write debug logs to /tmp/apexlog-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("/tmp/apexlog-debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("apexlog debug log started, tail -f /tmp/apexlog-debug.log");
    }

    if let Some(issue) = cli.issue {
        print_levels(issue, cli.json)?;
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let Some(path) = cli.file else {
        anyhow::bail!("no log file given");
    };
    let analysis = apexlog::analyze_file(&path, &config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_report(&analysis);
    }
    Ok(())
}

fn print_levels(issue: SuspectedIssue, json: bool) -> anyhow::Result<()> {
    let rows = recommended_debug_levels(issue);
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }
    println!("Recommended debug levels for {issue}:");
    for row in rows {
        println!("  {:<15} {:<7} {}", row.category, row.recommended_level, row.reason);
    }
    Ok(())
}

fn print_report(analysis: &Analysis) {
    let detection = &analysis.truncation;

    if let Some(header) = &analysis.header {
        println!("API version {}", header.api_version);
    }
    println!(
        "{} lines, {} events, {} line errors",
        analysis.lines_read,
        analysis.events.len(),
        analysis.line_errors.len()
    );
    for err in &analysis.line_errors {
        println!("  {err}");
    }
    println!();

    if !detection.is_truncated {
        println!("Not truncated (confidence {:.2})", detection.confidence.score);
    } else {
        println!(
            "TRUNCATED: {}, severity {}, confidence {:.2}",
            detection.truncation_type, detection.severity, detection.confidence.score
        );
        for reason in &detection.confidence.reasons {
            println!("  - {reason}");
        }
        for limitation in &detection.confidence.limitations {
            println!("  ! {limitation}");
        }
    }
    for line in &detection.ai_recommendations {
        println!("  {line}");
    }

    let impact = &analysis.impact;
    println!();
    println!("Reliable analyses:");
    for area in &impact.still_analyzable {
        println!("  + {area}");
    }
    for limitation in &impact.limitations {
        println!("  - {limitation}");
    }

    let plan = &analysis.recovery;
    if plan.can_recover {
        println!();
        println!("Recovery (confidence {:.2}):", plan.confidence);
        for strategy in &plan.strategies {
            println!("  {} ({})", strategy.name, strategy.expected_improvement);
            for step in &strategy.steps {
                println!("    * {step}");
            }
        }
        if let Some(levels) = &plan.debug_level_recommendations {
            println!("  Suggested levels:");
            for row in levels {
                println!("    {:<15} {:<7} {}", row.category, row.recommended_level, row.reason);
            }
        }
    }
}
