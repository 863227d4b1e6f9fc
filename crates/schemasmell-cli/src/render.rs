//! Report filtering and output

use colored::Colorize;
use schemasmell_core::{Config, Report, ReportSummary, Status};

/// Apply configured status overrides
pub fn apply_overrides(config: &Config, reports: Vec<Report>) -> Vec<Report> {
    reports
        .into_iter()
        .map(|report| {
            let status = config.severity.get_status(report.check(), report.status());
            if status == report.status() {
                report
            } else {
                report.overridden(status)
            }
        })
        .collect()
}

/// Reports at or above the configured minimum status
pub fn visible<'r>(config: &Config, reports: &'r [Report]) -> Vec<&'r Report> {
    reports
        .iter()
        .filter(|report| report.status() >= config.min_severity)
        .collect()
}

fn colored_status(status: Status) -> colored::ColoredString {
    let label = format!("{:<8}", status.label().to_uppercase());
    match status {
        Status::Ok => label.green(),
        Status::Info => label.cyan(),
        Status::Concern => label.blue().bold(),
        Status::Warning => label.yellow().bold(),
        Status::Critical => label.red().bold(),
    }
}

pub fn print_table(source: &str, reports: &[&Report], summary: &ReportSummary) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Schema Smell Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();
    println!("Source: {}", source);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total reports: {}", summary.total);
    for (label, count, status) in [
        ("Critical", summary.critical, Status::Critical),
        ("Warning", summary.warning, Status::Warning),
        ("Concern", summary.concern, Status::Concern),
        ("Info", summary.info, Status::Info),
        ("Ok", summary.ok, Status::Ok),
    ] {
        let count = if count > 0 && status >= Status::Concern {
            count.to_string().red().bold()
        } else {
            count.to_string().green()
        };
        println!("  {:<9} {}", format!("{}:", label), count);
    }
    println!();

    if reports.is_empty() {
        println!("{}", "✓ No smells found!".green().bold());
        return;
    }

    println!("{}", "Reports:".bold());
    for report in reports {
        println!(
            "  [{}] {} {}",
            colored_status(report.status()),
            report.check().bold(),
            report.entity()
        );
        for message in report.messages() {
            println!("      {}", message);
        }
    }
}

/// JSON document written by `--format json` and `--output`
pub fn to_json(source: &str, reports: &[&Report], summary: &ReportSummary) -> serde_json::Value {
    serde_json::json!({
        "source": source,
        "summary": summary,
        "reports": reports,
    })
}
