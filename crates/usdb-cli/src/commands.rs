use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::json;
use usdb_device::{DeviceConfig, StatusReport};
use usdb_types::{DataType, Severity};

use crate::cli::*;
use crate::script::{RunReport, Script, Session};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => cmd_run(args, cli.format),
        Command::Types(args) => cmd_types(args, cli.format),
        Command::Config(args) => cmd_config(args, cli.format),
    }
}

/// Load a device configuration from TOML, or the defaults when no path is
/// given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DeviceConfig> {
    let Some(path) = path else {
        return Ok(DeviceConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: DeviceConfig =
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Load and replay a script file.
pub fn run_script(args: &RunArgs) -> anyhow::Result<RunReport> {
    let config = load_config(args.config.as_deref())?;
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let script = Script::from_json(&text)?;
    Session::new(config, !args.no_bridge)?.run(&script)
}

fn cmd_run(args: RunArgs, format: OutputFormat) -> anyhow::Result<()> {
    let report = run_script(&args)?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report)?,
    }
    let errors = report.error_count();
    if args.strict && errors > 0 {
        bail!("{errors} error(s) reported");
    }
    Ok(())
}

fn print_report(report: &RunReport) -> anyhow::Result<()> {
    for step in &report.steps {
        let mark = if step.ok { "✓".green() } else { "✗".red() };
        println!("{mark} {:>3} {:<8} {}", step.index, step.op.bold(), step.detail);
    }

    if !report.statuses.is_empty() {
        println!("\n{}", "Status:".bold());
        for status in &report.statuses {
            println!("  {}", format_status(status));
        }
    }

    match &report.document {
        Some(doc) => {
            println!("\n{} ({} save(s))", "Document:".bold(), doc.save_count);
            println!("{}", doc.to_json_pretty()?);
        }
        None => println!("\n{}", "No bridge attached.".dimmed()),
    }
    Ok(())
}

fn format_status(status: &StatusReport) -> String {
    let level = match status.severity {
        Severity::Info => "info".cyan(),
        Severity::Warning => "warning".yellow(),
        Severity::Error => "error".red().bold(),
    };
    let source = match status.source {
        Some(handle) => format!("{handle} ({})", status.source_type),
        None => status.source_type.to_string(),
    };
    format!("{level} [{}] {source}: {}", status.code, status.message)
}

fn cmd_types(args: TypesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<(DataType, String)> = DataType::ALL
        .iter()
        .map(|&ty| {
            let doc = if args.flattened {
                ty.to_document_type_flattened()
            } else {
                ty.to_document_type()
            };
            (ty, doc)
        })
        .filter(|(_, doc)| !args.defined || doc.is_defined())
        .map(|(ty, doc)| (ty, doc.to_string()))
        .collect();

    match format {
        OutputFormat::Json => {
            let entries: Vec<_> = rows
                .iter()
                .map(|(ty, doc)| json!({ "type": ty.name(), "document": doc }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            for (ty, doc) in &rows {
                println!("{:<36} {}", ty.name(), doc.cyan());
            }
        }
    }
    Ok(())
}

fn cmd_config(args: ConfigArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.path.as_deref())?;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Text => print!("{}", toml::to_string_pretty(&config)?),
    }
    Ok(())
}
