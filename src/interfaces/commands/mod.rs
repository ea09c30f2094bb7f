use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::application::use_cases::export::{export, export_bytes, write_export, ExportFormat};
use crate::application::use_cases::traceability::{build_traceability_matrix, render_matrix};
use crate::application::{TestCaseSummary, WorkflowController};
use crate::domain::error::{AppError, Result};
use crate::domain::platform::Platform;
use crate::domain::requirement::RequirementFile;
use crate::infrastructure::bootstrap::build_controller;
use crate::infrastructure::config::AppConfig;
use crate::interfaces::cli::{Commands, CredentialsCommand, GenerateArgs};


pub async fn run_command(config: &AppConfig, command: Commands) -> Result<()> {
    match command {
        Commands::Platforms => {
            println!("{}", render_platforms());
            Ok(())
        }
        Commands::Credentials(args) => {
            let controller = build_controller(config)?;
            handle_credentials(&controller, args.command)
        }
        Commands::Generate(args) => {
            let controller = build_controller(config)?;
            handle_generate(&controller, args).await
        }
    }
}

pub(crate) async fn handle_generate(controller: &WorkflowController, args: GenerateArgs) -> Result<()> {
    // Reject bad option values before anything is sent.
    let format = resolve_format(args.format.as_deref(), args.output.is_some())?;
    let platform = args.push.as_deref().map(parse_platform).transpose()?;

    if let Some(text) = args.text {
        controller.set_text(text);
    } else if let Some(path) = args.file.as_deref() {
        controller.set_file(read_requirement_file(path)?);
    }
    if let Some(domain) = args.domain {
        controller.set_domain(domain);
    }

    let result = controller.generate().await?;

    match format {
        Some(format) => match args.output.as_deref() {
            Some(path) => {
                write_export(path, &export_bytes(&result.test_cases, format)?)?;
                println!("Wrote {} test cases to {}", result.len(), path.display());
            }
            None => println!("{}", export(&result.test_cases, format)?),
        },
        None => println!("{}", render_summaries(&controller.result_summaries())),
    }

    if args.matrix {
        println!();
        println!("{}", render_matrix(&build_traceability_matrix(&result.test_cases)));
    }

    if let Some(platform) = platform {
        controller.select_platform(platform);
        let outcome = controller.integrate().await?;
        println!("{}", outcome.message);
    }

    if args.json {
        print_json(&controller.snapshot())?;
    }
    Ok(())
}

pub(crate) fn handle_credentials(controller: &WorkflowController, command: CredentialsCommand) -> Result<()> {
    let store = controller.credentials();
    match command {
        CredentialsCommand::Show { platform } => {
            let platform = parse_platform(&platform)?;
            let record = store.get(platform)?;
            println!("{}", render_credentials(platform, &record));
        }
        CredentialsCommand::Set {
            platform,
            field,
            value,
            save,
        } => {
            let platform = parse_platform(&platform)?;
            controller.select_platform(platform);
            let valid = controller.update_credential(&field, &value)?;
            if save {
                store.save()?;
                println!(
                    "Saved {} settings ({})",
                    platform.display_name(),
                    validity_label(valid)
                );
            } else {
                store.discard()?;
                println!(
                    "{} settings not saved; pass --save to keep the change",
                    platform.display_name()
                );
            }
        }
        CredentialsCommand::Check => {
            let lines: Vec<String> = Platform::ALL
                .iter()
                .map(|platform| -> Result<String> {
                    let record = store.get(*platform)?;
                    let missing = record.missing_fields(*platform);
                    Ok(if missing.is_empty() {
                        format!("{}: complete", platform.display_name())
                    } else {
                        format!(
                            "{}: incomplete (missing {})",
                            platform.display_name(),
                            missing.join(", ")
                        )
                    })
                })
                .collect::<Result<_>>()?;
            println!("{}", lines.join("\n"));
        }
    }
    Ok(())
}

fn resolve_format(format: Option<&str>, has_output: bool) -> Result<Option<ExportFormat>> {
    match format {
        Some(raw) => {
            let format: ExportFormat = raw.parse()?;
            if format.is_binary() && !has_output {
                return Err(AppError::ValidationError(format!(
                    "{} export needs --output",
                    format
                )));
            }
            Ok(Some(format))
        }
        None if has_output => Ok(Some(ExportFormat::Json)),
        None => Ok(None),
    }
}

fn parse_platform(raw: &str) -> Result<Platform> {
    raw.parse::<Platform>().map_err(AppError::ValidationError)
}

fn read_requirement_file(path: &Path) -> Result<RequirementFile> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    debug!(file = %name, bytes = bytes.len(), "Requirement file read");
    Ok(RequirementFile::new(name, bytes))
}

fn validity_label(valid: bool) -> &'static str {
    if valid {
        "complete"
    } else {
        "incomplete"
    }
}

pub(crate) fn render_summaries(summaries: &[TestCaseSummary]) -> String {
    if summaries.is_empty() {
        return "No test cases were generated.".to_string();
    }
    let mut lines = vec![format!("Generated {} test cases", summaries.len())];
    for summary in summaries {
        let scenario = if summary.scenario.is_empty() {
            "-"
        } else {
            summary.scenario.as_str()
        };
        let feature = if summary.feature.is_empty() {
            "-"
        } else {
            summary.feature.as_str()
        };
        lines.push(format!("{}  {} / {}", summary.test_id, feature, scenario));
    }
    lines.join("\n")
}

pub(crate) fn render_credentials(
    platform: Platform,
    record: &crate::domain::credentials::PlatformCredentials,
) -> String {
    let mut lines = vec![format!(
        "{} ({})",
        platform.display_name(),
        validity_label(record.is_valid_for(platform))
    )];
    for (field, value) in record.masked(platform) {
        lines.push(format!("  {} = {}", field, value));
    }
    lines.join("\n")
}

pub(crate) fn render_platforms() -> String {
    Platform::ALL
        .iter()
        .map(|platform| {
            format!(
                "{:<13} {:<13} /{}  [{}]",
                platform.key(),
                platform.display_name(),
                platform.endpoint_path(),
                platform.required_fields().join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
