//! Renders a result set for hand-off to other tools.

use crate::domain::error::{AppError, Result};
use crate::domain::test_case::TestCase;
use crate::infrastructure::storage::ensure_dir;
use crate::shared::xml::{escape_attribute, escape_text};
use chrono::{DateTime, SecondsFormat, Utc};
use docx_rs::{BreakType, Docx, Paragraph, Run, RunFonts};
use serde::Serialize;
use std::fmt;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Gherkin,
    Xml,
    Docx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Gherkin => "feature",
            Self::Xml => "xml",
            Self::Docx => "docx",
        }
    }

    /// Binary formats can only be written to a file.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Docx)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Gherkin => write!(f, "gherkin"),
            Self::Xml => write!(f, "xml"),
            Self::Docx => write!(f, "docx"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "gherkin" => Ok(Self::Gherkin),
            "xml" => Ok(Self::Xml),
            "docx" => Ok(Self::Docx),
            _ => Err(AppError::ValidationError(format!(
                "Unsupported export format: {}. Supported: json, gherkin, xml, docx",
                s
            ))),
        }
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    test_cases: &'a [TestCase],
    export_timestamp: String,
    total_tests: usize,
}

pub fn export(test_cases: &[TestCase], format: ExportFormat) -> Result<String> {
    export_at(test_cases, format, Utc::now())
}

/// Same as [`export`] with a fixed timestamp. Text formats only.
pub fn export_at(test_cases: &[TestCase], format: ExportFormat, at: DateTime<Utc>) -> Result<String> {
    let timestamp = at.to_rfc3339_opts(SecondsFormat::Secs, true);
    match format {
        ExportFormat::Json => {
            let body = JsonExport {
                test_cases,
                export_timestamp: timestamp,
                total_tests: test_cases.len(),
            };
            Ok(serde_json::to_string_pretty(&body)?)
        }
        ExportFormat::Gherkin => Ok(test_cases
            .iter()
            .map(|case| case.gherkin_feature.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")),
        ExportFormat::Xml => Ok(render_xml(test_cases, &timestamp)),
        ExportFormat::Docx => Err(AppError::ValidationError(
            "DOCX export is binary and has to be written to a file".to_string(),
        )),
    }
}

/// File contents for any format, binary ones included.
pub fn export_bytes(test_cases: &[TestCase], format: ExportFormat) -> Result<Vec<u8>> {
    export_bytes_at(test_cases, format, Utc::now())
}

pub fn export_bytes_at(
    test_cases: &[TestCase],
    format: ExportFormat,
    at: DateTime<Utc>,
) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Docx => render_docx(test_cases, at),
        text => Ok(export_at(test_cases, text, at)?.into_bytes()),
    }
}

fn heading(text: impl Into<String>, size: usize) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(size))
}

fn line(text: impl Into<String>) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn render_docx(test_cases: &[TestCase], at: DateTime<Utc>) -> Result<Vec<u8>> {
    let mut doc = Docx::new()
        .add_paragraph(heading("Test Cases Export", 40))
        .add_paragraph(line(format!("Generated: {}", at.format("%Y-%m-%d %H:%M:%S UTC"))))
        .add_paragraph(line(format!("Total Test Cases: {}", test_cases.len())));

    for case in test_cases {
        let (status, compliance_reasoning) = case
            .compliance_assessment
            .as_ref()
            .map(|a| (a.status.as_str(), a.reasoning.as_str()))
            .unwrap_or(("Unknown", ""));
        let (score, risk_reasoning) = case
            .risk_and_priority
            .as_ref()
            .map(|r| (r.score, r.reasoning.as_str()))
            .unwrap_or((0, ""));

        doc = doc
            .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)))
            .add_paragraph(heading(format!("Test ID: {}", case.test_id), 32))
            .add_paragraph(heading("Requirement Source:", 26))
            .add_paragraph(line(case.requirement_source.as_str()))
            .add_paragraph(heading("Gherkin Feature:", 26));
        // Word collapses newlines inside a run, so each Gherkin line gets its own paragraph.
        for gherkin_line in case.gherkin_feature.lines() {
            doc = doc.add_paragraph(
                Paragraph::new().add_run(
                    Run::new()
                        .add_text(gherkin_line)
                        .fonts(RunFonts::new().ascii("Courier New")),
                ),
            );
        }
        doc = doc
            .add_paragraph(heading("Compliance Assessment:", 26))
            .add_paragraph(line(format!("Status: {}", status)))
            .add_paragraph(line(format!("Reasoning: {}", compliance_reasoning)));
        if !case.compliance_tags.is_empty() {
            doc = doc
                .add_paragraph(heading("Compliance Tags:", 26))
                .add_paragraph(line(case.compliance_tags.join(", ")));
        }
        doc = doc
            .add_paragraph(heading("Risk Assessment:", 26))
            .add_paragraph(line(format!("Score: {}/10", score)))
            .add_paragraph(line(format!("Reasoning: {}", risk_reasoning)));
    }

    let mut buffer = std::io::Cursor::new(Vec::new());
    doc.build()
        .pack(&mut buffer)
        .map_err(|e| AppError::Internal(format!("Failed to build DOCX export: {}", e)))?;
    Ok(buffer.into_inner())
}

fn render_xml(test_cases: &[TestCase], timestamp: &str) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<testcases version="1.0" timestamp="{}">"#,
        escape_attribute(timestamp)
    );
    for case in test_cases {
        let status = case
            .compliance_assessment
            .as_ref()
            .map(|a| a.status.as_str())
            .unwrap_or("Unknown");
        let score = case.risk_and_priority.as_ref().map(|r| r.score).unwrap_or(0);

        let _ = writeln!(out, r#"  <testcase id="{}">"#, escape_attribute(&case.test_id));
        let _ = writeln!(
            out,
            "    <requirement>{}</requirement>",
            escape_text(&case.requirement_source)
        );
        let _ = writeln!(out, "    <gherkin>{}</gherkin>", escape_text(&case.gherkin_feature));
        let _ = writeln!(out, r#"    <compliance status="{}">"#, escape_attribute(status));
        if case.compliance_tags.is_empty() {
            let _ = writeln!(out, "      <tags />");
        } else {
            let _ = writeln!(out, "      <tags>");
            for tag in &case.compliance_tags {
                let _ = writeln!(out, "        <tag>{}</tag>", escape_text(tag));
            }
            let _ = writeln!(out, "      </tags>");
        }
        let _ = writeln!(out, "    </compliance>");
        let _ = writeln!(out, r#"    <risk score="{}" />"#, score);
        let _ = writeln!(out, "  </testcase>");
    }
    out.push_str("</testcases>\n");
    out
}

/// Writes rendered content, creating parent directories as needed.
pub fn write_export(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    std::fs::write(path, content)?;
    info!(path = %path.display(), bytes = content.len(), "Export written");
    Ok(())
}
