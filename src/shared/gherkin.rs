//! Gherkin metadata extraction for compact result display.
//!
//! Pulls the feature title and the first scenario title out of generated
//! Gherkin text. Total over arbitrary input: text without recognizable
//! keywords simply yields empty fields.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static FEATURE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^feature:(.*)$").unwrap());

static SCENARIO_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^scenario(?: outline)?:(.*)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GherkinMetadata {
    pub feature: String,
    pub scenario: String,
}

/// Extracts `{feature, scenario}` from Gherkin text.
///
/// The first `Feature:` line sets `feature`; the first `Scenario:` or
/// `Scenario Outline:` line sets `scenario` and ends the scan.
pub fn extract(text: &str) -> GherkinMetadata {
    let mut metadata = GherkinMetadata::default();
    let mut feature_seen = false;

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if !feature_seen {
            if let Some(captures) = FEATURE_LINE.captures(line) {
                metadata.feature = captures[1].trim().to_string();
                feature_seen = true;
                continue;
            }
        }
        if let Some(captures) = SCENARIO_LINE.captures(line) {
            metadata.scenario = captures[1].trim().to_string();
            break;
        }
    }

    metadata
}

/// Same as [`extract`], with absent text treated as empty.
pub fn extract_optional(text: Option<&str>) -> GherkinMetadata {
    text.map(extract).unwrap_or_default()
}
