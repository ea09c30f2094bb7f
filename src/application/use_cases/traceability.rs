use crate::domain::test_case::TestCase;
use serde::Serialize;
use std::collections::BTreeSet;

/// Requirement-to-test coverage for one requirement source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceabilityRow {
    pub requirement: String,
    pub test_ids: Vec<String>,
    pub compliance_tags: Vec<String>,
    pub non_compliant: usize,
    pub max_risk: u8,
}

/// Groups test cases by `requirement_source`, keeping first-seen order.
pub fn build_traceability_matrix(test_cases: &[TestCase]) -> Vec<TraceabilityRow> {
    let mut rows: Vec<(TraceabilityRow, BTreeSet<String>)> = Vec::new();

    for case in test_cases {
        let index = match rows
            .iter()
            .position(|(row, _)| row.requirement == case.requirement_source)
        {
            Some(index) => index,
            None => {
                rows.push((
                    TraceabilityRow {
                        requirement: case.requirement_source.clone(),
                        test_ids: Vec::new(),
                        compliance_tags: Vec::new(),
                        non_compliant: 0,
                        max_risk: 0,
                    },
                    BTreeSet::new(),
                ));
                rows.len() - 1
            }
        };

        let (row, tags) = &mut rows[index];
        row.test_ids.push(case.test_id.clone());
        tags.extend(case.compliance_tags.iter().cloned());
        if case.is_non_compliant() {
            row.non_compliant += 1;
        }
        if let Some(risk) = &case.risk_and_priority {
            row.max_risk = row.max_risk.max(risk.score);
        }
    }

    rows.into_iter()
        .map(|(mut row, tags)| {
            row.compliance_tags = tags.into_iter().collect();
            row
        })
        .collect()
}

/// Plain-text table, one line per requirement.
pub fn render_matrix(rows: &[TraceabilityRow]) -> String {
    let mut lines = vec!["Requirement | Tests | Compliance tags | Non-compliant | Max risk".to_string()];
    for row in rows {
        let requirement = if row.requirement.trim().is_empty() {
            "(unspecified)"
        } else {
            row.requirement.as_str()
        };
        let tags = if row.compliance_tags.is_empty() {
            "-".to_string()
        } else {
            row.compliance_tags.join(", ")
        };
        lines.push(format!(
            "{} | {} | {} | {} | {}",
            requirement,
            row.test_ids.join(", "),
            tags,
            row.non_compliant,
            row.max_risk
        ));
    }
    lines.join("\n")
}
