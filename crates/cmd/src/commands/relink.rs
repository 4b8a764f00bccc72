// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use docsplit::{Profile, ReferenceRule, RelinkReport};

/// Run only the relink pass over an existing output tree.
pub fn relink_command(output: &Path, profile: &Profile) -> Result<Vec<RelinkReport>> {
    if !output.is_dir() {
        return Err(anyhow!("Output directory {} does not exist", output.display()));
    }
    docsplit::relink_output(output, &profile.references)
        .with_context(|| format!("Failed to relink {}", output.display()))
}

/// One summary line per rule, followed by one line per rename.
pub fn format_reports(rules: &[ReferenceRule], reports: &[RelinkReport]) -> Vec<String> {
    let mut lines = Vec::new();
    for (rule, report) in rules.iter().zip(reports) {
        lines.push(format!(
            "{}: {} renamed, {} unresolved",
            rule.referencing,
            report.renamed.len(),
            report.unresolved.len()
        ));
        for (from, to) in &report.renamed {
            lines.push(format!("  {from} -> {to}"));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reports() {
        let rules = vec![ReferenceRule::new("classData/Rules", "classData/Sets")];
        let reports = vec![RelinkReport {
            renamed: vec![("id - s - t".to_string(), "Set - s - t".to_string())],
            unresolved: vec!["other - s - t".to_string()],
        }];
        assert_eq!(
            format_reports(&rules, &reports),
            vec![
                "classData/Rules: 1 renamed, 1 unresolved".to_string(),
                "  id - s - t -> Set - s - t".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_output_is_an_error() {
        let err = relink_command(Path::new("/nonexistent/output"), &Profile::exchange_rules())
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
