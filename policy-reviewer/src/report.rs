//! Report builder: renders the pull-request comment.
//!
//! Flow for a document with violations:
//!   1) decompose every message (order preserved);
//!   2) resolve the resource type from the plan;
//!   3) locate the resource block in the configuration directory;
//!   4) ask the advisor for a fix when the block was found;
//!   5) render summary table, one subsection per violation, call to action.

use std::path::Path;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info};

use crate::advisor::{FixRequest, FixSuggester};
use crate::input::PlanIndex;
use crate::locate::{ResourceBlock, locate};
use crate::violations::{self, Violation, ViolationStatus};

pub const NO_VIOLATIONS_MESSAGE: &str =
    "✅ **Agent Review:** Infrastructure looks good! No policy violations found.";

pub const PARSE_ERROR_MESSAGE: &str = "⚠️ **Agent Review:** Errors found but could not parse details. Please check the OPA logs for raw output.";

pub const CALL_TO_ACTION: &str = "\nPLEASE FIX THE ABOVE ISSUES TO PROCEED.";

/// Ordered Markdown sections, joined with newlines on render.
#[derive(Debug, Clone, Default)]
pub struct ReviewReport {
    sections: Vec<String>,
}

impl ReviewReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, section: impl Into<String>) {
        self.sections.push(section.into());
    }

    pub fn render(&self) -> String {
        self.sections.join("\n")
    }
}

/// Everything known about one violation after lookup and advice.
#[derive(Debug, Clone)]
struct Finding {
    violation: Violation,
    resource_type: String,
    block: Option<ResourceBlock>,
    suggestion: Option<String>,
}

/// Builds the comment from already-parsed inputs.
pub async fn build(
    status: &ViolationStatus,
    plan: &PlanIndex,
    config_dir: &Path,
    suggester: &FixSuggester,
) -> String {
    let messages = match status {
        ViolationStatus::Clean => {
            info!("report: no violations");
            return NO_VIOLATIONS_MESSAGE.to_string();
        }
        ViolationStatus::ParseError(reason) => {
            info!(%reason, "report: violation document could not be parsed");
            return PARSE_ERROR_MESSAGE.to_string();
        }
        ViolationStatus::HasViolations(messages) => messages,
    };

    let t0 = Instant::now();
    let mut findings = Vec::with_capacity(messages.len());

    for (idx, message) in messages.iter().enumerate() {
        let t_one = Instant::now();
        let violation = Violation::decompose(message);
        let resource_type = plan.resource_type(&violation.resource_name).to_string();

        let block = locate(&resource_type, &violation.resource_name, config_dir);

        let suggestion = match &block {
            Some(b) => {
                suggester
                    .suggest_fix(&FixRequest {
                        violation_message: message,
                        resource_code: &b.text,
                        resource_type: &resource_type,
                        resource_name: &violation.resource_name,
                    })
                    .await
            }
            None => None,
        };

        debug!(
            idx,
            category = %violation.category,
            resource = %violation.resource_name,
            %resource_type,
            located = block.is_some(),
            suggested = suggestion.is_some(),
            "report: violation processed ({} ms)",
            t_one.elapsed().as_millis()
        );

        findings.push(Finding {
            violation,
            resource_type,
            block,
            suggestion,
        });
    }

    let report = render_findings(&findings, config_dir);

    info!(
        violations = findings.len(),
        located = findings.iter().filter(|f| f.block.is_some()).count(),
        suggested = findings.iter().filter(|f| f.suggestion.is_some()).count(),
        "report: built in {} ms",
        t0.elapsed().as_millis()
    );

    report.render()
}

/// Parses raw JSON documents, then delegates to [`build`].
pub async fn build_from_json(
    violations: &Value,
    plan: &Value,
    config_dir: &Path,
    suggester: &FixSuggester,
) -> String {
    let status = violations::parse(violations);
    let plan = PlanIndex::from_plan(plan);
    build(&status, &plan, config_dir, suggester).await
}

fn render_findings(findings: &[Finding], config_dir: &Path) -> ReviewReport {
    let mut report = ReviewReport::new();

    report.push("### 🛑 Policy Violations Detected\n");
    report.push(format!("**Total Violations:** {}\n", findings.len()));

    report.push("| Category | Message | Resource |");
    report.push("| :--- | :--- | :--- |");
    for f in findings {
        report.push(f.violation.table_row());
    }

    for (idx, f) in findings.iter().enumerate() {
        report.push(render_subsection(idx + 1, f, config_dir));
    }

    report.push(CALL_TO_ACTION);
    report
}

fn render_subsection(number: usize, f: &Finding, config_dir: &Path) -> String {
    let v = &f.violation;
    let mut s = String::new();

    s.push_str(&format!("\n#### {number}. {}: `{}`\n\n", v.category, v.resource_name));
    s.push_str(&format!("- **Category:** {}\n", v.category));
    s.push_str(&format!(
        "- **Resource:** `{}` (`{}`)\n",
        v.resource_name, f.resource_type
    ));
    s.push_str(&format!("- **Message:** {}\n", v.body));

    match (&f.block, &f.suggestion) {
        (Some(block), Some(suggestion)) => {
            s.push_str(&format!("- **File:** `{}`\n", block.file_path.display()));
            s.push_str("\n**🤖 AI Suggested Fix:**\n\n");
            s.push_str(&code_block(suggestion));
        }
        (Some(block), None) => {
            s.push_str(&format!("- **File:** `{}`\n", block.file_path.display()));
            s.push_str("\n**🔧 Manual Fix Required.** Current definition:\n\n");
            s.push_str(&code_block(&block.text));
        }
        (None, _) => {
            s.push_str(&format!(
                "\n> ⚠️ Could not locate the source of `{}.{}` in `{}`.\n",
                f.resource_type,
                v.resource_name,
                config_dir.display()
            ));
        }
    }

    s
}

/// Fenced `hcl` block; the fence is longer than any backtick run in `code`.
fn code_block(code: &str) -> String {
    let longest_run = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);
    format!("{fence}hcl\n{code}\n{fence}\n")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;

    fn opa(messages: &[&str]) -> Value {
        json!({ "result": [ { "expressions": [ { "value": messages } ] } ] })
    }

    #[tokio::test]
    async fn clean_and_parse_error_are_fixed_messages() {
        let dir = tempfile::tempdir().unwrap();
        let off = FixSuggester::Disabled;

        for clean in [json!({}), json!({ "result": [] }), opa(&[])] {
            assert_eq!(
                build_from_json(&clean, &json!({}), dir.path(), &off).await,
                NO_VIOLATIONS_MESSAGE
            );
        }

        let broken = json!({ "result": [ { "no_expressions": true } ] });
        assert_eq!(
            build_from_json(&broken, &json!({}), dir.path(), &off).await,
            PARSE_ERROR_MESSAGE
        );
    }

    #[tokio::test]
    async fn table_rows_follow_message_order_and_escape_pipes() {
        let dir = tempfile::tempdir().unwrap();
        let out = build_from_json(
            &opa(&["b-cat: second 'r2' a|b", "no colon here"]),
            &json!({}),
            dir.path(),
            &FixSuggester::Disabled,
        )
        .await;

        let rows: Vec<&str> = out.lines().filter(|l| l.starts_with("| **")).collect();
        assert_eq!(
            rows,
            vec![
                "| **b-cat** | second 'r2' a\\|b | `r2` |",
                "| **General** | no colon here | `Unknown` |",
            ]
        );
        assert!(out.starts_with("### 🛑 Policy Violations Detected\n\n**Total Violations:** 2\n"));
        assert!(out.ends_with("\nPLEASE FIX THE ABOVE ISSUES TO PROCEED."));
        assert!(out.find("#### 1. b-cat").unwrap() < out.find("#### 2. General").unwrap());
    }

    #[tokio::test]
    async fn pipes_in_category_or_resource_keep_table_columns() {
        let dir = tempfile::tempdir().unwrap();
        let out = build_from_json(
            &opa(&["naming: Label 'a|b' is invalid", "x|y: plain body"]),
            &json!({}),
            dir.path(),
            &FixSuggester::Disabled,
        )
        .await;

        let rows: Vec<&str> = out.lines().filter(|l| l.starts_with("| **")).collect();
        assert_eq!(
            rows,
            vec![
                "| **naming** | Label 'a\\|b' is invalid | `a\\|b` |",
                "| **x\\|y** | plain body | `Unknown` |",
            ]
        );
        for row in rows {
            let separators = row
                .char_indices()
                .filter(|&(i, c)| c == '|' && (i == 0 || !row[..i].ends_with('\\')))
                .count();
            assert_eq!(separators, 4, "{row}");
        }
    }

    #[tokio::test]
    async fn located_block_without_advice_renders_manual_fix() {
        let dir = tempfile::tempdir().unwrap();
        let code = "resource \"google_storage_bucket\" \"b1\" {\n  name = \"b1\"\n}";
        fs::write(dir.path().join("main.tf"), format!("{code}\n")).unwrap();

        let out = build_from_json(
            &opa(&["security-risk: Bucket 'b1' must have uniform access."]),
            &json!({ "resource_changes": [ { "address": "google_storage_bucket.b1", "type": "google_storage_bucket", "name": "b1" } ] }),
            dir.path(),
            &FixSuggester::Disabled,
        )
        .await;

        assert!(out.contains("- **Resource:** `b1` (`google_storage_bucket`)"));
        assert!(out.contains(&format!("- **File:** `{}`", dir.path().join("main.tf").display())));
        assert!(out.contains("**🔧 Manual Fix Required.**"));
        assert!(out.contains(&format!("```hcl\n{code}\n```")));
    }

    #[tokio::test]
    async fn unknown_resource_renders_not_found_note() {
        let dir = tempfile::tempdir().unwrap();
        let out = build_from_json(
            &opa(&["security-risk: Bucket 'ghost' must be private."]),
            &json!({}),
            dir.path(),
            &FixSuggester::Disabled,
        )
        .await;

        assert!(out.contains("Could not locate the source of `unknown_type.ghost`"));
        assert!(!out.contains("- **File:**"));
    }

    #[test]
    fn code_fence_outgrows_inner_backticks() {
        assert_eq!(code_block("a = 1"), "```hcl\na = 1\n```\n");
        assert_eq!(
            code_block("x = \"```\""),
            "````hcl\nx = \"```\"\n````\n"
        );
    }

    #[test]
    fn report_joins_sections_with_newlines() {
        let mut r = ReviewReport::new();
        r.push("a");
        r.push(String::from("b"));
        assert_eq!(r.render(), "a\nb");
    }
}
