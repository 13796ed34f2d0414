//! Public entry for the policy-reviewer pipeline.
//!
//! Turns policy-engine (OPA) violations and a Terraform plan into a Markdown
//! pull-request comment:
//!
//! 1) **Load**: violations and plan JSON; a missing file becomes `{}`
//! 2) **Parse**: classify violations (clean / parse error / messages)
//! 3) **Per violation**: decompose, resolve type, locate block, ask advisor
//! 4) **Render**: summary table, subsections, call to action
//!
//! Every step runs sequentially. Nothing here fails the run on bad input:
//! errors are logged and the report degrades instead.

pub mod advisor;
pub mod errors;
pub mod input;
pub mod locate;
pub mod publish;
pub mod report;
pub mod violations;

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, warn};

use advisor::FixSuggester;
use input::{PlanIndex, load_json_or_empty};
use violations::ViolationStatus;

/// Default file names, relative to the working directory.
pub const DEFAULT_VIOLATIONS_FILE: &str = "opa_violations.json";
pub const DEFAULT_PLAN_FILE: &str = "tfplan.json";
pub const DEFAULT_OUTPUT_FILE: &str = "pr_comment.txt";

/// Where the pipeline reads from.
#[derive(Debug, Clone)]
pub struct ReviewInputs {
    /// Policy engine result document.
    pub violations_path: PathBuf,
    /// `terraform show -json` plan document.
    pub plan_path: PathBuf,
    /// Directory holding the `.tf` files (scanned non-recursively).
    pub config_dir: PathBuf,
}

impl Default for ReviewInputs {
    fn default() -> Self {
        Self {
            violations_path: PathBuf::from(DEFAULT_VIOLATIONS_FILE),
            plan_path: PathBuf::from(DEFAULT_PLAN_FILE),
            config_dir: PathBuf::from("."),
        }
    }
}

/// Runs load → parse → locate/advise → render and returns the comment body.
pub async fn run_review(inputs: &ReviewInputs, suggester: &FixSuggester) -> String {
    let t0 = Instant::now();

    debug!(path = %inputs.violations_path.display(), "load: violations");
    let status = match load_json_or_empty(&inputs.violations_path) {
        Ok(doc) => violations::parse(&doc),
        Err(e) => {
            warn!(error = %e, "violations unreadable, reporting a parse error");
            ViolationStatus::ParseError(e.to_string())
        }
    };

    debug!(path = %inputs.plan_path.display(), "load: plan");
    let plan = match load_json_or_empty(&inputs.plan_path) {
        Ok(doc) => PlanIndex::from_plan(&doc),
        Err(e) => {
            warn!(error = %e, "plan unreadable, resource types will be unknown");
            PlanIndex::default()
        }
    };

    debug!(
        violations = match &status {
            ViolationStatus::HasViolations(m) => m.len(),
            _ => 0,
        },
        plan_resources = plan.len(),
        advisor = suggester.is_enabled(),
        "load: done ({} ms)",
        t0.elapsed().as_millis()
    );

    report::build(&status, &plan, &inputs.config_dir, suggester).await
}

// -----------------------------------------------------------------------------
// Convenience re-exports for downstream users
// -----------------------------------------------------------------------------

pub use advisor::FixRequest;
pub use errors::{Error as ReviewError, ReviewResult};
pub use locate::ResourceBlock;
pub use publish::write_comment;
pub use report::{ReviewReport, build_from_json};
pub use violations::Violation;
