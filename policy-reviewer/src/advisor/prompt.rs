//! Prompt template and reply shaping for fix suggestions.

use super::FixRequest;

/// System instruction sent with every fix request.
pub const SYSTEM_PROMPT: &str = "You are a senior cloud infrastructure engineer reviewing Terraform \
changes that failed an Open Policy Agent check. Reply with the corrected Terraform resource block \
only, as HCL, without explanations.";

/// Builds the user prompt for one violation.
pub fn build_fix_prompt(req: &FixRequest<'_>) -> String {
    let mut s = String::new();
    s.push_str("A Terraform resource violates an organization policy.\n");
    s.push_str("\n# Violation\n");
    s.push_str(req.violation_message);
    s.push('\n');
    s.push_str("\n# Resource\n");
    s.push_str(&format!("- type: {}\n", req.resource_type));
    s.push_str(&format!("- name: {}\n", req.resource_name));
    s.push_str("\n# Current definition\n```hcl\n");
    s.push_str(req.resource_code);
    s.push_str("\n```\n");
    s.push_str(
        "\n# Instructions\n\
         - Return the complete fixed resource block so it can replace the current one.\n\
         - Keep unrelated attributes unchanged.\n\
         - Do not add commentary outside the code.\n",
    );
    s
}

/// Strips surrounding Markdown code fences and whitespace from a model reply.
///
/// Returns `None` when nothing is left.
pub fn normalize_suggestion(raw: &str) -> Option<String> {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string (`hcl`, `terraform`, ...) on the opening line.
        text = match rest.find('\n') {
            Some(nl) => &rest[nl + 1..],
            None => rest,
        };
        text = text.trim_end();
        if let Some(body) = text.strip_suffix("```") {
            text = body;
        }
    }

    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
