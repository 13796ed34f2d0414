//! Violation parsing and message decomposition.
//!
//! The policy engine reports violations as
//! `result[0].expressions[0].value = ["<category>: <body>", ...]`.
//! Everything outside that path is ignored.

use serde_json::Value;

use crate::errors::Error;

/// Category used for messages without a `<category>:` prefix.
pub const DEFAULT_CATEGORY: &str = "General";

/// Resource name used when the body has no single-quoted name.
pub const UNKNOWN_RESOURCE: &str = "Unknown";

/// Outcome of reading a violation document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationStatus {
    /// No violations reported.
    Clean,
    /// A result is present but not in the expected shape.
    ParseError(String),
    /// Ordered violation messages.
    HasViolations(Vec<String>),
}

/// Classifies a violation document. Never panics; structural surprises map
/// to [`ViolationStatus::ParseError`].
pub fn parse(violations: &Value) -> ViolationStatus {
    match extract_messages(violations) {
        Ok(messages) if messages.is_empty() => ViolationStatus::Clean,
        Ok(messages) => ViolationStatus::HasViolations(messages),
        Err(e) => ViolationStatus::ParseError(e.to_string()),
    }
}

fn extract_messages(violations: &Value) -> Result<Vec<String>, Error> {
    let malformed = |what: &str| Error::MalformedViolations(what.to_string());

    let Value::Object(root) = violations else {
        return Err(malformed("document is not a JSON object"));
    };

    let results = match root.get("result") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) if items.is_empty() => return Ok(Vec::new()),
        Some(Value::Object(map)) if map.is_empty() => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(malformed("`result` is not a list")),
    };

    let value = results[0]
        .get("expressions")
        .and_then(Value::as_array)
        .and_then(|exprs| exprs.first())
        .and_then(|expr| expr.get("value"))
        .ok_or_else(|| malformed("missing `result[0].expressions[0].value`"))?;

    let Value::Array(items) = value else {
        return Err(malformed("`value` is not a list"));
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| malformed("`value` contains a non-string entry"))
        })
        .collect()
}

/// A violation message split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub category: String,
    pub body: String,
    pub resource_name: String,
}

impl Violation {
    /// Splits `"<category>: <body>"` on the first colon and pulls the first
    /// single-quoted name out of the body.
    pub fn decompose(message: &str) -> Self {
        let (category, body) = match message.split_once(':') {
            Some((left, right)) => (left.trim().to_string(), right.trim().to_string()),
            None => (DEFAULT_CATEGORY.to_string(), message.to_string()),
        };

        let resource_name = first_quoted(&body)
            .unwrap_or(UNKNOWN_RESOURCE)
            .to_string();

        Self {
            category,
            body,
            resource_name,
        }
    }

    /// Summary table row; every cell is pipe-escaped so the row keeps three columns.
    pub fn table_row(&self) -> String {
        format!(
            "| **{}** | {} | `{}` |",
            escape_pipes(&self.category),
            escape_pipes(&self.body),
            escape_pipes(&self.resource_name)
        )
    }
}

/// Text between the first pair of single quotes (may be empty).
fn first_quoted(text: &str) -> Option<&str> {
    let mut parts = text.splitn(3, '\'');
    parts.next()?;
    let inner = parts.next()?;
    // A third part exists only if the closing quote was found.
    parts.next().map(|_| inner)
}

/// Escapes `|` so the text can sit inside a Markdown table cell.
pub fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn opa(value: Value) -> Value {
        json!({ "result": [ { "expressions": [ { "value": value } ] } ] })
    }

    #[test]
    fn absent_or_empty_result_is_clean() {
        assert_eq!(parse(&json!({})), ViolationStatus::Clean);
        assert_eq!(parse(&json!({ "result": null })), ViolationStatus::Clean);
        assert_eq!(parse(&json!({ "result": [] })), ViolationStatus::Clean);
        assert_eq!(parse(&opa(json!([]))), ViolationStatus::Clean);
    }

    #[test]
    fn malformed_paths_are_parse_errors() {
        let cases = [
            json!({ "result": [ {} ] }),
            json!({ "result": [ { "expressions": [] } ] }),
            json!({ "result": [ { "expressions": [ { "text": "data.x" } ] } ] }),
            json!({ "result": "oops" }),
            json!({ "result": [ "not an object" ] }),
            opa(json!("single string")),
            opa(json!(["ok", 3])),
            json!([1, 2, 3]),
        ];
        for case in cases {
            assert!(
                matches!(parse(&case), ViolationStatus::ParseError(_)),
                "expected parse error for {case}"
            );
        }
    }

    #[test]
    fn messages_keep_their_order() {
        let status = parse(&opa(json!(["b: second", "a: first", "c: third"])));
        assert_eq!(
            status,
            ViolationStatus::HasViolations(vec![
                "b: second".into(),
                "a: first".into(),
                "c: third".into()
            ])
        );
    }

    #[test]
    fn only_the_first_result_and_expression_are_read() {
        let doc = json!({
            "result": [
                { "expressions": [ { "value": ["x: one"] }, { "value": ["x: ignored"] } ] },
                { "expressions": "garbage" }
            ]
        });
        assert_eq!(
            parse(&doc),
            ViolationStatus::HasViolations(vec!["x: one".into()])
        );
    }

    #[test]
    fn decomposes_category_body_and_resource() {
        let v = Violation::decompose("security-risk: Bucket 'my-bucket' must be private.");
        assert_eq!(v.category, "security-risk");
        assert_eq!(v.body, "Bucket 'my-bucket' must be private.");
        assert_eq!(v.resource_name, "my-bucket");

        // Decomposing the same message again gives the same parts.
        assert_eq!(
            v,
            Violation::decompose("security-risk: Bucket 'my-bucket' must be private.")
        );
    }

    #[test]
    fn message_without_colon_is_general() {
        let v = Violation::decompose("no colon here");
        assert_eq!(v.category, DEFAULT_CATEGORY);
        assert_eq!(v.body, "no colon here");
        assert_eq!(v.resource_name, UNKNOWN_RESOURCE);
    }

    #[test]
    fn splits_on_first_colon_only() {
        let v = Violation::decompose("  cost : Instance 'vm-1' uses type: n2-highmem ");
        assert_eq!(v.category, "cost");
        assert_eq!(v.body, "Instance 'vm-1' uses type: n2-highmem");
        assert_eq!(v.resource_name, "vm-1");
    }

    #[test]
    fn resource_is_first_quoted_run() {
        assert_eq!(
            Violation::decompose("x: 'a' and 'b'").resource_name,
            "a"
        );
        assert_eq!(Violation::decompose("x: it''s").resource_name, "");
        assert_eq!(
            Violation::decompose("x: dangling 'quote").resource_name,
            UNKNOWN_RESOURCE
        );
    }

    #[test]
    fn pipes_are_escaped_for_tables() {
        let v = Violation::decompose("naming: Label 'a|b' must match ^[a-z]+$|^x$");
        assert_eq!(v.resource_name, "a|b");
        assert_eq!(
            v.table_row(),
            "| **naming** | Label 'a\\|b' must match ^[a-z]+$\\|^x$ | `a\\|b` |"
        );
    }
}
