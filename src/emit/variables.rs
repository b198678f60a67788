//! Variable extraction and assignment.
//!
//! Entries are validated one by one: a bad entry yields a diagnostic and is
//! skipped, the remaining entries of the node still bind.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::parse::component::{ExtractVariableConfig, Extraction, LogMessageConfig, SetVariableConfig, VariableEntry};

use super::literal::{literal, quote};
use super::step::StepBuilder;

/// Name of the object that collects every variable extracted by one node.
pub const AGGREGATE_VARIABLE: &str = "extractedVariables";

/// Prefix every extraction path must start with (the response root).
const ROOT_REFERENCE: &str = "$";

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"));

pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

pub fn emit_extract(node_id: &str, config: &ExtractVariableConfig, steps: StepBuilder) -> StepBuilder {
    if config.extractions.is_empty() {
        return steps.diagnostic(node_id, "Variable extraction has no extractions configured");
    }

    let mut steps = steps;
    let mut accepted: Vec<&str> = Vec::with_capacity(config.extractions.len());

    for (i, extraction) in config.extractions.iter().enumerate() {
        match check_extraction(extraction, &accepted) {
            Ok((name, path)) => {
                let source = format!("karate.jsonPath(response, {})", quote(path));
                let line = match &extraction.default_value {
                    Some(fallback) => format!("def {} = {} || {}", name, source, literal(fallback)),
                    None => format!("def {} = {}", name, source),
                };
                steps = steps.and(line);
                accepted.push(name);
            }
            Err(reason) => {
                steps = steps.diagnostic(node_id, format!("Extraction {} skipped: {}", i + 1, reason));
            }
        }
    }

    if accepted.is_empty() {
        return steps;
    }

    let fields: Vec<String> = accepted
        .iter()
        .map(|name| format!("{}: '#({})'", name, name))
        .collect();
    steps.and(format!("def {} = {{ {} }}", AGGREGATE_VARIABLE, fields.join(", ")))
}

fn check_extraction<'a>(extraction: &'a Extraction, accepted: &[&str]) -> Result<(&'a str, &'a str), String> {
    let name = extraction.variable_name.as_deref().map(str::trim);
    let path = extraction.json_path.as_deref().map(str::trim);
    let (Some(name), Some(path)) = (name, path) else {
        return Err("variable name and JSON path are both required".into());
    };
    if !is_identifier(name) {
        return Err(format!("'{}' is not a valid variable name", name));
    }
    if !path.starts_with(ROOT_REFERENCE) {
        return Err(format!("path '{}' must start with '{}'", path, ROOT_REFERENCE));
    }
    if accepted.iter().any(|seen| *seen == name) {
        return Err(format!("variable '{}' is already extracted by this node", name));
    }
    Ok((name, path))
}

pub fn emit_set(node_id: &str, config: &SetVariableConfig, steps: StepBuilder) -> StepBuilder {
    if config.variables.is_empty() {
        return steps.diagnostic(node_id, "Set variable has no variables configured");
    }

    let mut steps = steps;
    let mut seen: HashSet<&str> = HashSet::new();

    for (i, entry) in config.variables.iter().enumerate() {
        match check_entry(entry, &seen) {
            Ok((name, value)) => {
                steps = steps.and(format!("def {} = {}", name, literal(value)));
                seen.insert(name);
            }
            Err(reason) => {
                steps = steps.diagnostic(node_id, format!("Variable {} skipped: {}", i + 1, reason));
            }
        }
    }
    steps
}

fn check_entry<'a>(
    entry: &'a VariableEntry,
    seen: &HashSet<&str>,
) -> Result<(&'a str, &'a serde_json::Value), String> {
    let (Some(name), Some(value)) = (entry.name.as_deref().map(str::trim), entry.value.as_ref()) else {
        return Err("name and value are both required".into());
    };
    if !is_identifier(name) {
        return Err(format!("'{}' is not a valid variable name", name));
    }
    if seen.contains(name) {
        return Err(format!("variable '{}' is already set by this node", name));
    }
    Ok((name, value))
}

pub fn emit_log(node_id: &str, config: &LogMessageConfig, steps: StepBuilder) -> StepBuilder {
    match config.message.as_deref() {
        Some(message) => steps.star(format!("print {}", quote(message))),
        None => steps.diagnostic(node_id, "Log message is empty"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(steps: StepBuilder) -> Vec<String> {
        steps.finish().iter().map(|s| s.line()).collect()
    }

    fn extraction(name: Option<&str>, path: Option<&str>) -> Extraction {
        Extraction {
            variable_name: name.map(String::from),
            json_path: path.map(String::from),
            default_value: None,
        }
    }

    #[test]
    fn identifier_rule() {
        assert!(is_identifier("token"));
        assert!(is_identifier("_id2"));
        assert!(!is_identifier("1bad"));
        assert!(!is_identifier("has-dash"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn extraction_binds_and_aggregates() {
        let cfg = ExtractVariableConfig {
            extractions: vec![
                extraction(Some("token"), Some("$.auth.token")),
                Extraction {
                    default_value: Some(json!(0)),
                    ..extraction(Some("count"), Some("$.total"))
                },
            ],
        };
        assert_eq!(
            lines(emit_extract("e1", &cfg, StepBuilder::new())),
            vec![
                "And def token = karate.jsonPath(response, '$.auth.token')",
                "And def count = karate.jsonPath(response, '$.total') || 0",
                "And def extractedVariables = { token: '#(token)', count: '#(count)' }",
            ]
        );
    }

    #[test]
    fn extraction_rejects_each_bad_entry() {
        let cfg = ExtractVariableConfig {
            extractions: vec![
                extraction(Some("1bad"), Some("$.a")),
                extraction(Some("ok"), Some("$.b")),
                extraction(Some("nopath"), None),
                extraction(Some("rel"), Some("data.c")),
                extraction(Some("ok"), Some("$.d")),
            ],
        };
        let out = lines(emit_extract("e1", &cfg, StepBuilder::new()));
        assert_eq!(
            out,
            vec![
                "# WARNING [e1]: Extraction 1 skipped: '1bad' is not a valid variable name",
                "And def ok = karate.jsonPath(response, '$.b')",
                "# WARNING [e1]: Extraction 3 skipped: variable name and JSON path are both required",
                "# WARNING [e1]: Extraction 4 skipped: path 'data.c' must start with '$'",
                "# WARNING [e1]: Extraction 5 skipped: variable 'ok' is already extracted by this node",
                "And def extractedVariables = { ok: '#(ok)' }",
            ]
        );
    }

    #[test]
    fn extraction_with_nothing_accepted_has_no_aggregate() {
        let cfg = ExtractVariableConfig {
            extractions: vec![extraction(None, Some("$.a"))],
        };
        let out = lines(emit_extract("e1", &cfg, StepBuilder::new()));
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with("# WARNING [e1]"));
    }

    #[test]
    fn empty_extraction_list() {
        let out = lines(emit_extract("e1", &ExtractVariableConfig::default(), StepBuilder::new()));
        assert_eq!(out, vec!["# WARNING [e1]: Variable extraction has no extractions configured"]);
    }

    #[test]
    fn set_variables() {
        let cfg = SetVariableConfig {
            variables: vec![
                VariableEntry {
                    name: Some("baseId".into()),
                    value: Some(json!(42)),
                },
                VariableEntry {
                    name: Some("label".into()),
                    value: None,
                },
                VariableEntry {
                    name: Some("greeting".into()),
                    value: Some(json!("hi")),
                },
                VariableEntry {
                    name: Some("baseId".into()),
                    value: Some(json!(1)),
                },
            ],
        };
        assert_eq!(
            lines(emit_set("v1", &cfg, StepBuilder::new())),
            vec![
                "And def baseId = 42",
                "# WARNING [v1]: Variable 2 skipped: name and value are both required",
                "And def greeting = 'hi'",
                "# WARNING [v1]: Variable 4 skipped: variable 'baseId' is already set by this node",
            ]
        );
    }

    #[test]
    fn log_message() {
        let cfg = LogMessageConfig {
            message: Some("created user".into()),
        };
        assert_eq!(
            lines(emit_log("l1", &cfg, StepBuilder::new())),
            vec!["* print 'created user'"]
        );
    }
}
