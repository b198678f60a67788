//! Assertion emission and the operator table.
//!
//! Operator names map onto a closed set of comparisons. A name outside the
//! table resolves to `Equals` so the node still yields a usable check.

use serde_json::Value;

use crate::parse::component::{
    FieldAssertionConfig, HeaderAssertionConfig, ResponseTimeAssertionConfig, SchemaAssertionConfig,
    StatusAssertionConfig,
};

use super::TRACING_TARGET;
use super::literal::{literal, quote, response_path};
use super::step::StepBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Contains,
    NotContains,
}

impl Comparison {
    /// Exact table lookup. Case, spaces, `-` and `_` are ignored.
    pub fn lookup(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        let op = match key.as_str() {
            "equals" | "equal" | "eq" | "is" | "==" | "=" => Comparison::Equals,
            "notequals" | "notequal" | "ne" | "neq" | "isnot" | "!=" => Comparison::NotEquals,
            "greaterthan" | "gt" | ">" => Comparison::GreaterThan,
            "lessthan" | "lt" | "<" => Comparison::LessThan,
            "greaterthanorequal" | "greaterthanorequals" | "greaterorequal" | "gte" | "ge" | ">=" => {
                Comparison::GreaterOrEqual
            }
            "lessthanorequal" | "lessthanorequals" | "lessorequal" | "lte" | "le" | "<=" => {
                Comparison::LessOrEqual
            }
            "contains" | "includes" => Comparison::Contains,
            "notcontains" | "doesnotcontain" | "excludes" | "!contains" => Comparison::NotContains,
            _ => return None,
        };
        Some(op)
    }

    /// Resolve a requested operator. Absent means `default`; anything not in
    /// the table falls back to `Equals`.
    pub fn resolve(node_id: &str, requested: Option<&str>, default: Comparison) -> Self {
        let Some(name) = requested else {
            return default;
        };
        Comparison::lookup(name).unwrap_or_else(|| {
            tracing::debug!(
                target: TRACING_TARGET,
                node_id,
                operator = name,
                "Unrecognized operator, using equals"
            );
            Comparison::Equals
        })
    }

    pub fn token(self) -> &'static str {
        match self {
            Comparison::Equals => "==",
            Comparison::NotEquals => "!=",
            Comparison::GreaterThan => ">",
            Comparison::LessThan => "<",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessOrEqual => "<=",
            Comparison::Contains => "contains",
            Comparison::NotContains => "!contains",
        }
    }

    /// Ordering comparisons go through `assert`; the rest through `match`.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Comparison::GreaterThan | Comparison::LessThan | Comparison::GreaterOrEqual | Comparison::LessOrEqual
        )
    }

    /// Numbers have no containment; those requests read as equality.
    fn numeric(self) -> Self {
        match self {
            Comparison::Contains | Comparison::NotContains => Comparison::Equals,
            other => other,
        }
    }

    /// Whole documents only support equality and containment.
    fn structural(self) -> Self {
        if self.is_ordering() { Comparison::Equals } else { self }
    }
}

pub fn emit_status(node_id: &str, config: &StatusAssertionConfig, steps: StepBuilder) -> StepBuilder {
    let Some(expected) = config.expected_status else {
        return steps.diagnostic(node_id, "Status assertion is missing an expected status");
    };
    let op = Comparison::resolve(node_id, config.operator.as_deref(), Comparison::Equals).numeric();
    match op {
        Comparison::Equals => steps.then(format!("status {}", expected)),
        _ => steps.then(format!("assert responseStatus {} {}", op.token(), expected)),
    }
}

pub fn emit_field(node_id: &str, config: &FieldAssertionConfig, steps: StepBuilder) -> StepBuilder {
    let Some(path) = config.field_path.as_deref() else {
        return steps.diagnostic(node_id, "Field assertion is missing a field path");
    };
    let Some(expected) = config.expected_value.as_ref() else {
        return steps.diagnostic(node_id, "Field assertion is missing an expected value");
    };
    let op = Comparison::resolve(node_id, config.operator.as_deref(), Comparison::Equals);
    compare(&response_path(path), op, expected, steps)
}

pub fn emit_header(node_id: &str, config: &HeaderAssertionConfig, steps: StepBuilder) -> StepBuilder {
    let Some(name) = config.header_name.as_deref() else {
        return steps.diagnostic(node_id, "Header assertion is missing a header name");
    };
    let Some(expected) = config.expected_value.as_ref() else {
        return steps.diagnostic(node_id, "Header assertion is missing an expected value");
    };
    let op = Comparison::resolve(node_id, config.operator.as_deref(), Comparison::Equals);
    let subject = format!("karate.response.header({})", quote(name));
    compare(&subject, op, expected, steps)
}

pub fn emit_schema(node_id: &str, config: &SchemaAssertionConfig, steps: StepBuilder) -> StepBuilder {
    let Some(schema) = config.schema.as_ref() else {
        return steps.diagnostic(node_id, "Schema assertion is missing a schema");
    };
    let op = Comparison::resolve(node_id, config.operator.as_deref(), Comparison::Equals).structural();
    steps.and(format!("match response {} {}", op.token(), literal(schema)))
}

pub fn emit_response_time(
    node_id: &str,
    config: &ResponseTimeAssertionConfig,
    steps: StepBuilder,
) -> StepBuilder {
    let Some(limit) = config.max_response_time else {
        return steps.diagnostic(node_id, "Response time assertion is missing a time limit");
    };
    let op = Comparison::resolve(node_id, config.operator.as_deref(), Comparison::LessThan).numeric();
    steps.and(format!("assert responseTime {} {}", op.token(), limit))
}

fn compare(subject: &str, op: Comparison, expected: &Value, steps: StepBuilder) -> StepBuilder {
    let verb = if op.is_ordering() { "assert" } else { "match" };
    steps.and(format!("{} {} {} {}", verb, subject, op.token(), literal(expected)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lines(steps: StepBuilder) -> Vec<String> {
        steps.finish().iter().map(|s| s.line()).collect()
    }

    fn status(expected: Option<u64>, operator: Option<&str>) -> Vec<String> {
        let cfg = StatusAssertionConfig {
            expected_status: expected,
            operator: operator.map(String::from),
        };
        lines(emit_status("s1", &cfg, StepBuilder::new()))
    }

    #[test]
    fn operator_table() {
        assert_eq!(Comparison::lookup("equals"), Some(Comparison::Equals));
        assert_eq!(Comparison::lookup("not_equals"), Some(Comparison::NotEquals));
        assert_eq!(Comparison::lookup("greaterThan"), Some(Comparison::GreaterThan));
        assert_eq!(Comparison::lookup("less_than_or_equal"), Some(Comparison::LessOrEqual));
        assert_eq!(Comparison::lookup(">="), Some(Comparison::GreaterOrEqual));
        assert_eq!(Comparison::lookup("Not Contains"), Some(Comparison::NotContains));
        assert_eq!(Comparison::lookup("approximately"), None);
    }

    #[test]
    fn unknown_operator_falls_back_to_equals() {
        assert_eq!(
            Comparison::resolve("n", Some("approximately"), Comparison::LessThan),
            Comparison::Equals
        );
        assert_eq!(status(Some(404), Some("roughly")), vec!["Then status 404"]);
    }

    #[test]
    fn absent_operator_uses_kind_default() {
        assert_eq!(Comparison::resolve("n", None, Comparison::LessThan), Comparison::LessThan);
    }

    #[test]
    fn status_equals_and_ordering() {
        assert_eq!(status(Some(200), Some("equals")), vec!["Then status 200"]);
        assert_eq!(status(Some(200), None), vec!["Then status 200"]);
        assert_eq!(
            status(Some(400), Some("less_than")),
            vec!["Then assert responseStatus < 400"]
        );
        assert_eq!(status(Some(200), Some("contains")), vec!["Then status 200"]);
    }

    #[test]
    fn status_missing_expected() {
        assert_eq!(
            status(None, Some("equals")),
            vec!["# WARNING [s1]: Status assertion is missing an expected status"]
        );
    }

    #[test]
    fn field_match_and_assert() {
        let eq = FieldAssertionConfig {
            field_path: Some("$.user.name".into()),
            expected_value: Some(json!("Ada")),
            operator: Some("equals".into()),
        };
        let gt = FieldAssertionConfig {
            field_path: Some("count".into()),
            expected_value: Some(json!(3)),
            operator: Some("greater_than".into()),
        };
        let contains = FieldAssertionConfig {
            field_path: Some("$.tags".into()),
            expected_value: Some(json!("new")),
            operator: Some("contains".into()),
        };
        assert_eq!(
            lines(emit_field("f1", &eq, StepBuilder::new())),
            vec!["And match response.user.name == 'Ada'"]
        );
        assert_eq!(
            lines(emit_field("f2", &gt, StepBuilder::new())),
            vec!["And assert response.count > 3"]
        );
        assert_eq!(
            lines(emit_field("f3", &contains, StepBuilder::new())),
            vec!["And match response.tags contains 'new'"]
        );
    }

    #[test]
    fn field_unknown_operator_is_equality() {
        let cfg = FieldAssertionConfig {
            field_path: Some("$.id".into()),
            expected_value: Some(json!(7)),
            operator: Some("sorta".into()),
        };
        assert_eq!(
            lines(emit_field("f1", &cfg, StepBuilder::new())),
            vec!["And match response.id == 7"]
        );
    }

    #[test]
    fn field_missing_path() {
        let cfg = FieldAssertionConfig {
            expected_value: Some(json!(1)),
            ..FieldAssertionConfig::default()
        };
        let out = lines(emit_field("f1", &cfg, StepBuilder::new()));
        assert_eq!(out, vec!["# WARNING [f1]: Field assertion is missing a field path"]);
    }

    #[test]
    fn header_assertion() {
        let cfg = HeaderAssertionConfig {
            header_name: Some("Content-Type".into()),
            expected_value: Some(json!("json")),
            operator: Some("contains".into()),
        };
        assert_eq!(
            lines(emit_header("h1", &cfg, StepBuilder::new())),
            vec!["And match karate.response.header('Content-Type') contains 'json'"]
        );
    }

    #[test]
    fn schema_assertion() {
        let cfg = SchemaAssertionConfig {
            schema: Some(json!({"id": "#number"})),
            operator: Some("greater_than".into()),
        };
        assert_eq!(
            lines(emit_schema("x1", &cfg, StepBuilder::new())),
            vec![r##"And match response == {"id":"#number"}"##]
        );
    }

    #[test]
    fn response_time_defaults_to_less_than() {
        let cfg = ResponseTimeAssertionConfig {
            max_response_time: Some(1500),
            operator: None,
        };
        assert_eq!(
            lines(emit_response_time("t1", &cfg, StepBuilder::new())),
            vec!["And assert responseTime < 1500"]
        );
        let cfg = ResponseTimeAssertionConfig {
            max_response_time: Some(1500),
            operator: Some("bogus".into()),
        };
        assert_eq!(
            lines(emit_response_time("t1", &cfg, StepBuilder::new())),
            vec!["And assert responseTime == 1500"]
        );
    }
}
