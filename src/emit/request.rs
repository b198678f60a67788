//! Request emission: url, headers, params, body, then the method call.

use std::sync::LazyLock;

use regex::Regex;

use crate::parse::component::RequestConfig;
use crate::parse::normalize::{Body, KeyValues};

use super::literal::{json_object, literal, quote};
use super::step::StepBuilder;

/// Name of the variable the request body is bound to before attachment.
const BODY_VARIABLE: &str = "requestBody";

/// RFC 7230 `token`: the characters allowed in a header field name.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[!#$%&'*+.^_`|~0-9A-Za-z-]+$").expect("token pattern is valid"));

/// Whether `name` can stand unquoted as a header or parameter name in a step.
pub fn is_token(name: &str) -> bool {
    TOKEN.is_match(name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn allows_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

pub fn emit_request(
    node_id: &str,
    method: HttpMethod,
    config: &RequestConfig,
    steps: StepBuilder,
) -> StepBuilder {
    let Some(url) = config.url.as_deref() else {
        return steps.diagnostic(node_id, format!("{} request is missing a URL", method.as_str()));
    };

    let mut steps = steps.given(format!("url {}", quote(url)));
    steps = emit_key_values(node_id, "header", "Header", &config.headers, steps);
    steps = emit_key_values(node_id, "param", "Query parameter", &config.query_params, steps);

    if method.allows_body() {
        if let Some(body) = &config.body {
            steps = emit_body(node_id, body, steps);
        }
    }

    steps.when(format!("method {}", method.as_str()))
}

fn emit_key_values(
    node_id: &str,
    keyword: &str,
    what: &str,
    entries: &KeyValues,
    mut steps: StepBuilder,
) -> StepBuilder {
    match entries {
        KeyValues::List(list) => {
            for entry in list {
                steps = if is_token(&entry.key) {
                    steps.and(format!("{} {} = {}", keyword, entry.key, quote(&entry.value)))
                } else {
                    steps.diagnostic(
                        node_id,
                        format!("{} '{}' skipped: not a valid name", what, entry.key),
                    )
                };
            }
            steps
        }
        KeyValues::Malformed(reason) => {
            steps.diagnostic(node_id, format!("{}s could not be read: {}", what, reason))
        }
    }
}

fn emit_body(node_id: &str, body: &Body, steps: StepBuilder) -> StepBuilder {
    match body {
        Body::Json(value) => steps
            .and(format!("def {} = {}", BODY_VARIABLE, literal(value)))
            .and(format!("request {}", BODY_VARIABLE)),
        Body::Form(fields) => steps
            .and(format!(
                "def {} = {}",
                BODY_VARIABLE,
                json_object(fields.iter().map(|f| (f.key.as_str(), f.value.as_str())))
            ))
            .and(format!("form fields {}", BODY_VARIABLE)),
        Body::Text(text) => steps
            .and(format!("def {} = {}", BODY_VARIABLE, quote(text)))
            .and(format!("request {}", BODY_VARIABLE)),
        Body::Malformed(reason) => {
            steps.diagnostic(node_id, format!("Request body could not be read: {}", reason))
        }
    }
}
