//! Auth decorators: each becomes a single header or query assignment.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::parse::component::{ApiKeyAuthConfig, ApiKeyLocation, BasicAuthConfig, BearerAuthConfig};

use super::literal::quote;
use super::request::is_token;
use super::step::StepBuilder;

const DEFAULT_API_KEY_NAME: &str = "X-API-Key";

pub fn emit_bearer(node_id: &str, config: &BearerAuthConfig, steps: StepBuilder) -> StepBuilder {
    match config.token.as_deref() {
        Some(token) => steps.and(format!(
            "header Authorization = {}",
            quote(&format!("Bearer {}", token))
        )),
        None => steps.diagnostic(node_id, "Bearer auth is missing a token"),
    }
}

pub fn emit_basic(node_id: &str, config: &BasicAuthConfig, steps: StepBuilder) -> StepBuilder {
    let (Some(username), Some(password)) = (config.username.as_deref(), config.password.as_deref())
    else {
        return steps.diagnostic(node_id, "Basic auth requires both a username and a password");
    };
    let encoded = STANDARD.encode(format!("{}:{}", username, password));
    steps.and(format!(
        "header Authorization = {}",
        quote(&format!("Basic {}", encoded))
    ))
}

pub fn emit_api_key(node_id: &str, config: &ApiKeyAuthConfig, steps: StepBuilder) -> StepBuilder {
    let Some(value) = config.key_value.as_deref() else {
        return steps.diagnostic(node_id, "API key auth is missing a key value");
    };
    let name = config.key_name.as_deref().unwrap_or(DEFAULT_API_KEY_NAME);
    let (keyword, target) = match config.location {
        ApiKeyLocation::Header => ("header", "header"),
        ApiKeyLocation::Query => ("param", "query parameter"),
    };
    if !is_token(name) {
        return steps.diagnostic(node_id, format!("API key name '{}' is not a valid {} name", name, target));
    }
    steps.and(format!("{} {} = {}", keyword, name, quote(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(steps: StepBuilder) -> Vec<String> {
        steps.finish().iter().map(|s| s.line()).collect()
    }

    #[test]
    fn bearer_header() {
        let cfg = BearerAuthConfig {
            token: Some("abc.def".into()),
        };
        assert_eq!(
            lines(emit_bearer("a1", &cfg, StepBuilder::new())),
            vec!["And header Authorization = 'Bearer abc.def'"]
        );
    }

    #[test]
    fn bearer_without_token() {
        let out = lines(emit_bearer("a1", &BearerAuthConfig::default(), StepBuilder::new()));
        assert_eq!(out, vec!["# WARNING [a1]: Bearer auth is missing a token"]);
    }

    #[test]
    fn basic_is_base64_encoded() {
        let cfg = BasicAuthConfig {
            username: Some("user".into()),
            password: Some("pass".into()),
        };
        assert_eq!(
            lines(emit_basic("a1", &cfg, StepBuilder::new())),
            vec!["And header Authorization = 'Basic dXNlcjpwYXNz'"]
        );
    }

    #[test]
    fn basic_requires_password() {
        let cfg = BasicAuthConfig {
            username: Some("user".into()),
            password: None,
        };
        let out = lines(emit_basic("a1", &cfg, StepBuilder::new()));
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with("# WARNING [a1]"));
    }

    #[test]
    fn api_key_in_header_and_query() {
        let header = ApiKeyAuthConfig {
            key_name: None,
            key_value: Some("k-1".into()),
            location: ApiKeyLocation::Header,
        };
        let query = ApiKeyAuthConfig {
            key_name: Some("api_key".into()),
            key_value: Some("k-2".into()),
            location: ApiKeyLocation::Query,
        };
        assert_eq!(
            lines(emit_api_key("a1", &header, StepBuilder::new())),
            vec!["And header X-API-Key = 'k-1'"]
        );
        assert_eq!(
            lines(emit_api_key("a2", &query, StepBuilder::new())),
            vec!["And param api_key = 'k-2'"]
        );
    }

    #[test]
    fn api_key_name_must_be_a_token() {
        let cfg = ApiKeyAuthConfig {
            key_name: Some("api key".into()),
            key_value: Some("k-1".into()),
            location: ApiKeyLocation::Query,
        };
        assert_eq!(
            lines(emit_api_key("a1", &cfg, StepBuilder::new())),
            vec!["# WARNING [a1]: API key name 'api key' is not a valid query parameter name"]
        );
    }
}
