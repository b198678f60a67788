//! Emission pass: ordered nodes → DSL steps.
//!
//! Public API: `emit_node(node, steps) -> steps`.
//! Every component kind has exactly one arm in `emit_component`.

mod assertion;
mod auth;
mod literal;
mod request;
mod step;
mod variables;

pub use assertion::Comparison;
pub use request::HttpMethod;
pub use step::{Keyword, Step, StepBuilder};
pub use variables::{AGGREGATE_VARIABLE, is_identifier};

use crate::parse::component::Component;
use crate::parse::graph::{Node, Payload};

pub const TRACING_TARGET: &str = "flow_compiler::emit";

/// Append the steps of one node to `steps` and hand the builder back.
pub fn emit_node(node: &Node, steps: StepBuilder) -> StepBuilder {
    let before = steps.len();
    let steps = match &node.payload {
        Payload::Valid(component) => emit_component(&node.id, component, steps),
        Payload::Malformed { reason } => steps.diagnostic(
            &node.id,
            format!("{} configuration could not be read: {}", node.kind.label(), reason),
        ),
    };

    tracing::trace!(
        target: TRACING_TARGET,
        node_id = %node.id,
        node_type = node.kind.type_name(),
        emitted = steps.len() - before,
        "Emitted node"
    );
    steps
}

fn emit_component(node_id: &str, component: &Component, steps: StepBuilder) -> StepBuilder {
    match component {
        Component::GetRequest(c) => request::emit_request(node_id, HttpMethod::Get, c, steps),
        Component::PostRequest(c) => request::emit_request(node_id, HttpMethod::Post, c, steps),
        Component::PutRequest(c) => request::emit_request(node_id, HttpMethod::Put, c, steps),
        Component::PatchRequest(c) => request::emit_request(node_id, HttpMethod::Patch, c, steps),
        Component::DeleteRequest(c) => request::emit_request(node_id, HttpMethod::Delete, c, steps),

        Component::BearerAuth(c) => auth::emit_bearer(node_id, c, steps),
        Component::BasicAuth(c) => auth::emit_basic(node_id, c, steps),
        Component::ApiKeyAuth(c) => auth::emit_api_key(node_id, c, steps),

        Component::StatusAssertion(c) => assertion::emit_status(node_id, c, steps),
        Component::FieldAssertion(c) => assertion::emit_field(node_id, c, steps),
        Component::HeaderAssertion(c) => assertion::emit_header(node_id, c, steps),
        Component::SchemaAssertion(c) => assertion::emit_schema(node_id, c, steps),
        Component::ResponseTimeAssertion(c) => assertion::emit_response_time(node_id, c, steps),

        Component::ExtractVariable(c) => variables::emit_extract(node_id, c, steps),
        Component::SetVariable(c) => variables::emit_set(node_id, c, steps),
        Component::LogMessage(c) => variables::emit_log(node_id, c, steps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::component::{ComponentKind, RequestConfig};

    #[test]
    fn malformed_payload_is_one_diagnostic() {
        let node = Node {
            id: "n1".into(),
            kind: ComponentKind::BasicAuth,
            payload: Payload::Malformed {
                reason: "invalid type: string \"x\", expected struct".into(),
            },
        };
        let steps = emit_node(&node, StepBuilder::new()).finish();
        assert_eq!(steps.len(), 1);
        assert_eq!(
            steps[0].line(),
            "# WARNING [n1]: Basic auth configuration could not be read: invalid type: string \"x\", expected struct"
        );
    }

    #[test]
    fn builder_is_threaded_through_nodes() {
        let get = Node {
            id: "g".into(),
            kind: ComponentKind::GetRequest,
            payload: Payload::Valid(Component::GetRequest(RequestConfig {
                url: Some("https://x".into()),
                ..RequestConfig::default()
            })),
        };
        let empty = Node {
            id: "e".into(),
            kind: ComponentKind::GetRequest,
            payload: Payload::Valid(Component::GetRequest(RequestConfig::default())),
        };
        let steps = [&get, &empty]
            .into_iter()
            .fold(StepBuilder::new(), |steps, node| emit_node(node, steps))
            .finish();
        let lines: Vec<String> = steps.iter().map(Step::line).collect();
        assert_eq!(
            lines,
            vec![
                "Given url 'https://x'",
                "When method GET",
                "# WARNING [e]: GET request is missing a URL",
            ]
        );
    }
}
