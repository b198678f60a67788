//! The closed set of test components and their typed payloads.
//!
//! Every recognized `type` string maps to one `ComponentKind`; the node's
//! `data` object is decoded into the matching `Component` variant. Adding a
//! kind means touching `ComponentKind`, `Component::decode` and the emitter
//! dispatch, all of which are exhaustive matches.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::normalize::{self, Body, KeyValues};

// =============================================================================
// KIND ENUMERATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentKind {
    // Requests
    GetRequest,
    PostRequest,
    PutRequest,
    PatchRequest,
    DeleteRequest,

    // Auth
    BearerAuth,
    BasicAuth,
    ApiKeyAuth,

    // Assertions
    StatusAssertion,
    FieldAssertion,
    HeaderAssertion,
    SchemaAssertion,
    ResponseTimeAssertion,

    // Data
    ExtractVariable,
    SetVariable,
    LogMessage,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 16] = [
        ComponentKind::GetRequest,
        ComponentKind::PostRequest,
        ComponentKind::PutRequest,
        ComponentKind::PatchRequest,
        ComponentKind::DeleteRequest,
        ComponentKind::BearerAuth,
        ComponentKind::BasicAuth,
        ComponentKind::ApiKeyAuth,
        ComponentKind::StatusAssertion,
        ComponentKind::FieldAssertion,
        ComponentKind::HeaderAssertion,
        ComponentKind::SchemaAssertion,
        ComponentKind::ResponseTimeAssertion,
        ComponentKind::ExtractVariable,
        ComponentKind::SetVariable,
        ComponentKind::LogMessage,
    ];

    pub fn from_type_name(name: &str) -> Option<Self> {
        ComponentKind::ALL.into_iter().find(|k| k.type_name() == name)
    }

    pub fn type_name(self) -> &'static str {
        match self {
            ComponentKind::GetRequest => "GET_REQUEST",
            ComponentKind::PostRequest => "POST_REQUEST",
            ComponentKind::PutRequest => "PUT_REQUEST",
            ComponentKind::PatchRequest => "PATCH_REQUEST",
            ComponentKind::DeleteRequest => "DELETE_REQUEST",
            ComponentKind::BearerAuth => "BEARER_AUTH",
            ComponentKind::BasicAuth => "BASIC_AUTH",
            ComponentKind::ApiKeyAuth => "API_KEY_AUTH",
            ComponentKind::StatusAssertion => "STATUS_ASSERTION",
            ComponentKind::FieldAssertion => "FIELD_ASSERTION",
            ComponentKind::HeaderAssertion => "HEADER_ASSERTION",
            ComponentKind::SchemaAssertion => "SCHEMA_ASSERTION",
            ComponentKind::ResponseTimeAssertion => "RESPONSE_TIME_ASSERTION",
            ComponentKind::ExtractVariable => "EXTRACT_VARIABLE",
            ComponentKind::SetVariable => "SET_VARIABLE",
            ComponentKind::LogMessage => "LOG_MESSAGE",
        }
    }

    /// Human-readable name used in diagnostic steps.
    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::GetRequest => "GET request",
            ComponentKind::PostRequest => "POST request",
            ComponentKind::PutRequest => "PUT request",
            ComponentKind::PatchRequest => "PATCH request",
            ComponentKind::DeleteRequest => "DELETE request",
            ComponentKind::BearerAuth => "Bearer auth",
            ComponentKind::BasicAuth => "Basic auth",
            ComponentKind::ApiKeyAuth => "API key auth",
            ComponentKind::StatusAssertion => "Status assertion",
            ComponentKind::FieldAssertion => "Field assertion",
            ComponentKind::HeaderAssertion => "Header assertion",
            ComponentKind::SchemaAssertion => "Schema assertion",
            ComponentKind::ResponseTimeAssertion => "Response time assertion",
            ComponentKind::ExtractVariable => "Variable extraction",
            ComponentKind::SetVariable => "Set variable",
            ComponentKind::LogMessage => "Log message",
        }
    }
}

// =============================================================================
// COMPONENT: tagged union over the kinds
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    GetRequest(RequestConfig),
    PostRequest(RequestConfig),
    PutRequest(RequestConfig),
    PatchRequest(RequestConfig),
    DeleteRequest(RequestConfig),

    BearerAuth(BearerAuthConfig),
    BasicAuth(BasicAuthConfig),
    ApiKeyAuth(ApiKeyAuthConfig),

    StatusAssertion(StatusAssertionConfig),
    FieldAssertion(FieldAssertionConfig),
    HeaderAssertion(HeaderAssertionConfig),
    SchemaAssertion(SchemaAssertionConfig),
    ResponseTimeAssertion(ResponseTimeAssertionConfig),

    ExtractVariable(ExtractVariableConfig),
    SetVariable(SetVariableConfig),
    LogMessage(LogMessageConfig),
}

impl Component {
    /// Decode a node's `data` for the given kind. A missing or `null` payload
    /// decodes like an empty object.
    pub fn decode(kind: ComponentKind, data: &Value) -> Result<Component, serde_json::Error> {
        let data = match data {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other.clone(),
        };
        let component = match kind {
            ComponentKind::GetRequest => Component::GetRequest(serde_json::from_value(data)?),
            ComponentKind::PostRequest => Component::PostRequest(serde_json::from_value(data)?),
            ComponentKind::PutRequest => Component::PutRequest(serde_json::from_value(data)?),
            ComponentKind::PatchRequest => Component::PatchRequest(serde_json::from_value(data)?),
            ComponentKind::DeleteRequest => Component::DeleteRequest(serde_json::from_value(data)?),
            ComponentKind::BearerAuth => Component::BearerAuth(serde_json::from_value(data)?),
            ComponentKind::BasicAuth => Component::BasicAuth(serde_json::from_value(data)?),
            ComponentKind::ApiKeyAuth => Component::ApiKeyAuth(serde_json::from_value(data)?),
            ComponentKind::StatusAssertion => Component::StatusAssertion(serde_json::from_value(data)?),
            ComponentKind::FieldAssertion => Component::FieldAssertion(serde_json::from_value(data)?),
            ComponentKind::HeaderAssertion => Component::HeaderAssertion(serde_json::from_value(data)?),
            ComponentKind::SchemaAssertion => Component::SchemaAssertion(serde_json::from_value(data)?),
            ComponentKind::ResponseTimeAssertion => {
                Component::ResponseTimeAssertion(serde_json::from_value(data)?)
            }
            ComponentKind::ExtractVariable => Component::ExtractVariable(serde_json::from_value(data)?),
            ComponentKind::SetVariable => Component::SetVariable(serde_json::from_value(data)?),
            ComponentKind::LogMessage => Component::LogMessage(serde_json::from_value(data)?),
        };
        Ok(component)
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::GetRequest(_) => ComponentKind::GetRequest,
            Component::PostRequest(_) => ComponentKind::PostRequest,
            Component::PutRequest(_) => ComponentKind::PutRequest,
            Component::PatchRequest(_) => ComponentKind::PatchRequest,
            Component::DeleteRequest(_) => ComponentKind::DeleteRequest,
            Component::BearerAuth(_) => ComponentKind::BearerAuth,
            Component::BasicAuth(_) => ComponentKind::BasicAuth,
            Component::ApiKeyAuth(_) => ComponentKind::ApiKeyAuth,
            Component::StatusAssertion(_) => ComponentKind::StatusAssertion,
            Component::FieldAssertion(_) => ComponentKind::FieldAssertion,
            Component::HeaderAssertion(_) => ComponentKind::HeaderAssertion,
            Component::SchemaAssertion(_) => ComponentKind::SchemaAssertion,
            Component::ResponseTimeAssertion(_) => ComponentKind::ResponseTimeAssertion,
            Component::ExtractVariable(_) => ComponentKind::ExtractVariable,
            Component::SetVariable(_) => ComponentKind::SetVariable,
            Component::LogMessage(_) => ComponentKind::LogMessage,
        }
    }
}

// =============================================================================
// REQUEST CONFIG
// =============================================================================

/// Shared payload of every request kind. GET and DELETE ignore `body`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RequestWire")]
pub struct RequestConfig {
    pub url: Option<String>,
    pub headers: KeyValues,
    pub query_params: KeyValues,
    pub body: Option<Body>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestWire {
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    url: Option<String>,
    #[serde(default)]
    headers: KeyValues,
    #[serde(default, alias = "params")]
    query_params: KeyValues,
    #[serde(default)]
    body: Option<Value>,
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    body_type: Option<String>,
}

impl From<RequestWire> for RequestConfig {
    fn from(wire: RequestWire) -> Self {
        RequestConfig {
            url: wire.url.map(|u| u.trim().to_string()),
            headers: wire.headers,
            query_params: wire.query_params,
            body: Body::normalize(wire.body.as_ref(), wire.body_type.as_deref()),
        }
    }
}

// =============================================================================
// AUTH CONFIGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BearerAuthConfig {
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BasicAuthConfig {
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    #[default]
    Header,
    Query,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyAuthConfig {
    #[serde(default, alias = "headerName", deserialize_with = "normalize::lenient_string")]
    pub key_name: Option<String>,
    #[serde(default, alias = "apiKey", deserialize_with = "normalize::lenient_string")]
    pub key_value: Option<String>,
    #[serde(default, alias = "addTo")]
    pub location: ApiKeyLocation,
}

// =============================================================================
// ASSERTION CONFIGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusAssertionConfig {
    #[serde(default, alias = "statusCode", deserialize_with = "normalize::lenient_u64")]
    pub expected_status: Option<u64>,
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub operator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldAssertionConfig {
    #[serde(default, alias = "jsonPath", deserialize_with = "normalize::lenient_string")]
    pub field_path: Option<String>,
    #[serde(default, deserialize_with = "normalize::optional_literal")]
    pub expected_value: Option<Value>,
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub operator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderAssertionConfig {
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub header_name: Option<String>,
    #[serde(default, deserialize_with = "normalize::optional_literal")]
    pub expected_value: Option<Value>,
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub operator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAssertionConfig {
    #[serde(default, deserialize_with = "normalize::json_document")]
    pub schema: Option<Value>,
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub operator: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTimeAssertionConfig {
    #[serde(
        default,
        alias = "maxTime",
        alias = "threshold",
        deserialize_with = "normalize::lenient_u64"
    )]
    pub max_response_time: Option<u64>,
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub operator: Option<String>,
}

// =============================================================================
// DATA CONFIGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub variable_name: Option<String>,
    #[serde(default, alias = "path", deserialize_with = "normalize::lenient_string")]
    pub json_path: Option<String>,
    #[serde(default, deserialize_with = "normalize::optional_literal")]
    pub default_value: Option<Value>,
}

/// Either a list of `extractions` or one inline extraction on the node itself.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "ExtractWire")]
pub struct ExtractVariableConfig {
    pub extractions: Vec<Extraction>,
}

#[derive(Deserialize)]
struct ExtractWire {
    #[serde(default)]
    extractions: Option<Vec<Extraction>>,
    #[serde(flatten)]
    inline: Extraction,
}

impl From<ExtractWire> for ExtractVariableConfig {
    fn from(wire: ExtractWire) -> Self {
        let extractions = match wire.extractions {
            Some(list) if !list.is_empty() => list,
            _ if wire.inline != Extraction::default() => vec![wire.inline],
            _ => Vec::new(),
        };
        ExtractVariableConfig { extractions }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VariableEntry {
    #[serde(default, alias = "variableName", deserialize_with = "normalize::lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "normalize::optional_literal")]
    pub value: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SetVariableConfig {
    #[serde(default)]
    pub variables: Vec<VariableEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogMessageConfig {
    #[serde(default, deserialize_with = "normalize::lenient_string")]
    pub message: Option<String>,
}
