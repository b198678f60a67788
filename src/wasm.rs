//! WASM entry points for the browser editor.

use wasm_bindgen::prelude::*;

use crate::error::CompilerError;
use crate::parse::GraphDiagnostic;

/// Full pipeline: parse → build → resolve → emit → assemble.
/// Returns a JSON object with either `document` (success) or `errors` (failure).
#[wasm_bindgen]
pub fn compile_flow(json: &str) -> JsValue {
    let result = compile_flow_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn compile_flow_inner(json: &str) -> CompileResult {
    match crate::compile_json(json) {
        Ok(document) => CompileResult::Success { document },
        Err(error) => CompileResult::Errors {
            errors: vec![ErrorDto::from(error)],
        },
    }
}

/// Parse and build the graph only. Returns a JSON array of the nodes and
/// connections that would be dropped, or the parse error.
#[wasm_bindgen]
pub fn inspect_flow(json: &str) -> JsValue {
    let result = inspect_flow_inner(json);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn inspect_flow_inner(json: &str) -> InspectResult {
    match crate::parse::parse_and_build(json) {
        Ok(graph) => InspectResult::Success {
            diagnostics: graph.diagnostics,
        },
        Err(error) => InspectResult::Errors {
            errors: vec![ErrorDto::from(error)],
        },
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    node_id: Option<String>,
    cycle: Vec<String>,
}

impl From<CompilerError> for ErrorDto {
    fn from(e: CompilerError) -> Self {
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            node_id: e.node_id,
            cycle: e.cycle,
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum CompileResult {
    #[serde(rename = "success")]
    Success { document: String },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum InspectResult {
    #[serde(rename = "success")]
    Success { diagnostics: Vec<GraphDiagnostic> },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_result_shapes() {
        let ok = serde_json::to_value(compile_flow_inner(r#"{"nodes": []}"#)).unwrap();
        assert_eq!(ok["status"], "success");
        assert_eq!(
            ok["document"],
            "Feature: Generated API Test\n\nScenario: Visual Flow Test\n"
        );

        let cyclic = r#"{
            "nodes": [
                {"id": "a", "type": "LOG_MESSAGE", "data": {"message": "a"}},
                {"id": "b", "type": "LOG_MESSAGE", "data": {"message": "b"}}
            ],
            "connections": [
                {"id": "c1", "fromNodeId": "a", "toNodeId": "b"},
                {"id": "c2", "fromNodeId": "b", "toNodeId": "a"}
            ]
        }"#;
        let err = serde_json::to_value(compile_flow_inner(cyclic)).unwrap();
        assert_eq!(err["status"], "errors");
        assert_eq!(err["errors"][0]["code"], "R001");
        assert_eq!(err["errors"][0]["nodeId"], "a");
    }

    #[test]
    fn inspect_reports_dropped_nodes() {
        let json = r#"{"nodes": [{"id": "x", "type": "MYSTERY"}]}"#;
        let out = serde_json::to_value(inspect_flow_inner(json)).unwrap();
        assert_eq!(out["status"], "success");
        assert_eq!(out["diagnostics"][0]["code"], "G002");
        assert_eq!(out["diagnostics"][0]["subjectId"], "x");
    }
}
