//! Unified compiler error type for the fatal paths of a compile.
//!
//! Recoverable problems never reach this type: they are rendered as
//! diagnostic steps inside the document instead.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Parse,
    Resolve,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Parse => write!(f, "Parse"),
            Phase::Resolve => write!(f, "Resolve"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{phase}:{code}] {message}{}", node_suffix(.node_id))]
pub struct CompilerError {
    pub code: String,
    pub phase: Phase,
    pub message: String,
    pub node_id: Option<String>,
    /// Node ids along a detected dependency cycle, closing on the first id.
    pub cycle: Vec<String>,
}

fn node_suffix(node_id: &Option<String>) -> String {
    match node_id {
        Some(id) => format!(" (node '{}')", id),
        None => String::new(),
    }
}

impl CompilerError {
    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        CompilerError {
            code: code.into(),
            phase: Phase::Parse,
            message: message.into(),
            node_id: None,
            cycle: Vec::new(),
        }
    }

    /// A dependency cycle. `path` lists the participating ids in visit order.
    pub fn cycle(path: Vec<String>) -> Self {
        let node_id = path.first().cloned();
        CompilerError {
            code: "R001".into(),
            phase: Phase::Resolve,
            message: format!("Dependency cycle detected: {}", path.join(" -> ")),
            node_id,
            cycle: path,
        }
    }

    pub fn is_cycle(&self) -> bool {
        self.phase == Phase::Resolve && self.code == "R001"
    }
}
