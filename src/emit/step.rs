//! Steps and the append-only builder threaded through emission.

use std::fmt;

use serde::Serialize;

/// Gherkin keyword that opens an instruction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Keyword {
    Given,
    When,
    Then,
    And,
    /// Karate's keyword-less `*` prefix.
    Star,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Given => "Given",
            Keyword::When => "When",
            Keyword::Then => "Then",
            Keyword::And => "And",
            Keyword::Star => "*",
        }
    }
}

/// One line of the scenario body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Step {
    Instruction { keyword: Keyword, text: String },
    /// Inline notice standing in for output a node could not produce.
    /// Rendered as a Gherkin comment so the document stays runnable.
    Diagnostic { subject_id: String, message: String },
}

impl Step {
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Step::Diagnostic { .. })
    }

    /// The rendered line, without indentation.
    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Instruction { keyword, text } => write!(f, "{} {}", keyword.as_str(), text),
            Step::Diagnostic { subject_id, message } => {
                write!(f, "# WARNING [{}]: {}", subject_id, message)
            }
        }
    }
}

/// Append-only accumulator. Emission functions take it by value and hand it
/// back, so each compile owns exactly one and nothing else can write to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepBuilder {
    steps: Vec<Step>,
}

impl StepBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn instruction(self, keyword: Keyword, text: impl Into<String>) -> Self {
        self.push(Step::Instruction {
            keyword,
            text: single_line(text.into()),
        })
    }

    pub fn given(self, text: impl Into<String>) -> Self {
        self.instruction(Keyword::Given, text)
    }

    pub fn when(self, text: impl Into<String>) -> Self {
        self.instruction(Keyword::When, text)
    }

    pub fn then(self, text: impl Into<String>) -> Self {
        self.instruction(Keyword::Then, text)
    }

    pub fn and(self, text: impl Into<String>) -> Self {
        self.instruction(Keyword::And, text)
    }

    pub fn star(self, text: impl Into<String>) -> Self {
        self.instruction(Keyword::Star, text)
    }

    pub fn diagnostic(self, subject_id: &str, message: impl Into<String>) -> Self {
        self.push(Step::Diagnostic {
            subject_id: single_line(subject_id.to_string()),
            message: single_line(message.into()),
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn finish(self) -> Vec<Step> {
        self.steps
    }
}

/// Steps are single lines; stray line breaks collapse to spaces.
fn single_line(text: String) -> String {
    if text.contains(['\n', '\r']) {
        text.replace("\r\n", " ").replace(['\n', '\r'], " ")
    } else {
        text
    }
}
