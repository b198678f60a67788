//! Assembly pass: ordered steps → feature document text.

mod writer;

use std::fmt;

use serde::Serialize;

use crate::emit::Step;
use writer::FeatureWriter;

pub const FEATURE_NAME: &str = "Generated API Test";
pub const SCENARIO_NAME: &str = "Visual Flow Test";

/// The result of one compile. Built once and rendered; holds no other state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledDocument {
    pub feature_name: String,
    pub scenario_name: String,
    pub steps: Vec<Step>,
}

impl CompiledDocument {
    pub fn new(steps: Vec<Step>) -> Self {
        CompiledDocument {
            feature_name: FEATURE_NAME.into(),
            scenario_name: SCENARIO_NAME.into(),
            steps,
        }
    }

    pub fn diagnostic_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_diagnostic()).count()
    }

    /// Render the feature/scenario envelope with one indented step per line.
    pub fn render(&self) -> String {
        let mut w = FeatureWriter::new();
        w.section("Feature", &self.feature_name);
        w.blank();
        w.section("Scenario", &self.scenario_name);
        w.indent();
        for step in &self.steps {
            w.line(&step.line());
        }
        w.dedent();
        w.finish()
    }
}

impl fmt::Display for CompiledDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
