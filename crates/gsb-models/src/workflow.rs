//! Workflow request and response envelopes
//!
//! Workflows execute on the server. The client only names the workflow,
//! passes input and reads back the instance state.

use gsb_core::traits::Id;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The workflow endpoint being called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Run a workflow to completion
    Run,
    /// Start a workflow instance and return once it is waiting
    Start,
    /// Call a single named function of a workflow
    Function,
    /// Advance a started instance by one step
    Iterate,
}

impl WorkflowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Start => "start",
            Self::Function => "function",
            Self::Iterate => "iterate",
        }
    }

    pub fn path(&self) -> String {
        format!("/api/workflow/{}", self.as_str())
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "run" => Some(Self::Run),
            "start" => Some(Self::Start),
            "function" | "fn" => Some(Self::Function),
            "iterate" | "step" => Some(Self::Iterate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRequest {
    pub workflow_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub input: Value,
}

impl WorkflowRequest {
    pub fn new(workflow_code: impl Into<String>) -> Self {
        Self {
            workflow_code: workflow_code.into(),
            instance_id: None,
            function_name: None,
            input: Value::Null,
        }
    }

    pub fn with_input(mut self, input: Value) -> Self {
        self.input = input;
        self
    }

    pub fn for_instance(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = Some(instance_id.into());
        self
    }

    pub fn with_function(mut self, function_name: impl Into<String>) -> Self {
        self.function_name = Some(function_name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<Id>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,
    #[serde(default)]
    pub output: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_paths() {
        assert_eq!(WorkflowAction::Run.path(), "/api/workflow/run");
        assert_eq!(WorkflowAction::Iterate.path(), "/api/workflow/iterate");
        assert_eq!(WorkflowAction::from_str("FN"), Some(WorkflowAction::Function));
        assert_eq!(WorkflowAction::from_str("pause"), None);
    }

    #[test]
    fn test_request_serialization() {
        let request = WorkflowRequest::new("approveOrder")
            .for_instance("wf-9")
            .with_input(json!({ "orderId": "o-1" }));

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "workflowCode": "approveOrder",
                "instanceId": "wf-9",
                "input": { "orderId": "o-1" }
            })
        );

        let bare = serde_json::to_value(WorkflowRequest::new("ping")).unwrap();
        assert_eq!(bare, json!({ "workflowCode": "ping" }));
    }

    #[test]
    fn test_response_defaults() {
        let response: WorkflowResponse =
            serde_json::from_value(json!({ "instanceId": "wf-1" })).unwrap();
        assert_eq!(response.instance_id.as_deref(), Some("wf-1"));
        assert!(!response.is_completed);
        assert!(response.output.is_null());
    }
}
