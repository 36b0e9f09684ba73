//! Workflow execution

use gsb_core::GsbResult;
use gsb_models::{WorkflowAction, WorkflowRequest, WorkflowResponse};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::GsbClient;

#[derive(Debug, Clone)]
pub struct WorkflowService {
    client: GsbClient,
}

impl WorkflowService {
    pub fn new(client: GsbClient) -> Self {
        Self { client }
    }

    pub async fn run(&self, request: &WorkflowRequest) -> GsbResult<WorkflowResponse> {
        self.execute(WorkflowAction::Run, request).await
    }

    pub async fn start(&self, request: &WorkflowRequest) -> GsbResult<WorkflowResponse> {
        self.execute(WorkflowAction::Start, request).await
    }

    pub async fn function(&self, request: &WorkflowRequest) -> GsbResult<WorkflowResponse> {
        self.execute(WorkflowAction::Function, request).await
    }

    pub async fn iterate(&self, request: &WorkflowRequest) -> GsbResult<WorkflowResponse> {
        self.execute(WorkflowAction::Iterate, request).await
    }

    /// Call a workflow endpoint
    #[instrument(skip(self, request), fields(action = action.as_str(), workflow = %request.workflow_code))]
    pub async fn execute(
        &self,
        action: WorkflowAction,
        request: &WorkflowRequest,
    ) -> GsbResult<WorkflowResponse> {
        let value = self
            .client
            .post_value(&action.path(), serde_json::to_value(request)?)
            .await?;

        let response = match value {
            Value::Null => WorkflowResponse::default(),
            Value::Object(map) if map.contains_key("output") => {
                serde_json::from_value(Value::Object(map))?
            }
            // Functions may answer with their raw result, which can carry envelope keys
            Value::Object(map) if is_envelope(&map) => {
                let raw = Value::Object(map);
                let envelope: WorkflowResponse =
                    serde_json::from_value(raw.clone()).unwrap_or_default();
                WorkflowResponse {
                    output: raw,
                    ..envelope
                }
            }
            other => WorkflowResponse {
                output: other,
                ..Default::default()
            },
        };

        debug!(
            instance_id = ?response.instance_id,
            completed = response.is_completed,
            "Workflow call returned"
        );
        Ok(response)
    }
}

fn is_envelope(map: &serde_json::Map<String, Value>) -> bool {
    ["instanceId", "status", "isCompleted", "currentStep"]
        .iter()
        .any(|key| map.contains_key(*key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::client_with;
    use crate::transport::MockApiTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_start_then_iterate() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.path == "/api/workflow/start" && req.body["workflowCode"] == json!("approveOrder"))
            .returning(|_| Ok(json!({ "instanceId": "wf-1", "status": "waiting", "currentStep": "review" })));
        transport
            .expect_post()
            .withf(|req| req.path == "/api/workflow/iterate" && req.body["instanceId"] == json!("wf-1"))
            .returning(|_| Ok(json!({ "instanceId": "wf-1", "isCompleted": true, "output": { "approved": true } })));

        let service = client_with(transport).workflows();
        let started = service
            .start(&WorkflowRequest::new("approveOrder").with_input(json!({ "orderId": "o-1" })))
            .await
            .unwrap();
        assert_eq!(started.current_step.as_deref(), Some("review"));
        assert!(!started.is_completed);

        let done = service
            .iterate(&WorkflowRequest::new("approveOrder").for_instance("wf-1"))
            .await
            .unwrap();
        assert!(done.is_completed);
        assert_eq!(done.output["approved"], json!(true));
    }

    #[tokio::test]
    async fn test_function_raw_result() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .withf(|req| req.path == "/api/workflow/function" && req.body["functionName"] == json!("total"))
            .returning(|_| Ok(json!({ "sum": 42 })));

        let response = client_with(transport)
            .workflows()
            .function(&WorkflowRequest::new("orders").with_function("total"))
            .await
            .unwrap();
        assert_eq!(response.output, json!({ "sum": 42 }));
    }

    #[tokio::test]
    async fn test_function_result_with_status_keeps_payload() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .returning(|_| Ok(json!({ "status": "ok", "sum": 42 })));

        let response = client_with(transport)
            .workflows()
            .function(&WorkflowRequest::new("orders").with_function("total"))
            .await
            .unwrap();
        assert_eq!(response.status.as_deref(), Some("ok"));
        assert_eq!(response.output, json!({ "status": "ok", "sum": 42 }));
    }

    #[tokio::test]
    async fn test_function_result_with_foreign_status_type() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_post()
            .returning(|_| Ok(json!({ "status": 3, "rows": [1, 2] })));

        let response = client_with(transport)
            .workflows()
            .function(&WorkflowRequest::new("orders").with_function("rows"))
            .await
            .unwrap();
        assert!(response.status.is_none());
        assert_eq!(response.output["rows"], json!([1, 2]));
    }

    #[tokio::test]
    async fn test_run_propagates_errors() {
        let mut transport = MockApiTransport::new();
        transport.expect_post().returning(|_| {
            Err(gsb_core::GsbError::Api {
                status: 400,
                message: "Unknown workflow".into(),
            })
        });

        let err = client_with(transport)
            .workflows()
            .run(&WorkflowRequest::new("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API error (400): Unknown workflow");
    }
}
