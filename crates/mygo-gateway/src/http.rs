//! `HttpGateway`: the dashboard backend over blocking HTTP.
//!
//! Every operation is a JSON `POST` except the listings, which are `GET`.
//! Non-success statuses become `MygoError::Status` carrying the backend's
//! `error` string when it sent one.
//!
//! The backend syncs explicit document objects, so a sync first lists the
//! source's (or project's) documents and then posts them.

use std::io::Read;
use std::path::Path;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use mygo_contracts::{
    error::{MygoError, MygoResult},
    gateway::{
        BinaryPayload, ImproviseRequest, ImprovisedSolution, ProjectSummary,
        RefineSolutionRequest, RequirementsReview, SimilarSolution, SolutionProposal,
        SourceSummary, SyncReport, SyncScope,
    },
    request::{AgentRequest, Operation},
};
use mygo_core::traits::BackendGateway;

use crate::config::GatewayConfig;

/// Upper bound on a downloaded document.
const MAX_DOWNLOAD_BYTES: u64 = 64 * 1024 * 1024;

pub struct HttpGateway {
    config: GatewayConfig,
    agent: ureq::Agent,
}

impl HttpGateway {
    /// Build a gateway from a validated configuration.
    pub fn new(config: GatewayConfig) -> MygoResult<Self> {
        config.validate()?;
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Ok(Self { config, agent })
    }

    pub fn from_file(path: &Path) -> MygoResult<Self> {
        Self::new(GatewayConfig::from_file(path)?)
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn post(&self, operation: Operation, body: &Value) -> MygoResult<ureq::Response> {
        let url = self.config.url(operation, None);
        debug!(operation = operation.name(), url = %url, "POST");
        self.agent
            .post(&url)
            .send_json(body)
            .map_err(|e| request_error(operation, e))
    }

    fn post_json(&self, operation: Operation, body: &Value) -> MygoResult<Value> {
        let response = self.post(operation, body)?;
        read_json(operation, response)
    }

    fn get_json(
        &self,
        operation: Operation,
        source_id: Option<&str>,
        query: &[(&str, &str)],
    ) -> MygoResult<Value> {
        let url = self.config.url(operation, source_id);
        debug!(operation = operation.name(), url = %url, "GET");
        let mut request = self.agent.get(&url);
        for (param, value) in query {
            request = request.query(param, value);
        }
        let response = request.call().map_err(|e| request_error(operation, e))?;
        read_json(operation, response)
    }

    fn list_documents(&self, scope: &SyncScope) -> MygoResult<Vec<Value>> {
        let op = Operation::ListDocuments;
        let query: Vec<(&str, &str)> = scope
            .project_id
            .as_deref()
            .map(|project_id| ("projectId", project_id))
            .into_iter()
            .collect();
        let body = self.get_json(op, Some(&scope.source_id), &query)?;
        decode(op, unwrap_list(body, "documents"))
    }
}

impl BackendGateway for HttpGateway {
    fn invoke(&self, request: &AgentRequest) -> MygoResult<Value> {
        self.post_json(request.operation(), &request.body())
    }

    fn download(&self, request: &AgentRequest) -> MygoResult<BinaryPayload> {
        let operation = request.operation();
        let response = self.post(operation, &request.body())?;
        let content_type = response.content_type().to_string();
        let bytes = read_limited(operation, response.into_reader(), MAX_DOWNLOAD_BYTES)?;
        debug!(
            operation = operation.name(),
            content_type = %content_type,
            bytes = bytes.len(),
            "document downloaded"
        );
        binary_payload(operation, content_type, bytes)
    }

    fn submit_requirements(&self, requirements: &str) -> MygoResult<RequirementsReview> {
        let op = Operation::SubmitRequirements;
        decode(op, self.post_json(op, &json!({ "requirements": requirements }))?)
    }

    fn generate_solution(&self, requirements: &str) -> MygoResult<SolutionProposal> {
        let op = Operation::GenerateSolution;
        decode(op, self.post_json(op, &json!({ "requirements": requirements }))?)
    }

    fn refine_solution(&self, request: &RefineSolutionRequest) -> MygoResult<SolutionProposal> {
        let op = Operation::RefineSolution;
        decode(op, self.post_json(op, &to_body(op, request)?)?)
    }

    fn search_similar(&self, solution_summary: &str) -> MygoResult<Vec<SimilarSolution>> {
        let op = Operation::SearchSimilar;
        let body = self.post_json(op, &json!({ "solution_summary": solution_summary }))?;
        decode(op, unwrap_list(body, "similar_solutions"))
    }

    fn improvise(&self, request: &ImproviseRequest) -> MygoResult<ImprovisedSolution> {
        let op = Operation::Improvise;
        decode(op, self.post_json(op, &to_body(op, request)?)?)
    }

    fn list_sources(&self) -> MygoResult<Vec<SourceSummary>> {
        let op = Operation::ListSources;
        decode(op, unwrap_list(self.get_json(op, None, &[])?, "sources"))
    }

    fn list_projects(&self, source_id: &str) -> MygoResult<Vec<ProjectSummary>> {
        let op = Operation::ListProjects;
        decode(op, unwrap_list(self.get_json(op, Some(source_id), &[])?, "projects"))
    }

    fn sync_source(&self, scope: &SyncScope) -> MygoResult<SyncReport> {
        let op = Operation::SyncSource;
        let documents = self.list_documents(scope)?;
        let Some(body) = sync_body(scope, documents) else {
            debug!(source_id = %scope.source_id, "no documents to sync");
            return Ok(SyncReport::default());
        };
        let response = self.post_json(op, &body)?;
        sync_report(op, &response)
    }
}

// ── Response decoding ────────────────────────────────────────────────────────

fn request_error(operation: Operation, error: ureq::Error) -> MygoError {
    match error {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            warn!(operation = operation.name(), status, "backend returned an error status");
            MygoError::Status {
                operation: operation.name().to_string(),
                status,
                message,
            }
        }
        ureq::Error::Transport(transport) => {
            warn!(operation = operation.name(), error = %transport, "backend unreachable");
            MygoError::Transport {
                operation: operation.name().to_string(),
                reason: transport.to_string(),
            }
        }
    }
}

fn read_json(operation: Operation, response: ureq::Response) -> MygoResult<Value> {
    response
        .into_json::<Value>()
        .map_err(|e| MygoError::UnexpectedResponse {
            operation: operation.name().to_string(),
            reason: format!("body is not JSON: {}", e),
        })
}

fn decode<T: DeserializeOwned>(operation: Operation, body: Value) -> MygoResult<T> {
    serde_json::from_value(body).map_err(|e| MygoError::UnexpectedResponse {
        operation: operation.name().to_string(),
        reason: e.to_string(),
    })
}

fn to_body<T: serde::Serialize>(operation: Operation, request: &T) -> MygoResult<Value> {
    serde_json::to_value(request).map_err(|e| MygoError::UnexpectedResponse {
        operation: operation.name().to_string(),
        reason: format!("request could not be encoded: {}", e),
    })
}

/// Read at most `limit` bytes. A longer body is an error, never a truncated document.
fn read_limited(operation: Operation, reader: impl Read, limit: u64) -> MygoResult<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| MygoError::Transport {
            operation: operation.name().to_string(),
            reason: format!("failed to read document body: {}", e),
        })?;
    if bytes.len() as u64 > limit {
        return Err(MygoError::UnexpectedResponse {
            operation: operation.name().to_string(),
            reason: format!("document is larger than {} bytes", limit),
        });
    }
    Ok(bytes)
}

/// A JSON body in place of a document becomes `NotBinary` with its `error` text.
fn binary_payload(
    operation: Operation,
    content_type: String,
    bytes: Vec<u8>,
) -> MygoResult<BinaryPayload> {
    let payload = BinaryPayload {
        content_type,
        bytes,
    };
    if payload.is_json() {
        let message = serde_json::from_slice::<Value>(&payload.bytes)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| "Unknown error".to_string());
        warn!(operation = operation.name(), reason = %message, "download returned JSON");
        return Err(MygoError::NotBinary {
            operation: operation.name().to_string(),
            message,
        });
    }
    Ok(payload)
}

/// The `/sync` body, or `None` when there is nothing to send.
pub(crate) fn sync_body(scope: &SyncScope, documents: Vec<Value>) -> Option<Value> {
    if documents.is_empty() {
        return None;
    }
    let mut body = json!({ "sourceId": scope.source_id, "documents": documents });
    if let Some(project_id) = &scope.project_id {
        body["projectId"] = json!(project_id);
    }
    Some(body)
}

/// Listings arrive either bare or wrapped as `{ "<key>": [...] }`.
fn unwrap_list(body: Value, key: &str) -> Value {
    match body {
        Value::Array(_) => body,
        Value::Object(mut map) => map.remove(key).unwrap_or_else(|| Value::Array(Vec::new())),
        _ => Value::Array(Vec::new()),
    }
}

/// Derive counts from a sync response.
///
/// Direct `synced`/`skipped`/`failed` counts are used when present;
/// otherwise each entry of `results` is classified by its `status`.
pub(crate) fn sync_report(operation: Operation, body: &Value) -> MygoResult<SyncReport> {
    if body.get("synced").is_some() {
        return decode(operation, body.clone());
    }
    let Some(results) = body.get("results").and_then(Value::as_array) else {
        return Err(MygoError::UnexpectedResponse {
            operation: operation.name().to_string(),
            reason: "sync response has neither counts nor results".to_string(),
        });
    };

    let mut report = SyncReport::default();
    for result in results {
        match result.get("status").and_then(Value::as_str).unwrap_or("error") {
            "skipped" => report.skipped += 1,
            "error" | "failed" => report.failed += 1,
            _ => report.synced += 1,
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mygo_contracts::request::OutputFormat;

    #[test]
    fn listings_accept_bare_and_wrapped_bodies() {
        let wrapped = json!({ "sources": [{ "id": "s1", "name": "Share", "type": "SHAREPOINT" }] });
        let sources: Vec<SourceSummary> =
            decode(Operation::ListSources, unwrap_list(wrapped, "sources")).unwrap();
        assert_eq!(sources[0].source_type, "SHAREPOINT");
        assert_eq!(sources[0].status, None);

        let bare = json!([{ "id": "p1", "name": "Rollout" }]);
        let projects: Vec<ProjectSummary> =
            decode(Operation::ListProjects, unwrap_list(bare, "projects")).unwrap();
        assert_eq!(projects[0].name, "Rollout");

        let missing = json!({ "isDemo": true });
        let projects: Vec<ProjectSummary> =
            decode(Operation::ListProjects, unwrap_list(missing, "projects")).unwrap();
        assert!(projects.is_empty());
    }

    #[test]
    fn sync_results_are_classified_by_status() {
        let body = json!({
            "message": "Synced 4 documents",
            "results": [
                { "documentId": "a", "status": "created" },
                { "documentId": "b", "status": "updated" },
                { "documentId": "c", "status": "skipped" },
                { "documentId": "d", "status": "error", "error": "boom" }
            ]
        });
        let report = sync_report(Operation::SyncSource, &body).unwrap();
        assert_eq!(report, SyncReport { synced: 2, skipped: 1, failed: 1 });
    }

    #[test]
    fn sync_counts_are_used_directly() {
        let body = json!({ "synced": 3, "skipped": 0, "failed": 2 });
        let report = sync_report(Operation::SyncSource, &body).unwrap();
        assert_eq!(report.total(), 5);
    }

    #[test]
    fn sync_body_without_results_is_unexpected() {
        let err = sync_report(Operation::SyncSource, &json!({ "message": "ok" })).unwrap_err();
        assert!(matches!(err, MygoError::UnexpectedResponse { .. }));
    }

    #[test]
    fn shape_mismatch_is_unexpected_response() {
        let err = decode::<Vec<SimilarSolution>>(
            Operation::SearchSimilar,
            json!([{ "title": "X" }]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("search-similar"));
    }

    #[test]
    fn sync_body_carries_the_listed_documents() {
        let documents = vec![
            json!({ "uuid": "d-1", "name": "Blueprint" }),
            json!({ "uuid": "d-2", "name": "Fit-gap" }),
        ];
        let body = sync_body(&SyncScope::project("calm-main", "PRJ-103"), documents).unwrap();
        assert_eq!(body["sourceId"], "calm-main");
        assert_eq!(body["projectId"], "PRJ-103");
        assert_eq!(body["documents"].as_array().unwrap().len(), 2);
        assert_eq!(body["documents"][1]["uuid"], "d-2");

        let body = sync_body(&SyncScope::source("sp-1"), vec![json!({ "id": "x" })]).unwrap();
        assert!(body.get("projectId").is_none());
    }

    #[test]
    fn nothing_listed_means_no_sync_request() {
        assert!(sync_body(&SyncScope::source("sp-1"), Vec::new()).is_none());
    }

    #[test]
    fn document_listing_envelope_is_unwrapped() {
        let body = json!({ "documents": [{ "uuid": "d-1" }], "isDemo": true });
        let documents: Vec<Value> =
            decode(Operation::ListDocuments, unwrap_list(body, "documents")).unwrap();
        assert_eq!(documents.len(), 1);
    }

    #[test]
    fn oversized_document_is_an_error_not_a_truncation() {
        let body: &[u8] = b"0123456789";
        let err = read_limited(Operation::GenerateSpec, body, 9).unwrap_err();
        assert!(matches!(err, MygoError::UnexpectedResponse { .. }));

        let bytes = read_limited(Operation::GenerateSpec, body, 10).unwrap();
        assert_eq!(bytes, body);
    }

    #[test]
    fn json_download_body_is_not_binary() {
        let err = binary_payload(
            Operation::GenerateSpec,
            "application/json; charset=utf-8".to_string(),
            br#"{"error":"template missing"}"#.to_vec(),
        )
        .unwrap_err();
        match err {
            MygoError::NotBinary { operation, message } => {
                assert_eq!(operation, "generate-spec");
                assert_eq!(message, "template missing");
            }
            other => panic!("expected NotBinary, got {:?}", other),
        }

        let payload = binary_payload(
            Operation::GenerateSpec,
            OutputFormat::Docx.mime_type().to_string(),
            b"PK".to_vec(),
        )
        .unwrap();
        assert_eq!(payload.bytes, b"PK");
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let result = HttpGateway::new(GatewayConfig::new("ftp://files"));
        assert!(matches!(result, Err(MygoError::ConfigError { .. })));
    }

    #[test]
    fn unreachable_backend_is_a_transport_error() {
        let mut config = GatewayConfig::new("http://127.0.0.1:9");
        config.timeout_secs = 2;
        let gateway = HttpGateway::new(config).unwrap();
        let err = gateway.list_sources().unwrap_err();
        assert!(matches!(err, MygoError::Transport { .. }));
    }
}
