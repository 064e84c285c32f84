//! Gateway configuration schema.
//!
//! A `GatewayConfig` is deserialized from TOML. Only `base_url` is required;
//! every endpoint path defaults to the dashboard backend's route and can be
//! overridden in an `[endpoints]` table keyed by operation name:
//!
//! ```toml
//! base_url = "http://localhost:5000"
//! timeout_secs = 90
//!
//! [endpoints]
//! ask-yoda = "/api/v2/ask"
//! list-projects = "/api/calm/{source_id}/projects"
//! list-documents = "/api/calm/{source_id}/documents"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use mygo_contracts::{
    error::{MygoError, MygoResult},
    request::Operation,
};

/// Placeholder substituted with the source id in scoped paths.
pub const SOURCE_ID_PLACEHOLDER: &str = "{source_id}";

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Scheme, host and port of the backend, e.g. `http://localhost:5000`.
    pub base_url: String,

    /// Per-request timeout. Generation calls can take tens of seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub endpoints: EndpointConfig,
}

/// Path of every backend operation, relative to `base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EndpointConfig {
    pub ask_yoda: String,
    pub generate_spec: String,
    pub generate_prompt: String,
    pub generate_test_cases: String,
    pub explain_code: String,
    pub analyze_code: String,
    pub submit_requirements: String,
    pub generate_solution: String,
    pub refine_solution: String,
    pub search_similar: String,
    pub improvise: String,
    pub list_sources: String,
    /// Must contain `{source_id}`.
    pub list_projects: String,
    /// Documents fetched before a sync. Must contain `{source_id}`.
    pub list_documents: String,
    pub sync_source: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            ask_yoda: "/api/ask-yoda".to_string(),
            generate_spec: "/api/generate-spec".to_string(),
            generate_prompt: "/api/generate-prompt".to_string(),
            generate_test_cases: "/api/generate-test-cases".to_string(),
            explain_code: "/api/explain-code".to_string(),
            analyze_code: "/api/analyze-code".to_string(),
            submit_requirements: "/api/solution-advisor/requirements".to_string(),
            generate_solution: "/api/solution-advisor/generate".to_string(),
            refine_solution: "/api/solution-advisor/refine".to_string(),
            search_similar: "/api/solution-advisor/search-similar".to_string(),
            improvise: "/api/solution-advisor/improvise".to_string(),
            list_sources: "/api/sources".to_string(),
            list_projects: "/api/calm/{source_id}/projects".to_string(),
            list_documents: "/api/calm/{source_id}/documents".to_string(),
            sync_source: "/api/sync".to_string(),
        }
    }
}

impl EndpointConfig {
    pub fn path(&self, operation: Operation) -> &str {
        match operation {
            Operation::AskYoda => &self.ask_yoda,
            Operation::GenerateSpec => &self.generate_spec,
            Operation::GeneratePrompt => &self.generate_prompt,
            Operation::GenerateTestCases => &self.generate_test_cases,
            Operation::ExplainCode => &self.explain_code,
            Operation::AnalyzeCode => &self.analyze_code,
            Operation::SubmitRequirements => &self.submit_requirements,
            Operation::GenerateSolution => &self.generate_solution,
            Operation::RefineSolution => &self.refine_solution,
            Operation::SearchSimilar => &self.search_similar,
            Operation::Improvise => &self.improvise,
            Operation::ListSources => &self.list_sources,
            Operation::ListProjects => &self.list_projects,
            Operation::ListDocuments => &self.list_documents,
            Operation::SyncSource => &self.sync_source,
        }
    }
}

impl GatewayConfig {
    /// A configuration with default endpoints and timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
            endpoints: EndpointConfig::default(),
        }
    }

    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `MygoError::ConfigError` if the TOML is malformed, does not
    /// match `GatewayConfig`, or fails validation.
    pub fn from_toml_str(s: &str) -> MygoResult<Self> {
        let config: GatewayConfig = toml::from_str(s).map_err(|e| MygoError::ConfigError {
            reason: format!("failed to parse gateway TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as gateway configuration.
    pub fn from_file(path: &Path) -> MygoResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| MygoError::ConfigError {
            reason: format!("failed to read gateway config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> MygoResult<()> {
        let base = self.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(MygoError::ConfigError {
                reason: format!(
                    "base_url must start with http:// or https://, got '{}'",
                    self.base_url
                ),
            });
        }
        if self.timeout_secs == 0 {
            return Err(MygoError::ConfigError {
                reason: "timeout_secs must be greater than zero".to_string(),
            });
        }
        for operation in [Operation::ListProjects, Operation::ListDocuments] {
            if !self.endpoints.path(operation).contains(SOURCE_ID_PLACEHOLDER) {
                return Err(MygoError::ConfigError {
                    reason: format!(
                        "endpoint '{}' must contain '{}'",
                        operation.name(),
                        SOURCE_ID_PLACEHOLDER
                    ),
                });
            }
        }
        Ok(())
    }

    /// Absolute URL of `operation`, with `source_id` substituted when given.
    pub fn url(&self, operation: Operation, source_id: Option<&str>) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let path = self.endpoints.path(operation);
        let path = match source_id {
            Some(id) => path.replace(SOURCE_ID_PLACEHOLDER, &urlencoding::encode(id)),
            None => path.to_string(),
        };
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}
