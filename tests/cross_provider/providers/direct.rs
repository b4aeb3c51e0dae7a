use super::{ProviderConfig, ProviderTestSetup};
use llm_endpoint::{Endpoint, NormalizedParams, Operation};
use wiremock::matchers::{header, path};
use wiremock::MockBuilder;

pub struct DirectTestSetup;

impl ProviderTestSetup for DirectTestSetup {
    fn get_config() -> ProviderConfig {
        ProviderConfig {
            name: "Direct",
            model: "gpt-4",
            sends_model: true,
        }
    }

    fn create_endpoint(base_url: &str) -> Endpoint {
        let params = NormalizedParams::new()
            .with("api_key", "sk-test")
            .with("api_type", "open_ai")
            .with("api_base", base_url)
            .with("api_version", "/v1")
            .with("organization", "org-test");
        Endpoint::direct(Self::get_config().model, params).expect("Failed to create direct endpoint")
    }

    fn match_request(mock: MockBuilder, operation: Operation) -> MockBuilder {
        mock.and(path(format!("/v1/{}", operation.path())))
            .and(header("authorization", "Bearer sk-test"))
            .and(header("openai-organization", "org-test"))
    }
}
