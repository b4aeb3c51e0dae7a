use super::{ProviderConfig, ProviderTestSetup};
use llm_endpoint::{Endpoint, NormalizedParams, Operation};
use wiremock::matchers::{header, path, query_param};
use wiremock::MockBuilder;

pub struct GatewayTestSetup;

const API_VERSION: &str = "2023-05-15";

impl ProviderTestSetup for GatewayTestSetup {
    fn get_config() -> ProviderConfig {
        ProviderConfig {
            name: "Gateway",
            model: "gpt4dep",
            sends_model: false,
        }
    }

    fn create_endpoint(base_url: &str) -> Endpoint {
        let params = NormalizedParams::new()
            .with("api_key", "gw-key")
            .with("api_type", "azure")
            .with("api_base", base_url)
            .with("api_version", API_VERSION);
        Endpoint::gateway(Self::get_config().model, params).expect("Failed to create gateway endpoint")
    }

    fn match_request(mock: MockBuilder, operation: Operation) -> MockBuilder {
        mock.and(path(format!(
            "/openai/deployments/{}/{}",
            Self::get_config().model,
            operation.path()
        )))
        .and(query_param("api-version", API_VERSION))
        .and(header("api-key", "gw-key"))
    }
}
