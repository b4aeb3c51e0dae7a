pub mod direct;
pub mod gateway;

use llm_endpoint::{Endpoint, Operation};
use serde_json::{json, Value};
use wiremock::MockBuilder;

/// Provider configuration for cross-provider testing
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: &'static str,
    pub model: &'static str,
    /// Whether the request body carries the model name.
    pub sends_model: bool,
}

/// Trait for provider-specific test setup
pub trait ProviderTestSetup {
    /// Get the provider configuration
    fn get_config() -> ProviderConfig;

    /// Create an endpoint pointing at the mock server
    fn create_endpoint(base_url: &str) -> Endpoint;

    /// Restrict a mock to the URL and auth headers this provider uses for `operation`
    fn match_request(mock: MockBuilder, operation: Operation) -> MockBuilder;
}

/// A legacy completion response in the shape the API returns it.
pub fn completion_response(text: &str) -> Value {
    json!({
        "id": "cmpl-123",
        "object": "text_completion",
        "created": 1700000000,
        "model": "gpt-35-turbo-instruct",
        "choices": [
            { "text": text, "index": 0, "logprobs": null, "finish_reason": "stop" }
        ],
        "usage": { "prompt_tokens": 3, "completion_tokens": 4, "total_tokens": 7 }
    })
}

pub fn chat_response(content: &str) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ],
        "usage": { "prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7 }
    })
}

pub fn embedding_response(embedding: &[f32]) -> Value {
    json!({
        "object": "list",
        "model": "text-embedding-ada-002",
        "data": [
            { "object": "embedding", "index": 0, "embedding": embedding }
        ],
        "usage": { "prompt_tokens": 2, "total_tokens": 2 }
    })
}
