//! Transport backed by the `async-openai` client library.
//!
//! The request body built by [`Endpoint`] is turned into the library's typed
//! request, so both providers and all operations go through the same path;
//! the only provider difference is the library config (`OpenAIConfig` with
//! the model in the body vs. `AzureConfig` with the deployment in the URL).
//!
//! The library's retry backoff is switched off, so every `execute` sends
//! exactly one request.
//!
//! Known quirks of this transport:
//! - `OpenAIConfig::new()` picks up `OPENAI_API_KEY` from the process
//!   environment. We always set the key explicitly, but anything else the
//!   library reads from the environment is only refreshed when the variable
//!   is cleared and a new client is built. Use the REST transport to bypass
//!   the library entirely.
//! - The library hides the response status. Failed calls become
//!   [`Error::Http`] with `status: None`; the response text is the decoded
//!   API error, or the decode error when the body was not an API error.
//!   A 2xx body that does not decode is indistinguishable from that second
//!   case and is reported the same way.

use crate::endpoint::Provider;
use crate::error::HttpDiagnostics;
use crate::executor::{Executor, ExecutorOptions};
use crate::{ChatMessage, Endpoint, Error, Operation, Output, RequestSpec};
use async_openai::config::{AzureConfig, Config, OpenAIConfig};
use async_openai::error::OpenAIError;
use async_openai::types::{
    CreateChatCompletionRequest, CreateCompletionRequest, CreateEmbeddingRequest,
};
use async_openai::Client;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// Executes requests through an in-process `async-openai` client.
#[derive(Debug, Clone)]
pub struct ClientLibraryExecutor {
    endpoint: Endpoint,
    options: ExecutorOptions,
}

impl ClientLibraryExecutor {
    pub fn new(endpoint: Endpoint, options: ExecutorOptions) -> Self {
        Self { endpoint, options }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Executor for ClientLibraryExecutor {
    async fn execute(&self, request: &RequestSpec) -> Result<Output, Error> {
        let http = self.options.http_client()?;

        // The typed requests require a model; the gateway ignores it.
        let mut body = request.body.clone();
        body.entry("model")
            .or_insert_with(|| json!(self.endpoint.model()));

        tracing::debug!(
            operation = %request.operation,
            model = %self.endpoint.model(),
            "Sending client library request"
        );

        let request_body = serde_json::to_string(&body)?;
        let api_key = self.endpoint.api_key();
        let result = match self.endpoint.provider() {
            Provider::Direct {
                api_base,
                api_version,
                organization,
            } => {
                let mut config = OpenAIConfig::new()
                    .with_api_key(api_key)
                    .with_api_base(format!("{api_base}{api_version}"));
                if let Some(org) = organization {
                    config = config.with_org_id(org);
                }
                let client = Client::with_config(config)
                    .with_http_client(http)
                    .with_backoff(no_retry());
                call(client, request.operation, body).await
            }
            Provider::Gateway {
                api_base,
                api_version,
            } => {
                let config = AzureConfig::new()
                    .with_api_base(api_base)
                    .with_api_key(api_key)
                    .with_deployment_id(self.endpoint.model())
                    .with_api_version(api_version);
                let client = Client::with_config(config)
                    .with_http_client(http)
                    .with_backoff(no_retry());
                call(client, request.operation, body).await
            }
        };
        result.map_err(|e| into_http_error(e, request, request_body))
    }
}

/// A backoff that gives up after the first attempt.
fn no_retry() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

fn into_http_error(error: Error, request: &RequestSpec, request_body: String) -> Error {
    let response_text = match &error {
        Error::ClientLibrary(OpenAIError::ApiError(api_error)) => api_error.to_string(),
        Error::ClientLibrary(OpenAIError::JSONDeserialize(e)) => {
            format!("<undecodable response body: {e}>")
        }
        _ => return error,
    };
    tracing::error!(
        url = %request.url,
        response = %response_text,
        "Client library request failed"
    );
    Error::Http {
        status: None,
        diagnostics: Box::new(HttpDiagnostics {
            status: None,
            url: request.url.clone(),
            headers: request.headers.clone(),
            request_body,
            response_text,
        }),
    }
}

async fn call<C: Config>(
    client: Client<C>,
    operation: Operation,
    body: Map<String, Value>,
) -> Result<Output, Error> {
    let body = Value::Object(body);
    match operation {
        Operation::Completion => {
            let request: CreateCompletionRequest = serde_json::from_value(body)?;
            let response = client.completions().create(request).await?;
            response
                .choices
                .into_iter()
                .next()
                .map(|choice| Output::Text(choice.text))
                .ok_or_else(|| Error::malformed_response("missing choices[0].text"))
        }
        Operation::ChatCompletion => {
            let request: CreateChatCompletionRequest = serde_json::from_value(body)?;
            let response = client.chat().create(request).await?;
            let choice = response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| Error::malformed_response("missing choices[0].message"))?;
            let message: ChatMessage =
                serde_json::from_value(serde_json::to_value(&choice.message)?)?;
            Ok(Output::Message(message))
        }
        Operation::Embedding => {
            let request: CreateEmbeddingRequest = serde_json::from_value(body)?;
            let response = client.embeddings().create(request).await?;
            response
                .data
                .into_iter()
                .next()
                .map(|embedding| Output::Embedding(embedding.embedding))
                .ok_or_else(|| Error::malformed_response("missing data[0].embedding"))
        }
    }
}
