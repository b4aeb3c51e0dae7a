use crate::env::Environment;
use crate::executor::{Executor, ExecutorOptions};
use crate::resolver::Resolver;
use crate::transport::{ClientLibraryExecutor, RestExecutor, Transport};
use crate::{
    script, ChatMessage, Endpoint, Error, NormalizedParams, Operation, Output, ProviderKind,
};
use serde_json::{Map, Value};
use std::path::Path;

/// Configuration for creating endpoint clients.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Provider to use. Inferred from `api_type` when `None`.
    pub provider: Option<ProviderKind>,
    pub transport: Transport,
    /// Model name (direct) or deployment name (gateway).
    pub model: String,
    /// Call-site values that win over script and environment.
    pub overrides: NormalizedParams,
    pub options: ExecutorOptions,
    /// Prefix of the recognised variables, `OPENAI` by default.
    pub prefix: String,
}

impl ClientConfig {
    /// Configuration for a direct-provider model over REST.
    pub fn direct(model: impl Into<String>) -> Self {
        Self::new(Some(ProviderKind::Direct), model)
    }

    /// Configuration for a gateway deployment over REST.
    pub fn gateway(deployment_name: impl Into<String>) -> Self {
        Self::new(Some(ProviderKind::Gateway), deployment_name)
    }

    /// Configuration that picks the provider from the resolved `api_type`.
    pub fn inferred(model_or_deployment: impl Into<String>) -> Self {
        Self::new(None, model_or_deployment)
    }

    fn new(provider: Option<ProviderKind>, model: impl Into<String>) -> Self {
        Self {
            provider,
            transport: Transport::Rest,
            model: model.into(),
            overrides: NormalizedParams::new(),
            options: ExecutorOptions::default(),
            prefix: crate::resolver::DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key, value);
        self
    }

    pub fn with_options(mut self, options: ExecutorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// An endpoint paired with the executor for its transport.
pub struct EndpointClient {
    endpoint: Endpoint,
    transport: Transport,
    executor: Box<dyn Executor>,
}

impl EndpointClient {
    pub fn new(endpoint: Endpoint, transport: Transport, options: ExecutorOptions) -> Self {
        let options = options.with_params(endpoint.params());
        let executor: Box<dyn Executor> = match transport {
            Transport::Rest => Box::new(RestExecutor::new(options)),
            Transport::ClientLibrary => {
                Box::new(ClientLibraryExecutor::new(endpoint.clone(), options))
            }
        };
        Self {
            endpoint,
            transport,
            executor,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Build the request for `operation` and execute it.
    pub async fn execute(
        &self,
        operation: Operation,
        text: &str,
        extra: &Map<String, Value>,
    ) -> Result<Output, Error> {
        let request = self.endpoint.request(operation, text, extra);
        self.executor.execute(&request).await
    }

    /// Text completion for `prompt`.
    pub async fn completion(
        &self,
        prompt: &str,
        extra: &Map<String, Value>,
    ) -> Result<String, Error> {
        match self.execute(Operation::Completion, prompt, extra).await? {
            Output::Text(text) => Ok(text),
            other => Err(unexpected(Operation::Completion, &other)),
        }
    }

    /// Chat completion with `text` as the single user message.
    pub async fn chat_completion(
        &self,
        text: &str,
        extra: &Map<String, Value>,
    ) -> Result<ChatMessage, Error> {
        match self.execute(Operation::ChatCompletion, text, extra).await? {
            Output::Message(message) => Ok(message),
            other => Err(unexpected(Operation::ChatCompletion, &other)),
        }
    }

    /// Embedding vector for `input`.
    pub async fn embedding(
        &self,
        input: &str,
        extra: &Map<String, Value>,
    ) -> Result<Vec<f32>, Error> {
        match self.execute(Operation::Embedding, input, extra).await? {
            Output::Embedding(embedding) => Ok(embedding),
            other => Err(unexpected(Operation::Embedding, &other)),
        }
    }
}

fn unexpected(operation: Operation, output: &Output) -> Error {
    Error::malformed_response(format!("{operation} returned {output:?}"))
}

/// Factory for creating endpoint clients.
pub struct ClientFactory;

impl ClientFactory {
    /// Create a client from already resolved parameters.
    ///
    /// `config.overrides` are not applied here; they are merged during
    /// resolution.
    pub fn create(
        config: &ClientConfig,
        params: NormalizedParams,
    ) -> Result<EndpointClient, Error> {
        let provider = match config.provider {
            Some(provider) => provider,
            None => ProviderKind::from_api_type(params.api_type().unwrap_or_default()),
        };
        let endpoint = Endpoint::new(provider, config.model.clone(), params)?;
        tracing::debug!(
            provider = ?provider,
            transport = %config.transport,
            model = %config.model,
            "Created endpoint client"
        );
        Ok(EndpointClient::new(endpoint, config.transport, config.options.clone()))
    }

    /// Create a client from an export script, with `config.overrides` on top.
    pub fn from_script(
        path: impl AsRef<Path>,
        config: &ClientConfig,
    ) -> Result<EndpointClient, Error> {
        let parsed = script::parse_file(path)?;
        let params = Resolver::with_prefix(&config.prefix)
            .resolve(Some(&parsed), Some(&config.overrides));
        Self::create(config, params)
    }

    /// Create a client from the `<prefix>_*` variables of `env`, with
    /// `config.overrides` on top. The environment is left untouched.
    pub fn from_environment(
        env: &dyn Environment,
        config: &ClientConfig,
    ) -> Result<EndpointClient, Error> {
        let resolver = Resolver::with_prefix(&config.prefix);
        let scanned = resolver.scan_environment(env);
        let params = resolver.resolve(Some(&scanned), Some(&config.overrides));
        Self::create(config, params)
    }
}
