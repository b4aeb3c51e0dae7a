//! Provider-specific URL, header and body construction.
//!
//! Two providers share one interface: the direct hosted API, addressed by
//! model name, and the enterprise gateway (Azure-style), addressed by
//! deployment name. Construction validates everything the provider needs, so
//! building a request afterwards cannot fail.

use crate::types::{API_BASE, API_KEY, API_TYPE, API_VERSION};
use crate::{Error, NormalizedParams, Operation, RequestSpec};
use serde_json::{json, Map, Value};

/// Base URL used by the direct provider when none is configured.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// Version path segment used by the direct provider when none is configured.
pub const DEFAULT_API_VERSION: &str = "/v1";

/// Which provider an endpoint talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Direct,
    Gateway,
}

impl ProviderKind {
    /// Map an `api_type` value to a provider. Azure flavours are gateways,
    /// everything else is treated as the direct API.
    pub fn from_api_type(api_type: &str) -> Self {
        match api_type.to_ascii_lowercase().as_str() {
            "azure" | "azure_ad" | "azuread" => ProviderKind::Gateway,
            _ => ProviderKind::Direct,
        }
    }
}

/// Provider plus the per-provider data validated at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    Direct {
        api_base: String,
        api_version: String,
        organization: Option<String>,
    },
    Gateway {
        api_base: String,
        api_version: String,
    },
}

/// A validated endpoint for one model (direct) or deployment (gateway).
#[derive(Debug, Clone)]
pub struct Endpoint {
    provider: Provider,
    model: String,
    api_key: String,
    params: NormalizedParams,
}

impl Endpoint {
    /// Validate `params` for `kind` and build the endpoint.
    ///
    /// Fails with [`Error::MissingRequiredParameter`] when `api_key`,
    /// `api_type` or the model/deployment name is missing, and for the
    /// gateway also when `api_base` or `api_version` is missing. Empty
    /// strings count as missing.
    pub fn new(
        kind: ProviderKind,
        model_or_deployment: impl Into<String>,
        params: NormalizedParams,
    ) -> Result<Self, Error> {
        let api_key = required(&params, API_KEY)?.to_string();
        required(&params, API_TYPE)?;

        let provider = match kind {
            ProviderKind::Direct => Provider::Direct {
                api_base: present(&params, API_BASE)
                    .unwrap_or(DEFAULT_API_BASE)
                    .to_string(),
                api_version: present(&params, API_VERSION)
                    .unwrap_or(DEFAULT_API_VERSION)
                    .to_string(),
                organization: params
                    .organization()
                    .filter(|o| !o.is_empty())
                    .map(String::from),
            },
            ProviderKind::Gateway => Provider::Gateway {
                api_version: required(&params, API_VERSION)?.to_string(),
                api_base: required(&params, API_BASE)?.to_string(),
            },
        };

        let model = model_or_deployment.into();
        if model.is_empty() {
            return Err(Error::missing(match kind {
                ProviderKind::Direct => "model",
                ProviderKind::Gateway => "deployment_name",
            }));
        }

        Ok(Self {
            provider,
            model,
            api_key,
            params,
        })
    }

    /// Endpoint for the direct provider.
    pub fn direct(model: impl Into<String>, params: NormalizedParams) -> Result<Self, Error> {
        Self::new(ProviderKind::Direct, model, params)
    }

    /// Endpoint for the gateway provider.
    pub fn gateway(
        deployment_name: impl Into<String>,
        params: NormalizedParams,
    ) -> Result<Self, Error> {
        Self::new(ProviderKind::Gateway, deployment_name, params)
    }

    pub fn kind(&self) -> ProviderKind {
        match self.provider {
            Provider::Direct { .. } => ProviderKind::Direct,
            Provider::Gateway { .. } => ProviderKind::Gateway,
        }
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    /// Model name (direct) or deployment name (gateway).
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn params(&self) -> &NormalizedParams {
        &self.params
    }

    /// Request headers. Same for every operation.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        match &self.provider {
            Provider::Direct { organization, .. } => {
                headers.push((
                    "Authorization".to_string(),
                    format!("Bearer {}", self.api_key),
                ));
                if let Some(org) = organization {
                    headers.push(("OpenAI-Organization".to_string(), org.clone()));
                }
            }
            Provider::Gateway { .. } => {
                headers.push(("api-key".to_string(), self.api_key.clone()));
            }
        }
        headers
    }

    pub fn url(&self, operation: Operation) -> String {
        match &self.provider {
            Provider::Direct {
                api_base,
                api_version,
                ..
            } => format!("{api_base}{api_version}/{}", operation.path()),
            Provider::Gateway {
                api_base,
                api_version,
            } => format!(
                "{api_base}/openai/deployments/{}/{}?api-version={api_version}",
                self.model,
                operation.path()
            ),
        }
    }

    /// JSON body for `operation`. Entries in `extra` are merged last and
    /// overwrite anything built here.
    pub fn request_body(
        &self,
        operation: Operation,
        text: &str,
        extra: &Map<String, Value>,
    ) -> Map<String, Value> {
        let mut body = Map::new();
        match operation {
            Operation::Completion => {
                body.insert("prompt".to_string(), json!(text));
            }
            Operation::ChatCompletion => {
                body.insert(
                    "messages".to_string(),
                    json!([{ "role": "user", "content": text }]),
                );
            }
            Operation::Embedding => {
                body.insert("input".to_string(), json!(text));
            }
        }
        // The gateway picks the model from the deployment in the URL.
        if let Provider::Direct { .. } = self.provider {
            body.insert("model".to_string(), json!(self.model));
        }
        for (key, value) in extra {
            body.insert(key.clone(), value.clone());
        }
        body
    }

    /// Build the full request for `operation`.
    pub fn request(
        &self,
        operation: Operation,
        text: &str,
        extra: &Map<String, Value>,
    ) -> RequestSpec {
        RequestSpec {
            operation,
            url: self.url(operation),
            headers: self.headers(),
            body: self.request_body(operation, text, extra),
        }
    }
}

fn present<'a>(params: &'a NormalizedParams, key: &str) -> Option<&'a str> {
    params.get(key).filter(|v| !v.is_empty())
}

fn required<'a>(params: &'a NormalizedParams, key: &str) -> Result<&'a str, Error> {
    present(params, key).ok_or_else(|| Error::missing(key))
}
