use crate::error::HttpDiagnostics;
use crate::executor::{Executor, ExecutorOptions};
use crate::{Error, Output, RequestSpec};
use serde_json::Value;

/// Sends requests built by [`crate::Endpoint`] as plain HTTP POSTs.
#[derive(Debug, Clone, Default)]
pub struct RestExecutor {
    options: ExecutorOptions,
}

impl RestExecutor {
    pub fn new(options: ExecutorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }
}

#[async_trait::async_trait]
impl Executor for RestExecutor {
    async fn execute(&self, request: &RequestSpec) -> Result<Output, Error> {
        // One client per call; the connection pool goes away with it.
        let client = self.options.http_client()?;
        let body = serde_json::to_string(&request.body)?;

        tracing::debug!(
            operation = %request.operation,
            url = %request.url,
            "Sending REST request"
        );

        let mut builder = client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.body(body.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let response_text = match response.text().await {
                Ok(text) => text,
                Err(e) => format!("<failed to read response body: {e}>"),
            };
            tracing::error!(
                status = status.as_u16(),
                url = %request.url,
                response = %response_text,
                "Request failed"
            );
            return Err(Error::Http {
                status: Some(status.as_u16()),
                diagnostics: Box::new(HttpDiagnostics {
                    status: Some(status.as_u16()),
                    url: request.url.clone(),
                    headers: request.headers.clone(),
                    request_body: body,
                    response_text,
                }),
            });
        }

        let text = response.text().await?;
        let json: Value = serde_json::from_str(&text)
            .map_err(|e| Error::malformed_response(format!("response is not JSON: {e}")))?;
        Output::extract(request.operation, &json)
    }
}
