use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when using the llm-endpoint library.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed assignment on line {line_number}: {line}")]
    MalformedAssignment { line_number: usize, line: String },

    #[error("Script file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required parameter: {0}")]
    MissingRequiredParameter(String),

    /// A non-2xx response. `status` is `None` when the transport did not
    /// expose it (the client library only reports the decoded error body).
    #[error("HTTP {}: {}", status_label(.status), .diagnostics.response_text)]
    Http {
        status: Option<u16>,
        diagnostics: Box<HttpDiagnostics>,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Client library error: {0}")]
    ClientLibrary(#[from] async_openai::error::OpenAIError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub fn malformed_assignment(line_number: usize, line: impl Into<String>) -> Self {
        Error::MalformedAssignment {
            line_number,
            line: line.into(),
        }
    }

    pub fn missing(parameter: impl Into<String>) -> Self {
        Error::MissingRequiredParameter(parameter.into())
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Error::MalformedResponse(message.into())
    }

    /// Diagnostics captured for a failed HTTP call, if this is one.
    pub fn diagnostics(&self) -> Option<&HttpDiagnostics> {
        match self {
            Error::Http { diagnostics, .. } => Some(diagnostics),
            _ => None,
        }
    }
}

/// Everything captured about a request that came back with a non-2xx status.
///
/// Headers are kept verbatim, credentials included, so an operator can replay
/// the call. Be careful where this ends up.
#[derive(Debug, Clone)]
pub struct HttpDiagnostics {
    pub status: Option<u16>,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub request_body: String,
    pub response_text: String,
}

impl fmt::Display for HttpDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Request failed: HTTP {}", status_label(&self.status))?;
        writeln!(f, "Request: {}", self.request_body)?;
        writeln!(f, "Headers: {:?}", self.headers)?;
        writeln!(f, "URL: {}", self.url)?;
        write!(f, "Response: {}", self.response_text)
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(status) => status.to_string(),
        None => "status unknown".to_string(),
    }
}
