use serde_json::{Map, Value};
use std::fmt;

/// The logical operations an endpoint supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Completion,
    ChatCompletion,
    Embedding,
}

impl Operation {
    /// Path segment appended to the endpoint base.
    pub fn path(&self) -> &'static str {
        match self {
            Operation::Completion => "completions",
            Operation::ChatCompletion => "chat/completions",
            Operation::Embedding => "embeddings",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Completion => "completion",
            Operation::ChatCompletion => "chat_completion",
            Operation::Embedding => "embedding",
        })
    }
}

/// A fully built request: where to POST, with which headers, carrying what.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub operation: Operation,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Map<String, Value>,
}

impl RequestSpec {
    /// Look up a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
