//! Result payloads and their extraction from provider responses.

use crate::{Error, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An assistant message returned by a chat completion.
///
/// Fields other than `role` and `content` (`tool_calls`, `refusal`, ...) are
/// kept as-is in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub fn tool_calls(&self) -> Option<&Vec<Value>> {
        self.extra.get("tool_calls").and_then(Value::as_array)
    }
}

/// The payload extracted from a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// `choices[0].text` of a completion.
    Text(String),
    /// `choices[0].message` of a chat completion.
    Message(ChatMessage),
    /// `data[0].embedding` of an embedding request.
    Embedding(Vec<f32>),
}

impl Output {
    /// Pull the payload for `operation` out of a raw JSON response.
    pub fn extract(operation: Operation, response: &Value) -> Result<Self, Error> {
        match operation {
            Operation::Completion => response
                .pointer("/choices/0/text")
                .and_then(Value::as_str)
                .map(|text| Output::Text(text.to_string()))
                .ok_or_else(|| Error::malformed_response("missing choices[0].text")),
            Operation::ChatCompletion => {
                let message = response
                    .pointer("/choices/0/message")
                    .ok_or_else(|| Error::malformed_response("missing choices[0].message"))?;
                let message = ChatMessage::deserialize(message).map_err(|e| {
                    Error::malformed_response(format!("invalid choices[0].message: {e}"))
                })?;
                Ok(Output::Message(message))
            }
            Operation::Embedding => {
                let values = response
                    .pointer("/data/0/embedding")
                    .and_then(Value::as_array)
                    .ok_or_else(|| Error::malformed_response("missing data[0].embedding"))?;
                values
                    .iter()
                    .map(|v| v.as_f64().map(|f| f as f32))
                    .collect::<Option<Vec<f32>>>()
                    .map(Output::Embedding)
                    .ok_or_else(|| {
                        Error::malformed_response("non-numeric value in data[0].embedding")
                    })
            }
        }
    }

    /// Completion text, or the content of a chat message.
    pub fn text(&self) -> Option<&str> {
        match self {
            Output::Text(text) => Some(text),
            Output::Message(message) => message.content.as_deref(),
            Output::Embedding(_) => None,
        }
    }

    pub fn into_embedding(self) -> Option<Vec<f32>> {
        match self {
            Output::Embedding(embedding) => Some(embedding),
            _ => None,
        }
    }
}
