//! Executor implementations for the two transports.

pub mod client_library;
pub mod rest;

use std::fmt;

pub use client_library::ClientLibraryExecutor;
pub use rest::RestExecutor;

/// How requests reach the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Through the in-process `async-openai` client.
    ClientLibrary,
    /// Plain HTTP using the URL, headers and body built by the endpoint.
    Rest,
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transport::ClientLibrary => "client_library",
            Transport::Rest => "rest",
        })
    }
}
