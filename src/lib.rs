//! Configuration resolution and a provider-agnostic endpoint abstraction for
//! OpenAI-style APIs.
//!
//! Configuration comes from `export`/`unset` shell scripts, the process
//! environment and call-site overrides. It is normalized into
//! [`NormalizedParams`], validated into an [`Endpoint`] for either the direct
//! provider or the enterprise gateway, and executed over REST or through the
//! `async-openai` client library.

pub mod endpoint;
pub mod env;
pub mod error;
pub mod executor;
pub mod factory;
pub mod resolver;
pub mod response;
pub mod script;
pub mod transport;
pub mod types;

// Re-export core types for easy usage
pub use endpoint::{Endpoint, Provider, ProviderKind};
pub use env::{Environment, MemoryEnvironment, ProcessEnvironment};
pub use error::{Error, HttpDiagnostics};
pub use executor::{Executor, ExecutorOptions};
pub use factory::{ClientConfig, ClientFactory, EndpointClient};
pub use resolver::{clear_scanned, resolve, scan_process_environment, Resolver};
pub use response::{ChatMessage, Output};
pub use transport::{ClientLibraryExecutor, RestExecutor, Transport};
pub use types::*;
