//! Runs the same scenarios against both providers and both transports.

mod providers;
mod transport_e2e;
