//! Observability for blogful
//!
//! Structured logging through `tracing`. The subscriber is installed once
//! by the binary; library code only emits events.
//!
//! # Usage
//!
//! ```ignore
//! use blogful::observability::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new("info", LogFormat::Json).init()?;
//! tracing::info!(port = 8000, "listening");
//! ```

mod logger;

pub use logger::{LogFormat, LoggingConfig, LoggingError};
