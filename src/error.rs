//! Error types for the seedforge randomness service

use thiserror::Error;

use crate::randomness::oracle::OracleError;
use crate::types::{Address, RequestId};

/// Main error type for the randomness service.
///
/// Every pre-submission rejection (`Unauthorized`, `InsufficientPayment`,
/// `DuplicateRequest`, `InvalidQuantity`, `GasBudgetExceeded`) is raised
/// before any state mutation or payment transfer, so a failed commit leaves
/// no partial state behind.
#[derive(Debug, Clone, Error)]
pub enum RandomnessError {
    #[error("unauthorized: {caller} may not perform {operation}")]
    Unauthorized {
        caller: Address,
        operation: String,
    },

    #[error("insufficient payment: required {required}, provided {provided}")]
    InsufficientPayment {
        required: u128,
        provided: u128,
    },

    #[error("duplicate request: {requester} already has an open commitment")]
    DuplicateRequest { requester: Address },

    #[error("unknown callback: no pending commitment for request {request_id}")]
    UnknownCallback { request_id: RequestId },

    #[error("mismatched callback for request {request_id}: {message}")]
    MismatchedCallback {
        request_id: RequestId,
        message: String,
    },

    #[error("gas budget exceeded: quantity {quantity} needs {estimated} gas, cap is {cap}")]
    GasBudgetExceeded {
        quantity: u32,
        estimated: u64,
        cap: u64,
    },

    #[error("invalid quantity {quantity}: must be between 1 and {max}")]
    InvalidQuantity { quantity: u32, max: u32 },

    #[error("no commitment open for requester {requester}")]
    NoCommitment { requester: Address },

    #[error("commitment for {requester} is still pending oracle delivery")]
    NotFulfilled { requester: Address },

    #[error("zero address not allowed for {context}")]
    ZeroAddress { context: String },

    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("configuration error: {message}")]
    Configuration {
        message: String,
        field: String,
    },

    #[error("serialization error: {message}")]
    Serialization { message: String },

    #[error("hex decoding error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

impl From<serde_json::Error> for RandomnessError {
    fn from(err: serde_json::Error) -> Self {
        RandomnessError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Type alias for the main result type used throughout the library
pub type ServiceResult<T> = Result<T, RandomnessError>;

/// Logging configuration and initialization
pub mod logging {
    use std::env;
    use tracing::Level;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    /// Logging output format
    #[derive(Debug, Clone)]
    pub enum LogFormat {
        Human,
        Json,
    }

    /// Logging output destination
    #[derive(Debug, Clone)]
    pub enum LogOutput {
        Stdout,
        Stderr,
    }

    /// Logging configuration
    #[derive(Debug, Clone)]
    pub struct LoggingConfig {
        pub level: Level,
        pub format: LogFormat,
        pub output: LogOutput,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self {
                level: Level::INFO,
                format: LogFormat::Human,
                output: LogOutput::Stdout,
            }
        }
    }

    /// Initialize structured logging with the given configuration
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = EnvFilter::builder()
            .with_default_directive(config.level.into())
            .from_env_lossy()
            .add_directive("seedforge=trace".parse()?)
            .add_directive("tokio=info".parse()?);

        let registry = tracing_subscriber::registry().with(env_filter);

        match config.format {
            LogFormat::Human => {
                let fmt_layer = fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).init(),
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).init(),
                }
            }
            LogFormat::Json => {
                let fmt_layer = fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(fmt::format::FmtSpan::CLOSE);

                match config.output {
                    LogOutput::Stdout => registry.with(fmt_layer.with_writer(std::io::stdout)).init(),
                    LogOutput::Stderr => registry.with(fmt_layer.with_writer(std::io::stderr)).init(),
                }
            }
        }

        Ok(())
    }

    /// Initialize logging with environment-based configuration
    pub fn init_from_env() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let level = env::var("SEEDFORGE_LOG_LEVEL")
            .unwrap_or_else(|_| "info".to_string())
            .parse::<Level>()
            .unwrap_or(Level::INFO);

        let format = match env::var("SEEDFORGE_LOG_FORMAT").as_ref().map(|s| s.as_str()) {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Human,
        };

        let output = match env::var("SEEDFORGE_LOG_OUTPUT").as_ref().map(|s| s.as_str()) {
            Ok("stderr") => LogOutput::Stderr,
            _ => LogOutput::Stdout,
        };

        let config = LoggingConfig { level, format, output };
        init_logging(config)
    }
}
