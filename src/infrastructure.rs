// Infrastructure layer modules
pub mod config;
pub mod logging;
pub mod record_sender;

// Re-exports
pub use config::{ConfigError, CorsConfig, EndpointConfig, SeedPayloadConfig, local_cors_enabled};
pub use logging::init_logging;
pub use record_sender::{HttpRecordSender, RecordSender, SendError};
