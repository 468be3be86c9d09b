// Domain layer modules
pub mod envelope;
pub mod record;

// Re-exports
pub use envelope::ApiEnvelope;
pub use record::{EntityRef, PeriodRecord, ROW_FIELD_COUNT, RowError};
