// アプリケーション層モジュール
pub mod batch_processor;
pub mod cors;
pub mod document_handler;
pub mod payload;
pub mod request_handler;

// 再エクスポート
pub use batch_processor::{BATCH_SUCCESS_MESSAGE, BatchError, BatchProcessor, BatchSummary};
pub use document_handler::DocumentHandler;
pub use payload::{PayloadError, decode_payload, read_rows};
pub use request_handler::{PayloadSource, PipelineError, RequestHandler};
