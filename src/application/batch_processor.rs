// バッチ処理
//
// パース済みのCSV行列をレコードへマッピングし、1件ずつ送信する。
// 送信失敗は行単位で記録して処理を継続し、シリアライズ失敗と
// 行の構造不正はバッチ全体を中断する。

use crate::domain::record::{PeriodRecord, ROW_FIELD_COUNT, RowError};
use crate::infrastructure::record_sender::RecordSender;
use thiserror::Error;
use tracing::{error, info};

/// バッチ完了時の固定成功メッセージ
///
/// 一部の行の送信に失敗してもこのメッセージが返る。失敗件数は
/// ログにのみ残る。
pub const BATCH_SUCCESS_MESSAGE: &str = "Datos enviados correctamente";

/// バッチ処理のエラー型
///
/// いずれもバッチ全体を中断し、呼び出し側で400応答になる。
#[derive(Debug, Error)]
pub enum BatchError {
    /// 行がない、または先頭行のフィールド数が不足しているバッチ
    #[error("CSV no valido")]
    InvalidBatch,

    /// フィールド数が不足している行
    ///
    /// 先頭フィールドのidで問題の行を特定する。
    #[error("Error al crear el registro {row_id}: {source}")]
    Row { row_id: String, source: RowError },

    /// レコードのJSONシリアライズに失敗
    #[error("Error al crear el registro {row_id}: {detail}")]
    Serialize { row_id: String, detail: String },
}

/// バッチ処理の結果
///
/// 1回の呼び出しでの送信成功/失敗件数を保持する。応答ボディには
/// 含めず、ログにのみ出力する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// 送信に成功した行数
    pub sent_count: usize,
    /// 送信に失敗した行数
    pub failed_count: usize,
}

impl BatchSummary {
    /// 新しいBatchSummaryを作成
    pub fn new() -> Self {
        Self {
            sent_count: 0,
            failed_count: 0,
        }
    }
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// バッチプロセッサ
///
/// 行列の各行をレコードへ変換し、RecordSender経由で1件ずつ順番に
/// 送信する。並列送信は行わず、各送信の完了を待ってから次の行に進む。
pub struct BatchProcessor<S: RecordSender> {
    /// レコード送信実装
    sender: S,
}

impl<S: RecordSender> BatchProcessor<S> {
    /// 新しいBatchProcessorを作成
    ///
    /// # 引数
    /// * `sender` - レコード送信実装
    pub fn new(sender: S) -> Self {
        Self { sender }
    }

    /// バッチ全体を処理
    ///
    /// 前提条件: 行が1つ以上あり、各行が6フィールド以上持つこと。
    /// 空のバッチと先頭行のフィールド数不足は`BatchError::InvalidBatch`、
    /// 2行目以降のフィールド数不足は`BatchError::Row`になる。
    ///
    /// # 引数
    /// * `rows` - パース済みのCSV行列
    ///
    /// # 戻り値
    /// * `Ok(BatchSummary)` - 完走した（送信失敗した行があっても可）
    /// * `Err(BatchError)` - バッチ全体を中断したエラー
    pub async fn process(&self, rows: &[Vec<String>]) -> Result<BatchSummary, BatchError> {
        if rows.is_empty() || rows[0].len() < ROW_FIELD_COUNT {
            return Err(BatchError::InvalidBatch);
        }

        info!(row_count = rows.len(), "バッチ処理開始");

        let mut summary = BatchSummary::new();

        for row in rows {
            let fields: Vec<&str> = row.iter().map(String::as_str).collect();
            // 先頭フィールドは行の識別子（ログとエラーメッセージ用）
            let row_id = fields.first().copied().unwrap_or_default();

            let record = match PeriodRecord::from_row(&fields) {
                Ok(record) => record,
                Err(e) => {
                    error!(row_id = row_id, error = %e, "行の構造が不正なためバッチを中断");
                    return Err(BatchError::Row {
                        row_id: row_id.to_string(),
                        source: e,
                    });
                }
            };

            let payload = serde_json::to_string(&record).map_err(|e| BatchError::Serialize {
                row_id: row_id.to_string(),
                detail: e.to_string(),
            })?;

            match self.sender.send(&payload).await {
                Ok(()) => {
                    info!(row_id = row_id, payload = %payload, "レコード送信成功");
                    summary.sent_count += 1;
                }
                Err(e) => {
                    // 送信失敗は行単位で記録し、バッチは継続する
                    error!(row_id = row_id, error = %e, "レコード送信失敗");
                    summary.failed_count += 1;
                }
            }
        }

        info!(
            sent_count = summary.sent_count,
            failed_count = summary.failed_count,
            "バッチ処理完了"
        );

        Ok(summary)
    }
}
