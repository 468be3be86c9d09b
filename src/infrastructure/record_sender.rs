// レコード送信
//
// シリアライズ済みレコードを外部APIへ1件ずつHTTP POSTする。
// 送信手段はトレイトで抽象化し、テストではモックに差し替える。

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, instrument};

use super::config::EndpointConfig;

/// レコード送信のエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SendError {
    /// 送信先が200/201以外のステータスを返した
    #[error("Error: el servidor devolvió un estado {0}")]
    UnexpectedStatus(u16),

    /// ネットワークまたはトランスポートのエラー
    #[error("Error al enviar los datos al endpoint: {0}")]
    Network(String),
}

/// レコード送信用トレイト
///
/// このトレイトは送信機能を抽象化し、異なる実装を可能にします
/// （実際のHTTPクライアント、テスト用モック）。
#[async_trait]
pub trait RecordSender: Send + Sync {
    /// シリアライズ済みレコードを1件送信する
    ///
    /// # 引数
    /// * `payload` - 送信するJSON文字列
    ///
    /// # 戻り値
    /// * 成功時は`Ok(())`
    /// * 200/201以外のステータスは`Err(SendError::UnexpectedStatus)`
    /// * トランスポート障害は`Err(SendError::Network)`
    async fn send(&self, payload: &str) -> Result<(), SendError>;
}

/// 送信成功とみなすHTTPステータスかどうか
///
/// 送信先APIの契約では200 OKと201 Createdのみが成功。
/// 204などその他の2xxも失敗として扱う。
pub fn is_accepted_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::OK || status == reqwest::StatusCode::CREATED
}

/// reqwestによるレコード送信実装
///
/// 設定されたエンドポイントへ `Content-Type: application/json` のPOSTを
/// 発行する。再試行もタイムアウトも行わない。応答しないエンドポイントは
/// バッチ全体を停止させる。
#[derive(Debug, Clone)]
pub struct HttpRecordSender {
    /// HTTPクライアント（ウォームコンテナで再利用される）
    client: reqwest::Client,
    /// 送信先エンドポイントURL
    endpoint: String,
}

impl HttpRecordSender {
    /// 設定からHttpRecordSenderを作成
    ///
    /// # 引数
    /// * `config` - 送信先エンドポイント設定
    pub fn new(config: &EndpointConfig) -> Self {
        info!(endpoint = config.url(), "HttpRecordSenderを初期化");

        Self::with_endpoint(config.url())
    }

    /// 指定されたエンドポイントURLでHttpRecordSenderを作成
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("HTTPクライアントの構築に失敗");

        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// 送信先エンドポイントURLを取得
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecordSender for HttpRecordSender {
    #[instrument(skip(self, payload), fields(endpoint = %self.endpoint))]
    async fn send(&self, payload: &str) -> Result<(), SendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(payload.to_string())
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "レコード送信リクエスト失敗");
                SendError::Network(e.to_string())
            })?;

        let status = response.status();

        if is_accepted_status(status) {
            return Ok(());
        }

        // エラーレスポンスのボディはログにのみ残す
        let body = response.text().await.unwrap_or_default();
        error!(
            status = %status,
            body = %body,
            "送信先が想定外のステータスを返却"
        );

        Err(SendError::UnexpectedStatus(status.as_u16()))
    }
}
