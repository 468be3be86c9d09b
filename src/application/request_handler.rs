// パイプラインリクエストハンドラー
//
// 2つのLambda（固定ペイロード投入とHTTP受付）は「ペイロードの取得元」と
// 「CORSモード」の組み合わせだけが異なるため、単一のハンドラーに
// 統合している。

use crate::application::batch_processor::{
    BATCH_SUCCESS_MESSAGE, BatchError, BatchProcessor, BatchSummary,
};
use crate::application::cors::build_cors_headers;
use crate::application::payload::{PayloadError, decode_payload, read_rows};
use crate::infrastructure::config::CorsConfig;
use crate::infrastructure::record_sender::RecordSender;
use lambda_http::http::Method;
use lambda_http::{Body, Request, Response};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, instrument};

/// CORS有効時の早期応答ボディ
pub const PLACEHOLDER_BODY: &str = r#"{"message":"Hello, world!"}"#;

/// 受付エンドポイントのAccess-Control-Allow-Methods値
pub const ALLOW_METHODS: &str = "GET, POST, PUT, OPTIONS";

/// base64 CSVペイロードの取得元
#[derive(Debug, Clone)]
pub enum PayloadSource {
    /// 設定で与えられた固定ペイロードを使う（リクエスト内容は見ない）
    Embedded(String),
    /// リクエストボディの `base64Data` フィールドから読む
    RequestBody,
}

/// リクエストボディの入力形式
///
/// `base64Data` が欠けている場合やボディ全体がJSON `null` の場合は
/// 空文字列として扱い、後段のバッチ前提チェックで `CSV no valido` になる。
#[derive(Debug, Deserialize)]
struct PayloadInput {
    #[serde(rename = "base64Data", default)]
    base64_data: String,
}

/// リクエストボディをJSONとして解釈できなかった
#[derive(Debug, Error)]
#[error("Error al procesar el cuerpo del request: {0}")]
pub struct BodyError(String);

/// パイプラインを中断したエラー
#[derive(Debug, Error)]
pub enum PipelineError {
    /// ペイロードの展開に失敗
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// バッチ処理を中断した
    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// パイプラインリクエストハンドラー
///
/// # 型パラメータ
/// * `S` - レコード送信実装
///
/// # 動作
/// CORSが有効な場合、OPTIONSは200、POSTは201でプレースホルダーボディを
/// 即座に返し、パイプラインは実行しない。既存クライアントがこの
/// 早期リターンに依存しているため変更しないこと。それ以外のメソッド、
/// またはCORS無効時は常にデコード → CSV読み出し → バッチ送信の順で
/// 処理する。
pub struct RequestHandler<S: RecordSender> {
    /// バッチプロセッサ
    processor: BatchProcessor<S>,
    /// ペイロードの取得元
    source: PayloadSource,
    /// CORS設定（Noneならヘッダーを付けず、メソッド分岐もしない）
    cors: Option<CorsConfig>,
}

impl<S: RecordSender> RequestHandler<S> {
    /// 新しいRequestHandlerを作成
    ///
    /// # 引数
    /// * `sender` - レコード送信実装
    /// * `source` - ペイロードの取得元
    /// * `cors` - CORS設定（固定ペイロード投入ではNone）
    pub fn new(sender: S, source: PayloadSource, cors: Option<CorsConfig>) -> Self {
        Self {
            processor: BatchProcessor::new(sender),
            source,
            cors,
        }
    }

    /// リクエストを処理してレスポンスを生成
    #[instrument(skip(self, request), fields(method = %request.method()))]
    pub async fn handle(&self, request: &Request) -> Response<Body> {
        if self.cors.is_some() {
            let method = request.method();
            if method == Method::OPTIONS {
                return self.build_response(200, PLACEHOLDER_BODY.to_string());
            }
            // POSTもパイプラインに到達しない
            if method == Method::POST {
                return self.build_response(201, PLACEHOLDER_BODY.to_string());
            }
        }

        let payload = match self.extract_payload(request) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "リクエストボディの解釈に失敗");
                return self.build_response(400, e.to_string());
            }
        };

        match self.run_pipeline(&payload).await {
            Ok(_) => self.build_response(200, BATCH_SUCCESS_MESSAGE.to_string()),
            Err(e) => {
                error!(error = %e, "パイプラインを中断");
                self.build_response(400, e.to_string())
            }
        }
    }

    /// 設定に応じてbase64ペイロードを取り出す
    fn extract_payload(&self, request: &Request) -> Result<String, BodyError> {
        match &self.source {
            PayloadSource::Embedded(payload) => Ok(payload.clone()),
            PayloadSource::RequestBody => {
                let input: Option<PayloadInput> = serde_json::from_slice(request.body().as_ref())
                    .map_err(|e| BodyError(e.to_string()))?;
                Ok(input.map(|input| input.base64_data).unwrap_or_default())
            }
        }
    }

    /// デコード → CSV読み出し → バッチ送信
    async fn run_pipeline(&self, payload: &str) -> Result<BatchSummary, PipelineError> {
        let bytes = decode_payload(payload)?;
        let rows = read_rows(&bytes)?;
        let summary = self.processor.process(&rows).await?;

        Ok(summary)
    }

    /// ステータスとボディからレスポンスを構築
    ///
    /// CORS有効時はすべてのレスポンスにCORSヘッダーを付ける。
    fn build_response(&self, status: u16, body: String) -> Response<Body> {
        let mut response = Response::builder()
            .status(status)
            .body(Body::Text(body))
            .expect("レスポンスの構築に失敗");

        if let Some(cors) = &self.cors {
            *response.headers_mut() = build_cors_headers(cors, ALLOW_METHODS);
        }

        response
    }
}
