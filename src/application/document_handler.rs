// ドキュメント受付ハンドラー
//
// アップロードドキュメント（任意のJSON）を受け付け、エンベロープ形式
// （Success / Status / Message / Data）で応答する。登録処理の本体は
// まだなく、入力検証とAPI契約だけを提供する。

use crate::application::cors::build_cors_headers;
use crate::domain::envelope::ApiEnvelope;
use crate::infrastructure::config::CorsConfig;
use lambda_http::http::Method;
use lambda_http::{Body, Request, Response};
use serde_json::{Value, json};
use tracing::{error, instrument};

/// ドキュメント受付エンドポイントのAccess-Control-Allow-Methods値
pub const ALLOW_METHODS: &str = "POST, OPTIONS";

/// ドキュメント受付ハンドラー
///
/// # 動作
/// - POST: ボディをJSONとして検証し、200で受理エンベロープを返す
/// - OPTIONS: 200でOKエンベロープを返す
/// - その他のメソッド: 405エンベロープを返す
///
/// CORSヘッダーはローカル開発トグルが有効な場合のみ付与する
/// （本番ではAPIゲートウェイ側がCORSを受け持つ）。
pub struct DocumentHandler {
    /// CORS設定（Noneならヘッダーを付けない）
    cors: Option<CorsConfig>,
}

impl DocumentHandler {
    /// 新しいDocumentHandlerを作成
    ///
    /// # 引数
    /// * `cors` - CORS設定（ローカル開発時のみSome）
    pub fn new(cors: Option<CorsConfig>) -> Self {
        Self { cors }
    }

    /// リクエストを処理してレスポンスを生成
    #[instrument(skip(self, request), fields(method = %request.method()))]
    pub fn handle(&self, request: &Request) -> Response<Body> {
        let method = request.method();

        if method == Method::POST {
            let envelope = match serde_json::from_slice::<Value>(request.body().as_ref()) {
                Ok(_) => {
                    ApiEnvelope::success(200, "Documento procesado correctamente", json!({}))
                }
                Err(e) => {
                    error!(error = %e, "ドキュメントボディの解釈に失敗");
                    ApiEnvelope::failure(400, "Error el payload no sigue el formato JSON esperado")
                }
            };
            return self.build_response(envelope);
        }

        if method == Method::OPTIONS {
            return self.build_response(ApiEnvelope::success(200, "OK", Value::Null));
        }

        self.build_response(ApiEnvelope::failure(405, "Metodo no permitido"))
    }

    /// エンベロープからレスポンスを構築
    ///
    /// HTTPステータスはエンベロープのStatusと一致させる。
    fn build_response(&self, envelope: ApiEnvelope) -> Response<Body> {
        let mut response = Response::builder()
            .status(envelope.status)
            .body(Body::Text(envelope.to_json()))
            .expect("レスポンスの構築に失敗");

        if let Some(cors) = &self.cors {
            *response.headers_mut() = build_cors_headers(cors, ALLOW_METHODS);
        }

        response
    }
}
