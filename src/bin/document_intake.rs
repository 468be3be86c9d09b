/// ドキュメント受付Lambdaエントリポイント
///
/// アップロードドキュメント（任意のJSON）を受け付け、エンベロープ形式
/// （Success / Status / Message / Data）で応答する。CORSヘッダーは
/// ローカル開発トグルが有効な場合のみ付与する。
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use registro_datos::application::DocumentHandler;
use registro_datos::infrastructure::{CorsConfig, init_logging, local_cors_enabled};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("ドキュメント受付Lambda関数を初期化");

    // Lambda関数を実行
    run(service_fn(handler)).await
}

/// HTTPリクエストハンドラー
async fn handler(request: Request) -> Result<Response<Body>, Error> {
    let cors = if local_cors_enabled() {
        Some(CorsConfig::from_env())
    } else {
        None
    };

    let document_handler = DocumentHandler::new(cors);

    Ok(document_handler.handle(&request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lambda_http::http::Request as HttpRequest;
    use lambda_http::http::header::ACCESS_CONTROL_ALLOW_ORIGIN;
    use registro_datos::infrastructure::config::{ENV_ALLOW_ORIGIN, ENV_LOCAL_CORS};
    use serde_json::Value;
    use serial_test::serial;

    // テストで環境変数を安全に設定/削除するヘルパー
    // 注: Rust 2024エディションでset_var/remove_varはunsafe
    unsafe fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) };
    }

    unsafe fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) };
    }

    unsafe fn cleanup_env() {
        unsafe {
            remove_env(ENV_LOCAL_CORS);
            remove_env(ENV_ALLOW_ORIGIN);
        }
    }

    /// テスト用HTTPリクエストを作成
    fn build_request(method: &str, body: &str) -> Request {
        HttpRequest::builder()
            .method(method)
            .uri("/")
            .body(Body::Text(body.to_string()))
            .unwrap()
    }

    /// レスポンスボディをJSONとして取り出す
    fn body_json(response: &Response<Body>) -> Value {
        match response.body() {
            Body::Text(text) => serde_json::from_str(text).expect("ボディの解釈に失敗"),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    /// 有効なJSONのPOSTは200の受理エンベロープを返す
    #[tokio::test]
    #[serial]
    async fn test_handler_post_returns_envelope() {
        init_logging();
        unsafe {
            cleanup_env();
        }

        let response = handler(build_request("POST", r#"{"nombre":"informe.pdf"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = body_json(&response);
        assert_eq!(body["Success"], true);
        assert_eq!(body["Message"], "Documento procesado correctamente");

        // 本番相当（トグル無効）ではCORSヘッダーを付けない
        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    /// 不正なJSONのPOSTは400エンベロープを返す
    #[tokio::test]
    #[serial]
    async fn test_handler_malformed_post_returns_400() {
        init_logging();
        unsafe {
            cleanup_env();
        }

        let response = handler(build_request("POST", "esto no es json")).await.unwrap();

        assert_eq!(response.status(), 400);
        let body = body_json(&response);
        assert_eq!(body["Success"], false);
        assert_eq!(
            body["Message"],
            "Error el payload no sigue el formato JSON esperado"
        );
    }

    /// 許可されないメソッドは405エンベロープを返す
    #[tokio::test]
    #[serial]
    async fn test_handler_get_returns_405() {
        init_logging();
        unsafe {
            cleanup_env();
        }

        let response = handler(build_request("GET", "")).await.unwrap();

        assert_eq!(response.status(), 405);
        assert_eq!(body_json(&response)["Message"], "Metodo no permitido");
    }

    /// ローカル開発トグルが有効ならCORSヘッダーを付ける
    #[tokio::test]
    #[serial]
    async fn test_handler_local_toggle_enables_cors() {
        init_logging();
        unsafe {
            cleanup_env();
            set_env(ENV_LOCAL_CORS, "1");
        }

        let response = handler(build_request("OPTIONS", "")).await.unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:4200"
        );

        unsafe {
            cleanup_env();
        }
    }

    /// トグルが空文字列の場合はCORSヘッダーを付けない
    #[tokio::test]
    #[serial]
    async fn test_handler_empty_toggle_disables_cors() {
        init_logging();
        unsafe {
            cleanup_env();
            set_env(ENV_LOCAL_CORS, "");
        }

        let response = handler(build_request("OPTIONS", "")).await.unwrap();

        assert!(response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());

        unsafe {
            cleanup_env();
        }
    }
}
