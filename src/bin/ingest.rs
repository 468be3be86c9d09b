/// HTTP受付Lambdaエントリポイント
///
/// リクエストボディの `base64Data` フィールドからbase64 CSVを展開し、
/// 1行ずつ設定済みエンドポイントへPOSTする。CORSヘッダーを付与し、
/// OPTIONSとPOSTはパイプラインを実行せず早期応答する。
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use registro_datos::application::{PayloadSource, RequestHandler};
use registro_datos::infrastructure::{
    ConfigError, CorsConfig, EndpointConfig, HttpRecordSender, init_logging,
};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// HTTPレコード送信の静的インスタンス
///
/// Lambda warm start時にHTTPクライアントを再利用するため、
/// 一度構築した送信インスタンスを静的に保持する。
static RECORD_SENDER: OnceCell<HttpRecordSender> = OnceCell::const_new();

/// HttpRecordSenderを取得（初期化されていなければ初期化）
async fn get_record_sender() -> Result<&'static HttpRecordSender, ConfigError> {
    RECORD_SENDER
        .get_or_try_init(|| async {
            let config = EndpointConfig::from_env()?;
            Ok(HttpRecordSender::new(&config))
        })
        .await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    info!("HTTP受付Lambda関数を初期化");

    // Lambda関数を実行
    run(service_fn(handler)).await
}

/// HTTPリクエストハンドラー
///
/// 設定が読めない場合は500を返す。それ以外はリクエストハンドラーに
/// 委譲する。
async fn handler(request: Request) -> Result<Response<Body>, Error> {
    let sender = match get_record_sender().await {
        Ok(sender) => sender.clone(),
        Err(err) => {
            error!(error = %err, "エンドポイント設定の読み込みに失敗");
            return Ok(internal_error_response());
        }
    };

    let cors = CorsConfig::from_env();
    let request_handler = RequestHandler::new(sender, PayloadSource::RequestBody, Some(cors));

    Ok(request_handler.handle(&request).await)
}

/// 設定エラー時の500レスポンス
fn internal_error_response() -> Response<Body> {
    Response::builder()
        .status(500)
        .body(Body::Text("Internal server error".to_string()))
        .expect("レスポンスの構築に失敗")
}
