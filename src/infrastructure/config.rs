// サービス設定
//
// エンドポイントURL、シードペイロード、CORS設定を環境変数から読み込む。
// 接続先の類はソースに埋め込まず、すべてデプロイパラメータとして渡す。

use lambda_http::http::HeaderValue;
use thiserror::Error;
use tracing::warn;

/// 送信先エンドポイントURLの環境変数名
pub const ENV_ENDPOINT_URL: &str = "REGISTRO_ENDPOINT_URL";

/// シードペイロードの環境変数名
pub const ENV_SEED_PAYLOAD: &str = "REGISTRO_SEED_PAYLOAD";

/// CORS許可オリジンの環境変数名
pub const ENV_ALLOW_ORIGIN: &str = "REGISTRO_ALLOW_ORIGIN";

/// ローカル開発向けCORSトグルの環境変数名
pub const ENV_LOCAL_CORS: &str = "REGISTRO_LOCAL_CORS";

/// CORS許可オリジンのデフォルト値
pub const DEFAULT_ALLOW_ORIGIN: &str = "http://localhost:4200";

/// 設定エラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須の環境変数が設定されていない
    #[error("必須の環境変数が設定されていません: {0}")]
    MissingEnvVar(String),

    /// エンドポイントURLとして解釈できない値
    #[error("エンドポイントURLが不正です: {0}")]
    InvalidEndpointUrl(String),
}

/// レコード送信先エンドポイントの設定
///
/// # フィールド
/// - `url`: レコードを受け取るAPIの完全なURL
///   (例: "https://api.example.com/v1/periodos-rol-usuarios/")
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    url: String,
}

impl EndpointConfig {
    /// 新しい設定を作成
    ///
    /// # 引数
    /// - `url`: 送信先の完全なURL
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// 環境変数から設定を読み込み
    ///
    /// # 環境変数
    /// - `REGISTRO_ENDPOINT_URL`: 送信先URL（必須、URLとして検証される）
    ///
    /// # 戻り値
    /// - `Ok(EndpointConfig)`: 設定が正常に読み込まれた
    /// - `Err(ConfigError)`: 環境変数が未設定、またはURLとして不正
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var(ENV_ENDPOINT_URL)
            .map_err(|_| ConfigError::MissingEnvVar(ENV_ENDPOINT_URL.to_string()))?;

        url::Url::parse(&url).map_err(|e| ConfigError::InvalidEndpointUrl(format!("{url} ({e})")))?;

        Ok(Self { url })
    }

    /// 送信先URLを取得
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// シードペイロードの設定
///
/// 固定データ投入Lambdaが使うbase64 CSVペイロード。デプロイ時に
/// 環境変数として渡される。
#[derive(Debug, Clone)]
pub struct SeedPayloadConfig {
    payload: String,
}

impl SeedPayloadConfig {
    /// 新しい設定を作成
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// 環境変数から設定を読み込み
    ///
    /// # 環境変数
    /// - `REGISTRO_SEED_PAYLOAD`: base64エンコード済みCSV（必須）
    pub fn from_env() -> Result<Self, ConfigError> {
        let payload = std::env::var(ENV_SEED_PAYLOAD)
            .map_err(|_| ConfigError::MissingEnvVar(ENV_SEED_PAYLOAD.to_string()))?;

        Ok(Self { payload })
    }

    /// ペイロードを取得
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// CORS設定
///
/// # フィールド
/// - `allow_origin`: `Access-Control-Allow-Origin` に入れるオリジン
#[derive(Debug, Clone)]
pub struct CorsConfig {
    allow_origin: String,
}

impl CorsConfig {
    /// 新しい設定を作成
    pub fn new(allow_origin: impl Into<String>) -> Self {
        Self {
            allow_origin: allow_origin.into(),
        }
    }

    /// 環境変数から設定を読み込み
    ///
    /// # 環境変数
    /// - `REGISTRO_ALLOW_ORIGIN`: 許可オリジン（省略時は
    ///   `http://localhost:4200`）
    ///
    /// ヘッダー値として使えない値が設定されている場合は警告ログを
    /// 出してデフォルト値に倒す。
    pub fn from_env() -> Self {
        let allow_origin = match std::env::var(ENV_ALLOW_ORIGIN) {
            Ok(value) if HeaderValue::from_str(&value).is_ok() => value,
            Ok(value) => {
                warn!(
                    env_var = ENV_ALLOW_ORIGIN,
                    value = %value,
                    default = DEFAULT_ALLOW_ORIGIN,
                    "ヘッダー値として不正なオリジンのためデフォルト値を使用"
                );
                DEFAULT_ALLOW_ORIGIN.to_string()
            }
            Err(_) => DEFAULT_ALLOW_ORIGIN.to_string(),
        };

        Self { allow_origin }
    }

    /// 許可オリジンを取得
    pub fn allow_origin(&self) -> &str {
        &self.allow_origin
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOW_ORIGIN)
    }
}

/// ローカル開発向けCORSが有効かどうか
///
/// `REGISTRO_LOCAL_CORS` が空でない値に設定されている場合のみ有効。
/// 本番ではAPIゲートウェイ側がCORSを受け持つため既定では無効。
pub fn local_cors_enabled() -> bool {
    std::env::var(ENV_LOCAL_CORS)
        .map(|value| !value.is_empty())
        .unwrap_or(false)
}
