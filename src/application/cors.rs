// CORSヘッダー構築
//
// 許可オリジンは設定値、許可メソッドはエンドポイントごとの固定値を使う。

use crate::infrastructure::config::{CorsConfig, DEFAULT_ALLOW_ORIGIN};
use lambda_http::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    HeaderMap, HeaderValue,
};

/// Access-Control-Allow-Headersの固定値
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// CORSヘッダーを生成
///
/// 以下の3ヘッダーを含むHeaderMapを返す:
/// - Access-Control-Allow-Origin: 設定されたオリジン
/// - Access-Control-Allow-Methods: エンドポイントごとの許可メソッド
/// - Access-Control-Allow-Headers: Content-Type, Authorization
///
/// 設定値がヘッダー値として不正な場合はデフォルトオリジンに倒す
/// （`CorsConfig::from_env`で検証済みのため通常は起こらない）。
pub fn build_cors_headers(config: &CorsConfig, allow_methods: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let origin = HeaderValue::from_str(config.allow_origin())
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_ALLOW_ORIGIN));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);

    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(allow_methods),
    );

    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );

    headers
}
