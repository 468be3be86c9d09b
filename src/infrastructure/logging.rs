// ログ基盤
//
// Lambda環境（CloudWatch Logs）向けの構造化ログ設定。tracingクレートを
// 使用し、JSON形式で出力する。

use std::sync::Once;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// ログサブスクライバー初期化用の同期プリミティブ
static INIT: Once = Once::new();

/// Lambda環境向けのログサブスクライバーを初期化する
///
/// JSON形式の構造化ログを設定し、環境変数`RUST_LOG`（未設定時はinfo）で
/// フィルタリングする。複数回呼び出しても初期化は最初の1回だけ実行される。
///
/// # 使用例
/// ```ignore
/// use registro_datos::infrastructure::init_logging;
///
/// init_logging();
/// tracing::info!("handler started");
/// ```
pub fn init_logging() {
    INIT.call_once(|| {
        // RUST_LOG優先、未設定ならinfo
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // CloudWatch向けJSONレイヤー
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .flatten_event(true)
            .with_current_span(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(json_layer)
            .init();
    });
}

/// テスト用のログサブスクライバーを初期化する（人間が読みやすい形式）
///
/// # 注意
/// テスト専用。本番コードでは`init_logging`を使用すること。
#[cfg(test)]
pub fn init_test_logging() {
    static TEST_INIT: Once = Once::new();

    TEST_INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_test_writer()
            .with_target(true)
            .compact();

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init();
    });
}
