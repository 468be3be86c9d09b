// APIレスポンスエンベロープ
//
// このモジュールはドキュメント受付APIの構造化レスポンスボディを定義する。

use serde::Serialize;
use serde_json::Value;

/// 構造化レスポンスボディ
///
/// 成否フラグ、HTTPステータス、説明メッセージ、および結果データを
/// まとめた応答形式。キー名は既存クライアントとの契約に合わせて
/// PascalCaseで固定されている。`Data` は成功時のみ（値がnullでも）
/// 含まれ、失敗時は省略される。
#[derive(Debug, Clone, Serialize)]
pub struct ApiEnvelope {
    /// リクエストが成功したかどうか
    #[serde(rename = "Success")]
    pub success: bool,

    /// HTTPステータスコード（ボディ内にも複製する）
    #[serde(rename = "Status")]
    pub status: u16,

    /// 結果の説明メッセージ
    #[serde(rename = "Message")]
    pub message: String,

    /// 処理結果データ（失敗時は省略）
    #[serde(rename = "Data", skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiEnvelope {
    /// 成功レスポンスを作成
    ///
    /// `data` はnullでもキーごと含まれる。
    pub fn success(status: u16, message: impl Into<String>, data: Value) -> Self {
        Self {
            success: true,
            status,
            message: message.into(),
            data: Some(data),
        }
    }

    /// 失敗レスポンスを作成
    ///
    /// `Data` キーは含まれない。
    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            message: message.into(),
            data: None,
        }
    }

    /// JSON文字列にシリアライズ
    ///
    /// エンベロープは文字列キーのみで構成されるため失敗しない。
    /// 万一失敗した場合は空オブジェクトに倒す。
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
