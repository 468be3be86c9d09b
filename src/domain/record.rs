// 期間レコードのドメインモデル
//
// このモジュールはCSV行から構築して外部APIへ送信するレコードの構造と、
// フィールド値の寛容パース方針を定義する。

use serde::Serialize;
use thiserror::Error;

/// 1行に必要な最小フィールド数
pub const ROW_FIELD_COUNT: usize = 6;

/// 行マッピングのエラー型
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RowError {
    /// フィールド数が不足している行
    #[error("Registro invalido: se esperaban al menos {expected} campos, se encontraron {found}")]
    TooFewFields { expected: usize, found: usize },
}

/// ID参照のラッパー
///
/// 送信先APIはIDを `{"Id": <整数>}` 形式のネストオブジェクトで受け取る。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRef {
    /// 参照先のID
    #[serde(rename = "Id")]
    pub id: i64,
}

impl EntityRef {
    /// 新しいID参照を作成
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

/// 期間レコード
///
/// CSVの1行から構築される送信単位。シリアライズ時のキー名と
/// フィールド順は送信先APIの契約に合わせて固定されている。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRecord {
    /// 期間終了日（書式は検証しない）
    #[serde(rename = "FechaFin")]
    pub end_date: String,

    /// 期間開始日（書式は検証しない）
    #[serde(rename = "FechaInicio")]
    pub start_date: String,

    /// 終了フラグ
    #[serde(rename = "Finalizado")]
    pub finished: bool,

    /// ロールへの参照
    #[serde(rename = "RolId")]
    pub role: EntityRef,

    /// ユーザーへの参照
    #[serde(rename = "UsuarioId")]
    pub user: EntityRef,
}

impl PeriodRecord {
    /// CSV行（フィールド列）からレコードを構築
    ///
    /// フィールドは位置固定:
    /// `[id, end_date, start_date, finished, role_id, user_id]`
    ///
    /// 先頭のidはレコード自体には含まれず、呼び出し側がログや
    /// エラーメッセージで行を識別するために使う。7個目以降の
    /// 余剰フィールドは無視する。フィールド数が6未満の行は
    /// `RowError::TooFewFields` になる。
    pub fn from_row(fields: &[&str]) -> Result<Self, RowError> {
        if fields.len() < ROW_FIELD_COUNT {
            return Err(RowError::TooFewFields {
                expected: ROW_FIELD_COUNT,
                found: fields.len(),
            });
        }

        Ok(Self {
            end_date: fields[1].to_string(),
            start_date: fields[2].to_string(),
            finished: parse_finished_token(fields[3]),
            role: EntityRef::new(parse_id_token(fields[4])),
            user: EntityRef::new(parse_id_token(fields[5])),
        })
    }
}

/// 終了フラグのトークンを寛容にパースする
///
/// 受理するトークンは真が `1` / `t` / `T` / `TRUE` / `true` / `True`、
/// 偽が `0` / `f` / `F` / `FALSE` / `false` / `False`。
/// それ以外のトークンは行を中断せず既定値の `false` に倒す。
/// 前後の空白は除去しない（`" true"` は不正トークン扱い）。
pub fn parse_finished_token(token: &str) -> bool {
    match token {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => true,
        "0" | "f" | "F" | "FALSE" | "false" | "False" => false,
        // 不正なトークンは既定値に倒す
        _ => false,
    }
}

/// 整数トークンをベストエフォートでパースする
///
/// 先頭の空白を読み飛ばし、符号と連続する数字の接頭辞だけを
/// 整数として解釈する。数字が1つも見つからない場合や桁あふれは
/// エラーにせず0を返す。
///
/// 例: `"195"` → 195、`"42abc"` → 42、`"-5"` → -5、`"abc"` → 0
pub fn parse_id_token(token: &str) -> i64 {
    let trimmed = token.trim_start();
    let unsigned = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
    let digit_len = unsigned
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .count();

    if digit_len == 0 {
        return 0;
    }

    // 符号部を含む数値接頭辞のみをパースする
    let prefix_len = trimmed.len() - unsigned.len() + digit_len;
    trimmed[..prefix_len].parse().unwrap_or(0)
}
