//! ログ本文パーサー
//!
//! 検査装置のログ本文から埋め込まれたJSON配列を取り出し、
//! InspectionRecordの列に変換する

use crate::error::ParseError;
use crate::types::InspectionRecord;

/// ログ本文から最初のトップレベル配列を抽出
///
/// 最初の `[` から、同じ深さで閉じる `]` までを返す。
/// 文字列リテラル内の括弧（エスケープされた引用符を含む）は数えない。
/// 閉じきらないまま本文が終わった場合は、最後の `]` までを返す（JSONとしては不正）。
///
/// # Arguments
/// * `text` - ログ本文
///
/// # Returns
/// * `Ok(&str)` - `[` から対応する `]` までの部分文字列
/// * `Err(ParseError::NoEmbeddedArray)` - `[` がない、またはそれ以降に `]` がない
///
/// # Examples
/// ```
/// use ina_vision_common::extract_record_array;
///
/// let text = "2025-05-06 08:05 RESULT [{\"Marker\": \"M1\"}, {\"Marker\": \"M2\"}] END";
/// let array = extract_record_array(text).unwrap();
/// assert_eq!(array, "[{\"Marker\": \"M1\"}, {\"Marker\": \"M2\"}]");
/// ```
pub fn extract_record_array(text: &str) -> Result<&str, ParseError> {
    let start = text.find('[').ok_or(ParseError::NoEmbeddedArray)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset;
                    return Ok(&text[start..=end]);
                }
            }
            _ => {}
        }
    }

    // 文字列や括弧が閉じていなくても、`]` があれば配列らしき部分として扱う
    match text.rfind(']') {
        Some(end) if end > start => Ok(&text[start..=end]),
        _ => Err(ParseError::NoEmbeddedArray),
    }
}

/// ログ本文をパースしてレコード列を返す
///
/// 要素はスキーマ検証せずそのまま受け入れる
///
/// # Returns
/// * `Ok(Vec<InspectionRecord>)` - パース成功
/// * `Err(ParseError::NoEmbeddedArray)` - 配列が見つからない
/// * `Err(ParseError::MalformedArray)` - 配列がJSONとして不正
pub fn parse_records(text: &str) -> Result<Vec<InspectionRecord>, ParseError> {
    let array = extract_record_array(text)?;
    let records: Vec<InspectionRecord> = serde_json::from_str(array)?;
    Ok(records)
}
