//! 宽松反序列化
//!
//! 后端返回的字段类型并不稳定（数字有时是字符串，字段有时缺失或为 null）。
//! 这里的函数都先读成 `serde_json::Value` 再转换，转换失败时返回类型的"空值"，
//! 绝不让一个坏字段导致整个响应解析失败。

use chrono::{DateTime, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 字符串，数字会被转成字符串，其他情况为空串
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_from(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// 可选字符串，空串视为缺失
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_from(Value::deserialize(deserializer)?))
}

/// 非负整数，接受 `12`、`12.0`、`"12"`，否则为 0
pub fn u64_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(u64_from(&Value::deserialize(deserializer)?).unwrap_or(0))
}

/// 浮点数，接受 `8.5`、`"8.5"`，否则为 0.0
pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(f64_from(&Value::deserialize(deserializer)?).unwrap_or(0.0))
}

/// 可选浮点数
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(f64_from(&Value::deserialize(deserializer)?))
}

/// 列表，不是数组时为空；无法解析的元素被跳过
pub fn vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// 可选对象，null 或形状不对时为 None
pub fn opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => Ok(serde_json::from_value(value).ok()),
    }
}

/// 时间戳，支持 RFC 3339 和不带时区的 ISO 8601
pub fn opt_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_string_from(Value::deserialize(deserializer)?).and_then(|s| parse_timestamp(&s)))
}

/// 解析时间戳字符串
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn opt_string_from(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn u64_from(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(|f| {
            if f.is_finite() && f >= 0.0 {
                Some(f as u64)
            } else {
                None
            }
        }),
        _ => None,
    }
}

fn f64_from(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}
