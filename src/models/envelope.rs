//! Best-effort accessors for the API-Football response envelope:
//! `{"results": n, "paging": {...}, "response": [...]}`.

use serde_json::Value;

/// A JSON integer, or a string holding one. Anything else is absent.
pub fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Identifier at `pointer` (e.g. `/league/id`), skipping missing and zero ids.
pub fn non_zero_id(record: &Value, pointer: &str) -> Option<u64> {
    record
        .pointer(pointer)
        .and_then(json_u64)
        .filter(|&id| id != 0)
}

pub fn records(data: &Value) -> &[Value] {
    data.get("response")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// The API's own `results` counter, 0 when absent.
pub fn results_count(data: &Value) -> u64 {
    data.get("results").and_then(json_u64).unwrap_or(0)
}

/// `results` when the API reports it, otherwise the length of `response`.
pub fn record_count(data: &Value) -> u64 {
    data.get("results")
        .and_then(json_u64)
        .unwrap_or(records(data).len() as u64)
}
