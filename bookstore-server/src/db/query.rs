//! Sorting and paging of listed documents

use serde::Serialize;
use serde_json::Value;
use shared::query::{ListQuery, SortOrder};
use std::cmp::Ordering;

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.to_lowercase().cmp(&y.to_lowercase()),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        // missing fields sort first
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Sort by the camelCase field `query.order_by`, then apply offset and limit.
pub fn paginate<T: Serialize>(docs: Vec<T>, query: &ListQuery) -> Vec<T> {
    let mut keyed: Vec<(Value, T)> = docs
        .into_iter()
        .map(|doc| {
            let key = serde_json::to_value(&doc)
                .ok()
                .and_then(|v| v.get(&query.order_by).cloned())
                .unwrap_or(Value::Null);
            (key, doc)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match query.order {
        SortOrder::Asc => compare(a, b),
        SortOrder::Desc => compare(b, a),
    });

    keyed
        .into_iter()
        .skip(query.offset)
        .take(query.limit())
        .map(|(_, doc)| doc)
        .collect()
}
