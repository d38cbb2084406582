//! Nested query-parameter trees: [`QueryParams`], Rack-style parsing and
//! Rails-style `to_query` serialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::form_urlencoded;

/// The query parameters of one request, as a nested string-keyed tree.
///
/// `page[number]=2&page[size]=1&sort=-created_at` is held as
/// `{"page": {"number": "2", "size": "1"}, "sort": "-created_at"}`. Keys are
/// kept sorted, so serialization is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Map<String, Value>);

impl From<Map<String, Value>> for QueryParams {
    fn from(map: Map<String, Value>) -> Self {
        QueryParams(map)
    }
}

impl QueryParams {
    /// Creates an empty parameter tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a query string into a nested tree. A leading `?` is ignored and
    /// both `&` and `;` separate pairs.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Map::new();
        for segment in query.split(['&', ';']) {
            for (key, value) in form_urlencoded::parse(segment.as_bytes()) {
                if key.is_empty() {
                    continue;
                }
                let (name, segments) = split_key(&key);
                insert_nested(&mut params, &name, &segments, value.into_owned());
            }
        }
        QueryParams(params)
    }

    /// Returns the value stored under a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets a top-level key, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns a copy without the given top-level keys.
    pub fn without<S: AsRef<str>>(&self, keys: &[S]) -> QueryParams {
        let mut map = self.0.clone();
        for key in keys {
            map.remove(key.as_ref());
        }
        QueryParams(map)
    }

    /// Returns a copy whose `page[number]` is set to `number`, keeping every
    /// other `page` entry.
    pub fn with_page_number(&self, number: u64) -> QueryParams {
        let mut map = self.0.clone();
        let page = map
            .entry("page")
            .or_insert_with(|| Value::Object(Map::new()));
        if !page.is_object() {
            *page = Value::Object(Map::new());
        }
        if let Value::Object(page) = page {
            page.insert("number".to_string(), Value::from(number));
        }
        QueryParams(map)
    }

    /// Borrows the underlying tree.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Serializes the tree the way Rails' `Hash#to_query` does: nested keys
    /// become `outer[inner]`, arrays become `key[]`, and pairs are sorted.
    /// Keys and values are form-encoded; brackets are left literal.
    pub fn to_query(&self) -> String {
        let mut pairs: Vec<String> = self
            .0
            .iter()
            .map(|(key, value)| value_to_query(value, &escape(key)))
            .filter(|pair| !pair.is_empty())
            .collect();
        pairs.sort();
        pairs.join("&").replace("%5B", "[").replace("%5D", "]")
    }
}

fn escape(input: &str) -> String {
    form_urlencoded::byte_serialize(input.as_bytes()).collect()
}

/// Empty objects and arrays render as nothing and are skipped.
fn value_to_query(value: &Value, key: &str) -> String {
    match value {
        Value::Object(map) => {
            let mut parts: Vec<String> = map
                .iter()
                .map(|(child, v)| value_to_query(v, &format!("{}%5B{}%5D", key, escape(child))))
                .filter(|part| !part.is_empty())
                .collect();
            // Members of an array of objects keep their insertion grouping.
            if !key.contains("%5B%5D") {
                parts.sort();
            }
            parts.join("&")
        }
        Value::Array(items) => items
            .iter()
            .map(|item| value_to_query(item, &format!("{}%5B%5D", key)))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("&"),
        Value::Null => format!("{}=", key),
        Value::String(s) => format!("{}={}", key, escape(s)),
        other => format!("{}={}", key, escape(&other.to_string())),
    }
}

/// Splits `a[b][]` into `("a", ["b", ""])`. Malformed keys are kept whole.
fn split_key(key: &str) -> (String, Vec<String>) {
    let start = match key.find('[') {
        Some(start) if start > 0 => start,
        _ => return (key.to_string(), Vec::new()),
    };
    let mut segments = Vec::new();
    let mut rest = &key[start..];
    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(end) => {
                segments.push(stripped[..end].to_string());
                rest = &stripped[end + 1..];
            }
            None => return (key.to_string(), Vec::new()),
        }
    }
    if !rest.is_empty() {
        return (key.to_string(), Vec::new());
    }
    (key[..start].to_string(), segments)
}

fn insert_nested(target: &mut Map<String, Value>, name: &str, segments: &[String], value: String) {
    let Some((head, rest)) = segments.split_first() else {
        target.insert(name.to_string(), Value::String(value));
        return;
    };
    let entry = target.entry(name.to_string()).or_insert(Value::Null);

    if head.is_empty() {
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        let Value::Array(items) = entry else {
            return;
        };
        match rest.split_first() {
            None => items.push(Value::String(value)),
            Some((child, grandchildren)) => {
                let reuse_last = matches!(
                    items.last(),
                    Some(Value::Object(last)) if !last.contains_key(child.as_str())
                );
                if !reuse_last {
                    items.push(Value::Object(Map::new()));
                }
                if let Some(Value::Object(last)) = items.last_mut() {
                    insert_nested(last, child, grandchildren, value);
                }
            }
        }
    } else {
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(children) = entry {
            insert_nested(children, head, rest, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_flat_and_nested_keys() {
        let params = QueryParams::parse("?page[number]=2&page[size]=1&sort=-created_at");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"page": {"number": "2", "size": "1"}, "sort": "-created_at"})
        );
    }

    #[test]
    fn parse_decodes_percent_and_plus() {
        let params = QueryParams::parse("filter%5Bname%5D=John+Doe&q=a%26b");
        assert_eq!(params.get("filter"), Some(&json!({"name": "John Doe"})));
        assert_eq!(params.get("q"), Some(&json!("a&b")));
    }

    #[test]
    fn parse_arrays_and_arrays_of_objects() {
        let params = QueryParams::parse("ids[]=1&ids[]=2&rows[][a]=1&rows[][b]=2&rows[][a]=3");
        assert_eq!(params.get("ids"), Some(&json!(["1", "2"])));
        assert_eq!(params.get("rows"), Some(&json!([{"a": "1", "b": "2"}, {"a": "3"}])));
    }

    #[test]
    fn parse_skips_empty_segments_and_semicolons() {
        let params = QueryParams::parse("a=1&&b=2;c=3&=orphan");
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"a": "1", "b": "2", "c": "3"})
        );
    }

    #[test]
    fn parse_follows_rack_conventions() {
        // last value wins; numeric segments stay hash keys
        let params = QueryParams::parse("sort=name&sort=-created_at&a[0]=x&a[1]=y");
        assert_eq!(params.get("sort"), Some(&json!("-created_at")));
        assert_eq!(params.get("a"), Some(&json!({"0": "x", "1": "y"})));
    }

    #[test]
    fn parse_keeps_malformed_keys_whole() {
        let params = QueryParams::parse("a[b=1&[x]=2");
        assert_eq!(params.get("a[b"), Some(&json!("1")));
        assert_eq!(params.get("[x]"), Some(&json!("2")));
    }

    #[test]
    fn to_query_sorts_and_keeps_brackets_literal() {
        let params = QueryParams::parse("sort=-created_at&page[size]=1&page[number]=2");
        assert_eq!(params.to_query(), "page[number]=2&page[size]=1&sort=-created_at");
    }

    #[test]
    fn to_query_encodes_values() {
        let mut params = QueryParams::new();
        params.insert("q", "John Doe & co");
        assert_eq!(params.to_query(), "q=John+Doe+%26+co");
    }

    #[test]
    fn to_query_arrays_and_nulls() {
        let mut params = QueryParams::new();
        params.insert("ids", json!([1, 2]));
        params.insert("none", Value::Null);
        assert_eq!(params.to_query(), "ids[]=1&ids[]=2&none=");
    }

    #[test]
    fn to_query_skips_empty_collections() {
        let mut params = QueryParams::new();
        params.insert("ids", json!([]));
        params.insert("filter", json!({}));
        params.insert("nested", json!({"inner": {}, "list": []}));
        params.insert("s", "a[b]");
        assert_eq!(params.to_query(), "s=a[b]");
    }

    #[test]
    fn with_page_number_keeps_other_page_keys() {
        let params = QueryParams::parse("page[number]=2&page[size]=1&as_list=true");
        let next = params.with_page_number(3);
        assert_eq!(next.to_query(), "as_list=true&page[number]=3&page[size]=1");
        // the source tree is untouched
        assert_eq!(params.get("page"), Some(&json!({"number": "2", "size": "1"})));
    }

    #[test]
    fn with_page_number_replaces_scalar_page() {
        let params = QueryParams::parse("page=oops");
        assert_eq!(params.with_page_number(1).to_query(), "page[number]=1");
    }

    #[test]
    fn without_drops_top_level_keys() {
        let params = QueryParams::parse("id=7&user_id=3&page[number]=1");
        assert_eq!(params.without(&["id", "user_id"]).to_query(), "page[number]=1");
    }
}
