//! Query-string decoding into native configuration values.

use std::collections::HashMap;
use std::hash::Hash;

use serde_json::{Map, Number, Value};
use url::form_urlencoded;

/// Parses a query string into a map of native values.
///
/// - Pairs are separated by `&`; keys and values are percent-decoded and `+`
///   stands for a space.
/// - Numeric strings become integers or floats.
/// - `true` and `false`, in any letter case, become booleans.
/// - `key[]=v` appends to a list and `key[name]=v` sets an entry of a nested
///   map; brackets nest to any depth.
/// - A later pair overwrites an earlier one with the same key.
///
/// # Examples
///
/// ```
/// use cumulus::dsn::query_to_native_types;
/// use serde_json::json;
///
/// let params = query_to_native_types("lazy=true&connections=10&ratio=0.5&name=main+db&tags[]=a&tags[]=b");
///
/// assert_eq!(
///     serde_json::Value::Object(params),
///     json!({
///         "lazy": true,
///         "connections": 10,
///         "ratio": 0.5,
///         "name": "main db",
///         "tags": ["a", "b"]
///     })
/// );
/// ```
#[must_use]
pub fn query_to_native_types(query: &str) -> Map<String, Value> {
    let mut params = Map::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let (name, path) = split_key_path(&key);
        if name.is_empty() {
            continue;
        }
        insert_path(&mut params, name, &path, to_native(&value));
    }
    params
}

/// Returns a function that replaces values found in `table` and passes
/// every other value through unchanged.
///
/// Handy inside custom mapping functions, for example to translate scheme
/// names into driver names.
///
/// # Examples
///
/// ```
/// use cumulus::dsn::value_mapper;
/// use std::collections::HashMap;
///
/// let driver = value_mapper(HashMap::from([("postgres", "pgsql"), ("mariadb", "mysql")]));
///
/// assert_eq!(driver("postgres"), "pgsql");
/// assert_eq!(driver("sqlite"), "sqlite");
/// ```
pub fn value_mapper<V>(table: HashMap<V, V>) -> impl Fn(V) -> V
where
    V: Eq + Hash + Clone,
{
    move |value| table.get(&value).cloned().unwrap_or(value)
}

/// Converts a decoded scalar into a number or boolean where it reads as one.
fn to_native(text: &str) -> Value {
    if let Ok(integer) = text.parse::<i64>() {
        return Value::from(integer);
    }
    if looks_like_float(text) {
        if let Some(number) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(number);
        }
    }
    if text.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::String(text.to_string())
}

/// Only decimal notation counts as numeric; `inf` and `NaN` stay strings.
fn looks_like_float(text: &str) -> bool {
    text.bytes().any(|byte| byte.is_ascii_digit())
        && text
            .bytes()
            .all(|byte| byte.is_ascii_digit() || matches!(byte, b'.' | b'e' | b'E' | b'+' | b'-'))
}

/// Splits `name[a][]` into `name` and the bracket segments `["a", ""]`.
fn split_key_path(key: &str) -> (&str, Vec<&str>) {
    let Some(open) = key.find('[') else {
        return (key, Vec::new());
    };
    let (name, mut rest) = key.split_at(open);
    let mut path = Vec::new();
    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            // An unterminated bracket makes the whole key literal.
            return (key, Vec::new());
        };
        path.push(&inner[..close]);
        rest = &inner[close + 1..];
    }
    (name, path)
}

fn insert_path(target: &mut Map<String, Value>, name: &str, path: &[&str], value: Value) {
    match path.split_first() {
        None => {
            target.insert(name.to_string(), value);
        }
        Some((segment, rest)) => {
            let slot = target.entry(name.to_string()).or_insert(Value::Null);
            insert_segment(slot, segment, rest, value);
        }
    }
}

fn insert_segment(slot: &mut Value, segment: &str, rest: &[&str], value: Value) {
    if segment.is_empty() {
        if !slot.is_array() && !slot.is_object() {
            *slot = Value::Array(Vec::new());
        }
        match slot {
            Value::Array(items) => {
                let mut element = Value::Null;
                assign(&mut element, rest, value);
                items.push(element);
            }
            Value::Object(entries) => {
                let index = entries.len().to_string();
                let element = entries.entry(index).or_insert(Value::Null);
                assign(element, rest, value);
            }
            _ => unreachable!("slot was turned into a container"),
        }
        return;
    }

    if let Value::Array(items) = slot {
        let entries = std::mem::take(items)
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect();
        *slot = Value::Object(entries);
    }
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(entries) = slot {
        let element = entries.entry(segment.to_string()).or_insert(Value::Null);
        assign(element, rest, value);
    }
}

fn assign(slot: &mut Value, path: &[&str], value: Value) {
    match path.split_first() {
        None => *slot = value,
        Some((segment, rest)) => insert_segment(slot, segment, rest, value),
    }
}
