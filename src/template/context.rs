//! Context values and placeholder resolution.
//!
//! A [`Context`] maps string keys to tagged [`Value`]s. Nested maps are
//! addressed with dotted paths (`customer.address.city`). Resolution is total:
//! a missing key or a path that runs into a non-map value yields an empty
//! string, never an error.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// A value stored in a [`Context`].
///
/// Deserializes from any JSON value: strings become `Text`, arrays `List`,
/// objects `Map`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// JSON `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer or floating point number
    Number(serde_json::Number),
    /// Plain text
    Text(String),
    /// A list of values; repeating sections expect a list of maps
    List(Vec<Value>),
    /// A nested mapping
    Map(Context),
}

impl Value {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Get the nested mapping if this value is one.
    #[inline]
    pub fn as_map(&self) -> Option<&Context> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get the list if this value is one.
    #[inline]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// The text a placeholder resolving to this value is replaced with.
    ///
    /// Text is used verbatim, numbers use their JSON form (`2`, `100.0`),
    /// booleans are `true`/`false`. Null, lists, and maps render empty.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Null | Value::List(_) | Value::Map(_) => Cow::Borrowed(""),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    /// Non-finite numbers have no JSON form and become `Null`.
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Context> for Value {
    fn from(map: Context) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            },
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// A mapping from string keys to values.
///
/// # Examples
///
/// ```
/// use docfill::template::{Context, Value, resolve};
///
/// let mut customer = Context::new();
/// customer.insert("name", "Ada");
///
/// let mut ctx = Context::new();
/// ctx.insert("customer", customer);
/// ctx.insert("qty", 2i64);
///
/// assert_eq!(resolve("customer.name", &ctx), "Ada");
/// assert_eq!(resolve("qty", &ctx), "2");
/// assert_eq!(resolve("customer.missing", &ctx), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    entries: BTreeMap<String, Value>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value for the key.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Get a top-level value.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Check whether a top-level key is present.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the number of top-level entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the context is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over top-level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Build the context for one repeated item: a copy of `self` overlaid
    /// with the item's entries. Keys in `item` win.
    pub fn merged(&self, item: &Context) -> Context {
        let mut merged = self.clone();
        for (key, value) in &item.entries {
            merged.entries.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Build a context from a JSON object.
    ///
    /// Returns `None` if `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> Option<Self> {
        match Value::from(json) {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolve a dotted path against a context.
///
/// Walks the path one segment at a time through nested maps. A missing key,
/// or any segment reached through a value that is not a map, resolves to an
/// empty string. The final value is rendered with [`Value::render`].
pub fn resolve(path: &str, context: &Context) -> String {
    let segments: SmallVec<[&str; 4]> = path.split('.').collect();
    let Some((first, rest)) = segments.split_first() else {
        return String::new();
    };

    let mut current = match context.get(first) {
        Some(value) => value,
        None => return String::new(),
    };

    for segment in rest {
        current = match current.as_map().and_then(|map| map.get(segment)) {
            Some(value) => value,
            None => return String::new(),
        };
    }

    current.render().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample() -> Context {
        Context::from_json(json!({
            "invoice_no": "1001",
            "qty": 2,
            "amount": 100.0,
            "ratio": 0.5,
            "paid": false,
            "note": null,
            "items": [{"description": "Widget"}],
            "customer": {"name": "Ada", "address": {"city": "London"}}
        }))
        .unwrap()
    }

    #[test]
    fn test_scalar_rendering() {
        let ctx = sample();
        assert_eq!(resolve("invoice_no", &ctx), "1001");
        assert_eq!(resolve("qty", &ctx), "2");
        assert_eq!(resolve("amount", &ctx), "100.0");
        assert_eq!(resolve("ratio", &ctx), "0.5");
        assert_eq!(resolve("paid", &ctx), "false");
    }

    #[test]
    fn test_null_and_containers_render_empty() {
        let ctx = sample();
        assert_eq!(resolve("note", &ctx), "");
        assert_eq!(resolve("items", &ctx), "");
        assert_eq!(resolve("customer", &ctx), "");
    }

    #[test]
    fn test_nested_paths() {
        let ctx = sample();
        assert_eq!(resolve("customer.name", &ctx), "Ada");
        assert_eq!(resolve("customer.address.city", &ctx), "London");
        assert_eq!(resolve("customer.address.zip", &ctx), "");
    }

    #[test]
    fn test_path_through_non_map_is_empty() {
        let ctx = sample();
        assert_eq!(resolve("invoice_no.length", &ctx), "");
        assert_eq!(resolve("items.0.description", &ctx), "");
        assert_eq!(resolve("customer.name.first", &ctx), "");
    }

    #[test]
    fn test_degenerate_paths() {
        let ctx = sample();
        assert_eq!(resolve("", &ctx), "");
        assert_eq!(resolve("customer.", &ctx), "");
        assert_eq!(resolve(".name", &ctx), "");
    }

    #[test]
    fn test_merged_item_keys_win() {
        let outer: Context = [("currency", "EUR"), ("description", "outer")]
            .into_iter()
            .collect();
        let item: Context = [("description", "Widget")].into_iter().collect();

        let merged = outer.merged(&item);
        assert_eq!(resolve("description", &merged), "Widget");
        assert_eq!(resolve("currency", &merged), "EUR");
        assert_eq!(resolve("description", &outer), "outer");
    }

    #[test]
    fn test_deserialize_from_json_text() {
        let ctx: Context = serde_json::from_str(r#"{"a": {"b": [1, "x", true]}}"#).unwrap();
        let list = ctx.get("a").and_then(Value::as_map).and_then(|m| m.get("b"));
        assert_eq!(list.and_then(Value::as_list).map(<[Value]>::len), Some(3));
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(Value::from(f64::NAN), Value::Null);
        assert_eq!(Value::from(2.5).to_string(), "2.5");
    }

    proptest! {
        #[test]
        fn resolving_absent_keys_is_empty(path in "[a-z_]{1,8}(\\.[a-z_]{1,8}){0,3}") {
            prop_assert_eq!(resolve(&path, &Context::new()), "");
        }

        #[test]
        fn resolving_top_level_text_is_verbatim(key in "[a-z_]{1,8}", value in "\\PC{0,20}") {
            let mut ctx = Context::new();
            ctx.insert(key.clone(), value.clone());
            prop_assert_eq!(resolve(&key, &ctx), value);
        }
    }
}
