use std::collections::HashMap;

use common::{MyResult, MyResultTrait};
use serde::Deserialize;
use serde_json::Value;
use simple_error::simple_error;

pub const TOKEN_OPEN: &str = "{{";
pub const TOKEN_CLOSE: &str = "}}";

/// Turns a placeholder key into its token text.
///
/// Bare names (`nome_cliente`) become `{{nome_cliente}}`; keys that are
/// already a token are kept as written.
pub fn as_token<S: AsRef<str>>(key: S) -> MyResult<String> {
    let key = key.as_ref();
    if key.trim().is_empty() {
        return Err(simple_error!("Empty placeholder key").into());
    }
    let wrapped = key.starts_with(TOKEN_OPEN) && key.ends_with(TOKEN_CLOSE);
    if wrapped && key.len() > TOKEN_OPEN.len() + TOKEN_CLOSE.len() {
        Ok(key.to_string())
    } else if key.contains(TOKEN_OPEN) || key.contains(TOKEN_CLOSE) {
        Err(simple_error!("Malformed placeholder key {:?}", key).into())
    } else {
        Ok(format!("{TOKEN_OPEN}{key}{TOKEN_CLOSE}"))
    }
}

/// Inverse of [as_token]: `{{ name }}` -> `name`.
pub fn bare_name(token: &str) -> &str {
    token
        .strip_prefix(TOKEN_OPEN)
        .and_then(|t| t.strip_suffix(TOKEN_CLOSE))
        .unwrap_or(token)
        .trim()
}

/// A value that contains another placeholder's token text. When this
/// happens, the final document depends on substitution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// Token whose value carries the foreign token
    pub token: String,
    pub contains: String,
}

/// Ordered token -> replacement mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn try_from_pairs<I, K, V>(pairs: I) -> MyResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (k, v) in pairs {
            map.insert(k, v)?;
        }
        Ok(map)
    }

    /// Reads a JSON object. `null` maps to an empty string, numbers and
    /// booleans to their JSON text; nested values are rejected.
    pub fn from_json(value: &Value) -> MyResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| simple_error!("Placeholder data must be a JSON object, got {}", value))?;
        let mut map = Self::new();
        for (key, v) in obj {
            let text = json_scalar(v)
                .map_err(|e| simple_error!("Placeholder {:?}: {}", key, e))?;
            map.insert(key, text)?;
        }
        Ok(map)
    }

    /// Sets `key`'s value. An existing token keeps its position.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> MyResult<&mut Self>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let token = as_token(key)?;
        self.put_token(token, value.into());
        Ok(self)
    }

    pub(crate) fn put_token(&mut self, token: String, value: String) {
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((token, value)),
        }
    }

    /// Lookup by bare name or full token. Spaces inside the braces are
    /// ignored, the same as in [Self::names]: `{{ nome }}` is found by `nome`.
    pub fn get<K: AsRef<str>>(&self, key: K) -> Option<&str> {
        let token = as_token(key).ok()?;
        let name = bare_name(&token);
        self.entries
            .iter()
            .find(|(t, _)| *t == token)
            .or_else(|| self.entries.iter().find(|(t, _)| bare_name(t) == name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    /// Values keyed by bare name, for `{name}`-style formatting.
    pub fn names(&self) -> HashMap<String, String> {
        self.iter()
            .map(|(t, v)| (bare_name(t).to_string(), v.to_string()))
            .collect()
    }

    pub fn collisions(&self) -> Vec<Collision> {
        self.entries
            .iter()
            .flat_map(|(token, value)| {
                self.entries
                    .iter()
                    .filter(move |(other, _)| value.contains(other.as_str()))
                    .map(move |(other, _)| Collision {
                        token: token.clone(),
                        contains: other.clone(),
                    })
            })
            .collect()
    }
}

fn json_scalar(v: &Value) -> MyResult<String> {
    match v {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(simple_error!("expected a scalar value, got {}", other).into()),
    }
}

impl TryFrom<Value> for PlaceholderMap {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value).result_str()
    }
}
