//! Query parameters for CAIC requests.
//!
//! Values may be plain strings, booleans or lists. Lists are sent as
//! repeated keys (`r[backcountry_zone_title_in][]=Aspen&r[...][]=Gunnison`),
//! which is how the API's Rails-style `[]` keys expect them.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

impl QueryValue {
    /// Empty strings and empty lists are dropped from the request.
    fn is_empty(&self) -> bool {
        match self {
            QueryValue::Text(s) => s.is_empty(),
            QueryValue::Flag(_) => false,
            QueryValue::List(v) => v.is_empty(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Flag(b)
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        QueryValue::Text(n.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(v: Vec<String>) -> Self {
        QueryValue::List(v)
    }
}

/// Ordered query parameters. Setting an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, QueryValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<QueryValue>) {
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key.to_string(), value));
        }
    }

    /// Sets `key` only when `value` is present.
    pub fn set_opt<V: Into<QueryValue>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.set(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens into `(key, value)` pairs ready for URL encoding.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.entries.len());
        for (k, v) in &self.entries {
            if v.is_empty() {
                continue;
            }
            match v {
                QueryValue::Text(s) => out.push((k.clone(), s.clone())),
                QueryValue::Flag(b) => out.push((k.clone(), b.to_string())),
                QueryValue::List(items) => {
                    for item in items {
                        out.push((k.clone(), item.clone()));
                    }
                }
            }
        }
        out
    }
}
