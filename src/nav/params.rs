use serde_json::{Map, Value};
use std::sync::Arc;

/// Immutable key/value inputs for a screen.
///
/// The navigation core never inspects these; it only carries them from
/// `navigate_to` to the mounted screen. Cloning is cheap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Arc<Map<String, Value>>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    /// Look up a nested value by a `/`-separated path, e.g. `filter/grade`
    pub fn pointer(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('/');
        let first = self.get(parts.next()?)?;
        parts.try_fold(first, |value, part| value.get(part))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Shallow merge where keys in `self` win over keys in `base`
    pub fn merged_over(&self, base: &Params) -> Params {
        if base.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return base.clone();
        }
        let mut merged = (*base.0).clone();
        for (key, value) in self.0.iter() {
            merged.insert(key.clone(), value.clone());
        }
        Params(Arc::new(merged))
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params(Arc::new(map))
    }
}

/// Objects become params directly, `null` becomes empty params. Any other
/// JSON value is not a valid parameter set and is dropped with a warning.
impl From<Value> for Params {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into(),
            Value::Null => Params::default(),
            other => {
                log::warn!("Ignoring non-object screen params: {}", other);
                Params::default()
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let map: Map<String, Value> = iter.into_iter().map(|(k, v)| (k.into(), v)).collect();
        map.into()
    }
}
