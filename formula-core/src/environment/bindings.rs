use std::collections::HashMap;

/// Identifier values for one evaluation: name without braces -> decimal text.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    store: HashMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.store.get(name).map(String::as_str)
    }

    /// Binds `name`, returning the value it replaced.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.store.insert(name.into(), value.into())
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.store.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Bindings sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut pairs = self.store.iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect::<Vec<(&str, &str)>>();

        pairs.sort_by_key(|(name, _)| *name);
        pairs.into_iter()
    }
}

impl From<HashMap<String, String>> for Bindings {
    fn from(store: HashMap<String, String>) -> Self {
        Self { store }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            store: iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
