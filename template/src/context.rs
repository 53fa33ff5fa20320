use util::HashMap;

/// Variable values used to fill in template placeholders.
#[derive(Debug, Default, Clone)]
pub struct Context {
    vars: HashMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to the string form of `value`, replacing any earlier value.
    pub fn insert<K: Into<String>, V: ToString>(&mut self, name: K, value: V) -> &mut Self {
        self.vars.insert(name.into(), value.to_string());
        self
    }

    /// Builder-style `insert`.
    pub fn with<K: Into<String>, V: ToString>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}
