use anyhow::Result;

/// A plain string key-value store. Values are serialized JSON documents.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}
