//! Response envelope
//!
//! API responses wrap their payload in a single key named after the resource
//! (`{"volume": {...}}`, `{"drives": [...]}`). The key depends on the child
//! kind, so it is carried at runtime instead of being fixed by a struct.

use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub key: &'static str,
    pub value: T,
}

impl<T> Envelope<T> {
    pub fn new(key: &'static str, value: T) -> Self {
        Self { key, value }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.key, &self.value)?;
        map.end()
    }
}
