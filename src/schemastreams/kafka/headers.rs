use rdkafka::message::{Header, Headers as KafkaHeaders, OwnedHeaders};
use std::collections::HashMap;

/// Record headers as UTF-8 key/value pairs.
///
/// Codecs use them to carry the schema global id when header mode is on;
/// null-valued headers are kept so that they survive a round trip.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Headers {
    inner: HashMap<String, Option<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn insert(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn insert_null(mut self, key: impl Into<String>) -> Self {
        self.inner.insert(key.into(), None);
        self
    }

    /// In-place insert, replacing any previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(key.into(), Some(value.into()));
    }

    pub fn remove(&mut self, key: &str) -> Option<Option<String>> {
        self.inner.remove(key)
    }

    /// Copy every header of `other` over this one
    pub fn merge(&mut self, other: Headers) {
        self.inner.extend(other.inner);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).and_then(|v| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<String>)> {
        self.inner.iter()
    }

    pub(crate) fn to_rdkafka_headers(&self) -> OwnedHeaders {
        self.inner
            .iter()
            .fold(OwnedHeaders::new_with_capacity(self.inner.len()), |acc, (key, value)| {
                acc.insert(Header {
                    key,
                    value: value.as_deref(),
                })
            })
    }

    pub(crate) fn from_rdkafka_headers<H: KafkaHeaders>(kafka_headers: &H) -> Self {
        let inner = (0..kafka_headers.count())
            .map(|i| {
                let header = kafka_headers.get(i);
                let value = header
                    .value
                    .map(|v| String::from_utf8_lossy(v).into_owned());
                (header.key.to_string(), value)
            })
            .collect();

        Self { inner }
    }
}
