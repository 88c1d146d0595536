use crate::schemastreams::kafka::headers::Headers;

/// Where a consumed record came from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordMetadata {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Milliseconds since the Unix epoch, when the broker reported one
    pub timestamp: Option<i64>,
}

/// A decoded record: key, value, headers and broker position
#[derive(Debug, Clone)]
pub struct Message<K, V> {
    pub key: Option<K>,
    pub value: V,
    pub headers: Headers,
    pub metadata: RecordMetadata,
}

impl<K, V> Message<K, V> {
    pub fn new(key: Option<K>, value: V, headers: Headers, metadata: RecordMetadata) -> Self {
        Self {
            key,
            value,
            headers,
            metadata,
        }
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn topic(&self) -> &str {
        &self.metadata.topic
    }

    pub fn partition(&self) -> i32 {
        self.metadata.partition
    }

    pub fn offset(&self) -> i64 {
        self.metadata.offset
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.metadata.timestamp
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn into_parts(self) -> (Option<K>, V, Headers) {
        (self.key, self.value, self.headers)
    }
}
