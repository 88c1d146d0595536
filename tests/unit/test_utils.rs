// tests/unit/test_utils.rs
use async_trait::async_trait;
use mockito::ServerGuard;
use schemastreams::schemastreams::kafka::RecordMetadata;
use schemastreams::{
    ConsumerError, DeliveryReport, Headers, Message, MessageSink, MessageSource, ProducerError,
    Serializer, StringSerializer, ValueDeserializer, ValueSerializer,
};
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::net::TcpStream;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Helper functions
pub(crate) fn is_kafka_running() -> bool {
    match TcpStream::connect("localhost:9092") {
        Ok(_) => true,
        Err(_) => {
            println!("WARNING: Kafka is not running at localhost:9092");
            println!("Tests requiring Kafka will be skipped.");
            false
        }
    }
}

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn is_registry_running() -> bool {
    match TcpStream::connect("localhost:8080") {
        Ok(_) => true,
        Err(_) => {
            println!("WARNING: Schema registry is not running at localhost:8080");
            println!("Tests requiring the registry will be skipped.");
            false
        }
    }
}

/// Logger plus a check that both Kafka and the registry are reachable
pub(crate) fn init() -> bool {
    init_logger();
    is_kafka_running() && is_registry_running()
}

// Topic and group ID generators
pub(crate) fn generate_topic(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

pub(crate) fn generate_group_id(prefix: &str) -> String {
    format!("{}-group-{}", prefix, Uuid::new_v4())
}

// Registry mock helpers
pub(crate) fn registry_url(server: &ServerGuard) -> String {
    format!("{}/api", server.url())
}

/// Artifact metadata body as the registry returns it
pub(crate) fn meta_body(id: &str, artifact_type: &str, version: i32, global_id: i64) -> String {
    serde_json::json!({
        "id": id,
        "type": artifact_type,
        "version": version,
        "globalId": global_id,
        "state": "ENABLED",
        "createdOn": 1_600_000_000_000_i64,
        "modifiedOn": 1_600_000_000_000_i64
    })
    .to_string()
}

pub(crate) fn error_body(error_code: i64, message: &str) -> String {
    serde_json::json!({ "error_code": error_code, "message": message }).to_string()
}

/// Settings that never wait: no pacing, short polls
pub(crate) fn fast_settings(topic: &str, registry_url: &str) -> schemastreams::ExampleConfig {
    schemastreams::ExampleConfig::new(topic)
        .with_registry_url(registry_url)
        .with_send_pacing(Duration::ZERO)
        .with_poll_timeout(Duration::from_millis(10))
        .with_max_empty_polls(3)
}

/// Raw record as stored by the in-memory topic
#[derive(Debug, Clone)]
pub(crate) struct StoredRecord {
    pub topic: String,
    pub key: Option<Vec<u8>>,
    pub payload: Vec<u8>,
    pub headers: Headers,
}

/// Single-partition, append-only log shared by an in-memory producer and consumer
#[derive(Debug, Default)]
pub(crate) struct MemoryTopic {
    records: Mutex<Vec<StoredRecord>>,
}

impl MemoryTopic {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<StoredRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn append(&self, record: StoredRecord) -> i64 {
        let mut records = self.records.lock().unwrap();
        records.push(record);
        (records.len() - 1) as i64
    }

    fn read_from(&self, offset: usize, max: usize) -> Vec<StoredRecord> {
        let records = self.records.lock().unwrap();
        records.iter().skip(offset).take(max).cloned().collect()
    }
}

/// Producer writing through a real value codec into a [`MemoryTopic`]
pub(crate) struct MemoryProducer<V, VS> {
    topic: Arc<MemoryTopic>,
    value_serializer: VS,
    flushes: AtomicUsize,
    _phantom: PhantomData<fn(&V)>,
}

impl<V, VS> MemoryProducer<V, VS>
where
    V: Sync,
    VS: ValueSerializer<V>,
{
    pub fn new(topic: Arc<MemoryTopic>, value_serializer: VS) -> Self {
        Self {
            topic,
            value_serializer,
            flushes: AtomicUsize::new(0),
            _phantom: PhantomData,
        }
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<V, VS> MessageSink<String, V> for MemoryProducer<V, VS>
where
    V: Sync,
    VS: ValueSerializer<V>,
{
    async fn send(
        &self,
        topic: &str,
        key: Option<&String>,
        value: &V,
    ) -> Result<DeliveryReport, ProducerError> {
        let encoded = self.value_serializer.serialize(topic, value).await?;
        let key = key.map(|k| StringSerializer.serialize(k)).transpose()?;

        let offset = self.topic.append(StoredRecord {
            topic: topic.to_string(),
            key,
            payload: encoded.payload,
            headers: encoded.headers,
        });

        Ok(DeliveryReport {
            topic: topic.to_string(),
            partition: 0,
            offset,
        })
    }

    async fn flush(&self, _timeout: Duration) -> Result<(), ProducerError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Consumer reading a [`MemoryTopic`] through a real value codec
pub(crate) struct MemoryConsumer<V, VD> {
    topic: Arc<MemoryTopic>,
    value_deserializer: VD,
    position: Mutex<usize>,
    max_batch: usize,
    leading_empty_polls: AtomicU32,
    polls: AtomicU32,
    _phantom: PhantomData<fn() -> V>,
}

impl<V, VD> MemoryConsumer<V, VD>
where
    VD: ValueDeserializer<V>,
{
    pub fn new(topic: Arc<MemoryTopic>, value_deserializer: VD) -> Self {
        Self {
            topic,
            value_deserializer,
            position: Mutex::new(0),
            max_batch: 500,
            leading_empty_polls: AtomicU32::new(0),
            polls: AtomicU32::new(0),
            _phantom: PhantomData,
        }
    }

    /// Deliver at most `max_batch` records per poll
    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }

    /// Pretend nothing has arrived for the first `polls` polls
    pub fn with_leading_empty_polls(self, polls: u32) -> Self {
        self.leading_empty_polls.store(polls, Ordering::SeqCst);
        self
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<V, VD> MessageSource<String, V> for MemoryConsumer<V, VD>
where
    V: Send,
    VD: ValueDeserializer<V>,
{
    async fn poll_batch(&self, _timeout: Duration) -> Result<Vec<Message<String, V>>, ConsumerError> {
        self.polls.fetch_add(1, Ordering::SeqCst);

        let pending_empty = self.leading_empty_polls.load(Ordering::SeqCst);
        if pending_empty > 0 {
            self.leading_empty_polls
                .store(pending_empty - 1, Ordering::SeqCst);
            return Ok(Vec::new());
        }

        let start = *self.position.lock().unwrap();
        let raw = self.topic.read_from(start, self.max_batch);
        *self.position.lock().unwrap() = start + raw.len();

        let mut batch = Vec::with_capacity(raw.len());
        for (i, record) in raw.into_iter().enumerate() {
            let value = self
                .value_deserializer
                .deserialize(&record.topic, &record.headers, &record.payload)
                .await?;
            let key = record
                .key
                .as_deref()
                .map(|k| StringSerializer.deserialize(k))
                .transpose()?;
            let metadata = RecordMetadata {
                topic: record.topic.clone(),
                partition: 0,
                offset: (start + i) as i64,
                timestamp: None,
            };
            batch.push(Message::new(key, value, record.headers, metadata));
        }
        Ok(batch)
    }
}

/// Source replaying a fixed script of batches, then staying empty
pub(crate) struct ScriptedSource {
    batches: Mutex<VecDeque<Vec<&'static str>>>,
    polls: AtomicU32,
}

impl ScriptedSource {
    pub fn new(batches: Vec<Vec<&'static str>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            polls: AtomicU32::new(0),
        }
    }

    pub fn poll_count(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSource<String, String> for ScriptedSource {
    async fn poll_batch(
        &self,
        _timeout: Duration,
    ) -> Result<Vec<Message<String, String>>, ConsumerError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let batch = self.batches.lock().unwrap().pop_front().unwrap_or_default();
        Ok(batch
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                Message::new(
                    None,
                    value.to_string(),
                    Headers::new(),
                    RecordMetadata {
                        topic: "scripted".to_string(),
                        partition: 0,
                        offset: i as i64,
                        timestamp: None,
                    },
                )
            })
            .collect())
    }
}
