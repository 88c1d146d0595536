use crate::unit::common::*;
use uuid::Uuid;

type AvroProducer = MemoryProducer<GenericRecord, AvroSerializer>;
type AvroConsumer = MemoryConsumer<GenericRecord, AvroDeserializer>;

// v1 schemas are the only contents without a capital E
fn v1_body() -> Matcher {
    Matcher::Regex("^[^E]*$".to_string())
}

fn v2_body() -> Matcher {
    Matcher::Regex("Extra".to_string())
}

/// Greeting versions already exist (ids 1, 2); Farewell versions are
/// registered on first use (ids 3, 4).
async fn mock_registry(server: &mut ServerGuard) -> Vec<mockito::Mock> {
    let mut mocks = Vec::new();

    for (body, global_id) in [(v1_body(), 1), (v2_body(), 2)] {
        mocks.push(
            server
                .mock("POST", "/api/artifacts/Greeting/meta")
                .match_query(Matcher::Any)
                .match_body(body)
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(meta_body("Greeting", "AVRO", global_id as i32, global_id))
                .expect(1)
                .create_async()
                .await,
        );
    }

    mocks.push(
        server
            .mock("POST", "/api/artifacts/Farewell/meta")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(error_body(404, "No version matches the content"))
            .expect(2)
            .create_async()
            .await,
    );
    for (body, global_id) in [(v1_body(), 3), (v2_body(), 4)] {
        mocks.push(
            server
                .mock("POST", "/api/artifacts")
                .match_query(Matcher::UrlEncoded(
                    "ifExists".into(),
                    "RETURN_OR_UPDATE".into(),
                ))
                .match_header("x-registry-artifactid", "Farewell")
                .match_header("x-registry-artifacttype", "AVRO")
                .match_body(body)
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(meta_body("Farewell", "AVRO", global_id as i32 - 2, global_id))
                .expect(1)
                .create_async()
                .await,
        );
    }

    for (schema, global_id) in [
        (mix_avro::GREETING_SCHEMA_V1, 1),
        (mix_avro::GREETING_SCHEMA_V2, 2),
        (mix_avro::FAREWELL_SCHEMA_V1, 3),
        (mix_avro::FAREWELL_SCHEMA_V2, 4),
    ] {
        mocks.push(
            server
                .mock("GET", format!("/api/ids/{}", global_id).as_str())
                .with_status(200)
                .with_body(schema)
                .expect(1)
                .create_async()
                .await,
        );
    }

    mocks
}

fn clients(server: &ServerGuard, topic: &Arc<MemoryTopic>) -> (AvroProducer, AvroConsumer) {
    let producer_serde = SerdeConfig::new(registry_url(server))
        .artifact_id_strategy(ArtifactIdStrategy::Record)
        .global_id_strategy(GlobalIdStrategy::CachedSchema);

    (
        MemoryProducer::new(
            Arc::clone(topic),
            AvroSerializer::new(producer_serde).unwrap(),
        ),
        MemoryConsumer::new(
            Arc::clone(topic),
            AvroDeserializer::new(SerdeConfig::new(registry_url(server))).unwrap(),
        ),
    )
}

#[tokio::test]
async fn test_mix_avro_example_round_trip() {
    init_logger();
    let mut server = Server::new_async().await;
    let mocks = mock_registry(&mut server).await;

    let topic = MemoryTopic::new();
    let (producer, consumer) = clients(&server, &topic);
    let consumer = consumer.with_max_batch(7);
    let settings = fast_settings(&generate_topic("MixAvroExample"), &registry_url(&server));

    let consumed = mix_avro::run(&settings, &producer, &consumer).await.unwrap();
    assert_eq!(consumed.len(), mix_avro::expected_count());

    let expected = [
        ("Greeting", None),
        ("Greeting", Some("extra greeting")),
        ("Farewell", None),
        ("Farewell", Some("extra farewell")),
    ];
    for (chunk, (name, extra)) in consumed
        .chunks(mix_avro::MESSAGES_PER_VARIANT)
        .zip(expected)
    {
        for (i, record) in chunk.iter().enumerate() {
            assert_eq!(record.full_name(), name);
            assert_eq!(record.get_str("Message"), Some(format!("Hello ({})!", i).as_str()));
            assert_eq!(record.has_field("Extra"), extra.is_some());
            assert_eq!(record.get_str("Extra"), extra);
        }
    }

    let global_ids: Vec<i64> = topic
        .records()
        .iter()
        .map(|r| i64::from_be_bytes(r.payload[1..9].try_into().unwrap()))
        .collect();
    assert_eq!(
        global_ids,
        [1, 2, 3, 4]
            .iter()
            .flat_map(|id| std::iter::repeat(*id).take(mix_avro::MESSAGES_PER_VARIANT))
            .collect::<Vec<i64>>()
    );

    for record in topic.records() {
        let key = String::from_utf8(record.key.unwrap()).unwrap();
        assert!(Uuid::parse_str(&key).is_ok(), "key {} is not a UUID", key);
    }
    assert_eq!(producer.flush_count(), 1);

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_registry_outage_still_flushes_the_producer() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/artifacts/Greeting/meta")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body(error_body(503, "unavailable"))
        .create_async()
        .await;

    let topic = MemoryTopic::new();
    let (producer, consumer) = clients(&server, &topic);
    let settings = fast_settings("MixAvroExample", &registry_url(&server));

    let err = mix_avro::run(&settings, &producer, &consumer)
        .await
        .unwrap_err();

    assert!(
        matches!(err, SchemaStreamsError::Serialization(SerializationError::Registry(_))),
        "{:?}",
        err
    );
    assert_eq!(producer.flush_count(), 1);
    assert_eq!(topic.len(), 0);
    assert_eq!(consumer.poll_count(), 0);
}
