use crate::unit::common::*;
use schemastreams::schemastreams::driver::simple_json::MessageBean;

type JsonProducer = MemoryProducer<MessageBean, JsonSchemaSerializer>;
type JsonConsumer = MemoryConsumer<MessageBean, JsonSchemaDeserializer>;

async fn mock_registry(server: &mut ServerGuard, topic: &str) -> Vec<mockito::Mock> {
    vec![
        server
            .mock("POST", "/api/artifacts")
            .match_query(Matcher::UrlEncoded(
                "ifExists".into(),
                "RETURN_OR_UPDATE".into(),
            ))
            .match_header("x-registry-artifactid", topic)
            .match_header("x-registry-artifacttype", "JSON")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(meta_body(topic, "JSON", 1, 1))
            .expect(1)
            .create_async()
            .await,
        server
            .mock("GET", format!("/api/artifacts/{}/meta", topic).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(meta_body(topic, "JSON", 1, 1))
            .expect(simple_json::MESSAGE_COUNT)
            .create_async()
            .await,
        // Fetched once by the producer's and once by the consumer's schema cache
        server
            .mock("GET", "/api/ids/1")
            .with_status(200)
            .with_body(simple_json::MESSAGE_SCHEMA)
            .expect(2)
            .create_async()
            .await,
    ]
}

fn clients(server: &ServerGuard, topic: &Arc<MemoryTopic>) -> (JsonProducer, JsonConsumer) {
    let producer_serde = SerdeConfig::new(registry_url(server))
        .artifact_id_strategy(ArtifactIdStrategy::SimpleTopic)
        .global_id_strategy(GlobalIdStrategy::FindLatest)
        .validation(true);
    let consumer_serde = SerdeConfig::new(registry_url(server)).validation(true);

    (
        MemoryProducer::new(
            Arc::clone(topic),
            JsonSchemaSerializer::new(producer_serde).unwrap(),
        ),
        MemoryConsumer::new(
            Arc::clone(topic),
            JsonSchemaDeserializer::new(consumer_serde).unwrap(),
        ),
    )
}

#[tokio::test]
async fn test_simple_json_example_round_trip() {
    init_logger();
    let mut server = Server::new_async().await;
    let topic_name = generate_topic("SimpleJsonSchemaExample");
    let mocks = mock_registry(&mut server, &topic_name).await;

    let topic = MemoryTopic::new();
    let (producer, consumer) = clients(&server, &topic);
    let settings = fast_settings(&topic_name, &registry_url(&server));
    let registrar = SchemaRegistrar::new(RegistryClient::new(&settings.registry_url).unwrap());

    let consumed = simple_json::run(&settings, &registrar, &producer, &consumer)
        .await
        .unwrap();

    let messages: Vec<&str> = consumed.iter().map(|b| b.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["Hello (0)!", "Hello (1)!", "Hello (2)!", "Hello (3)!", "Hello (4)!"]
    );
    assert!(consumed.iter().all(|b| b.time > 0));

    assert_eq!(producer.flush_count(), 1);
    for record in topic.records() {
        assert_eq!(record.key.as_deref(), Some(simple_json::SUBJECT_NAME.as_bytes()));
        assert_eq!(record.payload[0], MAGIC_BYTE);
        assert_eq!(&record.payload[1..9], &1i64.to_be_bytes());
    }

    for mock in mocks {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_empty_polls_before_delivery_do_not_count() {
    let mut server = Server::new_async().await;
    let topic_name = generate_topic("SimpleJsonSchemaExample");
    let _mocks = mock_registry(&mut server, &topic_name).await;

    let topic = MemoryTopic::new();
    let (producer, consumer) = clients(&server, &topic);
    let consumer = consumer.with_leading_empty_polls(2).with_max_batch(2);
    let settings = fast_settings(&topic_name, &registry_url(&server));
    let registrar = SchemaRegistrar::new(RegistryClient::new(&settings.registry_url).unwrap());

    let consumed = simple_json::run(&settings, &registrar, &producer, &consumer)
        .await
        .unwrap();

    assert_eq!(consumed.len(), 5);
    // 2 empty polls, then batches of 2, 2 and 1
    assert_eq!(consumer.poll_count(), 5);
}

#[tokio::test]
async fn test_registration_failure_stops_before_producing() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/artifacts")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body(error_body(500, "storage unavailable"))
        .create_async()
        .await;

    let topic = MemoryTopic::new();
    let (producer, consumer) = clients(&server, &topic);
    let settings = fast_settings("SimpleJsonSchemaExample", &registry_url(&server));
    let registrar = SchemaRegistrar::new(RegistryClient::new(&settings.registry_url).unwrap());

    let err = simple_json::run(&settings, &registrar, &producer, &consumer)
        .await
        .unwrap_err();

    assert!(matches!(err, SchemaStreamsError::Schema(_)), "{:?}", err);
    assert_eq!(topic.len(), 0);
    assert_eq!(consumer.poll_count(), 0);
}

#[tokio::test]
async fn test_lost_records_exhaust_the_consume_budget() {
    let mut server = Server::new_async().await;
    let topic_name = generate_topic("SimpleJsonSchemaExample");
    let _mocks = mock_registry(&mut server, &topic_name).await;

    // The consumer reads a different log, so nothing ever arrives
    let (producer, _) = clients(&server, &MemoryTopic::new());
    let (_, consumer) = clients(&server, &MemoryTopic::new());
    let settings = fast_settings(&topic_name, &registry_url(&server)).with_max_empty_polls(4);
    let registrar = SchemaRegistrar::new(RegistryClient::new(&settings.registry_url).unwrap());

    let err = simple_json::run(&settings, &registrar, &producer, &consumer)
        .await
        .unwrap_err();

    match err {
        SchemaStreamsError::ConsumeBudgetExhausted {
            expected,
            received,
            empty_polls,
        } => {
            assert_eq!(expected, 5);
            assert_eq!(received, 0);
            assert_eq!(empty_polls, 4);
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(producer.flush_count(), 1);
}
