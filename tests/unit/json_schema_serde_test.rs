use crate::unit::common::*;
use schemastreams::schemastreams::driver::simple_json::MessageBean;
use schemastreams::schemastreams::serdes::IdHandler;

const TOPIC: &str = "SimpleJsonSchemaExample";

async fn registry_with_latest(server: &mut ServerGuard, global_id: i64) -> mockito::Mock {
    server
        .mock("GET", format!("/api/artifacts/{}/meta", TOPIC).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(meta_body(TOPIC, "JSON", 1, global_id))
        .create_async()
        .await
}

fn producer_config(server: &ServerGuard) -> SerdeConfig {
    SerdeConfig::new(registry_url(server))
        .artifact_id_strategy(ArtifactIdStrategy::SimpleTopic)
        .global_id_strategy(GlobalIdStrategy::FindLatest)
        .validation(true)
}

#[tokio::test]
async fn test_envelope_carries_latest_global_id() {
    let mut server = Server::new_async().await;
    let _latest = registry_with_latest(&mut server, 258).await;
    let content = server
        .mock("GET", "/api/ids/258")
        .with_status(200)
        .with_body(simple_json::MESSAGE_SCHEMA)
        .expect(1)
        .create_async()
        .await;

    let serializer = JsonSchemaSerializer::new(producer_config(&server)).unwrap();
    let bean = MessageBean::new("Hello (0)!", 1_700_000_000_000);

    let encoded = serializer.serialize(TOPIC, &bean).await.unwrap();
    assert_eq!(encoded.payload[0], MAGIC_BYTE);
    assert_eq!(&encoded.payload[1..9], &258i64.to_be_bytes());
    let body: serde_json::Value = serde_json::from_slice(&encoded.payload[9..]).unwrap();
    assert_eq!(body, json!({"message": "Hello (0)!", "time": 1_700_000_000_000_i64}));
    assert!(encoded.headers.is_empty());

    // Second record reuses the compiled schema
    serializer.serialize(TOPIC, &bean).await.unwrap();
    content.assert_async().await;
}

#[tokio::test]
async fn test_validation_rejects_nonconforming_value() {
    let mut server = Server::new_async().await;
    let _latest = registry_with_latest(&mut server, 1).await;
    let _mock = server
        .mock("GET", "/api/ids/1")
        .with_status(200)
        .with_body(simple_json::MESSAGE_SCHEMA)
        .create_async()
        .await;

    let serializer = JsonSchemaSerializer::new(producer_config(&server)).unwrap();
    let missing_time = json!({ "message": "Hello" });

    let err = serializer.serialize(TOPIC, &missing_time).await.unwrap_err();
    assert!(matches!(err, SerializationError::Validation(_)), "{:?}", err);
}

#[tokio::test]
async fn test_find_latest_validates_against_registered_version() {
    let mut server = Server::new_async().await;
    let _latest = registry_with_latest(&mut server, 7).await;
    let mut latest_schema: serde_json::Value =
        serde_json::from_str(simple_json::MESSAGE_SCHEMA).unwrap();
    latest_schema["required"]
        .as_array_mut()
        .unwrap()
        .push(json!("extra"));
    let content = server
        .mock("GET", "/api/ids/7")
        .with_status(200)
        .with_body(latest_schema.to_string())
        .expect(1)
        .create_async()
        .await;

    // The local copy is older than what find-latest resolves to
    let serializer = JsonSchemaSerializer::new(producer_config(&server))
        .unwrap()
        .with_schema(simple_json::MESSAGE_SCHEMA)
        .unwrap();

    let err = serializer
        .serialize(TOPIC, &MessageBean::new("Hello (0)!", 1))
        .await
        .unwrap_err();
    match err {
        SerializationError::Validation(msg) => assert!(msg.contains("extra"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }
    content.assert_async().await;
}

#[tokio::test]
async fn test_missing_artifact_fails_serialization() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", format!("/api/artifacts/{}/meta", TOPIC).as_str())
        .with_status(404)
        .with_body(error_body(404, "not found"))
        .create_async()
        .await;

    let serializer = JsonSchemaSerializer::new(producer_config(&server)).unwrap();
    let err = serializer
        .serialize(TOPIC, &MessageBean::new("Hello", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, SerializationError::Registry(_)), "{:?}", err);
}

#[tokio::test]
async fn test_header_mode_and_deserialize() {
    let mut server = Server::new_async().await;
    let _latest = registry_with_latest(&mut server, 77).await;
    let _mock = server
        .mock("GET", "/api/ids/77")
        .with_status(200)
        .with_body(simple_json::MESSAGE_SCHEMA)
        .create_async()
        .await;

    let serializer =
        JsonSchemaSerializer::new(producer_config(&server).use_headers(true)).unwrap();
    let deserializer =
        JsonSchemaDeserializer::new(SerdeConfig::new(registry_url(&server)).validation(true))
            .unwrap();

    let bean = MessageBean::new("Hello (3)!", 42);
    let encoded = serializer.serialize(TOPIC, &bean).await.unwrap();
    assert_eq!(encoded.headers.get(VALUE_GLOBAL_ID_HEADER), Some("77"));
    assert_eq!(encoded.payload[0], b'{');

    let decoded: MessageBean = deserializer
        .deserialize(TOPIC, &encoded.headers, &encoded.payload)
        .await
        .unwrap();
    assert_eq!(decoded, bean);
    assert_eq!(deserializer.cached_schemas().await, 1);
}

#[tokio::test]
async fn test_legacy_id_handler_uses_four_bytes() {
    let mut server = Server::new_async().await;
    let _latest = registry_with_latest(&mut server, 5).await;

    let config = producer_config(&server)
        .validation(false)
        .id_handler(IdHandler::Legacy);
    let serializer = JsonSchemaSerializer::new(config).unwrap();
    let encoded = serializer
        .serialize(TOPIC, &MessageBean::new("Hello", 1))
        .await
        .unwrap();

    assert_eq!(&encoded.payload[..5], &[0, 0, 0, 0, 5]);
    assert_eq!(encoded.payload[5], b'{');
}

#[tokio::test]
async fn test_deserialize_without_validation_skips_registry() {
    // No mocks: any registry call would fail the decode
    let server = Server::new_async().await;
    let deserializer = JsonSchemaDeserializer::new(SerdeConfig::new(registry_url(&server))).unwrap();

    let payload = wire::encode(
        IdHandler::Default,
        9,
        br#"{"message":"Hello (1)!","time":5}"#,
    )
    .unwrap();
    let decoded: MessageBean = deserializer
        .deserialize(TOPIC, &Headers::new(), &payload)
        .await
        .unwrap();

    assert_eq!(decoded, MessageBean::new("Hello (1)!", 5));
    assert_eq!(deserializer.cached_schemas().await, 0);
}

#[tokio::test]
async fn test_deserialize_rejects_bad_envelope() {
    let server = Server::new_async().await;
    let deserializer = JsonSchemaDeserializer::new(SerdeConfig::new(registry_url(&server))).unwrap();

    let result: Result<MessageBean, _> = deserializer
        .deserialize(TOPIC, &Headers::new(), br#"{"message":"no envelope"}"#)
        .await;
    assert!(matches!(result, Err(SerializationError::InvalidEnvelope(_))));
}

#[tokio::test]
async fn test_key_codec_uses_key_artifact_and_header() {
    let mut server = Server::new_async().await;
    let latest = server
        .mock("GET", format!("/api/artifacts/{}-key/meta", TOPIC).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(meta_body(&format!("{}-key", TOPIC), "JSON", 1, 31))
        .expect(1)
        .create_async()
        .await;
    let _mock = server
        .mock("GET", "/api/ids/31")
        .with_status(200)
        .with_body(r#"{"type": "string"}"#)
        .create_async()
        .await;

    let key_config = SerdeConfig::new(registry_url(&server))
        .artifact_id_strategy(ArtifactIdStrategy::Topic)
        .global_id_strategy(GlobalIdStrategy::FindLatest)
        .validation(true)
        .use_headers(true)
        .for_key();
    let serializer = JsonSchemaSerializer::new(key_config.clone()).unwrap();
    let key_deserializer = JsonSchemaDeserializer::new(key_config).unwrap();
    let value_deserializer =
        JsonSchemaDeserializer::new(SerdeConfig::new(registry_url(&server))).unwrap();

    let encoded = serializer
        .serialize(TOPIC, &simple_json::SUBJECT_NAME.to_string())
        .await
        .unwrap();
    assert_eq!(encoded.headers.get(wire::KEY_GLOBAL_ID_HEADER), Some("31"));
    assert_eq!(encoded.headers.get(VALUE_GLOBAL_ID_HEADER), None);

    let key: String = key_deserializer
        .deserialize(TOPIC, &encoded.headers, &encoded.payload)
        .await
        .unwrap();
    assert_eq!(key, "Greeting");

    // A value codec ignores the key header and expects an embedded id
    let as_value: Result<String, _> = value_deserializer
        .deserialize(TOPIC, &encoded.headers, &encoded.payload)
        .await;
    assert!(matches!(as_value, Err(SerializationError::InvalidEnvelope(_))));
    latest.assert_async().await;
}
