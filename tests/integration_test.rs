use asyncapi_docgen::cli::{assemble_document, GenerationInput};
use asyncapi_docgen::document::AsyncApiDocument;
use asyncapi_docgen::serializer::{serialize_json, serialize_yaml};

fn chat_input() -> GenerationInput {
    serde_yaml::from_str(include_str!("fixtures/chat_descriptors.yaml"))
        .expect("chat fixture should parse")
}

fn iot_input() -> GenerationInput {
    serde_json::from_str(include_str!("fixtures/iot_descriptors.json"))
        .expect("iot fixture should parse")
}

#[test]
fn test_chat_end_to_end_generation() {
    let input = chat_input();
    let document = assemble_document(&input).expect("assembly should succeed");

    // Document metadata from the descriptor file
    assert_eq!(document.asyncapi, "3.0.0");
    assert_eq!(document.info.title, "Chat Gateway");
    assert_eq!(document.info.version, "1.4.0");
    assert_eq!(
        document.default_content_type.as_deref(),
        Some("application/json")
    );
    assert_eq!(document.tags.len(), 1);

    // The 2.x server was converted to host/pathname form, with its security
    // entry rewritten to a components reference
    let server = &document.servers["production"];
    assert_eq!(server.host, "chat.example.com:443");
    assert_eq!(server.pathname.as_deref(), Some("/socket"));
    assert_eq!(server.protocol, "ws");
    assert_eq!(
        server.security[0].target,
        "#/components/securitySchemes/bearer"
    );
    assert!(document.components.security_schemes.contains_key("bearer"));

    // Three descriptors over two distinct addresses produce two channels
    assert_eq!(document.channels.len(), 2);
    let room_channel = &document.channels["_rooms__roomId_"];
    assert_eq!(room_channel.address, "/rooms/{roomId}");
    assert_eq!(
        room_channel.description.as_deref(),
        Some("Per-room event stream")
    );
    assert!(room_channel.parameters.contains_key("roomId"));

    // RoomJoined, RoomLeft and ChatMessage, deduplicated across descriptors
    assert_eq!(room_channel.messages.len(), 3);
    for name in ["RoomJoined", "RoomLeft", "ChatMessage"] {
        assert!(room_channel.messages.contains_key(name), "missing {}", name);
    }

    // Explicit operation id is used verbatim; the id-less second receive is
    // disambiguated with its index
    let operation_ids: Vec<_> = document.operations.keys().cloned().collect();
    assert_eq!(
        operation_ids,
        vec![
            "_rooms__roomId__send",
            "onRoomMessage",
            "_rooms__roomId__receive_1",
            "_lobby_send",
        ]
    );

    // The one-of publish references both members, in declared order
    let send = &document.operations["_rooms__roomId__send"];
    let targets: Vec<_> = send.messages.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(
        targets,
        vec![
            "#/channels/_rooms__roomId_/messages/RoomJoined",
            "#/channels/_rooms__roomId_/messages/RoomLeft",
        ]
    );
}

#[test]
fn test_iot_end_to_end_generation() {
    let input = iot_input();
    let document = assemble_document(&input).expect("assembly should succeed");

    // A 3.0-shaped server passes through unchanged
    let server = &document.servers["broker"];
    assert_eq!(server.host, "broker.example.com:9092");
    assert_eq!(server.pathname, None);
    assert_eq!(server.protocol, "kafka");

    // Two id-less sends on one channel get 0-based indexed ids
    let operation_ids: Vec<_> = document.operations.keys().cloned().collect();
    assert_eq!(
        operation_ids,
        vec![
            "device_telemetry_send_0",
            "device_telemetry_send_1",
            "device_commands_receive",
        ]
    );

    // Channel bindings were seeded from the first descriptor
    let telemetry = &document.channels["device_telemetry"];
    assert_eq!(telemetry.address, "device.telemetry");
    assert!(telemetry.bindings.contains_key("kafka"));
    assert_eq!(telemetry.messages.len(), 2);
}

#[test]
fn test_every_reference_resolves() {
    for input in [chat_input(), iot_input()] {
        let document = assemble_document(&input).unwrap();

        for (operation_id, operation) in &document.operations {
            let channel_id = operation
                .channel
                .target
                .strip_prefix("#/channels/")
                .unwrap_or_else(|| panic!("bad channel ref in {}", operation_id));
            let channel = document
                .channels
                .get(channel_id)
                .unwrap_or_else(|| panic!("dangling channel ref in {}", operation_id));

            let prefix = format!("#/channels/{}/messages/", channel_id);
            for message_ref in &operation.messages {
                let name = message_ref
                    .target
                    .strip_prefix(&prefix)
                    .unwrap_or_else(|| panic!("bad message ref in {}", operation_id));
                assert!(
                    channel.messages.contains_key(name),
                    "dangling message ref {} in {}",
                    message_ref.target,
                    operation_id
                );
            }
        }
    }
}

#[test]
fn test_channel_messages_are_embedded_bodies() {
    let document = assemble_document(&chat_input()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&serialize_json(&document).unwrap()).unwrap();

    for (_, channel) in json["channels"].as_object().unwrap() {
        if let Some(messages) = channel.get("messages") {
            for (name, body) in messages.as_object().unwrap() {
                assert!(
                    body.get("$ref").is_none(),
                    "channel message '{}' must be an embedded body",
                    name
                );
                assert_eq!(body["name"], *name, "embedded name must match its key");
            }
        }
    }
}

#[test]
fn test_repeated_generation_is_byte_stable() {
    let input = chat_input();

    let first = serialize_yaml(&assemble_document(&input).unwrap()).unwrap();
    let second = serialize_yaml(&assemble_document(&input).unwrap()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_yaml_and_json_outputs_agree() {
    let document = assemble_document(&chat_input()).unwrap();

    let from_yaml: AsyncApiDocument =
        serde_yaml::from_str(&serialize_yaml(&document).unwrap()).unwrap();
    let from_json: AsyncApiDocument =
        serde_json::from_str(&serialize_json(&document).unwrap()).unwrap();

    assert_eq!(from_yaml, document);
    assert_eq!(from_json, document);
}

#[test]
fn test_output_orders_are_insertion_stable() {
    let document = assemble_document(&chat_input()).unwrap();
    let yaml = serialize_yaml(&document).unwrap();

    // Channels appear in first-seen address order
    let rooms_at = yaml.find("_rooms__roomId_:").unwrap();
    let lobby_at = yaml.find("_lobby:").unwrap();
    assert!(rooms_at < lobby_at);

    // Sends precede receives within a channel
    let send_at = yaml.find("_rooms__roomId__send:").unwrap();
    let receive_at = yaml.find("onRoomMessage:").unwrap();
    assert!(send_at < receive_at);
}
