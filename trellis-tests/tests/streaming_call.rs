//! End-to-end call scenarios against the scripted transport, with the
//! descriptor tables a schema compiler would normally generate.

use anyhow::Result;
use bytes::Bytes;
use futures_util::{pin_mut, StreamExt};
use trellis::{
    client::Client,
    mock::{MockTransport, ResponseBuilder},
    wire::{self, Cardinality, FieldDescriptor, FieldKind},
    CallError, DynamicMessage, Metadata, MessageDescriptor, MethodDescriptor, TransportError,
    Value, WireMode,
};

static CHUNK: MessageDescriptor = MessageDescriptor {
    name: "ReadFileChunk",
    fields: &[
        FieldDescriptor {
            number: 1,
            name: "path",
            kind: FieldKind::String,
            cardinality: Cardinality::Singular,
            oneof: None,
        },
        FieldDescriptor {
            number: 2,
            name: "offset",
            kind: FieldKind::Int64,
            cardinality: Cardinality::Singular,
            oneof: None,
        },
        FieldDescriptor {
            number: 3,
            name: "data",
            kind: FieldKind::Bytes,
            cardinality: Cardinality::Singular,
            oneof: None,
        },
    ],
    oneofs: &[],
};

static READ_FILE: MethodDescriptor = MethodDescriptor {
    service: "file.FileService",
    name: "ReadFile",
    request: &CHUNK,
    response: &CHUNK,
    server_streaming: true,
};

static STAT_FILE: MethodDescriptor = MethodDescriptor {
    service: "file.FileService",
    name: "StatFile",
    request: &CHUNK,
    response: &CHUNK,
    server_streaming: false,
};

fn chunk(offset: i64, data: &'static [u8]) -> DynamicMessage {
    let mut message = DynamicMessage::new(&CHUNK);
    if offset != 0 {
        message.set(2, Value::Int64(offset)).unwrap();
    }
    if !data.is_empty() {
        message.set(3, Value::Bytes(Bytes::from_static(data))).unwrap();
    }
    message
}

fn encoded(message: &DynamicMessage) -> Bytes {
    wire::encode(message).unwrap()
}

#[tokio::test]
async fn streams_three_messages_then_completes() -> Result<()> {
    let a = chunk(0, b"alpha");
    let b = chunk(5, b"beta");
    let c = chunk(9, b"gamma");

    let transport = MockTransport::new();
    transport.respond_with(
        ResponseBuilder::ok()
            .data(&encoded(&a))
            .data(&encoded(&b))
            .data(&encoded(&c))
            .trailer_ok(),
    );
    let client = Client::new(transport, "http://files.internal:8080");

    let mut request = DynamicMessage::new(&CHUNK);
    request.set(1, Value::String("/etc/motd".into()))?;
    let call = client
        .server_streaming(&READ_FILE, &request, Metadata::new())
        .await?;
    let stream = call.into_stream();
    pin_mut!(stream);

    let received: Vec<DynamicMessage> = stream
        .map(|item| item.expect("stream item"))
        .collect()
        .await;
    assert_eq!(received, vec![a, b, c]);
    Ok(())
}

#[tokio::test]
async fn streams_across_arbitrary_chunk_boundaries() -> Result<()> {
    let messages: Vec<DynamicMessage> =
        (0..10).map(|i| chunk(i * 100, b"payload bytes")).collect();

    for size in [1, 2, 7, 64] {
        let mut response = ResponseBuilder::ok();
        for message in &messages {
            response = response.data(&encoded(message));
        }
        let transport = MockTransport::new();
        transport.respond_with(response.trailer_ok().chunked(size));
        let client = Client::new(transport, "http://files.internal:8080");

        let mut call = client
            .server_streaming(&READ_FILE, &chunk(0, b""), Metadata::new())
            .await?;
        for expected in &messages {
            let message = call.next().await.expect("stream ended early").unwrap();
            assert_eq!(&message, expected);
        }
        assert!(call.next().await.is_none(), "chunk size {size}");
    }
    Ok(())
}

#[tokio::test]
async fn text_mode_streams_like_binary() -> Result<()> {
    let a = chunk(1, b"one");
    let b = chunk(2, b"two");

    let transport = MockTransport::new();
    transport.respond_with(
        ResponseBuilder::ok()
            .text()
            .data(&encoded(&a))
            .data(&encoded(&b))
            .trailer_ok()
            .chunked(3),
    );
    let client = Client::with_mode(transport, "http://files.internal:8080", WireMode::Text);

    let mut call = client
        .server_streaming(&READ_FILE, &chunk(0, b""), Metadata::new())
        .await?;
    assert_eq!(call.next().await.unwrap().unwrap(), a);
    assert_eq!(call.next().await.unwrap().unwrap(), b);
    assert!(call.next().await.is_none());
    Ok(())
}

#[tokio::test]
async fn unary_round_trip() -> Result<()> {
    let reply = chunk(42, b"stat");
    let transport = MockTransport::new();
    transport.respond_with(ResponseBuilder::ok().data(&encoded(&reply)));
    let client = Client::new(transport, "http://files.internal:8080");

    let mut request = DynamicMessage::new(&CHUNK);
    request.set(1, Value::String("/etc/motd".into()))?;
    let got = client.unary(&STAT_FILE, &request, Metadata::new()).await?;
    assert_eq!(got, reply);
    Ok(())
}

#[tokio::test]
async fn unary_failure_after_data_frame() -> Result<()> {
    let transport = MockTransport::new();
    transport.respond_with(
        ResponseBuilder::ok()
            .data(&encoded(&chunk(1, b"x")))
            .trailer(4, "deadline exceeded"),
    );
    let client = Client::new(transport, "http://files.internal:8080");

    let error = client
        .unary(&STAT_FILE, &chunk(0, b""), Metadata::new())
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        CallError::Transport(TransportError::Grpc { code: 4, .. })
    ));
    Ok(())
}

#[tokio::test]
async fn abort_keeps_delivered_messages() -> Result<()> {
    let transport = MockTransport::new();
    transport.respond_with(
        ResponseBuilder::ok()
            .data(&encoded(&chunk(1, b"a")))
            .data(&encoded(&chunk(2, b"b")))
            .data(&encoded(&chunk(3, b"c")))
            .trailer_ok(),
    );
    let client = Client::new(transport, "http://files.internal:8080");

    let mut call = client
        .server_streaming(&READ_FILE, &chunk(0, b""), Metadata::new())
        .await?;
    let handle = call.abort_handle();
    let first = call.next().await.unwrap().unwrap();
    assert_eq!(first, chunk(1, b"a"));
    handle.abort();
    assert!(call.next().await.is_none());
    // the abort does not retract what was already delivered
    assert_eq!(first.get_or_default(3)?, Value::Bytes(Bytes::from_static(b"a")));
    Ok(())
}

#[tokio::test]
async fn mid_stream_corruption_terminates_with_failure() -> Result<()> {
    let transport = MockTransport::new();
    transport.respond_with(
        ResponseBuilder::ok()
            .data(&encoded(&chunk(1, b"ok")))
            // bytes field with a length prefix pointing past the end
            .data(&[0x1a, 0x20, 0x00])
            .trailer_ok(),
    );
    let client = Client::new(transport, "http://files.internal:8080");

    let mut call = client
        .server_streaming(&READ_FILE, &chunk(0, b""), Metadata::new())
        .await?;
    assert_eq!(call.next().await.unwrap().unwrap(), chunk(1, b"ok"));
    assert!(call.next().await.unwrap().is_err());
    assert!(call.next().await.is_none());
    Ok(())
}
