use serde_json::{json, Value};
use watcher_core::cli::{pack, unpack, CliError, RequestDescriptor};
use watcher_core::{MediaType, PutWatchRequest, WatchSourceError, Writeable};

#[test]
fn pack_unpack_matrix() {
    let body = json!({
        "trigger": {"schedule": {"interval": "10s"}},
        "input": {"simple": {"threshold": 5}},
        "actions": {"log": {"logging": {"text": "over threshold"}}}
    });
    for media_type in [MediaType::Json, MediaType::Yaml, MediaType::Cbor] {
        let descriptor = json!({
            "id": "threshold_watch",
            "body": body,
            "media_type": media_type,
            "active": false,
            "version": 12,
            "parent_task": "node-a:3"
        });
        let bytes = pack(&descriptor.to_string(), false).unwrap();

        let request = PutWatchRequest::from_bytes(&bytes).unwrap();
        assert_eq!(request.media_type(), Some(media_type));
        assert_eq!(request.version(), 12);

        let out: Value = serde_json::from_str(&unpack(&bytes, false).unwrap()).unwrap();
        assert_eq!(out, descriptor, "media type {media_type}");
    }
}

#[test]
fn unpack_fills_defaults() {
    let bytes = pack(r#"{"id": "w", "body": {"trigger": {}}}"#, false).unwrap();
    let json = unpack(&bytes, true).unwrap();
    let descriptor: RequestDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(descriptor.id.as_deref(), Some("w"));
    assert_eq!(descriptor.media_type, MediaType::Json);
    assert!(descriptor.active);
    assert_eq!(descriptor.version, -3);
    assert_eq!(descriptor.parent_task, None);
    assert!(json.contains('\n'));
}

#[test]
fn missing_body_fails_validation() {
    let err = pack(r#"{"id": "w"}"#, false).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation Failed: 1: watch source is missing;"
    );
}

#[test]
fn smile_body_cannot_be_packed() {
    let err = pack(r#"{"id": "w", "body": {}, "media_type": "smile"}"#, false).unwrap_err();
    assert!(matches!(
        err,
        CliError::Source(WatchSourceError::UnsupportedMediaType(MediaType::Smile))
    ));
}

#[test]
fn malformed_descriptor() {
    let err = pack("{", false).unwrap_err();
    assert!(matches!(err, CliError::Json(_)));
    assert!(err.to_string().starts_with("invalid request descriptor"));
}

#[test]
fn empty_source_unpacks_as_empty_body() {
    let bytes = PutWatchRequest::new("w", Vec::new(), MediaType::Json)
        .to_bytes()
        .unwrap();
    let json = unpack(&bytes, false).unwrap();
    let out: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(out["body_bytes"], json!([]));
    assert!(out.get("body").is_none());

    assert_eq!(pack(&json, false).unwrap(), bytes);
}

#[test]
fn undecodable_bodies_unpack_as_raw_bytes() {
    let cases = [
        (MediaType::Smile, vec![0x3a, 0x29, 0x0a, 0x00, 0xfa]),
        (MediaType::Json, b"{not json".to_vec()),
        (MediaType::Cbor, vec![0xff]),
    ];
    for (media_type, source) in cases {
        let mut request = PutWatchRequest::new("w", source.clone(), media_type);
        request.set_version(7);
        let bytes = request.to_bytes().unwrap();

        let json = unpack(&bytes, false).unwrap();
        let descriptor: RequestDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(descriptor.body, None, "media type {media_type}");
        assert_eq!(descriptor.body_bytes.as_deref(), Some(source.as_slice()));
        assert_eq!(descriptor.media_type, media_type);

        assert_eq!(pack(&json, false).unwrap(), bytes, "media type {media_type}");
    }
}

#[test]
fn media_type_given_as_content_type() {
    let bytes = pack(
        r#"{"id": "w", "body": {"a": 1}, "media_type": "application/yaml"}"#,
        false,
    )
    .unwrap();
    let request = PutWatchRequest::from_bytes(&bytes).unwrap();
    assert_eq!(request.media_type(), Some(MediaType::Yaml));

    let out: Value = serde_json::from_str(&unpack(&bytes, false).unwrap()).unwrap();
    assert_eq!(out["media_type"], "yaml");
    assert_eq!(out["body"], json!({"a": 1}));
}
