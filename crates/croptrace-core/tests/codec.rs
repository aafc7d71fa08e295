use croptrace_canonical::{normalize, RecordKind, Timestamp};
use croptrace_core::{
    CodecConfig, DecodeError, PayloadCodec, PayloadSigner, PAYLOAD_VERSION,
};
use serde_json::json;

fn config() -> CodecConfig {
    CodecConfig {
        scan_base_url: "https://scan.croptrace.test".into(),
        api_base_url: "https://api.croptrace.test/".into(),
        web_base_url: "https://app.croptrace.test".into(),
        blockchain_explorer_url: "https://explorer.croptrace.test".into(),
    }
}

fn fixed_clock() -> Timestamp {
    Timestamp::parse("2024-02-01T00:00:00Z").unwrap()
}

fn codec() -> PayloadCodec {
    PayloadCodec::with_clock(config(), PayloadSigner::new("test-secret"), fixed_clock)
}

fn batch_record() -> croptrace_canonical::CanonicalRecord {
    normalize(
        RecordKind::Batch,
        &json!({
            "batchId": "BCH001",
            "produceType": "Tomatoes",
            "farmer": "John Doe",
            "harvestDate": "2024-01-15",
            "qualityGrade": "A",
            "quantity": 1000,
            "location": "Farm A",
            "status": "REGISTERED"
        }),
    )
    .unwrap()
}

fn event_record() -> croptrace_canonical::CanonicalRecord {
    normalize(
        RecordKind::Event,
        &json!({
            "eventId": "EVT001",
            "batchId": "BCH001",
            "actor": "ACME Logistics",
            "eventType": "PICKUP",
            "description": "Picked up at farm gate",
            "timestamp": "2024-01-16T09:00:00Z"
        }),
    )
    .unwrap()
}

fn certificate_record() -> croptrace_canonical::CanonicalRecord {
    normalize(
        RecordKind::Certificate,
        &json!({
            "certificateId": "CRT001",
            "issuer": "EcoCert",
            "subject": "BCH001",
            "claims": { "organic": "EU 2018/848" },
            "issuedAt": "2024-01-20T00:00:00Z",
            "expiresAt": "2025-01-20T00:00:00Z"
        }),
    )
    .unwrap()
}

#[test]
fn round_trip_preserves_every_field() {
    let codec = codec();
    for record in [batch_record(), event_record(), certificate_record()] {
        let encoded = codec.encode(&record).unwrap();
        let decoded = codec.decode(&encoded.payload).unwrap();
        assert_eq!(decoded, encoded.envelope);
        assert_eq!(decoded.data, record);
        assert!(codec.verify_envelope(&decoded));
    }
}

#[test]
fn encode_is_deterministic_under_fixed_clock() {
    let codec = codec();
    let record = batch_record();
    let a = codec.encode(&record).unwrap();
    let b = codec.encode(&record).unwrap();
    assert_eq!(a.payload, b.payload);
    assert_eq!(a.envelope.signature, b.envelope.signature);
}

#[test]
fn urls_are_derived_from_record_identifiers() {
    let codec = codec();
    let encoded = codec.encode(&batch_record()).unwrap();
    let urls = &encoded.envelope.urls;
    assert_eq!(urls.scan, "https://scan.croptrace.test/scan/BCH001");
    assert_eq!(urls.api, "https://api.croptrace.test/api/batches/BCH001");
    assert_eq!(urls.web, "https://app.croptrace.test/batch/BCH001");
    assert!(urls.blockchain.is_none());
}

#[test]
fn blockchain_url_appears_only_with_confirmed_anchor() {
    let codec = codec();
    let record = normalize(
        RecordKind::Batch,
        &json!({
            "batchId": "BCH002",
            "produceType": "Apples",
            "harvestDate": "2024-01-10",
            "qualityGrade": "B",
            "quantity": 40,
            "location": "Orchard 7",
            "blockchain": {
                "onBlockchain": true,
                "transactionHash": "0x1234567890abcdef",
                "blockNumber": 12345
            }
        }),
    )
    .unwrap();
    let encoded = codec.encode(&record).unwrap();
    assert_eq!(
        encoded.envelope.urls.blockchain.as_deref(),
        Some("https://explorer.croptrace.test/tx/0x1234567890abcdef")
    );
}

#[test]
fn tampering_with_data_segment_breaks_verification() {
    let codec = codec();
    let encoded = codec.encode(&batch_record()).unwrap();

    // Flip the quantity inside the serialized data segment.
    let tampered = encoded.payload.replace("1000", "9000");
    assert_ne!(tampered, encoded.payload);

    let decoded = codec.decode(&tampered).unwrap();
    assert!(!codec.verify_envelope(&decoded));
}

#[test]
fn every_single_character_flip_in_data_is_detected() {
    let codec = codec();
    let encoded = codec.encode(&batch_record()).unwrap();
    let start = encoded.payload.find("\"data\":").unwrap();
    let end = encoded.payload.find(",\"urls\"").unwrap();

    let mut checked = 0;
    for idx in start..end {
        let mut bytes = encoded.payload.clone().into_bytes();
        let original = bytes[idx];
        // Substitute with a same-class character so the JSON stays parseable.
        let replacement = match original {
            b'a'..=b'y' => original + 1,
            b'0'..=b'8' => original + 1,
            _ => continue,
        };
        bytes[idx] = replacement;
        let tampered = String::from_utf8(bytes).unwrap();
        let Ok(decoded) = codec.decode(&tampered) else {
            continue;
        };
        assert!(
            !codec.verify_envelope(&decoded),
            "flip at byte {} went undetected",
            idx
        );
        checked += 1;
    }
    assert!(checked > 0, "no tampered variants were decodable");
}

#[test]
fn higher_version_is_rejected_without_partial_parse() {
    let codec = codec();
    let payload = json!({
        "type": "batch_tracking",
        "version": PAYLOAD_VERSION + 1,
        "data": { "this is": "not even batch-shaped" },
        "urls": {},
        "generatedAt": "2024-02-01T00:00:00Z"
    })
    .to_string();
    assert_eq!(
        codec.decode(&payload),
        Err(DecodeError::UnsupportedVersion(PAYLOAD_VERSION + 1))
    );
}

#[test]
fn version_zero_is_rejected() {
    let codec = codec();
    let payload = json!({
        "type": "batch_tracking",
        "version": 0,
        "data": { "this is": "not even batch-shaped" },
        "urls": {},
        "generatedAt": "2024-02-01T00:00:00Z"
    })
    .to_string();
    assert_eq!(
        codec.decode(&payload),
        Err(DecodeError::UnsupportedVersion(0))
    );
}

#[test]
fn unknown_type_is_rejected() {
    let codec = codec();
    let encoded = codec.encode(&batch_record()).unwrap();
    let forged = encoded.payload.replace("batch_tracking", "UNKNOWN");
    assert_eq!(
        codec.decode(&forged),
        Err(DecodeError::UnknownType("UNKNOWN".into()))
    );
}

#[test]
fn non_json_input_is_malformed() {
    let codec = codec();
    assert!(matches!(
        codec.decode("not a payload at all"),
        Err(DecodeError::MalformedPayload(_))
    ));
    assert!(matches!(
        codec.decode("[1,2,3]"),
        Err(DecodeError::MalformedPayload(_))
    ));
}

#[test]
fn missing_signature_decodes_but_fails_verification() {
    let codec = codec();
    let encoded = codec.encode(&batch_record()).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&encoded.payload).unwrap();
    value.as_object_mut().unwrap().remove("signature");
    let decoded = codec.decode(&value.to_string()).unwrap();
    assert!(!decoded.is_signed());
    assert!(!codec.verify_envelope(&decoded));
}

#[test]
fn wire_format_is_self_describing() {
    let codec = codec();
    let encoded = codec.encode(&event_record()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&encoded.payload).unwrap();
    assert_eq!(value["type"], "event_tracking");
    assert_eq!(value["version"], 1);
    assert_eq!(value["data"]["eventId"], "EVT001");
    assert_eq!(value["generatedAt"], "2024-02-01T00:00:00Z");
}
