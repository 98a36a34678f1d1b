//! Tests for reply coercion
//!
//! These tests verify:
//! - Each declared shape against its valid raw reply
//! - Nil stays absent, never empty
//! - Mismatches surface as decode errors
//! - Server errors are never coerced

use atlas_client::catalog::ReplyShape;
use atlas_client::reply::coerce;
use atlas_client::{ClientError, RawReply, ReplyValue};
use bytes::Bytes;

fn bulk(data: &[u8]) -> RawReply {
    RawReply::Bulk(Some(Bytes::copy_from_slice(data)))
}

fn status(text: &str) -> RawReply {
    RawReply::Status(text.to_string())
}

// =============================================================================
// VoidExpectOk Tests
// =============================================================================

#[test]
fn test_ok_status_is_unit() {
    assert_eq!(coerce(status("OK"), ReplyShape::VoidExpectOk).unwrap(), ReplyValue::Unit);
}

#[test]
fn test_other_status_is_decode_error() {
    for text in ["QUEUED", "ok", "PONG", ""] {
        match coerce(status(text), ReplyShape::VoidExpectOk) {
            Err(ClientError::ProtocolDecode(msg)) => assert!(msg.contains("OK")),
            other => panic!("Expected decode error for {:?}, got {:?}", text, other),
        }
    }
}

#[test]
fn test_non_status_for_void_is_decode_error() {
    assert!(matches!(
        coerce(RawReply::Integer(1), ReplyShape::VoidExpectOk),
        Err(ClientError::ProtocolDecode(_))
    ));
    assert!(matches!(
        coerce(bulk(b"OK"), ReplyShape::VoidExpectOk),
        Err(ClientError::ProtocolDecode(_))
    ));
}

// =============================================================================
// Integer and Boolean Tests
// =============================================================================

#[test]
fn test_integer_shape() {
    assert_eq!(
        coerce(RawReply::Integer(-17), ReplyShape::Integer).unwrap(),
        ReplyValue::Integer(-17)
    );
    assert!(matches!(
        coerce(bulk(b"17"), ReplyShape::Integer),
        Err(ClientError::ProtocolDecode(_))
    ));
}

#[test]
fn test_boolean_from_integer() {
    assert_eq!(
        coerce(RawReply::Integer(1), ReplyShape::BooleanFromInteger).unwrap(),
        ReplyValue::Bool(true)
    );
    assert_eq!(
        coerce(RawReply::Integer(0), ReplyShape::BooleanFromInteger).unwrap(),
        ReplyValue::Bool(false)
    );
}

#[test]
fn test_boolean_rejects_other_integers() {
    for n in [2, -1, 100] {
        assert!(matches!(
            coerce(RawReply::Integer(n), ReplyShape::BooleanFromInteger),
            Err(ClientError::ProtocolDecode(_))
        ));
        assert!(matches!(
            coerce(RawReply::Integer(n), ReplyShape::BooleanFromStatus),
            Err(ClientError::ProtocolDecode(_))
        ));
    }
}

#[test]
fn test_boolean_from_status_reads_integer_reply() {
    assert_eq!(
        coerce(RawReply::Integer(1), ReplyShape::BooleanFromStatus).unwrap(),
        ReplyValue::Bool(true)
    );
    assert!(coerce(status("OK"), ReplyShape::BooleanFromStatus).is_err());
}

// =============================================================================
// Text and Binary Tests
// =============================================================================

#[test]
fn test_nil_bulk_is_absent_not_empty() {
    assert_eq!(
        coerce(RawReply::Bulk(None), ReplyShape::TextOrNil).unwrap(),
        ReplyValue::Text(None)
    );
    assert_eq!(
        coerce(RawReply::Bulk(None), ReplyShape::BinaryOrNil).unwrap(),
        ReplyValue::Binary(None)
    );

    // An empty value is present
    assert_eq!(
        coerce(bulk(b""), ReplyShape::TextOrNil).unwrap(),
        ReplyValue::Text(Some(String::new()))
    );
}

#[test]
fn test_binary_keeps_exact_bytes() {
    let raw = [0u8, 159, 146, 150, 255, b'\r', b'\n'];
    match coerce(bulk(&raw), ReplyShape::BinaryOrNil).unwrap() {
        ReplyValue::Binary(Some(bytes)) => assert_eq!(&bytes[..], &raw[..]),
        other => panic!("Expected binary, got {:?}", other),
    }
}

#[test]
fn test_text_rejects_invalid_utf8() {
    assert!(matches!(
        coerce(bulk(&[0xff, 0xfe]), ReplyShape::TextOrNil),
        Err(ClientError::ProtocolDecode(_))
    ));
}

#[test]
fn test_status_reply_is_accepted_as_text() {
    assert_eq!(
        coerce(status("PONG"), ReplyShape::TextOrNil).unwrap(),
        ReplyValue::Text(Some("PONG".to_string()))
    );
}

// =============================================================================
// Array Tests
// =============================================================================

#[test]
fn test_array_of_text_keeps_positions_and_nils() {
    let raw = RawReply::Array(Some(vec![bulk(b"a"), RawReply::Bulk(None), bulk(b"c")]));

    assert_eq!(
        coerce(raw, ReplyShape::ArrayOfTextOrNil).unwrap(),
        ReplyValue::TextArray(vec![Some("a".to_string()), None, Some("c".to_string())])
    );
}

#[test]
fn test_array_of_binary() {
    let raw = RawReply::Array(Some(vec![RawReply::Bulk(None), bulk(b"\x00\x01")]));

    assert_eq!(
        coerce(raw, ReplyShape::ArrayOfBinaryOrNil).unwrap(),
        ReplyValue::BinaryArray(vec![None, Some(Bytes::from_static(b"\x00\x01"))])
    );
}

#[test]
fn test_array_shape_rejects_non_array() {
    assert!(matches!(
        coerce(RawReply::Array(None), ReplyShape::ArrayOfTextOrNil),
        Err(ClientError::ProtocolDecode(_))
    ));
    assert!(matches!(
        coerce(bulk(b"a"), ReplyShape::ArrayOfBinaryOrNil),
        Err(ClientError::ProtocolDecode(_))
    ));
}

#[test]
fn test_array_element_of_wrong_kind() {
    let raw = RawReply::Array(Some(vec![bulk(b"a"), RawReply::Integer(3)]));
    assert!(matches!(
        coerce(raw, ReplyShape::ArrayOfTextOrNil),
        Err(ClientError::ProtocolDecode(_))
    ));
}

// =============================================================================
// Float Tests
// =============================================================================

#[test]
fn test_float_from_bulk_decimal() {
    assert_eq!(
        coerce(bulk(b"10.5"), ReplyShape::Float).unwrap(),
        ReplyValue::Float(10.5)
    );
    assert_eq!(
        coerce(RawReply::Integer(3), ReplyShape::Float).unwrap(),
        ReplyValue::Float(3.0)
    );
    assert!(coerce(bulk(b"ten"), ReplyShape::Float).is_err());
}

// =============================================================================
// Server Error Tests
// =============================================================================

#[test]
fn test_server_error_passes_through_every_shape() {
    let shapes = [
        ReplyShape::VoidExpectOk,
        ReplyShape::Integer,
        ReplyShape::BooleanFromInteger,
        ReplyShape::BooleanFromStatus,
        ReplyShape::TextOrNil,
        ReplyShape::BinaryOrNil,
        ReplyShape::ArrayOfTextOrNil,
        ReplyShape::ArrayOfBinaryOrNil,
        ReplyShape::Float,
    ];

    for shape in shapes {
        let raw = RawReply::Error("WRONGTYPE Operation against a key".to_string());
        match coerce(raw, shape) {
            Err(ClientError::Server(msg)) => {
                assert_eq!(msg, "WRONGTYPE Operation against a key")
            }
            other => panic!("Expected server error for {:?}, got {:?}", shape, other),
        }
    }
}

// =============================================================================
// Typed Accessor Tests
// =============================================================================

#[test]
fn test_typed_accessor_mismatch_is_decode_error() {
    assert_eq!(ReplyValue::Integer(4).into_integer().unwrap(), 4);
    assert!(matches!(
        ReplyValue::Integer(4).into_text(),
        Err(ClientError::ProtocolDecode(_))
    ));
    assert!(ReplyValue::Unit.into_unit().is_ok());
    assert!(ReplyValue::Bool(true).into_unit().is_err());
}
