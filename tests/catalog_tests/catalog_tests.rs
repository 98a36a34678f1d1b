//! Tests for the command Catalog
//!
//! These tests verify:
//! - Literal selection against feature sets
//! - Conservative fallback with no feature set
//! - Version-gated operations
//! - Declared reply shapes

use atlas_client::catalog::{Catalog, Operation, ReplyShape};
use atlas_client::features::thresholds;
use atlas_client::{ClientError, FeatureSet, Version};

fn features(major: u32, minor: u32, patch: u32) -> FeatureSet {
    FeatureSet::new(Version::new(major, minor, patch))
}

// =============================================================================
// Literal Selection Tests
// =============================================================================

#[test]
fn test_getrange_below_threshold_uses_legacy_literal() {
    let catalog = Catalog::standard();
    let old = features(2, 0, 4);

    assert_eq!(catalog.resolve(Operation::GetRange, Some(&old)).unwrap(), "SUBSTR");
}

#[test]
fn test_getrange_at_threshold_uses_modern_literal() {
    let catalog = Catalog::standard();
    let exact = features(2, 1, 0);
    let newer = features(7, 0, 11);

    assert_eq!(catalog.resolve(Operation::GetRange, Some(&exact)).unwrap(), "GETRANGE");
    assert_eq!(catalog.resolve(Operation::GetRange, Some(&newer)).unwrap(), "GETRANGE");
}

#[test]
fn test_unknown_version_uses_oldest_literal() {
    let catalog = Catalog::standard();

    assert_eq!(catalog.resolve(Operation::GetRange, None).unwrap(), "SUBSTR");
    assert_eq!(catalog.resolve(Operation::Get, None).unwrap(), "GET");
    // Gated operations are not refused when the version is unknown
    assert_eq!(catalog.resolve(Operation::GetDel, None).unwrap(), "GETDEL");
}

#[test]
fn test_single_literal_is_unconditional() {
    let catalog = Catalog::standard();
    let ancient = features(1, 0, 0);

    assert_eq!(catalog.resolve(Operation::Incr, Some(&ancient)).unwrap(), "INCR");
    assert_eq!(catalog.resolve(Operation::IncrBy, Some(&ancient)).unwrap(), "INCRBY");
    assert_eq!(catalog.resolve(Operation::MSet, Some(&ancient)).unwrap(), "MSET");
}

#[test]
fn test_resolution_is_deterministic() {
    let catalog = Catalog::standard();
    let fs = features(2, 6, 0);

    let first: Vec<_> = Operation::ALL
        .iter()
        .map(|&op| catalog.resolve(op, Some(&fs)).ok())
        .collect();
    let second: Vec<_> = Operation::ALL
        .iter()
        .map(|&op| catalog.resolve(op, Some(&fs)).ok())
        .collect();
    assert_eq!(first, second);
}

// =============================================================================
// Gating Tests
// =============================================================================

#[test]
fn test_gated_operation_below_minimum_is_unsupported() {
    let catalog = Catalog::standard();
    let old = features(5, 0, 7);

    match catalog.resolve(Operation::GetDel, Some(&old)) {
        Err(ClientError::UnsupportedOperation(msg)) => {
            assert!(msg.contains("6.2.0"));
            assert!(msg.contains("5.0.7"));
        }
        other => panic!("Expected UnsupportedOperation, got {:?}", other),
    }
}

#[test]
fn test_gated_operation_at_minimum_resolves() {
    let catalog = Catalog::standard();

    assert_eq!(catalog.resolve(Operation::GetDel, Some(&features(6, 2, 0))).unwrap(), "GETDEL");
    assert_eq!(catalog.resolve(Operation::BitOp, Some(&features(2, 6, 0))).unwrap(), "BITOP");
    assert!(catalog.resolve(Operation::BitOp, Some(&features(2, 4, 0))).is_err());
    assert!(catalog.resolve(Operation::StrLen, Some(&features(2, 1, 1))).is_err());
    assert_eq!(catalog.resolve(Operation::StrLen, Some(&features(2, 1, 2))).unwrap(), "STRLEN");
}

#[test]
fn test_gates_agree_with_feature_flags() {
    let catalog = Catalog::standard();
    let gated: [(Operation, fn(&FeatureSet) -> bool); 8] = [
        (Operation::GetDel, FeatureSet::get_delete),
        (Operation::StrLen, FeatureSet::string_length),
        (Operation::Persist, FeatureSet::persist),
        (Operation::SetRange, FeatureSet::string_set_range),
        (Operation::BitOp, FeatureSet::bitwise_operations),
        (Operation::BitCount, FeatureSet::bitwise_operations),
        (Operation::IncrByFloat, FeatureSet::increment_float),
        (Operation::PSetEx, FeatureSet::millisecond_expiry),
    ];

    let mut grid = vec![Version::new(1, 2, 6), Version::new(2, 0, 0), Version::new(7, 2, 4)];
    for threshold in [
        thresholds::GETRANGE,
        thresholds::PERSIST,
        thresholds::EXPIRE_OVERWRITE,
        thresholds::SETRANGE,
        thresholds::HDEL_VARIADIC,
        thresholds::BITWISE,
        thresholds::SET_CONDITIONAL,
        thresholds::GETDEL,
    ] {
        grid.push(threshold);
        if threshold.patch > 0 {
            grid.push(Version::new(threshold.major, threshold.minor, threshold.patch - 1));
        } else {
            grid.push(Version::new(threshold.major, threshold.minor - 1, 99));
        }
    }

    for version in grid {
        let fs = FeatureSet::new(version);
        for (op, flag) in gated {
            assert_eq!(
                catalog.resolve(op, Some(&fs)).is_ok(),
                flag(&fs),
                "{} disagrees with its feature flag at {}",
                op,
                version
            );
        }

        let literal = catalog.resolve(Operation::GetRange, Some(&fs)).unwrap();
        assert_eq!(literal == "GETRANGE", fs.substr_renamed_getrange(), "at {}", version);
    }
}

// =============================================================================
// Shape Tests
// =============================================================================

#[test]
fn test_every_operation_is_catalogued() {
    let catalog = Catalog::standard();

    assert_eq!(catalog.len(), Operation::ALL.len());
    for op in Operation::ALL {
        let descriptor = catalog.descriptor(op).unwrap();
        assert_eq!(descriptor.operation, op);
        assert!(!descriptor.literals.is_empty());

        // Literals are ordered oldest-first
        let versions: Vec<_> = descriptor.literals.iter().map(|l| l.min_version).collect();
        let mut sorted = versions.clone();
        sorted.sort();
        assert_eq!(versions, sorted, "{} literals out of order", op);
    }
}

#[test]
fn test_declared_shapes() {
    let catalog = Catalog::standard();

    assert_eq!(catalog.shape(Operation::Set).unwrap(), ReplyShape::VoidExpectOk);
    assert_eq!(catalog.shape(Operation::MSet).unwrap(), ReplyShape::VoidExpectOk);
    assert_eq!(catalog.shape(Operation::Get).unwrap(), ReplyShape::BinaryOrNil);
    assert_eq!(catalog.shape(Operation::MGet).unwrap(), ReplyShape::ArrayOfBinaryOrNil);
    assert_eq!(catalog.shape(Operation::Incr).unwrap(), ReplyShape::Integer);
    assert_eq!(catalog.shape(Operation::Exists).unwrap(), ReplyShape::BooleanFromInteger);
    assert_eq!(catalog.shape(Operation::SetNx).unwrap(), ReplyShape::BooleanFromStatus);
    assert_eq!(catalog.shape(Operation::MSetNx).unwrap(), ReplyShape::BooleanFromStatus);
    assert_eq!(catalog.shape(Operation::IncrByFloat).unwrap(), ReplyShape::Float);
}

#[test]
fn test_text_shape_conversion() {
    assert_eq!(ReplyShape::BinaryOrNil.as_text(), ReplyShape::TextOrNil);
    assert_eq!(ReplyShape::ArrayOfBinaryOrNil.as_text(), ReplyShape::ArrayOfTextOrNil);
    assert_eq!(ReplyShape::Integer.as_text(), ReplyShape::Integer);
}
