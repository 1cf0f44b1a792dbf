//! Decode-time failure paths: malformed documents abort with a located,
//! descriptive `DecodeError` rather than panicking or silently defaulting.

use shapecheck_ir::{decode_document, parse_document, DecodeErrorKind};

#[test]
fn malformed_json_is_rejected_at_the_root() {
    let err = parse_document("{not valid json").unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::Malformed);
    assert_eq!(err.path, "<root>");
}

#[test]
fn unknown_ctr_tag_is_rejected() {
    let doc = parse_document(r#"[{"ctrPool":[{"type":42}],"hardCtr":[],"softCtr":[],"pathCtr":[]}]"#).unwrap();
    let err = decode_document(doc).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::UnknownTag);
    assert!(err.path.contains("ctrPool[0]"));
}

#[test]
fn missing_required_field_is_rejected() {
    let doc = parse_document(r#"[{"ctrPool":[{"type":6}],"hardCtr":[],"softCtr":[],"pathCtr":[]}]"#).unwrap();
    let err = decode_document(doc).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::MissingField);
}

#[test]
fn out_of_range_soft_index_is_rejected() {
    let doc = parse_document(r#"[{"ctrPool":[{"type":10}],"hardCtr":[],"softCtr":[3],"pathCtr":[]}]"#).unwrap();
    let err = decode_document(doc).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::IndexOutOfRange);
    assert!(err.path.contains("softCtr"));
}

#[test]
fn sort_mismatch_between_num_and_shape_equality_is_rejected() {
    let json = r#"[{
        "ctrPool": [{
            "type": 1,
            "left": {"expType": 1, "opType": 0, "value": 1},
            "right": {"expType": 0, "opType": 0, "dims": []}
        }],
        "hardCtr": [0], "softCtr": [], "pathCtr": []
    }]"#;
    let doc = parse_document(json).unwrap();
    let err = decode_document(doc).unwrap_err();
    assert_eq!(err.kind, DecodeErrorKind::SortMismatch);
}

#[test]
fn well_formed_document_decodes_successfully() {
    let json = r#"[{
        "ctrPool": [
            {"type": 6,
             "left": {"expType": 1, "opType": 0, "value": 0},
             "right": {"expType": 1, "opType": 1, "symbol": {"name": "n", "type": 0}}}
        ],
        "hardCtr": [], "softCtr": [0], "pathCtr": []
    }]"#;
    let doc = parse_document(json).unwrap();
    let sets = decode_document(doc).unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].ctr_pool.len(), 1);
}
