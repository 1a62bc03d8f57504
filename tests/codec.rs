use imeta_reader::imeta::codec::value::{read_value, stored_size};
use imeta_reader::{ByteOrder, Elements, ImetaError, Payload, Rational, SRational, ValueType};

#[test]
fn type_table() {
    let widths = [
        (0u16, 0usize),
        (1, 1),
        (2, 1),
        (3, 2),
        (4, 4),
        (5, 8),
        (6, 1),
        (7, 1),
        (8, 2),
        (9, 4),
        (10, 8),
        (11, 4),
        (12, 8),
        (13, 1),
    ];
    for (id, width) in widths {
        let value_type = ValueType::from_id(id).unwrap_or_else(|| panic!("type {} missing", id));
        assert_eq!(value_type as u16, id);
        assert_eq!(value_type.width(), width, "width of {}", value_type);
    }
    assert_eq!(ValueType::from_id(14), None);
    assert!(!ValueType::None.is_directory_type());
    assert!(!ValueType::XmpText.is_directory_type());
    assert!(ValueType::Double.is_directory_type());
    assert_eq!(stored_size(ValueType::Rational, 3), Some(24));
}

#[test]
fn byte_order_marks() {
    assert_eq!(ByteOrder::from_mark(*b"II"), Some(ByteOrder::Little));
    assert_eq!(ByteOrder::from_mark(*b"MM"), Some(ByteOrder::Big));
    assert_eq!(ByteOrder::from_mark(*b"MI"), None);
    assert_eq!(ByteOrder::Big.read_u16(&[0x01, 0x02]), 0x0102);
    assert_eq!(ByteOrder::Little.read_u16(&[0x01, 0x02]), 0x0201);
}

#[test]
fn scalar_versus_sequence() {
    let one = read_value(0, ValueType::Short, 1, ByteOrder::Big, &[0x00, 0x07]).unwrap();
    assert_eq!(one.payload, Payload::Short(Elements::One(7)));
    assert_eq!(one.as_u32(), Some(7));

    let many = read_value(0, ValueType::Short, 2, ByteOrder::Big, &[0x00, 0x01, 0x00, 0x02]).unwrap();
    assert_eq!(many.payload, Payload::Short(Elements::Many(vec![1, 2])));
    assert_eq!(many.as_u32(), None, "sequences have no scalar");
    assert_eq!(many.size(), 4);
}

#[test]
fn signed_and_float_types() {
    let order = ByteOrder::Little;

    let sbyte = read_value(0, ValueType::SByte, 2, order, &[0xFF, 0x01]).unwrap();
    assert_eq!(sbyte.payload, Payload::SByte(Elements::Many(vec![-1, 1])));

    let sshort = read_value(0, ValueType::SShort, 1, order, &(-300i16).to_le_bytes()).unwrap();
    assert_eq!(sshort.payload, Payload::SShort(Elements::One(-300)));

    let slong = read_value(0, ValueType::SLong, 1, order, &(-70000i32).to_le_bytes()).unwrap();
    assert_eq!(slong.payload, Payload::SLong(Elements::One(-70000)));

    let float = read_value(0, ValueType::Float, 1, order, &1.25f32.to_le_bytes()).unwrap();
    assert_eq!(float.payload, Payload::Float(Elements::One(1.25)));

    let double = read_value(0, ValueType::Double, 1, order, &(-0.5f64).to_le_bytes()).unwrap();
    assert_eq!(double.payload, Payload::Double(Elements::One(-0.5)));
}

#[test]
fn rationals() {
    let mut data = Vec::new();
    data.extend_from_slice(&72u32.to_be_bytes());
    data.extend_from_slice(&1u32.to_be_bytes());
    let value = read_value(0x011A, ValueType::Rational, 1, ByteOrder::Big, &data).unwrap();
    assert_eq!(value.payload, Payload::Rational(Elements::One(Rational { num: 72, denom: 1 })));
    assert_eq!(value.to_string(), "72/1");

    let mut data = Vec::new();
    for (num, denom) in [(-1i32, 3i32), (2, -5)] {
        data.extend_from_slice(&num.to_le_bytes());
        data.extend_from_slice(&denom.to_le_bytes());
    }
    let value = read_value(0, ValueType::SRational, 2, ByteOrder::Little, &data).unwrap();
    assert_eq!(
        value.payload,
        Payload::SRational(Elements::Many(vec![
            SRational { num: -1, denom: 3 },
            SRational { num: 2, denom: -5 },
        ]))
    );
}

#[test]
fn text_strips_trailing_nuls() {
    let value = read_value(0x010F, ValueType::Ascii, 8, ByteOrder::Little, b"Canon\0\0\0").unwrap();
    assert_eq!(value.as_str(), Some("Canon"));
    assert_eq!(value.count, 8);

    let empty = read_value(0x010F, ValueType::Ascii, 2, ByteOrder::Little, b"\0\0").unwrap();
    assert_eq!(empty.as_str(), Some(""));
}

#[test]
fn undefined_keeps_raw_bytes() {
    let value = read_value(0x9000, ValueType::Undefined, 4, ByteOrder::Big, b"0230trailing").unwrap();
    assert_eq!(value.as_bytes(), Some(&b"0230"[..]), "only count bytes are consumed");
}

#[test]
fn value_errors() {
    match read_value(0x0101, ValueType::None, 1, ByteOrder::Little, &[0; 4]) {
        Err(ImetaError::UnsupportedType { type_id, tag }) => {
            assert_eq!(type_id, 0);
            assert_eq!(tag, 0x0101);
        }
        other => panic!("expected UnsupportedType, got {:?}", other),
    }

    match read_value(0, ValueType::Long, 2, ByteOrder::Little, &[0; 6]) {
        Err(ImetaError::TruncatedData { needed, available, .. }) => {
            assert_eq!(needed, 8);
            assert_eq!(available, 6);
        }
        other => panic!("expected TruncatedData, got {:?}", other),
    }
}
