//! Integration tests for the textual record reader

use regir::reader::{read_all, read_one};
use regir::Value;

#[test]
fn reads_a_whole_function_body() {
    let values = read_all(
        r#"
        ; add two numbers
        (prim 0 s32)
        (bind 0 0) (bind 1 0) (bind 2 0)
        (add 2 0 1)
        (return 2)
        "#,
    )
    .unwrap();
    assert_eq!(values.len(), 6);
    for value in &values {
        assert!(matches!(value, Value::Tuple(_)));
    }
}

#[test]
fn tuples_remember_their_opening_position() {
    let values = read_all("(prim 0 s32)\n   (return 0)").unwrap();
    let Value::Tuple(first) = &values[0] else {
        panic!("expected tuple");
    };
    let Value::Tuple(second) = &values[1] else {
        panic!("expected tuple");
    };
    assert_eq!((first.line, first.column), (1, 1));
    assert_eq!((second.line, second.column), (2, 4));
}

#[test]
fn atoms_parse_to_their_value_forms() {
    assert_eq!(read_one("42").unwrap(), Value::Int(42));
    assert_eq!(read_one("-3").unwrap(), Value::Int(-3));
    assert_eq!(read_one("0x10").unwrap(), Value::Int(16));
    assert_eq!(read_one("2.5").unwrap(), Value::Float(2.5));
    assert_eq!(read_one("printf").unwrap(), Value::symbol("printf"));
    assert_eq!(read_one(":loop").unwrap(), Value::keyword("loop"));
    assert_eq!(read_one("true").unwrap(), Value::Boolean(true));
    assert_eq!(read_one("\"s\\n\"").unwrap(), Value::str("s\n"));
}

#[test]
fn read_one_requires_exactly_one_value() {
    assert!(read_one("").is_err());
    assert!(read_one("1 2").is_err());
}

#[test]
fn malformed_text_is_rejected_not_panicked() {
    assert!(read_all("(jump 0").is_err());
    assert!(read_all(")").is_err());
    assert!(read_all("\"unterminated").is_err());
    assert!(read_all("\"bad \\q escape\"").is_err());
    assert!(read_all("99999999999999999999").is_err());
}

#[test]
fn reader_output_feeds_the_assembler() {
    let records = read_all("(constant 0 \"hello\") (return 0)").unwrap();
    let ir = regir::assemble(&regir::IrSource::new("f", 0, records)).unwrap();
    assert_eq!(ir.constants, vec![Value::str("hello")]);
}
