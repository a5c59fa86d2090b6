use std::collections::BTreeMap;

use pylit::{Value, parse, print};
use rstest::rstest;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Struct<T, U, V, W> {
  unit: (),
  bool: bool,
  int: usize,
  double: f64,
  foo: T,
  bar: U,
  baz: V,
  foobar: W,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct UnitStruct;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct TupleStruct<A, B>(A, B);

#[derive(Debug, PartialEq, Serialize, Deserialize)]
enum Enum {
  StructVariant { a: usize },
  UnitVariant,
  TupleVariant(String, i64),
  NewtypeVariant(bool),
}

type Big = Struct<UnitStruct, TupleStruct<f64, bool>, Vec<Enum>, BTreeMap<String, Option<i32>>>;

fn big() -> Big {
  let mut map = BTreeMap::new();
  map.insert("foo".to_string(), None);
  map.insert("bar".to_string(), Some(123));
  Struct {
    unit: (),
    bool: false,
    int: 123,
    double: 123.45,
    foo: UnitStruct,
    bar: TupleStruct(123.45, true),
    baz: vec![
      Enum::StructVariant { a: 123 },
      Enum::UnitVariant,
      Enum::TupleVariant("it's".to_string(), -1),
      Enum::NewtypeVariant(true),
    ],
    foobar: map,
  }
}

#[test]
fn test_big_serialize() {
  insta::assert_snapshot!(
    pylit::serde::to_string(&big()).unwrap(),
    @r#"{'unit': None, 'bool': False, 'int': 123, 'double': 123.45, 'foo': None, 'bar': (123.45, True), 'baz': [{'StructVariant': {'a': 123}}, 'UnitVariant', {'TupleVariant': ("it's", -1)}, {'NewtypeVariant': True}], 'foobar': {'bar': 123, 'foo': None}}"#
  );
}

#[test]
fn test_big_round_trip() {
  let text = pylit::serde::to_string(&big()).unwrap();
  let back: Big = pylit::serde::from_str(&text).unwrap();
  assert_eq!(back, big());
}

#[test]
fn test_single_element_tuple() {
  let text = pylit::serde::to_string(&(1,)).unwrap();
  assert_eq!(text, "(1,)");
  assert_eq!(parse(&text).unwrap(), Value::Tuple(vec![Value::Integer(1)]));
}

#[test]
fn test_value_serializes_like_print() {
  let val = parse("[{0: (1,), 'k': [None, 1.0e-7]}, (), u'x', -3]").unwrap();
  assert_eq!(pylit::serde::to_string(&val).unwrap(), print(&val));
}

#[test]
fn test_out_of_range_unsigned() {
  assert!(pylit::serde::to_string(&u64::MAX).is_err());
  assert_eq!(pylit::serde::to_string(&(i64::MAX as u64)).unwrap(), "9223372036854775807");
}

#[rstest]
#[case("a\nb")]
#[case("a\rb")]
#[case("C:\\")]
#[case("'\"")]
fn test_unrepresentable_string(#[case] text: &str) {
  let res = pylit::serde::to_string(text);
  assert!(matches!(res, Err(pylit::serde::Error::Message(_))), "{res:?}");
  assert!(pylit::serde::to_string(&vec![text]).is_err());
}

#[test]
fn test_awkward_strings_round_trip() {
  for text in ["it's", "say \"hi\"", "it''s \"x\"", r"C:\dir", r"\x41"] {
    let out = pylit::serde::to_string(text).unwrap();
    assert_eq!(pylit::serde::from_str::<String>(&out).unwrap(), text, "{out}");
  }
}

#[test]
fn test_from_value() {
  let val = parse("{'a': 1, 'b': 2}").unwrap();
  let map: BTreeMap<String, i64> = pylit::serde::from_value(val).unwrap();
  assert_eq!(map.into_iter().collect::<Vec<_>>(), vec![("a".to_string(), 1), ("b".to_string(), 2)]);
}

#[test]
fn test_enum_errors() {
  let res: pylit::serde::Result<Enum> = pylit::serde::from_str("[1]");
  insta::assert_snapshot!(
    res.unwrap_err(),
    @"invalid type: sequence, expected a string or single-entry dict"
  );
}
