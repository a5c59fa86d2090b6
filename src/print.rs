use crate::tokenize::Tokenizer;
use crate::{Token, TokenType, Value};

/// Write `val` back out in literal syntax. Parsing the result gives back an
/// equal value, except for non-finite reals and strings that no quoting can
/// represent (see [quote_str]).
pub fn print(val: &Value) -> String {
  let mut buf = String::new();
  print_impl(val, &mut buf);
  buf
}

fn print_impl(val: &Value, buf: &mut String) {
  match val {
    Value::Integer(val) => buf.push_str(&val.to_string()),
    Value::Real(val) => write_real(*val, buf),
    Value::Str(val) => write_str(val, buf),
    Value::Bool(val) => {
      buf.push_str(if *val { "True" } else { "False" });
    }
    Value::None => buf.push_str("None"),
    Value::List(items) => {
      buf.push('[');
      print_items(items, buf);
      buf.push(']');
    }
    Value::Tuple(items) => {
      buf.push('(');
      print_items(items, buf);
      if items.len() == 1 {
        buf.push(',');
      }
      buf.push(')');
    }
    Value::Dict(dict) => {
      buf.push('{');
      for (i, (key, val)) in dict.iter().enumerate() {
        if i > 0 {
          buf.push_str(", ");
        }
        print_impl(key, buf);
        buf.push_str(": ");
        print_impl(val, buf);
      }
      buf.push('}');
    }
  }
}

fn print_items(items: &[Value], buf: &mut String) {
  for (i, item) in items.iter().enumerate() {
    if i > 0 {
      buf.push_str(", ");
    }
    print_impl(item, buf);
  }
}

/// Reals always get a decimal point so they don't read back as integers
pub(crate) fn write_real(val: f64, buf: &mut String) {
  if val.is_nan() {
    buf.push_str("nan");
  } else if val.is_infinite() {
    buf.push_str(if val > 0.0 { "inf" } else { "-inf" });
  } else {
    // Debug switches to exponent notation for very large and small values
    let text = format!("{val:?}");
    match text.find('e') {
      Some(exp) if !text[..exp].contains('.') => {
        buf.push_str(&text[..exp]);
        buf.push_str(".0");
        buf.push_str(&text[exp..]);
      }
      _ => buf.push_str(&text),
    }
  }
}

/// Strings are never escaped. Falls back to single quotes when [quote_str]
/// can't represent the string, so the output won't parse back.
pub(crate) fn write_str(val: &str, buf: &mut String) {
  match quote_str(val) {
    Some(quoted) => buf.push_str(&quoted),
    None => {
      buf.push('\'');
      buf.push_str(val);
      buf.push('\'');
    }
  }
}

/// Wrap `val` in whichever quote makes it scan back as exactly `val`,
/// preferring the one that doesn't appear inside. `None` if neither works,
/// e.g. for raw line breaks or a trailing backslash.
pub(crate) fn quote_str(val: &str) -> Option<String> {
  let preferred = if val.contains('\'') && !val.contains('"') { '"' } else { '\'' };
  let other = if preferred == '"' { '\'' } else { '"' };
  [preferred, other].into_iter().map(|quote| format!("{quote}{val}{quote}")).find(|quoted| {
    let mut tokens = Tokenizer::new(quoted);
    matches!(
      tokens.next(),
      Some(Ok(Token { token_type: TokenType::Str { .. }, span })) if span.end == quoted.len()
    )
  })
}

#[cfg(test)]
mod test {
  use rstest::rstest;

  use super::*;
  use crate::{Dict, parse};

  #[rstest]
  #[case(Value::Real(1.0), "1.0")]
  #[case(Value::Real(-0.5), "-0.5")]
  #[case(Value::Real(1.0e-7), "1.0e-7")]
  #[case(Value::Real(6.02e23), "6.02e23")]
  #[case(Value::Real(f64::NEG_INFINITY), "-inf")]
  #[case(Value::Integer(-42), "-42")]
  #[case(Value::from("it's"), "\"it's\"")]
  #[case(Value::from("say \"hi\""), "'say \"hi\"'")]
  #[case(Value::from("it''s"), "\"it''s\"")]
  #[case(Value::from("it''s \"x\""), "'it''s \"x\"'")]
  #[case(Value::Tuple(vec![]), "()")]
  #[case(Value::Tuple(vec![Value::None]), "(None,)")]
  #[case(Value::List(vec![Value::Bool(true), Value::Bool(false)]), "[True, False]")]
  fn test_print(#[case] val: Value, #[case] expected: &str) {
    assert_eq!(print(&val), expected);
  }

  #[test]
  fn test_quote_str() {
    assert_eq!(quote_str("plain").as_deref(), Some("'plain'"));
    assert_eq!(quote_str(r"it\'s").as_deref(), Some(r#""it\'s""#));
    assert_eq!(quote_str("a\nb"), None);
    assert_eq!(quote_str("C:\\"), None);
    assert_eq!(quote_str("'\""), None);
  }

  #[test]
  fn test_print_nested() {
    let dict: Dict = [
      (Value::from("A"), Value::Integer(1)),
      (Value::Tuple(vec![Value::Integer(1), Value::Integer(2)]), Value::List(vec![])),
    ]
    .into_iter()
    .collect();
    insta::assert_snapshot!(print(&Value::Dict(dict)), @"{'A': 1, (1, 2): []}");
  }

  #[rstest]
  #[case("['a', 100, ('A', [101, 102]), 3.14, [2.718, 'xyzzy', -1.414]]")]
  #[case("{'A': 1, 'B': 2, 'C': {'a': 1.2, 'b': 3.4}}")]
  #[case("[(), (1,), {}, [], None, \"it's\"]")]
  #[case("1.0e-7")]
  fn test_print_is_canonical(#[case] text: &str) {
    let val = parse(text).unwrap();
    assert_eq!(print(&val), text);
    assert_eq!(parse(&print(&val)).unwrap(), val);
  }
}
