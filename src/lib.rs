mod dict;
mod parse;
mod print;
pub mod serde;
pub mod tokenize;

pub use dict::Dict;
pub use parse::{ParseOptions, parse, parse_with};
pub use print::print;
pub use tokenize::{Token, TokenType, tokenize};

/// The start and end byte offsets of a [Token]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
  pub start: usize,
  pub end: usize,
}

/// A parsed literal.
///
/// `List` and `Tuple` hold the same payload but are kept apart because they
/// come from different syntax (`[...]` vs `(...)`) and print back differently.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
  Integer(i64),
  Real(f64),
  Str(String),
  Bool(bool),
  None,
  List(Vec<Value>),
  Tuple(Vec<Value>),
  Dict(Dict),
}

impl Value {
  /// Name of the variant, spelled the way the literal syntax's host language
  /// spells its types
  pub fn type_name(&self) -> &'static str {
    match self {
      Value::Integer(_) => "int",
      Value::Real(_) => "float",
      Value::Str(_) => "str",
      Value::Bool(_) => "bool",
      Value::None => "NoneType",
      Value::List(_) => "list",
      Value::Tuple(_) => "tuple",
      Value::Dict(_) => "dict",
    }
  }

  pub fn as_integer(&self) -> Option<i64> {
    match self {
      Value::Integer(val) => Some(*val),
      _ => None,
    }
  }

  pub fn as_real(&self) -> Option<f64> {
    match self {
      Value::Real(val) => Some(*val),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Str(val) => Some(val),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Bool(val) => Some(*val),
      _ => None,
    }
  }

  pub fn is_none(&self) -> bool {
    matches!(self, Value::None)
  }

  pub fn as_list(&self) -> Option<&[Value]> {
    match self {
      Value::List(items) => Some(items),
      _ => None,
    }
  }

  pub fn as_tuple(&self) -> Option<&[Value]> {
    match self {
      Value::Tuple(items) => Some(items),
      _ => None,
    }
  }

  pub fn as_dict(&self) -> Option<&Dict> {
    match self {
      Value::Dict(dict) => Some(dict),
      _ => None,
    }
  }
}

impl std::fmt::Display for Value {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&print(self))
  }
}

impl From<i64> for Value {
  fn from(val: i64) -> Self {
    Value::Integer(val)
  }
}

impl From<f64> for Value {
  fn from(val: f64) -> Self {
    Value::Real(val)
  }
}

impl From<bool> for Value {
  fn from(val: bool) -> Self {
    Value::Bool(val)
  }
}

impl From<&str> for Value {
  fn from(val: &str) -> Self {
    Value::Str(val.to_string())
  }
}

impl From<String> for Value {
  fn from(val: String) -> Self {
    Value::Str(val)
  }
}

impl From<Vec<Value>> for Value {
  fn from(items: Vec<Value>) -> Self {
    Value::List(items)
  }
}

impl From<Dict> for Value {
  fn from(dict: Dict) -> Self {
    Value::Dict(dict)
  }
}

/// Every variant carries the byte offset where the problem was found.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
  #[error("expected a value at offset {position}, found end of input")]
  EmptyInput { position: usize },
  #[error("unexpected token at offset {position}")]
  UnexpectedToken { position: usize },
  /// Either an opener was never closed (`position` is the opener) or a closer
  /// showed up that doesn't close anything (`position` is the closer)
  #[error("unmatched delimiter at offset {position}, expected {expected}")]
  UnmatchedDelimiter { expected: String, position: usize },
  #[error("number `{text}` at offset {position} is out of range")]
  NumberOutOfRange { text: String, position: usize },
  #[error("nesting too deep at offset {position}")]
  NestingTooDeep { position: usize },
  #[error("unexpected trailing content at offset {position}")]
  TrailingContent { position: usize },
}

impl ParseError {
  /// Byte offset into the input
  pub fn position(&self) -> usize {
    match self {
      ParseError::EmptyInput { position }
      | ParseError::UnexpectedToken { position }
      | ParseError::UnmatchedDelimiter { position, .. }
      | ParseError::NumberOutOfRange { position, .. }
      | ParseError::NestingTooDeep { position }
      | ParseError::TrailingContent { position } => *position,
    }
  }

  /// 1-based line and column (in chars) of the error within `text`, the input
  /// that produced it
  pub fn line_col(&self, text: &str) -> (usize, usize) {
    let mut end = self.position().min(text.len());
    while !text.is_char_boundary(end) {
      end -= 1;
    }
    let before = &text[..end];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|ind| ind + 1).unwrap_or(0);
    (line, before[line_start..].chars().count() + 1)
  }
}
