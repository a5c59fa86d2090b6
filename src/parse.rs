use std::iter::Peekable;

use tracing::{debug, trace};

use crate::{Dict, ParseError, Span, Token, TokenType, Value, tokenize::Tokenizer};

type Result<T> = std::result::Result<T, ParseError>;

/// Knobs for [parse_with]
#[derive(Clone, Debug)]
pub struct ParseOptions {
  /// How many aggregates may be nested inside each other. Going deeper fails
  /// with [ParseError::NestingTooDeep] instead of exhausting the stack.
  pub max_depth: usize,
}

impl ParseOptions {
  pub const DEFAULT_MAX_DEPTH: usize = 256;

  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }
}

impl Default for ParseOptions {
  fn default() -> Self {
    ParseOptions { max_depth: Self::DEFAULT_MAX_DEPTH }
  }
}

/// Parse a single literal, which must make up the entire input (surrounding
/// whitespace aside)
pub fn parse(text: &str) -> Result<Value> {
  parse_with(text, &ParseOptions::default())
}

pub fn parse_with(text: &str, options: &ParseOptions) -> Result<Value> {
  debug!(len = text.len(), max_depth = options.max_depth, "parsing literal");

  let mut parser =
    Parser { text, tokens: Tokenizer::new(text).peekable(), depth: 0, max_depth: options.max_depth };

  let value = parser.parse_list_item()?;

  match (value, parser.tokens.next()) {
    (Some(value), None) => {
      debug!(type_name = value.type_name(), "parsed literal");
      Ok(value)
    }
    (None, None) => Err(ParseError::EmptyInput { position: text.len() }),
    // Whatever follows a complete value is trailing content, even if it isn't a valid token
    (Some(_), Some(Err(err))) => Err(ParseError::TrailingContent { position: err.position() }),
    (None, Some(Err(err))) => Err(err),
    (Some(_), Some(Ok(tok))) if tok.token_type.is_closer() => Err(ParseError::UnmatchedDelimiter {
      expected: "end of input".to_string(),
      position: tok.span.start,
    }),
    (Some(_), Some(Ok(tok))) => Err(ParseError::TrailingContent { position: tok.span.start }),
    (None, Some(Ok(tok))) if tok.token_type.is_closer() => Err(ParseError::UnmatchedDelimiter {
      expected: "a value".to_string(),
      position: tok.span.start,
    }),
    (None, Some(Ok(tok))) => Err(ParseError::UnexpectedToken { position: tok.span.start }),
  }
}

struct Parser<'a, I>
where
  I: Iterator<Item = Result<Token>>,
{
  text: &'a str,
  tokens: Peekable<I>,
  /// Number of aggregates currently open
  depth: usize,
  max_depth: usize,
}

impl<I> Parser<'_, I>
where
  I: Iterator<Item = Result<Token>>,
{
  /// `list-item`: any scalar or aggregate. Returns `None` without consuming
  /// anything if the next token can't start a value.
  fn parse_list_item(&mut self) -> Result<Option<Value>> {
    let Some(tok) = self.peek()? else {
      return Ok(None);
    };
    let (token_type, span) = (tok.token_type, tok.span);
    let value = match token_type {
      TokenType::Real => self.convert_real(span)?,
      TokenType::Int => self.convert_int(span)?,
      TokenType::Str { prefixed } => self.convert_str(span, prefixed),
      TokenType::Bool => Value::Bool(self.get_span_contents(span) == "True"),
      TokenType::None => Value::None,
      TokenType::LSquare => return self.parse_list().map(Some),
      TokenType::LParen => return self.parse_tuple().map(Some),
      TokenType::LBrace => return self.parse_dict().map(Some),
      _ => return Ok(None),
    };
    let _ = self.tokens.next();
    Ok(Some(value))
  }

  fn parse_list(&mut self) -> Result<Value> {
    let opener = self.open_aggregate()?;
    let items = self.parse_delimited(&opener, TokenType::RSquare, Self::parse_list_item)?;
    self.depth -= 1;
    Ok(Value::List(items))
  }

  fn parse_tuple(&mut self) -> Result<Value> {
    let opener = self.open_aggregate()?;
    let items = self.parse_delimited(&opener, TokenType::RParen, Self::parse_list_item)?;
    self.depth -= 1;
    Ok(Value::Tuple(items))
  }

  fn parse_dict(&mut self) -> Result<Value> {
    let opener = self.open_aggregate()?;
    let entries =
      self.parse_delimited(&opener, TokenType::RBrace, |parser| parser.parse_dict_entry(&opener))?;
    self.depth -= 1;
    Ok(Value::Dict(entries.into_iter().collect::<Dict>()))
  }

  /// `dict-entry`: `list-item : list-item`
  fn parse_dict_entry(&mut self, opener: &Token) -> Result<Option<(Value, Value)>> {
    let Some(key) = self.parse_list_item()? else {
      return Ok(None);
    };
    if self.consume_if(|tok| tok.token_type == TokenType::Colon).is_none() {
      return Err(self.unexpected(opener, TokenType::RBrace));
    }
    let Some(val) = self.parse_list_item()? else {
      return Err(self.unexpected(opener, TokenType::RBrace));
    };
    Ok(Some((key, val)))
  }

  /// Consume the opening delimiter of an aggregate, enforcing the depth limit
  fn open_aggregate(&mut self) -> Result<Token> {
    let opener = match self.tokens.next() {
      Some(tok) => tok?,
      None => return Err(ParseError::EmptyInput { position: self.text.len() }),
    };
    if self.depth >= self.max_depth {
      return Err(ParseError::NestingTooDeep { position: opener.span.start });
    }
    self.depth += 1;
    trace!(opener = opener.token_type.describe(), depth = self.depth, "entering aggregate");
    Ok(opener)
  }

  /// Parse zero or more comma-separated items up to and including `closer`.
  /// A trailing comma before the closer is allowed.
  fn parse_delimited<T>(
    &mut self,
    opener: &Token,
    closer: TokenType,
    mut parse_item: impl FnMut(&mut Self) -> Result<Option<T>>,
  ) -> Result<Vec<T>> {
    let mut items = Vec::new();
    loop {
      if self.consume_if(|tok| tok.token_type == closer).is_some() {
        return Ok(items);
      }
      let Some(item) = parse_item(self)? else {
        return Err(self.unexpected(opener, closer));
      };
      items.push(item);
      if self.consume_if(|tok| tok.token_type == TokenType::Comma).is_none() {
        return match self.consume_if(|tok| tok.token_type == closer) {
          Some(_) => Ok(items),
          None => Err(self.unexpected(opener, closer)),
        };
      }
    }
  }

  /// Error for whatever comes next when it can't continue the aggregate that
  /// `opener` started
  fn unexpected(&mut self, opener: &Token, closer: TokenType) -> ParseError {
    let expected = closer.describe().to_string();
    match self.peek() {
      Err(err) => err,
      Ok(None) => ParseError::UnmatchedDelimiter { expected, position: opener.span.start },
      Ok(Some(tok)) if tok.token_type.is_closer() && tok.token_type != closer => {
        ParseError::UnmatchedDelimiter { expected, position: tok.span.start }
      }
      Ok(Some(tok)) => ParseError::UnexpectedToken { position: tok.span.start },
    }
  }

  fn convert_int(&self, span: Span) -> Result<Value> {
    let text = self.get_span_contents(span);
    text.parse::<i64>().map(Value::Integer).map_err(|_| ParseError::NumberOutOfRange {
      text: text.to_string(),
      position: span.start,
    })
  }

  fn convert_real(&self, span: Span) -> Result<Value> {
    self
      .get_span_contents(span)
      .parse::<f64>()
      .map(Value::Real)
      .map_err(|_| ParseError::UnexpectedToken { position: span.start })
  }

  /// Strip the quotes, and the `u` prefix if there is one
  fn convert_str(&self, span: Span, prefixed: bool) -> Value {
    let content = self.get_span_contents(span);
    let start = if prefixed { 2 } else { 1 };
    Value::Str(content[start..content.len() - 1].to_string())
  }

  /// Look at the next token without consuming it. A scanning error surfaces
  /// here, the first time the bad token is needed.
  fn peek(&mut self) -> Result<Option<&Token>> {
    match self.tokens.peek() {
      None => Ok(None),
      Some(Ok(tok)) => Ok(Some(tok)),
      Some(Err(err)) => Err(err.clone()),
    }
  }

  /// Consume and return the next token if it matches the given predicate
  fn consume_if(&mut self, pred: impl FnOnce(&Token) -> bool) -> Option<Token> {
    self.tokens.next_if(|res| res.as_ref().is_ok_and(pred)).and_then(|res| res.ok())
  }

  fn get_span_contents(&self, span: Span) -> &str {
    &self.text[span.start..span.end]
  }
}

#[cfg(test)]
mod test {
  use rstest::rstest;

  use super::*;

  #[rstest]
  #[case("", ParseError::EmptyInput { position: 0 })]
  #[case("  \n ", ParseError::EmptyInput { position: 4 })]
  #[case("[1, 2", ParseError::UnmatchedDelimiter { expected: "`]`".to_string(), position: 0 })]
  #[case("[(1, 2]", ParseError::UnmatchedDelimiter { expected: "`)`".to_string(), position: 6 })]
  #[case("{'a': [}", ParseError::UnmatchedDelimiter { expected: "`]`".to_string(), position: 7 })]
  #[case("[1]]", ParseError::UnmatchedDelimiter { expected: "end of input".to_string(), position: 3 })]
  #[case(")", ParseError::UnmatchedDelimiter { expected: "a value".to_string(), position: 0 })]
  #[case("[1 2]", ParseError::UnexpectedToken { position: 3 })]
  #[case("[1,,]", ParseError::UnexpectedToken { position: 3 })]
  #[case("[,]", ParseError::UnexpectedToken { position: 1 })]
  #[case("{1}", ParseError::UnexpectedToken { position: 2 })]
  #[case("{1: }", ParseError::UnexpectedToken { position: 4 })]
  #[case("{1 2}", ParseError::UnexpectedToken { position: 3 })]
  #[case(":", ParseError::UnexpectedToken { position: 0 })]
  #[case("[1, 2] extra", ParseError::TrailingContent { position: 7 })]
  #[case("1e5", ParseError::TrailingContent { position: 1 })]
  #[case("[1, @]", ParseError::UnexpectedToken { position: 4 })]
  #[case("['abc]", ParseError::UnexpectedToken { position: 1 })]
  #[case("[1, 2] 3", ParseError::TrailingContent { position: 7 })]
  #[case("1 2", ParseError::TrailingContent { position: 2 })]
  #[case(
    "99999999999999999999",
    ParseError::NumberOutOfRange { text: "99999999999999999999".to_string(), position: 0 }
  )]
  fn test_errors(#[case] text: &str, #[case] expected: ParseError) {
    assert_eq!(parse(text), Err(expected));
  }

  #[test]
  fn test_integer_bounds() {
    assert_eq!(parse("9223372036854775807"), Ok(Value::Integer(i64::MAX)));
    assert_eq!(parse("-9223372036854775808"), Ok(Value::Integer(i64::MIN)));
    assert!(matches!(parse("[9223372036854775808]"), Err(ParseError::NumberOutOfRange { .. })));
  }

  #[test]
  fn test_depth_limit() {
    let options = ParseOptions::default().with_max_depth(2);
    assert_eq!(
      parse_with("[[1]]", &options),
      Ok(Value::List(vec![Value::List(vec![Value::Integer(1)])]))
    );
    assert_eq!(parse_with("[[(1,)]]", &options), Err(ParseError::NestingTooDeep { position: 2 }));
    assert_eq!(parse_with("1", &ParseOptions::default().with_max_depth(0)), Ok(Value::Integer(1)));
  }

  #[test]
  fn test_pathological_nesting_does_not_overflow() {
    let text = "[".repeat(100_000);
    assert_eq!(
      parse(&text),
      Err(ParseError::NestingTooDeep { position: ParseOptions::DEFAULT_MAX_DEPTH })
    );
  }

  #[test]
  fn test_default_depth_is_usable() {
    let depth = ParseOptions::DEFAULT_MAX_DEPTH;
    let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    assert!(parse(&text).is_ok());
  }
}
