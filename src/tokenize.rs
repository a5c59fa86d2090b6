use std::{iter::Peekable, str::CharIndices};

use crate::{ParseError, Span};

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
  pub token_type: TokenType,
  pub span: Span,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenType {
  /// `(`
  LParen,
  /// `)`
  RParen,
  /// `[`
  LSquare,
  /// `]`
  RSquare,
  /// `{`
  LBrace,
  /// `}`
  RBrace,
  Colon,
  Comma,
  /// `[+-]?\d+`
  Int,
  /// `[+-]?\d+\.\d*([eE][+-]?\d+)?`
  Real,
  /// A single- or double-quoted string, optionally with a `u` prefix
  Str {
    prefixed: bool,
  },
  /// `True` or `False`
  Bool,
  /// `None`
  None,
}

impl TokenType {
  pub fn is_closer(self) -> bool {
    matches!(self, TokenType::RParen | TokenType::RSquare | TokenType::RBrace)
  }

  /// How the token is written, for error messages
  pub fn describe(self) -> &'static str {
    match self {
      TokenType::LParen => "`(`",
      TokenType::RParen => "`)`",
      TokenType::LSquare => "`[`",
      TokenType::RSquare => "`]`",
      TokenType::LBrace => "`{`",
      TokenType::RBrace => "`}`",
      TokenType::Colon => "`:`",
      TokenType::Comma => "`,`",
      TokenType::Int => "integer",
      TokenType::Real => "real",
      TokenType::Str { .. } => "string",
      TokenType::Bool => "boolean",
      TokenType::None => "`None`",
    }
  }
}

pub type TokenizeResult<T> = Result<T, ParseError>;

/// Split `text` into tokens. Whitespace separates tokens but is not emitted.
pub fn tokenize(text: &str) -> TokenizeResult<Vec<Token>> {
  Tokenizer::new(text).collect()
}

/// Scans tokens on demand, so nothing past the point where parsing stops is
/// ever looked at
pub struct Tokenizer<'a> {
  text: &'a str,
  chars: Peekable<CharIndices<'a>>,
}

impl<'a> Tokenizer<'a> {
  pub fn new(text: &'a str) -> Self {
    Tokenizer { text, chars: text.char_indices().peekable() }
  }

  fn word_token(&mut self, start: usize, first: char) -> TokenizeResult<Token> {
    let mut end = start + first.len_utf8();
    while let Some((_, next)) = self.chars.next_if(|&(_, next)| is_word_char(next)) {
      end += next.len_utf8();
    }
    let text = self.text;
    let token_type = match &text[start..end] {
      "True" | "False" => TokenType::Bool,
      "None" => TokenType::None,
      "u" => match self.chars.next_if(|&(_, next)| next == '\'' || next == '"') {
        Some((_, quote)) => return self.string_token(start, quote, true),
        None => return Err(ParseError::UnexpectedToken { position: start }),
      },
      _ => return Err(ParseError::UnexpectedToken { position: start }),
    };
    Ok(Token { token_type, span: Span { start, end } })
  }

  /// Scan a number whose first character (a sign or digit) at `start` has
  /// already been consumed. The longest match wins, so a real is never cut
  /// short into an integer.
  fn number_token(&mut self, start: usize) -> TokenizeResult<Token> {
    let text = self.text;
    let bytes = text.as_bytes();
    let digits_end = |from: usize| {
      let mut ind = from;
      while bytes.get(ind).is_some_and(u8::is_ascii_digit) {
        ind += 1;
      }
      ind
    };

    let int_start = if matches!(bytes.get(start), Some(b'+' | b'-')) { start + 1 } else { start };
    let mut end = digits_end(int_start);
    if end == int_start {
      // A sign with no digits after it
      return Err(ParseError::UnexpectedToken { position: start });
    }

    let mut token_type = TokenType::Int;
    if bytes.get(end) == Some(&b'.') {
      token_type = TokenType::Real;
      end = digits_end(end + 1);
      if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
          exp_start += 1;
        }
        let exp_end = digits_end(exp_start);
        if exp_end > exp_start {
          end = exp_end;
        }
      }
    }

    while self.chars.next_if(|&(ind, _)| ind < end).is_some() {}
    Ok(Token { token_type, span: Span { start, end } })
  }

  /// Scan a quoted string whose opening quote has already been consumed.
  /// `start` is where the token begins (the prefix, if there is one).
  ///
  /// A backslash keeps the character after it from closing the string, and a
  /// doubled quote doesn't close it either, but nothing is unescaped here.
  /// `\x` must be followed by at least one hex digit.
  fn string_token(&mut self, start: usize, quote: char, prefixed: bool) -> TokenizeResult<Token> {
    while let Some((ind, c)) = self.chars.next() {
      match c {
        '\\' => match self.chars.next() {
          None => break,
          Some((_, 'x')) => {
            if self.chars.next_if(|(_, next)| next.is_ascii_hexdigit()).is_none() {
              break;
            }
            while self.chars.next_if(|(_, next)| next.is_ascii_hexdigit()).is_some() {}
          }
          Some(_) => {}
        },
        '\n' | '\r' => break,
        c if c == quote => {
          if self.chars.next_if(|&(_, next)| next == quote).is_some() {
            continue;
          }
          return Ok(Token {
            token_type: TokenType::Str { prefixed },
            span: Span { start, end: ind + 1 },
          });
        }
        _ => {}
      }
    }
    // Hit a line break, EOF or a malformed `\x` before the closing quote
    Err(ParseError::UnexpectedToken { position: start })
  }
}

impl Iterator for Tokenizer<'_> {
  type Item = TokenizeResult<Token>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let (ind, c) = self.chars.next()?;
      let punct =
        |token_type: TokenType| Ok(Token { token_type, span: Span { start: ind, end: ind + 1 } });
      let tok = match c {
        '(' => punct(TokenType::LParen),
        ')' => punct(TokenType::RParen),
        '[' => punct(TokenType::LSquare),
        ']' => punct(TokenType::RSquare),
        '{' => punct(TokenType::LBrace),
        '}' => punct(TokenType::RBrace),
        ':' => punct(TokenType::Colon),
        ',' => punct(TokenType::Comma),
        ' ' | '\t' | '\n' | '\r' => continue,
        '\'' | '"' => self.string_token(ind, c, false),
        '+' | '-' | '0'..='9' => self.number_token(ind),
        c if is_word_start(c) => self.word_token(ind, c),
        _ => Err(ParseError::UnexpectedToken { position: ind }),
      };
      return Some(tok);
    }
  }
}

fn is_word_start(c: char) -> bool {
  c.is_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
  c.is_alphanumeric() || c == '_'
}
