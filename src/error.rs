// Copyright 2018-2021 the Deno authors. All rights reserved. MIT license.

use std::fmt;

use crate::tokenizer::TokenType;

/// A error occurring while splitting a pattern string into tokens, or while
/// parsing the token list into URL components.
pub enum Error {
  Tokenizer(TokenizerError, usize),
  Parser(ParserError),
  Url(url::ParseError),
  RegExp(regex::Error),
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Error::Tokenizer(err, pos) => {
        write!(f, "tokenizer error: {err} (at char {pos})")
      }
      Error::Parser(err) => write!(f, "parser error: {err}"),
      Error::Url(err) => err.fmt(f),
      Error::RegExp(err) => write!(f, "regexp error: {err}"),
    }
  }
}

impl std::error::Error for Error {}

impl fmt::Debug for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self, f)
  }
}

/// A tokenizing error. The position carried by [`Error::Tokenizer`] is the
/// byte offset of the character that introduced the failed construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizerError {
  TrailingEscape,
  InvalidChar(u8),
  MissingParameterName,
  MissingRegex,
  UnbalancedRegex,
  UnnamedCapturingGroup,
  RegexStartsWithQuestion,
}

impl fmt::Display for TokenizerError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::TrailingEscape => f.write_str("trailing escape character"),
      Self::InvalidChar(c) => write!(f, "invalid character 0x{c:02x}"),
      Self::MissingParameterName => f.write_str("missing parameter name"),
      Self::MissingRegex => f.write_str("missing regex"),
      Self::UnbalancedRegex => f.write_str("unbalanced regex"),
      Self::UnnamedCapturingGroup => {
        f.write_str("unnamed capturing groups are not allowed")
      }
      Self::RegexStartsWithQuestion => {
        f.write_str("regex cannot start with '?'")
      }
    }
  }
}

#[derive(Debug)]
pub enum ParserError {
  ExpectedToken(TokenType, TokenType, String),
  DuplicateName(String),
  Tokenize(String),
}

impl fmt::Display for ParserError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::ExpectedToken(expected_ty, found_ty, found_val) => {
        write!(
          f,
          "expected token {expected_ty:?}, found '{found_val}' of type {found_ty:?}"
        )
      }
      Self::DuplicateName(name) => {
        write!(f, "pattern contains duplicate name {name}")
      }
      Self::Tokenize(input) => {
        write!(
          f,
          "invalid input string '{input}', it unexpectedly fails to tokenize"
        )
      }
    }
  }
}
