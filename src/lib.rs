// Copyright 2018-2021 the Deno authors. All rights reserved. MIT license.

//! Parsing for `URLPattern` constructor strings.
//!
//! A constructor string like `https://example.com/:id` mixes URL syntax with
//! `path-to-regexp` style pattern syntax. This crate splits such a string
//! into the pattern strings for the individual URL components. It exposes the
//! underlying [tokenize] step as well, which turns a pattern string for a
//! single component into a flat token list.
//!
//! ```
//! use urlpattern_parser::parse_constructor_string;
//!
//! # fn main() -> Result<(), urlpattern_parser::Error> {
//! let init = parse_constructor_string("https://example.com/books/:id")?;
//! assert_eq!(init.protocol.as_deref(), Some("https"));
//! assert_eq!(init.hostname.as_deref(), Some("example.com"));
//! assert_eq!(init.pathname.as_deref(), Some("/books/:id"));
//! # Ok(())
//! # }
//! ```

mod canonicalize;
mod component;
mod constructor_parser;
mod error;
mod parser;
mod tokenizer;

use serde::Deserialize;
use serde::Serialize;

pub use constructor_parser::parse_constructor_string;
pub use error::Error;
pub use error::ParserError;
pub use error::TokenizerError;
pub use tokenizer::tokenize;
pub use tokenizer::Token;
pub use tokenizer::TokenType;
pub use tokenizer::TokenizePolicy;

// Ref: https://wicg.github.io/urlpattern/#dictdef-urlpatterninit
/// The component pattern strings extracted from a constructor string. A
/// component is `None` when the constructor string does not define it, which
/// leaves it open for a base URL to provide.
#[derive(Deserialize, Serialize, Clone, Default, Debug, Eq, PartialEq)]
pub struct UrlPatternInit {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub protocol: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub username: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub password: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hostname: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub port: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pathname: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub search: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hash: Option<String>,
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;

  use crate::parse_constructor_string;
  use crate::UrlPatternInit;

  #[derive(Deserialize)]
  struct ConstructorStringTestCase {
    pattern: String,
    expected: UrlPatternInit,
  }

  #[test]
  fn constructor_string_tests() {
    let testdata = include_str!("./testdata/constructor_string_tests.json");
    let test_cases: Vec<ConstructorStringTestCase> =
      serde_json::from_str(testdata).unwrap();
    for test_case in test_cases {
      let init = parse_constructor_string(&test_case.pattern)
        .unwrap_or_else(|err| {
          panic!("failed to parse '{}': {}", test_case.pattern, err)
        });
      assert_eq!(init, test_case.expected, "pattern: {}", test_case.pattern);
    }
  }
}
