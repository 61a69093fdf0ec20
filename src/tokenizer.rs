// Copyright 2018-2021 the Deno authors. All rights reserved. MIT license.

use crate::error::TokenizerError;
use crate::Error;

// Ref: https://wicg.github.io/urlpattern/#tokens
// Ref: https://wicg.github.io/urlpattern/#tokenizing

// Ref: https://wicg.github.io/urlpattern/#token-type
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TokenType {
  Open,
  Close,
  Regexp,
  Name,
  Char,
  EscapedChar,
  OtherModifier,
  Asterisk,
  End,
  InvalidChar,
}

// Ref: https://wicg.github.io/urlpattern/#token
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token {
  pub kind: TokenType,
  pub index: usize,
  pub value: String,
}

// Ref: https://wicg.github.io/urlpattern/#tokenize-policy
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum TokenizePolicy {
  Strict,
  Lenient,
}

struct Tokenizer {
  policy: TokenizePolicy,
  token_list: Vec<Token>,
}

impl Tokenizer {
  fn add_token(&mut self, kind: TokenType, index: usize, value: &str) {
    self.token_list.push(Token {
      kind,
      index,
      value: value.to_owned(),
    });
  }

  // Ref: https://wicg.github.io/urlpattern/#process-a-tokenizing-error
  //
  // In strict mode the whole call fails. In lenient mode the character that
  // introduced the failed construct becomes an invalid-char token and
  // scanning resumes directly after it.
  fn process_tokenizing_error(
    &mut self,
    error: TokenizerError,
    pos: usize,
    index: usize,
    value: &str,
  ) -> Result<(), Error> {
    if self.policy == TokenizePolicy::Strict {
      Err(Error::Tokenizer(error, pos))
    } else {
      self.add_token(TokenType::InvalidChar, index, value);
      Ok(())
    }
  }
}

// Ref: https://wicg.github.io/urlpattern/#is-a-valid-name-code-point
//
// Group names follow the same character restrictions as javascript
// identifiers, except that escaped unicode sequences are not supported.
#[inline]
fn is_valid_name_codepoint(code_point: char, first: bool) -> bool {
  if first {
    unic_ucd_ident::is_id_start(code_point)
      || code_point == '$'
      || code_point == '_'
  } else {
    unic_ucd_ident::is_id_continue(code_point)
      || code_point == '$'
      || code_point == '_'
      || code_point == '\u{200c}'
      || code_point == '\u{200d}'
  }
}

// Ref: https://wicg.github.io/urlpattern/#tokenize
/// Split a pattern string into a list of tokens. The returned list is never
/// empty and always ends in a single [`TokenType::End`] token whose index is
/// the length of the input.
pub fn tokenize(
  input: &str,
  policy: TokenizePolicy,
) -> Result<Vec<Token>, Error> {
  let mut tokenizer = Tokenizer {
    policy,
    token_list: Vec::with_capacity(input.len() + 1),
  };
  let bytes = input.as_bytes();

  // The structural characters are all ASCII, so the scan can walk byte by
  // byte. Multi byte sequences are only decoded while lexing a name.
  let mut i = 0;
  while i < bytes.len() {
    let c = bytes[i];

    if c == b'*' {
      tokenizer.add_token(TokenType::Asterisk, i, &input[i..i + 1]);
      i += 1;
      continue;
    }

    if c == b'+' || c == b'?' {
      tokenizer.add_token(TokenType::OtherModifier, i, &input[i..i + 1]);
      i += 1;
      continue;
    }

    // An escape sequence always escapes a single following character at the
    // level of the pattern.
    if c == b'\\' {
      if i == bytes.len() - 1 {
        tokenizer.process_tokenizing_error(
          TokenizerError::TrailingEscape,
          i,
          i,
          &input[i..=i],
        )?;
        i += 1;
        continue;
      }
      if !bytes[i + 1].is_ascii() {
        tokenizer.process_tokenizing_error(
          TokenizerError::InvalidChar(bytes[i + 1]),
          i,
          i,
          &input[i..=i],
        )?;
        i += 1;
        continue;
      }
      tokenizer.add_token(TokenType::EscapedChar, i, &input[i + 1..i + 2]);
      i += 2;
      continue;
    }

    if c == b'{' {
      tokenizer.add_token(TokenType::Open, i, &input[i..i + 1]);
      i += 1;
      continue;
    }

    if c == b'}' {
      tokenizer.add_token(TokenType::Close, i, &input[i..i + 1]);
      i += 1;
      continue;
    }

    if c == b':' {
      let name_start = i + 1;
      let mut pos = name_start;
      while pos < input.len() {
        let code_point = input[pos..].chars().next().unwrap();
        if !is_valid_name_codepoint(code_point, pos == name_start) {
          break;
        }
        pos += code_point.len_utf8();
      }
      if pos <= name_start {
        tokenizer.process_tokenizing_error(
          TokenizerError::MissingParameterName,
          i,
          i,
          &input[i..=i],
        )?;
        i += 1;
        continue;
      }
      tokenizer.add_token(TokenType::Name, i, &input[name_start..pos]);
      i = pos;
      continue;
    }

    if c == b'(' {
      let mut paren_nesting = 1;
      let mut j = i + 1;
      let regex_start = j;
      let mut error = None;

      while j < bytes.len() {
        if !bytes[j].is_ascii() {
          error = Some((TokenizerError::InvalidChar(bytes[j]), j));
          break;
        }
        if j == regex_start && bytes[j] == b'?' {
          error = Some((TokenizerError::RegexStartsWithQuestion, j));
          break;
        }

        // Only single character escapes need to be understood here, since
        // escaped parens are all that matter for the nesting count. The `\`
        // is kept verbatim in the captured value, so longer sequences like
        // `\x22` pass through to the embedded regex untouched.
        if bytes[j] == b'\\' {
          if j == bytes.len() - 1 {
            error = Some((TokenizerError::TrailingEscape, j));
            break;
          }
          if !bytes[j + 1].is_ascii() {
            error = Some((TokenizerError::InvalidChar(bytes[j + 1]), j));
            break;
          }
          j += 2;
          continue;
        }

        if bytes[j] == b')' {
          paren_nesting -= 1;
          if paren_nesting == 0 {
            j += 1;
            break;
          }
        } else if bytes[j] == b'(' {
          paren_nesting += 1;
          if j == bytes.len() - 1 {
            error = Some((TokenizerError::UnbalancedRegex, i));
            break;
          }
          // The first character after a nested open paren must be `?`. This
          // permits assertions, named capture groups, and non-capturing
          // groups, but blocks unnamed capture groups.
          if bytes[j + 1] != b'?' {
            error = Some((TokenizerError::UnnamedCapturingGroup, j));
            break;
          }
        }

        j += 1;
      }

      if let Some((error, pos)) = error {
        tokenizer.process_tokenizing_error(error, pos, i, &input[i..=i])?;
        i += 1;
        continue;
      }
      if paren_nesting != 0 {
        tokenizer.process_tokenizing_error(
          TokenizerError::UnbalancedRegex,
          i,
          i,
          &input[i..=i],
        )?;
        i += 1;
        continue;
      }
      let regex_length = j - regex_start - 1;
      if regex_length == 0 {
        tokenizer.process_tokenizing_error(
          TokenizerError::MissingRegex,
          i,
          i,
          &input[i..=i],
        )?;
        i += 1;
        continue;
      }
      tokenizer.add_token(
        TokenType::Regexp,
        i,
        &input[regex_start..regex_start + regex_length],
      );
      i = j;
      continue;
    }

    if !c.is_ascii() {
      let code_point = input[i..].chars().next().unwrap();
      tokenizer.process_tokenizing_error(
        TokenizerError::InvalidChar(c),
        i,
        i,
        &input[i..i + code_point.len_utf8()],
      )?;
      i += code_point.len_utf8();
      continue;
    }
    tokenizer.add_token(TokenType::Char, i, &input[i..i + 1]);
    i += 1;
  }

  tokenizer.add_token(TokenType::End, i, "");
  Ok(tokenizer.token_list)
}
