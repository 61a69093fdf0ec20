// Copyright 2018-2021 the Deno authors. All rights reserved. MIT license.

use std::fmt;

use crate::error::ParserError;
use crate::tokenizer::tokenize;
use crate::tokenizer::Token;
use crate::tokenizer::TokenType;
use crate::tokenizer::TokenizePolicy;
use crate::Error;

// Ref: https://wicg.github.io/urlpattern/#full-wildcard-regexp-value
pub(crate) const FULL_WILDCARD_REGEXP_VALUE: &str = ".*";

// Ref: https://wicg.github.io/urlpattern/#options-header
#[derive(Default)]
pub(crate) struct Options {
  pub delimiter_code_point: String,
  pub prefix_code_point: String,
}

impl Options {
  // Ref: https://wicg.github.io/urlpattern/#generate-a-segment-wildcard-regexp
  pub(crate) fn generate_segment_wildcard_regexp(&self) -> String {
    if self.delimiter_code_point.is_empty() {
      // `[^]` is ECMAScript syntax that the regex crate rejects, so an
      // explicit any-char class stands in for the empty negated class.
      String::from("[\\s\\S]+?")
    } else {
      format!("[^{}]+?", escape_regexp_string(&self.delimiter_code_point))
    }
  }
}

// Ref: https://wicg.github.io/urlpattern/#part-type
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum PartType {
  FixedText,
  Regexp,
  SegmentWildcard,
  FullWildcard,
}

// Ref: https://wicg.github.io/urlpattern/#part-modifier
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum PartModifier {
  None,
  Optional,
  ZeroOrMore,
  OneOrMore,
}

impl fmt::Display for PartModifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      PartModifier::None => "",
      PartModifier::Optional => "?",
      PartModifier::ZeroOrMore => "*",
      PartModifier::OneOrMore => "+",
    })
  }
}

// Ref: https://wicg.github.io/urlpattern/#part
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Part {
  pub kind: PartType,
  pub value: String,
  pub modifier: PartModifier,
  pub name: String,
  pub prefix: String,
  pub suffix: String,
}

impl Part {
  fn new(kind: PartType, value: String, modifier: PartModifier) -> Self {
    Self {
      kind,
      value,
      modifier,
      name: String::new(),
      prefix: String::new(),
      suffix: String::new(),
    }
  }
}

// Ref: https://wicg.github.io/urlpattern/#pattern-parser
struct PatternParser<F>
where
  F: Fn(&str) -> Result<String, Error>,
{
  token_list: Vec<Token>,
  encoding_callback: F,
  segment_wildcard_regexp: String,
  part_list: Vec<Part>,
  pending_fixed_value: String,
  index: usize,
  next_numeric_name: usize,
}

impl<F> PatternParser<F>
where
  F: Fn(&str) -> Result<String, Error>,
{
  // Ref: https://wicg.github.io/urlpattern/#try-to-consume-a-token
  fn try_consume_token(&mut self, kind: TokenType) -> Option<Token> {
    assert!(self.index < self.token_list.len());
    let next_token = &self.token_list[self.index];
    if next_token.kind != kind {
      None
    } else {
      let token = next_token.clone();
      self.index += 1;
      Some(token)
    }
  }

  // Ref: https://wicg.github.io/urlpattern/#try-to-consume-a-regexp-or-wildcard-token
  fn try_consume_regexp_or_wildcard_token(
    &mut self,
    name_token: &Option<Token>,
  ) -> Option<Token> {
    let mut token = self.try_consume_token(TokenType::Regexp);
    if name_token.is_none() && token.is_none() {
      token = self.try_consume_token(TokenType::Asterisk);
    }
    token
  }

  // Ref: https://wicg.github.io/urlpattern/#try-to-consume-a-modifier-token
  fn try_consume_modifier_token(&mut self) -> Option<Token> {
    self
      .try_consume_token(TokenType::OtherModifier)
      .or_else(|| self.try_consume_token(TokenType::Asterisk))
  }

  // Ref: https://wicg.github.io/urlpattern/#consume-a-required-token
  fn consume_required_token(
    &mut self,
    kind: TokenType,
  ) -> Result<Token, Error> {
    if let Some(token) = self.try_consume_token(kind.clone()) {
      return Ok(token);
    }
    let next_token = &self.token_list[self.index];
    Err(Error::Parser(ParserError::ExpectedToken(
      kind,
      next_token.kind.clone(),
      next_token.value.clone(),
    )))
  }

  // Ref: https://wicg.github.io/urlpattern/#consume-text
  fn consume_text(&mut self) -> String {
    let mut result = String::new();
    loop {
      let token = self
        .try_consume_token(TokenType::Char)
        .or_else(|| self.try_consume_token(TokenType::EscapedChar));
      match token {
        Some(token) => result.push_str(&token.value),
        None => break,
      }
    }
    result
  }

  // Ref: https://wicg.github.io/urlpattern/#maybe-add-a-part-from-the-pending-fixed-value
  fn maybe_add_part_from_pending_fixed_value(&mut self) -> Result<(), Error> {
    if self.pending_fixed_value.is_empty() {
      return Ok(());
    }
    let encoded_value = (self.encoding_callback)(&self.pending_fixed_value)?;
    self.pending_fixed_value = String::new();
    self.part_list.push(Part::new(
      PartType::FixedText,
      encoded_value,
      PartModifier::None,
    ));
    Ok(())
  }

  // Ref: https://wicg.github.io/urlpattern/#add-a-part
  fn add_part(
    &mut self,
    prefix: &str,
    name_token: Option<&Token>,
    regexp_or_wildcard_token: Option<&Token>,
    suffix: &str,
    modifier_token: Option<&Token>,
  ) -> Result<(), Error> {
    let mut modifier = PartModifier::None;
    if let Some(modifier_token) = modifier_token {
      modifier = match modifier_token.value.as_ref() {
        "?" => PartModifier::Optional,
        "*" => PartModifier::ZeroOrMore,
        "+" => PartModifier::OneOrMore,
        _ => unreachable!(),
      };
    }

    if name_token.is_none()
      && regexp_or_wildcard_token.is_none()
      && modifier == PartModifier::None
    {
      self.pending_fixed_value.push_str(prefix);
      return Ok(());
    }

    self.maybe_add_part_from_pending_fixed_value()?;

    if name_token.is_none() && regexp_or_wildcard_token.is_none() {
      assert!(suffix.is_empty());
      if prefix.is_empty() {
        return Ok(());
      }
      let encoded_value = (self.encoding_callback)(prefix)?;
      self.part_list.push(Part::new(
        PartType::FixedText,
        encoded_value,
        modifier,
      ));
      return Ok(());
    }

    let mut regexp_value: &str = if regexp_or_wildcard_token.is_none() {
      &self.segment_wildcard_regexp
    } else if regexp_or_wildcard_token.unwrap().kind == TokenType::Asterisk {
      FULL_WILDCARD_REGEXP_VALUE
    } else {
      &regexp_or_wildcard_token.unwrap().value
    };

    let mut kind = PartType::Regexp;
    if regexp_value == self.segment_wildcard_regexp {
      kind = PartType::SegmentWildcard;
      regexp_value = "";
    } else if regexp_value == FULL_WILDCARD_REGEXP_VALUE {
      kind = PartType::FullWildcard;
      regexp_value = "";
    }

    let mut name = String::new();
    if let Some(name_token) = name_token {
      name = name_token.value.to_owned();
    } else if regexp_or_wildcard_token.is_some() {
      name = self.next_numeric_name.to_string();
      self.next_numeric_name += 1;
    }
    if !name.is_empty() && self.part_list.iter().any(|part| part.name == name)
    {
      return Err(Error::Parser(ParserError::DuplicateName(name)));
    }

    let encoded_prefix = (self.encoding_callback)(prefix)?;
    let encoded_suffix = (self.encoding_callback)(suffix)?;
    self.part_list.push(Part {
      kind,
      value: regexp_value.to_owned(),
      modifier,
      name,
      prefix: encoded_prefix,
      suffix: encoded_suffix,
    });
    Ok(())
  }
}

// Ref: https://wicg.github.io/urlpattern/#parse-a-pattern-string
pub(crate) fn parse_pattern_string<F>(
  input: &str,
  options: &Options,
  encoding_callback: F,
) -> Result<Vec<Part>, Error>
where
  F: Fn(&str) -> Result<String, Error>,
{
  let mut parser = PatternParser {
    token_list: tokenize(input, TokenizePolicy::Strict)?,
    encoding_callback,
    segment_wildcard_regexp: options.generate_segment_wildcard_regexp(),
    part_list: vec![],
    pending_fixed_value: String::new(),
    index: 0,
    next_numeric_name: 0,
  };

  while parser.index < parser.token_list.len() {
    let char_token = parser.try_consume_token(TokenType::Char);
    let name_token = parser.try_consume_token(TokenType::Name);
    let mut regexp_or_wildcard_token =
      parser.try_consume_regexp_or_wildcard_token(&name_token);

    if name_token.is_some() || regexp_or_wildcard_token.is_some() {
      // A matching group. A single char before it is only kept as the part
      // prefix when it is the component's designated prefix code point,
      // e.g. `/` for pathnames.
      let mut prefix = "";
      if let Some(char_token) = &char_token {
        prefix = &char_token.value;
      }
      if !prefix.is_empty() && prefix != options.prefix_code_point {
        parser.pending_fixed_value.push_str(prefix);
        prefix = "";
      }
      parser.maybe_add_part_from_pending_fixed_value()?;
      let modifier_token = parser.try_consume_modifier_token();
      parser.add_part(
        prefix,
        name_token.as_ref(),
        regexp_or_wildcard_token.as_ref(),
        "",
        modifier_token.as_ref(),
      )?;
      continue;
    }

    let mut fixed_token = char_token;
    if fixed_token.is_none() {
      fixed_token = parser.try_consume_token(TokenType::EscapedChar);
    }
    if let Some(fixed_token) = fixed_token {
      parser.pending_fixed_value.push_str(&fixed_token.value);
      continue;
    }

    let open_token = parser.try_consume_token(TokenType::Open);
    if open_token.is_some() {
      let prefix = parser.consume_text();
      let name_token = parser.try_consume_token(TokenType::Name);
      regexp_or_wildcard_token =
        parser.try_consume_regexp_or_wildcard_token(&name_token);
      let suffix = parser.consume_text();
      parser.consume_required_token(TokenType::Close)?;
      let modifier_token = parser.try_consume_modifier_token();
      parser.add_part(
        &prefix,
        name_token.as_ref(),
        regexp_or_wildcard_token.as_ref(),
        &suffix,
        modifier_token.as_ref(),
      )?;
      continue;
    }

    parser.maybe_add_part_from_pending_fixed_value()?;
    parser.consume_required_token(TokenType::End)?;
    break;
  }

  Ok(parser.part_list)
}

// Ref: https://wicg.github.io/urlpattern/#escape-a-regexp-string
pub(crate) fn escape_regexp_string(input: &str) -> String {
  assert!(input.is_ascii());
  let mut result = String::new();
  for char in input.chars() {
    if matches!(
      char,
      '.'
        | '+'
        | '*'
        | '?'
        | '^'
        | '$'
        | '{'
        | '}'
        | '('
        | ')'
        | '['
        | ']'
        | '|'
        | '/'
        | '\\'
    ) {
      result.push('\\');
    }
    result.push(char);
  }
  result
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(input: &str) -> Result<Vec<Part>, Error> {
    parse_pattern_string(input, &Options::default(), |value| {
      Ok(value.to_string())
    })
  }

  #[test]
  fn fixed_text_and_named_group() {
    assert_eq!(
      parse("/foo/:bar").unwrap(),
      vec![
        Part::new(
          PartType::FixedText,
          String::from("/foo/"),
          PartModifier::None
        ),
        Part {
          kind: PartType::SegmentWildcard,
          value: String::new(),
          modifier: PartModifier::None,
          name: String::from("bar"),
          prefix: String::new(),
          suffix: String::new(),
        },
      ]
    );
  }

  #[test]
  fn regexp_group_gets_a_numeric_name() {
    assert_eq!(
      parse("(foo)").unwrap(),
      vec![Part {
        kind: PartType::Regexp,
        value: String::from("foo"),
        modifier: PartModifier::None,
        name: String::from("0"),
        prefix: String::new(),
        suffix: String::new(),
      }]
    );
  }

  #[test]
  fn full_wildcard() {
    assert_eq!(
      parse("*").unwrap(),
      vec![Part {
        kind: PartType::FullWildcard,
        value: String::new(),
        modifier: PartModifier::None,
        name: String::from("0"),
        prefix: String::new(),
        suffix: String::new(),
      }]
    );
  }

  #[test]
  fn group_with_modifier() {
    assert_eq!(
      parse("{bar}+").unwrap(),
      vec![Part::new(
        PartType::FixedText,
        String::from("bar"),
        PartModifier::OneOrMore
      )]
    );
  }

  #[test]
  fn duplicate_name_is_rejected() {
    let err = parse(":foo/:foo").unwrap_err();
    assert!(matches!(
      err,
      Error::Parser(ParserError::DuplicateName(name)) if name == "foo"
    ));
  }

  #[test]
  fn unclosed_group_is_rejected() {
    let err = parse("{foo").unwrap_err();
    assert!(matches!(
      err,
      Error::Parser(ParserError::ExpectedToken(
        TokenType::Close,
        TokenType::End,
        _
      ))
    ));
  }

  #[test]
  fn strict_tokenize_failures_propagate() {
    assert!(matches!(parse("(foo"), Err(Error::Tokenizer(_, 0))));
  }
}
