// Copyright 2018-2021 the Deno authors. All rights reserved. MIT license.

use crate::canonicalize;
use crate::error::ParserError;
use crate::parser::Options;
use crate::tokenizer::tokenize;
use crate::tokenizer::Token;
use crate::tokenizer::TokenType;
use crate::tokenizer::TokenizePolicy;
use crate::Error;
use crate::UrlPatternInit;

// Ref: https://wicg.github.io/urlpattern/#constructor-string-parser-state
#[derive(Debug, Eq, PartialEq)]
enum ConstructorStringParserState {
  Protocol,
  Hostname,
  Port,
  Pathname,
  Search,
  Hash,
  Done,
}

// Ref: https://wicg.github.io/urlpattern/#constructor-string-parser
struct ConstructorStringParser<'a> {
  input: &'a str,
  token_list: Vec<Token>,
  result: UrlPatternInit,
  component_start: usize,
  token_index: usize,
  in_group: bool,
  should_treat_as_standard_url: bool,
  state: ConstructorStringParserState,
}

impl<'a> ConstructorStringParser<'a> {
  // Ref: https://wicg.github.io/urlpattern/#get-a-safe-token
  fn safe_token(&self, index: usize) -> &Token {
    if index < self.token_list.len() {
      &self.token_list[index]
    } else {
      // tokenize() guarantees a trailing end token.
      self.token_list.last().unwrap()
    }
  }

  // Ref: https://wicg.github.io/urlpattern/#is-a-non-special-pattern-char
  fn is_non_special_pattern_char(&self, index: usize, value: &str) -> bool {
    let token = self.safe_token(index);
    token.value == value
      && matches!(
        token.kind,
        TokenType::Char | TokenType::EscapedChar | TokenType::InvalidChar
      )
  }

  // Ref: https://wicg.github.io/urlpattern/#is-a-protocol-suffix
  #[inline]
  fn is_protocol_suffix(&self, index: usize) -> bool {
    self.is_non_special_pattern_char(index, ":")
  }

  // Ref: https://wicg.github.io/urlpattern/#is-a-port-prefix
  #[inline]
  fn is_port_prefix(&self) -> bool {
    self.is_non_special_pattern_char(self.token_index, ":")
  }

  // Ref: https://wicg.github.io/urlpattern/#is-a-pathname-start
  #[inline]
  fn is_pathname_start(&self) -> bool {
    self.is_non_special_pattern_char(self.token_index, "/")
  }

  // Ref: https://wicg.github.io/urlpattern/#is-a-search-prefix
  fn is_search_prefix(&self) -> bool {
    if self.is_non_special_pattern_char(self.token_index, "?") {
      return true;
    }
    if self.token_list[self.token_index].value != "?" {
      return false;
    }

    // The `?` was tokenized as a modifier. It only terminates the current
    // component when it does not directly follow a name, regex, group close,
    // or wildcard, i.e. when it could not be a modifier for anything. A
    // pattern cannot begin with an unescaped modifier, so a leading `?` is
    // always a literal search prefix.
    if self.token_index == 0 {
      return true;
    }
    let previous_token = &self.token_list[self.token_index - 1];
    !matches!(
      previous_token.kind,
      TokenType::Name
        | TokenType::Regexp
        | TokenType::Close
        | TokenType::Asterisk
    )
  }

  // Ref: https://wicg.github.io/urlpattern/#is-a-hash-prefix
  #[inline]
  fn is_hash_prefix(&self) -> bool {
    self.is_non_special_pattern_char(self.token_index, "#")
  }

  // Ref: https://wicg.github.io/urlpattern/#is-a-group-open
  #[inline]
  fn is_group_open(&self) -> bool {
    self.token_list[self.token_index].kind == TokenType::Open
  }

  // Ref: https://wicg.github.io/urlpattern/#is-a-group-close
  #[inline]
  fn is_group_close(&self) -> bool {
    self.token_list[self.token_index].kind == TokenType::Close
  }

  // Ref: https://wicg.github.io/urlpattern/#next-is-authority-slashes
  #[inline]
  fn next_is_authority_slashes(&self) -> bool {
    self.is_non_special_pattern_char(self.token_index + 1, "/")
      && self.is_non_special_pattern_char(self.token_index + 2, "/")
  }

  // Ref: https://wicg.github.io/urlpattern/#make-a-component-string
  //
  // The component string is the raw source text between the start of the
  // component and the token that triggered the state change.
  fn make_component_string(&self) -> String {
    let token = &self.token_list[self.token_index];
    self.input[self.component_start..token.index].to_string()
  }

  // Ref: https://wicg.github.io/urlpattern/#change-state
  fn change_state(
    &mut self,
    new_state: ConstructorStringParserState,
    skip: usize,
  ) {
    // The component string belongs to the state being exited.
    match self.state {
      ConstructorStringParserState::Protocol => {
        self.result.protocol = Some(self.make_component_string())
      }
      ConstructorStringParserState::Hostname => {
        self.result.hostname = Some(self.make_component_string())
      }
      ConstructorStringParserState::Port => {
        self.result.port = Some(self.make_component_string())
      }
      ConstructorStringParserState::Pathname => {
        self.result.pathname = Some(self.make_component_string())
      }
      ConstructorStringParserState::Search => {
        self.result.search = Some(self.make_component_string())
      }
      ConstructorStringParserState::Hash => {
        self.result.hash = Some(self.make_component_string())
      }
      ConstructorStringParserState::Done => unreachable!(),
    }

    self.state = new_state;

    // `skip` counts the separator tokens to ignore before the next component
    // starts. A skip of zero means the trigger token itself begins the new
    // component. The main loop increments `token_index` once per iteration,
    // so it is only advanced here for skips past the trigger token.
    self.component_start = self.safe_token(self.token_index + skip).index;
    if skip > 1 {
      self.token_index += skip - 1;
    }
  }

  // Ref: https://wicg.github.io/urlpattern/#compute-should-treat-as-a-standard-url
  fn compute_should_treat_as_standard_url(&mut self) -> Result<(), Error> {
    let protocol_string = self.make_component_string();
    let protocol_component = crate::component::Component::compile(
      &protocol_string,
      canonicalize::canonicalize_protocol,
      &Options::default(),
    )?;
    if protocol_component.protocol_component_matches_special_scheme() {
      self.should_treat_as_standard_url = true;
    }
    Ok(())
  }
}

// Ref: https://wicg.github.io/urlpattern/#parse-a-constructor-string
/// Split a constructor string like `https://example.com/:id` into the
/// pattern strings for the individual URL components.
pub fn parse_constructor_string(
  input: &str,
) -> Result<UrlPatternInit, Error> {
  let token_list = tokenize(input, TokenizePolicy::Lenient)
    .map_err(|_| Error::Parser(ParserError::Tokenize(input.to_string())))?;

  // A constructor string defines every component it touches as either the
  // empty string or a longer value, since there is no way to simply leave
  // out a component when writing a URL. The components following the first
  // one in a relative pattern are therefore initialized to the empty string
  // in advance. Earlier components stay unset so that a base URL can later
  // provide them.
  let mut parser = ConstructorStringParser {
    input,
    token_list,
    result: UrlPatternInit {
      pathname: Some(String::new()),
      search: Some(String::new()),
      hash: Some(String::new()),
      ..Default::default()
    },
    component_start: 0,
    token_index: 0,
    in_group: false,
    should_treat_as_standard_url: false,
    state: ConstructorStringParserState::Pathname,
  };

  // Scan for a protocol `:` terminator, which must have survived the
  // tokenizer as a plain, escaped, or invalid character. This automatically
  // works for `https://` because a name cannot start with a `/`, but inputs
  // without the slashes need to escape the colon, e.g. `data\\:foo`. If the
  // terminator is found the pattern is absolute: nothing can be inherited
  // from a base URL, so all components default to the empty string.
  for index in 0..parser.token_list.len() {
    if parser.is_protocol_suffix(index) {
      parser.state = ConstructorStringParserState::Protocol;
      parser.result.protocol = Some(String::new());
      parser.result.username = Some(String::new());
      parser.result.password = Some(String::new());
      parser.result.hostname = Some(String::new());
      parser.result.port = Some(String::new());
      break;
    }
  }

  while parser.token_index < parser.token_list.len() {
    // The tokenizer guarantees that the last token has the end type.
    if parser.token_list[parser.token_index].kind == TokenType::End {
      parser.change_state(ConstructorStringParserState::Done, 0);
      break;
    }

    // A component cannot end in the middle of a `{...}` pattern group, so
    // tokens inside one are never inspected for structural meaning. Grouping
    // of `(...)` and `:name` is already handled by the tokenizer.
    if parser.in_group {
      if parser.is_group_close() {
        parser.in_group = false;
      } else {
        parser.token_index += 1;
        continue;
      }
    }

    if parser.is_group_open() {
      parser.in_group = true;
      parser.token_index += 1;
      continue;
    }

    match parser.state {
      ConstructorStringParserState::Protocol => {
        if parser.is_protocol_suffix(parser.token_index) {
          // Eagerly compile the protocol pattern to compute whether this
          // pattern should be treated as a "standard" URL. Standard URLs
          // imply an authority and default to `/` for the pathname.
          parser.compute_should_treat_as_standard_url()?;
          if parser.should_treat_as_standard_url {
            parser.result.pathname = Some(String::from("/"));
          }

          // Without authority slashes and a special scheme this is a
          // "cannot-be-a-base-URL" pattern: parsing continues directly with
          // the pathname, and hostname and port keep their empty defaults.
          let mut next_state = ConstructorStringParserState::Pathname;
          let mut skip = 1;
          if parser.next_is_authority_slashes() {
            next_state = ConstructorStringParserState::Hostname;
            skip = 3;
          } else if parser.should_treat_as_standard_url {
            next_state = ConstructorStringParserState::Hostname;
          }
          parser.change_state(next_state, skip);
        }
      }
      ConstructorStringParserState::Hostname => {
        if parser.is_port_prefix() {
          parser.change_state(ConstructorStringParserState::Port, 1);
        } else if parser.is_pathname_start() {
          parser.change_state(ConstructorStringParserState::Pathname, 0);
        } else if parser.is_search_prefix() {
          parser.change_state(ConstructorStringParserState::Search, 1);
        } else if parser.is_hash_prefix() {
          parser.change_state(ConstructorStringParserState::Hash, 1);
        }
      }
      ConstructorStringParserState::Port => {
        if parser.is_pathname_start() {
          parser.change_state(ConstructorStringParserState::Pathname, 0);
        } else if parser.is_search_prefix() {
          parser.change_state(ConstructorStringParserState::Search, 1);
        } else if parser.is_hash_prefix() {
          parser.change_state(ConstructorStringParserState::Hash, 1);
        }
      }
      ConstructorStringParserState::Pathname => {
        if parser.is_search_prefix() {
          parser.change_state(ConstructorStringParserState::Search, 1);
        } else if parser.is_hash_prefix() {
          parser.change_state(ConstructorStringParserState::Hash, 1);
        }
      }
      ConstructorStringParserState::Search => {
        if parser.is_hash_prefix() {
          parser.change_state(ConstructorStringParserState::Hash, 1);
        }
      }
      ConstructorStringParserState::Hash => {}
      ConstructorStringParserState::Done => unreachable!(),
    }

    parser.token_index += 1;
  }

  Ok(parser.result)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::TokenizerError;

  fn init(
    protocol: Option<&str>,
    hostname: Option<&str>,
    port: Option<&str>,
    pathname: &str,
    search: &str,
    hash: &str,
  ) -> UrlPatternInit {
    UrlPatternInit {
      protocol: protocol.map(str::to_owned),
      username: protocol.map(|_| String::new()),
      password: protocol.map(|_| String::new()),
      hostname: hostname.map(str::to_owned),
      port: port.map(str::to_owned),
      pathname: Some(pathname.to_owned()),
      search: Some(search.to_owned()),
      hash: Some(hash.to_owned()),
    }
  }

  #[test]
  fn absolute_url_pattern() {
    assert_eq!(
      parse_constructor_string("https://example.com/foo").unwrap(),
      init(Some("https"), Some("example.com"), Some(""), "/foo", "", "")
    );
  }

  #[test]
  fn standard_scheme_defaults_pathname_to_slash() {
    assert_eq!(
      parse_constructor_string("http://example.com").unwrap(),
      init(Some("http"), Some("example.com"), Some(""), "/", "", "")
    );
  }

  #[test]
  fn standard_scheme_without_authority_slashes() {
    // A special scheme still gets an authority even without `//`.
    assert_eq!(
      parse_constructor_string("http\\:foo.example").unwrap(),
      init(Some("http"), Some("foo.example"), Some(""), "/", "", "")
    );
  }

  #[test]
  fn opaque_scheme_goes_straight_to_pathname() {
    // The colon of a scheme like `data:` must be escaped, since `:foo`
    // would otherwise lex as a name token.
    assert_eq!(
      parse_constructor_string("data\\:foo").unwrap(),
      init(Some("data"), Some(""), Some(""), "foo", "", "")
    );
  }

  #[test]
  fn unescaped_opaque_scheme_is_a_relative_pattern() {
    assert_eq!(
      parse_constructor_string("data:foo").unwrap(),
      init(None, None, None, "data:foo", "", "")
    );
  }

  #[test]
  fn relative_pattern_defaults() {
    assert_eq!(
      parse_constructor_string("").unwrap(),
      init(None, None, None, "", "", "")
    );
    assert_eq!(
      parse_constructor_string("/foo/bar").unwrap(),
      init(None, None, None, "/foo/bar", "", "")
    );
  }

  #[test]
  fn relative_search_and_hash() {
    assert_eq!(
      parse_constructor_string("?q#f").unwrap(),
      init(None, None, None, "", "q", "f")
    );
    assert_eq!(
      parse_constructor_string("#frag").unwrap(),
      init(None, None, None, "", "", "frag")
    );
  }

  #[test]
  fn port_component() {
    assert_eq!(
      parse_constructor_string("https://example.com:8080/foo?bar#baz")
        .unwrap(),
      init(
        Some("https"),
        Some("example.com"),
        Some("8080"),
        "/foo",
        "bar",
        "baz"
      )
    );
  }

  #[test]
  fn question_mark_after_name_is_a_modifier() {
    assert_eq!(
      parse_constructor_string("https://example.com/:id?mode").unwrap(),
      init(
        Some("https"),
        Some("example.com"),
        Some(""),
        "/:id?mode",
        "",
        ""
      )
    );
  }

  #[test]
  fn question_mark_after_plain_char_is_the_search_prefix() {
    assert_eq!(
      parse_constructor_string("https://example.com/foo?bar").unwrap(),
      init(
        Some("https"),
        Some("example.com"),
        Some(""),
        "/foo",
        "bar",
        ""
      )
    );
  }

  #[test]
  fn group_contents_are_opaque() {
    // The `?` and `#` inside the group must not split components, and the
    // `?` after the group close is a modifier.
    assert_eq!(
      parse_constructor_string("/books/{q?r#s}?").unwrap(),
      init(None, None, None, "/books/{q?r#s}?", "", "")
    );
  }

  #[test]
  fn pattern_group_in_protocol() {
    assert_eq!(
      parse_constructor_string("http{s}?://example.com/").unwrap(),
      init(Some("http{s}?"), Some("example.com"), Some(""), "/", "", "")
    );
  }

  #[test]
  fn wildcard_protocol_is_standard() {
    assert_eq!(
      parse_constructor_string("*://example.com/").unwrap(),
      init(Some("*"), Some("example.com"), Some(""), "/", "", "")
    );
  }

  #[test]
  fn protocol_compile_failure_propagates() {
    // `h(9` survives lenient tokenizing, but the strict re-tokenize inside
    // the protocol compile rejects the unbalanced regex.
    let err = parse_constructor_string("h(9:1").unwrap_err();
    assert!(matches!(
      err,
      Error::Tokenizer(TokenizerError::UnbalancedRegex, 1)
    ));
  }
}
