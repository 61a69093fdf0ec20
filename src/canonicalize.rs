// Copyright 2018-2021 the Deno authors. All rights reserved. MIT license.

use url::Url;

use crate::Error;

// Ref: https://wicg.github.io/urlpattern/#canonicalize-a-protocol
pub(crate) fn canonicalize_protocol(value: &str) -> Result<String, Error> {
  if value.is_empty() {
    return Ok(String::new());
  }
  Url::parse(&format!("{}://dummy.test", value))
    .map(|url| url.scheme().to_owned())
    .map_err(Error::Url)
}

#[cfg(test)]
mod tests {
  use super::canonicalize_protocol;

  #[test]
  fn protocol_is_lowercased() {
    assert_eq!(canonicalize_protocol("HTTPS").unwrap(), "https");
    assert_eq!(canonicalize_protocol("https").unwrap(), "https");
  }

  #[test]
  fn empty_protocol_passes_through() {
    assert_eq!(canonicalize_protocol("").unwrap(), "");
  }

  #[test]
  fn invalid_protocol_is_rejected() {
    assert!(canonicalize_protocol("might be").is_err());
  }
}
