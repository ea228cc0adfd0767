//! Endpoint newtype
//!
//! This module defines a simple newtype around a Url for demarking a GraphQL
//! endpoint. This allows overlaying validation and default behaviour on top
//! of the wrapped URL.

use std::ops::Deref;
use std::str::FromStr;

use url::Url;

/// A GraphQL endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint(Url);

impl Endpoint {
    /// Unwrap the endpoint into its inner URL
    pub fn into_inner(self) -> Url {
        self.0
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self(defaults::endpoint())
    }
}

impl FromStr for Endpoint {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Url::parse(s.trim()).map(Self)
    }
}

impl Deref for Endpoint {
    type Target = Url;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod defaults {
    use url::Url;

    pub(super) const ENDPOINT: &str = "https://countries.trevorblades.com/";

    pub(super) fn endpoint() -> Url {
        // SAFETY: This should always parse correctly and is considered a breaking
        // error otherwise. It is also explicitly tested in [test::default_endpoint_parses_correctly]
        #[allow(clippy::unwrap_used)]
        Url::parse(ENDPOINT).unwrap()
    }

    #[cfg(test)]
    mod test {
        use super::{ENDPOINT, endpoint};

        #[test]
        fn default_endpoint_parses_correctly() {
            assert_eq!(endpoint().as_str(), ENDPOINT);
        }
    }
}
