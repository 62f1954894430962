//! Authentication chain newtype
//!
//! A chain lists identity ids leaf first and root last, joined by `;`.

use crate::constants::AUTH_CHAIN_SEPARATOR;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::ops::Deref;
use std::str::FromStr;

/// A validated, non-empty authentication chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthChain(String);

impl AuthChain {
    /// Parse a chain string, rejecting empty chains and empty segments
    pub fn parse(chain: impl Into<String>) -> Result<Self> {
        let chain = chain.into();
        if chain.trim().is_empty() {
            return Err(Error::invalid_argument(
                "auth_chain",
                "must not be empty or whitespace",
            ));
        }
        if chain
            .split(AUTH_CHAIN_SEPARATOR)
            .any(|id| id.trim().is_empty())
        {
            return Err(Error::invalid_argument(
                "auth_chain",
                format!("'{chain}' contains an empty identity"),
            ));
        }
        Ok(AuthChain(chain))
    }

    /// Build a chain from ids ordered leaf first
    pub fn from_ids<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(&AUTH_CHAIN_SEPARATOR.to_string());
        Self::parse(joined)
    }

    /// Ids in chain order, leaf first
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.split(AUTH_CHAIN_SEPARATOR)
    }

    /// The identity this chain authenticates
    pub fn leaf(&self) -> &str {
        self.ids().next().unwrap_or_default()
    }

    /// The trusted root the chain terminates at
    pub fn root(&self) -> &str {
        self.ids().last().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.ids().count()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for AuthChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for AuthChain {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for AuthChain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AuthChain {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<AuthChain> for String {
    fn from(chain: AuthChain) -> Self {
        chain.0
    }
}

impl PartialEq<str> for AuthChain {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AuthChain {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_iterate() {
        let chain: AuthChain = "leaf1;e2;e1;root".parse().unwrap();
        assert_eq!(
            chain.ids().collect::<Vec<_>>(),
            vec!["leaf1", "e2", "e1", "root"]
        );
        assert_eq!(chain.leaf(), "leaf1");
        assert_eq!(chain.root(), "root");
        assert_eq!(chain.len(), 4);
        assert_eq!(chain, "leaf1;e2;e1;root");
    }

    #[test]
    fn test_malformed_chains_rejected() {
        for bad in ["", "  ", "a;;b", ";a", "a;", "a; ;b"] {
            assert!(AuthChain::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_from_ids() {
        let chain = AuthChain::from_ids(["d1/m1", "d1", "root"]).unwrap();
        assert_eq!(chain.as_str(), "d1/m1;d1;root");
        assert!(AuthChain::from_ids(Vec::<String>::new()).is_err());
    }
}
