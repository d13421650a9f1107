use std::{fmt::Display, str::FromStr};

use alloy::primitives::Address;

/// What the user typed into the search box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchQuery {
    Address(Address),
    /// Lowercased ENS name ending in `.eth`.
    Ens(String),
}

impl SearchQuery {
    pub fn parse(input: &str) -> crate::Result<Self> {
        let input = input.trim();

        if input.starts_with("0x") || input.starts_with("0X") {
            return Address::from_str(input)
                .map(SearchQuery::Address)
                .map_err(|_| crate::Error::InvalidAddress(input.to_string()));
        }

        let name = input.to_lowercase();
        if name.len() > ".eth".len() && name.ends_with(".eth") && !name.contains(char::is_whitespace)
        {
            return Ok(SearchQuery::Ens(name));
        }

        Err(crate::Error::InvalidSearchQuery(input.to_string()))
    }

    pub fn ens_name(&self) -> Option<&str> {
        match self {
            SearchQuery::Address(_) => None,
            SearchQuery::Ens(name) => Some(name),
        }
    }
}

impl FromStr for SearchQuery {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchQuery::parse(s)
    }
}

impl Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchQuery::Address(address) => write!(f, "{address}"),
            SearchQuery::Ens(name) => write!(f, "{name}"),
        }
    }
}
