use crate::error::BuildError;
use std::fmt::Display;
use std::str::FromStr;

/// A variable name. Always a non-empty identifier: a letter or `_`
/// followed by letters, digits or `_`.
///
/// Deliberately narrower than an arbitrary opaque symbol: anything that
/// is not an identifier is rejected with `InvalidSymbol`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: &str) -> Result<Symbol, BuildError> {
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) if first.is_alphabetic() || first == '_' => {
                chars.all(|c| c.is_alphanumeric() || c == '_')
            }
            _ => false,
        };
        if valid {
            Ok(Symbol(name.to_string()))
        } else {
            Err(BuildError::InvalidSymbol {
                name: name.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::new(s)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
