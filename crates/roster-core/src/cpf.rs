//! CPF identifiers.
//!
//! A [`Cpf`] only exists in normalized form: separators are stripped once,
//! when the value is parsed, and every comparison afterwards is an exact
//! match on the stored digits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CpfError;

/// Characters accepted as visual separators in formatted CPFs (`123.456.789-00`).
const SEPARATORS: [char; 2] = ['.', '-'];

/// A normalized (digits only) CPF.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    /// Normalize `input` and wrap it.
    ///
    /// Surrounding whitespace and any `.` / `-` separators are removed. The
    /// remainder must be a non-empty run of ASCII digits.
    pub fn parse(input: &str) -> Result<Self, CpfError> {
        let mut digits = String::with_capacity(input.len());
        for ch in input.trim().chars() {
            if ch.is_ascii_digit() {
                digits.push(ch);
            } else if !SEPARATORS.contains(&ch) {
                return Err(CpfError::InvalidCharacter {
                    input: input.to_string(),
                    found: ch,
                });
            }
        }

        if digits.is_empty() {
            return Err(CpfError::Empty);
        }

        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render as `XXX.XXX.XXX-XX` when the value has the usual eleven digits.
    pub fn formatted(&self) -> String {
        if self.0.len() != 11 {
            return self.0.clone();
        }
        format!(
            "{}.{}.{}-{}",
            &self.0[..3],
            &self.0[3..6],
            &self.0[6..9],
            &self.0[9..]
        )
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cpf {
    type Err = CpfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cpf::parse(s)
    }
}

impl TryFrom<String> for Cpf {
    type Error = CpfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Cpf::parse(&value)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}

impl AsRef<str> for Cpf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separators() {
        let cpf = Cpf::parse("123.456.789-00").unwrap();
        assert_eq!(cpf.as_str(), "12345678900");
        assert_eq!(cpf, "12345678900".parse::<Cpf>().unwrap());
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(Cpf::parse("  12345678900\n").unwrap().as_str(), "12345678900");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(Cpf::parse(""), Err(CpfError::Empty)));
        assert!(matches!(Cpf::parse(".-.-"), Err(CpfError::Empty)));
    }

    #[test]
    fn rejects_other_characters() {
        let err = Cpf::parse("123/456").unwrap_err();
        assert!(matches!(err, CpfError::InvalidCharacter { found: '/', .. }));
        assert!(Cpf::parse("123 456").is_err());
        assert!(Cpf::parse("abc").is_err());
    }

    #[test]
    fn formatted_output() {
        let cpf = Cpf::parse("12345678900").unwrap();
        assert_eq!(cpf.formatted(), "123.456.789-00");
        assert_eq!(Cpf::parse("42").unwrap().formatted(), "42");
    }

    #[test]
    fn serde_normalizes() {
        let cpf: Cpf = serde_json::from_str("\"987.654.321-00\"").unwrap();
        assert_eq!(cpf.as_str(), "98765432100");
        assert_eq!(serde_json::to_string(&cpf).unwrap(), "\"98765432100\"");
        assert!(serde_json::from_str::<Cpf>("\"12a\"").is_err());
    }
}
