//! CPF (Brazilian taxpayer id) used as an opaque lookup key.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Number of trailing characters left visible by [`Cpf::masked`].
const VISIBLE_SUFFIX: usize = 2;

/// Caller-supplied CPF.
///
/// The only rule enforced is "not blank after trimming". No format or
/// check-digit validation is performed, and the value is kept exactly as
/// supplied (surrounding whitespace included) so the store sees what the
/// caller sent.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    pub fn parse(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DomainError::validation("cpf must not be blank"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe rendering: every character but the last two is replaced by `*`.
    pub fn masked(&self) -> String {
        let total = self.0.chars().count();
        let hidden = total.saturating_sub(VISIBLE_SUFFIX);
        self.0
            .chars()
            .enumerate()
            .map(|(i, c)| if i < hidden { '*' } else { c })
            .collect()
    }
}

impl core::fmt::Debug for Cpf {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Cpf").field(&self.masked()).finish()
    }
}

impl TryFrom<String> for Cpf {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Cpf> for String {
    fn from(value: Cpf) -> Self {
        value.0
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
    fn rejects_empty_and_whitespace() {
        assert!(Cpf::parse("").is_err());
        assert!(Cpf::parse("   ").is_err());
        assert!(Cpf::parse("\t\n ").is_err());
    }

    #[test]
    fn keeps_value_untrimmed() {
        let cpf = Cpf::parse(" 12345678901 ").unwrap();
        assert_eq!(cpf.as_str(), " 12345678901 ");
    }

    #[test]
    fn no_format_validation() {
        // Any non-blank string is an acceptable lookup key.
        assert!(Cpf::parse("not-a-cpf").is_ok());
        assert!(Cpf::parse("1").is_ok());
    }

    #[test]
    fn masked_hides_all_but_suffix() {
        let cpf = Cpf::parse("12345678901").unwrap();
        assert_eq!(cpf.masked(), "*********01");
        assert_eq!(format!("{cpf:?}"), "Cpf(\"*********01\")");

        let short = Cpf::parse("7").unwrap();
        assert_eq!(short.masked(), "7");
    }

    #[test]
    fn deserialize_enforces_non_blank() {
        let ok: Cpf = serde_json::from_str("\"123\"").unwrap();
        assert_eq!(ok.as_str(), "123");
        assert!(serde_json::from_str::<Cpf>("\"  \"").is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: whitespace-only input never yields a Cpf.
            #[test]
            fn whitespace_only_is_rejected(raw in "[ \t\r\n]{0,16}") {
                prop_assert!(Cpf::parse(raw).is_err());
            }

            /// Property: any input with a visible character is accepted verbatim.
            #[test]
            fn visible_input_is_kept_verbatim(
                pad_l in "[ ]{0,3}",
                core in "[0-9A-Za-z.\\-]{1,20}",
                pad_r in "[ ]{0,3}",
            ) {
                let raw = format!("{pad_l}{core}{pad_r}");
                let cpf = Cpf::parse(raw.clone()).unwrap();
                prop_assert_eq!(cpf.as_str(), raw.as_str());
            }
        }
    }
}
