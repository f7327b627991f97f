//! Table-name validation.
//!
//! Table names are spliced into SQL text verbatim, so they must be trusted
//! identifiers. Under [`IdentifierPolicy::Strict`] a name is accepted only if
//! every dot-separated part (at most `schema.table`) is either an unquoted
//! MySQL identifier or a backtick-quoted one with inner backticks doubled.
//! [`IdentifierPolicy::Trusted`] skips the check and leaves safety to the caller.

use std::fmt;

use crate::config::IdentifierPolicy;
use crate::constants::MAX_IDENTIFIER_LEN;

/// Why a name was refused under the strict policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("table name is empty")]
    Empty,

    #[error("{name:?} has more than two dot-separated parts")]
    TooManyParts { name: String },

    #[error("{name:?} contains an empty part")]
    EmptyPart { name: String },

    #[error("{name:?} has a part longer than {max} characters")]
    TooLong { name: String, max: usize },

    #[error("{name:?} contains invalid character {ch:?}")]
    InvalidChar { name: String, ch: char },

    #[error("{name:?} has an all-digit unquoted part")]
    AllDigits { name: String },

    #[error("{name:?} has an unterminated backtick quote")]
    UnterminatedQuote { name: String },
}

/// A table name that passed the configured identifier policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn parse(raw: &str, policy: IdentifierPolicy) -> Result<Self, IdentifierError> {
        if policy == IdentifierPolicy::Strict {
            validate_strict(raw)?;
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, the unit VARCHAR widths are measured in.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn validate_strict(raw: &str) -> Result<(), IdentifierError> {
    if raw.is_empty() {
        return Err(IdentifierError::Empty);
    }
    let mut rest = raw;
    let mut parts = 0;
    loop {
        parts += 1;
        if parts > 2 {
            return Err(IdentifierError::TooManyParts {
                name: raw.to_string(),
            });
        }

        let part_len = if rest.starts_with('`') {
            let len = quoted_len(raw, rest)?;
            validate_quoted(raw, &rest[1..len - 1])?;
            len
        } else {
            let len = rest.find('.').unwrap_or(rest.len());
            validate_unquoted(raw, &rest[..len])?;
            len
        };

        rest = &rest[part_len..];
        if rest.is_empty() {
            return Ok(());
        }
        match rest.strip_prefix('.') {
            Some(next) => rest = next,
            // Only reachable after a closing backtick, e.g. `a`b
            None => {
                return Err(IdentifierError::InvalidChar {
                    name: raw.to_string(),
                    ch: rest.chars().next().unwrap_or('`'),
                })
            }
        }
    }
}

/// Byte length of the leading backtick-quoted part of `rest`, quotes included.
fn quoted_len(raw: &str, rest: &str) -> Result<usize, IdentifierError> {
    let mut chars = rest.char_indices().skip(1).peekable();
    while let Some((at, ch)) = chars.next() {
        if ch != '`' {
            continue;
        }
        if chars.peek().is_some_and(|(_, next)| *next == '`') {
            chars.next();
            continue;
        }
        return Ok(at + 1);
    }
    Err(IdentifierError::UnterminatedQuote {
        name: raw.to_string(),
    })
}

fn validate_quoted(raw: &str, inner: &str) -> Result<(), IdentifierError> {
    if inner.is_empty() {
        return Err(IdentifierError::EmptyPart {
            name: raw.to_string(),
        });
    }
    if inner.replace("``", "`").chars().count() > MAX_IDENTIFIER_LEN {
        return Err(IdentifierError::TooLong {
            name: raw.to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }
    if inner.contains('\0') {
        return Err(IdentifierError::InvalidChar {
            name: raw.to_string(),
            ch: '\0',
        });
    }
    Ok(())
}

fn validate_unquoted(raw: &str, part: &str) -> Result<(), IdentifierError> {
    if part.is_empty() {
        return Err(IdentifierError::EmptyPart {
            name: raw.to_string(),
        });
    }
    if part.chars().count() > MAX_IDENTIFIER_LEN {
        return Err(IdentifierError::TooLong {
            name: raw.to_string(),
            max: MAX_IDENTIFIER_LEN,
        });
    }
    if let Some(ch) = part.chars().find(|c| !is_unquoted_char(*c)) {
        return Err(IdentifierError::InvalidChar {
            name: raw.to_string(),
            ch,
        });
    }
    if part.chars().all(|c| c.is_ascii_digit()) {
        return Err(IdentifierError::AllDigits {
            name: raw.to_string(),
        });
    }
    Ok(())
}

/// MySQL's unquoted identifier alphabet: `[0-9a-zA-Z$_]` plus U+0080..U+FFFF.
fn is_unquoted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '$' || c == '_' || ('\u{80}'..='\u{FFFF}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_accepts_schema_qualified_names() {
        let name = TableName::parse("warehouse.prices_2024", IdentifierPolicy::Strict).unwrap();
        assert_eq!(name.as_str(), "warehouse.prices_2024");
    }

    #[test]
    fn strict_accepts_leading_digit_but_not_all_digits() {
        assert!(TableName::parse("2024_prices", IdentifierPolicy::Strict).is_ok());
        assert!(TableName::parse("db1.1e_rates", IdentifierPolicy::Strict).is_ok());
        let err = TableName::parse("2024", IdentifierPolicy::Strict).unwrap_err();
        assert_eq!(err, IdentifierError::AllDigits { name: "2024".into() });
    }

    #[test]
    fn strict_accepts_backtick_quoted_parts() {
        for name in ["`prices-eu`", "`sales db`.`q1 2024`", "warehouse.`a``b`", "`2024`"] {
            assert!(
                TableName::parse(name, IdentifierPolicy::Strict).is_ok(),
                "{name} should be accepted"
            );
        }
    }

    #[test]
    fn strict_rejects_broken_quoting() {
        let cases = [
            ("`prices", IdentifierError::UnterminatedQuote { name: "`prices".into() }),
            ("``", IdentifierError::EmptyPart { name: "``".into() }),
            ("`a`b", IdentifierError::InvalidChar { name: "`a`b".into(), ch: 'b' }),
            ("a.`b`.c", IdentifierError::TooManyParts { name: "a.`b`.c".into() }),
        ];
        for (name, expected) in cases {
            assert_eq!(TableName::parse(name, IdentifierPolicy::Strict), Err(expected));
        }
    }

    #[test]
    fn strict_rejects_unquoted_punctuation() {
        let err = TableName::parse("prices-eu", IdentifierPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            IdentifierError::InvalidChar {
                name: "prices-eu".into(),
                ch: '-'
            }
        );
    }

    #[test]
    fn trusted_accepts_anything() {
        let name = TableName::parse("", IdentifierPolicy::Trusted).unwrap();
        assert_eq!(name.char_len(), 0);
    }
}
