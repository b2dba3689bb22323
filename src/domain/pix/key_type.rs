//! Pix key types and the per-type key format rules

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::DomainError;

pub const CPF_KEY_MESSAGE: &str = "key é obrigatória e formato esperado deve ser um CPF válido.";
pub const EMAIL_KEY_MESSAGE: &str = "key é obrigatória e formato esperado deve ser seu@email.com";
pub const PHONE_KEY_MESSAGE: &str = "chave é obrigatória e formato esperado deve ser +5585988714077";
pub const RANDOM_KEY_MESSAGE: &str = "Para tipo chave RANDOMICA não deve ser informada uma chave.";

static CPF_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{3}\.?[0-9]{3}\.?[0-9]{3}-[0-9]{2}|[0-9]{11})$").unwrap());

/// Local part (atext or quoted string) @ dotted domain or bracketed literal
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r##"^(?:[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*"##,
        r##"|"(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21\x23-\x5b\x5d-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])*")"##,
        r##"@(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?"##,
        r##"|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}"##,
        r##"(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?"##,
        r##"|[a-z0-9-]*[a-z0-9]:(?:[\x01-\x08\x0b\x0c\x0e-\x1f\x21-\x5a\x53-\x7f]|\\[\x01-\x09\x0b\x0c\x0e-\x7f])+)\])$"##,
    ))
    .unwrap()
});

/// E.164: ASCII digits only, `\d` would also admit other Unicode digits
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9][0-9][0-9]{1,14}$").unwrap());

/// A closed, exhaustively enumerated set of named variants
pub trait ClosedSet: Copy + 'static {
    const ALL: &'static [Self];

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|variant| variant.name() == name)
    }

    /// Rendered as `[A, B, C]`
    fn valid_names() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(|variant| variant.name()).collect();
        format!("[{}]", names.join(", "))
    }
}

/// Type of a Pix key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyType {
    Cpf,
    Email,
    Phone,
    Random,
}

/// Format rule owned by a key type
#[derive(Clone, Copy)]
struct KeyRule {
    accepts: fn(Option<&str>) -> bool,
    message: &'static str,
}

impl KeyType {
    fn rule(self) -> KeyRule {
        match self {
            Self::Cpf => KeyRule {
                accepts: accepts_cpf,
                message: CPF_KEY_MESSAGE,
            },
            Self::Email => KeyRule {
                accepts: accepts_email,
                message: EMAIL_KEY_MESSAGE,
            },
            Self::Phone => KeyRule {
                accepts: accepts_phone,
                message: PHONE_KEY_MESSAGE,
            },
            Self::Random => KeyRule {
                accepts: accepts_random,
                message: RANDOM_KEY_MESSAGE,
            },
        }
    }

    /// Check `key` against this type's rule
    pub fn validate_key(self, key: Option<&str>) -> Result<(), DomainError> {
        let rule = self.rule();

        if (rule.accepts)(key) {
            Ok(())
        } else {
            Err(DomainError::bad_request(rule.message))
        }
    }
}

impl ClosedSet for KeyType {
    const ALL: &'static [Self] = &[Self::Cpf, Self::Email, Self::Phone, Self::Random];

    fn name(self) -> &'static str {
        match self {
            Self::Cpf => "CPF",
            Self::Email => "EMAIL",
            Self::Phone => "PHONE",
            Self::Random => "RANDOM",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn present(key: Option<&str>) -> Option<&str> {
    key.filter(|k| !k.trim().is_empty())
}

fn accepts_cpf(key: Option<&str>) -> bool {
    present(key).is_some_and(is_valid_cpf)
}

fn accepts_email(key: Option<&str>) -> bool {
    present(key).is_some_and(|k| EMAIL_PATTERN.is_match(k))
}

fn accepts_phone(key: Option<&str>) -> bool {
    present(key).is_some_and(|k| PHONE_PATTERN.is_match(k))
}

fn accepts_random(key: Option<&str>) -> bool {
    present(key).is_none()
}

/// Brazilian CPF check: 11 digits (bare or `ddd.ddd.ddd-dd`), not a single
/// repeated digit, and both mod-11 check digits matching.
pub fn is_valid_cpf(value: &str) -> bool {
    if !CPF_PATTERN.is_match(value) {
        return false;
    }

    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    digits[9] == cpf_check_digit(&digits[..9]) && digits[10] == cpf_check_digit(&digits[..10])
}

fn cpf_check_digit(digits: &[u32]) -> u32 {
    let top_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .zip((2..=top_weight).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();

    match (sum * 10) % 11 {
        10 => 0,
        remainder => remainder,
    }
}
