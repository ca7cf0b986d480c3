//! Substitution cipher.
//!
//! A key is a permutation of the alphabet: its first letter replaces `A`, the
//! second replaces `B`, and so on. Encoding preserves case and leaves every
//! non-ASCII-letter character untouched, so `Cab Z?` under
//! `SQGYFEZXLANKJIMPURDCWTHVOB` becomes `Gsq B?`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CipherError {
    #[error("key must have 26 letters, got {0}")]
    WrongLength(usize),
    #[error("key contains non-letter character '{0}'")]
    NotALetter(char),
    #[error("key repeats letter '{0}'")]
    DuplicateLetter(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionKey {
    forward: [u8; 26],
    inverse: [u8; 26],
}

impl SubstitutionKey {
    /// Parse a 26-letter permutation; lowercase input is accepted.
    pub fn parse(raw: &str) -> Result<Self, CipherError> {
        let raw = raw.trim();
        let count = raw.chars().count();
        if count != 26 {
            return Err(CipherError::WrongLength(count));
        }
        let mut forward = [0u8; 26];
        let mut inverse = [u8::MAX; 26];
        for (plain, ch) in raw.chars().enumerate() {
            if !ch.is_ascii_alphabetic() {
                return Err(CipherError::NotALetter(ch));
            }
            let upper = ch.to_ascii_uppercase() as u8;
            let cipher = (upper - b'A') as usize;
            if inverse[cipher] != u8::MAX {
                return Err(CipherError::DuplicateLetter(upper as char));
            }
            forward[plain] = upper;
            inverse[cipher] = b'A' + plain as u8;
        }
        Ok(SubstitutionKey { forward, inverse })
    }

    /// A uniformly shuffled key; `seed` makes it reproducible.
    pub fn random(seed: Option<u64>) -> Self {
        let mut letters: Vec<u8> = (b'A'..=b'Z').collect();
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        letters.shuffle(&mut rng);
        let mut forward = [0u8; 26];
        let mut inverse = [0u8; 26];
        for (plain, &c) in letters.iter().enumerate() {
            forward[plain] = c;
            inverse[(c - b'A') as usize] = b'A' + plain as u8;
        }
        SubstitutionKey { forward, inverse }
    }

    fn map_char(table: &[u8; 26], ch: char) -> char {
        if ch.is_ascii_uppercase() {
            table[(ch as u8 - b'A') as usize] as char
        } else if ch.is_ascii_lowercase() {
            (table[(ch as u8 - b'a') as usize] as char).to_ascii_lowercase()
        } else {
            ch
        }
    }

    pub fn encode(&self, msg: &str) -> String {
        msg.chars().map(|c| Self::map_char(&self.forward, c)).collect()
    }

    pub fn decode(&self, msg: &str) -> String {
        msg.chars().map(|c| Self::map_char(&self.inverse, c)).collect()
    }
}

impl FromStr for SubstitutionKey {
    type Err = CipherError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SubstitutionKey::parse(s)
    }
}

impl fmt::Display for SubstitutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.forward {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

pub fn encode(msg: &str, key: &str) -> Result<String, CipherError> {
    Ok(SubstitutionKey::parse(key)?.encode(msg))
}

pub fn decode(msg: &str, key: &str) -> Result<String, CipherError> {
    Ok(SubstitutionKey::parse(key)?.decode(msg))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "SQGYFEZXLANKJIMPURDCWTHVOB";

    #[test]
    fn reference_examples() {
        assert_eq!(encode("Cab Z?", KEY).unwrap(), "Gsq B?");
        assert_eq!(encode("CAB", KEY).unwrap(), "GSQ");
        assert_eq!(decode("Gsq B?", KEY).unwrap(), "Cab Z?");
    }

    #[test]
    fn non_letters_pass_through() {
        let key = SubstitutionKey::parse(KEY).unwrap();
        assert_eq!(key.encode("123 -- ¿é?"), "123 -- ¿é?");
    }

    #[test]
    fn key_validation() {
        assert_eq!(
            SubstitutionKey::parse("ABC"),
            Err(CipherError::WrongLength(3))
        );
        assert_eq!(
            SubstitutionKey::parse("AACDEFGHIJKLMNOPQRSTUVWXYZ"),
            Err(CipherError::DuplicateLetter('A'))
        );
        assert_eq!(
            SubstitutionKey::parse("ABCDEFGHIJKLMNOPQRSTUVWXY1"),
            Err(CipherError::NotALetter('1'))
        );
        assert_eq!(
            SubstitutionKey::parse(&KEY.to_lowercase()).unwrap().to_string(),
            KEY
        );
    }

    #[test]
    fn seeded_random_keys_are_reproducible_permutations() {
        let a = SubstitutionKey::random(Some(7));
        let b = SubstitutionKey::random(Some(7));
        assert_eq!(a, b);
        assert!(SubstitutionKey::parse(&a.to_string()).is_ok());
    }
}
