use crate::error::{CoreError, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const BASE62: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Shortest code length a [`CodeFormat`] accepts.
pub const MIN_CODE_LENGTH: usize = 4;
/// Longest code length a [`CodeFormat`] accepts.
pub const MAX_CODE_LENGTH: usize = 16;
/// Code length used when nothing else is configured.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// A short code identifying a stored link.
///
/// Values are either produced by a generator for a given [`CodeFormat`] or
/// parsed through [`CodeFormat::parse`]. The type itself does not re-check the
/// format, so [`ShortCode::new_unchecked`] is reserved for trusted sources.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (generators, rows read back from the store).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The ordered set of symbols short codes are drawn from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    symbols: String,
}

impl Alphabet {
    /// The 62 symbol alphabet `0-9A-Za-z`.
    pub fn base62() -> Self {
        Self {
            symbols: BASE62.to_string(),
        }
    }

    /// Creates an alphabet from the given symbols.
    ///
    /// Symbols must be distinct ASCII alphanumerics and there must be at
    /// least two of them.
    pub fn new(symbols: impl Into<String>) -> Result<Self, CoreError> {
        let symbols = symbols.into();

        if symbols.len() < 2 {
            return Err(CoreError::InvalidAlphabet(format!(
                "need at least 2 symbols, got {}",
                symbols.len()
            )));
        }

        if let Some(bad) = symbols.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidAlphabet(format!(
                "symbol '{}' is not an ASCII letter or digit",
                bad
            )));
        }

        let mut seen = [false; 128];
        for b in symbols.bytes() {
            if seen[b as usize] {
                return Err(CoreError::InvalidAlphabet(format!(
                    "symbol '{}' appears more than once",
                    b as char
                )));
            }
            seen[b as usize] = true;
        }

        Ok(Self { symbols })
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the symbol at `index`, wrapping around the alphabet size.
    pub fn symbol(&self, index: usize) -> char {
        self.symbols.as_bytes()[index % self.symbols.len()] as char
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.symbols.as_bytes().contains(&(c as u8))
    }

    pub fn as_str(&self) -> &str {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::base62()
    }
}

/// Shape of every short code a deployment issues: alphabet plus fixed length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeFormat {
    alphabet: Alphabet,
    length: usize,
}

impl CodeFormat {
    pub fn new(alphabet: Alphabet, length: usize) -> Result<Self, CoreError> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&length) {
            return Err(CoreError::InvalidCodeLength {
                length,
                min: MIN_CODE_LENGTH,
                max: MAX_CODE_LENGTH,
            });
        }

        Ok(Self { alphabet, length })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Validates untrusted input against this format.
    ///
    /// The alphabet must match exactly. Any length a format could have been
    /// configured with is accepted, so codes issued before a length change
    /// keep resolving. This is a purely local check, so malformed codes never
    /// cost a store round trip.
    pub fn parse(&self, code: &str) -> Result<ShortCode, ValidationError> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code.len()) {
            return Err(ValidationError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_CODE_LENGTH,
                MAX_CODE_LENGTH,
                code.len()
            )));
        }

        if let Some(bad) = code.chars().find(|c| !self.alphabet.contains(*c)) {
            return Err(ValidationError::InvalidShortCode(format!(
                "character '{}' is not allowed in '{}'",
                bad, code
            )));
        }

        Ok(ShortCode::new_unchecked(code))
    }
}

impl Default for CodeFormat {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::base62(),
            length: DEFAULT_CODE_LENGTH,
        }
    }
}
