//! Core types: Symbol, Position

use std::fmt;

/// Maximum length of a ticker symbol in bytes.
pub const SYMBOL_MAX_LEN: usize = 8;

/// Instrument identifier stored inline (no heap allocation).
///
/// Holds up to [`SYMBOL_MAX_LEN`] bytes of UTF-8, which covers every US
/// equity ticker including share-class suffixes like `BRK.B`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Symbol {
    len: u8,
    bytes: [u8; SYMBOL_MAX_LEN],
}

impl Symbol {
    /// Create a symbol from a string.
    ///
    /// # Panics
    ///
    /// Panics if `s` is empty or longer than [`SYMBOL_MAX_LEN`] bytes.
    /// Use [`Symbol::try_new`] for untrusted input.
    #[track_caller]
    pub fn new(s: &str) -> Self {
        match Self::try_new(s) {
            Some(sym) => sym,
            None => panic!("invalid symbol {s:?}: must be 1..={SYMBOL_MAX_LEN} bytes"),
        }
    }

    /// Create a symbol, returning `None` if `s` is empty or too long.
    pub fn try_new(s: &str) -> Option<Self> {
        let raw = s.as_bytes();
        if raw.is_empty() || raw.len() > SYMBOL_MAX_LEN {
            return None;
        }
        let mut bytes = [0u8; SYMBOL_MAX_LEN];
        bytes[..raw.len()].copy_from_slice(raw);
        Some(Self {
            len: raw.len() as u8,
            bytes,
        })
    }

    /// The symbol as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        // Only ever built from a &str, so the prefix is valid UTF-8.
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or_default()
    }
}

impl PartialOrd for Symbol {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Symbol {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Symbol {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Symbol {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Symbol::try_new(&s).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "symbol {s:?} must be 1..={SYMBOL_MAX_LEN} bytes"
            ))
        })
    }
}

/// A held position as reported by the account.
///
/// `amount` is a signed share count: positive = long, negative = short,
/// zero = flat (brokers sometimes report closed positions with zero amount).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub symbol: Symbol,
    pub amount: i64,
}

impl Position {
    pub fn new(symbol: Symbol, amount: i64) -> Self {
        Self { symbol, amount }
    }

    #[inline]
    pub fn is_long(&self) -> bool {
        self.amount > 0
    }

    #[inline]
    pub fn is_short(&self) -> bool {
        self.amount < 0
    }

    #[inline]
    pub fn is_flat(&self) -> bool {
        self.amount == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_roundtrip_str() {
        let s = Symbol::new("AAPL");
        assert_eq!(s.as_str(), "AAPL");
        assert_eq!(format!("{s}"), "AAPL");
        assert_eq!(format!("{s:?}"), "Symbol(AAPL)");
    }

    #[test]
    fn symbol_accepts_eight_bytes() {
        assert!(Symbol::try_new("ABCDEFGH").is_some());
        assert!(Symbol::try_new("BRK.B").is_some());
    }

    #[test]
    fn symbol_rejects_empty_and_long() {
        assert!(Symbol::try_new("").is_none());
        assert!(Symbol::try_new("TOOLONGNAME").is_none());
    }

    #[test]
    #[should_panic(expected = "invalid symbol")]
    fn symbol_new_panics_on_long() {
        let _ = Symbol::new("TOOLONGNAME");
    }

    #[test]
    fn symbol_ordering_is_lexicographic() {
        let mut syms = vec![Symbol::new("MSFT"), Symbol::new("B"), Symbol::new("AAPL")];
        syms.sort();
        let names: Vec<&str> = syms.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, ["AAPL", "B", "MSFT"]);
    }

    #[test]
    fn symbol_display_respects_width() {
        assert_eq!(format!("{:6}|", Symbol::new("SPY")), "SPY   |");
    }

    #[test]
    fn position_sides() {
        let s = Symbol::new("IBM");
        assert!(Position::new(s, 10).is_long());
        assert!(Position::new(s, -3).is_short());
        assert!(Position::new(s, 0).is_flat());
    }
}
