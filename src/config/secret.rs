use std::fmt;
use subtle::ConstantTimeEq;

pub const DEFAULT_SECRET: &str = "changeme";

/// The shared secret clients must present.
///
/// `Debug` is redacted so the value never ends up in the startup config dump.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    /// Compares in constant time with respect to the contents.
    /// A length mismatch returns early, so only the length can leak.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_SECRET
    }
}

impl Default for Secret {
    fn default() -> Self {
        Secret::new(DEFAULT_SECRET)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl std::str::FromStr for Secret {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Secret::new(s))
    }
}
