//! One-time verification codes for the registration step.

use rand::Rng;

/// Smallest code value; keeps every code at six digits.
const CODE_MIN: u32 = 100_000;

/// Largest code value.
const CODE_MAX: u32 = 999_999;

/// A six-digit decimal verification code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Generates a code uniformly distributed over 100000..=999999.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        Self(rng.random_range(CODE_MIN..=CODE_MAX).to_string())
    }

    /// Wraps a stored code without validating it.
    pub fn from_stored(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks a submitted code. Exact comparison, no trimming.
    pub fn matches(&self, submitted: &str) -> bool {
        self.0 == submitted
    }
}

impl std::fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
