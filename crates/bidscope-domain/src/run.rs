//! Run identifiers

use std::fmt;

/// Identifier for one pipeline run, based on UUIDv7
///
/// Only used to correlate diagnostic log lines; results carry chunk
/// indices, not run ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunId(u128);

impl RunId {
    /// Generate a new time-ordered RunId
    ///
    /// # Examples
    ///
    /// ```
    /// use bidscope_domain::RunId;
    ///
    /// let a = RunId::new();
    /// let b = RunId::new();
    /// assert!(a <= b);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}
