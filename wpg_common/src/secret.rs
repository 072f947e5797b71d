use std::fmt;

/// What gets printed in place of the wrapped value, everywhere.
const REDACTED: &str = "****";

/// A wrapper that keeps credentials out of debug output and logs. The inner value must be asked for explicitly via
/// [`Secret::reveal`].
#[derive(Clone, Default)]
pub struct Secret<T: Clone + Default> {
    inner: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Hands out the wrapped value. Call sites are easy to audit by grepping for this method.
    pub fn reveal(&self) -> &T {
        &self.inner
    }
}

// Both formatting traits print the redaction marker, never the value, so a Secret interpolated into a log line
// or an error message cannot leak.
impl<T: Clone + Default> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Clone + Default> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}
