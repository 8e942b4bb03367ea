//! Utility macros used across the crate.

/// A macro for early returns with an error if a condition is not met.
///
/// Like `assert!`, but returns `Err($error)` instead of panicking. The error expression is
/// only evaluated when the predicate fails.
///
/// # Example
///
/// ```ignore
/// ensure!(line.len() <= MAX_REQUEST_LINE_BYTES, ParseError::too_large_request(line.len(), MAX_REQUEST_LINE_BYTES));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
