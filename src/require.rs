//! Fail-fast assertions for test code. A failed requirement panics, which
//! aborts the running test with the message.

/// Unwrap `result`, failing the test with the error's message otherwise.
#[track_caller]
pub fn require_noerror<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("unexpected error: {e}"),
    }
}

/// Fail the test with a formatted message unless `cond` holds.
#[macro_export]
macro_rules! requiref {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            panic!($($arg)+);
        }
    };
}
