/// Return early with a fatal validation error at `$line`.
#[macro_export]
macro_rules! bail_fatal {
    ($line:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::fatal(format!($($arg)*), $line))
    };
}

/// Return early with a parse-kind validation error at `$line`.
#[macro_export]
macro_rules! bail_parse {
    ($line:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::parse(format!($($arg)*), $line))
    };
}

/// Return early with a warning-kind validation error at `$line`.
#[macro_export]
macro_rules! bail_warning {
    ($line:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::warning(format!($($arg)*), $line))
    };
}

/// Return early with an internal error; used when a pipeline invariant is broken.
#[macro_export]
macro_rules! bail_internal {
    ($($arg:tt)*) => {
        return Err($crate::error::Error::internal(format!($($arg)*)))
    };
}
