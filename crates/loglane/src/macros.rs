//! Call-site shorthand for attribute lists.

/// Build a `Vec<Attr>` from `key = value` pairs.
///
/// ```
/// let attrs = loglane::attrs![service = "api", port = 8080];
/// assert_eq!(attrs.len(), 2);
/// assert_eq!(attrs[0].key(), "service");
/// ```
#[macro_export]
macro_rules! attrs {
    ($($key:ident = $value:expr),* $(,)?) => {{
        let attrs: ::std::vec::Vec<$crate::Attr> =
            vec![$($crate::Attr::new(stringify!($key), $value)),*];
        attrs
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_at {
    ($method:ident, $logger:expr, $message:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        use $crate::Logger as _;
        $logger.$method($message, &[$($crate::Attr::new(stringify!($key), $value)),*])
    }};
}

/// Log at debug: `log_debug!(logger, "msg", key = value, ...)`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => { $crate::__log_at!(debug, $($arg)+) };
}

/// Log at info: `log_info!(logger, "msg", key = value, ...)`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => { $crate::__log_at!(info, $($arg)+) };
}

/// Log at warn: `log_warn!(logger, "msg", key = value, ...)`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)+) => { $crate::__log_at!(warn, $($arg)+) };
}

/// Log at error: `log_error!(logger, "msg", key = value, ...)`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => { $crate::__log_at!(error, $($arg)+) };
}
