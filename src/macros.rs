//! Logging macros with structured argument capture.
//!
//! Arguments are captured through `serde::Serialize` and bound to the
//! message template holes in order. Capture is skipped entirely when the
//! level is disabled. Every macro evaluates to the logger's `Result<()>`.
//!
//! # Examples
//!
//! ```
//! use structured_logger::prelude::*;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemorySink::new());
//! let logger = LoggerConfiguration::new()
//!     .write_to(memory.clone())
//!     .create_logger()
//!     .unwrap();
//!
//! information!(logger, "Server started").unwrap();
//!
//! let port = 8080;
//! information!(logger, "Listening on port {Port}", port).unwrap();
//!
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "socket closed");
//! error!(logger, exception = err, "Connection to {Peer} lost", "10.0.0.7").unwrap();
//!
//! assert_eq!(memory.len(), 3);
//! ```

/// Write an event at the given level.
///
/// # Examples
///
/// ```
/// # use structured_logger::prelude::*;
/// # let logger = Logger::none();
/// use structured_logger::log;
/// log!(logger, LogEventLevel::Information, "Simple message").unwrap();
/// log!(logger, LogEventLevel::Error, "Error code: {Code}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, exception = $error:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.write_with_error(
                level,
                &$error,
                $template,
                &[$($crate::core::capture_value(&$arg)),*],
            )
        } else {
            $crate::core::Result::Ok(())
        }
    }};
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.write(level, $template, &[$($crate::core::capture_value(&$arg)),*])
        } else {
            $crate::core::Result::Ok(())
        }
    }};
}

/// Write a `Verbose` event.
///
/// # Examples
///
/// ```
/// # use structured_logger::prelude::*;
/// # let logger = Logger::none();
/// use structured_logger::verbose;
/// verbose!(logger, "Entering {Function}", "calculate").unwrap();
/// ```
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogEventLevel::Verbose, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogEventLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! information {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogEventLevel::Information, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogEventLevel::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogEventLevel::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogEventLevel::Fatal, $($arg)+)
    };
}
