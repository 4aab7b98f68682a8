//! Explicit teardown capability
//!
//! Components that hold a resource (an open file, a connection, a secondary
//! logger) expose it through `as_dispose()` on the sink or enricher traits.
//! Wrappers check for the capability through that typed accessor and
//! forward disposal to it; components without a resource return `None`.

use super::error::Result;

pub trait Dispose {
    /// Release held resources; calling it more than once must be harmless
    fn dispose(&self) -> Result<()>;
}

/// Dispose `target` if it exposes the capability
pub(crate) fn dispose_optional(target: Option<&dyn Dispose>) -> Result<()> {
    match target {
        Some(target) => target.dispose(),
        None => Ok(()),
    }
}
