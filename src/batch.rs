//! Bracketing a run of edits.
//!
//! Editors usually want to know when a group of changes starts and ends,
//! to suspend redrawing or to record a single undo step. The outline
//! operations know nothing about this; callers wrap them in a scope.

use crate::GeometryError;

/// Something that wants to hear about the start and end of a batch of edits
pub trait BatchScope {
    fn begin(&mut self);
    fn end(&mut self);
}

/// A scope which does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScope;

impl BatchScope for NoScope {
    fn begin(&mut self) {}
    fn end(&mut self) {}
}

/// Run `f` between `scope.begin()` and `scope.end()`.
///
/// `end` is called whether or not `f` succeeds.
pub fn in_batch<S, T, F>(scope: &mut S, f: F) -> Result<T, GeometryError>
where
    S: BatchScope + ?Sized,
    F: FnOnce() -> Result<T, GeometryError>,
{
    scope.begin();
    let result = f();
    scope.end();
    if let Err(e) = &result {
        log::debug!("Batch ended with error: {}", e);
    }
    result
}
