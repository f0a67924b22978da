use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::cast::{Cast, Step};
use crate::messaging::Messenger;
use crate::outcome::Outcome;
use crate::value::Value;

/// Ordered, immutable sequence of casts.
///
/// Extending a chain never touches the original: [`CastChain::append`]
/// returns a new chain sharing the parent's casts.
#[derive(Clone, Default)]
pub struct CastChain {
    casts: Vec<Arc<dyn Cast>>,
}

impl CastChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append<C: Cast + 'static>(&self, cast: C) -> Self {
        self.append_shared(Arc::new(cast))
    }

    pub fn append_shared(&self, cast: Arc<dyn Cast>) -> Self {
        let mut casts = self.casts.clone();
        casts.push(cast);
        Self { casts }
    }

    pub fn prepend<C: Cast + 'static>(&self, cast: C) -> Self {
        let mut casts = Vec::with_capacity(self.casts.len() + 1);
        casts.push(Arc::new(cast) as Arc<dyn Cast>);
        casts.extend(self.casts.iter().cloned());
        Self { casts }
    }

    pub fn len(&self) -> usize {
        self.casts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.casts.is_empty()
    }

    /// Threads `value` through every cast in order.
    ///
    /// Stops at the first [`Step::Success`] (yielding its value) or
    /// [`Step::Failure`] (recording its diagnostic, then yielding an empty
    /// failure).
    pub fn call(&self, value: Value, messenger: &mut Messenger) -> Outcome<Value> {
        let mut value = value;

        for (position, cast) in self.casts.iter().enumerate() {
            match cast.call(value, messenger) {
                Step::Continue(next) => value = next,
                Step::Success(done) => {
                    trace!(position, "cast chain short-circuited with success");
                    return Outcome::success(done.unwrap_or_default());
                }
                Step::Failure(diagnostic) => {
                    trace!(position, "cast chain short-circuited with failure");
                    if let Some(diagnostic) = diagnostic {
                        messenger.error(diagnostic.code, diagnostic.data);
                    }
                    return Outcome::empty_failure();
                }
            }
        }

        Outcome::success(value)
    }
}

impl fmt::Debug for CastChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CastChain").field("len", &self.casts.len()).finish()
    }
}
