//! The continuation chain shared by onions and inverted onions.
//!
//! [`build_dispatcher`] fixes an ordered list of continuation stages and a
//! terminal into a single callable. The first element becomes the outermost
//! stage and the last element the innermost:
//!
//! ```text
//! stages [S1, S2, S3]
//!
//! dispatch(0, v) = S1(v, |v| dispatch(1, v))      <- entry point
//! dispatch(1, v) = S2(v, |v| dispatch(2, v))
//! dispatch(2, v) = S3(v, |v| dispatch(3, v))
//! dispatch(3, v) = terminal(v)
//! ```
//!
//! The stages live in one shared slice, so neither building nor dropping a
//! dispatcher recurses over its length. Building invokes no stage.

use std::fmt;
use std::sync::Arc;

use super::stage::BoxedContinuationStage;
use crate::compose::identity;

/// A unary function shared between the links of a continuation chain.
pub(crate) type Wrapper<T, R> = Arc<dyn Fn(T) -> R + Send + Sync>;

/// A composed continuation pipeline.
///
/// Produced by [`onion`](super::onion), [`inverted_onion`](super::inverted_onion)
/// and [`Layers`](super::Layers). The chain is immutable once built, so a
/// dispatcher can be called any number of times, cloned cheaply, and shared
/// across threads. Each call starts a fresh evaluation from the entry stage.
pub struct Dispatcher<T, R = T> {
    stages: Arc<[BoxedContinuationStage<T, R>]>,
    terminal: Wrapper<T, R>,
}

impl<T, R> Dispatcher<T, R> {
    /// Runs the pipeline with `value` as input.
    ///
    /// Stage failures (panics) propagate to the caller unchanged.
    #[inline]
    pub fn call(&self, value: T) -> R {
        self.dispatch(0, value)
    }

    /// Returns the number of stages in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the chain has no stages.
    ///
    /// An empty dispatcher is its terminal continuation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Converts the dispatcher into a plain closure.
    pub fn into_fn(self) -> impl Fn(T) -> R {
        move |value| self.call(value)
    }

    /// Runs the stage at `index`, whose `next` continues at `index + 1`.
    fn dispatch(&self, index: usize, value: T) -> R {
        match self.stages.get(index) {
            Some(stage) => stage.process(value, &|next_value| self.dispatch(index + 1, next_value)),
            None => (self.terminal)(value),
        }
    }
}

impl<T: 'static> Dispatcher<T, T> {
    /// A dispatcher without stages: returns its input unchanged.
    #[must_use]
    pub fn identity() -> Self {
        build_dispatcher(Vec::new(), Arc::new(identity::<T>))
    }
}

impl<T, R> Clone for Dispatcher<T, R> {
    fn clone(&self) -> Self {
        Self {
            stages: Arc::clone(&self.stages),
            terminal: Arc::clone(&self.terminal),
        }
    }
}

impl<T, R> fmt::Debug for Dispatcher<T, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Dispatcher")
            .field("stages", &self.stages.len())
            .finish_non_exhaustive()
    }
}

/// Fixes `stages` into a continuation chain ending in `terminal`.
///
/// The first stage is the entry point; each stage's `next` runs the stage
/// after it, and the last stage's `next` is `terminal`. An empty list yields
/// `terminal` itself.
pub(crate) fn build_dispatcher<T, R>(
    stages: Vec<BoxedContinuationStage<T, R>>,
    terminal: Wrapper<T, R>,
) -> Dispatcher<T, R> {
    Dispatcher {
        stages: stages.into(),
        terminal,
    }
}
