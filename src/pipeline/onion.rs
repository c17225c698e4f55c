//! Onion (LIFO) and inverted onion (FIFO) middleware pipelines.
//!
//! Both flavors are interruptible: a stage that returns without calling
//! `next` stops the chain and its return value becomes the result.
//!
//! Onion, stages `[Stage1, Stage2, Stage3]`, the last stage runs first:
//!
//! ```text
//!               +--------+     +--------+     +------------+
//!   input   --> |        | --> |        | --> |      ---+  |
//!               | Stage3 |     | Stage2 |     | Stage1  |  |
//!   result  <-- |        | <-- |        | <-- |      <--+  |
//!               +--------+     +--------+     +------------+
//! ```
//!
//! Inverted onion, same stages, the first stage runs first:
//!
//! ```text
//!               +--------+     +--------+     +------------+
//!   input   --> |        | --> |        | --> |      ---+  |
//!               | Stage1 |     | Stage2 |     | Stage3  |  |
//!   result  <-- |        | <-- |        | <-- |      <--+  |
//!               +--------+     +--------+     +------------+
//! ```

use std::fmt;
use std::sync::Arc;

use super::dispatcher::{Dispatcher, Wrapper, build_dispatcher};
use super::stage::{BoxedContinuationStage, ContinuationStage};
use crate::compose::identity;

/// Builds a LIFO pipeline: the last stage is the outermost layer and runs first.
///
/// The innermost stage (the first one declared) continues into identity.
/// An empty list composes to identity.
///
/// # Examples
///
/// ```
/// use cumulus::pipeline::{layer, onion};
///
/// let pipeline = onion(vec![
///     layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x + 1)),
///     layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x * 2)),
///     layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x - 3)),
/// ]);
///
/// // ((5 - 3) * 2) + 1
/// assert_eq!(pipeline.call(5), 5);
/// ```
pub fn onion<T: 'static>(stages: Vec<BoxedContinuationStage<T, T>>) -> Dispatcher<T, T> {
    onion_with_terminal(stages, identity::<T>)
}

/// Builds a FIFO pipeline: the first stage is the outermost layer and runs first.
///
/// The innermost stage (the last one declared) continues into identity.
/// An empty list composes to identity.
///
/// # Examples
///
/// ```
/// use cumulus::pipeline::{inverted_onion, layer};
///
/// let pipeline = inverted_onion(vec![
///     layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x + 1)),
///     layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x * 2)),
///     layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x - 3)),
/// ]);
///
/// // ((5 + 1) * 2) - 3
/// assert_eq!(pipeline.call(5), 9);
/// ```
pub fn inverted_onion<T: 'static>(stages: Vec<BoxedContinuationStage<T, T>>) -> Dispatcher<T, T> {
    inverted_onion_with_terminal(stages, identity::<T>)
}

/// Builds a LIFO pipeline around a custom core.
///
/// `terminal` is the continuation of the innermost stage; it may produce a
/// result type different from the value type. An empty list composes to
/// `terminal`.
///
/// # Examples
///
/// ```
/// use cumulus::pipeline::{layer, onion_with_terminal};
///
/// let handler = onion_with_terminal(
///     vec![
///         layer(|x: u32, next: &dyn Fn(u32) -> String| format!("inner({})", next(x))),
///         layer(|x: u32, next: &dyn Fn(u32) -> String| format!("outer({})", next(x))),
///     ],
///     |x: u32| x.to_string(),
/// );
///
/// assert_eq!(handler.call(1), "outer(inner(1))");
/// ```
pub fn onion_with_terminal<T, R, F>(
    stages: Vec<BoxedContinuationStage<T, R>>,
    terminal: F,
) -> Dispatcher<T, R>
where
    T: 'static,
    R: 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    build_onion(stages, Arc::new(terminal))
}

/// Builds a FIFO pipeline around a custom core.
///
/// The stages keep their given order: the first one is the entry point and the
/// last one continues into `terminal`. An empty list composes to `terminal`.
///
/// # Examples
///
/// ```
/// use cumulus::pipeline::{inverted_onion_with_terminal, layer};
///
/// let guarded = inverted_onion_with_terminal(
///     vec![layer(|x: i32, next: &dyn Fn(i32) -> Result<i32, String>| {
///         if x < 0 { Err("rejected".to_string()) } else { next(x) }
///     })],
///     |x: i32| Ok(x * 10),
/// );
///
/// assert_eq!(guarded.call(4), Ok(40));
/// assert_eq!(guarded.call(-1), Err("rejected".to_string()));
/// ```
pub fn inverted_onion_with_terminal<T, R, F>(
    stages: Vec<BoxedContinuationStage<T, R>>,
    terminal: F,
) -> Dispatcher<T, R>
where
    T: 'static,
    R: 'static,
    F: Fn(T) -> R + Send + Sync + 'static,
{
    build_inverted_onion(stages, Arc::new(terminal))
}

fn build_onion<T, R>(
    mut stages: Vec<BoxedContinuationStage<T, R>>,
    terminal: Wrapper<T, R>,
) -> Dispatcher<T, R> {
    if stages.is_empty() {
        return build_dispatcher(stages, terminal);
    }
    tracing::trace!(flavor = "onion", stages = stages.len(), "building dispatcher");
    stages.reverse();
    build_dispatcher(stages, terminal)
}

fn build_inverted_onion<T, R>(
    stages: Vec<BoxedContinuationStage<T, R>>,
    terminal: Wrapper<T, R>,
) -> Dispatcher<T, R> {
    if !stages.is_empty() {
        tracing::trace!(
            flavor = "inverted_onion",
            stages = stages.len(),
            "building dispatcher"
        );
    }
    build_dispatcher(stages, terminal)
}

/// A builder collecting continuation stages in declaration order.
///
/// Finish with [`onion`](Layers::onion) for LIFO execution or
/// [`inverted_onion`](Layers::inverted_onion) for FIFO execution.
///
/// # Examples
///
/// ```
/// use cumulus::pipeline::Layers;
///
/// let layers = Layers::new()
///     .layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x + 1))
///     .layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x * 2));
///
/// assert_eq!(layers.len(), 2);
///
/// let fifo = layers.inverted_onion();
/// assert_eq!(fifo.call(5), 12);
/// ```
pub struct Layers<T, R = T> {
    stages: Vec<BoxedContinuationStage<T, R>>,
    terminal: Wrapper<T, R>,
}

impl<T: 'static> Layers<T, T> {
    /// Creates an empty builder whose innermost continuation is identity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_terminal(identity::<T>)
    }
}

impl<T: 'static> Default for Layers<T, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> Layers<T, R>
where
    T: 'static,
    R: 'static,
{
    /// Creates an empty builder whose innermost continuation is `terminal`.
    #[must_use]
    pub fn with_terminal<F>(terminal: F) -> Self
    where
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        Self {
            stages: Vec::new(),
            terminal: Arc::new(terminal),
        }
    }

    /// Appends a stage after the ones already declared.
    #[must_use]
    pub fn layer<S>(mut self, stage: S) -> Self
    where
        S: ContinuationStage<T, R> + Send + Sync + 'static,
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of declared stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if no stage has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Builds a LIFO pipeline: the last declared stage runs first.
    #[must_use]
    pub fn onion(self) -> Dispatcher<T, R> {
        build_onion(self.stages, self.terminal)
    }

    /// Builds a FIFO pipeline: the first declared stage runs first.
    #[must_use]
    pub fn inverted_onion(self) -> Dispatcher<T, R> {
        build_inverted_onion(self.stages, self.terminal)
    }
}

impl<T, R> Extend<BoxedContinuationStage<T, R>> for Layers<T, R> {
    fn extend<I: IntoIterator<Item = BoxedContinuationStage<T, R>>>(&mut self, iter: I) {
        self.stages.extend(iter);
    }
}

impl<T, R> fmt::Debug for Layers<T, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Layers")
            .field("stages", &self.stages.len())
            .finish_non_exhaustive()
    }
}
