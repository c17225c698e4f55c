//! Stage contracts for the two pipeline shapes.
//!
//! - [`UnaryStage`]: `stage(value) -> value`, used by [`Tube`](super::Tube)
//! - [`ContinuationStage`]: `stage(value, next) -> result`, used by onions
//!
//! Both traits are implemented for every closure or function with the matching
//! signature, so plain closures can be passed anywhere a stage is expected.
//! Types with state (invocable objects) implement the traits directly.

/// A stage of a forward pipeline: transforms a value into a value of the same type.
///
/// # Examples
///
/// ```
/// use cumulus::pipeline::UnaryStage;
///
/// struct Scale(i32);
///
/// impl UnaryStage<i32> for Scale {
///     fn apply(&self, value: i32) -> i32 {
///         value * self.0
///     }
/// }
///
/// assert_eq!(Scale(3).apply(4), 12);
/// assert_eq!((|x: i32| x + 1).apply(4), 5);
/// ```
pub trait UnaryStage<T> {
    /// Applies this stage to the value.
    fn apply(&self, value: T) -> T;
}

impl<T, F> UnaryStage<T> for F
where
    F: Fn(T) -> T,
{
    #[inline]
    fn apply(&self, value: T) -> T {
        self(value)
    }
}

/// A stage of an onion pipeline.
///
/// The stage receives the value and `next`, the rest of the pipeline as a unary
/// function. Calling `next` continues the chain; returning without calling it
/// stops the chain and makes the stage's own return value the pipeline result.
///
/// # Examples
///
/// ```
/// use cumulus::pipeline::ContinuationStage;
///
/// struct Guard {
///     limit: i32,
/// }
///
/// impl ContinuationStage<i32, i32> for Guard {
///     fn process(&self, value: i32, next: &dyn Fn(i32) -> i32) -> i32 {
///         if value > self.limit { self.limit } else { next(value) }
///     }
/// }
///
/// let guard = Guard { limit: 10 };
/// assert_eq!(guard.process(50, &|x| x * 2), 10);
/// assert_eq!(guard.process(5, &|x| x * 2), 10);
/// assert_eq!(guard.process(4, &|x| x * 2), 8);
/// ```
pub trait ContinuationStage<T, R> {
    /// Processes the value, optionally delegating to `next`.
    fn process(&self, value: T, next: &dyn Fn(T) -> R) -> R;
}

impl<T, R, F> ContinuationStage<T, R> for F
where
    F: Fn(T, &dyn Fn(T) -> R) -> R,
{
    #[inline]
    fn process(&self, value: T, next: &dyn Fn(T) -> R) -> R {
        self(value, next)
    }
}

/// A type-erased unary stage as stored by [`Tube`](super::Tube).
pub type BoxedUnaryStage<T> = Box<dyn UnaryStage<T> + Send + Sync>;

/// A type-erased continuation stage as stored by [`Layers`](super::Layers).
pub type BoxedContinuationStage<T, R> = Box<dyn ContinuationStage<T, R> + Send + Sync>;

/// Boxes a unary stage.
///
/// Lets closures be collected into a `Vec` without spelling out the trait
/// object type.
///
/// # Examples
///
/// ```
/// use cumulus::pipeline::{step, tube};
///
/// let pipeline = tube(vec![step(|x: i32| x + 1), step(|x: i32| x * 2)]);
/// assert_eq!(pipeline.call(5), 12);
/// ```
#[inline]
pub fn step<T, S>(stage: S) -> BoxedUnaryStage<T>
where
    S: UnaryStage<T> + Send + Sync + 'static,
{
    Box::new(stage)
}

/// Boxes a continuation stage.
///
/// # Examples
///
/// ```
/// use cumulus::pipeline::{inverted_onion, layer};
///
/// let pipeline = inverted_onion(vec![
///     layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x + 1)),
///     layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x * 2)),
/// ]);
/// assert_eq!(pipeline.call(5), 12);
/// ```
#[inline]
pub fn layer<T, R, S>(stage: S) -> BoxedContinuationStage<T, R>
where
    S: ContinuationStage<T, R> + Send + Sync + 'static,
{
    Box::new(stage)
}
