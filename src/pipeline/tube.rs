//! Forward pipelines.
//!
//! ```text
//!              +--------+     +--------+     +--------+
//!   input  --> | Stage1 | --> | Stage2 | --> | Stage3 | --> result
//!              +--------+     +--------+     +--------+
//! ```

use std::fmt;
use std::sync::Arc;

use super::stage::{BoxedUnaryStage, UnaryStage};

/// A strict left-to-right composition of unary stages.
///
/// Every stage runs exactly once per call, in declaration order, and receives
/// the output of the stage before it. There is no way for a stage to skip the
/// stages after it. An empty tube returns its input unchanged.
///
/// Cloning a `Tube` is cheap: the stage list is shared and never mutated.
///
/// # Examples
///
/// ```
/// use cumulus::pipeline::Tube;
///
/// let pipeline = Tube::new()
///     .then(|x: i32| x + 1)
///     .then(|x: i32| x * 2)
///     .then(|x: i32| x - 3);
///
/// assert_eq!(pipeline.call(5), 9);
/// assert_eq!(pipeline.call(0), -1);
/// ```
pub struct Tube<T> {
    stages: Arc<[SharedUnaryStage<T>]>,
}

type SharedUnaryStage<T> = Arc<dyn UnaryStage<T> + Send + Sync>;

impl<T> Tube<T> {
    /// Creates an empty tube, equivalent to identity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stages: Vec::<SharedUnaryStage<T>>::new().into(),
        }
    }

    /// Creates a tube from an ordered sequence of boxed stages.
    ///
    /// The sequence is consumed once, here; calls iterate the stored stages.
    pub fn from_stages<I>(stages: I) -> Self
    where
        I: IntoIterator<Item = BoxedUnaryStage<T>>,
    {
        let stages: Arc<[SharedUnaryStage<T>]> = stages
            .into_iter()
            .map(SharedUnaryStage::<T>::from)
            .collect();
        tracing::trace!(flavor = "tube", stages = stages.len(), "building pipeline");
        Self { stages }
    }

    /// Returns a new tube with `stage` appended after the existing stages.
    ///
    /// Clones of the receiver keep their own stage list.
    #[must_use]
    pub fn then<S>(self, stage: S) -> Self
    where
        S: UnaryStage<T> + Send + Sync + 'static,
    {
        let mut stages = Vec::with_capacity(self.stages.len() + 1);
        stages.extend(self.stages.iter().cloned());
        stages.push(Arc::new(stage) as SharedUnaryStage<T>);
        tracing::trace!(flavor = "tube", stages = stages.len(), "building pipeline");
        Self {
            stages: stages.into(),
        }
    }

    /// Runs the value through every stage, left to right.
    pub fn call(&self, value: T) -> T {
        self.stages
            .iter()
            .fold(value, |passable, stage| stage.apply(passable))
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the tube has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Converts the tube into a plain closure.
    pub fn into_fn(self) -> impl Fn(T) -> T {
        move |value| self.call(value)
    }
}

impl<T> Default for Tube<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Tube<T> {
    fn clone(&self) -> Self {
        Self {
            stages: Arc::clone(&self.stages),
        }
    }
}

impl<T> fmt::Debug for Tube<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Tube")
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl<T> FromIterator<BoxedUnaryStage<T>> for Tube<T> {
    fn from_iter<I: IntoIterator<Item = BoxedUnaryStage<T>>>(iter: I) -> Self {
        Self::from_stages(iter)
    }
}

impl<T> UnaryStage<T> for Tube<T> {
    fn apply(&self, value: T) -> T {
        self.call(value)
    }
}

/// Builds a forward pipeline from an ordered sequence of unary stages.
///
/// `tube([s1, s2, s3]).call(v) == s3(s2(s1(v)))`. An empty sequence yields
/// a pipeline that behaves like [`identity`](crate::compose::identity).
///
/// # Examples
///
/// ```
/// use cumulus::pipeline::{step, tube};
///
/// let pipeline = tube(vec![step(|x: i32| x + 1), step(|x: i32| x * 2), step(|x: i32| x - 3)]);
/// assert_eq!(pipeline.call(5), 9);
///
/// let empty = tube::<i32, _>(Vec::new());
/// assert_eq!(empty.call(5), 5);
/// ```
pub fn tube<T, I>(stages: I) -> Tube<T>
where
    I: IntoIterator<Item = BoxedUnaryStage<T>>,
{
    Tube::from_stages(stages)
}
