//! Iteration over data supplied by a deferred provider.

use std::fmt;

use crate::pipeline::{Tube, UnaryStage};

enum SequenceState<P, I> {
    /// The provider has not been called yet.
    Deferred(P),
    /// The provider has been called; contains the iterator over its data.
    Running(I),
    /// The provider panicked. The sequence is now unusable.
    Poisoned,
}

/// An iterator whose data source is produced on demand.
///
/// The provider is called once, when the first element is requested. Every
/// element then flows through the mapper pipeline, in the order the mappers
/// were added, before it is yielded. Indexed mappers also receive the
/// element's zero-based position in the provider's data.
///
/// Iteration is single-pass: once exhausted, the sequence keeps returning
/// `None` and the provider is not called again.
///
/// # Type Parameters
///
/// * `T` - The element type
/// * `P` - The provider, `FnOnce() -> I`
/// * `I` - The collection or iterator returned by the provider
///
/// # Examples
///
/// ```rust
/// use cumulus::lazy::LazySequence;
/// use std::cell::Cell;
///
/// let calls = Cell::new(0);
/// let mut sequence = LazySequence::new(|| {
///     calls.set(calls.get() + 1);
///     ["a", "b"].map(String::from)
/// })
/// .then(|s: String| s.to_uppercase());
///
/// assert_eq!(calls.get(), 0);
/// assert_eq!(sequence.next().as_deref(), Some("A"));
/// assert_eq!(sequence.next().as_deref(), Some("B"));
/// assert_eq!(sequence.next(), None);
/// assert_eq!(calls.get(), 1);
/// ```
pub struct LazySequence<T, P, I>
where
    I: IntoIterator<Item = T>,
{
    state: SequenceState<P, I::IntoIter>,
    mappers: Tube<(usize, T)>,
    position: usize,
}

/// Lifts a unary mapper over positioned elements.
struct Unindexed<M>(M);

impl<T, M: UnaryStage<T>> UnaryStage<(usize, T)> for Unindexed<M> {
    fn apply(&self, (position, value): (usize, T)) -> (usize, T) {
        (position, self.0.apply(value))
    }
}

/// Lifts an indexed mapper over positioned elements.
struct Indexed<M>(M);

impl<T, M: Fn(T, usize) -> T> UnaryStage<(usize, T)> for Indexed<M> {
    fn apply(&self, (position, value): (usize, T)) -> (usize, T) {
        (position, (self.0)(value, position))
    }
}

impl<T, P, I> LazySequence<T, P, I>
where
    P: FnOnce() -> I,
    I: IntoIterator<Item = T>,
{
    /// Creates a sequence backed by `provider`, without mappers.
    ///
    /// The provider is not called here.
    #[inline]
    pub fn new(provider: P) -> Self {
        Self {
            state: SequenceState::Deferred(provider),
            mappers: Tube::new(),
            position: 0,
        }
    }

    /// Creates a sequence backed by `provider` with a first mapper.
    pub fn with_mapper<M>(provider: P, mapper: M) -> Self
    where
        M: UnaryStage<T> + Send + Sync + 'static,
    {
        Self::new(provider).then(mapper)
    }

    /// Appends a mapper applied to every element after the existing mappers.
    ///
    /// Elements already yielded are not affected.
    #[must_use]
    pub fn then<M>(mut self, mapper: M) -> Self
    where
        M: UnaryStage<T> + Send + Sync + 'static,
    {
        self.mappers = self.mappers.then(Unindexed(mapper));
        self
    }

    /// Appends a mapper that also receives the element's position.
    ///
    /// Positions count from zero in the order the provider yields elements,
    /// whether or not earlier elements were mapped.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cumulus::lazy::LazySequence;
    ///
    /// let labels = LazySequence::new(|| vec!["a", "b", "c"].into_iter().map(String::from))
    ///     .then_indexed(|label: String, position| format!("{position}:{label}"));
    ///
    /// assert_eq!(labels.collect::<Vec<_>>(), vec!["0:a", "1:b", "2:c"]);
    /// ```
    #[must_use]
    pub fn then_indexed<M>(mut self, mapper: M) -> Self
    where
        M: Fn(T, usize) -> T + Send + Sync + 'static,
    {
        self.mappers = self.mappers.then(Indexed(mapper));
        self
    }

    /// Returns `true` once the provider has been called.
    #[must_use]
    pub fn is_started(&self) -> bool {
        !matches!(self.state, SequenceState::Deferred(_))
    }

    /// Returns the number of mappers applied to each element.
    #[must_use]
    pub fn mapper_count(&self) -> usize {
        self.mappers.len()
    }

    /// Returns the position of the next element to be yielded.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Calls the provider, leaving the state poisoned if it panics.
    fn start(&mut self) {
        if !matches!(self.state, SequenceState::Deferred(_)) {
            return;
        }
        let SequenceState::Deferred(provider) =
            std::mem::replace(&mut self.state, SequenceState::Poisoned)
        else {
            unreachable!()
        };
        let iterator = provider().into_iter();
        tracing::trace!(mappers = self.mappers.len(), "lazy sequence provider resolved");
        self.state = SequenceState::Running(iterator);
    }
}

impl<T, P, I> Iterator for LazySequence<T, P, I>
where
    P: FnOnce() -> I,
    I: IntoIterator<Item = T>,
{
    type Item = T;

    /// Yields the next mapped element, calling the provider on first use.
    ///
    /// # Panics
    ///
    /// Panics if a previous call to the provider panicked.
    fn next(&mut self) -> Option<T> {
        self.start();
        match &mut self.state {
            SequenceState::Running(iterator) => {
                let element = iterator.next()?;
                let position = self.position;
                self.position += 1;
                let (_, mapped) = self.mappers.call((position, element));
                Some(mapped)
            }
            SequenceState::Poisoned => panic!("LazySequence provider has been poisoned"),
            SequenceState::Deferred(_) => unreachable!("LazySequence should be started"),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.state {
            SequenceState::Running(iterator) => iterator.size_hint(),
            SequenceState::Deferred(_) => (0, None),
            SequenceState::Poisoned => (0, Some(0)),
        }
    }
}

impl<T, P, I> fmt::Debug for LazySequence<T, P, I>
where
    I: IntoIterator<Item = T>,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            SequenceState::Deferred(_) => "Deferred",
            SequenceState::Running(_) => "Running",
            SequenceState::Poisoned => "Poisoned",
        };
        formatter
            .debug_struct("LazySequence")
            .field("state", &state)
            .field("mappers", &self.mappers.len())
            .field("position", &self.position)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_provider_is_deferred_until_first_element() {
        let called = Cell::new(false);
        let mut sequence = LazySequence::new(|| {
            called.set(true);
            vec![1, 2]
        });

        assert!(!called.get());
        assert!(!sequence.is_started());
        assert_eq!(sequence.next(), Some(1));
        assert!(called.get());
        assert!(sequence.is_started());
    }

    #[test]
    fn test_mappers_apply_in_order() {
        let sequence = LazySequence::with_mapper(|| 1..=3, |x: i32| x + 1).then(|x: i32| x * 2);
        assert_eq!(sequence.collect::<Vec<_>>(), vec![4, 6, 8]);
    }

    #[test]
    fn test_exhausted_sequence_stays_exhausted() {
        let calls = Cell::new(0);
        let mut sequence = LazySequence::new(|| {
            calls.set(calls.get() + 1);
            Vec::<i32>::new()
        });

        assert_eq!(sequence.next(), None);
        assert_eq!(sequence.next(), None);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_indexed_mapper_sees_positions() {
        let sequence = LazySequence::new(|| vec![10, 20, 30])
            .then(|x: i32| x + 1)
            .then_indexed(|x: i32, position| x * 100 + i32::try_from(position).unwrap_or(i32::MAX));

        assert_eq!(sequence.collect::<Vec<_>>(), vec![1100, 2101, 3102]);
    }

    #[test]
    fn test_size_hint_before_and_after_start() {
        let mut sequence = LazySequence::new(|| vec!['a', 'b', 'c']);
        assert_eq!(sequence.size_hint(), (0, None));
        sequence.next();
        assert_eq!(sequence.size_hint(), (2, Some(2)));
    }
}
