//! Deferred sequences.
//!
//! - [`LazySequence`]: An iterator over data produced on demand by a provider,
//!   with a forward pipeline of per-element mappers
//!
//! # Examples
//!
//! ```rust
//! use cumulus::lazy::LazySequence;
//!
//! let sequence = LazySequence::new(|| vec![1, 2, 3])
//!     .then(|x: i32| x * 10)
//!     .then(|x: i32| x + 1);
//!
//! // The provider has not run yet.
//! assert!(!sequence.is_started());
//!
//! assert_eq!(sequence.collect::<Vec<_>>(), vec![11, 21, 31]);
//! ```

mod sequence;

pub use sequence::LazySequence;
