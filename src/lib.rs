//! # cumulus
//!
//! Function pipelines and middleware dispatchers for Rust.
//!
//! ## Overview
//!
//! Given an ordered list of stages, cumulus builds a single callable that
//! applies them according to one of three disciplines:
//!
//! - **Tube**: strict left-to-right composition of `Fn(T) -> T` stages
//! - **Onion**: LIFO middleware, the last declared stage runs first
//! - **Inverted Onion**: FIFO middleware, the first declared stage runs first
//!
//! Onion stages receive a `next` continuation and may stop the chain by not
//! calling it. Alongside the pipelines, the crate provides:
//!
//! - **Lazy Sequences**: iterators over data produced on demand, mapped through a tube
//! - **DSN Configuration**: connection URLs mapped to named configuration fields
//!
//! ## Feature Flags
//!
//! - `compose`: `identity` and the `tube!` macro
//! - `pipeline`: Tube, Onion, Inverted Onion
//! - `lazy`: Lazy sequences
//! - `dsn`: DSN configuration mapping
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use cumulus::prelude::*;
//!
//! let forward = tube(vec![step(|x: i32| x + 1), step(|x: i32| x * 2)]);
//! assert_eq!(forward.call(5), 12);
//!
//! let guarded = Layers::new()
//!     .layer(|x: i32, next: &dyn Fn(i32) -> i32| if x < 0 { 0 } else { next(x) })
//!     .layer(|x: i32, next: &dyn Fn(i32) -> i32| next(x * 10))
//!     .inverted_onion();
//! assert_eq!(guarded.call(3), 30);
//! assert_eq!(guarded.call(-3), 0);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types, traits and functions.
///
/// # Usage
///
/// ```rust
/// use cumulus::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "compose")]
    pub use crate::compose::*;

    #[cfg(feature = "pipeline")]
    pub use crate::pipeline::*;

    #[cfg(feature = "lazy")]
    pub use crate::lazy::*;

    #[cfg(feature = "dsn")]
    pub use crate::dsn::*;
}

#[cfg(feature = "compose")]
pub mod compose;

#[cfg(feature = "pipeline")]
pub mod pipeline;

#[cfg(feature = "lazy")]
pub mod lazy;

#[cfg(feature = "dsn")]
pub mod dsn;
