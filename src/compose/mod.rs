//! Function composition utilities.
//!
//! This module provides the building blocks shared by every pipeline flavor:
//!
//! - [`identity`]: The identity function - returns its argument unchanged
//! - [`identity_fn`]: The identity function as a storable `fn` value
//! - [`tube!`]: Static left-to-right composition of type-changing functions
//!
//! # Examples
//!
//! ```
//! use cumulus::compose::identity;
//! use cumulus::tube;
//!
//! fn add_one(x: i32) -> i32 { x + 1 }
//! fn double(x: i32) -> i32 { x * 2 }
//!
//! // tube!(f, g)(x) = g(f(x))
//! let composed = tube!(add_one, double);
//! assert_eq!(composed(5), 12);
//!
//! let unchanged = tube!(identity, add_one, identity);
//! assert_eq!(unchanged(5), add_one(5));
//! ```
//!
//! # Laws
//!
//! - **Associativity**: `tube!(tube!(f, g), h) == tube!(f, tube!(g, h))`
//! - **Left Identity**: `tube!(identity, f) == f`
//! - **Right Identity**: `tube!(f, identity) == f`

mod tube_macro;
mod utils;

pub use utils::{identity, identity_fn};

// Re-export macros (they are already at crate root via #[macro_export])
pub use crate::tube;
