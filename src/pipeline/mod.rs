//! Pipelines and middleware dispatchers built from ordered stage lists.
//!
//! Three flavors are provided:
//!
//! | Flavor | Entry point | Stage shape | Execution order | Interruptible |
//! |--------|-------------|-------------|-----------------|---------------|
//! | Tube | [`tube`] | `Fn(T) -> T` | first to last | no |
//! | Onion | [`onion`] | `Fn(T, next) -> R` | last to first | yes |
//! | Inverted onion | [`inverted_onion`] | `Fn(T, next) -> R` | first to last | yes |
//!
//! Every builder returns a single callable that can be invoked any number of
//! times. Building never invokes a stage, and the order of the supplied stages
//! is the only thing that determines the order of execution. An empty stage
//! list always composes to [`identity`](crate::compose::identity).
//!
//! # Examples
//!
//! ## Middleware with early termination
//!
//! ```
//! use cumulus::pipeline::Layers;
//!
//! let handler = Layers::with_terminal(|request: &'static str| format!("200 {request}"))
//!     .layer(|request: &'static str, next: &dyn Fn(&'static str) -> String| {
//!         if request.starts_with("/admin") {
//!             "403 forbidden".to_string()
//!         } else {
//!             next(request)
//!         }
//!     })
//!     .layer(|request: &'static str, next: &dyn Fn(&'static str) -> String| {
//!         format!("{} (logged)", next(request))
//!     })
//!     .onion();
//!
//! // The logging layer was declared last, so it is the outermost one.
//! assert_eq!(handler.call("/home"), "200 /home (logged)");
//! assert_eq!(handler.call("/admin/users"), "403 forbidden (logged)");
//! ```
//!
//! # Laws
//!
//! - **Empty**: `tube([]) == onion([]) == inverted_onion([]) == identity`
//! - **Forward**: `tube([f, g, h])(x) == h(g(f(x)))`
//! - **Reversal**: `onion(stages) == inverted_onion(reversed(stages))`

mod dispatcher;
mod onion;
mod stage;
mod tube;

pub use dispatcher::Dispatcher;
pub use onion::{Layers, inverted_onion, inverted_onion_with_terminal, onion, onion_with_terminal};
pub use stage::{
    BoxedContinuationStage, BoxedUnaryStage, ContinuationStage, UnaryStage, layer, step,
};
pub use tube::{Tube, tube};

static_assertions::assert_impl_all!(Tube<i32>: Send, Sync, Clone);
static_assertions::assert_impl_all!(Dispatcher<String, usize>: Send, Sync, Clone);
