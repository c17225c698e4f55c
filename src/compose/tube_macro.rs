//! The `tube!` macro for left-to-right function composition.
//!
//! [`Tube`](crate::pipeline::Tube) stores its stages as trait objects and
//! therefore requires every stage to map `T -> T`. The [`tube!`] macro composes
//! statically, so each function may change the type flowing through it.

/// Composes functions from left to right into a single closure.
///
/// `tube!(f, g, h)(x)` is equivalent to `h(g(f(x)))`.
///
/// # Syntax
///
/// - `tube!()` - The identity function
/// - `tube!(f)` - Returns `f` unchanged
/// - `tube!(f, g)` - Returns `|x| g(f(x))`
/// - `tube!(f, g, h, ...)` - Composes any number of functions
///
/// # Laws
///
/// - **Left Identity**: `tube!(identity, f) == f`
/// - **Right Identity**: `tube!(f, identity) == f`
/// - **Associativity**: `tube!(tube!(f, g), h) == tube!(f, tube!(g, h))`
///
/// # Examples
///
/// ```
/// use cumulus::tube;
///
/// fn add_one(x: i32) -> i32 { x + 1 }
/// fn double(x: i32) -> i32 { x * 2 }
/// fn subtract_three(x: i32) -> i32 { x - 3 }
///
/// let composed = tube!(add_one, double, subtract_three);
/// assert_eq!(composed(5), 9); // ((5 + 1) * 2) - 3
/// ```
///
/// ## Type-changing stages
///
/// ```
/// use cumulus::tube;
///
/// let length_of_rendered = tube!(|x: u32| x * 1000, |x: u32| x.to_string(), |s: String| s.len());
/// assert_eq!(length_of_rendered(42), 5);
/// ```
#[macro_export]
macro_rules! tube {
    // No functions: identity
    () => {
        $crate::compose::identity
    };

    // Single function: returned as-is
    ($function:expr $(,)?) => {
        $function
    };

    // Two or more functions: the first runs, the rest receive its output
    // tube!(f, g, ...) = |x| tube!(g, ...)(f(x))
    ($first_function:expr, $($remaining_functions:expr),+ $(,)?) => {{
        let first = $first_function;
        let rest = $crate::tube!($($remaining_functions),+);
        move |input| rest(first(input))
    }};
}
