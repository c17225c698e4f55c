//! The identity combinator.
//!
//! Identity is the unit of every pipeline flavor in this crate:
//!
//! - An empty [`Tube`](crate::pipeline::Tube) behaves like [`identity`].
//! - An empty onion or inverted onion composes to [`identity`].
//! - The innermost continuation of an onion is [`identity`] unless a custom
//!   terminal is supplied.

/// Returns the value unchanged.
///
/// `identity(x) == x` for every `x`. In combinatory logic, this is the I combinator.
///
/// # Examples
///
/// ```
/// use cumulus::compose::identity;
///
/// assert_eq!(identity(42), 42);
/// assert_eq!(identity("hello"), "hello");
/// assert_eq!(identity(vec![1, 2, 3]), vec![1, 2, 3]);
/// ```
#[inline]
pub fn identity<T>(value: T) -> T {
    value
}

/// Returns the identity function as a function value.
///
/// Useful wherever a unary function has to be passed around or stored, for
/// example as the terminal continuation of a dispatcher.
///
/// # Examples
///
/// ```
/// use cumulus::compose::identity_fn;
///
/// let function = identity_fn::<String>();
/// assert_eq!(function("unchanged".to_string()), "unchanged");
/// ```
#[inline]
pub fn identity_fn<T>() -> fn(T) -> T {
    identity::<T>
}
