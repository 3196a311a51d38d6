//! Value transformation hooks.
//!
//! A pipeline holds an `Option<Hook<T>>` for each stage. `None` leaves the
//! value untouched; `Some(hook)` always replaces the value with whatever the
//! hook returns.

use std::fmt;
use std::sync::Arc;

/// Shareable `T -> T` transformation.
pub struct Hook<T>(Arc<dyn Fn(T) -> T + Send + Sync>);

impl<T> Hook<T> {
	/// Wraps a closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(T) -> T + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	/// Applies the hook.
	pub fn apply(&self, value: T) -> T {
		(self.0)(value)
	}
}

impl<T> Clone for Hook<T> {
	fn clone(&self) -> Self {
		Self(Arc::clone(&self.0))
	}
}

impl<T> fmt::Debug for Hook<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Hook(..)")
	}
}

/// Applies an optional hook; absence is identity.
pub fn apply_hook<T>(hook: Option<&Hook<T>>, value: T) -> T {
	match hook {
		Some(hook) => hook.apply(value),
		None => value,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_absent_hook_is_identity() {
		assert_eq!(apply_hook::<i32>(None, 7), 7);
	}

	#[rstest]
	fn test_present_hook_replaces_value() {
		let hook = Hook::new(|s: String| s.to_uppercase());
		assert_eq!(apply_hook(Some(&hook), "john".to_string()), "JOHN");
	}

	#[rstest]
	fn test_clone_shares_closure() {
		let hook = Hook::new(|n: i32| n * 2);
		let cloned = hook.clone();
		assert_eq!(cloned.apply(21), 42);
		assert_eq!(format!("{:?}", hook), "Hook(..)");
	}
}
