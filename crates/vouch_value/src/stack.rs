//! Stack growth for structural walks.
//!
//! Equality, diffing and exported-field cloning all recurse once per level of
//! nesting in the values they visit. Test fixtures can be arbitrarily deep
//! (long linked lists built from `Ref` cells are the usual culprit), so every
//! recursive step goes through [`ensure_sufficient_stack`].
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: plain call, the runtime manages its own stack.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (1MB).
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_depth(levels: usize) -> usize {
        ensure_sufficient_stack(|| {
            if levels == 0 {
                0
            } else {
                nested_depth(levels - 1) + 1
            }
        })
    }

    #[test]
    fn shallow_walk_returns_depth() {
        assert_eq!(nested_depth(16), 16);
    }

    #[test]
    fn deep_walk_does_not_overflow() {
        assert_eq!(nested_depth(200_000), 200_000);
    }

    #[test]
    fn passes_through_result() {
        let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("boom"));
        assert_eq!(result, Err("boom"));
    }
}
