//! Ordered fallback: try candidates in order, first success wins.
//!
//! Both the interpreter search and the agent owner resolution are
//! instances of the same shape. [`first_hit`] is the primitive;
//! [`FallbackChain`] adds labelled tiers and a default on top of it.

/// Scan `candidates` in order and return the first `Some` produced by `attempt`.
///
/// Candidates after the first hit are never evaluated.
pub fn first_hit<I, T, F>(candidates: I, mut attempt: F) -> Option<T>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Option<T>,
{
    for candidate in candidates {
        if let Some(hit) = attempt(candidate) {
            return Some(hit);
        }
    }
    None
}

type Tier<'a, T> = (&'static str, Box<dyn FnOnce() -> Option<T> + 'a>);

/// Labelled tiers tried in declaration order, optionally ending in a default.
pub struct FallbackChain<'a, T> {
    tiers: Vec<Tier<'a, T>>,
}

impl<T> Default for FallbackChain<'_, T> {
    fn default() -> Self {
        Self { tiers: Vec::new() }
    }
}

impl<'a, T> FallbackChain<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tier. Tiers run lazily and only until one succeeds.
    pub fn or_try<F>(mut self, label: &'static str, tier: F) -> Self
    where
        F: FnOnce() -> Option<T> + 'a,
    {
        self.tiers.push((label, Box::new(tier)));
        self
    }

    /// Run the tiers; returns the winning label and value, if any.
    pub fn resolve(self) -> Option<(&'static str, T)> {
        first_hit(self.tiers, |(label, run)| match run() {
            Some(value) => {
                tracing::debug!("fallback tier '{}' matched", label);
                Some((label, value))
            }
            None => {
                tracing::debug!("fallback tier '{}' yielded nothing", label);
                None
            }
        })
    }

    /// Run the tiers, falling back to `default` labelled `"default"`.
    pub fn resolve_or(self, default: T) -> (&'static str, T) {
        self.resolve().unwrap_or(("default", default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn first_hit_stops_at_first_success() {
        let calls = Cell::new(0);
        let hit = first_hit([1, 2, 3, 4], |n| {
            calls.set(calls.get() + 1);
            (n % 2 == 0).then_some(n * 10)
        });
        assert_eq!(hit, Some(20));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn first_hit_none_when_all_miss() {
        let hit: Option<i32> = first_hit(Vec::<i32>::new(), Some);
        assert!(hit.is_none());
    }

    #[test]
    fn chain_prefers_earlier_tiers() {
        let (label, value) = FallbackChain::new()
            .or_try("explicit", || Some("alice"))
            .or_try("server", || Some("bob"))
            .resolve_or("nginx");
        assert_eq!((label, value), ("explicit", "alice"));
    }

    #[test]
    fn chain_skips_empty_tiers() {
        let (label, value) = FallbackChain::new()
            .or_try("explicit", || None)
            .or_try("server", || Some("bob"))
            .resolve_or("nginx");
        assert_eq!((label, value), ("server", "bob"));
    }

    #[test]
    fn chain_does_not_run_later_tiers() {
        let ran = Cell::new(false);
        let _ = FallbackChain::new()
            .or_try("first", || Some(1))
            .or_try("second", || {
                ran.set(true);
                Some(2)
            })
            .resolve();
        assert!(!ran.get());
    }

    #[test]
    fn chain_falls_back_to_default() {
        let (label, value) = FallbackChain::<&str>::new()
            .or_try("explicit", || None)
            .resolve_or("nginx");
        assert_eq!((label, value), ("default", "nginx"));
    }
}
