//! Fixed-width component bitsets.

use std::fmt;

/// Maximum number of registered component types. One bit each.
pub const MAX_COMPONENTS: usize = 64;

/// Component index assigned at registration, `0..MAX_COMPONENTS`.
pub type ComponentId = u8;

/// Bit *i* is set iff the entity owns the component registered as *i*.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature(u64);

impl Signature {
    pub const EMPTY: Self = Self(0);

    pub fn set(&mut self, id: ComponentId) {
        self.0 |= 1 << id;
    }

    pub fn clear(&mut self, id: ComponentId) {
        self.0 &= !(1 << id);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, id: ComponentId) -> Self {
        self.set(id);
        self
    }

    pub fn contains(self, id: ComponentId) -> bool {
        self.0 & (1 << id) != 0
    }

    /// `self AND required == required`.
    pub fn matches(self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Set bits, lowest first.
    pub fn iter(self) -> impl Iterator<Item = ComponentId> {
        (0..MAX_COMPONENTS as u8).filter(move |&i| self.contains(i))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let mut sig = Signature::EMPTY;
        sig.set(0);
        sig.set(63);
        assert!(sig.contains(0) && sig.contains(63));
        assert_eq!(sig.len(), 2);
        sig.clear(0);
        assert!(!sig.contains(0));
        assert_eq!(sig.iter().collect::<Vec<_>>(), vec![63]);
    }

    #[test]
    fn superset_matching() {
        let required = Signature::EMPTY.with(1).with(4);
        assert!(Signature::EMPTY.with(1).with(4).with(7).matches(required));
        assert!(!Signature::EMPTY.with(1).matches(required));
        // Every signature satisfies an empty requirement.
        assert!(Signature::EMPTY.matches(Signature::EMPTY));
    }
}
