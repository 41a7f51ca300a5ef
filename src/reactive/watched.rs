//! Mount-guarded observed values.

/// A value whose changes notify the owner once it has been mounted.
///
/// The first evaluation after construction is the mount; it never counts as a
/// change. After that, [`Watched::set`] reports whether dependent effects
/// should run.
#[derive(Debug, Clone)]
pub struct Watched<T> {
    value: T,
    initialized: bool,
}

impl<T: PartialEq> Watched<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            initialized: false,
        }
    }

    /// Returns the current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Marks the first evaluation as done.
    pub fn mount(&mut self) {
        self.initialized = true;
    }

    /// Stores `value` and returns true if it differs from the previous value
    /// and the container is mounted.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.initialized
    }
}

impl<T: PartialEq + Default> Default for Watched<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
