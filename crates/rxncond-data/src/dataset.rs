// Dataset trait — unified indexed-access interface

/// A dataset is an indexed, sized collection of examples.
///
/// Implementations must be `Send + Sync` so a batching layer can read from
/// multiple threads. `get` takes `&self`: retrieval never mutates the
/// dataset, so concurrent calls for distinct (or equal) indices are safe.
pub trait Dataset: Send + Sync {
    /// What one retrieved example looks like.
    type Item;

    /// Total number of examples in the dataset.
    fn len(&self) -> usize;

    /// Whether the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieve the example at position `index`.
    ///
    /// # Panics
    /// May panic if `index >= self.len()`.
    fn get(&self, index: usize) -> Self::Item;

    /// Optional human-readable name.
    fn name(&self) -> &str {
        "dataset"
    }
}
