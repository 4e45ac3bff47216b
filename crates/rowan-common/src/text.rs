//! Text normalization for case-insensitive keys.

/// Folds `text` to the canonical form used for secondary key comparison.
///
/// Pure and deterministic. Index maintenance and query paths both call this,
/// so equal inputs always land on the same index key.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}
