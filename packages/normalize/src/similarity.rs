//! Character-level string similarity.

/// Similarity of two strings in `[0.0, 1.0]`.
///
/// Computed as `2 * L / (|a| + |b|)` where `L` is the length of the longest
/// common subsequence of the lowercased characters. The measure is
/// symmetric, `ratio(a, a) == 1.0` for any `a`, and two empty strings are
/// fully similar.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().flat_map(char::to_lowercase).collect();
    let b: Vec<char> = b.chars().flat_map(char::to_lowercase).collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    (2 * longest_common_subsequence(&a, &b)) as f64 / total as f64
}

/// LCS length with a single rolling row over the shorter input.
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if inner.is_empty() {
        return 0;
    }

    let mut row = vec![0usize; inner.len() + 1];
    for &x in outer {
        let mut diagonal = 0;
        for (j, &y) in inner.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }

    row[inner.len()]
}
