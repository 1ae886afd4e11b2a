//! Levenshtein distance over short sequences.
//!
//! Names are compared character by character; row and column signatures are
//! compared token by token (one token per non-blank cell).

/// Edit distance between two sequences (insert, delete, substitute all cost 1).
pub fn levenshtein<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Keep the shorter sequence as the DP row.
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut cur = vec![0usize; short.len() + 1];

    for (i, item_long) in long.iter().enumerate() {
        cur[0] = i + 1;
        for (j, item_short) in short.iter().enumerate() {
            let substitution = prev[j] + usize::from(item_long != item_short);
            let deletion = prev[j + 1] + 1;
            let insertion = cur[j] + 1;
            cur[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    prev[short.len()]
}

/// Character-level edit distance between two strings.
pub fn str_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    levenshtein(&a, &b)
}

/// Edit distance scaled into `[0.0, 1.0]` by the longer string's length.
///
/// Two empty strings have distance `0.0`.
pub fn normalized_str_distance(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    str_distance(a, b) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_examples() {
        assert_eq!(str_distance("kitten", "sitting"), 3);
        assert_eq!(str_distance("flaw", "lawn"), 2);
        assert_eq!(str_distance("", "abc"), 3);
        assert_eq!(str_distance("abc", ""), 3);
        assert_eq!(str_distance("same", "same"), 0);
    }

    #[test]
    fn symmetric() {
        assert_eq!(str_distance("Sheet1", "Sheet 1"), str_distance("Sheet 1", "Sheet1"));
        assert_eq!(levenshtein(&["a", "b", "c"], &["a", "c"]), 1);
        assert_eq!(levenshtein(&["a", "c"], &["a", "b", "c"]), 1);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(str_distance("näme", "name"), 1);
        assert!((normalized_str_distance("näme", "name") - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn normalized_bounds() {
        assert_eq!(normalized_str_distance("", ""), 0.0);
        assert_eq!(normalized_str_distance("abc", "xyz"), 1.0);
        assert_eq!(normalized_str_distance("abc", "abc"), 0.0);
    }
}
