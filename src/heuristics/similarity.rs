/// Sequence similarity in `[0, 1]`: twice the number of characters in
/// matching blocks divided by the total length of both strings.
///
/// Matching blocks are found Ratcliff/Obershelp style: take the longest
/// common block (earliest in `a`, then earliest in `b`) and recurse on
/// both sides of it.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_characters(&a[..i], &b[..j])
        + matching_characters(&a[i + size..], &b[j + size..])
}

/// `(start_in_a, start_in_b, length)` of the longest common block
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let size = current[j + 1];
            if size > best.2 {
                best = (i + 1 - size, j + 1 - size, size);
            }
        }
        std::mem::swap(&mut prev, &mut current);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_and_disjoint() {
        assert_eq!(similarity_ratio("Hans Müller", "Hans Müller"), 1.0);
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn test_known_ratio() {
        // "abcd" vs "bcde": one block "bcd" -> 2 * 3 / 8
        assert!((similarity_ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_recursion_counts_blocks_on_both_sides() {
        // blocks "Hans M", "ller" around the differing umlaut spelling
        let ratio = similarity_ratio("Hans Müller", "Hans Mueller");
        assert!((ratio - 2.0 * 10.0 / 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_more_shared_text_scores_higher() {
        let label = "Müller";
        assert!(similarity_ratio(label, "Hans Müller") > similarity_ratio(label, "Hans Mueller"));
    }
}
