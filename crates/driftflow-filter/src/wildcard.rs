//! Wildcard string matching for whole-resource ignore rules

/// Match `value` against `pattern`, where `*` matches zero or more characters
///
/// Literal characters match case-sensitively. Runs in O(|value| * |pattern|)
/// in the worst case: on mismatch the last `*` is retried one character
/// further along instead of exploring every split.
pub fn wildcard_match(value: &str, pattern: &str) -> bool {
    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let (mut v, mut p) = (0, 0);
    // Position of the last `*` seen and the value index it currently extends to
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        match pattern.get(p) {
            Some('*') => {
                backtrack = Some((p, v));
                p += 1;
            }
            Some(&c) if c == value[v] => {
                v += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    v = matched + 1;
                    backtrack = Some((star, v));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}
