use rand::seq::SliceRandom;
use rand::Rng;

/// Returns a uniformly shuffled copy of `items`. The input is left as is.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Trims and lowercases user input for comparison.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Pulls the first decimal number out of free text, e.g. "about 66.0 Ma" -> 66.0.
pub fn extract_number(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let tail = &s[start..];
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in tail.char_indices() {
        if c.is_ascii_digit() {
            end = i + 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
        } else {
            break;
        }
    }
    tail[..end].parse().ok()
}

/// Formats a value with at most one decimal place, dropping a trailing ".0".
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}
