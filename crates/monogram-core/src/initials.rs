use regex::Regex;
use std::sync::OnceLock;

fn override_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([^)]+)\)").expect("valid regex"))
}

/// Returns the initials shown on a fallback avatar.
///
/// A parenthesized segment overrides the derivation: `"Karl Benson (ka)"` yields `"KA"`. Otherwise
/// the first letters of the first and last whitespace-separated words are used, so `"Karl Benson"`
/// yields `"KB"` and `"Madonna"` yields `"M"`. Blank names yield an empty string.
pub fn initials(name: &str) -> String {
    if let Some(caps) = override_re().captures(name) {
        if let Some(m) = caps.get(1) {
            return m.as_str().to_uppercase();
        }
    }

    let mut words = name.split_whitespace();
    let Some(first) = words.next() else {
        return String::new();
    };
    let mut out = String::with_capacity(2);
    out.extend(first.chars().next().into_iter().flat_map(char::to_uppercase));
    if let Some(last) = words.next_back() {
        out.extend(last.chars().next().into_iter().flat_map(char::to_uppercase));
    }
    out
}
