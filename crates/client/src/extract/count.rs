//! Leading hit-count parsing.

use std::sync::LazyLock;

use regex::Regex;

static COUNT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("invalid count pattern"));

/// Parse the first digit run (with `,` separators) in `text`.
///
/// Returns 0 when there is no run or the value does not fit in a `u64`.
pub fn parse_leading_count(text: &str) -> u64 {
    let Some(run) = COUNT_RUN.find(text) else {
        return 0;
    };
    let digits: String = run.as_str().chars().filter(|c| *c != ',').collect();
    digits.parse().unwrap_or(0)
}
