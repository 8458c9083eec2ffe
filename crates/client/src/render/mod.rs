//! Text rendering of resolved queries.
//!
//! Two layouts are supported:
//!
//! - **Plain**: one `query hits` line per result, queries left-aligned.
//! - **Histogram**: counts right-aligned, followed by a bar of `*` scaled so
//!   that the most popular query gets 100 characters.

use crate::resolve::SearchResult;

/// Width of the bar for the most popular query.
pub const BAR_WIDTH: u64 = 100;

const BAR_CHAR: char = '*';

/// Output layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Plain,
    Histogram,
}

/// Render `results` as one line per result.
pub fn render(results: &[SearchResult], mode: RenderMode) -> Vec<String> {
    let width = results.iter().map(|r| r.query.chars().count()).max().unwrap_or(0);

    match mode {
        RenderMode::Plain => results
            .iter()
            .map(|r| format!("{:<width$} {} hits", r.query, r.hits))
            .collect(),
        RenderMode::Histogram => {
            let max = results.iter().map(|r| r.hits).max().unwrap_or(0);
            let hits_width = max.to_string().len();
            results
                .iter()
                .map(|r| {
                    let bar = BAR_CHAR.to_string().repeat(bar_length(r.hits, max));
                    format!("{:<width$} {:>hits_width$} hits: {}", r.query, r.hits, bar)
                })
                .collect()
        }
    }
}

/// `floor(hits * BAR_WIDTH / max)`; zero when `max` is zero.
fn bar_length(hits: u64, max: u64) -> usize {
    if max == 0 {
        return 0;
    }
    let scaled = u128::from(hits) * u128::from(BAR_WIDTH) / u128::from(max);
    usize::try_from(scaled).unwrap_or(BAR_WIDTH as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(query: &str, hits: u64) -> SearchResult {
        SearchResult { query: query.into(), hits }
    }

    #[test]
    fn test_plain_alignment() {
        let lines = render(&[result("alpha", 100), result("beta", 50)], RenderMode::Plain);
        assert_eq!(lines, vec!["alpha 100 hits", "beta  50 hits"]);
    }

    #[test]
    fn test_histogram_scales_to_max() {
        let lines = render(&[result("alpha", 100), result("beta", 50)], RenderMode::Histogram);
        assert_eq!(lines[0], format!("alpha 100 hits: {}", "*".repeat(100)));
        assert_eq!(lines[1], format!("beta   50 hits: {}", "*".repeat(50)));
    }

    #[test]
    fn test_histogram_zero_hits_gets_empty_bar() {
        let lines = render(&[result("popular", 3), result("obscure", 0)], RenderMode::Histogram);
        assert_eq!(lines[0], format!("popular 3 hits: {}", "*".repeat(100)));
        assert_eq!(lines[1], "obscure 0 hits: ");
    }

    #[test]
    fn test_histogram_all_zero() {
        let lines = render(&[result("a", 0), result("bb", 0)], RenderMode::Histogram);
        assert_eq!(lines, vec!["a  0 hits: ", "bb 0 hits: "]);
    }

    #[test]
    fn test_histogram_floors_bars() {
        let lines = render(&[result("x", 3), result("y", 1)], RenderMode::Histogram);
        assert!(lines[1].ends_with(&format!(": {}", "*".repeat(33))));
    }

    #[test]
    fn test_bar_length_large_counts() {
        assert_eq!(bar_length(u64::MAX, u64::MAX), 100);
        assert_eq!(bar_length(u64::MAX / 2, u64::MAX), 49);
    }

    #[test]
    fn test_empty_results() {
        assert!(render(&[], RenderMode::Plain).is_empty());
        assert!(render(&[], RenderMode::Histogram).is_empty());
    }

    #[test]
    fn test_alignment_counts_chars_not_bytes() {
        let lines = render(&[result("café", 1), result("tokio", 2)], RenderMode::Plain);
        assert_eq!(lines[0], "café  1 hits");
    }
}
