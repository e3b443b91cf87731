//! Text helpers for fixed-width report rendering.

/// Fit a string into exactly `width` characters, truncating with "..." or
/// padding with spaces on the right.
pub fn fit_width(s: &str, width: usize) -> String {
    let chars = s.chars().count();
    if chars > width {
        let keep = width.saturating_sub(3);
        let truncated: String = s.chars().take(keep).collect();
        format!("{truncated}...")
    } else {
        format!("{s}{}", " ".repeat(width - chars))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("AAPL", 6), "AAPL  ");
        assert_eq!(fit_width("bull put 180/175", 10), "bull pu...");
        assert_eq!(fit_width("exact", 5), "exact");
        assert_eq!(fit_width("σ-rich", 6).chars().count(), 6);
    }
}
