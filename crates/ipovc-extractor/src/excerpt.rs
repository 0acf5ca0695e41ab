//! Excerpt selection for the hybrid prompt

use crate::scanner::{has_percent_sign, is_vc_line};

/// Selects the lines of a document worth sending to the model
///
/// A line qualifies if it contains a VC keyword or a percent sign. Lines
/// keep their document order and are joined with `\n`.
pub struct ExcerptSelector {
    line_limit: usize,
}

impl ExcerptSelector {
    /// Create a selector that keeps at most `line_limit` lines
    pub fn new(line_limit: usize) -> Self {
        Self { line_limit }
    }

    /// Build the excerpt for `text`
    pub fn select(&self, text: &str) -> String {
        text.lines()
            .filter(|line| is_vc_line(line) || has_percent_sign(line))
            .take(self.line_limit)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_keyword_and_percent_lines_in_order() {
        let text = "目录\n某某创投持股\n营业收入\n毛利率 35%\n其他";
        let excerpt = ExcerptSelector::new(10).select(text);
        assert_eq!(excerpt, "某某创投持股\n毛利率 35%");
    }

    #[test]
    fn test_respects_line_limit() {
        let text = (0..200)
            .map(|i| format!("第{}行 基金", i))
            .collect::<Vec<_>>()
            .join("\n");
        let excerpt = ExcerptSelector::new(120).select(&text);
        assert_eq!(excerpt.lines().count(), 120);
        assert!(excerpt.starts_with("第0行"));
        assert!(excerpt.ends_with("第119行 基金"));
    }

    #[test]
    fn test_full_width_percent_counts() {
        let excerpt = ExcerptSelector::new(5).select("持股 8％\n无关");
        assert_eq!(excerpt, "持股 8％");
    }

    #[test]
    fn test_nothing_qualifies() {
        assert_eq!(ExcerptSelector::new(5).select("第一行\n第二行"), "");
    }
}
