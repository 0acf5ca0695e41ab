//! Candidate scanner: finds venture-capital shareholder hits line by line

use ipovc_domain::{rank_candidates, Candidate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Keywords that mark a line as talking about an investment institution
pub const VC_KEYWORDS: [&str; 14] = [
    "创投",
    "创业投资",
    "风险投资",
    "风投",
    "投资基金",
    "股权投资",
    "产业投资",
    "创新投资",
    "投资合伙",
    "私募",
    "天使",
    "资本",
    "基金",
    "合伙企业",
];

/// A run of 2-50 Chinese/alphanumeric characters ending in a VC-type suffix
static VC_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[\x{4e00}-\x{9fa5}A-Za-z0-9]{2,50}(?:基金|创投|资本|投资公司|投资|创业投资|合伙企业|风险投资)",
    )
    .expect("VC name pattern is valid")
});

/// ASCII or full-width digits followed by a percent sign
static PERCENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9０-９]+(?:[.．][0-9０-９]+)?)\s*[%％]").expect("percent pattern is valid")
});

/// Whether the line contains any VC keyword
pub fn is_vc_line(line: &str) -> bool {
    VC_KEYWORDS.iter().any(|k| line.contains(k))
}

/// Whether the line contains a percent sign
pub fn has_percent_sign(line: &str) -> bool {
    line.contains('%') || line.contains('％')
}

/// First institution-name match on the line
pub fn extract_name(line: &str) -> Option<&str> {
    VC_NAME.find(line).map(|m| m.as_str())
}

/// Largest percentage on the line that does not exceed 100
pub fn max_percent(line: &str) -> Option<f64> {
    PERCENT
        .captures_iter(line)
        .filter_map(|c| to_ascii_number(c.get(1)?.as_str()).parse::<f64>().ok())
        .filter(|v| *v <= 100.0)
        .fold(None, |best: Option<f64>, v| {
            Some(best.map_or(v, |b| b.max(v)))
        })
}

/// Fold full-width digits and the full-width dot to ASCII
fn to_ascii_number(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            '．' => '.',
            _ => c,
        })
        .collect()
}

/// Scan a single line
///
/// Returns `None` for lines without a keyword or without a name match.
pub fn scan_line(line: &str) -> Option<Candidate> {
    if !is_vc_line(line) {
        return None;
    }
    let name = extract_name(line)?;
    Some(Candidate::new(name, max_percent(line)))
}

/// Scan every line of the text and return ranked candidates
///
/// Lines are examined independently. The result is sorted by descending
/// percent; candidates without a percent come last; ties keep line order.
pub fn scan_candidates(text: &str) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = text.lines().filter_map(scan_line).collect();
    rank_candidates(&mut candidates);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_keyword_lines_yield_nothing() {
        let text = "本公司主营业务为集成电路设计\n报告期内营业收入增长 12.00%\n";
        assert!(scan_candidates(text).is_empty());
    }

    #[test]
    fn test_keyword_without_name_is_skipped() {
        // Contains the keyword 基金 but no name run before a suffix
        assert_eq!(scan_line("基金"), None);
        assert!(scan_candidates("基金 5.00%").is_empty());
    }

    #[test]
    fn test_name_and_percent() {
        let c = scan_line("深圳市创新投资集团 持股 12.50%").unwrap();
        assert_eq!(c.name, "深圳市创新投资");
        assert_eq!(c.percent, Some(12.5));
    }

    #[test]
    fn test_first_name_match_wins() {
        let c = scan_line("甲方创投、乙方资本分别持股 3% 和 4%").unwrap();
        assert_eq!(c.name, "甲方创投");
        assert_eq!(c.percent, Some(4.0));
    }

    #[test]
    fn test_max_percent_ignores_values_over_100() {
        assert_eq!(max_percent("持股 5.5% 增长 150% 另 7%"), Some(7.0));
        assert_eq!(max_percent("增长 150%"), None);
        assert_eq!(max_percent("没有百分比"), None);
        assert_eq!(max_percent("比例 0%"), Some(0.0));
    }

    #[test]
    fn test_full_width_percent() {
        assert_eq!(max_percent("持股比例 8.25％"), Some(8.25));
    }

    #[test]
    fn test_full_width_digits_in_percent() {
        assert_eq!(max_percent("持股比例 １２．５０％"), Some(12.5));
        assert_eq!(max_percent("持股 ８% 另 3.5%"), Some(8.0));
        // Other Unicode digits are not numbers here
        assert_eq!(max_percent("持股 \u{0665}%"), None);

        let c = scan_line("某某创投 持股 ２０％").unwrap();
        assert_eq!(c.percent, Some(20.0));
    }

    #[test]
    fn test_over_100_line_still_yields_candidate() {
        let c = scan_line("某某创投 投资回报 200%").unwrap();
        assert_eq!(c.name, "某某创投");
        assert_eq!(c.percent, None);
    }

    #[test]
    fn test_ranking_descending_with_unset_last() {
        let text = "\
甲方创投 无比例
乙方基金 持股 3.00%
丙方资本 持股 0%
丁方创投 持股 9.10%
戊方基金 未披露";
        let names: Vec<_> = scan_candidates(text).into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["丁方创投", "乙方基金", "丙方资本", "甲方创投", "戊方基金"]
        );
    }

    #[test]
    fn test_lines_are_independent() {
        // The percentage on the next line is not attributed to the name.
        let text = "某某创投\n持股 9.00%";
        let candidates = scan_candidates(text);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].percent, None);
    }

    #[test]
    fn test_greedy_run_keeps_longest_suffix_ending() {
        // The run extends to the last suffix in the unbroken run.
        let c = scan_line("某某创业投资基金 持股 6%").unwrap();
        assert_eq!(c.name, "某某创业投资基金");
    }

    #[test]
    fn test_name_length_bound() {
        let long = format!("{}基金", "长".repeat(60));
        let c = scan_line(&long).unwrap();
        // 50-char run plus the two-char suffix
        assert_eq!(c.name.chars().count(), 52);
    }
}
