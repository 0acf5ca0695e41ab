//! Rule engine: deterministic record from filename and text heuristics

use crate::roles::tag_role;
use crate::scanner::scan_candidates;
use crate::types::RuleOutcome;
use ipovc_domain::percent::format_percent;
use ipovc_domain::{ExtractionRecord, Field, Role, NO_VC_PERCENT};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::debug;

/// A six-digit ASCII run not embedded in a longer digit run
///
/// `\d` is Unicode-aware in `regex`, so digit classes are spelled `[0-9]`.
static SIX_DIGITS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{6})(?:[^0-9]|$)").expect("code pattern is valid")
});

static LABELED_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:股票代码|证券代码)\s*[:：]\s*([0-9]{6})").expect("labeled code pattern is valid")
});

static LABELED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:公司简称|证券简称|发行人)\s*[:：]\s*([\x{4e00}-\x{9fa5}A-Za-z0-9]{2,12})")
        .expect("labeled name pattern is valid")
});

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 12;

/// Stock code from the filename, else from a labeled number in the text
pub fn extract_stock_code(filename: &str, text: &str) -> String {
    let from_filename = SIX_DIGITS
        .captures(file_stem(filename))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    from_filename
        .or_else(|| {
            LABELED_CODE
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .unwrap_or_default()
}

/// Company short name from the filename, else from a labeled name in the text
///
/// The filename convention is `<code>_<name>：<title>.pdf`; the slice after
/// the first underscore up to a colon or dash is accepted if it is 2-12
/// characters long.
pub fn extract_company_name(filename: &str, text: &str) -> String {
    name_from_filename(filename)
        .or_else(|| {
            LABELED_NAME
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .unwrap_or_default()
}

fn name_from_filename(filename: &str) -> Option<String> {
    let stem = file_stem(filename);
    let (_, rest) = stem.split_once('_')?;
    let end = rest
        .find(|c: char| matches!(c, ':' | '：' | '-' | '—'))
        .unwrap_or(rest.len());
    let name = rest[..end].trim();
    let len = name.chars().count();
    (NAME_MIN_CHARS..=NAME_MAX_CHARS)
        .contains(&len)
        .then(|| name.to_string())
}

fn file_stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// Build the rule-based record for one document
///
/// Never fails; every miss degrades to the field's default. Appointee-type
/// fields are always empty because no rule can classify backgrounds.
pub fn apply_rules(filename: &str, text: &str) -> RuleOutcome {
    let candidates = scan_candidates(text);

    let mut record = ExtractionRecord::empty()
        .with(Field::StockCode, extract_stock_code(filename, text))
        .with(Field::CompanyName, extract_company_name(filename, text));

    match candidates.first() {
        Some(top) => {
            record.set(Field::VcName, top.name.clone());
            record.set(Field::VcPercent, format_percent(top.rank_percent()));
            for role in Role::ALL {
                record.set(role.flag_field(), tag_role(text, &top.name, role));
            }
        }
        None => record.set(Field::VcPercent, NO_VC_PERCENT),
    }

    debug!(
        filename,
        candidates = candidates.len(),
        vc = record.get(Field::VcName),
        "Rule engine finished"
    );

    RuleOutcome { record, candidates }
}
