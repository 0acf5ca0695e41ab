//! Merge resolver: field-by-field precedence between rule and model records

use crate::types::MergeOutcome;
use ipovc_domain::{normalize_percent, ExtractionRecord, Field, FieldOrigin, FieldOrigins};
use tracing::debug;

/// Combine the rule record with an optional model record
///
/// Precedence per field:
/// - code, company and VC name: model value if non-empty after trim
/// - percent: model value if non-empty, normalized to `pp.pp%`
/// - flags: model value only if it is exactly `"0"` or `"1"`, untrimmed
/// - appointee types: model value (trimmed, possibly empty) whenever a
///   model record exists
///
/// If the merged record names no VC, the VC-dependent fields are reset to
/// their defaults.
pub fn merge_records(rule: &ExtractionRecord, llm: Option<&ExtractionRecord>) -> MergeOutcome {
    let Some(llm) = llm else {
        return MergeOutcome {
            record: rule.clone(),
            origins: FieldOrigins::default(),
        };
    };

    let mut record = rule.clone();
    let mut origins = FieldOrigins::default();

    for field in Field::ALL {
        if let Some(value) = take_llm_value(field, llm.get(field)) {
            record.set(field, value);
            origins.set(field, FieldOrigin::Llm);
        }
    }

    if record.clear_dependents_without_vc() {
        debug!("Merged record names no VC, dependent fields reset");
    }

    MergeOutcome { record, origins }
}

/// The model value to use for `field`, or `None` to keep the rule value
fn take_llm_value(field: Field, raw: &str) -> Option<String> {
    let value = raw.trim();
    match field {
        Field::VcPercent => (!value.is_empty()).then(|| normalize_percent(value, 0.0)),
        f if f.is_flag() => matches!(raw, "0" | "1").then(|| raw.to_string()),
        f if f.is_appointee_type() => Some(value.to_string()),
        _ => (!value.is_empty()).then(|| value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_record() -> ExtractionRecord {
        ExtractionRecord::empty()
            .with(Field::StockCode, "688001")
            .with(Field::CompanyName, "华兴源创")
            .with(Field::VcName, "深圳市创新投资")
            .with(Field::VcPercent, "12.50%")
            .with(Field::HasBoardAppointee, "1")
    }

    #[test]
    fn test_no_llm_record_keeps_rules() {
        let rule = rule_record();
        let outcome = merge_records(&rule, None);
        assert_eq!(outcome.record, rule);
        assert_eq!(outcome.origins.count(FieldOrigin::Rule), 10);
    }

    #[test]
    fn test_non_empty_llm_values_win() {
        let llm = ExtractionRecord::blank()
            .with(Field::VcName, " 深圳市创新投资集团有限公司 ")
            .with(Field::VcPercent, "13.1%");
        let outcome = merge_records(&rule_record(), Some(&llm));

        assert_eq!(outcome.record.get(Field::StockCode), "688001");
        assert_eq!(outcome.origins.get(Field::StockCode), FieldOrigin::Rule);
        assert_eq!(outcome.record.get(Field::VcName), "深圳市创新投资集团有限公司");
        assert_eq!(outcome.origins.get(Field::VcName), FieldOrigin::Llm);
        assert_eq!(outcome.record.get(Field::VcPercent), "13.10%");
    }

    #[test]
    fn test_percent_normalization() {
        let cases = [("150%", "100.00%"), ("-2", "0.00%"), ("abc", "0.00%"), ("8", "8.00%")];
        for (raw, expected) in cases {
            let llm = ExtractionRecord::blank().with(Field::VcPercent, raw);
            let outcome = merge_records(&rule_record(), Some(&llm));
            assert_eq!(outcome.record.get(Field::VcPercent), expected, "input {}", raw);
        }
    }

    #[test]
    fn test_only_strict_flags_are_taken() {
        let llm = ExtractionRecord::blank()
            .with(Field::HasBoardAppointee, "yes")
            .with(Field::HasSupervisorAppointee, " 1 ")
            .with(Field::HasExecutiveAppointee, "1");
        let outcome = merge_records(&rule_record(), Some(&llm));

        assert_eq!(outcome.record.get(Field::HasBoardAppointee), "1");
        assert_eq!(outcome.origins.get(Field::HasBoardAppointee), FieldOrigin::Rule);
        assert_eq!(outcome.record.get(Field::HasSupervisorAppointee), "0");
        assert_eq!(outcome.origins.get(Field::HasSupervisorAppointee), FieldOrigin::Rule);
        assert_eq!(outcome.record.get(Field::HasExecutiveAppointee), "1");
        assert_eq!(outcome.origins.get(Field::HasExecutiveAppointee), FieldOrigin::Llm);
    }

    #[test]
    fn test_types_always_come_from_llm() {
        let rule = rule_record().with(Field::BoardAppointeeType, "技术型");
        let llm = ExtractionRecord::blank().with(Field::SupervisorAppointeeType, " 复合型 ");
        let outcome = merge_records(&rule, Some(&llm));

        assert_eq!(outcome.record.get(Field::BoardAppointeeType), "");
        assert_eq!(outcome.record.get(Field::SupervisorAppointeeType), "复合型");
        assert_eq!(outcome.origins.get(Field::ExecutiveAppointeeType), FieldOrigin::Llm);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let llm = ExtractionRecord::blank()
            .with(Field::VcPercent, "9.5")
            .with(Field::HasBoardAppointee, "0")
            .with(Field::BoardAppointeeType, "财务型");
        let once = merge_records(&rule_record(), Some(&llm)).record;
        let twice = merge_records(&once, Some(&llm)).record;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_vc_after_merge_resets_dependents() {
        let rule = ExtractionRecord::empty().with(Field::StockCode, "688001");
        let llm = ExtractionRecord::blank()
            .with(Field::VcName, "（无）")
            .with(Field::VcPercent, "5%")
            .with(Field::HasBoardAppointee, "1")
            .with(Field::BoardAppointeeType, "财务型");
        let outcome = merge_records(&rule, Some(&llm));

        assert_eq!(outcome.record.get(Field::VcName), "（无）");
        assert_eq!(outcome.record.get(Field::VcPercent), "0%");
        assert_eq!(outcome.record.get(Field::HasBoardAppointee), "0");
        assert_eq!(outcome.record.get(Field::BoardAppointeeType), "");
    }
}
