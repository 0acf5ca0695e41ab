//! Prompt construction for the model

use ipovc_domain::{AppointeeType, Candidate, ExtractionRecord, Field};
use serde_json::{Map, Value};

/// Builds the user prompt sent to the model
///
/// Without a rule guess the prompt carries the whole document text. With a
/// rule guess it becomes the hybrid prompt: the guess, the ranked
/// candidates and an excerpt of the document.
pub struct PromptBuilder {
    filename: String,
    text: String,
    rule_guess: Option<ExtractionRecord>,
    candidates: Vec<Candidate>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
            rule_guess: None,
            candidates: Vec::new(),
        }
    }

    /// Include the rule engine's record as a starting point
    pub fn with_rule_guess(mut self, record: ExtractionRecord) -> Self {
        self.rule_guess = Some(record);
        self
    }

    /// Include ranked candidates
    pub fn with_candidates(mut self, candidates: Vec<Candidate>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Task and per-field requirements
        let source = if self.rule_guess.is_some() {
            "招股说明书相关摘录"
        } else {
            "招股说明书全文"
        };
        prompt.push_str(&format!(
            "你是资本市场研究助手。请阅读下方{}，结合文件名信息，输出一个 JSON（不要 Markdown 代码块）。字段要求：\n",
            source
        ));
        for field in Field::ALL {
            prompt.push_str(&format!("- \"{}\": {}\n", field.label(), field_requirement(field)));
        }
        prompt.push('\n');
        prompt.push_str(&classification_rules());
        prompt.push_str("\n\n");

        // 2. Rule guess and candidates
        if let Some(guess) = &self.rule_guess {
            prompt.push_str("规则初判结果（可能有误，请以原文为准修正）：\n");
            prompt.push_str(&rule_guess_json(guess));
            prompt.push_str("\n\n");

            if !self.candidates.is_empty() {
                prompt.push_str("候选风投机构（按持股比例排序）：\n");
                for candidate in &self.candidates {
                    prompt.push_str(&format!("- {}\n", candidate));
                }
                prompt.push('\n');
            }
        }

        // 3. The document
        prompt.push_str(&format!("文件名: {}\n", self.filename));
        prompt.push_str(&format!("{}:\n", source));
        prompt.push_str(&self.text);
        prompt.push('\n');

        prompt
    }
}

fn field_requirement(field: Field) -> String {
    let text = match field {
        Field::StockCode => "从正文或文件名提取，6位数字；无法确定则空字符串。",
        Field::CompanyName => "从正文或文件名提取；无法确定则空字符串。",
        Field::VcName => {
            "只填风投/创投机构名称（非自然人、非产业方）。若无风投股东填\"\"或\"（无）\"。"
        }
        Field::VcPercent => "该风投持股比例，形式如\"8.00%\"；若无填\"0%\"。",
        Field::HasBoardAppointee => "若任一风投派出董事填\"1\"，否则填\"0\"。",
        Field::HasSupervisorAppointee => "若任一风投派出监事填\"1\"，否则填\"0\"。",
        Field::HasExecutiveAppointee => "若任一风投派出高管填\"1\"，否则填\"0\"。",
        Field::BoardAppointeeType => {
            let labels: Vec<String> = AppointeeType::ALL
                .iter()
                .map(|t| format!("\"{}\"", t.label()))
                .collect();
            return format!("填{}；无则空。", labels.join("/"));
        }
        Field::SupervisorAppointeeType | Field::ExecutiveAppointeeType => "同上；无则空。",
    };
    text.to_string()
}

fn classification_rules() -> String {
    let rules: Vec<String> = AppointeeType::ALL
        .iter()
        .map(|t| format!("{}为\"{}\"", t.criterion(), t.label()))
        .collect();
    format!(
        "类型判别：{}。\n风投派遣董监高包括直接或通过关联方委派。只输出 JSON。",
        rules.join("；")
    )
}

/// The record as a JSON object keyed by field label
fn rule_guess_json(record: &ExtractionRecord) -> String {
    let map: Map<String, Value> = record
        .iter()
        .map(|(field, value)| (field.label().to_string(), Value::from(value)))
        .collect();
    // A map of strings always serializes
    serde_json::to_string_pretty(&map).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_text_prompt() {
        let prompt = PromptBuilder::new("688001_华兴源创.pdf", "全文内容").build();

        assert!(prompt.contains("招股说明书全文"));
        assert!(prompt.contains("文件名: 688001_华兴源创.pdf"));
        assert!(prompt.ends_with("全文内容\n"));
        assert!(!prompt.contains("规则初判"));
    }

    #[test]
    fn test_prompt_lists_every_label_and_rules() {
        let prompt = PromptBuilder::new("x.pdf", "").build();
        for field in Field::ALL {
            assert!(prompt.contains(&format!("\"{}\":", field.label())));
        }
        assert!(prompt.contains("复合型"));
        assert!(prompt.contains("通过关联方委派"));
        assert!(prompt.contains("只输出 JSON"));
    }

    #[test]
    fn test_appointee_types_listed_with_criteria() {
        let prompt = PromptBuilder::new("x.pdf", "").build();
        assert!(prompt.contains("填\"财务型\"/\"技术型\"/\"复合型\"；无则空。"));
        assert!(prompt.contains(
            "类型判别：仅金融/投资背景为\"财务型\"；仅技术/研发背景为\"技术型\"；兼具或多人各占一种为\"复合型\"。\n"
        ));
    }

    #[test]
    fn test_hybrid_prompt_includes_guess_and_candidates() {
        let guess = ExtractionRecord::empty()
            .with(Field::StockCode, "688001")
            .with(Field::VcName, "深圳市创新投资");
        let candidates = vec![
            Candidate::new("深圳市创新投资", Some(12.5)),
            Candidate::new("某某资本", None),
        ];

        let prompt = PromptBuilder::new("x.pdf", "摘录行")
            .with_rule_guess(guess)
            .with_candidates(candidates)
            .build();

        assert!(prompt.contains("招股说明书相关摘录"));
        assert!(prompt.contains("\"最大风投机构名称\": \"深圳市创新投资\""));
        assert!(prompt.contains("- 深圳市创新投资 (12.50%)"));
        assert!(prompt.contains("- 某某资本 (未披露)"));
        assert!(prompt.contains("摘录行"));
    }

    #[test]
    fn test_hybrid_prompt_without_candidates() {
        let prompt = PromptBuilder::new("x.pdf", "")
            .with_rule_guess(ExtractionRecord::empty())
            .build();

        assert!(prompt.contains("规则初判"));
        assert!(!prompt.contains("候选风投机构"));
    }

    #[test]
    fn test_rule_guess_json_uses_labels() {
        let json = rule_guess_json(&ExtractionRecord::empty());
        let parsed: Value = serde_json::from_str(&json).unwrap();
        let obj = parsed.as_object().unwrap();
        assert_eq!(obj.len(), 10);
        assert_eq!(obj["最大风投机构股权占比"], "0%");
    }
}
