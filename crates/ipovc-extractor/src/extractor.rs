//! Core Extractor implementation

use crate::config::{ExtractionMode, ExtractorConfig};
use crate::error::ExtractorError;
use crate::excerpt::ExcerptSelector;
use crate::merge::merge_records;
use crate::prompt::PromptBuilder;
use crate::refiner::LlmRefiner;
use crate::rules::apply_rules;
use crate::types::{ExtractionOutcome, RuleOutcome};
use ipovc_domain::traits::LlmProvider;
use ipovc_domain::{ExtractionRecord, FieldOrigin, FieldOrigins};
use tracing::{debug, info, warn};

/// The Extractor turns one document's text into one record
pub struct Extractor<L> {
    refiner: Option<LlmRefiner<L>>,
    config: ExtractorConfig,
}

impl<L> Extractor<L>
where
    L: LlmProvider,
    L::Error: Into<ExtractorError>,
{
    /// Create an Extractor without a model
    ///
    /// Fails for [`ExtractionMode::Llm`], which cannot run without one.
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::build(None, config)
    }

    /// Create an Extractor backed by `provider`
    pub fn with_provider(provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::build(Some(provider), config)
    }

    fn build(provider: Option<L>, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        if config.mode.requires_llm() && provider.is_none() {
            return Err(ExtractorError::Config(format!(
                "{} mode requires a model provider",
                config.mode
            )));
        }

        // Rules mode never calls the model even when one is configured
        let refiner = provider
            .filter(|_| config.mode.uses_llm())
            .map(|p| LlmRefiner::new(p, config.strategy()));

        Ok(Self { refiner, config })
    }

    /// Whether a model will be consulted
    pub fn has_llm(&self) -> bool {
        self.refiner.is_some()
    }

    /// Extract a record from one document
    ///
    /// Only [`ExtractionMode::Llm`] can fail; rule and hybrid extraction
    /// always produce a record.
    pub fn extract(&self, filename: &str, text: &str) -> Result<ExtractionOutcome, ExtractorError> {
        info!(
            filename,
            mode = %self.config.mode,
            text_chars = text.chars().count(),
            "Starting extraction"
        );

        let outcome = match self.config.mode {
            ExtractionMode::Rules => ExtractionOutcome::from_rules(apply_rules(filename, text)),
            ExtractionMode::Hybrid => self.extract_hybrid(filename, text),
            ExtractionMode::Llm => self.extract_full_text(filename, text)?,
        };

        debug!(filename, origins = %outcome.origins.summary(), "Field origins");
        Ok(outcome)
    }

    fn extract_hybrid(&self, filename: &str, text: &str) -> ExtractionOutcome {
        let rules = apply_rules(filename, text);
        let llm_record = self
            .refiner
            .as_ref()
            .and_then(|refiner| self.refine_hybrid(refiner, filename, text, &rules));

        let merged = merge_records(&rules.record, llm_record.as_ref());
        ExtractionOutcome {
            record: merged.record,
            origins: merged.origins,
            candidate_count: rules.candidates.len(),
            llm_used: llm_record.is_some(),
        }
    }

    fn refine_hybrid(
        &self,
        refiner: &LlmRefiner<L>,
        filename: &str,
        text: &str,
        rules: &RuleOutcome,
    ) -> Option<ExtractionRecord> {
        let excerpt = ExcerptSelector::new(self.config.excerpt_line_limit).select(text);
        let candidates = rules
            .candidates
            .iter()
            .take(self.config.prompt_candidate_limit)
            .cloned()
            .collect();

        let prompt = PromptBuilder::new(filename, excerpt)
            .with_rule_guess(rules.record.clone())
            .with_candidates(candidates)
            .build();

        match refiner.refine(filename, &prompt) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(filename, error = %e, "Model refinement failed, keeping rule result");
                None
            }
        }
    }

    fn extract_full_text(
        &self,
        filename: &str,
        text: &str,
    ) -> Result<ExtractionOutcome, ExtractorError> {
        let refiner = self.refiner.as_ref().ok_or_else(|| {
            ExtractorError::Config("llm mode requires a model provider".to_string())
        })?;

        let prompt = PromptBuilder::new(filename, text).build();
        let record = refiner.refine(filename, &prompt)?;

        Ok(ExtractionOutcome {
            record,
            origins: FieldOrigins::all(FieldOrigin::Llm),
            candidate_count: 0,
            llm_used: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipovc_domain::Field;
    use ipovc_llm::MockProvider;

    const TEXT: &str = "股东情况\n深圳市创新投资集团 持股 12.50%\n其他\n公司董事由深圳市创新投资集团委派";

    #[test]
    fn test_llm_mode_requires_provider() {
        let result = Extractor::<MockProvider>::new(ExtractorConfig::for_mode(ExtractionMode::Llm));
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = ExtractorConfig::default();
        config.excerpt_line_limit = 0;
        assert!(Extractor::<MockProvider>::new(config).is_err());
    }

    #[test]
    fn test_rules_mode_ignores_provider() {
        let provider = MockProvider::new("{}");
        let extractor = Extractor::with_provider(
            provider.clone(),
            ExtractorConfig::for_mode(ExtractionMode::Rules),
        )
        .unwrap();

        assert!(!extractor.has_llm());
        let outcome = extractor.extract("688001_华兴源创.pdf", TEXT).unwrap();
        assert_eq!(outcome.record.get(Field::VcPercent), "12.50%");
        assert!(!outcome.llm_used);
        assert_eq!(provider.call_count() + provider.stream_call_count(), 0);
    }

    #[test]
    fn test_hybrid_without_provider_is_rules() {
        let extractor = Extractor::<MockProvider>::new(ExtractorConfig::default()).unwrap();
        let outcome = extractor.extract("688001_华兴源创.pdf", TEXT).unwrap();

        assert_eq!(outcome.record.get(Field::HasBoardAppointee), "1");
        // The appointment line also matches the name pattern
        assert_eq!(outcome.candidate_count, 2);
        assert!(!outcome.llm_used);
        assert_eq!(outcome.origins.count(FieldOrigin::Rule), 10);
    }

    #[test]
    fn test_hybrid_sends_excerpt_and_guess() {
        let provider = MockProvider::new("{}");
        let extractor =
            Extractor::with_provider(provider.clone(), ExtractorConfig::default()).unwrap();
        extractor.extract("688001_华兴源创.pdf", TEXT).unwrap();

        let prompt = provider.last_prompt().unwrap();
        assert!(prompt.contains("规则初判"));
        assert!(prompt.contains("- 深圳市创新投资 (12.50%)"));
        // "其他" has neither a keyword nor a percent sign
        assert!(!prompt.contains("\n其他\n"));
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_hybrid_model_failure_keeps_rules() {
        let provider = MockProvider::new("not json");
        let extractor =
            Extractor::with_provider(provider.clone(), ExtractorConfig::default()).unwrap();
        let outcome = extractor.extract("688001_华兴源创.pdf", TEXT).unwrap();

        assert!(!outcome.llm_used);
        assert_eq!(outcome.record.get(Field::StockCode), "688001");
        assert_eq!(outcome.record.get(Field::VcPercent), "12.50%");
    }

    #[test]
    fn test_llm_mode_returns_reply_as_is() {
        let provider = MockProvider::new(r#"{"股票代码": "688001", "最大风投机构股权占比": "8%"}"#);
        let extractor = Extractor::with_provider(
            provider.clone(),
            ExtractorConfig::for_mode(ExtractionMode::Llm),
        )
        .unwrap();
        let outcome = extractor.extract("x.pdf", "全文").unwrap();

        assert_eq!(outcome.record.get(Field::VcPercent), "8%");
        assert_eq!(outcome.record.get(Field::HasBoardAppointee), "");
        assert_eq!(outcome.origins.count(FieldOrigin::Llm), 10);
        assert_eq!(provider.stream_call_count(), 1);
    }

    #[test]
    fn test_llm_mode_error_propagates() {
        let provider = MockProvider::new("garbage").with_stream_failure();
        let extractor =
            Extractor::with_provider(provider, ExtractorConfig::for_mode(ExtractionMode::Llm))
                .unwrap();

        let err = extractor.extract("x.pdf", "全文").unwrap_err();
        assert!(err.is_response_format());
    }
}
