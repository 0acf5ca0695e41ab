//! ipovc Extractor
//!
//! Turns the text of one IPO prospectus into one [`ExtractionRecord`]
//! describing its largest venture-capital shareholder.
//!
//! # Architecture
//!
//! ```text
//! text ─► Candidate Scanner ─► Role Tagger ─► Rule Engine ─┐
//!   │                                                       ├─► Merge ─► record
//!   └──► excerpt + rule guess ─► LLM Refiner ───────────────┘
//! ```
//!
//! The rule path never fails and is the fallback of last resort. In
//! `llm` mode the full text goes to the model and its reply is the record.
//!
//! # Example Usage
//!
//! ```
//! use ipovc_extractor::{Extractor, ExtractorConfig};
//! use ipovc_domain::Field;
//! use ipovc_llm::MockProvider;
//!
//! let llm = MockProvider::new(r#"{"风投机构委派董事的类型": "财务型"}"#);
//! let extractor = Extractor::with_provider(llm, ExtractorConfig::default()).unwrap();
//!
//! let text = "深圳市创新投资集团 持股 12.50%\n公司董事由深圳市创新投资集团委派";
//! let outcome = extractor.extract("688001_华兴源创.pdf", text).unwrap();
//!
//! assert_eq!(outcome.record.get(Field::VcPercent), "12.50%");
//! assert_eq!(outcome.record.get(Field::BoardAppointeeType), "财务型");
//! ```
//!
//! [`ExtractionRecord`]: ipovc_domain::ExtractionRecord

#![warn(missing_docs)]

mod config;
mod error;
mod excerpt;
mod extractor;
mod merge;
mod parser;
mod prompt;
mod refiner;
pub mod roles;
pub mod rules;
pub mod scanner;
mod types;


pub use config::{CompletionStrategy, ExtractionMode, ExtractorConfig};
pub use error::ExtractorError;
pub use excerpt::ExcerptSelector;
pub use extractor::Extractor;
pub use merge::merge_records;
pub use parser::parse_llm_response;
pub use prompt::PromptBuilder;
pub use refiner::LlmRefiner;
pub use types::{ExtractionOutcome, MergeOutcome, RuleOutcome};
