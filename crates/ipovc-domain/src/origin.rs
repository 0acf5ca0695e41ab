//! Field origin tracking for merged records

use crate::record::Field;
use std::fmt;

/// Which producer a merged field value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldOrigin {
    /// Regex/keyword rule engine
    Rule,

    /// Language model reply
    Llm,
}

impl FieldOrigin {
    /// Get the origin name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldOrigin::Rule => "rule",
            FieldOrigin::Llm => "llm",
        }
    }
}

impl fmt::Display for FieldOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field origin tags for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOrigins([FieldOrigin; 10]);

impl FieldOrigins {
    /// Every field tagged with the same origin
    pub fn all(origin: FieldOrigin) -> Self {
        Self([origin; 10])
    }

    /// Origin of one field
    pub fn get(&self, field: Field) -> FieldOrigin {
        self.0[field.index()]
    }

    /// Tag one field
    pub fn set(&mut self, field: Field, origin: FieldOrigin) {
        self.0[field.index()] = origin;
    }

    /// Number of fields taken from the given origin
    pub fn count(&self, origin: FieldOrigin) -> usize {
        self.0.iter().filter(|o| **o == origin).count()
    }

    /// Compact `label=origin` listing for logs
    pub fn summary(&self) -> String {
        Field::ALL
            .iter()
            .map(|f| format!("{}={}", f.label(), self.get(*f)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for FieldOrigins {
    fn default() -> Self {
        Self::all(FieldOrigin::Rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_count() {
        let mut origins = FieldOrigins::default();
        assert_eq!(origins.count(FieldOrigin::Rule), 10);

        origins.set(Field::VcName, FieldOrigin::Llm);
        assert_eq!(origins.get(Field::VcName), FieldOrigin::Llm);
        assert_eq!(origins.count(FieldOrigin::Llm), 1);
    }

    #[test]
    fn test_summary_lists_every_field() {
        let summary = FieldOrigins::all(FieldOrigin::Llm).summary();
        assert!(summary.starts_with("股票代码=llm"));
        assert_eq!(summary.matches("=llm").count(), 10);
    }
}
