//! Extraction record - the one-row-per-prospectus output of the system

use crate::role::Role;
use std::fmt;

/// Value used for `vc_percent` when no venture-capital shareholder was found
pub const NO_VC_PERCENT: &str = "0%";

/// Sentinel values a model may return in place of a VC name
pub const NO_VC_SENTINELS: [&str; 4] = ["（无）", "(无)", "(none)", "无"];

/// One of the ten fields of an [`ExtractionRecord`]
///
/// The field order is the CSV column order and the order the fields are
/// listed in prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Six-digit exchange code
    StockCode,
    /// Company short name
    CompanyName,
    /// Largest venture-capital shareholder
    VcName,
    /// Equity share of that shareholder, e.g. `12.50%`
    VcPercent,
    /// `"1"` if the VC appointed a director
    HasBoardAppointee,
    /// `"1"` if the VC appointed a supervisor
    HasSupervisorAppointee,
    /// `"1"` if the VC appointed an executive
    HasExecutiveAppointee,
    /// Background type of the appointed director(s)
    BoardAppointeeType,
    /// Background type of the appointed supervisor(s)
    SupervisorAppointeeType,
    /// Background type of the appointed executive(s)
    ExecutiveAppointeeType,
}

impl Field {
    /// All fields in column order
    pub const ALL: [Field; 10] = [
        Field::StockCode,
        Field::CompanyName,
        Field::VcName,
        Field::VcPercent,
        Field::HasBoardAppointee,
        Field::HasSupervisorAppointee,
        Field::HasExecutiveAppointee,
        Field::BoardAppointeeType,
        Field::SupervisorAppointeeType,
        Field::ExecutiveAppointeeType,
    ];

    /// Literal label used as CSV header and as the JSON key in model replies
    pub fn label(&self) -> &'static str {
        match self {
            Field::StockCode => "股票代码",
            Field::CompanyName => "公司简称",
            Field::VcName => "最大风投机构名称",
            Field::VcPercent => "最大风投机构股权占比",
            Field::HasBoardAppointee => "风投机构是否委派董事",
            Field::HasSupervisorAppointee => "风投机构是否委派监事",
            Field::HasExecutiveAppointee => "风投机构是否委派高管",
            Field::BoardAppointeeType => "风投机构委派董事的类型",
            Field::SupervisorAppointeeType => "风投机构委派监事的类型",
            Field::ExecutiveAppointeeType => "风投机构委派高管的类型",
        }
    }

    /// Look up a field by its literal label
    pub fn from_label(label: &str) -> Option<Self> {
        Field::ALL.iter().copied().find(|f| f.label() == label)
    }

    /// Position of the field in column order
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Whether this is one of the three `"0"`/`"1"` appointment flags
    pub fn is_flag(&self) -> bool {
        matches!(
            self,
            Field::HasBoardAppointee | Field::HasSupervisorAppointee | Field::HasExecutiveAppointee
        )
    }

    /// Whether this is one of the three appointee-type fields
    pub fn is_appointee_type(&self) -> bool {
        matches!(
            self,
            Field::BoardAppointeeType
                | Field::SupervisorAppointeeType
                | Field::ExecutiveAppointeeType
        )
    }

    /// Value the field takes when no VC was identified
    pub fn default_value(&self) -> &'static str {
        match self {
            Field::VcPercent => NO_VC_PERCENT,
            f if f.is_flag() => "0",
            _ => "",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The structured output extracted from one prospectus
///
/// All fields are strings so that a model reply can be carried through
/// unchanged in full-text mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRecord {
    values: [String; 10],
}

impl ExtractionRecord {
    /// Record with every field at its no-VC default
    ///
    /// # Examples
    ///
    /// ```
    /// use ipovc_domain::{ExtractionRecord, Field};
    ///
    /// let record = ExtractionRecord::empty();
    /// assert_eq!(record.get(Field::VcName), "");
    /// assert_eq!(record.get(Field::VcPercent), "0%");
    /// assert_eq!(record.get(Field::HasBoardAppointee), "0");
    /// ```
    pub fn empty() -> Self {
        Self {
            values: Field::ALL.map(|f| f.default_value().to_string()),
        }
    }

    /// Record with every field set to the empty string
    ///
    /// Used as the starting point when reading a model reply, where a
    /// missing key must stay distinguishable from a `"0"` flag.
    pub fn blank() -> Self {
        Self {
            values: Default::default(),
        }
    }

    /// Get a field value
    pub fn get(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Set a field value
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Field values in column order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// `(field, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.iter().copied().zip(self.values())
    }

    /// Whether a VC shareholder is named
    ///
    /// Empty names and the "none" sentinels a model may emit both count as
    /// "no VC".
    pub fn has_vc(&self) -> bool {
        let name = self.get(Field::VcName).trim();
        !name.is_empty() && !NO_VC_SENTINELS.contains(&name)
    }

    /// Reset the VC-dependent fields to their defaults when no VC is named
    ///
    /// Returns `true` if anything changed.
    pub fn clear_dependents_without_vc(&mut self) -> bool {
        if self.has_vc() {
            return false;
        }
        let mut changed = false;
        for field in Field::ALL {
            if matches!(field, Field::StockCode | Field::CompanyName | Field::VcName) {
                continue;
            }
            if self.get(field) != field.default_value() {
                self.set(field, field.default_value());
                changed = true;
            }
        }
        changed
    }

    /// Flag field for a role
    pub fn flag(&self, role: Role) -> &str {
        self.get(role.flag_field())
    }

    /// Appointee-type field for a role
    pub fn appointee_type(&self, role: Role) -> &str {
        self.get(role.type_field())
    }
}

impl Default for ExtractionRecord {
    fn default() -> Self {
        Self::empty()
    }
}
