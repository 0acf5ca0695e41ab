//! Roles a VC can fill by appointment, and appointee background types

use crate::record::Field;

/// Governance role a venture-capital shareholder may appoint someone to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Board of directors
    Board,

    /// Supervisory board
    Supervisor,

    /// Senior management
    Executive,
}

impl Role {
    /// All roles in column order
    pub const ALL: [Role; 3] = [Role::Board, Role::Supervisor, Role::Executive];

    /// Get the role name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Board => "board",
            Role::Supervisor => "supervisor",
            Role::Executive => "executive",
        }
    }

    /// Keywords that signal this role in prospectus text
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Role::Board => &["董事", "董事长"],
            Role::Supervisor => &["监事"],
            Role::Executive => &[
                "高级管理人员",
                "高管",
                "总经理",
                "副总经理",
                "经理",
                "执行董事",
            ],
        }
    }

    /// The `"0"`/`"1"` record field for this role
    pub fn flag_field(&self) -> Field {
        match self {
            Role::Board => Field::HasBoardAppointee,
            Role::Supervisor => Field::HasSupervisorAppointee,
            Role::Executive => Field::HasExecutiveAppointee,
        }
    }

    /// The appointee-type record field for this role
    pub fn type_field(&self) -> Field {
        match self {
            Role::Board => Field::BoardAppointeeType,
            Role::Supervisor => Field::SupervisorAppointeeType,
            Role::Executive => Field::ExecutiveAppointeeType,
        }
    }
}

/// Professional background of the people a VC appointed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppointeeType {
    /// Finance or investment background only
    Financial,

    /// Technical or R&D background only
    Technical,

    /// Both, or several appointees of different types
    Composite,
}

impl AppointeeType {
    /// All appointee types, in prompt order
    pub const ALL: [AppointeeType; 3] = [
        AppointeeType::Financial,
        AppointeeType::Technical,
        AppointeeType::Composite,
    ];

    /// Label written to the record
    pub fn label(&self) -> &'static str {
        match self {
            AppointeeType::Financial => "财务型",
            AppointeeType::Technical => "技术型",
            AppointeeType::Composite => "复合型",
        }
    }

    /// Background that qualifies an appointee for this type
    pub fn criterion(&self) -> &'static str {
        match self {
            AppointeeType::Financial => "仅金融/投资背景",
            AppointeeType::Technical => "仅技术/研发背景",
            AppointeeType::Composite => "兼具或多人各占一种",
        }
    }
}
