use std::fmt;

use serde::{Deserialize, Serialize};

/// How a table is keyed, which decides the filter used for bulk deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Serial integer `id` column.
    Serial,
    /// UUID `id` column mirroring the identity account id.
    Uuid,
}

/// A table that belongs to the identity domain and is migrated by a cutover.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Profiles,
    Students,
    Parents,
    Coaches,
    Admins,
    InvitationCodes,
    ParentChildRelations,
    CoachStudentRelations,
}

impl Table {
    /// Insert order: every table only references tables earlier in the list.
    pub const IMPORT_ORDER: [Table; 8] = [
        Table::Profiles,
        Table::Students,
        Table::Parents,
        Table::Coaches,
        Table::Admins,
        Table::InvitationCodes,
        Table::ParentChildRelations,
        Table::CoachStudentRelations,
    ];

    /// Delete order: the reverse of [`Table::IMPORT_ORDER`].
    pub const WIPE_ORDER: [Table; 8] = [
        Table::CoachStudentRelations,
        Table::ParentChildRelations,
        Table::InvitationCodes,
        Table::Admins,
        Table::Coaches,
        Table::Parents,
        Table::Students,
        Table::Profiles,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::Students => "students",
            Table::Parents => "parents",
            Table::Coaches => "coaches",
            Table::Admins => "admins",
            Table::InvitationCodes => "invitation_codes",
            Table::ParentChildRelations => "parent_child_relations",
            Table::CoachStudentRelations => "coach_student_relations",
        }
    }

    pub fn key(self) -> KeyKind {
        match self {
            Table::Profiles => KeyKind::Uuid,
            _ => KeyKind::Serial,
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
