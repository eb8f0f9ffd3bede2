//! Leading tokens used when composing canonical names.

use crate::model::{ConstraintType, IndexType};

pub const VIEW_PREFIX: &str = "v";
pub const FOREIGN_KEY_PREFIX: &str = "fk";
pub const TRIGGER_PREFIX: &str = "trg";

pub fn constraint_prefix(constraint_type: ConstraintType) -> &'static str {
    match constraint_type {
        ConstraintType::PrimaryKey => "pk",
        ConstraintType::Unique => "un",
        ConstraintType::Check => "ck",
        ConstraintType::Exclude => "ex",
        ConstraintType::ConstraintTrigger => "tr",
        ConstraintType::ForeignKey => FOREIGN_KEY_PREFIX,
    }
}

pub fn index_prefix(index_type: IndexType) -> &'static str {
    match index_type {
        IndexType::Regular => "idx",
        IndexType::Unique => "uidx",
        IndexType::UniquePartial => "upidx",
        IndexType::Partial => "pidx",
    }
}
