use crate::report::{Validation, ValidationType};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Validation counts by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub info: usize,
    pub warning: usize,
    pub error: usize,
    /// Errors accepted by an ignore rule.
    pub ignored_error: usize,
}

impl Stats {
    pub fn from_validations<'a>(validations: impl IntoIterator<Item = &'a Validation>) -> Self {
        let mut stats = Stats::default();
        for v in validations {
            match v.validation_type {
                ValidationType::Info => stats.info += 1,
                ValidationType::Warning => stats.warning += 1,
                ValidationType::Error => {
                    stats.error += 1;
                    if v.is_ignored {
                        stats.ignored_error += 1;
                    }
                }
            }
        }
        stats
    }

    pub fn total(stats: impl IntoIterator<Item = Stats>) -> Self {
        stats.into_iter().fold(Stats::default(), Add::add)
    }

    pub fn is_passing(&self) -> bool {
        self.error == self.ignored_error
    }
}

impl Add for Stats {
    type Output = Stats;

    fn add(self, rhs: Stats) -> Stats {
        Stats {
            info: self.info + rhs.info,
            warning: self.warning + rhs.warning,
            error: self.error + rhs.error,
            ignored_error: self.ignored_error + rhs.ignored_error,
        }
    }
}

impl AddAssign for Stats {
    fn add_assign(&mut self, rhs: Stats) {
        *self = *self + rhs;
    }
}
