//! Class and experience tables implementing [`mmo_core::TablesOracle`].
use std::collections::HashMap;

use mmo_core::{ClassBase, JobClass, TablesOracle};

#[derive(Debug, Default)]
pub struct TablesOracleImpl {
    classes: HashMap<JobClass, ClassBase>,
    /// `exp_table[level - 1]` is the experience needed to leave `level`.
    exp_table: Vec<u64>,
}

impl TablesOracleImpl {
    pub fn new(classes: HashMap<JobClass, ClassBase>, exp_table: Vec<u64>) -> Self {
        Self { classes, exp_table }
    }

    pub fn level_cap(&self) -> u16 {
        u16::try_from(self.exp_table.len() + 1).unwrap_or(u16::MAX)
    }
}

impl TablesOracle for TablesOracleImpl {
    fn class_base(&self, class: JobClass) -> Option<ClassBase> {
        self.classes.get(&class).copied()
    }

    fn exp_to_next(&self, level: u16) -> Option<u64> {
        let index = usize::from(level.checked_sub(1)?);
        self.exp_table.get(index).copied()
    }
}
