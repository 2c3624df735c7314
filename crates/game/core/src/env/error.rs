//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{BuffTypeId, ItemId, JobClass, NpcTemplateId, SkillId};

/// Errors that occur when accessing static game data.
///
/// Missing oracles mean the runtime was wired incorrectly. Unknown IDs are
/// data-integrity issues: the caller logs them and abandons the action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    #[error("ItemOracle not available")]
    ItemsNotAvailable,

    #[error("BuffOracle not available")]
    BuffsNotAvailable,

    #[error("SkillOracle not available")]
    SkillsNotAvailable,

    #[error("NpcOracle not available")]
    NpcsNotAvailable,

    #[error("TablesOracle not available")]
    TablesNotAvailable,

    #[error("RngOracle not available")]
    RngNotAvailable,

    #[error("item definition {0} not found")]
    UnknownItem(ItemId),

    #[error("buff definition {0} not found")]
    UnknownBuff(BuffTypeId),

    #[error("skill definition {0:?} not found")]
    UnknownSkill(SkillId),

    #[error("npc template {0:?} not found")]
    UnknownNpcTemplate(NpcTemplateId),

    #[error("no base table for class {0}")]
    UnknownClass(JobClass),
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            ItemsNotAvailable => "ORACLE_ITEMS_NOT_AVAILABLE",
            BuffsNotAvailable => "ORACLE_BUFFS_NOT_AVAILABLE",
            SkillsNotAvailable => "ORACLE_SKILLS_NOT_AVAILABLE",
            NpcsNotAvailable => "ORACLE_NPCS_NOT_AVAILABLE",
            TablesNotAvailable => "ORACLE_TABLES_NOT_AVAILABLE",
            RngNotAvailable => "ORACLE_RNG_NOT_AVAILABLE",
            UnknownItem(_) => "ORACLE_UNKNOWN_ITEM",
            UnknownBuff(_) => "ORACLE_UNKNOWN_BUFF",
            UnknownSkill(_) => "ORACLE_UNKNOWN_SKILL",
            UnknownNpcTemplate(_) => "ORACLE_UNKNOWN_NPC_TEMPLATE",
            UnknownClass(_) => "ORACLE_UNKNOWN_CLASS",
        }
    }
}
