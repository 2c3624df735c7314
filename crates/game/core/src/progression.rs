//! Experience and levelling.

use crate::config::GameConfig;
use crate::env::TablesOracle;
use crate::state::CharacterRecord;
use crate::stats::StatRecord;

/// Levels gained by one experience award.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelUp {
    pub levels: u16,
    pub stat_points: u32,
    pub nature_points: u32,
}

impl LevelUp {
    pub fn any(&self) -> bool {
        self.levels > 0
    }
}

/// Adds `amount` experience and levels up as long as the table allows.
///
/// Each level grants the configured stat and nature points. At the level cap
/// experience keeps accumulating without further levels.
pub fn gain_exp(
    record: &mut CharacterRecord,
    stats: &mut StatRecord,
    amount: u64,
    tables: &dyn TablesOracle,
    config: &GameConfig,
) -> LevelUp {
    record.exp = record.exp.saturating_add(amount);

    let mut gained = LevelUp::default();
    while let Some(needed) = tables.exp_to_next(record.level)
        && record.exp >= needed
    {
        record.exp -= needed;
        record.level += 1;
        gained.levels += 1;
        gained.stat_points += config.stat_points_per_level;
        gained.nature_points += config.nature_points_per_level;
    }

    stats.stat_points = stats.stat_points.saturating_add(gained.stat_points);
    stats.nature_points = stats.nature_points.saturating_add(gained.nature_points);
    gained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CharacterId, JobClass, Position};
    use crate::testkit::TestData;

    fn record() -> CharacterRecord {
        CharacterRecord::new(CharacterId(1), "grinder", JobClass::Archer, Position::default())
    }

    #[test]
    fn small_award_only_accumulates() {
        let data = TestData::default();
        let mut record = record();
        let mut stats = StatRecord::default();

        let gained = gain_exp(&mut record, &mut stats, 50, &data, &GameConfig::default());
        assert!(!gained.any());
        assert_eq!(record.exp, 50);
        assert_eq!(record.level, 1);
    }

    #[test]
    fn large_award_crosses_several_levels() {
        let data = TestData::default();
        let config = GameConfig::default();
        let mut record = record();
        let mut stats = StatRecord::default();

        // 100 to reach 2, 200 to reach 3, 50 left over.
        let gained = gain_exp(&mut record, &mut stats, 350, &data, &config);
        assert_eq!(gained.levels, 2);
        assert_eq!(record.level, 3);
        assert_eq!(record.exp, 50);
        assert_eq!(stats.stat_points, 2 * config.stat_points_per_level);
        assert_eq!(stats.nature_points, 2 * config.nature_points_per_level);
    }

    #[test]
    fn level_cap_stops_levelling() {
        let data = TestData::default();
        let mut record = record();
        record.level = 100;
        let mut stats = StatRecord::default();

        let gained = gain_exp(&mut record, &mut stats, 1_000_000, &data, &GameConfig::default());
        assert!(!gained.any());
        assert_eq!(record.level, 100);
        assert_eq!(record.exp, 1_000_000);
    }
}
