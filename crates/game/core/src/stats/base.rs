/// Persisted base attributes of a character.
///
/// `hp` and `chi` are the values last written to storage; while the
/// character is online the runtime owns the live values.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatRecord {
    pub str: u32,
    pub dex: u32,
    pub int: u32,
    pub wind: u32,
    pub water: u32,
    pub fire: u32,
    /// Unspent attribute points.
    pub stat_points: u32,
    /// Unspent elemental points.
    pub nature_points: u32,
    pub hp: u32,
    pub chi: u32,
    pub honor: i64,
}

impl Default for StatRecord {
    fn default() -> Self {
        Self {
            str: 10,
            dex: 10,
            int: 10,
            wind: 0,
            water: 0,
            fire: 0,
            stat_points: 0,
            nature_points: 0,
            hp: 0,
            chi: 0,
            honor: 0,
        }
    }
}
