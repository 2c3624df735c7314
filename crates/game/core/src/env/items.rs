use crate::consumable::ConsumableTag;
use crate::state::{BuffTypeId, ItemId};
use crate::stats::StatDelta;

/// Read-only item catalogue.
pub trait ItemOracle: Send + Sync {
    fn definition(&self, id: ItemId) -> Option<ItemDefinition>;

    /// Resolves an upgrade or socket stone from its encoded code.
    fn stone(&self, code: u8) -> Option<ItemDefinition>;

    /// All item sets, used when checking set bonuses.
    fn sets(&self) -> &[ItemSetDefinition];
}

/// Item definition with common fields and class-specific data.
///
/// Display data (names, descriptions) lives outside the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDefinition {
    pub id: ItemId,
    pub class: ItemClass,
    pub stackable: bool,
    pub bankable: bool,
    pub tradable: bool,
    /// Shop price. Items sell back for half.
    pub price: u64,
    /// Flat grant while equipped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stats: StatDelta,
    /// Additional grant per upgrade level.
    #[cfg_attr(feature = "serde", serde(default))]
    pub per_plus: StatDelta,
    /// Stones embedded in a stone definition. Empty for ordinary items.
    #[cfg_attr(feature = "serde", serde(default))]
    pub components: Vec<u8>,
}

impl ItemDefinition {
    pub fn new(id: ItemId, class: ItemClass) -> Self {
        Self {
            id,
            class,
            stackable: false,
            bankable: true,
            tradable: true,
            price: 0,
            stats: StatDelta::ZERO,
            per_plus: StatDelta::ZERO,
            components: Vec::new(),
        }
    }

    #[must_use]
    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: u64) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: StatDelta) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_per_plus(mut self, per_plus: StatDelta) -> Self {
        self.per_plus = per_plus;
        self
    }

    #[must_use]
    pub fn with_components(mut self, components: Vec<u8>) -> Self {
        self.components = components;
        self
    }

    #[must_use]
    pub fn bound(mut self) -> Self {
        self.bankable = false;
        self.tradable = false;
        self
    }

    pub fn sell_price(&self) -> u64 {
        self.price / 2
    }

    pub fn consumable(&self) -> Option<(ConsumableTag, u32, Option<BuffTypeId>)> {
        match self.class {
            ItemClass::Consumable {
                tag,
                magnitude,
                buff,
            } => Some((tag, magnitude, buff)),
            _ => None,
        }
    }
}

/// Usage class of an item. Decides which slot ranges accept it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemClass {
    /// Gear for the given equip slot (0..=9). Weapons (slot 3) also fit the
    /// secondary weapon slot.
    Equipment { slot: u16 },
    /// Overlay armor for the given HT slot offset (0..=8).
    HtArmor { slot: u16 },
    Consumable {
        tag: ConsumableTag,
        magnitude: u32,
        buff: Option<BuffTypeId>,
    },
    /// Wearable timed item granting its stats while activated.
    BuffItem { duration_secs: u32 },
    Marble,
    /// Bag-expansion token.
    Expansion,
    Box,
    Material,
    Quest,
    Pet,
    /// Upgrade/socket stone addressed by `code`.
    Stone { code: u8 },
}

/// A group of items granting `bonus` when all of `items` are equipped.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSetDefinition {
    pub id: u32,
    pub items: Vec<ItemId>,
    pub bonus: StatDelta,
}
