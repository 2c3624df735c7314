//! Consumable item effects.
//!
//! Each [`ConsumableTag`] has one [`ConsumableEffect`] handler. The
//! [`ConsumableRegistry`] maps tags to handlers and [`use_item`] runs the
//! whole flow: validate the slot, dispatch, decrement by one.

mod effects;

use std::collections::HashMap;

use crate::buff::{BuffSet, Clock, GrantOutcome};
use crate::config::GameConfig;
use crate::env::Env;
use crate::error::{ActionError, Rejection};
use crate::inventory::{Inventory, SlotIndex};
use crate::state::{BuffTypeId, CharacterRecord, ItemId};

pub use effects::{BagExpansion, CureInjury, GrantBuff, HealBoth, HealHp, RestoreChi};

/// Behaviour tag carried by consumable item definitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConsumableTag {
    HealHp,
    RestoreChi,
    HealBoth,
    CureInjury,
    GrantBuff,
    BagExpansion,
}

/// Current and maximum HP/CHI at the moment of use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vitals {
    pub hp: u32,
    pub max_hp: u32,
    pub chi: u32,
    pub max_chi: u32,
}

/// What the item says to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConsumableUse {
    pub item: ItemId,
    pub tag: ConsumableTag,
    pub magnitude: u32,
    pub buff: Option<BuffTypeId>,
    pub plus: u8,
}

/// Character state a handler may read or change.
pub struct ConsumeContext<'a> {
    pub record: &'a mut CharacterRecord,
    pub buffs: &'a mut BuffSet,
    pub vitals: Vitals,
    pub env: Env<'a>,
    pub clock: &'a dyn Clock,
    pub config: &'a GameConfig,
}

/// Changes a handler made or asks the caller to make.
///
/// HP and CHI live outside the record, so heals are returned as amounts for
/// the caller to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConsumeOutcome {
    pub heal_hp: u32,
    pub restore_chi: u32,
    pub injury_cured: u32,
    pub buff: Option<(BuffTypeId, GrantOutcome)>,
    pub stats_dirty: bool,
}

pub trait ConsumableEffect: Send + Sync {
    fn tag(&self) -> ConsumableTag;

    /// Applies the effect. A rejection leaves the context untouched.
    fn apply(
        &self,
        item: &ConsumableUse,
        ctx: &mut ConsumeContext<'_>,
    ) -> Result<ConsumeOutcome, ActionError>;
}

/// Tag → handler table.
#[derive(Default)]
pub struct ConsumableRegistry {
    handlers: HashMap<ConsumableTag, Box<dyn ConsumableEffect>>,
}

impl ConsumableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with one handler for every tag.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(HealHp));
        registry.register(Box::new(RestoreChi));
        registry.register(Box::new(HealBoth));
        registry.register(Box::new(CureInjury));
        registry.register(Box::new(GrantBuff));
        registry.register(Box::new(BagExpansion));
        registry
    }

    /// Installs `handler`, replacing any handler for the same tag.
    pub fn register(&mut self, handler: Box<dyn ConsumableEffect>) {
        self.handlers.insert(handler.tag(), handler);
    }

    pub fn get(&self, tag: ConsumableTag) -> Option<&dyn ConsumableEffect> {
        self.handlers.get(&tag).map(|handler| handler.as_ref())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for ConsumableRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<_> = self.handlers.keys().collect();
        tags.sort();
        f.debug_struct("ConsumableRegistry").field("tags", &tags).finish()
    }
}

/// Result of [`use_item`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UseOutcome {
    pub item: ItemId,
    pub tag: ConsumableTag,
    pub remaining: u32,
    pub effect: ConsumeOutcome,
    /// The used slot or the effect touched something the stat pipeline reads.
    pub stats_dirty: bool,
}

/// Uses one unit of the consumable in `index`.
///
/// # Errors
///
/// Rejects empty, in-use and non-consumable slots and items without a
/// registered handler; propagates a handler's rejection. An unknown item id
/// is a lookup error. Nothing changes on error.
pub fn use_item(
    inventory: &mut Inventory,
    index: SlotIndex,
    registry: &ConsumableRegistry,
    ctx: &mut ConsumeContext<'_>,
) -> Result<UseOutcome, ActionError> {
    let slot = inventory.slot(index).ok_or(Rejection::InvalidSlot)?;
    if slot.is_empty() {
        return Err(Rejection::EmptySlot.into());
    }
    if slot.in_use {
        return Err(Rejection::ItemInUse.into());
    }
    let definition = ctx.env.item(slot.item)?;
    let (tag, magnitude, buff) = definition.consumable().ok_or(Rejection::NotUsable)?;
    let handler = registry.get(tag).ok_or(Rejection::NotUsable)?;

    let request = ConsumableUse {
        item: slot.item,
        tag,
        magnitude,
        buff,
        plus: slot.plus,
    };
    let effect = handler.apply(&request, ctx)?;
    let decrement = inventory.decrement_item(index, 1)?;

    Ok(UseOutcome {
        item: request.item,
        tag,
        remaining: decrement.remaining,
        effect,
        stats_dirty: effect.stats_dirty || decrement.stats_dirty,
    })
}
