use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use mmo_core::{
    BuffSet, CharacterFlags, CharacterId, CharacterRecord, ClockReading, DerivedStats, Epoch,
    Inventory, InventorySlot, LifeState, PseudoId, SlotContext, StatRecord, StorageMode, Tick,
};
use tokio::task::AbortHandle;
use tracing::debug;

use super::{OnSight, Vitals, lock, read, write};
use crate::api::Result;
use crate::events::Combatant;
use crate::repository::{CharacterSnapshot, InventoryRepository};

#[derive(Debug, Default)]
struct InventoryCell {
    inventory: Inventory,
    loaded: bool,
}

/// Exclusive access to a character's slot array.
///
/// Holding the guard serialises every slot mutation of that character.
pub struct InventoryGuard<'a> {
    guard: MutexGuard<'a, InventoryCell>,
}

impl Deref for InventoryGuard<'_> {
    type Target = Inventory;

    fn deref(&self) -> &Inventory {
        &self.guard.inventory
    }
}

impl DerefMut for InventoryGuard<'_> {
    fn deref_mut(&mut self) -> &mut Inventory {
        &mut self.guard.inventory
    }
}

/// An online character.
///
/// The record, base stats and buffs mirror what gets persisted. HP and CHI
/// live in [`Vitals`] so other characters' tasks can damage this one without
/// taking any of its locks.
#[derive(Debug)]
pub struct LiveCharacter {
    id: CharacterId,
    pseudo: PseudoId,
    name: String,

    /// Held across multi-step transfers (buy, pick-up, death drops).
    replace: Mutex<()>,
    inventory: Mutex<InventoryCell>,
    gold: Mutex<u64>,
    record: RwLock<CharacterRecord>,
    base: RwLock<StatRecord>,
    buffs: RwLock<BuffSet>,
    stats: RwLock<DerivedStats>,
    vitals: Vitals,

    flags: AtomicU8,
    life: Mutex<LifeState>,
    tick: AtomicU64,
    storage: Mutex<StorageMode>,
    duel: Mutex<Option<CharacterId>>,
    target: Mutex<Option<Combatant>>,
    last_attack: AtomicU64,
    sight: OnSight,

    online: AtomicBool,
    dirty: AtomicBool,
    tick_task: Mutex<Option<AbortHandle>>,
    pet_task: Mutex<Option<AbortHandle>>,
}

impl LiveCharacter {
    pub fn new(snapshot: CharacterSnapshot, pseudo: PseudoId) -> Self {
        let CharacterSnapshot {
            record,
            stats,
            buffs,
        } = snapshot;
        let buffs = BuffSet::from_records(buffs);
        let flags = buffs.flags();
        let tick = record.tick;

        Self {
            id: record.id,
            pseudo,
            name: record.name.clone(),
            replace: Mutex::new(()),
            inventory: Mutex::new(InventoryCell::default()),
            gold: Mutex::new(record.gold),
            vitals: Vitals::new(stats.hp, stats.chi),
            record: RwLock::new(record),
            base: RwLock::new(stats),
            buffs: RwLock::new(buffs),
            stats: RwLock::new(DerivedStats::default()),
            flags: AtomicU8::new(flags.bits()),
            life: Mutex::new(LifeState::Alive),
            tick: AtomicU64::new(tick.0),
            storage: Mutex::new(StorageMode::None),
            duel: Mutex::new(None),
            target: Mutex::new(None),
            last_attack: AtomicU64::new(0),
            sight: OnSight::default(),
            online: AtomicBool::new(true),
            dirty: AtomicBool::new(false),
            tick_task: Mutex::new(None),
            pet_task: Mutex::new(None),
        }
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn pseudo(&self) -> PseudoId {
        self.pseudo
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ===== locks =====

    pub fn replace_guard(&self) -> Result<MutexGuard<'_, ()>> {
        lock(&self.replace)
    }

    /// Locks the slot array, loading it from `repository` on first access.
    pub fn inventory(&self, repository: &dyn InventoryRepository) -> Result<InventoryGuard<'_>> {
        let mut guard = lock(&self.inventory)?;
        if !guard.loaded {
            let slots = repository.load_slots(self.id)?.unwrap_or_default();
            guard.inventory = Inventory::from_slots(slots)?;
            guard.loaded = true;
            debug!(character = %self.id, "inventory loaded");
        }
        Ok(InventoryGuard { guard })
    }

    /// Copy of the slots if they were ever loaded.
    pub fn loaded_slots(&self) -> Result<Option<Vec<InventorySlot>>> {
        let guard = lock(&self.inventory)?;
        Ok(guard.loaded.then(|| guard.inventory.slots().to_vec()))
    }

    pub fn gold(&self) -> Result<MutexGuard<'_, u64>> {
        lock(&self.gold)
    }

    pub fn record(&self) -> Result<RwLockReadGuard<'_, CharacterRecord>> {
        read(&self.record)
    }

    pub fn record_mut(&self) -> Result<RwLockWriteGuard<'_, CharacterRecord>> {
        write(&self.record)
    }

    pub fn base(&self) -> Result<RwLockReadGuard<'_, StatRecord>> {
        read(&self.base)
    }

    pub fn base_mut(&self) -> Result<RwLockWriteGuard<'_, StatRecord>> {
        write(&self.base)
    }

    pub fn buffs(&self) -> Result<RwLockReadGuard<'_, BuffSet>> {
        read(&self.buffs)
    }

    pub fn buffs_mut(&self) -> Result<RwLockWriteGuard<'_, BuffSet>> {
        write(&self.buffs)
    }

    pub fn stats(&self) -> Result<RwLockReadGuard<'_, DerivedStats>> {
        read(&self.stats)
    }

    pub fn stats_mut(&self) -> Result<RwLockWriteGuard<'_, DerivedStats>> {
        write(&self.stats)
    }

    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    pub fn sight(&self) -> &OnSight {
        &self.sight
    }

    // ===== transient combat state =====

    pub fn flags(&self) -> CharacterFlags {
        CharacterFlags::from_bits_truncate(self.flags.load(Ordering::Acquire))
    }

    /// Replaces the buff-driven flags, keeping [`CharacterFlags::RESPAWNING`].
    pub fn set_buff_flags(&self, flags: CharacterFlags) {
        let keep = CharacterFlags::RESPAWNING.bits();
        let set = (flags - CharacterFlags::RESPAWNING).bits();
        let _ = self
            .flags
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some((current & keep) | set)
            });
    }

    pub fn insert_flags(&self, flags: CharacterFlags) {
        self.flags.fetch_or(flags.bits(), Ordering::AcqRel);
    }

    pub fn remove_flags(&self, flags: CharacterFlags) {
        self.flags.fetch_and(!flags.bits(), Ordering::AcqRel);
    }

    pub fn life(&self) -> Result<MutexGuard<'_, LifeState>> {
        lock(&self.life)
    }

    pub fn is_alive(&self) -> Result<bool> {
        Ok(self.life()?.is_alive())
    }

    pub fn storage(&self) -> Result<StorageMode> {
        Ok(*lock(&self.storage)?)
    }

    pub fn set_storage(&self, mode: StorageMode) -> Result<()> {
        *lock(&self.storage)? = mode;
        Ok(())
    }

    /// Storage mode plus expansion state, read under the buffs lock.
    pub fn slot_context(&self) -> Result<SlotContext> {
        let storage = self.storage()?;
        Ok(SlotContext::new(storage, self.buffs()?.expansion_active()))
    }

    pub fn duel(&self) -> Result<MutexGuard<'_, Option<CharacterId>>> {
        lock(&self.duel)
    }

    pub fn set_target(&self, target: Option<Combatant>) -> Result<()> {
        *lock(&self.target)? = target;
        Ok(())
    }

    pub fn target(&self) -> Result<Option<Combatant>> {
        Ok(*lock(&self.target)?)
    }

    pub fn mark_attack(&self, at: Epoch) {
        self.last_attack.store(at.0, Ordering::Release);
    }

    pub fn last_attack(&self) -> Epoch {
        Epoch(self.last_attack.load(Ordering::Acquire))
    }

    // ===== time =====

    pub fn tick(&self) -> Tick {
        Tick(self.tick.load(Ordering::Acquire))
    }

    /// Advances the character-local tick and returns the new value.
    pub fn advance_tick(&self) -> Tick {
        Tick(self.tick.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn set_tick(&self, tick: Tick) {
        self.tick.store(tick.0, Ordering::Release);
    }

    pub fn clock(&self, epoch: Epoch) -> ClockReading {
        ClockReading::new(self.tick(), epoch)
    }

    // ===== lifecycle =====

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Stops every task attached to this character. Scheduled continuations
    /// see `is_online() == false` and do nothing.
    pub fn go_offline(&self) -> Result<()> {
        self.online.store(false, Ordering::Release);
        for slot in [&self.tick_task, &self.pet_task] {
            if let Some(handle) = lock(slot)?.take() {
                handle.abort();
            }
        }
        Ok(())
    }

    pub fn attach_tick_task(&self, handle: AbortHandle) -> Result<()> {
        if let Some(previous) = lock(&self.tick_task)?.replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    pub fn attach_pet_task(&self, handle: AbortHandle) -> Result<()> {
        if let Some(previous) = lock(&self.pet_task)?.replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    pub fn has_pet_task(&self) -> Result<bool> {
        Ok(lock(&self.pet_task)?
            .as_ref()
            .is_some_and(|handle| !handle.is_finished()))
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    /// Clears the dirty flag, returning whether it was set.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Everything persisted except the slots.
    pub fn snapshot(&self) -> Result<CharacterSnapshot> {
        let gold = *self.gold()?;
        let mut record = self.record()?.clone();
        record.gold = gold;
        record.tick = self.tick();

        let mut stats = self.base()?.clone();
        stats.hp = self.vitals.hp();
        stats.chi = self.vitals.chi();

        let buffs = self.buffs()?.to_records();
        Ok(CharacterSnapshot {
            record,
            stats,
            buffs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryCharacterStore;
    use mmo_core::{ItemId, JobClass, Position};

    fn character() -> LiveCharacter {
        let record = CharacterRecord::new(CharacterId(1), "ayla", JobClass::Warrior, Position::default());
        let stats = StatRecord {
            hp: 40,
            ..StatRecord::default()
        };
        LiveCharacter::new(CharacterSnapshot::new(record, stats), PseudoId(1))
    }

    #[test]
    fn inventory_is_loaded_once() {
        let store = InMemoryCharacterStore::new();
        store
            .save_slots(CharacterId(1), &[InventorySlot::new(ItemId(5), 2)])
            .unwrap();
        let live = character();
        assert_eq!(live.loaded_slots().unwrap(), None);

        live.inventory(&store).unwrap().remove_item(0).unwrap();
        store
            .save_slots(CharacterId(1), &[InventorySlot::new(ItemId(9), 1)])
            .unwrap();

        let inventory = live.inventory(&store).unwrap();
        assert!(inventory.slot(0).unwrap().is_empty());
    }

    #[test]
    fn buff_flags_keep_respawning() {
        let live = character();
        live.insert_flags(CharacterFlags::RESPAWNING);
        live.set_buff_flags(CharacterFlags::PARALYZED);
        assert_eq!(live.flags(), CharacterFlags::RESPAWNING | CharacterFlags::PARALYZED);
        live.set_buff_flags(CharacterFlags::empty());
        assert_eq!(live.flags(), CharacterFlags::RESPAWNING);
    }

    #[test]
    fn snapshot_carries_live_vitals_and_gold() {
        let live = character();
        *live.gold().unwrap() = 250;
        live.vitals().damage(15);
        let snapshot = live.snapshot().unwrap();
        assert_eq!(snapshot.record.gold, 250);
        assert_eq!(snapshot.stats.hp, 25);
    }

    #[test]
    fn tick_resumes_from_the_snapshot() {
        let live = character();
        live.set_tick(Tick(5_100));
        let snapshot = live.snapshot().unwrap();
        assert_eq!(snapshot.record.tick, Tick(5_100));

        let again = LiveCharacter::new(snapshot, PseudoId(2));
        assert_eq!(again.advance_tick(), Tick(5_101));
    }
}
