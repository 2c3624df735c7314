use std::collections::HashMap;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, RwLock};

use mmo_core::{CharacterId, PseudoId};

use crate::api::{Result, RuntimeError};
use crate::live::{LiveCharacter, read, write};
use crate::repository::CharacterSnapshot;

#[derive(Debug, Default)]
struct Inner {
    by_id: HashMap<CharacterId, Arc<LiveCharacter>>,
    by_pseudo: HashMap<PseudoId, CharacterId>,
    by_name: HashMap<String, CharacterId>,
}

/// Online characters, indexed by id, pseudo-id and name.
///
/// Guarded by a single read-mostly lock; only login and logout write.
#[derive(Debug, Default)]
pub struct CharacterRegistry {
    inner: RwLock<Inner>,
    next_pseudo: AtomicU16,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Brings a loaded character online under a fresh pseudo-id.
    pub fn register(&self, snapshot: CharacterSnapshot) -> Result<Arc<LiveCharacter>> {
        let mut inner = write(&self.inner)?;
        let id = snapshot.id();
        if inner.by_id.contains_key(&id) {
            return Err(RuntimeError::AlreadyOnline(id));
        }
        let name_key = snapshot.record.name.to_lowercase();
        if inner.by_name.contains_key(&name_key) {
            return Err(RuntimeError::NameTaken(snapshot.record.name));
        }
        let pseudo = self.allocate_pseudo(&inner)?;

        let live = Arc::new(LiveCharacter::new(snapshot, pseudo));
        inner.by_id.insert(id, Arc::clone(&live));
        inner.by_pseudo.insert(pseudo, id);
        inner.by_name.insert(name_key, id);
        Ok(live)
    }

    pub fn get(&self, id: CharacterId) -> Result<Option<Arc<LiveCharacter>>> {
        Ok(read(&self.inner)?.by_id.get(&id).cloned())
    }

    /// Like [`get`](Self::get) but an offline character is an error.
    pub fn require(&self, id: CharacterId) -> Result<Arc<LiveCharacter>> {
        self.get(id)?.ok_or(RuntimeError::UnknownCharacter(id))
    }

    pub fn by_pseudo(&self, pseudo: PseudoId) -> Result<Option<Arc<LiveCharacter>>> {
        let inner = read(&self.inner)?;
        Ok(inner
            .by_pseudo
            .get(&pseudo)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    pub fn by_name(&self, name: &str) -> Result<Option<Arc<LiveCharacter>>> {
        let inner = read(&self.inner)?;
        Ok(inner
            .by_name
            .get(&name.to_lowercase())
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    pub fn remove(&self, id: CharacterId) -> Result<Option<Arc<LiveCharacter>>> {
        let mut inner = write(&self.inner)?;
        let Some(live) = inner.by_id.remove(&id) else {
            return Ok(None);
        };
        inner.by_pseudo.remove(&live.pseudo());
        inner.by_name.remove(&live.name().to_lowercase());
        Ok(Some(live))
    }

    pub fn all(&self) -> Result<Vec<Arc<LiveCharacter>>> {
        Ok(read(&self.inner)?.by_id.values().cloned().collect())
    }

    pub fn ids(&self) -> Result<Vec<CharacterId>> {
        let mut ids: Vec<_> = read(&self.inner)?.by_id.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(read(&self.inner)?.by_id.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Empties the registry and returns whoever was still online.
    pub fn clear(&self) -> Result<Vec<Arc<LiveCharacter>>> {
        let mut inner = write(&self.inner)?;
        inner.by_pseudo.clear();
        inner.by_name.clear();
        Ok(inner.by_id.drain().map(|(_, live)| live).collect())
    }

    fn allocate_pseudo(&self, inner: &Inner) -> Result<PseudoId> {
        for _ in 0..=u16::MAX {
            let candidate = PseudoId(self.next_pseudo.fetch_add(1, Ordering::Relaxed));
            if candidate.0 != 0 && !inner.by_pseudo.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
        Err(RuntimeError::PseudoIdsExhausted)
    }
}
