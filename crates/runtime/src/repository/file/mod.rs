//! File-based repositories.

use std::fs;
use std::path::{Path, PathBuf};

use mmo_core::{CharacterId, InventorySlot};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{RepositoryError, Result};
use super::traits::{CharacterRepository, CharacterSnapshot, InventoryRepository};

/// Stores each character as two bincode files.
///
/// # File Format
///
/// ```text
/// {base_dir}/
///   ├── characters/character_{id}.bin   CharacterSnapshot
///   └── inventories/inventory_{id}.bin  Vec<InventorySlot>
/// ```
///
/// Writes go to a temp file first and are moved into place with an atomic
/// rename, so a crash never leaves a half-written record.
#[derive(Debug)]
pub struct FileCharacterStore {
    characters_dir: PathBuf,
    inventories_dir: PathBuf,
}

impl FileCharacterStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let characters_dir = base_dir.join("characters");
        let inventories_dir = base_dir.join("inventories");
        fs::create_dir_all(&characters_dir)?;
        fs::create_dir_all(&inventories_dir)?;
        Ok(Self {
            characters_dir,
            inventories_dir,
        })
    }

    fn character_path(&self, id: CharacterId) -> PathBuf {
        self.characters_dir.join(format!("character_{}.bin", id.0))
    }

    fn inventory_path(&self, id: CharacterId) -> PathBuf {
        self.inventories_dir.join(format!("inventory_{}.bin", id.0))
    }
}

fn write_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let temp_path = path.with_extension("bin.tmp");
    let bytes =
        bincode::serialize(value).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, path)?;
    tracing::debug!("Saved {}", path.display());
    Ok(())
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = fs::read(path)?;
    let value = bincode::deserialize(&bytes)
        .map_err(|e| RepositoryError::CorruptedData(format!("{}: {e}", path.display())))?;
    Ok(Some(value))
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

impl CharacterRepository for FileCharacterStore {
    fn load(&self, id: CharacterId) -> Result<Option<CharacterSnapshot>> {
        read_optional(&self.character_path(id))
    }

    fn save(&self, snapshot: &CharacterSnapshot) -> Result<()> {
        write_atomic(&self.character_path(snapshot.id()), snapshot)
    }

    fn delete(&self, id: CharacterId) -> Result<()> {
        remove_if_exists(&self.character_path(id))
    }

    fn exists(&self, id: CharacterId) -> bool {
        self.character_path(id).exists()
    }

    fn list_ids(&self) -> Result<Vec<CharacterId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.characters_dir)? {
            let name = entry?.file_name();
            let Some(id) = name
                .to_str()
                .and_then(|name| name.strip_prefix("character_"))
                .and_then(|rest| rest.strip_suffix(".bin"))
                .and_then(|digits| digits.parse::<u32>().ok())
            else {
                continue;
            };
            ids.push(CharacterId(id));
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

impl InventoryRepository for FileCharacterStore {
    fn load_slots(&self, id: CharacterId) -> Result<Option<Vec<InventorySlot>>> {
        read_optional(&self.inventory_path(id))
    }

    fn save_slots(&self, id: CharacterId, slots: &[InventorySlot]) -> Result<()> {
        write_atomic(&self.inventory_path(id), slots)
    }

    fn delete_slots(&self, id: CharacterId) -> Result<()> {
        remove_if_exists(&self.inventory_path(id))
    }
}
