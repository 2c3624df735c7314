//! Write-behind persistence worker.
//!
//! Memory is authoritative while a character is online. Mutations enqueue
//! snapshots on a bounded queue; this worker writes them through the
//! repositories. A save that still fails after the configured retries puts
//! the character into the [`DirtySet`], and its next tick enqueues it again.
//!
//! Logout uses [`PersistenceHandle::flush`], which waits for the write and
//! hands back its error.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mmo_core::{CharacterId, InventorySlot};
use tokio::sync::{mpsc, oneshot};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::api::{Result, RuntimeError};
use crate::live::lock;
use crate::repository::{
    self, CharacterRepository, CharacterSnapshot, InventoryRepository, RepositoryError,
};

/// One character's persisted state at a point in time.
#[derive(Clone, Debug)]
pub struct PersistRequest {
    pub snapshot: CharacterSnapshot,
    /// `None` when the inventory was never loaded and must not be overwritten.
    pub slots: Option<Vec<InventorySlot>>,
}

impl PersistRequest {
    pub fn id(&self) -> CharacterId {
        self.snapshot.id()
    }
}

pub(crate) enum Command {
    Save(Box<PersistRequest>),
    Flush {
        request: Box<PersistRequest>,
        reply: oneshot::Sender<repository::Result<()>>,
    },
    Shutdown,
}

/// Characters whose last save failed.
#[derive(Debug, Default)]
pub struct DirtySet {
    ids: Mutex<HashSet<CharacterId>>,
}

impl DirtySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: CharacterId) -> Result<()> {
        lock(&self.ids)?.insert(id);
        Ok(())
    }

    /// Removes `id`, returning whether it was dirty.
    pub fn take(&self, id: CharacterId) -> Result<bool> {
        Ok(lock(&self.ids)?.remove(&id))
    }

    pub fn contains(&self, id: CharacterId) -> Result<bool> {
        Ok(lock(&self.ids)?.contains(&id))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(lock(&self.ids)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Sending side of the persistence queue.
#[derive(Clone, Debug)]
pub struct PersistenceHandle {
    tx: mpsc::Sender<Command>,
}

impl PersistenceHandle {
    /// Queues a save without waiting. Returns false when the queue is full
    /// or closed; the caller marks the character dirty instead.
    pub fn enqueue(&self, request: PersistRequest) -> bool {
        self.tx.try_send(Command::Save(Box::new(request))).is_ok()
    }

    /// Saves `request` and waits for the outcome.
    pub async fn flush(&self, request: PersistRequest) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Flush {
                request: Box::new(request),
                reply,
            })
            .await
            .map_err(|_| RuntimeError::PersistenceChannelClosed)?;
        rx.await.map_err(RuntimeError::ReplyChannelClosed)??;
        Ok(())
    }

    /// Asks the worker to drain its queue and stop.
    pub async fn shutdown(&self) -> Result<()> {
        self.tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::PersistenceChannelClosed)
    }
}

/// Retry policy of the worker.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based).
    fn delay(&self, attempt: u32) -> Duration {
        self.backoff
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Background worker that owns the repositories' write side.
pub struct PersistenceWorker {
    characters: Arc<dyn CharacterRepository>,
    inventories: Arc<dyn InventoryRepository>,
    dirty: Arc<DirtySet>,
    policy: RetryPolicy,
    rx: mpsc::Receiver<Command>,
}

impl PersistenceWorker {
    pub fn new(
        characters: Arc<dyn CharacterRepository>,
        inventories: Arc<dyn InventoryRepository>,
        dirty: Arc<DirtySet>,
        policy: RetryPolicy,
        capacity: usize,
    ) -> (Self, PersistenceHandle) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let worker = Self {
            characters,
            inventories,
            dirty,
            policy,
            rx,
        };
        (worker, PersistenceHandle { tx })
    }

    pub async fn run(mut self) {
        info!(attempts = self.policy.attempts, "PersistenceWorker started");

        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Save(request) => self.save_or_mark_dirty(&request).await,
                Command::Flush { request, reply } => {
                    let result = self.save_with_retry(&request).await;
                    if let Err(error) = &result {
                        error!(character = %request.id(), %error, "flush failed");
                    }
                    let _ = reply.send(result);
                }
                Command::Shutdown => {
                    debug!("Shutdown command received");
                    break;
                }
            }
        }

        // drain whatever was queued before shutdown
        self.rx.close();
        while let Ok(command) = self.rx.try_recv() {
            match command {
                Command::Save(request) => self.save_or_mark_dirty(&request).await,
                Command::Flush { request, reply } => {
                    let _ = reply.send(self.save_with_retry(&request).await);
                }
                Command::Shutdown => {}
            }
        }

        info!("PersistenceWorker stopped");
    }

    async fn save_or_mark_dirty(&self, request: &PersistRequest) {
        if let Err(error) = self.save_with_retry(request).await {
            error!(
                character = %request.id(),
                %error,
                "save failed after retries, marking dirty"
            );
            if self.dirty.insert(request.id()).is_err() {
                warn!(character = %request.id(), "dirty set poisoned");
            }
        }
    }

    async fn save_with_retry(&self, request: &PersistRequest) -> repository::Result<()> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.write(request) {
                Ok(()) => {
                    debug!(character = %request.id(), attempt, "saved");
                    return Ok(());
                }
                Err(error) if attempt < self.policy.attempts => {
                    warn!(character = %request.id(), attempt, %error, "save failed, retrying");
                    sleep(self.policy.delay(attempt)).await;
                }
                Err(error) => return Err(error),
            }
        }
    }

    fn write(&self, request: &PersistRequest) -> std::result::Result<(), RepositoryError> {
        self.characters.save(&request.snapshot)?;
        if let Some(slots) = &request.slots {
            self.inventories.save_slots(request.id(), slots)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryCharacterStore;
    use mmo_core::{CharacterRecord, ItemId, JobClass, Position, StatRecord};
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` saves.
    struct Flaky {
        inner: InMemoryCharacterStore,
        failures: AtomicU32,
    }

    impl CharacterRepository for Flaky {
        fn load(&self, id: CharacterId) -> repository::Result<Option<CharacterSnapshot>> {
            self.inner.load(id)
        }

        fn save(&self, snapshot: &CharacterSnapshot) -> repository::Result<()> {
            if self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
                .is_ok()
            {
                return Err(RepositoryError::Io(std::io::Error::other("disk on fire")));
            }
            self.inner.save(snapshot)
        }

        fn delete(&self, id: CharacterId) -> repository::Result<()> {
            self.inner.delete(id)
        }

        fn exists(&self, id: CharacterId) -> bool {
            self.inner.exists(id)
        }
    }

    fn request(id: u32) -> PersistRequest {
        PersistRequest {
            snapshot: CharacterSnapshot::new(
                CharacterRecord::new(CharacterId(id), "saver", JobClass::Healer, Position::default()),
                StatRecord::default(),
            ),
            slots: Some(vec![InventorySlot::new(ItemId(3), 1)]),
        }
    }

    fn spawn(failures: u32, attempts: u32) -> (Arc<Flaky>, Arc<InMemoryCharacterStore>, Arc<DirtySet>, PersistenceHandle) {
        let characters = Arc::new(Flaky {
            inner: InMemoryCharacterStore::new(),
            failures: AtomicU32::new(failures),
        });
        let inventories = Arc::new(InMemoryCharacterStore::new());
        let dirty = Arc::new(DirtySet::new());
        let (worker, handle) = PersistenceWorker::new(
            characters.clone(),
            inventories.clone(),
            dirty.clone(),
            RetryPolicy {
                attempts,
                backoff: Duration::from_millis(1),
            },
            8,
        );
        tokio::spawn(worker.run());
        (characters, inventories, dirty, handle)
    }

    #[tokio::test]
    async fn flush_retries_until_success() {
        let (characters, inventories, dirty, handle) = spawn(2, 3);
        handle.flush(request(1)).await.unwrap();

        assert!(characters.exists(CharacterId(1)));
        assert_eq!(inventories.load_slots(CharacterId(1)).unwrap().unwrap().len(), 1);
        assert!(dirty.is_empty().unwrap());
    }

    #[tokio::test]
    async fn flush_propagates_exhausted_retries() {
        let (_, _, _, handle) = spawn(5, 2);
        let error = handle.flush(request(1)).await.unwrap_err();
        assert!(matches!(error, RuntimeError::Repository(RepositoryError::Io(_))));
    }

    #[tokio::test]
    async fn failed_background_save_marks_dirty() {
        let (_, _, dirty, handle) = spawn(5, 2);
        assert!(handle.enqueue(request(9)));
        handle.shutdown().await.unwrap();

        for _ in 0..100 {
            if dirty.contains(CharacterId(9)).unwrap() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("character never marked dirty");
    }
}
