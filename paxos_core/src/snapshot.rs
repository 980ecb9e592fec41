//! Durable persistence of a [crate::dictionary::Dictionary]'s decided state.
//!
//! The wire format is a flat list of `(key, id, value)` triples — one per key that has reached
//! consensus — encoded with the same `prototk` scheme as every other structure in this
//! ecosystem. The file itself is rewritten atomically after every handled message: write to a
//! temporary file in the same directory, `sync_data`, then `rename` over the real path. This is
//! the same write-temp/fsync/rename idiom the teacher's `mani` crate uses for its manifest
//! rollover, adapted here to a single always-current file rather than an append log, since a
//! dictionary snapshot has no use for history — only the latest decided value per key matters.

use std::fs::{remove_file, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use biometrics::Counter;

use buffertk::{stack_pack, Unpackable};

use prototk_derive::Message;

use tatl::{HeyListen, Stationary};

use paxos_pb::Error;

use crate::dictionary::Dictionary;
use crate::comm::Communicator;

static SNAPSHOT_SAVED: Counter = Counter::new("paxos_core.snapshot.saved");
static SNAPSHOT_SAVE_FAILED: Counter = Counter::new("paxos_core.snapshot.save_failed");
static SNAPSHOT_SAVE_FAILED_MONITOR: Stationary =
    Stationary::new("paxos_core.snapshot.save_failed", &SNAPSHOT_SAVE_FAILED);
static SNAPSHOT_LOADED: Counter = Counter::new("paxos_core.snapshot.loaded");

pub fn register_biometrics(collector: &biometrics::Collector) {
    collector.register_counter(&SNAPSHOT_SAVED);
    collector.register_counter(&SNAPSHOT_SAVE_FAILED);
    collector.register_counter(&SNAPSHOT_LOADED);
}

/// A node whose durability guarantee is silently compromised is worse than one that crashes
/// loudly; this fires the instant a single snapshot write fails so an operator notices before a
/// second failure makes the window of vulnerability overlap with an actual crash.
pub fn register_monitors(hey_listen: &mut HeyListen) {
    hey_listen.register_stationary(&SNAPSHOT_SAVE_FAILED_MONITOR);
}

/// One decided key, as it appears in a persisted snapshot.
#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct SnapshotEntry {
    #[prototk(1, bytes)]
    pub key: Vec<u8>,
    #[prototk(2, uint64)]
    pub id: u64,
    #[prototk(3, bytes)]
    pub value: Vec<u8>,
}

/// The full persisted state of a [Dictionary]: every key that has reached consensus, paired with
/// the proposal id it was fixed at and the value itself. Keys with no decided value yet (still
/// mid-protocol) are never persisted — on restart they simply start from scratch, which is safe
/// because no other node can have observed a value for them either.
#[derive(Clone, Debug, Default, Eq, Message, PartialEq)]
pub struct Snapshot {
    #[prototk(1, message)]
    pub entries: Vec<SnapshotEntry>,
}

/// A durability port: load the last-persisted snapshot bytes, and atomically overwrite them.
/// `paxos_core` never interprets the bytes itself beyond the `Snapshot` message above; the trait
/// exists so tests can substitute an in-memory fake and so the binary wiring can substitute a
/// different backing store without touching the dictionary.
pub trait Storage: Send + Sync {
    /// Returns the last successfully saved snapshot, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<u8>>, Error>;

    /// Atomically replaces the persisted snapshot with `bytes`.
    fn save_atomic(&self, bytes: &[u8]) -> Result<(), Error>;
}

/// A [Storage] backed by a single file, rewritten atomically via a temp file in the same
/// directory. `counter` disambiguates concurrent temp files from distinct processes sharing a
/// `FileStorage` (there are none in this system, but it costs nothing to make the temp name
/// collision-proof).
pub struct FileStorage {
    path: PathBuf,
    counter: AtomicU64,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            counter: AtomicU64::new(0),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let file_name = self
            .path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        let mut temp = self.path.clone();
        temp.set_file_name(format!("{file_name}.tmp.{n}"));
        temp
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Option<Vec<u8>>, Error> {
        if !Path::new(&self.path).exists() {
            return Ok(None);
        }
        let bytes = std::fs::read(&self.path)?;
        SNAPSHOT_LOADED.click();
        Ok(Some(bytes))
    }

    fn save_atomic(&self, bytes: &[u8]) -> Result<(), Error> {
        let temp = self.temp_path();
        let result = (|| -> Result<(), std::io::Error> {
            let mut fout: File = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&temp)?;
            fout.write_all(bytes)?;
            fout.sync_data()?;
            std::fs::rename(&temp, &self.path)?;
            Ok(())
        })();
        match result {
            Ok(()) => {
                SNAPSHOT_SAVED.click();
                Ok(())
            }
            Err(e) => {
                SNAPSHOT_SAVE_FAILED.click();
                let _ = remove_file(&temp);
                Err(Error::from(e))
            }
        }
    }
}

/// An in-memory [Storage] used by tests that want to exercise save/restore without touching the
/// filesystem.
#[derive(Default)]
pub struct MemoryStorage {
    bytes: std::sync::Mutex<Option<Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.bytes.lock().unwrap().clone())
    }

    fn save_atomic(&self, bytes: &[u8]) -> Result<(), Error> {
        *self.bytes.lock().unwrap() = Some(bytes.to_vec());
        Ok(())
    }
}

/// Serializes every decided entry of `dict` into a [Snapshot].
pub fn snapshot_of<C: Communicator>(dict: &Dictionary<C>) -> Snapshot {
    let entries = dict
        .decided_entries()
        .into_iter()
        .map(|(key, id, value)| SnapshotEntry { key, id, value })
        .collect();
    Snapshot { entries }
}

/// Restores every entry in `snapshot` into `dict`. Returns an error (rather than panicking) if
/// two entries disagree about a key's value, which would indicate a corrupted file; callers at
/// the binary layer are expected to treat that as fatal (§7's "Corruption" class).
pub fn restore_into<C: Communicator>(dict: &Dictionary<C>, snapshot: &Snapshot) -> Result<(), Error> {
    for entry in &snapshot.entries {
        dict.restore_slot(entry.key.clone(), entry.id, entry.value.clone())?;
    }
    Ok(())
}

/// Persists the full current state of `dict` to `storage`. Called by the receive loop after
/// every handled message (§4.8): the write is synchronous and on the hot path, trading latency
/// for the simplest possible durability story, matching the source system's per-message commit
/// granularity (see DESIGN.md).
pub fn persist<C: Communicator>(dict: &Dictionary<C>, storage: &dyn Storage) -> Result<(), Error> {
    let snapshot = snapshot_of(dict);
    let bytes = stack_pack(&snapshot).to_vec();
    storage.save_atomic(&bytes)
}

/// Loads a previously persisted snapshot from `storage` and rehydrates `dict` with it. Call once
/// at startup, before the dictionary is wired to a live transport.
pub fn restore<C: Communicator>(dict: &Dictionary<C>, storage: &dyn Storage) -> Result<(), Error> {
    match storage.load()? {
        Some(bytes) => {
            let (snapshot, rem) = Snapshot::unpack(&bytes)?;
            if !rem.is_empty() {
                return Err(Error::Corruption {
                    core: Default::default(),
                    what: "trailing bytes after snapshot".to_string(),
                });
            }
            restore_into(dict, &snapshot)
        }
        None => Ok(()),
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    use paxos_pb::NodeID;

    use super::*;
    use crate::comm::tests_support::FakeCommunicator;
    use crate::dictionary::GeneratorKind;

    fn dict() -> (Dictionary<FakeCommunicator>, Arc<FakeCommunicator>) {
        let nodes = vec![NodeID::new(0)];
        let comm = Arc::new(FakeCommunicator::new(NodeID::new(0), nodes));
        let dict = Dictionary::new(
            Arc::clone(&comm),
            GeneratorKind::Incremental,
            Arc::new(AtomicBool::new(false)),
        );
        (dict, comm)
    }

    #[test]
    fn round_trips_through_memory_storage() {
        let (dict, _comm) = dict();
        dict.restore_slot(b"a".to_vec(), 1, b"va".to_vec()).unwrap();
        dict.restore_slot(b"b".to_vec(), 2, b"vb".to_vec()).unwrap();
        let storage = MemoryStorage::new();
        persist(&dict, &storage).unwrap();

        let (dict2, _comm2) = dict();
        restore(&dict2, &storage).unwrap();
        let mut entries = dict2.decided_entries();
        entries.sort();
        let mut expected = vec![
            (b"a".to_vec(), 1, b"va".to_vec()),
            (b"b".to_vec(), 2, b"vb".to_vec()),
        ];
        expected.sort();
        assert_eq!(expected, entries);
    }

    #[test]
    fn restore_with_nothing_saved_is_a_no_op() {
        let (dict, _comm) = dict();
        let storage = MemoryStorage::new();
        restore(&dict, &storage).unwrap();
        assert!(dict.decided_entries().is_empty());
    }

    #[test]
    fn file_storage_round_trips_atomically() {
        let dir = std::env::temp_dir().join(format!(
            "paxos_core_snapshot_test_{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snapshot.bin");
        let storage = FileStorage::new(&path);

        let (dict, _comm) = dict();
        dict.restore_slot(b"k".to_vec(), 9, b"v".to_vec()).unwrap();
        persist(&dict, &storage).unwrap();
        assert!(path.exists());

        let (dict2, _comm2) = dict();
        restore(&dict2, &storage).unwrap();
        assert_eq!(
            vec![(b"k".to_vec(), 9, b"v".to_vec())],
            dict2.decided_entries()
        );
        let _ = std::fs::remove_dir_all(&dir);
    }
}
