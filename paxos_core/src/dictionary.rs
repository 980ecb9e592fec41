//! The multi-paxos dictionary: a write-once map from opaque keys to opaque values, each key
//! independently decided by its own [PerKeyServer]. `(prefix, watermark)` keys are never reused
//! across restarts, so `set` is idempotent: proposing the same value twice, or proposing after
//! consensus was already reached, never changes the fixed value.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use biometrics::{Collector, Counter};

use guacamole::Guacamole;

use indicio::clue;

use paxos_pb::{Error, Message, NodeID};

use crate::comm::Communicator;
use crate::generator::{Incremental, ProposalGenerator, TimeAware};
use crate::server::PerKeyServer;
use crate::snapshot::Storage;
use crate::COLLECTOR;

static DICTIONARY_SET_CALLED: Counter = Counter::new("paxos_core.dictionary.set.called");
static DICTIONARY_SET_RETRIED: Counter = Counter::new("paxos_core.dictionary.set.retried");
static DICTIONARY_GET_CALLED: Counter = Counter::new("paxos_core.dictionary.get.called");
static DICTIONARY_DELIVER_CALLED: Counter = Counter::new("paxos_core.dictionary.deliver.called");

pub fn register_biometrics(collector: &Collector) {
    collector.register_counter(&DICTIONARY_SET_CALLED);
    collector.register_counter(&DICTIONARY_SET_RETRIED);
    collector.register_counter(&DICTIONARY_GET_CALLED);
    collector.register_counter(&DICTIONARY_DELIVER_CALLED);
}

/// Selects which [ProposalGenerator] a [Dictionary] mints for each key.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GeneratorKind {
    Incremental,
    TimeAware,
}

impl GeneratorKind {
    fn build(self, node: NodeID) -> Box<dyn ProposalGenerator> {
        match self {
            GeneratorKind::Incremental => Box::new(Incremental::new(node)),
            GeneratorKind::TimeAware => Box::new(TimeAware::new(node)),
        }
    }
}

struct Slot {
    server: Mutex<PerKeyServer>,
    consensus_reached: Condvar,
}

/// The retry/backoff schedule `set`/`get` use while waiting for consensus: jittered so that
/// competing proposers on different nodes don't perpetually collide on the same cadence.
struct Backoff {
    guacamole: Guacamole,
    base: Duration,
    max: Duration,
    attempt: u32,
}

impl Backoff {
    fn new(seed: u64, base: Duration, max: Duration) -> Self {
        Self {
            guacamole: Guacamole::new(seed),
            base,
            max,
            attempt: 0,
        }
    }

    fn next(&mut self) -> Duration {
        self.attempt = self.attempt.saturating_add(1);
        let doubled = self.base.saturating_mul(1 << self.attempt.min(8));
        let capped = doubled.min(self.max);
        let mut jitter_bytes = [0u8; 8];
        self.guacamole.generate(&mut jitter_bytes);
        let jitter_frac = (u64::from_le_bytes(jitter_bytes) % 1000) as f64 / 1000.0;
        Duration::from_secs_f64(capped.as_secs_f64() * (0.5 + 0.5 * jitter_frac))
    }
}

/// A write-once dictionary of opaque keys to opaque values, replicated by running one
/// single-decree Paxos instance per key. Keys are materialized lazily: the first `set` or `get`
/// (or inbound message) for a never-before-seen key creates its [PerKeyServer] under a
/// double-checked lock, so a quiescent cluster carries no cost for keys nobody has touched.
pub struct Dictionary<C> {
    comm: Arc<C>,
    generator_kind: GeneratorKind,
    slots: Mutex<HashMap<Vec<u8>, Arc<Slot>>>,
    shutdown: Arc<AtomicBool>,
    storage: Option<Arc<dyn Storage>>,
    retry_base: Duration,
    retry_max: Duration,
    wait_quantum: Duration,
}

impl<C: Communicator> Dictionary<C> {
    pub fn new(comm: Arc<C>, generator_kind: GeneratorKind, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            comm,
            generator_kind,
            slots: Mutex::new(HashMap::new()),
            shutdown,
            storage: None,
            retry_base: Duration::from_millis(50),
            retry_max: Duration::from_secs(2),
            wait_quantum: Duration::from_millis(200),
        }
    }

    /// Builds a dictionary that persists its full state to `storage` after every handled
    /// message. Does not load any pre-existing snapshot; call [crate::snapshot::restore] first
    /// and feed the result into [Dictionary::restore_slot] before wiring this dictionary to a
    /// live transport.
    pub fn with_storage(
        comm: Arc<C>,
        generator_kind: GeneratorKind,
        shutdown: Arc<AtomicBool>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let mut dict = Self::new(comm, generator_kind, shutdown);
        dict.storage = Some(storage);
        dict
    }

    fn persist(&self) {
        if let Some(storage) = &self.storage {
            if let Err(err) = crate::snapshot::persist(self, storage.as_ref()) {
                let what = err.to_string();
                clue!(COLLECTOR, indicio::ERROR, { snapshot_persist_failed: what });
            }
        }
    }

    fn slot_for(&self, key: &[u8]) -> Arc<Slot> {
        {
            let slots = self.slots.lock().unwrap();
            if let Some(slot) = slots.get(key) {
                return Arc::clone(slot);
            }
        }
        let mut slots = self.slots.lock().unwrap();
        if let Some(slot) = slots.get(key) {
            return Arc::clone(slot);
        }
        let generator = self.generator_kind.build(self.comm.this_node());
        let slot = Arc::new(Slot {
            server: Mutex::new(PerKeyServer::new(generator)),
            consensus_reached: Condvar::new(),
        });
        slots.insert(key.to_vec(), Arc::clone(&slot));
        slot
    }

    /// Restores (or creates) a slot directly in the consensus-reached state, used by
    /// [crate::snapshot] on restore. Returns an error if the key already carries a different
    /// fixed value: restoring two conflicting snapshots onto the same dictionary is corruption,
    /// not a race to be resolved by last-write-wins.
    pub(crate) fn restore_slot(&self, key: Vec<u8>, id: u64, value: Vec<u8>) -> Result<(), Error> {
        let mut slots = self.slots.lock().unwrap();
        if let Some(existing) = slots.get(&key) {
            let server = existing.server.lock().unwrap();
            if let Some(current) = server.consensus() {
                if current != &value {
                    return Err(Error::Corruption {
                        core: Default::default(),
                        what: "restore conflicts with an already-decided key".to_string(),
                    });
                }
            }
            return Ok(());
        }
        let generator = self.generator_kind.build(self.comm.this_node());
        let server = PerKeyServer::with_consensus(id, value, generator);
        slots.insert(
            key,
            Arc::new(Slot {
                server: Mutex::new(server),
                consensus_reached: Condvar::new(),
            }),
        );
        Ok(())
    }

    /// Returns every key that has reached consensus, paired with its fixed value. Used by
    /// [crate::snapshot] to serialize the dictionary's durable state.
    pub(crate) fn decided_entries(&self) -> Vec<(Vec<u8>, u64, Vec<u8>)> {
        let slots = self.slots.lock().unwrap();
        slots
            .iter()
            .filter_map(|(key, slot)| {
                let server = slot.server.lock().unwrap();
                let decree = server.accepted()?;
                server
                    .consensus()
                    .map(|value| (key.clone(), decree.id, value.clone()))
            })
            .collect()
    }

    fn dispatch(&self, key: &[u8], outbound: Vec<crate::server::Outbound>) {
        for out in outbound {
            self.comm.send(out.dest, key, out.message);
        }
    }

    /// Delivers one inbound message addressed to `key`. Called by the transport's receive loop
    /// for every [paxos_pb::Payload] that arrives off the wire.
    pub fn deliver(&self, from: NodeID, key: &[u8], message: Message) {
        DICTIONARY_DELIVER_CALLED.click();
        let slot = self.slot_for(key);
        let nodes = self.comm.nodes();
        let quorum_size = self.comm.quorum_size();
        let (outbound, newly_learned) = {
            let mut server = slot.server.lock().unwrap();
            server.handle(from, &nodes, quorum_size, message)
        };
        self.dispatch(key, outbound);
        self.persist();
        if newly_learned {
            slot.consensus_reached.notify_all();
        }
    }

    /// Proposes `value` for `key` and blocks until consensus is reached for that key, retrying
    /// with a jittered backoff until it succeeds or the dictionary is shut down. If `key` has
    /// already reached consensus, this returns immediately without issuing any new proposal:
    /// `set` is write-once, so re-proposing a decided key can never change its value and would
    /// only waste network traffic.
    pub fn set(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), Error> {
        DICTIONARY_SET_CALLED.click();
        let slot = self.slot_for(&key);
        {
            let server = slot.server.lock().unwrap();
            if server.consensus().is_some() {
                return Ok(());
            }
        }
        let nodes = self.comm.nodes();
        let quorum_size = self.comm.quorum_size();
        let mut backoff = Backoff::new(
            seed_from_key(&key),
            self.retry_base,
            self.retry_max,
        );
        let outbound = {
            let mut server = slot.server.lock().unwrap();
            server.propose(&nodes, quorum_size, value.clone())
        };
        self.dispatch(&key, outbound);
        loop {
            let mut guard = slot.server.lock().unwrap();
            loop {
                if guard.consensus().is_some() {
                    return Ok(());
                }
                if self.shutdown.load(Ordering::Relaxed) {
                    return Err(Error::TransportFailure {
                        core: Default::default(),
                        what: "dictionary is shutting down".to_string(),
                    });
                }
                let (next, timed_out) = self
                    .consensus_reached_or_timeout(&slot, guard)
                    .unwrap();
                guard = next;
                if timed_out {
                    break;
                }
            }
            if guard.consensus().is_some() {
                return Ok(());
            }
            drop(guard);
            DICTIONARY_SET_RETRIED.click();
            let wait_ms = backoff.next().as_millis() as i64;
            clue!(COLLECTOR, indicio::INFO, { paxos_set_retry_wait_ms: wait_ms });
            let mut server = slot.server.lock().unwrap();
            // Re-propose the caller's original value; `propose` mints a fresh, higher proposal
            // number every time it's called, and the prepare phase adopts any higher value a
            // quorum member already accepted, so proposing anything else here would risk
            // clobbering the caller's intent with an empty or stale value.
            let outbound = server.propose(&nodes, quorum_size, value.clone());
            drop(server);
            self.dispatch(&key, outbound);
        }
    }

    fn consensus_reached_or_timeout<'a>(
        &self,
        slot: &'a Slot,
        guard: std::sync::MutexGuard<'a, PerKeyServer>,
    ) -> Result<(std::sync::MutexGuard<'a, PerKeyServer>, bool), Error> {
        let (guard, timeout) = slot
            .consensus_reached
            .wait_timeout(guard, self.wait_quantum)
            .map_err(|_| Error::TransportFailure {
                core: Default::default(),
                what: "condvar poisoned".to_string(),
            })?;
        Ok((guard, timeout.timed_out()))
    }

    /// Reads the value fixed for `key`, querying peers for it if this node's own learner has not
    /// yet caught up. Returns `None` if no peer answers within the wait window; callers that
    /// need a definite answer should retry.
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        DICTIONARY_GET_CALLED.click();
        let slot = self.slot_for(key);
        {
            let server = slot.server.lock().unwrap();
            if let Some(value) = server.consensus() {
                return Some(value.clone());
            }
        }
        let nodes = self.comm.nodes();
        let outbound = {
            let server = slot.server.lock().unwrap();
            server.query(&nodes)
        };
        self.dispatch(key, outbound);
        let deadline = Instant::now() + self.wait_quantum * 5;
        loop {
            let guard = slot.server.lock().unwrap();
            if let Some(value) = guard.consensus() {
                return Some(value.clone());
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || self.shutdown.load(Ordering::Relaxed) {
                return None;
            }
            let (guard, _timeout) = slot
                .consensus_reached
                .wait_timeout(guard, remaining.min(self.wait_quantum))
                .unwrap();
            if let Some(value) = guard.consensus() {
                return Some(value.clone());
            }
        }
    }
}

fn seed_from_key(key: &[u8]) -> u64 {
    let mut seed = 0xcbf29ce484222325u64;
    for byte in key {
        seed ^= *byte as u64;
        seed = seed.wrapping_mul(0x100000001b3);
    }
    seed
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
