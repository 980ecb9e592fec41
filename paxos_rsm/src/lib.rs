//! A replicated state machine layered over a [paxos_core::dictionary::Dictionary]: a sequence of
//! `(prefix, watermark)` slots, each holding exactly one committed command, applied in watermark
//! order to build up one [Apply] implementation's in-memory state.
//!
//! Every replica that applies slots in order observes the same sequence of commands and therefore
//! reaches the same state, because the underlying dictionary's `set` is write-once: a slot is
//! decided exactly once, regardless of how many nodes race to fill it.
//!
//! `prefix` distinguishes one state machine's log from another sharing the same dictionary (the
//! ledger binary runs exactly one, but nothing here assumes that). Slot keys are encoded with
//! `tuple_key` so that, unlike raw concatenation, two different prefixes can never collide on a
//! shared watermark value.

use std::sync::{Arc, Mutex};

use biometrics::Counter;

use indicio::clue;

use paxos_core::comm::Communicator;
use paxos_core::dictionary::Dictionary;
use paxos_pb::Error;

use prototk::FieldNumber;

use tuple_key::TupleKey;

pub static COLLECTOR: indicio::Collector = indicio::Collector::new();

static RSM_COMMANDS_APPLIED: Counter = Counter::new("paxos_rsm.commands.applied");
static RSM_EXECUTE_CALLED: Counter = Counter::new("paxos_rsm.execute.called");
static RSM_EXECUTE_LOST_RACE: Counter = Counter::new("paxos_rsm.execute.lost_race");

pub fn register_biometrics(collector: &biometrics::Collector) {
    collector.register_counter(&RSM_COMMANDS_APPLIED);
    collector.register_counter(&RSM_EXECUTE_CALLED);
    collector.register_counter(&RSM_EXECUTE_LOST_RACE);
}

/// The state machine a [ReplicatedStateMachine] drives. `apply` receives the raw bytes of a
/// committed command and returns the raw bytes of its result; neither is interpreted by this
/// crate. Implementations are expected to encode domain errors into their own result bytes (see
/// `ledger`) rather than fail `apply` itself: a committed command is never rolled back, so `apply`
/// has no way to refuse one, only to record that it didn't succeed.
pub trait Apply: Send + Sync {
    fn apply(&self, command: &[u8]) -> Vec<u8>;
}

fn slot_key(prefix: &str, watermark: u64) -> Vec<u8> {
    let mut key = TupleKey::default();
    key.extend_with_key(FieldNumber::must(1), prefix.to_string());
    key.extend_with_key(FieldNumber::must(2), watermark);
    key.as_bytes().to_vec()
}

/// Layers a replicated, ordered command log over a [Dictionary], driving one [Apply]
/// implementation from it.
pub struct ReplicatedStateMachine<C, A> {
    dictionary: Arc<Dictionary<C>>,
    prefix: String,
    state_machine: A,
    watermark: Mutex<u64>,
}

impl<C, A> ReplicatedStateMachine<C, A>
where
    C: Communicator,
    A: Apply,
{
    pub fn new(dictionary: Arc<Dictionary<C>>, prefix: impl Into<String>, state_machine: A) -> Self {
        Self {
            dictionary,
            prefix: prefix.into(),
            state_machine,
            watermark: Mutex::new(0),
        }
    }

    /// Read-only access to the driven [Apply] implementation, for callers that want to read its
    /// state directly (e.g. a balance query) rather than route a command through [Self::execute].
    /// Call [Self::sync] first if the read needs to reflect commands decided elsewhere.
    pub fn state_machine(&self) -> &A {
        &self.state_machine
    }

    /// Applies every already-decided command starting at the current watermark, stopping at the
    /// first slot that hasn't reached consensus yet (or that no peer answers for within the
    /// dictionary's wait window). Returns the watermark after catching up. Safe to call
    /// concurrently with [ReplicatedStateMachine::execute]; both serialize on the same lock so
    /// commands are always applied in watermark order.
    pub fn sync(&self) -> u64 {
        let mut watermark = self.watermark.lock().unwrap();
        self.catch_up(&mut watermark);
        *watermark
    }

    /// Proposes `command` for the next open slot, applying every command that wins a slot (its
    /// own or someone else's) along the way. Returns the result of applying `command` once it has
    /// won a slot of its own.
    pub fn execute(&self, command: Vec<u8>) -> Result<Vec<u8>, Error> {
        RSM_EXECUTE_CALLED.click();
        let mut watermark = self.watermark.lock().unwrap();
        self.catch_up(&mut watermark);
        loop {
            let key = slot_key(&self.prefix, *watermark);
            self.dictionary.set(key.clone(), command.clone())?;
            let decided = self.dictionary.get(&key).ok_or_else(|| Error::TransportFailure {
                core: Default::default(),
                what: "set succeeded but get found no value for the same key".to_string(),
            })?;
            let won = decided == command;
            let output = self.state_machine.apply(&decided);
            RSM_COMMANDS_APPLIED.click();
            *watermark += 1;
            if won {
                return Ok(output);
            }
            RSM_EXECUTE_LOST_RACE.click();
            let lost_at = *watermark - 1;
            clue!(COLLECTOR, indicio::INFO, { rsm_execute_lost_race_at_watermark: lost_at });
        }
    }

    fn catch_up(&self, watermark: &mut u64) {
        loop {
            let key = slot_key(&self.prefix, *watermark);
            match self.dictionary.get(&key) {
                Some(command) => {
                    self.state_machine.apply(&command);
                    RSM_COMMANDS_APPLIED.click();
                    *watermark += 1;
                }
                None => return,
            }
        }
    }
}

impl<C, A> std::fmt::Debug for ReplicatedStateMachine<C, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplicatedStateMachine")
            .field("prefix", &self.prefix)
            .field("watermark", &*self.watermark.lock().unwrap())
            .finish()
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
