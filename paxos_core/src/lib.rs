//! `paxos_core` implements single-decree Paxos (proposer/acceptor/learner), the per-key server
//! that composes the three roles for one consensus key, and the multi-paxos dictionary that
//! lazily materializes one per-key server per key and persists their state after every handled
//! message.
//!
//! Layering, leaves first: [generator] mints proposal numbers; [quorum] counts distinct replies;
//! [roles] implements the three role behaviors against those two; [server] composes one of each
//! role per key; [dictionary] owns a map of keys to servers and drives them from a
//! [comm::Communicator]; [snapshot] persists and restores a dictionary's decided state.

pub mod comm;
pub mod dictionary;
pub mod generator;
pub mod quorum;
pub mod roles;
pub mod server;
pub mod snapshot;

use indicio::Collector;

/// This crate's log collector. Binaries register an emitter (e.g. `indicio::stdio::StdioEmitter`)
/// and call `set_verbosity` once at startup; library code only ever emits through [clue](indicio::clue).
pub static COLLECTOR: Collector = Collector::new();

/// Registers every biometric this crate exports with `collector`.
pub fn register_biometrics(collector: &biometrics::Collector) {
    dictionary::register_biometrics(collector);
    snapshot::register_biometrics(collector);
}

/// Registers every alerting monitor this crate exports with `hey_listen`.
pub fn register_monitors(hey_listen: &mut tatl::HeyListen) {
    snapshot::register_monitors(hey_listen);
}
