//! The chaos killer: the thing that makes a paxos cluster prove it tolerates failures instead of
//! merely claiming to.
//!
//! Two variants, matching the two ways the original deployment scripts drove worker churn: a
//! [RandomKiller] that free-runs on its own thread, periodically killing a random alive worker and
//! optionally scheduling its respawn, and an [InteractiveKiller] that does nothing on its own and
//! instead answers [paxos_rpc::SupervisorControlService] calls from an operator (or a test
//! harness) that wants the same kill/respawn/list-workers levers on demand.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use biometrics::Counter;

use guacamole::combinators::uniform;
use guacamole::Guacamole;

use indicio::clue;

use paxos_rpc::{
    KillWorkerRequest, KillWorkerResponse, ListWorkersRequest, ListWorkersResponse,
    RespawnWorkerRequest, RespawnWorkerResponse, SupervisorControlService, SupervisorError,
    WorkerStatus,
};

use rpc_pb::Context;

use crate::worker::WorkerProcess;
use crate::COLLECTOR;

static KILLER_STRIKES: Counter = Counter::new("paxos_supervisor.killer.strikes");
static KILLER_RESPAWNS_SCHEDULED: Counter = Counter::new("paxos_supervisor.killer.respawns_scheduled");

pub fn register_biometrics(collector: &biometrics::Collector) {
    collector.register_counter(&KILLER_STRIKES);
    collector.register_counter(&KILLER_RESPAWNS_SCHEDULED);
}

/// How long the random killer's main loop sleeps between checks of the shutdown flag while it
/// waits out a kill interval or the absence of any alive worker.
const SHUTDOWN_POLL: Duration = Duration::from_millis(200);

/// Sleeps for `total`, checking `shutdown` every [SHUTDOWN_POLL] so a shutdown request is honored
/// promptly instead of only at the end of the longest configured interval.
fn interruptible_sleep(total: Duration, shutdown: &AtomicBool) {
    let deadline = std::time::Instant::now() + total;
    while !shutdown.load(Ordering::Relaxed) {
        let now = std::time::Instant::now();
        if now >= deadline {
            return;
        }
        std::thread::sleep(std::cmp::min(SHUTDOWN_POLL, deadline - now));
    }
}

/// Picks a value uniformly from `[mean.saturating_sub(dev), mean + dev]`. Jitter around a mean
/// rather than a hard period, same as the original deployment scripts' use of a mean and a
/// deviation rather than a fixed interval.
fn jittered(mean: Duration, dev: Duration, guac: &mut Guacamole) -> Duration {
    if dev.is_zero() {
        return mean;
    }
    let lo = mean.saturating_sub(dev).as_millis().min(u64::MAX as u128) as u64;
    let hi = (mean + dev).as_millis().min(u64::MAX as u128) as u64;
    let millis = uniform(lo, hi.max(lo + 1))(guac);
    Duration::from_millis(millis)
}

/// Configuration for [RandomKiller::spawn].
#[derive(Clone, Debug)]
pub struct RandomKillerConfig {
    /// Mean time between strikes.
    pub kill_interval_mean: Duration,
    /// Deviation around [Self::kill_interval_mean].
    pub kill_interval_dev: Duration,
    /// Mean delay before a killed worker is respawned. `None` means killed workers stay dead,
    /// matching a killer run with no `--restart-after` configured.
    pub restart_after_mean: Option<Duration>,
    /// Deviation around [Self::restart_after_mean].
    pub restart_after_dev: Duration,
}

/// Periodically kills a random alive worker, and optionally schedules its respawn after a
/// jittered delay, on a loop that runs until told to stop. Grounded on the original deployment's
/// `Killer`/`RandomKiller` threads: pick a victim uniformly among the alive, kill it, maybe start
/// a timer to bring it back, sleep a jittered interval, repeat.
pub struct RandomKiller {
    workers: Vec<Arc<WorkerProcess>>,
    config: RandomKillerConfig,
    shutdown: Arc<AtomicBool>,
}

impl RandomKiller {
    pub fn new(
        workers: Vec<Arc<WorkerProcess>>,
        config: RandomKillerConfig,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            workers,
            config,
            shutdown,
        }
    }

    /// Runs the kill loop on a dedicated thread, seeded from `seed` so a run can be replayed.
    pub fn spawn(self: Arc<Self>, seed: u64) -> JoinHandle<()> {
        std::thread::spawn(move || self.run(seed))
    }

    fn run(&self, seed: u64) {
        let mut guac = Guacamole::new(seed);
        while !self.shutdown.load(Ordering::Relaxed) {
            let alive: Vec<_> = self.workers.iter().filter(|w| w.is_alive()).collect();
            if alive.is_empty() {
                interruptible_sleep(SHUTDOWN_POLL, &self.shutdown);
                continue;
            }
            let idx = uniform(0u64, alive.len() as u64)(&mut guac) as usize;
            let victim = Arc::clone(alive[idx]);
            if let Err(err) = victim.kill() {
                clue!(COLLECTOR, indicio::ERROR, { killer_strike_failed: victim.node_id(), what: err.to_string() });
            } else {
                KILLER_STRIKES.click();
            }
            if let Some(mean) = self.config.restart_after_mean {
                let delay = jittered(mean, self.config.restart_after_dev, &mut guac);
                let respawn_victim = Arc::clone(&victim);
                let respawn_shutdown = Arc::clone(&self.shutdown);
                KILLER_RESPAWNS_SCHEDULED.click();
                std::thread::spawn(move || {
                    interruptible_sleep(delay, &respawn_shutdown);
                    if !respawn_shutdown.load(Ordering::Relaxed) {
                        if let Err(err) = respawn_victim.spawn() {
                            clue!(COLLECTOR, indicio::ERROR, {
                                scheduled_respawn_failed: respawn_victim.node_id(),
                                what: err.to_string(),
                            });
                        }
                    }
                });
            }
            let interval = jittered(self.config.kill_interval_mean, self.config.kill_interval_dev, &mut guac);
            interruptible_sleep(interval, &self.shutdown);
        }
    }
}

/// Drives worker lifecycle from [paxos_rpc::SupervisorControlService] calls instead of a free-running
/// thread, matching the original deployment's Flask-based interactive killer: kill and respawn are
/// explicit operator actions, not a background process.
pub struct InteractiveKiller {
    workers: Vec<Arc<WorkerProcess>>,
}

impl InteractiveKiller {
    pub fn new(workers: Vec<Arc<WorkerProcess>>) -> Self {
        Self { workers }
    }

    fn find(&self, node_id: u32) -> Result<&Arc<WorkerProcess>, SupervisorError> {
        self.workers
            .iter()
            .find(|w| w.node_id() == node_id)
            .ok_or(SupervisorError::UnknownNode {
                core: zerror_core::ErrorCore::default(),
                node_id,
            })
    }
}

impl SupervisorControlService for InteractiveKiller {
    fn kill_worker(
        &self,
        _ctx: &Context,
        req: KillWorkerRequest,
    ) -> Result<KillWorkerResponse, SupervisorError> {
        let worker = self.find(req.node_id)?;
        worker.kill().map_err(|err| SupervisorError::Rpc {
            core: zerror_core::ErrorCore::default(),
            what: err.to_string(),
        })?;
        KILLER_STRIKES.click();
        Ok(KillWorkerResponse {})
    }

    fn respawn_worker(
        &self,
        _ctx: &Context,
        req: RespawnWorkerRequest,
    ) -> Result<RespawnWorkerResponse, SupervisorError> {
        let worker = self.find(req.node_id)?;
        worker.spawn().map_err(|err| SupervisorError::Rpc {
            core: zerror_core::ErrorCore::default(),
            what: err.to_string(),
        })?;
        Ok(RespawnWorkerResponse {})
    }

    fn list_workers(
        &self,
        _ctx: &Context,
        _req: ListWorkersRequest,
    ) -> Result<ListWorkersResponse, SupervisorError> {
        let workers = self
            .workers
            .iter()
            .map(|w| WorkerStatus {
                node_id: w.node_id(),
                alive: w.is_alive(),
            })
            .collect();
        Ok(ListWorkersResponse { workers })
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
