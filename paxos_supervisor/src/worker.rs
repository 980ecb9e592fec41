//! A single worker's process lifecycle: spawn it, ask whether it's still alive, kill it with an
//! escalating SIGTERM-then-SIGKILL, and tell the two apart from "never started".
//!
//! Mirrors the teacher's own process-supervision idiom (`rc_conf`'s rc.d invocation via
//! `std::process::Command`), adapted for a long-lived child instead of a one-shot script.

use std::process::{Child, Command};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use biometrics::Counter;

use indicio::clue;

use crate::{Error, COLLECTOR};

static WORKERS_SPAWNED: Counter = Counter::new("paxos_supervisor.workers.spawned");
static WORKERS_KILLED: Counter = Counter::new("paxos_supervisor.workers.killed");
static WORKERS_SPAWN_FAILED: Counter = Counter::new("paxos_supervisor.workers.spawn_failed");

pub fn register_biometrics(collector: &biometrics::Collector) {
    collector.register_counter(&WORKERS_SPAWNED);
    collector.register_counter(&WORKERS_KILLED);
    collector.register_counter(&WORKERS_SPAWN_FAILED);
}

/// How long [WorkerProcess::kill] waits for a SIGTERM'd child to exit on its own before escalating
/// to SIGKILL.
const TERM_GRACE_PERIOD: Duration = Duration::from_secs(5);
const TERM_POLL: Duration = Duration::from_millis(50);

/// One worker's `paxos-worker` child process, addressed by the node index it was launched with.
/// `binary` and `args` are fixed at construction time; every [Self::spawn] or [Self::respawn]
/// launches the exact same command line, so a respawned worker rejoins the cluster at the node
/// index and ledger file it started with.
pub struct WorkerProcess {
    node_id: u32,
    binary: String,
    args: Vec<String>,
    child: Mutex<Option<Child>>,
}

impl WorkerProcess {
    pub fn new(node_id: u32, binary: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            node_id,
            binary: binary.into(),
            args,
            child: Mutex::new(None),
        }
    }

    pub fn node_id(&self) -> u32 {
        self.node_id
    }

    /// Launches the worker if it is not already running. A no-op if [Self::is_alive].
    pub fn spawn(&self) -> Result<(), Error> {
        let mut guard = self.child.lock().unwrap();
        if let Some(child) = guard.as_mut() {
            if matches!(child.try_wait(), Ok(None)) {
                return Ok(());
            }
        }
        match Command::new(&self.binary).args(&self.args).spawn() {
            Ok(child) => {
                WORKERS_SPAWNED.click();
                clue!(COLLECTOR, indicio::INFO, {
                    spawned_worker: self.node_id,
                    pid: child.id(),
                });
                *guard = Some(child);
                Ok(())
            }
            Err(err) => {
                WORKERS_SPAWN_FAILED.click();
                clue!(COLLECTOR, indicio::ERROR, {
                    spawn_failed_for_worker: self.node_id,
                    what: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// True if the most recently spawned child is still running. False for a worker that was
    /// never spawned, or that has exited (killed, crashed, or otherwise).
    pub fn is_alive(&self) -> bool {
        let mut guard = self.child.lock().unwrap();
        match guard.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Sends SIGTERM, waits up to [TERM_GRACE_PERIOD] for the child to exit, then escalates to
    /// SIGKILL. A no-op if the worker was never spawned or has already exited.
    pub fn kill(&self) -> Result<(), Error> {
        let mut guard = self.child.lock().unwrap();
        let Some(mut child) = guard.take() else {
            return Ok(());
        };
        let pid = child.id() as libc::pid_t;
        unsafe {
            libc::kill(pid, libc::SIGTERM);
        }
        let deadline = Instant::now() + TERM_GRACE_PERIOD;
        loop {
            match child.try_wait() {
                Ok(Some(_status)) => break,
                Ok(None) if Instant::now() >= deadline => {
                    unsafe {
                        libc::kill(pid, libc::SIGKILL);
                    }
                    let _ = child.wait();
                    break;
                }
                Ok(None) => std::thread::sleep(TERM_POLL),
                Err(err) => return Err(err.into()),
            }
        }
        WORKERS_KILLED.click();
        clue!(COLLECTOR, indicio::INFO, { killed_worker: self.node_id, pid: pid as u32 });
        Ok(())
    }

    /// Kills the worker if it's alive, then spawns it again.
    pub fn respawn(&self) -> Result<(), Error> {
        self.kill()?;
        self.spawn()
    }
}

impl Drop for WorkerProcess {
    fn drop(&mut self) {
        let _ = self.kill();
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
