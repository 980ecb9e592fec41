//! Keeps a front-end pointed at the current leader.
//!
//! The original deployment rendered an nginx config from a jinja2 template and signaled the
//! running nginx with SIGHUP. [FileGatewaySink] does the same thing with this codebase's own
//! templating crate (`shvar`, the same `${VAR}` substitution `rc_conf` uses to expand rc.d
//! variables) in place of jinja2, and the same rename-into-place durability [paxos_core]'s
//! `FileStorage` uses for its snapshots, so a reader never observes a half-written config.

use std::collections::HashMap;
use std::net::SocketAddr;

use biometrics::Counter;

use indicio::clue;

use crate::{Error, COLLECTOR};

static GATEWAY_RELOADS: Counter = Counter::new("paxos_supervisor.gateway.reloads");
static GATEWAY_RELOAD_FAILED: Counter = Counter::new("paxos_supervisor.gateway.reload_failed");

pub fn register_biometrics(collector: &biometrics::Collector) {
    collector.register_counter(&GATEWAY_RELOADS);
    collector.register_counter(&GATEWAY_RELOAD_FAILED);
}

/// A port the prober calls into whenever a new leader is elected. Implementations own whatever
/// it takes to make a front end forward traffic there: rewriting a config file, pushing to a
/// service discovery system, or (in tests) just recording the call.
pub trait GatewaySink {
    fn reload(&self, leader: SocketAddr) -> Result<(), Error>;
}

/// Renders `template` with `${LEADER_ADDR}` expanded to the current leader's address (plus
/// whatever other variables were fixed at construction, e.g. `${GATEWAY_PORT}`), writes the
/// result to `config_path` atomically, then signals `reload_pid` with SIGHUP if one is configured.
/// A `reload_pid` of `None` just rewrites the file, for setups where the front end watches its
/// config for changes instead of being signaled.
pub struct FileGatewaySink {
    template: String,
    config_path: String,
    reload_pid: Option<i32>,
    fixed_vars: HashMap<String, String>,
}

impl FileGatewaySink {
    pub fn new(
        template: impl Into<String>,
        config_path: impl Into<String>,
        reload_pid: Option<i32>,
        fixed_vars: HashMap<String, String>,
    ) -> Self {
        Self {
            template: template.into(),
            config_path: config_path.into(),
            reload_pid,
            fixed_vars,
        }
    }
}

impl GatewaySink for FileGatewaySink {
    fn reload(&self, leader: SocketAddr) -> Result<(), Error> {
        let result = (|| -> Result<(), Error> {
            let mut vars = self.fixed_vars.clone();
            vars.insert("LEADER_ADDR".to_string(), leader.to_string());
            let rendered = shvar::expand(&vars, &self.template)?;
            let tmp_path = format!("{}.tmp", self.config_path);
            std::fs::write(&tmp_path, rendered)?;
            std::fs::rename(&tmp_path, &self.config_path)?;
            if let Some(pid) = self.reload_pid {
                unsafe {
                    libc::kill(pid, libc::SIGHUP);
                }
            }
            Ok(())
        })();
        match &result {
            Ok(()) => {
                GATEWAY_RELOADS.click();
                clue!(COLLECTOR, indicio::INFO, { gateway_reloaded_for_leader: leader.to_string() });
            }
            Err(err) => {
                GATEWAY_RELOAD_FAILED.click();
                clue!(COLLECTOR, indicio::ERROR, { gateway_reload_failed: err.to_string() });
            }
        }
        result
    }
}

/////////////////////////////////////////////// tests //////////////////////////////////////////////
