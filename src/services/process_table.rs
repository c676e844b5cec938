use crate::cli::SignalKind;
use std::collections::HashSet;
use sysinfo::{Pid, ProcessesToUpdate, Signal, System};

/// One row of the process table as seen at scan time.
#[derive(Debug, Clone)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: String,
    pub command: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalOutcome {
    Delivered,
    Gone,
    Failed,
    Unsupported,
}

impl SignalOutcome {
    pub fn as_status(&self) -> &'static str {
        match self {
            SignalOutcome::Delivered => "signalled",
            SignalOutcome::Gone => "gone",
            SignalOutcome::Failed => "failed",
            SignalOutcome::Unsupported => "unsupported",
        }
    }
}

pub trait ProcessTable {
    fn snapshot(&mut self) -> Vec<ProcessEntry>;
    fn signal(&mut self, pid: u32, signal: SignalKind) -> SignalOutcome;
    /// PIDs that must never be signalled: this process and every ancestor
    /// that launched it, as seen by the last snapshot.
    fn excluded_pids(&self) -> HashSet<u32>;
}

/// Live process table backed by `sysinfo`.
pub struct SystemProcessTable {
    system: System,
}

impl SystemProcessTable {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

fn to_sysinfo_signal(signal: SignalKind) -> Signal {
    match signal {
        SignalKind::Kill => Signal::Kill,
        SignalKind::Term => Signal::Term,
    }
}

impl ProcessTable for SystemProcessTable {
    fn snapshot(&mut self) -> Vec<ProcessEntry> {
        self.system.refresh_all();
        self.system
            .processes()
            .iter()
            .map(|(pid, process)| {
                let mut command = process
                    .cmd()
                    .iter()
                    .map(|a| a.to_string_lossy().to_string())
                    .collect::<Vec<_>>()
                    .join(" ");
                // kernel threads and zombies report no argv
                if command.is_empty() {
                    command = process
                        .exe()
                        .map(|p| p.to_string_lossy().to_string())
                        .unwrap_or_default();
                }
                ProcessEntry {
                    pid: pid.as_u32(),
                    name: process.name().to_string_lossy().to_string(),
                    command,
                }
            })
            .collect()
    }

    fn signal(&mut self, pid: u32, signal: SignalKind) -> SignalOutcome {
        let Some(process) = self.system.process(Pid::from_u32(pid)) else {
            return SignalOutcome::Gone;
        };
        match process.kill_with(to_sysinfo_signal(signal)) {
            Some(true) => SignalOutcome::Delivered,
            Some(false) => {
                // the process may have exited after the snapshot
                let target = Pid::from_u32(pid);
                self.system
                    .refresh_processes(ProcessesToUpdate::Some(&[target]), true);
                if self.system.process(target).is_none() {
                    SignalOutcome::Gone
                } else {
                    SignalOutcome::Failed
                }
            }
            None => SignalOutcome::Unsupported,
        }
    }

    fn excluded_pids(&self) -> HashSet<u32> {
        let mut out = HashSet::new();
        let mut next = sysinfo::get_current_pid().ok();
        while let Some(pid) = next {
            if !out.insert(pid.as_u32()) {
                break;
            }
            next = self.system.process(pid).and_then(|p| p.parent());
        }
        out
    }
}
