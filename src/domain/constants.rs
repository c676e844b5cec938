/// Command-line fragments of the three dolphin service entry points.
pub const DEFAULT_PROCESS_MARKERS: &[&str] = &[
    "dolphin/cmd/api.py",
    "dolphin/cmd/task.py",
    "dolphin/cmd/alert.py",
];

/// Configuration and state directories left behind by a dolphin install.
pub const DEFAULT_TEARDOWN_DIRS: &[&str] = &["/etc/dolphin", "/var/lib/dolphin"];

pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 3000;

pub const CONFIG_ENV_VAR: &str = "DOLPHINCTL_CONFIG";
