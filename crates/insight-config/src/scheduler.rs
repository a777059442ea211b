use serde::{Deserialize, Serialize};

fn default_deferred_scan_ms() -> u64 {
    1000
}

fn default_channel_capacity() -> usize {
    256
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Delay of the one-shot rescan after start
    #[serde(default = "default_deferred_scan_ms")]
    pub deferred_scan_ms: u64,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            deferred_scan_ms: default_deferred_scan_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
