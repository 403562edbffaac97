use std::time::Duration;

pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;

/// Knobs for a run. The binary builds one of these from its command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// how many instructions to execute per second of wall clock
    pub ips: u32,
    /// seed for CXNN; None means seed from the OS
    pub seed: Option<u64>,
    /// don't open the audio device
    pub mute: bool,
    /// stop after this many instructions
    pub max_steps: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ips: DEFAULT_INSTRUCTIONS_PER_SECOND,
            seed: None,
            mute: false,
            max_steps: None,
        }
    }
}

impl Config {
    /// wall clock time per instruction; an ips of 0 is treated as 1
    pub fn step_interval(&self) -> Duration {
        Duration::from_secs(1) / self.ips.max(1)
    }
}
