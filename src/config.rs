//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;

use crate::state::PhaseDurations;

/// Directory name used under the platform data directory
const DATA_DIR_NAME: &str = "pomodoro-desk";

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "pomodoro-desk")]
#[command(about = "A headless pomodoro timer, task list and shopping list")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20555")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Work phase length in minutes (0 uses the default)
    #[arg(short, long, default_value = "25")]
    pub work_minutes: u32,

    /// Short break length in minutes (0 uses the default)
    #[arg(short, long, default_value = "5")]
    pub break_minutes: u32,

    /// Directory holding the task and shopping lists
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Phase durations the timer starts with
    pub fn initial_durations(&self) -> PhaseDurations {
        PhaseDurations::new(self.work_minutes, self.break_minutes)
    }

    /// Where the list tools persist their data
    pub fn storage_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_local_dir()
                .map(|dir| dir.join(DATA_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(format!(".{}", DATA_DIR_NAME))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PhaseKind;

    #[test]
    fn defaults() {
        let config = Config::parse_from(["pomodoro-desk"]);
        assert_eq!(config.address(), "127.0.0.1:20555");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.initial_durations(), PhaseDurations::default());
    }

    #[test]
    fn custom_durations_and_zero_fallback() {
        let config = Config::parse_from(["pomodoro-desk", "-w", "50", "-b", "0", "-v"]);
        let durations = config.initial_durations();
        assert_eq!(durations.get(PhaseKind::Work), 50);
        assert_eq!(durations.get(PhaseKind::ShortBreak), 5);
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn explicit_data_dir_wins() {
        let config = Config::parse_from(["pomodoro-desk", "--data-dir", "/tmp/lists"]);
        assert_eq!(config.storage_dir(), PathBuf::from("/tmp/lists"));
    }
}
