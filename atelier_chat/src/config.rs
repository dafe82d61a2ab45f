use std::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};

pub mod env {
    pub const COMPOSE_DELAY_MS: &str = "ATELIER_COMPOSE_DELAY_MS";
    pub const SCAN_DELAY_MS: &str = "ATELIER_SCAN_DELAY_MS";
    pub const LOG: &str = "ATELIER_LOG";
}

pub const DEFAULT_COMPOSE_DELAY_MS: u64 = 1_500;
pub const DEFAULT_SCAN_DELAY_MS: u64 = 3_000;

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Pause before the stylist replies
    #[arg(short = 'd', long, env = env::COMPOSE_DELAY_MS, default_value_t = DEFAULT_COMPOSE_DELAY_MS)]
    pub compose_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            compose_delay_ms: DEFAULT_COMPOSE_DELAY_MS,
        }
    }
}

impl ChatConfig {
    pub fn with_compose_delay(delay: Duration) -> Self {
        Self {
            compose_delay_ms: delay.as_millis() as u64,
        }
    }

    pub fn compose_delay(&self) -> Duration {
        Duration::from_millis(self.compose_delay_ms)
    }
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Duration of the simulated body scan
    #[arg(long, env = env::SCAN_DELAY_MS, default_value_t = DEFAULT_SCAN_DELAY_MS)]
    pub scan_delay_ms: u64,
}

impl ScanConfig {
    pub fn scan_delay(&self) -> Duration {
        Duration::from_millis(self.scan_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use test_log::test;

    use super::*;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        chat: ChatConfig,
    }

    #[test]
    fn can_default_compose_delay() {
        assert_eq!(Duration::from_millis(1_500), ChatConfig::default().compose_delay());
    }

    #[test]
    fn can_override_compose_delay_from_args() {
        let cli = TestCli::try_parse_from(["atelier", "--compose-delay-ms", "20"]).unwrap();
        assert_eq!(Duration::from_millis(20), cli.chat.compose_delay());

        let cli = TestCli::try_parse_from(["atelier", "-d", "0"]).unwrap();
        assert_eq!(Duration::ZERO, cli.chat.compose_delay());
    }

    #[test]
    fn can_reject_invalid_delay() {
        assert!(TestCli::try_parse_from(["atelier", "--compose-delay-ms", "soon"]).is_err());
    }
}
