//! Executor configuration
//!
//! All values are pass-through from the configuration layer and immutable
//! for the duration of a run; the executor receives them at construction
//! and never reads ambient process state.

use std::path::PathBuf;
use std::time::Duration;

/// Immutable per-run configuration.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Budget for a single step's browser work
    pub step_timeout: Duration,

    /// Budget for the whole plan
    pub plan_timeout: Duration,

    /// Run the browser headless (pass-through to the driver layer)
    pub headless: bool,

    /// Settle delay between consecutive steps
    pub inter_action_delay: Duration,

    /// Delay between discrete keystrokes in type_text
    pub keystroke_delay: Duration,

    /// Directory screenshots are written to
    pub screenshot_dir: PathBuf,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_secs(30),
            plan_timeout: Duration::from_secs(300),
            headless: true,
            inter_action_delay: Duration::from_millis(500),
            keystroke_delay: Duration::from_millis(50),
            screenshot_dir: PathBuf::from("output/execution_screenshots"),
        }
    }
}

impl ExecutorConfig {
    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn with_plan_timeout(mut self, timeout: Duration) -> Self {
        self.plan_timeout = timeout;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_inter_action_delay(mut self, delay: Duration) -> Self {
        self.inter_action_delay = delay;
        self
    }

    pub fn with_keystroke_delay(mut self, delay: Duration) -> Self {
        self.keystroke_delay = delay;
        self
    }

    pub fn with_screenshot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshot_dir = dir.into();
        self
    }

    /// Configuration for fast deterministic runs (tests, rehearsal).
    pub fn immediate(screenshot_dir: impl Into<PathBuf>) -> Self {
        Self::default()
            .with_inter_action_delay(Duration::ZERO)
            .with_keystroke_delay(Duration::ZERO)
            .with_screenshot_dir(screenshot_dir)
    }
}
