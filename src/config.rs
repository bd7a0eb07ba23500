//! Configuration for atomicf
//!
//! Centralized configuration with sensible defaults.

/// Options controlling an `AtomicFile`
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Recovery Configuration
    // -------------------------------------------------------------------------
    /// What to do with a full-length log record whose digest does not match
    pub corrupt_log_policy: CorruptLogPolicy,

    /// Run `recover()` as part of `open`
    pub recover_on_open: bool,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// fsync the containing directory after log creation and removal.
    /// Only disable on filesystems where directories cannot be opened.
    pub sync_directory: bool,
}

/// Policy for log records that have the right length but a bad digest
///
/// A record shorter than the fixed header is always treated as torn and
/// deleted, whichever policy is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptLogPolicy {
    /// Delete the record without replaying it
    #[default]
    Discard,

    /// Leave the record in place and return `AtomicError::CorruptLog`
    Fail,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corrupt_log_policy: CorruptLogPolicy::Discard,
            recover_on_open: false,
            sync_directory: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the policy for digest mismatches found during recovery
    pub fn corrupt_log_policy(mut self, policy: CorruptLogPolicy) -> Self {
        self.config.corrupt_log_policy = policy;
        self
    }

    /// Recover any leftover log record when the file is opened
    pub fn recover_on_open(mut self, enabled: bool) -> Self {
        self.config.recover_on_open = enabled;
        self
    }

    /// Enable or disable directory metadata syncs
    pub fn sync_directory(mut self, enabled: bool) -> Self {
        self.config.sync_directory = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
