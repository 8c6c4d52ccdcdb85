use std::net::SocketAddr;
use std::time::Duration;

/// Default control port, shared by the TCP listener and the UDP responder
const DEFAULT_PORT: u16 = 7777;

/// Configuration for the coordinator role
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Address the TCP listener binds (default: 0.0.0.0:7777)
    pub bind_addr: SocketAddr,

    /// Address the UDP clock-sync responder binds (default: 0.0.0.0:7777)
    pub sync_bind_addr: SocketAddr,

    /// Gap between assignment completion and the play instant
    /// (default: 10 seconds)
    ///
    /// Must be large enough to absorb every client's sync round trips, or
    /// participants will compute a play instant that is already in the past.
    pub sync_margin: Duration,

    /// Shuffle the track order once before assignment (default: off)
    pub randomize: bool,

    /// Fixed seed for the shuffle; `None` draws from the thread RNG
    pub shuffle_seed: Option<u64>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            sync_bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            sync_margin: Duration::from_secs(10),
            randomize: false,
            shuffle_seed: None,
        }
    }
}

impl CoordinatorConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> CoordinatorConfigBuilder {
        CoordinatorConfigBuilder::default()
    }
}

/// Builder for [`CoordinatorConfig`]
#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfigBuilder {
    config: CoordinatorConfig,
}

impl CoordinatorConfigBuilder {
    /// Set the TCP bind address
    #[must_use]
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Set the UDP clock-sync bind address
    #[must_use]
    pub fn sync_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.sync_bind_addr = addr;
        self
    }

    /// Set the sync margin
    #[must_use]
    pub fn sync_margin(mut self, margin: Duration) -> Self {
        self.config.sync_margin = margin;
        self
    }

    /// Enable or disable the one-time track shuffle
    #[must_use]
    pub fn randomize(mut self, randomize: bool) -> Self {
        self.config.randomize = randomize;
        self
    }

    /// Pin the shuffle to a fixed seed
    #[must_use]
    pub fn shuffle_seed(mut self, seed: u64) -> Self {
        self.config.shuffle_seed = Some(seed);
        self
    }

    /// Build the config
    #[must_use]
    pub fn build(self) -> CoordinatorConfig {
        self.config
    }
}

/// Configuration for the participant role
#[derive(Debug, Clone)]
pub struct ParticipantConfig {
    /// Coordinator's TCP address (default: 127.0.0.1:7777)
    pub coordinator_addr: SocketAddr,

    /// Coordinator's UDP clock-sync address (default: 127.0.0.1:7777)
    pub sync_addr: SocketAddr,

    /// Number of tracks to request (default: 1)
    pub track_count: u32,

    /// Probes per sync round (default: 10)
    pub probe_attempts: u32,

    /// Receive timeout for a single probe (default: 1 second)
    pub probe_timeout: Duration,

    /// Full sync rounds to run, keeping the one with the lowest ping
    /// (default: 10)
    pub sync_rounds: u32,
}

impl Default for ParticipantConfig {
    fn default() -> Self {
        Self {
            coordinator_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            sync_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            track_count: 1,
            probe_attempts: 10,
            probe_timeout: Duration::from_secs(1),
            sync_rounds: 10,
        }
    }
}

impl ParticipantConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> ParticipantConfigBuilder {
        ParticipantConfigBuilder::default()
    }
}

/// Builder for [`ParticipantConfig`]
#[derive(Debug, Clone, Default)]
pub struct ParticipantConfigBuilder {
    config: ParticipantConfig,
}

impl ParticipantConfigBuilder {
    /// Set the coordinator's TCP address
    #[must_use]
    pub fn coordinator_addr(mut self, addr: SocketAddr) -> Self {
        self.config.coordinator_addr = addr;
        self
    }

    /// Set the coordinator's UDP clock-sync address
    #[must_use]
    pub fn sync_addr(mut self, addr: SocketAddr) -> Self {
        self.config.sync_addr = addr;
        self
    }

    /// Set the number of tracks to request
    #[must_use]
    pub fn track_count(mut self, count: u32) -> Self {
        self.config.track_count = count;
        self
    }

    /// Set the probes per sync round
    #[must_use]
    pub fn probe_attempts(mut self, attempts: u32) -> Self {
        self.config.probe_attempts = attempts;
        self
    }

    /// Set the per-probe receive timeout
    #[must_use]
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.probe_timeout = timeout;
        self
    }

    /// Set the number of sync rounds
    #[must_use]
    pub fn sync_rounds(mut self, rounds: u32) -> Self {
        self.config.sync_rounds = rounds;
        self
    }

    /// Build the config
    #[must_use]
    pub fn build(self) -> ParticipantConfig {
        self.config
    }
}
