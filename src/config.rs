//! Construction-time constants for one simulated intersection.
//!
//! The distilled specification names these as "compile-time or
//! construction-time constants surfaced as named configuration, not CLI
//! flags". `SimConfig` is that surface: a plain value type with a builder,
//! following the same `with_*`/`build` shape used elsewhere in this crate
//! for [`crate::lane::Lane`] and [`crate::phase::PhaseTimer`].

/// Parameters shared by both controller strategies for a single run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Lane length in cells (`S` in the design notes).
    pub lane_size: i32,
    /// Distance in cells between the upstream sensor and the stop line (`D`).
    pub sensor_distance: i32,
    /// Default green duration in ticks.
    pub green_secs: i32,
    /// Default amber duration in ticks.
    pub amber_secs: i32,
    /// Default red duration in ticks.
    pub red_secs: i32,
    /// Per-tick probability of a new vehicle arriving on the north-to-south lane.
    pub ns_spawn_probability: f64,
    /// Per-tick probability of a new vehicle arriving on the west-to-east lane.
    pub we_spawn_probability: f64,
    /// Number of vehicles that must exit a lane before the run stops.
    pub car_out_cap: u64,
    /// Hard cap on the number of ticks a single run may take.
    pub step_cap: u32,
    /// Maximum ticks the adaptive strategy may add to a phase in one extension.
    pub extension_cap: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            lane_size: 15,
            sensor_distance: 7,
            green_secs: 11,
            amber_secs: 4,
            red_secs: 15,
            ns_spawn_probability: 0.5,
            we_spawn_probability: 0.2,
            car_out_cap: 50,
            step_cap: 400,
            extension_cap: 20,
        }
    }
}

impl SimConfig {
    /// Starts a [`SimConfigBuilder`] seeded with the documented defaults.
    pub fn builder() -> SimConfigBuilder {
        SimConfigBuilder { config: SimConfig::default() }
    }
}

/// Builder for [`SimConfig`]; overrides only the fields a caller wants to
/// deviate from the defaults.
pub struct SimConfigBuilder {
    config: SimConfig,
}

impl SimConfigBuilder {
    pub fn with_lane_size(mut self, value: i32) -> Self {
        self.config.lane_size = value;
        self
    }

    pub fn with_sensor_distance(mut self, value: i32) -> Self {
        self.config.sensor_distance = value;
        self
    }

    pub fn with_phase_durations(mut self, green: i32, amber: i32, red: i32) -> Self {
        self.config.green_secs = green;
        self.config.amber_secs = amber;
        self.config.red_secs = red;
        self
    }

    pub fn with_spawn_probabilities(mut self, north_south: f64, west_east: f64) -> Self {
        self.config.ns_spawn_probability = north_south;
        self.config.we_spawn_probability = west_east;
        self
    }

    pub fn with_car_out_cap(mut self, value: u64) -> Self {
        self.config.car_out_cap = value;
        self
    }

    pub fn with_step_cap(mut self, value: u32) -> Self {
        self.config.step_cap = value;
        self
    }

    pub fn with_extension_cap(mut self, value: i32) -> Self {
        self.config.extension_cap = value;
        self
    }

    pub fn build(self) -> SimConfig {
        self.config
    }
}
