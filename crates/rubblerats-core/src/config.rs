//! Tunable parameters.
//!
//! Defaults come from [`crate::constants`]. Every struct is `serde(default)`
//! so a JSON config only needs to name the fields it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ConfigError, SwarmError};

/// Per-probe behaviour constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeParams {
    pub battery_initial_min: f64,
    pub battery_drain_per_tick: f64,
    pub low_battery_threshold: f64,

    pub co2_drift_amplitude: f64,
    pub mic_drift_amplitude: f64,
    pub spike_probability: f64,
    pub co2_spike: f64,
    pub mic_spike: f64,

    pub alert_co2_ppm: f64,
    pub alert_mic_level: f64,
    pub alert_thermal_c: f64,

    pub ultrasonic_range: (f64, f64),
    pub co2_range: (f64, f64),
    pub mic_range: (f64, f64),
    pub temperature_range: (f64, f64),
    pub thermal_range: (f64, f64),
    pub lora_signal_range: (f64, f64),

    pub speed_range: (f64, f64),
    pub reach_distance: f64,

    pub path_sample_interval_ms: u64,
    pub path_capacity: usize,

    pub obstacle_clearance: f64,
    pub obstacle_push: f64,
    pub peer_avoid_radius: f64,
    pub peer_push: f64,

    pub gyro_amplitude_deg: f64,
    pub gyro_pitch_period_ms: f64,
    pub gyro_roll_period_ms: f64,
}

impl Default for ProbeParams {
    fn default() -> Self {
        Self {
            battery_initial_min: BATTERY_INITIAL_MIN,
            battery_drain_per_tick: BATTERY_DRAIN_PER_TICK,
            low_battery_threshold: LOW_BATTERY_THRESHOLD,
            co2_drift_amplitude: CO2_DRIFT_AMPLITUDE,
            mic_drift_amplitude: MIC_DRIFT_AMPLITUDE,
            spike_probability: SENSOR_SPIKE_PROBABILITY,
            co2_spike: CO2_SPIKE,
            mic_spike: MIC_SPIKE,
            alert_co2_ppm: ALERT_CO2_PPM,
            alert_mic_level: ALERT_MIC_LEVEL,
            alert_thermal_c: ALERT_THERMAL_C,
            ultrasonic_range: ULTRASONIC_RANGE,
            co2_range: CO2_RANGE,
            mic_range: MIC_RANGE,
            temperature_range: TEMPERATURE_RANGE,
            thermal_range: THERMAL_RANGE,
            lora_signal_range: LORA_SIGNAL_RANGE,
            speed_range: SPEED_RANGE,
            reach_distance: REACH_DISTANCE,
            path_sample_interval_ms: PATH_SAMPLE_INTERVAL_MS,
            path_capacity: PATH_CAPACITY,
            obstacle_clearance: OBSTACLE_CLEARANCE,
            obstacle_push: OBSTACLE_PUSH,
            peer_avoid_radius: PEER_AVOID_RADIUS,
            peer_push: PEER_PUSH,
            gyro_amplitude_deg: GYRO_AMPLITUDE_DEG,
            gyro_pitch_period_ms: GYRO_PITCH_PERIOD_MS,
            gyro_roll_period_ms: GYRO_ROLL_PERIOD_MS,
        }
    }
}

impl ProbeParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        within("battery_initial_min", self.battery_initial_min, 0.0, BATTERY_MAX)?;
        non_negative("battery_drain_per_tick", self.battery_drain_per_tick)?;
        within("low_battery_threshold", self.low_battery_threshold, 0.0, BATTERY_MAX)?;

        non_negative("co2_drift_amplitude", self.co2_drift_amplitude)?;
        non_negative("mic_drift_amplitude", self.mic_drift_amplitude)?;
        within("spike_probability", self.spike_probability, 0.0, 1.0)?;
        finite("co2_spike", self.co2_spike)?;
        finite("mic_spike", self.mic_spike)?;

        finite("alert_co2_ppm", self.alert_co2_ppm)?;
        finite("alert_mic_level", self.alert_mic_level)?;
        finite("alert_thermal_c", self.alert_thermal_c)?;

        range("ultrasonic_range", self.ultrasonic_range)?;
        range("co2_range", self.co2_range)?;
        range("mic_range", self.mic_range)?;
        range("temperature_range", self.temperature_range)?;
        range("thermal_range", self.thermal_range)?;
        range("lora_signal_range", self.lora_signal_range)?;

        range("speed_range", self.speed_range)?;
        if self.speed_range.0 <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "speed_range",
            });
        }
        positive("reach_distance", self.reach_distance)?;

        if self.path_capacity == 0 {
            return Err(ConfigError::NotPositive {
                field: "path_capacity",
            });
        }
        at_most("path_capacity", self.path_capacity, MAX_PATH_CAPACITY)?;

        non_negative("obstacle_clearance", self.obstacle_clearance)?;
        non_negative("obstacle_push", self.obstacle_push)?;
        non_negative("peer_avoid_radius", self.peer_avoid_radius)?;
        non_negative("peer_push", self.peer_push)?;

        non_negative("gyro_amplitude_deg", self.gyro_amplitude_deg)?;
        positive("gyro_pitch_period_ms", self.gyro_pitch_period_ms)?;
        positive("gyro_roll_period_ms", self.gyro_roll_period_ms)?;
        Ok(())
    }
}

/// Initial field layout generated by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub probe_count: usize,
    pub obstacle_count: usize,
    pub field_width: f64,
    pub field_height: f64,
    /// Base location; `None` puts it at the field center.
    pub base: Option<(f64, f64)>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            probe_count: DEFAULT_PROBE_COUNT,
            obstacle_count: DEFAULT_OBSTACLE_COUNT,
            field_width: DEFAULT_FIELD_WIDTH,
            field_height: DEFAULT_FIELD_HEIGHT,
            base: None,
        }
    }
}

impl ScenarioConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        at_most("probe_count", self.probe_count, MAX_PROBE_COUNT)?;
        at_most("obstacle_count", self.obstacle_count, MAX_OBSTACLE_COUNT)?;
        if let Some((x, y)) = self.base {
            finite("base.x", x)?;
            finite("base.y", y)?;
        }
        Ok(())
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// RNG seed. Same seed and same clock readings give the same run.
    pub seed: u64,
    /// Driver tick rate (Hz) for the real-time loop.
    pub tick_rate: u32,
    /// Radio range used for mesh neighbor discovery.
    pub mesh_range: f64,
    pub probe: ProbeParams,
    pub scenario: ScenarioConfig,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            tick_rate: TICK_RATE,
            mesh_range: MESH_RANGE,
            probe: ProbeParams::default(),
            scenario: ScenarioConfig::default(),
        }
    }
}

impl SwarmConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::NotPositive { field: "tick_rate" });
        }
        at_most("tick_rate", self.tick_rate as usize, MAX_TICK_RATE as usize)?;
        non_negative("mesh_range", self.mesh_range)?;
        self.probe.validate()?;
        self.scenario.validate()
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, SwarmError> {
        let config: SwarmConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SwarmError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SwarmError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NotPositive { field });
    }
    Ok(())
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

fn at_most(field: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            min: 0.0,
            max: max as f64,
        });
    }
    Ok(())
}

fn range(field: &'static str, (lo, hi): (f64, f64)) -> Result<(), ConfigError> {
    finite(field, lo)?;
    finite(field, hi)?;
    if lo > hi {
        return Err(ConfigError::InvertedRange { field, lo, hi });
    }
    Ok(())
}
