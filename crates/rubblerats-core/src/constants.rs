//! Simulation constants and tuning defaults.
//!
//! Every value here is the default of an overridable field in
//! [`crate::config::ProbeParams`] or [`crate::config::SwarmConfig`],
//! or an upper bound enforced by their `validate()`.

/// Driver tick rate (Hz) used by the real-time loop.
pub const TICK_RATE: u32 = 30;

/// Highest accepted tick rate; one tick must last at least 1 ms.
pub const MAX_TICK_RATE: u32 = 1000;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

// --- Battery ---

/// Full charge.
pub const BATTERY_MAX: f64 = 100.0;

/// Lower bound of the randomized starting charge.
pub const BATTERY_INITIAL_MIN: f64 = 85.0;

/// Charge lost every tick.
pub const BATTERY_DRAIN_PER_TICK: f64 = 0.005;

/// Charge below which a probe starts retracing to base (strict).
pub const LOW_BATTERY_THRESHOLD: f64 = 15.0;

// --- Sensor drift ---

/// Half-width of the uniform CO2 noise applied each tick (ppm).
pub const CO2_DRIFT_AMPLITUDE: f64 = 5.0;

/// Half-width of the uniform microphone noise applied each tick.
pub const MIC_DRIFT_AMPLITUDE: f64 = 2.5;

/// Per-channel, per-tick probability of a transient spike.
pub const SENSOR_SPIKE_PROBABILITY: f64 = 0.001;

/// CO2 spike magnitude (ppm).
pub const CO2_SPIKE: f64 = 400.0;

/// Microphone spike magnitude.
pub const MIC_SPIKE: f64 = 200.0;

// --- Coordinated alert (all strict inequalities) ---

pub const ALERT_CO2_PPM: f64 = 750.0;
pub const ALERT_MIC_LEVEL: f64 = 100.0;
pub const ALERT_THERMAL_C: f64 = 40.0;

// --- Sensor initialization ranges [lo, hi) ---

pub const ULTRASONIC_RANGE: (f64, f64) = (150.0, 200.0);
pub const CO2_RANGE: (f64, f64) = (400.0, 450.0);
pub const MIC_RANGE: (f64, f64) = (30.0, 45.0);
pub const TEMPERATURE_RANGE: (f64, f64) = (22.0, 27.0);
pub const THERMAL_RANGE: (f64, f64) = (30.0, 35.0);
pub const LORA_SIGNAL_RANGE: (f64, f64) = (-70.0, -50.0);

// --- Movement ---

/// Per-probe speed is drawn once from this range (world units per tick).
pub const SPEED_RANGE: (f64, f64) = (0.5, 1.0);

/// A target closer than this is considered reached (strict).
pub const REACH_DISTANCE: f64 = 2.0;

// --- Breadcrumb trail ---

/// Minimum wall-clock gap between two path samples (ms).
pub const PATH_SAMPLE_INTERVAL_MS: u64 = 2000;

/// Maximum number of breadcrumbs kept per probe.
pub const PATH_CAPACITY: usize = 100;

/// Highest accepted `path_capacity`.
pub const MAX_PATH_CAPACITY: usize = 100_000;

// --- Avoidance ---

/// Trigger band added to an obstacle's radius.
pub const OBSTACLE_CLEARANCE: f64 = 15.0;

/// Displacement applied per triggering obstacle.
pub const OBSTACLE_PUSH: f64 = 1.5;

/// Peer separation below which two probes repel.
pub const PEER_AVOID_RADIUS: f64 = 30.0;

/// Displacement applied per triggering peer.
pub const PEER_PUSH: f64 = 1.0;

// --- Gyroscope ---

/// Pitch/roll wobble amplitude (degrees).
pub const GYRO_AMPLITUDE_DEG: f64 = 5.0;

/// Pitch phase divisor (ms per radian).
pub const GYRO_PITCH_PERIOD_MS: f64 = 500.0;

/// Roll phase divisor (ms per radian).
pub const GYRO_ROLL_PERIOD_MS: f64 = 700.0;

// --- Mesh ---

/// Radio range within which two probes count as mesh neighbors.
pub const MESH_RANGE: f64 = 150.0;

// --- Formations ---

/// Default gap between formation slots.
pub const FORMATION_SPACING: f64 = 40.0;

// --- Scenario ---

pub const DEFAULT_PROBE_COUNT: usize = 6;
pub const DEFAULT_OBSTACLE_COUNT: usize = 12;
pub const MAX_PROBE_COUNT: usize = 1_000;
pub const MAX_OBSTACLE_COUNT: usize = 10_000;
pub const DEFAULT_FIELD_WIDTH: f64 = 800.0;
pub const DEFAULT_FIELD_HEIGHT: f64 = 600.0;

/// Radius of the ring probes are spawned on around the base.
pub const SPAWN_RING_RADIUS: f64 = 40.0;

/// Obstacle radius range for generated rubble.
pub const RUBBLE_RADIUS_RANGE: (f64, f64) = (10.0, 30.0);

/// Obstacle radius range for generated wall segments.
pub const WALL_RADIUS_RANGE: (f64, f64) = (25.0, 45.0);

/// Keep generated obstacles at least this far from the base.
pub const BASE_KEEP_CLEAR: f64 = 80.0;
