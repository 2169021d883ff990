//! The probe entity: one swarm member's full mutable state and its
//! per-tick update.

use std::f64::consts::TAU;

use rubblerats_core::components::{Gyroscope, Obstacle, Sensors};
use rubblerats_core::config::ProbeParams;
use rubblerats_core::constants::BATTERY_MAX;
use rubblerats_core::enums::ProbeStatus;
use rubblerats_core::error::{EntityError, SwarmError};
use rubblerats_core::types::Point;

use crate::avoidance;
use crate::fsm::{transition, Trigger};
use crate::random::RandomSource;
use crate::sensors;
use crate::trail::Breadcrumbs;

/// Construction input for a probe. Unset overrides are randomized.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSpawn {
    pub id: String,
    pub position: Point,
    pub speed: Option<f64>,
    pub battery: Option<f64>,
}

/// Another roster member as seen during avoidance.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerFix {
    pub id: String,
    pub position: Point,
}

/// Everything a probe reads from the outside world during one tick.
pub struct TickContext<'a> {
    pub obstacles: &'a [Obstacle],
    /// Full roster, self included (skipped by id).
    pub peers: &'a [PeerFix],
    pub base: Point,
    /// Monotonic clock reading for this tick (ms).
    pub now_ms: u64,
    pub params: &'a ProbeParams,
}

/// Transitions that happened during one update, for driver-side events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub detected: bool,
    pub retrace_started: bool,
    pub retrace_complete: bool,
    pub target_reached: bool,
    pub breadcrumb_recorded: bool,
}

/// One swarm member.
#[derive(Debug, Clone, PartialEq)]
pub struct Probe {
    pub(crate) id: String,
    pub(crate) position: Point,
    pub(crate) target: Option<Point>,
    pub(crate) battery: f64,
    pub(crate) status: ProbeStatus,
    pub(crate) sensors: Sensors,
    pub(crate) gyro: Gyroscope,
    pub(crate) path: Breadcrumbs,
    /// Radians.
    pub(crate) heading: f64,
    pub(crate) speed: f64,
    pub(crate) last_sample_ms: Option<u64>,
    pub(crate) low_battery_latched: bool,
    pub(crate) paused_from: Option<ProbeStatus>,
    pub(crate) mesh_neighbors: Vec<String>,
}

impl Probe {
    /// Build a probe with randomized battery, speed, sensors and heading.
    pub fn new<R: RandomSource + ?Sized>(
        spawn: ProbeSpawn,
        params: &ProbeParams,
        rng: &mut R,
    ) -> Result<Self, EntityError> {
        if spawn.id.is_empty() {
            return Err(EntityError::EmptyId);
        }
        if !spawn.position.is_finite() {
            return Err(EntityError::NonFinitePosition {
                x: spawn.position.x,
                y: spawn.position.y,
            });
        }

        let battery = match spawn.battery {
            Some(b) if b.is_finite() && (0.0..=BATTERY_MAX).contains(&b) => b,
            Some(b) => return Err(EntityError::InvalidBattery(b)),
            None => rng.uniform(params.battery_initial_min, BATTERY_MAX),
        };
        let speed = match spawn.speed {
            Some(s) if s.is_finite() && s > 0.0 => s,
            Some(s) => return Err(EntityError::InvalidSpeed(s)),
            None => rng.uniform(params.speed_range.0, params.speed_range.1),
        };
        let sensors = sensors::initial(params, rng);
        let heading = rng.uniform(0.0, TAU);

        Ok(Self {
            id: spawn.id,
            position: spawn.position,
            target: None,
            battery,
            status: ProbeStatus::Idle,
            sensors,
            gyro: Gyroscope::default(),
            path: Breadcrumbs::new(params.path_capacity),
            heading,
            speed,
            last_sample_ms: None,
            low_battery_latched: false,
            paused_from: None,
            mesh_neighbors: Vec::new(),
        })
    }

    /// Advance this probe by one tick.
    ///
    /// `on_detect` is called at most once, with the probe already paused,
    /// when the coordinated alert fires.
    pub fn update<R, F>(&mut self, ctx: &TickContext<'_>, rng: &mut R, mut on_detect: F) -> TickReport
    where
        R: RandomSource + ?Sized,
        F: FnMut(&Probe),
    {
        let mut report = TickReport::default();
        if self.status == ProbeStatus::Paused {
            return report;
        }
        let params = ctx.params;

        self.battery = (self.battery - params.battery_drain_per_tick).max(0.0);

        if self.battery < params.low_battery_threshold && !self.low_battery_latched {
            self.low_battery_latched = true;
            if self.apply(Trigger::BatteryCritical) {
                report.retrace_started = true;
            }
        }

        sensors::drift(&mut self.sensors, params, rng);

        if sensors::coordinated_alert(&self.sensors, params) {
            self.paused_from = Some(self.status);
            self.apply(Trigger::CoordinatedAlert);
            report.detected = true;
            on_detect(self);
        }

        let due = match self.last_sample_ms {
            None => true,
            Some(last) => ctx.now_ms.saturating_sub(last) >= params.path_sample_interval_ms,
        };
        if due {
            self.path.push(self.position);
            self.last_sample_ms = Some(ctx.now_ms);
            report.breadcrumb_recorded = true;
        }

        if self.status == ProbeStatus::Retracing {
            match self.path.last() {
                Some(crumb) => {
                    self.target = Some(crumb);
                    if self.move_to_target(crumb, params) {
                        self.path.pop();
                    }
                }
                None => {
                    self.target = Some(ctx.base);
                    if self.move_to_target(ctx.base, params) {
                        self.apply(Trigger::RetraceComplete);
                        report.retrace_complete = true;
                    }
                }
            }
        } else if let Some(target) = self.target {
            let was_moving = self.status == ProbeStatus::Moving;
            if self.move_to_target(target, params) && was_moving {
                report.target_reached = true;
            }
        }

        let steer = avoidance::steer_clear(
            &mut self.position,
            &self.id,
            ctx.obstacles,
            ctx.peers,
            params,
        );
        if let Some(range) = steer.ultrasonic {
            self.sensors.ultrasonic = range;
        }

        let t = ctx.now_ms as f64;
        self.gyro.pitch = (t / params.gyro_pitch_period_ms).sin() * params.gyro_amplitude_deg;
        self.gyro.roll = (t / params.gyro_roll_period_ms).cos() * params.gyro_amplitude_deg;
        self.gyro.yaw = self.heading.to_degrees();

        report
    }

    /// Step toward `target`. Returns `true` once within reach distance,
    /// in which case a MOVING probe goes IDLE and nothing moves.
    fn move_to_target(&mut self, target: Point, params: &ProbeParams) -> bool {
        if self.position.distance_to(&target) < params.reach_distance {
            if self.status == ProbeStatus::Moving {
                self.apply(Trigger::TargetReached);
            }
            return true;
        }

        self.heading = self.position.angle_to(&target);
        self.position.x += self.heading.cos() * self.speed;
        self.position.y += self.heading.sin() * self.speed;
        false
    }

    /// Run the transition table; returns whether the status changed.
    fn apply(&mut self, trigger: Trigger) -> bool {
        match transition(self.status, trigger) {
            Some(next) => {
                let changed = next != self.status;
                self.status = next;
                changed
            }
            None => false,
        }
    }

    fn reject(&self, trigger: Trigger) -> SwarmError {
        SwarmError::IllegalTransition {
            id: self.id.clone(),
            from: self.status,
            trigger: trigger.to_string(),
        }
    }

    // --- Driver operations ---

    /// Give the probe a goal. While paused the goal is held and the status
    /// it resumes to is updated instead.
    pub fn assign_target(&mut self, target: Point) -> Result<(), SwarmError> {
        if !target.is_finite() {
            return Err(EntityError::NonFinitePosition {
                x: target.x,
                y: target.y,
            }
            .into());
        }
        self.edit_goal(Trigger::TargetAssigned)?;
        self.target = Some(target);
        Ok(())
    }

    /// Drop the goal; a MOVING probe goes IDLE.
    pub fn clear_target(&mut self) -> Result<(), SwarmError> {
        self.edit_goal(Trigger::TargetCleared)?;
        self.target = None;
        Ok(())
    }

    fn edit_goal(&mut self, trigger: Trigger) -> Result<(), SwarmError> {
        let next = transition(self.status, trigger).ok_or_else(|| self.reject(trigger))?;
        if self.status == ProbeStatus::Paused {
            let held = self.paused_from.unwrap_or(ProbeStatus::Idle);
            self.paused_from = Some(transition(held, trigger).ok_or_else(|| self.reject(trigger))?);
        }
        self.status = next;
        Ok(())
    }

    /// Freeze the probe. Pausing a paused probe is a no-op.
    pub fn pause(&mut self) {
        if self.status != ProbeStatus::Paused {
            self.paused_from = Some(self.status);
            self.apply(Trigger::Pause);
        }
    }

    /// Unfreeze the probe back to the status it was paused from.
    pub fn resume(&mut self) -> Result<(), SwarmError> {
        let trigger = Trigger::Resume {
            restore: self.paused_from.unwrap_or(ProbeStatus::Idle),
        };
        let next = transition(self.status, trigger).ok_or_else(|| self.reject(trigger))?;
        self.status = next;
        self.paused_from = None;
        Ok(())
    }

    /// Set a driver-reserved status (IDLE, SCANNING, ALERT, RETURNING).
    pub fn dispatch(&mut self, status: ProbeStatus) -> Result<(), SwarmError> {
        let trigger = Trigger::Dispatch(status);
        let next = transition(self.status, trigger).ok_or_else(|| self.reject(trigger))?;
        self.status = next;
        Ok(())
    }

    pub fn set_mesh_neighbors(&mut self, neighbors: Vec<String>) {
        self.mesh_neighbors = neighbors;
    }

    // --- Read access ---

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn target(&self) -> Option<Point> {
        self.target
    }

    pub fn battery(&self) -> f64 {
        self.battery
    }

    pub fn status(&self) -> ProbeStatus {
        self.status
    }

    pub fn sensors(&self) -> &Sensors {
        &self.sensors
    }

    pub fn gyro(&self) -> &Gyroscope {
        &self.gyro
    }

    pub fn path(&self) -> &Breadcrumbs {
        &self.path
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn low_battery_latched(&self) -> bool {
        self.low_battery_latched
    }

    pub fn paused_from(&self) -> Option<ProbeStatus> {
        self.paused_from
    }

    pub fn mesh_neighbors(&self) -> &[String] {
        &self.mesh_neighbors
    }

    /// Roster entry used by other probes' avoidance.
    pub fn fix(&self) -> PeerFix {
        PeerFix {
            id: self.id.clone(),
            position: self.position,
        }
    }
}
