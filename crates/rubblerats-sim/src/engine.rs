//! Swarm engine: the simulation driver.
//!
//! `SwarmEngine` owns the hecs world (probes and obstacles), the base, the
//! seeded RNG and the clock. It applies driver commands at the tick
//! boundary, runs the probe systems and produces `SwarmSnapshot`s. Headless
//! and deterministic for a given seed and sequence of clock readings.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use rubblerats_core::commands::DriverCommand;
use rubblerats_core::components::Obstacle;
use rubblerats_core::config::SwarmConfig;
use rubblerats_core::constants::FORMATION_SPACING;
use rubblerats_core::enums::ProbeStatus;
use rubblerats_core::error::{ConfigError, EntityError, SwarmError};
use rubblerats_core::events::SwarmEvent;
use rubblerats_core::state::SwarmSnapshot;
use rubblerats_core::types::{Point, SimTime};
use rubblerats_probe::{Probe, ProbeSpawn};

use crate::clock::{Clock, SystemClock};
use crate::formation;
use crate::systems;
use crate::systems::field::PlacementOrder;
use crate::systems::probes::ProbePass;
use crate::world_setup;

/// Called once per detection event, after the tick's probe pass.
pub type DetectionHook = Box<dyn FnMut(&SwarmEvent) + Send>;

/// The simulation driver. Owns the world and all sim state.
pub struct SwarmEngine {
    world: World,
    /// Probe entities in spawn order. Update order follows this list.
    roster: Vec<Entity>,
    base: Point,
    config: SwarmConfig,
    rng: ChaCha8Rng,
    clock: Box<dyn Clock>,
    time: SimTime,
    command_queue: VecDeque<DriverCommand>,
    /// Events raised since the last snapshot.
    events: Vec<SwarmEvent>,
    detections_total: u32,
    next_obstacle: u64,
    detection_hook: Option<DetectionHook>,
}

impl SwarmEngine {
    /// Create an empty engine driven by the wall clock.
    pub fn new(config: SwarmConfig) -> Result<Self, SwarmError> {
        Self::with_clock(config, Box::new(SystemClock::new()))
    }

    /// Create an empty engine driven by `clock`.
    pub fn with_clock(config: SwarmConfig, clock: Box<dyn Clock>) -> Result<Self, SwarmError> {
        config.validate()?;
        let base = world_setup::base_for(&config.scenario);
        info!(seed = config.seed, base_x = base.x, base_y = base.y, "swarm engine created");

        Ok(Self {
            world: World::new(),
            roster: Vec::new(),
            base,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            clock,
            time: SimTime::default(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            detections_total: 0,
            next_obstacle: 0,
            detection_hook: None,
        })
    }

    /// Spawn the configured scenario: a probe ring around the base and
    /// scattered obstacles.
    pub fn populate(&mut self) -> Result<(), SwarmError> {
        let layout = world_setup::layout(&self.config.scenario, self.base, &mut self.rng)?;
        for spawn in layout.probes {
            self.spawn_probe(spawn)?;
        }
        for obstacle in layout.obstacles {
            self.add_obstacle(obstacle);
        }
        info!(
            probes = self.roster.len(),
            obstacles = self.next_obstacle,
            "scenario populated"
        );
        Ok(())
    }

    /// Register a callback for detection events.
    pub fn on_detection(&mut self, hook: impl FnMut(&SwarmEvent) + Send + 'static) {
        self.detection_hook = Some(Box::new(hook));
    }

    /// Queue a driver command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: DriverCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = DriverCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> SwarmSnapshot {
        self.process_commands();

        // One clock reading per tick, never behind the previous one.
        let now_ms = self.clock.now_ms().max(self.time.now_ms);
        let obstacles = systems::field::obstacles(&self.world);
        let pass = ProbePass {
            roster: &self.roster,
            obstacles: &obstacles,
            base: self.base,
            now_ms,
            tick: self.time.tick + 1,
            params: &self.config.probe,
        };
        let first_new = self.events.len();
        let detections = systems::probes::run(&mut self.world, &pass, &mut self.rng, &mut self.events);
        self.detections_total += detections;

        if let Some(hook) = self.detection_hook.as_mut() {
            for event in &self.events[first_new..] {
                if matches!(event, SwarmEvent::Detection { .. }) {
                    hook(event);
                }
            }
        }

        systems::mesh::run(&mut self.world, &self.roster, self.config.mesh_range);
        self.time.advance(now_ms);
        debug!(
            tick = self.time.tick,
            now_ms,
            probes = self.roster.len(),
            events = self.events.len(),
            "tick complete"
        );

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.roster,
            self.base,
            &self.time,
            events,
            self.detections_total,
        )
    }

    /// Apply a command immediately.
    pub fn apply_command(&mut self, command: DriverCommand) -> Result<(), SwarmError> {
        match command {
            DriverCommand::SpawnProbe {
                id,
                x,
                y,
                speed,
                battery,
            } => {
                self.spawn_probe(ProbeSpawn {
                    id,
                    position: Point::new(x, y),
                    speed,
                    battery,
                })?;
            }
            DriverCommand::RemoveProbe { id } => {
                let entity = self.entity_of(&id)?;
                let _ = self.world.despawn(entity);
                self.roster.retain(|&e| e != entity);
                info!(probe = %id, "probe removed");
            }
            DriverCommand::AddObstacle { x, y, radius, kind } => {
                let obstacle = Obstacle::new(Point::new(x, y), radius, kind)?;
                self.add_obstacle(obstacle);
            }
            DriverCommand::ClearObstacles => {
                let removed = systems::field::clear(&mut self.world);
                debug!(removed, "obstacles cleared");
            }
            DriverCommand::SetBase { x, y } => {
                let base = Point::new(x, y);
                if !base.is_finite() {
                    return Err(EntityError::NonFinitePosition { x, y }.into());
                }
                self.base = base;
            }
            DriverCommand::SetTarget { id, x, y } => {
                self.with_probe(&id, |probe| probe.assign_target(Point::new(x, y)))?;
            }
            DriverCommand::ClearTarget { id } => {
                self.with_probe(&id, Probe::clear_target)?;
            }
            DriverCommand::Formation {
                kind,
                center_x,
                center_y,
                spacing,
            } => {
                let spacing = spacing.unwrap_or(FORMATION_SPACING);
                if !spacing.is_finite() || spacing <= 0.0 {
                    return Err(ConfigError::NotPositive { field: "spacing" }.into());
                }
                let center = Point::new(center_x, center_y);
                if !center.is_finite() {
                    return Err(EntityError::NonFinitePosition {
                        x: center_x,
                        y: center_y,
                    }
                    .into());
                }
                let eligible = self.eligible();
                let slots = formation::slots(kind, center, spacing, eligible.len());
                for (&entity, slot) in eligible.iter().zip(slots) {
                    if let Ok(mut probe) = self.world.get::<&mut Probe>(entity) {
                        probe.assign_target(slot)?;
                    }
                }
                info!(?kind, probes = eligible.len(), "formation assigned");
            }
            DriverCommand::RecallAll => {
                let base = self.base;
                for entity in self.eligible() {
                    if let Ok(mut probe) = self.world.get::<&mut Probe>(entity) {
                        probe.assign_target(base)?;
                        probe.dispatch(ProbeStatus::Returning)?;
                    }
                }
            }
            DriverCommand::Dispatch { id, status } => {
                self.with_probe(&id, |probe| probe.dispatch(status))?;
            }
            DriverCommand::Pause { id } => {
                self.with_probe(&id, |probe| {
                    probe.pause();
                    Ok(())
                })?;
            }
            DriverCommand::Resume { id } => {
                self.with_probe(&id, Probe::resume)?;
            }
            DriverCommand::PauseAll => {
                for (_entity, probe) in self.world.query_mut::<&mut Probe>() {
                    probe.pause();
                }
            }
            DriverCommand::ResumeAll => {
                for (_entity, probe) in self.world.query_mut::<&mut Probe>() {
                    if probe.status() == ProbeStatus::Paused {
                        probe.resume()?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Add a probe to the end of the roster.
    pub fn spawn_probe(&mut self, spawn: ProbeSpawn) -> Result<Entity, SwarmError> {
        if self.entity_of(&spawn.id).is_ok() {
            return Err(SwarmError::DuplicateProbeId(spawn.id));
        }
        let probe = Probe::new(spawn, &self.config.probe, &mut self.rng)?;
        info!(
            probe = probe.id(),
            x = probe.position().x,
            y = probe.position().y,
            battery = probe.battery(),
            speed = probe.speed(),
            "probe spawned"
        );
        let entity = self.world.spawn((probe,));
        self.roster.push(entity);
        Ok(entity)
    }

    /// Place a static obstacle after every existing one.
    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> Entity {
        let order = PlacementOrder(self.next_obstacle);
        self.next_obstacle += 1;
        self.world.spawn((order, obstacle))
    }

    /// Current state of one probe.
    pub fn probe(&self, id: &str) -> Option<Probe> {
        let entity = self.entity_of(id).ok()?;
        let probe = self.world.get::<&Probe>(entity).ok()?;
        Some(Probe::clone(&probe))
    }

    /// Current state of every probe, in roster order.
    pub fn probes(&self) -> Vec<Probe> {
        self.roster
            .iter()
            .filter_map(|&entity| self.world.get::<&Probe>(entity).ok().map(|p| Probe::clone(&p)))
            .collect()
    }

    pub fn obstacles(&self) -> Vec<Obstacle> {
        systems::field::obstacles(&self.world)
    }

    pub fn base(&self) -> Point {
        self.base
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Process all queued commands. Failures become `CommandRejected` events.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.apply_command(command) {
                warn!(error = %err, "driver command rejected");
                self.events.push(SwarmEvent::CommandRejected {
                    reason: err.to_string(),
                    tick: self.time.tick + 1,
                });
            }
        }
    }

    fn entity_of(&self, id: &str) -> Result<Entity, SwarmError> {
        self.roster
            .iter()
            .copied()
            .find(|&entity| {
                self.world
                    .get::<&Probe>(entity)
                    .map(|p| p.id() == id)
                    .unwrap_or(false)
            })
            .ok_or_else(|| SwarmError::UnknownProbe(id.to_string()))
    }

    fn with_probe<T>(
        &mut self,
        id: &str,
        f: impl FnOnce(&mut Probe) -> Result<T, SwarmError>,
    ) -> Result<T, SwarmError> {
        let entity = self.entity_of(id)?;
        let mut probe = self
            .world
            .get::<&mut Probe>(entity)
            .map_err(|_| SwarmError::UnknownProbe(id.to_string()))?;
        f(&mut *probe)
    }

    /// Probes that accept formation and recall goals, in roster order.
    fn eligible(&self) -> Vec<Entity> {
        self.roster
            .iter()
            .copied()
            .filter(|&entity| {
                self.world
                    .get::<&Probe>(entity)
                    .map(|p| !matches!(p.status(), ProbeStatus::Paused | ProbeStatus::Retracing))
                    .unwrap_or(false)
            })
            .collect()
    }
}
