//! Plain-data components shared by the probe model and the driver.
//!
//! Obstacles live as hecs entities in the driver's world; sensors and the
//! gyroscope are embedded in each probe.

use serde::{Deserialize, Serialize};

use crate::enums::ObstacleKind;
use crate::error::EntityError;
use crate::types::Point;

/// Synthetic sensor channels carried by every probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sensors {
    /// Range to the nearest obstacle that triggered avoidance (world units).
    pub ultrasonic: f64,
    /// CO2 concentration (ppm).
    pub co2: f64,
    /// Microphone level.
    pub microphone: f64,
    /// Ambient temperature (°C).
    pub temperature: f64,
    /// Thermal signature (°C).
    pub thermal: f64,
    /// LoRa radio signal strength (dBm).
    pub lora_signal: f64,
}

/// Attitude readout. Observational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Gyroscope {
    pub pitch: f64,
    pub roll: f64,
    /// Heading in degrees.
    pub yaw: f64,
}

/// Static circular obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Point,
    pub radius: f64,
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// Build an obstacle, rejecting non-finite positions and NaN/negative radii.
    pub fn new(position: Point, radius: f64, kind: ObstacleKind) -> Result<Self, EntityError> {
        if !position.is_finite() {
            return Err(EntityError::NonFinitePosition {
                x: position.x,
                y: position.y,
            });
        }
        if !radius.is_finite() || radius < 0.0 {
            return Err(EntityError::InvalidRadius(radius));
        }
        Ok(Self {
            position,
            radius,
            kind,
        })
    }
}
