//! Project schema definitions.

use pd_sim::IntegratorType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    pub pendulum: PendulumDef,
    pub initial: InitialStateDef,
    #[serde(default)]
    pub solver: IntegratorType,
    #[serde(default)]
    pub run: RunDef,
    #[serde(default)]
    pub display: DisplayDef,
}

/// Physical parameters in SI units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendulumDef {
    pub mass_kg: f64,
    pub length_m: f64,
    #[serde(default = "default_gravity")]
    pub gravity_mps2: f64,
    #[serde(default)]
    pub linear_drag: f64,
    #[serde(default)]
    pub quadratic_drag: f64,
}

fn default_gravity() -> f64 {
    pd_core::constants::G_EARTH_MPS2
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

/// Initial angle and angular velocity, in `unit` and `unit`/s.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialStateDef {
    pub theta: f64,
    #[serde(default)]
    pub omega: f64,
    #[serde(default)]
    pub unit: AngleUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunDef {
    #[serde(default = "default_dt")]
    pub dt_s: f64,
    #[serde(default = "default_t_end")]
    pub t_end_s: f64,
    #[serde(default = "default_record_every")]
    pub record_every: usize,
}

fn default_dt() -> f64 {
    1.0 / 30.0
}

fn default_t_end() -> f64 {
    10.0
}

fn default_record_every() -> usize {
    1
}

impl Default for RunDef {
    fn default() -> Self {
        Self {
            dt_s: default_dt(),
            t_end_s: default_t_end(),
            record_every: default_record_every(),
        }
    }
}

/// Pivot origin and scale handed to renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayDef {
    #[serde(default)]
    pub origin: [f64; 2],
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Default for DisplayDef {
    fn default() -> Self {
        Self {
            origin: [0.0, 0.0],
            scale: default_scale(),
        }
    }
}
