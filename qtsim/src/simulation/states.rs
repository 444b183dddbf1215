//! Core state types for the circle simulation.
//!
//! - `Body`: a circle with position, velocity, radius and derived mass
//! - `System`: the contiguous body list plus the current simulation time `t`
//!
//! The quadtree never owns bodies. It stores indices into `System::bodies`,
//! so the list must not be resized or reordered between a rebuild and the
//! update pass that uses it.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

/// Mass per unit of radius
pub const MASS_PER_RADIUS: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec2, // position (circle centre)
    pub v: NVec2, // velocity
    pub radius: f64, // radius
    pub m: f64, // mass, derived from radius
}

impl Body {
    /// Create a body whose mass is derived from its radius
    pub fn new(x: NVec2, v: NVec2, radius: f64) -> Self {
        Self {
            x,
            v,
            radius,
            m: radius * MASS_PER_RADIUS,
        }
    }

    /// Create a body with an explicit mass
    pub fn with_mass(x: NVec2, v: NVec2, radius: f64, m: f64) -> Self {
        Self { x, v, radius, m }
    }

    /// Kinetic energy, 1/2 m |v|^2
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }
}

#[derive(Debug, Clone, Default)]
pub struct System {
    pub bodies: Vec<Body>, // collection of bodies, indexed by the quadtree
    pub t: f64, // time
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    /// Sum of kinetic energy over all bodies
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies.iter().map(Body::kinetic_energy).sum()
    }
}
