pub mod states;
pub mod params;
pub mod engine;
pub mod geometry;
pub mod collision;
pub mod quadtree;
pub mod integrator;
pub mod scenario;
