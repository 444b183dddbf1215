//! High-level runtime engine settings
//!
//! Selects the update strategy and the quadtree shape policy used when
//! building and stepping a `Scenario`

use crate::simulation::integrator::UpdateStrategy;
use crate::simulation::params::TreePolicy;

#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    pub strategy: UpdateStrategy, // how collision candidates are gathered
    pub policy: TreePolicy, // split / depth thresholds
}
