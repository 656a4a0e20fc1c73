use rand::distributions::Open01;
use rand::{thread_rng, Rng};

use crate::math::Vec3;

use super::RandomDistribution;

/// Uniformly distributed unit directions, by rejection sampling the cube.
pub struct UnitSphere {}

impl UnitSphere {
    pub fn new() -> UnitSphere {
        UnitSphere {}
    }
}

impl Default for UnitSphere {
    fn default() -> UnitSphere {
        UnitSphere::new()
    }
}

impl RandomDistribution<Vec3> for UnitSphere {
    fn value(&self) -> Vec3 {
        let mut rng = thread_rng();
        loop {
            let candidate = Vec3::new(
                2.0 * rng.sample::<f32, _>(Open01) - 1.0,
                2.0 * rng.sample::<f32, _>(Open01) - 1.0,
                2.0 * rng.sample::<f32, _>(Open01) - 1.0,
            );
            let norm_squared = candidate.norm_squared();
            if norm_squared > 1e-4 && norm_squared <= 1.0 {
                return candidate * (1.0 / norm_squared.sqrt());
            }
        }
    }
}
