use crate::math::Vec3;

mod unit_sphere;
pub use unit_sphere::UnitSphere;

pub trait RandomDistribution<T> {
    fn value(&self) -> T;
}

/// Mirror `direction` into the hemisphere around `normal`.
///
/// A uniformly distributed sphere direction, flipped this way, is uniformly
/// distributed over the hemisphere facing along `normal`.
pub fn into_hemisphere(direction: Vec3, normal: &Vec3) -> Vec3 {
    if direction.dot(normal) < 0.0 {
        -direction
    } else {
        direction
    }
}
