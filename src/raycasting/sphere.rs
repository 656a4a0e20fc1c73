use crate::math::Vec3;

use super::{Intersect, IntersectionInfo, Ray};

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    centre: Vec3,
    radius: f32,
}

impl Sphere {
    pub fn new(centre: Vec3, radius: f32) -> Sphere {
        debug_assert!(radius > 0.0);
        Sphere { centre, radius }
    }

    pub fn centre(&self) -> Vec3 {
        self.centre
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Intersect for Sphere {
    fn intersect(&self, ray: &Ray) -> Option<IntersectionInfo> {
        let oc = ray.origin - self.centre;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;
        let delta_squared = b * b - 4.0 * a * c;
        if delta_squared < 0.0 {
            return None;
        }
        let delta = delta_squared.sqrt();
        let one_over_2_a = 1.0 / (2.0 * a);
        let t1 = (-b - delta) * one_over_2_a;
        let t2 = (-b + delta) * one_over_2_a;
        // Smallest non-negative root; t2 covers a ray starting inside the sphere.
        let distance = if t1 < 0.0 || (t2 >= 0.0 && t1 >= t2) {
            t2
        } else {
            t1
        };
        if distance <= 0.0 {
            return None;
        }
        let location = ray.point_at(distance);
        let mut normal = (location - self.centre).normalize();
        if normal.dot(&ray.direction) > 0.0 {
            normal = -normal;
        }
        Some(IntersectionInfo {
            distance,
            location,
            normal,
        })
    }
}
