use crate::math::Vec3;

use super::{Intersect, IntersectionInfo, Ray};

/// An axis-aligned box described by its minimum corner and its (positive) size.
#[derive(Clone, Copy, Debug)]
pub struct AxisAlignedBox {
    origin: Vec3,
    size: Vec3,
}

impl AxisAlignedBox {
    pub fn new(origin: Vec3, size: Vec3) -> AxisAlignedBox {
        debug_assert!(size.coords.iter().all(|s| *s > 0.0));
        AxisAlignedBox { origin, size }
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn max_corner(&self) -> Vec3 {
        self.origin + self.size
    }

    pub fn centre(&self) -> Vec3 {
        self.origin + self.size * 0.5
    }
}

impl Intersect for AxisAlignedBox {
    /// Slab-method intersection.
    ///
    /// Axis-aligned rays (a zero direction component) fall out of IEEE
    /// division: the slab parameters become signed infinities and the
    /// interval tests reject or ignore the axis as appropriate.
    fn intersect(&self, ray: &Ray) -> Option<IntersectionInfo> {
        let max_corner = self.max_corner();
        let mut t_near = std::f32::NEG_INFINITY;
        let mut t_far = std::f32::INFINITY;
        let mut near_axis = 0;
        for axis in 0..3 {
            let inv_d = 1.0 / ray.direction[axis];
            let mut t0 = (self.origin[axis] - ray.origin[axis]) * inv_d;
            let mut t1 = (max_corner[axis] - ray.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_near {
                t_near = t0;
                near_axis = axis;
            }
            t_far = t_far.min(t1);
            if t_far <= t_near {
                return None;
            }
        }
        if t_near <= 0.0 {
            return None;
        }
        // The outward normal is on the axis that produced the entry point,
        // pointing against the ray on that axis.
        let mut normal = Vec3::zeros();
        normal.coords[near_axis] = if ray.direction[near_axis] > 0.0 {
            -1.0
        } else {
            1.0
        };
        Some(IntersectionInfo {
            distance: t_near,
            location: ray.point_at(t_near),
            normal,
        })
    }
}
