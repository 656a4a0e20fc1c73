use crate::math::Vec3;

pub mod sphere;
pub use sphere::Sphere;

pub mod axis_aligned_box;
pub use axis_aligned_box::AxisAlignedBox;

/// A ray, consisting of a start point and direction
///
/// This is the basic ray struct used to define things like a line-of-sight
/// going out from the camera or a shadow ray towards a light.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    /// The start point of the ray
    pub origin: Vec3,

    /// The direction the ray goes in.
    ///
    /// This vector should always be kept normalized
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vec3, direction: Vec3) -> Ray {
        Ray {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Return the point on the ray that is `t` units from the start
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Create a new ray by moving the original ray along its direction by `amount`
    ///
    /// `amount` is normally a very small number. This function is useful for ensuring
    /// that rounding errors don't cause a secondary ray to intersect with the point
    /// it starts from.
    pub fn bias(&self, amount: f32) -> Ray {
        Ray {
            origin: self.origin + self.direction * amount,
            direction: self.direction,
        }
    }
}

/// Information about a ray-primitive intersection.
///
/// Returned by [intersect()](Intersect::intersect) and containing everything
/// needed to evaluate the shading at that point.
#[derive(Clone, Copy, Debug)]
pub struct IntersectionInfo {
    /// The distance between the ray origin and the intersection point
    pub distance: f32,

    /// The intersection point
    pub location: Vec3,

    /// The outward surface normal at the intersection point, unit length,
    /// always facing against the incoming ray
    pub normal: Vec3,
}

/// A geometric object that can be intersected with a [Ray](Ray)
///
/// A miss is ordinary and is signalled by `None`; intersection never fails.
pub trait Intersect: Send + Sync {
    /// Test if the ray intersects the object, and return information about the intersection.
    fn intersect(&self, ray: &Ray) -> Option<IntersectionInfo>;
}
