use crate::materials::Material;
use crate::math::Vec3;
use crate::raycasting::{AxisAlignedBox, Intersect, IntersectionInfo, Ray, Sphere};

use thiserror::Error;

/// Upper bound on the number of objects in a scene.
pub const MAX_OBJECTS: usize = 1024;

/// The closed set of primitives the tracer understands.
#[derive(Clone, Copy, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Box(AxisAlignedBox),
}

#[derive(Clone, Copy, Debug)]
pub struct Object {
    pub shape: Shape,
    pub material: Material,
}

impl Object {
    pub fn sphere(centre: Vec3, radius: f32, material: Material) -> Object {
        Object {
            shape: Shape::Sphere(Sphere::new(centre, radius)),
            material,
        }
    }

    pub fn aligned_box(origin: Vec3, size: Vec3, material: Material) -> Object {
        Object {
            shape: Shape::Box(AxisAlignedBox::new(origin, size)),
            material,
        }
    }

    /// The sphere centre, or the geometric centre of a box.
    pub fn origin(&self) -> Vec3 {
        match self.shape {
            Shape::Sphere(sphere) => sphere.centre(),
            Shape::Box(aligned_box) => aligned_box.centre(),
        }
    }
}

impl Intersect for Object {
    fn intersect(&self, ray: &Ray) -> Option<IntersectionInfo> {
        match self.shape {
            Shape::Sphere(ref sphere) => sphere.intersect(ray),
            Shape::Box(ref aligned_box) => aligned_box.intersect(ray),
        }
    }
}

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("scene is full: the object table holds at most {} objects", MAX_OBJECTS)]
    TooManyObjects,
}

/// A nearest intersection along with the index of the object that produced it.
#[derive(Clone, Copy, Debug)]
pub struct SceneHit {
    pub object: usize,
    pub info: IntersectionInfo,
}

/// Append-only object table.
///
/// The table is filled during startup and never mutated once rendering
/// begins; workers read it without synchronization.
#[derive(Default)]
pub struct Scene {
    objects: Vec<Object>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene {
            objects: Vec::new(),
        }
    }

    /// Append an object, returning the index it is identified by.
    pub fn add(&mut self, object: Object) -> Result<usize, SceneError> {
        if self.objects.len() >= MAX_OBJECTS {
            return Err(SceneError::TooManyObjects);
        }
        self.objects.push(object);
        Ok(self.objects.len() - 1)
    }

    pub fn object(&self, index: usize) -> &Object {
        &self.objects[index]
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Nearest intersection over all objects, by linear scan.
    pub fn intersect(&self, ray: &Ray) -> Option<SceneHit> {
        self.objects
            .iter()
            .enumerate()
            .flat_map(|(object, candidate)| {
                candidate
                    .intersect(ray)
                    .map(|info| SceneHit { object, info })
            })
            .min_by(
                |a, b| match PartialOrd::partial_cmp(&a.info.distance, &b.info.distance) {
                    None => std::cmp::Ordering::Less,
                    Some(ordering) => ordering,
                },
            )
    }

    /// The first emissive object in table order, skipping `except`.
    pub fn first_emitter_except(&self, except: usize) -> Option<usize> {
        self.objects
            .iter()
            .enumerate()
            .find(|(index, object)| *index != except && object.material.is_emissive())
            .map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_sphere(centre: Vec3) -> Object {
        Object::sphere(centre, 1.0, Material::default())
    }

    #[test]
    fn add_returns_consecutive_indices() {
        let mut scene = Scene::new();
        assert!(scene.add(plain_sphere(Vec3::zeros())).unwrap() == 0);
        assert!(scene.add(plain_sphere(Vec3::unit_x())).unwrap() == 1);
        assert!(scene.len() == 2);
    }

    #[test]
    fn add_fails_when_table_is_full() {
        let mut scene = Scene::new();
        for _ in 0..MAX_OBJECTS {
            scene.add(plain_sphere(Vec3::zeros())).unwrap();
        }
        assert!(scene.add(plain_sphere(Vec3::zeros())).is_err());
    }

    #[test]
    fn origin_of_box_is_geometric_centre() {
        let object = Object::aligned_box(
            Vec3::new(0.0, 2.0, 4.0),
            Vec3::new(2.0, 2.0, 2.0),
            Material::default(),
        );
        assert!(object.origin() == Vec3::new(1.0, 3.0, 5.0));
    }

    #[test]
    fn intersect_picks_nearest_object() {
        let mut scene = Scene::new();
        scene.add(plain_sphere(Vec3::new(0.0, 0.0, 10.0))).unwrap();
        let near = scene.add(plain_sphere(Vec3::new(0.0, 0.0, 5.0))).unwrap();
        scene.add(plain_sphere(Vec3::new(0.0, 0.0, 20.0))).unwrap();
        let hit = scene
            .intersect(&Ray::new(Vec3::zeros(), Vec3::unit_z()))
            .expect("expected a hit");
        assert!(hit.object == near);
        assert!((hit.info.distance - 4.0).abs() < 1e-4);
    }

    #[test]
    fn intersect_empty_scene_is_none() {
        let scene = Scene::new();
        assert!(scene
            .intersect(&Ray::new(Vec3::zeros(), Vec3::unit_z()))
            .is_none());
    }

    #[test]
    fn first_emitter_follows_table_order_and_skips_excluded() {
        let mut scene = Scene::new();
        let lamp = Material {
            emission_power: 5.0,
            emission_colour: Vec3::broadcast(1.0),
            ..Default::default()
        };
        scene.add(plain_sphere(Vec3::zeros())).unwrap();
        let first = scene
            .add(Object::sphere(Vec3::unit_x(), 1.0, lamp))
            .unwrap();
        let second = scene
            .add(Object::sphere(Vec3::unit_y(), 1.0, lamp))
            .unwrap();
        assert!(scene.first_emitter_except(0) == Some(first));
        assert!(scene.first_emitter_except(first) == Some(second));
    }

    #[test]
    fn first_emitter_is_none_without_lights() {
        let mut scene = Scene::new();
        scene.add(plain_sphere(Vec3::zeros())).unwrap();
        assert!(scene.first_emitter_except(0).is_none());
    }
}
