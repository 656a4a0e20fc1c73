use crate::camera::Camera;
use crate::cubemap::Cubemap;
use crate::materials::fresnel_schlick;
use crate::math::Vec3;
use crate::random_distributions::{into_hemisphere, RandomDistribution, UnitSphere};
use crate::raycasting::Ray;
use crate::scene::{Scene, SceneHit};

/// Sampling constants for the path integrator.
///
/// The defaults are tuned for interactive previews rather than reference
/// images; they are parameters here so experiments don't have to touch the
/// integrator.
#[derive(Clone, Copy, Debug)]
pub struct TracerConfig {
    /// Bounce budget per camera ray
    pub max_bounces: u32,
    /// Shadow-ray candidates per direct-light estimate
    pub light_candidates: u32,
    /// Scale of the random jitter applied to light-sampling directions
    pub light_jitter: f32,
    /// Blend weight of the direct-light estimate against path throughput
    pub light_weight: f32,
    /// Offset applied to secondary ray origins to avoid self-intersection
    pub surface_bias: f32,
}

impl Default for TracerConfig {
    fn default() -> TracerConfig {
        TracerConfig {
            max_bounces: 5,
            light_candidates: 5,
            light_jitter: 0.5,
            light_weight: 0.05,
            surface_bias: 1e-3,
        }
    }
}

/// Monte Carlo path integrator over a scene and its environment cubemap.
pub struct PathTracer<'a> {
    scene: &'a Scene,
    cubemap: &'a Cubemap,
    config: TracerConfig,
}

impl<'a> PathTracer<'a> {
    pub fn new(scene: &'a Scene, cubemap: &'a Cubemap, config: TracerConfig) -> PathTracer<'a> {
        PathTracer {
            scene,
            cubemap,
            config,
        }
    }

    /// One radiance estimate for normalized screen coordinates (u, v).
    ///
    /// Returns linear RGB clamped to [0, 1]. Each call draws fresh random
    /// numbers, so repeated calls at the same coordinates average towards
    /// the pixel's expected radiance.
    pub fn sample_pixel(&self, camera: &Camera, u: f32, v: f32, aspect_ratio: f32) -> Vec3 {
        let sphere = UnitSphere::new();
        let mut ray = camera.ray_through_screen(u, v, aspect_ratio);
        let mut contrib = Vec3::broadcast(1.0);
        let mut result = Vec3::zeros();

        for _ in 0..self.config.max_bounces {
            let hit = match self.scene.intersect(&ray) {
                None => {
                    result += contrib.component_mul(&self.cubemap.sample(&ray.direction));
                    break;
                }
                Some(hit) => hit,
            };
            let material = self.scene.object(hit.object).material;
            let normal = hit.info.normal;

            let cos_view = (-ray.direction).dot(&normal);
            let fresnel = fresnel_schlick(material.f0(), cos_view);

            let sampled_light = self.sample_direct_light(&hit, &sphere);

            result += material.emitted().component_mul(&contrib);

            let rand_dir = into_hemisphere(sphere.value(), &normal);
            let direction =
                if material.metallic > 0.001 || rand::random::<f32>() <= fresnel.average() {
                    // Mirror lobe, widened towards the random hemisphere
                    // direction as roughness grows.
                    ray.direction
                        .reflect(&normal)
                        .lerp(&rand_dir, material.roughness)
                } else {
                    contrib = contrib.component_mul(&(material.albedo * (1.0 - material.metallic)));
                    rand_dir
                };

            if !sampled_light.near_zero() {
                result += sampled_light.component_mul(&contrib) * self.config.light_weight;
                contrib *= 1.0 - self.config.light_weight;
            }

            ray = Ray::new(hit.info.location, direction).bias(self.config.surface_bias);
        }

        result.clamp01()
    }

    /// One-bounce next-event estimate towards the first emitter in table
    /// order (excluding the hit object itself).
    ///
    /// Candidate directions aim at the emitter's origin, jittered by a
    /// hemisphere-mirrored random vector; whatever each shadow ray hits
    /// contributes its emission.
    fn sample_direct_light(&self, hit: &SceneHit, sphere: &UnitSphere) -> Vec3 {
        let emitter = match self.scene.first_emitter_except(hit.object) {
            None => return Vec3::zeros(),
            Some(emitter) => emitter,
        };
        let to_light = self.scene.object(emitter).origin() - hit.info.location;
        let mut total = Vec3::zeros();
        for _ in 0..self.config.light_candidates {
            let jitter =
                into_hemisphere(sphere.value(), &hit.info.normal) * self.config.light_jitter;
            let shadow_ray =
                Ray::new(hit.info.location, to_light + jitter).bias(self.config.surface_bias);
            if let Some(shadow_hit) = self.scene.intersect(&shadow_ray) {
                total += self.scene.object(shadow_hit.object).material.emitted();
            }
        }
        total * (1.0 / self.config.light_candidates as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::materials::Material;
    use crate::scene::Object;

    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    fn forward_camera() -> Camera {
        Camera::new(Vec3::zeros(), 0.0, 0.0)
    }

    fn white_cubemap() -> Cubemap {
        Cubemap::solid_faces(4, [[255, 255, 255]; 6])
    }

    #[test]
    fn empty_scene_returns_the_environment_colour() {
        let scene = Scene::new();
        let cubemap = Cubemap::solid_faces(4, [[51, 153, 204]; 6]);
        let tracer = PathTracer::new(&scene, &cubemap, TracerConfig::default());
        let sampled = tracer.sample_pixel(&forward_camera(), 0.5, 0.5, 1.0);
        let expected = cubemap.sample(&Vec3::unit_z());
        assert!((sampled - expected).coords.iter().all(|c| c.abs() <= 1.0 / 255.0));
    }

    #[test]
    fn emissive_surface_saturates_to_white() {
        let mut scene = Scene::new();
        scene
            .add(Object::sphere(
                Vec3::new(0.0, 0.0, 3.0),
                1.0,
                Material {
                    emission_power: 10.0,
                    emission_colour: Vec3::broadcast(1.0),
                    ..Default::default()
                },
            ))
            .unwrap();
        let cubemap = Cubemap::solid_faces(4, [[0, 0, 0]; 6]);
        let tracer = PathTracer::new(&scene, &cubemap, TracerConfig::default());
        let sampled = tracer.sample_pixel(&forward_camera(), 0.5, 0.5, 1.0);
        assert!((sampled - Vec3::broadcast(1.0)).near_zero());
    }

    #[test]
    fn mirror_sphere_reflects_the_face_behind_the_camera() {
        let mut scene = Scene::new();
        scene
            .add(Object::sphere(
                Vec3::new(0.0, 0.0, 3.0),
                1.0,
                Material {
                    albedo: Vec3::broadcast(1.0),
                    metallic: 1.0,
                    roughness: 0.0,
                    ..Default::default()
                },
            ))
            .unwrap();
        // Every face a different colour; the mirror at the screen centre
        // must return the back (-Z) face.
        let cubemap = Cubemap::solid_faces(
            4,
            [
                [255, 0, 0],
                [0, 255, 0],
                [0, 0, 255],
                [255, 255, 0],
                [0, 255, 255],
                [64, 64, 64],
            ],
        );
        let tracer = PathTracer::new(&scene, &cubemap, TracerConfig::default());
        let sampled = tracer.sample_pixel(&forward_camera(), 0.5, 0.5, 1.0);
        assert!((sampled - Vec3::broadcast(64.0 / 255.0)).norm() < 1e-2);
    }

    #[test]
    fn lambertian_sphere_under_white_sky_returns_albedo() {
        let mut scene = Scene::new();
        scene
            .add(Object::sphere(
                Vec3::new(0.0, 0.0, 3.0),
                1.0,
                Material {
                    albedo: Vec3::broadcast(0.5),
                    roughness: 1.0,
                    reflectance: 0.0,
                    metallic: 0.0,
                    ..Default::default()
                },
            ))
            .unwrap();
        let cubemap = white_cubemap();
        let tracer = PathTracer::new(&scene, &cubemap, TracerConfig::default());
        let mut mean = Vec3::zeros();
        let passes = 200;
        for _ in 0..passes {
            mean += tracer.sample_pixel(&forward_camera(), 0.5, 0.5, 1.0);
        }
        mean *= 1.0 / passes as f32;
        assert!((mean - Vec3::broadcast(0.5)).coords.iter().all(|c| c.abs() < 0.05));
    }

    #[quickcheck]
    fn samples_are_always_inside_the_unit_cube(u: f32, v: f32) -> TestResult {
        if !u.is_finite() || !v.is_finite() {
            return TestResult::discard();
        }
        let u = u.abs().fract();
        let v = v.abs().fract();
        let mut scene = Scene::new();
        scene
            .add(Object::sphere(
                Vec3::new(0.0, 0.0, 3.0),
                1.0,
                Material {
                    albedo: Vec3::new(0.8, 0.6, 0.4),
                    roughness: 0.3,
                    metallic: 0.5,
                    ..Default::default()
                },
            ))
            .unwrap();
        scene
            .add(Object::aligned_box(
                Vec3::new(-2.0, 2.0, 2.0),
                Vec3::broadcast(1.0),
                Material {
                    emission_power: 20.0,
                    emission_colour: Vec3::new(1.0, 0.9, 0.8),
                    ..Default::default()
                },
            ))
            .unwrap();
        let cubemap = white_cubemap();
        let tracer = PathTracer::new(&scene, &cubemap, TracerConfig::default());
        let sampled = tracer.sample_pixel(&forward_camera(), u, v, 1.0);
        TestResult::from_bool(sampled.coords.iter().all(|c| (0.0..=1.0).contains(c)))
    }

    // Statistical Cornell-style check: the floor picks up colour bleeding
    // from the nearer wall. Slow, so not part of the default test run.
    #[test]
    #[ignore]
    fn floor_near_red_wall_is_redder_than_floor_near_green_wall() {
        let mut scene = Scene::new();
        let wall = |origin, size, albedo| {
            Object::aligned_box(
                origin,
                size,
                Material {
                    albedo,
                    roughness: 1.0,
                    reflectance: 0.0,
                    ..Default::default()
                },
            )
        };
        // Room interior spans [-2, 2] x [0, 4] x [0, 4].
        scene
            .add(wall(
                Vec3::new(-2.2, 0.0, 0.0),
                Vec3::new(0.2, 4.0, 4.0),
                Vec3::new(0.9, 0.05, 0.05),
            ))
            .unwrap();
        scene
            .add(wall(
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.2, 4.0, 4.0),
                Vec3::new(0.05, 0.9, 0.05),
            ))
            .unwrap();
        scene
            .add(wall(
                Vec3::new(-2.2, -0.2, 0.0),
                Vec3::new(4.4, 0.2, 4.0),
                Vec3::broadcast(0.9),
            ))
            .unwrap();
        scene
            .add(wall(
                Vec3::new(-2.2, 4.0, 0.0),
                Vec3::new(4.4, 0.2, 4.0),
                Vec3::broadcast(0.9),
            ))
            .unwrap();
        scene
            .add(wall(
                Vec3::new(-2.2, -0.2, 4.0),
                Vec3::new(4.4, 4.4, 0.2),
                Vec3::broadcast(0.9),
            ))
            .unwrap();
        scene
            .add(Object::aligned_box(
                Vec3::new(-0.5, 3.9, 1.5),
                Vec3::new(1.0, 0.1, 1.0),
                Material {
                    emission_power: 15.0,
                    emission_colour: Vec3::broadcast(1.0),
                    ..Default::default()
                },
            ))
            .unwrap();
        let cubemap = Cubemap::solid_faces(4, [[0, 0, 0]; 6]);
        let tracer = PathTracer::new(&scene, &cubemap, TracerConfig::default());
        // Look down the room from the open end; the floor fills the lower
        // half of the screen.
        let camera = Camera::new(Vec3::new(0.0, 2.0, 0.2), 0.0, -0.4);
        let mut near_red = Vec3::zeros();
        let mut near_green = Vec3::zeros();
        let passes = 5000;
        for _ in 0..passes {
            near_red += tracer.sample_pixel(&camera, 0.15, 0.25, 1.0);
            near_green += tracer.sample_pixel(&camera, 0.85, 0.25, 1.0);
        }
        near_red *= 1.0 / passes as f32;
        near_green *= 1.0 / passes as f32;
        let red_bias = near_red.x() - near_red.y();
        let green_bias = near_green.x() - near_green.y();
        assert!(red_bias - green_bias >= 0.05);
    }
}
