use criterion::{criterion_group, criterion_main, Criterion};

use vermeer::camera::Camera;
use vermeer::cubemap::Cubemap;
use vermeer::image::ImageRgbU8;
use vermeer::materials::Material;
use vermeer::math::Vec3;
use vermeer::renderer::{Renderer, RendererConfig};
use vermeer::scene::{Object, Scene};

fn bench_scene() -> Scene {
    let mut scene = Scene::new();
    scene
        .add(Object::aligned_box(
            Vec3::new(-4.0, -0.2, -4.0),
            Vec3::new(8.0, 0.2, 8.0),
            Material {
                albedo: Vec3::broadcast(0.7),
                ..Default::default()
            },
        ))
        .unwrap();
    scene
        .add(Object::sphere(
            Vec3::new(-1.0, 1.0, 3.0),
            1.0,
            Material {
                albedo: Vec3::new(0.2, 0.4, 0.8),
                ..Default::default()
            },
        ))
        .unwrap();
    scene
        .add(Object::sphere(
            Vec3::new(1.2, 1.0, 4.0),
            1.0,
            Material {
                albedo: Vec3::broadcast(0.9),
                roughness: 0.05,
                metallic: 1.0,
                ..Default::default()
            },
        ))
        .unwrap();
    scene
        .add(Object::aligned_box(
            Vec3::new(-0.5, 3.5, 2.5),
            Vec3::new(1.0, 0.1, 1.0),
            Material {
                emission_power: 10.0,
                emission_colour: Vec3::broadcast(1.0),
                ..Default::default()
            },
        ))
        .unwrap();
    scene
}

fn full_resolution_pass(bencher: &mut Criterion) {
    let image_width = 64;
    let image_height = 64;

    let cubemap = Cubemap::solid_faces(16, [[180, 200, 230]; 6]);
    let camera = Camera::new(Vec3::new(0.0, 1.5, -2.0), 0.0, 0.0);
    // No workers and a preview at full resolution: every present renders one
    // complete full-resolution pass on the calling thread.
    let config = RendererConfig {
        worker_count: 0,
        preview_scale: 1,
        ..Default::default()
    };
    let renderer = Renderer::new(bench_scene(), cubemap, camera, config);
    let mut target = ImageRgbU8::new(0, 0);

    bencher.bench_function("full_resolution_pass", move |b| {
        b.iter(|| {
            renderer.invalidate();
            renderer.present(1.0, image_width, image_height, &mut target)
        })
    });
}

criterion_group!(benches, full_resolution_pass);
criterion_main!(benches);
