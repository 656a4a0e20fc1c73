use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::Canvas;
use sdl2::Sdl;

use clap::Arg;
use log::info;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use vermeer::camera::{Camera, MoveDirection};
use vermeer::cubemap::Cubemap;
use vermeer::image::ImageRgbU8;
use vermeer::materials::Material;
use vermeer::math::Vec3;
use vermeer::renderer::{Renderer, RendererConfig};
use vermeer::scene::{Object, Scene, SceneError};

const MOVE_SPEED: f32 = 0.08;
const MOUSE_SENSITIVITY: f32 = 0.003;

const MOVE_BINDINGS: [(Scancode, MoveDirection); 6] = [
    (Scancode::W, MoveDirection::Forward),
    (Scancode::S, MoveDirection::Backward),
    (Scancode::A, MoveDirection::Left),
    (Scancode::D, MoveDirection::Right),
    (Scancode::Space, MoveDirection::Up),
    (Scancode::LShift, MoveDirection::Down),
];

#[derive(Debug)]
struct CommandLineParameters {
    width: usize,
    height: usize,
    skybox_dir: PathBuf,
    workers: usize,
    output_file: Option<PathBuf>,
}

fn parse_args() -> CommandLineParameters {
    let matches = clap::App::new("vermeer")
        .version("alpha")
        .about("Interactive progressive path tracer.")
        .arg(
            Arg::with_name("size")
                .long("size")
                .value_name("SIZE")
                .help("The width and height of the window, in pixels.")
                .takes_value(true)
                .number_of_values(2)
                .required(false),
        )
        .arg(
            Arg::with_name("skybox")
                .long("skybox")
                .value_name("DIRECTORY")
                .help("Directory with the six cubemap faces named right, left, top, bottom, front, back.")
                .takes_value(true)
                .required(true),
        )
        .arg(
            Arg::with_name("workers")
                .long("workers")
                .value_name("COUNT")
                .help("Number of render worker threads.")
                .takes_value(true)
                .default_value("16"),
        )
        .arg(
            Arg::with_name("output_png")
                .long("out")
                .value_name("FILENAME")
                .help("Write the final frame to this PNG on exit.")
                .takes_value(true)
                .required(false),
        )
        .get_matches();
    let (width, height) = match matches.values_of("size") {
        Some(mut size_iter) => (
            size_iter.next().unwrap().parse().unwrap(),
            size_iter.next().unwrap().parse().unwrap(),
        ),
        None => (960, 540),
    };
    let skybox_dir = PathBuf::from(matches.value_of_os("skybox").unwrap());
    let workers = matches.value_of("workers").unwrap().parse().unwrap();
    let output_file = matches.value_of_os("output_png").map(PathBuf::from);
    CommandLineParameters {
        width,
        height,
        skybox_dir,
        workers,
        output_file,
    }
}

/// A Cornell-style room, open towards the camera, with three spheres and a
/// ceiling light.
fn build_scene() -> Result<Scene, SceneError> {
    let mut scene = Scene::new();
    let matte = |albedo| Material {
        albedo,
        roughness: 1.0,
        reflectance: 0.1,
        metallic: 0.0,
        ..Default::default()
    };

    // Room shell: interior spans [-3, 3] x [0, 4] x [-2, 6].
    scene.add(Object::aligned_box(
        Vec3::new(-3.2, -0.2, -2.2),
        Vec3::new(6.4, 0.2, 8.4),
        matte(Vec3::broadcast(0.8)),
    ))?;
    scene.add(Object::aligned_box(
        Vec3::new(-3.2, 4.0, -2.2),
        Vec3::new(6.4, 0.2, 8.4),
        matte(Vec3::broadcast(0.8)),
    ))?;
    scene.add(Object::aligned_box(
        Vec3::new(-3.2, -0.2, -2.2),
        Vec3::new(0.2, 4.4, 8.4),
        matte(Vec3::new(0.85, 0.1, 0.1)),
    ))?;
    scene.add(Object::aligned_box(
        Vec3::new(3.0, -0.2, -2.2),
        Vec3::new(0.2, 4.4, 8.4),
        matte(Vec3::new(0.1, 0.8, 0.15)),
    ))?;
    scene.add(Object::aligned_box(
        Vec3::new(-3.2, -0.2, 6.0),
        Vec3::new(6.4, 4.4, 0.2),
        matte(Vec3::broadcast(0.8)),
    ))?;

    // Ceiling light
    scene.add(Object::aligned_box(
        Vec3::new(-0.75, 3.85, 1.25),
        Vec3::new(1.5, 0.15, 1.5),
        Material {
            albedo: Vec3::broadcast(1.0),
            emission_power: 12.0,
            emission_colour: Vec3::new(1.0, 0.96, 0.88),
            ..Default::default()
        },
    ))?;

    scene.add(Object::sphere(
        Vec3::new(-1.5, 1.0, 3.5),
        1.0,
        matte(Vec3::new(0.25, 0.35, 0.85)),
    ))?;
    scene.add(Object::sphere(
        Vec3::new(1.4, 1.0, 4.4),
        1.0,
        Material {
            albedo: Vec3::broadcast(0.95),
            roughness: 0.02,
            metallic: 1.0,
            ..Default::default()
        },
    ))?;
    scene.add(Object::sphere(
        Vec3::new(0.2, 0.6, 2.0),
        0.6,
        Material {
            albedo: Vec3::new(0.9, 0.7, 0.3),
            roughness: 0.35,
            metallic: 1.0,
            ..Default::default()
        },
    ))?;

    Ok(scene)
}

fn init_canvas(
    window_width: usize,
    window_height: usize,
) -> Result<(Sdl, Canvas<sdl2::video::Window>), Box<dyn std::error::Error>> {
    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window("vermeer", window_width as u32, window_height as u32)
        .position_centered()
        .resizable()
        .build()?;

    let canvas = window.into_canvas().build()?;

    Ok((sdl_context, canvas))
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let parameters = parse_args();

    info!("loading skybox from {}", parameters.skybox_dir.display());
    let cubemap = Cubemap::load(&parameters.skybox_dir)?;
    let scene = build_scene()?;
    let camera = Camera::new(Vec3::new(0.0, 1.8, -1.0), 0.0, 0.0);

    let config = RendererConfig {
        worker_count: parameters.workers,
        ..Default::default()
    };
    let renderer = Arc::new(Renderer::new(scene, cubemap, camera, config));
    let workers = Renderer::spawn_workers(&renderer);

    let (sdl_context, mut canvas) = init_canvas(parameters.width, parameters.height)?;
    sdl_context.mouse().set_relative_mouse_mode(true);

    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator.create_texture_streaming(
        PixelFormatEnum::RGB24,
        parameters.width as u32,
        parameters.height as u32,
    )?;
    let mut texture_size = (parameters.width, parameters.height);

    let mut screen_width = parameters.width;
    let mut screen_height = parameters.height;
    let mut display_image = ImageRgbU8::new(0, 0);
    let mut event_pump = sdl_context.event_pump()?;
    let mut last_title_update = Instant::now();

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::MouseMotion { xrel, yrel, .. } => {
                    if xrel != 0 || yrel != 0 {
                        renderer.rotate_camera(
                            xrel as f32 * MOUSE_SENSITIVITY,
                            -(yrel as f32) * MOUSE_SENSITIVITY,
                        );
                    }
                }
                Event::Window {
                    win_event: WindowEvent::SizeChanged(new_width, new_height),
                    ..
                } => {
                    screen_width = new_width.max(1) as usize;
                    screen_height = new_height.max(1) as usize;
                }
                _ => {}
            }
        }

        let keyboard = event_pump.keyboard_state();
        for (scancode, direction) in MOVE_BINDINGS.iter() {
            if keyboard.is_scancode_pressed(*scancode) {
                renderer.move_camera(*direction, MOVE_SPEED);
            }
        }

        let (frame_width, frame_height) =
            renderer.present(1.0, screen_width, screen_height, &mut display_image);
        if texture_size != (frame_width, frame_height) {
            texture = texture_creator.create_texture_streaming(
                PixelFormatEnum::RGB24,
                frame_width as u32,
                frame_height as u32,
            )?;
            texture_size = (frame_width, frame_height);
        }
        texture.update(
            None,
            display_image.get_pixel_data(),
            frame_width * ImageRgbU8::num_channels(),
        )?;
        canvas.copy(&texture, None, None)?;
        canvas.present();

        if last_title_update.elapsed() >= Duration::from_secs(1) {
            let title = format!("vermeer - {:.1} samples/pixel", renderer.accumulated_weight());
            canvas.window_mut().set_title(&title).ok();
            last_title_update = Instant::now();
        }

        ::std::thread::sleep(Duration::new(0, 1_000_000_000u32 / 60));
    }

    renderer.shutdown();
    for worker in workers {
        worker.join().expect("Couldn't join worker threads.");
    }

    if let Some(output_file) = parameters.output_file {
        info!("writing final frame to {}", output_file.display());
        display_image.write_png(&output_file)?;
    }
    Ok(())
}
