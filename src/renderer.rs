use crate::accumulation_buffer::AccumulationBuffer;
use crate::camera::{Camera, MoveDirection};
use crate::cubemap::Cubemap;
use crate::image::{ClampingToneMapper, ImageRgbU8, ToneMapper};
use crate::integrators::{PathTracer, TracerConfig};
use crate::math::Vec3;
use crate::scene::Scene;
use crate::util::{Array2D, CoarseCell, CoarseGrid};

use log::{debug, info};
use rayon::prelude::*;

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

#[derive(Clone, Copy, Debug)]
pub struct RendererConfig {
    /// Number of persistent render workers
    pub worker_count: usize,
    /// Cap on the per-worker coarseness ladder
    pub max_worker_scale: usize,
    /// Coarseness of the preview seeded by the presenter
    pub preview_scale: usize,
    pub tracer: TracerConfig,
}

impl Default for RendererConfig {
    fn default() -> RendererConfig {
        RendererConfig {
            worker_count: 16,
            max_worker_scale: 16,
            preview_scale: 16,
            tracer: TracerConfig::default(),
        }
    }
}

/// Everything the frame mutex protects.
///
/// `generation` marks the current epoch of accumulated samples: camera
/// changes and resizes bump it, and workers may only merge results produced
/// while it was unchanged. The invariant maintained throughout is that a
/// zero accumulator weight implies all-zero pixel sums.
struct SharedState {
    frame: Array2D<Vec3>,
    accum: AccumulationBuffer,
    generation: u32,
    camera: Camera,
    shutdown: bool,
}

/// What a worker learns from the shared state when it synchronizes.
struct WorkerView {
    width: usize,
    height: usize,
    camera: Camera,
    shutdown: bool,
}

/// Owns the scene, the environment and the shared accumulation state, and
/// coordinates render workers with the presentation loop.
pub struct Renderer {
    scene: Scene,
    cubemap: Cubemap,
    config: RendererConfig,
    shared: Mutex<SharedState>,
}

impl Renderer {
    pub fn new(scene: Scene, cubemap: Cubemap, camera: Camera, config: RendererConfig) -> Renderer {
        Renderer {
            scene,
            cubemap,
            config,
            shared: Mutex::new(SharedState {
                frame: Array2D::new(0, 0),
                accum: AccumulationBuffer::new(0, 0),
                generation: 0,
                camera,
                shutdown: false,
            }),
        }
    }

    /// Spawn the worker pool. Workers run until [shutdown](Renderer::shutdown).
    ///
    /// Worker `i` renders at coarseness `min(2^i, max_worker_scale)`, so the
    /// coarsest workers refresh the whole frame quickly while worker 0
    /// supplies full-resolution samples.
    pub fn spawn_workers(renderer: &Arc<Renderer>) -> Vec<JoinHandle<()>> {
        let count = renderer.config.worker_count;
        info!("spawning {} render workers", count);
        (0..count)
            .map(|index| {
                let renderer = Arc::clone(renderer);
                let scale = renderer.worker_scale(index);
                std::thread::spawn(move || renderer.worker_loop(scale))
            })
            .collect()
    }

    fn worker_scale(&self, index: usize) -> usize {
        let mut scale = 1;
        for _ in 0..index {
            scale = (scale * 2).min(self.config.max_worker_scale);
        }
        scale
    }

    fn worker_loop(&self, scale: usize) {
        let mut local: Option<AccumulationBuffer> = None;
        let mut seen_generation = 0;
        loop {
            let view = self.sync_with_shared(local.as_mut(), &mut seen_generation);
            if view.shutdown {
                return;
            }
            if view.width == 0 || view.height == 0 {
                // The presenter has not sized the buffers yet.
                std::thread::sleep(Duration::from_millis(1));
                continue;
            }
            let needs_alloc = match local {
                Some(ref buffer) => {
                    buffer.width() != view.width || buffer.height() != view.height
                }
                None => true,
            };
            if needs_alloc {
                local = Some(AccumulationBuffer::new(view.width, view.height));
            }
            if let Some(ref mut buffer) = local {
                self.render_pass(&view.camera, scale, buffer);
            }
        }
    }

    /// Merge a finished pass into the shared accumulator, or discard it.
    ///
    /// The local sum only counts if it was produced entirely within the
    /// generation the shared state is still in, at the dimensions the shared
    /// buffers still have; otherwise it is stale and dropped. Either way the
    /// local buffer is zeroed and the worker's cached generation refreshed.
    fn sync_with_shared(
        &self,
        local: Option<&mut AccumulationBuffer>,
        seen_generation: &mut u32,
    ) -> WorkerView {
        let mut shared = self.shared.lock().unwrap();
        if let Some(local) = local {
            if *seen_generation == shared.generation
                && local.width() == shared.accum.width()
                && local.height() == shared.accum.height()
            {
                shared.accum.add(local);
            }
            local.reset();
        }
        *seen_generation = shared.generation;
        WorkerView {
            width: shared.accum.width(),
            height: shared.accum.height(),
            camera: shared.camera,
            shutdown: shared.shutdown,
        }
    }

    /// Render one full pass at the given coarseness into `local`.
    ///
    /// Every coarse cell gets a single radiance estimate splatted over its
    /// `scale x scale` pixels, weighted so a complete pass contributes one
    /// sample-equivalent at full resolution on average.
    fn render_pass(&self, camera: &Camera, scale: usize, local: &mut AccumulationBuffer) {
        let width = local.width();
        let height = local.height();
        let aspect_ratio = width as f32 / height as f32;
        let cell_weight = 1.0 / (scale * scale) as f32;
        let tracer = PathTracer::new(&self.scene, &self.cubemap, self.config.tracer);
        let grid = CoarseGrid::new(width, height, scale);
        for cell in grid.cells() {
            let (u, v) = grid.screen_uv(&cell);
            let colour = tracer.sample_pixel(camera, u, v, aspect_ratio);
            local.splat(&cell.pixels, &colour, cell_weight);
        }
        local.add_weight(cell_weight);
    }

    /// Seed a very coarse estimate straight into the shared accumulator.
    ///
    /// Runs on the presenter thread whenever accumulation is empty, so the
    /// user sees an image on the first tick after any invalidation. The
    /// cells are independent, which makes this a natural parallel map.
    fn seed_preview(&self, camera: &Camera, accum: &mut AccumulationBuffer) {
        let width = accum.width();
        let height = accum.height();
        let aspect_ratio = width as f32 / height as f32;
        let scale = self.config.preview_scale;
        let cell_weight = 1.0 / (scale * scale) as f32;
        let tracer = PathTracer::new(&self.scene, &self.cubemap, self.config.tracer);
        let grid = CoarseGrid::new(width, height, scale);
        let samples: Vec<(CoarseCell, Vec3)> = grid
            .cells()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|cell| {
                let (u, v) = grid.screen_uv(&cell);
                (cell, tracer.sample_pixel(camera, u, v, aspect_ratio))
            })
            .collect();
        for (cell, colour) in samples.iter() {
            accum.splat(&cell.pixels, colour, cell_weight);
        }
        accum.add_weight(cell_weight);
    }

    /// Produce the current display image.
    ///
    /// Resizes the shared buffers if the requested dimensions changed (which
    /// implicitly invalidates), seeds a preview if accumulation is empty,
    /// then normalizes into the frame and tone-maps it into `target`.
    /// Returns the frame dimensions.
    pub fn present(
        &self,
        resolution_scale: f32,
        screen_width: usize,
        screen_height: usize,
        target: &mut ImageRgbU8,
    ) -> (usize, usize) {
        let frame_width = ((screen_width as f32 * resolution_scale).round() as usize).max(1);
        let frame_height = ((screen_height as f32 * resolution_scale).round() as usize).max(1);
        let mut shared = self.shared.lock().unwrap();
        let state = &mut *shared;
        if state.accum.width() != frame_width || state.accum.height() != frame_height {
            debug!("resizing frame buffers to {}x{}", frame_width, frame_height);
            state.frame = Array2D::new(frame_height, frame_width);
            state.accum = AccumulationBuffer::new(frame_width, frame_height);
            state.generation = state.generation.wrapping_add(1);
        }
        if state.accum.is_empty() {
            let camera = state.camera;
            self.seed_preview(&camera, &mut state.accum);
        }
        state.accum.normalize_into(&mut state.frame);
        target.resize(frame_width, frame_height);
        ClampingToneMapper {}.apply_tone_mapping(&state.frame, target);
        (frame_width, frame_height)
    }

    /// Run `f` against the most recently presented linear-RGB frame.
    ///
    /// Collaborators that want linear values rather than the tone-mapped
    /// bytes read them here, under the frame mutex.
    pub fn with_frame<R>(&self, f: impl FnOnce(&Array2D<Vec3>) -> R) -> R {
        let shared = self.shared.lock().unwrap();
        f(&shared.frame)
    }

    /// Discard all accumulated samples and start a new generation.
    pub fn invalidate(&self) {
        let mut shared = self.shared.lock().unwrap();
        Self::invalidate_locked(&mut shared);
    }

    fn invalidate_locked(shared: &mut SharedState) {
        shared.accum.reset();
        shared.generation = shared.generation.wrapping_add(1);
    }

    /// Translate the camera and invalidate, in one critical section.
    pub fn move_camera(&self, direction: MoveDirection, speed: f32) {
        let mut shared = self.shared.lock().unwrap();
        shared.camera.move_by(direction, speed);
        Self::invalidate_locked(&mut shared);
    }

    /// Turn the camera and invalidate, in one critical section.
    pub fn rotate_camera(&self, delta_yaw: f32, delta_pitch: f32) {
        let mut shared = self.shared.lock().unwrap();
        shared.camera.rotate(delta_yaw, delta_pitch);
        Self::invalidate_locked(&mut shared);
    }

    /// Ask all workers to exit; pending passes are abandoned at their next
    /// merge attempt.
    pub fn shutdown(&self) {
        let mut shared = self.shared.lock().unwrap();
        shared.shutdown = true;
    }

    /// Total sample weight accumulated so far, in full-resolution
    /// sample-equivalents.
    pub fn accumulated_weight(&self) -> f32 {
        self.shared.lock().unwrap().accum.weight()
    }

    pub fn generation(&self) -> u32 {
        self.shared.lock().unwrap().generation
    }
}
