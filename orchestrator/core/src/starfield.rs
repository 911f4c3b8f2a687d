//! Frame Animator - Perspective Particle Field
//!
//! Simulates point particles travelling along a depth axis towards a
//! virtual camera, projected onto a [`DrawSurface`] with a pinhole model:
//!
//! ```text
//! screen_x = (x - cx) * (width / depth) + cx
//! screen_y = (y - cy) * (width / depth) + cy
//! ```
//!
//! Updating ([`FrameAnimator::step`]) and drawing ([`FrameAnimator::draw`])
//! are separate so the simulation is testable without a surface. Speeds are
//! expressed per reference frame (1/60 s) and scaled by the real delta.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::surface::{DrawSurface, Rgba, SurfaceSize};

/// Frame rate the per-frame speeds and acceleration are calibrated for
pub const REFERENCE_FPS: f32 = 60.0;

/// Particles are never projected closer than this
const MIN_DEPTH: f32 = 0.1;

/// How a particle field is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStyle {
    /// Round dots growing brighter as they approach (ambient starfield)
    Dots,
    /// Lines from the previous projected position (warp streaks)
    Streaks,
}

/// Tuning for one particle field
#[derive(Clone, Debug, PartialEq)]
pub struct StarfieldConfig {
    /// Number of particles
    pub particle_count: usize,
    /// Depth travelled per reference frame at start
    pub initial_speed: f32,
    /// Speed multiplier per reference frame (1.0 = constant speed)
    pub acceleration: f32,
    /// Upper bound for the speed
    pub max_speed: f32,
    /// Drawing style
    pub style: RenderStyle,
    /// Particle color
    pub color: Rgba,
    /// Alpha of the black fill laid down before each frame (1.0 = clear)
    pub trail_alpha: f32,
}

impl StarfieldConfig {
    /// Slow, constant-speed starfield behind the hub and boot screen
    #[must_use]
    pub fn ambient(particle_count: usize) -> Self {
        Self {
            particle_count,
            initial_speed: 0.5,
            acceleration: 1.0,
            max_speed: 0.5,
            style: RenderStyle::Dots,
            color: Rgba::WHITE,
            trail_alpha: 1.0,
        }
    }

    /// Accelerating streak field used by the warp overlay
    #[must_use]
    pub fn warp(particle_count: usize) -> Self {
        Self {
            particle_count,
            initial_speed: 2.0,
            acceleration: 1.05,
            max_speed: 50.0,
            style: RenderStyle::Streaks,
            color: Rgba::COSMIC_CYAN,
            trail_alpha: 0.3,
        }
    }
}

/// One simulated point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// World x, in surface pixels
    pub x: f32,
    /// World y, in surface pixels
    pub y: f32,
    /// Distance from the camera (always > 0 after a step)
    pub depth: f32,
    /// Base dot size
    pub size: f32,
}

/// Project a world point at `depth` to screen coordinates
#[must_use]
pub fn project(x: f32, y: f32, depth: f32, size: SurfaceSize) -> (f32, f32) {
    let (cx, cy) = size.center();
    let focal = size.width.max(1) as f32;
    let depth = depth.max(MIN_DEPTH);
    let scale = focal / depth;
    ((x - cx) * scale + cx, (y - cy) * scale + cy)
}

/// Move every particle `travel` units closer, recycling those that pass
/// the camera to the far plane at a fresh random position.
pub fn advance_particles<R: Rng>(
    particles: &mut [Particle],
    travel: f32,
    size: SurfaceSize,
    rng: &mut R,
) {
    let max_depth = far_plane(size);
    for particle in particles.iter_mut() {
        particle.depth -= travel;
        if particle.depth <= 0.0 || !particle.depth.is_finite() {
            particle.depth = max_depth;
            particle.x = random_coordinate(rng, size.width);
            particle.y = random_coordinate(rng, size.height);
        }
    }
}

fn far_plane(size: SurfaceSize) -> f32 {
    size.width.max(1) as f32
}

fn random_coordinate<R: Rng>(rng: &mut R, extent: u32) -> f32 {
    if extent == 0 {
        0.0
    } else {
        rng.gen_range(0.0..extent as f32)
    }
}

/// Runs a particle field and draws it once per frame
#[derive(Debug)]
pub struct FrameAnimator {
    config: StarfieldConfig,
    rng: StdRng,
    particles: Vec<Particle>,
    speed: f32,
    size: SurfaceSize,
    running: bool,
}

impl FrameAnimator {
    /// Create a stopped animator. A seed makes particle placement reproducible.
    #[must_use]
    pub fn new(config: StarfieldConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let speed = config.initial_speed;

        Self {
            config,
            rng,
            particles: Vec::new(),
            speed,
            size: SurfaceSize::default(),
            running: false,
        }
    }

    /// Seed the particle set and begin animating
    pub fn start(&mut self, size: SurfaceSize) {
        self.size = size;
        self.speed = self.config.initial_speed;

        let max_depth = far_plane(size).max(MIN_DEPTH);
        let mut particles = Vec::with_capacity(self.config.particle_count);
        for _ in 0..self.config.particle_count {
            particles.push(Particle {
                x: random_coordinate(&mut self.rng, size.width),
                y: random_coordinate(&mut self.rng, size.height),
                depth: self.rng.gen_range(MIN_DEPTH..=max_depth),
                size: self.rng.gen_range(0.0..2.0),
            });
        }
        self.particles = particles;
        self.running = true;
    }

    /// Stop animating and drop the particle set. Idempotent.
    ///
    /// Once this returns, [`FrameAnimator::draw`] issues no drawing calls.
    pub fn stop(&mut self) {
        self.running = false;
        self.particles.clear();
        self.speed = self.config.initial_speed;
    }

    /// Apply a new surface size without reseeding particles
    pub fn resize(&mut self, size: SurfaceSize) {
        if self.size != size {
            tracing::debug!(width = size.width, height = size.height, "Starfield resized");
            self.size = size;
        }
    }

    /// Advance the simulation by `dt`
    pub fn step(&mut self, dt: Duration) {
        if !self.running {
            return;
        }

        let frames = dt.as_secs_f32() * REFERENCE_FPS;
        if frames <= 0.0 {
            return;
        }

        if self.config.acceleration > 1.0 && self.speed < self.config.max_speed {
            self.speed =
                (self.speed * self.config.acceleration.powf(frames)).min(self.config.max_speed);
        }

        advance_particles(
            &mut self.particles,
            self.speed * frames,
            self.size,
            &mut self.rng,
        );
    }

    /// Draw the current state. A missing surface makes this a no-op.
    pub fn draw(&self, surface: Option<&mut dyn DrawSurface>) {
        let Some(surface) = surface else {
            return;
        };
        if !self.running {
            return;
        }

        let bounds = surface.size();
        if bounds.is_empty() {
            return;
        }

        surface.fill(Rgba::BLACK.with_alpha(self.config.trail_alpha));

        let max_depth = far_plane(self.size);
        for particle in &self.particles {
            if particle.depth <= 0.0 {
                continue;
            }

            let (x, y) = project(particle.x, particle.y, particle.depth, self.size);
            if !bounds.contains(x, y) {
                continue;
            }

            let closeness = (1.0 - particle.depth / max_depth).clamp(0.0, 1.0);
            match self.config.style {
                RenderStyle::Dots => {
                    let radius = closeness * particle.size * 2.0;
                    surface.fill_circle(x, y, radius, self.config.color.with_alpha(closeness));
                }
                RenderStyle::Streaks => {
                    let trail_depth = particle.depth + self.speed * 2.0;
                    let from = project(particle.x, particle.y, trail_depth, self.size);
                    surface.stroke_line(from, (x, y), 2.0, self.config.color);
                }
            }
        }
    }

    /// Whether the loop is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current speed in depth units per reference frame
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current particle set
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Surface size the projection is computed for
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Configuration this animator was built with
    #[must_use]
    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};

    const FRAME: Duration = Duration::from_micros(16_667);

    fn ambient() -> FrameAnimator {
        let mut animator = FrameAnimator::new(StarfieldConfig::ambient(800), Some(7));
        animator.start(SurfaceSize::new(120, 40));
        animator
    }

    #[test]
    fn test_start_seeds_particles_in_range() {
        let animator = ambient();
        assert_eq!(animator.particles().len(), 800);
        for p in animator.particles() {
            assert!(p.depth > 0.0 && p.depth <= 120.0);
            assert!(p.x >= 0.0 && p.x < 120.0);
            assert!(p.y >= 0.0 && p.y < 40.0);
        }
    }

    #[test]
    fn test_step_recycles_before_projection() {
        let mut animator = FrameAnimator::new(StarfieldConfig::warp(500), Some(3));
        animator.start(SurfaceSize::new(80, 24));

        for _ in 0..200 {
            animator.step(FRAME);
            assert!(animator.particles().iter().all(|p| p.depth > 0.0));
        }
    }

    #[test]
    fn test_warp_speed_ramps_and_caps() {
        let mut animator = FrameAnimator::new(StarfieldConfig::warp(10), Some(1));
        animator.start(SurfaceSize::new(80, 24));

        let mut last = animator.speed();
        for _ in 0..30 {
            animator.step(FRAME);
            assert!(animator.speed() >= last);
            last = animator.speed();
        }
        assert!(last > 2.0);

        animator.step(Duration::from_secs(5));
        assert!((animator.speed() - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ambient_speed_is_constant() {
        let mut animator = ambient();
        animator.step(Duration::from_secs(3));
        assert!((animator.speed() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_draw_without_surface_is_noop() {
        let animator = ambient();
        animator.draw(None);
    }

    #[test]
    fn test_draw_stays_in_bounds() {
        let mut animator = FrameAnimator::new(StarfieldConfig::warp(500), Some(11));
        animator.start(SurfaceSize::new(80, 24));
        let mut surface = RecordingSurface::new(80, 24);

        for _ in 0..60 {
            animator.step(FRAME);
            animator.draw(Some(&mut surface));
        }

        for op in surface.ops() {
            match *op {
                DrawOp::Line { to, .. } => {
                    assert!(to.0 >= 0.0 && to.0 < 80.0 && to.1 >= 0.0 && to.1 < 24.0);
                    assert!(to.0.is_finite() && to.1.is_finite());
                }
                DrawOp::Circle { x, y, .. } => {
                    assert!(x >= 0.0 && x < 80.0 && y >= 0.0 && y < 24.0);
                }
                DrawOp::Fill(_) => {}
            }
        }
    }

    #[test]
    fn test_no_draw_after_stop() {
        let mut animator = ambient();
        let mut surface = RecordingSurface::new(120, 40);
        animator.draw(Some(&mut surface));
        assert!(!surface.ops().is_empty());

        animator.stop();
        animator.stop();
        surface.clear();
        animator.step(FRAME);
        animator.draw(Some(&mut surface));

        assert!(surface.ops().is_empty());
        assert!(animator.particles().is_empty());
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut animator = ambient();
        let before: Vec<Particle> = animator.particles().to_vec();

        animator.resize(SurfaceSize::new(200, 60));

        assert_eq!(animator.size(), SurfaceSize::new(200, 60));
        assert_eq!(animator.particles(), before.as_slice());
    }

    #[test]
    fn test_projection_at_far_plane_is_identity() {
        let size = SurfaceSize::new(100, 50);
        let (x, y) = project(30.0, 10.0, 100.0, size);
        assert!((x - 30.0).abs() < 1e-4);
        assert!((y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_projection_never_divides_by_zero() {
        let (x, y) = project(10.0, 10.0, 0.0, SurfaceSize::new(100, 50));
        assert!(x.is_finite() && y.is_finite());
    }

    #[test]
    fn test_zero_sized_surface_is_safe() {
        let mut animator = FrameAnimator::new(StarfieldConfig::ambient(20), Some(5));
        animator.start(SurfaceSize::new(0, 0));
        animator.step(FRAME);
        let mut surface = RecordingSurface::new(0, 0);
        animator.draw(Some(&mut surface));
        assert!(surface.ops().is_empty());
    }
}
