use std::{ io, time::Instant };

use rand::{ rngs::StdRng, SeedableRng };
use tracing::{ debug, info };

use crate::{
    body::Body,
    config::SimConfig,
    constants::G,
    control::{ GainTerm, PidGains, SharedGains },
    error::SimError,
    math::{ Vec2, Y },
    output::{ body_line, status_line, step_value },
    render::{ message, rocket_sprite, DrawContext },
    surface::GridSurface,
    transform::GridTransform,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Quit,
}

/// Owns the live bodies and the two clocks: `wall` is real elapsed time, `now` is simulation
/// time, which runs `timewarp` times faster. Everything physical or controlled uses `now`.
pub struct Simulation {
    config: SimConfig,
    bodies: Vec<Body>,
    gains: SharedGains,
    transform: GridTransform,
    rng: StdRng,
    timewarp: f64,
    now: f64, // s, simulation
    wall: f64, // s, real
    real_dt: f64, // s, last real frame time
    frame_number: usize,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Simulation {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Simulation {
            bodies: Vec::new(),
            gains: SharedGains::new(config.gains),
            transform: GridTransform::new(config.x_scale),
            rng,
            timewarp: config.timewarp,
            now: 0.0,
            wall: 0.0,
            real_dt: 0.0,
            frame_number: 0,
            config,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn add_body(&mut self, body: Body) {
        self.bodies.push(body);
    }

    pub fn sim_time(&self) -> f64 {
        self.now
    }

    pub fn timewarp(&self) -> f64 {
        self.timewarp
    }

    pub fn gains(&self) -> PidGains {
        self.gains.get()
    }

    pub fn frame_number(&self) -> usize {
        self.frame_number
    }

    /// Simulation seconds covered by `real_elapsed` wall seconds
    pub fn scaled_dt(&self, real_elapsed: f64) -> f64 {
        real_elapsed * self.timewarp
    }

    pub fn spawn_rocket(&mut self) -> Result<(), SimError> {
        let rocket = &self.config.rocket;
        let mut builder = Body::builder(rocket.spawn)
            .with_acceleration(Vec2::new(0.0, G))
            .with_renderable(rocket_sprite())
            .with_integrator(self.config.integrator)
            .with_mass(rocket.mass)
            .with_smoothing(rocket.smoothing)
            .with_debris_lifetime(rocket.fragment_lifetime);
        if rocket.autopilot {
            builder = builder.with_autopilot(rocket.target, self.gains.clone(), self.now);
        }
        let body = builder.build()?;
        info!("rocket launched at {:?}, {} bodies live", body.position, self.bodies.len() + 1);
        self.bodies.push(body);
        Ok(())
    }

    pub fn handle_key(&mut self, key: char) -> Result<FrameControl, SimError> {
        match key {
            'q' => return Ok(FrameControl::Quit),
            'W' | 'w' => {
                let warp = step_value(self.timewarp, key == 'W');
                if warp > 0.0 {
                    self.timewarp = warp;
                }
                debug!("time warp {}", self.timewarp);
            }
            'x' => {
                if let Some(index) = self.bodies.iter().position(Body::is_autopiloted) {
                    let removed = self.bodies.remove(index);
                    info!("removed autopiloted rocket at {:?}", removed.position);
                }
            }
            ' ' => self.spawn_rocket()?,
            digit if digit.is_ascii_digit() => {
                let tenths = digit.to_digit(10).unwrap_or(0) as f64;
                for body in self.bodies.iter_mut() {
                    if let Some(engine) = body.engine_mut() {
                        engine.thrust[Y] = tenths * engine.limit / 10.0;
                    }
                }
            }
            other => {
                if let Some((term, up)) = GainTerm::from_key(other) {
                    let gains = self.gains.adjust(term, up);
                    debug!("gains now {:?}", gains);
                }
            }
        }
        Ok(FrameControl::Continue)
    }

    /// Advances every body against the same instant, then swaps in the survivors and replacements
    pub fn step(&mut self, dt: f64) {
        self.now += dt;
        let now = self.now;

        let bodies = std::mem::take(&mut self.bodies);
        let mut next = Vec::with_capacity(bodies.len());
        for mut body in bodies {
            body.advance(dt, now);
            match body.constrain(&mut self.rng) {
                None => next.push(body),
                Some(replacement) => {
                    if replacement.is_empty() {
                        debug!("body at {:?} expired", body.position);
                    }
                    next.extend(replacement);
                }
            }
        }
        self.bodies = next;
        self.frame_number += 1;
    }

    pub fn render(&mut self, surface: &mut dyn GridSurface) -> io::Result<()> {
        let fps = if self.real_dt > 0.0 { 1.0 / self.real_dt } else { f64::INFINITY };
        let status = status_line(self.timewarp, fps, self.gains.get());

        let mut ctx = DrawContext { surface, transform: self.transform, wall: self.wall, rng: &mut self.rng };
        for body in self.bodies.iter() {
            body.update(&mut ctx)?;
        }

        // newest powered body just above the status line
        let engines = self.bodies.iter().rev().filter_map(|b| b.engine().map(|e| (b, e)));
        for (row, (body, engine)) in engines.enumerate() {
            message(&mut ctx, &body_line(body.velocity, engine.thrust.y), (row + 1) as f64, 0.0, false)?;
        }

        message(&mut ctx, &status, 0.0, 0.0, false)
    }

    /// One frame: input, clocks, physics, then drawing
    pub fn frame(&mut self, surface: &mut dyn GridSurface, key: Option<char>, real_elapsed: f64) -> Result<FrameControl, SimError> {
        if let Some(key) = key {
            if self.handle_key(key)? == FrameControl::Quit {
                return Ok(FrameControl::Quit)
            }
        }

        self.real_dt = real_elapsed;
        self.wall += real_elapsed;
        let dt = self.scaled_dt(real_elapsed);
        self.step(dt);

        surface.clear_all()?;
        self.render(surface)?;
        surface.refresh()?;
        Ok(FrameControl::Continue)
    }

    // run the animation until the quit key
    pub fn run(&mut self, surface: &mut dyn GridSurface) -> Result<(), SimError> {
        let mut last = Instant::now();
        loop {
            let key = surface.poll_key(self.config.poll_timeout)?;
            let real = Instant::now();
            let elapsed = real.duration_since(last).as_secs_f64();
            last = real;

            if self.frame(surface, key, elapsed)? == FrameControl::Quit {
                info!("quit after {} frames, {:.3}s simulated", self.frame_number, self.now);
                return Ok(())
            }
        }
    }
}
