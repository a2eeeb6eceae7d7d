use std::io;

use rand::rngs::StdRng;

use crate::{
    constants::*,
    control::{ Pid, SharedGains, WeightedLinear },
    crash,
    error::SimError,
    integrator::IntegrationMethod,
    math::{ Vec2, X, Y },
    output,
    render::{ self, DrawContext, Renderable },
};

/// Mass and thrust. Thrust is whatever the pilot (or autopilot) last set it to.
#[derive(Debug, Clone)]
pub struct Engine {
    pub mass: f64, // kg
    pub thrust: Vec2, // N
    pub limit: f64, // N, ceiling on commanded vertical thrust
    pub debris_lifetime: f64, // s, for the fragments left after a crash
}

impl Engine {
    /// Fraction of the thrust ceiling in use, [0, 1]
    pub fn throttle(&self) -> f64 {
        if self.limit > 0.0 {
            (self.thrust.y / self.limit).max(0.0).min(1.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone)]
pub struct Autopilot {
    pub target: Vec2,
    pub controller: Pid,
}

impl Autopilot {
    pub fn difference(&self, position: Vec2) -> f64 {
        position.y - self.target.y
    }
}

#[derive(Debug, Clone)]
pub struct Debris {
    pub rotation_speed: u32,
    pub lifetime: Option<f64>, // s, counts down once grounded
    pub spinner: Renderable,
}

#[derive(Debug, Clone)]
pub enum BodyKind {
    Plain,
    Powered(Engine),
    Autopiloted(Engine, Autopilot),
    Fragment(Debris),
}

#[derive(Debug, Clone)]
pub struct Body {
    pub position: Vec2, // m
    pub velocity: Vec2, // m/s
    pub acceleration: Vec2, // m/s^2
    pub renderable: Renderable,
    pub integrator: IntegrationMethod,
    pub kind: BodyKind,
}

impl Body {
    pub fn builder(position: Vec2) -> BodyBuilder {
        BodyBuilder {
            position,
            velocity: Vec2::zero(),
            acceleration: Vec2::zero(),
            renderable: Renderable::from("*"),
            integrator: IntegrationMethod::default(),
            mass: None,
            thrust: None,
            limit: None,
            autopilot: None,
            smoothing: DEFAULT_SMOOTHING,
            debris_lifetime: FRAGMENT_LIFETIME,
        }
    }

    /// At or below ground level
    pub fn is_grounded(&self) -> bool {
        self.position.y <= 0.0
    }

    pub fn engine(&self) -> Option<&Engine> {
        match &self.kind {
            BodyKind::Powered(engine) | BodyKind::Autopiloted(engine, _) => Some(engine),
            BodyKind::Plain | BodyKind::Fragment(_) => None,
        }
    }

    pub fn engine_mut(&mut self) -> Option<&mut Engine> {
        match &mut self.kind {
            BodyKind::Powered(engine) | BodyKind::Autopiloted(engine, _) => Some(engine),
            BodyKind::Plain | BodyKind::Fragment(_) => None,
        }
    }

    pub fn is_autopiloted(&self) -> bool {
        match self.kind {
            BodyKind::Autopiloted(..) => true,
            _ => false,
        }
    }

    /// One time step. Controller first, then physical law, then integration.
    pub fn advance(&mut self, dt: f64, now: f64) {
        let grounded = self.is_grounded();
        let resting = grounded && self.velocity.y <= 0.0;
        match &mut self.kind {
            BodyKind::Plain => {}
            BodyKind::Powered(engine) => {
                self.acceleration = net_acceleration(engine, resting);
            }
            BodyKind::Autopiloted(engine, autopilot) => {
                let error = autopilot.difference(self.position);
                let percent = autopilot.controller.update(0.0, error, now);
                engine.thrust[Y] = engine.limit * percent / 100.0;
                self.acceleration = net_acceleration(engine, resting);
            }
            BodyKind::Fragment(debris) => {
                if grounded {
                    if let Some(lifetime) = debris.lifetime.as_mut() {
                        *lifetime -= dt;
                    }
                }
            }
        }
        self.integrate(dt);
    }

    fn integrate(&mut self, dt: f64) {
        let (position, velocity) = self.integrator.step(self.position, self.velocity, self.acceleration, dt);
        self.position = position;
        self.velocity = velocity;
    }

    /// Ground contact and end of life. `None` keeps the body as is, `Some` replaces it with
    /// the returned bodies; an empty list removes it.
    pub fn constrain(&mut self, rng: &mut StdRng) -> Option<Vec<Body>> {
        match &self.kind {
            BodyKind::Powered(engine) | BodyKind::Autopiloted(engine, _) => {
                if crash::is_crash(self) {
                    return Some(crash::decompose(self, engine.debris_lifetime, rng))
                }
            }
            BodyKind::Fragment(debris) => {
                if debris.lifetime.map_or(false, |t| t <= 0.0) {
                    return Some(Vec::new())
                }
            }
            BodyKind::Plain => {}
        }
        self.rest_on_ground();
        None
    }

    /// Stops a body moving down through the ground, where it is
    fn rest_on_ground(&mut self) {
        if self.position.y <= 0.0 && self.velocity.y < 0.0 {
            self.position[Y] = 0.0;
            self.velocity = Vec2::zero();
            self.acceleration = Vec2::zero();
        }
    }

    pub fn update(&self, ctx: &mut DrawContext) -> io::Result<()> {
        match &self.kind {
            BodyKind::Plain => self.renderable.draw(ctx, self.position, None, false),
            BodyKind::Powered(engine) => self.draw_rocket(ctx, engine),
            BodyKind::Autopiloted(engine, autopilot) => {
                self.draw_rocket(ctx, engine)?;
                let line = output::autopilot_line(&autopilot.controller, engine.limit, self.acceleration.y, self.velocity.y);
                render::message(ctx, &line, self.position[Y], self.position[X] + 3.0, true)
            }
            BodyKind::Fragment(debris) => {
                if self.is_grounded() {
                    self.renderable.draw(ctx, self.position, None, false)
                } else {
                    debris.spinner.draw(ctx, self.position, None, false)
                }
            }
        }
    }

    fn draw_rocket(&self, ctx: &mut DrawContext, engine: &Engine) -> io::Result<()> {
        // nose and first flame always show, the rest of the plume scales with throttle
        let plume = self.renderable.stage_count().saturating_sub(2);
        let stages = 2 + (plume as f64 * engine.throttle()).round() as usize;
        self.renderable.draw_stages(ctx, self.position, stages)
    }
}

/// Thrust in kg.m/s^2 over mass in kg, plus gravity. A body resting on the ground
/// is held up by it until thrust beats weight.
fn net_acceleration(engine: &Engine, resting: bool) -> Vec2 {
    let mut acceleration = engine.thrust / engine.mass;
    acceleration[Y] += G;
    if resting && acceleration.y < 0.0 {
        acceleration[Y] = 0.0;
    }
    acceleration
}

/// Constructs then validates a new Body
pub struct BodyBuilder {
    position: Vec2,
    velocity: Vec2,
    acceleration: Vec2,
    renderable: Renderable,
    integrator: IntegrationMethod,
    mass: Option<f64>,
    thrust: Option<Vec2>,
    limit: Option<f64>,
    autopilot: Option<(Vec2, SharedGains, f64)>,
    smoothing: f64,
    debris_lifetime: f64,
}

impl BodyBuilder {
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec2) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_renderable(mut self, renderable: Renderable) -> Self {
        self.renderable = renderable;
        self
    }

    pub fn with_integrator(mut self, integrator: IntegrationMethod) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    pub fn with_thrust(mut self, thrust: Vec2) -> Self {
        self.thrust = Some(thrust);
        self
    }

    pub fn with_thrust_limit(mut self, limit: f64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Steer for `target` altitude, with the controller's clock starting at `now`
    pub fn with_autopilot(mut self, target: Vec2, gains: SharedGains, now: f64) -> Self {
        self.autopilot = Some((target, gains, now));
        self
    }

    pub fn with_smoothing(mut self, interval: f64) -> Self {
        self.smoothing = interval;
        self
    }

    pub fn with_debris_lifetime(mut self, lifetime: f64) -> Self {
        self.debris_lifetime = lifetime;
        self
    }

    pub fn build(self) -> Result<Body, SimError> {
        for &(field, value) in [("position", self.position), ("velocity", self.velocity), ("acceleration", self.acceleration)].iter() {
            if !value.is_finite() {
                return Err(SimError::NonFinite { field, value })
            }
        }

        let needs_mass = if self.autopilot.is_some() {
            Some("autopilot")
        } else if self.thrust.is_some() || self.limit.is_some() {
            Some("thrust")
        } else {
            None
        };

        let mass = match (self.mass, needs_mass) {
            (None, Some(what)) => return Err(SimError::MissingMass(what)),
            (None, None) => None,
            (Some(mass), _) if !mass.is_finite() || mass <= 0.0 => return Err(SimError::InvalidMass(mass)),
            (Some(mass), _) => Some(mass),
        };

        let kind = match mass {
            None => BodyKind::Plain,
            Some(mass) => {
                let thrust = self.thrust.unwrap_or_default();
                if !thrust.is_finite() {
                    return Err(SimError::NonFinite { field: "thrust", value: thrust })
                }
                let limit = self.limit.unwrap_or(THRUST_LIMIT_WEIGHTS * -G * mass);
                if !limit.is_finite() || limit < 0.0 {
                    return Err(SimError::InvalidThrustLimit(limit))
                }
                if !self.debris_lifetime.is_finite() || self.debris_lifetime <= 0.0 {
                    return Err(SimError::InvalidConfig {
                        option: "fragment-lifetime",
                        value: self.debris_lifetime.to_string(),
                        reason: "must be greater than zero".to_string(),
                    })
                }
                let engine = Engine { mass, thrust, limit, debris_lifetime: self.debris_lifetime };

                match self.autopilot {
                    None => BodyKind::Powered(engine),
                    Some((target, gains, now)) => {
                        if !self.smoothing.is_finite() || self.smoothing <= 0.0 {
                            return Err(SimError::InvalidConfig {
                                option: "smoothing",
                                value: self.smoothing.to_string(),
                                reason: "must be greater than zero".to_string(),
                            })
                        }
                        let filter = WeightedLinear::new(self.smoothing, 0.0, now);
                        let controller = Pid::new(gains, filter, THRUST_PERCENT_LIMITS, now);
                        BodyKind::Autopiloted(engine, Autopilot { target, controller })
                    }
                }
            }
        };

        Ok(Body {
            position: self.position,
            velocity: self.velocity,
            acceleration: self.acceleration,
            renderable: self.renderable,
            integrator: self.integrator,
            kind,
        })
    }
}
