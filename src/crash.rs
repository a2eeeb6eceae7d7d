use rand::{ rngs::StdRng, seq::SliceRandom, Rng };
use tracing::info;

use crate::{
    body::{ Body, BodyKind, Debris },
    constants::*,
    math::{ Vec2, X },
    render::Renderable,
};

/// Touched down faster than the rocket can take
pub fn is_crash(body: &Body) -> bool {
    body.position.y <= 0.0 && body.velocity.y < CRASH_SPEED
}

/// Breaks a body into 2..=10 fragments at its ground position, roughly splitting its momentum.
/// Not physically exact: each fragment draws a random velocity from +/- twice its share.
pub fn decompose(body: &Body, lifetime: f64, rng: &mut StdRng) -> Vec<Body> {
    let count = rng.gen_range(FRAGMENT_COUNT_MIN..=FRAGMENT_COUNT_MAX);
    let momentum = body.velocity.magnitude();
    let spread = momentum / count as f64 * 2.0;
    let glyphs: Vec<char> = FRAGMENT_GLYPHS.chars().collect();

    info!("crash at x={:.3} v={:?}, {} fragments", body.position[X], body.velocity, count);

    (0..count).map(|_| {
        let velocity = Vec2::new(uniform(rng, spread), uniform(rng, spread));
        let rotation_speed = rng.gen_range(1..=10u32);
        let glyph = glyphs.choose(rng).copied().unwrap_or('x');
        Body {
            position: Vec2::new(body.position[X], 0.0),
            velocity,
            acceleration: Vec2::new(0.0, G),
            renderable: Renderable::Glyph(glyph.to_string()),
            integrator: body.integrator,
            kind: BodyKind::Fragment(Debris {
                rotation_speed,
                lifetime: Some(lifetime),
                spinner: Renderable::spin(FRAGMENT_SPIN_GLYPHS, FRAGMENT_SPIN_RATE / rotation_speed as f64),
            }),
        }
    }).collect()
}

fn uniform(rng: &mut StdRng, spread: f64) -> f64 {
    if spread > 0.0 {
        rng.gen_range(-spread..=spread)
    } else {
        0.0
    }
}
