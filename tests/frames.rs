use rocketsim::{
    body::{ Body, BodyKind },
    constants::G,
    surface::MemorySurface,
    FrameControl, SimConfig, Simulation, Vec2,
};

// ==================================================================================
// Helpers
// ==================================================================================

fn config() -> SimConfig {
    SimConfig { seed: Some(17), ..SimConfig::default() }
}

fn surface() -> MemorySurface {
    MemorySurface::new(40, 120)
}

/// Runs `frames` frames of `real` seconds each with no input
fn run(sim: &mut Simulation, s: &mut MemorySurface, frames: usize, real: f64) {
    for _ in 0..frames {
        assert_eq!(FrameControl::Continue, sim.frame(s, None, real).unwrap());
    }
}

fn falling_rocket(y: f64, vy: f64) -> Body {
    Body::builder(Vec2::new(20.0, y))
        .with_velocity(Vec2::new(0.0, vy))
        .with_acceleration(Vec2::new(0.0, G))
        .with_mass(1000.0)
        .build()
        .unwrap()
}

// ==================================================================================
// Input
// ==================================================================================

#[test]
fn quit_key_stops_without_drawing() {
    let mut sim = Simulation::new(config());
    let mut s = surface();
    assert_eq!(FrameControl::Quit, sim.frame(&mut s, Some('q'), 0.1).unwrap());
    assert_eq!(0, s.refreshes());
    assert_eq!(0, sim.frame_number());
}

#[test]
fn space_launches_an_autopiloted_rocket() {
    let mut sim = Simulation::new(config());
    let mut s = surface();
    sim.frame(&mut s, Some(' '), 0.05).unwrap();
    assert_eq!(1, sim.bodies().len());
    assert!(sim.bodies()[0].is_autopiloted());

    run(&mut sim, &mut s, 60, 0.05);
    let rocket = &sim.bodies()[0];
    assert!(rocket.position.y > 1.0, "rocket stayed at {:?}", rocket.position);
    assert!(rocket.is_autopiloted());
}

#[test]
fn x_removes_the_first_autopiloted_rocket() {
    let mut sim = Simulation::new(config());
    let mut s = surface();
    sim.add_body(falling_rocket(0.5, 0.0));
    sim.frame(&mut s, Some(' '), 0.01).unwrap();
    sim.frame(&mut s, Some(' '), 0.01).unwrap();
    assert_eq!(3, sim.bodies().len());

    sim.frame(&mut s, Some('x'), 0.01).unwrap();
    assert_eq!(2, sim.bodies().len());
    sim.frame(&mut s, Some('x'), 0.01).unwrap();
    assert_eq!(1, sim.bodies().len());
    // only the plain powered body is left, and x leaves it be
    sim.frame(&mut s, Some('x'), 0.01).unwrap();
    assert_eq!(1, sim.bodies().len());
    assert!(!sim.bodies()[0].is_autopiloted());
}

#[test]
fn digits_set_manual_thrust() {
    let mut sim = Simulation::new(SimConfig { rocket: rocketsim::config::RocketConfig { autopilot: false, ..Default::default() }, ..config() });
    let mut s = surface();
    sim.frame(&mut s, Some(' '), 0.01).unwrap();
    sim.frame(&mut s, Some('5'), 0.01).unwrap();

    let engine = sim.bodies()[0].engine().unwrap();
    assert!((engine.thrust.y - engine.limit / 2.0).abs() < 1e-9);

    // half of four weights is two: climbs at about one g
    run(&mut sim, &mut s, 20, 0.05);
    let body = &sim.bodies()[0];
    assert!(body.position.y > 0.0);
    assert!((body.acceleration.y - -G).abs() < 1e-9);

    sim.frame(&mut s, Some('0'), 0.01).unwrap();
    assert_eq!(0.0, sim.bodies()[0].engine().unwrap().thrust.y);
}

#[test]
fn gain_keys_reach_live_controllers() {
    let mut sim = Simulation::new(config());
    let mut s = surface();
    sim.frame(&mut s, Some(' '), 0.01).unwrap();
    sim.frame(&mut s, Some('P'), 0.01).unwrap();
    sim.frame(&mut s, Some('i'), 0.01).unwrap();
    assert_eq!(6.0, sim.gains().kp);
    assert!((sim.gains().ki - 0.9).abs() < 1e-9);

    match &sim.bodies()[0].kind {
        BodyKind::Autopiloted(_, autopilot) => {
            assert_eq!(6.0, autopilot.controller.gains().kp);
            assert!((autopilot.controller.gains().ki - 0.9).abs() < 1e-9);
        }
        other => panic!("expected an autopiloted rocket, got {:?}", other),
    }
}

// ==================================================================================
// Time
// ==================================================================================

#[test]
fn time_warp_scales_dt() {
    let mut normal = Simulation::new(config());
    let mut warped = Simulation::new(config());
    let mut s = surface();

    warped.frame(&mut s, Some('W'), 0.0).unwrap();
    assert_eq!(2.0, warped.timewarp());
    assert_eq!(normal.scaled_dt(0.1), warped.scaled_dt(0.05));

    normal.frame(&mut s, None, 0.1).unwrap();
    warped.frame(&mut s, None, 0.05).unwrap();
    assert_eq!(normal.sim_time(), warped.sim_time());

    warped.frame(&mut s, Some('w'), 0.0).unwrap();
    warped.frame(&mut s, Some('w'), 0.0).unwrap();
    assert!((warped.timewarp() - 0.9).abs() < 1e-9);
}

#[test]
fn warped_and_unwarped_rockets_fly_the_same() {
    let mut normal = Simulation::new(config());
    let mut warped = Simulation::new(SimConfig { timewarp: 2.0, ..config() });
    let mut s = surface();

    normal.spawn_rocket().unwrap();
    warped.spawn_rocket().unwrap();
    run(&mut normal, &mut s, 80, 0.05);
    run(&mut warped, &mut s, 80, 0.025);

    let a = normal.bodies()[0].position.y;
    let b = warped.bodies()[0].position.y;
    assert!((a - b).abs() < 1e-6, "{} vs {}", a, b);
}

// ==================================================================================
// Crash
// ==================================================================================

#[test]
fn hard_landing_turns_into_debris_that_clears() {
    let mut sim = Simulation::new(config());
    let mut s = surface();
    sim.add_body(falling_rocket(0.5, -20.0));

    sim.frame(&mut s, None, 0.05).unwrap();
    let fragments = sim.bodies();
    assert!((2..=10).contains(&fragments.len()));
    for f in fragments {
        assert_eq!(0.0, f.position.y);
        assert!(matches!(f.kind, BodyKind::Fragment(_)));
    }

    // 5s of grounded lifetime plus however long the debris flies
    run(&mut sim, &mut s, 400, 0.05);
    assert!(sim.bodies().is_empty());
}

#[test]
fn soft_landing_comes_to_rest() {
    let mut sim = Simulation::new(config());
    let mut s = surface();
    sim.add_body(falling_rocket(0.01, -0.1));
    run(&mut sim, &mut s, 10, 0.05);
    assert_eq!(1, sim.bodies().len());
    assert_eq!(0.0, sim.bodies()[0].position.y);
    assert!(sim.bodies()[0].engine().is_some());
}

#[test]
fn idle_rocket_survives_a_long_warped_frame() {
    let manual = rocketsim::config::RocketConfig { autopilot: false, ..Default::default() };
    let mut sim = Simulation::new(SimConfig { timewarp: 2.0, rocket: manual, ..config() });
    let mut s = surface();
    sim.frame(&mut s, Some(' '), 0.1).unwrap();
    sim.frame(&mut s, None, 0.1).unwrap();

    assert_eq!(1, sim.bodies().len());
    let rocket = &sim.bodies()[0];
    assert!(rocket.engine().is_some(), "rocket broke up on the pad: {:?}", rocket.kind);
    assert_eq!(0.0, rocket.position.y);
}

// ==================================================================================
// Drawing
// ==================================================================================

#[test]
fn hud_and_rocket_are_drawn() {
    let mut sim = Simulation::new(config());
    let mut s = surface();
    sim.frame(&mut s, Some(' '), 0.05).unwrap();

    // status on the bottom row, the body line above it
    assert!(s.line(39).starts_with("Quit [q]? [W/w]arp:"));
    assert!(s.line(38).contains("m/s:"));
    assert!(s.line(38).contains("kg.m/s^2"));

    // the nose cone sits a row above the rocket, twice as far right as its x
    let rocket = &sim.bodies()[0];
    let nose_row = 39 - (rocket.position.y + 1.0).floor() as usize;
    assert_eq!('^', s.char_at(nose_row, 100));
    assert_eq!(1, s.refreshes());
}

#[test]
fn off_screen_bodies_are_skipped() {
    let mut sim = Simulation::new(config());
    let mut s = MemorySurface::new(10, 20);
    sim.add_body(
        Body::builder(Vec2::new(500.0, 500.0))
            .with_velocity(Vec2::new(1.0, 1.0))
            .build()
            .unwrap(),
    );
    run(&mut sim, &mut s, 3, 0.05);
    assert_eq!(1, sim.bodies().len());
    // nothing but the (truncated) status line
    assert!(s.glyphs().iter().all(|&(row, _, _)| row == 9));
}
