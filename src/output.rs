use crate::{ control::{ Pid, PidGains }, math::Vec2 };

// HUD text. Everything here is pure formatting; placement happens in the frame driver.

pub fn status_line(timewarp: f64, fps: f64, gains: PidGains) -> String {
    format!(
        "Quit [q]? [W/w]arp:{:7.3} {:7.3} FPS [PID/pid]: ({:9.3}, {:9.3}, {:9.3})",
        timewarp, fps, gains.kp, gains.ki, gains.kd
    )
}

pub fn body_line(velocity: Vec2, thrust: f64) -> String {
    format!("{:7.3}, {:7.3} m/s: {:7.3} kg.m/s^2", velocity.x, velocity.y, thrust)
}

/// Controller telemetry drawn beside an autopiloted rocket
pub fn autopilot_line(pid: &Pid, limit: f64, acceleration: f64, velocity: f64) -> String {
    let gains = pid.gains();
    let (force, prefix) = format_si_value(limit * pid.value / 100.0);
    format!(
        "{:7.3} % f: {:9.3}{}N, a: {:7.3} m/s^2, v: {:7.3} m/s, P:{:7.3}*{:7.3}, I:{:7.3}*{:7.3}, D:{:7.3}*{:7.3} ",
        pid.value, force, prefix, acceleration, velocity,
        pid.p, gains.kp, pid.i, gains.ki, pid.d, gains.kd
    )
}

fn format_si_value(n: f64) -> (f64, &'static str) {
    if n == 0.0 || !n.is_finite() {
        return (n, "")
    }
    match n.abs() {
        x if x < 1000.0 => (n, ""),
        x if x < 1000000.0 => (n / 1000.0, "K"),
        x if x < 1000000000.0 => (n / 1000000.0, "M"),
        _ => (n / 1000000000.0, "G"),
    }
}

/// Order of magnitude of `value`: 10^floor(log10(|value|)). 1.0 for zero.
pub fn magnitude(value: f64) -> f64 {
    let v = value.abs();
    if v == 0.0 || !v.is_finite() {
        return 1.0
    }
    10f64.powf(v.log10().floor())
}

/// Steps an operator tuned value (time warp, gains) by its order of magnitude, snapping to a
/// multiple of the step. Stepping down from a power of ten uses the next smaller step, so
/// 1.0 goes to 0.9 and a positive value never reaches zero.
pub fn step_value(value: f64, up: bool) -> f64 {
    let inc = if up { magnitude(value) } else { magnitude(value * (1.0 - 1e-9)) };
    let stepped = if up { value + inc } else { value - inc };
    let snapped = (stepped / inc + 1e-6).floor() * inc;
    snapped.max(0.0)
}
