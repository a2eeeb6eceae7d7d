use crate::math::Vec2;

/// Fixed step schemes. Acceleration is held constant over the step, where both give the same
/// answer; they're kept as separate choices to cross check each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrationMethod {
    /// v' = v + a*dt, p' = p + avg(v, v')*dt
    AverageVelocity,
    VelocityVerlet,
}

impl Default for IntegrationMethod {
    fn default() -> Self {
        IntegrationMethod::AverageVelocity
    }
}

impl IntegrationMethod {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_uppercase().as_str() {
            "AVERAGE" => Some(IntegrationMethod::AverageVelocity),
            "VERLET" => Some(IntegrationMethod::VelocityVerlet),
            _ => None,
        }
    }

    /// Returns the new (position, velocity)
    pub fn step(&self, p: Vec2, v: Vec2, a: Vec2, dt: f64) -> (Vec2, Vec2) {
        match self {
            IntegrationMethod::AverageVelocity => {
                let v_new = v + a * dt;
                let v_ave = (v + v_new) * 0.5;
                (p + v_ave * dt, v_new)
            }
            IntegrationMethod::VelocityVerlet => {
                let p_new = p + (v * dt) + 0.5 * a * (dt * dt);
                // a(T) and a(T + dT) are the same constant here
                let v_new = v + 0.5 * (a + a) * dt;
                (p_new, v_new)
            }
        }
    }
}
