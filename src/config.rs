use std::{ path::PathBuf, str::FromStr, time::Duration };

use crate::{
    constants::*,
    control::PidGains,
    error::SimError,
    integrator::IntegrationMethod,
    math::Vec2,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RocketConfig {
    pub mass: f64, // kg
    pub spawn: Vec2,
    pub target: Vec2,
    pub autopilot: bool,
    pub smoothing: f64, // s
    pub fragment_lifetime: f64, // s
}

impl Default for RocketConfig {
    fn default() -> Self {
        RocketConfig {
            mass: ROCKET_MASS,
            spawn: Vec2::new(ROCKET_SPAWN_X, 0.0),
            target: Vec2::new(ROCKET_SPAWN_X, ROCKET_TARGET_ALTITUDE),
            autopilot: true,
            smoothing: DEFAULT_SMOOTHING,
            fragment_lifetime: FRAGMENT_LIFETIME,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub timewarp: f64,
    pub gains: PidGains,
    pub integrator: IntegrationMethod,
    pub x_scale: f64,
    pub poll_timeout: Duration,
    pub seed: Option<u64>,
    pub rocket: RocketConfig,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            timewarp: 1.0,
            gains: PidGains { kp: DEFAULT_KP, ki: DEFAULT_KI, kd: DEFAULT_KD },
            integrator: IntegrationMethod::default(),
            x_scale: CELL_ASPECT,
            poll_timeout: Duration::from_millis(POLL_TIMEOUT_MS),
            seed: None,
            rocket: RocketConfig::default(),
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl SimConfig {
    pub fn from_cli_matches(matches: &clap::ArgMatches) -> Result<SimConfig, SimError> {
        let mut config = SimConfig::default();

        if let Some(warp) = parse_value::<f64>(matches, "timewarp")? {
            config.timewarp = positive("timewarp", warp)?;
        }
        if let Some(kp) = parse_value::<f64>(matches, "kp")? {
            config.gains.kp = non_negative("kp", kp)?;
        }
        if let Some(ki) = parse_value::<f64>(matches, "ki")? {
            config.gains.ki = non_negative("ki", ki)?;
        }
        if let Some(kd) = parse_value::<f64>(matches, "kd")? {
            config.gains.kd = non_negative("kd", kd)?;
        }
        if let Some(name) = matches.value_of("integrator") {
            config.integrator = IntegrationMethod::from_name(name)
                .ok_or_else(|| invalid("integrator", name, "expected average or verlet"))?;
        }
        if matches.is_present("square-cells") {
            config.x_scale = 1.0;
        }
        if let Some(ms) = parse_value::<u64>(matches, "poll-ms")? {
            config.poll_timeout = Duration::from_millis(ms);
        }
        config.seed = parse_value::<u64>(matches, "seed")?;

        if let Some(mass) = parse_value::<f64>(matches, "mass")? {
            config.rocket.mass = positive("mass", mass)?;
        }
        if let Some(raw) = matches.value_of("spawn") {
            let spawn = parse_vec2("spawn", raw)?;
            config.rocket.spawn = Vec2::new(non_negative("spawn", spawn.x)?, non_negative("spawn", spawn.y)?);
            config.rocket.target.x = spawn.x;
        }
        if let Some(altitude) = parse_value::<f64>(matches, "target-altitude")? {
            config.rocket.target.y = non_negative("target-altitude", altitude)?;
        }
        if let Some(lifetime) = parse_value::<f64>(matches, "fragment-lifetime")? {
            config.rocket.fragment_lifetime = positive("fragment-lifetime", lifetime)?;
        }
        if let Some(interval) = parse_value::<f64>(matches, "smoothing")? {
            config.rocket.smoothing = positive("smoothing", interval)?;
        }
        config.rocket.autopilot = !matches.is_present("manual");

        if let Some(level) = matches.value_of("log-level") {
            match level.to_ascii_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => config.log_level = level.to_ascii_lowercase(),
                _ => return Err(invalid("log-level", level, "expected trace, debug, info, warn or error")),
            }
        }
        config.log_file = matches.value_of("log-file").map(PathBuf::from);

        Ok(config)
    }
}

fn invalid(option: &'static str, value: &str, reason: &str) -> SimError {
    SimError::InvalidConfig { option, value: value.to_string(), reason: reason.to_string() }
}

fn parse_value<T: FromStr>(matches: &clap::ArgMatches, option: &'static str) -> Result<Option<T>, SimError>
where
    T::Err: std::fmt::Display,
{
    match matches.value_of(option) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>()
            .map(Some)
            .map_err(|e| invalid(option, raw, &e.to_string())),
    }
}

/// "x,y" into a vector
fn parse_vec2(option: &'static str, raw: &str) -> Result<Vec2, SimError> {
    let components = raw.split(',')
        .map(|c| c.trim().parse::<f64>().map_err(|e| invalid(option, raw, &e.to_string())))
        .collect::<Result<Vec<f64>, SimError>>()?;
    Vec2::from_slice(&components)
}

fn positive(option: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(invalid(option, &value.to_string(), "must be greater than zero"))
    }
}

fn non_negative(option: &'static str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(invalid(option, &value.to_string(), "must not be negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build_cli;

    fn config(args: &[&str]) -> Result<SimConfig, SimError> {
        let mut argv = vec!["rocketsim"];
        argv.extend_from_slice(args);
        let matches = build_cli().get_matches_from_safe(argv).expect("arguments should parse");
        SimConfig::from_cli_matches(&matches)
    }

    #[test]
    fn defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(SimConfig::default(), c);
        assert_eq!(2.0, c.x_scale);
        assert_eq!(Vec2::new(50.0, 30.0), c.rocket.target);
        assert!(c.rocket.autopilot);
    }

    #[test]
    fn overrides() {
        let c = config(&[
            "--timewarp", "2.5", "--kp", "3", "--ki", "0.5", "--kd", "8",
            "--integrator", "verlet", "--square-cells", "--poll-ms", "20", "--seed", "7",
            "--mass", "500", "--spawn", "12, 0.5", "--target-altitude", "18",
            "--fragment-lifetime", "2", "--smoothing", "0.5", "--manual",
            "--log-level", "DEBUG", "--log-file", "sim.log",
        ]).unwrap();
        assert_eq!(2.5, c.timewarp);
        assert_eq!(PidGains { kp: 3.0, ki: 0.5, kd: 8.0 }, c.gains);
        assert_eq!(IntegrationMethod::VelocityVerlet, c.integrator);
        assert_eq!(1.0, c.x_scale);
        assert_eq!(Duration::from_millis(20), c.poll_timeout);
        assert_eq!(Some(7), c.seed);
        assert_eq!(500.0, c.rocket.mass);
        assert_eq!(Vec2::new(12.0, 0.5), c.rocket.spawn);
        assert_eq!(Vec2::new(12.0, 18.0), c.rocket.target);
        assert_eq!(2.0, c.rocket.fragment_lifetime);
        assert_eq!(0.5, c.rocket.smoothing);
        assert!(!c.rocket.autopilot);
        assert_eq!("debug", c.log_level);
        assert_eq!(Some(PathBuf::from("sim.log")), c.log_file);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(config(&["--mass", "0"]), Err(SimError::InvalidConfig { option: "mass", .. })));
        assert!(matches!(config(&["--timewarp", "fast"]), Err(SimError::InvalidConfig { option: "timewarp", .. })));
        assert!(matches!(config(&["--kd=-1"]), Err(SimError::InvalidConfig { option: "kd", .. })));
        assert!(matches!(config(&["--log-level", "loud"]), Err(SimError::InvalidConfig { option: "log-level", .. })));
        assert!(matches!(config(&["--smoothing", "NaN"]), Err(SimError::InvalidConfig { option: "smoothing", .. })));
        assert!(matches!(config(&["--spawn", "4,y"]), Err(SimError::InvalidConfig { option: "spawn", .. })));
    }

    #[test]
    fn spawn_needs_two_components() {
        assert!(matches!(config(&["--spawn", "1,2,3"]), Err(SimError::DimensionMismatch { expected: 2, got: 3 })));
        assert!(matches!(config(&["--spawn", "12"]), Err(SimError::DimensionMismatch { expected: 2, got: 1 })));
    }

    #[test]
    fn unknown_integrator_is_a_usage_error() {
        assert!(build_cli().get_matches_from_safe(vec!["rocketsim", "--integrator", "euler"]).is_err());
    }
}
