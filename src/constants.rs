pub const G: f64 = -9.81; // m/s^2, earth surface avg. ignores changes with altitude

pub const CRASH_SPEED: f64 = -1.0; // m/s, touchdown faster than this breaks the rocket
pub const FRAGMENT_LIFETIME: f64 = 5.0; // s, once grounded
pub const FRAGMENT_COUNT_MIN: usize = 2;
pub const FRAGMENT_COUNT_MAX: usize = 10;
pub const FRAGMENT_GLYPHS: &str = "xX!@#%^";
pub const FRAGMENT_SPIN_GLYPHS: &str = "|/-\\";
pub const FRAGMENT_SPIN_RATE: f64 = 13.0; // glyphs/s at rotation speed 1

pub const THRUST_LIMIT_WEIGHTS: f64 = 4.0; // max thrust as a multiple of weight

pub const DEFAULT_KP: f64 = 5.0;
pub const DEFAULT_KI: f64 = 1.0;
pub const DEFAULT_KD: f64 = 10.0;
pub const DEFAULT_SMOOTHING: f64 = 0.25; // s
pub const THRUST_PERCENT_LIMITS: (f64, f64) = (0.0, 100.0);

pub const ROCKET_MASS: f64 = 1000.0; // kg
pub const ROCKET_SPAWN_X: f64 = 50.0;
pub const ROCKET_TARGET_ALTITUDE: f64 = 30.0;

pub const CELL_ASPECT: f64 = 2.0; // terminal cells are about twice as tall as wide
pub const POLL_TIMEOUT_MS: u64 = 100;
