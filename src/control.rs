use std::{ cell::Cell, collections::VecDeque, rc::Rc };

use robust_pid::{ AntiWindupMode, PidBuilder, RobustPid };

use crate::output::step_value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainTerm {
    P,
    I,
    D,
}

impl GainTerm {
    pub fn from_key(key: char) -> Option<(GainTerm, bool)> {
        match key {
            'P' => Some((GainTerm::P, true)),
            'p' => Some((GainTerm::P, false)),
            'I' => Some((GainTerm::I, true)),
            'i' => Some((GainTerm::I, false)),
            'D' => Some((GainTerm::D, true)),
            'd' => Some((GainTerm::D, false)),
            _ => None,
        }
    }
}

/// One set of gains observed by every controller built from (a clone of) this handle
#[derive(Debug, Clone)]
pub struct SharedGains(Rc<Cell<PidGains>>);

impl SharedGains {
    pub fn new(gains: PidGains) -> Self {
        SharedGains(Rc::new(Cell::new(gains)))
    }

    pub fn get(&self) -> PidGains {
        self.0.get()
    }

    pub fn set(&self, gains: PidGains) {
        self.0.set(gains)
    }

    /// Steps one gain up or down by its order of magnitude
    pub fn adjust(&self, term: GainTerm, up: bool) -> PidGains {
        let mut gains = self.get();
        let gain = match term {
            GainTerm::P => &mut gains.kp,
            GainTerm::I => &mut gains.ki,
            GainTerm::D => &mut gains.kd,
        };
        *gain = step_value(*gain, up);
        self.set(gains);
        gains
    }
}

/// Time weighted average of a signal over the trailing `interval`, treating the signal as
/// linear between samples. Weights come from elapsed time, not sample count.
#[derive(Debug, Clone)]
pub struct WeightedLinear {
    interval: f64,
    samples: VecDeque<(f64, f64)>, // (time, value), oldest first
}

impl WeightedLinear {
    pub fn new(interval: f64, value: f64, now: f64) -> Self {
        let mut samples = VecDeque::new();
        samples.push_back((now, value));
        WeightedLinear { interval, samples }
    }

    pub fn sample(&mut self, value: f64, now: f64) -> f64 {
        match self.samples.back_mut() {
            Some(last) if now <= last.0 => last.1 = value,
            _ => self.samples.push_back((now, value)),
        }

        let start = now - self.interval;
        while self.samples.len() > 2 && self.samples[1].0 <= start {
            self.samples.pop_front();
        }
        self.value()
    }

    pub fn value(&self) -> f64 {
        let (last_t, last_v) = match self.samples.back() {
            Some(s) => *s,
            None => return 0.0,
        };
        let start = last_t - self.interval;

        let mut area = 0.0;
        let mut span = 0.0;
        for (a, b) in self.samples.iter().zip(self.samples.iter().skip(1)) {
            let (t0, v0) = *a;
            let (t1, v1) = *b;
            if t1 <= start || t1 <= t0 {
                continue
            }
            // trim the segment to the window, interpolating the entry value
            let (t0, v0) = if t0 < start {
                (start, v0 + (v1 - v0) * (start - t0) / (t1 - t0))
            } else {
                (t0, v0)
            };
            area += (v0 + v1) / 2.0 * (t1 - t0);
            span += t1 - t0;
        }

        if span > 0.0 {
            area / span
        } else {
            last_v
        }
    }
}

/// Back calculation tracking gain for the integral anti-windup
const ANTIWINDUP_TRACKING: f64 = 1.0;
/// Smallest and largest step the controller accepts, s. Time warp makes big steps normal.
const STEP_LIMITS: (f64, f64) = (1e-6, 60.0);

fn build_controller(gains: PidGains, limits: (f64, f64)) -> RobustPid<f64> {
    PidBuilder::new()
        .gains(gains.kp, gains.ki, gains.kd)
        .output_limits(limits.0, limits.1)
        .antiwindup(AntiWindupMode::BackCalculation, ANTIWINDUP_TRACKING)
        .time_limits(STEP_LIMITS.0, STEP_LIMITS.1)
        .build()
}

/// PID loop over a filtered process value, on top of `robust_pid`. Time is whatever monotonic
/// clock the caller passes as `now`; the simulation passes its own (time warped) clock.
///
/// `p`, `i` and `d` are the error, its running integral and its rate, kept for telemetry.
#[derive(Clone)]
pub struct Pid {
    gains: SharedGains,
    applied: PidGains,
    controller: RobustPid<f64>,
    filter: WeightedLinear,
    limits: (f64, f64),
    last_time: f64,
    last_error: Option<f64>,
    pub p: f64,
    pub i: f64,
    pub d: f64,
    pub value: f64,
}

impl std::fmt::Debug for Pid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pid")
            .field("gains", &self.applied)
            .field("limits", &self.limits)
            .field("p", &self.p)
            .field("i", &self.i)
            .field("d", &self.d)
            .field("value", &self.value)
            .finish()
    }
}

impl Pid {
    pub fn new(gains: SharedGains, filter: WeightedLinear, limits: (f64, f64), now: f64) -> Self {
        let applied = gains.get();
        Pid {
            controller: build_controller(applied, limits),
            applied,
            gains,
            filter,
            limits,
            last_time: now,
            last_error: None,
            p: 0.0,
            i: 0.0,
            d: 0.0,
            value: 0.0,
        }
    }

    pub fn gains(&self) -> PidGains {
        self.gains.get()
    }

    pub fn update(&mut self, setpoint: f64, process: f64, now: f64) -> f64 {
        // operator changed the gains since the last step
        let gains = self.gains.get();
        if gains != self.applied {
            self.controller = build_controller(gains, self.limits);
            self.applied = gains;
        }

        let measured = self.filter.sample(process, now);
        let dt = now - self.last_time;
        if dt <= 0.0 {
            return self.value
        }

        self.controller.set_setpoint(setpoint);
        let output = self.controller.update(measured, dt).output;

        let (lo, hi) = self.limits;
        let error = setpoint - measured;
        self.value = output.max(lo).min(hi);
        self.p = error;
        self.d = self.last_error.map_or(0.0, |last| (error - last) / dt);
        let pinned = (self.value >= hi && error > 0.0) || (self.value <= lo && error < 0.0);
        if !pinned {
            self.i += error * dt;
        }

        self.last_error = Some(error);
        self.last_time = now;
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gains(kp: f64, ki: f64, kd: f64) -> SharedGains {
        SharedGains::new(PidGains { kp, ki, kd })
    }

    #[test]
    fn filter_weights_by_time_not_samples() {
        let mut f = WeightedLinear::new(1.0, 0.0, 0.0);
        // one long stretch at 10 and a burst of samples at 0 at the very end
        f.sample(10.0, 0.001);
        f.sample(10.0, 0.9);
        for k in 0..10 {
            f.sample(0.0, 0.901 + k as f64 * 0.00001);
        }
        assert!(f.value() > 8.0, "{}", f.value());
    }

    #[test]
    fn filter_forgets_old_samples() {
        let mut f = WeightedLinear::new(0.25, 0.0, 0.0);
        let mut t = 0.0;
        for _ in 0..100 {
            t += 0.05;
            f.sample(4.0, t);
        }
        assert!((f.value() - 4.0).abs() < 1e-9);
        assert!(f.samples.len() <= 8);
    }

    #[test]
    fn filter_with_no_elapsed_time_is_the_latest_sample() {
        let mut f = WeightedLinear::new(0.25, 0.0, 3.0);
        assert_eq!(-7.0, f.sample(-7.0, 3.0));
    }

    #[test]
    fn output_is_clamped() {
        let mut pid = Pid::new(gains(5.0, 1.0, 10.0), WeightedLinear::new(0.25, 0.0, 0.0), (0.0, 100.0), 0.0);
        let mut t = 0.0;
        for _ in 0..100 {
            t += 0.1;
            let out = pid.update(0.0, -1000.0, t);
            assert!((0.0..=100.0).contains(&out));
        }
        assert_eq!(100.0, pid.value);
        for _ in 0..100 {
            t += 0.1;
            let out = pid.update(0.0, 1000.0, t);
            assert!((0.0..=100.0).contains(&out));
        }
        assert_eq!(0.0, pid.value);
    }

    #[test]
    fn integral_does_not_wind_up_while_saturated() {
        let mut pid = Pid::new(gains(1.0, 1.0, 0.0), WeightedLinear::new(0.01, 0.0, 0.0), (0.0, 100.0), 0.0);
        let mut t = 0.0;
        for _ in 0..1000 {
            t += 0.1;
            pid.update(0.0, -500.0, t);
        }
        assert!(pid.i < 1.0, "integral wound up to {}", pid.i);
    }

    #[test]
    fn pushes_toward_the_setpoint() {
        // below the setpoint: push up
        let mut below = Pid::new(gains(2.0, 0.0, 0.0), WeightedLinear::new(0.25, -10.0, 0.0), (0.0, 100.0), 0.0);
        let out = below.update(0.0, -10.0, 1.0);
        assert!(out > 0.0 && out <= 100.0, "{}", out);
        assert!((below.p - 10.0).abs() < 1e-9);

        // above it: nothing, the floor is zero thrust
        let mut above = Pid::new(gains(2.0, 0.0, 0.0), WeightedLinear::new(0.25, 10.0, 0.0), (0.0, 100.0), 0.0);
        assert_eq!(0.0, above.update(0.0, 10.0, 1.0));
    }

    #[test]
    fn no_elapsed_time_holds_the_last_output() {
        let mut pid = Pid::new(gains(2.0, 0.0, 0.0), WeightedLinear::new(0.25, -10.0, 0.0), (0.0, 100.0), 0.0);
        let out = pid.update(0.0, -10.0, 1.0);
        assert_eq!(out, pid.update(0.0, 50.0, 1.0));
    }

    #[test]
    fn gain_changes_reach_the_running_loop() {
        let shared = gains(0.01, 0.0, 0.0);
        let mut pid = Pid::new(shared.clone(), WeightedLinear::new(0.25, -10.0, 0.0), (0.0, 100.0), 0.0);
        let weak = pid.update(0.0, -10.0, 0.1);
        assert!(weak < 1.0, "{}", weak);

        shared.set(PidGains { kp: 5.0, ki: 0.0, kd: 0.0 });
        let strong = pid.update(0.0, -10.0, 0.2);
        assert!(strong > 10.0, "{}", strong);
    }

    #[test]
    fn shared_gains_propagate() {
        let shared = gains(5.0, 1.0, 10.0);
        let a = Pid::new(shared.clone(), WeightedLinear::new(0.25, 0.0, 0.0), (0.0, 100.0), 0.0);
        let b = Pid::new(shared.clone(), WeightedLinear::new(0.25, 0.0, 0.0), (0.0, 100.0), 0.0);

        let updated = shared.adjust(GainTerm::P, true);
        assert_eq!(6.0, updated.kp);
        assert_eq!(6.0, a.gains().kp);
        assert_eq!(6.0, b.gains().kp);

        shared.adjust(GainTerm::D, false);
        assert!((a.gains().kd - 9.0).abs() < 1e-9);
    }

    #[test]
    fn gain_keys() {
        assert_eq!(Some((GainTerm::I, true)), GainTerm::from_key('I'));
        assert_eq!(Some((GainTerm::D, false)), GainTerm::from_key('d'));
        assert_eq!(None, GainTerm::from_key('x'));
    }
}
