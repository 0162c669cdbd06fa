//! Slowdown Debuff Timer
//!
//! A secondary, probabilistic on/off penalty layered over a band's static
//! speed multiplier. The timer cycles Idle -> Active -> Cooldown -> Idle:
//! arming is a random draw against the band's slowdown spec, expiry and
//! re-arming are plain deadline checks.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::definition::SlowdownSpec;

/// Seconds between trigger draws while Idle.
const ROLL_INTERVAL_SECONDS: f64 = 1.0;

/// Timer state. Active and Cooldown carry their deadlines; Active also
/// carries the triggering spec's effect so a band change mid-debuff does
/// not alter what was rolled.
#[derive(Debug, Clone, PartialEq)]
pub enum DebuffState {
    Idle,
    Active {
        until: f64,
        multiplier: f32,
        cooldown_seconds: f32,
        end_message: String,
    },
    Cooldown {
        until: f64,
    },
}

/// Runtime state of one need's slowdown debuff.
#[derive(Debug, Clone)]
pub struct DebuffTimer {
    state: DebuffState,
    /// Messages queued on transitions, consumed exactly once by the reader.
    messages: Vec<String>,
    /// Time of the last trigger draw, so draws happen at most once per second.
    last_roll: f64,
}

impl Default for DebuffTimer {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl DebuffTimer {
    /// `now` is the construction time; the first trigger draw measures its
    /// elapsed window from here, not from simulation start.
    pub fn new(now: f64) -> Self {
        Self {
            state: DebuffState::Idle,
            messages: Vec::new(),
            last_roll: now,
        }
    }

    /// Advance the state machine. `spec` is the current band's slowdown
    /// definition, if that band has one. Returns true if the state changed,
    /// which means the speed contribution changed too.
    pub fn tick(&mut self, now: f64, spec: Option<&SlowdownSpec>, rng: &mut SmallRng) -> bool {
        match &self.state {
            DebuffState::Active {
                until,
                cooldown_seconds,
                end_message,
                ..
            } => {
                if now >= *until {
                    let cooldown_end = now + *cooldown_seconds as f64;
                    self.messages.push(end_message.clone());
                    self.state = DebuffState::Cooldown { until: cooldown_end };
                    return true;
                }
                false
            }
            DebuffState::Cooldown { until } => {
                if now >= *until {
                    self.state = DebuffState::Idle;
                    self.last_roll = now;
                    return true;
                }
                false
            }
            DebuffState::Idle => {
                let Some(spec) = spec else {
                    // No slowdown configured for the current band; keep the
                    // roll clock current so re-entering an armed band does
                    // not get a huge elapsed window.
                    self.last_roll = now;
                    return false;
                };
                let elapsed = now - self.last_roll;
                if elapsed < ROLL_INTERVAL_SECONDS {
                    return false;
                }
                self.last_roll = now;
                // Continuous-time conversion of a per-second Bernoulli trial.
                let chance = 1.0 - (1.0 - spec.chance_per_second as f64).powf(elapsed);
                if rng.gen::<f64>() < chance {
                    self.messages.push(spec.start_message.clone());
                    self.state = DebuffState::Active {
                        until: now + spec.duration_seconds as f64,
                        multiplier: spec.speed_modifier,
                        cooldown_seconds: spec.cooldown_seconds(),
                        end_message: spec.end_message.clone(),
                    };
                    return true;
                }
                false
            }
        }
    }

    /// The speed multiplier contributed while the debuff is active.
    pub fn active_multiplier(&self) -> Option<f32> {
        match &self.state {
            DebuffState::Active { multiplier, .. } => Some(*multiplier),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DebuffState::Active { .. })
    }

    pub fn state(&self) -> &DebuffState {
        &self.state
    }

    /// Take all queued transition messages, leaving the queue empty.
    pub fn drain_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn spec(chance: f32) -> SlowdownSpec {
        SlowdownSpec {
            id: "test-slowdown".into(),
            speed_modifier: 0.8,
            duration_seconds: 30.0,
            cooldown_minutes: 5.0,
            chance_per_second: chance,
            start_message: "Your legs feel heavy.".into(),
            end_message: "The heaviness passes.".into(),
        }
    }

    #[test]
    fn test_certain_chance_triggers_on_first_roll() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut timer = DebuffTimer::new(0.0);
        let spec = spec(1.0);

        // First second elapses, draw is certain.
        assert!(timer.tick(1.0, Some(&spec), &mut rng));
        assert!(timer.is_active());
        assert_eq!(timer.active_multiplier(), Some(0.8));
        assert_eq!(timer.drain_messages(), vec!["Your legs feel heavy.".to_string()]);
        // Drained exactly once.
        assert!(timer.drain_messages().is_empty());
    }

    #[test]
    fn test_zero_chance_never_triggers() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut timer = DebuffTimer::new(0.0);
        let spec = spec(0.0);

        for second in 1..=600 {
            assert!(!timer.tick(second as f64, Some(&spec), &mut rng));
        }
        assert!(!timer.is_active());
    }

    #[test]
    fn test_full_cycle_active_cooldown_idle() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut timer = DebuffTimer::new(0.0);
        let spec = spec(1.0);

        assert!(timer.tick(1.0, Some(&spec), &mut rng));
        // Expires 30 seconds after trigger.
        assert!(!timer.tick(30.0, Some(&spec), &mut rng));
        assert!(timer.tick(31.0, Some(&spec), &mut rng));
        assert!(matches!(timer.state(), DebuffState::Cooldown { .. }));
        assert_eq!(timer.active_multiplier(), None);
        assert_eq!(timer.drain_messages(), vec!["The heaviness passes.".to_string()]);

        // Cooldown is five minutes from expiry.
        assert!(!timer.tick(200.0, Some(&spec), &mut rng));
        assert!(timer.tick(331.0, Some(&spec), &mut rng));
        assert!(matches!(timer.state(), DebuffState::Idle));
    }

    #[test]
    fn test_no_spec_for_band_stays_idle() {
        let mut rng = SmallRng::seed_from_u64(4);
        let mut timer = DebuffTimer::new(0.0);

        for second in 1..=10 {
            assert!(!timer.tick(second as f64, None, &mut rng));
        }
        assert!(matches!(timer.state(), DebuffState::Idle));
    }

    #[test]
    fn test_late_construction_rolls_one_interval_not_the_whole_clock() {
        let mut rng = SmallRng::seed_from_u64(6);
        let spec = spec(0.01);

        // Timers created deep into a run must measure their first elapsed
        // window from construction time. Counting from simulation start
        // would compound 10,000 seconds of chance and arm almost certainly.
        let trials = 1000;
        let mut armed = 0;
        for _ in 0..trials {
            let mut timer = DebuffTimer::new(10_000.0);
            if timer.tick(10_001.0, Some(&spec), &mut rng) {
                armed += 1;
            }
        }
        let rate = armed as f64 / trials as f64;
        assert!(rate < 0.05, "first-roll arm rate {rate} exceeds the per-second chance");
    }

    #[test]
    fn test_sub_second_ticks_do_not_roll() {
        let mut rng = SmallRng::seed_from_u64(5);
        let mut timer = DebuffTimer::new(0.0);
        let spec = spec(1.0);

        // Half a second elapsed: no draw yet, even at certain chance.
        assert!(!timer.tick(0.5, Some(&spec), &mut rng));
        assert!(timer.tick(1.5, Some(&spec), &mut rng));
    }
}
