//! Two-threshold hysteresis for an on/off fan
//!
//! The fan turns on when the temperature rises strictly above `on_threshold` and
//! turns off when it falls strictly below `off_threshold`. Between the two lies the
//! dead band where the current state is kept, which stops the fan from chattering
//! when the temperature hovers near a single setpoint.
//!
//! Readings exactly equal to a threshold never cause a transition.

use crate::data::{validate_thresholds, FanAction, FanState, ThresholdConfig};
use crate::error::Result;

/// Pure decision logic over validated thresholds
///
/// Holds no fan state of its own: the caller passes the state read back from the
/// actuator on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HysteresisController {
    config: ThresholdConfig,
}

impl HysteresisController {
    /// Build a controller, rejecting thresholds that do not leave a dead band
    pub fn new(config: ThresholdConfig) -> Result<Self> {
        validate_thresholds(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Decide the next fan state for one reading
    ///
    /// Rules are evaluated in order, first match wins:
    /// 1. above `on_threshold` with the fan off: turn on
    /// 2. below `off_threshold` with the fan on: turn off
    /// 3. otherwise keep the current state
    ///
    /// Any finite temperature is accepted, including negative ones.
    pub fn poll_once(&self, current_temp: f64, fan_state: FanState) -> (FanState, FanAction) {
        if current_temp > self.config.on_threshold && fan_state == FanState::Off {
            (FanState::On, FanAction::TurnOn)
        } else if fan_state == FanState::On && current_temp < self.config.off_threshold {
            (FanState::Off, FanAction::TurnOff)
        } else {
            (fan_state, FanAction::None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    const ON: f64 = 65.0;
    const OFF: f64 = 55.0;

    fn controller() -> HysteresisController {
        HysteresisController::new(ThresholdConfig::new(ON, OFF, Duration::from_secs(5))).unwrap()
    }

    fn any_state() -> impl Strategy<Value = FanState> {
        prop_oneof![Just(FanState::On), Just(FanState::Off)]
    }

    #[test]
    fn test_hot_with_fan_off_turns_on() {
        assert_eq!(controller().poll_once(70.0, FanState::Off), (FanState::On, FanAction::TurnOn));
    }

    #[test]
    fn test_dead_band_keeps_fan_on() {
        assert_eq!(controller().poll_once(60.0, FanState::On), (FanState::On, FanAction::None));
    }

    #[test]
    fn test_cool_with_fan_on_turns_off() {
        assert_eq!(controller().poll_once(50.0, FanState::On), (FanState::Off, FanAction::TurnOff));
    }

    #[test]
    fn test_exact_on_threshold_does_not_turn_on() {
        assert_eq!(controller().poll_once(65.0, FanState::Off), (FanState::Off, FanAction::None));
    }

    #[test]
    fn test_reading_just_above_on_threshold_turns_on() {
        let t = crate::hw::parse_temperature_output("temp=65.000001'C").unwrap();
        assert!(t > ON);
        assert_eq!(controller().poll_once(t, FanState::Off), (FanState::On, FanAction::TurnOn));
    }

    #[test]
    fn test_reading_just_below_off_threshold_turns_off() {
        assert_eq!(
            controller().poll_once(54.999999, FanState::On),
            (FanState::Off, FanAction::TurnOff)
        );
    }

    #[test]
    fn test_exact_off_threshold_does_not_turn_off() {
        assert_eq!(controller().poll_once(55.0, FanState::On), (FanState::On, FanAction::None));
    }

    #[test]
    fn test_hot_with_fan_on_and_cold_with_fan_off_do_nothing() {
        let c = controller();
        assert_eq!(c.poll_once(90.0, FanState::On), (FanState::On, FanAction::None));
        assert_eq!(c.poll_once(-20.0, FanState::Off), (FanState::Off, FanAction::None));
    }

    #[test]
    fn test_extreme_readings_accepted() {
        let c = controller();
        assert_eq!(c.poll_once(f64::MAX, FanState::Off).1, FanAction::TurnOn);
        assert_eq!(c.poll_once(-273.15, FanState::On).1, FanAction::TurnOff);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let equal = ThresholdConfig::new(60.0, 60.0, Duration::from_secs(5));
        assert!(HysteresisController::new(equal).unwrap_err().is_config());

        let inverted = ThresholdConfig::new(50.0, 60.0, Duration::from_secs(5));
        assert!(HysteresisController::new(inverted).unwrap_err().is_config());
    }

    #[test]
    fn test_full_cycle_heats_and_cools() {
        let c = controller();
        let mut state = FanState::Off;
        let mut actions = Vec::new();
        for temp in [50.0, 60.0, 66.0, 62.0, 56.0, 55.0, 54.9, 60.0] {
            let (next, action) = c.poll_once(temp, state);
            state = next;
            actions.push(action);
        }
        assert_eq!(
            actions,
            vec![
                FanAction::None,
                FanAction::None,
                FanAction::TurnOn,
                FanAction::None,
                FanAction::None,
                FanAction::None,
                FanAction::TurnOff,
                FanAction::None,
            ]
        );
        assert_eq!(state, FanState::Off);
    }

    proptest! {
        #[test]
        fn dead_band_never_transitions(t in OFF..ON, state in any_state()) {
            prop_assume!(t > OFF);
            prop_assert_eq!(controller().poll_once(t, state), (state, FanAction::None));
        }

        #[test]
        fn above_on_threshold_turns_fan_on(t in ON..1.0e6f64) {
            prop_assume!(t > ON);
            prop_assert_eq!(controller().poll_once(t, FanState::Off), (FanState::On, FanAction::TurnOn));
        }

        #[test]
        fn below_off_threshold_turns_fan_off(t in -1.0e6f64..OFF) {
            prop_assert_eq!(controller().poll_once(t, FanState::On), (FanState::Off, FanAction::TurnOff));
        }

        #[test]
        fn steady_temperature_settles_after_one_call(t in -1.0e3f64..1.0e3, state in any_state()) {
            let c = controller();
            let (settled, _) = c.poll_once(t, state);
            for _ in 0..3 {
                prop_assert_eq!(c.poll_once(t, settled), (settled, FanAction::None));
            }
        }
    }
}
