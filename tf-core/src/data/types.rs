//! Core data types for the fan controller

use std::fmt;

/// Binary state of the cooling fan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanState {
    On,
    Off,
}

impl FanState {
    /// Map a digital output level onto a fan state (`true` = on)
    pub fn from_level(level: bool) -> Self {
        if level {
            FanState::On
        } else {
            FanState::Off
        }
    }

    pub fn is_on(self) -> bool {
        self == FanState::On
    }
}

impl fmt::Display for FanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanState::On => write!(f, "on"),
            FanState::Off => write!(f, "off"),
        }
    }
}

/// Actuator command produced by one hysteresis decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanAction {
    /// Leave the fan as it is
    None,
    TurnOn,
    TurnOff,
}

impl FanAction {
    pub fn is_none(self) -> bool {
        self == FanAction::None
    }
}

impl fmt::Display for FanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanAction::None => write!(f, "none"),
            FanAction::TurnOn => write!(f, "turn_on"),
            FanAction::TurnOff => write!(f, "turn_off"),
        }
    }
}
