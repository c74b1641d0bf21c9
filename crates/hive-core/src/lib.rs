//! Hardware-independent core library for the beehive monitor
//!
//! This crate contains the platform-agnostic logic of the hive monitor:
//! the menu tree and its navigator, the calibration engine and its
//! persisted parameters, button debouncing, the character display
//! contract and the screens that run behind each menu action.
//!
//! It is `#![no_std]` so it compiles for the ESP32 firmware as well as on
//! desktop hosts (for the simulator and tests). Raw sensor access, the LCD
//! driver, networking and file logging stay outside and are reached only
//! through the traits in [`sensors`], [`storage`], [`display`] and
//! [`telemetry`].

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod calibration;
pub mod config;
pub mod display;
pub mod input;
pub mod menu;
pub mod navigator;
pub mod screens;
pub mod sensors;
pub mod storage;
pub mod telemetry;
pub mod text;

pub use app::{AppMode, HiveApp, Platform, SensorSet};
pub use calibration::{CalibrationEngine, CalibrationError};
pub use config::DeviceConfig;
pub use input::{Button, ButtonLevels, ButtonPoller};
pub use navigator::{Navigator, Transition};

#[cfg(test)]
mod testing;
