//! The monitor's menu

use super::{Entry, MenuBuilder, MenuError, MenuTree};
use crate::text::TextId;

/// Everything a menu entry can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Status,
    Time,
    Measurements,
    Weather,
    Connectivity,
    ToggleLanguage,
    SdInfo,
    /// Same as pressing BACK on the menu.
    Back,

    Tare,
    CalibrateKnownWeight,
    RawValue,
    CalibrateBattery,
    AccelZero,
    TemperatureOffset,
    HumidityOffset,
    Summary,
}

/// Build the device menu.
pub fn build_hive_menu() -> Result<MenuTree<MenuAction>, MenuError> {
    let mut builder = MenuBuilder::new();

    let top = builder.add_group(
        builder.root(),
        &[
            Entry::Action(TextId::Status, MenuAction::Status),
            Entry::Action(TextId::Time, MenuAction::Time),
            Entry::Action(TextId::Measurements, MenuAction::Measurements),
            Entry::Action(TextId::Weather, MenuAction::Weather),
            Entry::Action(TextId::Connectivity, MenuAction::Connectivity),
            Entry::Submenu(TextId::Calibration),
            Entry::Action(TextId::Language, MenuAction::ToggleLanguage),
            Entry::Action(TextId::SdInfo, MenuAction::SdInfo),
            Entry::Action(TextId::Back, MenuAction::Back),
        ],
    )?;

    let calibration = top.nth(5).ok_or(MenuError::EmptyGroup)?;
    builder.add_group(
        calibration,
        &[
            Entry::Action(TextId::Tare, MenuAction::Tare),
            Entry::Action(TextId::Calibrate, MenuAction::CalibrateKnownWeight),
            Entry::Action(TextId::RawValue, MenuAction::RawValue),
            Entry::Action(TextId::Battery, MenuAction::CalibrateBattery),
            Entry::Action(TextId::AccelZero, MenuAction::AccelZero),
            Entry::Action(TextId::TempOffset, MenuAction::TemperatureOffset),
            Entry::Action(TextId::HumidityOffset, MenuAction::HumidityOffset),
            Entry::Action(TextId::Summary, MenuAction::Summary),
            Entry::Action(TextId::Back, MenuAction::Back),
        ],
    )?;

    builder.build()
}
