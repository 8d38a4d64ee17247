// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

//! Memory-mapped GPIO register access for single-board computers.
//!
//! One generic controller drives the register layouts of several SoC
//! families (Broadcom BCM283x/2711, Allwinner H6/R8, Rockchip RK3588 and
//! RK3288) from immutable per-SoC layout tables. The hot path is pure
//! memory traffic: once a controller is initialised, reads and writes touch
//! the mapped registers directly and never enter the kernel.

pub mod allwinner;
pub mod broadcom;
pub mod codec;
mod controller;
pub mod delay;
pub mod layout;
pub mod mem;
#[cfg(test)]
mod mock;
pub mod rk3288;
pub mod rk3588;

pub use self::controller::{MmapGpio, MmapGpioController};

/// What a pin's function-select field currently means, or may be set to.
///
/// The same raw field value decodes to different variants depending on the
/// pin it is read from; see [`codec::ModeCodec`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceMode {
    Unknown,
    DigitalInput,
    DigitalOutput,
    PwmOutput,
    AnalogInput,
    AnalogOutput,
    I2c,
    Spi,
    Serial,
}

impl std::fmt::Display for DeviceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceMode::Unknown       => write!(f, "unknown"),
            DeviceMode::DigitalInput  => write!(f, "digital input"),
            DeviceMode::DigitalOutput => write!(f, "digital output"),
            DeviceMode::PwmOutput     => write!(f, "PWM output"),
            DeviceMode::AnalogInput   => write!(f, "analog input"),
            DeviceMode::AnalogOutput  => write!(f, "analog output"),
            DeviceMode::I2c           => write!(f, "I2C"),
            DeviceMode::Spi           => write!(f, "SPI"),
            DeviceMode::Serial        => write!(f, "serial"),
        }
    }
}

/// Internal bias resistor setting for an input pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullMode {
    None,
    PullUp,
    PullDown,
}

impl std::fmt::Display for PullMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PullMode::None     => write!(f, "none"),
            PullMode::PullUp   => write!(f, "pull-up"),
            PullMode::PullDown => write!(f, "pull-down"),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    HardwareMap { device: &'static str, source: std::io::Error },
    NotInitialised,
    UnknownGpio { gpio: u16, max: u16 },
    UnsupportedMode { gpio: u16, mode: DeviceMode },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::HardwareMap { device, source }    => write!(f, "Cannot map {device}: {source}"),
            Error::NotInitialised                    => write!(f, "GPIO registers are not mapped (missing initialise, or closed)"),
            Error::UnknownGpio { gpio, max }         => write!(f, "Unknown GPIO {gpio}: not a declared pin on this SoC (limit {max})"),
            Error::UnsupportedMode { gpio, mode }    => write!(f, "Unsupported mode for GPIO {gpio}: {mode}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::HardwareMap { source, .. } => Some(source),
            _                                 => None,
        }
    }
}

/// The SoCs this crate ships register layouts for.
///
/// This is the construction seam for board-descriptor layers: resolve the
/// chip once, then hand out the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Soc {
    Bcm283x,
    Bcm2711,
    AllwinnerH6,
    AllwinnerR8,
    Rk3588,
    Rk3288,
}

impl Soc {
    pub fn controller(self) -> MmapGpio {
        match self {
            Soc::Bcm283x     => broadcom::bcm283x(),
            Soc::Bcm2711     => broadcom::bcm2711(),
            Soc::AllwinnerH6 => allwinner::h6(),
            Soc::AllwinnerR8 => allwinner::r8(),
            Soc::Rk3588      => rk3588::controller(),
            Soc::Rk3288      => rk3288::controller(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_device() {
        let err = Error::HardwareMap {
            device: "/dev/mem",
            source: std::io::Error::from_raw_os_error(libc::EACCES),
        };
        assert!(err.to_string().contains("/dev/mem"));
    }

    #[test]
    fn map_error_exposes_io_source() {
        use std::error::Error as _;
        let err = Error::HardwareMap {
            device: "/dev/gpiomem",
            source: std::io::Error::from_raw_os_error(libc::ENOENT),
        };
        assert!(err.source().is_some());
        assert!(Error::NotInitialised.source().is_none());
    }
}
