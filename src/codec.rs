// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

//! Pin-conditioned translation between raw function-select codes and
//! [`DeviceMode`]s. The same numeric code selects different peripherals on
//! different pins, so every lookup is keyed on the GPIO number as well as
//! the code; a flat code-to-mode map would be wrong on every SoC here.

use crate::layout::PinSet;
use crate::DeviceMode;

/// One alternate-function row: on `pins`, raw `code` selects `mode`.
#[derive(Debug, Clone, Copy)]
pub struct ModeEntry {
    pub pins: PinSet,
    pub code: u32,
    pub mode: DeviceMode,
}

/// How the plain digital modes are encoded.
#[derive(Debug, Clone, Copy)]
pub enum DigitalCodes {
    /// Input and output are distinct function-select codes.
    InField { input: u32, output: u32 },
    /// One code selects GPIO duty; input vs output lives in a separate
    /// direction register.
    MuxedGpio { gpio: u32 },
}

/// What a raw function-select code means on a particular pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Input,
    Output,
    /// GPIO duty with the direction held elsewhere.
    Gpio,
    Alt(DeviceMode),
    Unknown,
}

/// Per-SoC mode table.
#[derive(Debug)]
pub struct ModeCodec {
    pub digital: DigitalCodes,
    pub alts:    &'static [ModeEntry],
}

impl ModeCodec {
    pub fn decode(&self, gpio: u16, raw: u32) -> Decoded {
        match self.digital {
            DigitalCodes::InField { input, output } => {
                if raw == input {
                    return Decoded::Input;
                }
                if raw == output {
                    return Decoded::Output;
                }
            }
            DigitalCodes::MuxedGpio { gpio: code } => {
                if raw == code {
                    return Decoded::Gpio;
                }
            }
        }
        for entry in self.alts {
            if entry.code == raw && entry.pins.contains(gpio) {
                return Decoded::Alt(entry.mode);
            }
        }
        Decoded::Unknown
    }

    /// Raw code that selects `mode` on `gpio`, or `None` where the pin's
    /// table declares no such function. First matching row wins.
    pub fn encode(&self, gpio: u16, mode: DeviceMode) -> Option<u32> {
        match (mode, self.digital) {
            (DeviceMode::DigitalInput, DigitalCodes::InField { input, .. }) => {
                return Some(input);
            }
            (DeviceMode::DigitalOutput, DigitalCodes::InField { output, .. }) => {
                return Some(output);
            }
            (DeviceMode::DigitalInput | DeviceMode::DigitalOutput, DigitalCodes::MuxedGpio { gpio: code }) => {
                return Some(code);
            }
            _ => {}
        }
        self.alts
            .iter()
            .find(|entry| entry.mode == mode && entry.pins.contains(gpio))
            .map(|entry| entry.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A code that means PWM on two pins and SERIAL on a range, the way
    // Broadcom reuses ALT5.
    static SHARED_CODE: ModeCodec = ModeCodec {
        digital: DigitalCodes::InField { input: 0b000, output: 0b001 },
        alts:    &[
            ModeEntry { pins: PinSet::List(&[18, 19]), code: 0b010, mode: DeviceMode::PwmOutput },
            ModeEntry { pins: PinSet::Range(14, 17), code: 0b010, mode: DeviceMode::Serial },
        ],
    };

    #[test]
    fn same_code_decodes_per_pin() {
        assert_eq!(SHARED_CODE.decode(18, 0b010), Decoded::Alt(DeviceMode::PwmOutput));
        assert_eq!(SHARED_CODE.decode(15, 0b010), Decoded::Alt(DeviceMode::Serial));
        assert_eq!(SHARED_CODE.decode(4, 0b010), Decoded::Unknown);
    }

    #[test]
    fn digital_codes_win_over_the_table() {
        assert_eq!(SHARED_CODE.decode(18, 0b000), Decoded::Input);
        assert_eq!(SHARED_CODE.decode(18, 0b001), Decoded::Output);
    }

    #[test]
    fn encode_is_conditioned_on_the_pin() {
        assert_eq!(SHARED_CODE.encode(18, DeviceMode::PwmOutput), Some(0b010));
        assert_eq!(SHARED_CODE.encode(15, DeviceMode::Serial), Some(0b010));
        assert_eq!(SHARED_CODE.encode(15, DeviceMode::PwmOutput), None);
        assert_eq!(SHARED_CODE.encode(18, DeviceMode::DigitalOutput), Some(0b001));
    }

    #[test]
    fn muxed_gpio_maps_both_directions_to_one_code() {
        let codec = ModeCodec { digital: DigitalCodes::MuxedGpio { gpio: 0 }, alts: &[] };
        assert_eq!(codec.encode(7, DeviceMode::DigitalInput), Some(0));
        assert_eq!(codec.encode(7, DeviceMode::DigitalOutput), Some(0));
        assert_eq!(codec.decode(7, 0), Decoded::Gpio);
        assert_eq!(codec.decode(7, 1), Decoded::Unknown);
    }
}
