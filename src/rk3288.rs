// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

//! Rockchip RK3288 layout (ASUS Tinker Board).
//!
//! Nine GPIO banks with v1 read-modify-write data and direction registers,
//! each bank in its own window. Bank 0 declares 24 pins, so packing the
//! banks back to back reproduces the hardware numbering where GPIO numbers
//! from bank 1 up sit 8 below the uniform bank-of-32 arithmetic. Mode
//! fields are scattered: the bank 0 mux lives in the PMU block and the
//! rest in the GRF, with the 7CL/7CH words holding 4-bit fields where
//! everything else holds 2-bit ones. Pulls split the same way, PMU
//! read-modify-write for bank 0 and GRF write-enable words above it.

use crate::codec::{DigitalCodes, ModeCodec, ModeEntry};
use crate::layout::{
    FieldSpec, GpioLayout, ModeSelect, MuxEntry, OutputControl, PinNumbering, PinSet, PullCodes,
    PullControl, WindowRoute, WindowSpec, WriteStyle,
};
use crate::{DeviceMode, MmapGpio, MmapGpioController};

const PMU: usize = 9;
const GRF: usize = 10;

static WINDOWS: [WindowSpec; 11] = [
    WindowSpec { name: "gpio0", device: "/dev/mem", base: 0xFF75_0000, len: 4096 },
    WindowSpec { name: "gpio1", device: "/dev/mem", base: 0xFF78_0000, len: 4096 },
    WindowSpec { name: "gpio2", device: "/dev/mem", base: 0xFF79_0000, len: 4096 },
    WindowSpec { name: "gpio3", device: "/dev/mem", base: 0xFF7A_0000, len: 4096 },
    WindowSpec { name: "gpio4", device: "/dev/mem", base: 0xFF7B_0000, len: 4096 },
    WindowSpec { name: "gpio5", device: "/dev/mem", base: 0xFF7C_0000, len: 4096 },
    WindowSpec { name: "gpio6", device: "/dev/mem", base: 0xFF7D_0000, len: 4096 },
    WindowSpec { name: "gpio7", device: "/dev/mem", base: 0xFF7E_0000, len: 4096 },
    WindowSpec { name: "gpio8", device: "/dev/mem", base: 0xFF7F_0000, len: 4096 },
    WindowSpec { name: "pmu", device: "/dev/mem", base: 0xFF73_0000, len: 4096 },
    WindowSpec { name: "grf", device: "/dev/mem", base: 0xFF77_0000, len: 4096 },
];

const fn bank_register(base_word: usize) -> FieldSpec {
    FieldSpec {
        route:           WindowRoute::PerBank { first: 0 },
        bank_stride:     0,
        base_word,
        fields_per_word: 32,
        step:            1,
        width:           1,
        write:           WriteStyle::ReadModifyWrite,
    }
}

// GPIO_SWPORTA_DR at 0x00, GPIO_SWPORTA_DDR at 0x04, GPIO_EXT_PORTA at 0x50.
const DATA: FieldSpec = bank_register(0);
const DIRECTION: FieldSpec = bank_register(1);
const INPUT: FieldSpec = bank_register(20);

const fn grf_mux(pins: PinSet, word: usize) -> MuxEntry {
    MuxEntry {
        pins,
        window: GRF,
        word,
        fields_per_word: 8,
        step: 2,
        width: 2,
        write: WriteStyle::WriteEnable,
    }
}

const fn grf_mux_wide(pins: PinSet, word: usize) -> MuxEntry {
    MuxEntry {
        pins,
        window: GRF,
        word,
        fields_per_word: 4,
        step: 4,
        width: 4,
        write: WriteStyle::WriteEnable,
    }
}

// PMU_GPIO0C_IOMUX at 0x8C; the GRF words run from GPIO5B_IOMUX at 0x50 to
// GPIO8B_IOMUX at 0x84. 7CL and 7CH carry 4-bit fields, four pins per word.
static IOMUX: [MuxEntry; 10] = [
    MuxEntry {
        pins:            PinSet::One(17),
        window:          PMU,
        word:            35,
        fields_per_word: 8,
        step:            2,
        width:           2,
        write:           WriteStyle::ReadModifyWrite,
    },
    grf_mux(PinSet::Range(160, 167), 20),
    grf_mux(PinSet::Range(168, 171), 21),
    grf_mux(PinSet::List(&[184, 185, 187, 188]), 23),
    grf_mux(PinSet::One(223), 27),
    grf_mux(PinSet::Range(224, 226), 28),
    grf_mux_wide(PinSet::List(&[233, 234]), 29),
    grf_mux_wide(PinSet::List(&[238, 239]), 30),
    grf_mux(PinSet::Range(251, 255), 32),
    grf_mux(PinSet::Range(256, 257), 33),
];

// PMU_GPIO0A_P at 0x64; GRF_GPIO1A_P at 0x140, four pull words per bank.
const PMU_PULL: FieldSpec = FieldSpec {
    route:           WindowRoute::Fixed(PMU),
    bank_stride:     0,
    base_word:       25,
    fields_per_word: 8,
    step:            2,
    width:           2,
    write:           WriteStyle::ReadModifyWrite,
};

const GRF_PULL: FieldSpec = FieldSpec {
    route:           WindowRoute::Fixed(GRF),
    bank_stride:     4,
    base_word:       80,
    fields_per_word: 8,
    step:            2,
    width:           2,
    write:           WriteStyle::WriteEnable,
};

pub(crate) static LAYOUT: GpioLayout = GpioLayout {
    windows:   &WINDOWS,
    banks:     &[24, 32, 32, 32, 32, 32, 32, 32, 32],
    numbering: PinNumbering::Cumulative,
    mode:      ModeSelect::PinTable(&IOMUX),
    direction: Some(DIRECTION),
    input:     INPUT,
    output:    OutputControl::Data(DATA),
    pull:      PullControl::SplitField {
        boundary: 1,
        low:      PMU_PULL,
        high:     GRF_PULL,
        codes:    PullCodes { none: 0, up: 1, down: 2 },
    },
};

// Mux code 3 on 7C6/7C7 selects the PWM blocks. Other alternate functions
// on the supported pins have no table entries and decode as unknown.
pub(crate) static CODEC: ModeCodec = ModeCodec {
    digital: DigitalCodes::MuxedGpio { gpio: 0 },
    alts:    &[ModeEntry {
        pins: PinSet::List(&[238, 239]),
        code: 3,
        mode: DeviceMode::PwmOutput,
    }],
};

/// Controller for the Rockchip RK3288 (ASUS Tinker Board).
pub fn controller() -> MmapGpio {
    MmapGpioController::new(&LAYOUT, &CODEC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Decoded;
    use crate::layout::GpioAddress;

    #[test]
    fn bank_zero_declares_24_pins() {
        assert_eq!(LAYOUT.locate(23).unwrap(), GpioAddress { bank: 0, offset: 23 });
        assert_eq!(LAYOUT.locate(24).unwrap(), GpioAddress { bank: 1, offset: 0 });
        // GPIO7_C6: the uniform bank-of-32 arithmetic would land 8 pins off.
        assert_eq!(LAYOUT.locate(238).unwrap(), GpioAddress { bank: 7, offset: 22 });
        assert!(LAYOUT.locate(280).is_err());
    }

    #[test]
    fn every_pin_round_trips() {
        assert_eq!(LAYOUT.declared_pins().count(), 280);
        for gpio in LAYOUT.declared_pins() {
            assert_eq!(LAYOUT.gpio_number(LAYOUT.locate(gpio).unwrap()), gpio);
        }
    }

    #[test]
    fn mux_entries_cover_the_scattered_words() {
        let locate = |gpio: u16| {
            IOMUX
                .iter()
                .find(|entry| entry.pins.contains(gpio))
                .map(|entry| entry.locate(gpio))
                .unwrap()
        };
        let pmu = locate(17);
        assert_eq!((pmu.window, pmu.word, pmu.shift, pmu.width), (PMU, 35, 2, 2));
        assert_eq!((locate(163).window, locate(163).word, locate(163).shift), (GRF, 20, 6));
        assert_eq!((locate(238).word, locate(238).shift, locate(238).width), (30, 8, 4));
        assert_eq!((locate(239).word, locate(239).shift), (30, 12));
        assert_eq!((locate(257).word, locate(257).shift), (33, 2));
        assert!(IOMUX.iter().all(|entry| !entry.pins.contains(100)));
    }

    #[test]
    fn pull_geometry_splits_at_bank_one() {
        let low = PMU_PULL.locate(GpioAddress { bank: 0, offset: 17 });
        assert_eq!((low.window, low.word, low.shift), (PMU, 27, 2));
        // Bank 7 renumbers to 6 on the GRF side.
        let high = GRF_PULL.locate(GpioAddress { bank: 6, offset: 22 });
        assert_eq!((high.window, high.word, high.shift), (GRF, 106, 12));
    }

    #[test]
    fn pwm_decode_is_limited_to_7c6_and_7c7() {
        assert_eq!(CODEC.decode(238, 3), Decoded::Alt(DeviceMode::PwmOutput));
        assert_eq!(CODEC.decode(239, 3), Decoded::Alt(DeviceMode::PwmOutput));
        assert_eq!(CODEC.decode(17, 3), Decoded::Unknown);
        assert_eq!(CODEC.decode(238, 0), Decoded::Gpio);
        assert_eq!(CODEC.encode(238, DeviceMode::PwmOutput), Some(3));
        assert_eq!(CODEC.encode(17, DeviceMode::PwmOutput), None);
    }
}
