// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

//! Allwinner PIO layouts: the H6 (Orange Pi 3 class boards) and the older
//! R8/A13 (Next Thing CHIP).
//!
//! Ports are fixed-stride blocks of nine words: four CONFIG words holding
//! 3-bit mode codes in 4-bit slots, one DATA word, two DRIVE words and two
//! PULL words of 2-bit fields. The H6 splits its ports across two windows,
//! CPU-side PIO plus the low-power R_PIO domain starting at port L. The R8
//! keeps a single PIO block 0x800 bytes into its window, and its pull
//! fields are treated as write-only.

use crate::codec::{DigitalCodes, ModeCodec, ModeEntry};
use crate::layout::{
    FieldSpec, GpioLayout, ModeSelect, OutputControl, PinNumbering, PinSet, PullCodes,
    PullControl, WindowRoute, WindowSpec, WriteStyle,
};
use crate::{DeviceMode, MmapGpio, MmapGpioController};

// 0x24 bytes from one port block to the next.
const PORT_WORDS: usize = 9;

const fn port_field(
    route: WindowRoute,
    base_word: usize,
    fields_per_word: u16,
    step: u32,
    width: u32,
) -> FieldSpec {
    FieldSpec {
        route,
        bank_stride: PORT_WORDS,
        base_word,
        fields_per_word,
        step,
        width,
        write: WriteStyle::ReadModifyWrite,
    }
}

const H6_ROUTE: WindowRoute = WindowRoute::SplitAt { boundary: 11, low: 0, high: 1 };
const H6_CONFIG: FieldSpec = port_field(H6_ROUTE, 0, 8, 4, 3);
const H6_DATA: FieldSpec = port_field(H6_ROUTE, 4, 32, 1, 1);
const H6_PULL: FieldSpec = port_field(H6_ROUTE, 7, 16, 2, 2);

static H6_WINDOWS: [WindowSpec; 2] = [
    WindowSpec { name: "pio", device: "/dev/mem", base: 0x0300_B000, len: 4096 },
    WindowSpec { name: "r_pio", device: "/dev/mem", base: 0x0702_2000, len: 4096 },
];

/// H6 ports C, D, F, G and H sit in the CPU-side window; L and M in the
/// low-power domain from bank 11 up.
pub(crate) static H6: GpioLayout = GpioLayout {
    windows:   &H6_WINDOWS,
    banks:     &[0, 0, 17, 27, 0, 7, 15, 11, 0, 0, 0, 11, 5],
    numbering: PinNumbering::Linear { pins_per_bank: 32 },
    mode:      ModeSelect::Field(H6_CONFIG),
    direction: None,
    input:     H6_DATA,
    output:    OutputControl::Data(H6_DATA),
    pull:      PullControl::Field {
        spec:     H6_PULL,
        codes:    PullCodes { none: 0, up: 1, down: 2 },
        readable: true,
    },
};

// H6 datasheet section 3.21: the same CONFIG code selects a different
// peripheral on every port.
pub(crate) static H6_CODEC: ModeCodec = ModeCodec {
    digital: DigitalCodes::InField { input: 0b000, output: 0b001 },
    alts:    &[
        ModeEntry { pins: PinSet::List(&[64, 66, 67, 69]), code: 4, mode: DeviceMode::Spi },
        ModeEntry { pins: PinSet::Range(115, 122), code: 4, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::One(118), code: 2, mode: DeviceMode::PwmOutput },
        ModeEntry { pins: PinSet::Range(119, 122), code: 2, mode: DeviceMode::I2c },
        ModeEntry { pins: PinSet::List(&[162, 164]), code: 3, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::Range(198, 201), code: 2, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::Range(224, 225), code: 2, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::Range(227, 230), code: 2, mode: DeviceMode::Spi },
        ModeEntry { pins: PinSet::Range(229, 230), code: 4, mode: DeviceMode::I2c },
        ModeEntry { pins: PinSet::Range(352, 353), code: 3, mode: DeviceMode::I2c },
        ModeEntry { pins: PinSet::Range(354, 355), code: 2, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::One(360), code: 2, mode: DeviceMode::PwmOutput },
        ModeEntry { pins: PinSet::One(362), code: 3, mode: DeviceMode::PwmOutput },
    ],
};

// The R8 PIO block starts 0x800 bytes into the mapped pair of pages.
const PIO_START: usize = 0x800 / 4;
const R8_CONFIG: FieldSpec = port_field(WindowRoute::Fixed(0), PIO_START, 8, 4, 3);
const R8_DATA: FieldSpec = port_field(WindowRoute::Fixed(0), PIO_START + 4, 32, 1, 1);
const R8_PULL: FieldSpec = port_field(WindowRoute::Fixed(0), PIO_START + 7, 16, 2, 2);

static R8_WINDOWS: [WindowSpec; 1] =
    [WindowSpec { name: "pio", device: "/dev/mem", base: 0x01C2_0000, len: 0x2000 }];

/// R8 ports B through G. Port G runs to PG13, the second PWM pin.
pub(crate) static R8: GpioLayout = GpioLayout {
    windows:   &R8_WINDOWS,
    banks:     &[0, 19, 20, 28, 12, 6, 14],
    numbering: PinNumbering::Linear { pins_per_bank: 32 },
    mode:      ModeSelect::Field(R8_CONFIG),
    direction: None,
    input:     R8_DATA,
    output:    OutputControl::Data(R8_DATA),
    pull:      PullControl::Field {
        spec:     R8_PULL,
        codes:    PullCodes { none: 0, up: 1, down: 2 },
        readable: false,
    },
};

pub(crate) static R8_CODEC: ModeCodec = ModeCodec {
    digital: DigitalCodes::InField { input: 0b000, output: 0b001 },
    alts:    &[ModeEntry {
        pins: PinSet::List(&[34, 205]),
        code: 0b010,
        mode: DeviceMode::PwmOutput,
    }],
};

/// Controller for the Allwinner H6 (Orange Pi 3 and friends).
pub fn h6() -> MmapGpio {
    MmapGpioController::new(&H6, &H6_CODEC)
}

/// Controller for the Allwinner R8/A13 (Next Thing CHIP).
pub fn r8() -> MmapGpio {
    MmapGpioController::new(&R8, &R8_CODEC)
}
