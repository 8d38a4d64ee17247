// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

//! Rockchip RK3588 layout (Orange Pi 5 class boards).
//!
//! Five GPIO banks of 32 pins, each bank in its own register window, with
//! the 4-bit IOMUX fields for all banks collected in the BUS_IOC block.
//! Mux code 0 hands the pin to the GPIO block, where the v2 data and
//! direction registers are half-word pairs guarded by write-enable masks
//! in the upper 16 bits. The per-rail pull IOC blocks are not mapped, so
//! pull control is unavailable on this layout.

use crate::codec::{DigitalCodes, ModeCodec};
use crate::layout::{
    FieldSpec, GpioLayout, ModeSelect, OutputControl, PinNumbering, PullControl, WindowRoute,
    WindowSpec, WriteStyle,
};
use crate::{MmapGpio, MmapGpioController};

const BUS_IOC: usize = 5;

static WINDOWS: [WindowSpec; 6] = [
    WindowSpec { name: "gpio0", device: "/dev/mem", base: 0xFD8A_0000, len: 4096 },
    WindowSpec { name: "gpio1", device: "/dev/mem", base: 0xFEC2_0000, len: 4096 },
    WindowSpec { name: "gpio2", device: "/dev/mem", base: 0xFEC3_0000, len: 4096 },
    WindowSpec { name: "gpio3", device: "/dev/mem", base: 0xFEC4_0000, len: 4096 },
    WindowSpec { name: "gpio4", device: "/dev/mem", base: 0xFEC5_0000, len: 4096 },
    WindowSpec { name: "bus_ioc", device: "/dev/mem", base: 0xFD5F_8000, len: 4096 },
];

// Eight IOMUX words per bank, four 4-bit fields each.
const IOMUX: FieldSpec = FieldSpec {
    route:           WindowRoute::Fixed(BUS_IOC),
    bank_stride:     8,
    base_word:       0,
    fields_per_word: 4,
    step:            4,
    width:           4,
    write:           WriteStyle::WriteEnable,
};

const fn bank_register(base_word: usize, fields_per_word: u16) -> FieldSpec {
    FieldSpec {
        route: WindowRoute::PerBank { first: 0 },
        bank_stride: 0,
        base_word,
        fields_per_word,
        step: 1,
        width: 1,
        write: WriteStyle::WriteEnable,
    }
}

// GPIO_SWPORT_DR at 0x00, GPIO_SWPORT_DDR at 0x08, GPIO_EXT_PORT at 0x70.
const DATA: FieldSpec = bank_register(0, 16);
const DIRECTION: FieldSpec = bank_register(2, 16);
const INPUT: FieldSpec = bank_register(28, 32);

pub(crate) static LAYOUT: GpioLayout = GpioLayout {
    windows:   &WINDOWS,
    banks:     &[32, 32, 32, 32, 32],
    numbering: PinNumbering::Linear { pins_per_bank: 32 },
    mode:      ModeSelect::Field(IOMUX),
    direction: Some(DIRECTION),
    input:     INPUT,
    output:    OutputControl::Data(DATA),
    pull:      PullControl::None,
};

// No alternate-function table has been filled in yet, so non-zero mux
// codes decode as unknown.
pub(crate) static CODEC: ModeCodec = ModeCodec {
    digital: DigitalCodes::MuxedGpio { gpio: 0 },
    alts:    &[],
};

/// Controller for the Rockchip RK3588/RK3588S.
pub fn controller() -> MmapGpio {
    MmapGpioController::new(&LAYOUT, &CODEC)
}
