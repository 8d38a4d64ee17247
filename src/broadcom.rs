// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

//! Broadcom BCM283x and BCM2711 layouts (Raspberry Pi family).
//!
//! One register window covers everything: six function-select words of ten
//! 3-bit fields each, one-hot set/clear/level words split at GPIO 32, and
//! the pull registers. Pre-2711 chips program pulls through the clocked
//! GPPUD latch and cannot read them back; the BCM2711 has directly
//! addressable 2-bit pull fields. BCM2835 datasheet, page 90 onwards.

use crate::codec::{DigitalCodes, ModeCodec, ModeEntry};
use crate::layout::{
    FieldSpec, GpioLayout, ModeSelect, OutputControl, PinNumbering, PinSet, PullCodes,
    PullControl, WindowRoute, WindowSpec, WriteStyle,
};
use crate::{DeviceMode, MmapGpio, MmapGpioController};

const FSEL_INPUT: u32 = 0b000;
const FSEL_OUTPUT: u32 = 0b001;
const FSEL_ALT0: u32 = 0b100;
const FSEL_ALT1: u32 = 0b101;
const FSEL_ALT2: u32 = 0b110;
const FSEL_ALT3: u32 = 0b111;
const FSEL_ALT4: u32 = 0b011;
const FSEL_ALT5: u32 = 0b010;

// The restricted GPIO device ignores the offset and always maps the GPIO
// register block, so no physical base is needed.
static WINDOWS: [WindowSpec; 1] =
    [WindowSpec { name: "gpio", device: "/dev/gpiomem", base: 0, len: 4096 }];

const FSEL: FieldSpec = FieldSpec {
    route:           WindowRoute::Fixed(0),
    bank_stride:     0,
    base_word:       0,
    fields_per_word: 10,
    step:            3,
    width:           3,
    write:           WriteStyle::ReadModifyWrite,
};

const fn pin_bits(base_word: usize) -> FieldSpec {
    FieldSpec {
        route:           WindowRoute::Fixed(0),
        bank_stride:     0,
        base_word,
        fields_per_word: 32,
        step:            1,
        width:           1,
        write:           WriteStyle::ReadModifyWrite,
    }
}

// GPSET0 at 0x1C, GPCLR0 at 0x28, GPLEV0 at 0x34, GPPUD at 0x94, GPPUDCLK0
// at 0x98 and the BCM2711 GPIO_PUP_PDN_CNTRL_REG0 at 0xE4, as word indices.
const SET: FieldSpec = pin_bits(7);
const CLEAR: FieldSpec = pin_bits(10);
const LEVEL: FieldSpec = pin_bits(13);
const PUD: usize = 37;
const PUD_CLOCK: FieldSpec = pin_bits(38);

const PUD_2711: FieldSpec = FieldSpec {
    route:           WindowRoute::Fixed(0),
    bank_stride:     0,
    base_word:       57,
    fields_per_word: 16,
    step:            2,
    width:           2,
    write:           WriteStyle::ReadModifyWrite,
};

/// Pi 1 through 3 and the Zeros.
pub(crate) static BCM283X: GpioLayout = GpioLayout {
    windows:   &WINDOWS,
    banks:     &[54],
    numbering: PinNumbering::Linear { pins_per_bank: 54 },
    mode:      ModeSelect::Field(FSEL),
    direction: None,
    input:     LEVEL,
    output:    OutputControl::SetClear { set: SET, clear: CLEAR },
    pull:      PullControl::ClockedLatch {
        control_word: PUD,
        clock:        PUD_CLOCK,
        codes:        PullCodes { none: 0, up: 2, down: 1 },
    },
};

/// Pi 4 family. Same geometry apart from the pull registers, which are
/// per-pin fields with a different code assignment than the latch.
pub(crate) static BCM2711: GpioLayout = GpioLayout {
    windows:   &WINDOWS,
    banks:     &[54],
    numbering: PinNumbering::Linear { pins_per_bank: 54 },
    mode:      ModeSelect::Field(FSEL),
    direction: None,
    input:     LEVEL,
    output:    OutputControl::SetClear { set: SET, clear: CLEAR },
    pull:      PullControl::Field {
        spec:     PUD_2711,
        codes:    PullCodes { none: 0, up: 1, down: 2 },
        readable: true,
    },
};

// BCM2835 datasheet page 102. PWM0 sits on 12/40 at ALT0 and 18 at ALT5;
// PWM1 on 13/41/45 at ALT0, 19 at ALT5 and 52/53 at ALT1.
pub(crate) static CODEC: ModeCodec = ModeCodec {
    digital: DigitalCodes::InField { input: FSEL_INPUT, output: FSEL_OUTPUT },
    alts:    &[
        ModeEntry { pins: PinSet::List(&[12, 13, 40, 41, 45]), code: FSEL_ALT0, mode: DeviceMode::PwmOutput },
        ModeEntry { pins: PinSet::Range(0, 3), code: FSEL_ALT0, mode: DeviceMode::I2c },
        ModeEntry { pins: PinSet::Range(28, 29), code: FSEL_ALT0, mode: DeviceMode::I2c },
        ModeEntry { pins: PinSet::Range(7, 11), code: FSEL_ALT0, mode: DeviceMode::Spi },
        ModeEntry { pins: PinSet::Range(14, 15), code: FSEL_ALT0, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::List(&[52, 53]), code: FSEL_ALT1, mode: DeviceMode::PwmOutput },
        ModeEntry { pins: PinSet::Range(44, 45), code: FSEL_ALT1, mode: DeviceMode::I2c },
        ModeEntry { pins: PinSet::Range(36, 39), code: FSEL_ALT2, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::Range(44, 45), code: FSEL_ALT2, mode: DeviceMode::I2c },
        ModeEntry { pins: PinSet::Range(16, 17), code: FSEL_ALT3, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::Range(30, 33), code: FSEL_ALT3, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::Range(16, 21), code: FSEL_ALT4, mode: DeviceMode::Spi },
        ModeEntry { pins: PinSet::Range(40, 45), code: FSEL_ALT4, mode: DeviceMode::Spi },
        ModeEntry { pins: PinSet::Range(14, 17), code: FSEL_ALT5, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::Range(30, 33), code: FSEL_ALT5, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::Range(40, 43), code: FSEL_ALT5, mode: DeviceMode::Serial },
        ModeEntry { pins: PinSet::List(&[18, 19]), code: FSEL_ALT5, mode: DeviceMode::PwmOutput },
    ],
};

/// Controller for pre-BCM2711 Raspberry Pis.
pub fn bcm283x() -> MmapGpio {
    MmapGpioController::new(&BCM283X, &CODEC)
}

/// Controller for the BCM2711 (Raspberry Pi 4 family).
pub fn bcm2711() -> MmapGpio {
    MmapGpioController::new(&BCM2711, &CODEC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Decoded;

    #[test]
    fn fsel_words_pack_ten_pins() {
        for (gpio, word, shift) in [(0, 0, 0), (9, 0, 27), (10, 1, 0), (18, 1, 24), (53, 5, 9)] {
            let loc = FSEL.locate(BCM283X.locate(gpio).unwrap());
            assert_eq!((loc.word, loc.shift), (word, shift), "gpio {gpio}");
        }
    }

    #[test]
    fn level_and_set_registers_split_at_gpio_32() {
        let low = BCM283X.locate(18).unwrap();
        let high = BCM283X.locate(47).unwrap();
        assert_eq!(SET.locate(low).word, 7);
        assert_eq!(SET.locate(high).word, 8);
        assert_eq!(CLEAR.locate(high).word, 11);
        assert_eq!((LEVEL.locate(high).word, LEVEL.locate(high).shift), (14, 15));
    }

    #[test]
    fn pull_field_geometry_matches_the_2711_registers() {
        let PullControl::Field { spec, .. } = BCM2711.pull else {
            panic!("2711 pull should be a direct field");
        };
        let loc = spec.locate(BCM2711.locate(18).unwrap());
        assert_eq!((loc.word, loc.shift, loc.width), (58, 4, 2));
    }

    #[test]
    fn alt_codes_decode_per_pin() {
        assert_eq!(CODEC.decode(12, FSEL_ALT0), Decoded::Alt(DeviceMode::PwmOutput));
        assert_eq!(CODEC.decode(2, FSEL_ALT0), Decoded::Alt(DeviceMode::I2c));
        assert_eq!(CODEC.decode(9, FSEL_ALT0), Decoded::Alt(DeviceMode::Spi));
        assert_eq!(CODEC.decode(14, FSEL_ALT0), Decoded::Alt(DeviceMode::Serial));
        assert_eq!(CODEC.decode(52, FSEL_ALT1), Decoded::Alt(DeviceMode::PwmOutput));
        assert_eq!(CODEC.decode(37, FSEL_ALT2), Decoded::Alt(DeviceMode::Serial));
        assert_eq!(CODEC.decode(31, FSEL_ALT3), Decoded::Alt(DeviceMode::Serial));
        assert_eq!(CODEC.decode(20, FSEL_ALT4), Decoded::Alt(DeviceMode::Spi));
        assert_eq!(CODEC.decode(19, FSEL_ALT5), Decoded::Alt(DeviceMode::PwmOutput));
        assert_eq!(CODEC.decode(42, FSEL_ALT5), Decoded::Alt(DeviceMode::Serial));
        assert_eq!(CODEC.decode(5, FSEL_ALT0), Decoded::Unknown);
    }

    #[test]
    fn pwm_pins_encode_their_documented_alt_function() {
        assert_eq!(CODEC.encode(12, DeviceMode::PwmOutput), Some(FSEL_ALT0));
        assert_eq!(CODEC.encode(52, DeviceMode::PwmOutput), Some(FSEL_ALT1));
        assert_eq!(CODEC.encode(18, DeviceMode::PwmOutput), Some(FSEL_ALT5));
        assert_eq!(CODEC.encode(17, DeviceMode::PwmOutput), None);
    }

    #[test]
    fn every_declared_pin_round_trips() {
        for layout in [&BCM283X, &BCM2711] {
            assert_eq!(layout.declared_pins().count(), 54);
            for gpio in layout.declared_pins() {
                assert_eq!(layout.gpio_number(layout.locate(gpio).unwrap()), gpio);
            }
        }
    }
}
