// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

//! Register-geometry descriptions shared by every SoC backend.
//!
//! A layout is pure data: window addresses, per-bank pin counts and field
//! geometries. The controller turns a layout plus a GPIO number into
//! register accesses; nothing in this module touches hardware, which is what
//! makes the address arithmetic testable on any machine.

use crate::{Error, PullMode};

/// One physically contiguous block of registers to map.
#[derive(Debug)]
pub struct WindowSpec {
    pub name:   &'static str,
    pub device: &'static str,
    pub base:   u64,
    pub len:    usize,
}

/// A GPIO number split into its hardware bank and intra-bank offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioAddress {
    pub bank:   u16,
    pub offset: u16,
}

/// How a multi-field register word is updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStyle {
    /// Read the word, splice the field in, write the word back.
    ReadModifyWrite,
    /// Single store carrying a write-enable mask in the upper half-word;
    /// bits without their enable bit set are ignored by the hardware.
    WriteEnable,
}

/// A fully resolved register field: which mapped window, which 32-bit word
/// in it, and where the field sits inside that word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLocator {
    pub window: usize,
    pub word:   usize,
    pub shift:  u32,
    pub width:  u32,
    pub write:  WriteStyle,
}

impl FieldLocator {
    pub fn mask(&self) -> u32 {
        ((1u64 << self.width) - 1) as u32
    }
}

/// Selects the mapped window a bank's registers live in.
#[derive(Debug, Clone, Copy)]
pub enum WindowRoute {
    /// Every bank lives in one window.
    Fixed(usize),
    /// Banks below `boundary` live in `low`; the rest live in `high`,
    /// renumbered from zero (Allwinner CPU-side vs low-power-domain ports).
    SplitAt { boundary: u16, low: usize, high: usize },
    /// One window per bank, `first` holding bank 0 (Rockchip GPIO blocks).
    PerBank { first: usize },
}

impl WindowRoute {
    /// Window index plus the bank number effective inside that window.
    pub fn resolve(&self, bank: u16) -> (usize, u16) {
        match *self {
            WindowRoute::Fixed(window) => (window, bank),
            WindowRoute::SplitAt { boundary, low, high } => {
                if bank < boundary {
                    (low, bank)
                } else {
                    (high, bank - boundary)
                }
            }
            WindowRoute::PerBank { first } => (first + bank as usize, 0),
        }
    }
}

/// Word index of the register holding `offset`'s field, given how many
/// fields the hardware packs into one 32-bit word.
pub fn register_index(bank: u16, bank_stride: usize, base_word: usize, offset: u16, fields_per_word: u16) -> usize {
    bank as usize * bank_stride + base_word + (offset / fields_per_word) as usize
}

/// Bit position of `offset`'s field inside its register word. `step` is the
/// distance between adjacent fields, which exceeds the field width where the
/// hardware pads each slot (Allwinner keeps 3-bit codes in 4-bit slots).
pub fn bit_shift(offset: u16, fields_per_word: u16, step: u32) -> u32 {
    (offset % fields_per_word) as u32 * step
}

/// Geometry of one register field repeated uniformly across banks and pins.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub route:           WindowRoute,
    pub bank_stride:     usize,
    pub base_word:       usize,
    pub fields_per_word: u16,
    pub step:            u32,
    pub width:           u32,
    pub write:           WriteStyle,
}

impl FieldSpec {
    pub fn locate(&self, addr: GpioAddress) -> FieldLocator {
        let (window, bank) = self.route.resolve(addr.bank);
        FieldLocator {
            window,
            word:  register_index(bank, self.bank_stride, self.base_word, addr.offset, self.fields_per_word),
            shift: bit_shift(addr.offset, self.fields_per_word, self.step),
            width: self.width,
            write: self.write,
        }
    }
}

/// How logical GPIO numbers map onto (bank, offset) pairs.
#[derive(Debug, Clone, Copy)]
pub enum PinNumbering {
    /// `gpio = bank * pins_per_bank + offset`, leaving numbering holes
    /// wherever a bank declares fewer pins than the stride.
    Linear { pins_per_bank: u16 },
    /// Banks are packed back to back; each bank's numbering starts where
    /// the previous bank's declared pins end.
    Cumulative,
}

/// The pins one alternate-function or mux table row applies to.
#[derive(Debug, Clone, Copy)]
pub enum PinSet {
    One(u16),
    /// Inclusive on both ends.
    Range(u16, u16),
    List(&'static [u16]),
}

impl PinSet {
    pub fn contains(&self, gpio: u16) -> bool {
        match *self {
            PinSet::One(pin)           => gpio == pin,
            PinSet::Range(first, last) => gpio >= first && gpio <= last,
            PinSet::List(pins)         => pins.contains(&gpio),
        }
    }
}

/// One row of a per-pin mode-select table, used where the mux registers are
/// too irregular for a single [`FieldSpec`] (RK3288 scatters them across PMU
/// and GRF words of mixed field widths).
#[derive(Debug, Clone, Copy)]
pub struct MuxEntry {
    pub pins:            PinSet,
    pub window:          usize,
    pub word:            usize,
    pub fields_per_word: u16,
    pub step:            u32,
    pub width:           u32,
    pub write:           WriteStyle,
}

impl MuxEntry {
    pub fn locate(&self, gpio: u16) -> FieldLocator {
        FieldLocator {
            window: self.window,
            word:   self.word,
            shift:  bit_shift(gpio, self.fields_per_word, self.step),
            width:  self.width,
            write:  self.write,
        }
    }
}

/// Where a pin's function-select field lives.
#[derive(Debug, Clone, Copy)]
pub enum ModeSelect {
    /// Uniform geometry across every declared pin.
    Field(FieldSpec),
    /// Irregular per-pin table; pins without a row have no reachable mux.
    PinTable(&'static [MuxEntry]),
}

/// How output levels are driven.
#[derive(Debug, Clone, Copy)]
pub enum OutputControl {
    /// Dedicated one-hot set and clear registers (Broadcom): a single
    /// store, never read back.
    SetClear { set: FieldSpec, clear: FieldSpec },
    /// A data register holding the level bit directly.
    Data(FieldSpec),
}

/// Hardware encodings of the three pull states.
#[derive(Debug, Clone, Copy)]
pub struct PullCodes {
    pub none: u32,
    pub up:   u32,
    pub down: u32,
}

impl PullCodes {
    pub fn encode(&self, pull: PullMode) -> u32 {
        match pull {
            PullMode::None     => self.none,
            PullMode::PullUp   => self.up,
            PullMode::PullDown => self.down,
        }
    }

    /// Reserved codes read back as disabled.
    pub fn decode(&self, raw: u32) -> PullMode {
        if raw == self.up {
            PullMode::PullUp
        } else if raw == self.down {
            PullMode::PullDown
        } else {
            PullMode::None
        }
    }
}

/// How pull resistors are programmed.
#[derive(Debug, Clone, Copy)]
pub enum PullControl {
    /// One field per pin, written like any other register field. `readable`
    /// is false where the hardware field is write-only.
    Field { spec: FieldSpec, codes: PullCodes, readable: bool },
    /// Like `Field`, but the geometry differs between low and high bank
    /// ranges (RK3288 keeps bank 0 in the PMU block, the rest in the GRF);
    /// high-side banks are renumbered from `boundary`.
    SplitField { boundary: u16, low: FieldSpec, high: FieldSpec, codes: PullCodes },
    /// Legacy clocked latch: the code goes into one shared control word and
    /// is latched onto a single pin through a per-bank clock register, with
    /// a settle delay on either side of the latch pulse.
    ClockedLatch { control_word: usize, clock: FieldSpec, codes: PullCodes },
    /// No pull programming on this SoC.
    None,
}

/// Complete register geometry for one SoC family.
#[derive(Debug)]
pub struct GpioLayout {
    pub windows:   &'static [WindowSpec],
    /// Declared pin count per bank; a zero-count bank reserves its number
    /// range without contributing pins.
    pub banks:     &'static [u16],
    pub numbering: PinNumbering,
    pub mode:      ModeSelect,
    /// Present where direction is held in a register distinct from the
    /// function-select field (Rockchip DDR registers).
    pub direction: Option<FieldSpec>,
    pub input:     FieldSpec,
    pub output:    OutputControl,
    pub pull:      PullControl,
}

impl GpioLayout {
    /// Splits a GPIO number into its hardware address, rejecting numbers
    /// that fall outside the declared pins.
    pub fn locate(&self, gpio: u16) -> Result<GpioAddress, Error> {
        let addr = match self.numbering {
            PinNumbering::Linear { pins_per_bank } => GpioAddress {
                bank:   gpio / pins_per_bank,
                offset: gpio % pins_per_bank,
            },
            PinNumbering::Cumulative => {
                let mut bank = 0u16;
                let mut rest = gpio;
                for &pins in self.banks {
                    if rest < pins {
                        break;
                    }
                    rest -= pins;
                    bank += 1;
                }
                GpioAddress { bank, offset: rest }
            }
        };
        if (addr.bank as usize) < self.banks.len() && addr.offset < self.banks[addr.bank as usize] {
            Ok(addr)
        } else {
            Err(Error::UnknownGpio { gpio, max: self.gpio_limit() })
        }
    }

    /// Inverse of [`GpioLayout::locate`] for a declared address.
    pub fn gpio_number(&self, addr: GpioAddress) -> u16 {
        match self.numbering {
            PinNumbering::Linear { pins_per_bank } => addr.bank * pins_per_bank + addr.offset,
            PinNumbering::Cumulative => {
                self.banks[..addr.bank as usize].iter().sum::<u16>() + addr.offset
            }
        }
    }

    /// One past the highest declared GPIO number.
    pub fn gpio_limit(&self) -> u16 {
        match self.numbering {
            PinNumbering::Linear { pins_per_bank } => self
                .banks
                .iter()
                .enumerate()
                .filter(|&(_, &pins)| pins > 0)
                .map(|(bank, &pins)| bank as u16 * pins_per_bank + pins)
                .last()
                .unwrap_or(0),
            PinNumbering::Cumulative => self.banks.iter().sum(),
        }
    }

    /// Every declared GPIO number, lowest first.
    pub fn declared_pins(&self) -> impl Iterator<Item = u16> + '_ {
        self.banks.iter().enumerate().flat_map(move |(bank, &pins)| {
            let start = match self.numbering {
                PinNumbering::Linear { pins_per_bank } => bank as u16 * pins_per_bank,
                PinNumbering::Cumulative => self.banks[..bank].iter().sum(),
            };
            start..start + pins
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMMY: FieldSpec = FieldSpec {
        route:           WindowRoute::Fixed(0),
        bank_stride:     0,
        base_word:       0,
        fields_per_word: 32,
        step:            1,
        width:           1,
        write:           WriteStyle::ReadModifyWrite,
    };

    fn layout(banks: &'static [u16], numbering: PinNumbering) -> GpioLayout {
        GpioLayout {
            windows: &[],
            banks,
            numbering,
            mode: ModeSelect::Field(DUMMY),
            direction: None,
            input: DUMMY,
            output: OutputControl::Data(DUMMY),
            pull: PullControl::None,
        }
    }

    #[test]
    fn ten_fields_per_word_splits_on_division() {
        // 3-bit function-select codes, ten to a word.
        assert_eq!(register_index(0, 0, 0, 18, 10), 1);
        assert_eq!(bit_shift(18, 10, 3), 24);
        assert_eq!(register_index(0, 0, 0, 9, 10), 0);
        assert_eq!(bit_shift(9, 10, 3), 27);
    }

    #[test]
    fn padded_slots_step_wider_than_the_field() {
        // 3-bit codes in 4-bit slots, eight to a word, nine words per bank.
        assert_eq!(register_index(2, 9, 0, 2, 8), 18);
        assert_eq!(bit_shift(2, 8, 4), 8);
        assert_eq!(register_index(2, 9, 0, 15, 8), 19);
        assert_eq!(bit_shift(15, 8, 4), 28);
    }

    #[test]
    fn routes_resolve_window_and_effective_bank() {
        assert_eq!(WindowRoute::Fixed(3).resolve(7), (3, 7));
        let split = WindowRoute::SplitAt { boundary: 11, low: 0, high: 1 };
        assert_eq!(split.resolve(2), (0, 2));
        assert_eq!(split.resolve(11), (1, 0));
        assert_eq!(split.resolve(12), (1, 1));
        assert_eq!(WindowRoute::PerBank { first: 0 }.resolve(4), (4, 0));
    }

    #[test]
    fn pin_sets_match_their_members() {
        assert!(PinSet::One(34).contains(34));
        assert!(!PinSet::One(34).contains(35));
        assert!(PinSet::Range(2, 3).contains(3));
        assert!(!PinSet::Range(2, 3).contains(4));
        assert!(PinSet::List(&[12, 13, 40, 41, 45]).contains(45));
        assert!(!PinSet::List(&[12, 13]).contains(14));
    }

    #[test]
    fn linear_numbering_rejects_holes() {
        let layout = layout(&[0, 3], PinNumbering::Linear { pins_per_bank: 32 });
        assert!(layout.locate(0).is_err());
        assert_eq!(layout.locate(33).unwrap(), GpioAddress { bank: 1, offset: 1 });
        assert!(layout.locate(35).is_err());
        assert_eq!(layout.gpio_limit(), 35);
        assert_eq!(layout.declared_pins().collect::<Vec<_>>(), vec![32, 33, 34]);
    }

    #[test]
    fn cumulative_numbering_packs_banks_back_to_back() {
        let layout = layout(&[24, 32], PinNumbering::Cumulative);
        assert_eq!(layout.locate(23).unwrap(), GpioAddress { bank: 0, offset: 23 });
        assert_eq!(layout.locate(24).unwrap(), GpioAddress { bank: 1, offset: 0 });
        assert_eq!(layout.locate(55).unwrap(), GpioAddress { bank: 1, offset: 31 });
        assert!(layout.locate(56).is_err());
        for gpio in layout.declared_pins() {
            let addr = layout.locate(gpio).unwrap();
            assert_eq!(layout.gpio_number(addr), gpio);
        }
    }

    #[test]
    fn locator_mask_covers_the_field_width() {
        let loc = FieldLocator { window: 0, word: 0, shift: 4, width: 3, write: WriteStyle::ReadModifyWrite };
        assert_eq!(loc.mask(), 0b111);
    }
}
