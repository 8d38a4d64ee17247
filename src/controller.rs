// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

//! The generic register engine. One controller drives every supported SoC,
//! parameterized by a [`GpioLayout`] describing the register geometry and a
//! [`ModeCodec`] giving the per-pin meaning of function-select codes; the
//! backends contribute data tables, never engine code.

use crate::codec::{Decoded, ModeCodec};
use crate::delay::{Delay, SpinDelay};
use crate::layout::{
    FieldLocator, FieldSpec, GpioAddress, GpioLayout, ModeSelect, OutputControl, PullControl,
    WriteStyle,
};
use crate::mem::{DevMemWindow, RegisterWindow};
use crate::{DeviceMode, Error, PullMode};

/// Pull latch settle time. The resistor's propagation delay is specified in
/// the hundreds of nanoseconds; a microsecond of spin covers it with margin.
const LATCH_SETTLE_NANOS: u64 = 1_000;

/// Memory-mapped GPIO controller over a set of register windows.
///
/// Construction is free and touches no hardware; every register window is
/// mapped by [`initialise`](MmapGpioController::initialise) and unmapped by
/// [`close`](MmapGpioController::close) or drop. Mutating operations take
/// `&mut self`: the hardware gives no atomicity for read-modify-write
/// updates, so exclusive access is the concurrency contract.
pub struct MmapGpioController<W = DevMemWindow, D = SpinDelay> {
    layout:  &'static GpioLayout,
    codec:   &'static ModeCodec,
    windows: Vec<W>,
    delay:   D,
}

/// The production controller, backed by mapped device memory.
pub type MmapGpio = MmapGpioController<DevMemWindow, SpinDelay>;

impl<W: RegisterWindow, D: Delay + Default> MmapGpioController<W, D> {
    pub(crate) fn new(layout: &'static GpioLayout, codec: &'static ModeCodec) -> Self {
        Self::with_delay(layout, codec, D::default())
    }
}

impl<W: RegisterWindow, D: Delay> MmapGpioController<W, D> {
    pub(crate) fn with_delay(layout: &'static GpioLayout, codec: &'static ModeCodec, delay: D) -> Self {
        MmapGpioController { layout, codec, windows: Vec::new(), delay }
    }

    /// Maps every register window the layout declares. Idempotent; only the
    /// first call performs any mapping work.
    pub fn initialise(&mut self) -> Result<(), Error> {
        if self.windows.is_empty() {
            let mut windows = Vec::with_capacity(self.layout.windows.len());
            for spec in self.layout.windows {
                windows.push(W::map(spec)?);
            }
            self.windows = windows;
        }
        Ok(())
    }

    /// Unmaps the register windows. Operations fail with
    /// [`Error::NotInitialised`] until `initialise` is called again.
    pub fn close(&mut self) {
        self.windows.clear();
    }

    /// Current mode of `gpio`, decoded from its function-select field (and
    /// the direction register where GPIO duty is a single mux code).
    pub fn mode(&self, gpio: u16) -> Result<DeviceMode, Error> {
        self.check_mapped()?;
        let addr = self.layout.locate(gpio)?;
        let Some(loc) = self.mode_locator(gpio, addr) else {
            log::warn!("no mux register known for gpio {gpio}");
            return Ok(DeviceMode::Unknown);
        };
        Ok(match self.codec.decode(gpio, self.read_field(loc)) {
            Decoded::Input => DeviceMode::DigitalInput,
            Decoded::Output => DeviceMode::DigitalOutput,
            Decoded::Gpio => {
                let output = self
                    .layout
                    .direction
                    .is_some_and(|dir| self.read_field(dir.locate(addr)) != 0);
                if output { DeviceMode::DigitalOutput } else { DeviceMode::DigitalInput }
            }
            Decoded::Alt(mode) => mode,
            Decoded::Unknown => DeviceMode::Unknown,
        })
    }

    /// Switches `gpio` to `mode`. Fails without touching any register when
    /// the pin's table does not declare the mode.
    pub fn set_mode(&mut self, gpio: u16, mode: DeviceMode) -> Result<(), Error> {
        self.check_mapped()?;
        let addr = self.layout.locate(gpio)?;
        let loc = self
            .mode_locator(gpio, addr)
            .ok_or(Error::UnsupportedMode { gpio, mode })?;
        let code = self
            .codec
            .encode(gpio, mode)
            .ok_or(Error::UnsupportedMode { gpio, mode })?;
        log::trace!("gpio {gpio}: {mode} selected with code {code:#b}");
        self.write_field(loc, code);
        if let Some(dir) = self.layout.direction {
            match mode {
                DeviceMode::DigitalInput => self.write_field(dir.locate(addr), 0),
                DeviceMode::DigitalOutput => self.write_field(dir.locate(addr), 1),
                _ => {}
            }
        }
        Ok(())
    }

    /// Writes a raw function-select code with no legality check against the
    /// pin's mode table. `gpio` must still be a declared pin.
    pub fn set_mode_unchecked(&mut self, gpio: u16, code: u32) -> Result<(), Error> {
        self.check_mapped()?;
        let addr = self.layout.locate(gpio)?;
        match self.mode_locator(gpio, addr) {
            Some(loc) => self.write_field(loc, code),
            None => log::warn!("no mux register known for gpio {gpio}; code {code:#x} not written"),
        }
        Ok(())
    }

    /// Level currently visible on `gpio`.
    pub fn read(&self, gpio: u16) -> Result<bool, Error> {
        self.check_mapped()?;
        let addr = self.layout.locate(gpio)?;
        Ok(self.read_field(self.layout.input.locate(addr)) != 0)
    }

    /// Drives `gpio` to `level`. The pin must already be in an output mode.
    pub fn write(&mut self, gpio: u16, level: bool) -> Result<(), Error> {
        self.check_mapped()?;
        let addr = self.layout.locate(gpio)?;
        match self.layout.output {
            OutputControl::SetClear { set, clear } => {
                let loc = if level { set.locate(addr) } else { clear.locate(addr) };
                self.window(loc.window).write(loc.word, 1 << loc.shift);
            }
            OutputControl::Data(spec) => self.write_field(spec.locate(addr), level as u32),
        }
        Ok(())
    }

    /// Current pull setting, where the SoC can report one.
    pub fn pull_up_down(&self, gpio: u16) -> Result<Option<PullMode>, Error> {
        self.check_mapped()?;
        let addr = self.layout.locate(gpio)?;
        Ok(match self.layout.pull {
            PullControl::Field { spec, codes, readable: true } => {
                Some(codes.decode(self.read_field(spec.locate(addr))))
            }
            PullControl::SplitField { boundary, low, high, codes } => {
                let loc = split_pull_locator(boundary, low, high, addr);
                Some(codes.decode(self.read_field(loc)))
            }
            _ => None,
        })
    }

    /// Programs the pull resistor. Where the SoC exposes no reachable pull
    /// control this logs and leaves every register untouched.
    pub fn set_pull_up_down(&mut self, gpio: u16, pull: PullMode) -> Result<(), Error> {
        self.check_mapped()?;
        let addr = self.layout.locate(gpio)?;
        match self.layout.pull {
            PullControl::Field { spec, codes, .. } => {
                self.write_field(spec.locate(addr), codes.encode(pull));
            }
            PullControl::SplitField { boundary, low, high, codes } => {
                let loc = split_pull_locator(boundary, low, high, addr);
                self.write_field(loc, codes.encode(pull));
            }
            PullControl::ClockedLatch { control_word, clock, codes } => {
                // Latch protocol: code into the shared control word, settle,
                // one-hot pulse on the bank's clock register to latch the
                // code onto this pin, settle, then clear both registers.
                // The ordering and the two delays are a hardware contract.
                let clock_loc = clock.locate(addr);
                let window = self.window(clock_loc.window);
                window.write(control_word, codes.encode(pull));
                self.delay.busy_sleep(LATCH_SETTLE_NANOS);
                window.write(clock_loc.word, 1 << clock_loc.shift);
                self.delay.busy_sleep(LATCH_SETTLE_NANOS);
                window.write(control_word, 0);
                window.write(clock_loc.word, 0);
            }
            PullControl::None => {
                log::warn!("pull control is not mapped on this SoC; gpio {gpio} left as-is");
            }
        }
        Ok(())
    }

    fn check_mapped(&self) -> Result<(), Error> {
        if self.windows.is_empty() {
            Err(Error::NotInitialised)
        } else {
            Ok(())
        }
    }

    fn window(&self, index: usize) -> &W {
        &self.windows[index]
    }

    fn mode_locator(&self, gpio: u16, addr: GpioAddress) -> Option<FieldLocator> {
        match self.layout.mode {
            ModeSelect::Field(spec) => Some(spec.locate(addr)),
            ModeSelect::PinTable(entries) => entries
                .iter()
                .find(|entry| entry.pins.contains(gpio))
                .map(|entry| entry.locate(gpio)),
        }
    }

    fn read_field(&self, loc: FieldLocator) -> u32 {
        (self.window(loc.window).read(loc.word) >> loc.shift) & loc.mask()
    }

    fn write_field(&self, loc: FieldLocator, value: u32) {
        let value = value & loc.mask();
        let window = self.window(loc.window);
        match loc.write {
            WriteStyle::ReadModifyWrite => {
                let word = window.read(loc.word);
                window.write(loc.word, word & !(loc.mask() << loc.shift) | (value << loc.shift));
            }
            WriteStyle::WriteEnable => {
                window.write(loc.word, (value << loc.shift) | (loc.mask() << (loc.shift + 16)));
            }
        }
    }
}

fn split_pull_locator(boundary: u16, low: FieldSpec, high: FieldSpec, addr: GpioAddress) -> FieldLocator {
    if addr.bank < boundary {
        low.locate(addr)
    } else {
        high.locate(GpioAddress { bank: addr.bank - boundary, offset: addr.offset })
    }
}
