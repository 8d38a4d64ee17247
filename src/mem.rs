// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

use std::fs::OpenOptions;
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::ptr;

use crate::layout::WindowSpec;
use crate::Error;

/// One mapped block of GPIO registers, addressed as 32-bit words.
///
/// The production implementation is [`DevMemWindow`]; tests substitute a
/// heap-backed recorder through the same seam. Word indices are relative to
/// the window's declared base, not the page the mapping was rounded to.
pub trait RegisterWindow: Sized {
    fn map(spec: &'static WindowSpec) -> Result<Self, Error>;
    fn read(&self, index: usize) -> u32;
    fn write(&self, index: usize, value: u32);
}

/// A register window mapped from a physical-memory device file.
///
/// Reads and writes are single volatile 32-bit accesses. The mapping is
/// private to the owning controller; nothing here serializes concurrent
/// writers, so two threads mutating fields that share a register word can
/// lose an update. Callers that share a controller across threads must keep
/// one writer per register word.
#[derive(Debug)]
pub struct DevMemWindow {
    regs:       *mut u32,
    words:      usize,
    mapping:    *mut libc::c_void,
    mapped_len: usize,
}

// The raw pointers target MAP_SHARED device memory whose lifetime is tied
// to this struct, not to a thread.
unsafe impl Send for DevMemWindow {}
unsafe impl Sync for DevMemWindow {}

impl RegisterWindow for DevMemWindow {
    fn map(spec: &'static WindowSpec) -> Result<DevMemWindow, Error> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(spec.device)
            .map_err(|source| Error::HardwareMap { device: spec.device, source })?;

        let (page_base, skip, mapped_len) = page_span(spec.base, spec.len, page_size());
        let mapping = unsafe {
            libc::mmap(ptr::null_mut(),
                       mapped_len,
                       libc::PROT_READ | libc::PROT_WRITE,
                       libc::MAP_SHARED,
                       file.as_raw_fd(),
                       page_base as libc::off_t)
        };
        if mapping == libc::MAP_FAILED {
            return Err(Error::HardwareMap { device: spec.device, source: std::io::Error::last_os_error() });
        }
        // The fd can go away now; the mapping keeps the registers alive.
        log::debug!("mapped {} ({}) at {:#x}+{:#x}", spec.name, spec.device, spec.base, spec.len);
        Ok(DevMemWindow {
            regs: unsafe { mapping.byte_add(skip) } as *mut u32,
            words: spec.len / 4,
            mapping,
            mapped_len,
        })
    }

    fn read(&self, index: usize) -> u32 {
        assert!(index < self.words, "register word {index} outside window of {} words", self.words);
        unsafe { ptr::read_volatile(self.regs.add(index)) }
    }

    fn write(&self, index: usize, value: u32) {
        assert!(index < self.words, "register word {index} outside window of {} words", self.words);
        unsafe { ptr::write_volatile(self.regs.add(index), value) }
    }
}

impl Drop for DevMemWindow {
    fn drop(&mut self) {
        if unsafe { libc::munmap(self.mapping, self.mapped_len) } != 0 {
            log::warn!("munmap of {} bytes failed: {}", self.mapped_len, std::io::Error::last_os_error());
        }
    }
}

fn page_size() -> usize {
    match unsafe { libc::sysconf(libc::_SC_PAGESIZE) } {
        n if n > 0 => n as usize,
        _          => 4096,
    }
}

// mmap offsets must be page-aligned: round the base down and pad the length
// so the declared span still fits, remembering how far into the mapping the
// first declared word sits.
fn page_span(base: u64, len: usize, page: usize) -> (u64, usize, usize) {
    let page_base = base & !(page as u64 - 1);
    let skip = (base - page_base) as usize;
    let mapped_len = (skip + len).next_multiple_of(page);
    (page_base, skip, mapped_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_base_maps_verbatim() {
        assert_eq!(page_span(0xFF75_0000, 0x1000, 4096), (0xFF75_0000, 0, 0x1000));
    }

    #[test]
    fn unaligned_base_rounds_down_and_pads() {
        let (page_base, skip, mapped_len) = page_span(0x01C2_0800, 0x1000, 4096);
        assert_eq!(page_base, 0x01C2_0000);
        assert_eq!(skip, 0x800);
        assert_eq!(mapped_len, 0x2000);
    }

    #[test]
    fn exact_page_multiple_is_not_padded() {
        assert_eq!(page_span(0, 0x2000, 4096), (0, 0, 0x2000));
    }
}
