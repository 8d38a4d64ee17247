// Copyright © 2025 the mmap-gpio developers
// SPDX-License-Identifier: MIT

//! Heap-backed register windows and a recording delay for controller tests.

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::delay::Delay;
use crate::layout::WindowSpec;
use crate::mem::RegisterWindow;
use crate::Error;

// One counter shared by every mock window and delay, so tests can assert
// ordering across windows and delay calls. Tests compare the relative order
// of sequence numbers they recorded themselves, never absolute values.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

fn next_seq() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRecord {
    pub seq:   u64,
    pub word:  usize,
    pub value: u32,
}

/// In-memory register window recording every store.
pub struct MockWindow {
    pub name: &'static str,
    words:    RefCell<Vec<u32>>,
    writes:   RefCell<Vec<WriteRecord>>,
}

impl RegisterWindow for MockWindow {
    fn map(spec: &'static WindowSpec) -> Result<MockWindow, Error> {
        Ok(MockWindow {
            name:   spec.name,
            words:  RefCell::new(vec![0; spec.len / 4]),
            writes: RefCell::new(Vec::new()),
        })
    }

    fn read(&self, index: usize) -> u32 {
        self.words.borrow()[index]
    }

    fn write(&self, index: usize, value: u32) {
        self.words.borrow_mut()[index] = value;
        self.writes.borrow_mut().push(WriteRecord { seq: next_seq(), word: index, value });
    }
}

impl MockWindow {
    /// Pre-loads a word without recording a write.
    pub fn seed(&self, index: usize, value: u32) {
        self.words.borrow_mut()[index] = value;
    }

    pub fn records(&self) -> Vec<WriteRecord> {
        self.writes.borrow().clone()
    }

    /// Write log as (word, value) pairs, in store order.
    pub fn write_log(&self) -> Vec<(usize, u32)> {
        self.writes.borrow().iter().map(|w| (w.word, w.value)).collect()
    }

    pub fn snapshot(&self) -> Vec<u32> {
        self.words.borrow().clone()
    }
}

/// Delay fake recording where each call fell in the global store sequence.
#[derive(Default)]
pub struct CountingDelay {
    calls: RefCell<Vec<u64>>,
}

impl CountingDelay {
    pub fn calls(&self) -> Vec<u64> {
        self.calls.borrow().clone()
    }
}

impl Delay for CountingDelay {
    fn busy_sleep(&self, _nanos: u64) {
        self.calls.borrow_mut().push(next_seq());
    }
}
