//! # LSB Embedding and Extraction
//!
//! Channel `i` carries payload bit `i` in its least significant bit; every
//! other bit of the channel is left alone. Each channel depends only on its
//! own index, so large carriers are cut into disjoint chunks and processed on
//! the rayon pool. `par_chunks_mut` guarantees no two workers share a slot,
//! and the call only returns once every chunk is done.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;
use rayon::prelude::*;

use super::channels::PixelChannelStream;
use super::error::{Result, StegoError};

/// How many channels have been processed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.done as f64 / self.total as f64
        }
    }
}

/// Optional per-chunk progress callback. May be called from worker threads.
pub type ProgressFn<'a> = Option<&'a (dyn Fn(Progress) + Sync)>;

/// When and how to split work across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parallelism {
    /// Channel count from which chunks run on the rayon pool.
    pub threshold: usize,
    /// Channels per chunk, and per progress report.
    pub chunk_size: usize,
}

impl Default for Parallelism {
    fn default() -> Self {
        Self {
            threshold: 1 << 20,
            chunk_size: 1 << 16,
        }
    }
}

impl Parallelism {
    /// Never leave the calling thread.
    pub fn sequential() -> Self {
        Self {
            threshold: usize::MAX,
            ..Self::default()
        }
    }

    fn chunk(&self) -> usize {
        self.chunk_size.max(1)
    }

    fn use_pool(&self, len: usize) -> bool {
        len >= self.threshold
    }
}

struct Tracker<'a> {
    done: AtomicUsize,
    total: usize,
    callback: ProgressFn<'a>,
}

impl<'a> Tracker<'a> {
    fn new(total: usize, callback: ProgressFn<'a>) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
            callback,
        }
    }

    fn advance(&self, n: usize) {
        if let Some(callback) = self.callback {
            let done = self.done.fetch_add(n, Ordering::Relaxed) + n;
            callback(Progress {
                done,
                total: self.total,
            });
        }
    }
}

fn write_lsbs(slots: &mut [u8], bits: &[u8]) {
    for (slot, bit) in slots.iter_mut().zip(bits) {
        *slot = (*slot & !1) | (bit & 1);
    }
}

fn read_lsbs(bits: &mut [u8], channels: &[u8]) {
    for (bit, channel) in bits.iter_mut().zip(channels) {
        *bit = channel & 1;
    }
}

/// Write `bits` into the LSBs of the first `bits.len()` channels.
///
/// Capacity is checked before anything is written, so on error the stream is
/// untouched.
///
/// # Errors
/// - [`StegoError::CapacityExceeded`] if `bits.len() > stream.len()`
pub fn embed(
    stream: &mut PixelChannelStream,
    bits: &[u8],
    parallelism: Parallelism,
    progress: ProgressFn,
) -> Result<()> {
    let available = stream.len();
    if bits.len() > available {
        return Err(StegoError::CapacityExceeded {
            required: bits.len(),
            available,
        });
    }

    let chunk = parallelism.chunk();
    let tracker = Tracker::new(bits.len(), progress);
    let slots = &mut stream.channels_mut()[..bits.len()];

    if parallelism.use_pool(bits.len()) {
        debug!("Embedding {} bits in parallel chunks of {}", bits.len(), chunk);
        slots
            .par_chunks_mut(chunk)
            .zip(bits.par_chunks(chunk))
            .for_each(|(slots, bits)| {
                write_lsbs(slots, bits);
                tracker.advance(bits.len());
            });
    } else {
        debug!("Embedding {} bits", bits.len());
        for (slots, bits) in slots.chunks_mut(chunk).zip(bits.chunks(chunk)) {
            write_lsbs(slots, bits);
            tracker.advance(bits.len());
        }
    }

    Ok(())
}

/// Read the LSB of every channel in the carrier.
pub fn extract(stream: &PixelChannelStream, parallelism: Parallelism, progress: ProgressFn) -> Vec<u8> {
    let channels = stream.channels();
    let chunk = parallelism.chunk();
    let tracker = Tracker::new(channels.len(), progress);
    let mut bits = vec![0u8; channels.len()];

    if parallelism.use_pool(channels.len()) {
        debug!("Extracting {} bits in parallel chunks of {}", channels.len(), chunk);
        bits.par_chunks_mut(chunk)
            .zip(channels.par_chunks(chunk))
            .for_each(|(bits, channels)| {
                read_lsbs(bits, channels);
                tracker.advance(channels.len());
            });
    } else {
        debug!("Extracting {} bits", channels.len());
        for (bits, channels) in bits.chunks_mut(chunk).zip(channels.chunks(chunk)) {
            read_lsbs(bits, channels);
            tracker.advance(channels.len());
        }
    }

    bits
}
