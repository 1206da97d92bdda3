/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ByteDance and/or its affiliates.
 */

use bytes::Bytes;
use log::trace;

pub(crate) const DEFAULT_ADAPTIVE_REUSE_FACTOR: usize = 2;

/// A buffer allocation that was dropped and replaced by a new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Reallocated {
    pub(crate) dropped: usize,
    pub(crate) capacity: usize,
}

impl Reallocated {
    /// Log the reallocation.
    ///
    /// Do not call this with the sink lock held, the log backend may append to the same sink.
    pub(crate) fn log(&self) {
        trace!(
            "drop buffer of size {}, reallocate with size {}",
            self.dropped, self.capacity
        );
    }
}

/// Decides whether the buffer allocation is kept or replaced after each flush.
#[derive(Debug)]
pub(crate) enum SizingPolicy {
    /// The buffer always has this capacity, and it is replaced once filled up.
    Fixed { capacity: usize },
    /// The buffer is reused unless it has grown past `reuse_factor` times the
    /// average flushed size.
    Adaptive {
        reuse_factor: usize,
        total_size: usize,
        flush_count: usize,
    },
}

impl SizingPolicy {
    pub(crate) fn new(fixed_capacity: usize, reuse_factor: usize) -> Self {
        if fixed_capacity > 0 {
            SizingPolicy::Fixed {
                capacity: fixed_capacity,
            }
        } else {
            SizingPolicy::Adaptive {
                reuse_factor,
                total_size: 0,
                flush_count: 0,
            }
        }
    }

    pub(crate) fn initial_buffer(&self) -> Vec<u8> {
        match self {
            SizingPolicy::Fixed { capacity } => Vec::with_capacity(*capacity),
            SizingPolicy::Adaptive { .. } => Vec::new(),
        }
    }

    pub(crate) fn fixed_capacity(&self) -> Option<usize> {
        match self {
            SizingPolicy::Fixed { capacity } => Some(*capacity),
            SizingPolicy::Adaptive { .. } => None,
        }
    }

    /// Detach the buffered data and leave `buf` empty.
    ///
    /// The returned bytes never share storage with `buf` afterwards: either
    /// the data is copied out and `buf` is truncated for reuse, or the old
    /// allocation is moved out and `buf` gets a fresh one.
    pub(crate) fn take(&mut self, buf: &mut Vec<u8>) -> (Bytes, Option<Reallocated>) {
        match self.next_buffer(buf.len()) {
            Some(r) => {
                let data = Bytes::from(std::mem::replace(buf, Vec::with_capacity(r.capacity)));
                (data, Some(r))
            }
            None => {
                let data = Bytes::copy_from_slice(buf);
                buf.clear();
                (data, None)
            }
        }
    }

    pub(crate) fn reset(&mut self, buf: &mut Vec<u8>) -> Option<Reallocated> {
        let r = self.next_buffer(buf.len());
        match r {
            Some(r) => *buf = Vec::with_capacity(r.capacity),
            None => buf.clear(),
        }
        r
    }

    /// Returns the new allocation size if the current one with `len` bytes
    /// in use should be dropped, or `None` if it should be reused.
    fn next_buffer(&mut self, len: usize) -> Option<Reallocated> {
        match self {
            SizingPolicy::Fixed { capacity } => {
                if len >= *capacity {
                    Some(Reallocated {
                        dropped: len,
                        capacity: *capacity,
                    })
                } else {
                    None
                }
            }
            SizingPolicy::Adaptive {
                reuse_factor,
                total_size,
                flush_count,
            } => {
                *flush_count += 1;
                *total_size = total_size.saturating_add(len);
                let avg = *total_size / *flush_count;

                if len <= avg.saturating_mul(*reuse_factor) {
                    None
                } else {
                    Some(Reallocated {
                        dropped: len,
                        capacity: avg,
                    })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_reuse_until_full() {
        let mut policy = SizingPolicy::new(8, DEFAULT_ADAPTIVE_REUSE_FACTOR);
        let mut buf = policy.initial_buffer();
        assert_eq!(buf.capacity(), 8);

        buf.extend_from_slice(b"abc");
        let ptr = buf.as_ptr();
        let (data, r) = policy.take(&mut buf);
        assert_eq!(data.as_ref(), b"abc");
        assert_eq!(r, None);
        assert!(buf.is_empty());
        assert_eq!(buf.as_ptr(), ptr);

        buf.extend_from_slice(b"12345678");
        let (data, r) = policy.take(&mut buf);
        assert_eq!(data.as_ref(), b"12345678");
        assert_eq!(
            r,
            Some(Reallocated {
                dropped: 8,
                capacity: 8
            })
        );
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 8);
        assert_ne!(buf.as_ptr(), data.as_ptr());
    }

    #[test]
    fn fixed_oversized() {
        let mut policy = SizingPolicy::new(4, DEFAULT_ADAPTIVE_REUSE_FACTOR);
        let mut buf = policy.initial_buffer();
        buf.extend_from_slice(b"0123456789");
        assert!(policy.reset(&mut buf).is_some());
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 4);
    }

    #[test]
    fn adaptive_average() {
        let mut policy = SizingPolicy::new(0, DEFAULT_ADAPTIVE_REUSE_FACTOR);
        let mut buf = policy.initial_buffer();
        assert_eq!(buf.capacity(), 0);
        assert_eq!(policy.fixed_capacity(), None);

        for _ in 0..3 {
            buf.extend_from_slice(&[b'x'; 10]);
            let (data, r) = policy.take(&mut buf);
            assert_eq!(data.len(), 10);
            assert_eq!(r, None);
        }
        let SizingPolicy::Adaptive {
            total_size,
            flush_count,
            ..
        } = &policy
        else {
            panic!("should be adaptive");
        };
        assert_eq!(*total_size, 30);
        assert_eq!(*flush_count, 3);

        // grown far past the history, so it is not kept
        buf.extend_from_slice(&[b'y'; 100]);
        let (data, r) = policy.take(&mut buf);
        assert_eq!(data.len(), 100);
        assert_eq!(
            r,
            Some(Reallocated {
                dropped: 100,
                capacity: 130 / 4
            })
        );
        assert!(buf.is_empty());
        assert!(buf.capacity() < 100);
        assert!(buf.capacity() >= 130 / 4);
    }

    #[test]
    fn adaptive_reuse_within_factor() {
        let mut policy = SizingPolicy::new(0, DEFAULT_ADAPTIVE_REUSE_FACTOR);
        let mut buf = policy.initial_buffer();

        buf.extend_from_slice(&[b'x'; 16]);
        assert_eq!(policy.reset(&mut buf), None);
        let capacity = buf.capacity();
        assert!(capacity >= 16);

        buf.extend_from_slice(&[b'x'; 12]);
        assert_eq!(policy.reset(&mut buf), None);
        assert_eq!(buf.capacity(), capacity);
    }

    #[test]
    fn adaptive_larger_factor() {
        let mut policy = SizingPolicy::new(0, 100);
        let mut buf = policy.initial_buffer();

        buf.extend_from_slice(&[b'x'; 10]);
        policy.reset(&mut buf);
        buf.extend_from_slice(&[b'x'; 500]);
        let capacity = buf.capacity();
        assert_eq!(policy.reset(&mut buf), None);
        assert_eq!(buf.capacity(), capacity);
    }
}
