//! The owned, contiguous byte region a [`crate::StreamingDecoder`] decodes out of.
//!
//! `StreamBuffer` knows nothing about MessagePack; it only tracks an unread byte
//! range `[head, tail)` inside an owned allocation, growing or compacting that
//! allocation on demand up to a configured cap. The format decoder (`crate::format`)
//! is handed `readable_slice()` and tells the buffer how much of it to `advance`
//! past once bytes are committed.

use core::fmt;

use alloc::vec::Vec;

/// A source of bytes a [`crate::StreamingDecoder`] pulls from on demand.
///
/// Blanket-unimplementable for arbitrary closures to avoid a coherence conflict with
/// the `std::io::Read` impl below; wrap a closure with [`from_fn`] instead.
pub trait ByteProducer {
    type Error: fmt::Debug;

    /// Fills as much of `buf` as bytes are currently available, returning the number
    /// of bytes written. Returning `0` signals end-of-stream.
    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Adapts an `FnMut(&mut [u8]) -> Result<usize, E>` closure into a [`ByteProducer`].
pub struct FromFn<F>(pub F);

/// Wraps a closure as a [`ByteProducer`].
pub fn from_fn<F, E>(f: F) -> FromFn<F>
where
    F: FnMut(&mut [u8]) -> Result<usize, E>,
    E: fmt::Debug,
{
    FromFn(f)
}

impl<F, E> ByteProducer for FromFn<F>
where
    F: FnMut(&mut [u8]) -> Result<usize, E>,
    E: fmt::Debug,
{
    type Error = E;

    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        (self.0)(buf)
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteProducer for R {
    type Error = std::io::Error;

    fn pull(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.read(buf)
    }
}

/// Buffer-level failure: growth would exceed `max_buffer_size`, or an allocation
/// could not be satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    Full,
    AllocationFailed,
}

/// The outcome of a producer pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullOutcome {
    /// `n` new bytes are now readable (`n` may be less than requested).
    Filled(usize),
    /// The producer returned zero bytes: end-of-stream.
    Exhausted,
}

/// A pull attempt failed either at the buffer (capacity) or at the producer itself.
#[derive(Debug)]
pub enum PullError<E> {
    Buffer(BufferError),
    Producer(E),
}

/// Owns `buf[0..buf.capacity()]`; `[head, buf.len())` is the unread region.
pub struct StreamBuffer {
    buf: Vec<u8>,
    head: usize,
    max_buffer_size: usize,
    read_size: usize,
}

impl StreamBuffer {
    pub fn new(max_buffer_size: usize, read_size: usize) -> Self {
        StreamBuffer { buf: Vec::new(), head: 0, max_buffer_size, read_size }
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn tail(&self) -> usize {
        self.buf.len()
    }

    pub fn unread_len(&self) -> usize {
        self.buf.len() - self.head
    }

    pub fn readable_slice(&self) -> &[u8] {
        &self.buf[self.head..]
    }

    /// Moves `head` forward by `n`. `n` must not exceed the currently unread length.
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.unread_len(), "advance past tail");
        self.head += n;
        if self.head == self.buf.len() {
            // Fully drained: reclaim without waiting for the next append to compact.
            self.buf.clear();
            self.head = 0;
        }
    }

    /// Appends caller-supplied bytes (push-fed mode), compacting or growing first if
    /// needed.
    pub fn append(&mut self, src: &[u8]) -> Result<(), BufferError> {
        self.ensure_room(src.len())?;
        self.buf.extend_from_slice(src);
        Ok(())
    }

    /// Pulls up to `min(read_size, max_buffer_size - unread_len)` bytes from
    /// `producer` (producer-backed mode), compacting or growing first if needed.
    pub fn feed_from_producer<P: ByteProducer>(&mut self, producer: &mut P) -> Result<PullOutcome, PullError<P::Error>> {
        let room = self.max_buffer_size.saturating_sub(self.unread_len());
        let want = self.read_size.min(room);
        if want == 0 {
            return Err(PullError::Buffer(BufferError::Full));
        }
        self.ensure_room(want).map_err(PullError::Buffer)?;

        let start = self.buf.len();
        self.buf.resize(start + want, 0);
        let filled = producer.pull(&mut self.buf[start..]).map_err(PullError::Producer)?;
        self.buf.truncate(start + filled);

        if filled == 0 {
            Ok(PullOutcome::Exhausted)
        } else {
            Ok(PullOutcome::Filled(filled))
        }
    }

    /// Implements the compact-or-grow policy from the append contract: make room for
    /// `additional` more bytes past the current tail.
    fn ensure_room(&mut self, additional: usize) -> Result<(), BufferError> {
        if self.buf.len() + additional <= self.buf.capacity() {
            return Ok(());
        }

        let unread = self.unread_len();
        let needed = unread + additional;

        if needed <= self.buf.capacity() {
            // Compact: unread bytes already fit, they're just sitting past head.
            self.buf.copy_within(self.head..self.buf.len(), 0);
            self.buf.truncate(unread);
            self.head = 0;
            return Ok(());
        }

        if needed > self.max_buffer_size {
            return Err(BufferError::Full);
        }

        let new_capacity = (needed.saturating_mul(2)).min(self.max_buffer_size);
        let mut grown = Vec::new();
        grown.try_reserve_exact(new_capacity).map_err(|_| BufferError::AllocationFailed)?;
        grown.extend_from_slice(&self.buf[self.head..]);
        self.buf = grown;
        self.head = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_advance() {
        let mut buf = StreamBuffer::new(usize::MAX, 64);
        buf.append(&[1, 2, 3]).unwrap();
        assert_eq!(buf.readable_slice(), &[1, 2, 3]);
        buf.advance(2);
        assert_eq!(buf.readable_slice(), &[3]);
    }

    #[test]
    fn fully_drained_resets_to_zero() {
        let mut buf = StreamBuffer::new(usize::MAX, 64);
        buf.append(&[1, 2]).unwrap();
        buf.advance(2);
        assert_eq!(buf.head(), 0);
        assert_eq!(buf.tail(), 0);
    }

    #[test]
    fn compaction_preserves_unread_bytes() {
        let mut buf = StreamBuffer::new(usize::MAX, 4);
        buf.append(&[1, 2, 3, 4]).unwrap();
        buf.advance(3);
        let before = buf.readable_slice().to_vec();
        buf.append(&[5, 6, 7]).unwrap();
        assert_eq!(&buf.readable_slice()[..before.len()], &before[..]);
        assert_eq!(buf.readable_slice(), &[4, 5, 6, 7]);
    }

    #[test]
    fn buffer_full_is_reported() {
        let mut buf = StreamBuffer::new(4, 4);
        buf.append(&[1, 2, 3, 4]).unwrap();
        let err = buf.append(&[5]).unwrap_err();
        assert_eq!(err, BufferError::Full);
    }

    #[test]
    fn never_exceeds_max_buffer_size() {
        let mut buf = StreamBuffer::new(10, 4);
        buf.append(&[0; 10]).unwrap();
        assert!(buf.buf.capacity() <= 10);
    }

    #[test]
    fn producer_pull_fills_and_signals_exhaustion() {
        let mut buf = StreamBuffer::new(usize::MAX, 8);
        let mut data: &[u8] = &[1, 2, 3];
        let outcome = buf.feed_from_producer(&mut from_fn(|dst: &mut [u8]| {
            let n = data.len().min(dst.len());
            dst[..n].copy_from_slice(&data[..n]);
            data = &data[n..];
            Ok::<_, core::convert::Infallible>(n)
        })).unwrap();
        assert_eq!(outcome, PullOutcome::Filled(3));
        assert_eq!(buf.readable_slice(), &[1, 2, 3]);

        let outcome = buf.feed_from_producer(&mut from_fn(|_: &mut [u8]| Ok::<_, core::convert::Infallible>(0))).unwrap();
        assert_eq!(outcome, PullOutcome::Exhausted);
    }
}
