use alloc::vec::Vec;
use core::fmt;

use crate::error::UnexpectedEnd;
use crate::{Decoder, KnownMinLenDecoder};

pub struct ByteVecDecoder {
    buf: Vec<u8>,
    required: usize,
}

impl ByteVecDecoder {
    /// Does not pre-allocate `required_bytes` up front: that length comes straight off
    /// the wire and a caller could claim up to `u32::MAX` in a handful of header bytes.
    /// Capacity grows incrementally in [`Decoder::bytes_received`], bounded by what has
    /// actually arrived.
    pub fn new(required_bytes: usize) -> Self {
        ByteVecDecoder { buf: Vec::new(), required: required_bytes }
    }
}

impl Decoder for ByteVecDecoder {
    type Value = Vec<u8>;
    type Error = Error;

    fn bytes_received(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        let to_copy = bytes.len().min(self.required - self.buf.len());
        self.buf.try_reserve(to_copy).map_err(|_| Error::AllocationFailed)?;
        self.buf.extend_from_slice(&bytes[..to_copy]);
        Ok(to_copy)
    }

    fn end(self) -> Result<Self::Value, Self::Error> {
        if self.buf.len() < self.required {
            Err(Error::UnexpectedEnd(UnexpectedEnd { missing: self.required - self.buf.len() }))
        } else {
            Ok(self.buf)
        }
    }
}

impl KnownMinLenDecoder for ByteVecDecoder {
    fn min_required_bytes(&self) -> usize {
        self.required - self.buf.len()
    }
}

#[derive(Debug)]
pub enum Error {
    UnexpectedEnd(UnexpectedEnd),
    AllocationFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnexpectedEnd(_) => write!(f, "unexpected end"),
            Error::AllocationFailed => write!(f, "allocation failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnexpectedEnd(error) => Some(error),
            Error::AllocationFailed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ByteVecDecoder;
    use crate::Decoder;

    #[test]
    fn empty() {
        let mut decoder = ByteVecDecoder::new(0);
        assert_eq!(decoder.bytes_received(&[42]).unwrap(), 0);
        decoder.end().unwrap();
    }

    #[test]
    fn empty_immediate_end() {
        let decoder = ByteVecDecoder::new(0);
        decoder.end().unwrap();
    }

    #[test]
    fn one() {
        let mut decoder = ByteVecDecoder::new(1);
        assert_eq!(decoder.bytes_received(&[42, 21]).unwrap(), 1);
        assert_eq!(decoder.end().unwrap(), [42]);
    }

    #[test]
    fn one_immediate_end() {
        let mut decoder = ByteVecDecoder::new(1);
        assert_eq!(decoder.bytes_received(&[42]).unwrap(), 1);
        assert_eq!(decoder.end().unwrap(), [42]);
    }

    #[test]
    fn two_single() {
        let mut decoder = ByteVecDecoder::new(2);
        assert_eq!(decoder.bytes_received(&[42, 21]).unwrap(), 2);
        assert_eq!(decoder.end().unwrap(), [42, 21]);
    }

    #[test]
    fn two_split() {
        let mut decoder = ByteVecDecoder::new(2);
        assert_eq!(decoder.bytes_received(&[42]).unwrap(), 1);
        assert_eq!(decoder.bytes_received(&[21]).unwrap(), 1);
        assert_eq!(decoder.end().unwrap(), [42, 21]);
    }

    #[test]
    fn two_split_extra() {
        let mut decoder = ByteVecDecoder::new(2);
        assert_eq!(decoder.bytes_received(&[42]).unwrap(), 1);
        assert_eq!(decoder.bytes_received(&[21, 47]).unwrap(), 1);
        assert_eq!(decoder.end().unwrap(), [42, 21]);
    }

    #[test]
    fn new_does_not_preallocate_the_declared_length() {
        // A handful of header bytes can claim up to u32::MAX payload bytes; capacity
        // must not be reserved until bytes actually arrive.
        let decoder = ByteVecDecoder::new(u32::MAX as usize);
        assert_eq!(decoder.buf.capacity(), 0);
    }

    #[test]
    fn unexpected_end_reports_the_missing_count() {
        let mut decoder = ByteVecDecoder::new(4);
        assert_eq!(decoder.bytes_received(&[1, 2]).unwrap(), 2);
        match decoder.end().unwrap_err() {
            super::Error::UnexpectedEnd(missing) => assert_eq!(missing.missing, 2),
            other => panic!("unexpected {other:?}"),
        }
    }
}
