use core::fmt;

use crate::error::UnexpectedEnd;
use crate::int::Int;
use crate::{Decoder, KnownMinLenDecoder};

/// Decodes a fixed-width, big-endian integer of type `T` (`u8`..`u64`, `i8`..`i64`).
pub struct IntDecoder<T: Int>(T::InnerDecoder);

impl<T: Int> IntDecoder<T> {
    pub fn new() -> Self {
        IntDecoder(Default::default())
    }
}

impl<T: Int> Default for IntDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Int> fmt::Debug for IntDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("IntDecoder").field(&self.0).finish()
    }
}

impl<T: Int> Decoder for IntDecoder<T> {
    type Value = T;
    type Error = UnexpectedEnd;

    fn decode_chunk(&mut self, bytes: &mut &[u8]) -> Result<(), Self::Error> {
        self.0.decode_chunk(bytes)
    }

    fn bytes_received(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        self.0.bytes_received(bytes)
    }

    fn end(self) -> Result<Self::Value, Self::Error> {
        self.0.end().map(Int::from_be_bytes)
    }
}

impl<T: Int> KnownMinLenDecoder for IntDecoder<T>
where
    T::InnerDecoder: KnownMinLenDecoder,
{
    fn min_required_bytes(&self) -> usize {
        self.0.min_required_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::IntDecoder;
    use crate::Decoder;

    #[test]
    fn u16_split() {
        let mut decoder = IntDecoder::<u16>::new();
        assert_eq!(decoder.bytes_received(&[0x01]).unwrap(), 1);
        assert_eq!(decoder.bytes_received(&[0x00]).unwrap(), 1);
        assert_eq!(decoder.end().unwrap(), 256);
    }

    #[test]
    fn i16_negative() {
        let mut decoder = IntDecoder::<i16>::new();
        assert_eq!(decoder.bytes_received(&[0xff, 0x00]).unwrap(), 2);
        assert_eq!(decoder.end().unwrap(), -256);
    }
}
