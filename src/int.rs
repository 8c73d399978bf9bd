//! Tools for decoding big-endian integers.
//!
//! MessagePack's scalar and length fields are always big-endian; unlike the crate
//! this module is grown from, there is no little-endian variant or generic
//! `ByteOrder` parameter here — it would have no caller.

use crate::{Decoder, decoders::ByteArrayDecoder};

pub trait Int: sealed::Int {
    #[doc(hidden)]
    type InnerDecoder: Decoder<Value = Self::Bytes, Error = crate::error::UnexpectedEnd> + Default + core::fmt::Debug;
    #[doc(hidden)]
    type Bytes: AsRef<[u8]>;

    #[doc(hidden)]
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_int {
    ($($int:ty),+) => {
        $(
            impl Int for $int {
                type InnerDecoder = ByteArrayDecoder<{ core::mem::size_of::<Self>() }>;
                type Bytes = [u8; { core::mem::size_of::<Self>() }];

                fn from_be_bytes(bytes: Self::Bytes) -> Self {
                    <$int>::from_be_bytes(bytes)
                }
            }

            impl sealed::Int for $int {}
        )+
    }
}

impl_int!(u8, i8, u16, i16, u32, i32, u64, i64);

mod sealed {
    pub trait Int {}
}
