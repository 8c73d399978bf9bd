//! # Streaming MessagePack decoding
//!
//! This crate provides a resumable, push-based MessagePack decoder core. Like the
//! crate it is grown from, it is **IO-agnostic**: the caller (or a tiny adapter) is
//! responsible for obtaining bytes and handing them to the decoder, either by pushing
//! them in (`feed`) or by supplying a [`ByteProducer`] the decoder pulls from on
//! demand. Nothing here spawns a thread, polls a future, or touches a socket.
//!
//! ```
//! use mpack_push::{decode, Config};
//!
//! let bytes = [0x93, 0x01, 0x02, 0x03];
//! let value = decode(&bytes, Config::default()).unwrap();
//! assert_eq!(value.as_array().unwrap().len(), 3);
//! ```
//!
//! # Features
//!
//! * `std` — enables `std::error::Error` impls on the error types and a convenience
//!   [`ByteProducer`] impl for any `std::io::Read`.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod buffer;
pub mod config;
pub mod decoders;
pub mod error;
pub mod format;
pub mod int;
pub mod marker;
pub mod value;

mod builder;
mod coordinator;

pub use buffer::ByteProducer;
pub use config::{Config, ConfigBuilder, DecodingErrors, StringEncoding};
pub use coordinator::{decode, StreamingDecoder};
pub use error::Error;
pub use value::Value;

/// Represents types responsible for decoding bytes pushed into them.
///
/// The types implementing this trait act like state machines (similar to futures) but
/// instead of pulling data from some internal source they receive it in method calls.
/// They are building blocks this crate's MessagePack format decoder is assembled from
/// (tag bytes, length fields, and scalar/string payloads are each an instance of this
/// trait); the trait itself carries no MessagePack-specific knowledge.
pub trait Decoder: Sized {
    /// The type of value produced by this decoder.
    type Value;
    /// Decoding error.
    type Error;

    /// Processes the next chunk of bytes and updates the cursor.
    ///
    /// If the bytes are valid the slice is updated to point to the unread part. Thus
    /// if the slice is non-empty after this method returns, the decoder ended
    /// decoding (it only consumed as much as it needed).
    ///
    /// # Errors
    ///
    /// An error is returned in case the bytes are invalid. **No** error may be
    /// returned if the number of bytes passed is not sufficient to decode the value —
    /// the remaining bytes will be passed in the following call(s) of this method.
    ///
    /// Implementors may instead override [`Decoder::bytes_received`] and rely on this
    /// default, or vice versa — exactly one of the two needs overriding.
    fn decode_chunk(&mut self, bytes: &mut &[u8]) -> Result<(), Self::Error> {
        let consumed = self.bytes_received(bytes)?;
        *bytes = &bytes[consumed..];
        Ok(())
    }

    /// Called when decoding has ended or there are no more bytes.
    ///
    /// The decoder must validate the bytes passed in so far if it didn't do so yet and
    /// return the decoded value, or an error if the bytes were invalid or insufficient.
    fn end(self) -> Result<Self::Value, Self::Error>;

    /// Processes the next chunk of bytes without updating the cursor, returning the
    /// number of bytes consumed instead.
    fn bytes_received(&mut self, mut bytes: &[u8]) -> Result<usize, Self::Error> {
        let prev_len = bytes.len();
        self.decode_chunk(&mut bytes)?;
        Ok(prev_len - bytes.len())
    }

    /// Chains another decoder after this one finishes such that the value of this one
    /// is used to initialize the next one.
    fn then<R: Decoder, F: FnOnce(Self::Value) -> R>(self, fun: F) -> decoders::combinators::Then<Self, R, F> {
        decoders::combinators::Then::new(self, fun)
    }

    /// Like [`Decoder::then`] but the initializer may also fail, converting both
    /// decoders' errors into a common one.
    fn then_try<E, R: Decoder, F: FnOnce(Self::Value) -> Result<R, E>>(self, fun: F) -> decoders::combinators::ThenTry<E, Self, R, F>
    where
        E: From<Self::Error> + From<R::Error>,
    {
        decoders::combinators::ThenTry::new(self, fun)
    }

    /// Chains another decoder after this one to decode two values in sequence.
    fn chain<D: Decoder>(self, following: D) -> decoders::combinators::Chain<Self, D> {
        decoders::combinators::Chain::new(self, following)
    }

    /// Resets the decoder to its default state, returning the value decoded so far.
    fn take(&mut self) -> Result<Self::Value, Self::Error>
    where
        Self: Default,
    {
        core::mem::take(self).end()
    }
}

/// Decoders that know a minimum number of bytes required for the next call to make
/// progress.
pub trait KnownMinLenDecoder: Decoder {
    /// Returns the minimum number of bytes known to be consumed by the next
    /// `decode_chunk` call. Zero if and only if decoding has ended.
    fn min_required_bytes(&self) -> usize;

    /// Returns true if decoding ended.
    fn is_at_end(&self) -> bool {
        self.min_required_bytes() == 0
    }
}
