use core::fmt;

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::value::Value;

/// Raised by the low-level building-block decoders (see [`crate::Decoder`]) when
/// `end()` is called before enough bytes have arrived.
#[derive(Debug, Clone)]
pub struct UnexpectedEnd {
    pub(crate) missing: usize,
}

impl fmt::Display for UnexpectedEnd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let plural = match self.missing {
            1 => " was",
            _ => "s were",
        };
        write!(f, "end of stream reached too soon, {} more byte{} required", self.missing, plural)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UnexpectedEnd {}

/// Why a single MessagePack value failed to decode.
///
/// Distinct from [`Error`]: this is the failure of *one lexical step* (a tag, a
/// length field, a scalar payload); `Error` additionally carries the coordinator-level
/// concerns (exhaustion, configuration, hooks).
#[derive(Debug, Clone)]
pub enum DecodeErrorKind {
    /// A byte value not in the recognized tag table appeared where a tag was expected
    /// (this includes the reserved `0xc1` byte and the entire `ext`/`fixext` family).
    UnrecognizedTag(u8),
    /// A malformed scalar: invalid UTF-8 under the `strict` policy, or a header read
    /// (`read_array_header`/`read_map_header`) whose tag names the wrong family.
    InvalidPayload(&'static str),
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeErrorKind::UnrecognizedTag(tag) => write!(f, "unrecognized MessagePack tag byte 0x{:02x}", tag),
            DecodeErrorKind::InvalidPayload(reason) => write!(f, "invalid payload: {}", reason),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeErrorKind {}

/// A mutually-exclusive or out-of-range configuration was supplied.
#[derive(Debug, Clone, Copy)]
pub enum ConfigError {
    /// Both `object_hook` and `object_pairs_hook` were configured.
    BothObjectHooks,
    /// `read_size` exceeds the (possibly sentinel-resolved) `max_buffer_size`.
    ReadSizeExceedsMaxBufferSize,
    /// `feed` was called on a producer-backed decoder.
    FeedOnProducerBackedDecoder,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::BothObjectHooks => write!(f, "object_hook and object_pairs_hook are mutually exclusive"),
            ConfigError::ReadSizeExceedsMaxBufferSize => write!(f, "read_size must not exceed max_buffer_size"),
            ConfigError::FeedOnProducerBackedDecoder => write!(f, "cannot feed bytes into a producer-backed decoder"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Carries whatever a user-supplied hook returned as its failure.
#[derive(Debug)]
pub struct HookError(pub Box<dyn fmt::Debug + Send + Sync>);

impl fmt::Display for HookError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "hook failed: {:?}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HookError {}

/// A one-shot [`crate::decode`] succeeded, but bytes remained after the single value.
#[derive(Debug)]
pub struct ExtraData {
    pub value: Value,
    pub remainder: Vec<u8>,
}

/// Top-level error of this crate.
///
/// Generic over `PE`, the error type of a [`crate::ByteProducer`] — push-fed decoders
/// (and the one-shot [`crate::decode`] function) never produce one, so they use
/// [`core::convert::Infallible`].
#[derive(Debug)]
pub enum Error<PE = core::convert::Infallible> {
    /// Stream exhausted mid-value (or at a value boundary) after the producer
    /// signaled end-of-stream, or `feed` was never called again.
    OutOfData,
    /// One-shot decode succeeded but input had trailing bytes.
    ExtraData(Box<ExtraData>),
    /// Required buffer capacity would exceed `max_buffer_size`.
    BufferFull,
    /// A MessagePack lexical/structural decode failure.
    Decode(DecodeErrorKind),
    /// A mutually-exclusive or out-of-range configuration was supplied.
    Config(ConfigError),
    /// A user hook returned an error.
    Hook(HookError),
    /// Buffer growth could not allocate.
    AllocationFailed,
    /// The byte producer itself failed.
    Producer(PE),
}

impl<PE: fmt::Debug> fmt::Display for Error<PE> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::OutOfData => write!(f, "ran out of input before a value completed"),
            Error::ExtraData(_) => write!(f, "trailing bytes remained after decoding one value"),
            Error::BufferFull => write!(f, "buffer would have to grow past max_buffer_size"),
            Error::Decode(kind) => write!(f, "{}", kind),
            Error::Config(err) => write!(f, "{}", err),
            Error::Hook(err) => write!(f, "{}", err),
            Error::AllocationFailed => write!(f, "buffer growth failed to allocate"),
            Error::Producer(err) => write!(f, "byte producer failed: {:?}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<PE: fmt::Debug> std::error::Error for Error<PE> {}

impl<PE> From<DecodeErrorKind> for Error<PE> {
    fn from(kind: DecodeErrorKind) -> Self {
        Error::Decode(kind)
    }
}

impl<PE> From<ConfigError> for Error<PE> {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}
