//! Binds the stream buffer and format decoder into the public streaming surface.
//!
//! [`StreamingDecoder`] is either push-fed (bytes arrive via [`StreamingDecoder::feed`])
//! or producer-backed (bytes are pulled from a [`ByteProducer`] on demand), fixed at
//! construction the way the buffer beneath it is. [`decode`] is the one-shot entry
//! point built from the same two pieces.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::buffer::{BufferError, ByteProducer, PullError, PullOutcome, StreamBuffer};
use crate::config::Config;
use crate::error::{ConfigError, Error, ExtraData};
use crate::format::{FormatDecoder, StepError, StepOutcome};
use crate::value::Value;

/// Uninhabited marker used as the producer type of a push-fed [`StreamingDecoder`].
///
/// Never constructed; its [`ByteProducer`] impl exists only so push-fed and
/// producer-backed decoders can share one generic implementation.
pub enum NoProducer {}

impl ByteProducer for NoProducer {
    type Error = core::convert::Infallible;

    fn pull(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
        match *self {}
    }
}

/// A resumable MessagePack decoder over either caller-fed or producer-pulled bytes.
///
/// `P` defaults to [`NoProducer`] for push-fed use; pair it with [`StreamingDecoder::new`].
/// Use [`StreamingDecoder::with_producer`] for the producer-backed case.
pub struct StreamingDecoder<P = NoProducer> {
    buffer: StreamBuffer,
    format: FormatDecoder,
    config: Config,
    producer: Option<P>,
    exhausted: bool,
}

impl StreamingDecoder<NoProducer> {
    /// A push-fed decoder: bytes are supplied only via [`StreamingDecoder::feed`].
    pub fn new(config: Config) -> Self {
        StreamingDecoder {
            buffer: StreamBuffer::new(config.max_buffer_size, config.read_size),
            format: FormatDecoder::new(),
            config,
            producer: None,
            exhausted: false,
        }
    }
}

impl<P: ByteProducer> StreamingDecoder<P> {
    /// A producer-backed decoder: bytes are pulled from `producer` on demand.
    pub fn with_producer(producer: P, config: Config) -> Self {
        StreamingDecoder {
            buffer: StreamBuffer::new(config.max_buffer_size, config.read_size),
            format: FormatDecoder::new(),
            config,
            producer: Some(producer),
            exhausted: false,
        }
    }

    /// Appends bytes to decode. Only valid on a push-fed decoder; a producer-backed
    /// one rejects this with [`ConfigError::FeedOnProducerBackedDecoder`].
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), Error<P::Error>> {
        if self.producer.is_some() {
            return Err(Error::Config(ConfigError::FeedOnProducerBackedDecoder));
        }
        self.buffer.append(bytes).map_err(buffer_error_into)?;
        self.exhausted = false;
        Ok(())
    }

    /// Decodes and returns the next complete value.
    pub fn unpack_one(&mut self) -> Result<Value, Error<P::Error>> {
        if self.format.is_idle() {
            self.format.begin_value();
        }
        self.run()
    }

    /// Decodes and discards the next complete value.
    pub fn skip_one(&mut self) -> Result<(), Error<P::Error>> {
        self.unpack_one().map(|_| ())
    }

    /// Consumes only the header of the next value, which must be an array, returning
    /// its declared element count. The caller is then responsible for decoding that
    /// many subsequent values.
    pub fn read_array_header(&mut self) -> Result<u32, Error<P::Error>> {
        if self.format.is_idle() {
            self.format.begin_array_header();
        }
        match self.run()? {
            Value::UInt(n) => Ok(n as u32),
            other => unreachable!("array header goal always completes with Value::UInt, got {other:?}"),
        }
    }

    /// Symmetric to [`StreamingDecoder::read_array_header`], for maps. The declared
    /// count is the number of *pairs*; the caller must decode `2 * count` values.
    pub fn read_map_header(&mut self) -> Result<u32, Error<P::Error>> {
        if self.format.is_idle() {
            self.format.begin_map_header();
        }
        match self.run()? {
            Value::UInt(n) => Ok(n as u32),
            other => unreachable!("map header goal always completes with Value::UInt, got {other:?}"),
        }
    }

    /// Reads `n` raw bytes verbatim, bypassing the format decoder entirely. Useful
    /// after manually reading a header to slurp an embedded blob.
    pub fn read_raw_bytes(&mut self, n: usize) -> Result<Vec<u8>, Error<P::Error>> {
        loop {
            if self.buffer.unread_len() >= n {
                let out = self.buffer.readable_slice()[..n].to_vec();
                self.buffer.advance(n);
                return Ok(out);
            }
            if !self.pull_more()? {
                return Err(Error::OutOfData);
            }
        }
    }

    fn run(&mut self) -> Result<Value, Error<P::Error>> {
        loop {
            let mut bytes = self.buffer.readable_slice();
            let before = bytes.len();
            let outcome = self.format.step(&mut bytes, &mut self.config).map_err(step_error_into)?;
            let consumed = before - bytes.len();
            self.buffer.advance(consumed);
            match outcome {
                StepOutcome::Complete(value) => return Ok(value),
                StepOutcome::NeedMore => {
                    if !self.pull_more()? {
                        return Err(Error::OutOfData);
                    }
                }
            }
        }
    }

    /// Attempts to make more bytes readable. `Ok(false)` means none became available
    /// right now (push-fed decoder awaiting `feed`, or producer exhausted).
    fn pull_more(&mut self) -> Result<bool, Error<P::Error>> {
        if self.exhausted {
            return Ok(false);
        }
        match self.producer.as_mut() {
            None => Ok(false),
            Some(producer) => match self.buffer.feed_from_producer(producer) {
                Ok(PullOutcome::Filled(_)) => Ok(true),
                Ok(PullOutcome::Exhausted) => {
                    self.exhausted = true;
                    Ok(false)
                }
                Err(PullError::Buffer(e)) => Err(buffer_error_into(e)),
                Err(PullError::Producer(e)) => Err(Error::Producer(e)),
            },
        }
    }
}

impl<P: ByteProducer> Iterator for StreamingDecoder<P> {
    type Item = Result<Value, Error<P::Error>>;

    /// Yields successive values until the stream runs out of bytes, at which point
    /// iteration ends (`None`) rather than surfacing `OUT_OF_DATA`, whether that
    /// happens between values or mid-value. A decoder starved mid-value keeps its
    /// state and can be resumed by feeding more bytes and iterating again.
    fn next(&mut self) -> Option<Self::Item> {
        if self.format.is_idle() && self.buffer.unread_len() == 0 && self.exhausted {
            return None;
        }
        match self.unpack_one() {
            Ok(value) => Some(Ok(value)),
            Err(Error::OutOfData) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

fn step_error_into<PE>(err: StepError) -> Error<PE> {
    match err {
        StepError::Decode(kind) => Error::Decode(kind),
        StepError::Hook(hook) => Error::Hook(hook),
        StepError::AllocationFailed => Error::AllocationFailed,
    }
}

fn buffer_error_into<PE>(err: BufferError) -> Error<PE> {
    match err {
        BufferError::Full => Error::BufferFull,
        BufferError::AllocationFailed => Error::AllocationFailed,
    }
}

/// Decodes exactly one value from `bytes`, failing with [`Error::ExtraData`] if
/// anything remains afterward.
pub fn decode(bytes: &[u8], config: Config) -> Result<Value, Error> {
    let mut decoder = StreamingDecoder::new(config);
    decoder.feed(bytes)?;
    let value = decoder.unpack_one()?;
    if decoder.buffer.unread_len() == 0 {
        Ok(value)
    } else {
        let remainder = decoder.buffer.readable_slice().to_vec();
        Err(Error::ExtraData(Box::new(ExtraData { value, remainder })))
    }
}
