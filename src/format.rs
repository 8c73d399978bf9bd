//! The resumable MessagePack format decoder.
//!
//! [`FormatDecoder`] is a hand-rolled state machine, not a generator or async
//! function: every suspension point is a value reified into [`Pending`], advanced by
//! plain function calls over a borrowed byte slice (see DESIGN.md's note on why this
//! crate avoids coroutine-style parsing). The low-level fixed- and variable-length
//! primitives it steps through (tag byte, length field, scalar/string payload) are
//! each an instance of [`crate::Decoder`], reused from `crate::decoders` exactly as
//! they were built for push-based decoding in general, not MessagePack in particular.

use alloc::string::String;
use alloc::vec::Vec;

use crate::builder::Builder;
use crate::config::{Config, DecodingErrors, StringEncoding};
use crate::decoders::{ByteArrayDecoder, ByteVecDecoder, ByteVecError, IntDecoder, Utf8StringDecoder, Utf8StringError};
use crate::error::{DecodeErrorKind, HookError};
use crate::marker::Marker;
use crate::value::{Str, Value};
use crate::{Decoder, KnownMinLenDecoder};

/// What should happen once a length field (for `str`/`bin`/`array`/`map`) finishes.
#[derive(Clone, Copy)]
enum LenAction {
    Str,
    Bin,
    Array,
    Map,
    /// This length field *is* the value being decoded (`read_array_header`/
    /// `read_map_header`) — surface it directly rather than starting a container.
    HeaderResult,
}

/// How a finished byte-string payload should be wrapped into a [`Value`].
enum BytesKind {
    Bin,
    /// `str` payload with no `string_encoding` configured: kept opaque.
    StrRaw,
    /// `str` payload with `string_encoding` configured under a non-`Strict` policy
    /// (`Strict` instead uses [`Pending::StrStrict`] for incremental validation).
    StrLossy(DecodingErrors),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Array,
    Map,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum HeaderFamily {
    Array,
    Map,
}

/// What the in-progress top-level operation is trying to produce.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Goal {
    /// `decode_value` / `skip_value`: decode one complete value.
    Value,
    ArrayHeader,
    MapHeader,
}

impl Goal {
    fn header_family(self) -> Option<HeaderFamily> {
        match self {
            Goal::Value => None,
            Goal::ArrayHeader => Some(HeaderFamily::Array),
            Goal::MapHeader => Some(HeaderFamily::Map),
        }
    }
}

enum Pending {
    /// Not mid-token: the next byte is a fresh tag.
    Tag,
    LenU8(IntDecoder<u8>, LenAction),
    LenU16(IntDecoder<u16>, LenAction),
    LenU32(IntDecoder<u32>, LenAction),
    UInt8(IntDecoder<u8>),
    UInt16(IntDecoder<u16>),
    UInt32(IntDecoder<u32>),
    UInt64(IntDecoder<u64>),
    Int8(IntDecoder<i8>),
    Int16(IntDecoder<i16>),
    Int32(IntDecoder<i32>),
    Int64(IntDecoder<i64>),
    F32(ByteArrayDecoder<4>),
    F64(ByteArrayDecoder<8>),
    Bytes(ByteVecDecoder, BytesKind),
    StrStrict(Utf8StringDecoder),
}

impl Default for Pending {
    fn default() -> Self {
        Pending::Tag
    }
}

/// A single step's outcome.
pub enum StepOutcome {
    Complete(Value),
    NeedMore,
}

/// Failure of a single [`FormatDecoder::step`] call.
#[derive(Debug)]
pub enum StepError {
    Decode(DecodeErrorKind),
    Hook(HookError),
    AllocationFailed,
}

impl From<DecodeErrorKind> for StepError {
    fn from(kind: DecodeErrorKind) -> Self {
        StepError::Decode(kind)
    }
}

impl From<HookError> for StepError {
    fn from(err: HookError) -> Self {
        StepError::Hook(err)
    }
}

/// The resumable per-value state machine: a container stack (via [`Builder`]) plus
/// whatever scalar/length primitive is currently mid-flight.
pub struct FormatDecoder {
    builder: Builder,
    pending: Pending,
    goal: Goal,
}

impl Default for FormatDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatDecoder {
    pub fn new() -> Self {
        FormatDecoder { builder: Builder::new(), pending: Pending::Tag, goal: Goal::Value }
    }

    /// `true` once a fresh operation may safely be started (no value, header read,
    /// or container is mid-decode).
    pub fn is_idle(&self) -> bool {
        matches!(self.pending, Pending::Tag) && self.builder.is_empty()
    }

    pub fn begin_value(&mut self) {
        debug_assert!(self.is_idle());
        self.goal = Goal::Value;
        self.pending = Pending::Tag;
    }

    pub fn begin_array_header(&mut self) {
        debug_assert!(self.is_idle());
        self.goal = Goal::ArrayHeader;
        self.pending = Pending::Tag;
    }

    pub fn begin_map_header(&mut self) {
        debug_assert!(self.is_idle());
        self.goal = Goal::MapHeader;
        self.pending = Pending::Tag;
    }

    /// An `ERROR` outcome leaves the decoder unspecified; the caller should not reuse
    /// it, but this makes `is_idle()` true again for defensive re-initialization.
    pub fn reset(&mut self) {
        self.builder.reset();
        self.pending = Pending::Tag;
        self.goal = Goal::Value;
    }

    /// Advances over as much of `*bytes` as can be consumed right now, returning
    /// `Complete` once this operation's goal is satisfied or `NeedMore` once the
    /// slice is exhausted mid-token. `*bytes` is advanced past everything consumed.
    pub fn step(&mut self, bytes: &mut &[u8], config: &mut Config) -> Result<StepOutcome, StepError> {
        loop {
            match core::mem::take(&mut self.pending) {
                Pending::Tag => {
                    if bytes.is_empty() {
                        self.pending = Pending::Tag;
                        return Ok(StepOutcome::NeedMore);
                    }
                    let marker = Marker::from_u8(bytes[0]);
                    *bytes = &bytes[1..];
                    if let Some(value) = self.on_tag(marker, config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::LenU8(mut dec, action) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::LenU8(dec, action);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let len = finish(dec) as u32;
                    if let Some(value) = self.on_length(len, action, config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::LenU16(mut dec, action) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::LenU16(dec, action);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let len = finish(dec) as u32;
                    if let Some(value) = self.on_length(len, action, config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::LenU32(mut dec, action) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::LenU32(dec, action);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let len = finish(dec);
                    if let Some(value) = self.on_length(len, action, config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::UInt8(mut dec) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::UInt8(dec);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let v = finish(dec);
                    if let Some(value) = self.produce(Value::UInt(v as u64), config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::UInt16(mut dec) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::UInt16(dec);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let v = finish(dec);
                    if let Some(value) = self.produce(Value::UInt(v as u64), config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::UInt32(mut dec) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::UInt32(dec);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let v = finish(dec);
                    if let Some(value) = self.produce(Value::UInt(v as u64), config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::UInt64(mut dec) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::UInt64(dec);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let v = finish(dec);
                    if let Some(value) = self.produce(Value::UInt(v), config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::Int8(mut dec) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::Int8(dec);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let v = finish(dec);
                    if let Some(value) = self.produce(Value::Int(v as i64), config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::Int16(mut dec) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::Int16(dec);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let v = finish(dec);
                    if let Some(value) = self.produce(Value::Int(v as i64), config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::Int32(mut dec) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::Int32(dec);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let v = finish(dec);
                    if let Some(value) = self.produce(Value::Int(v as i64), config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::Int64(mut dec) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::Int64(dec);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let v = finish(dec);
                    if let Some(value) = self.produce(Value::Int(v), config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::F32(mut dec) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::F32(dec);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let v = f32::from_be_bytes(finish(dec));
                    if let Some(value) = self.produce(Value::F32(v), config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::F64(mut dec) => {
                    if !advance(&mut dec, bytes) {
                        self.pending = Pending::F64(dec);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let v = f64::from_be_bytes(finish(dec));
                    if let Some(value) = self.produce(Value::F64(v), config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::Bytes(mut dec, kind) => {
                    let consumed = dec.bytes_received(bytes).map_err(|err| match err {
                        ByteVecError::AllocationFailed => StepError::AllocationFailed,
                        ByteVecError::UnexpectedEnd(_) => {
                            unreachable!("bytes_received only grows the buffer, never reports unexpected end")
                        }
                    })?;
                    *bytes = &bytes[consumed..];
                    if !dec.is_at_end() {
                        self.pending = Pending::Bytes(dec, kind);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let raw = dec.end().expect("byte payload fully received");
                    let value = finalize_bytes(raw, kind);
                    if let Some(value) = self.produce(value, config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
                Pending::StrStrict(mut dec) => {
                    let consumed = dec.bytes_received(bytes).map_err(|err| match err {
                        Utf8StringError::AllocationFailed => StepError::AllocationFailed,
                        Utf8StringError::InvalidUtf8(_) => StepError::Decode(DecodeErrorKind::InvalidPayload(
                            "invalid utf-8 under the `strict` decoding_errors policy",
                        )),
                        Utf8StringError::UnexpectedEnd(_) => {
                            unreachable!("bytes_received only grows the buffer, never reports unexpected end")
                        }
                    })?;
                    *bytes = &bytes[consumed..];
                    if !dec.is_at_end() {
                        self.pending = Pending::StrStrict(dec);
                        return Ok(StepOutcome::NeedMore);
                    }
                    let s = dec
                        .end()
                        .map_err(|_| DecodeErrorKind::InvalidPayload("invalid utf-8 under the `strict` decoding_errors policy"))?;
                    let value = Value::Str(Str::Text(s));
                    if let Some(value) = self.produce(value, config)? {
                        return Ok(StepOutcome::Complete(value));
                    }
                }
            }
        }
    }

    fn on_tag(&mut self, marker: Marker, config: &mut Config) -> Result<Option<Value>, StepError> {
        if let Some(family) = self.goal.header_family() {
            return self.on_header_tag(marker, family).map_err(StepError::from);
        }

        match marker {
            Marker::FixPos(v) => Ok(self.produce(Value::UInt(v as u64), config)?),
            Marker::FixNeg(v) => Ok(self.produce(Value::Int(v as i64), config)?),
            Marker::Null => Ok(self.produce(Value::Nil, config)?),
            Marker::False => Ok(self.produce(Value::Bool(false), config)?),
            Marker::True => Ok(self.produce(Value::Bool(true), config)?),
            Marker::U8 => {
                self.pending = Pending::UInt8(IntDecoder::new());
                Ok(None)
            }
            Marker::U16 => {
                self.pending = Pending::UInt16(IntDecoder::new());
                Ok(None)
            }
            Marker::U32 => {
                self.pending = Pending::UInt32(IntDecoder::new());
                Ok(None)
            }
            Marker::U64 => {
                self.pending = Pending::UInt64(IntDecoder::new());
                Ok(None)
            }
            Marker::I8 => {
                self.pending = Pending::Int8(IntDecoder::new());
                Ok(None)
            }
            Marker::I16 => {
                self.pending = Pending::Int16(IntDecoder::new());
                Ok(None)
            }
            Marker::I32 => {
                self.pending = Pending::Int32(IntDecoder::new());
                Ok(None)
            }
            Marker::I64 => {
                self.pending = Pending::Int64(IntDecoder::new());
                Ok(None)
            }
            Marker::F32 => {
                self.pending = Pending::F32(ByteArrayDecoder::new());
                Ok(None)
            }
            Marker::F64 => {
                self.pending = Pending::F64(ByteArrayDecoder::new());
                Ok(None)
            }
            Marker::FixStr(len) => Ok(self.begin_bytes(len as u32, true, config)?),
            Marker::Str8 => {
                self.pending = Pending::LenU8(IntDecoder::new(), LenAction::Str);
                Ok(None)
            }
            Marker::Str16 => {
                self.pending = Pending::LenU16(IntDecoder::new(), LenAction::Str);
                Ok(None)
            }
            Marker::Str32 => {
                self.pending = Pending::LenU32(IntDecoder::new(), LenAction::Str);
                Ok(None)
            }
            Marker::Bin8 => {
                self.pending = Pending::LenU8(IntDecoder::new(), LenAction::Bin);
                Ok(None)
            }
            Marker::Bin16 => {
                self.pending = Pending::LenU16(IntDecoder::new(), LenAction::Bin);
                Ok(None)
            }
            Marker::Bin32 => {
                self.pending = Pending::LenU32(IntDecoder::new(), LenAction::Bin);
                Ok(None)
            }
            Marker::FixArray(len) => Ok(self.begin_container(len as u32, ContainerKind::Array, config)?),
            Marker::Array16 => {
                self.pending = Pending::LenU16(IntDecoder::new(), LenAction::Array);
                Ok(None)
            }
            Marker::Array32 => {
                self.pending = Pending::LenU32(IntDecoder::new(), LenAction::Array);
                Ok(None)
            }
            Marker::FixMap(len) => Ok(self.begin_container(len as u32, ContainerKind::Map, config)?),
            Marker::Map16 => {
                self.pending = Pending::LenU16(IntDecoder::new(), LenAction::Map);
                Ok(None)
            }
            Marker::Map32 => {
                self.pending = Pending::LenU32(IntDecoder::new(), LenAction::Map);
                Ok(None)
            }
            Marker::Reserved(byte) => Err(StepError::Decode(DecodeErrorKind::UnrecognizedTag(byte))),
        }
    }

    fn on_header_tag(&mut self, marker: Marker, family: HeaderFamily) -> Result<Option<Value>, DecodeErrorKind> {
        match (family, marker) {
            (HeaderFamily::Array, Marker::FixArray(len)) => Ok(Some(Value::UInt(len as u64))),
            (HeaderFamily::Array, Marker::Array16) => {
                self.pending = Pending::LenU16(IntDecoder::new(), LenAction::HeaderResult);
                Ok(None)
            }
            (HeaderFamily::Array, Marker::Array32) => {
                self.pending = Pending::LenU32(IntDecoder::new(), LenAction::HeaderResult);
                Ok(None)
            }
            (HeaderFamily::Map, Marker::FixMap(len)) => Ok(Some(Value::UInt(len as u64))),
            (HeaderFamily::Map, Marker::Map16) => {
                self.pending = Pending::LenU16(IntDecoder::new(), LenAction::HeaderResult);
                Ok(None)
            }
            (HeaderFamily::Map, Marker::Map32) => {
                self.pending = Pending::LenU32(IntDecoder::new(), LenAction::HeaderResult);
                Ok(None)
            }
            (_, Marker::Reserved(byte)) => Err(DecodeErrorKind::UnrecognizedTag(byte)),
            (HeaderFamily::Array, _) => Err(DecodeErrorKind::InvalidPayload("expected an array header")),
            (HeaderFamily::Map, _) => Err(DecodeErrorKind::InvalidPayload("expected a map header")),
        }
    }

    fn on_length(&mut self, len: u32, action: LenAction, config: &mut Config) -> Result<Option<Value>, StepError> {
        match action {
            LenAction::Str => Ok(self.begin_bytes(len, true, config)?),
            LenAction::Bin => Ok(self.begin_bytes(len, false, config)?),
            LenAction::Array => Ok(self.begin_container(len, ContainerKind::Array, config)?),
            LenAction::Map => Ok(self.begin_container(len, ContainerKind::Map, config)?),
            LenAction::HeaderResult => Ok(Some(Value::UInt(len as u64))),
        }
    }

    fn begin_bytes(&mut self, len: u32, is_str: bool, config: &mut Config) -> Result<Option<Value>, HookError> {
        let len = len as usize;
        if !is_str {
            self.pending = Pending::Bytes(ByteVecDecoder::new(len), BytesKind::Bin);
        } else {
            match config.string_encoding {
                None => self.pending = Pending::Bytes(ByteVecDecoder::new(len), BytesKind::StrRaw),
                Some(StringEncoding::Utf8) => match config.decoding_errors {
                    DecodingErrors::Strict => self.pending = Pending::StrStrict(Utf8StringDecoder::new(len)),
                    other => self.pending = Pending::Bytes(ByteVecDecoder::new(len), BytesKind::StrLossy(other)),
                },
            }
        }
        if len == 0 {
            // Empty payloads never call back into `step`'s sub-decoder branches
            // (there is nothing to read), so finalize immediately here.
            let (raw, kind) = match core::mem::take(&mut self.pending) {
                Pending::Bytes(dec, kind) => (dec.end().expect("empty byte payload"), kind),
                Pending::StrStrict(dec) => {
                    return self.produce(Value::Str(Str::Text(dec.end().expect("empty string payload"))), config);
                }
                Pending::Tag => unreachable!("begin_bytes always sets a payload pending state"),
                _ => unreachable!("begin_bytes always sets a byte or string payload pending state"),
            };
            self.pending = Pending::Tag;
            return self.produce(finalize_bytes(raw, kind), config);
        }
        Ok(None)
    }

    fn begin_container(&mut self, len: u32, kind: ContainerKind, config: &mut Config) -> Result<Option<Value>, HookError> {
        match kind {
            ContainerKind::Array => self.builder.begin_array(len, config),
            ContainerKind::Map => self.builder.begin_map(len, config),
        }
    }

    /// Threads a fully-decoded value into the builder (value-goal) or surfaces it
    /// directly (header-goal).
    fn produce(&mut self, value: Value, config: &mut Config) -> Result<Option<Value>, HookError> {
        match self.goal {
            Goal::Value => self.builder.complete_value(value, config),
            Goal::ArrayHeader | Goal::MapHeader => Ok(Some(value)),
        }
    }
}

fn advance<D>(dec: &mut D, bytes: &mut &[u8]) -> bool
where
    D: Decoder<Error = crate::error::UnexpectedEnd> + KnownMinLenDecoder,
{
    let consumed = dec.bytes_received(bytes).expect("fixed-width scalar decode cannot fail on bytes_received");
    *bytes = &bytes[consumed..];
    dec.is_at_end()
}

fn finish<D>(dec: D) -> D::Value
where
    D: Decoder<Error = crate::error::UnexpectedEnd>,
{
    dec.end().expect("fixed-width scalar fully received")
}

fn finalize_bytes(raw: Vec<u8>, kind: BytesKind) -> Value {
    match kind {
        BytesKind::Bin => Value::Bin(raw),
        BytesKind::StrRaw => Value::Str(Str::Bytes(raw)),
        BytesKind::StrLossy(DecodingErrors::Replace) => Value::Str(Str::Text(String::from_utf8_lossy(&raw).into_owned())),
        BytesKind::StrLossy(DecodingErrors::Ignore) => Value::Str(Str::Text(decode_dropping_invalid(&raw))),
        BytesKind::StrLossy(DecodingErrors::Strict) => {
            unreachable!("strict str payloads are decoded via Pending::StrStrict, not Pending::Bytes")
        }
    }
}

/// Implements the `decoding_errors = "ignore"` policy: valid subsequences are kept,
/// invalid bytes are dropped rather than replaced.
fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut rest = bytes;
    loop {
        match core::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                break;
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                // SAFETY: `from_utf8` validated `rest[..valid_up_to]`.
                out.push_str(unsafe { core::str::from_utf8_unchecked(&rest[..valid_up_to]) });
                match e.error_len() {
                    Some(len) => rest = &rest[valid_up_to + len..],
                    None => break,
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn decode_all(mut bytes: &[u8], config: &mut Config) -> Value {
        let mut decoder = FormatDecoder::new();
        decoder.begin_value();
        match decoder.step(&mut bytes, config).unwrap() {
            StepOutcome::Complete(v) => v,
            StepOutcome::NeedMore => panic!("expected a complete value"),
        }
    }

    #[test]
    fn fixarray_of_fixints() {
        let mut config = Config::default();
        let value = decode_all(&[0x93, 0x01, 0x02, 0x03], &mut config);
        match value {
            Value::Array(arr) => {
                assert_eq!(arr.as_slice(), &[Value::UInt(1), Value::UInt(2), Value::UInt(3)]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fixmap_without_encoding_keeps_raw_bytes() {
        let mut config = Config::default();
        let value = decode_all(&[0x82, 0xa1, 0x61, 0x01, 0xa1, 0x62, 0x02], &mut config);
        match value {
            Value::Map(pairs) => {
                assert_eq!(pairs.len(), 2);
                assert_eq!(pairs[0].0, Value::Str(Str::Bytes(vec![b'a'])));
                assert_eq!(pairs[0].1, Value::UInt(1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn fixmap_with_utf8_encoding_decodes_keys() {
        let mut config = Config::builder().string_encoding(StringEncoding::Utf8).build().unwrap();
        let value = decode_all(&[0x82, 0xa1, 0x61, 0x01, 0xa1, 0x62, 0x02], &mut config);
        match value {
            Value::Map(pairs) => {
                assert_eq!(pairs[0].0, Value::Str(Str::Text("a".into())));
                assert_eq!(pairs[1].0, Value::Str(Str::Text("b".into())));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn uint16_and_int16() {
        let mut config = Config::default();
        assert_eq!(decode_all(&[0xcd, 0x01, 0x00], &mut config), Value::UInt(256));
        assert_eq!(decode_all(&[0xd1, 0xff, 0x00], &mut config), Value::Int(-256));
    }

    #[test]
    fn reserved_byte_is_unrecognized_tag() {
        let mut config = Config::default();
        let mut decoder = FormatDecoder::new();
        decoder.begin_value();
        let mut bytes: &[u8] = &[0xc1];
        let err = decoder.step(&mut bytes, &mut config).unwrap_err();
        assert!(matches!(err, StepError::Decode(DecodeErrorKind::UnrecognizedTag(0xc1))));
    }

    #[test]
    fn need_more_mid_value_then_resumes() {
        let mut config = Config::default();
        let mut decoder = FormatDecoder::new();
        decoder.begin_value();
        let mut bytes: &[u8] = &[0x93, 0x01];
        match decoder.step(&mut bytes, &mut config).unwrap() {
            StepOutcome::NeedMore => {}
            StepOutcome::Complete(_) => panic!("should not be complete yet"),
        }
        assert!(bytes.is_empty());
        let mut more: &[u8] = &[0x02, 0x03];
        match decoder.step(&mut more, &mut config).unwrap() {
            StepOutcome::Complete(Value::Array(arr)) => {
                assert_eq!(arr.as_slice(), &[Value::UInt(1), Value::UInt(2), Value::UInt(3)]);
            }
            other => panic!("unexpected outcome"),
        }
    }

    #[test]
    fn array_header_returns_length_without_materializing_children() {
        let mut config = Config::default();
        let mut decoder = FormatDecoder::new();
        decoder.begin_array_header();
        let mut bytes: &[u8] = &[0x93, 0x01, 0x02, 0x03];
        match decoder.step(&mut bytes, &mut config).unwrap() {
            StepOutcome::Complete(Value::UInt(3)) => {}
            other => panic!("unexpected outcome"),
        }
        assert_eq!(bytes, &[0x01, 0x02, 0x03]);
    }

    #[test]
    fn array_header_on_non_array_tag_is_invalid_payload() {
        let mut config = Config::default();
        let mut decoder = FormatDecoder::new();
        decoder.begin_array_header();
        let mut bytes: &[u8] = &[0xc0];
        let err = decoder.step(&mut bytes, &mut config).unwrap_err();
        assert!(matches!(err, StepError::Decode(DecodeErrorKind::InvalidPayload(_))));
    }
}
