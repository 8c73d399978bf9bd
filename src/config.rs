//! Decoder configuration.
//!
//! `Config` is built through `ConfigBuilder` rather than constructed directly so that
//! mutually-exclusive options (`object_hook` vs. `object_pairs_hook`) and
//! out-of-range values (`read_size` vs. `max_buffer_size`) are rejected once, at
//! `build()` time, instead of being re-checked on every decode.

use core::fmt;

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::{ConfigError, HookError};
use crate::value::Value;

/// Bytes requested per producer pull when unset: 1 MiB, clamped to `max_buffer_size`.
const DEFAULT_READ_SIZE: usize = 1024 * 1024;

/// Which text encoding, if any, `str`-family payloads are decoded through.
///
/// Only UTF-8 is supported; unlike the dynamically-typed source this decoder is
/// grown from, there is no "named codec looked up at runtime" concept, so the
/// `CONFIG_ERROR` case for an unsupported codec name cannot arise here (see
/// DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringEncoding {
    Utf8,
}

/// How a `str`-family payload decode handles invalid bytes, when `string_encoding`
/// is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodingErrors {
    /// Invalid bytes surface `Error::Decode(DecodeErrorKind::InvalidPayload(_))`.
    Strict,
    /// Invalid sequences are replaced with `U+FFFD`.
    Replace,
    /// Invalid bytes are dropped.
    Ignore,
}

impl Default for DecodingErrors {
    fn default() -> Self {
        DecodingErrors::Strict
    }
}

type ObjectHook = Box<dyn FnMut(Vec<(Value, Value)>) -> Result<Value, HookError>>;
type ListHook = Box<dyn FnMut(Vec<Value>) -> Result<Value, HookError>>;

/// Resolved, immutable decoder configuration.
///
/// Produced only by [`ConfigBuilder::build`]; there is no public constructor because
/// the mutual-exclusion and range checks below must run exactly once.
pub struct Config {
    pub(crate) use_list: bool,
    pub(crate) object_hook: Option<ObjectHook>,
    pub(crate) object_pairs_hook: Option<ObjectHook>,
    pub(crate) list_hook: Option<ListHook>,
    pub(crate) string_encoding: Option<StringEncoding>,
    pub(crate) decoding_errors: DecodingErrors,
    pub(crate) max_buffer_size: usize,
    pub(crate) read_size: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("use_list", &self.use_list)
            .field("has_object_hook", &self.object_hook.is_some())
            .field("has_object_pairs_hook", &self.object_pairs_hook.is_some())
            .field("has_list_hook", &self.list_hook.is_some())
            .field("string_encoding", &self.string_encoding)
            .field("decoding_errors", &self.decoding_errors)
            .field("max_buffer_size", &self.max_buffer_size)
            .field("read_size", &self.read_size)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::default().build().expect("default configuration is always valid")
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builds a [`Config`], validating mutually-exclusive and out-of-range options once
/// at [`ConfigBuilder::build`].
pub struct ConfigBuilder {
    use_list: bool,
    object_hook: Option<ObjectHook>,
    object_pairs_hook: Option<ObjectHook>,
    list_hook: Option<ListHook>,
    string_encoding: Option<StringEncoding>,
    decoding_errors: DecodingErrors,
    max_buffer_size: usize,
    read_size: Option<usize>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        ConfigBuilder {
            use_list: true,
            object_hook: None,
            object_pairs_hook: None,
            list_hook: None,
            string_encoding: None,
            decoding_errors: DecodingErrors::default(),
            max_buffer_size: 0,
            read_size: None,
        }
    }
}

impl ConfigBuilder {
    pub fn use_list(mut self, use_list: bool) -> Self {
        self.use_list = use_list;
        self
    }

    /// Invoked with the completed, deduplicated mapping once a map's 2N children
    /// have all been decoded. Mutually exclusive with [`ConfigBuilder::object_pairs_hook`].
    pub fn object_hook<F, E>(mut self, mut hook: F) -> Self
    where
        F: FnMut(Vec<(Value, Value)>) -> Result<Value, E> + 'static,
        E: fmt::Debug + Send + Sync + 'static,
    {
        self.object_hook = Some(Box::new(move |pairs| hook(pairs).map_err(|e| HookError(Box::new(e)))));
        self
    }

    /// Invoked with the raw (non-deduplicated) pair list instead of a mapping.
    /// Mutually exclusive with [`ConfigBuilder::object_hook`].
    pub fn object_pairs_hook<F, E>(mut self, mut hook: F) -> Self
    where
        F: FnMut(Vec<(Value, Value)>) -> Result<Value, E> + 'static,
        E: fmt::Debug + Send + Sync + 'static,
    {
        self.object_pairs_hook = Some(Box::new(move |pairs| hook(pairs).map_err(|e| HookError(Box::new(e)))));
        self
    }

    /// Invoked with the completed sequence, regardless of `use_list`.
    pub fn list_hook<F, E>(mut self, mut hook: F) -> Self
    where
        F: FnMut(Vec<Value>) -> Result<Value, E> + 'static,
        E: fmt::Debug + Send + Sync + 'static,
    {
        self.list_hook = Some(Box::new(move |items| hook(items).map_err(|e| HookError(Box::new(e)))));
        self
    }

    pub fn string_encoding(mut self, encoding: StringEncoding) -> Self {
        self.string_encoding = Some(encoding);
        self
    }

    pub fn decoding_errors(mut self, policy: DecodingErrors) -> Self {
        self.decoding_errors = policy;
        self
    }

    /// Hard cap on buffer capacity. `0` means "unbounded" and is resolved to
    /// `usize::MAX` at `build()` time.
    pub fn max_buffer_size(mut self, max_buffer_size: usize) -> Self {
        self.max_buffer_size = max_buffer_size;
        self
    }

    /// Bytes requested per producer pull. Must not exceed the (possibly
    /// sentinel-resolved) `max_buffer_size`.
    pub fn read_size(mut self, read_size: usize) -> Self {
        self.read_size = Some(read_size);
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        if self.object_hook.is_some() && self.object_pairs_hook.is_some() {
            return Err(ConfigError::BothObjectHooks);
        }

        let max_buffer_size = if self.max_buffer_size == 0 { usize::MAX } else { self.max_buffer_size };
        let read_size = self.read_size.unwrap_or_else(|| DEFAULT_READ_SIZE.min(max_buffer_size));
        if read_size > max_buffer_size {
            return Err(ConfigError::ReadSizeExceedsMaxBufferSize);
        }

        Ok(Config {
            use_list: self.use_list,
            object_hook: self.object_hook,
            object_pairs_hook: self.object_pairs_hook,
            list_hook: self.list_hook,
            string_encoding: self.string_encoding,
            decoding_errors: self.decoding_errors,
            max_buffer_size,
            read_size,
        })
    }
}
