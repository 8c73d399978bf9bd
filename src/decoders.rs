//! Small, reusable building-block decoders that the MessagePack format decoder
//! (`crate::format`) assembles into the full state machine, plus the generic
//! combinators (`combinators`) used to glue them together.

pub mod combinators;

mod byte_array;
mod byte_vec;
mod int;
mod utf8_string;

pub use byte_array::ByteArrayDecoder;
pub use byte_vec::ByteVecDecoder;
pub use byte_vec::Error as ByteVecError;
pub use int::IntDecoder;
pub use utf8_string::Error as Utf8StringError;
pub use utf8_string::Utf8StringDecoder;
