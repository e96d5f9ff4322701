use alloc::boxed::Box;
use alloc::string::String;

use crate::codec::CodecError;
use crate::descriptor::SerialDescriptor;
use crate::serializer::Serializer;
use crate::value::Value;

// -----------------------------------------------------------------------------
// ElementIndex

/// The outcome of one [`CompositeDecoder::decode_element_index`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementIndex {
    /// The next element to populate, by descriptor index. Indexes may arrive
    /// in any order; decode loops are index-driven, not position-driven.
    Element(usize),
    /// No more elements remain in this scope.
    Done,
    /// The format found a field the descriptor does not recognize and has
    /// already skipped its value. Unknown fields are non-fatal by protocol
    /// contract; whether to warn (or reject) is a format policy.
    UnknownName,
}

// -----------------------------------------------------------------------------
// Decoder

/// The decoding half of the codec protocol; the structural dual of
/// [`Encoder`](crate::codec::Encoder).
pub trait Decoder {
    /// Whether the next value is present (`true`) or null (`false`), without
    /// consuming it.
    fn decode_not_null_mark(&mut self) -> Result<bool, CodecError>;

    /// Consumes an explicit null.
    fn decode_null(&mut self) -> Result<(), CodecError>;

    fn decode_bool(&mut self) -> Result<bool, CodecError>;
    fn decode_i8(&mut self) -> Result<i8, CodecError>;
    fn decode_i16(&mut self) -> Result<i16, CodecError>;
    fn decode_i32(&mut self) -> Result<i32, CodecError>;
    fn decode_i64(&mut self) -> Result<i64, CodecError>;
    fn decode_u8(&mut self) -> Result<u8, CodecError>;
    fn decode_u16(&mut self) -> Result<u16, CodecError>;
    fn decode_u32(&mut self) -> Result<u32, CodecError>;
    fn decode_u64(&mut self) -> Result<u64, CodecError>;
    fn decode_f32(&mut self) -> Result<f32, CodecError>;
    fn decode_f64(&mut self) -> Result<f64, CodecError>;
    fn decode_char(&mut self) -> Result<char, CodecError>;
    fn decode_string(&mut self) -> Result<String, CodecError>;

    /// Decodes an enum entry index of `descriptor`.
    fn decode_enum(&mut self, descriptor: &SerialDescriptor) -> Result<usize, CodecError>;

    /// Opens a structure scope. The returned composite must be closed exactly
    /// once via [`CompositeDecoder::end_structure`].
    fn begin_structure<'a>(
        &'a mut self,
        descriptor: &SerialDescriptor,
    ) -> Result<Box<dyn CompositeDecoder + 'a>, CodecError>;
}

// -----------------------------------------------------------------------------
// CompositeDecoder

/// The per-element decoding surface of an open structure scope.
pub trait CompositeDecoder {
    /// Whether this format delivers elements strictly in descriptor order,
    /// letting callers skip element-index negotiation.
    ///
    /// Callers must branch on this: when `true`, they read elements `0..n`
    /// directly; when `false`, they loop on
    /// [`decode_element_index`](Self::decode_element_index).
    fn decode_sequentially(&self) -> bool {
        false
    }

    /// Negotiates the next element to populate.
    fn decode_element_index(
        &mut self,
        descriptor: &SerialDescriptor,
    ) -> Result<ElementIndex, CodecError>;

    /// The number of element slots in this collection scope, if the format
    /// knows it up front. For map scopes this counts keys and values
    /// separately (two slots per entry).
    fn decode_collection_size(
        &mut self,
        descriptor: &SerialDescriptor,
    ) -> Result<Option<usize>, CodecError> {
        let _ = descriptor;
        Ok(None)
    }

    fn decode_bool_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<bool, CodecError>;
    fn decode_i8_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<i8, CodecError>;
    fn decode_i16_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<i16, CodecError>;
    fn decode_i32_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<i32, CodecError>;
    fn decode_i64_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<i64, CodecError>;
    fn decode_u8_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<u8, CodecError>;
    fn decode_u16_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<u16, CodecError>;
    fn decode_u32_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<u32, CodecError>;
    fn decode_u64_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<u64, CodecError>;
    fn decode_f32_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<f32, CodecError>;
    fn decode_f64_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<f64, CodecError>;
    fn decode_char_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<char, CodecError>;
    fn decode_string_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
    ) -> Result<String, CodecError>;

    /// Decodes an element through its child serializer.
    fn decode_serializable_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        deserializer: &dyn Serializer,
    ) -> Result<Value, CodecError>;

    /// Decodes a nullable element through its child serializer, consuming the
    /// null/not-null mark when the child serializer is not itself
    /// nullability-aware.
    fn decode_nullable_serializable_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        deserializer: &dyn Serializer,
    ) -> Result<Value, CodecError>;

    /// Closes the structure scope. See
    /// [`CompositeEncoder::end_structure`](crate::codec::CompositeEncoder::end_structure)
    /// for the exactly-once contract.
    fn end_structure(self: Box<Self>, descriptor: &SerialDescriptor) -> Result<(), CodecError>;
}
