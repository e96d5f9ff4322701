use alloc::boxed::Box;

use crate::codec::CodecError;
use crate::descriptor::SerialDescriptor;
use crate::serializer::Serializer;
use crate::value::Value;

// -----------------------------------------------------------------------------
// Encoder

/// The encoding half of the codec protocol.
///
/// A format implements one method per primitive kind plus the structural
/// entry points. Instances are single-use and single-threaded by contract:
/// one value tree is encoded per encoder, and an encoder is never shared
/// across concurrent operations.
///
/// Values behind fields are dispatched by the *serializer*, not the encoder;
/// see [`CompositeEncoder::encode_serializable_element`]. For top-level
/// values use [`encode_serializable_value`](crate::codec::encode_serializable_value).
pub trait Encoder {
    /// Encodes an explicit null.
    fn encode_null(&mut self) -> Result<(), CodecError>;

    /// Notes that a nullable slot holds a value.
    ///
    /// Formats without a dedicated null marker keep the default no-op.
    fn encode_not_null_mark(&mut self) -> Result<(), CodecError> {
        Ok(())
    }

    fn encode_bool(&mut self, value: bool) -> Result<(), CodecError>;
    fn encode_i8(&mut self, value: i8) -> Result<(), CodecError>;
    fn encode_i16(&mut self, value: i16) -> Result<(), CodecError>;
    fn encode_i32(&mut self, value: i32) -> Result<(), CodecError>;
    fn encode_i64(&mut self, value: i64) -> Result<(), CodecError>;
    fn encode_u8(&mut self, value: u8) -> Result<(), CodecError>;
    fn encode_u16(&mut self, value: u16) -> Result<(), CodecError>;
    fn encode_u32(&mut self, value: u32) -> Result<(), CodecError>;
    fn encode_u64(&mut self, value: u64) -> Result<(), CodecError>;
    fn encode_f32(&mut self, value: f32) -> Result<(), CodecError>;
    fn encode_f64(&mut self, value: f64) -> Result<(), CodecError>;
    fn encode_char(&mut self, value: char) -> Result<(), CodecError>;
    fn encode_str(&mut self, value: &str) -> Result<(), CodecError>;

    /// Encodes the enum entry at `index` of `descriptor`.
    fn encode_enum(&mut self, descriptor: &SerialDescriptor, index: usize) -> Result<(), CodecError>;

    /// Opens a structure scope. The returned composite must be closed exactly
    /// once via [`CompositeEncoder::end_structure`].
    fn begin_structure<'a>(
        &'a mut self,
        descriptor: &SerialDescriptor,
    ) -> Result<Box<dyn CompositeEncoder + 'a>, CodecError>;

    /// Opens a collection scope of known length.
    ///
    /// Formats that do not care about the length up front keep the default,
    /// which delegates to [`begin_structure`](Self::begin_structure).
    fn begin_collection<'a>(
        &'a mut self,
        descriptor: &SerialDescriptor,
        len: usize,
    ) -> Result<Box<dyn CompositeEncoder + 'a>, CodecError> {
        let _ = len;
        self.begin_structure(descriptor)
    }
}

// -----------------------------------------------------------------------------
// CompositeEncoder

/// The per-element encoding surface of an open structure scope.
pub trait CompositeEncoder {
    /// Whether an element equal to its declared default should still be
    /// encoded.
    ///
    /// Defaults to `true`. Returning `false` lets a format elide defaulted
    /// values; eliding is a format policy, never mandated by the protocol.
    fn should_encode_element_default(&self, descriptor: &SerialDescriptor, index: usize) -> bool {
        let _ = (descriptor, index);
        true
    }

    fn encode_bool_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: bool,
    ) -> Result<(), CodecError>;
    fn encode_i8_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: i8,
    ) -> Result<(), CodecError>;
    fn encode_i16_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: i16,
    ) -> Result<(), CodecError>;
    fn encode_i32_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: i32,
    ) -> Result<(), CodecError>;
    fn encode_i64_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: i64,
    ) -> Result<(), CodecError>;
    fn encode_u8_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: u8,
    ) -> Result<(), CodecError>;
    fn encode_u16_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: u16,
    ) -> Result<(), CodecError>;
    fn encode_u32_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: u32,
    ) -> Result<(), CodecError>;
    fn encode_u64_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: u64,
    ) -> Result<(), CodecError>;
    fn encode_f32_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: f32,
    ) -> Result<(), CodecError>;
    fn encode_f64_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: f64,
    ) -> Result<(), CodecError>;
    fn encode_char_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: char,
    ) -> Result<(), CodecError>;
    fn encode_str_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        value: &str,
    ) -> Result<(), CodecError>;

    /// Encodes an element through its child serializer.
    fn encode_serializable_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        serializer: &dyn Serializer,
        value: &Value,
    ) -> Result<(), CodecError>;

    /// Encodes a nullable element through its child serializer, emitting the
    /// null/not-null mark when the child serializer is not itself
    /// nullability-aware.
    fn encode_nullable_serializable_element(
        &mut self,
        descriptor: &SerialDescriptor,
        index: usize,
        serializer: &dyn Serializer,
        value: &Value,
    ) -> Result<(), CodecError>;

    /// Closes the structure scope.
    ///
    /// Consuming `self` makes "exactly once per `begin_structure`" a
    /// compile-time fact; the [`encode_structure`](crate::codec::encode_structure)
    /// helper also closes the scope on the error path.
    fn end_structure(self: Box<Self>, descriptor: &SerialDescriptor) -> Result<(), CodecError>;
}
