//! Structure-scope traversal helpers and serializer dispatch.
//!
//! The `*_structure` helpers implement the scoped-acquisition discipline:
//! every opened scope is closed exactly once, including when the body fails.
//! The `*_serializable_value` helpers implement nullable wrapping for
//! top-level values: a nullability-aware serializer is delegated to directly,
//! anything else gets an explicit null / not-null mark around it.

use crate::codec::trace;
use crate::codec::{CodecError, CompositeDecoder, CompositeEncoder, Decoder, Encoder};
use crate::descriptor::SerialDescriptor;
use crate::serializer::Serializer;
use crate::value::Value;

/// Encodes one structure scope: opens it, runs `body`, closes it.
///
/// The scope is closed on the error path as well; the body's error wins over
/// any error from the close.
pub fn encode_structure<F>(
    encoder: &mut dyn Encoder,
    descriptor: &SerialDescriptor,
    body: F,
) -> Result<(), CodecError>
where
    F: FnOnce(&mut dyn CompositeEncoder) -> Result<(), CodecError>,
{
    trace::push(descriptor.serial_name());
    let result = (|| {
        let mut composite = encoder.begin_structure(descriptor)?;
        match body(composite.as_mut()) {
            Ok(()) => composite.end_structure(descriptor),
            Err(err) => {
                let _ = composite.end_structure(descriptor);
                Err(err)
            }
        }
    })();
    trace::pop();
    result
}

/// Encodes one collection scope of known length. See [`encode_structure`].
pub fn encode_collection<F>(
    encoder: &mut dyn Encoder,
    descriptor: &SerialDescriptor,
    len: usize,
    body: F,
) -> Result<(), CodecError>
where
    F: FnOnce(&mut dyn CompositeEncoder) -> Result<(), CodecError>,
{
    trace::push(descriptor.serial_name());
    let result = (|| {
        let mut composite = encoder.begin_collection(descriptor, len)?;
        match body(composite.as_mut()) {
            Ok(()) => composite.end_structure(descriptor),
            Err(err) => {
                let _ = composite.end_structure(descriptor);
                Err(err)
            }
        }
    })();
    trace::pop();
    result
}

/// Decodes one structure scope: opens it, runs `body`, closes it.
///
/// The scope is closed on the error path as well; the body's error wins over
/// any error from the close.
pub fn decode_structure<T, F>(
    decoder: &mut dyn Decoder,
    descriptor: &SerialDescriptor,
    body: F,
) -> Result<T, CodecError>
where
    F: FnOnce(&mut dyn CompositeDecoder) -> Result<T, CodecError>,
{
    trace::push(descriptor.serial_name());
    let result = (|| {
        let mut composite = decoder.begin_structure(descriptor)?;
        match body(composite.as_mut()) {
            Ok(value) => {
                composite.end_structure(descriptor)?;
                Ok(value)
            }
            Err(err) => {
                let _ = composite.end_structure(descriptor);
                Err(err)
            }
        }
    })();
    trace::pop();
    result
}

/// Encodes a top-level value through its serializer.
pub fn encode_serializable_value(
    encoder: &mut dyn Encoder,
    serializer: &dyn Serializer,
    value: &Value,
) -> Result<(), CodecError> {
    serializer.serialize(encoder, value)
}

/// Encodes a top-level nullable value.
///
/// A nullability-aware serializer handles null itself; otherwise a null value
/// becomes an explicit null and a present value is preceded by the not-null
/// mark.
pub fn encode_nullable_serializable_value(
    encoder: &mut dyn Encoder,
    serializer: &dyn Serializer,
    value: &Value,
) -> Result<(), CodecError> {
    if serializer.descriptor().is_nullable() {
        return serializer.serialize(encoder, value);
    }
    if value.is_null() {
        encoder.encode_null()
    } else {
        encoder.encode_not_null_mark()?;
        serializer.serialize(encoder, value)
    }
}

/// Decodes a top-level value through its serializer.
pub fn decode_serializable_value(
    decoder: &mut dyn Decoder,
    deserializer: &dyn Serializer,
) -> Result<Value, CodecError> {
    deserializer.deserialize(decoder)
}

/// Decodes a top-level nullable value; the dual of
/// [`encode_nullable_serializable_value`].
pub fn decode_nullable_serializable_value(
    decoder: &mut dyn Decoder,
    deserializer: &dyn Serializer,
) -> Result<Value, CodecError> {
    if deserializer.descriptor().is_nullable() {
        return deserializer.deserialize(decoder);
    }
    if decoder.decode_not_null_mark()? {
        deserializer.deserialize(decoder)
    } else {
        decoder.decode_null()?;
        Ok(Value::Null)
    }
}
