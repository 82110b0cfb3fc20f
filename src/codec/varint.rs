//! LEB128 varints with zig-zag folding for signed values.
use std::io::{ErrorKind, Read};

use crate::error::{CodecError, CodecResult};

const CONTINUATION: u8 = 0x80;
const PAYLOAD: u8 = 0x7f;
const MAX_SHIFT: u32 = 63;

pub(crate) fn put_u64(buf: &mut Vec<u8>, value: u64) {
    let mut rest = value;
    loop {
        let byte = u8::try_from(rest & u64::from(PAYLOAD)).unwrap_or(PAYLOAD);
        rest = rest.wrapping_shr(7);
        if rest == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | CONTINUATION);
    }
}

pub(crate) fn put_i64(buf: &mut Vec<u8>, value: i64) {
    put_u64(buf, zigzag(value));
}

pub(crate) fn put_u32(buf: &mut Vec<u8>, value: u32) {
    put_u64(buf, u64::from(value));
}

pub(crate) fn put_i32(buf: &mut Vec<u8>, value: i32) {
    put_i64(buf, i64::from(value));
}

pub(crate) fn put_str(buf: &mut Vec<u8>, value: &str) {
    put_u64(buf, u64::try_from(value.len()).unwrap_or(u64::MAX));
    buf.extend_from_slice(value.as_bytes());
}

const fn zigzag(value: i64) -> u64 {
    u64::from_ne_bytes((value.wrapping_shl(1) ^ value.wrapping_shr(63)).to_ne_bytes())
}

const fn unzigzag(value: u64) -> i64 {
    let half = i64::from_ne_bytes(value.wrapping_shr(1).to_ne_bytes());
    let sign = i64::from_ne_bytes((value & 1).to_ne_bytes()).wrapping_neg();
    half ^ sign
}

/// Reads one byte, mapping a clean end of input to `None`.
pub(crate) fn try_get_u8<R: Read>(reader: &mut R, context: &'static str) -> CodecResult<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => {
                let [byte] = buf;
                return Ok(Some(byte));
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(CodecError::Stream { context, source: err }),
        }
    }
}

pub(crate) fn get_u8<R: Read>(reader: &mut R, context: &'static str) -> CodecResult<u8> {
    try_get_u8(reader, context)?.ok_or(CodecError::Truncated { context })
}

pub(crate) fn get_u64<R: Read>(reader: &mut R, context: &'static str) -> CodecResult<u64> {
    let mut value = 0u64;
    let mut shift = 0u32;
    loop {
        let byte = get_u8(reader, context)?;
        let payload = u64::from(byte & PAYLOAD);
        if shift == MAX_SHIFT && payload > 1 {
            return Err(CodecError::VarintOverflow { context });
        }
        value |= payload.wrapping_shl(shift);
        if byte & CONTINUATION == 0 {
            return Ok(value);
        }
        shift = shift.saturating_add(7);
        if shift > MAX_SHIFT {
            return Err(CodecError::VarintOverflow { context });
        }
    }
}

pub(crate) fn get_i64<R: Read>(reader: &mut R, context: &'static str) -> CodecResult<i64> {
    get_u64(reader, context).map(unzigzag)
}

pub(crate) fn get_u32<R: Read>(reader: &mut R, context: &'static str) -> CodecResult<u32> {
    let value = get_u64(reader, context)?;
    u32::try_from(value).map_err(|_err| CodecError::OutOfRange {
        field: context,
        value: i128::from(value),
    })
}

pub(crate) fn get_i32<R: Read>(reader: &mut R, context: &'static str) -> CodecResult<i32> {
    let value = get_i64(reader, context)?;
    i32::try_from(value).map_err(|_err| CodecError::OutOfRange {
        field: context,
        value: i128::from(value),
    })
}

pub(crate) fn get_len<R: Read>(reader: &mut R, context: &'static str) -> CodecResult<usize> {
    let value = get_u64(reader, context)?;
    usize::try_from(value).map_err(|_err| CodecError::OutOfRange {
        field: context,
        value: i128::from(value),
    })
}

pub(crate) fn get_str<R: Read>(reader: &mut R, context: &'static str) -> CodecResult<String> {
    let len = get_len(reader, context)?;
    let mut bytes = Vec::new();
    let limit = u64::try_from(len).unwrap_or(u64::MAX);
    let read = reader
        .by_ref()
        .take(limit)
        .read_to_end(&mut bytes)
        .map_err(|err| CodecError::Stream { context, source: err })?;
    if read != len {
        return Err(CodecError::Truncated { context });
    }
    String::from_utf8(bytes).map_err(|err| CodecError::InvalidUtf8 { source: err })
}
