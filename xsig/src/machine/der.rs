use crate::{Error, Result};

/// Length of a raw ECDSA signature: `r` and `s`, each 32 bytes.
pub const RAW_SIGNATURE_LEN: usize = 64;

const SEQUENCE_TAG: u8 = 0x30;
const INTEGER_TAG: u8 = 0x02;

/// Parse one DER INTEGER from `buf` at `*pos` into a 32-byte zero-padded
/// big-endian value.
fn parse_der_integer(buf: &[u8], pos: &mut usize) -> Result<[u8; 32]> {
    if *pos >= buf.len() {
        return Err(Error::BadDerEncoding);
    }
    if buf[*pos] != INTEGER_TAG {
        return Err(Error::BadDerEncoding);
    }
    *pos += 1;

    if *pos >= buf.len() {
        return Err(Error::BadDerEncoding);
    }
    let int_len = buf[*pos] as usize;
    *pos += 1;

    if *pos + int_len > buf.len() {
        return Err(Error::BadDerEncoding);
    }

    let mut data = &buf[*pos..*pos + int_len];

    // A single leading zero is the DER pad for positive integers with the
    // high bit set; strip it before the length check.
    if data.len() > 1 && data[0] == 0x00 {
        data = &data[1..];
    }

    if data.len() > 32 {
        return Err(Error::DerIntegerTooLarge);
    }

    // Right-align into the 32-byte output, zero-padding on the left
    let mut out = [0u8; 32];
    out[32 - data.len()..].copy_from_slice(data);

    *pos += int_len;
    Ok(out)
}

/// Convert a DER-encoded ECDSA signature to the raw 64-byte `r||s` form.
///
/// Accepts `SEQUENCE(0x30) len { INTEGER r, INTEGER s }` where each integer
/// fits in 32 bytes after stripping its leading-zero pad. Nothing is returned
/// on error; callers must not consume a partial conversion.
pub fn der_to_raw(der_sig: &[u8]) -> Result<[u8; RAW_SIGNATURE_LEN]> {
    // Liberal lower bound; the true minima are enforced by the integer parses
    if der_sig.len() < 6 {
        return Err(Error::BadDerEncoding);
    }

    let mut pos = 0;

    if der_sig[pos] != SEQUENCE_TAG {
        return Err(Error::BadDerEncoding);
    }
    pos += 1;

    let seq_len = der_sig[pos] as usize;
    pos += 1;

    if pos + seq_len > der_sig.len() {
        return Err(Error::BadDerEncoding);
    }

    let r = parse_der_integer(der_sig, &mut pos)?;
    let s = parse_der_integer(der_sig, &mut pos)?;

    let mut raw = [0u8; RAW_SIGNATURE_LEN];
    raw[..32].copy_from_slice(&r);
    raw[32..].copy_from_slice(&s);
    Ok(raw)
}
