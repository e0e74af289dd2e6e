use bytes::{Buf, BufMut};

use crate::wire::WireError;

/// The longest legal varint: ten bytes carrying 64 bits of payload.
const MAX_VARINT_LEN: usize = 10;

/// Write a variable-length integer: 7 data bits per byte, high bit set on
/// every byte but the last, least-significant group first.
pub fn put_varint(buf: &mut impl BufMut, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.put_u8(byte);
            return;
        }
        buf.put_u8(byte | 0x80);
    }
}

/// Read a variable-length integer. Fails if the input runs out before a
/// byte without the continuation bit, or if the encoding spans more than
/// ten bytes.
pub fn get_varint(buf: &mut impl Buf) -> Result<u64, WireError> {
    let mut value = 0u64;
    for i in 0..MAX_VARINT_LEN {
        if !buf.has_remaining() {
            return Err(WireError::TruncatedVarint);
        }
        let byte = buf.get_u8();
        value |= u64::from(byte & 0x7f) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(WireError::VarintOverflow)
}

/// The encoded length of `value`, without writing it.
pub fn varint_len(value: u64) -> usize {
    // bits needed, rounded up to the next group of 7
    ((64 - (value | 1).leading_zeros() as usize) + 6) / 7
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;

    use super::*;

    fn round_trip(value: u64) -> Vec<u8> {
        let mut buf = BytesMut::new();
        put_varint(&mut buf, value);
        assert_eq!(buf.len(), varint_len(value));
        let mut read = buf.clone().freeze();
        assert_eq!(get_varint(&mut read).unwrap(), value);
        buf.to_vec()
    }

    #[test]
    fn single_byte_values() {
        assert_eq!(round_trip(0), vec![0x00]);
        assert_eq!(round_trip(1), vec![0x01]);
        assert_eq!(round_trip(127), vec![0x7f]);
    }

    #[test]
    fn multi_byte_values() {
        assert_eq!(round_trip(128), vec![0x80, 0x01]);
        assert_eq!(round_trip(300), vec![0xac, 0x02]);
        assert_eq!(round_trip(16_383), vec![0xff, 0x7f]);
        assert_eq!(round_trip(16_384), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    fn max_value() {
        let bytes = round_trip(u64::MAX);
        assert_eq!(bytes.len(), 10);
    }

    #[test]
    fn truncated_input() {
        // continuation bit set but nothing follows
        let mut buf = &[0x80u8][..];
        assert!(matches!(
            get_varint(&mut buf),
            Err(WireError::TruncatedVarint)
        ));
        let mut buf = &[0xff, 0xff][..];
        assert!(matches!(
            get_varint(&mut buf),
            Err(WireError::TruncatedVarint)
        ));
    }

    #[test]
    fn empty_input() {
        let mut buf = &[][..];
        assert!(matches!(
            get_varint(&mut buf),
            Err(WireError::TruncatedVarint)
        ));
    }

    #[test]
    fn overlong_encoding() {
        let mut buf = &[0xffu8; 11][..];
        assert!(matches!(
            get_varint(&mut buf),
            Err(WireError::VarintOverflow)
        ));
    }
}
