//! Fixed-width 256-bit big-endian codec (spec §4.1, C2).
//!
//! Field elements are stored internally as four 64-bit limbs in host order
//! (via `ark_ff::BigInteger256`). The wire format is always 32 bytes,
//! big-endian, independent of host endianness: on a little-endian host this
//! means byte-swapping every limb and writing limb 3 first.

use byteorder::{BigEndian, ByteOrder};

/// Writes a 256-bit unsigned integer (as four little-endian-ordered u64
/// limbs, the representation `ark_ff::BigInteger256` uses) into a 32-byte
/// big-endian buffer.
pub fn write_u256_be(limbs: &[u64; 4], buffer: &mut [u8; 32]) {
    for (i, limb) in limbs.iter().rev().enumerate() {
        BigEndian::write_u64(&mut buffer[i * 8..i * 8 + 8], *limb);
    }
}

/// Inverse of [`write_u256_be`].
pub fn read_u256_be(buffer: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for i in 0..4 {
        limbs[3 - i] = BigEndian::read_u64(&buffer[i * 8..i * 8 + 8]);
    }
    limbs
}

/// Writes a manifest `u32` field in network (big-endian) byte order.
pub fn write_u32_be(value: u32, buffer: &mut [u8; 4]) {
    BigEndian::write_u32(buffer, value);
}

/// Inverse of [`write_u32_be`].
pub fn read_u32_be(buffer: &[u8; 4]) -> u32 {
    BigEndian::read_u32(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_order_matches_spec_example() {
        // spec §8 item 2: 0xFFEEDDCCBBAA9988...78695A4B3C2D1E0F -> first byte
        // 0xFF, last byte 0x0F.
        let limbs = [
            0x78695A4B3C2D1E0Fu64,
            0x1122334455667788u64,
            0x99AABBCCDDEEFF00u64,
            0xFFEEDDCCBBAA9988u64,
        ];
        let mut buffer = [0u8; 32];
        write_u256_be(&limbs, &mut buffer);
        assert_eq!(buffer[0], 0xFF);
        assert_eq!(buffer[31], 0x0F);
        assert_eq!(read_u256_be(&buffer), limbs);
    }

    #[test]
    fn u32_round_trips() {
        let mut buffer = [0u8; 4];
        write_u32_be(0x01020304, &mut buffer);
        assert_eq!(buffer, [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(read_u32_be(&buffer), 0x01020304);
    }

    #[test]
    fn u256_round_trip_random() {
        use rand::RngCore;
        let mut rng = rand::thread_rng();
        for _ in 0..32 {
            let limbs = [
                rng.next_u64(),
                rng.next_u64(),
                rng.next_u64(),
                rng.next_u64(),
            ];
            let mut buffer = [0u8; 32];
            write_u256_be(&limbs, &mut buffer);
            assert_eq!(read_u256_be(&buffer), limbs);
        }
    }
}
