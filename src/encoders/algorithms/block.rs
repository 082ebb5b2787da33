//! 3-byte ↔ 4-symbol packing arithmetic shared by the one-shot and
//! streaming paths. Nothing here allocates.

use crate::core::alphabet::Alphabet;

/// Up to 3 decoded bytes produced by one quantum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Block {
    bytes: [u8; 3],
    len: u8,
}

impl Block {
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

/// A short quantum carried non-zero bits that decoding would discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlackBits;

/// Encodes 1 to 3 input bytes into `output`, returning the bytes written.
///
/// `len + 1` symbols are emitted, followed by `3 - len` padding symbols
/// when padding is enabled. `output` must have room for four symbols of the
/// widest width.
#[inline]
pub(crate) fn encode_block(
    alphabet: &Alphabet,
    padding: Option<char>,
    input: &[u8],
    output: &mut [u8],
) -> usize {
    debug_assert!((1..=3).contains(&input.len()));

    let mut val = 0u32;
    for (i, &b) in input.iter().enumerate() {
        val |= (b as u32) << (16 - 8 * i);
    }

    let mut written = 0;
    for i in 0..=input.len() {
        let value = ((val >> (18 - 6 * i)) & 0x3F) as u8;
        let symbol = alphabet.symbol_bytes(value);
        output[written..written + symbol.len()].copy_from_slice(symbol);
        written += symbol.len();
    }

    if let Some(pad) = padding {
        for _ in input.len()..3 {
            written += pad.encode_utf8(&mut output[written..]).len();
        }
    }

    written
}

/// Reassembles bytes from `filled` resolved 6-bit values.
///
/// `filled` is 4 for a full quantum, or 2 or 3 for one cut short by padding
/// or by the end of unpadded input. Unfilled slots must hold zero. In strict
/// mode the bits a short quantum drops must all be zero.
#[inline]
pub(crate) fn decode_quantum(
    values: [u8; 4],
    filled: usize,
    strict: bool,
) -> Result<Block, SlackBits> {
    debug_assert!((2..=4).contains(&filled));

    let val = (values[0] as u32) << 18
        | (values[1] as u32) << 12
        | (values[2] as u32) << 6
        | values[3] as u32;
    let bytes = [(val >> 16) as u8, (val >> 8) as u8, val as u8];

    let len = filled - 1;
    let slack = match len {
        1 => val & 0xFFFF,
        2 => val & 0xFF,
        _ => 0,
    };
    if strict && slack != 0 {
        return Err(SlackBits);
    }

    Ok(Block {
        bytes,
        len: len as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    fn encode(input: &[u8], padding: Option<char>) -> String {
        let alphabet = Alphabet::new(ASCII).unwrap();
        let mut out = [0u8; 16];
        let n = encode_block(&alphabet, padding, input, &mut out);
        String::from_utf8(out[..n].to_vec()).unwrap()
    }

    #[test]
    fn test_encode_full_block() {
        assert_eq!(encode(b"foo", Some('=')), "Zm9v");
        assert_eq!(encode(b"foo", None), "Zm9v");
    }

    #[test]
    fn test_encode_short_blocks() {
        assert_eq!(encode(b"f", Some('=')), "Zg==");
        assert_eq!(encode(b"fo", Some('=')), "Zm8=");
        assert_eq!(encode(b"f", None), "Zg");
        assert_eq!(encode(b"fo", None), "Zm8");
    }

    #[test]
    fn test_encode_multibyte_padding() {
        let alphabet = Alphabet::new(ASCII).unwrap();
        let mut out = [0u8; 16];
        let n = encode_block(&alphabet, Some('・'), b"f", &mut out);
        assert_eq!(&out[..n], "Zg・・".as_bytes());
    }

    #[test]
    fn test_decode_full_quantum() {
        // "Zm9v"
        let block = decode_quantum([25, 38, 61, 47], 4, true).unwrap();
        assert_eq!(block.as_bytes(), b"foo");
    }

    #[test]
    fn test_decode_short_quanta() {
        // "Zg" and "Zm8"
        assert_eq!(decode_quantum([25, 32, 0, 0], 2, true).unwrap().as_bytes(), b"f");
        assert_eq!(decode_quantum([25, 38, 60, 0], 3, true).unwrap().as_bytes(), b"fo");
    }

    #[test]
    fn test_strict_rejects_slack_bits() {
        // "Zh": the low four bits of 'h' are not zero
        assert_eq!(decode_quantum([25, 33, 0, 0], 2, true), Err(SlackBits));
        assert_eq!(decode_quantum([25, 33, 0, 0], 2, false).unwrap().as_bytes(), b"f");

        // "Zm9": the low two bits of '9' are not zero
        assert_eq!(decode_quantum([25, 38, 61, 0], 3, true), Err(SlackBits));
        assert_eq!(decode_quantum([25, 38, 61, 0], 3, false).unwrap().as_bytes(), b"fo");
    }
}
