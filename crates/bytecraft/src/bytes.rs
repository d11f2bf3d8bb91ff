//! Low-level big-endian byte reads on immutable slices.
//!
//! Every function takes the buffer and a byte offset and never mutates
//! either; callers thread the offset forward themselves.

use crate::errors::ReadError;

/// Returns the `width` bytes starting at `offset`, or [ReadError::OutOfBounds].
pub fn take(data: &[u8], offset: usize, width: usize) -> Result<&[u8], ReadError> {
    let out_of_bounds = ReadError::OutOfBounds {
        offset,
        width,
        len: data.len(),
    };

    let end = offset.checked_add(width).ok_or(out_of_bounds.clone())?;
    data.get(offset..end).ok_or(out_of_bounds)
}

/// Reads `width` bytes (max 8) at `offset` as a big-endian unsigned integer.
pub fn read_uint_be(data: &[u8], offset: usize, width: usize) -> Result<u64, ReadError> {
    if width > 8 {
        return Err(ReadError::TooManyBytesRead { width });
    }

    let bytes = take(data, offset, width)?;

    Ok(bytes
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte)))
}

/// Reads 8 bytes at `offset` as a big-endian IEEE-754 double.
pub fn read_f64_be(data: &[u8], offset: usize) -> Result<f64, ReadError> {
    let bytes = take(data, offset, 8)?;

    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);

    Ok(f64::from_be_bytes(raw))
}

/// Decodes `width` bytes at `offset` as ISO-8859-1 text: one char per byte.
pub fn read_latin1(data: &[u8], offset: usize, width: usize) -> Result<String, ReadError> {
    let bytes = take(data, offset, width)?;

    Ok(bytes.iter().map(|&byte| char::from(byte)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take() {
        let data = [1, 2, 3, 4];
        assert_eq!(take(&data, 1, 2).unwrap(), &[2, 3]);
        assert_eq!(take(&data, 4, 0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_take_out_of_bounds() {
        let data = [1, 2, 3, 4];
        assert_eq!(
            take(&data, 2, 3).unwrap_err(),
            ReadError::OutOfBounds {
                offset: 2,
                width: 3,
                len: 4
            }
        );
    }

    #[test]
    fn test_take_offset_overflow() {
        let data = [1, 2, 3, 4];
        assert!(matches!(
            take(&data, usize::MAX, 2).unwrap_err(),
            ReadError::OutOfBounds { .. }
        ));
    }

    #[test]
    fn test_read_uint_be() {
        let data = [0x00, 0x00, 0x01, 0x02];
        assert_eq!(read_uint_be(&data, 0, 4).unwrap(), 0x0102);
        assert_eq!(read_uint_be(&data, 3, 1).unwrap(), 0x02);
    }

    #[test]
    fn test_read_uint_be_more_than_8() {
        let data = [0u8; 16];
        assert_eq!(
            read_uint_be(&data, 0, 9).unwrap_err(),
            ReadError::TooManyBytesRead { width: 9 }
        );
    }

    #[test]
    fn test_read_f64_be() {
        let data = 10.5f64.to_be_bytes();
        assert_eq!(read_f64_be(&data, 0).unwrap(), 10.5);
    }

    #[test]
    fn test_read_latin1() {
        let data = [b'M', b'P', b'S', b'7', 0xE9];
        assert_eq!(read_latin1(&data, 0, 4).unwrap(), "MPS7");
        assert_eq!(read_latin1(&data, 1, 4).unwrap(), "PS7\u{e9}");
    }
}
