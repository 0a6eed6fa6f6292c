//! Byte-order-aware primitive codec.
//!
//! Pure functions that read and write fixed-width integers and floats at a
//! byte offset in a slice. Every reader in the crate decodes through these,
//! so byte-order handling lives in exactly one place.
//!
//! All functions index the slice directly and panic on out-of-range offsets;
//! callers bounds-check before decoding.

/// Byte order applied to primitive reads.
///
/// `Native` resolves to the target's endianness at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    Little,
    Big,
    #[default]
    Native,
}

impl ByteOrder {
    /// Whether values are decoded least-significant byte first.
    #[inline]
    pub fn is_little(self) -> bool {
        match self {
            ByteOrder::Little => true,
            ByteOrder::Big => false,
            ByteOrder::Native => cfg!(target_endian = "little"),
        }
    }
}

macro_rules! codec {
    ($get:ident, $put:ident, $ty:ty) => {
        #[inline]
        pub fn $get(data: &[u8], offset: usize, order: ByteOrder) -> $ty {
            const N: usize = size_of::<$ty>();
            let mut bytes = [0u8; N];
            bytes.copy_from_slice(&data[offset..offset + N]);
            if order.is_little() {
                <$ty>::from_le_bytes(bytes)
            } else {
                <$ty>::from_be_bytes(bytes)
            }
        }

        #[inline]
        pub fn $put(data: &mut [u8], offset: usize, value: $ty, order: ByteOrder) {
            const N: usize = size_of::<$ty>();
            let bytes = if order.is_little() {
                value.to_le_bytes()
            } else {
                value.to_be_bytes()
            };
            data[offset..offset + N].copy_from_slice(&bytes);
        }
    };
}

codec!(get_i8, put_i8, i8);
codec!(get_u8, put_u8, u8);
codec!(get_i16, put_i16, i16);
codec!(get_u16, put_u16, u16);
codec!(get_i32, put_i32, i32);
codec!(get_u32, put_u32, u32);
codec!(get_i64, put_i64, i64);
codec!(get_u64, put_u64, u64);
codec!(get_f32, put_f32, f32);
codec!(get_f64, put_f64, f64);
