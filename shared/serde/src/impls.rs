use uuid::Uuid;

use crate::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr, UnsignedVariableInteger};

// Unit

impl Serde for () {
    fn ser(&self, _: &mut dyn BitWrite) {}

    fn de(_: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(())
    }
}

impl ConstBitLength for () {
    fn const_bit_length() -> u32 {
        0
    }
}

// Bool

impl Serde for bool {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_bit()
    }
}

impl ConstBitLength for bool {
    fn const_bit_length() -> u32 {
        1
    }
}

// Fixed-width numbers, written as little-endian bytes

macro_rules! impl_serde_le_bytes {
    ($($type:ty),*) => {$(
        impl Serde for $type {
            fn ser(&self, writer: &mut dyn BitWrite) {
                writer.write_bytes(&self.to_le_bytes());
            }

            fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                let mut bytes = [0u8; std::mem::size_of::<$type>()];
                for byte in bytes.iter_mut() {
                    *byte = reader.read_byte()?;
                }
                Ok(<$type>::from_le_bytes(bytes))
            }
        }

        impl ConstBitLength for $type {
            fn const_bit_length() -> u32 {
                (std::mem::size_of::<$type>() * 8) as u32
            }
        }
    )*};
}

impl_serde_le_bytes!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

// Lengths

fn write_length(writer: &mut dyn BitWrite, length: usize) {
    UnsignedVariableInteger::<7>::new(length as u64).ser(writer);
}

fn read_length(reader: &mut BitReader, kind: &'static str, limit: usize) -> Result<usize, SerdeErr> {
    let length: u64 = UnsignedVariableInteger::<7>::de(reader)?.to()?;
    if length > limit as u64 {
        return Err(SerdeErr::LengthLimitExceeded {
            kind,
            length,
            limit: limit as u64,
        });
    }
    Ok(length as usize)
}

// String

impl Serde for String {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_length(writer, self.len());
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        // every byte still has to be present in the buffer
        let limit = reader.bytes_remaining() + 1;
        let length = read_length(reader, "string", limit)?;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes).map_err(|_| SerdeErr::InvalidUtf8 { length })
    }
}

// Option

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Some(value) => {
                writer.write_bit(true);
                value.ser(writer);
            }
            None => writer.write_bit(false),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if reader.read_bit()? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}

// Vec

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        write_length(writer, self.len());
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        // an item needs at least one bit, so a length past the remaining bits is corrupt
        let limit = (reader.bytes_remaining() + 1) * 8;
        let length = read_length(reader, "list", limit)?;
        let mut output = Vec::with_capacity(length.min(1024));
        for _ in 0..length {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }
}

// Uuid

impl Serde for Uuid {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let mut bytes = [0u8; 16];
        for byte in bytes.iter_mut() {
            *byte = reader.read_byte()?;
        }
        Ok(Uuid::from_bytes(bytes))
    }
}

impl ConstBitLength for Uuid {
    fn const_bit_length() -> u32 {
        128
    }
}
