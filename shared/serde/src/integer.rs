use crate::{BitReader, BitWrite, ConstBitLength, Serde, SerdeErr};

pub type UnsignedInteger<const BITS: u8> = SerdeInteger<false, false, BITS>;
pub type SignedInteger<const BITS: u8> = SerdeInteger<true, false, BITS>;
pub type UnsignedVariableInteger<const BITS: u8> = SerdeInteger<false, true, BITS>;
pub type SignedVariableInteger<const BITS: u8> = SerdeInteger<true, true, BITS>;

/// An integer encoded with a chosen number of bits.
///
/// Fixed integers always occupy `BITS` bits (plus a sign bit when signed).
/// Variable integers are written in `BITS`-sized groups, each preceded by a
/// continuation bit, so small values stay small on the wire.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SerdeInteger<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> {
    inner: IntegerLayout,
}

// The generic wrapper delegates to this non-generic layout to keep
// monomorphized code small.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct IntegerLayout {
    value: i128,
    signed: bool,
    variable: bool,
    bits: u8,
}

impl IntegerLayout {
    fn checked(signed: bool, variable: bool, bits: u8, value: i128) -> Option<Self> {
        if bits == 0 || bits > 127 {
            return None;
        }
        if !signed && value < 0 {
            return None;
        }
        if !variable && value.unsigned_abs() >= 1_u128 << bits {
            return None;
        }
        Some(Self {
            value,
            signed,
            variable,
            bits,
        })
    }

    fn ser(&self, writer: &mut dyn BitWrite) {
        if self.signed {
            writer.write_bit(self.value < 0);
        }

        let mut magnitude = self.value.unsigned_abs();

        if self.variable {
            loop {
                let proceed = magnitude >= 1_u128 << self.bits;
                writer.write_bit(proceed);
                for _ in 0..self.bits {
                    writer.write_bit(magnitude & 1 != 0);
                    magnitude >>= 1;
                }
                if !proceed {
                    return;
                }
            }
        } else {
            for _ in 0..self.bits {
                writer.write_bit(magnitude & 1 != 0);
                magnitude >>= 1;
            }
        }
    }

    fn de(reader: &mut BitReader, signed: bool, variable: bool, bits: u8) -> Result<Self, SerdeErr> {
        let negative = if signed { reader.read_bit()? } else { false };

        let mut magnitude: u128 = 0;
        let mut shift: u32 = 0;

        loop {
            let proceed = if variable { reader.read_bit()? } else { false };

            for _ in 0..bits {
                let bit = reader.read_bit()?;
                if shift >= 127 {
                    if bit {
                        return Err(SerdeErr::IntegerOutOfRange {
                            value: i128::MAX,
                            target: "i128",
                        });
                    }
                } else if bit {
                    magnitude |= 1 << shift;
                }
                shift += 1;
            }

            if !proceed {
                break;
            }
        }

        let value = magnitude as i128;
        Ok(Self {
            value: if negative { -value } else { value },
            signed,
            variable,
            bits,
        })
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> SerdeInteger<SIGNED, VARIABLE, BITS> {
    /// # Panics
    ///
    /// Panics if the value cannot be represented with this layout
    /// (negative for unsigned, too large for a fixed width).
    pub fn new<T: Into<i128>>(value: T) -> Self {
        let value = value.into();
        Self::try_new(value).unwrap_or_else(|| {
            panic!(
                "{} cannot be encoded as a {}{} integer of {} bits",
                value,
                if SIGNED { "signed " } else { "unsigned " },
                if VARIABLE { "variable" } else { "fixed" },
                BITS
            )
        })
    }

    pub fn try_new<T: Into<i128>>(value: T) -> Option<Self> {
        IntegerLayout::checked(SIGNED, VARIABLE, BITS, value.into()).map(|inner| Self { inner })
    }

    pub fn get(&self) -> i128 {
        self.inner.value
    }

    /// Converts the decoded value into a narrower integer type
    pub fn to<T: TryFrom<i128>>(&self) -> Result<T, SerdeErr> {
        T::try_from(self.inner.value).map_err(|_| SerdeErr::IntegerOutOfRange {
            value: self.inner.value,
            target: std::any::type_name::<T>(),
        })
    }
}

impl<const SIGNED: bool, const VARIABLE: bool, const BITS: u8> Serde
    for SerdeInteger<SIGNED, VARIABLE, BITS>
{
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.inner.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let inner = IntegerLayout::de(reader, SIGNED, VARIABLE, BITS)?;
        Ok(Self { inner })
    }
}

impl<const SIGNED: bool, const BITS: u8> ConstBitLength for SerdeInteger<SIGNED, false, BITS> {
    fn const_bit_length() -> u32 {
        BITS as u32 + u32::from(SIGNED)
    }
}
