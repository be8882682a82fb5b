use crate::{BitCounter, BitReader, BitWrite, SerdeErr};

/// A type which can be written to and read from a bit stream
pub trait Serde: Sized + Clone + PartialEq {
    /// Writes self into the given writer
    fn ser(&self, writer: &mut dyn BitWrite);

    /// Reads a value of this type from the given reader
    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;

    /// Number of bits `ser` will write for this value
    fn bit_length(&self) -> usize {
        let mut counter = BitCounter::new();
        self.ser(&mut counter);
        counter.bits_needed()
    }
}

/// Implemented by types whose encoding always has the same length
pub trait ConstBitLength {
    fn const_bit_length() -> u32;
}
