//! Hashable projection of `Scalar` used by join and group-by tables.

use marquee_core::types::Scalar;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Null,
    Bool(bool),
    Int(i64),
    /// Bit pattern of a non-integral float.
    Float(u64),
    Str(String),
}

impl From<&Scalar> for Key {
    fn from(s: &Scalar) -> Self {
        match s {
            Scalar::Null => Key::Null,
            Scalar::Bool(b) => Key::Bool(*b),
            Scalar::I64(i) => Key::Int(*i),
            // Integral floats hash like ints so 3 and 3.0 meet.
            Scalar::F64(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Key::Int(*f as i64),
            Scalar::F64(f) => Key::Float(f.to_bits()),
            Scalar::Str(s) => Key::Str(s.clone()),
        }
    }
}
