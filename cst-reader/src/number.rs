//! Dynamically typed number type.

use std::fmt::{self, Debug, Display};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Represents a number literal: a fixed-width or arbitrary-precision
/// integer, a ratio, a binary float or an exact decimal.
#[derive(PartialEq, Clone)]
pub struct Number {
    n: N,
}

#[derive(Debug, PartialEq, Clone)]
enum N {
    Int(i64),
    BigInt(BigInt),
    // Always reduced, with a denominator greater than one.
    Ratio(BigInt, BigInt),
    Float(f64),
    Decimal(Decimal),
}

/// An exact decimal value, `unscaled * 10^-scale`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Decimal {
    unscaled: BigInt,
    scale: i64,
}

impl Decimal {
    /// Constructs the decimal `unscaled * 10^-scale`.
    pub fn new(unscaled: BigInt, scale: i64) -> Self {
        Decimal { unscaled, scale }
    }

    /// Parses decimal text of the form `[-+]digits[.digits][(e|E)[-+]digits]`.
    ///
    /// ```
    /// use cst_reader::number::Decimal;
    ///
    /// let d = Decimal::parse("3.14").unwrap();
    /// assert_eq!(d.scale(), 2);
    /// assert_eq!(d.to_string(), "3.14");
    /// assert_eq!(Decimal::parse("1e3").unwrap().to_string(), "1E+3");
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let (mantissa, exponent) = match text.find(|c| c == 'e' || c == 'E') {
            Some(i) => (&text[..i], text[i + 1..].parse::<i64>().ok()?),
            None => (text, 0),
        };
        let (int_part, frac_part) = match mantissa.find('.') {
            Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
            None => (mantissa, ""),
        };
        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);
        let unscaled = digits.parse::<BigInt>().ok()?;
        let scale = (frac_part.len() as i64).checked_sub(exponent)?;
        Some(Decimal { unscaled, scale })
    }

    /// The unscaled integer value.
    pub fn unscaled(&self) -> &BigInt {
        &self.unscaled
    }

    /// The number of digits after the decimal point; negative for values
    /// scaled by a power of ten.
    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Approximates the decimal as a binary float.
    pub fn to_f64(&self) -> Option<f64> {
        format!("{}e{}", self.unscaled, -self.scale).parse().ok()
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unscaled.is_negative() {
            f.write_str("-")?;
        }
        let digits = self.unscaled.magnitude().to_string();
        if self.scale == 0 {
            return f.write_str(&digits);
        }
        if self.scale < 0 {
            // Scientific notation with one digit before the point.
            let exponent = (digits.len() as i64 - 1) - self.scale;
            f.write_str(&digits[..1])?;
            if digits.len() > 1 {
                write!(f, ".{}", &digits[1..])?;
            }
            return write!(f, "E+{}", exponent);
        }
        let scale = self.scale as usize;
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int, frac)
        } else {
            f.write_str("0.")?;
            for _ in digits.len()..scale {
                f.write_str("0")?;
            }
            f.write_str(&digits)
        }
    }
}

impl Number {
    /// Parses the digits of an integer in the given radix.
    ///
    /// Values that fit into 64 bits are stored as fixed-width integers unless
    /// `force_big` is set. Returns `None` for an invalid radix or digit.
    ///
    /// ```
    /// # use cst_reader::Number;
    /// let n = Number::from_digits("1F", 16, false, false).unwrap();
    /// assert_eq!(n.as_i64(), Some(31));
    /// assert!(Number::from_digits("10", 10, false, true).unwrap().is_big_int());
    /// assert!(Number::from_digits("9", 37, false, false).is_none());
    /// ```
    pub fn from_digits(digits: &str, radix: u32, negate: bool, force_big: bool) -> Option<Number> {
        if !(2..=36).contains(&radix) {
            return None;
        }
        let mut n = BigInt::parse_bytes(digits.as_bytes(), radix)?;
        if negate {
            n = -n;
        }
        Some(if force_big {
            Number { n: N::BigInt(n) }
        } else {
            Number::from(n)
        })
    }

    /// Constructs the reduced ratio `numerator/denominator`.
    ///
    /// A denominator that divides the numerator yields an integer; a zero
    /// denominator yields `None`.
    ///
    /// ```
    /// # use cst_reader::Number;
    /// # use num_bigint::BigInt;
    /// let half = Number::ratio(BigInt::from(2), BigInt::from(4)).unwrap();
    /// assert_eq!(half.to_string(), "1/2");
    /// let two = Number::ratio(BigInt::from(-4), BigInt::from(2)).unwrap();
    /// assert_eq!(two.as_i64(), Some(-2));
    /// ```
    pub fn ratio(numerator: BigInt, denominator: BigInt) -> Option<Number> {
        if denominator.is_zero() {
            return None;
        }
        let gcd = numerator.gcd(&denominator);
        let (mut num, mut den) = (numerator / &gcd, denominator / &gcd);
        if den.is_negative() {
            num = -num;
            den = -den;
        }
        if den.is_one() {
            Some(Number::from(num))
        } else {
            Some(Number {
                n: N::Ratio(num, den),
            })
        }
    }

    /// Constructs an exact decimal number.
    pub fn decimal(d: Decimal) -> Number {
        Number { n: N::Decimal(d) }
    }

    /// Returns true if the `Number` is a fixed-width integer.
    #[inline]
    pub fn is_i64(&self) -> bool {
        matches!(self.n, N::Int(_))
    }

    /// Returns true if the `Number` is an arbitrary-precision integer.
    #[inline]
    pub fn is_big_int(&self) -> bool {
        matches!(self.n, N::BigInt(_))
    }

    /// Returns true if the `Number` is a ratio.
    #[inline]
    pub fn is_ratio(&self) -> bool {
        matches!(self.n, N::Ratio(..))
    }

    /// Returns true if the `Number` is a binary float.
    #[inline]
    pub fn is_f64(&self) -> bool {
        matches!(self.n, N::Float(_))
    }

    /// Returns true if the `Number` is an exact decimal.
    #[inline]
    pub fn is_decimal(&self) -> bool {
        matches!(self.n, N::Decimal(_))
    }

    /// If the `Number` is an integer that fits into 64 bits, returns it.
    ///
    /// ```
    /// # use cst_reader::Number;
    /// assert_eq!(Number::from(64).as_i64(), Some(64));
    /// assert_eq!(Number::from(1.5).as_i64(), None);
    /// ```
    #[inline]
    pub fn as_i64(&self) -> Option<i64> {
        match &self.n {
            N::Int(n) => Some(*n),
            N::BigInt(n) => n.to_i64(),
            _ => None,
        }
    }

    /// If the `Number` is an integer of any width, returns it as a `BigInt`.
    pub fn to_big_int(&self) -> Option<BigInt> {
        match &self.n {
            N::Int(n) => Some(BigInt::from(*n)),
            N::BigInt(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// Approximates the number as f64.
    ///
    /// ```
    /// # use cst_reader::Number;
    /// assert_eq!(Number::from(-64).as_f64(), Some(-64.0));
    /// assert_eq!(Number::from(256.0).as_f64(), Some(256.0));
    /// ```
    pub fn as_f64(&self) -> Option<f64> {
        match &self.n {
            N::Int(n) => Some(*n as f64),
            N::BigInt(n) => n.to_f64(),
            N::Ratio(num, den) => Some(num.to_f64()? / den.to_f64()?),
            N::Float(f) => Some(*f),
            N::Decimal(d) => d.to_f64(),
        }
    }

    /// Dispatch based on the type of the contained value.
    ///
    /// Depending on the stored value, one of the functions of the
    /// supplied visitor will be called.
    pub fn visit<V>(&self, visitor: V) -> Result<V::Value, V::Error>
    where
        V: Visitor,
    {
        match &self.n {
            N::Int(n) => visitor.visit_i64(*n),
            N::BigInt(n) => visitor.visit_big_int(n),
            N::Ratio(num, den) => visitor.visit_ratio(num, den),
            N::Float(n) => visitor.visit_f64(*n),
            N::Decimal(d) => visitor.visit_decimal(d),
        }
    }
}

/// Trait to access the value stored in `Number`.
///
/// The `Number` type does not directly expose its internal
/// structure to allow future changes without breaking the API.
///
/// Instead, you can implement this trait and pass your implementation
/// to `Number::visit`.
pub trait Visitor {
    /// The return type of the visitor methods.
    type Value;
    /// The error type of the visitor methods.
    type Error;

    /// The stored value is an `i64`.
    fn visit_i64(self, n: i64) -> Result<Self::Value, Self::Error>;
    /// The stored value is an arbitrary-precision integer.
    fn visit_big_int(self, n: &BigInt) -> Result<Self::Value, Self::Error>;
    /// The stored value is a reduced ratio with a denominator above one.
    fn visit_ratio(self, numerator: &BigInt, denominator: &BigInt)
        -> Result<Self::Value, Self::Error>;
    /// The stored value is `f64`.
    fn visit_f64(self, n: f64) -> Result<Self::Value, Self::Error>;
    /// The stored value is an exact decimal.
    fn visit_decimal(self, d: &Decimal) -> Result<Self::Value, Self::Error>;
}

macro_rules! impl_from_int {
    (
        $($ty:ty),*
    ) => {
        $(
            impl From<$ty> for Number {
                #[inline]
                fn from(n: $ty) -> Self {
                    Number { n: N::Int(i64::from(n)) }
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, i8, i16, i32, i64);

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Number { n: N::Int(n) },
            Err(_) => Number {
                n: N::BigInt(BigInt::from(n)),
            },
        }
    }
}

impl From<BigInt> for Number {
    /// Integers that fit into 64 bits are stored as fixed-width integers.
    fn from(n: BigInt) -> Self {
        match n.to_i64() {
            Some(n) => Number { n: N::Int(n) },
            None => Number { n: N::BigInt(n) },
        }
    }
}

impl From<f32> for Number {
    #[inline]
    fn from(n: f32) -> Self {
        Number {
            n: N::Float(f64::from(n)),
        }
    }
}

impl From<f64> for Number {
    #[inline]
    fn from(n: f64) -> Self {
        Number { n: N::Float(n) }
    }
}

impl From<Decimal> for Number {
    fn from(d: Decimal) -> Self {
        Number::decimal(d)
    }
}

impl Display for Number {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.n {
            N::Int(i) => Display::fmt(i, formatter),
            N::BigInt(i) => write!(formatter, "{}N", i),
            N::Ratio(num, den) => write!(formatter, "{}/{}", num, den),
            N::Float(f) => {
                if f.is_nan() {
                    formatter.write_str("##NaN")
                } else if f.is_infinite() {
                    formatter.write_str(if *f > 0.0 { "##Inf" } else { "##-Inf" })
                } else {
                    formatter.write_str(ryu::Buffer::new().format_finite(*f))
                }
            }
            N::Decimal(d) => write!(formatter, "{}M", d),
        }
    }
}

impl Debug for Number {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.n, formatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_display() {
        let cases = [
            ("3.14", "3.14"),
            ("-0.005", "-0.005"),
            ("42", "42"),
            ("1.5e2", "1.5E+2"),
            ("123e3", "1.23E+5"),
            ("2.50", "2.50"),
        ];
        for (input, expected) in &cases {
            let d = Decimal::parse(input).unwrap();
            assert_eq!(d.to_string(), *expected, "decimal {}", input);
        }
    }

    #[test]
    fn decimal_reparses_to_same_value() {
        for input in &["1e3", "0.001", "-12.5e-3", "9e9"] {
            let d = Decimal::parse(input).unwrap();
            assert_eq!(Decimal::parse(&d.to_string()).unwrap(), d);
        }
    }

    #[test]
    fn ratio_normalizes_sign() {
        let r = Number::ratio(BigInt::from(3), BigInt::from(-6)).unwrap();
        assert_eq!(r.to_string(), "-1/2");
        assert!(Number::ratio(BigInt::from(1), BigInt::zero()).is_none());
    }

    #[test]
    fn big_ints_print_with_suffix() {
        let big = Number::from(u64::MAX);
        assert!(big.is_big_int());
        assert_eq!(big.to_string(), "18446744073709551615N");
        assert_eq!(Number::from(1.0).to_string(), "1.0");
    }
}
