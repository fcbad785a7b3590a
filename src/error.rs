use std::fmt;

/// One side of a rejected range, printed the way the caller wrote it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// A position from typed rust code.
    Index(usize),
    /// A position from a loosely typed caller (eg a JS number). May be negative or fractional.
    Number(f64),
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Index(i) => write!(f, "{}", i),
            Bound::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            // Covers -0 as well.
            Bound::Number(n) if *n == 0.0 => f.write_str("0"),
            // Very large and very small magnitudes switch to exponent form, as JS numbers do.
            Bound::Number(n) if n.abs() >= 1e21 || n.abs() < 1e-6 => {
                let e = format!("{:e}", n);
                match e.split_once('e') {
                    Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{}e+{}", mantissa, exp),
                    _ => f.write_str(&e),
                }
            }
            // f64's Display already prints 3.0 as "3" and 1.1 as "1.1".
            Bound::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<usize> for Bound {
    fn from(i: usize) -> Self { Bound::Index(i) }
}

impl From<f64> for Bound {
    fn from(n: f64) -> Self { Bound::Number(n) }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RopeError {
    #[error("range [{begin}, {end}) is invalid.")]
    InvalidRange { begin: Bound, end: Bound },
}

impl RopeError {
    pub(crate) fn invalid_range(begin: impl Into<Bound>, end: impl Into<Bound>) -> Self {
        RopeError::InvalidRange { begin: begin.into(), end: end.into() }
    }
}
