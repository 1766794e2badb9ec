use core::ops::{Add, AddAssign, Sub, SubAssign};

/// Signed microseconds.
///
/// Wall-clock times handed to a stream are measured from an arbitrary
/// caller-chosen origin, typically "timer start".
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Micros(i64);

impl Micros {
    /// Zero.
    pub const ZERO: Self = Self(0);
    /// Creates a new instance of microseconds
    pub const fn new(microseconds: i64) -> Self {
        Self(microseconds)
    }
    /// Returns the microseconds as an i64
    pub const fn us(&self) -> i64 {
        self.0
    }
    /// ms -> us
    pub const fn from_ms(ms: i64) -> Self {
        Self(ms * 1_000)
    }
}

impl Add for Micros {
    type Output = Micros;
    fn add(self, rhs: Self) -> Self::Output {
        Micros(self.0 + rhs.0)
    }
}

impl AddAssign for Micros {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Micros {
    type Output = Micros;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Micros {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}
