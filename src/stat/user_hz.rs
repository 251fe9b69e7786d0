use std::{
    ops::{Add, Div, Sub},
    str::FromStr,
};

/// an amount of cpu time, measured in clock ticks.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
pub struct UserHz(u64);

// === impl UserHz ===

impl UserHz {
    pub const ZERO: Self = Self(0);

    pub const fn new(ticks: u64) -> Self {
        Self(ticks)
    }

    pub const fn ticks(self) -> u64 {
        let Self(ticks) = self;
        ticks
    }
}

impl FromStr for UserHz {
    type Err = <u64 as FromStr>::Err;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl Add for UserHz {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        let (Self(lhs), Self(rhs)) = (self, rhs);
        Self(lhs.saturating_add(rhs))
    }
}

/// NB: kernel counters may move backwards (iowait, notably), so this saturates at zero.
impl Sub for UserHz {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        let (Self(lhs), Self(rhs)) = (self, rhs);
        Self(lhs.saturating_sub(rhs))
    }
}

impl Div for UserHz {
    type Output = f64;
    fn div(self, rhs: Self) -> Self::Output {
        let to_float = |Self(hz)| -> f64 { hz as f64 };
        let (lhs, rhs) = (to_float(self), to_float(rhs));

        lhs / rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_saturates() {
        assert_eq!(UserHz(3) - UserHz(5), UserHz::ZERO);
        assert_eq!(UserHz(5) - UserHz(3), UserHz(2));
    }

    #[test]
    fn parse_large() {
        let hz = "5000000000".parse::<UserHz>().unwrap();
        assert_eq!(hz.ticks(), 5_000_000_000);
    }

    #[test]
    fn div() {
        assert_eq!(UserHz(1) / UserHz(4), 0.25);
    }
}
