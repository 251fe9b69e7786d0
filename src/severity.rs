use crossterm::style::Color;

/// how close a ratio is to trouble.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Severity {
    Calm,
    Low,
    Elevated,
    High,
    Critical,
}

// === impl Severity ===

impl Severity {
    /// every tier, from least to most severe.
    pub const TIERS: [Self; 5] = [
        Self::Calm,
        Self::Low,
        Self::Elevated,
        Self::High,
        Self::Critical,
    ];

    /// classifies a ratio in `[0, 1]`.
    ///
    /// # panics
    ///
    /// panics if `ratio` is outside of `[0, 1]`, or is not a number.
    pub fn classify(ratio: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&ratio),
            "ratio {ratio} is outside of [0, 1]"
        );

        let last = Self::TIERS.len() - 1;
        let bucket = (ratio * last as f64).floor() as usize;

        Self::TIERS[bucket.min(last)]
    }

    /// the foreground color this tier is drawn in.
    ///
    /// the two calmest tiers share a color, so the safe region is wider than the others.
    pub fn color(self) -> Color {
        match self {
            Self::Calm | Self::Low => Color::Green,
            Self::Elevated => Color::Yellow,
            Self::High | Self::Critical => Color::Red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert_eq!(Severity::classify(0.0), Severity::Calm);
        assert_eq!(Severity::classify(1.0), Severity::Critical);
    }

    #[test]
    fn buckets() {
        assert_eq!(Severity::classify(0.24), Severity::Calm);
        assert_eq!(Severity::classify(0.25), Severity::Low);
        assert_eq!(Severity::classify(0.49), Severity::Low);
        assert_eq!(Severity::classify(0.5), Severity::Elevated);
        assert_eq!(Severity::classify(0.74), Severity::Elevated);
        assert_eq!(Severity::classify(0.75), Severity::High);
        assert_eq!(Severity::classify(0.99), Severity::High);
    }

    #[test]
    fn just_below_one() {
        let ratio = 1.0 - f64::EPSILON;
        assert_eq!(Severity::classify(ratio), Severity::High);
    }

    #[test]
    fn monotonic() {
        let mut last = Severity::Calm;
        for step in 0..=1000 {
            let tier = Severity::classify(step as f64 / 1000.0);
            assert!(tier >= last);
            last = tier;
        }
    }

    #[test]
    fn safe_region_is_shared() {
        assert_eq!(Severity::Calm.color(), Severity::Low.color());
        assert_ne!(Severity::Low.color(), Severity::Elevated.color());
        assert_eq!(Severity::High.color(), Severity::Critical.color());
    }

    #[test]
    #[should_panic]
    fn above_one() {
        Severity::classify(1.01);
    }

    #[test]
    #[should_panic]
    fn negative() {
        Severity::classify(-0.01);
    }

    #[test]
    #[should_panic]
    fn nan() {
        Severity::classify(f64::NAN);
    }
}
