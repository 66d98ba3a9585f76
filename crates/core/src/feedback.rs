/// Result band for a finished day, from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResultTier {
    Perfect,
    Excellent,
    Good,
    Halfway,
    Poor,
    Zero,
}

impl ResultTier {
    /// Band for `score` out of `total` questions.
    #[must_use]
    pub fn for_score(score: u32, total: u32) -> Self {
        match score {
            s if total > 0 && s >= total => ResultTier::Perfect,
            s if s >= 10 => ResultTier::Excellent,
            s if s >= 7 => ResultTier::Good,
            s if s >= 4 => ResultTier::Halfway,
            s if s >= 1 => ResultTier::Poor,
            _ => ResultTier::Zero,
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            ResultTier::Perfect => "Flawless! You carry the baton today. Don't get cocky, there's more tomorrow.",
            ResultTier::Excellent => "Almost perfect. Good things take more than a day.",
            ResultTier::Good => "Not bad, but the baton is slipping. Squeeze a little harder!",
            ResultTier::Halfway => "Halfway there. Time to read up before tomorrow.",
            ResultTier::Poor => "Slow going... a snail would overtake you. Keep moving!",
            ResultTier::Zero => "Lost at the start line. Try again tomorrow.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_score_thresholds() {
        assert_eq!(ResultTier::for_score(12, 12), ResultTier::Perfect);
        assert_eq!(ResultTier::for_score(11, 12), ResultTier::Excellent);
        assert_eq!(ResultTier::for_score(10, 12), ResultTier::Excellent);
        assert_eq!(ResultTier::for_score(7, 12), ResultTier::Good);
        assert_eq!(ResultTier::for_score(4, 12), ResultTier::Halfway);
        assert_eq!(ResultTier::for_score(1, 12), ResultTier::Poor);
        assert_eq!(ResultTier::for_score(0, 12), ResultTier::Zero);
    }

    #[test]
    fn zero_total_never_counts_as_perfect() {
        assert_eq!(ResultTier::for_score(0, 0), ResultTier::Zero);
    }
}
