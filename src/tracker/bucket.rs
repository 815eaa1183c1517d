use serde::{Serialize, Deserialize};

/// Accumulated seconds and invocation count for one timing bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketStat {
    /// Total wall-clock seconds recorded into this bucket since the last
    /// reset.
    pub seconds: f64,
    /// How many times a measurement was recorded into this bucket since the
    /// last reset.
    pub count: u64,
}

impl BucketStat {
    pub fn record(&mut self, seconds: f64) {
        self.seconds += seconds;
        self.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates_and_counts() {
        let mut stat = BucketStat::default();
        assert_eq!(stat.seconds, 0.0);
        assert_eq!(stat.count, 0);

        stat.record(1.5);
        stat.record(0.25);
        assert_eq!(stat.seconds, 1.75);
        assert_eq!(stat.count, 2);
    }
}
