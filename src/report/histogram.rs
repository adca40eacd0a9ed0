use crate::model::{PriceBucket, TransactionRecord};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Item counts per price range. Always holds all ten ranges, serialized in range order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Histogram {
    counts: [u64; PriceBucket::ALL.len()],
}

impl Histogram {
    pub fn get(&self, bucket: PriceBucket) -> u64 {
        self.counts[bucket.index()]
    }

    /// Sum over all ranges.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// `(bucket, count)` pairs in range order.
    pub fn iter(&self) -> impl Iterator<Item = (PriceBucket, u64)> + '_ {
        PriceBucket::ALL.iter().map(|b| (*b, self.get(*b)))
    }
}

impl Serialize for Histogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (bucket, count) in self.iter() {
            map.serialize_entry(&bucket, &count)?;
        }
        map.end()
    }
}

pub(crate) fn compute_histogram(records: &[TransactionRecord]) -> Histogram {
    let mut histogram = Histogram::default();
    for bucket in records.iter().filter_map(|r| PriceBucket::for_price(r.price())) {
        histogram.counts[bucket.index()] += 1;
    }
    histogram
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(prices: &[f64]) -> Vec<TransactionRecord> {
        prices
            .iter()
            .enumerate()
            .map(|(ix, price)| TransactionRecord::new(ix as i64, "c", *price, true, "2022-01-01"))
            .collect()
    }

    #[test]
    fn test_empty_has_every_key_in_order() {
        let json = serde_json::to_string(&compute_histogram(&[])).unwrap();
        assert_eq!(
            json,
            r#"{"range0_100":0,"range101_200":0,"range201_300":0,"range301_400":0,"range401_500":0,"range501_600":0,"range601_700":0,"range701_800":0,"range801_900":0,"range901_above":0}"#
        );
    }

    #[test]
    fn test_boundary_prices() {
        let histogram = compute_histogram(&priced(&[0.0, 100.0, 101.0, 900.0, 901.0, 5000.0]));
        assert_eq!(histogram.get(PriceBucket::Range0To100), 2);
        assert_eq!(histogram.get(PriceBucket::Range101To200), 1);
        assert_eq!(histogram.get(PriceBucket::Range801To900), 1);
        assert_eq!(histogram.get(PriceBucket::Range901AndAbove), 2);
        assert_eq!(histogram.total(), 6);
    }

    #[test]
    fn test_total_counts_only_non_negative_prices() {
        let histogram = compute_histogram(&priced(&[-3.0, 12.0, 450.25, 700.0]));
        assert_eq!(histogram.total(), 3);
        assert_eq!(histogram.get(PriceBucket::Range401To500), 1);
        assert_eq!(histogram.get(PriceBucket::Range601To700), 1);
    }
}
