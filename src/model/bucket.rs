use serde::{Deserialize, Serialize};

/// The fixed price ranges of the bar chart.
///
/// Lower bounds are inclusive for whole-dollar prices. A fractional price between two ranges
/// (e.g. `100.50`) belongs to the higher one, so every non-negative price lands in exactly one
/// bucket.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum PriceBucket {
    #[serde(rename = "range0_100")]
    Range0To100,
    #[serde(rename = "range101_200")]
    Range101To200,
    #[serde(rename = "range201_300")]
    Range201To300,
    #[serde(rename = "range301_400")]
    Range301To400,
    #[serde(rename = "range401_500")]
    Range401To500,
    #[serde(rename = "range501_600")]
    Range501To600,
    #[serde(rename = "range601_700")]
    Range601To700,
    #[serde(rename = "range701_800")]
    Range701To800,
    #[serde(rename = "range801_900")]
    Range801To900,
    #[serde(rename = "range901_above")]
    Range901AndAbove,
}

serde_plain::derive_display_from_serialize!(PriceBucket);
serde_plain::derive_fromstr_from_deserialize!(PriceBucket);

impl PriceBucket {
    /// Every bucket in chart order.
    pub const ALL: [PriceBucket; 10] = [
        PriceBucket::Range0To100,
        PriceBucket::Range101To200,
        PriceBucket::Range201To300,
        PriceBucket::Range301To400,
        PriceBucket::Range401To500,
        PriceBucket::Range501To600,
        PriceBucket::Range601To700,
        PriceBucket::Range701To800,
        PriceBucket::Range801To900,
        PriceBucket::Range901AndAbove,
    ];

    /// Finds the bucket for `price`. Negative and non-finite prices have no bucket.
    pub fn for_price(price: f64) -> Option<Self> {
        if !price.is_finite() || price < 0.0 {
            return None;
        }
        if price <= 100.0 {
            return Some(PriceBucket::Range0To100);
        }
        let ix = ((price / 100.0).ceil() as usize).saturating_sub(1);
        Some(Self::ALL[ix.min(Self::ALL.len() - 1)])
    }

    /// Position of the bucket in [`PriceBucket::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// The JSON key, e.g. `range101_200`.
    pub fn label(self) -> String {
        self.to_string()
    }
}
