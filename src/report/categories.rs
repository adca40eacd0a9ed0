use crate::model::TransactionRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One slice of the category pie chart.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub item_count: u64,
}

/// Counts records per category. Only categories that occur are listed, sorted by name.
pub(crate) fn compute_category_distribution(records: &[TransactionRecord]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.category()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(category, item_count)| CategoryCount {
            category: category.to_string(),
            item_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_and_sorts() {
        let records = vec![
            TransactionRecord::new(1, "jewelery", 10.0, true, "2022-03-01"),
            TransactionRecord::new(2, "electronics", 20.0, false, "2022-03-02"),
            TransactionRecord::new(3, "jewelery", 30.0, false, "2022-03-03"),
        ];
        let distribution = compute_category_distribution(&records);
        assert_eq!(
            distribution,
            vec![
                CategoryCount {
                    category: "electronics".to_string(),
                    item_count: 1
                },
                CategoryCount {
                    category: "jewelery".to_string(),
                    item_count: 2
                },
            ]
        );
        let total: u64 = distribution.iter().map(|c| c.item_count).sum();
        assert_eq!(total, records.len() as u64);
    }

    #[test]
    fn test_empty() {
        assert!(compute_category_distribution(&[]).is_empty());
    }
}
