//! Result types for bulk index operations.

/// Result of indexing a single document within a bulk request.
///
/// Mirrors one entry of the bulk response `items` array.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkItemResult {
    /// Document identifier.
    pub id: String,
    /// HTTP status reported for this item.
    pub status: u16,
    /// Failure reason, if the item was rejected.
    pub error: Option<String>,
}

impl BulkItemResult {
    /// Whether the document was accepted by the index.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.error.is_none()
    }
}

/// Summary of a bulk request containing aggregate counts and per-item results.
///
/// Partial failures are reported here rather than as an error so callers can
/// keep going after some documents were rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkSummary {
    /// Number of documents submitted.
    pub total: usize,
    /// Number of documents indexed.
    pub succeeded: usize,
    /// Number of documents rejected.
    pub failed: usize,
    /// Individual results, in response order.
    pub items: Vec<BulkItemResult>,
}

impl BulkSummary {
    /// Build a summary for `total` submitted documents from the item results.
    ///
    /// Submitted documents with no matching item in the response count as failed.
    pub fn from_items(total: usize, items: Vec<BulkItemResult>) -> Self {
        let succeeded = items
            .iter()
            .filter(|item| item.is_success())
            .count()
            .min(total);
        Self {
            total,
            succeeded,
            failed: total.saturating_sub(succeeded),
            items,
        }
    }

    /// Iterate over the rejected items.
    pub fn failures(&self) -> impl Iterator<Item = &BulkItemResult> {
        self.items.iter().filter(|item| !item.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, status: u16, error: Option<&str>) -> BulkItemResult {
        BulkItemResult {
            id: id.to_string(),
            status,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_item_success() {
        assert!(item("a", 201, None).is_success());
        assert!(item("a", 200, None).is_success());
        assert!(!item("a", 400, Some("mapper_parsing_exception")).is_success());
        assert!(!item("a", 201, Some("odd")).is_success());
    }

    #[test]
    fn test_summary_counts() {
        let summary = BulkSummary::from_items(
            3,
            vec![
                item("a", 201, None),
                item("b", 400, Some("mapper_parsing_exception")),
                item("c", 200, None),
            ],
        );
        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures().next().map(|i| i.id.as_str()), Some("b"));
    }

    #[test]
    fn test_missing_items_count_as_failed() {
        let summary = BulkSummary::from_items(4, vec![item("a", 201, None)]);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 3);
    }

    #[test]
    fn test_succeeded_never_exceeds_total() {
        let summary =
            BulkSummary::from_items(1, vec![item("a", 201, None), item("a", 201, None)]);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 0);
    }
}
