//! Conversion of raw resource aggregations into topic metadata.

use chrono::{DateTime, Datelike, Utc};

use topic_types::{Mention, ResourceAggResponse, ResourceAggregation, YearCount};

/// Calendar year (UTC) of an epoch-millisecond bucket key.
///
/// Keys outside the representable range map to the epoch year.
pub fn bucket_year(key_millis: i64) -> i32 {
    DateTime::<Utc>::from_timestamp_millis(key_millis)
        .unwrap_or_default()
        .year()
}

/// Normalize an aggregation response.
///
/// Date buckets map one-to-one onto `(year, count)` pairs; buckets falling in
/// the same year are kept as separate entries.
pub fn convert_aggregation(aggs: &ResourceAggResponse) -> ResourceAggregation {
    let date_published = aggs
        .aggregations
        .date_published
        .buckets
        .iter()
        .map(|b| YearCount {
            year: bucket_year(b.key),
            count: b.doc_count,
        })
        .collect();

    let mentions = aggs
        .aggregations
        .mentions
        .buckets
        .iter()
        .map(|b| Mention {
            name: b.key.clone(),
            doc_count: b.doc_count,
        })
        .collect();

    ResourceAggregation {
        doc_count: aggs.total_hits(),
        top_authors: aggs.aggregations.top_authors.buckets.clone(),
        date_published,
        mentions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topic_types::{DateBucket, TermBucket};

    fn sample() -> ResourceAggResponse {
        let mut aggs = ResourceAggResponse::default();
        aggs.hits.total.value = 120;
        aggs.aggregations.top_authors.buckets =
            vec![TermBucket::new("p-2", 8), TermBucket::new("p-1", 3)];
        aggs.aggregations.date_published.buckets = vec![
            DateBucket {
                key: 946_684_800_000, // 2000-01-01
                key_as_string: Some("2000-01-01".to_string()),
                doc_count: 5,
            },
            DateBucket {
                key: 962_409_600_000, // 2000-07-01
                key_as_string: None,
                doc_count: 2,
            },
            DateBucket {
                key: 1_262_304_000_000, // 2010-01-01
                key_as_string: None,
                doc_count: 7,
            },
        ];
        aggs.aggregations.mentions.buckets =
            vec![TermBucket::new("geo-1", 11), TermBucket::new("topic-9", 4)];
        aggs
    }

    #[test]
    fn test_total_count_is_hit_total() {
        let meta = convert_aggregation(&sample());
        assert_eq!(meta.doc_count, 120);
    }

    #[test]
    fn test_total_not_required_to_match_histograms() {
        let meta = convert_aggregation(&sample());
        let histogram_sum: u64 = meta.date_published.iter().map(|y| y.count).sum();
        assert_ne!(meta.doc_count, histogram_sum);
    }

    #[test]
    fn test_date_buckets_are_not_merged() {
        let meta = convert_aggregation(&sample());
        assert_eq!(
            meta.date_published,
            vec![
                YearCount { year: 2000, count: 5 },
                YearCount { year: 2000, count: 2 },
                YearCount { year: 2010, count: 7 },
            ]
        );
    }

    #[test]
    fn test_mentions_preserve_order() {
        let meta = convert_aggregation(&sample());
        let names: Vec<_> = meta.mentions.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["geo-1", "topic-9"]);
        assert_eq!(meta.mentions[0].doc_count, 11);
    }

    #[test]
    fn test_top_authors_pass_through() {
        let raw = sample();
        let meta = convert_aggregation(&raw);
        assert_eq!(meta.top_authors, raw.aggregations.top_authors.buckets);
    }

    #[test]
    fn test_empty_aggregation() {
        let meta = convert_aggregation(&ResourceAggResponse::default());
        assert_eq!(meta, ResourceAggregation::default());
    }

    #[test]
    fn test_bucket_year() {
        assert_eq!(bucket_year(0), 1970);
        assert_eq!(bucket_year(-31_536_000_000), 1969);
        assert_eq!(bucket_year(i64::MAX), 1970);
    }
}
