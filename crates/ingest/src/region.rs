//! Regional ingestion endpoints.
//!
//! Every named region maps to a fixed base URL. The special `custom` region
//! reads the URL from [`IngestConfig::custom_region`](crate::IngestConfig::custom_region)
//! instead, and anything unrecognized falls back to [`BASELINE_REGION`].

/// Region used when the configuration names no region or an unknown one.
pub const BASELINE_REGION: &str = "usa";

/// Region name that selects the user-supplied endpoint.
pub const CUSTOM_REGION: &str = "custom";

/// OAuth scope requested for service-account credentials.
pub const INGESTION_SCOPE: &str = "https://www.googleapis.com/auth/malachite-ingestion";

/// Path appended to the base URL for batch UDM event creation.
pub const BATCH_CREATE_PATH: &str = "/v2/udmevents:batchCreate";

const REGION_URLS: &[(&str, &str)] = &[
    ("usa", "https://malachiteingestion-pa.googleapis.com"),
    ("europe", "https://europe-malachiteingestion-pa.googleapis.com"),
    ("uk", "https://europe-west2-malachiteingestion-pa.googleapis.com"),
    ("asia", "https://asia-southeast1-malachiteingestion-pa.googleapis.com"),
    (
        "australia",
        "https://australia-southeast1-malachiteingestion-pa.googleapis.com",
    ),
];

/// Looks up a named region in the static table.
pub fn region_url(region: &str) -> Option<&'static str> {
    REGION_URLS
        .iter()
        .find(|(name, _)| *name == region)
        .map(|(_, url)| *url)
}

/// All named regions, in table order.
pub fn known_regions() -> impl Iterator<Item = &'static str> {
    REGION_URLS.iter().map(|(name, _)| *name)
}

/// Resolves the base URL for a region selection.
///
/// ```rust
/// use ingest::resolve_base_url;
///
/// assert_eq!(
///     resolve_base_url(Some("custom"), Some("https://ingest.example.com/")),
///     "https://ingest.example.com"
/// );
/// assert_eq!(
///     resolve_base_url(Some("nowhere"), None),
///     resolve_base_url(None, None)
/// );
/// ```
pub fn resolve_base_url(region: Option<&str>, custom_url: Option<&str>) -> String {
    let region = region.map(str::trim).filter(|r| !r.is_empty());
    match region {
        Some(CUSTOM_REGION) => custom_url
            .unwrap_or_default()
            .trim()
            .trim_end_matches('/')
            .to_string(),
        Some(name) => region_url(name).unwrap_or_else(baseline_url).to_string(),
        None => baseline_url().to_string(),
    }
}

fn baseline_url() -> &'static str {
    // The baseline region is always present in the table.
    region_url(BASELINE_REGION).unwrap_or("https://malachiteingestion-pa.googleapis.com")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_regions_use_table_urls() {
        for region in known_regions() {
            let expected = region_url(region).unwrap();
            assert_eq!(resolve_base_url(Some(region), None), expected);
            // A custom URL is ignored unless the region is `custom`.
            assert_eq!(
                resolve_base_url(Some(region), Some("https://ignored.example")),
                expected
            );
        }
    }

    #[test]
    fn custom_region_uses_configured_url() {
        assert_eq!(
            resolve_base_url(Some("custom"), Some("  https://chronicle.internal:8443/ ")),
            "https://chronicle.internal:8443"
        );
        assert_eq!(resolve_base_url(Some("custom"), None), "");
    }

    #[test]
    fn unknown_or_missing_region_falls_back_to_baseline() {
        let baseline = region_url(BASELINE_REGION).unwrap();
        assert_eq!(resolve_base_url(Some("mars"), None), baseline);
        assert_eq!(resolve_base_url(Some(""), None), baseline);
        assert_eq!(resolve_base_url(None, Some("https://x.example")), baseline);
    }

    #[test]
    fn region_lookup_is_case_sensitive() {
        assert!(region_url("usa").is_some());
        assert!(region_url("USA").is_none());
    }
}
