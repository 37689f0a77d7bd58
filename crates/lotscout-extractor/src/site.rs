//! Coarse source-site classification from the listing URL hostname.

/// Hostname tags for listing platforms we recognize, plus the coarse
/// class each maps to. Recognition affects only diagnostics and the
/// `sourceSite` label; extraction behavior is identical for all sites.
const KNOWN_PLATFORMS: [(&str, &str, &str); 8] = [
    ("autotrader", "autotrader", "marketplace"),
    ("cars.com", "cars_com", "marketplace"),
    ("cargurus", "cargurus", "marketplace"),
    ("carvana", "carvana", "marketplace"),
    ("carmax", "carmax", "marketplace"),
    ("craigslist", "craigslist", "classifieds"),
    ("facebook", "facebook_marketplace", "classifieds"),
    ("ebay", "ebay_motors", "marketplace"),
];

/// Extracts the hostname from a URL, stripping scheme, port, and path.
/// Falls back to the input string when it has no scheme.
#[must_use]
pub fn extract_host(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme)
        .split(':')
        .next()
        .unwrap_or(without_scheme)
        .to_ascii_lowercase()
}

/// Classifies a listing URL into `(source_site, platform_detected)`.
///
/// `source_site` is the coarse class (`marketplace`, `classifieds`,
/// `dealer_site`, `unknown`); `platform_detected` is the finer hostname
/// tag, `None` when the host is not a known platform.
#[must_use]
pub fn classify(url: &str) -> (String, Option<String>) {
    let host = extract_host(url);
    if host.is_empty() {
        return ("unknown".to_string(), None);
    }

    for (needle, tag, class) in KNOWN_PLATFORMS {
        if host_matches(&host, needle) {
            return ((*class).to_string(), Some((*tag).to_string()));
        }
    }

    // Unrecognized hosts are overwhelmingly individual dealer sites.
    ("dealer_site".to_string(), None)
}

/// True when `needle` is a whole dot-separated label of `host` (or a
/// dot-bounded suffix for needles that span labels, like `cars.com`).
/// Substring matching would tag unrelated hosts that merely embed a
/// platform name, e.g. `ebayparts-dealer.com`.
fn host_matches(host: &str, needle: &str) -> bool {
    if needle.contains('.') {
        return host
            .strip_suffix(needle)
            .is_some_and(|rest| rest.is_empty() || rest.ends_with('.'));
    }
    host.split('.').any(|label| label == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_host_from_full_url() {
        assert_eq!(
            extract_host("https://www.autotrader.com/cars-for-sale/123?x=1"),
            "www.autotrader.com"
        );
        assert_eq!(extract_host("http://example.com:8080/a"), "example.com");
        assert_eq!(extract_host("example.com/a/b"), "example.com");
    }

    #[test]
    fn classifies_known_marketplace() {
        let (site, platform) = classify("https://www.cargurus.com/Cars/link-123");
        assert_eq!(site, "marketplace");
        assert_eq!(platform.as_deref(), Some("cargurus"));
    }

    #[test]
    fn classifies_classifieds() {
        let (site, platform) = classify("https://austin.craigslist.org/cto/d/123.html");
        assert_eq!(site, "classifieds");
        assert_eq!(platform.as_deref(), Some("craigslist"));
    }

    #[test]
    fn embedded_platform_name_does_not_tag_the_host() {
        let (site, platform) = classify("https://www.ebayparts-dealer.com/inventory/7");
        assert_eq!(site, "dealer_site");
        assert_eq!(platform, None);

        let (site, platform) = classify("https://mycars.com/listing/9");
        assert_eq!(site, "dealer_site");
        assert_eq!(platform, None);
    }

    #[test]
    fn multi_label_platform_matches_only_on_a_dot_boundary() {
        let (site, platform) = classify("https://www.cars.com/vehicledetail/abc");
        assert_eq!(site, "marketplace");
        assert_eq!(platform.as_deref(), Some("cars_com"));
    }

    #[test]
    fn unknown_host_is_a_dealer_site() {
        let (site, platform) = classify("https://www.springfieldmotors.com/inventory/42");
        assert_eq!(site, "dealer_site");
        assert_eq!(platform, None);
    }
}
