use url::{Host, Url};

use crate::document::ExtractionError;

/// Company name from a canonical URL: the second-to-last label of the host.
///
/// `https://acme.example.com/x` yields `example`. Hosts are compared
/// lower-cased; IP addresses and single-label hosts have no company name.
pub fn extract_company_name(url: &str) -> Result<String, ExtractionError> {
    let fail = |reason: String| ExtractionError {
        field: "company_name",
        input: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| fail(e.to_string()))?;
    let domain = match parsed.host() {
        Some(Host::Domain(domain)) => domain,
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
            return Err(fail("host is an IP address".to_string()))
        }
        None => return Err(fail("URL has no host".to_string())),
    };

    let labels: Vec<&str> = domain.trim_end_matches('.').split('.').collect();
    if labels.len() < 2 || labels.iter().any(|label| label.is_empty()) {
        return Err(fail("host has no registrable domain".to_string()));
    }
    Ok(labels[labels.len() - 2].to_string())
}
