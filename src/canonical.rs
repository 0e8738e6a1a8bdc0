use url::Url;

/// Link scope for one crawl run: a resolved link is in scope when its
/// absolute form contains the configured marker substring.
#[derive(Debug, Clone)]
pub struct CrawlScope {
    marker: String,
}

impl CrawlScope {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    /// Turns a raw href into its canonical absolute form, or `None` when
    /// the link is not a crawlable in-scope page reference.
    ///
    /// Any colon rejects the href outright: `mailto:`/`javascript:`
    /// schemes, namespaced titles like `Special:Random`, and
    /// scheme-qualified absolute links all drop here, so only relative
    /// references survive to be resolved against `base`.
    pub fn canonicalize(&self, href: &str, base: &Url) -> Option<Url> {
        if href.is_empty() || href.starts_with('#') || href.contains(':') {
            return None;
        }

        let resolved = base.join(href).ok()?;
        if !resolved.as_str().contains(&self.marker) {
            return None;
        }

        Some(strip_parameters(&resolved))
    }
}

fn strip_parameters(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_query(None);
    stripped.set_fragment(None);
    stripped
}
