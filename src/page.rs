use anyhow::Context as _;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::canonical::CrawlScope;
use crate::formats::{PageLink, PageRecord};

pub async fn fetch_and_parse(
    client: &reqwest::Client,
    url: &Url,
    scope: &CrawlScope,
) -> anyhow::Result<PageRecord> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .with_context(|| format!("GET {url}"))?
        .error_for_status()
        .with_context(|| format!("GET {url}"))?;

    let html = response
        .text()
        .await
        .with_context(|| format!("read response body: {url}"))?;

    parse_page(url, &html, scope)
}

pub fn parse_page(url: &Url, html: &str, scope: &CrawlScope) -> anyhow::Result<PageRecord> {
    let document = Html::parse_document(html);

    let title = select_one(&document, "#firstHeading")?
        .map(element_text)
        .ok_or_else(|| anyhow::anyhow!("page has no title heading: {url}"))?;

    let container = select_one(&document, "#mw-content-text")?
        .ok_or_else(|| anyhow::anyhow!("page has no content container: {url}"))?;

    let mut introduction = String::new();
    let mut content = Vec::new();
    for block in worthy_blocks(container) {
        let text = element_text(block);
        if text.is_empty() {
            continue;
        }
        if introduction.is_empty() {
            introduction = text;
        } else {
            content.push(text);
        }
    }

    if introduction.is_empty() {
        tracing::warn!(url = %url, "no introduction found");
    }

    let anchor_selector = selector("a")?;
    let mut links = Vec::new();
    for anchor in document.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(canonical) = scope.canonicalize(href, url) else {
            continue;
        };
        links.push(PageLink {
            url: canonical.into(),
            text: element_text(anchor),
        });
    }

    Ok(PageRecord {
        page_link: url.to_string(),
        title,
        introduction,
        content,
        links,
    })
}

/// Direct-child paragraph and quotation elements of the content
/// container, in document order. Nested ones do not count.
fn worthy_blocks(container: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|element| matches!(element.value().name(), "p" | "blockquote"))
        .collect()
}

/// Trimmed text of an element, skipping script subtrees.
fn element_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    collect_text(element, &mut text);
    text.trim().to_owned()
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if child_element.value().name() != "script" {
                collect_text(child_element, out);
            }
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
        }
    }
}

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|err| anyhow::anyhow!("parse selector `{css}`: {err}"))
}

fn select_one<'a>(document: &'a Html, css: &str) -> anyhow::Result<Option<ElementRef<'a>>> {
    Ok(document.select(&selector(css)?).next())
}
