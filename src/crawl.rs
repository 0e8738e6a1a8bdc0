use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::canonical::CrawlScope;
use crate::cli::CrawlArgs;
use crate::formats::PageRecord;
use crate::page;

pub async fn run(args: CrawlArgs) -> anyhow::Result<()> {
    let pages_dir = PathBuf::from(&args.json_directory);
    crate::page_store::ensure_pages_dir_does_not_exist(&pages_dir)?;
    std::fs::create_dir_all(&pages_dir)
        .with_context(|| format!("create pages dir: {}", pages_dir.display()))?;

    let scope = CrawlScope::new(&args.scope);
    let client = build_client()?;

    let pages = crawl(&client, &scope, &args.urls, args.out_degree, args.num_pages).await?;

    for (position, record) in pages.iter().enumerate() {
        let path = crate::page_store::page_path(&pages_dir, position);
        crate::page_store::write_page(&path, record)?;
    }

    tracing::info!(pages = pages.len(), dir = %pages_dir.display(), "crawl finished");
    Ok(())
}

/// Breadth-first harvest from the seed URLs. Seeds are trusted and
/// fetched as given; discovered links are canonicalized by the parser
/// before they reach the frontier. One failed fetch or parse aborts the
/// whole run.
pub async fn crawl(
    client: &reqwest::Client,
    scope: &CrawlScope,
    seeds: &[String],
    out_degree: usize,
    max_pages: usize,
) -> anyhow::Result<Vec<PageRecord>> {
    let mut frontier = Frontier::new(seeds);
    let mut pages = Vec::new();

    while frontier.visited_count() < max_pages {
        let Some(page_url) = frontier.next_unvisited() else {
            break;
        };

        let url = Url::parse(&page_url).with_context(|| format!("parse page url: {page_url}"))?;
        let record = page::fetch_and_parse(client, &url, scope)
            .await
            .with_context(|| format!("crawl {page_url}"))?;

        frontier.mark_visited(page_url.clone());
        frontier.enqueue(record.links.iter().map(|link| link.url.clone()), out_degree);
        pages.push(record);

        tracing::info!(
            crawled = frontier.visited_count(),
            max = max_pages,
            url = %page_url,
            "page crawled"
        );
    }

    Ok(pages)
}

fn build_client() -> anyhow::Result<reqwest::Client> {
    // Certificate validation is deliberately off for this harvesting
    // client; some mirrors present broken chains.
    reqwest::Client::builder()
        .user_agent("wikindex/0.1")
        .timeout(Duration::from_secs(30))
        .danger_accept_invalid_certs(true)
        .build()
        .context("build crawl http client")
}

/// FIFO frontier over discovered URLs. The queue only grows; a cursor
/// advances past entries instead of removing them, and the visited set
/// keeps a URL from being fetched twice however often it is rediscovered.
#[derive(Debug)]
struct Frontier {
    queue: Vec<String>,
    cursor: usize,
    visited: HashSet<String>,
}

impl Frontier {
    fn new(seeds: &[String]) -> Self {
        Self {
            queue: seeds.to_vec(),
            cursor: 0,
            visited: HashSet::new(),
        }
    }

    /// Next queued URL that has not been fetched yet, in discovery order.
    fn next_unvisited(&mut self) -> Option<String> {
        while self.cursor < self.queue.len() {
            let candidate = &self.queue[self.cursor];
            self.cursor += 1;
            if !self.visited.contains(candidate) {
                return Some(candidate.clone());
            }
        }
        None
    }

    fn mark_visited(&mut self, url: String) {
        self.visited.insert(url);
    }

    /// Appends the first `out_degree` of a page's links, duplicates and
    /// all; de-duplication happens at pop time via the visited set.
    fn enqueue(&mut self, urls: impl IntoIterator<Item = String>, out_degree: usize) {
        self.queue.extend(urls.into_iter().take(out_degree));
    }

    fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|url| (*url).to_owned()).collect()
    }

    #[test]
    fn pops_in_fifo_order() {
        let mut frontier = Frontier::new(&owned(&["a", "b"]));
        frontier.enqueue(owned(&["c"]), 10);
        assert_eq!(frontier.next_unvisited().as_deref(), Some("a"));
        assert_eq!(frontier.next_unvisited().as_deref(), Some("b"));
        assert_eq!(frontier.next_unvisited().as_deref(), Some("c"));
        assert_eq!(frontier.next_unvisited(), None);
    }

    #[test]
    fn visited_urls_are_skipped_not_refetched() {
        let mut frontier = Frontier::new(&owned(&["a"]));
        let first = frontier.next_unvisited().expect("seed available");
        frontier.mark_visited(first);
        frontier.enqueue(owned(&["a", "b", "a"]), 10);
        assert_eq!(frontier.next_unvisited().as_deref(), Some("b"));
        assert_eq!(frontier.next_unvisited(), None);
        assert_eq!(frontier.visited_count(), 1);
    }

    #[test]
    fn enqueue_truncates_to_out_degree() {
        let mut frontier = Frontier::new(&[]);
        frontier.enqueue(owned(&["a", "b", "c", "d"]), 2);
        assert_eq!(frontier.next_unvisited().as_deref(), Some("a"));
        assert_eq!(frontier.next_unvisited().as_deref(), Some("b"));
        assert_eq!(frontier.next_unvisited(), None);
    }

    #[test]
    fn duplicate_queue_entries_survive_until_popped() {
        let mut frontier = Frontier::new(&owned(&["a", "a"]));
        assert_eq!(frontier.next_unvisited().as_deref(), Some("a"));
        // The first pop did not mark anything visited, so the duplicate
        // is still eligible.
        assert_eq!(frontier.next_unvisited().as_deref(), Some("a"));
        assert_eq!(frontier.next_unvisited(), None);
    }
}
