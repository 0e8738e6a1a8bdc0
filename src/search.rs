use anyhow::Context as _;
use serde::Deserialize;

use crate::analysis;
use crate::cli::SearchArgs;
use crate::formats::IndexedDocument;

pub async fn run(args: SearchArgs) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let es_url = args.es_url.trim_end_matches('/');

    let body = build_search_body(
        &analysis::analyze(&args.query),
        args.title_weight,
        args.introduction_weight,
        args.content_weight,
        args.cluster_id,
    );

    let response = client
        .post(format!("{es_url}/{}/_search", args.index))
        .json(&body)
        .send()
        .await
        .context("POST _search")?;

    let status = response.status();
    let raw = response.text().await.context("read search response")?;
    if !status.is_success() {
        anyhow::bail!("search failed ({status}): {raw}");
    }
    let parsed: SearchResponse =
        serde_json::from_str(&raw).context("parse search response")?;

    for hit in parsed.hits.hits {
        println!("id: {}", hit.id);
        println!("link: {}", hit.source.page_link);
        println!("title: {}", hit.source.title);
        if let Some(cluster) = hit.source.cluster {
            println!("cluster_id: {}", cluster.id);
        }
        println!();
    }

    Ok(())
}

/// Weighted multi-field query over the normalized fields, optionally
/// restricted to one cluster.
fn build_search_body(
    query: &str,
    title_weight: f64,
    introduction_weight: f64,
    content_weight: f64,
    cluster_id: Option<i64>,
) -> serde_json::Value {
    let mut must = vec![serde_json::json!({
        "multi_match": {
            "query": query,
            "fields": [
                format!("analyzed_title^{title_weight}"),
                format!("analyzed_introduction^{introduction_weight}"),
                format!("analyzed_content^{content_weight}"),
            ],
        }
    })];
    if let Some(cluster_id) = cluster_id {
        must.push(serde_json::json!({ "term": { "cluster.id": cluster_id } }));
    }

    serde_json::json!({ "query": { "bool": { "must": must } } })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: IndexedDocument,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_weighted_multi_match() {
        let body = build_search_body("تهران", 2.0, 1.0, 0.5, None);
        let must = body["query"]["bool"]["must"]
            .as_array()
            .expect("must clause array");
        assert_eq!(must.len(), 1);
        let fields = must[0]["multi_match"]["fields"]
            .as_array()
            .expect("fields array");
        assert_eq!(fields[0], "analyzed_title^2");
        assert_eq!(fields[1], "analyzed_introduction^1");
        assert_eq!(fields[2], "analyzed_content^0.5");
        assert_eq!(must[0]["multi_match"]["query"], "تهران");
    }

    #[test]
    fn cluster_filter_adds_a_term_clause() {
        let body = build_search_body("query", 1.0, 1.0, 1.0, Some(3));
        let must = body["query"]["bool"]["must"]
            .as_array()
            .expect("must clause array");
        assert_eq!(must.len(), 2);
        assert_eq!(must[1]["term"]["cluster.id"], 3);
    }

    #[test]
    fn search_hits_deserialize_with_and_without_cluster() -> anyhow::Result<()> {
        let raw = r#"{
            "hits": { "hits": [
                { "_id": "1", "_source": {
                    "page_link": "https://fa.wikipedia.org/wiki/A",
                    "title": "A", "analyzed_title": "A",
                    "introduction": "", "analyzed_introduction": "",
                    "content": "", "analyzed_content": "",
                    "links": [],
                    "cluster": { "id": 2 }
                } },
                { "_id": "2", "_source": {
                    "page_link": "https://fa.wikipedia.org/wiki/B",
                    "title": "B", "analyzed_title": "B",
                    "introduction": "", "analyzed_introduction": "",
                    "content": "", "analyzed_content": "",
                    "links": []
                } }
            ] }
        }"#;

        let parsed: SearchResponse = serde_json::from_str(raw)?;
        assert_eq!(parsed.hits.hits.len(), 2);
        assert_eq!(
            parsed.hits.hits[0]
                .source
                .cluster
                .as_ref()
                .map(|cluster| cluster.id),
            Some(2)
        );
        assert!(parsed.hits.hits[1].source.cluster.is_none());
        Ok(())
    }
}
