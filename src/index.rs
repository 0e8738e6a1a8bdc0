use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;

use crate::analysis;
use crate::cli::IndexArgs;
use crate::formats::{IndexedDocument, PageRecord};

const BULK_CHUNK_SIZE: usize = 50;
const HEALTH_POLL_ATTEMPTS: usize = 60;

pub async fn run(args: IndexArgs) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let es_url = args.es_url.trim_end_matches('/').to_owned();

    if args.delete_index {
        return delete_index(&client, &es_url, &args.index).await;
    }

    let records = crate::page_store::read_pages(Path::new(&args.json_directory))
        .context("load page records")?;
    if records.is_empty() {
        anyhow::bail!("no page records found in {}", args.json_directory);
    }

    create_index(&client, &es_url, &args.index).await?;
    configure_index(&client, &es_url, &args.index).await?;

    let documents: Vec<IndexedDocument> = records.into_iter().map(build_document).collect();
    let total = documents.len();
    bulk_insert(&client, &es_url, &args.index, &documents).await?;

    tracing::info!(documents = total, index = %args.index, "bulk insert finished");
    Ok(())
}

/// Pairs every text field with its normalized form; content blocks are
/// flattened into one space-joined string first.
pub fn build_document(record: PageRecord) -> IndexedDocument {
    let content = record.content.join(" ");
    IndexedDocument {
        analyzed_title: analysis::analyze(&record.title),
        analyzed_introduction: analysis::analyze(&record.introduction),
        analyzed_content: analysis::analyze(&content),
        page_link: record.page_link,
        title: record.title,
        introduction: record.introduction,
        content,
        links: record.links,
        cluster: None,
    }
}

async fn create_index(
    client: &reqwest::Client,
    es_url: &str,
    index: &str,
) -> anyhow::Result<()> {
    let body = serde_json::json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 0,
        }
    });

    let response = client
        .put(format!("{es_url}/{index}"))
        .json(&body)
        .send()
        .await
        .with_context(|| format!("PUT {es_url}/{index}"))?;
    expect_success(response, "create index").await?;

    Ok(())
}

/// Applies analysis settings and the document mapping. Settings can only
/// change on a closed index, so this closes, reconfigures, and reopens.
async fn configure_index(
    client: &reqwest::Client,
    es_url: &str,
    index: &str,
) -> anyhow::Result<()> {
    wait_for_green(client, es_url).await?;

    let response = client
        .post(format!("{es_url}/{index}/_close"))
        .send()
        .await
        .context("POST _close")?;
    expect_success(response, "close index").await?;

    let settings = serde_json::json!({
        "analysis": {
            "analyzer": {
                "custom_analyzer": { "tokenizer": "standard" },
            }
        }
    });
    let response = client
        .put(format!("{es_url}/{index}/_settings"))
        .json(&settings)
        .send()
        .await
        .context("PUT _settings")?;
    expect_success(response, "apply index settings").await?;

    let response = client
        .post(format!("{es_url}/{index}/_open"))
        .send()
        .await
        .context("POST _open")?;
    expect_success(response, "open index").await?;

    let response = client
        .put(format!("{es_url}/{index}/_mapping"))
        .json(&mapping_body())
        .send()
        .await
        .context("PUT _mapping")?;
    expect_success(response, "apply index mapping").await?;

    Ok(())
}

fn mapping_body() -> serde_json::Value {
    serde_json::json!({
        "properties": {
            "page_link": { "type": "text" },
            "title": { "type": "text" },
            "analyzed_title": { "type": "text" },
            "introduction": { "type": "text" },
            "analyzed_introduction": { "type": "text" },
            "content": { "type": "text" },
            "analyzed_content": { "type": "text" },
            "links": {
                "properties": {
                    "url": { "type": "text" },
                    "text": { "type": "text" },
                }
            },
            "cluster": {
                "properties": {
                    "id": { "type": "integer" },
                    "label": { "type": "text" },
                }
            },
        }
    })
}

async fn wait_for_green(client: &reqwest::Client, es_url: &str) -> anyhow::Result<()> {
    for _ in 0..HEALTH_POLL_ATTEMPTS {
        let response = client
            .get(format!("{es_url}/_cluster/health"))
            .send()
            .await
            .context("GET _cluster/health")?;
        let health = expect_success(response, "cluster health").await?;
        if health.get("status").and_then(|status| status.as_str()) == Some("green") {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    anyhow::bail!("cluster never reached green status");
}

async fn bulk_insert(
    client: &reqwest::Client,
    es_url: &str,
    index: &str,
    documents: &[IndexedDocument],
) -> anyhow::Result<()> {
    for chunk in documents.chunks(BULK_CHUNK_SIZE) {
        let body = bulk_body(index, chunk)?;
        let response = client
            .post(format!("{es_url}/_bulk"))
            .header(reqwest::header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await
            .context("POST _bulk")?;
        let result = expect_success(response, "bulk insert").await?;
        if result.get("errors").and_then(|errors| errors.as_bool()) == Some(true) {
            anyhow::bail!("bulk insert reported item errors");
        }
    }

    Ok(())
}

fn bulk_body(index: &str, documents: &[IndexedDocument]) -> anyhow::Result<String> {
    let mut body = String::new();
    for document in documents {
        let action = serde_json::json!({ "index": { "_index": index } });
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&serde_json::to_string(document).context("serialize document")?);
        body.push('\n');
    }
    Ok(body)
}

async fn delete_index(
    client: &reqwest::Client,
    es_url: &str,
    index: &str,
) -> anyhow::Result<()> {
    let response = client
        .delete(format!("{es_url}/{index}"))
        .send()
        .await
        .with_context(|| format!("DELETE {es_url}/{index}"))?;
    expect_success(response, "delete index").await?;

    tracing::info!(index = %index, "index deleted");
    Ok(())
}

async fn expect_success(
    response: reqwest::Response,
    action: &str,
) -> anyhow::Result<serde_json::Value> {
    let status = response.status();
    let raw = response
        .text()
        .await
        .with_context(|| format!("read response: {action}"))?;
    if !status.is_success() {
        anyhow::bail!("{action} failed ({status}): {raw}");
    }
    serde_json::from_str(&raw).with_context(|| format!("parse response: {action}"))
}
