use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::formats::PageRecord;

pub fn ensure_pages_dir_does_not_exist(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        anyhow::bail!("pages output directory already exists: {}", dir.display());
    }
    Ok(())
}

pub fn page_path(dir: &Path, position: usize) -> PathBuf {
    dir.join(format!("{position}.json"))
}

pub fn write_page(path: &Path, record: &PageRecord) -> anyhow::Result<()> {
    if path.exists() {
        anyhow::bail!("page record already exists: {}", path.display());
    }

    let json = serde_json::to_string(record).context("serialize page record")?;
    std::fs::write(path, json)
        .with_context(|| format!("write page record: {}", path.display()))?;

    Ok(())
}

/// Reads every page record in the directory, in record-file order.
pub fn read_pages(dir: &Path) -> anyhow::Result<Vec<PageRecord>> {
    let mut paths = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read pages dir: {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read pages dir entry: {}", dir.display()))?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort_by_key(|path| record_position(path));

    let mut records = Vec::new();
    for path in paths {
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("read page record: {}", path.display()))?;
        let record = serde_json::from_str(&json)
            .with_context(|| format!("parse page record: {}", path.display()))?;
        records.push(record);
    }

    Ok(records)
}

fn record_position(path: &Path) -> (Option<usize>, PathBuf) {
    let position = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse().ok());
    (position, path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::formats::PageLink;

    fn record(page_link: &str) -> PageRecord {
        PageRecord {
            page_link: page_link.to_owned(),
            title: "Title".to_owned(),
            introduction: "Intro".to_owned(),
            content: vec!["Body".to_owned()],
            links: vec![PageLink {
                url: "https://fa.wikipedia.org/wiki/Other".to_owned(),
                text: String::new(),
            }],
        }
    }

    #[test]
    fn records_round_trip_in_numeric_order() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        for position in 0..12 {
            let path = page_path(temp.path(), position);
            write_page(&path, &record(&format!("page-{position}")))?;
        }

        let records = read_pages(temp.path())?;
        let links: Vec<&str> = records.iter().map(|r| r.page_link.as_str()).collect();
        // Lexicographic order would put 10 and 11 before 2.
        assert_eq!(links[1], "page-1");
        assert_eq!(links[2], "page-2");
        assert_eq!(links[10], "page-10");
        assert_eq!(records.len(), 12);
        Ok(())
    }

    #[test]
    fn refuses_to_overwrite_a_record() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = page_path(temp.path(), 0);
        write_page(&path, &record("page-0"))?;
        assert!(write_page(&path, &record("page-0")).is_err());
        Ok(())
    }

    #[test]
    fn refuses_existing_output_dir() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        assert!(ensure_pages_dir_does_not_exist(temp.path()).is_err());
        assert!(ensure_pages_dir_does_not_exist(&temp.path().join("fresh")).is_ok());
        Ok(())
    }
}
