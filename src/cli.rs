use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Crawl(CrawlArgs),
    Index(IndexArgs),
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Seed page URLs, fetched as given.
    #[arg(required = true, value_name = "url")]
    pub urls: Vec<String>,

    /// Maximum out-degree of pages.
    #[arg(short = 'd', long, default_value_t = 10)]
    pub out_degree: usize,

    /// Maximum number of pages to crawl.
    #[arg(short = 'p', long, default_value_t = 1000)]
    pub num_pages: usize,

    /// Directory to store page records as JSON files.
    #[arg(short = 'j', long, default_value = "pages")]
    pub json_directory: String,

    /// Substring a resolved link must contain to stay in scope.
    #[arg(long, default_value = "fa.wikipedia.org/wiki")]
    pub scope: String,
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Directory to read page record JSON files from.
    #[arg(short = 'j', long, default_value = "pages")]
    pub json_directory: String,

    /// Delete the index instead of creating it.
    #[arg(short = 'd', long)]
    pub delete_index: bool,

    /// Document store base URL.
    #[arg(long, default_value = "http://localhost:9200")]
    pub es_url: String,

    /// Index name.
    #[arg(long, default_value = "wiki")]
    pub index: String,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Query text; normalized before matching.
    pub query: String,

    /// Relative weight of the title field.
    #[arg(short = 't', long, default_value_t = 1.0)]
    pub title_weight: f64,

    /// Relative weight of the introduction field.
    #[arg(short = 'i', long, default_value_t = 1.0)]
    pub introduction_weight: f64,

    /// Relative weight of the content field.
    #[arg(short = 'c', long, default_value_t = 1.0)]
    pub content_weight: f64,

    /// Restrict results to one cluster.
    #[arg(short = 'C', long)]
    pub cluster_id: Option<i64>,

    /// Document store base URL.
    #[arg(long, default_value = "http://localhost:9200")]
    pub es_url: String,

    /// Index name.
    #[arg(long, default_value = "wiki")]
    pub index: String,
}
