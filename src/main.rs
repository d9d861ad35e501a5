mod emit;
mod error;
mod model;
mod output;
mod parser;
mod runner;
mod sitemap;
mod source;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use output::FsWriter;
use source::{ArticleSource, HttpSource};

#[derive(Parser)]
#[command(name = "scriptable_dts", about = "Generate TypeScript declarations from the Scriptable docs")]
struct Cli {
    /// Documentation host to scrape
    #[arg(long, global = true, env = "SCRIPTABLE_DOCS_URL", default_value = sitemap::DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the article URLs found in the sitemap
    List,
    /// Fetch every article and write one declaration file per article
    Scrape {
        /// Directory for the generated .d.ts files
        #[arg(short, long)]
        output: PathBuf,
        /// Max articles to fetch (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Articles fetched at the same time
        #[arg(short, long, default_value_t = runner::CONCURRENCY)]
        concurrency: usize,
        /// Write a JSON run summary to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Convert HTML pages saved on disk
    Convert {
        /// Directory for the generated .d.ts files
        #[arg(short, long)]
        output: PathBuf,
        /// Write a JSON run summary to this file
        #[arg(long)]
        report: Option<PathBuf>,
        /// HTML files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let (summary, report) = match cli.command {
        Commands::List => {
            let source = HttpSource::new(&cli.base_url)?;
            let urls = source.fetch_article_urls().await?;
            for url in &urls {
                println!("{url}");
            }
            println!("\n{} articles", urls.len());
            return Ok(());
        }
        Commands::Scrape { output, limit, concurrency, report } => {
            let source = Arc::new(HttpSource::new(&cli.base_url)?);
            let mut urls = source.fetch_article_urls().await?;
            if let Some(n) = limit {
                urls.truncate(n);
            }
            if urls.is_empty() {
                println!("No articles found in the sitemap of {}.", cli.base_url);
                return Ok(());
            }
            println!("Converting {} articles into {}...", urls.len(), output.display());
            let summary = runner::run_articles(source, Arc::new(FsWriter), &output, urls, concurrency).await?;
            (summary, report)
        }
        Commands::Convert { output, report, files } => {
            println!("Converting {} files into {}...", files.len(), output.display());
            let summary = runner::convert_files(Arc::new(FsWriter), &output, &files).await?;
            (summary, report)
        }
    };

    summary.print();
    if let Some(path) = report {
        runner::write_report(&path, &summary)?;
        println!("Report written to {}", path.display());
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    Ok(())
}
