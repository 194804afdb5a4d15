use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use ris_evidence::{
    config::Config,
    detector::{VisionClient, WebEvidenceDetector},
    pipeline::{Pipeline, PipelineOptions},
    translator::{GoogleTranslateClient, RecordTranslator},
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "collect-evidence",
    about = "Collect and translate web evidence for images via reverse image search"
)]
struct Cli {
    /// Folder holding the images to search for
    #[arg(long, default_value = "dataset/images/")]
    image_path: PathBuf,

    /// Folder the result files live in (created if missing)
    #[arg(long, default_value = "dataset/retrieval_results/")]
    results_dir: PathBuf,

    /// JSON file receiving the raw reverse image search results
    #[arg(long, default_value = "dataset/retrieval_results/ris_results.json")]
    raw_ris_urls_path: PathBuf,

    /// Saved search results to scrape when --skip-search is set
    #[arg(long, default_value = "dataset/retrieval_results/ris_results.json")]
    evidence_urls: PathBuf,

    /// JSON file receiving the scraped, untranslated pages
    #[arg(long, default_value = "dataset/retrieval_results/trafilatura_data.json")]
    trafilatura_path: PathBuf,

    /// JSON file receiving the translated pages
    #[arg(long, default_value = "dataset/retrieval_results/translated_data.json")]
    json_path: PathBuf,

    /// Result candidates requested from web detection per image
    #[arg(long, default_value_t = 50)]
    max_results: u32,

    /// Seconds to wait between two web detection calls
    #[arg(long, default_value_t = 3)]
    sleep: u64,

    /// Reuse --evidence-urls instead of calling reverse image search
    #[arg(long)]
    skip_search: bool,

    /// Reuse --trafilatura-path instead of scraping pages
    #[arg(long)]
    skip_scrape: bool,

    /// Drop evidence published after the source fact-check article
    #[arg(long)]
    apply_filtering: bool,

    /// Keep chunks that already read as the target language instead of translating them
    #[arg(long)]
    language_skip: bool,

    /// Hide progress bars
    #[arg(long)]
    quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Cli {
    fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            image_dir: self.image_path.clone(),
            results_dir: self.results_dir.clone(),
            raw_ris_path: self.raw_ris_urls_path.clone(),
            evidence_urls_path: self.evidence_urls.clone(),
            scraped_path: self.trafilatura_path.clone(),
            translated_path: self.json_path.clone(),
            max_results: self.max_results,
            sleep: Duration::from_secs(self.sleep),
            collect_search: !self.skip_search,
            scrape: !self.skip_scrape,
            apply_filtering: self.apply_filtering,
            show_progress: !self.quiet,
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = Config::from_env()?;

    // Keys are only demanded by the stages that will actually call out
    let vision_key = if cli.skip_search {
        String::new()
    } else {
        config.vision_api_key()?.to_string()
    };
    let translate_key = config.translate_api_key()?.to_string();

    let detector =
        WebEvidenceDetector::new(VisionClient::new(config.vision_endpoint().clone(), vision_key));
    let translator = RecordTranslator::new(
        GoogleTranslateClient::new(config.translate_endpoint().clone(), translate_key),
        config.target_language(),
    )
    .with_language_skip(cli.language_skip);

    let summary = Pipeline::new(detector, translator, cli.pipeline_options())
        .run()
        .await?;

    info!(
        "done: {} images, {} pages ({} scraped, {} failed), {} translated",
        summary.images, summary.pages, summary.scraped, summary.failed, summary.translated
    );
    Ok(())
}
