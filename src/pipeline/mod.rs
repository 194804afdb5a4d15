//! The batch driver: reverse image search, page scraping, translation.
//!
//! Stages run strictly one call at a time. Page-level scrape failures are
//! logged and skipped; search and translation failures end the run.

pub mod store;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::detector::{WebDetectionBackend, WebDetectionResult, WebEvidenceDetector};
use crate::extractor::{self, ExtractedPage};
use crate::translator::{RecordTranslator, Translate};

/// One line of the raw reverse image search results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RisRecord {
    pub image_path: String,
    pub urls: Vec<String>,
    pub image_urls: BTreeMap<String, Vec<String>>,
    pub visual_entities: BTreeMap<String, f64>,
}

impl RisRecord {
    pub fn new(image_path: &Path, result: WebDetectionResult) -> Self {
        Self {
            image_path: image_path.display().to_string(),
            urls: result.page_urls,
            image_urls: result.matching_image_urls,
            visual_entities: result.visual_entities,
        }
    }
}

/// A page to scrape and the candidate image URLs to caption on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeTarget {
    pub page_url: String,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub image_dir: PathBuf,
    pub results_dir: PathBuf,
    pub raw_ris_path: PathBuf,
    /// Read instead of running search when `collect_search` is off.
    pub evidence_urls_path: PathBuf,
    pub scraped_path: PathBuf,
    pub translated_path: PathBuf,
    pub max_results: u32,
    pub sleep: Duration,
    pub collect_search: bool,
    pub scrape: bool,
    pub apply_filtering: bool,
    pub show_progress: bool,
}

impl PipelineOptions {
    /// Defaults rooted at `dataset/`, the layout the dataset tooling expects.
    pub fn with_dataset_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let results_dir = root.join("retrieval_results");
        Self {
            image_dir: root.join("images"),
            raw_ris_path: results_dir.join("ris_results.json"),
            evidence_urls_path: results_dir.join("evidence_urls.json"),
            scraped_path: results_dir.join("trafilatura_data.json"),
            translated_path: results_dir.join("translated_data.json"),
            results_dir,
            max_results: 50,
            sleep: Duration::from_secs(3),
            collect_search: true,
            scrape: true,
            apply_filtering: false,
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub images: usize,
    pub pages: usize,
    pub scraped: usize,
    pub failed: usize,
    pub translated: usize,
}

pub struct Pipeline<B, T> {
    detector: WebEvidenceDetector<B>,
    translator: RecordTranslator<T>,
    options: PipelineOptions,
}

impl<B: WebDetectionBackend, T: Translate> Pipeline<B, T> {
    pub fn new(
        detector: WebEvidenceDetector<B>,
        translator: RecordTranslator<T>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            detector,
            translator,
            options,
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let opts = &self.options;
        tokio::fs::create_dir_all(&opts.results_dir)
            .await
            .with_context(|| format!("creating {}", opts.results_dir.display()))?;

        if opts.apply_filtering {
            warn!("temporal filtering needs the fact-check article dataset and is not applied");
        }

        let mut summary = RunSummary::default();

        let records = if opts.collect_search {
            self.collect_search(&mut summary).await?
        } else {
            info!(path = %opts.evidence_urls_path.display(), "loading saved search results");
            store::read_json::<Vec<RisRecord>>(&opts.evidence_urls_path)?
        };

        let pages = if opts.scrape {
            let targets = scrape_targets(&records);
            summary.pages = targets.len();
            let pages = self.scrape(&targets, &mut summary).await;
            store::write_json(&opts.scraped_path, &pages)?;
            pages
        } else {
            info!(path = %opts.scraped_path.display(), "loading saved scraped pages");
            store::read_json::<Vec<ExtractedPage>>(&opts.scraped_path)?
        };

        let translated = self.translate(&pages).await?;
        summary.translated = translated.len();
        store::write_json(&opts.translated_path, &translated)?;

        info!(
            images = summary.images,
            pages = summary.pages,
            scraped = summary.scraped,
            failed = summary.failed,
            translated = summary.translated,
            "run complete"
        );
        Ok(summary)
    }

    async fn collect_search(&self, summary: &mut RunSummary) -> Result<Vec<RisRecord>> {
        let opts = &self.options;
        let images = list_images(&opts.image_dir)?;
        summary.images = images.len();
        info!(images = images.len(), dir = %opts.image_dir.display(), "running reverse image search");

        let progress = self.progress(images.len());
        let mut records = Vec::with_capacity(images.len());
        for path in &images {
            let result = self
                .detector
                .detect(path, opts.max_results)
                .await
                .with_context(|| format!("web detection for {}", path.display()))?;
            records.push(RisRecord::new(path, result));
            progress.inc(1);
            tokio::time::sleep(opts.sleep).await;
        }
        progress.finish_and_clear();

        store::write_json(&opts.raw_ris_path, &records)?;
        Ok(records)
    }

    async fn scrape(&self, targets: &[ScrapeTarget], summary: &mut RunSummary) -> Vec<ExtractedPage> {
        let progress = self.progress(targets.len());
        let mut pages = Vec::with_capacity(targets.len());
        for target in targets {
            match extractor::extract(&target.page_url, &target.image_urls).await {
                Ok(page) => {
                    summary.scraped += 1;
                    pages.push(page);
                }
                Err(err) => {
                    summary.failed += 1;
                    warn!(url = %target.page_url, "skipping page: {}", err);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();
        pages
    }

    async fn translate(&self, pages: &[ExtractedPage]) -> Result<Vec<ExtractedPage>> {
        let progress = self.progress(pages.len());
        let mut translated = Vec::with_capacity(pages.len());
        for page in pages {
            let page = self
                .translator
                .translate_page(page)
                .await
                .with_context(|| format!("translating {}", page.url))?;
            translated.push(page);
            progress.inc(1);
        }
        progress.finish_and_clear();
        Ok(translated)
    }

    fn progress(&self, len: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}

/// Every file directly inside `dir`, in directory-listing order.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            images.push(entry.path());
        }
    }
    Ok(images)
}

/// Pairs every page URL of every record with that page's matching images.
pub fn scrape_targets(records: &[RisRecord]) -> Vec<ScrapeTarget> {
    records
        .iter()
        .flat_map(|record| {
            record.urls.iter().map(|url| ScrapeTarget {
                page_url: url.clone(),
                image_urls: record.image_urls.get(url).cloned().unwrap_or_default(),
            })
        })
        .collect()
}
