pub mod config;
pub mod detector;
pub mod extractor;
pub mod fetcher;
pub mod google;
pub mod pipeline;
pub mod translator;
