use std::thread;

use crossbeam_channel::{Receiver, Sender};

use facespot_core::detection::domain::image_source::ImageSource;
use facespot_core::detection::infrastructure::http_image_fetcher::HttpImageFetcher;

/// One gallery image to download, tagged with the gallery it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub batch: u64,
    pub index: usize,
    pub url: String,
}

pub enum ImageMessage {
    Loaded { batch: u64, index: usize, bytes: Vec<u8> },
    Failed { batch: u64, index: usize, error: String },
}

/// Starts the download thread. It owns its HTTP client and serves jobs in
/// order until the job sender is dropped.
pub fn spawn(jobs: Receiver<ImageJob>, tx: Sender<ImageMessage>) {
    thread::spawn(move || match HttpImageFetcher::new() {
        Ok(fetcher) => run(&fetcher, &jobs, &tx),
        Err(e) => {
            log::error!("Cannot create image fetcher: {e}");
            for job in jobs.iter() {
                let _ = tx.send(ImageMessage::Failed {
                    batch: job.batch,
                    index: job.index,
                    error: e.to_string(),
                });
            }
        }
    });
}

fn run(source: &dyn ImageSource, jobs: &Receiver<ImageJob>, tx: &Sender<ImageMessage>) {
    for job in jobs.iter() {
        let message = match source.fetch(&job.url) {
            Ok(bytes) => ImageMessage::Loaded {
                batch: job.batch,
                index: job.index,
                bytes,
            },
            Err(e) => {
                log::warn!("Cannot load {}: {e}", job.url);
                ImageMessage::Failed {
                    batch: job.batch,
                    index: job.index,
                    error: e.to_string(),
                }
            }
        };
        if tx.send(message).is_err() {
            return;
        }
    }
}
