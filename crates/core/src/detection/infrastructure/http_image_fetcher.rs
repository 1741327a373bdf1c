use crate::detection::domain::detection_error::DetectionError;
use crate::detection::domain::image_source::{ensure_supported_format, ImageSource};
use crate::shared::constants::IMAGE_FETCH_TIMEOUT;

/// Downloads the image a detection request points at.
pub struct HttpImageFetcher {
    client: reqwest::blocking::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(IMAGE_FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl ImageSource for HttpImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DetectionError> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                log::warn!("Cannot fetch image {url}: {e}");
                DetectionError::CantReadImage
            })?;
        let bytes = response.bytes().map_err(|e| {
            log::warn!("Cannot read image body {url}: {e}");
            DetectionError::CantReadImage
        })?;

        ensure_supported_format(&bytes)?;
        Ok(bytes.to_vec())
    }
}
