use super::detection_error::DetectionError;

/// Supplies validated image bytes (PNG or JPEG) for a URL.
pub trait ImageSource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DetectionError>;
}

/// Accepts only PNG and JPEG, judged by content rather than headers.
pub fn ensure_supported_format(bytes: &[u8]) -> Result<(), DetectionError> {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png | image::ImageFormat::Jpeg) => Ok(()),
        _ => Err(DetectionError::ImageTypeNotSupported),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    fn encoded(format: image::ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(8, 8, image::Rgb([0, 0, 255]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[rstest]
    #[case::png(image::ImageFormat::Png)]
    #[case::jpeg(image::ImageFormat::Jpeg)]
    fn test_accepts_png_and_jpeg(#[case] format: image::ImageFormat) {
        assert!(ensure_supported_format(&encoded(format)).is_ok());
    }

    #[test]
    fn test_rejects_bmp() {
        assert_eq!(
            ensure_supported_format(&encoded(image::ImageFormat::Bmp)),
            Err(DetectionError::ImageTypeNotSupported)
        );
    }

    #[test]
    fn test_rejects_plain_text() {
        assert_eq!(
            ensure_supported_format(b"Hello world!\n"),
            Err(DetectionError::ImageTypeNotSupported)
        );
    }
}
