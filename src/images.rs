// src/images.rs
//! Local copies of images referenced by page content.
//!
//! Downloads run before rendering; the renderer only sees the finished
//! [`ResolvedImages`] map through [`ImageResolver`].

use crate::config::ImageSettings;
use crate::constants::{
    DEFAULT_IMAGE_EXTENSION, IMAGE_DOWNLOAD_TIMEOUT, IMAGE_HASH_HEX_LEN, JPEG_QUALITY,
};
use crate::error::{AppError, ImageError};
use crate::formatting::ImageResolver;
use crate::model::ContentBlock;
use crate::output::{deliver, DeliveryTarget, OutputPlan};
use crate::types::NotionId;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::PathBuf;

/// The ability to store a remote image and hand back its public URL.
#[async_trait::async_trait]
pub trait ImageLocalizer: Send + Sync {
    async fn localize(&self, remote_url: &str, page_id: &NotionId) -> Result<String, AppError>;
}

/// Filename of the stored copy: `{page_id}_{hash}.{ext}`.
///
/// `hash` is the first 16 hex characters of the SHA-256 of the URL, so the
/// same URL always maps to the same file.
pub fn image_filename(remote_url: &str, page_id: &NotionId) -> String {
    let digest = hex::encode(Sha256::digest(remote_url.as_bytes()));
    format!(
        "{}_{}.{}",
        page_id.to_hyphenated(),
        &digest[..IMAGE_HASH_HEX_LEN],
        image_extension(remote_url)
    )
}

/// Lower-cased extension of the URL's last path segment, `jpg` when it has none.
pub fn image_extension(remote_url: &str) -> String {
    let path = match url::Url::parse(remote_url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => remote_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };

    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string())
}

/// Checks that `bytes` decode as an image and returns what should be stored.
///
/// JPEG is re-encoded at [`JPEG_QUALITY`] and PNG at best compression, keyed
/// on the URL's extension. Other formats are stored unchanged.
pub fn prepare_image(bytes: Vec<u8>, extension: &str) -> Result<Vec<u8>, String> {
    let decoded =
        image::load_from_memory(&bytes).map_err(|e| format!("failed to decode image: {}", e))?;

    let mut encoded = Vec::new();
    let written = match extension {
        "jpg" | "jpeg" => DynamicImage::ImageRgb8(decoded.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY)),
        "png" => decoded.write_with_encoder(PngEncoder::new_with_quality(
            &mut encoded,
            CompressionType::Best,
            FilterType::Adaptive,
        )),
        _ => return Ok(bytes),
    };
    written.map_err(|e| format!("failed to encode image: {}", e))?;
    Ok(encoded)
}

/// Stores images under the configured directory.
#[derive(Clone)]
pub struct ImageStore {
    client: reqwest::Client,
    directory: PathBuf,
    url_prefix: String,
}

impl ImageStore {
    pub fn new(settings: &ImageSettings) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(IMAGE_DOWNLOAD_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            directory: settings.directory.clone(),
            url_prefix: settings.url_prefix.clone(),
        })
    }

    fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.url_prefix, filename)
    }

    async fn download(&self, remote_url: &str) -> Result<Vec<u8>, AppError> {
        let download_error = |reason: String| AppError::ImageDownload {
            url: remote_url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(remote_url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(download_error(format!("status code {}", response.status())));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl ImageLocalizer for ImageStore {
    async fn localize(&self, remote_url: &str, page_id: &NotionId) -> Result<String, AppError> {
        let filename = image_filename(remote_url, page_id);
        let path = self.directory.join(&filename);

        if path.exists() {
            log::debug!("Reusing stored image {}", path.display());
            return Ok(self.public_url(&filename));
        }

        let downloaded = self.download(remote_url).await?;
        let bytes = prepare_image(downloaded, &image_extension(remote_url)).map_err(|reason| {
            AppError::ImageDownload {
                url: remote_url.to_string(),
                reason,
            }
        })?;
        let report = deliver(
            OutputPlan::new().with_operation(DeliveryTarget::WriteBytes { path, bytes }),
        );
        if !report.is_success() {
            return Err(AppError::DeliveryFailed {
                failures: report.failure_messages(),
            });
        }

        log::debug!("Stored image {} as {}", remote_url, filename);
        Ok(self.public_url(&filename))
    }
}

/// Outcome of localizing every image of one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedImages {
    outcomes: HashMap<String, Result<String, ImageError>>,
    /// URLs in first-seen order.
    order: Vec<String>,
}

impl ResolvedImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, remote_url: impl Into<String>, outcome: Result<String, ImageError>) {
        let remote_url = remote_url.into();
        if self
            .outcomes
            .insert(remote_url.clone(), outcome)
            .is_none()
        {
            self.order.push(remote_url);
        }
    }

    pub fn contains(&self, remote_url: &str) -> bool {
        self.outcomes.contains_key(remote_url)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Remote URLs that could not be stored, with the reason, in document order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ImageError)> {
        self.order
            .iter()
            .filter_map(|url| match self.outcomes.get(url) {
                Some(Err(e)) => Some((url.as_str(), e)),
                _ => None,
            })
    }
}

impl ImageResolver for ResolvedImages {
    fn resolve(&self, remote_url: &str) -> Result<String, ImageError> {
        match self.outcomes.get(remote_url) {
            Some(outcome) => outcome.clone(),
            None => Err(ImageError::NotLocalized(remote_url.to_string())),
        }
    }
}

/// Localizes each distinct image URL in `blocks`, in document order.
///
/// Failures are recorded, never returned; the page still renders with remote URLs.
pub async fn localize_images(
    localizer: &dyn ImageLocalizer,
    blocks: &[ContentBlock],
    page_id: &NotionId,
) -> ResolvedImages {
    let mut resolved = ResolvedImages::new();

    for url in blocks.iter().filter_map(ContentBlock::image_url) {
        if url.is_empty() || resolved.contains(url) {
            continue;
        }
        let outcome = localizer
            .localize(url, page_id)
            .await
            .map_err(|e| ImageError::DownloadFailed(e.to_string()));
        resolved.insert(url, outcome);
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageBlock, ImageSource};
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn page_id() -> NotionId {
        NotionId::parse("550e8400e29b41d4a716446655440000").unwrap()
    }

    fn image(url: &str) -> ContentBlock {
        ContentBlock::Image(ImageBlock {
            source: ImageSource::File {
                url: url.to_string(),
            },
        })
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("https://cdn.example/a/photo.PNG"), "png");
        assert_eq!(
            image_extension("https://s3.example/bucket/pic.jpeg?X-Amz-Signature=abc.def"),
            "jpeg"
        );
        assert_eq!(image_extension("https://cdn.example/a/photo"), "jpg");
        assert_eq!(image_extension("https://cdn.example/"), "jpg");
        assert_eq!(image_extension("not a url.gif?x=1"), "gif");
    }

    #[test]
    fn test_image_filename_is_stable() {
        let url = "https://cdn.example/cat.webp";
        let name = image_filename(url, &page_id());
        assert_eq!(name, image_filename(url, &page_id()));
        assert!(name.starts_with("550e8400-e29b-41d4-a716-446655440000_"));
        assert!(name.ends_with(".webp"));

        let hash = name
            .trim_start_matches("550e8400-e29b-41d4-a716-446655440000_")
            .trim_end_matches(".webp");
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(name, image_filename("https://cdn.example/dog.webp", &page_id()));
    }

    #[tokio::test]
    async fn test_existing_file_is_reused_without_download() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://unreachable.invalid/photo.png";
        let filename = image_filename(url, &page_id());
        std::fs::write(dir.path().join(&filename), b"png bytes").unwrap();

        let store = store_in(dir.path());

        let public = store.localize(url, &page_id()).await.unwrap();
        assert_eq!(public, format!("/images/{}", filename));
    }

    fn png_bytes() -> Vec<u8> {
        let pixels = image::RgbaImage::from_pixel(8, 8, image::Rgba([200, 40, 40, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(pixels)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    /// Answers every request with `200 OK` and the given body.
    async fn serve(content_type: &'static str, body: Vec<u8>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 4096];
                let _ = socket.read(&mut request).await;
                let head = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    content_type,
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    fn store_in(dir: &std::path::Path) -> ImageStore {
        ImageStore::new(&ImageSettings {
            directory: dir.to_path_buf(),
            url_prefix: "/images".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_prepare_image_rejects_non_images() {
        let err = prepare_image(b"<html>AccessDenied</html>".to_vec(), "png").unwrap_err();
        assert!(err.starts_with("failed to decode image"));
        assert!(prepare_image(Vec::new(), "gif").is_err());
    }

    #[test]
    fn test_prepare_image_reencodes_by_extension() {
        let png = png_bytes();

        let as_jpeg = prepare_image(png.clone(), "jpg").unwrap();
        assert_eq!(image::guess_format(&as_jpeg).unwrap(), image::ImageFormat::Jpeg);

        let as_png = prepare_image(png.clone(), "png").unwrap();
        assert_eq!(image::guess_format(&as_png).unwrap(), image::ImageFormat::Png);
        assert_eq!(image::load_from_memory(&as_png).unwrap().width(), 8);

        assert_eq!(prepare_image(png.clone(), "webp").unwrap(), png);
    }

    #[tokio::test]
    async fn test_non_image_response_is_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve("text/html", b"<html>AccessDenied</html>".to_vec()).await;
        let store = store_in(dir.path());
        let url = format!("{}/photo.png", base);

        for _ in 0..2 {
            let result = store.localize(&url, &page_id()).await;
            assert!(matches!(
                result,
                Err(AppError::ImageDownload { ref reason, .. }) if reason.contains("decode")
            ));
            assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        }
    }

    #[tokio::test]
    async fn test_downloaded_image_is_stored() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve("image/png", png_bytes()).await;
        let store = store_in(dir.path());
        let url = format!("{}/photo.png", base);

        let public = store.localize(&url, &page_id()).await.unwrap();
        let filename = image_filename(&url, &page_id());
        assert_eq!(public, format!("/images/{}", filename));

        let stored = std::fs::read(dir.path().join(&filename)).unwrap();
        assert_eq!(image::load_from_memory(&stored).unwrap().height(), 8);
    }

    struct FakeLocalizer {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ImageLocalizer for FakeLocalizer {
        async fn localize(&self, remote_url: &str, _page_id: &NotionId) -> Result<String, AppError> {
            self.calls.lock().unwrap().push(remote_url.to_string());
            if remote_url.contains("broken") {
                Err(AppError::ImageDownload {
                    url: remote_url.to_string(),
                    reason: "status code 404".to_string(),
                })
            } else {
                Ok(format!("/images/{}", remote_url.rsplit('/').next().unwrap()))
            }
        }
    }

    #[tokio::test]
    async fn test_localize_images_records_each_distinct_url() {
        let localizer = FakeLocalizer {
            calls: Mutex::new(Vec::new()),
        };
        let blocks = vec![
            image("https://cdn.example/a.png"),
            ContentBlock::Divider,
            image("https://cdn.example/broken.png"),
            image("https://cdn.example/a.png"),
            image(""),
        ];

        let resolved = localize_images(&localizer, &blocks, &page_id()).await;

        assert_eq!(localizer.calls.lock().unwrap().len(), 2);
        assert_eq!(resolved.len(), 2);
        assert_eq!(
            resolved.resolve("https://cdn.example/a.png").unwrap(),
            "/images/a.png"
        );
        assert!(resolved.resolve("https://cdn.example/broken.png").is_err());
        assert!(resolved.resolve("https://cdn.example/other.png").is_err());
        assert_eq!(resolved.failures().count(), 1);
    }

    #[tokio::test]
    async fn test_failures_follow_document_order() {
        let localizer = FakeLocalizer {
            calls: Mutex::new(Vec::new()),
        };
        let urls: Vec<String> = (0..12)
            .map(|i| format!("https://cdn.example/broken-{:02}.png", i))
            .collect();
        let mut blocks: Vec<ContentBlock> = urls.iter().map(|url| image(url)).collect();
        blocks.insert(3, image("https://cdn.example/fine.png"));

        let resolved = localize_images(&localizer, &blocks, &page_id()).await;

        let failed: Vec<&str> = resolved.failures().map(|(url, _)| url).collect();
        assert_eq!(failed, urls.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
