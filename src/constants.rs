// src/constants.rs
//! Domain constants that define the operational boundaries of the exporter.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Notion API version sent with every request.
pub const NOTION_API_VERSION: &str = "2022-06-28";

/// Base URL of the Notion REST API.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

/// Attempts made for a block-children fetch before the entry falls back
/// to placeholder content.
pub const RETRY_MAX_ATTEMPTS: u32 = 3;

pub const RETRY_INITIAL_DELAY: Duration = Duration::from_millis(500);

pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(4);

// ---------------------------------------------------------------------------
// Content derivation
// ---------------------------------------------------------------------------

/// Maximum characters (Unicode scalar values) in a derived blog description.
pub const DESCRIPTION_MAX_CHARS: usize = 70;

/// Appended to a derived description that was cut short.
pub const DESCRIPTION_ELLIPSIS: &str = "...";

/// Body written when an entry's content could not be fetched.
pub const PLACEHOLDER_BODY: &str =
    "This content was imported from Notion, but the content could not be retrieved.";

/// Characters that may not appear in an exported filename.
pub const FILENAME_INVALID_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Format of frontmatter dates and diary filename prefixes.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Estimated characters per block, used to pre-allocate output strings.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// Request timeout for a single image download.
pub const IMAGE_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Hex characters of the URL digest used in stored image filenames.
pub const IMAGE_HASH_HEX_LEN: usize = 16;

/// Extension used when the image URL path has none.
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// Quality used when re-encoding stored JPEG images.
pub const JPEG_QUALITY: u8 = 50;
