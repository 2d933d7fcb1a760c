// =============================================================================
// SESSION DEFAULTS
// =============================================================================

/// Unambiguous symbols only: no 0/O, 1/I, B/8, Q
pub const DEFAULT_CODE_ALPHABET: &str = "23456789ACDEFGHJKLMNPRSTUVWXYZ";

pub const DEFAULT_CODE_LENGTH: usize = 4;

/// One hour
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

// =============================================================================
// UPLOAD DEFAULTS
// =============================================================================

/// 800 MiB
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 800 * 1024 * 1024;

/// Extra body allowance on top of the file ceiling for multipart framing
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] =
    &["epub", "mobi", "pdf", "cbz", "cbr", "html", "txt"];

pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "application/epub+zip",
    "application/x-mobipocket-ebook",
    "application/pdf",
    "application/vnd.comicbook+zip",
    "application/vnd.comicbook-rar",
    "text/html",
    "text/plain",
    "application/zip",
    "application/x-rar-compressed",
];
