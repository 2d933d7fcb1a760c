use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Characters that are not safe in the quoted ASCII `filename` parameter
    /// of a Content-Disposition header
    /// - Kept: "book 1.epub", "my-file_(v2).pdf"
    /// - Replaced: quotes, backslashes, control characters, anything non-ASCII
    pub static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._ ()\-]").unwrap();
}

/// Strip any directory part a client may have sent along with the file name
pub fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name).trim()
}

/// Lower-case extension without the dot, if the name has one
pub fn file_extension(name: &str) -> Option<String> {
    let name = base_name(name);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Content-Disposition value offering the original name to the browser.
///
/// Old e-reader browsers only read the ASCII `filename`; everything else
/// gets the exact name through `filename*`.
pub fn attachment_disposition(name: &str) -> String {
    let name = base_name(name);
    let ascii = UNSAFE_FILENAME_CHARS.replace_all(name, "_");
    let ascii = if ascii.trim_matches(['_', '.', ' ']).is_empty() {
        "download".into()
    } else {
        ascii
    };

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        ascii,
        urlencoding::encode(name)
    )
}
