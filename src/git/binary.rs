//! Extension-based binary file detection.
//!
//! Binary files are summarized with a fixed sentence and never sent to the
//! completion API, so the classifier only needs to be cheap and
//! predictable, not content-sniffing.

use std::path::Path;

const BINARY_EXTENSIONS: &[&str] = &[
    // images
    ".ai", ".bmp", ".eps", ".gif", ".ico", ".jng", ".jp2", ".jpg", ".jpeg", ".jpx",
    ".jxr", ".pdf", ".png", ".psb", ".psd", ".svgz", ".tif", ".tiff", ".wbmp",
    ".webp",
    // audio
    ".kar", ".m4a", ".mid", ".midi", ".mp3", ".ogg", ".ra",
    // video
    ".3gpp", ".3gp", ".as", ".asf", ".asx", ".fla", ".flv", ".m4v", ".mng", ".mov",
    ".mp4", ".mpeg", ".mpg", ".ogv", ".swc", ".swf", ".webm",
    // archives
    ".7z", ".gz", ".jar", ".rar", ".tar", ".zip",
    // fonts
    ".ttf", ".eot", ".otf", ".woff", ".woff2",
    // executables
    ".exe", ".pyc",
];

/// Whether `file_name`'s extension marks it as binary.
pub fn is_binary_file(file_name: &str) -> bool {
    let Some(extension) = Path::new(file_name).extension() else {
        return false;
    };
    let extension = format!(".{}", extension.to_string_lossy().to_lowercase());
    BINARY_EXTENSIONS.contains(&extension.as_str())
}
