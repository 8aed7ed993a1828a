//! File-name based classification: renderer kind, highlighting language and
//! a fallback mime type.

use crate::app::domain::document::DocumentKind;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "webp", "bmp", "ico"];
const WORD_EXTENSIONS: &[&str] = &["doc", "docx"];

/// Extension after the last dot, lower-cased.
///
/// A leading dot does not start an extension, so `.gitignore` and `Makefile`
/// both have none.
pub fn file_extension(name: &str) -> Option<String> {
    let idx = name.rfind('.')?;
    if idx == 0 || idx + 1 == name.len() {
        return None;
    }
    Some(name[idx + 1..].to_lowercase())
}

/// Decide which renderer applies. Anything unrecognised is treated as text.
pub fn classify_kind(name: &str) -> DocumentKind {
    match file_extension(name).as_deref() {
        Some("pdf") => DocumentKind::Pdf,
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => DocumentKind::Image,
        Some(ext) if WORD_EXTENSIONS.contains(&ext) => DocumentKind::Word,
        _ => DocumentKind::Text,
    }
}

/// Highlighting token for a file name, `plaintext` when unknown.
pub fn language_for(name: &str) -> &'static str {
    let Some(ext) = file_extension(name) else {
        return "plaintext";
    };
    match ext.as_str() {
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" => "python",
        "rb" => "ruby",
        "java" => "java",
        "c" => "c",
        "cpp" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "php" => "php",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "sass" => "sass",
        "less" => "less",
        "json" => "json",
        "xml" => "xml",
        "yaml" | "yml" => "yaml",
        "md" | "markdown" => "markdown",
        "sql" => "sql",
        "sh" | "bash" | "zsh" => "bash",
        "ps1" => "powershell",
        "dockerfile" => "dockerfile",
        "makefile" => "makefile",
        "toml" => "toml",
        "ini" | "conf" | "cfg" => "ini",
        _ => "plaintext",
    }
}

/// Mime type guessed from the extension, used when the host supplies none.
pub fn guess_mime(name: &str) -> &'static str {
    match file_extension(name).as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("ico") => "image/x-icon",
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("json") => "application/json",
        Some("html" | "htm") => "text/html",
        Some("md" | "markdown") => "text/markdown",
        _ => "text/plain",
    }
}
