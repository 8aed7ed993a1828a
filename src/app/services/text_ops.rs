use std::path::Path;

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Human-readable size: `0 B`, `512 B`, `1.5 KB`, `2.25 MB`.
///
/// Two decimals at most, trailing zeros dropped. GB is the largest unit.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", scaled);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Number of lines as the status bar counts them: newline-separated
/// segments, so an empty text is one line.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

/// Prefix each line with its number, starting at `start_line`.
pub fn numbered_lines(text: &str, start_line: usize) -> String {
    text.split('\n')
        .enumerate()
        .map(|(i, line)| format!("{}: {}", start_line + i, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replace tab characters with `width` spaces.
pub fn expand_tabs(line: &str, width: u32) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    line.replace('\t', &" ".repeat(width as usize))
}
