//! Input and output file naming.
//!
//! A resized archive is named `<stem><suffix><ext>`: `comic.cbz` with the
//! suffix `.rs` becomes `comic.rs.cbz`, next to the input or inside the
//! configured output directory. Inputs that already carry `<suffix><ext>`
//! are refused so a second pass over a directory does not resize the
//! resized copies.

use std::path::{Path, PathBuf};

/// Input extensions accepted when the extension check is on.
pub const ARCHIVE_EXTENSIONS: &[&str] = &["cbz", "zip"];

/// True when `path` ends in `.cbz` or `.zip`, case-insensitively.
pub fn has_archive_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ARCHIVE_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
}

/// Prefix `suffix` with `.` unless it already starts with one.
pub fn normalize_suffix(suffix: &str) -> String {
    if suffix.starts_with('.') {
        suffix.to_string()
    } else {
        format!(".{suffix}")
    }
}

/// Split a file name into stem and extension (with its dot).
///
/// Leading dots belong to the stem, so `.cbz` has no extension.
///
/// - `"comic.cbz"` → `("comic", ".cbz")`
/// - `"comic.rs.cbz"` → `("comic.rs", ".cbz")`
/// - `"comic"` → `("comic", "")`
/// - `".cbz"` → `(".cbz", "")`
pub fn split_extension(file_name: &str) -> (&str, &str) {
    let leading = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[leading..].rfind('.') {
        Some(pos) => file_name.split_at(leading + pos),
        None => (file_name, ""),
    }
}

/// Compute where the resized copy of `input` goes.
///
/// Returns the reason as an error when `input` already looks like a resized
/// copy, or its file name cannot be handled.
pub fn output_path(
    input: &Path,
    suffix: &str,
    output_directory: Option<&Path>,
) -> Result<PathBuf, String> {
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| "file name is missing or not valid UTF-8".to_string())?;

    let (stem, ext) = split_extension(file_name);
    let resized_ext = format!("{}{}", normalize_suffix(suffix), ext);
    if file_name.ends_with(&resized_ext) {
        return Err(format!("already has the resized extension {resized_ext}"));
    }

    let resized_name = format!("{stem}{resized_ext}");
    Ok(match output_directory {
        Some(dir) => dir.join(resized_name),
        None => input.with_file_name(resized_name),
    })
}

/// Expand filename arguments containing `*` or `?` with `glob`.
///
/// Other arguments pass through untouched, so a missing file still reaches
/// the batch and gets reported there. Patterns without matches add nothing;
/// unreadable matches are skipped.
pub fn expand_patterns(args: &[String]) -> Result<Vec<PathBuf>, glob::PatternError> {
    let mut paths = Vec::new();
    for arg in args {
        if arg.contains(['*', '?']) {
            paths.extend(glob::glob(arg)?.filter_map(Result::ok));
        } else {
            paths.push(PathBuf::from(arg));
        }
    }
    Ok(paths)
}
