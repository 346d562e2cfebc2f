//! Output file name checks.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// True if `name` is a single plain path component: non-empty, not `.`/`..`,
/// no separators, NUL or control characters, at most 255 bytes.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= NAME_MAX
        && name != "."
        && name != ".."
        && !name
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '\0' || c.is_control())
}
