//! Version-string classification
//!
//! Deliberately coarse: the major version is the first decimal digit found in
//! the string, read as a single-digit value. This is not a semver parser —
//! API documents in the wild carry versions like "v2", "2.3.1-beta", or
//! "release 3", and the breaking-change heuristic only needs the leading
//! major digit.

/// Extract the major version from a version string.
///
/// Scans left to right for the first ASCII digit and returns its value.
/// Returns 0 when the string is empty, whitespace, or digit-free.
pub fn major_version(version: &str) -> u32 {
    version
        .chars()
        .find(|c| c.is_ascii_digit())
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0)
}

/// Whether moving from `previous` to `current` is a breaking major bump.
///
/// True only when both majors are known (non-zero) and the current one is
/// greater. An unknown major on either side never flags a break.
pub fn is_breaking(previous: u32, current: u32) -> bool {
    previous != 0 && current != 0 && current > previous
}
