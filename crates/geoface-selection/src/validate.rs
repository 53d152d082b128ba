//! Minimum-depth validation of selected paths.

/// Depth of a slash-joined path: number of non-empty segments minus one.
///
/// Returns `None` for a path with no segments.
pub fn path_depth(path: &str) -> Option<usize> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .count()
        .checked_sub(1)
}

/// Returns every path shallower than `min_level`, in input order.
///
/// Paths with no segments are always invalid.
pub fn validate<S: AsRef<str>>(paths: &[S], min_level: usize) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| path_depth(p).is_none_or(|depth| depth < min_level))
        .map(str::to_string)
        .collect()
}
