#![forbid(unsafe_code)]

/// A path reduced to lowercase segments with `.` and `..` resolved,
/// without touching the filesystem.
///
/// Both `/` and `\` separate segments so that paths reported by a snapshot
/// from any platform compare the same way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedPath {
    rooted: bool,
    segments: Vec<String>,
}

impl NormalizedPath {
    pub fn new(path: &str) -> Self {
        let rooted = path.starts_with(['/', '\\']);
        let mut segments: Vec<String> = Vec::new();
        for segment in path.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => match segments.last() {
                    Some(last) if last != ".." => {
                        segments.pop();
                    }
                    // `..` above the root stays at the root.
                    _ if rooted => {}
                    _ => segments.push("..".into()),
                },
                segment => segments.push(segment.to_lowercase()),
            }
        }
        Self { rooted, segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether this path lies in `dir`: every segment of `dir` matches the
    /// leading segments of this path. An empty directory contains nothing.
    pub fn is_in(&self, dir: &NormalizedPath) -> bool {
        !dir.is_empty()
            && self.rooted == dir.rooted
            && self.segments.len() >= dir.segments.len()
            && self
                .segments
                .iter()
                .zip(&dir.segments)
                .all(|(segment, dir_segment)| segment == dir_segment)
    }
}

/// Final component of a `/`- or `\`-separated path.
pub fn base_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(slash) => &path[slash + 1..],
        None => path,
    }
}

/// Everything before the final separator, or `None` for a bare filename.
pub fn parent_dir(path: &str) -> Option<&str> {
    path.rfind(['/', '\\']).map(|slash| &path[..slash])
}
