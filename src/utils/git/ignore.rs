//! Gitignore-style path patterns, used for `exclude_files`.

use gix::{
    bstr::{BString, ByteSlice},
    glob::wildmatch,
};

// Bits of gix::ignore::search::pattern::Mode (the type itself is private)
const MODE_NO_SUB_DIR: u32 = 1 << 0; // no internal slash: match the basename
const MODE_MUST_MATCH_DIR: u32 = 1 << 2; // trailing slash: directories only
const MODE_NEGATIVE: u32 = 1 << 3; // leading `!`
const MODE_ABSOLUTE: u32 = 1 << 4; // leading `/`: rooted at the docs dir

/// Matches docs-relative paths against gitignore-style patterns.
///
/// A file is excluded when it, or any of its parent directories, is
/// matched by the pattern list (last match wins, `!` re-includes).
///
/// | Pattern          | Excludes                                 |
/// |------------------|------------------------------------------|
/// | `drafts/`        | everything below any `drafts` directory  |
/// | `/index.md`      | only the top-level index                 |
/// | `*.draft.md`     | any file with that suffix, at any depth  |
/// | `blog/2019/**`   | everything below `blog/2019`             |
#[derive(Debug, Clone, Default)]
pub struct ExcludeMatcher {
    patterns: Vec<(BString, u32)>,
}

impl ExcludeMatcher {
    /// Parse gitignore bytes into patterns
    pub fn new(source: &[u8]) -> Self {
        let patterns = gix::ignore::parse(source)
            .map(|(pattern, _, _)| (pattern.text, pattern.mode.bits()))
            .collect();
        Self { patterns }
    }

    /// Build from a list of patterns, one per entry.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Self {
        let joined = patterns
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(joined.as_bytes())
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check a file path (forward slashes, relative to the docs dir).
    ///
    /// Parent directories are checked first: an excluded directory
    /// excludes its content, as in git.
    pub fn is_excluded(&self, path: &str) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut end = 0;
        while let Some(pos) = path[end..].find('/') {
            end += pos;
            if self.matches(&path[..end], true) {
                return true;
            }
            end += 1;
        }
        self.matches(path, false)
    }

    /// Check a single path against the pattern list.
    fn matches(&self, path: &str, is_dir: bool) -> bool {
        let mut excluded = false;
        for (text, mode) in &self.patterns {
            // "drafts/" must not match a file named "drafts"
            if (mode & MODE_MUST_MATCH_DIR != 0) && !is_dir {
                continue;
            }

            let is_absolute = mode & MODE_ABSOLUTE != 0;
            let has_internal_slash = mode & MODE_NO_SUB_DIR == 0;

            let match_path = if !has_internal_slash && !is_absolute {
                path.rsplit_once('/').map_or(path, |(_, name)| name)
            } else {
                path
            };

            if wildmatch(
                text.as_bstr(),
                match_path.into(),
                wildmatch::Mode::NO_MATCH_SLASH_LITERAL,
            ) {
                excluded = mode & MODE_NEGATIVE == 0;
            }
        }
        excluded
    }
}
