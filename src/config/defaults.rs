//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

pub fn r#true() -> bool {
    true
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn docs_dir() -> PathBuf {
        "docs".into()
    }

    pub fn site_dir() -> PathBuf {
        "site".into()
    }
}

// ============================================================================
// [feed] Section Defaults
// ============================================================================

pub mod feed {
    use std::path::PathBuf;

    pub fn abstract_chars_count() -> i64 {
        150
    }

    pub fn feed_ttl() -> i64 {
        1440
    }

    pub fn length() -> i64 {
        20
    }

    pub fn output_feed_filepath() -> PathBuf {
        "feed.xml".into()
    }

    pub fn match_path() -> String {
        ".*".into()
    }

    pub mod date_from_meta {
        pub fn as_creation() -> String {
            "date".into()
        }

        pub fn as_update() -> String {
            "updated".into()
        }
    }
}
