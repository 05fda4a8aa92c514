//! Output artifact locations written by the worker.

use thiserror::Error;

/// The fixed set of artifacts a successful job leaves under its output
/// prefix.
pub const OUTPUT_ARTIFACTS: [&str; 2] = ["haptic.json", "haptic.ahap"];

/// Errors from parsing a stored output location URI.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OutputLocationError {
    /// URI has no `scheme://` part
    #[error("output location has no scheme: {0}")]
    MissingScheme(String),
    /// URI has a scheme but no bucket segment
    #[error("output location has no bucket: {0}")]
    MissingBucket(String),
}

/// A parsed `scheme://bucket/prefix/` storage URI.
///
/// The scheme itself is not interpreted; workers have written both `gs://`
/// and `s3://` forms and the bucket plus key prefix is all that matters
/// for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    pub bucket: String,
    pub prefix: String,
}

impl OutputLocation {
    /// Parse a storage URI. The prefix may be empty.
    pub fn parse(uri: &str) -> Result<Self, OutputLocationError> {
        let rest = uri
            .split_once("://")
            .map(|(_, rest)| rest)
            .ok_or_else(|| OutputLocationError::MissingScheme(uri.to_string()))?;

        let (bucket, prefix) = match rest.split_once('/') {
            Some((bucket, prefix)) => (bucket, prefix),
            None => (rest, ""),
        };

        if bucket.is_empty() {
            return Err(OutputLocationError::MissingBucket(uri.to_string()));
        }

        Ok(Self {
            bucket: bucket.to_string(),
            prefix: prefix.to_string(),
        })
    }

    /// Object key for one artifact under this location's prefix.
    pub fn artifact_key(&self, filename: &str) -> String {
        if self.prefix.is_empty() {
            filename.to_string()
        } else if self.prefix.ends_with('/') {
            format!("{}{}", self.prefix, filename)
        } else {
            format!("{}/{}", self.prefix, filename)
        }
    }
}

/// Short mapping label for an artifact, derived from its file extension.
///
/// `haptic.json` maps to `json`, `haptic.ahap` to `ahap`. A filename with
/// no extension labels as itself.
pub fn artifact_label(filename: &str) -> &str {
    filename
        .split_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_trailing_slash() {
        let loc = OutputLocation::parse("gs://haptic-out/jobs/abc/").unwrap();
        assert_eq!(loc.bucket, "haptic-out");
        assert_eq!(loc.prefix, "jobs/abc/");
        assert_eq!(loc.artifact_key("haptic.json"), "jobs/abc/haptic.json");
    }

    #[test]
    fn test_parse_without_trailing_slash() {
        let loc = OutputLocation::parse("s3://haptic-out/jobs/abc").unwrap();
        assert_eq!(loc.prefix, "jobs/abc");
        assert_eq!(loc.artifact_key("haptic.ahap"), "jobs/abc/haptic.ahap");
    }

    #[test]
    fn test_parse_bucket_only() {
        let loc = OutputLocation::parse("gs://haptic-out").unwrap();
        assert_eq!(loc.bucket, "haptic-out");
        assert_eq!(loc.prefix, "");
        assert_eq!(loc.artifact_key("haptic.json"), "haptic.json");
    }

    #[test]
    fn test_parse_rejects_missing_scheme() {
        assert_eq!(
            OutputLocation::parse("haptic-out/jobs/abc/"),
            Err(OutputLocationError::MissingScheme(
                "haptic-out/jobs/abc/".into()
            ))
        );
    }

    #[test]
    fn test_parse_rejects_empty_bucket() {
        assert_eq!(
            OutputLocation::parse("gs:///jobs/abc/"),
            Err(OutputLocationError::MissingBucket("gs:///jobs/abc/".into()))
        );
    }

    #[test]
    fn test_artifact_labels() {
        assert_eq!(artifact_label("haptic.json"), "json");
        assert_eq!(artifact_label("haptic.ahap"), "ahap");
        assert_eq!(artifact_label("noext"), "noext");
    }

    #[test]
    fn test_artifact_set() {
        assert!(OUTPUT_ARTIFACTS.contains(&"haptic.json"));
        assert!(OUTPUT_ARTIFACTS.contains(&"haptic.ahap"));
    }
}
