//! Bidirectional transform between structured paths and flat identifiers.
//!
//! A flat identifier joins path segments with `:` and replaces every run of
//! whitespace inside a *folder* segment with `_`. The leaf segment is kept
//! verbatim. Decoding turns every `_` of a folder segment back into a space,
//! so a folder name that really contained `_` does not survive a round trip.
//! That loss is accepted: identifiers already stored with the recognition
//! service use exactly this scheme.

use std::fmt;

use serde::{Deserialize, Serialize};

use geoface_core::error::AppError;
use geoface_core::result::AppResult;

/// Separator between segments of a flat identifier.
pub const SEGMENT_SEPARATOR: char = ':';

/// Replacement for whitespace runs inside folder segments.
pub const SPACE_REPLACEMENT: char = '_';

/// Label returned when no readable name can be extracted.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// An ordered, non-empty list of path segments. The last segment is the leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredPath {
    segments: Vec<String>,
}

impl StructuredPath {
    /// Creates a path, rejecting an empty segment list or any empty segment.
    pub fn new<I, S>(segments: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(AppError::validation("A path needs at least one segment"));
        }
        if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
            return Err(AppError::validation(format!("Path segment {pos} is empty")));
        }
        Ok(Self { segments })
    }

    /// Parses a slash-joined display path such as `PNG/Central/file.jpg`.
    pub fn from_display(path: &str) -> AppResult<Self> {
        Self::new(path.split('/'))
    }

    /// Folder segments (everything but the leaf).
    pub fn folders(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The leaf (file) segment.
    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// All segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for StructuredPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Stateless encoder/decoder for flat identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathCodec;

impl PathCodec {
    /// Encodes a structured path into a flat identifier.
    pub fn encode(path: &StructuredPath) -> String {
        let mut out = Self::encode_folder_prefix(path.folders());
        if !out.is_empty() {
            out.push(SEGMENT_SEPARATOR);
        }
        out.push_str(path.leaf());
        out
    }

    /// Encodes folder segments only. Every segment is treated as a folder.
    pub fn encode_folder_prefix<S: AsRef<str>>(folders: &[S]) -> String {
        folders
            .iter()
            .map(|s| encode_folder_segment(s.as_ref()))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Decodes a flat identifier.
    ///
    /// Returns `None` for empty or whitespace-only input and for identifiers
    /// with an empty segment (e.g. `"A::f.jpg"`).
    pub fn decode(id: &str) -> Option<StructuredPath> {
        if id.trim().is_empty() {
            return None;
        }
        let raw: Vec<&str> = id.split(SEGMENT_SEPARATOR).collect();
        if raw.iter().any(|s| s.is_empty()) {
            return None;
        }
        let last = raw.len() - 1;
        let segments = raw
            .iter()
            .enumerate()
            .map(|(i, s)| {
                if i == last {
                    (*s).to_string()
                } else {
                    decode_folder_segment(s)
                }
            })
            .collect::<Vec<_>>();
        StructuredPath::new(segments).ok()
    }

    /// Splits an identifier into its still-encoded folder segments and leaf.
    pub fn split_encoded(id: &str) -> Option<(Vec<&str>, &str)> {
        if id.trim().is_empty() {
            return None;
        }
        let mut raw: Vec<&str> = id.split(SEGMENT_SEPARATOR).collect();
        if raw.iter().any(|s| s.is_empty()) {
            return None;
        }
        let leaf = raw.pop()?;
        Some((raw, leaf))
    }

    /// Best-effort human label for the leaf of `id`.
    ///
    /// The extension is stripped and the name split on `_`. A leading
    /// all-digit token is an external record id and is dropped when at least
    /// three tokens are present.
    pub fn extract_leaf_display_name(id: &str) -> String {
        let leaf = id.rsplit(SEGMENT_SEPARATOR).next().unwrap_or("").trim();
        if leaf.is_empty() {
            return UNKNOWN_LABEL.to_string();
        }

        let stem = match leaf.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => leaf,
        };

        let tokens: Vec<&str> = stem.split(SPACE_REPLACEMENT).filter(|t| !t.is_empty()).collect();
        let tokens = match tokens.split_first() {
            Some((first, rest))
                if tokens.len() >= 3 && first.chars().all(|c| c.is_ascii_digit()) =>
            {
                rest
            }
            _ => &tokens[..],
        };

        if tokens.is_empty() {
            UNKNOWN_LABEL.to_string()
        } else {
            tokens.join(" ")
        }
    }

    /// Decoded folder segments of `id`, joined with `/`. Empty when `id` has
    /// no folders or cannot be decoded.
    pub fn extract_folder_prefix(id: &str) -> String {
        Self::decode(id)
            .map(|p| p.folders().join("/"))
            .unwrap_or_default()
    }

    /// Whether `id` is non-empty and uses only `[A-Za-z0-9_.:%-]`.
    pub fn is_valid_flat_identifier(id: &str) -> bool {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '%' | '-'))
    }
}

fn encode_folder_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut in_space = false;
    for c in segment.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(SPACE_REPLACEMENT);
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Decodes a single folder segment (`_` → space).
pub fn decode_folder_segment(segment: &str) -> String {
    segment.replace(SPACE_REPLACEMENT, " ")
}
