//! Read-only work catalog.
//!
//! Records are loaded from a JSON array. Only the fields the players consume
//! are modelled; anything else in a record is ignored.

#[cfg(test)]
mod tests;

use std::{collections::HashSet, fs, path::Path};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Result, ShowreelError, services::video::PreviewSegment};

const SOURCE_ID_PATTERN: &str = r"^[A-Za-z0-9_-]{11}$";

/// Opt-in for a looping background video in the work modal hero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetailBackground {
    /// Offset the background starts and loops back to, in seconds.
    #[serde(rename = "startOffsetSeconds", default)]
    pub start_offset_seconds: f64,
}

/// One work in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRecord {
    /// Unique identifier used in links
    pub slug: String,

    /// Display title
    pub title: String,

    /// Release year
    #[serde(default)]
    pub year: String,

    /// Distribution format
    #[serde(default)]
    pub format: String,

    /// Role on the production
    #[serde(default)]
    pub role: String,

    /// Still shown in the modal hero until the preview plays
    #[serde(default)]
    pub hero_still_url: String,

    /// Embed source id; empty means the work has no video
    #[serde(rename = "youtubeId", default)]
    pub youtube_id: Option<String>,

    /// Preview segment start, in seconds
    #[serde(rename = "previewStartTime", default)]
    pub preview_start_time: Option<f64>,

    /// Preview segment end, in seconds
    #[serde(rename = "previewEndTime", default)]
    pub preview_end_time: Option<f64>,

    /// Loop the preview instead of pausing at its end; absent means loop
    #[serde(rename = "loopPreview", default)]
    pub loop_preview: Option<bool>,

    /// Looping modal background, if the work has one
    #[serde(rename = "detailBackground", default)]
    pub detail_background: Option<DetailBackground>,

    /// Tags shown on the card
    #[serde(default)]
    pub tags: Vec<String>,
}

impl WorkRecord {
    /// Embed source id, if the work has a video.
    pub fn source_id(&self) -> Option<&str> {
        self.youtube_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Preview segment, when the work has a video and both preview times.
    pub fn preview_segment(&self) -> Option<PreviewSegment> {
        let source_id = self.source_id()?;
        let start = self.preview_start_time?;
        let end = self.preview_end_time?;

        Some(PreviewSegment::new(
            source_id,
            start,
            end,
            self.loop_preview.unwrap_or(true),
        ))
    }

    /// Source id and start offset of the modal background, when the work has one.
    pub fn detail_background(&self) -> Option<(&str, f64)> {
        let background = self.detail_background?;
        Some((self.source_id()?, background.start_offset_seconds))
    }
}

/// The set of works shown on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    works: Vec<WorkRecord>,
}

impl Catalog {
    /// Parse a catalog from a JSON array of records.
    ///
    /// # Errors
    /// Returns `CatalogParseError` for malformed JSON and `ConfigValidation`
    /// for duplicate slugs.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Self::parse(content, None)
    }

    /// Load a catalog file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let catalog = Self::parse(&content, Some(path))?;
        info!(path = %path.display(), works = catalog.works.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Look up a work by slug.
    ///
    /// # Errors
    /// Returns `WorkNotFound` if no record has this slug.
    pub fn get(&self, slug: &str) -> Result<&WorkRecord> {
        self.works
            .iter()
            .find(|work| work.slug == slug)
            .ok_or_else(|| ShowreelError::WorkNotFound(slug.to_string()))
    }

    /// All works in catalog order.
    pub fn works(&self) -> &[WorkRecord] {
        &self.works
    }

    /// Number of works.
    pub fn len(&self) -> usize {
        self.works.len()
    }

    /// Whether the catalog has no works.
    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }

    fn parse(content: &str, path: Option<&Path>) -> Result<Self> {
        let works: Vec<WorkRecord> = serde_json::from_str(content)
            .map_err(|e| ShowreelError::catalog_parse(e, path))?;

        let mut seen = HashSet::new();
        for work in &works {
            if !seen.insert(work.slug.as_str()) {
                return Err(ShowreelError::ConfigValidation {
                    component: String::from("catalog"),
                    details: format!("duplicate slug '{}'", work.slug),
                });
            }
        }

        let catalog = Self { works };
        catalog.lint()?;
        Ok(catalog)
    }

    fn lint(&self) -> Result<()> {
        let source_id = Regex::new(SOURCE_ID_PATTERN).map_err(|e| ShowreelError::ConfigValidation {
            component: String::from("catalog"),
            details: e.to_string(),
        })?;

        for work in &self.works {
            if let Some(id) = work.source_id() {
                if !source_id.is_match(id) {
                    warn!(
                        slug = %work.slug,
                        source_id = id,
                        "Source id does not look like an embed id"
                    );
                }
            }

            if let Some(segment) = work.preview_segment() {
                if !segment.is_well_formed() {
                    warn!(
                        slug = %work.slug,
                        start = segment.start_offset_seconds,
                        end = segment.end_offset_seconds,
                        "Preview segment does not end after it starts"
                    );
                }
            }
        }

        Ok(())
    }
}
