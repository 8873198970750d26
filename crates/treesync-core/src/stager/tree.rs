//! The parts of the tree document that asset discovery reads.
//!
//! The document arrives embedded in a script on the tree page; it is cut out
//! with a depth-tracking brace scan and parsed only as far as sprite sheets,
//! zoom levels and asset URLs go.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Literal that precedes the tree document on the tree page.
pub const TREE_DATA_PREFIX: &str = "var passiveSkillTreeData = ";

/// CDN prefix carried by sprite sheet filenames; stripped to get the local name.
pub const SPRITE_CDN_PREFIX: &str = "https://web.poecdn.com/image/passive-skill/";

/// One sprite sheet at one zoom tier.
#[derive(Debug, Clone, Deserialize)]
pub struct SpriteSheet {
    pub filename: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeModel {
    /// Sprite group → sheets, indexed by zoom tier.
    #[serde(default)]
    pub skill_sprites: BTreeMap<String, Vec<SpriteSheet>>,
    /// Configured zoom levels, ascending; the last one is the highest.
    #[serde(default)]
    pub image_zoom_levels: Vec<f64>,
    /// Asset id → (zoom key → image URL).
    #[serde(default)]
    pub assets: BTreeMap<String, BTreeMap<String, String>>,
}

/// A file to fetch into the assets directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    pub url: String,
    pub path: PathBuf,
}

impl TreeModel {
    pub fn from_json(document: &str) -> Result<Self> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn max_zoom_index(&self) -> Result<usize> {
        self.image_zoom_levels
            .len()
            .checked_sub(1)
            .ok_or_else(|| {
                Error::InvalidInput("tree document has no image zoom levels".to_string())
            })
    }

    /// Key under which asset variants for the highest zoom tier are stored,
    /// e.g. `0.3835`.
    pub fn max_zoom_key(&self) -> Result<String> {
        let level = self.image_zoom_levels[self.max_zoom_index()?];
        Ok(level.to_string())
    }

    /// Sprite sheets at the highest zoom tier, one per group.
    ///
    /// The remote URL keeps any query string; the local file name drops it.
    pub fn sprite_items(&self, sprite_url: &str, assets_dir: &Path) -> Result<Vec<DownloadItem>> {
        if self.skill_sprites.is_empty() {
            return Ok(Vec::new());
        }
        let index = self.max_zoom_index()?;
        let mut items = Vec::with_capacity(self.skill_sprites.len());
        for (group, sheets) in &self.skill_sprites {
            let Some(sheet) = sheets.get(index).or_else(|| sheets.last()) else {
                tracing::debug!(group = %group, "sprite group has no sheets");
                continue;
            };
            let remote_name = sheet.filename.replace(SPRITE_CDN_PREFIX, "");
            let local_name = match remote_name.find('?') {
                Some(q) => &remote_name[..q],
                None => remote_name.as_str(),
            };
            items.push(DownloadItem {
                url: format!("{}{}", sprite_url, remote_name),
                path: assets_dir.join(checked_file_name(local_name)?),
            });
        }
        Ok(items)
    }

    /// One image per asset id, saved as `<id>.png`. Prefers the highest zoom
    /// tier and falls back to the numerically lowest tier present.
    pub fn asset_items(&self, assets_dir: &Path) -> Result<Vec<DownloadItem>> {
        if self.assets.is_empty() {
            return Ok(Vec::new());
        }
        let zoom_key = self.max_zoom_key()?;
        let mut items = Vec::with_capacity(self.assets.len());
        for (id, variants) in &self.assets {
            let Some(url) = variants.get(&zoom_key).or_else(|| lowest_tier(variants)) else {
                tracing::debug!(asset = %id, "asset has no variants");
                continue;
            };
            items.push(DownloadItem {
                url: url.clone(),
                path: assets_dir.join(checked_file_name(&format!("{}.png", id))?),
            });
        }
        Ok(items)
    }
}

fn lowest_tier(variants: &BTreeMap<String, String>) -> Option<&String> {
    variants
        .iter()
        .min_by(|(a, _), (b, _)| {
            let a = a.parse::<f64>().unwrap_or(f64::INFINITY);
            let b = b.parse::<f64>().unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        })
        .map(|(_, url)| url)
}

/// Rejects names that would escape the assets directory.
fn checked_file_name(name: &str) -> Result<&str> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(Error::InvalidInput(format!("unusable asset file name: {:?}", name)));
    }
    Ok(name)
}

/// Cuts the tree document out of the tree page.
///
/// The object starts right after [`TREE_DATA_PREFIX`] and ends where its
/// braces balance. Braces inside JSON strings are ignored. Escaped slashes
/// (`\/`) are unescaped.
pub fn extract_tree_document(page: &str) -> Result<String> {
    let start = page
        .find(TREE_DATA_PREFIX)
        .map(|i| i + TREE_DATA_PREFIX.len())
        .ok_or_else(|| {
            Error::InvalidInput("tree page doesn't contain the tree document".to_string())
        })?;
    let rest = &page[start..];
    if !rest.starts_with('{') {
        return Err(Error::InvalidInput("tree document doesn't start with an object".to_string()));
    }
    let end = balanced_object_end(rest)
        .ok_or_else(|| Error::InvalidInput("tree document has unbalanced braces".to_string()))?;
    Ok(rest[..end].replace("\\/", "/"))
}

/// Byte offset just past the `}` that closes the object opening at `s[0]`.
fn balanced_object_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, b) in s.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
