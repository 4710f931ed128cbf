//! 3D model assets, materials, and the shared asset cache.
//!
//! Assets are in-code descriptors of the glTF samples the catalog references.
//! The library caches them and every scene works on its own copy of the
//! material list, so customization never leaks between sessions.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};

use crate::types::ArKind;
use crate::viewer::ViewerError;

/// An sRGB color, carried as `#rrggbb` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` literal.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidColor`] for anything else.
    pub fn from_hex(value: &str) -> Result<Self, ViewerError> {
        let invalid = || ViewerError::InvalidColor(value.to_owned());
        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(invalid)
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = ViewerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// The customization swatches, in display order.
pub const PALETTE: [Color; 10] = [
    Color::rgb(0xff, 0xff, 0xff),
    Color::rgb(0x00, 0x00, 0x00),
    Color::rgb(0xff, 0x00, 0x00),
    Color::rgb(0x00, 0xff, 0x00),
    Color::rgb(0x00, 0x00, 0xff),
    Color::rgb(0xff, 0xff, 0x00),
    Color::rgb(0xff, 0x00, 0xff),
    Color::rgb(0x00, 0xff, 0xff),
    Color::rgb(0xff, 0xa5, 0x00),
    Color::rgb(0x80, 0x00, 0x80),
];

/// One material slot on a model.
///
/// A slot with a base color channel is colorable; slots without one (glass,
/// emissive trim) are left alone by customization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub name: String,
    pub base_color: Option<Color>,
    pub metalness: f32,
    pub roughness: f32,
}

impl MaterialSpec {
    #[must_use]
    pub const fn is_colorable(&self) -> bool {
        self.base_color.is_some()
    }
}

/// A parsed model asset shared through the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAsset {
    pub url: String,
    pub name: String,
    pub materials: Vec<MaterialSpec>,
}

impl ModelAsset {
    /// An independent copy of the material list for one scene to mutate.
    #[must_use]
    pub fn working_materials(&self) -> Vec<MaterialSpec> {
        self.materials.clone()
    }
}

pub const DAMAGED_HELMET_URL: &str =
    "https://threejs.org/examples/models/gltf/DamagedHelmet/DamagedHelmet.gltf";
pub const ROBOT_EXPRESSIVE_URL: &str =
    "https://threejs.org/examples/models/gltf/RobotExpressive/RobotExpressive.glb";
pub const SOLDIER_URL: &str = "https://threejs.org/examples/models/gltf/Soldier.glb";

/// The default asset per AR presentation kind.
#[must_use]
pub const fn default_model_url(kind: ArKind) -> &'static str {
    match kind {
        ArKind::Furniture => DAMAGED_HELMET_URL,
        ArKind::Electronics => ROBOT_EXPRESSIVE_URL,
        ArKind::Apparel => SOLDIER_URL,
    }
}

/// Resolve which asset a product opens with: its own URL when present,
/// otherwise the default for its kind, otherwise the furniture default.
#[must_use]
pub fn resolve_model_url(custom: Option<&str>, kind: Option<ArKind>) -> String {
    custom.map_or_else(
        || default_model_url(kind.unwrap_or(ArKind::Furniture)).to_owned(),
        str::to_owned,
    )
}

fn builtin_asset(url: &str) -> Option<ModelAsset> {
    let gray = Color::rgb(0xb0, 0xb0, 0xb0);
    match url {
        DAMAGED_HELMET_URL => Some(ModelAsset {
            url: url.to_owned(),
            name: "DamagedHelmet".to_owned(),
            materials: vec![
                MaterialSpec {
                    name: "Material_MR".to_owned(),
                    base_color: Some(gray),
                    metalness: 1.0,
                    roughness: 0.6,
                },
                MaterialSpec {
                    name: "Visor".to_owned(),
                    base_color: None,
                    metalness: 0.0,
                    roughness: 0.1,
                },
            ],
        }),
        ROBOT_EXPRESSIVE_URL => Some(ModelAsset {
            url: url.to_owned(),
            name: "RobotExpressive".to_owned(),
            materials: vec![
                MaterialSpec {
                    name: "Main".to_owned(),
                    base_color: Some(Color::rgb(0x96, 0x4b, 0x00)),
                    metalness: 0.3,
                    roughness: 0.8,
                },
                MaterialSpec {
                    name: "Grey".to_owned(),
                    base_color: Some(gray),
                    metalness: 0.3,
                    roughness: 0.8,
                },
                MaterialSpec {
                    name: "Black".to_owned(),
                    base_color: Some(Color::rgb(0x20, 0x20, 0x20)),
                    metalness: 0.3,
                    roughness: 0.8,
                },
            ],
        }),
        SOLDIER_URL => Some(ModelAsset {
            url: url.to_owned(),
            name: "Soldier".to_owned(),
            materials: vec![
                MaterialSpec {
                    name: "Body".to_owned(),
                    base_color: Some(Color::rgb(0x4a, 0x5d, 0x3a)),
                    metalness: 0.1,
                    roughness: 0.9,
                },
                MaterialSpec {
                    name: "Gear".to_owned(),
                    base_color: Some(Color::rgb(0x33, 0x33, 0x33)),
                    metalness: 0.4,
                    roughness: 0.7,
                },
            ],
        }),
        _ => None,
    }
}

/// Shared cache of parsed assets.
///
/// Same sizing as the product cache used elsewhere in the stack: bounded
/// capacity with a five-minute lifetime.
#[derive(Debug, Clone)]
pub struct ModelLibrary {
    cache: Cache<String, Arc<ModelAsset>>,
}

impl ModelLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(1_000)
                .time_to_live(Duration::from_secs(300))
                .build(),
        }
    }

    /// Load (or re-use) the asset at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::UnknownAsset`] when the URL is not one of the
    /// bundled sample assets.
    pub async fn load(&self, url: &str) -> Result<Arc<ModelAsset>, ViewerError> {
        if let Some(asset) = self.cache.get(url).await {
            return Ok(asset);
        }
        let asset = Arc::new(
            builtin_asset(url).ok_or_else(|| ViewerError::UnknownAsset(url.to_owned()))?,
        );
        self.cache.insert(url.to_owned(), Arc::clone(&asset)).await;
        Ok(asset)
    }
}

impl Default for ModelLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn colors_parse_and_print_as_hex() {
        let orange = Color::from_hex("#ffa500").unwrap();
        assert_eq!(orange, Color::rgb(0xff, 0xa5, 0x00));
        assert_eq!(orange.to_hex(), "#ffa500");

        assert!(Color::from_hex("ffa500").is_err());
        assert!(Color::from_hex("#ffa50").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn palette_has_ten_distinct_swatches_starting_with_white() {
        assert_eq!(PALETTE.len(), 10);
        assert_eq!(PALETTE.first(), Some(&Color::WHITE));
        let mut seen = PALETTE.to_vec();
        seen.sort_by_key(|c| (c.r, c.g, c.b));
        seen.dedup();
        assert_eq!(seen.len(), 10);
    }

    #[test]
    fn url_resolution_prefers_the_product_asset_then_the_kind_default() {
        assert_eq!(
            resolve_model_url(Some(SOLDIER_URL), Some(ArKind::Electronics)),
            SOLDIER_URL
        );
        assert_eq!(
            resolve_model_url(None, Some(ArKind::Apparel)),
            SOLDIER_URL
        );
        assert_eq!(resolve_model_url(None, None), DAMAGED_HELMET_URL);
    }

    #[tokio::test]
    async fn library_shares_one_asset_per_url() {
        let library = ModelLibrary::new();
        let first = library.load(DAMAGED_HELMET_URL).await.unwrap();
        let second = library.load(DAMAGED_HELMET_URL).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn unknown_urls_are_rejected_by_the_library() {
        let library = ModelLibrary::new();
        let err = library.load("https://example.com/chair.glb").await;
        assert!(matches!(err, Err(ViewerError::UnknownAsset(_))));
    }

    #[tokio::test]
    async fn working_copies_do_not_touch_the_cached_asset() {
        let library = ModelLibrary::new();
        let asset = library.load(ROBOT_EXPRESSIVE_URL).await.unwrap();
        let mut working = asset.working_materials();
        for material in &mut working {
            material.base_color = Some(Color::rgb(0xff, 0x00, 0x00));
        }

        let again = library.load(ROBOT_EXPRESSIVE_URL).await.unwrap();
        assert_eq!(
            again.materials.first().unwrap().base_color,
            Some(Color::rgb(0x96, 0x4b, 0x00))
        );
    }
}
