use rusqlite::Row;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{id_as_string, null_as_default};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetType {
    Logo,
    MenuGraphic,
    FooterImage,
    Other(String),
}

impl AssetType {
    pub fn as_str(&self) -> &str {
        match self {
            AssetType::Logo => "logo",
            AssetType::MenuGraphic => "menu_graphic",
            AssetType::FooterImage => "footer_image",
            AssetType::Other(s) => s.as_str(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "logo" => AssetType::Logo,
            "menu_graphic" => AssetType::MenuGraphic,
            "footer_image" => AssetType::FooterImage,
            other => AssetType::Other(other.to_string()),
        }
    }
}

impl Serialize for AssetType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AssetType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(AssetType::parse(&s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteAsset {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub asset_type: AssetType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub placement_hint: String,
    /// Navigation label this graphic binds to. Free text, may be empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub menu_item: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position_x: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position_y: i32,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub z_index: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
}

/// Record fields supplied by the admin upload; `id` is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetForm {
    pub asset_type: AssetType,
    pub image_url: String,
    pub placement_hint: String,
    pub menu_item: String,
    pub position_x: i32,
    pub position_y: i32,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub z_index: i32,
    pub active: bool,
}

impl SiteAsset {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let kind: String = row.get("asset_type")?;
        let active_raw: i64 = row.get("active")?;
        Ok(SiteAsset {
            id: row.get("id")?,
            asset_type: AssetType::parse(&kind),
            image_url: row.get("image_url")?,
            placement_hint: row.get("placement_hint")?,
            menu_item: row.get::<_, Option<String>>("menu_item")?.unwrap_or_default(),
            position_x: row.get("position_x")?,
            position_y: row.get("position_y")?,
            width: row.get("width")?,
            height: row.get("height")?,
            z_index: row.get("z_index")?,
            active: active_raw != 0,
        })
    }

    pub fn is_menu_graphic(&self) -> bool {
        self.asset_type == AssetType::MenuGraphic
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn asset_type_parses_known_and_unknown() {
        assert_eq!(AssetType::parse("menu_graphic"), AssetType::MenuGraphic);
        assert_eq!(AssetType::parse("banner"), AssetType::Other("banner".into()));
        assert_eq!(AssetType::Other("banner".into()).as_str(), "banner");
    }

    #[test]
    fn deserializes_backend_row_with_nulls() {
        let row = json!({
            "id": "a1",
            "asset_type": "menu_graphic",
            "image_url": "https://cdn.example/x.png",
            "placement_hint": "nav",
            "menu_item": null,
            "position_x": 0,
            "position_y": 0,
            "width": null,
            "height": 120,
            "z_index": 2,
            "active": true
        });
        let asset: SiteAsset = serde_json::from_value(row).unwrap();
        assert!(asset.is_menu_graphic());
        assert_eq!(asset.menu_item, "");
        assert_eq!(asset.width, None);
        assert_eq!(asset.height, Some(120));
    }

    #[test]
    fn one_null_bearing_row_does_not_sink_the_batch() {
        let rows = json!([
            {
                "id": "a1",
                "asset_type": "logo",
                "image_url": "https://cdn.example/logo.png",
                "placement_hint": "header",
                "menu_item": "",
                "position_x": 0,
                "position_y": 0,
                "z_index": 1,
                "active": true
            },
            {
                "id": 42,
                "asset_type": "menu_graphic",
                "image_url": "https://cdn.example/faq.png",
                "placement_hint": null,
                "menu_item": "FAQ",
                "position_x": null,
                "position_y": null,
                "width": null,
                "height": null,
                "z_index": null,
                "active": true
            }
        ]);
        let assets: Vec<SiteAsset> = serde_json::from_value(rows).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].asset_type, AssetType::Logo);
        assert_eq!(assets[1].id, "42");
        assert_eq!(assets[1].placement_hint, "");
        assert_eq!((assets[1].position_x, assets[1].z_index), (0, 0));
        assert!(assets[1].active);
    }
}
