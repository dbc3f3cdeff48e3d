//! Serde models for the parts of STAC API responses this crate consumes.

use crate::error::StacError;
use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

const BASE_VARIANT: &str = "base";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Link {
    pub rel: String,
    pub href: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// One page of a `/collections/{id}/items` response.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ItemCollectionPage {
    pub features: Vec<Value>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl ItemCollectionPage {
    pub fn next_link(&self) -> Option<&str> {
        self.links
            .iter()
            .rev()
            .find(|link| link.rel == "next")
            .map(|link| link.href.as_str())
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Collections {
    pub collections: Vec<CollectionSummary>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CollectionSummary {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(flatten)]
    pub additional_fields: serde_json::Map<String, Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Asset {
    #[serde(rename = "type")]
    pub media_type: String,
    pub created: String,
    pub updated: String,
    pub href: String,
    /// Required key, `null` is accepted.
    #[serde(rename = "proj:epsg", deserialize_with = "nullable_epsg")]
    pub epsg: Option<i64>,
    /// Ground sample distance, 0 when the asset does not declare one.
    #[serde(rename = "eo:gsd", default)]
    pub gsd: f64,
    #[serde(rename = "geoadmin:variant", default = "base_variant")]
    pub variant: String,
    #[serde(rename = "checksum:multihash")]
    pub checksum: String,
}

fn base_variant() -> String {
    BASE_VARIANT.to_string()
}

fn nullable_epsg<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer)
}

/// A feature as it arrives over the wire, geometry still in GeoJSON form.
#[derive(Deserialize, Clone, Debug)]
pub struct RawFeature {
    pub id: String,
    pub geometry: Option<geojson::Geometry>,
    #[serde(default)]
    pub bbox: Vec<f64>,
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
    #[serde(default)]
    pub properties: Value,
}

/// A catalog item with its geometry converted to a [`geo::Geometry`].
#[derive(Clone, Debug)]
pub struct Feature {
    pub id: String,
    pub geometry: geo::Geometry<f64>,
    pub bbox: Vec<f64>,
    pub assets: BTreeMap<String, Asset>,
    pub properties: Value,
}

impl TryFrom<RawFeature> for Feature {
    type Error = anyhow::Error;

    fn try_from(raw: RawFeature) -> Result<Self> {
        let geojson = raw.geometry.ok_or_else(|| StacError::MissingField {
            field: "geometry".to_string(),
            context: format!("feature {}", raw.id),
        })?;
        let geometry = geo::Geometry::<f64>::try_from(geojson).map_err(|e| {
            StacError::InvalidGeometry {
                feature_id: raw.id.clone(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            id: raw.id,
            geometry,
            bbox: raw.bbox,
            assets: raw.assets,
            properties: raw.properties,
        })
    }
}

impl Feature {
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawFeature = serde_json::from_value(value)?;
        Feature::try_from(raw)
    }
}
