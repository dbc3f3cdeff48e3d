//! Convenience queries over an [`AssetTable`]: media type and resolution selection followed by a
//! point or polygon join against each row's geometry.

use crate::assets::AssetTable;
use crate::error::StacError;
use crate::stac_operations::StacApi;
use anyhow::Result;
use geo::{Contains, Intersects, Point, Polygon};
use wkt::TryFromWkt;

pub const COG_MEDIA_TYPE: &str = "image/tiff; application=geotiff; profile=cloud-optimized";
pub const SWISSALTI3D: &str = "ch.swisstopo.swissalti3d";
pub const SWISSIMAGE: &str = "ch.swisstopo.swissimage-dop10";

/// Absolute tolerance when matching ground sample distances.
pub const RESOLUTION_TOLERANCE: f64 = 1e-6;

impl AssetTable {
    pub fn select(&self, media_type: &str, resolution: f64) -> AssetTable {
        self.filter(|row| {
            row.media_type == media_type && (row.gsd - resolution).abs() <= RESOLUTION_TOLERANCE
        })
    }

    pub fn containing_point(&self, point: &Point<f64>) -> AssetTable {
        self.filter(|row| row.geometry.contains(point))
    }

    pub fn intersecting(&self, polygon: &Polygon<f64>) -> AssetTable {
        self.filter(|row| row.geometry.intersects(polygon))
    }
}

pub fn hrefs_at_point(
    table: &AssetTable,
    media_type: &str,
    resolution: f64,
    lng: f64,
    lat: f64,
) -> Vec<String> {
    table
        .select(media_type, resolution)
        .containing_point(&Point::new(lng, lat))
        .hrefs()
}

pub fn hrefs_in_polygon(
    table: &AssetTable,
    media_type: &str,
    resolution: f64,
    polygon: &Polygon<f64>,
) -> Vec<String> {
    table
        .select(media_type, resolution)
        .intersecting(polygon)
        .hrefs()
}

pub fn parse_wkt_polygon(wkt: &str) -> Result<Polygon<f64>> {
    let polygon = Polygon::<f64>::try_from_wkt_str(wkt)
        .map_err(|e| StacError::InvalidWkt(e.to_string()))?;
    Ok(polygon)
}

async fn collection_assets(api: &StacApi, collection_id: &str) -> Result<AssetTable> {
    let config = api.config();
    api.assets_for_collection(collection_id, config.verbose, config.use_cache)
        .await
}

/// swissALTI3D tiles (0.5 m GeoTIFF) containing the point, at most one in practice.
pub async fn swissalti3d_50cm_at_point(api: &StacApi, lng: f64, lat: f64) -> Result<Vec<String>> {
    let table = collection_assets(api, SWISSALTI3D).await?;
    Ok(hrefs_at_point(&table, COG_MEDIA_TYPE, 0.5, lng, lat))
}

pub async fn swissalti3d_50cm_in_polygon(api: &StacApi, wkt: &str) -> Result<Vec<String>> {
    let polygon = parse_wkt_polygon(wkt)?;
    let table = collection_assets(api, SWISSALTI3D).await?;
    Ok(hrefs_in_polygon(&table, COG_MEDIA_TYPE, 0.5, &polygon))
}

pub async fn swissimage_at_point(
    api: &StacApi,
    lng: f64,
    lat: f64,
    gsd: f64,
) -> Result<Vec<String>> {
    let table = collection_assets(api, SWISSIMAGE).await?;
    Ok(hrefs_at_point(&table, COG_MEDIA_TYPE, gsd, lng, lat))
}

pub async fn swissimage_in_polygon(api: &StacApi, wkt: &str, gsd: f64) -> Result<Vec<String>> {
    let polygon = parse_wkt_polygon(wkt)?;
    let table = collection_assets(api, SWISSIMAGE).await?;
    Ok(hrefs_in_polygon(&table, COG_MEDIA_TYPE, gsd, &polygon))
}
