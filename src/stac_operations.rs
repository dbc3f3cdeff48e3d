use crate::assets::AssetTable;
use crate::cache::DiskCache;
use crate::config::StacConfig;
use crate::models::{CollectionSummary, Collections, Feature, ItemCollectionPage};
use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info};

/// Entry point for querying a STAC API through the on-disk response cache.
pub struct StacApi {
    config: StacConfig,
    client: reqwest::Client,
    cache: DiskCache,
}

impl StacApi {
    pub fn new(config: StacConfig) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        let cache = DiskCache::new(&config.cache_dir);
        Ok(Self {
            config,
            client,
            cache,
        })
    }

    pub fn config(&self) -> &StacConfig {
        &self.config
    }

    pub fn cache(&self) -> &DiskCache {
        &self.cache
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub async fn fetch_json(&self, url: &str, use_cache: bool, verbose: bool) -> Result<Value> {
        self.cache.fetch(&self.client, url, use_cache, verbose).await
    }

    pub async fn collections(&self, use_cache: bool) -> Result<Vec<CollectionSummary>> {
        let result = self
            .fetch_json(&self.config.collections_url(), use_cache, false)
            .await?;
        let collections: Collections = serde_json::from_value(result)?;
        Ok(collections.collections)
    }

    pub async fn collection_ids(&self, use_cache: bool) -> Result<Vec<String>> {
        let ids = self
            .collections(use_cache)
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        Ok(ids)
    }

    /// Follows the `next` links of a collection's item listing, accumulating every feature.
    ///
    /// A `page_limit` of 0 fetches all pages, otherwise at most `page_limit` pages are fetched.
    pub async fn fetch_all_features(
        &self,
        collection_id: &str,
        verbose: bool,
        page_limit: usize,
        use_cache: bool,
    ) -> Result<Vec<Feature>> {
        let mut raw_features: Vec<Value> = vec![];
        let mut next = Some(self.config.items_url(collection_id));
        let mut page_count = 0_usize;

        while let Some(url) = next.take() {
            let result = self.fetch_json(&url, use_cache, verbose).await?;
            let page: ItemCollectionPage = serde_json::from_value(result)?;
            page_count += 1;

            next = page.next_link().map(str::to_owned);
            raw_features.extend(page.features);

            if page_limit > 0 && page_count >= page_limit {
                debug!("Page limit of {page_limit} reached");
                break;
            }
        }

        if verbose {
            info!(
                "Fetched {} features from {page_count} pages of {collection_id}",
                raw_features.len()
            );
        }

        raw_features.into_iter().map(Feature::from_value).collect()
    }

    pub async fn assets_for_collection(
        &self,
        collection_id: &str,
        verbose: bool,
        use_cache: bool,
    ) -> Result<AssetTable> {
        let features = self
            .fetch_all_features(collection_id, verbose, self.config.page_limit, use_cache)
            .await?;
        Ok(AssetTable::flatten(&features))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::test_server::TestServer;
    use axum::extract::{Path, Query};
    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde::Deserialize;
    use serde_json::json;

    pub const PAGES: usize = 3;

    #[derive(Deserialize)]
    struct PageQuery {
        page: Option<usize>,
    }

    pub fn asset(href: &str, gsd: Option<f64>) -> Value {
        let mut asset = json!({
            "type": "image/tiff; application=geotiff; profile=cloud-optimized",
            "created": "2021-02-10T12:00:00Z",
            "updated": "2021-02-10T12:00:00Z",
            "href": href,
            "proj:epsg": 2056,
            "checksum:multihash": "1220deadbeef"
        });
        if let Some(gsd) = gsd {
            asset["eo:gsd"] = json!(gsd);
        }
        asset
    }

    pub fn square_feature(id: &str, x: f64, y: f64, assets: Value) -> Value {
        json!({
            "id": id,
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]]
            },
            "bbox": [x, y, x + 1.0, y + 1.0],
            "properties": {},
            "assets": assets
        })
    }

    async fn items(
        Path(collection): Path<String>,
        Query(query): Query<PageQuery>,
        headers: HeaderMap,
    ) -> Json<Value> {
        let host = headers
            .get("host")
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let page = query.page.unwrap_or(1);
        let mut assets = serde_json::Map::new();
        assets.insert(
            format!("tile-{page}.tif"),
            asset(&format!("https://data.example/{page}.tif"), Some(0.5)),
        );
        let feature = square_feature(
            &format!("{collection}-{page}"),
            page as f64,
            0.0,
            Value::Object(assets),
        );
        let mut links = vec![json!({"rel": "self", "href": "ignored"})];
        if page < PAGES {
            links.push(json!({
                "rel": "next",
                "href": format!("http://{host}/collections/{collection}/items?page={}", page + 1)
            }));
        }
        Json(json!({"type": "FeatureCollection", "features": [feature], "links": links}))
    }

    pub fn catalog_router() -> Router {
        Router::new()
            .route(
                "/collections",
                get(|| async {
                    Json(json!({
                        "collections": [
                            {"id": "ch.swisstopo.swissalti3d", "title": "swissALTI3D", "license": "proprietary"},
                            {"id": "ch.swisstopo.swissimage-dop10"}
                        ],
                        "links": []
                    }))
                }),
            )
            .route("/collections/:collection/items", get(items))
    }

    pub fn api_for(server: &TestServer, cache_dir: &std::path::Path) -> StacApi {
        let mut config = StacConfig::new(&server.base_url());
        config.cache_dir = cache_dir.to_path_buf();
        StacApi::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_collection_ids() {
        let server = TestServer::start(catalog_router()).await;
        let dir = tempfile::tempdir().unwrap();
        let api = api_for(&server, dir.path());

        let ids = api.collection_ids(true).await.unwrap();
        assert_eq!(
            ids,
            vec!["ch.swisstopo.swissalti3d", "ch.swisstopo.swissimage-dop10"]
        );
        let collections = api.collections(true).await.unwrap();
        assert_eq!(collections[0].title.as_deref(), Some("swissALTI3D"));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_pagination_visits_each_page_once() {
        let server = TestServer::start(catalog_router()).await;
        let dir = tempfile::tempdir().unwrap();
        let api = api_for(&server, dir.path());

        let features = api
            .fetch_all_features("demo", false, 0, false)
            .await
            .unwrap();

        assert_eq!(server.hits(), PAGES);
        let ids: Vec<_> = features.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["demo-1", "demo-2", "demo-3"]);
    }

    #[tokio::test]
    async fn test_page_limit_stops_after_exactly_n_pages() {
        let server = TestServer::start(catalog_router()).await;
        let dir = tempfile::tempdir().unwrap();
        let api = api_for(&server, dir.path());

        let features = api
            .fetch_all_features("demo", false, 2, false)
            .await
            .unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(server.hits(), 2);

        let features = api
            .fetch_all_features("demo", false, 10, false)
            .await
            .unwrap();
        assert_eq!(features.len(), PAGES);
    }

    #[tokio::test]
    async fn test_cached_pagination_needs_no_network() {
        let server = TestServer::start(catalog_router()).await;
        let dir = tempfile::tempdir().unwrap();
        let api = api_for(&server, dir.path());

        api.fetch_all_features("demo", true, 0, true).await.unwrap();
        let features = api.fetch_all_features("demo", true, 0, true).await.unwrap();

        assert_eq!(features.len(), PAGES);
        assert_eq!(server.hits(), PAGES);
    }

    #[tokio::test]
    async fn test_assets_for_collection() {
        let server = TestServer::start(catalog_router()).await;
        let dir = tempfile::tempdir().unwrap();
        let api = api_for(&server, dir.path());

        let table = api.assets_for_collection("demo", false, true).await.unwrap();
        assert_eq!(table.len(), PAGES);
        assert_eq!(
            table.hrefs(),
            vec![
                "https://data.example/1.tif",
                "https://data.example/2.tif",
                "https://data.example/3.tif"
            ]
        );
    }
}
