use crate::models::Feature;

/// One asset of one feature, carrying a copy of the feature's geometry and bbox.
#[derive(Debug, Clone)]
pub struct AssetRow {
    pub name: String,
    pub media_type: String,
    pub bbox: Vec<f64>,
    pub created: String,
    pub updated: String,
    pub href: String,
    pub epsg: Option<i64>,
    pub gsd: f64,
    pub variant: String,
    pub checksum: String,
    pub geometry: geo::Geometry<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    rows: Vec<AssetRow>,
}

impl AssetTable {
    pub fn new(rows: Vec<AssetRow>) -> Self {
        Self { rows }
    }

    /// Explodes every feature's asset mapping into one row per asset.
    pub fn flatten(features: &[Feature]) -> Self {
        let rows = features
            .iter()
            .flat_map(|feature| {
                feature.assets.iter().map(move |(name, asset)| AssetRow {
                    name: name.to_owned(),
                    media_type: asset.media_type.to_owned(),
                    bbox: feature.bbox.clone(),
                    created: asset.created.to_owned(),
                    updated: asset.updated.to_owned(),
                    href: asset.href.to_owned(),
                    epsg: asset.epsg,
                    gsd: asset.gsd,
                    variant: asset.variant.to_owned(),
                    checksum: asset.checksum.to_owned(),
                    geometry: feature.geometry.clone(),
                })
            })
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[AssetRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetRow> {
        self.rows.iter()
    }

    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&AssetRow) -> bool,
    {
        let rows = self.rows.iter().filter(|row| predicate(row)).cloned().collect();
        Self { rows }
    }

    pub fn hrefs(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.href.to_owned()).collect()
    }
}

impl IntoIterator for AssetTable {
    type Item = AssetRow;
    type IntoIter = std::vec::IntoIter<AssetRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
