use thiserror::Error;

#[derive(Error, Debug)]
pub enum StacError {
    #[error("Missing field '{field}' in {context}")]
    MissingField { field: String, context: String },

    #[error("Unable to convert geometry of feature {feature_id}: {reason}")]
    InvalidGeometry { feature_id: String, reason: String },

    #[error("Unable to parse WKT polygon: {0}")]
    InvalidWkt(String),

    #[error("Request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },
}
