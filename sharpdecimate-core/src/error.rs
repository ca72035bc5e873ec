//! Error types for sharpdecimate

use thiserror::Error;

/// Main error type for sharpdecimate operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(
        "Mesh not suitable for decimation: {vertices} vertices and {faces} faces \
         (at least {min_vertices} vertices and {min_faces} faces required)"
    )]
    Preflight {
        vertices: usize,
        faces: usize,
        min_vertices: usize,
        min_faces: usize,
    },

    #[error("Decimation failed: primary reduction: {primary}; fallback reduction: {fallback}")]
    Decimation { primary: String, fallback: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Material partitioning failed: {0}")]
    Partition(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

/// Result type alias for sharpdecimate operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimation_message_names_both_tiers() {
        let err = Error::Decimation {
            primary: "queue exhausted".to_string(),
            fallback: "empty result".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("queue exhausted"));
        assert!(msg.contains("empty result"));
    }

    #[test]
    fn test_preflight_message() {
        let err = Error::Preflight {
            vertices: 3,
            faces: 1,
            min_vertices: 4,
            min_faces: 4,
        };
        assert!(err.to_string().contains("3 vertices and 1 faces"));
    }
}
