//! Error types for the heightfield engine.
//!
//! Queries and raster operations never fail: they report "no data" through
//! the elevation sentinel, `Option` and `bool` results. These errors cover
//! construction, configuration and I/O.

use thiserror::Error;

/// Result type alias using TerrainError.
pub type TerrainResult<T> = Result<T, TerrainError>;

#[derive(Debug, Error)]
pub enum TerrainError {
    // === Grid construction ===
    #[error("Invalid grid dimensions {columns}x{rows}: both must be at least 2")]
    InvalidDimensions { columns: usize, rows: usize },

    #[error("Invalid extents: {0}")]
    InvalidExtents(String),

    #[error("Elevation data has {actual} samples, expected {expected}")]
    DataLength { expected: usize, actual: usize },

    // === Color handling ===
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid color map: {0}")]
    InvalidColorMap(String),

    // === Rendering ===
    #[error("Buffer {buffer_width}x{buffer_height} is incompatible with grid {grid_columns}x{grid_rows}: {reason}")]
    IncompatibleBuffer {
        buffer_width: usize,
        buffer_height: usize,
        grid_columns: usize,
        grid_rows: usize,
        reason: String,
    },

    #[error("Image encoding failed: {0}")]
    Encode(String),

    // === Infrastructure ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TerrainError {
    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an InvalidColorMap error.
    pub fn invalid_color_map(msg: impl Into<String>) -> Self {
        Self::InvalidColorMap(msg.into())
    }
}

impl From<serde_json::Error> for TerrainError {
    fn from(err: serde_json::Error) -> Self {
        TerrainError::Config(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for TerrainError {
    fn from(err: serde_yaml::Error) -> Self {
        TerrainError::Config(format!("YAML error: {}", err))
    }
}
