//! Common test fixtures for the heightfield workspace.

/// Earth extents as (min_x, min_y, max_x, max_y).
pub mod extents {
    /// One square kilometer in projected meters.
    pub const SQUARE_KM: (f64, f64, f64, f64) = (0.0, 0.0, 1000.0, 1000.0);

    /// 100 m x 100 m plot.
    pub const SMALL_PLOT: (f64, f64, f64, f64) = (0.0, 0.0, 100.0, 100.0);

    /// Off-origin projected tile (UTM-like easting/northing).
    pub const UTM_TILE: (f64, f64, f64, f64) = (500_000.0, 4_100_000.0, 502_560.0, 4_102_560.0);

    /// One-degree geographic tile at mid latitude.
    pub const GEOGRAPHIC_TILE: (f64, f64, f64, f64) = (10.0, 45.0, 11.0, 46.0);
}

/// Light directions as world (x, y, z) vectors. Y is up, Z points south.
pub mod lights {
    /// Straight down.
    pub const OVERHEAD: (f32, f32, f32) = (0.0, -1.0, 0.0);

    /// Pointing up, away from the terrain.
    pub const UPWARD: (f32, f32, f32) = (0.0, 1.0, 0.0);

    /// From the west, 45 degrees above the horizon, travelling east.
    pub const FROM_WEST_45: (f32, f32, f32) = (0.707_106_8, -0.707_106_8, 0.0);

    /// From the north-west, travelling south-east and down.
    pub const FROM_NORTHWEST: (f32, f32, f32) = (0.57735, -0.57735, 0.57735);
}

/// Serialized color maps.
pub mod colormaps {
    /// Two absolute stops, black at 0 m to white at 100 m.
    pub const BLACK_WHITE_JSON: &str = r##"{
  "blend": true,
  "relative": false,
  "entries": [
    { "elevation": 0.0, "color": "#000000" },
    { "elevation": 100.0, "color": "#FFFFFF" }
  ]
}"##;

    /// Three relative stops, listed out of order.
    pub const UNSORTED_YAML: &str = r##"blend: false
relative: true
entries:
  - elevation: 500
    color: "#FF0000"
  - elevation: 0
    color: "#0000FF"
  - elevation: 250
    color: "#00FF00"
"##;

    /// A stop with a malformed color.
    pub const BAD_COLOR_JSON: &str =
        r##"{ "entries": [ { "elevation": 0.0, "color": "#12345" } ] }"##;
}

/// A scratch directory removed when dropped.
pub fn scratch_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create scratch dir: {e}"))
}
