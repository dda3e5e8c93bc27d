//! Terrain rendering tool.
//!
//! Builds a heightfield (synthetic, sized by the grid configuration), colors
//! it by elevation, shades it and writes the result as a PNG.

mod terrain;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use heightfield::{ElevationGrid, GridConfig, HeightSource};
use renderer::{
    color_from_elevation, png, shade_from_elevation, shade_quick, shadow_cast, Bitmap, ColorDepth,
    ColorMap, Progress, RenderConfig,
};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use terrain::TerrainKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Shading {
    None,
    Hillshade,
    Quick,
    Shadows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Depth {
    Gray,
    Rgb,
    Rgba,
}

impl From<Depth> for ColorDepth {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Gray => ColorDepth::Gray8,
            Depth::Rgb => ColorDepth::Rgb24,
            Depth::Rgba => ColorDepth::Rgba32,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "terrain-render")]
#[command(about = "Render a shaded elevation image of a heightfield")]
struct Args {
    /// Output PNG path
    #[arg(short, long, env = "TERRAIN_OUTPUT", default_value = "terrain.png")]
    output: PathBuf,

    /// Synthetic terrain to render
    #[arg(long, value_enum, default_value = "hills")]
    terrain: TerrainKind,

    /// Terrain relief in meters
    #[arg(long, default_value = "1200")]
    relief: f32,

    /// Punch a no-data hole into the terrain
    #[arg(long)]
    hole: bool,

    /// Grid samples per side (overrides GRID_COLUMNS / GRID_ROWS)
    #[arg(long)]
    grid_size: Option<usize>,

    /// Output width in pixels (default: grid columns)
    #[arg(long)]
    width: Option<usize>,

    /// Output height in pixels (default: grid rows)
    #[arg(long)]
    height: Option<usize>,

    /// Output color depth
    #[arg(long, value_enum, default_value = "rgb")]
    depth: Depth,

    /// Color map file (.json, .yaml or .yml)
    #[arg(short, long, env = "TERRAIN_COLORMAP")]
    colormap: Option<PathBuf>,

    /// Render configuration file (YAML); defaults come from the environment
    #[arg(long, env = "RENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Shading pass (default: shadows when RENDER_SHADOWS is set, else hillshade)
    #[arg(long, value_enum)]
    shading: Option<Shading>,

    /// Light azimuth in degrees clockwise from north
    #[arg(long)]
    azimuth: Option<f32>,

    /// Light elevation in degrees above the horizon
    #[arg(long)]
    elevation: Option<f32>,

    /// Light factor
    #[arg(long)]
    light_factor: Option<f32>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);
    if args.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn progress_logger(stage: &'static str) -> impl FnMut(u32) {
    move |percent| debug!(stage, percent, "Progress")
}

fn load_render_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => RenderConfig::from_env(),
    };

    if let Some(azimuth) = args.azimuth {
        config.light_azimuth = azimuth;
    }
    if let Some(elevation) = args.elevation {
        config.light_elevation = elevation;
    }
    if let Some(factor) = args.light_factor {
        config.light_factor = factor;
    }
    if let Some(shading) = args.shading {
        config.shadows = shading == Shading::Shadows;
    }

    config.validate().map_err(|e| anyhow!("invalid render config: {e}"))?;
    Ok(config)
}

fn build_grid(args: &Args) -> Result<ElevationGrid> {
    let mut config = GridConfig::from_env();
    if let Some(size) = args.grid_size {
        config.columns = size;
        config.rows = size;
    }
    config.validate().map_err(|e| anyhow!("invalid grid config: {e}"))?;

    let mut grid = config.build()?;
    terrain::populate(&mut grid, args.terrain, args.relief, args.hole);
    Ok(grid)
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args)?;

    let grid = build_grid(&args)?;
    let render = load_render_config(&args)?;
    let colormap = match &args.colormap {
        Some(path) => ColorMap::from_file(path)
            .with_context(|| format!("loading color map {}", path.display()))?,
        None => ColorMap::default_terrain(),
    };

    let (columns, rows) = grid.geometry().dimensions();
    let width = args.width.unwrap_or(columns);
    let height = args.height.unwrap_or(rows);
    if width == 0 || height == 0 {
        return Err(anyhow!("output size must be positive, got {width}x{height}"));
    }

    info!(
        terrain = ?args.terrain,
        columns,
        rows,
        width,
        height,
        "Rendering terrain"
    );

    let mut bitmap = Bitmap::new(width, height, args.depth.into());
    let mut on_color = progress_logger("color");
    let has_nodata = color_from_elevation(
        &grid,
        &mut bitmap,
        &colormap,
        render.granularity,
        render.nodata,
        Progress::new(&mut on_color),
    );
    if has_nodata {
        warn!(unknown = grid.count_unknown(), "Terrain has cells without data");
    }

    let shading = args.shading.unwrap_or(if render.shadows {
        Shading::Shadows
    } else {
        Shading::Hillshade
    });
    match shading {
        Shading::None => {}
        Shading::Hillshade => {
            let mut on_shade = progress_logger("hillshade");
            shade_from_elevation(
                &grid,
                &mut bitmap,
                &render.hillshade_params(),
                Progress::new(&mut on_shade),
            );
        }
        Shading::Quick => {
            let mut on_shade = progress_logger("quick");
            shade_quick(
                &grid,
                &mut bitmap,
                render.light_factor,
                false,
                Progress::new(&mut on_shade),
            )?;
        }
        Shading::Shadows => {
            let mut on_shade = progress_logger("shadows");
            let stats = shadow_cast(
                &grid,
                &mut bitmap,
                &render.shadow_params(),
                Progress::new(&mut on_shade),
            );
            info!(
                shadowed = stats.shadowed_texels,
                nodata = stats.nodata_texels,
                darkest = stats.darkest_shadow,
                "Cast shadows"
            );
        }
    }

    png::write_png(&bitmap, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(path = %args.output.display(), "Wrote image");
    Ok(())
}
