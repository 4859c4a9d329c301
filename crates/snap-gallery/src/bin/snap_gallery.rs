use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use edge_snap::{
    EdgeSegment, EdgeSolver, Image, IntensitySource, MagneticConfig, Point2i, Rect, RgbLuma,
    SnapSession, build_cost_field,
};
use image::{GrayImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "snap_gallery")]
#[command(about = "Run edge-snap magnetic selection on image files")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(name = "cost_field")]
    CostField(CostFieldArgs),
    #[command(name = "edge")]
    Edge(EdgeArgs),
    #[command(name = "polygon")]
    Polygon(PolygonArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    #[arg(long, required = true)]
    input: PathBuf,
    /// Optional MagneticConfig JSON; missing fields take their defaults
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "docs/fig/raw")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct CostFieldArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Region as `x,y,width,height` (default: whole image)
    #[arg(long, value_parser = parse_rect)]
    region: Option<Rect>,
}

#[derive(Args, Debug, Clone)]
struct EdgeArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Start anchor as `x,y`
    #[arg(long, value_parser = parse_point)]
    from: Point2i,
    /// End anchor as `x,y`
    #[arg(long, value_parser = parse_point)]
    to: Point2i,
}

#[derive(Args, Debug, Clone)]
struct PolygonArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// Anchor as `x,y`; repeat in placement order
    #[arg(long = "anchor", value_parser = parse_point, required = true)]
    anchors: Vec<Point2i>,
    #[arg(long, default_value_t = 1.0)]
    zoom: f32,
}

#[derive(Debug, Clone, Serialize)]
struct MetaCostField {
    region: [i32; 4],
    filter_radius: f32,
    threshold: u32,
    min_cost: f32,
    max_cost: f32,
    mean_cost: f32,
}

#[derive(Debug, Clone, Serialize)]
struct SegmentDto {
    start: [i32; 2],
    end: [i32; 2],
    cost: f32,
    points: Vec<[i32; 2]>,
}

#[derive(Debug, Clone, Serialize)]
struct PolygonDto {
    anchors: Vec<[i32; 2]>,
    segments: usize,
    points: Vec<[i32; 2]>,
}

#[derive(Debug, Clone, Serialize)]
struct MetaRun<'a> {
    config: &'a MagneticConfig,
    zoom: f32,
}

struct Input {
    rgb: RgbImage,
    pixels: Image<[u8; 3]>,
}

impl Input {
    fn luma(&self) -> RgbLuma<'_> {
        RgbLuma::new(self.pixels.as_view())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::CostField(args) => run_cost_field(args),
        Command::Edge(args) => run_edge(args),
        Command::Polygon(args) => run_polygon(args),
    }
}

fn run_cost_field(args: CostFieldArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "cost_field")?;
    let cfg = load_config(args.common.config.as_deref())?;
    let input = load_input(&args.common.input)?;
    let region = args
        .region
        .unwrap_or_else(|| Rect::from_size(input.pixels.width(), input.pixels.height()));

    let field = build_cost_field(&input.luma(), region, &cfg.cost_params())
        .with_context(|| format!("building cost field over {region:?}"))?;
    let costs = field.costs();

    save_luma_raw(
        case_dir.join("cost.png"),
        costs.width(),
        costs.height(),
        f32_to_u8_vis(costs.data()),
    )?;

    let data = costs.data();
    let (min_cost, max_cost) = data
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &c| {
            (lo.min(c), hi.max(c))
        });
    let mean_cost = data.iter().sum::<f32>() / data.len().max(1) as f32;
    let r = field.region();

    write_json(
        case_dir.join("meta.json"),
        &MetaCostField {
            region: [r.x, r.y, r.width, r.height],
            filter_radius: cfg.filter_radius,
            threshold: cfg.threshold,
            min_cost,
            max_cost,
            mean_cost,
        },
    )?;

    tracing::info!(?region, min_cost, max_cost, "cost field written");
    Ok(())
}

fn run_edge(args: EdgeArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "edge")?;
    let cfg = load_config(args.common.config.as_deref())?;
    let input = load_input(&args.common.input)?;
    let luma = input.luma();

    for (what, p) in [("from", args.from), ("to", args.to)] {
        if !luma.contains(p) {
            bail!("{what} anchor ({}, {}) is outside the image.", p.x, p.y);
        }
    }

    let mut solver = EdgeSolver::new();
    let seg = solver
        .try_compute_edge(&luma, args.from, args.to, &cfg)
        .with_context(|| {
            format!(
                "snapping ({}, {}) -> ({}, {})",
                args.from.x, args.from.y, args.to.x, args.to.y
            )
        })?;

    write_json(case_dir.join("edge.json"), &segment_dto(&seg))?;
    write_json(
        case_dir.join("meta.json"),
        &MetaRun {
            config: &cfg,
            zoom: 1.0,
        },
    )?;

    let overlay = render_overlay(&input.rgb, &seg.points, &[args.from, args.to]);
    overlay
        .save(case_dir.join("overlay.png"))
        .context("writing edge overlay.png")?;

    tracing::info!(points = seg.len(), cost = seg.cost, "edge written");
    Ok(())
}

fn run_polygon(args: PolygonArgs) -> Result<()> {
    let case_dir = prepare_case(&args.common, "polygon")?;
    let cfg = load_config(args.common.config.as_deref())?;
    let input = load_input(&args.common.input)?;
    let luma = input.luma();

    let mut session = SnapSession::new(cfg.clone()).context("creating session")?;
    session.set_zoom(args.zoom).context("setting zoom")?;

    for &p in &args.anchors {
        let outcome = session
            .place_anchor(&luma, p)
            .with_context(|| format!("placing anchor ({}, {})", p.x, p.y))?;
        tracing::debug!(?p, ?outcome, "anchor placed");
    }

    let placed = session.anchors().to_vec();
    let anchors = placed.iter().map(|p| [p.x, p.y]).collect();
    // A closed outline has one segment per anchor.
    let segments = session.anchors().len();

    let mut polygon: Vec<Point2i> = Vec::new();
    let mut sink = |points: &[Point2i]| polygon = points.to_vec();
    if !session.commit(&luma, &mut sink) {
        bail!("a polygon needs at least two anchors.");
    }

    write_json(
        case_dir.join("polygon.json"),
        &PolygonDto {
            anchors,
            segments,
            points: polygon.iter().map(|p| [p.x, p.y]).collect(),
        },
    )?;
    write_json(
        case_dir.join("meta.json"),
        &MetaRun {
            config: &cfg,
            zoom: args.zoom,
        },
    )?;

    let overlay = render_overlay(&input.rgb, &polygon, &placed);
    overlay
        .save(case_dir.join("overlay.png"))
        .context("writing polygon overlay.png")?;

    tracing::info!(points = polygon.len(), segments, "polygon written");
    Ok(())
}

fn prepare_case(common: &CommonArgs, case_name: &str) -> Result<PathBuf> {
    ensure_file_exists(&common.input, "input")?;
    if let Some(cfg) = &common.config {
        ensure_file_exists(cfg, "config")?;
    }

    let case_dir = common.out.join(case_name);
    fs::create_dir_all(&case_dir)
        .with_context(|| format!("creating output directory {}", case_dir.display()))?;

    fs::copy(&common.input, case_dir.join("input.png")).with_context(|| {
        format!(
            "copying input {} -> {}",
            common.input.display(),
            case_dir.join("input.png").display()
        )
    })?;

    Ok(case_dir)
}

fn load_config(path: Option<&Path>) -> Result<MagneticConfig> {
    let Some(path) = path else {
        return Ok(MagneticConfig::default());
    };
    let cfg: MagneticConfig = read_json(path)?;
    cfg.validate()
        .with_context(|| format!("validating config {}", path.display()))?;
    Ok(cfg)
}

fn load_input(path: &Path) -> Result<Input> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let rgb = dyn_img.to_rgb8();
    let (w, h) = rgb.dimensions();
    let data = rgb
        .as_raw()
        .chunks_exact(3)
        .map(|px| [px[0], px[1], px[2]])
        .collect();

    let pixels = Image::from_vec(w as usize, h as usize, data)
        .with_context(|| format!("constructing snap-core image from {}", path.display()))?;
    Ok(Input { rgb, pixels })
}

fn parse_point(s: &str) -> Result<Point2i, String> {
    let parts = parse_ints(s)?;
    match parts.as_slice() {
        &[x, y] => Ok(Point2i::new(x, y)),
        _ => Err(format!("expected `x,y`, got `{s}`")),
    }
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let parts = parse_ints(s)?;
    match parts.as_slice() {
        &[x, y, w, h] => Ok(Rect::new(x, y, w, h)),
        _ => Err(format!("expected `x,y,width,height`, got `{s}`")),
    }
}

fn parse_ints(s: &str) -> Result<Vec<i32>, String> {
    s.split(',')
        .map(|v| {
            v.trim()
                .parse::<i32>()
                .map_err(|e| format!("invalid integer `{v}`: {e}"))
        })
        .collect()
}

fn segment_dto(seg: &EdgeSegment) -> SegmentDto {
    let [start, end] = [seg.start(), seg.end()].map(|p| p.map_or([0, 0], |p| [p.x, p.y]));
    SegmentDto {
        start,
        end,
        cost: seg.cost,
        points: seg.points.iter().map(|p| [p.x, p.y]).collect(),
    }
}

fn save_luma_raw(path: PathBuf, width: usize, height: usize, data: Vec<u8>) -> Result<()> {
    let gray = GrayImage::from_raw(width as u32, height as u32, data)
        .context("constructing GrayImage from raw bytes")?;
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

/// Stretches `data` to 0..=255. Low traversal cost comes out dark.
fn f32_to_u8_vis(data: &[f32]) -> Vec<u8> {
    let (min_v, max_v) = data
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if data.is_empty() || (max_v - min_v).abs() < 1e-12 {
        return vec![0u8; data.len()];
    }

    let scale = 255.0 / (max_v - min_v);
    data.iter()
        .map(|&v| ((v - min_v) * scale).round().clamp(0.0, 255.0) as u8)
        .collect()
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn render_overlay(input: &RgbImage, path: &[Point2i], anchors: &[Point2i]) -> RgbImage {
    let mut rgb = input.clone();
    for p in path {
        put_pixel_checked(&mut rgb, p.x, p.y, Rgb([255, 64, 64]));
    }
    for a in anchors {
        draw_dot(&mut rgb, *a, Rgb([64, 255, 64]));
    }
    rgb
}

fn draw_dot(img: &mut RgbImage, p: Point2i, color: Rgb<u8>) {
    for dy in -1..=1 {
        for dx in -1..=1 {
            put_pixel_checked(img, p.x + dx, p.y + dy, color);
        }
    }
}

fn put_pixel_checked(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x < 0 || y < 0 {
        return;
    }
    let (ux, uy) = (x as u32, y as u32);
    if ux >= img.width() || uy >= img.height() {
        return;
    }
    img.put_pixel(ux, uy, color);
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}
