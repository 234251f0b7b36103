use std::fs;
use std::path::PathBuf;

use clap::Parser;

use hex_cartographer::graph::TopologyGraph;
use hex_cartographer::render::{self, Frame};
use hex_cartographer::{build_topology, logging, raster, tile_io};
use hex_cartographer::{Category, HexLayout, MapConfig, MapError, MapResult, OccupancyMode};

#[derive(Parser, Debug)]
#[command(name = "hex_cartographer")]
#[command(about = "Turn a floor-plan image into a labeled hex map and room graph")]
struct Args {
    /// Floor-plan image to rasterize (dark pixels are floor)
    #[arg(short, long, conflicts_with = "tiles", required_unless_present = "tiles")]
    image: Option<PathBuf>,

    /// Occupied tiles as q,r,s CSV rows, skipping rasterization
    #[arg(short, long)]
    tiles: Option<PathBuf>,

    /// JSON configuration file (flags below override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for all outputs
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Hex radius in pixels
    #[arg(long)]
    hex_radius: Option<f64>,

    /// Filled-pixel ratio above which a hex is occupied
    #[arg(long)]
    cutoff: Option<f32>,

    /// Decide occupancy with error-diffusion dithering instead of the cutoff
    #[arg(long)]
    dither: bool,

    /// Occupied neighbors a tile needs for the flood fill to pass through it
    #[arg(long)]
    neighbor_threshold: Option<usize>,

    /// Minimum tiles for a room
    #[arg(long)]
    min_room: Option<usize>,

    /// Minimum tiles for a junction
    #[arg(long)]
    min_junction: Option<usize>,

    /// Skip PNG output
    #[arg(long)]
    no_render: bool,

    /// Log more detail (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> MapResult<MapConfig> {
    let mut config = match &args.config {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    };

    if let Some(radius) = args.hex_radius {
        config.raster.hex_radius = radius;
    }
    if let Some(cutoff) = args.cutoff {
        config.raster.cutoff = cutoff;
    }
    if args.dither {
        config.raster.occupancy = OccupancyMode::Dither;
    }
    if let Some(threshold) = args.neighbor_threshold {
        config.topology.neighbor_threshold = threshold;
    }
    if let Some(min_room) = args.min_room {
        config.topology.min_room = min_room;
    }
    if let Some(min_junction) = args.min_junction {
        config.topology.min_junction = min_junction;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> MapResult<()> {
    let config = load_config(args)?;
    let out = args.out_dir.as_path();
    fs::create_dir_all(out).map_err(|e| MapError::io(out, e))?;

    let layout = HexLayout::new(config.raster.hex_radius);
    let draw = !args.no_render;

    let (hexes, image_frame) = match (&args.image, &args.tiles) {
        (Some(image_path), _) => {
            println!("Rasterizing {}...", image_path.display());
            let img = raster::load_image(image_path)?;
            let rasterized = raster::rasterize(&img, &config.raster)?;
            println!(
                "  {} hexes, {} occupied ({} mode)",
                rasterized.tallies.len(),
                rasterized.occupied.len(),
                config.raster.occupancy
            );

            tile_io::write_tiles_csv(&out.join("mapped.csv"), &rasterized.occupied)?;

            let frame = Frame::for_image(rasterized.width, rasterized.height, layout);
            if draw {
                let lattice = render::render_lattice(&img.to_luma8(), &frame);
                render::save_png(&lattice, &out.join("hexagons.png"))?;
                let mapped = render::render_occupancy(&rasterized.occupied, &frame);
                render::save_png(&mapped, &out.join("mapped.png"))?;
            }
            (rasterized.occupied, Some(frame))
        }
        (None, Some(tiles_path)) => {
            println!("Reading tiles from {}...", tiles_path.display());
            (tile_io::read_tiles_csv(tiles_path)?, None)
        }
        (None, None) => {
            return Err(MapError::InvalidConfig("either --image or --tiles is required".into()));
        }
    };

    println!("Building topology from {} tiles...", hexes.len());
    let map = build_topology(hexes, &config.topology)?;
    println!(
        "  {} rooms ({} tiles), {} junctions ({} tiles), {} tunnel tiles",
        map.rooms().len(),
        map.tile_count(Category::Room),
        map.junctions().len(),
        map.tile_count(Category::Junction),
        map.tile_count(Category::Tunnel)
    );

    let asymmetric = map.reachability.asymmetric_pairs();
    if !asymmetric.is_empty() {
        println!("  Warning: {} one-way reachability pairs, mirroring them", asymmetric.len());
    }

    tile_io::write_labeled_csv(&out.join("labeled.csv"), &map.classification)?;

    let graph = TopologyGraph::from_topology(&map, &layout);
    graph.save_json(&out.join("graph.json"))?;
    println!("  Graph: {} vertices, {} edges", graph.vertices.len(), graph.edges.len());

    if draw {
        let frame = match image_frame {
            Some(frame) => frame,
            None => Frame::fit(map.tiles.hexes(), layout)?,
        };
        render::save_png(&render::render_tiles(&map.tiles, &frame), &out.join("floodfilled.png"))?;
        render::save_png(&render::render_graph(&graph, &frame), &out.join("graph.png"))?;
    }

    println!("Wrote outputs to {}", out.display());
    Ok(())
}

