//! Debug tool for comparing neighbor thresholds visually
//! Renders the classified layout for thresholds 1 through 6 side by side

use std::path::PathBuf;

use clap::Parser;

use hex_cartographer::render::{self, Frame};
use hex_cartographer::{build_topology, logging, raster, tile_io};
use hex_cartographer::{Hex, HexLayout, MapResult, RasterParams, TopologyParams};

#[derive(Parser, Debug)]
#[command(name = "debug_thresholds")]
#[command(about = "Render the classified layout for every neighbor threshold")]
struct Args {
    /// Tile CSV (.csv) or floor-plan image
    input: PathBuf,

    /// Output image
    #[arg(short, long, default_value = "threshold_comparison.png")]
    output: PathBuf,

    /// Hex radius in pixels
    #[arg(long, default_value = "7")]
    hex_radius: f64,

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

fn load_hexes(args: &Args) -> MapResult<Vec<Hex>> {
    let is_csv = args
        .input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        return tile_io::read_tiles_csv(&args.input);
    }

    let params = RasterParams { hex_radius: args.hex_radius, ..Default::default() };
    let img = raster::load_image(&args.input)?;
    Ok(raster::rasterize(&img, &params)?.occupied)
}

fn run(args: &Args) -> MapResult<()> {
    println!("Loading {}...", args.input.display());
    let hexes = load_hexes(args)?;
    let layout = HexLayout::new(args.hex_radius);
    let frame = Frame::fit(&hexes, layout)?;

    let mut images = Vec::new();
    for threshold in 1..=6 {
        let params = TopologyParams { neighbor_threshold: threshold, ..Default::default() };
        let map = build_topology(hexes.iter().copied(), &params)?;
        println!(
            "  T={}: {} rooms, {} junctions, {} edges",
            threshold,
            map.rooms().len(),
            map.junctions().len(),
            map.symmetric_reachability().edge_list().len()
        );

        let label = format!("T={} R:{} J:{}", threshold, map.rooms().len(), map.junctions().len());
        images.push((label, render::render_tiles(&map.tiles, &frame)));
    }

    let grid = render::create_grid(&images, 3);
    render::save_png(&grid, &args.output)?;
    println!("Saved {}", args.output.display());
    Ok(())
}
