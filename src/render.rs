//! PNG rendering of hex maps and topology graphs
//!
//! Every image is drawn per pixel: each pixel centre is mapped back to the
//! hex containing it, which keeps hex fills and outlines consistent with
//! rasterization.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use image::{GrayImage, ImageBuffer, Rgb, RgbImage};

use crate::classify::Category;
use crate::error::{MapError, MapResult};
use crate::graph::TopologyGraph;
use crate::hex::{Hex, HexLayout};
use crate::tiles::{TileSet, TileState};

pub const ROOM_COLOR: Rgb<u8> = Rgb([40, 70, 220]);
pub const JUNCTION_COLOR: Rgb<u8> = Rgb([220, 40, 40]);
pub const TUNNEL_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const OUTLINE: Rgb<u8> = Rgb([90, 120, 255]);
const UNCLASSIFIED: Rgb<u8> = Rgb([150, 150, 150]);
const EDGE_COLOR: Rgb<u8> = Rgb([60, 60, 60]);

/// Largest canvas `Frame::fit` will produce, in pixels
pub const MAX_FRAME_PIXELS: u64 = 1 << 26;

/// Visible window onto cartesian space, one pixel per unit, y up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub layout: HexLayout,
    pub min_x: f64,
    pub max_y: f64,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Frame matching a source image, with the origin at its bottom-left.
    pub fn for_image(width: u32, height: u32, layout: HexLayout) -> Self {
        Self {
            layout,
            min_x: 0.0,
            max_y: height as f64,
            width,
            height,
        }
    }

    /// Smallest frame holding every tile, padded by one tile.
    ///
    /// Fails if the canvas would exceed `MAX_FRAME_PIXELS`.
    pub fn fit(hexes: &[Hex], layout: HexLayout) -> MapResult<Self> {
        if hexes.is_empty() {
            return Ok(Self::for_image(1, 1, layout));
        }

        let (tile_w, tile_h) = layout.tile_size();
        let mut min_x = f64::MAX;
        let mut max_x = f64::MIN;
        let mut min_y = f64::MAX;
        let mut max_y = f64::MIN;
        for &hex in hexes {
            let (x, y) = layout.to_pixel(hex);
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        min_x -= tile_w;
        max_x += tile_w;
        min_y -= tile_h;
        max_y += tile_h;

        let width = (max_x - min_x).ceil().max(1.0);
        let height = (max_y - min_y).ceil().max(1.0);
        if width * height > MAX_FRAME_PIXELS as f64 {
            return Err(MapError::InvalidConfig(format!(
                "map spans {}x{} pixels, more than the {} pixel limit; lower the hex radius",
                width, height, MAX_FRAME_PIXELS
            )));
        }

        Ok(Self {
            layout,
            min_x: min_x.floor(),
            max_y: max_y.ceil(),
            width: width as u32,
            height: height as u32,
        })
    }

    fn index(&self, px: u32, py: u32) -> usize {
        py as usize * self.width as usize + px as usize
    }

    /// Cartesian position of a pixel centre.
    pub fn world(&self, px: u32, py: u32) -> (f64, f64) {
        (self.min_x + px as f64 + 0.5, self.max_y - py as f64 - 0.5)
    }

    /// Pixel containing a cartesian point (may be off-canvas).
    pub fn pixel(&self, x: f64, y: f64) -> (i64, i64) {
        ((x - self.min_x).floor() as i64, (self.max_y - y).floor() as i64)
    }

    pub fn hex_at(&self, px: u32, py: u32) -> Hex {
        let (x, y) = self.world(px, py);
        self.layout.from_pixel(x, y)
    }

    /// Hex under every pixel, row by row.
    fn hex_grid(&self) -> Vec<Hex> {
        let mut grid = Vec::with_capacity(self.width as usize * self.height as usize);
        for py in 0..self.height {
            for px in 0..self.width {
                grid.push(self.hex_at(px, py));
            }
        }
        grid
    }
}

/// True if the pixel to the right or below lies in another hex.
fn on_boundary(grid: &[Hex], frame: &Frame, px: u32, py: u32) -> bool {
    let idx = frame.index(px, py);
    let here = grid[idx];
    let right = px + 1 < frame.width && grid[idx + 1] != here;
    let below = py + 1 < frame.height && grid[idx + frame.width as usize] != here;
    right || below
}

pub fn state_color(state: TileState) -> Rgb<u8> {
    match state {
        TileState::Room => ROOM_COLOR,
        TileState::Junction => JUNCTION_COLOR,
        TileState::Tunnel => TUNNEL_COLOR,
        TileState::Unexplored | TileState::Explored => UNCLASSIFIED,
    }
}

pub fn category_color(category: Category) -> Rgb<u8> {
    state_color(category.tile_state())
}

/// Classified layout: rooms blue, junctions red, tunnels black.
pub fn render_tiles(tiles: &TileSet, frame: &Frame) -> RgbImage {
    let grid = frame.hex_grid();
    ImageBuffer::from_fn(frame.width, frame.height, |px, py| {
        let hex = grid[frame.index(px, py)];
        match tiles.state_of(hex) {
            None => BACKGROUND,
            Some(_) if on_boundary(&grid, frame, px, py) => OUTLINE,
            Some(state) => state_color(state),
        }
    })
}

/// Occupied hexes filled black.
pub fn render_occupancy(occupied: &[Hex], frame: &Frame) -> RgbImage {
    let occupied: HashSet<Hex> = occupied.iter().copied().collect();
    ImageBuffer::from_fn(frame.width, frame.height, |px, py| {
        if occupied.contains(&frame.hex_at(px, py)) {
            TUNNEL_COLOR
        } else {
            BACKGROUND
        }
    })
}

/// Source image with the hex lattice outlined on top.
pub fn render_lattice(source: &GrayImage, frame: &Frame) -> RgbImage {
    let grid = frame.hex_grid();
    ImageBuffer::from_fn(frame.width, frame.height, |px, py| {
        if on_boundary(&grid, frame, px, py) {
            return OUTLINE;
        }
        match source.get_pixel_checked(px, py) {
            Some(p) => Rgb([p.0[0], p.0[0], p.0[0]]),
            None => BACKGROUND,
        }
    })
}

/// Vertices as discs sized by region size, edges as straight lines.
pub fn render_graph(graph: &TopologyGraph, frame: &Frame) -> RgbImage {
    let mut img: RgbImage = ImageBuffer::from_pixel(frame.width, frame.height, BACKGROUND);

    let positions: HashMap<_, _> = graph
        .vertices
        .iter()
        .map(|v| (v.label, frame.pixel(v.x, v.y)))
        .collect();

    for edge in &graph.edges {
        if let (Some(&a), Some(&b)) = (positions.get(&edge.source), positions.get(&edge.target)) {
            draw_line(&mut img, a, b, EDGE_COLOR);
        }
    }

    for vertex in &graph.vertices {
        let (cx, cy) = positions[&vertex.label];
        let radius = 2.0 + (vertex.size as f64).sqrt();
        fill_circle(&mut img, cx, cy, radius, category_color(vertex.category));
    }

    img
}

pub fn save_png(img: &RgbImage, path: &Path) -> MapResult<()> {
    img.save(path)?;
    Ok(())
}

fn put_checked(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_checked(img, x, y, color);
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn fill_circle(img: &mut RgbImage, cx: i64, cy: i64, radius: f64, color: Rgb<u8>) {
    let r = radius.ceil() as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            if ((dx * dx + dy * dy) as f64) <= radius * radius {
                put_checked(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Lay labeled images out in a grid. Cells take the size of the largest image.
pub fn create_grid(images: &[(String, RgbImage)], cols: usize) -> RgbImage {
    if images.is_empty() || cols == 0 {
        return ImageBuffer::new(1, 1);
    }

    let cell_width = images.iter().map(|(_, img)| img.width()).max().unwrap_or(1);
    let cell_height = images.iter().map(|(_, img)| img.height()).max().unwrap_or(1);
    let label_height = 20u32;
    let total_cell_height = cell_height + label_height;
    let rows = images.len().div_ceil(cols);

    let mut grid: RgbImage = ImageBuffer::from_pixel(
        cell_width * cols as u32,
        total_cell_height * rows as u32,
        Rgb([40, 40, 40]),
    );

    for (idx, (name, img)) in images.iter().enumerate() {
        let x_offset = (idx % cols) as u32 * cell_width;
        let label_y = (idx / cols) as u32 * total_cell_height;

        for (x, y, pixel) in img.enumerate_pixels() {
            grid.put_pixel(x_offset + x, label_y + label_height + y, *pixel);
        }

        draw_text(&mut grid, x_offset + 5, label_y + 6, name);
    }

    grid
}

fn draw_text(img: &mut RgbImage, x: u32, y: u32, text: &str) {
    let color = Rgb([220, 220, 220]);
    for (i, c) in text.chars().enumerate() {
        let bitmap = glyph(c);
        let cx = x + i as u32 * 6;
        for (row, bits) in bitmap.iter().enumerate() {
            for col in 0..5u32 {
                if (bits >> (4 - col)) & 1 == 1 {
                    put_checked(img, (cx + col) as i64, (y + row as u32) as i64, color);
                }
            }
        }
    }
}

// 5x7 bitmap font, just the characters the grid labels use
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        '=' => [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000],
        _ => [0; 7],
    }
}
