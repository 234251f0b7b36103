//! Floor-plan rasterization onto the hex lattice
//!
//! Every pixel is assigned to the hex containing its centre, and each hex
//! tallies how many of its pixels are floor. Occupancy is then decided
//! either by a plain ratio cutoff or by error-diffusion dithering, which
//! carries each hex's rounding error forward to hexes not yet decided.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use image::{DynamicImage, GrayImage};

use crate::error::MapResult;
use crate::hex::{Hex, HexLayout};
use crate::params::{OccupancyMode, RasterParams};

/// Luma below this is dark
const DARK_LUMA: u8 = 128;

/// Value above which a dithered hex is occupied
const DITHER_THRESHOLD: f32 = 0.5;

/// Error-diffusion weights: east, then the two neighbors in the next row
const DIFFUSION: [(usize, f32); 3] = [(0, 0.5), (1, 0.25), (2, 0.25)];

/// Floor and non-floor pixel counts for one hex
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelTally {
    pub filled: u32,
    pub empty: u32,
}

impl PixelTally {
    pub fn total(&self) -> u32 {
        self.filled + self.empty
    }

    /// Fraction of the hex's pixels that are floor.
    pub fn ratio(&self) -> f32 {
        if self.total() == 0 {
            0.0
        } else {
            self.filled as f32 / self.total() as f32
        }
    }
}

/// Result of rasterizing one image
#[derive(Clone, Debug)]
pub struct Rasterized {
    /// Every hex touched by the image, in row-major order
    pub tallies: BTreeMap<Hex, PixelTally>,
    pub occupied: Vec<Hex>,
    pub width: u32,
    pub height: u32,
}

/// Open a floor-plan image.
pub fn load_image(path: &Path) -> MapResult<DynamicImage> {
    Ok(image::open(path)?)
}

/// Tally pixels per hex. Image rows are flipped so y grows upward.
pub fn tally_pixels(
    img: &GrayImage,
    layout: &HexLayout,
    dark_is_floor: bool,
) -> BTreeMap<Hex, PixelTally> {
    let mut tallies: BTreeMap<Hex, PixelTally> = BTreeMap::new();
    let height = img.height();

    for (x, y, pixel) in img.enumerate_pixels() {
        let cx = x as f64 + 0.5;
        let cy = (height - 1 - y) as f64 + 0.5;
        let hex = layout.from_pixel(cx, cy);

        let dark = pixel.0[0] < DARK_LUMA;
        let tally = tallies.entry(hex).or_default();
        if dark == dark_is_floor {
            tally.filled += 1;
        } else {
            tally.empty += 1;
        }
    }

    tallies
}

/// Hexes whose floor ratio is strictly above `cutoff`.
pub fn occupied_by_cutoff(tallies: &BTreeMap<Hex, PixelTally>, cutoff: f32) -> Vec<Hex> {
    tallies
        .iter()
        .filter(|(_, t)| t.ratio() > cutoff)
        .map(|(&h, _)| h)
        .collect()
}

/// Error-diffusion dithering in row-major order.
///
/// Error pushed toward hexes outside the tallied area is dropped.
pub fn occupied_by_dither(tallies: &BTreeMap<Hex, PixelTally>) -> Vec<Hex> {
    let mut carried: HashMap<Hex, f32> = HashMap::new();
    let mut occupied = Vec::new();

    for (&hex, tally) in tallies {
        let value = tally.ratio() + carried.remove(&hex).unwrap_or(0.0);
        let on = value > DITHER_THRESHOLD;
        if on {
            occupied.push(hex);
        }

        let error = value - if on { 1.0 } else { 0.0 };
        for (direction, weight) in DIFFUSION {
            let target = hex.offset(direction, 1);
            if tallies.contains_key(&target) {
                *carried.entry(target).or_insert(0.0) += error * weight;
            }
        }
    }

    occupied
}

/// Rasterize an image with the given parameters.
pub fn rasterize(img: &DynamicImage, params: &RasterParams) -> MapResult<Rasterized> {
    params.validate()?;

    let gray = img.to_luma8();
    let layout = HexLayout::new(params.hex_radius);
    let tallies = tally_pixels(&gray, &layout, params.dark_is_floor);

    let occupied = match params.occupancy {
        OccupancyMode::Cutoff => occupied_by_cutoff(&tallies, params.cutoff),
        OccupancyMode::Dither => occupied_by_dither(&tallies),
    };

    tracing::info!(
        hexes = tallies.len(),
        occupied = occupied.len(),
        mode = %params.occupancy,
        "rasterized floor plan"
    );

    Ok(Rasterized {
        tallies,
        occupied,
        width: gray.width(),
        height: gray.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn uniform_tallies(width: i32, height: i32, filled: u32, empty: u32) -> BTreeMap<Hex, PixelTally> {
        let mut tallies = BTreeMap::new();
        for r in 0..height {
            for q in 0..width {
                tallies.insert(Hex::axial(q, r), PixelTally { filled, empty });
            }
        }
        tallies
    }

    #[test]
    fn test_ratio() {
        assert_eq!(PixelTally::default().ratio(), 0.0);
        assert!((PixelTally { filled: 1, empty: 3 }.ratio() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_all_dark_image_is_fully_occupied() {
        let img = GrayImage::from_pixel(60, 60, Luma([0]));
        let layout = HexLayout::new(5.0);
        let tallies = tally_pixels(&img, &layout, true);

        let total: u32 = tallies.values().map(|t| t.total()).sum();
        assert_eq!(total, 3600);
        assert_eq!(occupied_by_cutoff(&tallies, 0.22).len(), tallies.len());

        let inverted = tally_pixels(&img, &layout, false);
        assert!(occupied_by_cutoff(&inverted, 0.22).is_empty());
    }

    #[test]
    fn test_left_half_dark() {
        let img = GrayImage::from_fn(60, 60, |x, _| if x < 30 { Luma([10]) } else { Luma([240]) });
        let params = RasterParams { hex_radius: 5.0, ..Default::default() };
        let result = rasterize(&DynamicImage::ImageLuma8(img), &params).unwrap();

        let layout = HexLayout::new(5.0);
        assert!(result.occupied.contains(&layout.from_pixel(10.0, 30.0)));
        assert!(!result.occupied.contains(&layout.from_pixel(50.0, 30.0)));
        assert_eq!((result.width, result.height), (60, 60));
    }

    #[test]
    fn test_cutoff_is_strict() {
        let tallies = uniform_tallies(2, 1, 1, 3);
        assert!(occupied_by_cutoff(&tallies, 0.25).is_empty());
        assert_eq!(occupied_by_cutoff(&tallies, 0.2).len(), 2);
    }

    #[test]
    fn test_dither_preserves_density() {
        // A quarter-filled field would vanish under a 0.5 cutoff
        let tallies = uniform_tallies(20, 20, 1, 3);
        assert!(occupied_by_cutoff(&tallies, 0.5).is_empty());

        let dithered = occupied_by_dither(&tallies);
        assert!((85..=105).contains(&dithered.len()), "got {}", dithered.len());
    }

    #[test]
    fn test_dither_extremes() {
        assert!(occupied_by_dither(&uniform_tallies(5, 5, 0, 9)).is_empty());
        assert_eq!(occupied_by_dither(&uniform_tallies(5, 5, 9, 0)).len(), 25);
    }
}
