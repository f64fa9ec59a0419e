// Turns a finished heightmap into pictures: colour raster, grayscale raster
// and the side-on relief lines drawn by the viewer.

use heightmap::Grid;
use image::{GrayImage, Luma, Rgb, RgbImage};
use palette::{Gradient, LinSrgb};

// Light direction for the hillshade, both 45°
const AZIMUTH: f64 = std::f64::consts::FRAC_PI_4;
const ALTITUDE: f64 = std::f64::consts::FRAC_PI_4;
// Hillshade exaggeration per cell of grid size
pub const SHADE_Z_PER_CELL: f64 = 0.25;

// Height colour ramp, water through lowland and rock up to snow
fn terrain_gradient() -> Gradient<LinSrgb> {
    Gradient::with_domain(vec![
        (0.00, LinSrgb::new(0.2, 0.2, 0.6)),  // deep water
        (0.15, LinSrgb::new(0.0, 0.6, 1.0)),  // shallow water
        (0.25, LinSrgb::new(0.0, 0.8, 0.4)),  // lowland
        (0.50, LinSrgb::new(1.0, 1.0, 0.6)),  // dry upland
        (0.75, LinSrgb::new(0.5, 0.36, 0.33)), // rock
        (1.00, LinSrgb::new(1.0, 1.0, 1.0)),  // snow
    ])
}

// Lambertian shade per cell in [0, 1].
// Border cells reuse the nearest in-bounds neighbour for their slopes.
pub fn hillshade(grid: &Grid, z_scale: f64) -> Vec<f64> {
    let size = grid.size();
    let mut shade = vec![1.0; grid.len()];
    if size < 2 {
        return shade;
    }

    let (sin_alt, cos_alt) = ALTITUDE.sin_cos();
    let lx = AZIMUTH.cos() * cos_alt;
    let ly = AZIMUTH.sin() * cos_alt;
    let lz = sin_alt;

    for y in 0..size {
        for x in 0..size {
            let (x0, x1) = (x.saturating_sub(1), (x + 1).min(size - 1));
            let (y0, y1) = (y.saturating_sub(1), (y + 1).min(size - 1));
            let dzdx = (grid.get(x1, y) - grid.get(x0, y)) / (x1 - x0) as f64 * z_scale;
            let dzdy = (grid.get(x, y1) - grid.get(x, y0)) / (y1 - y0) as f64 * z_scale;

            let (nx, ny, nz) = (-dzdx, -dzdy, 1.0);
            let len = (nx * nx + ny * ny + nz * nz).sqrt();
            shade[y * size + x] = ((nx * lx + ny * ly + nz * lz) / len).max(0.0);
        }
    }
    shade
}

// Colour raster with hillshade. `z_scale` is the vertical exaggeration;
// heights are in [0, 1] while the grid spans `size` cells.
pub fn terrain_rgb(grid: &Grid, z_scale: f64) -> RgbImage {
    let size = grid.size();
    let gradient = terrain_gradient();
    let shade = hillshade(grid, z_scale);

    let mut img = RgbImage::new(size as u32, size as u32);
    for (i, &h) in grid.as_slice().iter().enumerate() {
        let col: LinSrgb = gradient.get(h.clamp(0.0, 1.0) as f32);
        let rgb = col.into_format::<u8>();
        let light = (shade[i] * 0.5 + 0.5).clamp(0.0, 1.0);
        let pixel = Rgb([
            (rgb.red as f64 * light) as u8,
            (rgb.green as f64 * light) as u8,
            (rgb.blue as f64 * light) as u8,
        ]);
        img.put_pixel((i % size) as u32, (i / size) as u32, pixel);
    }
    img
}

// 0 → black, 1 → white
pub fn grayscale(grid: &Grid) -> GrayImage {
    let size = grid.size();
    let mut img = GrayImage::new(size as u32, size as u32);
    for (i, &h) in grid.as_slice().iter().enumerate() {
        let gray = (h.clamp(0.0, 1.0) * 255.0).round() as u8;
        img.put_pixel((i % size) as u32, (i / size) as u32, Luma([gray]));
    }
    img
}

// Oblique side view: one polyline per sampled row, each row shifted right
// and down by half a cell per row so the surface reads as 3D.
// Points are [screen_x, screen_y] with y growing downwards.
pub fn relief_lines(grid: &Grid, height_scale: f32, row_stride: usize) -> Vec<Vec<[f32; 2]>> {
    let size = grid.size();
    (0..size)
        .step_by(row_stride.max(1))
        .map(|y| {
            let shift = y as f32 * 0.5;
            (0..size)
                .map(|x| {
                    let h = grid.get(x, y) as f32;
                    [x as f32 + shift, shift - h * height_scale]
                })
                .collect()
        })
        .collect()
}
