use std::time::Instant;

use eframe::{App, Frame};
use egui::{Color32, ColorImage, Pos2, Sense, Stroke, TextureHandle, Vec2};
use heightmap::{GeneratorConfig, Grid};

use crate::render;

// Relief preview height in pixels for a height of 1.0
const RELIEF_HEIGHT: f32 = 60.0;

pub struct HeightmapViewer {
    // slider is for n; size = 2^n + 1
    exp: u32,
    seed: u64,
    roughness: f64,

    // last generated terrain and its texture
    grid: Option<Grid>,
    texture: Option<TextureHandle>,

    status_message: String,
}

impl HeightmapViewer {
    pub fn new(config: GeneratorConfig) -> Self {
        // the slider cannot express a 1×1 grid, fall back to 3×3
        let exp = if config.size > 1 {
            (config.size - 1).trailing_zeros()
        } else {
            1
        };
        Self {
            exp,
            seed: config.seed,
            roughness: config.roughness,
            grid: None,
            texture: None,
            status_message: String::new(),
        }
    }

    fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            size: (1 << self.exp) + 1,
            roughness: self.roughness,
            seed: self.seed,
        }
    }

    fn regenerate(&mut self, ctx: &egui::Context) {
        let start = Instant::now();
        let config = self.config();
        match config.generate() {
            Ok(grid) => {
                let img = render::terrain_rgb(&grid, config.size as f64 * render::SHADE_Z_PER_CELL);
                let color_image = ColorImage::from_rgb([config.size, config.size], img.as_raw());
                self.texture =
                    Some(ctx.load_texture("terrain", color_image, egui::TextureOptions::NEAREST));
                self.grid = Some(grid);

                let elapsed = start.elapsed().as_secs_f32() * 1000.0;
                self.status_message =
                    format!("Generated in {:.2} ms (seed {})", elapsed, self.seed);
            }
            Err(err) => {
                tracing::warn!(error = %err, "viewer.generate_failed");
                self.status_message = format!("Cannot generate: {}", err);
            }
        }
        ctx.request_repaint();
    }

    fn save_png(&mut self) {
        let Some(grid) = &self.grid else {
            self.status_message = "Nothing to save yet".into();
            return;
        };
        let filename = format!("heightmap_{}.png", self.seed);
        let img = render::terrain_rgb(grid, grid.size() as f64 * render::SHADE_Z_PER_CELL);
        self.status_message = match img.save(&filename) {
            Ok(()) => {
                tracing::info!(path = %filename, "viewer.saved_png");
                format!("Saved {}", filename)
            }
            Err(err) => format!("Save failed: {}", err),
        };
    }

    fn draw_relief(&self, ui: &mut egui::Ui, grid: &Grid) {
        let size = grid.size();
        // keep roughly 32 rows regardless of resolution
        let stride = (size / 32).max(1);
        let lines = render::relief_lines(grid, RELIEF_HEIGHT, stride);

        let width = size as f32 * 1.5;
        let height = size as f32 * 0.5 + RELIEF_HEIGHT;
        let (response, painter) = ui.allocate_painter(Vec2::new(width, height), Sense::hover());
        let origin = response.rect.min + Vec2::new(0.0, RELIEF_HEIGHT);

        // back rows first so nearer rows paint over them
        for line in lines {
            let points: Vec<Pos2> = line
                .iter()
                .map(|&[px, py]| origin + Vec2::new(px, py))
                .collect();
            painter.add(egui::Shape::line(points, Stroke::new(1.0, Color32::LIGHT_GRAY)));
        }
    }
}

impl App for HeightmapViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let size = (1usize << self.exp) + 1;

        egui::SidePanel::left("controls").show(ctx, |ui| {
            ui.heading("Diamond–Square Heightmap");
            ui.separator();

            let prev_exp = self.exp;
            ui.horizontal(|ui| {
                ui.label("Resolution 2^n+1:");
                ui.add(
                    egui::Slider::new(&mut self.exp, 1..=10)
                        .text(format!("{}×{}", size, size))
                        .step_by(1.0),
                );
            });
            if prev_exp != self.exp {
                self.texture = None; // reset texture on size change
                self.grid = None;
                self.status_message = "Texture reset due to size change".into();
            }

            ui.label("Seed");
            ui.add(egui::DragValue::new(&mut self.seed).speed(1.0));

            ui.label("Roughness");
            ui.add(egui::Slider::new(&mut self.roughness, 0.0..=2.0));

            ui.separator();

            if ui.button("Generate Terrain").clicked() {
                self.regenerate(ctx);
            }
            if ui.button("Save PNG…").clicked() {
                self.save_png();
            }

            ui.separator();
            ui.label(&self.status_message);
        });

        egui::CentralPanel::default().show(ctx, |ui| match (&self.texture, &self.grid) {
            (Some(tex), Some(grid)) => {
                let side = ui.available_width().min(ui.available_height() * 0.6);
                ui.image((tex.id(), Vec2::splat(side)));
                ui.separator();
                ui.label("Relief:");
                self.draw_relief(ui, grid);
            }
            _ => {
                ui.centered_and_justified(|ui| {
                    ui.label("Click “Generate Terrain” to start");
                });
            }
        });
    }
}
