// ui.rs - Draws published frames and forwards controls to the step driver

use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::warn;

use conway::patterns::PATTERNS;
use conway::{Config, DriverHandle, Frame, FrameKind, Grid};

const BOARD_PIXELS: f32 = 760.0;

pub struct LifeApp {
    runtime: Runtime,
    driver: DriverHandle,
    frames: UnboundedReceiver<Frame>,

    grid: Option<Grid>,
    generation: u64,
    halted: bool,

    // Pending control values, applied when their button is pressed
    width: usize,
    height: usize,
    ratio: f64,
    interval_ms: i64,
    selected_pattern: usize,

    live_color: Color32,
    dead_color: Color32,
    error: Option<String>,
}

impl LifeApp {
    pub fn new(
        runtime: Runtime,
        driver: DriverHandle,
        frames: UnboundedReceiver<Frame>,
        config: &Config,
    ) -> Self {
        Self {
            runtime,
            driver,
            frames,
            grid: None,
            generation: 0,
            halted: false,
            width: config.width,
            height: config.height,
            ratio: config.ratio,
            interval_ms: config.interval_ms,
            selected_pattern: 0,
            live_color: Color32::from_rgb(0, 200, 0),
            dead_color: Color32::from_rgb(40, 40, 40),
            error: None,
        }
    }

    fn drain_frames(&mut self) {
        while let Ok(frame) = self.frames.try_recv() {
            self.halted = frame.kind == FrameKind::Halted;
            self.generation = frame.generation;
            self.grid = Some(frame.grid);
        }
    }

    fn report<T>(&mut self, result: conway::Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.error = None;
                Some(value)
            }
            Err(err) => {
                warn!(%err, "command failed");
                self.error = Some(err.to_string());
                None
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let running = self.driver.is_running();

        ui.horizontal(|ui| {
            let button_text = if running { "⏹ Stop" } else { "▶ Start" };
            if ui.button(button_text).clicked() {
                let result = if running {
                    self.runtime.block_on(self.driver.stop())
                } else {
                    self.runtime.block_on(self.driver.start())
                };
                self.report(result);
            }

            if ui.button("Clear").clicked() {
                let result = self.runtime.block_on(self.driver.clear());
                self.report(result);
            }

            ui.separator();

            ui.add(egui::Slider::new(&mut self.ratio, 0.0..=1.0).text("ratio"));
            if ui.button("🎲 Random").clicked() {
                let result = self.runtime.block_on(self.driver.randomize(self.ratio));
                self.report(result);
            }

            ui.separator();

            ui.label(format!("Generation: {}", self.generation));
            if self.halted {
                ui.colored_label(Color32::YELLOW, "halted: repeat detected");
            }
        });

        ui.horizontal(|ui| {
            ui.label("Size:");
            ui.add(egui::DragValue::new(&mut self.width).clamp_range(1..=400));
            ui.label("x");
            ui.add(egui::DragValue::new(&mut self.height).clamp_range(1..=400));
            if ui.button("Resize").clicked() {
                let result = self.runtime.block_on(self.driver.resize(self.width, self.height));
                self.report(result);
            }

            ui.separator();

            ui.label("Interval (ms):");
            ui.add(egui::DragValue::new(&mut self.interval_ms).clamp_range(0..=5000));
            if ui.button("Set").clicked() {
                let result = self.runtime.block_on(self.driver.set_interval(self.interval_ms));
                self.report(result);
            }

            ui.separator();

            ui.label("Pattern:");
            egui::ComboBox::from_id_source("pattern_selector")
                .selected_text(PATTERNS[self.selected_pattern].name)
                .show_ui(ui, |ui| {
                    for (i, pattern) in PATTERNS.iter().enumerate() {
                        ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                    }
                });
            if ui.button("Apply").clicked() {
                let name = PATTERNS[self.selected_pattern].name;
                let result = self.runtime.block_on(self.driver.load_pattern(name));
                self.report(result);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Live:");
            ui.color_edit_button_srgba(&mut self.live_color);
            ui.label("Dead:");
            ui.color_edit_button_srgba(&mut self.dead_color);
        });

        if let Some(error) = &self.error {
            ui.colored_label(Color32::RED, error.as_str());
        }
    }

    fn board(&mut self, ui: &mut egui::Ui) {
        let Some(grid) = &self.grid else {
            ui.label("Waiting for the first frame...");
            return;
        };

        let cells = grid.width().max(grid.height()) as f32;
        let spacing = 0.5;
        let box_size = (BOARD_PIXELS / cells - spacing).clamp(1.0, 24.0);
        let pitch = box_size + spacing;
        let total_size = Vec2::new(
            pitch * grid.width() as f32 - spacing,
            pitch * grid.height() as f32 - spacing,
        );

        let (response, painter) = ui.allocate_painter(total_size, egui::Sense::click());
        let origin = response.rect.min;
        painter.rect_filled(response.rect, 0.0, Color32::BLACK);

        for (row, row_cells) in grid.rows().iter().enumerate() {
            for (col, &alive) in row_cells.iter().enumerate() {
                let rect = Rect::from_min_size(
                    origin + Vec2::new(col as f32 * pitch, row as f32 * pitch),
                    Vec2::splat(box_size),
                );
                let color = if alive { self.live_color } else { self.dead_color };
                painter.rect_filled(rect, 1.0, color);
                if box_size > 4.0 {
                    painter.rect_stroke(rect, 1.0, Stroke::new(0.2, Color32::from_gray(60)));
                }
            }
        }

        let population = grid.population();
        let (width, height) = (grid.width(), grid.height());
        let total = width * height;

        // Cell edits are only accepted between runs
        let clicked_cell = response
            .clicked()
            .then(|| response.interact_pointer_pos())
            .flatten()
            .map(|pos| pos - origin)
            .map(|offset| ((offset.y / pitch) as usize, (offset.x / pitch) as usize))
            .filter(|&(row, col)| row < height && col < width);
        if let Some((row, col)) = clicked_cell {
            if !self.driver.is_running() {
                let result = self.runtime.block_on(self.driver.toggle_cell(row, col));
                self.report(result);
            }
        }

        ui.separator();
        ui.horizontal(|ui| {
            ui.label(format!("Live cells: {population}"));
            ui.label(format!("Dead cells: {}", total - population));
            ui.label(format!(
                "Population: {:.1}%",
                population as f32 / total as f32 * 100.0
            ));
        });
    }
}

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_frames();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway's Game of Life");
            self.controls(ui);
            ui.separator();
            ui.label("Click cells to toggle them while stopped. A run halts once it revisits a state.");
            ui.separator();
            self.board(ui);
        });
    }
}
