use ascii_rendr::loader::load_rgb;
use ascii_rendr::{AsciiArt, AsciiConverter, ColorMode, ConversionConfig, FontSpec, ImageSource};
use eframe::egui;
use image::RgbImage;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Output width range and step, in characters
const WIDTH_RANGE: std::ops::RangeInclusive<u32> = 60..=400;
const WIDTH_STEP: u32 = 20;

/// Contrast and brightness range and step
const TONE_RANGE: std::ops::RangeInclusive<f32> = 0.5..=2.0;
const TONE_STEP: f32 = 0.1;

/// Session settings edited through the control panel
///
/// Turned into a fresh `ConversionConfig` for every conversion.
#[derive(Debug, Clone, PartialEq)]
struct Settings {
    width: u32,
    contrast: f32,
    brightness: f32,
    color_mode: ColorMode,
    font_path: Option<PathBuf>,
    font_size: f32,
}

impl Default for Settings {
    fn default() -> Self {
        let config = ConversionConfig::default();
        Self {
            width: config.output_width,
            contrast: config.contrast,
            brightness: config.brightness,
            color_mode: config.color_mode,
            font_path: config.font.path,
            font_size: config.font.size,
        }
    }
}

impl Settings {
    fn to_config(&self) -> ConversionConfig {
        ConversionConfig {
            output_width: self.width,
            contrast: self.contrast,
            brightness: self.brightness,
            color_mode: self.color_mode,
            font: FontSpec {
                path: self.font_path.clone(),
                size: self.font_size,
                ..FontSpec::default()
            },
        }
    }

    fn summary(&self) -> String {
        format!(
            "Width={}, Contrast={:.1}, Brightness={:.1}, Mode={}",
            self.width, self.contrast, self.brightness, self.color_mode
        )
    }
}

/// Main application state for the ASCII renderer GUI
pub struct AsciiApp {
    /// Input image (original)
    input_image: Option<RgbImage>,
    /// Last conversion result
    output: Option<AsciiArt>,
    /// Conversion settings
    settings: Settings,

    /// Texture handle for input image display
    input_texture: Option<egui::TextureHandle>,
    /// Texture handle for output image display
    output_texture: Option<egui::TextureHandle>,

    /// Whether to automatically reprocess when parameters change
    auto_process: bool,
    /// Flag indicating parameters have changed and reprocessing is needed
    needs_reprocess: bool,

    /// Last processing time in milliseconds
    last_process_time_ms: f64,
    /// Error message to display (if any)
    error_message: Option<String>,
}

impl Default for AsciiApp {
    fn default() -> Self {
        Self {
            input_image: None,
            output: None,
            settings: Settings::default(),
            input_texture: None,
            output_texture: None,
            auto_process: true,
            needs_reprocess: false,
            last_process_time_ms: 0.0,
            error_message: None,
        }
    }
}

impl AsciiApp {
    /// Create a new ASCII renderer application
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    /// Load an image from file path
    pub fn load_image(&mut self, path: &Path) {
        match load_rgb(ImageSource::Path(path)) {
            Ok(rgb) => {
                info!("Opened {} ({}x{})", path.display(), rgb.width(), rgb.height());
                self.input_image = Some(rgb);
                self.output = None;
                self.input_texture = None; // Clear old texture
                self.output_texture = None;
                self.needs_reprocess = true;
                self.error_message = None;
            }
            Err(e) => {
                self.error_message = Some(format!("Failed to load image: {}", e));
            }
        }
    }

    /// Save the rendered ASCII image to file
    pub fn save_output(&self, path: &Path) -> Result<(), String> {
        match &self.output {
            Some(art) => art
                .save_image(path)
                .map_err(|e| format!("Failed to save: {}", e)),
            None => Err("No output image to save".to_string()),
        }
    }

    /// Save the ASCII text to file
    pub fn save_text(&self, path: &Path) -> Result<(), String> {
        match &self.output {
            Some(art) => art
                .save_text(path)
                .map_err(|e| format!("Failed to save: {}", e)),
            None => Err("No ASCII text to save".to_string()),
        }
    }

    /// Process the input image with current settings
    fn process(&mut self) {
        let Some(ref input) = self.input_image else {
            return;
        };
        let start = Instant::now();

        let result = AsciiConverter::new(self.settings.to_config())
            .and_then(|converter| converter.convert(input));

        match result {
            Ok(art) => {
                self.last_process_time_ms = start.elapsed().as_secs_f64() * 1000.0;
                self.output = Some(art);
                self.output_texture = None; // Clear old texture
                self.error_message = None;
            }
            Err(e) => {
                warn!("Conversion failed: {}", e);
                self.output = None;
                self.output_texture = None;
                self.error_message = Some(format!("Conversion failed: {}", e));
            }
        }
        self.needs_reprocess = false;
    }

    /// Render the control panel UI
    fn render_controls(&mut self, ui: &mut egui::Ui) -> bool {
        let before = self.settings.clone();

        ui.heading("Controls");
        ui.separator();

        ui.collapsing("Size", |ui| {
            ui.add(
                egui::Slider::new(&mut self.settings.width, WIDTH_RANGE)
                    .step_by(WIDTH_STEP as f64)
                    .text("Width"),
            )
            .on_hover_text("Characters per line");

            ui.horizontal(|ui| {
                if ui.button("Width -").clicked() {
                    self.settings.width = self
                        .settings
                        .width
                        .saturating_sub(WIDTH_STEP)
                        .max(*WIDTH_RANGE.start());
                }
                if ui.button("Width +").clicked() {
                    self.settings.width = (self.settings.width + WIDTH_STEP).min(*WIDTH_RANGE.end());
                }
            });
        });

        ui.add_space(8.0);

        ui.collapsing("Tone", |ui| {
            ui.add(
                egui::Slider::new(&mut self.settings.contrast, TONE_RANGE)
                    .step_by(TONE_STEP as f64)
                    .text("Contrast"),
            )
            .on_hover_text("Spread of values around the image mean");

            ui.add(
                egui::Slider::new(&mut self.settings.brightness, TONE_RANGE)
                    .step_by(TONE_STEP as f64)
                    .text("Brightness"),
            )
            .on_hover_text("Multiplier applied after contrast");
        });

        ui.add_space(8.0);

        ui.collapsing("Colors", |ui| {
            egui::ComboBox::from_label("Color Mode")
                .selected_text(self.settings.color_mode.name())
                .show_ui(ui, |ui| {
                    for mode in ColorMode::ALL {
                        ui.selectable_value(&mut self.settings.color_mode, mode, mode.name());
                    }
                });

            if ui
                .button("Next Mode")
                .on_hover_text("Cycle to the next color mode")
                .clicked()
            {
                self.settings.color_mode = self.settings.color_mode.next();
            }
        });

        ui.add_space(8.0);

        ui.collapsing("Font", |ui| {
            ui.add(egui::Slider::new(&mut self.settings.font_size, 8.0..=48.0).text("Size"));

            let font_label = self
                .settings
                .font_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map_or("system default".to_string(), |n| n.to_string_lossy().into_owned());
            ui.label(format!("Font: {}", font_label));

            ui.horizontal(|ui| {
                if ui.button("Choose...").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("Fonts", &["ttf", "otf"])
                        .pick_file()
                {
                    self.settings.font_path = Some(path);
                }
                if ui.button("Default").clicked() {
                    self.settings.font_path = None;
                }
            });
        });

        ui.add_space(8.0);

        if ui.button("Reset Settings").clicked() {
            self.settings = Settings::default();
        }

        ui.add_space(16.0);
        ui.separator();

        // Auto-process toggle
        ui.checkbox(&mut self.auto_process, "Auto-process")
            .on_hover_text("Automatically reprocess when parameters change");

        // Manual process button
        ui.add_enabled_ui(!self.auto_process || !self.needs_reprocess, |ui| {
            if ui.button("Process").clicked() {
                self.process();
            }
        });

        // Show processing time
        if self.last_process_time_ms > 0.0 {
            ui.label(format!("Last process: {:.1} ms", self.last_process_time_ms));
        }

        self.settings != before
    }

    /// Convert RgbImage to egui ColorImage
    fn rgb_to_color_image(img: &RgbImage) -> egui::ColorImage {
        let (width, height) = img.dimensions();
        egui::ColorImage::from_rgb([width as usize, height as usize], img.as_raw())
    }

    /// Display an image in the UI (standalone helper function)
    fn display_image(
        ui: &mut egui::Ui,
        image: Option<&RgbImage>,
        texture: &mut Option<egui::TextureHandle>,
        label: &str,
    ) {
        ui.vertical(|ui| {
            ui.heading(label);

            if let Some(img) = image {
                // Update texture if needed
                if texture.is_none() {
                    let color_image = Self::rgb_to_color_image(img);
                    *texture = Some(ui.ctx().load_texture(
                        label,
                        color_image,
                        egui::TextureOptions::default(),
                    ));
                }

                // Display the texture
                if let Some(tex) = texture {
                    let size = tex.size_vec2();
                    let max_size = ui.available_size();
                    // Allow upscaling for small images, but limit to reasonable max scale
                    let scale = ((max_size.x / size.x).min(max_size.y / size.y)).min(4.0);
                    let display_size = size * scale;

                    ui.image((tex.id(), display_size));
                    ui.label(format!(
                        "{}x{} (scale: {:.1}x)",
                        img.width(),
                        img.height(),
                        scale
                    ));
                }
            } else {
                ui.label("No image loaded");
            }
        });
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Open Image...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", &["png", "jpg", "jpeg", "bmp", "gif", "webp"])
                        .pick_file()
                    {
                        self.load_image(&path);
                    }
                    ui.close_menu();
                }

                if ui.button("Save Image...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("PNG", &["png"])
                        .add_filter("JPEG", &["jpg", "jpeg"])
                        .save_file()
                        && let Err(e) = self.save_output(&path)
                    {
                        self.error_message = Some(e);
                    }
                    ui.close_menu();
                }

                if ui.button("Save Text...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Text", &["txt"])
                        .save_file()
                        && let Err(e) = self.save_text(&path)
                    {
                        self.error_message = Some(e);
                    }
                    ui.close_menu();
                }

                if ui.button("Copy Text").clicked() {
                    if let Some(art) = &self.output {
                        let text = art.text();
                        ui.output_mut(|o| o.copied_text = text);
                    }
                    ui.close_menu();
                }

                ui.separator();

                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Help", |ui| {
                if ui.button("About").clicked() {
                    self.error_message = Some(
                        "ASCII Renderer\nColored ASCII art from any image\n\nBuilt with Rust + egui"
                            .to_string(),
                    );
                    ui.close_menu();
                }
            });
        });
    }
}

impl eframe::App for AsciiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ctx, ui);
        });

        // Left panel: Controls
        egui::SidePanel::left("control_panel")
            .resizable(true)
            .default_width(250.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let changed = self.render_controls(ui);

                    if changed {
                        self.needs_reprocess = true;
                    }
                });
            });

        // Bottom panel: caption for the last result
        egui::TopBottomPanel::bottom("caption").show(ctx, |ui| {
            match (&self.input_image, &self.output) {
                (Some(input), Some(art)) => {
                    ui.label(format!(
                        "Original size: {}x{} | {}x{} characters | {}",
                        input.width(),
                        input.height(),
                        art.columns(),
                        art.rows(),
                        self.settings.summary()
                    ));
                }
                _ => {
                    ui.label(self.settings.summary());
                }
            }
        });

        // Central panel: Image display
        egui::CentralPanel::default().show(ctx, |ui| {
            // Show error message if any
            if let Some(ref msg) = self.error_message {
                ui.colored_label(egui::Color32::RED, msg);
                if ui.button("Clear Error").clicked() {
                    self.error_message = None;
                }
                ui.separator();
            }

            // Auto-process if needed
            if self.auto_process && self.needs_reprocess && self.input_image.is_some() {
                self.process();
            }

            // Display images side-by-side
            ui.horizontal(|ui| {
                let available_width = ui.available_width();
                let half_width = available_width / 2.0 - 8.0;

                ui.allocate_ui_with_layout(
                    egui::vec2(half_width, ui.available_height()),
                    egui::Layout::top_down(egui::Align::Center),
                    |ui| {
                        Self::display_image(
                            ui,
                            self.input_image.as_ref(),
                            &mut self.input_texture,
                            "Original",
                        );
                    },
                );

                ui.separator();

                ui.allocate_ui_with_layout(
                    egui::vec2(half_width, ui.available_height()),
                    egui::Layout::top_down(egui::Align::Center),
                    |ui| {
                        Self::display_image(
                            ui,
                            self.output.as_ref().map(|art| &art.image),
                            &mut self.output_texture,
                            "ASCII Output",
                        );
                    },
                );
            });
        });
    }
}
