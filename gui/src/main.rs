mod app;

use app::AsciiApp;
use ascii_rendr::{BitmapFont, MonospaceFont};
use eframe::egui;
use image::{Rgb, RgbImage};

fn main() -> Result<(), eframe::Error> {
    // Configure logging
    env_logger::init();

    // Configure viewport/window
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("ASCII Renderer")
            .with_icon(load_icon()),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "ASCII Renderer",
        options,
        Box::new(|cc| Box::new(AsciiApp::new(cc))),
    )
}

/// Application icon: a green '@' drawn with the built-in bitmap font
fn load_icon() -> egui::IconData {
    let font = BitmapFont::new(4);
    let (icon_size, _) = font.cell_size();

    let mut canvas = RgbImage::from_pixel(icon_size, icon_size, Rgb([32, 32, 32]));
    font.draw_char(&mut canvas, '@', 0, 0, Rgb([0, 220, 90]));

    let rgba = canvas
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2], 255])
        .collect();

    egui::IconData {
        rgba,
        width: icon_size,
        height: icon_size,
    }
}
