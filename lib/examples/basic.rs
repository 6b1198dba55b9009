/// Basic example: Convert a generated test image to colored ASCII art
///
/// Draws a few shapes, converts them once per color mode and saves the results
use ascii_rendr::{AsciiConverter, ColorMode, ConversionConfig};
use image::{Rgb, RgbImage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("ASCII Renderer - Basic Example");
    println!("==============================\n");

    let width = 320;
    let height = 200;
    let mut img = RgbImage::from_pixel(width, height, Rgb([40, 60, 110]));

    // Warm circle in the center
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let radius = 70.0;

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = x as f32 - center_x;
        let dy = y as f32 - center_y;
        let dist = (dx * dx + dy * dy).sqrt();

        if dist < radius {
            let shade = (255.0 * (1.0 - dist / radius * 0.6)) as u8;
            *pixel = Rgb([shade, (shade as f32 * 0.7) as u8, 40]);
        }
    }

    // Horizontal gradient bar along the bottom
    for y in height - 30..height {
        for x in 0..width {
            let v = (x * 255 / (width - 1)) as u8;
            img.put_pixel(x, y, Rgb([v, v, v]));
        }
    }

    println!("Created test image: {}x{}", width, height);
    img.save("basic_input.png")?;

    for mode in [ColorMode::TrueColor, ColorMode::Monochrome, ColorMode::Grayscale] {
        let config = ConversionConfig {
            output_width: 80,
            contrast: 1.2,
            brightness: 1.1,
            color_mode: mode,
            ..Default::default()
        };
        let converter = AsciiConverter::new(config)?;
        let art = converter.convert(&img)?;

        let image_path = format!("basic_output_{}.png", mode);
        art.save_image(&image_path)?;
        println!(
            "✓ {}: {}x{} characters, saved {}x{} image to {}",
            mode,
            art.columns(),
            art.rows(),
            art.image.width(),
            art.image.height(),
            image_path
        );

        if mode == ColorMode::TrueColor {
            art.save_text("basic_output.txt")?;
            println!("\n{}\n", art.text());
        }
    }

    println!("\nASCII conversion complete!");
    Ok(())
}
