//! Cover image generation (spec §4.8): a 1000×1000 PNG with the playlist
//! title wrapped top-right and today's date bottom-left.
//!
//! No font file ships with the crate, so glyphs are drawn from a tiny
//! built-in 3x5 pixel font rather than pulled in via a vendored asset.

use chrono::Local;
use image::{Rgb, RgbImage};
use std::path::PathBuf;

const SIZE: u32 = 1000;
const WRAP_WIDTH: usize = 15;
const GLYPH_W: u32 = 3;
const GLYPH_H: u32 = 5;

/// Each row is 3 bits, MSB = leftmost column. Covers the characters a
/// playlist title or `MM/DD/YYYY` date stamp can contain.
fn glyph_rows(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b101, 0b111, 0b111, 0b111, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b111, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '0' => [0b010, 0b101, 0b101, 0b101, 0b010],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b110, 0b001, 0b010, 0b100, 0b111],
        '3' => [0b110, 0b001, 0b010, 0b001, 0b110],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b110, 0b001, 0b110],
        '6' => [0b011, 0b100, 0b110, 0b101, 0b010],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b010, 0b101, 0b010, 0b101, 0b010],
        '9' => [0b010, 0b101, 0b011, 0b001, 0b110],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '.' | ':' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '•' => [0b000, 0b010, 0b000, 0b000, 0b000],
        _ => [0b000, 0b000, 0b000, 0b000, 0b000],
    }
}

fn wrap_title(title: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in title.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if candidate.len() > WRAP_WIDTH && !current.is_empty() {
            lines.push(current);
            current = word.to_string();
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn draw_glyph(img: &mut RgbImage, ch: char, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let rows = glyph_rows(ch);
    for (row, bits) in rows.iter().enumerate() {
        for col in 0..GLYPH_W {
            if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                for sy in 0..scale {
                    for sx in 0..scale {
                        let px = x + col * scale + sx;
                        let py = y + row as u32 * scale + sy;
                        if px < SIZE && py < SIZE {
                            img.put_pixel(px, py, color);
                        }
                    }
                }
            }
        }
    }
}

fn draw_line(img: &mut RgbImage, text: &str, right_x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let char_width = (GLYPH_W + 1) * scale;
    let line_width = char_width * text.chars().count() as u32;
    let start_x = right_x.saturating_sub(line_width);
    for (i, ch) in text.chars().enumerate() {
        draw_glyph(img, ch, start_x + i as u32 * char_width, y, scale, color);
    }
}

fn draw_line_left(img: &mut RgbImage, text: &str, x: u32, y: u32, scale: u32, color: Rgb<u8>) {
    let char_width = (GLYPH_W + 1) * scale;
    for (i, ch) in text.chars().enumerate() {
        draw_glyph(img, ch, x + i as u32 * char_width, y, scale, color);
    }
}

/// Renders the cover to a temp PNG file and returns its path. The caller is
/// responsible for deleting it after upload (spec §4.8).
pub fn generate_cover(title: &str) -> std::io::Result<PathBuf> {
    let mut img = RgbImage::from_pixel(SIZE, SIZE, Rgb([0, 0, 0]));

    let title_scale = 9;
    let date_scale = 5;
    let margin = 40;

    let lines = wrap_title(title);
    let line_height = (GLYPH_H + 2) * title_scale;
    for (i, line) in lines.iter().enumerate() {
        let y = margin + i as u32 * line_height;
        draw_line(&mut img, line, SIZE - margin, y, title_scale, Rgb([255, 255, 255]));
    }

    let date_str = Local::now().format("%m/%d/%Y").to_string();
    draw_line_left(
        &mut img,
        &date_str,
        margin,
        SIZE - margin - GLYPH_H * date_scale,
        date_scale,
        Rgb([200, 200, 200]),
    );

    let file = tempfile::Builder::new()
        .prefix("playlist-cover-")
        .suffix(".png")
        .tempfile()?;
    let path = file.into_temp_path().keep().map_err(|e| e.error)?;
    img.save(&path)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    Ok(path)
}
