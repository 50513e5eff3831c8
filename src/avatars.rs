//! Initials avatars for the test user accounts.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use tracing::{info, warn};

use crate::error::Result;
use crate::media::strip_accents;

pub const AVATAR_SIZE: u32 = 128;

const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const PALETTE: [Rgb<u8>; 7] = [
    Rgb([41, 128, 185]),
    Rgb([39, 174, 96]),
    Rgb([142, 68, 173]),
    Rgb([211, 84, 0]),
    Rgb([192, 57, 43]),
    Rgb([22, 160, 133]),
    Rgb([44, 62, 80]),
];

#[derive(Debug, Clone, Copy)]
pub struct TestUser {
    /// File stem under `avatars/users/`.
    pub name: &'static str,
    pub full_name: &'static str,
}

pub const TEST_USERS: [TestUser; 6] = [
    TestUser { name: "admin", full_name: "Administrateur MAGSAV" },
    TestUser { name: "technicien", full_name: "Thomas Leroy" },
    TestUser { name: "jdupont", full_name: "Jean Dupont" },
    TestUser { name: "mmartin", full_name: "Marie Martin" },
    TestUser { name: "sbernard", full_name: "Sophie Bernard" },
    TestUser { name: "eroux", full_name: "Élodie Roux" },
];

/// Font used for the initials. `Bitmap` is the built-in 5x7 face.
pub enum AvatarFont {
    TrueType(FontVec),
    Bitmap,
}

impl AvatarFont {
    pub fn load(path: &Path) -> Self {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "font unavailable, using bitmap font");
                return AvatarFont::Bitmap;
            }
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => AvatarFont::TrueType(font),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "font unreadable, using bitmap font");
                AvatarFont::Bitmap
            }
        }
    }
}

/// First letter of the first two words, uppercased.
pub fn initials(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn background_for(full_name: &str) -> Rgb<u8> {
    let sum: usize = full_name.bytes().map(usize::from).sum();
    PALETTE[sum % PALETTE.len()]
}

pub fn render_avatar(full_name: &str, font: &AvatarFont) -> RgbImage {
    let mut img = RgbImage::from_pixel(AVATAR_SIZE, AVATAR_SIZE, background_for(full_name));
    let text = initials(full_name);

    match font {
        AvatarFont::TrueType(font) => draw_truetype(&mut img, font, &text),
        AvatarFont::Bitmap => draw_bitmap(&mut img, &strip_accents(&text)),
    }
    img
}

pub fn generate_avatars(users: &[TestUser], out_dir: &Path, font: &AvatarFont) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(users.len());
    for user in users {
        let path = out_dir.join(format!("{}.png", user.name));
        render_avatar(user.full_name, font).save(&path)?;
        info!(path = %path.display(), initials = %initials(user.full_name), "avatar written");
        written.push(path);
    }
    Ok(written)
}

fn blend(img: &mut RgbImage, x: i64, y: i64, coverage: f32) {
    if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    let pixel = img.get_pixel_mut(x as u32, y as u32);
    for (channel, fg) in pixel.0.iter_mut().zip(TEXT_COLOR.0) {
        *channel = (f32::from(*channel) * (1.0 - coverage) + f32::from(fg) * coverage).round() as u8;
    }
}

fn draw_truetype(img: &mut RgbImage, font: &FontVec, text: &str) {
    let scale = PxScale::from(AVATAR_SIZE as f32 * 0.45);
    let scaled = font.as_scaled(scale);

    let mut caret = 0.0f32;
    let mut glyphs = Vec::new();
    for c in text.chars() {
        let id = font.glyph_id(c);
        glyphs.push(id.with_scale_and_position(scale, point(caret, scaled.ascent())));
        caret += scaled.h_advance(id);
    }

    let origin_x = (AVATAR_SIZE as f32 - caret) / 2.0;
    let origin_y = (AVATAR_SIZE as f32 - (scaled.ascent() - scaled.descent())) / 2.0;

    for glyph in glyphs {
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = (origin_x + bounds.min.x).round() as i64 + i64::from(gx);
                let y = (origin_y + bounds.min.y).round() as i64 + i64::from(gy);
                blend(img, x, y, coverage);
            });
        }
    }
}

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;

fn bitmap_glyph(c: char) -> [u8; 7] {
    match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        _ => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
    }
}

fn draw_bitmap(img: &mut RgbImage, text: &str) {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return;
    }

    // one dot of spacing between glyphs
    let dot = (AVATAR_SIZE * 45 / 100) / GLYPH_H;
    let count = chars.len() as u32;
    let text_w = (count * GLYPH_W + (count - 1)) * dot;
    let origin_x = (AVATAR_SIZE.saturating_sub(text_w) / 2) as i64;
    let origin_y = (AVATAR_SIZE.saturating_sub(GLYPH_H * dot) / 2) as i64;

    for (i, c) in chars.into_iter().enumerate() {
        let left = origin_x + i64::from((i as u32) * (GLYPH_W + 1) * dot);
        for (row, bits) in bitmap_glyph(c).iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                    continue;
                }
                let x0 = left + i64::from(col * dot);
                let y0 = origin_y + (row as i64) * i64::from(dot);
                for dy in 0..i64::from(dot) {
                    for dx in 0..i64::from(dot) {
                        blend(img, x0 + dx, y0 + dy, 1.0);
                    }
                }
            }
        }
    }
}
