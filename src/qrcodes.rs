use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use qrcode::{Color, QrCode};
use tracing::info;

use crate::error::{AppError, Result};

pub const MODULE_PX: u32 = 10;
pub const QUIET_ZONE: u32 = 4;

#[derive(Debug, Clone, Copy)]
pub struct TestQrCode {
    pub file_stem: &'static str,
    pub content: &'static str,
}

pub const TEST_QR_CODES: [TestQrCode; 6] = [
    TestQrCode { file_stem: "product_PROD001", content: "MAGSAV-PRODUCT:PROD001:Amplificateur Wireless 240" },
    TestQrCode { file_stem: "product_PROD002", content: "MAGSAV-PRODUCT:PROD002:Console Yamaha MG10XU" },
    TestQrCode { file_stem: "product_PROD003", content: "MAGSAV-PRODUCT:PROD003:Enceinte Bose S1 Pro" },
    TestQrCode { file_stem: "product_PROD004", content: "MAGSAV-PRODUCT:PROD004:Projecteur Panasonic PT-VZ580" },
    TestQrCode { file_stem: "vehicle_VEH001", content: "MAGSAV-VEHICLE:VEH001:Renault Master" },
    TestQrCode { file_stem: "vehicle_VEH002", content: "MAGSAV-VEHICLE:VEH002:Peugeot Boxer" },
];

/// Black modules on white, `MODULE_PX` pixels per module, 4-module margin.
pub fn render_qr(content: &str) -> Result<GrayImage> {
    let code = QrCode::new(content.as_bytes())
        .map_err(|e| AppError::ImageError(format!("cannot encode {:?}: {}", content, e)))?;
    let width = code.width() as u32;
    let colors = code.to_colors();

    let side = (width + 2 * QUIET_ZONE) * MODULE_PX;
    let mut img = GrayImage::from_pixel(side, side, Luma([255]));

    for (i, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let mx = i as u32 % width + QUIET_ZONE;
        let my = i as u32 / width + QUIET_ZONE;
        for y in my * MODULE_PX..(my + 1) * MODULE_PX {
            for x in mx * MODULE_PX..(mx + 1) * MODULE_PX {
                img.put_pixel(x, y, Luma([0]));
            }
        }
    }
    Ok(img)
}

pub fn generate_qrcodes(codes: &[TestQrCode], out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;

    let mut written = Vec::with_capacity(codes.len());
    for code in codes {
        let path = out_dir.join(format!("{}.png", code.file_stem));
        render_qr(code.content)?.save(&path)?;
        info!(path = %path.display(), content = code.content, "QR code written");
        written.push(path);
    }
    Ok(written)
}
