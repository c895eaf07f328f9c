//! # 字节预算编码模块
//!
//! ## 设计思路
//!
//! 编码器是流水线的汇合点：按来源决定有损/无损格式，按目标长边缩放，
//! 按需叠加描边与阴影，最后用一次纠正缩放满足字节预算。
//! 预算超限只做一次纠正缩放而不是二分搜索——最小尺寸渲染仍超限时
//! 按尽力而为输出并告警，而不是失败。
//!
//! ## 实现思路
//!
//! 1. 透明性：PNG / GIF 起源或文本渲染内容走无损路径
//! 2. 长边超过目标时先等比缩小
//! 3. 启用边框时强制透明，先描边再投影
//! 4. 透明走 PNG，不透明走 JPEG（质量 70），测量字节数
//! 5. 超出预算且长边仍大于下限时，纠正缩放到下限并重新编码、重新测量
//! 6. 全程未改变像素尺寸且原始字节在预算内时，原样透传原始字节，
//!    扩展名按原始字节嗅探（保留来源保真度与元数据）

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, codecs::jpeg::JpegEncoder};

use super::{RawInput, RenderParams, StickerError, WorkingImage, geometry, outline, shadow};

/// 不透明内容的 JPEG 质量因子。
const JPEG_QUALITY: u8 = 70;

/// 描边颜色：不透明白。
pub(crate) const STROKE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// 阴影染色：两成灰，三分之一透明度。
pub(crate) const SHADOW_TINT: Rgba<u8> = Rgba([51, 51, 51, 85]);

/// 编码终点产物。
#[derive(Debug, Clone)]
pub struct EncodedSticker {
    /// 最终文件内容。
    pub bytes: Vec<u8>,
    /// 最终文件扩展名（不含点）。
    pub extension: String,
    /// 恒等于 `bytes.len()`。
    pub byte_count: usize,
    /// 是否原样透传了来源字节。
    pub used_original_bytes: bool,
}

/// 把工作图编码为满足字节预算的贴纸。
pub fn encode(
    working: WorkingImage,
    params: &RenderParams,
    origin: &RawInput,
) -> Result<EncodedSticker, StickerError> {
    let mut transparent = origin.transparent_origin || origin.is_text_rendered();
    let initial_size = working.size();
    let mut working = working;

    if working.long_side() > params.target_long_side {
        working = geometry::downscale(&working, geometry::fit(initial_size, params.target_long_side))?;
    }

    if params.border_enabled {
        transparent = true;
        let thickness = params.stroke_thickness(working.long_side());
        working = outline::stroked(
            &working,
            STROKE_COLOR,
            thickness,
            params.stroke_angle_step_degrees,
        );
        working = shadow::with_shadow(
            &working,
            params.shadow_blur(thickness),
            params.shadow_offset(thickness),
            SHADOW_TINT,
        );
    }

    let mut bytes = serialize(&working, transparent)?;
    if bytes.len() >= params.max_file_bytes && working.long_side() > params.min_long_side {
        let corrected = geometry::fit(working.size(), params.min_long_side);
        log::info!(
            "🧩 超出字节预算（{} >= {}），纠正缩放到 {}x{}",
            bytes.len(),
            params.max_file_bytes,
            corrected.0,
            corrected.1
        );
        working = geometry::downscale(&working, corrected)?;
        bytes = serialize(&working, transparent)?;
    }

    if bytes.len() >= params.max_file_bytes {
        log::warn!(
            "⚠️ 最小尺寸渲染仍超出字节预算（{} >= {}），按尽力而为输出",
            bytes.len(),
            params.max_file_bytes
        );
    }

    // 透传优化：像素尺寸全程未变且原始字节在预算内时，优先保留来源字节
    if working.size() == initial_size {
        if let Some(original) = origin.original_bytes.as_ref() {
            if original.len() < params.max_file_bytes {
                let extension = passthrough_extension(original, origin.mime_hint.as_deref());
                log::debug!("原始字节透传（{} 字节，.{}）", original.len(), extension);
                return Ok(EncodedSticker {
                    byte_count: original.len(),
                    bytes: original.clone(),
                    extension,
                    used_original_bytes: true,
                });
            }
        }
    }

    Ok(EncodedSticker {
        byte_count: bytes.len(),
        extension: if transparent { "png" } else { "jpg" }.to_string(),
        bytes,
        used_original_bytes: false,
    })
}

/// 透明走 PNG，不透明丢弃 alpha 走 JPEG。
fn serialize(working: &WorkingImage, transparent: bool) -> Result<Vec<u8>, StickerError> {
    let mut cursor = Cursor::new(Vec::new());
    if transparent {
        working
            .pixels
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| StickerError::Encode(format!("PNG 编码失败：{}", e)))?;
    } else {
        let rgb = DynamicImage::ImageRgba8(working.pixels.clone()).to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb.write_with_encoder(encoder)
            .map_err(|e| StickerError::Encode(format!("JPEG 编码失败：{}", e)))?;
    }
    Ok(cursor.into_inner())
}

/// 透传时按原始字节嗅探扩展名，嗅探不出再退 MIME 提示。
fn passthrough_extension(bytes: &[u8], mime_hint: Option<&str>) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.extension().to_string();
    }
    match mime_hint {
        Some("image/jpeg") => "jpg".to_string(),
        Some("image/gif") => "gif".to_string(),
        _ => "png".to_string(),
    }
}
