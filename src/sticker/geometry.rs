//! # 几何适配模块
//!
//! ## 设计思路
//!
//! 所有缩放决策都以“长边”这个单一标量驱动：`fit` 负责算出等比目标尺寸，
//! `downscale` 负责执行。两者分开，前者是纯函数，方便做性质测试；
//! 后者集中管理缩放实现与回退路径。
//!
//! ## 实现思路
//!
//! - 取整策略为四舍五入（`f64::round`，尺寸恒正，等价于逢五进一）。
//!   字节预算的收敛依赖像素数单调递减，取整策略必须全程一致。
//! - 缩放优先走 `fast_image_resize`，失败时回退 `image::resize_exact`。

use fast_image_resize as fr;
use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage, imageops::FilterType};

use super::{StickerError, WorkingImage};

/// `fast_image_resize` 失败时的回退滤镜。
const FALLBACK_FILTER: FilterType = FilterType::CatmullRom;

/// 长边：`max(width, height)`。
pub fn long_side(size: (u32, u32)) -> u32 {
    size.0.max(size.1)
}

/// 计算把长边缩放到 `target_long_side` 的等比目标尺寸。
///
/// 纯函数；调用方只在 `scale < 1.0` 时调用（绝不放大超过源图）。
/// 两轴分别四舍五入取整，下限 1 像素。
pub fn fit(size: (u32, u32), target_long_side: u32) -> (u32, u32) {
    let scale = f64::from(target_long_side) / f64::from(long_side(size));
    let width = ((f64::from(size.0) * scale).round() as u32).max(1);
    let height = ((f64::from(size.1) * scale).round() as u32).max(1);
    (width, height)
}

/// 把工作图缩放到目标尺寸，产出新的工作图。
pub fn downscale(working: &WorkingImage, target: (u32, u32)) -> Result<WorkingImage, StickerError> {
    if target == working.size() {
        return Ok(working.clone());
    }

    match resize_with_fast_image_resize(&working.pixels, target.0, target.1) {
        Ok(pixels) => Ok(WorkingImage::new(pixels, working.has_alpha)),
        Err(err) => {
            log::warn!("⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}", err);
            let resized = DynamicImage::ImageRgba8(working.pixels.clone())
                .resize_exact(target.0, target.1, FALLBACK_FILTER)
                .to_rgba8();
            Ok(WorkingImage::new(resized, working.has_alpha))
        }
    }
}

fn resize_with_fast_image_resize(
    src: &RgbaImage,
    target_width: u32,
    target_height: u32,
) -> Result<RgbaImage, StickerError> {
    let (src_width, src_height) = src.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        src.as_raw().clone(),
        fr::PixelType::U8x4,
    )
    .map_err(|e| StickerError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new()
        .resize_alg(fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3));

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| StickerError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    ImageBuffer::<Rgba<u8>, Vec<u8>>::from_raw(target_width, target_height, dst_image.into_vec())
        .ok_or_else(|| StickerError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
}
