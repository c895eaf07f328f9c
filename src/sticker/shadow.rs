//! # 阴影合成模块
//!
//! ## 设计思路
//!
//! 在图像背后合成一层模糊、偏移、染色的剪影，并扩大画布使阴影完整容纳。
//! 画布边界必须同时覆盖未偏移的原图矩形和模糊 + 偏移后的阴影矩形，
//! 负方向偏移（阴影投向上方/左侧）时原点侧也要扩出。
//!
//! ## 实现思路
//!
//! 1. 计算阴影矩形与画布尺寸（`shadow_canvas`，纯函数，单独测试）
//! 2. 把染色剪影画到阴影位置，对整层做高斯模糊
//! 3. 把原图按未偏移位置画在最上层
//!
//! 高斯 sigma 取模糊半径的一半，近似常见的 blur-radius 语义。

use image::{Rgba, RgbaImage, imageops};

use super::WorkingImage;
use super::outline::colorized;

/// 给图像叠加投影，画布扩大到同时容纳原图和阴影。
pub fn with_shadow(
    image: &WorkingImage,
    blur: u32,
    offset: (i64, i64),
    tint: Rgba<u8>,
) -> WorkingImage {
    let (width, height) = image.size();
    let bounds = shadow_canvas(width, height, blur, offset);

    let mut canvas = RgbaImage::new(bounds.canvas_width, bounds.canvas_height);
    let silhouette = colorized(&image.pixels, tint);
    imageops::overlay(
        &mut canvas,
        &silhouette,
        bounds.image_x + offset.0,
        bounds.image_y + offset.1,
    );

    let mut composed = if blur > 0 {
        imageops::blur(&canvas, blur as f32 / 2.0)
    } else {
        canvas
    };

    imageops::overlay(&mut composed, &image.pixels, bounds.image_x, bounds.image_y);
    WorkingImage::new(composed, true)
}

/// 阴影画布布局：画布尺寸与原图在画布内的位置。
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ShadowCanvas {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub image_x: i64,
    pub image_y: i64,
}

/// 计算同时容纳原图矩形和模糊 + 偏移后阴影矩形的画布。
pub(crate) fn shadow_canvas(width: u32, height: u32, blur: u32, offset: (i64, i64)) -> ShadowCanvas {
    let blur = i64::from(blur);
    let width_i = i64::from(width);
    let height_i = i64::from(height);

    let shadow_min_x = offset.0 - blur;
    let shadow_min_y = offset.1 - blur;
    let shadow_max_x = offset.0 + width_i + blur;
    let shadow_max_y = offset.1 + height_i + blur;

    ShadowCanvas {
        canvas_width: (shadow_max_x.max(width_i) - shadow_min_x.min(0)) as u32,
        canvas_height: (shadow_max_y.max(height_i) - shadow_min_y.min(0)) as u32,
        image_x: (-shadow_min_x).max(0),
        image_y: (-shadow_min_y).max(0),
    }
}
