//! # 旋转描边合成模块
//!
//! ## 设计思路
//!
//! 沿轮廓等厚描边不直接做形态学膨胀，而是把纯色剪影按固定角度步进
//! 旋转平移后反复盖章：步进越小描边越平滑，盖章次数越多，成本越高。
//! 默认 8 度步进对应 45 次盖章，质量与耗时的折中。
//!
//! ## 实现思路
//!
//! 1. 用源图 alpha 通道做蒙版，平铺填充描边颜色得到剪影
//! 2. 画布四周各扩出 `thickness`
//! 3. 对每个角度，把长度为 `thickness` 的平移向量旋转后盖章剪影
//! 4. 最后把原图居中画在最上层
//!
//! 源图没有透明通道时，蒙版退化为整个矩形（描边变成实心色块边框），
//! 因此编码器在描边前强制走透明路径。

use image::{Rgba, RgbaImage, imageops};

use super::WorkingImage;

/// 角度步进非法时使用的兜底值（度）。
const DEFAULT_STEP_DEGREES: f32 = 10.0;

/// 给图像加一圈等厚描边。
///
/// 输出画布两轴各比输入大 `2 × thickness`。
pub fn stroked(
    image: &WorkingImage,
    color: Rgba<u8>,
    thickness: u32,
    step_degrees: f32,
) -> WorkingImage {
    if thickness == 0 {
        return WorkingImage::new(image.pixels.clone(), true);
    }

    let silhouette = colorized(&image.pixels, color);
    let (width, height) = image.size();
    let mut canvas = RgbaImage::new(width + 2 * thickness, height + 2 * thickness);

    let step = if step_degrees <= 0.0 {
        DEFAULT_STEP_DEGREES
    } else {
        step_degrees
    };

    let margin = i64::from(thickness);
    let mut angle = 0.0f32;
    while angle < 360.0 {
        let (dx, dy) = rotated_offset(thickness as f32, angle);
        imageops::overlay(&mut canvas, &silhouette, margin + dx, margin + dy);
        angle += step;
    }

    imageops::overlay(&mut canvas, &image.pixels, margin, margin);
    WorkingImage::new(canvas, true)
}

/// 以 alpha 通道为蒙版，输出平铺填充 `color` 的剪影。
pub(crate) fn colorized(pixels: &RgbaImage, color: Rgba<u8>) -> RgbaImage {
    let mut out = RgbaImage::new(pixels.width(), pixels.height());
    for (x, y, px) in pixels.enumerate_pixels() {
        let alpha = (u16::from(px[3]) * u16::from(color[3]) / 255) as u8;
        out.put_pixel(x, y, Rgba([color[0], color[1], color[2], alpha]));
    }
    out
}

/// 把长度为 `radius` 的水平向量绕原点旋转 `degrees` 度。
pub(crate) fn rotated_offset(radius: f32, degrees: f32) -> (i64, i64) {
    let radians = degrees.to_radians();
    (
        (radius * radians.cos()).round() as i64,
        (radius * radians.sin()).round() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    fn half_transparent_square(side: u32) -> WorkingImage {
        let pixels = RgbaImage::from_fn(side, side, |x, _| {
            if x < side / 2 {
                Rgba([200, 40, 40, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        WorkingImage::new(pixels, true)
    }

    #[test]
    fn stroked_expands_canvas_by_twice_the_thickness() {
        for thickness in [1u32, 5, 26] {
            let image = half_transparent_square(40);
            let stroked = stroked(&image, WHITE, thickness, 8.0);
            assert_eq!(stroked.width(), 40 + 2 * thickness);
            assert_eq!(stroked.height(), 40 + 2 * thickness);
            assert!(stroked.has_alpha);
        }
    }

    #[test]
    fn stroked_paints_outline_outside_original_bounds() {
        let image = half_transparent_square(40);
        let result = stroked(&image, WHITE, 6, 8.0);
        // 原图左缘不透明，描边应当延伸进扩出的边距
        let edge = result.pixels.get_pixel(2, 26);
        assert!(edge[3] > 0, "expected stroke pixels in the expanded margin");
    }

    #[test]
    fn stroked_keeps_original_pixels_on_top() {
        let image = half_transparent_square(40);
        let result = stroked(&image, WHITE, 6, 8.0);
        let inside = result.pixels.get_pixel(6 + 4, 6 + 20);
        assert_eq!(inside[0], 200);
        assert_eq!(inside[1], 40);
    }

    #[test]
    fn colorized_flattens_color_and_keeps_alpha() {
        let image = half_transparent_square(8);
        let silhouette = colorized(&image.pixels, WHITE);
        assert_eq!(silhouette.get_pixel(1, 1)[0], 255);
        assert_eq!(silhouette.get_pixel(1, 1)[3], 255);
        assert_eq!(silhouette.get_pixel(7, 1)[3], 0);
    }

    #[test]
    fn rotated_offset_hits_cardinal_directions() {
        assert_eq!(rotated_offset(10.0, 0.0), (10, 0));
        assert_eq!(rotated_offset(10.0, 90.0), (0, 10));
        assert_eq!(rotated_offset(10.0, 180.0), (-10, 0));
        assert_eq!(rotated_offset(10.0, 270.0), (0, -10));
    }
}
