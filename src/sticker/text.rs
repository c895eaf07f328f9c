//! # 文本栅格化模块
//!
//! ## 设计思路
//!
//! 短字符串（≤ 3 字符）渲染为铺满正方形画布的巨型字块，按字体行高
//! 垂直居中；更长的文本用 24px 小字号按自然包围盒换行居中排版。
//! 输出始终带透明背景，方便后续描边与阴影。
//!
//! ## 实现思路
//!
//! - 布局运算（换行、垂直偏移）与字形绘制分离，前者是纯函数可独立测试。
//! - 系统字体通过 `once_cell` 只加载一次，优先粗体；找不到任何字体时
//!   返回 `TextRender` 错误而不是画出空白贴纸。

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use once_cell::sync::OnceCell;

use super::{RenderParams, StickerError, WorkingImage};

/// 超过该字符数的文本走小字号换行路径。
const GLYPH_BLOCK_MAX_CHARS: usize = 3;

/// 换行路径的固定字号（像素）。
const WRAPPED_FONT_PX: f32 = 24.0;

/// 文字颜色（近黑）。
const TEXT_COLOR: Rgba<u8> = Rgba([28, 28, 30, 255]);

/// 按优先级探测的系统字体路径，粗体优先。
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\segoeuib.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// 把短字符串渲染成贴纸工作图。
pub fn rasterize(text: &str, params: &RenderParams) -> Result<WorkingImage, StickerError> {
    let font = system_font()
        .ok_or_else(|| StickerError::TextRender("未找到可用的系统字体".to_string()))?;

    if text.chars().count() <= GLYPH_BLOCK_MAX_CHARS {
        Ok(rasterize_glyph_block(text, font, params.target_long_side))
    } else {
        Ok(rasterize_wrapped(text, font, params.target_long_side as f32))
    }
}

/// 巨型字块：正方形画布，字号等于画布边长，按行高垂直居中。
fn rasterize_glyph_block(text: &str, font: &FontArc, canvas_side: u32) -> WorkingImage {
    let scale = PxScale::from(canvas_side as f32);
    let scaled = font.as_scaled(scale);

    let offset_y = vertical_offset(canvas_side as f32, scaled.height());
    let width = line_width(&scaled, text);
    let origin_x = (canvas_side as f32 - width) / 2.0;

    let mut canvas = RgbaImage::new(canvas_side, canvas_side);
    draw_line(&mut canvas, font, scale, text, origin_x, offset_y + scaled.ascent());
    WorkingImage::new(canvas, true)
}

/// 小字号换行：画布自适应文本的自然包围盒，每行水平居中。
fn rasterize_wrapped(text: &str, font: &FontArc, max_width: f32) -> WorkingImage {
    let scale = PxScale::from(WRAPPED_FONT_PX);
    let scaled = font.as_scaled(scale);

    let lines = wrap_lines(text, |line| line_width(&scaled, line), max_width);
    let line_height = scaled.height();
    let content_width = lines
        .iter()
        .map(|line| line_width(&scaled, line))
        .fold(0.0f32, f32::max);

    let canvas_width = (content_width.ceil() as u32).max(1);
    let canvas_height = ((line_height * lines.len() as f32).ceil() as u32).max(1);
    let mut canvas = RgbaImage::new(canvas_width, canvas_height);

    for (index, line) in lines.iter().enumerate() {
        let origin_x = (canvas_width as f32 - line_width(&scaled, line)) / 2.0;
        let baseline_y = line_height * index as f32 + scaled.ascent();
        draw_line(&mut canvas, font, scale, line, origin_x, baseline_y);
    }

    WorkingImage::new(canvas, true)
}

/// 按行高计算垂直居中偏移：`(画布高 - 行高) / 2`。
pub(crate) fn vertical_offset(canvas_height: f32, line_height: f32) -> f32 {
    (canvas_height - line_height) / 2.0
}

/// 把文本按测量宽度换行；先按 `\n` 分段，段内按词累积。
pub(crate) fn wrap_lines(
    text: &str,
    measure: impl Fn(&str) -> f32,
    max_width: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if !current.is_empty() && measure(&candidate) > max_width {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn line_width<F, SF>(scaled: &SF, text: &str) -> f32
where
    F: Font,
    SF: ScaleFont<F>,
{
    text.chars()
        .map(|ch| scaled.h_advance(scaled.glyph_id(ch)))
        .sum()
}

fn draw_line(
    canvas: &mut RgbaImage,
    font: &FontArc,
    scale: PxScale,
    text: &str,
    origin_x: f32,
    baseline_y: f32,
) {
    let scaled = font.as_scaled(scale);
    let mut cursor_x = origin_x;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(scale, point(cursor_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let x = bounds.min.x as i32 + px as i32;
                let y = bounds.min.y as i32 + py as i32;
                if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
                    blend_glyph_pixel(canvas, x as u32, y as u32, coverage);
                }
            });
        }

        cursor_x += scaled.h_advance(glyph_id);
    }
}

/// 按覆盖率做 src-over 混合，文字颜色固定。
fn blend_glyph_pixel(canvas: &mut RgbaImage, x: u32, y: u32, coverage: f32) {
    let alpha = (coverage.clamp(0.0, 1.0) * f32::from(TEXT_COLOR[3])) as u16;
    if alpha == 0 {
        return;
    }

    let existing = *canvas.get_pixel(x, y);
    let inverse = 255 - alpha;
    let blended = Rgba([
        ((u16::from(TEXT_COLOR[0]) * alpha + u16::from(existing[0]) * inverse) / 255) as u8,
        ((u16::from(TEXT_COLOR[1]) * alpha + u16::from(existing[1]) * inverse) / 255) as u8,
        ((u16::from(TEXT_COLOR[2]) * alpha + u16::from(existing[2]) * inverse) / 255) as u8,
        (alpha + u16::from(existing[3]) * inverse / 255).min(255) as u8,
    ]);
    canvas.put_pixel(x, y, blended);
}

fn system_font() -> Option<&'static FontArc> {
    static FONT: OnceCell<Option<FontArc>> = OnceCell::new();
    FONT.get_or_init(|| {
        for path in SYSTEM_FONT_PATHS {
            if let Ok(data) = std::fs::read(path) {
                if let Ok(font) = FontArc::try_from_vec(data) {
                    log::debug!("已加载系统字体: {}", path);
                    return Some(font);
                }
            }
        }
        log::warn!("⚠️ 未找到可用的系统字体，文本贴纸不可用");
        None
    })
    .as_ref()
}
