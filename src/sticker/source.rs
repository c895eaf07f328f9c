//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ClipboardSource` 表示可挂起的剪贴板读取能力
//! - `RawInput` 表示一次粘贴/拖放事件产出的原始载荷
//! - `WorkingImage` 表示流水线各阶段传递的像素缓冲
//!
//! `RawInput` 一经产出即不可变；`WorkingImage` 采用值语义，
//! 每个阶段消费一个并产出一个新的，任何阶段都不原地修改输入。

use async_trait::async_trait;
use image::{DynamicImage, RgbaImage};

use super::StickerError;

/// 无法从输入推导名字时使用的兜底文件名主干。
pub const FALLBACK_BASENAME: &str = "sticker";

/// 派生文件名主干时保留的最大字符数。
const BASENAME_MAX_CHARS: usize = 100;

/// 剪贴板来源能力接口。
///
/// 读取载荷是一次可挂起的异步操作（内容可能需要从外部提供方取回）。
/// 取消语义是“新请求覆盖旧请求”，由调用方负责，接口本身不提供抢占。
#[async_trait]
pub trait ClipboardSource: Send + Sync {
    /// 读取当前剪贴板载荷。
    ///
    /// 没有可用内容时返回 [`StickerError::Empty`]。
    async fn fetch(&self) -> Result<RawInput, StickerError>;
}

/// 一次粘贴/拖放事件的原始载荷。
///
/// 每个事件产出一份；被流水线消费后即丢弃。
#[derive(Debug, Clone)]
pub struct RawInput {
    /// 位图内容（存在时优先于文本）。
    pub bitmap: Option<DynamicImage>,
    /// 短文本内容。
    pub text: Option<String>,
    /// 来源 URL 最后一段路径去掉扩展名后的主干，用于派生文件名。
    pub source_url_stem: Option<String>,
    /// 提供方交付的原始字节，透传优化的输入。
    pub original_bytes: Option<Vec<u8>>,
    /// 原始内容的 MIME 提示。
    pub mime_hint: Option<String>,
    /// 提供方建议的名字。
    pub suggested_name: Option<String>,
    /// 来源类型是否自带透明通道（PNG / GIF 起源）。
    pub transparent_origin: bool,
}

impl RawInput {
    /// 从位图构造载荷，透明性由 MIME 提示推导。
    pub fn from_bitmap(bitmap: DynamicImage, mime_hint: Option<String>) -> Self {
        let transparent_origin = mime_hint
            .as_deref()
            .map(is_transparent_mime)
            .unwrap_or(false);
        Self {
            bitmap: Some(bitmap),
            text: None,
            source_url_stem: None,
            original_bytes: None,
            mime_hint,
            suggested_name: None,
            transparent_origin,
        }
    }

    /// 从短文本构造载荷。文本渲染结果始终带透明背景。
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            bitmap: None,
            text: Some(text.into()),
            source_url_stem: None,
            original_bytes: None,
            mime_hint: None,
            suggested_name: None,
            transparent_origin: true,
        }
    }

    pub fn with_original_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.original_bytes = Some(bytes);
        self
    }

    pub fn with_source_url_stem(mut self, stem: impl Into<String>) -> Self {
        self.source_url_stem = Some(stem.into());
        self
    }

    pub fn with_suggested_name(mut self, name: impl Into<String>) -> Self {
        self.suggested_name = Some(name.into());
        self
    }

    /// 既没有位图也没有文本时为空载荷。
    pub fn is_empty(&self) -> bool {
        self.bitmap.is_none() && self.text.is_none()
    }

    /// 是否会走文本渲染路径（没有位图但有文本）。
    pub fn is_text_rendered(&self) -> bool {
        self.bitmap.is_none() && self.text.is_some()
    }

    /// 派生文件名主干。
    ///
    /// 优先级：文本内容（文本渲染时）> URL 主干 > 建议名 > 兜底值。
    pub fn basename(&self) -> String {
        if self.is_text_rendered() {
            if let Some(text) = self.text.as_deref() {
                return sanitize_basename(text);
            }
        }
        if let Some(stem) = self.source_url_stem.as_deref() {
            if !stem.is_empty() {
                return sanitize_basename(stem);
            }
        }
        if let Some(name) = self.suggested_name.as_deref() {
            if !name.is_empty() {
                return sanitize_basename(name);
            }
        }
        FALLBACK_BASENAME.to_string()
    }
}

/// 截断到 100 字符并把路径分隔符替换为下划线。
fn sanitize_basename(text: &str) -> String {
    let truncated: String = text.chars().take(BASENAME_MAX_CHARS).collect();
    let replaced = truncated.replace(['/', '\\'], "_");
    if replaced.is_empty() {
        FALLBACK_BASENAME.to_string()
    } else {
        replaced
    }
}

/// PNG / GIF 起源视为自带透明通道。
pub(crate) fn is_transparent_mime(mime: &str) -> bool {
    matches!(mime, "image/png" | "image/gif")
}

/// 流水线各阶段传递的像素缓冲。
#[derive(Debug, Clone)]
pub struct WorkingImage {
    /// RGBA 像素数据。
    pub pixels: RgbaImage,
    /// 是否携带有效透明通道。
    pub has_alpha: bool,
}

impl WorkingImage {
    pub fn new(pixels: RgbaImage, has_alpha: bool) -> Self {
        Self { pixels, has_alpha }
    }

    /// 从解码结果构造，透明性取自解码后的颜色类型。
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let has_alpha = image.color().has_alpha();
        Self {
            pixels: image.to_rgba8(),
            has_alpha,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// 长边：所有缩放决策的唯一标量。
    pub fn long_side(&self) -> u32 {
        self.width().max(self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;

    #[test]
    fn basename_prefers_text_for_text_rendered_input() {
        let input = RawInput::from_text("Hello").with_suggested_name("ignored");
        assert_eq!(input.basename(), "Hello");
    }

    #[test]
    fn basename_prefers_url_stem_over_suggested_name() {
        let bitmap = DynamicImage::new_rgba8(4, 4);
        let input = RawInput::from_bitmap(bitmap, None)
            .with_source_url_stem("photo")
            .with_suggested_name("suggestion");
        assert_eq!(input.basename(), "photo");
    }

    #[test]
    fn basename_falls_back_when_nothing_usable() {
        let bitmap = DynamicImage::new_rgba8(4, 4);
        let input = RawInput::from_bitmap(bitmap, None);
        assert_eq!(input.basename(), FALLBACK_BASENAME);
    }

    #[test]
    fn basename_truncates_and_replaces_path_separators() {
        let long_text: String = "x".repeat(150);
        let input = RawInput::from_text(long_text);
        assert_eq!(input.basename().chars().count(), 100);

        let input = RawInput::from_text("a/b\\c");
        assert_eq!(input.basename(), "a_b_c");
    }

    #[test]
    fn transparent_origin_follows_mime_hint() {
        let bitmap = DynamicImage::new_rgba8(4, 4);
        let png = RawInput::from_bitmap(bitmap.clone(), Some("image/png".to_string()));
        assert!(png.transparent_origin);
        let gif = RawInput::from_bitmap(bitmap.clone(), Some("image/gif".to_string()));
        assert!(gif.transparent_origin);
        let jpeg = RawInput::from_bitmap(bitmap, Some("image/jpeg".to_string()));
        assert!(!jpeg.transparent_origin);
    }

    #[test]
    fn working_image_tracks_alpha_from_color_type() {
        let rgba = WorkingImage::from_dynamic(&DynamicImage::new_rgba8(2, 2));
        assert!(rgba.has_alpha);
        let rgb = WorkingImage::from_dynamic(&DynamicImage::new_rgb8(2, 2));
        assert!(!rgb.has_alpha);
    }
}
