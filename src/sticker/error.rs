//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载贴纸流水线中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。

/// 贴纸流水线统一错误类型。
///
/// 该类型会在会话层被上转为 `AppError`，调用方据此决定是否回退到空态提示。
#[derive(Debug, thiserror::Error)]
pub enum StickerError {
    /// 剪贴板没有可用内容——调用方应展示操作指引，而不是当作崩溃处理。
    #[error("剪贴板没有可用内容")]
    Empty,

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("文本渲染错误：{0}")]
    TextRender(String),

    /// 序列化未产出任何字节——对当前操作致命，但不得污染上一张贴纸。
    #[error("编码错误：{0}")]
    Encode(String),
}
