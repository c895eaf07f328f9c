//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)`、`expect()` 等不一致模式。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `StickerError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 流水线阶段错误只中止当前粘贴/拖放操作；
//!   存储目录不可用是唯一应当阻止继续接受输入的启动错误。

use crate::sticker::StickerError;

/// 应用级统一错误类型。
///
/// 会话层所有操作均返回此类型，调用方据此决定回退行为。
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 贴纸流水线错误（载荷为空 / 解码 / 文本渲染 / 编码）
    #[error("{0}")]
    Sticker(#[from] StickerError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 存储目录不可用
    #[error("存储目录不可用: {0}")]
    Storage(String),
}
