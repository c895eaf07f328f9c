//! # 贴纸流水线模块（sticker）
//!
//! ## 设计思路
//!
//! 该模块把“载荷读取 → 工作图生成 → 几何装饰 → 字节预算编码”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `config`：渲染参数与推导规则
//! - `source`：剪贴板来源接口、原始载荷、工作图模型
//! - `geometry`：等比缩放计算与执行
//! - `text`：短文本栅格化
//! - `outline`：旋转描边合成
//! - `shadow`：阴影合成
//! - `encoder`：格式选择、字节预算与原始字节透传
//! - `error`：流水线错误模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! Session::create_sticker
//!    ↓
//! ClipboardSource::fetch（异步读取载荷）
//!    ↓
//! source.rs（RawInput → WorkingImage，位图直取 / 文本走 text.rs）
//!    ↓
//! encoder.rs（统一编排）
//!    ├─ geometry.rs（fit + downscale）
//!    ├─ outline.rs（旋转描边，边框开启时）
//!    └─ shadow.rs（投影合成，边框开启时）
//!    ↓
//! EncodedSticker 交给 library 持久化
//! ```

mod config;
mod encoder;
mod error;
mod geometry;
mod outline;
mod shadow;
mod source;
mod text;

pub use config::RenderParams;
pub use encoder::{EncodedSticker, encode};
pub use error::StickerError;
pub use geometry::fit;
pub use outline::stroked;
pub use shadow::with_shadow;
pub use source::{ClipboardSource, FALLBACK_BASENAME, RawInput, WorkingImage};
pub use text::rasterize;
