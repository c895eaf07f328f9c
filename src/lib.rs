//! # 剪贴板贴纸工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            外部协作方（不在本库职责内）                    │
//! │                                                          │
//! │  剪贴板/拖放提供方 ── 远端同步容器 ── 贴纸浏览 UI          │
//! │        ↕ ClipboardSource     ↕ SyncedRoot                │
//! └────────┼─────────────────────┼───────────────────────────┘
//! ┌────────┼─────────────────────┼───────────────────────────┐
//! │        ↕      本库 (Rust)    ↕                           │
//! │                                                          │
//! │  ┌─ error ───── AppError (统一错误类型)                   │
//! │  │                                                       │
//! │  ├─ sticker ─── 转码流水线                                │
//! │  │   ├─ geometry   等比缩放计算与执行                     │
//! │  │   ├─ text       短文本栅格化                           │
//! │  │   ├─ outline    旋转描边合成                           │
//! │  │   ├─ shadow     阴影合成                               │
//! │  │   └─ encoder    字节预算编码 + 原始字节透传             │
//! │  │                                                       │
//! │  ├─ library ─── 文件系统即数据库                          │
//! │  │   ├─ asset      文件名编解码对                         │
//! │  │   ├─ store      列举/写入/删除/触碰                    │
//! │  │   └─ reconciler 迁移 + 监听对账循环                    │
//! │  │                                                       │
//! │  ├─ session ─── 流程编排与“当前贴纸”槽位                  │
//! │  └─ settings ── 边框开关持久化                            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，会话层操作的返回类型 |
//! | [`sticker`] | 剪贴板载荷 → 尺寸受控贴纸的转码流水线 |
//! | [`library`] | 贴纸文件的命名、排序、存储与远端对账 |
//! | [`session`] | 单事件编排、渲染参数归属、“当前贴纸”槽位 |
//! | [`settings`] | 边框开关的 `settings.json` 持久化 |

pub mod error;
pub mod library;
pub mod session;
pub mod settings;
pub mod sticker;

pub use error::AppError;
pub use library::{
    LibraryStore, LocalSyncedRoot, Reconciler, ReconcilerState, RootEvent, StickerAsset,
    SyncedRoot, format_asset_name, parse_asset_name,
};
pub use session::Session;
pub use sticker::{
    ClipboardSource, EncodedSticker, RawInput, RenderParams, StickerError, WorkingImage, encode,
    rasterize,
};
