//! # 贴纸库模块（library）
//!
//! ## 设计思路
//!
//! 贴纸库是“文件系统即数据库”：文件名编码身份，修改时间充当排序键，
//! 没有任何边车索引。模块按职责拆分：
//!
//! - `asset`：资产模型与文件名编解码对
//! - `store`：目录解析、列举排序、写入、删除、mtime 触碰
//! - `root`：远端同步目录的能力接口与本地兜底实现
//! - `reconciler`：迁移 + 监听的后台对账循环

mod asset;
mod reconciler;
mod root;
mod store;

pub use asset::{BORDER_SUFFIX, StickerAsset, format_asset_name, parse_asset_name};
pub use reconciler::{Reconciler, ReconcilerState};
pub use root::{LocalSyncedRoot, RootEvent, SyncedRoot};
pub use store::LibraryStore;
