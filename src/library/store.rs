//! # 贴纸库存储模块
//!
//! ## 设计思路
//!
//! 统一管理贴纸文件的持久化目录：目录解析（远端同步目录优先，
//! 本地目录兜底）、按修改时间倒序列举、写入命名与覆盖、批量删除、
//! 以及“重新选中置顶”的 mtime 触碰。
//!
//! ## 实现思路
//!
//! - 目录不存在时自动 `create_dir_all`；打开失败是唯一不可恢复的启动错误。
//! - 写入在返回前完整落盘，列表永远不会看到写了一半的文件。
//! - 删除是尽力而为的批量操作，单个失败只记日志不中断。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::error::AppError;
use crate::sticker::EncodedSticker;

use super::asset::{StickerAsset, format_asset_name};

/// 贴纸库目录句柄。
pub struct LibraryStore {
    root: PathBuf,
}

impl LibraryStore {
    /// 打开（必要时创建）贴纸目录。
    ///
    /// # 返回
    /// - `Ok(LibraryStore)` — 目录可用
    /// - `Err(AppError::Storage)` — 无法创建目录，流水线不应再接受输入
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| {
            AppError::Storage(format!("创建贴纸目录 '{}' 失败: {}", root.display(), e))
        })?;
        Ok(Self { root })
    }

    /// 解析生效目录：远端同步目录可用时优先，否则退回本地目录。
    ///
    /// 任意时刻只有一个目录是权威的；本地遗留文件由对账器迁移。
    pub fn resolve_root(remote: Option<PathBuf>, local_fallback: PathBuf) -> PathBuf {
        match remote {
            Some(dir) => dir,
            None => local_fallback,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 列举全部贴纸，最近修改的在前。
    ///
    /// 跳过隐藏文件、子目录和文件名不符合约定的条目。
    pub fn list_sorted(&self) -> Result<Vec<StickerAsset>, AppError> {
        let mut assets = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("⚠️ 读取目录项失败（跳过）: {}", err);
                    continue;
                }
            };

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(err) => {
                    log::warn!("⚠️ 读取文件属性失败（跳过）: {}", err);
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            let path = entry.path();
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with('.'))
                .unwrap_or(true);
            if hidden {
                continue;
            }

            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            match StickerAsset::from_path(&path, modified) {
                Some(asset) => assets.push(asset),
                None => log::debug!("跳过无法解析的文件名: {}", path.display()),
            }
        }

        assets.sort_by(|a, b| b.modified.cmp(&a.modified));

        if log::log_enabled!(log::Level::Debug) {
            for asset in &assets {
                log::debug!(
                    "📁 {} ({})",
                    asset.file_name(),
                    DateTime::<Local>::from(asset.modified).format("%Y-%m-%d %H:%M:%S")
                );
            }
        }

        Ok(assets)
    }

    /// 写入一张新贴纸，并替换掉被取代的“当前”贴纸文件。
    ///
    /// 文件名内嵌字节数做防撞；同名同字节数覆盖属刻意行为。
    /// 被取代文件的删除是尽力而为——写入本身失败才是致命的。
    pub fn write(
        &self,
        encoded: &EncodedSticker,
        basename: &str,
        border: bool,
        supersedes: Option<&Path>,
    ) -> Result<StickerAsset, AppError> {
        if let Some(previous) = supersedes {
            if let Err(err) = fs::remove_file(previous) {
                log::warn!("⚠️ 移除被取代的贴纸 '{}' 失败（忽略）: {}", previous.display(), err);
            }
        }

        let file_name = format_asset_name(basename, border, encoded.byte_count as u64, &encoded.extension);
        let path = self.root.join(&file_name);
        fs::write(&path, &encoded.bytes)?;

        let modified = fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .unwrap_or_else(|_| SystemTime::now());

        log::info!("✅ 贴纸已写入: {} ({} 字节)", path.display(), encoded.byte_count);

        Ok(StickerAsset {
            path,
            basename: basename.to_string(),
            border,
            byte_count: encoded.byte_count as u64,
            extension: encoded.extension.clone(),
            modified,
        })
    }

    /// 批量删除，尽力而为；返回成功删除的数量。
    pub fn delete(&self, assets: &[StickerAsset]) -> usize {
        let mut removed = 0;
        for asset in assets {
            match fs::remove_file(&asset.path) {
                Ok(()) => removed += 1,
                Err(err) => {
                    log::warn!("⚠️ 删除贴纸 '{}' 失败（继续）: {}", asset.path.display(), err);
                }
            }
        }
        removed
    }

    /// 把修改时间顶到现在，让该贴纸重新排到列表最前，不重写内容。
    pub fn touch(&self, asset: &StickerAsset) -> Result<(), AppError> {
        let file = fs::OpenOptions::new().write(true).open(&asset.path)?;
        file.set_modified(SystemTime::now())?;
        Ok(())
    }
}
