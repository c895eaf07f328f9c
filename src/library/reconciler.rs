//! # 贴纸库对账模块
//!
//! ## 设计思路
//!
//! 对账器负责让内存中的有序列表与远端目录保持一致，生命周期内经历
//! 三个状态：`Idle → Migrating → Watching`，没有终态——进程退出或
//! 事件通道关闭即停止。
//!
//! - **Migrating**：远端目录可用且本地兜底目录还有遗留文件时，
//!   把它们逐个移动（不是复制）进远端目录，单个失败记日志继续。
//! - **Watching**：从单消费者通道逐批消费变更事件，每批之后重算
//!   完整有序列表。单消费者串行取代了“暂停通知 → 重算 → 恢复通知”
//!   的括号，处理中不会观察到自己触发的半更新列表。
//!
//! 首次完整枚举时，对仍是远端占位的条目发起按需物化。
//! 对账错误只记日志，绝不拆掉监听循环。

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use super::asset::StickerAsset;
use super::root::{RootEvent, SyncedRoot};
use super::store::LibraryStore;

/// 对账器生命周期状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilerState {
    Idle,
    Migrating,
    Watching,
}

/// 贴纸库对账器。
///
/// 持有远端目录接口与库存储句柄，对外暴露一份共享的有序列表。
pub struct Reconciler<R: SyncedRoot> {
    root: R,
    local_fallback: PathBuf,
    store: LibraryStore,
    listing: Arc<RwLock<Vec<StickerAsset>>>,
    state: Arc<RwLock<ReconcilerState>>,
}

impl<R: SyncedRoot> Reconciler<R> {
    pub fn new(root: R, local_fallback: impl Into<PathBuf>, store: LibraryStore) -> Self {
        Self {
            root,
            local_fallback: local_fallback.into(),
            store,
            listing: Arc::new(RwLock::new(Vec::new())),
            state: Arc::new(RwLock::new(ReconcilerState::Idle)),
        }
    }

    /// 共享的有序列表句柄；对账循环每消费一批事件就整体替换内容。
    pub fn listing(&self) -> Arc<RwLock<Vec<StickerAsset>>> {
        Arc::clone(&self.listing)
    }

    /// 共享的状态句柄，主要供诊断与测试观察。
    pub fn state_handle(&self) -> Arc<RwLock<ReconcilerState>> {
        Arc::clone(&self.state)
    }

    /// 运行对账循环，直到事件通道关闭。
    pub async fn run(mut self) {
        self.set_state(ReconcilerState::Migrating);
        self.migrate_local_files();

        let events = self.root.subscribe();
        self.set_state(ReconcilerState::Watching);
        self.refresh_listing(true);

        let Some(mut events) = events else {
            log::warn!("⚠️ 远端事件通道已被取走，对账器只完成一次性同步");
            return;
        };

        while let Some(batch) = events.recv().await {
            for event in &batch {
                match event {
                    RootEvent::Added(path) => log::debug!("📁 远端新增: {}", path.display()),
                    RootEvent::Removed(path) => log::debug!("📁 远端移除: {}", path.display()),
                }
            }
            self.refresh_listing(false);
        }

        log::info!("📋 贴纸库对账循环结束");
    }

    fn set_state(&self, state: ReconcilerState) {
        if let Ok(mut current) = self.state.write() {
            *current = state;
        }
    }

    /// 把本地兜底目录的遗留文件搬进远端目录，尽力而为。
    fn migrate_local_files(&self) {
        if self.local_fallback.as_path() == self.store.root() {
            return;
        }
        // 本地目录不存在说明没有遗留文件
        let entries = match fs::read_dir(&self.local_fallback) {
            Ok(entries) => entries,
            Err(_) => return,
        };

        let mut moved = 0usize;
        let mut failed = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let destination = self.store.root().join(file_name);

            match fs::rename(&path, &destination) {
                Ok(()) => moved += 1,
                Err(rename_err) => {
                    // 跨设备移动回退为复制后删除
                    match fs::copy(&path, &destination).and_then(|_| fs::remove_file(&path)) {
                        Ok(()) => moved += 1,
                        Err(copy_err) => {
                            failed += 1;
                            log::warn!(
                                "⚠️ 迁移 '{}' 失败（继续）: {} / {}",
                                path.display(),
                                rename_err,
                                copy_err
                            );
                        }
                    }
                }
            }
        }

        if moved > 0 || failed > 0 {
            log::info!("✅ 本地贴纸迁移完成: 成功 {} 个，失败 {} 个", moved, failed);
        }
    }

    /// 重算完整有序列表；首次枚举时顺带触发占位条目下载。
    fn refresh_listing(&self, first_enumeration: bool) {
        let assets = match self.store.list_sorted() {
            Ok(assets) => assets,
            Err(err) => {
                log::warn!("⚠️ 刷新贴纸列表失败: {}", err);
                return;
            }
        };

        if first_enumeration {
            for asset in &assets {
                if self.root.needs_materialize(&asset.path) {
                    if let Err(err) = self.root.materialize(&asset.path) {
                        log::warn!("⚠️ 请求下载 '{}' 失败: {}", asset.path.display(), err);
                    }
                }
            }
        }

        match self.listing.write() {
            Ok(mut listing) => *listing = assets,
            Err(_) => log::warn!("⚠️ 贴纸列表写锁中毒，跳过本次刷新"),
        }
    }
}
