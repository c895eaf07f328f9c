//! # 会话编排模块
//!
//! ## 设计思路
//!
//! `Session` 只负责流程编排与状态归属，不接触任何 UI 类型：
//! 处理链路固定为：
//! 1. 读取渲染参数快照
//! 2. 异步读取剪贴板载荷
//! 3. 生成工作图（位图直取 / 文本栅格化）
//! 4. 字节预算编码
//! 5. 写入贴纸库并更新“当前贴纸”槽位
//!
//! ## 实现思路
//!
//! - 参数通过 `RwLock<RenderParams>` 支持边框开关运行时切换，
//!   单次请求内使用同一份快照，避免处理中途参数漂移。
//! - “当前贴纸”槽位是进程内唯一的共享可变状态；并发创建允许
//!   在槽位上竞争，后写者胜，符合“新请求覆盖旧请求”的弱保证。
//! - 记录 `fetch/render/write/total` 阶段耗时，便于性能诊断。

use std::path::PathBuf;
use std::sync::{Mutex, RwLock};
use std::time::Instant;

use crate::error::AppError;
use crate::library::{LibraryStore, StickerAsset};
use crate::settings;
use crate::sticker::{
    ClipboardSource, RawInput, RenderParams, StickerError, WorkingImage, encode, rasterize,
};

/// 贴纸会话。
///
/// 持有渲染参数、贴纸库句柄与“当前贴纸”槽位。
pub struct Session {
    params: RwLock<RenderParams>,
    store: LibraryStore,
    settings_dir: PathBuf,
    current: Mutex<Option<PathBuf>>,
}

impl Session {
    /// 创建会话并从持久化设置恢复边框开关。
    pub fn new(store: LibraryStore, settings_dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let settings_dir = settings_dir.into();
        let mut params = RenderParams::default();
        params.border_enabled = settings::load_border_enabled(&settings_dir)?;

        Ok(Self {
            params: RwLock::new(params),
            store,
            settings_dir,
            current: Mutex::new(None),
        })
    }

    /// 获取参数快照，保证单次请求链路使用一致参数。
    fn params_snapshot(&self) -> Result<RenderParams, AppError> {
        self.params
            .read()
            .map(|params| params.clone())
            .map_err(|_| AppError::Storage("渲染参数读取锁已中毒".to_string()))
    }

    pub fn border_enabled(&self) -> bool {
        self.params
            .read()
            .map(|params| params.border_enabled)
            .unwrap_or(true)
    }

    /// 切换边框开关：先持久化，再更新运行时参数。
    pub fn set_border_enabled(&self, enabled: bool) -> Result<(), AppError> {
        settings::store_border_enabled(&self.settings_dir, enabled)?;
        let mut params = self
            .params
            .write()
            .map_err(|_| AppError::Storage("渲染参数写入锁已中毒".to_string()))?;
        params.border_enabled = enabled;
        log::info!("⚙️ 边框开关已切换: {}", enabled);
        Ok(())
    }

    /// 当前贴纸文件路径（若有）。
    pub fn current_sticker(&self) -> Option<PathBuf> {
        self.current.lock().ok().and_then(|slot| slot.clone())
    }

    pub fn store(&self) -> &LibraryStore {
        &self.store
    }

    /// 处理主入口：从剪贴板来源生成一张新贴纸。
    ///
    /// 任一阶段失败只中止本次操作，上一张贴纸保持原样。
    pub async fn create_sticker<S: ClipboardSource>(
        &self,
        source: &S,
    ) -> Result<StickerAsset, AppError> {
        let params = self.params_snapshot()?;
        let total_start = Instant::now();

        let fetch_start = Instant::now();
        let raw = source.fetch().await?;
        let fetch_elapsed = fetch_start.elapsed();

        let render_start = Instant::now();
        let working = build_working_image(&raw, &params)?;
        let encoded = encode(working, &params, &raw)?;
        let render_elapsed = render_start.elapsed();

        let write_start = Instant::now();
        let basename = raw.basename();
        let previous = self.current_sticker();
        let asset = self
            .store
            .write(&encoded, &basename, params.border_enabled, previous.as_deref())?;
        if let Ok(mut slot) = self.current.lock() {
            *slot = Some(asset.path.clone());
        }
        let write_elapsed = write_start.elapsed();

        log::info!(
            "✅ 贴纸生成完成 - fetch={}ms render={}ms write={}ms total={}ms",
            fetch_elapsed.as_millis(),
            render_elapsed.as_millis(),
            write_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(asset)
    }

    /// 把库中的既有贴纸重新选为当前贴纸：触碰 mtime 使其置顶。
    pub fn select(&self, asset: &StickerAsset) -> Result<(), AppError> {
        self.store.touch(asset)?;
        if let Ok(mut slot) = self.current.lock() {
            *slot = Some(asset.path.clone());
        }
        Ok(())
    }
}

/// 从原始载荷生成工作图：位图优先，其次文本，否则载荷为空。
fn build_working_image(raw: &RawInput, params: &RenderParams) -> Result<WorkingImage, StickerError> {
    if let Some(bitmap) = raw.bitmap.as_ref() {
        return Ok(WorkingImage::from_dynamic(bitmap));
    }
    if let Some(text) = raw.text.as_deref() {
        return rasterize(text, params);
    }
    Err(StickerError::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sticker::StickerError;
    use image::DynamicImage;

    #[test]
    fn build_working_image_prefers_bitmap_over_text() {
        let params = RenderParams::default();
        let mut raw = RawInput::from_bitmap(DynamicImage::new_rgba8(8, 8), None);
        raw.text = Some("ignored".to_string());
        let working = build_working_image(&raw, &params).expect("working image");
        assert_eq!(working.size(), (8, 8));
    }

    #[test]
    fn build_working_image_rejects_empty_payload() {
        let params = RenderParams::default();
        let mut raw = RawInput::from_text("x");
        raw.text = None;
        assert!(matches!(
            build_working_image(&raw, &params),
            Err(StickerError::Empty)
        ));
    }

    #[test]
    fn session_restores_border_flag_from_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings_dir = dir.path().join("config");
        crate::settings::store_border_enabled(&settings_dir, false).expect("seed settings");

        let store = LibraryStore::open(dir.path().join("stickers")).expect("open");
        let session = Session::new(store, &settings_dir).expect("session");
        assert!(!session.border_enabled());
    }

    #[test]
    fn toggling_border_persists_across_sessions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings_dir = dir.path().join("config");

        let store = LibraryStore::open(dir.path().join("stickers")).expect("open");
        let session = Session::new(store, &settings_dir).expect("session");
        assert!(session.border_enabled());
        session.set_border_enabled(false).expect("toggle");

        let store = LibraryStore::open(dir.path().join("stickers")).expect("reopen");
        let reloaded = Session::new(store, &settings_dir).expect("second session");
        assert!(!reloaded.border_enabled());
    }
}
