//! 设置持久化模块
//!
//! # 设计思路
//!
//! 进程间需要持久化的配置只有一个布尔开关：是否给贴纸加边框。
//! 存放在应用数据目录下的 `settings.json` 里一个众所周知的键下，
//! 启动时读取一次，每次切换后立即写回。
//!
//! # 实现思路
//!
//! - 以 `serde_json::Value` 读改写整个文件，保留未来可能出现的其他键。
//! - 文件或键缺失时取默认值（边框开启）。
//! - 数据目录不存在时自动 `create_dir_all`，避免上层判断。

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;

const SETTINGS_FILE_NAME: &str = "settings.json";
const SHOW_BORDER_KEY: &str = "showBorder";
const SHOW_BORDER_DEFAULT: bool = true;

fn settings_file_path(data_dir: &Path) -> Result<PathBuf, AppError> {
    fs::create_dir_all(data_dir)
        .map_err(|e| AppError::Storage(format!("创建应用数据目录失败: {}", e)))?;
    Ok(data_dir.join(SETTINGS_FILE_NAME))
}

/// 读取边框开关；文件或键不存在时返回默认值。
pub fn load_border_enabled(data_dir: &Path) -> Result<bool, AppError> {
    let settings_path = settings_file_path(data_dir)?;
    if !settings_path.exists() {
        return Ok(SHOW_BORDER_DEFAULT);
    }

    let content = fs::read_to_string(&settings_path)?;
    let parsed = serde_json::from_str::<serde_json::Value>(&content)
        .map_err(|e| AppError::Storage(format!("解析设置文件失败: {}", e)))?;

    Ok(parsed
        .get(SHOW_BORDER_KEY)
        .and_then(|value| value.as_bool())
        .unwrap_or(SHOW_BORDER_DEFAULT))
}

/// 写回边框开关，保留文件中的其他键。
pub fn store_border_enabled(data_dir: &Path, enabled: bool) -> Result<(), AppError> {
    let settings_path = settings_file_path(data_dir)?;

    let mut settings = if settings_path.exists() {
        serde_json::from_str::<serde_json::Value>(&fs::read_to_string(&settings_path)?)
            .unwrap_or_else(|_| serde_json::json!({}))
    } else {
        serde_json::json!({})
    };

    if let Some(object) = settings.as_object_mut() {
        object.insert(SHOW_BORDER_KEY.to_string(), serde_json::Value::Bool(enabled));
    }

    let content = serde_json::to_string_pretty(&settings)
        .map_err(|e| AppError::Storage(format!("序列化设置失败: {}", e)))?;

    fs::write(settings_path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_defaults_on_when_settings_missing() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_border_enabled(dir.path()).expect("load"));
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        store_border_enabled(dir.path(), false).expect("store");
        assert!(!load_border_enabled(dir.path()).expect("load"));
        store_border_enabled(dir.path(), true).expect("store again");
        assert!(load_border_enabled(dir.path()).expect("load again"));
    }

    #[test]
    fn store_preserves_unrelated_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, r#"{"theme":"dark"}"#).expect("seed settings");

        store_border_enabled(dir.path(), false).expect("store");

        let content = fs::read_to_string(&path).expect("read back");
        let parsed: serde_json::Value = serde_json::from_str(&content).expect("parse");
        assert_eq!(parsed["theme"], "dark");
        assert_eq!(parsed[SHOW_BORDER_KEY], false);
    }
}
