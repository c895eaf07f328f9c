//! # 贴纸资产与文件名编解码
//!
//! ## 设计思路
//!
//! 贴纸库没有独立索引：文件名就是唯一身份键，修改时间就是排序键。
//! 为了让这套编码可独立验证，格式化与解析集中为一对函数
//! （`format_asset_name` / `parse_asset_name`），不做零散的字符串拼接。
//!
//! 文件名格式：`<basename>[-border]-<byteCount>.<ext>`。
//! 字节数承担防撞职责——同名同字节数的两次渲染会互相覆盖，这是刻意保留的行为。

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

/// 边框贴纸的文件名后缀。
pub const BORDER_SUFFIX: &str = "-border";

/// 库内一张贴纸文件的完整描述。
///
/// 所有字段都能从文件名与文件系统属性还原，没有边车元数据。
#[derive(Debug, Clone, Serialize)]
pub struct StickerAsset {
    /// 文件完整路径。
    pub path: PathBuf,
    /// 文件名主干（去掉边框后缀、字节数与扩展名）。
    pub basename: String,
    /// 是否带边框后缀。
    pub border: bool,
    /// 文件名内嵌的字节数。
    pub byte_count: u64,
    /// 扩展名（不含点）。
    pub extension: String,
    /// 文件系统修改时间，排序键。
    pub modified: SystemTime,
}

impl StickerAsset {
    /// 从路径与修改时间还原资产；文件名不符合约定时返回 `None`。
    pub fn from_path(path: &Path, modified: SystemTime) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let (basename, border, byte_count, extension) = parse_asset_name(file_name)?;
        Some(Self {
            path: path.to_path_buf(),
            basename,
            border,
            byte_count,
            extension,
            modified,
        })
    }

    /// 重建文件名，应与磁盘上的名字一致。
    pub fn file_name(&self) -> String {
        format_asset_name(&self.basename, self.border, self.byte_count, &self.extension)
    }
}

/// 按约定拼出贴纸文件名。
pub fn format_asset_name(basename: &str, border: bool, byte_count: u64, extension: &str) -> String {
    format!(
        "{}{}-{}.{}",
        basename,
        if border { BORDER_SUFFIX } else { "" },
        byte_count,
        extension
    )
}

/// 解析贴纸文件名；不符合约定时返回 `None`。
///
/// 从尾部解析：先剥扩展名，再剥字节数，剩余部分判定边框后缀。
/// 主干自身可以包含连字符。
pub fn parse_asset_name(file_name: &str) -> Option<(String, bool, u64, String)> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }

    let (rest, count_text) = stem.rsplit_once('-')?;
    let byte_count: u64 = count_text.parse().ok()?;

    let (basename, border) = match rest.strip_suffix(BORDER_SUFFIX) {
        Some(prefix) => (prefix, true),
        None => (rest, false),
    };
    if basename.is_empty() {
        return None;
    }

    Some((basename.to_string(), border, byte_count, extension.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_and_parse_round_trip() {
        for (basename, border, byte_count, extension) in [
            ("sticker", false, 50_000u64, "png"),
            ("sticker", true, 431_998, "jpg"),
            ("my-photo", false, 12, "gif"),
            ("my-photo", true, 99, "png"),
        ] {
            let name = format_asset_name(basename, border, byte_count, extension);
            let parsed = parse_asset_name(&name).expect("round trip should parse");
            assert_eq!(parsed.0, basename);
            assert_eq!(parsed.1, border);
            assert_eq!(parsed.2, byte_count);
            assert_eq!(parsed.3, extension);
        }
    }

    #[test]
    fn parse_rejects_names_without_byte_count() {
        assert!(parse_asset_name("sticker.png").is_none());
        assert!(parse_asset_name("sticker-abc.png").is_none());
        assert!(parse_asset_name(".hidden").is_none());
        assert!(parse_asset_name("-100.png").is_none());
    }

    #[test]
    fn parse_handles_hyphenated_basenames() {
        let parsed = parse_asset_name("a-b-c-1234.png").expect("parse");
        assert_eq!(parsed.0, "a-b-c");
        assert!(!parsed.1);
        assert_eq!(parsed.2, 1234);
    }

    #[test]
    fn asset_from_path_restores_fields() {
        let now = SystemTime::now();
        let asset = StickerAsset::from_path(Path::new("/tmp/cat-border-2048.png"), now)
            .expect("asset should parse");
        assert_eq!(asset.basename, "cat");
        assert!(asset.border);
        assert_eq!(asset.byte_count, 2048);
        assert_eq!(asset.extension, "png");
        assert_eq!(asset.file_name(), "cat-border-2048.png");
    }
}
