//! 端到端流水线场景测试：剪贴板载荷 → 贴纸文件。

use async_trait::async_trait;
use clipboard_sticker::{
    ClipboardSource, LibraryStore, RawInput, Session, StickerError,
};
use image::{DynamicImage, Rgba, RgbaImage};

/// 固定载荷的剪贴板来源替身。
struct FixedSource {
    input: RawInput,
}

#[async_trait]
impl ClipboardSource for FixedSource {
    async fn fetch(&self) -> Result<RawInput, StickerError> {
        Ok(self.input.clone())
    }
}

/// 永远为空的剪贴板来源替身。
struct EmptySource;

#[async_trait]
impl ClipboardSource for EmptySource {
    async fn fetch(&self) -> Result<RawInput, StickerError> {
        Err(StickerError::Empty)
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn session_with_border(dir: &std::path::Path, border: bool) -> Session {
    let settings_dir = dir.join("config");
    clipboard_sticker::settings::store_border_enabled(&settings_dir, border)
        .expect("seed border flag");
    let store = LibraryStore::open(dir.join("stickers")).expect("open store");
    Session::new(store, &settings_dir).expect("session")
}

fn noisy_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let seed = x
            .wrapping_mul(2_654_435_761)
            .wrapping_add(y.wrapping_mul(40_503))
            .wrapping_add(x.wrapping_mul(y));
        Rgba([
            (seed >> 24) as u8,
            (seed >> 16) as u8,
            (seed >> 8) as u8,
            255,
        ])
    })
}

#[tokio::test]
async fn opaque_bitmap_becomes_fitted_jpeg() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = session_with_border(dir.path(), false);

    let source = FixedSource {
        input: RawInput::from_bitmap(
            DynamicImage::new_rgb8(1000, 500),
            Some("image/jpeg".to_string()),
        )
        .with_suggested_name("snapshot"),
    };

    let asset = session.create_sticker(&source).await.expect("create sticker");
    assert_eq!(asset.extension, "jpg");
    assert_eq!(asset.basename, "snapshot");

    let decoded = image::open(&asset.path).expect("decode written sticker");
    // 长边收到目标以内，纵横比 2:1 保持在 1 像素误差内
    assert_eq!(decoded.width(), 534);
    assert_eq!(decoded.height(), 267);
}

#[tokio::test]
async fn unscaled_png_passes_original_bytes_through() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = session_with_border(dir.path(), false);

    let bitmap = DynamicImage::new_rgba8(200, 200);
    let mut png_bytes = Vec::new();
    bitmap
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .expect("encode fixture");

    let source = FixedSource {
        input: RawInput::from_bitmap(bitmap, Some("image/png".to_string()))
            .with_original_bytes(png_bytes.clone())
            .with_source_url_stem("badge"),
    };

    let asset = session.create_sticker(&source).await.expect("create sticker");
    assert_eq!(asset.extension, "png");
    assert_eq!(asset.basename, "badge");

    let written = std::fs::read(&asset.path).expect("read written sticker");
    assert_eq!(written, png_bytes, "passthrough must preserve bytes verbatim");
}

#[tokio::test]
async fn oversized_encoding_gets_one_corrective_downscale() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = session_with_border(dir.path(), false);

    let source = FixedSource {
        input: RawInput::from_bitmap(
            DynamicImage::ImageRgba8(noisy_rgba(1000, 1000)),
            Some("image/png".to_string()),
        ),
    };

    let asset = session.create_sticker(&source).await.expect("create sticker");
    let decoded = image::open(&asset.path).expect("decode written sticker");
    assert_eq!(decoded.width().max(decoded.height()), 300);
    assert!((asset.byte_count as usize) < 512_000);
}

#[tokio::test]
async fn border_toggle_produces_expanded_png() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = session_with_border(dir.path(), true);

    let source = FixedSource {
        input: RawInput::from_bitmap(
            DynamicImage::new_rgba8(300, 300),
            Some("image/png".to_string()),
        )
        .with_suggested_name("framed"),
    };

    let asset = session.create_sticker(&source).await.expect("create sticker");
    assert_eq!(asset.extension, "png");
    assert!(asset.border);
    assert!(asset.file_name().contains("-border-"));

    let decoded = image::open(&asset.path).expect("decode written sticker");
    assert!(decoded.width() > 300, "stroke + shadow must expand the canvas");
    assert!(decoded.height() > 300);
}

#[tokio::test]
async fn new_sticker_supersedes_the_current_one() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = session_with_border(dir.path(), false);

    let first_source = FixedSource {
        input: RawInput::from_bitmap(DynamicImage::new_rgb8(64, 64), None)
            .with_suggested_name("first"),
    };
    let second_source = FixedSource {
        input: RawInput::from_bitmap(DynamicImage::new_rgb8(96, 96), None)
            .with_suggested_name("second"),
    };

    let first = session.create_sticker(&first_source).await.expect("first");
    let second = session.create_sticker(&second_source).await.expect("second");

    assert!(!first.path.exists(), "superseded sticker must be removed");
    assert!(second.path.exists());
    assert_eq!(session.current_sticker(), Some(second.path.clone()));

    let listing = session.store().list_sorted().expect("list");
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].basename, "second");
}

#[tokio::test]
async fn empty_clipboard_aborts_without_touching_the_library() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = session_with_border(dir.path(), false);

    let err = session
        .create_sticker(&EmptySource)
        .await
        .expect_err("empty payload must fail");
    assert!(matches!(
        err,
        clipboard_sticker::AppError::Sticker(StickerError::Empty)
    ));
    assert!(session.current_sticker().is_none());
    assert!(session.store().list_sorted().expect("list").is_empty());
}

#[tokio::test]
#[ignore = "requires a system font"]
async fn short_text_becomes_square_transparent_sticker() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let session = session_with_border(dir.path(), false);

    let source = FixedSource {
        input: RawInput::from_text("Hi"),
    };

    let asset = session.create_sticker(&source).await.expect("create sticker");
    assert_eq!(asset.extension, "png");
    assert_eq!(asset.basename, "Hi");

    let decoded = image::open(&asset.path).expect("decode written sticker");
    assert_eq!(decoded.width(), 534);
    assert_eq!(decoded.height(), 534);
    assert!(decoded.color().has_alpha());
}
