// SPDX-License-Identifier: GPL-3.0-or-later
// tests/workflow.rs
//
// End-to-end scenarios driven through the runtime.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use tokio::sync::Semaphore;

use tikcrop::app::{AppMessage, Runtime, Services};
use tikcrop::config::{AppConfig, MemoryStore, SettingsStore, Theme};
use tikcrop::domain::{CropRect, Dimensions, InputFile, ItemId, ItemStatus};
use tikcrop::export::{ArchiveEntry, Archiver, MemorySink};
use tikcrop::predict::{CropPredictor, RenderableImage};

// =============================================================================
// Fixtures
// =============================================================================

/// Predicts the top-left quarter offset by one pixel. Fails for images of
/// `fail_width`. Every prediction waits for a permit from `gate`.
struct TestPredictor {
    ready: bool,
    fail_width: Option<u32>,
    gate: Arc<Semaphore>,
    calls: AtomicUsize,
}

impl TestPredictor {
    fn open() -> Arc<Self> {
        Arc::new(Self {
            ready: true,
            fail_width: None,
            gate: Arc::new(Semaphore::new(1000)),
            calls: AtomicUsize::new(0),
        })
    }

    fn gated(fail_width: Option<u32>) -> Arc<Self> {
        Arc::new(Self {
            ready: true,
            fail_width,
            gate: Arc::new(Semaphore::new(0)),
            calls: AtomicUsize::new(0),
        })
    }

    fn not_ready() -> Arc<Self> {
        Arc::new(Self {
            ready: false,
            fail_width: None,
            gate: Arc::new(Semaphore::new(1000)),
            calls: AtomicUsize::new(0),
        })
    }

    fn release(&self) {
        self.gate.add_permits(1000);
    }

    fn release_one(&self) {
        self.gate.add_permits(1);
    }

    fn expected(dims: Dimensions) -> CropRect {
        CropRect::new(1, 1, dims.width / 2, dims.height / 2)
    }
}

impl CropPredictor for TestPredictor {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn predict(&self, image: RenderableImage) -> BoxFuture<'static, anyhow::Result<CropRect>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = Arc::clone(&self.gate);
        let fail_width = self.fail_width;
        async move {
            let _permit = gate.acquire().await?;
            let dims = image.dimensions();
            if Some(dims.width) == fail_width {
                anyhow::bail!("model rejected {dims}");
            }
            Ok(TestPredictor::expected(dims))
        }
        .boxed()
    }
}

/// Archiver that always fails to package.
struct BrokenArchiver;

impl Archiver for BrokenArchiver {
    fn package(&self, _entries: &[ArchiveEntry]) -> anyhow::Result<Vec<u8>> {
        anyhow::bail!("disk full")
    }
}

struct Harness {
    runtime: Runtime,
    sink: Arc<MemorySink>,
}

fn harness(predictor: Arc<TestPredictor>) -> Harness {
    harness_with_store(predictor, Arc::new(MemoryStore::default()))
}

fn harness_with_store(predictor: Arc<TestPredictor>, store: Arc<dyn SettingsStore>) -> Harness {
    harness_with(Services::new(predictor, Arc::new(MemorySink::default())).with_settings(store))
}

fn harness_with(services: Services) -> Harness {
    let sink = Arc::new(MemorySink::default());
    let config = AppConfig {
        download_release_delay: Duration::ZERO,
        ..AppConfig::default()
    };
    let services = Services {
        downloads: sink.clone(),
        ..services.with_config(config)
    };
    Harness {
        runtime: Runtime::new(services),
        sink,
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn image_file(name: &str, width: u32, height: u32) -> InputFile {
    InputFile::new(name, "image/png", png(width, height))
}

fn broken_file(name: &str) -> InputFile {
    InputFile::new(name, "image/png", b"not a png".to_vec())
}

fn rect(x: u32, y: u32, w: u32, h: u32) -> CropRect {
    CropRect::new(x, y, w, h)
}

async fn ingest(runtime: &mut Runtime, files: Vec<InputFile>) -> Vec<ItemId> {
    let before = runtime.model().registry.len();
    runtime.dispatch(AppMessage::FilesDropped(files));
    let ids = runtime.model().registry.ids()[before..].to_vec();
    runtime.run_until_idle().await;
    ids
}

fn crop_of(runtime: &Runtime, id: ItemId) -> CropRect {
    runtime.model().registry.get(id).unwrap().crop().unwrap()
}

fn history_of(runtime: &Runtime, id: ItemId) -> (Vec<CropRect>, usize) {
    let item = runtime.model().registry.get(id).unwrap();
    let loaded = item.loaded().unwrap();
    (loaded.history.entries().to_vec(), loaded.history.cursor())
}

// =============================================================================
// Ingestion and editing
// =============================================================================

#[tokio::test]
async fn test_ingest_inserts_loading_placeholders_synchronously() {
    let mut h = harness(TestPredictor::open());
    h.runtime.dispatch(AppMessage::FilesDropped(vec![
        image_file("a.png", 4, 4),
        InputFile::new("readme.txt", "text/plain", b"hello".to_vec()),
    ]));

    let model = h.runtime.model();
    assert_eq!(model.registry.len(), 1);
    assert_eq!(
        model.registry.iter().next().unwrap().status(),
        ItemStatus::Loading
    );

    h.runtime.run_until_idle().await;
    assert_eq!(h.runtime.model().registry.loaded_count(), 1);
}

#[tokio::test]
async fn test_drag_undo_and_truncating_commit() {
    let mut h = harness(TestPredictor::open());
    let ids = ingest(&mut h.runtime, vec![image_file("photo.png", 800, 600)]).await;
    let id = ids[0];

    let item = h.runtime.model().registry.get(id).unwrap();
    assert_eq!(item.status(), ItemStatus::Loaded);
    assert_eq!(item.dimensions(), Some(Dimensions::new(800, 600)));
    assert_eq!(history_of(&h.runtime, id), (vec![rect(0, 0, 800, 600)], 0));

    h.runtime.dispatch(AppMessage::CropPreview {
        id,
        crop: rect(100, 100, 400, 300),
    });
    assert_eq!(crop_of(&h.runtime, id), rect(100, 100, 400, 300));
    assert_eq!(history_of(&h.runtime, id).0.len(), 1);

    h.runtime.dispatch(AppMessage::CropCommitEnd(id));
    assert_eq!(crop_of(&h.runtime, id), rect(100, 100, 400, 300));
    assert_eq!(history_of(&h.runtime, id).0.len(), 2);
    assert_eq!(history_of(&h.runtime, id).1, 1);

    h.runtime.dispatch(AppMessage::Undo(id));
    assert_eq!(crop_of(&h.runtime, id), rect(0, 0, 800, 600));
    assert_eq!(history_of(&h.runtime, id).1, 0);
    assert!(h.runtime.model().registry.get(id).unwrap().can_redo());

    h.runtime.dispatch(AppMessage::CropCommit {
        id,
        crop: rect(50, 50, 200, 200),
    });
    assert_eq!(
        history_of(&h.runtime, id),
        (vec![rect(0, 0, 800, 600), rect(50, 50, 200, 200)], 1)
    );
    assert!(!h.runtime.model().registry.get(id).unwrap().can_redo());

    // Redo has nothing left to restore.
    h.runtime.dispatch(AppMessage::Redo(id));
    assert_eq!(crop_of(&h.runtime, id), rect(50, 50, 200, 200));
}

#[tokio::test]
async fn test_out_of_bounds_edits_are_rejected() {
    let mut h = harness(TestPredictor::open());
    let id = ingest(&mut h.runtime, vec![image_file("a.png", 40, 40)]).await[0];

    h.runtime.dispatch(AppMessage::CropPreview {
        id,
        crop: rect(30, 30, 20, 20),
    });
    h.runtime.dispatch(AppMessage::CropCommit {
        id,
        crop: rect(0, 0, 0, 10),
    });
    assert_eq!(crop_of(&h.runtime, id), rect(0, 0, 40, 40));
    assert_eq!(history_of(&h.runtime, id).0.len(), 1);
}

#[tokio::test]
async fn test_decode_failure_only_affects_its_item() {
    let mut h = harness(TestPredictor::open());
    let ids = ingest(
        &mut h.runtime,
        vec![broken_file("bad.png"), image_file("good.png", 8, 8)],
    )
    .await;

    let registry = &h.runtime.model().registry;
    assert_eq!(registry.get(ids[0]).unwrap().status(), ItemStatus::Error);
    assert_eq!(registry.get(ids[1]).unwrap().status(), ItemStatus::Loaded);
    assert!(registry.get(ids[0]).unwrap().crop().is_none());
}

#[tokio::test]
async fn test_remove_releases_handles_and_clears_focus() {
    let mut h = harness(TestPredictor::open());
    let ids = ingest(
        &mut h.runtime,
        vec![image_file("a.png", 4, 4), image_file("b.png", 4, 4)],
    )
    .await;
    let handles = Arc::clone(&h.runtime.services().handles);
    assert_eq!(handles.live_count(), 2);

    h.runtime.dispatch(AppMessage::Focus(Some(ids[0])));
    assert_eq!(h.runtime.model().focused, Some(ids[0]));

    h.runtime.dispatch(AppMessage::Remove(ids[0]));
    h.runtime.dispatch(AppMessage::Remove(ids[0]));
    assert_eq!(h.runtime.model().focused, None);
    assert_eq!(h.runtime.model().registry.len(), 1);
    assert_eq!(handles.live_count(), 1);

    h.runtime.dispatch(AppMessage::Remove(ids[1]));
    assert_eq!(handles.live_count(), 0);
}

#[tokio::test]
async fn test_remove_while_decoding_discards_result() {
    let mut h = harness(TestPredictor::open());
    h.runtime
        .dispatch(AppMessage::FilesDropped(vec![image_file("a.png", 4, 4)]));
    let id = h.runtime.model().registry.ids()[0];
    h.runtime.dispatch(AppMessage::Remove(id));

    h.runtime.run_until_idle().await;
    assert!(h.runtime.model().registry.is_empty());
}

// =============================================================================
// Auto-crop
// =============================================================================

#[tokio::test]
async fn test_auto_crop_all_settles_once_with_partial_failure() {
    let predictor = TestPredictor::gated(Some(30));
    let mut h = harness(Arc::clone(&predictor));
    let ids = ingest(
        &mut h.runtime,
        vec![
            image_file("a.png", 20, 10),
            image_file("b.png", 30, 30),
            broken_file("c.png"),
            image_file("d.png", 40, 20),
        ],
    )
    .await;

    h.runtime.dispatch(AppMessage::AutoCropAll);
    assert!(h.runtime.model().busy.is_busy());
    h.runtime.pump();
    assert!(h.runtime.model().busy.is_busy());
    assert_eq!(predictor.calls.load(Ordering::SeqCst), 3);

    // A second batch while busy is ignored.
    h.runtime.dispatch(AppMessage::AutoCropAll);
    assert_eq!(h.runtime.pending(), 1);

    predictor.release();
    h.runtime.run_until_idle().await;

    let model = h.runtime.model();
    assert!(!model.busy.is_busy());
    assert_eq!(model.busy.settle_count(), 1);
    assert_eq!(model.registry.len(), 4);
    assert_eq!(
        crop_of(&h.runtime, ids[0]),
        TestPredictor::expected(Dimensions::new(20, 10))
    );
    assert_eq!(crop_of(&h.runtime, ids[1]), rect(0, 0, 30, 30));
    assert_eq!(history_of(&h.runtime, ids[1]).0.len(), 1);
    assert_eq!(model.registry.get(ids[2]).unwrap().status(), ItemStatus::Error);
    assert_eq!(
        crop_of(&h.runtime, ids[3]),
        TestPredictor::expected(Dimensions::new(40, 20))
    );
    // Batch failures never raise a notice.
    assert!(model.notice.is_none());
}

#[tokio::test]
async fn test_batch_control_availability() {
    let predictor = TestPredictor::gated(None);
    let mut h = harness(Arc::clone(&predictor));
    assert!(!h.runtime.model().can_auto_crop_all());

    let ids = ingest(&mut h.runtime, vec![broken_file("bad.png")]).await;
    assert!(!h.runtime.model().can_auto_crop_all());

    ingest(&mut h.runtime, vec![image_file("a.png", 10, 10)]).await;
    assert!(h.runtime.model().can_auto_crop_all());

    h.runtime.dispatch(AppMessage::AutoCropAll);
    assert!(!h.runtime.model().can_auto_crop_all());

    predictor.release();
    h.runtime.run_until_idle().await;
    assert!(h.runtime.model().can_auto_crop_all());

    h.runtime.dispatch(AppMessage::Remove(ids[0]));
    assert!(h.runtime.model().can_auto_crop_all());
}

#[tokio::test]
async fn test_batch_control_requires_ready_model() {
    let mut h = harness(TestPredictor::not_ready());
    ingest(&mut h.runtime, vec![image_file("a.png", 10, 10)]).await;
    assert!(!h.runtime.model().can_auto_crop_all());
}

#[tokio::test]
async fn test_auto_crop_all_without_loaded_items_stays_idle() {
    let mut h = harness(TestPredictor::open());
    ingest(&mut h.runtime, vec![broken_file("bad.png")]).await;

    h.runtime.dispatch(AppMessage::AutoCropAll);
    assert!(!h.runtime.model().busy.is_busy());
    assert!(h.runtime.is_idle());
    assert_eq!(h.runtime.model().busy.settle_count(), 0);
}

#[tokio::test]
async fn test_auto_crop_requires_ready_model() {
    let predictor = TestPredictor::not_ready();
    let mut h = harness(Arc::clone(&predictor));
    let id = ingest(&mut h.runtime, vec![image_file("a.png", 10, 10)]).await[0];
    assert!(!h.runtime.model().model_ready);

    h.runtime.dispatch(AppMessage::AutoCropAll);
    h.runtime.dispatch(AppMessage::AutoCropOne(id));
    assert!(h.runtime.is_idle());
    assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_item_removed_during_batch_is_not_resurrected() {
    let predictor = TestPredictor::gated(None);
    let mut h = harness(Arc::clone(&predictor));
    let ids = ingest(
        &mut h.runtime,
        vec![image_file("a.png", 10, 10), image_file("b.png", 12, 12)],
    )
    .await;

    h.runtime.dispatch(AppMessage::AutoCropAll);
    h.runtime.pump();
    h.runtime.dispatch(AppMessage::Remove(ids[0]));
    h.runtime
        .dispatch(AppMessage::FilesDropped(vec![image_file("late.png", 6, 6)]));

    predictor.release();
    h.runtime.run_until_idle().await;

    let registry = &h.runtime.model().registry;
    assert!(!registry.contains(ids[0]));
    assert_eq!(registry.len(), 2);
    assert_eq!(
        crop_of(&h.runtime, ids[1]),
        TestPredictor::expected(Dimensions::new(12, 12))
    );
    let late = registry.ids()[1];
    assert_eq!(crop_of(&h.runtime, late), rect(0, 0, 6, 6));
    // Derived prediction handles are gone; only the two sources remain.
    assert_eq!(h.runtime.services().handles.live_count(), 2);
}

#[tokio::test]
async fn test_manual_edit_during_batch_is_overwritten() {
    let predictor = TestPredictor::gated(None);
    let mut h = harness(Arc::clone(&predictor));
    let id = ingest(&mut h.runtime, vec![image_file("a.png", 20, 20)]).await[0];

    h.runtime.dispatch(AppMessage::AutoCropAll);
    h.runtime.pump();
    h.runtime.dispatch(AppMessage::CropCommit {
        id,
        crop: rect(2, 2, 5, 5),
    });
    assert_eq!(crop_of(&h.runtime, id), rect(2, 2, 5, 5));

    predictor.release();
    h.runtime.run_until_idle().await;

    let expected = TestPredictor::expected(Dimensions::new(20, 20));
    assert_eq!(crop_of(&h.runtime, id), expected);
    assert_eq!(
        history_of(&h.runtime, id),
        (vec![rect(0, 0, 20, 20), expected], 1)
    );
}

#[tokio::test]
async fn test_single_auto_crop_drives_busy_only_when_unfocused() {
    let predictor = TestPredictor::gated(None);
    let mut h = harness(Arc::clone(&predictor));
    let ids = ingest(
        &mut h.runtime,
        vec![image_file("a.png", 10, 10), image_file("b.png", 16, 8)],
    )
    .await;

    h.runtime.dispatch(AppMessage::AutoCropOne(ids[0]));
    assert!(h.runtime.model().busy.is_busy());
    predictor.release();
    h.runtime.run_until_idle().await;
    assert!(!h.runtime.model().busy.is_busy());
    assert_eq!(h.runtime.model().busy.settle_count(), 1);

    h.runtime.dispatch(AppMessage::Focus(Some(ids[1])));
    h.runtime.dispatch(AppMessage::AutoCropOne(ids[1]));
    assert!(!h.runtime.model().busy.is_busy());
    h.runtime.run_until_idle().await;
    assert_eq!(h.runtime.model().busy.settle_count(), 1);
    assert_eq!(
        crop_of(&h.runtime, ids[1]),
        TestPredictor::expected(Dimensions::new(16, 8))
    );
    assert_eq!(history_of(&h.runtime, ids[1]).1, 1);
}

#[tokio::test]
async fn test_overlapping_single_auto_crops_keep_busy_until_last() {
    let predictor = TestPredictor::gated(None);
    let mut h = harness(Arc::clone(&predictor));
    let ids = ingest(
        &mut h.runtime,
        vec![image_file("a.png", 10, 10), image_file("b.png", 12, 12)],
    )
    .await;

    h.runtime.dispatch(AppMessage::AutoCropOne(ids[0]));
    h.runtime.dispatch(AppMessage::AutoCropOne(ids[1]));
    h.runtime.pump();
    assert!(h.runtime.model().busy.is_busy());

    predictor.release_one();
    assert_eq!(h.runtime.pump(), 1);
    assert!(h.runtime.model().busy.is_busy());
    assert_eq!(h.runtime.model().busy.settle_count(), 0);

    predictor.release();
    h.runtime.run_until_idle().await;
    assert!(!h.runtime.model().busy.is_busy());
    assert_eq!(h.runtime.model().busy.settle_count(), 1);
}

#[tokio::test]
async fn test_single_auto_crop_during_batch_leaves_flag_to_batch() {
    let predictor = TestPredictor::gated(None);
    let mut h = harness(Arc::clone(&predictor));
    let ids = ingest(
        &mut h.runtime,
        vec![image_file("a.png", 10, 10), image_file("b.png", 12, 12)],
    )
    .await;

    h.runtime.dispatch(AppMessage::AutoCropAll);
    h.runtime.pump();
    h.runtime.dispatch(AppMessage::AutoCropOne(ids[1]));

    predictor.release();
    h.runtime.run_until_idle().await;
    assert!(!h.runtime.model().busy.is_busy());
    assert_eq!(h.runtime.model().busy.settle_count(), 1);
}

#[tokio::test]
async fn test_single_auto_crop_failure_sets_notice() {
    let predictor = TestPredictor::gated(Some(10));
    predictor.release();
    let mut h = harness(predictor);
    let id = ingest(&mut h.runtime, vec![image_file("a.png", 10, 10)]).await[0];

    h.runtime.dispatch(AppMessage::AutoCropOne(id));
    h.runtime.run_until_idle().await;

    assert_eq!(crop_of(&h.runtime, id), rect(0, 0, 10, 10));
    assert!(h.runtime.model().notice.is_some());
    assert!(!h.runtime.model().busy.is_busy());

    h.runtime.dispatch(AppMessage::DismissNotice);
    assert!(h.runtime.model().notice.is_none());
}

#[tokio::test]
async fn test_removed_item_prediction_is_discarded() {
    let predictor = TestPredictor::gated(None);
    let mut h = harness(Arc::clone(&predictor));
    let ids = ingest(
        &mut h.runtime,
        vec![image_file("a.png", 10, 10), image_file("b.png", 10, 10)],
    )
    .await;

    h.runtime.dispatch(AppMessage::AutoCropOne(ids[0]));
    h.runtime.pump();
    h.runtime.dispatch(AppMessage::Remove(ids[0]));

    predictor.release();
    h.runtime.run_until_idle().await;

    let model = h.runtime.model();
    assert_eq!(model.registry.ids(), vec![ids[1]]);
    assert_eq!(crop_of(&h.runtime, ids[1]), rect(0, 0, 10, 10));
    assert!(model.notice.is_none());
    assert!(!model.busy.is_busy());
    assert_eq!(h.runtime.services().handles.live_count(), 1);
}

// =============================================================================
// Export
// =============================================================================

#[tokio::test]
async fn test_batch_export_skips_non_loaded_items() {
    let mut h = harness(TestPredictor::open());
    let ids = ingest(
        &mut h.runtime,
        vec![
            image_file("first.jpg", 30, 20),
            broken_file("broken.png"),
            image_file("second.png", 10, 10),
        ],
    )
    .await;
    h.runtime.dispatch(AppMessage::CropCommit {
        id: ids[0],
        crop: rect(5, 5, 10, 8),
    });

    h.runtime.dispatch(AppMessage::ExportAll);
    h.runtime.run_until_idle().await;

    let delivered = h.sink.delivered();
    assert_eq!(delivered.len(), 1);
    let (name, bytes) = &delivered[0];
    assert_eq!(name, "TikCrop_batch.zip");

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
    assert_eq!(archive.len(), 2);
    let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(names, vec!["TikCrop_first.png", "TikCrop_second.png"]);

    let mut entry = archive.by_name("TikCrop_first.png").unwrap();
    let mut png_bytes = Vec::new();
    std::io::Read::read_to_end(&mut entry, &mut png_bytes).unwrap();
    let cropped = image::load_from_memory(&png_bytes).unwrap();
    assert_eq!(cropped.dimensions(), (10, 8));

    // The download handle is released once the delay elapses.
    assert_eq!(h.runtime.services().handles.live_count(), 3);
}

#[tokio::test]
async fn test_export_one_delivers_cropped_png() {
    let mut h = harness(TestPredictor::open());
    let id = ingest(&mut h.runtime, vec![image_file("shot.webp.png", 50, 40)]).await[0];
    h.runtime.dispatch(AppMessage::CropCommit {
        id,
        crop: rect(10, 10, 25, 15),
    });

    h.runtime.dispatch(AppMessage::ExportOne(id));
    h.runtime.run_until_idle().await;

    let delivered = h.sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "TikCrop_shot.webp.png");
    let out = image::load_from_memory(&delivered[0].1).unwrap();
    assert_eq!(out.dimensions(), (25, 15));
}

#[tokio::test]
async fn test_archive_failure_only_fails_that_export() {
    let services = Services::new(TestPredictor::open(), Arc::new(MemorySink::default()))
        .with_archiver(Arc::new(BrokenArchiver));
    let mut h = harness_with(services);
    let id = ingest(&mut h.runtime, vec![image_file("a.png", 8, 8)]).await[0];

    h.runtime.dispatch(AppMessage::ExportAll);
    h.runtime.run_until_idle().await;
    assert!(h.sink.delivered().is_empty());
    assert_eq!(
        h.runtime.model().notice.as_deref(),
        Some("Failed to export images.")
    );
    assert_eq!(h.runtime.services().handles.live_count(), 1);

    h.runtime.dispatch(AppMessage::DismissNotice);
    h.runtime.dispatch(AppMessage::ExportOne(id));
    h.runtime.run_until_idle().await;
    let delivered = h.sink.delivered();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].0, "TikCrop_a.png");
    assert!(h.runtime.model().notice.is_none());
}

#[tokio::test]
async fn test_failed_single_render_delivers_nothing() {
    let mut h = harness(TestPredictor::open());
    let id = ingest(&mut h.runtime, vec![image_file("a.png", 8, 8)]).await[0];

    h.runtime.dispatch(AppMessage::ExportOneFinished {
        id,
        file_name: "TikCrop_a.png".to_string(),
        png: None,
    });
    assert!(h.runtime.is_idle());
    assert!(h.sink.delivered().is_empty());
    assert_eq!(
        h.runtime.model().notice.as_deref(),
        Some("Failed to export image.")
    );
    assert_eq!(crop_of(&h.runtime, id), rect(0, 0, 8, 8));
}

#[tokio::test]
async fn test_export_one_ignores_non_loaded_item() {
    let mut h = harness(TestPredictor::open());
    let id = ingest(&mut h.runtime, vec![broken_file("bad.png")]).await[0];
    h.runtime.dispatch(AppMessage::ExportOne(id));
    assert!(h.runtime.is_idle());
    assert!(h.sink.delivered().is_empty());
}

// =============================================================================
// Theme
// =============================================================================

#[tokio::test]
async fn test_theme_toggle_persists_across_sessions() {
    let store: Arc<dyn SettingsStore> = Arc::new(MemoryStore::default());
    store.set("theme", "light").unwrap();

    let mut first = harness_with_store(TestPredictor::open(), Arc::clone(&store));
    assert_eq!(first.runtime.model().theme, Theme::Light);
    first.runtime.dispatch(AppMessage::ToggleTheme);
    assert_eq!(first.runtime.model().theme, Theme::Dark);
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));

    let second = harness_with_store(TestPredictor::open(), store);
    assert_eq!(second.runtime.model().theme, Theme::Dark);
}
