//! Integration tests for peakstore
//!
//! These tests verify the importer path from wire bytes through the codec
//! into a point store and back out to an exporter.

use std::sync::Arc;
use std::thread;

use peakstore::prelude::*;
use tempfile::tempdir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Store, read back, edit a copy, then select from it
#[test]
fn test_disk_store_edit_and_select_scenario() {
    init_logging();
    let dir = tempdir().unwrap();
    let store = TmpFileDataPointStore::new_in(dir.path()).unwrap();

    let mut stored = MzPointBuffer::new();
    stored
        .set_buffers(vec![1.0, 3.0, 5.0], vec![10.0, 30.0, 50.0], 3)
        .unwrap();
    let id = store.store(&stored).unwrap();
    assert_eq!(id.get(), 1);

    let mut copy: MzPointBuffer = store.read(id).unwrap();
    copy.add(2.0, 20.0);
    assert_eq!(copy.primary(), &[1.0, 2.0, 3.0, 5.0]);
    assert_eq!(copy.intensity(), &[10.0, 20.0, 30.0, 50.0]);
    assert_eq!(copy.len(), 4);

    let selected = copy.select(2.0..=4.0, 0.0..=100.0);
    assert_eq!(selected.primary(), &[2.0, 3.0]);

    // the stored snapshot is unaffected by edits to the copy
    assert_eq!(store.read::<Mz>(id).unwrap(), stored);
    store.dispose();
}

/// mzML arrays decoded, stored, then re-encoded for export
#[test]
fn test_import_store_export_cycle() {
    init_logging();
    let store = StoreConfig::memory().open().unwrap();

    // binaryDataArray cvParams: m/z array, 64-bit, zlib / intensity array, 32-bit, none
    let mz_config =
        CodecConfig::from_cv_accessions(["MS:1000514", "MS:1000523", "MS:1000574"], 5).unwrap();
    let intensity_config =
        CodecConfig::from_cv_accessions(["MS:1000515", "MS:1000521", "MS:1000576"], 5).unwrap();

    let mz_text = "eJxjYACBSAcwJZAJoY8UQehL1Q5rf8XkunpNdgAAZZcIKA==";
    let intensity_text =
        PeakCodec::encode_to_string(&[5.0f32, 4.0, 3.0, 2.0, 1.0], &intensity_config).unwrap();

    let mut spectrum = MzPointBuffer::new();
    PeakCodec::decode_into_buffer(
        &mut spectrum,
        mz_text.as_bytes(),
        &mz_config,
        intensity_text.as_bytes(),
        &intensity_config,
    )
    .unwrap();
    assert_eq!(spectrum.base_peak(), Some((100.0, 5.0)));
    assert_eq!(spectrum.total_intensity(), 15.0);

    let id = store.store(&spectrum).unwrap();
    spectrum.clear();
    store.read_into(id, &mut spectrum).unwrap();

    let exported = PeakCodec::encode_to_string(spectrum.primary(), &mz_config).unwrap();
    let decoded: Vec<f64> = PeakCodec::decode_str(&exported, &mz_config).unwrap();
    assert_eq!(decoded, spectrum.primary());
    assert_eq!(
        PeakCodec::encode_to_string(spectrum.intensity(), &intensity_config).unwrap(),
        intensity_text
    );
    store.dispose();
}

fn parallel_import(store: Arc<PointStore>) {
    let ids: Vec<Vec<(StorageId, usize)>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                scope.spawn(move || {
                    let mut scratch = MzPointBuffer::new();
                    (0..25)
                        .map(|scan| {
                            let seed = worker * 100 + scan;
                            scratch.clear();
                            for i in 0..(seed % 50 + 1) {
                                scratch.add(100.0 + i as f64, seed as f32);
                            }
                            (store.store(&scratch).unwrap(), seed)
                        })
                        .collect()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut all: Vec<StorageId> = ids.iter().flatten().map(|(id, _)| *id).collect();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 200);
    assert_eq!(store.len().unwrap(), 200);

    let mut buffer = MzPointBuffer::new();
    for (id, seed) in ids.into_iter().flatten() {
        store.read_into(id, &mut buffer).unwrap();
        assert_eq!(buffer.len(), seed % 50 + 1);
        assert!(buffer.intensity().iter().all(|&i| i == seed as f32));
    }
}

#[test]
fn test_parallel_import_memory() {
    init_logging();
    let store = Arc::new(StoreConfig::memory().open().unwrap());
    parallel_import(Arc::clone(&store));
    store.dispose();
}

#[test]
fn test_parallel_import_tmp_file() {
    init_logging();
    let dir = tempdir().unwrap();
    let store = Arc::new(
        StoreConfig::tmp_file()
            .with_temp_dir(dir.path())
            .open()
            .unwrap(),
    );
    parallel_import(Arc::clone(&store));

    let stats = store.stats();
    assert_eq!(stats.records, 200);
    assert_eq!(stats.bytes_written, stats.points * 12);
    store.dispose();
}

#[test]
fn test_disposed_store_rejects_operations() {
    init_logging();
    let dir = tempdir().unwrap();
    for config in [
        StoreConfig::memory(),
        StoreConfig::tmp_file().with_temp_dir(dir.path()),
    ] {
        let store = config.open().unwrap();
        let buffer: MzPointBuffer = vec![(1.0, 1.0)].into_iter().collect();
        let id = store.store(&buffer).unwrap();

        store.dispose();
        assert!(matches!(store.store(&buffer), Err(StoreError::IllegalState(_))));
        assert!(matches!(store.read::<Mz>(id), Err(StoreError::IllegalState(_))));
        assert!(matches!(store.remove(id), Err(StoreError::IllegalState(_))));
        store.dispose();
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn points() -> impl Strategy<Value = Vec<(f64, f32)>> {
        prop::collection::vec((0f64..2000.0, 0f32..1e7), 0..300)
    }

    proptest! {
        #[test]
        fn test_store_read_idempotent(buffers in prop::collection::vec(points(), 1..10)) {
            let dir = tempdir().unwrap();
            let memory = StoreConfig::memory().open().unwrap();
            let disk = StoreConfig::tmp_file().with_temp_dir(dir.path()).open().unwrap();

            for points in buffers {
                let buffer: MzPointBuffer = points.into_iter().collect();
                for store in [&memory, &disk] {
                    let id = store.store(&buffer).unwrap();
                    let read: MzPointBuffer = store.read(id).unwrap();
                    prop_assert_eq!(&read, &buffer);
                }
            }
            memory.dispose();
            disk.dispose();
        }

        #[test]
        fn test_remove_leaves_other_records(a in points(), b in points()) {
            let dir = tempdir().unwrap();
            let store = TmpFileDataPointStore::new_in(dir.path()).unwrap();
            let b1: MzPointBuffer = a.into_iter().collect();
            let b2: MzPointBuffer = b.into_iter().collect();

            let id1 = store.store(&b1).unwrap();
            let id2 = store.store(&b2).unwrap();
            store.remove(id1).unwrap();

            let read: MzPointBuffer = store.read(id2).unwrap();
            prop_assert_eq!(read, b2);
            store.dispose();
        }
    }
}
