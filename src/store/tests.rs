use super::*;
use crate::points::{Mz, MzPointBuffer, RtPointBuffer};
use tempfile::tempdir;

fn spectrum(mz: &[f64], intensity: &[f32]) -> MzPointBuffer {
    MzPointBuffer::from_arrays(mz.to_vec(), intensity.to_vec()).unwrap()
}

fn check_store_read_cycle<S: DataPointStore>(store: &S) {
    let first = spectrum(&[100.0, 200.0, 300.0], &[1.0, 2.0, 3.0]);
    let second = spectrum(&[150.5], &[42.0]);

    let id1 = store.store(&first).unwrap();
    let id2 = store.store(&second).unwrap();
    assert_eq!(id1.get(), 1);
    assert_eq!(id2.get(), 2);

    assert_eq!(store.read::<Mz>(id1).unwrap(), first);
    assert_eq!(store.read::<Mz>(id2).unwrap(), second);
    assert_eq!(store.len().unwrap(), 2);
}

fn check_read_into_reuses_buffer<S: DataPointStore>(store: &S) {
    let id = store
        .store(&spectrum(&[1.0, 2.0], &[10.0, 20.0]))
        .unwrap();

    let mut scratch = MzPointBuffer::with_capacity(128);
    scratch.add(999.0, 1.0);
    store.read_into(id, &mut scratch).unwrap();

    assert_eq!(scratch.primary(), &[1.0, 2.0]);
    assert_eq!(scratch.intensity(), &[10.0, 20.0]);
    assert_eq!(scratch.capacity(), 128);
}

fn check_empty_buffer<S: DataPointStore>(store: &S) {
    let id = store.store(&MzPointBuffer::new()).unwrap();
    let read: MzPointBuffer = store.read(id).unwrap();
    assert!(read.is_empty());
}

fn check_remove<S: DataPointStore>(store: &S) {
    let b1 = spectrum(&[1.0], &[1.0]);
    let b2 = spectrum(&[2.0, 3.0], &[2.0, 3.0]);
    let id1 = store.store(&b1).unwrap();
    let id2 = store.store(&b2).unwrap();

    store.remove(id1).unwrap();
    assert!(!store.contains(id1).unwrap());
    assert!(matches!(
        store.read::<Mz>(id1),
        Err(StoreError::NotFound(id)) if id == id1
    ));
    assert!(matches!(store.remove(id1), Err(StoreError::NotFound(_))));
    assert_eq!(store.read::<Mz>(id2).unwrap(), b2);

    // ids are never reused
    let id3 = store.store(&b1).unwrap();
    assert_eq!(id3.get(), id2.get() + 1);

    let stats = store.stats();
    assert_eq!(stats.records, 2);
    assert_eq!(stats.points, 3);
    assert_eq!(stats.removed, 1);
}

fn check_dispose<S: DataPointStore>(store: &S) {
    let id = store.store(&spectrum(&[1.0], &[1.0])).unwrap();
    store.dispose();
    assert!(store.is_disposed());

    assert!(matches!(
        store.store(&spectrum(&[1.0], &[1.0])),
        Err(StoreError::IllegalState(_))
    ));
    assert!(matches!(
        store.read::<Mz>(id),
        Err(StoreError::IllegalState(_))
    ));
    assert!(matches!(store.remove(id), Err(StoreError::IllegalState(_))));
    assert!(matches!(store.len(), Err(StoreError::IllegalState(_))));

    // second dispose is a no-op
    store.dispose();
    assert!(store.is_disposed());
    assert_eq!(store.stats().records, 0);
}

#[test]
fn test_memory_store_read_cycle() {
    check_store_read_cycle(&MemoryDataPointStore::new());
}

#[test]
fn test_memory_read_into_reuses_buffer() {
    check_read_into_reuses_buffer(&MemoryDataPointStore::new());
}

#[test]
fn test_memory_empty_buffer() {
    check_empty_buffer(&MemoryDataPointStore::new());
}

#[test]
fn test_memory_remove() {
    check_remove(&MemoryDataPointStore::new());
}

#[test]
fn test_memory_dispose() {
    check_dispose(&MemoryDataPointStore::new());
}

#[test]
fn test_memory_store_is_a_snapshot() {
    let store = MemoryDataPointStore::new();
    let mut buffer = spectrum(&[1.0, 2.0], &[1.0, 2.0]);
    let id = store.store(&buffer).unwrap();

    buffer.add(3.0, 3.0);
    let read: MzPointBuffer = store.read(id).unwrap();
    assert_eq!(read.len(), 2);
}

#[test]
fn test_tmpfile_store_read_cycle() {
    let dir = tempdir().unwrap();
    check_store_read_cycle(&TmpFileDataPointStore::new_in(dir.path()).unwrap());
}

#[test]
fn test_tmpfile_read_into_reuses_buffer() {
    let dir = tempdir().unwrap();
    check_read_into_reuses_buffer(&TmpFileDataPointStore::new_in(dir.path()).unwrap());
}

#[test]
fn test_tmpfile_empty_buffer() {
    let dir = tempdir().unwrap();
    check_empty_buffer(&TmpFileDataPointStore::new_in(dir.path()).unwrap());
}

#[test]
fn test_tmpfile_remove() {
    let dir = tempdir().unwrap();
    check_remove(&TmpFileDataPointStore::new_in(dir.path()).unwrap());
}

#[test]
fn test_tmpfile_dispose() {
    let dir = tempdir().unwrap();
    check_dispose(&TmpFileDataPointStore::new_in(dir.path()).unwrap());
}

#[test]
fn test_tmpfile_appends_records() {
    let dir = tempdir().unwrap();
    let store = TmpFileDataPointStore::new_in(dir.path()).unwrap();

    store.store(&spectrum(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0])).unwrap();
    let id = store.store(&spectrum(&[4.0], &[4.0])).unwrap();
    assert_eq!(store.stats().bytes_written, 4 * 12);

    // removal never shrinks the file
    store.remove(id).unwrap();
    let stats = store.stats();
    assert_eq!(stats.bytes_written, 48);
    assert_eq!(std::fs::metadata(store.path()).unwrap().len(), 48);
}

#[test]
fn test_tmpfile_dispose_deletes_file() {
    let dir = tempdir().unwrap();
    let store = TmpFileDataPointStore::new_in(dir.path()).unwrap();
    let path = store.path().to_path_buf();
    assert!(path.exists());
    assert!(path.starts_with(dir.path()));

    store.dispose();
    assert!(!path.exists());
}

#[test]
fn test_tmpfile_drop_deletes_file() {
    let dir = tempdir().unwrap();
    let path = {
        let store = TmpFileDataPointStore::new_in(dir.path()).unwrap();
        store.store(&spectrum(&[1.0], &[1.0])).unwrap();
        store.path().to_path_buf()
    };
    assert!(!path.exists());
}

#[test]
fn test_tmpfile_read_across_coordinates() {
    let dir = tempdir().unwrap();
    let store = TmpFileDataPointStore::new_in(dir.path()).unwrap();

    let mut chromatogram = RtPointBuffer::new();
    chromatogram.add(12.5, 100.0);
    chromatogram.add(13.0, 250.0);
    let id = store.store(&chromatogram).unwrap();

    let read: RtPointBuffer = store.read(id).unwrap();
    assert_eq!(read, chromatogram);
    store.dispose();
}

#[test]
fn test_point_store_dispatch() {
    let dir = tempdir().unwrap();
    let configs = [
        StoreConfig::memory(),
        StoreConfig::tmp_file().with_temp_dir(dir.path()),
    ];

    for config in configs {
        let store = config.open().unwrap();
        assert_eq!(store.path().is_some(), config.backend == StoreBackend::TmpFile);
        check_store_read_cycle(&store);
        store.dispose();
        assert!(store.is_disposed());
    }
}

#[test]
fn test_parse_config() {
    let config: StoreConfig = r#"
        [store]
        backend = "memory"
        temp_dir = "/scratch/peaks"
        file_prefix = "run42-"
        scratch_capacity = 1024
    "#
    .parse()
    .unwrap();

    assert_eq!(config.backend, StoreBackend::Memory);
    assert_eq!(config.temp_dir, Some(std::path::PathBuf::from("/scratch/peaks")));
    assert_eq!(config.file_prefix, "run42-");
    assert_eq!(config.scratch_capacity, 1024);
}

#[test]
fn test_parse_config_defaults() {
    let config: StoreConfig = "".parse().unwrap();
    assert_eq!(config, StoreConfig::default());
    assert_eq!(config.backend, StoreBackend::TmpFile);

    let config: StoreConfig = "[store]\nbackend = \"tmp_file\"".parse().unwrap();
    assert_eq!(config.file_prefix, "peakstore-");
}

#[test]
fn test_parse_config_rejects_unknown_backend() {
    let result: Result<StoreConfig, _> = "[store]\nbackend = \"database\"".parse();
    assert!(matches!(result, Err(StoreError::Config(_))));
}

#[test]
fn test_config_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("peakstore.toml");
    std::fs::write(&path, "[store]\nbackend = \"memory\"\n").unwrap();

    let config = StoreConfig::from_file(&path).unwrap();
    assert_eq!(config.backend, StoreBackend::Memory);

    let missing = StoreConfig::from_file(&dir.path().join("missing.toml"));
    assert!(matches!(missing, Err(StoreError::Config(_))));
}

#[cfg(unix)]
#[test]
fn test_tmpfile_holds_exclusive_lock() {
    let dir = tempdir().unwrap();
    let store = TmpFileDataPointStore::new_in(dir.path()).unwrap();

    let other = std::fs::File::open(store.path()).unwrap();
    assert!(matches!(
        other.try_lock(),
        Err(std::fs::TryLockError::WouldBlock)
    ));
    store.dispose();
}
