use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::TransferError;

// ---------------------------------------------------------------------------
// TransferUnit
// ---------------------------------------------------------------------------

/// One contiguous byte range `[start, end)` of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferUnit {
    /// 1-based position in the upload order.
    pub index: u32,
    /// Number of units the file was split into.
    pub total: u32,
    pub start: u64,
    pub end: u64,
}

impl TransferUnit {
    /// Length of the range in bytes.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_first(&self) -> bool {
        self.index == 1
    }

    pub fn is_last(&self) -> bool {
        self.index == self.total
    }
}

// ---------------------------------------------------------------------------
// ChunkPlan
// ---------------------------------------------------------------------------

/// Splits a file of known size into fixed-size units.
///
/// Bounds are derived from the unit index alone, so any unit can be
/// recomputed (and re-read) without keeping earlier slices around.
/// A zero-byte file is planned as a single empty unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    total_bytes: u64,
    chunk_size: u64,
    total_chunks: u32,
}

impl ChunkPlan {
    pub fn new(total_bytes: u64, chunk_size: u64) -> Result<Self, TransferError> {
        if chunk_size == 0 {
            return Err(TransferError::InvalidChunkSize);
        }
        let total_chunks = if total_bytes == 0 {
            1
        } else {
            u32::try_from(total_bytes.div_ceil(chunk_size))
                .map_err(|_| TransferError::TooManyChunks { total_bytes })?
        };
        Ok(Self {
            total_bytes,
            chunk_size,
            total_chunks,
        })
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    /// Returns the unit at 1-based `index`.
    pub fn unit(&self, index: u32) -> Result<TransferUnit, TransferError> {
        if index == 0 || index > self.total_chunks {
            return Err(TransferError::UnitOutOfRange {
                index,
                total: self.total_chunks,
            });
        }
        let start = u64::from(index - 1) * self.chunk_size;
        Ok(TransferUnit {
            index,
            total: self.total_chunks,
            start,
            end: self.bytes_through(index),
        })
    }

    /// Iterates over all units in upload order.
    pub fn units(&self) -> impl Iterator<Item = TransferUnit> + '_ {
        (1..=self.total_chunks).filter_map(|index| self.unit(index).ok())
    }

    /// Bytes covered by units `1..=index`, capped at the file size.
    pub fn bytes_through(&self, index: u32) -> u64 {
        u64::from(index)
            .saturating_mul(self.chunk_size)
            .min(self.total_bytes)
    }
}

// ---------------------------------------------------------------------------
// ChunkReader
// ---------------------------------------------------------------------------

/// Reads the byte range of a [`TransferUnit`] from disk.
pub struct ChunkReader {
    file: tokio::fs::File,
    path: PathBuf,
    plan: ChunkPlan,
}

impl ChunkReader {
    /// Opens `path` and plans it into `chunk_size` units.
    pub async fn open(path: &Path, chunk_size: u64) -> Result<Self, TransferError> {
        let file = tokio::fs::File::open(path).await?;
        let total_bytes = file.metadata().await?.len();
        let plan = ChunkPlan::new(total_bytes, chunk_size)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            plan,
        })
    }

    pub fn plan(&self) -> &ChunkPlan {
        &self.plan
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads exactly the bytes of `unit`, seeking first so reads can
    /// happen in any order.
    pub async fn read_unit(&mut self, unit: &TransferUnit) -> Result<Vec<u8>, TransferError> {
        let mut buf = vec![0u8; unit.len() as usize];
        if buf.is_empty() {
            return Ok(buf);
        }
        self.file.seek(SeekFrom::Start(unit.start)).await?;
        self.file.read_exact(&mut buf).await?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn create_test_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    /// Checks count, contiguity and last-unit length for one size.
    fn assert_plan_covers(total_bytes: u64, chunk_size: u64) {
        let plan = ChunkPlan::new(total_bytes, chunk_size).unwrap();
        let units: Vec<_> = plan.units().collect();

        let expected_count = if total_bytes == 0 {
            1
        } else {
            total_bytes.div_ceil(chunk_size)
        };
        assert_eq!(units.len() as u64, expected_count, "N={total_bytes} C={chunk_size}");
        assert_eq!(plan.total_chunks() as u64, expected_count);

        let mut cursor = 0;
        for (i, unit) in units.iter().enumerate() {
            assert_eq!(unit.index as usize, i + 1);
            assert_eq!(unit.total, plan.total_chunks());
            assert_eq!(unit.start, cursor, "gap or overlap before unit {}", unit.index);
            assert!(unit.end >= unit.start);
            cursor = unit.end;
        }
        assert_eq!(cursor, total_bytes);

        let last = units.last().unwrap();
        let remainder = total_bytes % chunk_size;
        let expected_last = if total_bytes == 0 {
            0
        } else if remainder == 0 {
            chunk_size
        } else {
            remainder
        };
        assert_eq!(last.len(), expected_last);
        assert!(last.is_last());
    }

    #[test]
    fn plan_covers_file_for_various_sizes() {
        for (n, c) in [
            (0, 4),
            (1, 4),
            (3, 4),
            (4, 4),
            (5, 4),
            (10, 4),
            (16, 4),
            (17, 1),
            (MIB / 2, MIB),
            (MIB * 5 / 2, MIB),
            (MIB * 3, MIB),
        ] {
            assert_plan_covers(n, c);
        }
    }

    #[test]
    fn plan_two_and_a_half_mib() {
        let plan = ChunkPlan::new(MIB * 5 / 2, MIB).unwrap();
        assert_eq!(plan.total_chunks(), 3);
        let last = plan.unit(3).unwrap();
        assert_eq!(last.start, 2 * MIB);
        assert_eq!(last.len(), MIB / 2);
    }

    #[test]
    fn plan_evenly_divisible_last_unit_full() {
        let plan = ChunkPlan::new(12, 4).unwrap();
        assert_eq!(plan.total_chunks(), 3);
        assert_eq!(plan.unit(3).unwrap().len(), 4);
    }

    #[test]
    fn plan_zero_bytes_single_empty_unit() {
        let plan = ChunkPlan::new(0, MIB).unwrap();
        assert_eq!(plan.total_chunks(), 1);
        let unit = plan.unit(1).unwrap();
        assert!(unit.is_empty());
        assert!(unit.is_first() && unit.is_last());
    }

    #[test]
    fn plan_rejects_zero_chunk_size() {
        assert!(matches!(
            ChunkPlan::new(10, 0),
            Err(TransferError::InvalidChunkSize)
        ));
    }

    #[test]
    fn plan_rejects_out_of_range_index() {
        let plan = ChunkPlan::new(10, 4).unwrap();
        assert!(matches!(
            plan.unit(0),
            Err(TransferError::UnitOutOfRange { index: 0, total: 3 })
        ));
        assert!(matches!(
            plan.unit(4),
            Err(TransferError::UnitOutOfRange { index: 4, total: 3 })
        ));
    }

    #[test]
    fn plan_rejects_chunk_count_overflow() {
        assert!(matches!(
            ChunkPlan::new(u64::MAX, 1),
            Err(TransferError::TooManyChunks { .. })
        ));
    }

    #[test]
    fn unit_is_recomputable_from_index() {
        let plan = ChunkPlan::new(10, 4).unwrap();
        let from_iter: Vec<_> = plan.units().collect();
        for unit in from_iter {
            assert_eq!(plan.unit(unit.index).unwrap(), unit);
        }
    }

    #[test]
    fn bytes_through_caps_at_total() {
        let plan = ChunkPlan::new(10, 4).unwrap();
        assert_eq!(plan.bytes_through(1), 4);
        assert_eq!(plan.bytes_through(2), 8);
        assert_eq!(plan.bytes_through(3), 10);
    }

    #[tokio::test]
    async fn reader_reads_every_unit() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_file(dir.path(), "clip.mp4", b"AABBCCDDEE");

        let mut reader = ChunkReader::new_for_test(&path, 4).await;
        assert_eq!(reader.plan().total_bytes(), 10);
        assert_eq!(reader.plan().total_chunks(), 3);

        let plan = *reader.plan();
        let mut chunks = Vec::new();
        for unit in plan.units() {
            chunks.push(reader.read_unit(&unit).await.unwrap());
        }
        assert_eq!(chunks, vec![b"AABB".to_vec(), b"CCDD".to_vec(), b"EE".to_vec()]);
    }

    #[tokio::test]
    async fn reader_rereads_out_of_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_file(dir.path(), "clip.mp4", b"0123456789");

        let mut reader = ChunkReader::new_for_test(&path, 4).await;
        let plan = *reader.plan();

        let third = reader.read_unit(&plan.unit(3).unwrap()).await.unwrap();
        let first = reader.read_unit(&plan.unit(1).unwrap()).await.unwrap();
        let first_again = reader.read_unit(&plan.unit(1).unwrap()).await.unwrap();
        assert_eq!(third, b"89");
        assert_eq!(first, b"0123");
        assert_eq!(first, first_again);
    }

    #[tokio::test]
    async fn reader_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = create_test_file(dir.path(), "empty.mp4", b"");

        let mut reader = ChunkReader::new_for_test(&path, 4).await;
        let unit = reader.plan().unit(1).unwrap();
        assert!(reader.read_unit(&unit).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ChunkReader::open(&dir.path().join("missing.mp4"), 4).await;
        assert!(matches!(result, Err(TransferError::Io(_))));
    }

    impl ChunkReader {
        async fn new_for_test(path: &Path, chunk_size: u64) -> Self {
            let reader = ChunkReader::open(path, chunk_size).await.unwrap();
            assert_eq!(reader.path(), path);
            reader
        }
    }
}
