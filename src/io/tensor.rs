//! Corpus persistence as a single `(n, height, width)` tensor
//!
//! Files follow the safetensors layout:
//! ```text
//! [8-byte header: u64 metadata length (little-endian)]
//! [JSON metadata: tensor dtype, shape, data_offsets and __metadata__]
//! [Raw tensor data]
//! ```
//!
//! Mazes are written as `U8` 0/1 values (0 = Wall, 1 = Hallway). Reading also
//! accepts `F32` tensors, binarized at 0.5, which is how real-valued samples
//! from a learned generator are scored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithm::corpus::Corpus;
use crate::io::configuration::{BINARIZE_THRESHOLD, TENSOR_FORMAT_TAG, TENSOR_NAME};
use crate::io::error::{Result, file_system, invalid_parameter, invalid_tensor};
use crate::spatial::grid::{Cell, Grid};

const HEADER_LENGTH_BYTES: usize = 8;
const METADATA_KEY: &str = "__metadata__";

/// Element type of a persisted maze tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensorDType {
    /// Unsigned bytes holding exactly 0 or 1
    U8,
    /// 32-bit floats, binarized on load
    F32,
}

impl TensorDType {
    /// Name used in the JSON header
    pub const fn name(self) -> &'static str {
        match self {
            Self::U8 => "U8",
            Self::F32 => "F32",
        }
    }

    /// Parse a header dtype name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "U8" => Some(Self::U8),
            "F32" => Some(Self::F32),
            _ => None,
        }
    }

    /// Bytes per element
    pub const fn bytes_per_element(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::F32 => 4,
        }
    }
}

/// Header entry describing one tensor
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TensorEntry {
    dtype: String,
    shape: Vec<usize>,
    data_offsets: [usize; 2],
}

/// Persist a corpus
///
/// # Errors
///
/// Returns an error if the file cannot be written
pub fn save_corpus(path: impl AsRef<Path>, corpus: &Corpus) -> Result<()> {
    let array = corpus.to_array();
    let (count, height, width) = array.dim();
    let data: Vec<u8> = array.iter().copied().collect();
    write_tensor(path.as_ref(), &encode_tensor([count, height, width], &data)?)
}

/// Persist mazes that share one size
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if the slice is empty, sizes differ, or the file cannot be written
pub fn save_mazes(path: impl AsRef<Path>, mazes: &[Grid]) -> Result<()> {
    write_tensor(path.as_ref(), &encode_mazes(mazes)?)
}

fn write_tensor(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(file_system(parent, "create directory"))?;
    }
    fs::write(path, bytes).map_err(file_system(path, "write tensor"))?;
    Ok(())
}

/// Serialize mazes into tensor file bytes
///
/// # Errors
///
/// Returns an error if the slice is empty or the mazes differ in size
pub fn encode_mazes(mazes: &[Grid]) -> Result<Vec<u8>> {
    let first = mazes
        .first()
        .ok_or_else(|| invalid_parameter("mazes", &0, &"at least one maze is required"))?;
    let (width, height) = (first.width(), first.height());

    let mut data = Vec::with_capacity(mazes.len().saturating_mul(width.saturating_mul(height)));
    for (index, maze) in mazes.iter().enumerate() {
        if maze.width() != width || maze.height() != height {
            return Err(invalid_parameter(
                "mazes",
                &index,
                &format!(
                    "maze is {}x{}, expected {width}x{height}",
                    maze.width(),
                    maze.height()
                ),
            ));
        }
        data.extend(maze.to_values());
    }

    encode_tensor([mazes.len(), height, width], &data)
}

/// Frame `(count, height, width)` U8 values with the length prefix and JSON header
fn encode_tensor(shape: [usize; 3], data: &[u8]) -> Result<Vec<u8>> {
    let [count, height, width] = shape;
    if count == 0 {
        return Err(invalid_parameter("mazes", &0, &"at least one maze is required"));
    }
    let entry = TensorEntry {
        dtype: TensorDType::U8.name().to_string(),
        shape: shape.to_vec(),
        data_offsets: [0, data.len()],
    };
    let metadata: BTreeMap<&str, String> = BTreeMap::from([
        ("count", count.to_string()),
        ("format", TENSOR_FORMAT_TAG.to_string()),
        ("height", height.to_string()),
        ("width", width.to_string()),
    ]);

    let mut header = serde_json::Map::new();
    header.insert(
        METADATA_KEY.to_string(),
        serde_json::to_value(metadata).map_err(|e| invalid_tensor("<memory>", &e))?,
    );
    header.insert(
        TENSOR_NAME.to_string(),
        serde_json::to_value(entry).map_err(|e| invalid_tensor("<memory>", &e))?,
    );
    let header_json =
        serde_json::to_string(&header).map_err(|e| invalid_tensor("<memory>", &e))?;
    let header_bytes = header_json.as_bytes();

    let mut output = Vec::with_capacity(HEADER_LENGTH_BYTES + header_bytes.len() + data.len());
    output.extend_from_slice(&(header_bytes.len() as u64).to_le_bytes());
    output.extend_from_slice(header_bytes);
    output.extend_from_slice(data);
    Ok(output)
}

/// Load every maze stored in a tensor file
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid maze tensor
pub fn load_mazes(path: impl AsRef<Path>) -> Result<Vec<Grid>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(file_system(path, "read tensor"))?;
    decode(&bytes, path)
}

/// Decode tensor file bytes
///
/// # Errors
///
/// Returns `InvalidTensorFile` if the bytes are not a valid maze tensor
pub fn decode_mazes(bytes: &[u8]) -> Result<Vec<Grid>> {
    decode(bytes, Path::new("<memory>"))
}

fn decode(bytes: &[u8], path: &Path) -> Result<Vec<Grid>> {
    let ((_, height, width), values) = decode_values(bytes, path)?;
    let cells_per_maze = height
        .checked_mul(width)
        .ok_or_else(|| invalid_tensor(path, &"maze dimensions overflow"))?;

    values
        .chunks_exact(cells_per_maze)
        .map(|maze| {
            let cells = maze
                .iter()
                .map(|&value| Cell::from_u8(value).unwrap_or(Cell::Wall))
                .collect();
            Grid::from_cells(width, height, cells)
        })
        .collect()
}

/// Parse the header and return the shape with row-major 0/1 values
fn decode_values(bytes: &[u8], path: &Path) -> Result<((usize, usize, usize), Vec<u8>)> {
    let length_bytes: [u8; HEADER_LENGTH_BYTES] = bytes
        .get(..HEADER_LENGTH_BYTES)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| invalid_tensor(path, &"file is shorter than the header length"))?;
    let header_len = usize::try_from(u64::from_le_bytes(length_bytes))
        .map_err(|e| invalid_tensor(path, &e))?;
    let data_start = HEADER_LENGTH_BYTES
        .checked_add(header_len)
        .ok_or_else(|| invalid_tensor(path, &"header length overflows"))?;
    let header_bytes = bytes
        .get(HEADER_LENGTH_BYTES..data_start)
        .ok_or_else(|| invalid_tensor(path, &"header is truncated"))?;

    let header: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(header_bytes).map_err(|e| invalid_tensor(path, &e))?;
    let entry_value = header
        .get(TENSOR_NAME)
        .cloned()
        .ok_or_else(|| invalid_tensor(path, &format!("no '{TENSOR_NAME}' tensor")))?;
    let entry: TensorEntry =
        serde_json::from_value(entry_value).map_err(|e| invalid_tensor(path, &e))?;

    let dtype = TensorDType::from_name(&entry.dtype)
        .ok_or_else(|| invalid_tensor(path, &format!("unsupported dtype '{}'", entry.dtype)))?;
    let &[count, height, width] = entry.shape.as_slice() else {
        return Err(invalid_tensor(
            path,
            &format!("expected a 3-dimensional shape, found {:?}", entry.shape),
        ));
    };
    if height == 0 || width == 0 {
        return Err(invalid_tensor(path, &"maze dimensions must be positive"));
    }

    let [start, end] = entry.data_offsets;
    let byte_count = height
        .checked_mul(width)
        .and_then(|cells| cells.checked_mul(count))
        .and_then(|cells| cells.checked_mul(dtype.bytes_per_element()));
    if byte_count.is_none() || end.checked_sub(start) != byte_count {
        return Err(invalid_tensor(
            path,
            &format!("data offsets [{start}, {end}] do not match shape {:?}", entry.shape),
        ));
    }
    let data = data_start
        .checked_add(start)
        .zip(data_start.checked_add(end))
        .and_then(|(from, to)| bytes.get(from..to))
        .ok_or_else(|| invalid_tensor(path, &"tensor data is truncated"))?;

    let values = match dtype {
        TensorDType::U8 => {
            if let Some(position) = data.iter().position(|&value| value > 1) {
                return Err(invalid_tensor(
                    path,
                    &format!("element {position} is not 0 or 1"),
                ));
            }
            data.to_vec()
        }
        TensorDType::F32 => data
            .chunks_exact(4)
            .map(|chunk| {
                let value = <[u8; 4]>::try_from(chunk).map_or(0.0, f32::from_le_bytes);
                u8::from(value > BINARIZE_THRESHOLD)
            })
            .collect(),
    };

    Ok(((count, height, width), values))
}
