//! NumPy Array Files
//!
//! Reads and writes 2-D float arrays in the `.npy` format so embedding
//! artifacts stay interchangeable with `numpy.save` / `numpy.load`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::vector::EmbeddingMatrix;

/// File format:
/// - Magic: 6 bytes "\x93NUMPY"
/// - Version: 2 bytes (major, minor)
/// - Header length: u16 LE (v1) or u32 LE (v2, v3)
/// - Header: Python dict literal, space padded, newline terminated
/// - Data: raw array elements
const NPY_MAGIC: &[u8] = b"\x93NUMPY";
const HEADER_ALIGN: usize = 64;

/// Element types we know how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dtype {
    F32,
    F64,
}

impl Dtype {
    fn parse(descr: &str) -> Option<Self> {
        match descr {
            "<f4" | "f4" | "float32" => Some(Dtype::F32),
            "<f8" | "f8" | "float64" => Some(Dtype::F64),
            _ => None,
        }
    }

    fn size(self) -> usize {
        match self {
            Dtype::F32 => 4,
            Dtype::F64 => 8,
        }
    }
}

/// Parsed array header
#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    dtype: Dtype,
    fortran_order: bool,
    shape: Vec<usize>,
}

/// Write a matrix as a little-endian `<f4` array of shape `(rows, dim)`
///
/// The bytes land in a sibling temp file first and are renamed into place.
pub fn save(path: &Path, matrix: &EmbeddingMatrix) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);

        let header = encode_header(matrix.len(), matrix.dimension());
        writer.write_all(NPY_MAGIC)?;
        writer.write_all(&[1, 0])?;
        writer.write_all(&(header.len() as u16).to_le_bytes())?;
        writer.write_all(header.as_bytes())?;

        for value in matrix.as_slice() {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;

    debug!(path = %path.display(), rows = matrix.len(), dim = matrix.dimension(), "Wrote npy array");
    Ok(())
}

/// Read a 2-D float array into a matrix
pub fn load(path: &Path) -> Result<EmbeddingMatrix> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut magic = [0u8; 6];
    reader
        .read_exact(&mut magic)
        .map_err(|_| Error::artifact(path, "file too short"))?;
    if magic != NPY_MAGIC {
        return Err(Error::artifact(path, "missing NUMPY magic"));
    }

    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let header_len = match version[0] {
        1 => {
            let mut buf = [0u8; 2];
            reader.read_exact(&mut buf)?;
            u16::from_le_bytes(buf) as usize
        }
        2 | 3 => {
            let mut buf = [0u8; 4];
            reader.read_exact(&mut buf)?;
            u32::from_le_bytes(buf) as usize
        }
        v => {
            return Err(Error::artifact(path, format!("unsupported format version {}.{}", v, version[1])));
        }
    };

    let mut header_buf = vec![0u8; header_len];
    reader.read_exact(&mut header_buf)?;
    let header_text = String::from_utf8_lossy(&header_buf);
    let header = parse_header(&header_text).map_err(|reason| Error::artifact(path, reason))?;

    let (rows, dim) = match header.shape.as_slice() {
        [rows, dim] => (*rows, *dim),
        other => {
            return Err(Error::artifact(path, format!("expected a 2-D array, got shape {:?}", other)));
        }
    };

    let count = rows
        .checked_mul(dim)
        .ok_or_else(|| Error::artifact(path, "shape overflows"))?;
    let mut raw = vec![0u8; count * header.dtype.size()];
    reader
        .read_exact(&mut raw)
        .map_err(|_| Error::artifact(path, format!("truncated data, expected {} values", count)))?;

    let mut data: Vec<f32> = match header.dtype {
        Dtype::F32 => raw
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect(),
        Dtype::F64 => raw
            .chunks_exact(8)
            .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]) as f32)
            .collect(),
    };

    if header.fortran_order {
        data = transpose_column_major(&data, rows, dim);
    }

    EmbeddingMatrix::from_flat(rows, dim, data)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn encode_header(rows: usize, dim: usize) -> String {
    let mut header = format!(
        "{{'descr': '<f4', 'fortran_order': False, 'shape': ({}, {}), }}",
        rows, dim
    );
    // magic + version + u16 length = 10 bytes; pad so data starts aligned
    let unpadded = 10 + header.len() + 1;
    let padding = (HEADER_ALIGN - unpadded % HEADER_ALIGN) % HEADER_ALIGN;
    header.extend(std::iter::repeat(' ').take(padding));
    header.push('\n');
    header
}

fn parse_header(text: &str) -> std::result::Result<Header, String> {
    let descr = dict_value(text, "descr").ok_or("header has no 'descr'")?;
    let descr = descr.trim().trim_matches(['\'', '"']);
    let dtype = Dtype::parse(descr).ok_or_else(|| format!("unsupported dtype '{}'", descr))?;

    let fortran_order = match dict_value(text, "fortran_order").map(str::trim) {
        Some("True") => true,
        Some("False") | None => false,
        Some(other) => return Err(format!("bad fortran_order '{}'", other)),
    };

    let shape_start = text.find("'shape'").ok_or("header has no 'shape'")?;
    let open = text[shape_start..].find('(').ok_or("malformed shape")? + shape_start;
    let close = text[open..].find(')').ok_or("malformed shape")? + open;
    let shape = text[open + 1..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|_| format!("bad shape entry '{}'", s)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Header {
        dtype,
        fortran_order,
        shape,
    })
}

/// Scalar value for `key` in a flat dict literal (not tuples)
fn dict_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let quoted = format!("'{}'", key);
    let start = text.find(&quoted)? + quoted.len();
    let rest = text[start..].trim_start().strip_prefix(':')?;
    let end = rest.find([',', '}']).unwrap_or(rest.len());
    Some(&rest[..end])
}

fn transpose_column_major(data: &[f32], rows: usize, dim: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; data.len()];
    for col in 0..dim {
        for row in 0..rows {
            out[row * dim + col] = data[col * rows + row];
        }
    }
    out
}
