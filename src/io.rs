//! Binary graph and community files.
//!
//! Both formats are flat sequences of little-endian `u32` words.
//!
//! Graph file:
//!
//! ```text
//! n
//! k_0  neighbor_0 .. neighbor_{k_0 - 1}
//! ...
//! k_{n-1}  neighbor_0 .. neighbor_{k_{n-1} - 1}
//! ```
//!
//! Community file:
//!
//! ```text
//! count
//! size_0  member_0 .. member_{size_0 - 1}
//! ...
//! ```
//!
//! Communities are written in the order given; nothing is re-sorted.

use crate::error::{Error, Result};
use crate::sparse::SparseGraph;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

fn read_len<R: Read>(reader: &mut R) -> Result<usize> {
    Ok(reader.read_u32::<LittleEndian>()? as usize)
}

fn write_len<W: Write>(writer: &mut W, len: usize) -> Result<()> {
    let word = u32::try_from(len).map_err(|_| Error::Io(format!("{len} does not fit in u32")))?;
    writer.write_u32::<LittleEndian>(word)?;
    Ok(())
}

/// Read `len` words; the list grows only as words actually arrive, so a
/// bogus length fails on end of input instead of allocating up front.
fn read_words<R: Read>(reader: &mut R, len: usize) -> Result<Vec<usize>> {
    (0..len).map(|_| read_len(reader)).collect()
}

fn write_list<W: Write>(writer: &mut W, list: &[usize]) -> Result<()> {
    write_len(writer, list.len())?;
    for &x in list {
        write_len(writer, x)?;
    }
    Ok(())
}

/// Read a graph in the binary adjacency format.
///
/// # Errors
///
/// [`Error::Io`] on a short or failed read; [`Error::InvalidNeighbor`] if a
/// neighbor index is out of range.
pub fn read_graph<R: Read>(reader: &mut R) -> Result<SparseGraph> {
    let n = read_len(reader)?;
    let rows = (0..n)
        .map(|vertex| {
            let degree = read_len(reader)?;
            if degree > n {
                return Err(Error::Io(format!(
                    "vertex {vertex} claims {degree} neighbors in a graph of {n}"
                )));
            }
            read_words(reader, degree)
        })
        .collect::<Result<Vec<_>>>()?;
    SparseGraph::from_rows(&rows)
}

/// Write a graph in the binary adjacency format.
pub fn write_graph<W: Write>(writer: &mut W, graph: &SparseGraph) -> Result<()> {
    write_len(writer, graph.len())?;
    for i in 0..graph.len() {
        write_list(writer, graph.row(i))?;
    }
    writer.flush()?;
    Ok(())
}

/// Read communities in the binary community format.
pub fn read_communities<R: Read>(reader: &mut R) -> Result<Vec<Vec<usize>>> {
    let count = read_len(reader)?;
    (0..count)
        .map(|_| {
            let len = read_len(reader)?;
            read_words(reader, len)
        })
        .collect()
}

/// Write communities in the binary community format.
pub fn write_communities<W: Write>(writer: &mut W, communities: &[Vec<usize>]) -> Result<()> {
    write_len(writer, communities.len())?;
    for community in communities {
        write_list(writer, community)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a graph file from `path`.
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<SparseGraph> {
    let mut reader = BufReader::new(File::open(path)?);
    read_graph(&mut reader)
}

/// Write communities to a file at `path`.
pub fn save_communities<P: AsRef<Path>>(path: P, communities: &[Vec<usize>]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_communities(&mut writer, communities)
}
