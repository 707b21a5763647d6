use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::pixel_buffer::PixelBuffer;
use crate::tilemap::Tilemap;

/// Save a rendered frame. Format follows the file extension.
pub fn export_image<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<(), image::ImageError> {
    buffer.to_image().save(path)
}

/// Write one row per line, values joined by `delimiter`.
pub fn write_values<W: Write>(
    grid: &Tilemap<f64>,
    out: &mut W,
    delimiter: char,
    decimals: usize,
) -> std::io::Result<()> {
    let mut sep = [0u8; 4];
    let sep = delimiter.encode_utf8(&mut sep).as_bytes();
    for row in grid.rows() {
        for (i, v) in row.iter().enumerate() {
            if i > 0 {
                out.write_all(sep)?;
            }
            write!(out, "{:.*}", decimals, v)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Export the raw value grid as delimited text
pub fn export_values<P: AsRef<Path>>(
    grid: &Tilemap<f64>,
    path: P,
    delimiter: char,
    decimals: usize,
) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_values(grid, &mut out, delimiter, decimals)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_layout() {
        let grid = Tilemap::from_vec(3, 2, vec![0.0, 0.25, 1.0, 0.5, 0.125, 0.75]).unwrap();
        let mut out = Vec::new();
        write_values(&grid, &mut out, ',', 3).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "0.000,0.250,1.000\n0.500,0.125,0.750\n"
        );
    }

    #[test]
    fn test_tab_delimiter() {
        let grid = Tilemap::from_vec(2, 1, vec![0.1, 0.9]).unwrap();
        let mut out = Vec::new();
        write_values(&grid, &mut out, '\t', 1).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0.1\t0.9\n");
    }
}
