//! IDX binary files as used by MNIST and its derivatives (Fashion-MNIST,
//! EMNIST, …).
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00
//! byte   2:     0x08
//! byte   3:     0x01
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, n_classes)
//! ```

use std::path::Path;

use log::info;

use crate::error::{NetError, Result};

/// Pixel bytes are divided by this to land in `[0, 1)`.
const PIXEL_SCALE: f64 = 256.0;

/// Decoded image/label pairs.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: usize,
    cols: usize,
    n_classes: usize,
    images: Vec<Vec<u8>>,
    labels: Vec<u8>,
}

impl Dataset {
    /// Parses an IDX3 image file and IDX1 label file held in memory.
    pub fn parse(image_bytes: &[u8], label_bytes: &[u8], n_classes: usize) -> Result<Dataset> {
        if n_classes < 2 {
            return Err(NetError::Dataset(format!(
                "n_classes must be at least 2, got {n_classes}"
            )));
        }

        let image_dims = read_header(image_bytes, 3, "image")?;
        let (n_items, rows, cols) = (image_dims[0], image_dims[1], image_dims[2]);
        let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
            NetError::Dataset(format!("rows * cols overflows usize (rows={rows}, cols={cols})"))
        })?;
        let image_data = payload(image_bytes, 16, n_items, n_pixels, "image")?;

        let label_dims = read_header(label_bytes, 1, "label")?;
        if label_dims[0] != n_items {
            return Err(NetError::Dataset(format!(
                "image file declares {} items but label file declares {}",
                n_items, label_dims[0]
            )));
        }
        let labels = payload(label_bytes, 8, n_items, 1, "label")?.to_vec();

        if let Some((i, &class)) = labels.iter().enumerate().find(|(_, &c)| c as usize >= n_classes) {
            return Err(NetError::Dataset(format!(
                "label at index {i}: class {class} is out of range for n_classes={n_classes}"
            )));
        }

        let images = if n_pixels == 0 {
            vec![Vec::new(); n_items]
        } else {
            image_data.chunks_exact(n_pixels).map(<[u8]>::to_vec).collect()
        };

        Ok(Dataset { rows, cols, n_classes, images, labels })
    }

    /// Reads and parses an image/label file pair from disk.
    pub fn load(
        image_path: impl AsRef<Path>,
        label_path: impl AsRef<Path>,
        n_classes: usize,
    ) -> Result<Dataset> {
        let image_path = image_path.as_ref();
        let image_bytes = std::fs::read(image_path)?;
        let label_bytes = std::fs::read(label_path.as_ref())?;
        let set = Dataset::parse(&image_bytes, &label_bytes, n_classes)?;
        info!(
            "loaded {} images of {}x{} from {}",
            set.len(), set.rows, set.cols, image_path.display()
        );
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Length of every input vector.
    pub fn input_size(&self) -> usize {
        self.rows * self.cols
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn label(&self, i: usize) -> u8 {
        self.labels[i]
    }

    pub fn image(&self, i: usize) -> &[u8] {
        &self.images[i]
    }

    /// Image `i` with pixels scaled into `[0, 1)`.
    pub fn input(&self, i: usize) -> Vec<f64> {
        self.images[i].iter().map(|&px| px as f64 / PIXEL_SCALE).collect()
    }

    /// One-hot encoding of label `i`.
    pub fn target(&self, i: usize) -> Vec<f64> {
        let mut one_hot = vec![0.0; self.n_classes];
        one_hot[self.labels[i] as usize] = 1.0;
        one_hot
    }
}

/// Validates the magic number and returns the `n_dims` big-endian sizes.
fn read_header(bytes: &[u8], n_dims: u8, kind: &str) -> Result<Vec<usize>> {
    let header_len = 4 + 4 * n_dims as usize;
    if bytes.len() < header_len {
        return Err(NetError::Dataset(format!(
            "IDX {kind} file too short: expected at least {header_len} header bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(NetError::Dataset(format!(
            "IDX {kind} file: bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}",
            bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(NetError::Dataset(format!(
            "IDX {kind} file: dtype must be 0x08 (uint8), got 0x{:02X}",
            bytes[2]
        )));
    }
    if bytes[3] != n_dims {
        return Err(NetError::Dataset(format!(
            "IDX {kind} file: expected {n_dims} dimensions, got {}",
            bytes[3]
        )));
    }
    Ok(bytes[4..header_len]
        .chunks_exact(4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]) as usize)
        .collect())
}

fn payload<'a>(
    bytes: &'a [u8],
    offset: usize,
    n_items: usize,
    item_len: usize,
    kind: &str,
) -> Result<&'a [u8]> {
    let end = n_items
        .checked_mul(item_len)
        .and_then(|n| n.checked_add(offset))
        .ok_or_else(|| NetError::Dataset(format!("IDX {kind} file: data length overflows usize")))?;
    if bytes.len() < end {
        return Err(NetError::Dataset(format!(
            "IDX {kind} file too short: header declares {n_items} items ({end} bytes needed), file is {} bytes",
            bytes.len()
        )));
    }
    Ok(&bytes[offset..end])
}

/// Encodes images and labels as an IDX3/IDX1 byte pair.
#[cfg(test)]
pub(crate) fn encode_idx(rows: u32, cols: u32, images: &[Vec<u8>], labels: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut img = vec![0x00, 0x00, 0x08, 0x03];
    img.extend_from_slice(&(images.len() as u32).to_be_bytes());
    img.extend_from_slice(&rows.to_be_bytes());
    img.extend_from_slice(&cols.to_be_bytes());
    for image in images {
        img.extend_from_slice(image);
    }

    let mut lbl = vec![0x00, 0x00, 0x08, 0x01];
    lbl.extend_from_slice(&(labels.len() as u32).to_be_bytes());
    lbl.extend_from_slice(labels);
    (img, lbl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_small_pair() {
        let (img, lbl) = encode_idx(2, 2, &[vec![0, 64, 128, 255], vec![1, 2, 3, 4]], &[3, 0]);
        let set = Dataset::parse(&img, &lbl, 10).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.input_size(), 4);
        assert_eq!(set.label(0), 3);
        assert_eq!(set.image(1), &[1, 2, 3, 4]);

        let input = set.input(0);
        assert_relative_eq!(input[1], 0.25);
        assert!(input[3] < 1.0);

        let target = set.target(0);
        assert_eq!(target.len(), 10);
        assert_eq!(target[3], 1.0);
        assert_eq!(target.iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn rejects_count_mismatch() {
        let (img, _) = encode_idx(1, 1, &[vec![0], vec![1]], &[0, 1]);
        let (_, lbl) = encode_idx(1, 1, &[vec![0]], &[0]);
        assert!(matches!(Dataset::parse(&img, &lbl, 10), Err(NetError::Dataset(_))));
    }

    #[test]
    fn rejects_truncated_payload() {
        let (mut img, lbl) = encode_idx(2, 2, &[vec![0, 1, 2, 3]], &[1]);
        img.pop();
        assert!(Dataset::parse(&img, &lbl, 10).is_err());
    }

    #[test]
    fn rejects_wrong_magic() {
        let (img, lbl) = encode_idx(1, 1, &[vec![0]], &[0]);
        // label file passed as image file
        assert!(Dataset::parse(&lbl, &img, 10).is_err());
    }

    #[test]
    fn rejects_out_of_range_label() {
        let (img, lbl) = encode_idx(1, 1, &[vec![0]], &[7]);
        assert!(Dataset::parse(&img, &lbl, 5).is_err());
    }
}
