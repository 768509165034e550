use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;

use crate::error::{Result, SpeckleError};
use crate::frame::{Frame, FrameMetadata, PixelFormat, SourceInfo};

pub const SER_HEADER_SIZE: usize = 178;
const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// SER file header (178 bytes).
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_id: i32,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
    pub observer: String,
    pub instrument: String,
    pub telescope: String,
    pub date_time: u64,
    pub date_time_utc: u64,
}

impl SerHeader {
    /// Bytes per pixel plane (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_pixel_plane(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// Number of planes per pixel (1 for mono/bayer, 3 for RGB/BGR).
    pub fn planes_per_pixel(&self) -> usize {
        match self.color_id {
            100 | 101 => 3,
            _ => 1,
        }
    }

    /// Total bytes per frame, or `None` if it does not fit in `usize`.
    pub fn checked_frame_byte_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.bytes_per_pixel_plane())?
            .checked_mul(self.planes_per_pixel())
    }

    /// Total bytes per frame. Saturates for headers [`SerReader::open`] would
    /// reject.
    pub fn frame_byte_size(&self) -> usize {
        self.checked_frame_byte_size().unwrap_or(usize::MAX)
    }

    /// Bytes of header plus frame data, or `None` on overflow.
    fn checked_data_end(&self) -> Option<usize> {
        self.checked_frame_byte_size()?
            .checked_mul(self.frame_count as usize)?
            .checked_add(SER_HEADER_SIZE)
    }

    pub fn is_bayer(&self) -> bool {
        (8..=19).contains(&self.color_id)
    }

    /// Pixel format of the frames this reader hands out. Samples are always
    /// reduced to 8 bits; Bayer mosaics keep their tag so the processor can
    /// skip them.
    pub fn output_format(&self) -> PixelFormat {
        if self.is_bayer() {
            PixelFormat::Bayer8
        } else {
            PixelFormat::Mono8
        }
    }
}

/// Memory-mapped SER recording, replayed as a stream of raw 8-bit frames.
pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
}

impl SerReader {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        // SAFETY: the mapping is read-only and the reader owns it for its whole lifetime.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(SpeckleError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(SpeckleError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;

        let expected_data_size = header.checked_data_end().ok_or_else(|| {
            SpeckleError::InvalidSer(format!(
                "Frame data size overflows: {}x{} px, {} frames",
                header.width, header.height, header.frame_count
            ))
        })?;
        if mmap.len() < expected_data_size {
            return Err(SpeckleError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        Ok(Self { mmap, header })
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    /// Get the raw bytes for a single frame (zero-copy from mmap).
    pub fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.frame_count();
        if index >= count {
            return Err(SpeckleError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }
        let offset = SER_HEADER_SIZE + index * self.header.frame_byte_size();
        let end = offset + self.header.frame_byte_size();
        Ok(&self.mmap[offset..end])
    }

    /// Read a single frame as packed 8-bit samples.
    ///
    /// Deeper samples keep their most significant 8 bits; RGB/BGR recordings
    /// contribute their green plane.
    pub fn read_frame(&self, index: usize) -> Result<Frame> {
        let raw = self.frame_raw(index)?;
        let w = self.header.width as usize;
        let h = self.header.height as usize;
        let bpp = self.header.bytes_per_pixel_plane();
        let planes = self.header.planes_per_pixel();
        let plane_index = if planes == 1 { 0 } else { 1 };

        let data = if bpp == 1 && planes == 1 {
            raw.to_vec()
        } else {
            reduce_to_8bit(raw, w * h, bpp, planes, plane_index, &self.header)
        };

        let frame = Frame {
            width: w,
            height: h,
            stride: w,
            format: self.header.output_format(),
            data,
            metadata: FrameMetadata {
                sequence: index as u64,
                timestamp_us: self.read_timestamp(index),
            },
        };
        Ok(frame)
    }

    /// Read per-frame timestamp from the optional trailer.
    fn read_timestamp(&self, index: usize) -> Option<u64> {
        let trailer_offset = self.header.checked_data_end()?;
        let ts_offset = trailer_offset + index * 8;
        if ts_offset + 8 <= self.mmap.len() {
            let bytes = &self.mmap[ts_offset..ts_offset + 8];
            Some(u64::from_le_bytes(bytes.try_into().ok()?))
        } else {
            None
        }
    }

    /// Build SourceInfo from the header.
    pub fn source_info(&self, path: &Path) -> SourceInfo {
        SourceInfo {
            filename: path.to_path_buf(),
            total_frames: self.frame_count(),
            width: self.header.width,
            height: self.header.height,
            bit_depth: self.header.pixel_depth as u8,
            format: self.header.output_format(),
            observer: non_empty(&self.header.observer),
            telescope: non_empty(&self.header.telescope),
            instrument: non_empty(&self.header.instrument),
        }
    }

    /// Iterator over all frames.
    pub fn frames(&self) -> impl Iterator<Item = Result<Frame>> + '_ {
        (0..self.frame_count()).map(move |i| self.read_frame(i))
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = non_negative("width", cursor.read_i32::<LittleEndian>()?)?;
    let height = non_negative("height", cursor.read_i32::<LittleEndian>()?)?;
    let pixel_depth = non_negative("pixel depth", cursor.read_i32::<LittleEndian>()?)?;
    let frame_count = non_negative("frame count", cursor.read_i32::<LittleEndian>()?)?;

    let observer = read_fixed_string(&buf[42..82]);
    let instrument = read_fixed_string(&buf[82..122]);
    let telescope = read_fixed_string(&buf[122..162]);

    let mut cursor = std::io::Cursor::new(&buf[162..]);
    let date_time = cursor.read_u64::<LittleEndian>()?;
    let date_time_utc = cursor.read_u64::<LittleEndian>()?;

    if width == 0 || height == 0 {
        return Err(SpeckleError::InvalidDimensions { width, height });
    }
    if pixel_depth == 0 || pixel_depth > 16 {
        return Err(SpeckleError::InvalidSer(format!(
            "Unsupported pixel depth: {pixel_depth}"
        )));
    }

    // Treat 0 as little-endian, as most capture software writes it.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_id,
        little_endian,
        width,
        height,
        pixel_depth,
        frame_count,
        observer,
        instrument,
        telescope,
        date_time,
        date_time_utc,
    })
}

fn read_fixed_string(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf)
        .trim_end_matches('\0')
        .trim()
        .to_string()
}

fn non_negative(field: &str, value: i32) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| SpeckleError::InvalidSer(format!("Negative {field} in header: {value}")))
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}

fn reduce_to_8bit(
    raw: &[u8],
    pixel_count: usize,
    bytes_per_sample: usize,
    planes: usize,
    plane_index: usize,
    header: &SerHeader,
) -> Vec<u8> {
    let shift = header.pixel_depth.saturating_sub(8);
    (0..pixel_count)
        .map(|i| {
            let idx = (i * planes + plane_index) * bytes_per_sample;
            if bytes_per_sample == 1 {
                raw[idx]
            } else {
                let pair = [raw[idx], raw[idx + 1]];
                let val = if header.little_endian {
                    u16::from_le_bytes(pair)
                } else {
                    u16::from_be_bytes(pair)
                };
                (val >> shift).min(255) as u8
            }
        })
        .collect()
}
