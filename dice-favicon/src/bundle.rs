//! Multi-resolution icon container (the `.ico` format).
//!
//! Every frame is stored as an embedded PNG, which all current browsers and
//! Windows Vista onwards accept.

use anyhow::{Context, Result, anyhow, bail};
use binrw::{BinRead, BinWrite, binrw};
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::debug;

use crate::raster::{Canvas, render_raster};

const HEADER_SIZE: usize = 6;
const ENTRY_SIZE: usize = 16;

/// The largest edge an entry can describe.
pub const MAX_FRAME_SIZE: u32 = 256;

/// Container header followed by one directory entry per frame.
#[binrw]
#[brw(little, magic = b"\x00\x00\x01\x00")]
#[derive(Debug, Clone, PartialEq)]
pub struct IconDir {
    #[br(temp)]
    #[bw(calc = entries.len() as u16)]
    count: u16,

    #[br(count = count)]
    pub entries: Vec<IconDirEntry>,
}

#[derive(BinRead, BinWrite, Debug, Clone, PartialEq)]
#[brw(little)]
pub struct IconDirEntry {
    /// Frame width in pixels, where 0 means 256
    pub width: u8,

    /// Frame height in pixels, where 0 means 256
    pub height: u8,

    /// Number of palette colors (0 for true color)
    pub palette_size: u8,

    pub reserved: u8,

    /// Color planes
    pub planes: u16,

    /// Bits per pixel
    pub bit_count: u16,

    /// Length of the embedded image in bytes
    pub size: u32,

    /// Start of the embedded image from the beginning of the container
    pub offset: u32,
}

impl IconDirEntry {
    fn new(edge: u32, size: u32, offset: u32) -> Result<Self> {
        if edge == 0 || edge > MAX_FRAME_SIZE {
            bail!("Icon frames must be between 1 and {MAX_FRAME_SIZE} pixels, got {edge}");
        }

        // 256 does not fit in a byte and is stored as 0
        let edge = (edge % MAX_FRAME_SIZE) as u8;
        Ok(Self {
            width: edge,
            height: edge,
            palette_size: 0,
            reserved: 0,
            planes: 1,
            bit_count: 32,
            size,
            offset,
        })
    }

    pub fn pixel_width(&self) -> u32 {
        match self.width {
            0 => MAX_FRAME_SIZE,
            w => w as u32,
        }
    }

    pub fn pixel_height(&self) -> u32 {
        match self.height {
            0 => MAX_FRAME_SIZE,
            h => h as u32,
        }
    }
}

/// A decoded frame in straight RGBA.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Frame {
    pub fn from_png(data: &[u8]) -> Result<Self> {
        let decoder = png::Decoder::new(data);
        let mut reader = decoder.read_info()?;
        let mut rgba = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut rgba)?;

        if info.color_type != png::ColorType::Rgba || info.bit_depth != png::BitDepth::Eight {
            bail!(
                "Expected an 8-bit RGBA frame, found {:?} at {:?}",
                info.color_type,
                info.bit_depth
            );
        }

        rgba.truncate(info.buffer_size());
        Ok(Self {
            width: info.width,
            height: info.height,
            rgba,
        })
    }
}

/// Several renderings of the icon packed into one file.
pub struct IconBundle {
    /// Frames in container order
    pub frames: Vec<Canvas>,
}

impl IconBundle {
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.frames.is_empty() {
            bail!("An icon bundle needs at least one frame");
        }
        if self.frames.len() > u16::MAX as usize {
            bail!("Too many frames for one icon bundle: {}", self.frames.len());
        }

        let images = self
            .frames
            .iter()
            .map(Canvas::encode_png)
            .collect::<Result<Vec<_>>>()?;

        let mut offset = (HEADER_SIZE + ENTRY_SIZE * images.len()) as u32;
        let mut entries = Vec::with_capacity(images.len());
        for (canvas, image) in self.frames.iter().zip(&images) {
            let size = u32::try_from(image.len())?;
            entries.push(IconDirEntry::new(canvas.size(), size, offset)?);
            offset = offset
                .checked_add(size)
                .ok_or_else(|| anyhow!("Icon bundle exceeds 4 GiB"))?;
        }

        let mut cursor = Cursor::new(Vec::new());
        IconDir { entries }.write(&mut cursor)?;
        for image in &images {
            cursor.write_all(image)?;
        }

        Ok(cursor.into_inner())
    }

    /// Read the frames of an encoded bundle back in directory order.
    pub fn decode(data: &[u8]) -> Result<Vec<Frame>> {
        let dir = IconDir::read(&mut Cursor::new(data)).context("Not an icon bundle")?;
        if dir.entries.is_empty() {
            bail!("Icon bundle has no frames");
        }

        dir.entries
            .iter()
            .map(|entry| {
                let start = entry.offset as usize;
                let image = start
                    .checked_add(entry.size as usize)
                    .and_then(|end| data.get(start..end))
                    .ok_or_else(|| {
                        anyhow!("Frame of {} bytes at {start} is outside the bundle", entry.size)
                    })?;

                let frame = Frame::from_png(image)?;
                if frame.width != entry.pixel_width() || frame.height != entry.pixel_height() {
                    bail!(
                        "Frame is {}x{} but its entry says {}x{}",
                        frame.width,
                        frame.height,
                        entry.pixel_width(),
                        entry.pixel_height()
                    );
                }
                Ok(frame)
            })
            .collect()
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.encode()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(frames = self.frames.len(), path = %path.display(), "Saved icon bundle");
        Ok(())
    }
}

/// Render the icon once per entry of `sizes`, keeping their order.
pub fn render_icon_bundle(sizes: &[u32]) -> Result<IconBundle> {
    if sizes.is_empty() {
        bail!("An icon bundle needs at least one size");
    }

    let frames = sizes
        .iter()
        .map(|size| render_raster(*size))
        .collect::<Result<Vec<_>>>()?;

    Ok(IconBundle { frames })
}
