//! Proportional layout of the two dice for a given output size.
//!
//! Every dimension is a base design value in a 64x64 canvas multiplied by
//! `size / 64` and rounded to whole device units. Stroke and pip radii never
//! drop below one unit so tiny icons still show them.

use anyhow::{Result, bail};

use crate::palette::{BACK_DIE, DieStyle, FRONT_DIE};

/// Edge length of the design canvas in user units.
pub const BASE_SIZE: u32 = 64;

const DIE_SIDE: f32 = 36.0;
const CORNER_RADIUS: f32 = 5.0;
const PIP_RADIUS: f32 = 3.0;
const BACK_ORIGIN: f32 = 2.0;
const FRONT_ORIGIN: f32 = 26.0;
const OUTLINE_WIDTH: f32 = 1.0;

/// Pip offsets from the die center as a fraction of the side length.
const PIP_OFFSET_X: f32 = 0.25;
const PIP_OFFSET_Y: f32 = 0.28;

/// One die face showing six.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Die {
    pub x: u32,
    pub y: u32,
    pub side: u32,
    pub corner_radius: u32,
    pub pip_radius: u32,
    pub outline_width: u32,
    pub style: DieStyle,
}

impl Die {
    pub fn center(&self) -> (f32, f32) {
        let half = self.side as f32 / 2.0;
        (self.x as f32 + half, self.y as f32 + half)
    }

    /// Pip centers as two columns of three, row by row from the top.
    pub fn pips(&self) -> [(f32, f32); 6] {
        let (cx, cy) = self.center();
        let dx = self.side as f32 * PIP_OFFSET_X;
        let dy = self.side as f32 * PIP_OFFSET_Y;

        [
            (cx - dx, cy - dy),
            (cx + dx, cy - dy),
            (cx - dx, cy),
            (cx + dx, cy),
            (cx - dx, cy + dy),
            (cx + dx, cy + dy),
        ]
    }
}

/// Both dice scaled to a square canvas of `size` pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub size: u32,
    pub scale: f32,

    /// Drawn first
    pub back: Die,

    /// Drawn second, on top of `back`
    pub front: Die,
}

impl Layout {
    pub fn new(size: u32) -> Result<Self> {
        if size == 0 {
            bail!("Icon size must be a positive number of pixels");
        }

        let scale = size as f32 / BASE_SIZE as f32;
        let scaled = |value: f32| (value * scale).round() as u32;
        let visible = |value: f32| scaled(value).max(1);

        let die = |origin: f32, style: DieStyle| Die {
            x: scaled(origin),
            y: scaled(origin),
            side: scaled(DIE_SIDE),
            corner_radius: scaled(CORNER_RADIUS),
            pip_radius: visible(PIP_RADIUS),
            outline_width: visible(OUTLINE_WIDTH),
            style,
        };

        Ok(Self {
            size,
            scale,
            back: die(BACK_ORIGIN, BACK_DIE),
            front: die(FRONT_ORIGIN, FRONT_DIE),
        })
    }

    /// Dice in paint order.
    pub fn dice(&self) -> [&Die; 2] {
        [&self.back, &self.front]
    }
}
