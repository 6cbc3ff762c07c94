use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::geometry::{BASE_SIZE, Die, Layout};

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename = "svg")]
pub struct Svg {
    #[serde(rename = "@xmlns")]
    pub xmlns: String,
    #[serde(rename = "@viewBox")]
    pub view_box: String,
    pub defs: Defs,
    pub g: Vec<G>,
}

impl Svg {
    pub fn to_xml(&self) -> Result<String> {
        Ok(quick_xml::se::to_string(&self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_xml()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(path = %path.display(), "Saved vector icon");
        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Defs {
    #[serde(rename = "linearGradient")]
    pub linear_gradient: Vec<LinearGradient>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LinearGradient {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@x1")]
    pub x1: String,
    #[serde(rename = "@y1")]
    pub y1: String,
    #[serde(rename = "@x2")]
    pub x2: String,
    #[serde(rename = "@y2")]
    pub y2: String,
    pub stop: Vec<Stop>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Stop {
    #[serde(rename = "@offset")]
    pub offset: String,
    #[serde(rename = "@style")]
    pub style: String,
}

/// One die: its body followed by its pips.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct G {
    #[serde(rename = "@id")]
    pub id: String,
    pub rect: Rect,
    pub circle: Vec<Circle>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Rect {
    #[serde(rename = "@x")]
    pub x: String,
    #[serde(rename = "@y")]
    pub y: String,
    #[serde(rename = "@width")]
    pub width: String,
    #[serde(rename = "@height")]
    pub height: String,
    #[serde(rename = "@rx")]
    pub rx: String,
    #[serde(rename = "@fill")]
    pub fill: String,
    #[serde(rename = "@stroke")]
    pub stroke: String,
    #[serde(rename = "@stroke-width")]
    pub stroke_width: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Circle {
    #[serde(rename = "@cx")]
    pub cx: String,
    #[serde(rename = "@cy")]
    pub cy: String,
    #[serde(rename = "@r")]
    pub r: String,
    #[serde(rename = "@fill")]
    pub fill: String,
}

fn gradient(die: &Die) -> LinearGradient {
    let (from, to) = die.style.gradient;

    LinearGradient {
        id: die.style.id.to_string(),
        x1: String::from("0%"),
        y1: String::from("0%"),
        x2: String::from("100%"),
        y2: String::from("100%"),
        stop: vec![
            Stop {
                offset: String::from("0%"),
                style: format!("stop-color:{from}"),
            },
            Stop {
                offset: String::from("100%"),
                style: format!("stop-color:{to}"),
            },
        ],
    }
}

fn group(name: &str, die: &Die) -> G {
    G {
        id: name.to_string(),
        rect: Rect {
            x: format!("{}", die.x),
            y: format!("{}", die.y),
            width: format!("{}", die.side),
            height: format!("{}", die.side),
            rx: format!("{}", die.corner_radius),
            fill: format!("url(#{})", die.style.id),
            stroke: die.style.outline.to_string(),
            stroke_width: format!("{}", die.outline_width),
        },
        // Pips snap to whole user units
        circle: die
            .pips()
            .iter()
            .map(|(cx, cy)| Circle {
                cx: format!("{}", cx.round()),
                cy: format!("{}", cy.round()),
                r: format!("{}", die.pip_radius),
                fill: die.style.pip.to_string(),
            })
            .collect(),
    }
}

/// The icon as a 64x64 SVG document.
///
/// Uses the same layout as [`crate::raster::render_raster`] at the base size,
/// with gradient bodies in place of flat fills.
pub fn render_vector() -> Result<Svg> {
    let layout = Layout::new(BASE_SIZE)?;

    Ok(Svg {
        xmlns: String::from("http://www.w3.org/2000/svg"),
        view_box: format!("0 0 {BASE_SIZE} {BASE_SIZE}"),
        defs: Defs {
            linear_gradient: layout.dice().into_iter().map(gradient).collect(),
        },
        g: vec![group("back", &layout.back), group("front", &layout.front)],
    })
}
