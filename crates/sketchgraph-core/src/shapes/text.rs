//! Text node. Layout and metrics belong to the renderer.

use serde::{Deserialize, Serialize};

use crate::error::{SceneResult, non_negative};

/// Horizontal anchoring of the text relative to the node origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical anchoring of the text relative to the node origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Baseline {
    Top,
    #[default]
    Middle,
    Bottom,
    Alphabetic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    /// CSS numeric weight.
    pub fn value(&self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Regular => 400,
            FontWeight::Bold => 700,
        }
    }
}

/// A run of text drawn at the node origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    value: String,
    family: String,
    size: f64,
    leading: f64,
    alignment: TextAlign,
    baseline: Baseline,
    style: FontStyle,
    weight: FontWeight,
}

impl Text {
    pub const DEFAULT_FAMILY: &'static str = "sans-serif";
    pub const DEFAULT_SIZE: f64 = 13.0;

    /// Text in the default family and size.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            family: Self::DEFAULT_FAMILY.to_string(),
            size: Self::DEFAULT_SIZE,
            leading: 17.0,
            alignment: TextAlign::default(),
            baseline: Baseline::default(),
            style: FontStyle::default(),
            weight: FontWeight::default(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Font family name, as a CSS-style family list.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Font size in scene units.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Distance between baselines of consecutive lines.
    pub fn leading(&self) -> f64 {
        self.leading
    }

    pub fn alignment(&self) -> TextAlign {
        self.alignment
    }

    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    pub fn style(&self) -> FontStyle {
        self.style
    }

    pub fn weight(&self) -> FontWeight {
        self.weight
    }

    /// Replace the content. Returns whether it changed.
    pub fn set_value(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    /// Returns whether the family changed.
    pub fn set_family(&mut self, family: impl Into<String>) -> bool {
        let family = family.into();
        if self.family == family {
            return false;
        }
        self.family = family;
        true
    }

    /// Returns whether the size changed; negative sizes are rejected.
    pub fn set_size(&mut self, size: f64) -> SceneResult<bool> {
        let size = non_negative("size", size)?;
        Ok(std::mem::replace(&mut self.size, size) != size)
    }

    /// Returns whether the leading changed; negative values are rejected.
    pub fn set_leading(&mut self, leading: f64) -> SceneResult<bool> {
        let leading = non_negative("leading", leading)?;
        Ok(std::mem::replace(&mut self.leading, leading) != leading)
    }

    /// Horizontal anchoring of the text at its origin.
    pub fn set_alignment(&mut self, alignment: TextAlign) -> bool {
        std::mem::replace(&mut self.alignment, alignment) != alignment
    }

    /// Vertical anchoring of the text at its origin.
    pub fn set_baseline(&mut self, baseline: Baseline) -> bool {
        std::mem::replace(&mut self.baseline, baseline) != baseline
    }

    pub fn set_style(&mut self, style: FontStyle) -> bool {
        std::mem::replace(&mut self.style, style) != style
    }

    pub fn set_weight(&mut self, weight: FontWeight) -> bool {
        std::mem::replace(&mut self.weight, weight) != weight
    }
}
