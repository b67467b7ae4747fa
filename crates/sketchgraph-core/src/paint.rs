//! Colors, gradients and textures used as fill or stroke.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use peniko::Color;
use serde::{Deserialize, Serialize};

use crate::algebra::G20;
use crate::context::SceneContext;
use crate::element::ElementId;
use crate::error::{SceneResult, non_negative, unit_interval};
use crate::observable::{Observable, Signal};

/// Serializable RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match digits.len() {
            3 => {
                let mut c = digits.chars().map(|ch| ch.to_digit(16).map(|d| d as u8 * 17));
                Some(Self::new(c.next()??, c.next()??, c.next()??, 255))
            }
            6 | 8 => {
                let a = if digits.len() == 8 {
                    channel(digits.get(6..8)?)?
                } else {
                    255
                };
                Some(Self::new(
                    channel(digits.get(0..2)?)?,
                    channel(digits.get(2..4)?)?,
                    channel(digits.get(4..6)?)?,
                    a,
                ))
            }
            _ => None,
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// A paint that can change over time, such as a gradient or texture.
///
/// Shapes painted with a provider subscribe to [`changes`](Self::changes)
/// and raise their own fill or stroke flag whenever it ticks.
pub trait ColorProvider: fmt::Debug {
    fn id(&self) -> &ElementId;

    /// A revision counter bumped on every change.
    fn changes(&self) -> Signal<u64>;
}

/// What to paint a fill or stroke with.
#[derive(Clone, Debug, Default)]
pub enum Paint {
    #[default]
    None,
    Solid(SerializableColor),
    Provider(Rc<dyn ColorProvider>),
}

impl Paint {
    pub fn solid(color: impl Into<SerializableColor>) -> Self {
        Self::Solid(color.into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The solid color, if this is one.
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Solid(color) => Some((*color).into()),
            _ => None,
        }
    }

    pub fn provider(&self) -> Option<&Rc<dyn ColorProvider>> {
        match self {
            Self::Provider(provider) => Some(provider),
            _ => None,
        }
    }
}

impl PartialEq for Paint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Solid(a), Self::Solid(b)) => a == b,
            (Self::Provider(a), Self::Provider(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }
}

impl From<SerializableColor> for Paint {
    fn from(color: SerializableColor) -> Self {
        Self::Solid(color)
    }
}

impl From<Option<SerializableColor>> for Paint {
    fn from(color: Option<SerializableColor>) -> Self {
        color.map_or(Self::None, Self::Solid)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Solid(color.into())
    }
}

impl From<Rc<Gradient>> for Paint {
    fn from(gradient: Rc<Gradient>) -> Self {
        Self::Provider(gradient)
    }
}

impl From<Rc<Texture>> for Paint {
    fn from(texture: Rc<Texture>) -> Self {
        Self::Provider(texture)
    }
}

/// A color at an offset along a gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    index: usize,
    pub offset: f64,
    pub color: SerializableColor,
    pub opacity: f64,
}

impl Stop {
    pub fn new(ctx: &mut SceneContext, offset: f64, color: SerializableColor) -> SceneResult<Self> {
        let offset = unit_interval("offset", offset)?;
        Ok(Self {
            index: ctx.next_stop_index(),
            offset,
            color,
            opacity: 1.0,
        })
    }

    /// Set the stop opacity; values outside `0..=1` are rejected.
    pub fn with_opacity(mut self, opacity: f64) -> SceneResult<Self> {
        self.opacity = unit_interval("opacity", opacity)?;
        Ok(self)
    }

    /// Scene-unique index, stable across edits.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpreadMethod {
    #[default]
    Pad,
    Reflect,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GradientUnits {
    #[default]
    UserSpace,
    ObjectBoundingBox,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientGeometry {
    Linear { start: G20, end: G20 },
    Radial { center: G20, radius: f64, focal: G20 },
}

/// A linear or radial gradient shared by any number of shapes.
///
/// Edits go through `&self` so one `Rc<Gradient>` can be held by many
/// shapes and still be changed; each edit bumps the revision.
#[derive(Debug)]
pub struct Gradient {
    id: ElementId,
    geometry: Cell<GradientGeometry>,
    spread: Cell<SpreadMethod>,
    units: Cell<GradientUnits>,
    stops: RefCell<Vec<Stop>>,
    revision: Observable<u64>,
}

impl Gradient {
    pub fn linear(ctx: &mut SceneContext, start: G20, end: G20, stops: Vec<Stop>) -> Rc<Self> {
        Rc::new(Self::build(ctx, GradientGeometry::Linear { start, end }, stops))
    }

    pub fn radial(
        ctx: &mut SceneContext,
        center: G20,
        radius: f64,
        focal: Option<G20>,
        stops: Vec<Stop>,
    ) -> SceneResult<Rc<Self>> {
        non_negative("radius", radius)?;
        let geometry = GradientGeometry::Radial {
            center,
            radius,
            focal: focal.unwrap_or(center),
        };
        Ok(Rc::new(Self::build(ctx, geometry, stops)))
    }

    fn build(ctx: &mut SceneContext, geometry: GradientGeometry, mut stops: Vec<Stop>) -> Self {
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self {
            id: ctx.next_id("gradient"),
            geometry: Cell::new(geometry),
            spread: Cell::new(SpreadMethod::default()),
            units: Cell::new(GradientUnits::default()),
            stops: RefCell::new(stops),
            revision: Observable::new(0),
        }
    }

    pub fn geometry(&self) -> GradientGeometry {
        self.geometry.get()
    }

    pub fn spread(&self) -> SpreadMethod {
        self.spread.get()
    }

    pub fn units(&self) -> GradientUnits {
        self.units.get()
    }

    /// Stops in ascending offset order.
    pub fn stops(&self) -> Vec<Stop> {
        self.stops.borrow().clone()
    }

    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    pub fn set_geometry(&self, geometry: GradientGeometry) -> SceneResult<bool> {
        if let GradientGeometry::Radial { radius, .. } = geometry {
            non_negative("radius", radius)?;
        }
        if self.geometry.get() == geometry {
            return Ok(false);
        }
        self.geometry.set(geometry);
        self.touch();
        Ok(true)
    }

    pub fn set_spread(&self, spread: SpreadMethod) -> bool {
        if self.spread.replace(spread) == spread {
            return false;
        }
        self.touch();
        true
    }

    pub fn set_units(&self, units: GradientUnits) -> bool {
        if self.units.replace(units) == units {
            return false;
        }
        self.touch();
        true
    }

    /// Insert a stop, keeping offsets sorted. Equal offsets keep insertion order.
    pub fn add_stop(&self, stop: Stop) {
        {
            let mut stops = self.stops.borrow_mut();
            let at = stops.partition_point(|s| s.offset <= stop.offset);
            stops.insert(at, stop);
        }
        self.touch();
    }

    /// Remove the stop with scene index `index`.
    pub fn remove_stop(&self, index: usize) -> Option<Stop> {
        let removed = {
            let mut stops = self.stops.borrow_mut();
            let at = stops.iter().position(|s| s.index == index)?;
            stops.remove(at)
        };
        self.touch();
        Some(removed)
    }

    /// Recolor the stop with scene index `index`.
    pub fn set_stop_color(&self, index: usize, color: SerializableColor) -> bool {
        let changed = {
            let mut stops = self.stops.borrow_mut();
            match stops.iter_mut().find(|s| s.index == index) {
                Some(stop) if stop.color != color => {
                    stop.color = color;
                    true
                }
                _ => false,
            }
        };
        if changed {
            self.touch();
        }
        changed
    }

    /// Move the stop with scene index `index` and re-sort.
    pub fn set_stop_offset(&self, index: usize, offset: f64) -> SceneResult<bool> {
        let offset = unit_interval("offset", offset)?;
        let changed = {
            let mut stops = self.stops.borrow_mut();
            let Some(stop) = stops.iter_mut().find(|s| s.index == index) else {
                return Ok(false);
            };
            if stop.offset == offset {
                false
            } else {
                stop.offset = offset;
                stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
                true
            }
        };
        if changed {
            self.touch();
        }
        Ok(changed)
    }

    fn touch(&self) {
        self.revision.update(|r| r + 1);
    }
}

impl ColorProvider for Gradient {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn changes(&self) -> Signal<u64> {
        self.revision.signal()
    }
}

/// An image paint. Loading happens outside the core; the host reports it.
#[derive(Debug)]
pub struct Texture {
    id: ElementId,
    source: RefCell<String>,
    loaded: Cell<bool>,
    revision: Observable<u64>,
}

impl Texture {
    pub fn new(ctx: &mut SceneContext, source: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            id: ctx.next_id("texture"),
            source: RefCell::new(source.into()),
            loaded: Cell::new(false),
            revision: Observable::new(0),
        })
    }

    pub fn source(&self) -> String {
        self.source.borrow().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    /// Point at a new image; it counts as unloaded until reported.
    pub fn set_source(&self, source: impl Into<String>) -> bool {
        let source = source.into();
        if *self.source.borrow() == source {
            return false;
        }
        *self.source.borrow_mut() = source;
        self.loaded.set(false);
        self.revision.update(|r| r + 1);
        true
    }

    /// Called by the host once the image data is available.
    pub fn mark_loaded(&self) {
        if !self.loaded.replace(true) {
            log::debug!("texture {} loaded", self.id);
            self.revision.update(|r| r + 1);
        }
    }
}

impl ColorProvider for Texture {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn changes(&self) -> Signal<u64> {
        self.revision.signal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_round_trip_through_peniko() {
        let color = SerializableColor::new(10, 20, 30, 40);
        let peniko: Color = color.into();
        assert_eq!(SerializableColor::from(peniko), color);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(
            SerializableColor::from_hex("#ff8000"),
            Some(SerializableColor::new(255, 128, 0, 255))
        );
        assert_eq!(
            SerializableColor::from_hex("#fff"),
            Some(SerializableColor::white())
        );
        assert_eq!(
            SerializableColor::from_hex("#00000080"),
            Some(SerializableColor::new(0, 0, 0, 128))
        );
        assert_eq!(SerializableColor::from_hex("fff"), None);
        assert_eq!(SerializableColor::from_hex("#ggg"), None);
    }

    #[test]
    fn test_provider_paint_compares_by_identity() {
        let mut ctx = SceneContext::default();
        let a = Gradient::linear(&mut ctx, G20::vector(0.0, 0.0), G20::vector(1.0, 0.0), vec![]);
        let b = Gradient::linear(&mut ctx, G20::vector(0.0, 0.0), G20::vector(1.0, 0.0), vec![]);
        assert_eq!(Paint::from(Rc::clone(&a)), Paint::from(Rc::clone(&a)));
        assert_ne!(Paint::from(a), Paint::from(b));
        assert_eq!(Paint::from(None), Paint::None);
    }

    #[test]
    fn test_gradient_stops_stay_sorted() {
        let mut ctx = SceneContext::default();
        let red = SerializableColor::new(255, 0, 0, 255);
        let far = Stop::new(&mut ctx, 1.0, SerializableColor::black()).unwrap();
        let near = Stop::new(&mut ctx, 0.0, SerializableColor::white()).unwrap();
        let gradient = Gradient::linear(&mut ctx, G20::zero(), G20::e1(), vec![far, near]);

        let mid = Stop::new(&mut ctx, 0.5, red).unwrap();
        let mid_index = mid.index();
        gradient.add_stop(mid);

        let offsets: Vec<f64> = gradient.stops().iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0.0, 0.5, 1.0]);

        gradient.set_stop_offset(mid_index, 0.9).unwrap();
        assert_eq!(gradient.stops()[1].offset, 0.9);
        assert!(Stop::new(&mut ctx, 1.5, red).is_err());
        assert!(Stop::new(&mut ctx, f64::NAN, red).is_err());
    }

    #[test]
    fn test_stop_opacity_is_validated() {
        let mut ctx = SceneContext::default();
        let stop = Stop::new(&mut ctx, 0.5, SerializableColor::white()).unwrap();
        assert_eq!(stop.clone().with_opacity(0.25).unwrap().opacity, 0.25);
        assert!(stop.clone().with_opacity(1.5).is_err());
        assert!(stop.clone().with_opacity(-0.1).is_err());
        assert!(stop.with_opacity(f64::NAN).is_err());
    }

    #[test]
    fn test_gradient_revision_ticks_on_change() {
        let mut ctx = SceneContext::default();
        let gradient = Gradient::linear(&mut ctx, G20::zero(), G20::e1(), vec![]);
        assert_eq!(gradient.revision(), 0);

        assert!(gradient.set_spread(SpreadMethod::Repeat));
        assert!(!gradient.set_spread(SpreadMethod::Repeat));
        assert_eq!(gradient.revision(), 1);
    }

    #[test]
    fn test_texture_load_reported_once() {
        let mut ctx = SceneContext::default();
        let texture = Texture::new(&mut ctx, "a.png");
        texture.mark_loaded();
        texture.mark_loaded();
        assert!(texture.is_loaded());
        assert_eq!(texture.changes().get(), 1);

        assert!(texture.set_source("b.png"));
        assert!(!texture.is_loaded());
    }
}
