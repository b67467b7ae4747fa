//! Fill and stroke attributes of drawable nodes.

use kurbo::{Cap, Join, Stroke};

use crate::context::SceneConfig;
use crate::dirty::DirtyFlags;
use crate::element::assign;
use crate::error::{SceneError, SceneResult, non_negative};
use crate::observable::{Observable, Signal, Subscription};
use crate::paint::Paint;

/// Paint and stroke geometry of a shape.
///
/// A [`Paint::Provider`] fill or stroke is watched: every change of the
/// provider raises `FILL` or `STROKE` on the owning node.
#[derive(Debug)]
pub struct ShapeStyle {
    fill: Observable<Paint>,
    stroke: Observable<Paint>,
    linewidth: Observable<f64>,
    cap: Observable<Cap>,
    join: Observable<Join>,
    miter: Observable<f64>,
    dashes: Observable<Vec<f64>>,
    fill_link: Option<Subscription>,
    stroke_link: Option<Subscription>,
}

impl ShapeStyle {
    pub(crate) fn new(config: &SceneConfig) -> Self {
        Self {
            fill: Observable::new(config.fill.into()),
            stroke: Observable::new(config.stroke.into()),
            linewidth: Observable::new(config.linewidth),
            cap: Observable::new(Cap::Butt),
            join: Observable::new(Join::Miter),
            miter: Observable::new(4.0),
            dashes: Observable::new(Vec::new()),
            fill_link: None,
            stroke_link: None,
        }
    }

    pub fn fill(&self) -> Paint {
        self.fill.get()
    }

    pub fn stroke(&self) -> Paint {
        self.stroke.get()
    }

    pub fn linewidth(&self) -> f64 {
        self.linewidth.get()
    }

    pub fn cap(&self) -> Cap {
        self.cap.get()
    }

    pub fn join(&self) -> Join {
        self.join.get()
    }

    pub fn miter(&self) -> f64 {
        self.miter.get()
    }

    pub fn dashes(&self) -> Vec<f64> {
        self.dashes.get()
    }

    pub fn fill_signal(&self) -> Signal<Paint> {
        self.fill.signal()
    }

    pub fn stroke_signal(&self) -> Signal<Paint> {
        self.stroke.signal()
    }

    pub fn linewidth_signal(&self) -> Signal<f64> {
        self.linewidth.signal()
    }

    /// Stroke parameters for kurbo's stroker; `None` when there is no stroke.
    pub fn to_stroke(&self) -> Option<Stroke> {
        if self.stroke.with(Paint::is_none) {
            return None;
        }
        let mut stroke = Stroke::new(self.linewidth())
            .with_caps(self.cap())
            .with_join(self.join())
            .with_miter_limit(self.miter());
        let dashes = self.dashes();
        if !dashes.is_empty() {
            stroke = stroke.with_dashes(0.0, dashes);
        }
        Some(stroke)
    }

    pub(crate) fn set_fill(&mut self, flags: &Observable<DirtyFlags>, fill: Paint) -> bool {
        if !assign(flags, &self.fill, DirtyFlags::FILL, fill.clone()) {
            return false;
        }
        relink(&mut self.fill_link, flags, &fill, DirtyFlags::FILL);
        true
    }

    pub(crate) fn set_stroke(&mut self, flags: &Observable<DirtyFlags>, stroke: Paint) -> bool {
        if !assign(flags, &self.stroke, DirtyFlags::STROKE, stroke.clone()) {
            return false;
        }
        relink(&mut self.stroke_link, flags, &stroke, DirtyFlags::STROKE);
        true
    }

    pub(crate) fn set_linewidth(
        &self,
        flags: &Observable<DirtyFlags>,
        linewidth: f64,
    ) -> SceneResult<bool> {
        let linewidth = non_negative("linewidth", linewidth)?;
        Ok(assign(flags, &self.linewidth, DirtyFlags::LINEWIDTH, linewidth))
    }

    pub(crate) fn set_cap(&self, flags: &Observable<DirtyFlags>, cap: Cap) -> bool {
        assign(flags, &self.cap, DirtyFlags::STROKE_STYLE, cap)
    }

    pub(crate) fn set_join(&self, flags: &Observable<DirtyFlags>, join: Join) -> bool {
        assign(flags, &self.join, DirtyFlags::STROKE_STYLE, join)
    }

    pub(crate) fn set_miter(&self, flags: &Observable<DirtyFlags>, miter: f64) -> SceneResult<bool> {
        if !miter.is_finite() || miter < 1.0 {
            return Err(SceneError::InvalidValue {
                property: "miter",
                value: miter,
            });
        }
        Ok(assign(flags, &self.miter, DirtyFlags::STROKE_STYLE, miter))
    }

    pub(crate) fn set_dashes(
        &self,
        flags: &Observable<DirtyFlags>,
        dashes: Vec<f64>,
    ) -> SceneResult<bool> {
        for &dash in &dashes {
            non_negative("dashes", dash)?;
        }
        Ok(assign(flags, &self.dashes, DirtyFlags::STROKE_STYLE, dashes))
    }

    /// Stop watching providers. Called when the node is destroyed.
    pub(crate) fn unlink(&mut self) {
        for link in [self.fill_link.take(), self.stroke_link.take()] {
            if let Some(mut link) = link {
                link.dispose();
            }
        }
    }
}

impl Drop for ShapeStyle {
    fn drop(&mut self) {
        self.unlink();
    }
}

fn relink(
    link: &mut Option<Subscription>,
    flags: &Observable<DirtyFlags>,
    paint: &Paint,
    flag: DirtyFlags,
) {
    if let Some(mut old) = link.take() {
        old.dispose();
    }
    if let Some(provider) = paint.provider() {
        let flags = flags.clone();
        *link = Some(provider.changes().subscribe(move |_| {
            flags.update(|f| *f | flag);
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::G20;
    use crate::context::SceneContext;
    use crate::paint::{Gradient, SerializableColor, SpreadMethod};
    use std::rc::Rc;

    fn style() -> ShapeStyle {
        ShapeStyle::new(&SceneConfig::default())
    }

    #[test]
    fn test_defaults_from_config() {
        let style = style();
        assert_eq!(style.fill(), Paint::Solid(SerializableColor::white()));
        assert_eq!(style.stroke(), Paint::Solid(SerializableColor::black()));
        assert_eq!(style.linewidth(), 1.0);
    }

    #[test]
    fn test_setters_raise_their_flags() {
        let flags = Observable::new(DirtyFlags::EMPTY);
        let mut style = style();

        assert!(style.set_fill(&flags, Paint::None));
        assert!(style.set_linewidth(&flags, 3.0).unwrap());
        assert!(style.set_cap(&flags, Cap::Round));
        assert_eq!(
            flags.get(),
            DirtyFlags::FILL | DirtyFlags::LINEWIDTH | DirtyFlags::STROKE_STYLE
        );

        assert!(style.set_linewidth(&flags, -1.0).is_err());
        assert!(style.set_miter(&flags, 0.5).is_err());
        assert!(style.set_dashes(&flags, vec![2.0, -1.0]).is_err());
    }

    #[test]
    fn test_gradient_change_reaches_node_flags() {
        let mut ctx = SceneContext::default();
        let flags = Observable::new(DirtyFlags::EMPTY);
        let mut style = style();
        let gradient = Gradient::linear(&mut ctx, G20::zero(), G20::e1(), vec![]);

        style.set_fill(&flags, Paint::from(Rc::clone(&gradient)));
        flags.set(DirtyFlags::EMPTY);

        gradient.set_spread(SpreadMethod::Reflect);
        assert_eq!(flags.get(), DirtyFlags::FILL);

        // Replacing the paint stops the old provider from reaching us.
        style.set_fill(&flags, Paint::None);
        flags.set(DirtyFlags::EMPTY);
        gradient.set_spread(SpreadMethod::Pad);
        assert!(flags.get().is_empty());
    }

    #[test]
    fn test_dropped_style_stops_watching_provider() {
        let mut ctx = SceneContext::default();
        let flags = Observable::new(DirtyFlags::EMPTY);
        let mut style = style();
        let gradient = Gradient::linear(&mut ctx, G20::zero(), G20::e1(), vec![]);
        style.set_fill(&flags, Paint::from(Rc::clone(&gradient)));
        flags.set(DirtyFlags::EMPTY);

        drop(style);
        gradient.set_spread(SpreadMethod::Repeat);
        assert!(flags.get().is_empty());
    }

    #[test]
    fn test_to_stroke() {
        let flags = Observable::new(DirtyFlags::EMPTY);
        let mut style = style();
        style.set_linewidth(&flags, 2.5).unwrap();
        style.set_dashes(&flags, vec![4.0, 2.0]).unwrap();
        let stroke = style.to_stroke().unwrap();
        assert_eq!(stroke.width, 2.5);
        assert_eq!(stroke.dash_pattern.len(), 2);

        style.set_stroke(&flags, Paint::None);
        assert!(style.to_stroke().is_none());
    }
}
