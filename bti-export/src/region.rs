//! Report region model
//!
//! The renderable form of an on-screen report: a stack of placed layers
//! (embedded images and colored panels) plus region-level visual effects.
//! Effects must be neutralized while a capture is in flight and restored
//! afterwards, whatever the outcome — [`RegionEffects::neutralize`] returns
//! a guard that restores on drop.

use serde::{Deserialize, Serialize};

/// Where an embedded image's bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Bytes already in memory
    Inline(Vec<u8>),
    /// A `data:` URL
    DataUrl(String),
    /// A remote URL fetched during the awaiting-images phase
    Remote(String),
}

/// Placement rectangle in layout pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Layer content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerKind {
    /// An embedded image
    Image(ImageSource),
    /// A solid-colored panel
    Panel([u8; 3]),
}

/// One placed layer, painted in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub kind: LayerKind,
    pub rect: Rect,
}

impl Layer {
    pub fn image(source: ImageSource, rect: Rect) -> Self {
        Self {
            kind: LayerKind::Image(source),
            rect,
        }
    }

    pub fn panel(color: [u8; 3], rect: Rect) -> Self {
        Self {
            kind: LayerKind::Panel(color),
            rect,
        }
    }
}

/// Region-level visual effects that would corrupt a capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionEffects {
    /// Region opacity in [0, 1]
    pub opacity: f32,
    /// Whether CSS-style animations/transitions are running
    pub animations_enabled: bool,
}

impl Default for RegionEffects {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            animations_enabled: true,
        }
    }
}

/// The renderable report region
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRegion {
    /// Layout width in pixels
    pub width: u32,
    /// Layout height in pixels
    pub height: u32,
    /// Layers, painted bottom to top
    pub layers: Vec<Layer>,
    /// Current visual effects
    pub effects: RegionEffects,
}

impl ReportRegion {
    /// Create an empty region of the given layout size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layers: Vec::new(),
            effects: RegionEffects::default(),
        }
    }

    /// Add a layer
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    /// Number of embedded images that must resolve before rendering
    pub fn image_count(&self) -> usize {
        self.layers
            .iter()
            .filter(|l| matches!(l.kind, LayerKind::Image(_)))
            .count()
    }

    /// Neutralize effects for the duration of a capture.
    ///
    /// The returned guard holds the region mutably and restores the saved
    /// effects when dropped — including on the error path.
    pub fn neutralize(&mut self) -> EffectsGuard<'_> {
        let saved = self.effects;
        self.effects = RegionEffects {
            opacity: 1.0,
            animations_enabled: false,
        };
        EffectsGuard {
            region: self,
            saved,
        }
    }
}

/// Restores a region's effects on drop
pub struct EffectsGuard<'a> {
    region: &'a mut ReportRegion,
    saved: RegionEffects,
}

impl EffectsGuard<'_> {
    /// The region being captured
    pub fn region(&self) -> &ReportRegion {
        self.region
    }
}

impl Drop for EffectsGuard<'_> {
    fn drop(&mut self) {
        self.region.effects = self.saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_count() {
        let region = ReportRegion::new(400, 600)
            .with_layer(Layer::panel([255, 255, 255], Rect::new(0, 0, 400, 600)))
            .with_layer(Layer::image(
                ImageSource::Inline(vec![1, 2, 3]),
                Rect::new(50, 50, 300, 300),
            ));
        assert_eq!(region.image_count(), 1);
    }

    #[test]
    fn test_neutralize_restores_on_drop() {
        let mut region = ReportRegion::new(100, 100);
        region.effects = RegionEffects {
            opacity: 0.4,
            animations_enabled: true,
        };

        {
            let guard = region.neutralize();
            assert_eq!(guard.region().effects.opacity, 1.0);
            assert!(!guard.region().effects.animations_enabled);
        }

        assert_eq!(region.effects.opacity, 0.4);
        assert!(region.effects.animations_enabled);
    }
}
