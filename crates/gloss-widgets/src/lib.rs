#![forbid(unsafe_code)]

//! Inline annotation widgets.
//!
//! - [`annotation`]: a word that reveals a positioned translation tooltip.
//! - [`outside`]: pointer activity outside a region.
//! - [`placement`]: horizontal tooltip offset that respects viewport margins.
//! - [`reveal`]: passage with a collapsible translation.
//! - [`variant`]: Arabic / Indonesian presentation.

pub mod annotation;
pub mod outside;
pub mod placement;
pub mod reveal;
pub mod variant;

pub use annotation::{Annotation, AnnotationState};
pub use outside::OutsideDetector;
pub use placement::{DEFAULT_MARGIN, PlacementConfig, compute_offset};
pub use reveal::{DEFAULT_REVEAL_TITLE, RevealBlock};
pub use variant::Variant;
