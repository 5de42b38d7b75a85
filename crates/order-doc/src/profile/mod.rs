//! Output profiles and the document assembler
//!
//! One engine lays out every paper format. Each profile reads the same
//! [`OrderBundle`] and draws onto any [`Surface`].

mod label;
mod standard;
mod tape;

use crate::config::RenderConfig;
use crate::layout::Cursor;
use crate::model::OrderBundle;
use crate::services::Assets;
use crate::{DocError, Result};
use cl_format::{format_date_str, format_date_time_str};
use log::{debug, warn};
use pdf_canvas::{BuiltinMetrics, PageSize, PdfDocument, Surface, TextMeasure, Unit};
use std::fmt;
use std::str::FromStr;

/// Roll and label width in millimetres
const NARROW_WIDTH_MM: f64 = 80.0;
/// Tape length in millimetres
const TAPE_LENGTH_MM: f64 = 2000.0;

/// Physical output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// A4 page
    Standard,
    /// Continuous 80 mm receipt tape
    Tape,
    /// Small 80 mm label without pricing
    Label,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Standard, Profile::Tape, Profile::Label];

    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Standard => "standard",
            Profile::Tape => "tape",
            Profile::Label => "label",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = DocError;

    /// Accepts the English names and the shop's own (`a4`, `boleta`, `etiqueta`)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "a4" => Ok(Profile::Standard),
            "tape" | "boleta" | "receipt" => Ok(Profile::Tape),
            "label" | "etiqueta" => Ok(Profile::Label),
            other => Err(DocError::InvalidProfile(other.to_string())),
        }
    }
}

/// Layout decisions taken while composing a document
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub profile: Profile,
    pub page_size: PageSize,
    /// Measured panel heights in draw order
    pub panel_heights: Vec<(String, f64)>,
    /// Font size chosen for the policy block, if one was drawn
    pub policy_font_size: Option<f64>,
    pub policy_overflow: bool,
    /// Cursor after the last element
    pub cursor: Cursor,
}

impl LayoutReport {
    fn new(profile: Profile, page_size: PageSize) -> Self {
        Self {
            profile,
            page_size,
            panel_heights: Vec::new(),
            policy_font_size: None,
            policy_overflow: false,
            cursor: Cursor::default(),
        }
    }

    fn record_panel(&mut self, name: &str, height: f64) {
        debug!("{} panel '{}': height {:.2}", self.profile, name, height);
        self.panel_heights.push((name.to_string(), height));
    }

    /// Height recorded for a panel
    pub fn panel_height(&self, name: &str) -> Option<f64> {
        self.panel_heights
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, h)| *h)
    }
}

/// Finished document
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub profile: Profile,
    pub report: LayoutReport,
}

/// Lays out one order in any profile
pub struct DocumentAssembler<'a> {
    bundle: &'a OrderBundle,
    config: &'a RenderConfig,
    assets: &'a Assets,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(bundle: &'a OrderBundle, config: &'a RenderConfig, assets: &'a Assets) -> Self {
        Self {
            bundle,
            config,
            assets,
        }
    }

    /// Page size and unit for a profile
    ///
    /// The label height is measured from its content with the built-in
    /// metrics; [`render_with`](Self::render_with) measures it again with
    /// the document's fonts.
    pub fn page_setup(&self, profile: Profile) -> (PageSize, Unit) {
        match profile {
            Profile::Standard => (PageSize::A4, Unit::Mm),
            Profile::Tape => (
                PageSize::new(
                    Unit::Pt.from_mm(NARROW_WIDTH_MM),
                    Unit::Pt.from_mm(TAPE_LENGTH_MM),
                ),
                Unit::Pt,
            ),
            Profile::Label => (
                self.label_page_size(&BuiltinMetrics::new(Unit::Pt)),
                Unit::Pt,
            ),
        }
    }

    /// Label page sized to its content under the given metrics
    pub fn label_page_size(&self, metrics: &dyn TextMeasure) -> PageSize {
        let width = Unit::Pt.from_mm(NARROW_WIDTH_MM);
        let height = label::measure(self, metrics, width).page_height();
        debug!("label page height {:.1}pt", height);
        PageSize::new(width, height)
    }

    /// Draw the document for `profile` onto `surface`
    ///
    /// The caller keeps the surface, e.g. to hand it to a print dialog.
    pub fn compose(&self, profile: Profile, surface: &mut dyn Surface) -> LayoutReport {
        let mut report = LayoutReport::new(profile, surface.page_size());
        let end = match profile {
            Profile::Standard => standard::compose(self, surface, &mut report),
            Profile::Tape => tape::compose(self, surface, &mut report),
            Profile::Label => label::compose(self, surface),
        };
        report.cursor = end;
        report
    }

    /// Produce PDF bytes for `profile` with the built-in fonts
    pub fn render(&self, profile: Profile) -> Result<RenderedDocument> {
        let (page_size, unit) = self.page_setup(profile);
        self.render_with(profile, PdfDocument::new(page_size, unit))
    }

    /// Produce PDF bytes for `profile` on a prepared document
    ///
    /// The document may carry an embedded font family. Its page should come
    /// from [`page_setup`](Self::page_setup); the label page is re-measured
    /// with the document's own metrics before anything is drawn.
    pub fn render_with(&self, profile: Profile, mut doc: PdfDocument) -> Result<RenderedDocument> {
        if profile == Profile::Label {
            let page_size = self.label_page_size(&doc);
            doc.set_page_size(page_size)?;
        }
        doc.set_title(&format!("Orden {}", self.bundle.order.order_number));
        let report = self.compose(profile, &mut doc);
        let bytes = doc.to_bytes()?;
        debug!(
            "rendered {} for {}: {} bytes",
            profile,
            self.bundle.order.order_number,
            bytes.len()
        );
        Ok(RenderedDocument {
            bytes,
            profile,
            report,
        })
    }

    /// Creation timestamp as `dd/mm/yyyy HH:MM`, or as stored if unparseable
    fn created_at_display(&self) -> String {
        let raw = &self.bundle.order.created_at;
        format_date_time_str(raw, self.config.display_offset_minutes).unwrap_or_else(|e| {
            warn!("printing creation date as stored: {}", e);
            raw.clone()
        })
    }

    /// Commitment date as `dd/mm/yyyy`, if one is set
    fn commitment_display(&self) -> Option<String> {
        let raw = self.bundle.order.commitment_date.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        Some(
            format_date_str(raw, self.config.display_offset_minutes).unwrap_or_else(|e| {
                warn!("printing commitment date as stored: {}", e);
                raw.to_string()
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_profile_from_str() {
        assert_eq!("standard".parse::<Profile>().unwrap(), Profile::Standard);
        assert_eq!("A4".parse::<Profile>().unwrap(), Profile::Standard);
        assert_eq!("boleta".parse::<Profile>().unwrap(), Profile::Tape);
        assert_eq!(" etiqueta ".parse::<Profile>().unwrap(), Profile::Label);
        assert!(matches!(
            "sobre".parse::<Profile>(),
            Err(DocError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_profile_display_round_trip() {
        for profile in Profile::ALL {
            assert_eq!(profile.to_string().parse::<Profile>().unwrap(), profile);
        }
    }
}
