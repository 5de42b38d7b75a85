//! PDF Canvas - drawing surface for generated documents
//!
//! This crate provides functionality for:
//! - Creating PDF documents from scratch at a given page size and unit
//! - Filling and stroking rectangles, drawing lines and text
//! - Measuring and wrapping text with the built-in Helvetica metrics
//! - Embedding TrueType font families
//! - Inserting images (JPEG, PNG)
//! - Recording draw calls for layout tests
//!
//! # Example
//!
//! ```ignore
//! use pdf_canvas::{Color, FontSpec, PageSize, PdfDocument, RectStyle, Surface, Unit};
//!
//! let mut doc = PdfDocument::new(PageSize::A4, Unit::Mm);
//! doc.set_fill_color(Color::from_rgb(220, 220, 220));
//! doc.rect(15.0, 15.0, 180.0, 8.0, RectStyle::Fill);
//! doc.set_font(FontSpec::bold(10.0));
//! doc.text("Hello, World!", 18.0, 21.0);
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod graphics;
mod image;
mod metrics;
mod recorder;
mod surface;
mod text;

pub use document::{Color, PdfDocument};
pub use font::{FontData, FontFamily, FontFamilyBuilder, FontWeight};
pub use graphics::RectStyle;
pub use image::{calculate_scaled_dimensions, ImageScaleMode};
pub use metrics::BuiltinMetrics;
pub use recorder::{DrawOp, Recorder};
pub use surface::{FontSpec, PageSize, Surface, TextMeasure, Unit};
pub use text::{calculate_x_offset, generate_text_operators, wrap_to_width, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("Page size can only change before drawing")]
    PageAlreadyDrawn,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_error_messages() {
        let err = PdfError::ImageError("Unknown image format".to_string());
        assert_eq!(err.to_string(), "Image error: Unknown image format");
    }
}
