//! PDF Document built from scratch on a single page

use crate::font::FontWeight;
use crate::graphics::{generate_line_operators, generate_rect_operators, PathPaint};
use crate::image::{
    calculate_scaled_dimensions, generate_image_operators, ImageScaleMode, ImageXObject,
};
use crate::metrics::{encode_win_ansi_hex, BuiltinMetrics};
use crate::surface::{FontSpec, PageSize, Surface, TextMeasure, Unit};
use crate::text::{fmt_num, generate_text_operators, TextRenderContext};
use crate::{Align, FontFamily, FontFamilyBuilder, PdfError, RectStyle, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Default stroke width in points (0.2 mm)
const DEFAULT_LINE_WIDTH_PT: f64 = 0.567;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Gray level (0-255) on all three channels
    pub fn gray(level: u8) -> Self {
        Self::from_rgb(level, level, level)
    }

    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }

    /// Operands for the `rg`/`RG` operators
    pub(crate) fn to_operands(self) -> String {
        format!(
            "{} {} {}",
            fmt_num(self.r as f64),
            fmt_num(self.g as f64),
            fmt_num(self.b as f64)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// An embedded image and its resource name
#[derive(Debug, Clone)]
struct ImageResource {
    name: String,
    object_id: ObjectId,
    width: u32,
    height: u32,
}

/// Single-page PDF document
///
/// Coordinates are given in the document's [`Unit`] from the top-left
/// corner and converted to PDF points when operators are generated.
pub struct PdfDocument {
    /// The underlying lopdf document, holding image objects until save
    inner: Document,
    page_size: PageSize,
    unit: Unit,
    /// Content stream operators for the page
    content: Vec<u8>,
    fill_color: Color,
    stroke_color: Color,
    text_color: Color,
    /// Stroke width in points
    line_width: f64,
    font: FontSpec,
    /// Embedded font family, replacing the built-in Helvetica when set
    family: Option<FontFamily>,
    /// Embedded images (data hash -> resource)
    images: HashMap<u64, ImageResource>,
    title: Option<String>,
}

impl PdfDocument {
    /// Create an empty single-page document
    ///
    /// # Arguments
    /// * `page_size` - Page dimensions in `unit`
    /// * `unit` - User unit for all coordinates
    ///
    /// # Example
    /// ```ignore
    /// let doc = PdfDocument::new(PageSize::A4, Unit::Mm);
    /// ```
    pub fn new(page_size: PageSize, unit: Unit) -> Self {
        Self {
            inner: Document::with_version("1.7"),
            page_size,
            unit,
            content: Vec::new(),
            fill_color: Color::black(),
            stroke_color: Color::black(),
            text_color: Color::black(),
            line_width: DEFAULT_LINE_WIDTH_PT,
            font: FontSpec::default(),
            family: None,
            images: HashMap::new(),
            title: None,
        }
    }

    /// Register a TrueType family used for all subsequent measurement and text
    ///
    /// # Arguments
    /// * `name` - Family name, used as the PDF BaseFont prefix
    /// * `builder` - Builder holding the regular and optional bold faces
    pub fn register_font_family(&mut self, name: &str, builder: FontFamilyBuilder) -> Result<()> {
        if self.family.is_some() {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }
        self.family = Some(builder.build(name)?);
        Ok(())
    }

    /// Resize the page, e.g. once content-sized layouts are measured
    ///
    /// Fails once anything has been drawn, since drawn operators are
    /// already placed from the old page height.
    pub fn set_page_size(&mut self, page_size: PageSize) -> Result<()> {
        if !self.content.is_empty() {
            return Err(PdfError::PageAlreadyDrawn);
        }
        self.page_size = page_size;
        Ok(())
    }

    /// Set the document title written to the Info dictionary
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Page height in points
    fn page_height_pt(&self) -> f64 {
        self.page_size.height * self.unit.scale()
    }

    fn path_paint(&self) -> PathPaint {
        PathPaint {
            fill: self.fill_color,
            stroke: self.stroke_color,
            line_width: self.line_width,
        }
    }

    /// Resource name of the font for a weight
    fn font_resource(weight: FontWeight) -> &'static str {
        match weight {
            FontWeight::Regular => "F1",
            FontWeight::Bold => "F2",
        }
    }

    /// Get or create an image resource, deduplicated by content hash
    fn get_or_create_image_ref(&mut self, data: &[u8]) -> Result<ImageResource> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        if let Some(existing) = self.images.get(&data_hash) {
            return Ok(existing.clone());
        }

        let xobject = ImageXObject::from_bytes(data)
            .map_err(|e| PdfError::ImageError(format!("Failed to create image XObject: {e}")))?;
        let object_id = self.inner.add_object(xobject.to_pdf_stream());
        let resource = ImageResource {
            name: format!("Im{}", self.images.len() + 1),
            object_id,
            width: xobject.width,
            height: xobject.height,
        };
        self.images.insert(data_hash, resource.clone());
        Ok(resource)
    }

    /// Font dictionaries for the page resources
    fn font_resources(&self, doc: &mut Document) -> Result<Dictionary> {
        let mut fonts = Dictionary::new();
        match &self.family {
            Some(family) => {
                let regular_id = embed_font(doc, family.get_variant(FontWeight::Regular))?;
                let bold_id = match &family.bold {
                    Some(bold) => embed_font(doc, bold)?,
                    None => regular_id,
                };
                fonts.set("F1", regular_id);
                fonts.set("F2", bold_id);
            }
            None => {
                for (resource, base_font) in [("F1", "Helvetica"), ("F2", "Helvetica-Bold")] {
                    let id = doc.add_object(dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type1",
                        "BaseFont" => base_font,
                        "Encoding" => "WinAnsiEncoding",
                    });
                    fonts.set(resource, id);
                }
            }
        }
        Ok(fonts)
    }

    /// Assemble page tree, catalog and resources into a copy of the document
    fn build(&self) -> Result<Document> {
        let mut doc = self.inner.clone();
        let k = self.unit.scale();

        let pages_id = doc.new_object_id();
        let fonts = self.font_resources(&mut doc)?;

        let xobjects: BTreeMap<&str, ObjectId> = self
            .images
            .values()
            .map(|img| (img.name.as_str(), img.object_id))
            .collect();
        let mut xobject_dict = Dictionary::new();
        for (name, id) in xobjects {
            xobject_dict.set(name, id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
            "XObject" => xobject_dict,
            "ProcSet" => vec!["PDF".into(), "Text".into(), "ImageB".into(), "ImageC".into()],
        });
        let content_id = doc.add_object(Stream::new(dictionary! {}, self.content.clone()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real((self.page_size.width * k) as f32),
                Object::Real((self.page_size.height * k) as f32),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::string_literal(concat!("pdf-canvas ", env!("CARGO_PKG_VERSION"))),
        };
        if let Some(title) = &self.title {
            info.set("Title", Object::string_literal(title.as_str()));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        Ok(doc)
    }

    /// Save the document to a file
    ///
    /// # Arguments
    /// * `path` - Output file path
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let bytes = Surface::to_bytes(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// Add the objects of an embedded font and return the Type0 font id
fn embed_font(doc: &mut Document, font: &crate::FontData) -> Result<ObjectId> {
    let objects = font.to_pdf_objects()?;

    let font_file_id = doc.add_object(objects.font_file_stream);

    let mut font_descriptor = objects.font_descriptor;
    font_descriptor.set("FontFile2", Object::Reference(font_file_id));
    let font_descriptor_id = doc.add_object(font_descriptor);

    let mut cid_font = objects.cid_font;
    cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
    let cid_font_id = doc.add_object(cid_font);

    let tounicode_id = doc.add_object(objects.tounicode_stream);

    let mut type0_font = objects.type0_font;
    type0_font.set(
        "DescendantFonts",
        Object::Array(vec![Object::Reference(cid_font_id)]),
    );
    type0_font.set("ToUnicode", Object::Reference(tounicode_id));

    Ok(doc.add_object(type0_font))
}

impl TextMeasure for PdfDocument {
    fn text_width(&self, text: &str, font: FontSpec) -> f64 {
        match &self.family {
            Some(family) => {
                family
                    .get_variant(font.weight)
                    .text_width_points(text, font.size)
                    / self.unit.scale()
            }
            None => BuiltinMetrics::new(self.unit).text_width(text, font),
        }
    }
}

impl Surface for PdfDocument {
    fn page_size(&self) -> PageSize {
        self.page_size
    }

    fn as_measure(&self) -> &dyn TextMeasure {
        self
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width * self.unit.scale();
    }

    fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    fn font(&self) -> FontSpec {
        self.font
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, style: RectStyle) {
        let k = self.unit.scale();
        let pdf_y = self.page_height_pt() - (y + height) * k;
        let ops = generate_rect_operators(
            x * k,
            pdf_y,
            width * k,
            height * k,
            style,
            &self.path_paint(),
        );
        self.content.extend_from_slice(&ops);
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let k = self.unit.scale();
        let page_h = self.page_height_pt();
        let ops = generate_line_operators(
            x1 * k,
            page_h - y1 * k,
            x2 * k,
            page_h - y2 * k,
            &self.path_paint(),
        );
        self.content.extend_from_slice(&ops);
    }

    fn text(&mut self, text: &str, x: f64, y: f64) {
        let k = self.unit.scale();
        let font = self.font;
        let text_hex = match &mut self.family {
            Some(family) => {
                let face = family.get_variant_mut(font.weight);
                face.add_chars(text);
                face.encode_text_hex(text)
            }
            None => encode_win_ansi_hex(text),
        };

        let ctx = TextRenderContext {
            font_name: Self::font_resource(font.weight).to_string(),
            font_size: font.size,
            text_width: self.text_width(text, font) * k,
            color: self.text_color,
        };
        let ops = generate_text_operators(
            &text_hex,
            x * k,
            self.page_height_pt() - y * k,
            Align::Left,
            &ctx,
        );
        self.content.extend_from_slice(&ops);
    }

    fn image(
        &mut self,
        data: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<()> {
        let resource = self.get_or_create_image_ref(data)?;
        let (actual_width, actual_height) =
            calculate_scaled_dimensions(resource.width, resource.height, width, height, mode);

        let k = self.unit.scale();
        let pdf_y = self.page_height_pt() - (y + actual_height) * k;
        let ops = generate_image_operators(
            &resource.name,
            x * k,
            pdf_y,
            actual_width * k,
            actual_height * k,
        );
        self.content.extend_from_slice(&ops);
        Ok(())
    }

    fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut doc = self.build()?;
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }
}
