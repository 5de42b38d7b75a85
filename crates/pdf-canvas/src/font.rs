//! Font handling for PDF documents

use crate::{PdfError, Result};
use lopdf::{Dictionary, Object, Stream};
use std::collections::{BTreeSet, HashMap};

/// Font weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Glyph lookup entry: glyph id and horizontal advance in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    id: u16,
    advance: u16,
}

/// Font data structure for embedded TrueType fonts
#[derive(Debug, Clone)]
pub struct FontData {
    /// Font name/identifier
    pub name: String,
    /// Raw TTF data
    pub ttf_data: Vec<u8>,
    /// Characters used in the document
    pub used_chars: BTreeSet<char>,
    /// Unicode to glyph table read from the cmap
    glyphs: HashMap<char, Glyph>,
    /// Advance of the .notdef glyph
    notdef_advance: u16,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
}

/// PDF objects generated for font embedding
pub struct FontObjects {
    /// Type0 font dictionary
    pub type0_font: Dictionary,
    /// CIDFont Type2 dictionary
    pub cid_font: Dictionary,
    /// Font descriptor dictionary
    pub font_descriptor: Dictionary,
    /// Font file stream (TTF data)
    pub font_file_stream: Stream,
    /// ToUnicode CMap stream
    pub tounicode_stream: Stream,
}

/// Font family with a required regular face and an optional bold face
#[derive(Debug, Clone)]
pub struct FontFamily {
    pub regular: FontData,
    pub bold: Option<FontData>,
}

impl FontFamily {
    /// Get the font data for the specified weight
    /// Falls back to regular if the bold face is not available
    pub fn get_variant(&self, weight: FontWeight) -> &FontData {
        match weight {
            FontWeight::Bold => self.bold.as_ref().unwrap_or(&self.regular),
            FontWeight::Regular => &self.regular,
        }
    }

    /// Mutable variant of [`FontFamily::get_variant`]
    pub fn get_variant_mut(&mut self, weight: FontWeight) -> &mut FontData {
        match (weight, self.bold.is_some()) {
            (FontWeight::Bold, true) => self.bold.as_mut().unwrap_or(&mut self.regular),
            _ => &mut self.regular,
        }
    }

    /// Faces that have drawn at least one character
    pub fn used_faces(&self) -> impl Iterator<Item = &FontData> {
        std::iter::once(&self.regular)
            .chain(self.bold.as_ref())
            .filter(|face| !face.used_chars.is_empty())
    }
}

/// Builder for registering font families
#[derive(Default)]
pub struct FontFamilyBuilder {
    regular: Option<Vec<u8>>,
    bold: Option<Vec<u8>>,
}

impl FontFamilyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regular(mut self, ttf_data: Vec<u8>) -> Self {
        self.regular = Some(ttf_data);
        self
    }

    pub fn bold(mut self, ttf_data: Vec<u8>) -> Self {
        self.bold = Some(ttf_data);
        self
    }

    /// Build the FontFamily from the provided TTF data
    pub fn build(self, family_name: &str) -> Result<FontFamily> {
        let Some(regular_data) = self.regular else {
            return Err(PdfError::FontParseError(
                "FontFamily must have at least a regular variant".to_string(),
            ));
        };
        let regular = FontData::from_ttf(&format!("{family_name}-regular"), &regular_data)?;

        let bold = self
            .bold
            .map(|data| FontData::from_ttf(&format!("{family_name}-bold"), &data))
            .transpose()?;

        Ok(FontFamily { regular, bold })
    }
}

impl FontData {
    /// Create font data from TTF bytes
    ///
    /// The Unicode cmap is read once so the font bytes do not need to stay
    /// borrowed by a parsed face.
    ///
    /// # Arguments
    /// * `name` - Font identifier
    /// * `ttf_data` - TrueType font file bytes
    pub fn from_ttf(name: &str, ttf_data: &[u8]) -> Result<Self> {
        let face = ttf_parser::Face::parse(ttf_data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{e:?}")))?;

        let mut glyphs = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|code| {
                    let Some(c) = char::from_u32(code) else {
                        return;
                    };
                    if let Some(gid) = subtable.glyph_index(code) {
                        let advance = face.glyph_hor_advance(gid).unwrap_or(0);
                        glyphs.entry(c).or_insert(Glyph {
                            id: gid.0,
                            advance,
                        });
                    }
                });
            }
        }

        let notdef_advance = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .unwrap_or(0);

        Ok(Self {
            name: name.to_string(),
            ttf_data: ttf_data.to_vec(),
            used_chars: BTreeSet::new(),
            glyphs,
            notdef_advance,
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
        })
    }

    /// Record characters drawn with this font
    pub fn add_chars(&mut self, text: &str) {
        self.used_chars.extend(text.chars());
    }

    /// Get glyph ID for a character
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.glyphs.get(&c).map(|g| g.id)
    }

    /// Check if font has a glyph for the given character
    pub fn has_glyph(&self, c: char) -> bool {
        self.glyph_id(c).is_some_and(|id| id != 0)
    }

    fn glyph_advance(&self, c: char) -> u16 {
        self.glyphs
            .get(&c)
            .map(|g| g.advance)
            .unwrap_or(self.notdef_advance)
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Calculate text width in font units
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars().map(|c| self.glyph_advance(c) as u32).sum()
    }

    /// Calculate text width in points for a given font size
    pub fn text_width_points(&self, text: &str, font_size: f64) -> f64 {
        let units_per_em = self.units_per_em.max(1) as f64;
        self.text_width(text) as f64 / units_per_em * font_size
    }

    /// Encode text as hex glyph ids for the Tj operator
    pub fn encode_text_hex(&self, text: &str) -> String {
        let hex: String = text
            .chars()
            .map(|c| format!("{:04X}", self.glyph_id(c).unwrap_or(0)))
            .collect();
        format!("<{hex}>")
    }

    /// Generate all PDF objects needed to embed this font
    ///
    /// References between the objects are left as placeholders and are
    /// wired up by the document when the objects are added.
    pub fn to_pdf_objects(&self) -> Result<FontObjects> {
        let font_name = Object::Name(self.name.clone().into_bytes());

        let tounicode_content = self.generate_tounicode_cmap();
        let tounicode_stream = Stream::new(Dictionary::new(), tounicode_content.into_bytes());

        let font_file_stream = Stream::new(
            Dictionary::from_iter(vec![("Length1", (self.ttf_data.len() as i64).into())]),
            self.ttf_data.clone(),
        );

        let scale = 1000.0 / self.units_per_em.max(1) as f64;
        let ascent = (self.ascender as f64 * scale).round() as i64;
        let descent = (self.descender as f64 * scale).round() as i64;

        let font_descriptor = Dictionary::from_iter(vec![
            ("Type", "FontDescriptor".into()),
            ("FontName", font_name.clone()),
            ("Flags", 4.into()),
            (
                "FontBBox",
                vec![0.into(), descent.into(), 1000.into(), ascent.into()].into(),
            ),
            ("ItalicAngle", 0.into()),
            ("Ascent", ascent.into()),
            ("Descent", descent.into()),
            ("CapHeight", ascent.into()),
            ("StemV", 80.into()),
            ("FontFile2", Object::Reference((0, 0))),
        ]);

        let cid_system_info = Dictionary::from_iter(vec![
            ("Registry", Object::string_literal("Adobe")),
            ("Ordering", Object::string_literal("Identity")),
            ("Supplement", 0.into()),
        ]);

        let cid_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "CIDFontType2".into()),
            ("BaseFont", font_name.clone()),
            ("CIDSystemInfo", cid_system_info.into()),
            ("FontDescriptor", Object::Reference((0, 0))),
            ("W", self.generate_widths_array().into()),
            ("DW", 1000.into()),
        ]);

        let type0_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type0".into()),
            ("BaseFont", font_name),
            ("Encoding", "Identity-H".into()),
            ("DescendantFonts", vec![Object::Reference((0, 0))].into()),
            ("ToUnicode", Object::Reference((0, 0))),
        ]);

        Ok(FontObjects {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        })
    }

    /// Generate /W array entries `gid [width]` for used glyphs, scaled to 1000 units
    fn generate_widths_array(&self) -> Vec<Object> {
        let scale = 1000.0 / self.units_per_em.max(1) as f64;
        let mut entries: Vec<(u16, u16)> = self
            .used_chars
            .iter()
            .filter_map(|c| self.glyphs.get(c))
            .map(|g| (g.id, g.advance))
            .collect();
        entries.sort();
        entries.dedup_by_key(|(id, _)| *id);

        let mut widths = Vec::with_capacity(entries.len() * 2);
        for (gid, advance) in entries {
            let width = (advance as f64 * scale).round() as i64;
            widths.push((gid as i64).into());
            widths.push(vec![width.into()].into());
        }
        widths
    }

    /// Generate ToUnicode CMap stream content
    fn generate_tounicode_cmap(&self) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        let mapped: Vec<(u16, char)> = self
            .used_chars
            .iter()
            .filter_map(|&c| self.glyph_id(c).map(|gid| (gid, c)))
            .collect();

        // bfchar sections hold at most 100 entries
        for chunk in mapped.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for (gid, c) in chunk {
                let mut utf16 = [0u16; 2];
                let units: String = c
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|u| format!("{u:04X}"))
                    .collect();
                cmap.push_str(&format!("<{gid:04X}> <{units}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");

        cmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Font with a hand-built glyph table, no TTF parsing involved
    fn test_font() -> FontData {
        let glyphs = [('A', 36, 1366), ('B', 37, 1366), ('é', 72, 1139), ('😀', 900, 2048)]
            .into_iter()
            .map(|(c, id, advance)| (c, Glyph { id, advance }))
            .collect();
        FontData {
            name: "test".to_string(),
            ttf_data: vec![0u8; 16],
            used_chars: BTreeSet::new(),
            glyphs,
            notdef_advance: 1024,
            units_per_em: 2048,
            ascender: 1854,
            descender: -434,
        }
    }

    #[test]
    fn test_from_ttf_rejects_garbage() {
        let result = FontData::from_ttf("broken", &[0u8; 100]);
        assert!(matches!(result, Err(PdfError::FontParseError(_))));
    }

    #[test]
    fn test_builder_requires_regular() {
        let result = FontFamilyBuilder::new().bold(vec![0u8; 10]).build("family");
        assert!(matches!(result, Err(PdfError::FontParseError(_))));
    }

    #[test]
    fn test_add_chars() {
        let mut font = test_font();
        font.add_chars("ABBA");
        assert_eq!(font.used_chars.len(), 2);
        assert!(font.used_chars.contains(&'A'));
    }

    #[test]
    fn test_glyph_lookup() {
        let font = test_font();
        assert_eq!(font.glyph_id('A'), Some(36));
        assert!(font.has_glyph('é'));
        assert!(!font.has_glyph('Z'));
    }

    #[test]
    fn test_text_width_points() {
        let font = test_font();
        assert_eq!(font.text_width("AB"), 2732);
        // Unknown characters use the .notdef advance
        assert_eq!(font.text_width("Z"), 1024);
        assert!((font.text_width_points("AB", 12.0) - 2732.0 / 2048.0 * 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_encode_text_hex() {
        let font = test_font();
        assert_eq!(font.encode_text_hex(""), "<>");
        assert_eq!(font.encode_text_hex("AZ"), "<00240000>");
    }

    #[test]
    fn test_widths_array_scaled() {
        let mut font = test_font();
        font.add_chars("BA");
        let widths = font.generate_widths_array();
        assert_eq!(widths.len(), 4);
        assert_eq!(widths[0].as_i64().unwrap(), 36);
        assert_eq!(widths[1].as_array().unwrap()[0].as_i64().unwrap(), 667);
    }

    #[test]
    fn test_tounicode_cmap() {
        let mut font = test_font();
        font.add_chars("Aé😀");
        let cmap = font.generate_tounicode_cmap();

        assert!(cmap.contains("3 beginbfchar"));
        assert!(cmap.contains("<0024> <0041>"));
        assert!(cmap.contains("<0048> <00E9>"));
        assert!(cmap.contains("<0384> <D83DDE00>"));
    }

    #[test]
    fn test_to_pdf_objects() {
        let mut font = test_font();
        font.add_chars("A");
        let objects = font.to_pdf_objects().unwrap();

        assert_eq!(
            objects.type0_font.get(b"Subtype").unwrap().as_name().unwrap(),
            b"Type0"
        );
        assert_eq!(
            objects.font_descriptor.get(b"Ascent").unwrap().as_i64().unwrap(),
            905
        );
        assert!(!objects.tounicode_stream.content.is_empty());
    }

    #[test]
    fn test_family_variant_fallback() {
        let mut family = FontFamily {
            regular: test_font(),
            bold: None,
        };
        assert_eq!(family.get_variant(FontWeight::Bold).name, "test");
        family.get_variant_mut(FontWeight::Bold).add_chars("A");
        assert_eq!(family.used_faces().count(), 1);
    }
}
