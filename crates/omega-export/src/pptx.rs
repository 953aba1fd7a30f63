//! Minimal Office Open XML presentation writer.
//!
//! Every slide uses one blank layout; the title and bullet list are placed as
//! text boxes. Speaker notes get a notes slide bound to a single notes master.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::builder::PresentationBuilder;
use crate::error::Result;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_PRESENTATION: &str = "application/vnd.openxmlformats-officedocument.presentationml";

const TITLE_COLOR: &str = "27304E";
const BODY_COLOR: &str = "3D4470";

// 16:9 slide in EMU.
const SLIDE_WIDTH: u64 = 12_192_000;
const SLIDE_HEIGHT: u64 = 6_858_000;
const EMU_PER_INCH: f64 = 914_400.0;

fn emu(inches: f64) -> u64 {
    (inches * EMU_PER_INCH) as u64
}

const EMPTY_TREE: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;
const CLR_MAP: &str = r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#;

const DEFAULT_THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Omega"><a:themeElements><a:clrScheme name="Omega"><a:dk1><a:srgbClr val="1B1F33"/></a:dk1><a:lt1><a:srgbClr val="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="27304E"/></a:dk2><a:lt2><a:srgbClr val="EEF1F8"/></a:lt2><a:accent1><a:srgbClr val="4F5BD5"/></a:accent1><a:accent2><a:srgbClr val="3D4470"/></a:accent2><a:accent3><a:srgbClr val="7A86E8"/></a:accent3><a:accent4><a:srgbClr val="F2A541"/></a:accent4><a:accent5><a:srgbClr val="2BB3A3"/></a:accent5><a:accent6><a:srgbClr val="E4572E"/></a:accent6><a:hlink><a:srgbClr val="4F5BD5"/></a:hlink><a:folHlink><a:srgbClr val="7A86E8"/></a:folHlink></a:clrScheme><a:fontScheme name="Omega"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Omega"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

#[derive(Debug, Clone)]
struct PptxSlide {
    title: String,
    bullets: Vec<String>,
    notes: Option<String>,
}

/// [`PresentationBuilder`] producing a `.pptx` package.
#[derive(Debug, Clone, Default)]
pub struct PptxBuilder {
    slides: Vec<PptxSlide>,
    theme_xml: Option<String>,
}

impl PptxBuilder {
    /// Use `xml` as the slide theme instead of the built-in one.
    pub fn with_theme_xml(mut self, xml: String) -> Self {
        self.theme_xml = Some(xml);
        self
    }

    fn content_types(&self) -> String {
        let mut xml = format!(
            r#"{}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="{ct}.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="{ct}.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="{ct}.slideLayout+xml"/><Override PartName="/ppt/notesMasters/notesMaster1.xml" ContentType="{ct}.notesMaster+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/ppt/theme/theme2.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#,
            XML_DECL,
            ct = CT_PRESENTATION
        );
        for (index, slide) in self.slides.iter().enumerate() {
            let n = index + 1;
            xml.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{}.slide+xml"/>"#,
                n, CT_PRESENTATION
            ));
            if slide.notes.is_some() {
                xml.push_str(&format!(
                    r#"<Override PartName="/ppt/notesSlides/notesSlide{}.xml" ContentType="{}.notesSlide+xml"/>"#,
                    n, CT_PRESENTATION
                ));
            }
        }
        xml.push_str("</Types>");
        xml
    }

    fn presentation(&self) -> String {
        let slide_ids: String = (0..self.slides.len())
            .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, 4 + i))
            .collect();
        format!(
            r#"{}<p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:notesMasterIdLst><p:notesMasterId r:id="rId3"/></p:notesMasterIdLst><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
            XML_DECL, NS, slide_ids, SLIDE_WIDTH, SLIDE_HEIGHT
        )
    }

    fn presentation_rels(&self) -> String {
        let mut rels = vec![
            relationship(1, "slideMaster", "slideMasters/slideMaster1.xml"),
            relationship(2, "theme", "theme/theme1.xml"),
            relationship(3, "notesMaster", "notesMasters/notesMaster1.xml"),
        ];
        for i in 0..self.slides.len() {
            rels.push(relationship(4 + i, "slide", &format!("slides/slide{}.xml", i + 1)));
        }
        relationships(&rels)
    }

    fn slide_rels(slide: &PptxSlide, n: usize) -> String {
        let mut rels = vec![relationship(1, "slideLayout", "../slideLayouts/slideLayout1.xml")];
        if slide.notes.is_some() {
            rels.push(relationship(
                2,
                "notesSlide",
                &format!("../notesSlides/notesSlide{}.xml", n),
            ));
        }
        relationships(&rels)
    }

    fn notes_rels(n: usize) -> String {
        relationships(&[
            relationship(1, "notesMaster", "../notesMasters/notesMaster1.xml"),
            relationship(2, "slide", &format!("../slides/slide{}.xml", n)),
        ])
    }

    fn slide_xml(slide: &PptxSlide) -> String {
        let title = text_box(
            2,
            "Title",
            (0.6, 0.5, 12.1, 1.0),
            &[run(&slide.title, 3000, true, TITLE_COLOR)],
        );
        let body = if slide.bullets.is_empty() {
            String::new()
        } else {
            let paragraphs: Vec<String> = slide
                .bullets
                .iter()
                .map(|b| bullet_paragraph(b))
                .collect();
            text_box_paragraphs(3, "Body", (0.9, 1.5, 11.5, 5.3), &paragraphs)
        };
        format!(
            r#"{}<p:sld {}><p:cSld><p:spTree>{}{}{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            XML_DECL, NS, EMPTY_TREE, title, body
        )
    }

    fn notes_xml(notes: &str) -> String {
        let paragraphs: String = notes
            .lines()
            .map(|line| format!(r#"<a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r></a:p>"#, xml_text(line)))
            .collect();
        format!(
            r#"{}<p:notes {}><p:cSld><p:spTree>{}<p:sp><p:nvSpPr><p:cNvPr id="2" name="Notes"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>"#,
            XML_DECL, NS, EMPTY_TREE, paragraphs
        )
    }

    fn slide_master() -> String {
        format!(
            r#"{}<p:sldMaster {}><p:cSld><p:spTree>{}</p:spTree></p:cSld>{}<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
            XML_DECL, NS, EMPTY_TREE, CLR_MAP
        )
    }

    fn slide_layout() -> String {
        format!(
            r#"{}<p:sldLayout {} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
            XML_DECL, NS, EMPTY_TREE
        )
    }

    fn notes_master() -> String {
        format!(
            r#"{}<p:notesMaster {}><p:cSld><p:spTree>{}</p:spTree></p:cSld>{}</p:notesMaster>"#,
            XML_DECL, NS, EMPTY_TREE, CLR_MAP
        )
    }
}

fn relationship(id: usize, kind: &str, target: &str) -> String {
    format!(
        r#"<Relationship Id="rId{}" Type="{}/{}" Target="{}"/>"#,
        id, REL_NS, kind, target
    )
}

fn relationships(rels: &[String]) -> String {
    format!(
        r#"{}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        XML_DECL,
        rels.concat()
    )
}

fn run(text: &str, size: u32, bold: bool, color: &str) -> String {
    format!(
        r#"<a:r><a:rPr lang="en-US" sz="{}" b="{}"><a:solidFill><a:srgbClr val="{}"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r>"#,
        size,
        if bold { 1 } else { 0 },
        color,
        xml_text(text)
    )
}

/// Escaped text with characters XML 1.0 cannot carry removed.
fn xml_text(text: &str) -> String {
    let legal: String = text.chars().filter(|c| is_xml_char(*c)).collect();
    escape(&legal).into_owned()
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

fn bullet_paragraph(text: &str) -> String {
    format!(
        r#"<a:p><a:pPr marL="342900" indent="-342900"><a:lnSpc><a:spcPts val="2800"/></a:lnSpc><a:buChar char="&#8226;"/></a:pPr>{}</a:p>"#,
        run(text, 1800, false, BODY_COLOR)
    )
}

fn text_box(id: u32, name: &str, frame: (f64, f64, f64, f64), runs: &[String]) -> String {
    text_box_paragraphs(id, name, frame, &[format!("<a:p>{}</a:p>", runs.concat())])
}

fn text_box_paragraphs(
    id: u32,
    name: &str,
    (x, y, w, h): (f64, f64, f64, f64),
    paragraphs: &[String],
) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square"/><a:lstStyle/>{}</p:txBody></p:sp>"#,
        id,
        name,
        emu(x),
        emu(y),
        emu(w),
        emu(h),
        paragraphs.concat()
    )
}

impl PresentationBuilder for PptxBuilder {
    fn create() -> Self {
        Self::default()
    }

    fn add_slide(&mut self, title: &str, bullets: &[String], notes: Option<&str>) {
        self.slides.push(PptxSlide {
            title: title.to_string(),
            bullets: bullets.to_vec(),
            notes: notes.map(str::to_string),
        });
    }

    fn add_summary_slide(&mut self, title: &str, bullets: &[String]) {
        self.add_slide(title, bullets, None);
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let theme = self.theme_xml.as_deref().unwrap_or(DEFAULT_THEME);

        let mut put = |name: &str, content: &str| -> Result<()> {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
            Ok(())
        };

        put("[Content_Types].xml", &self.content_types())?;
        put(
            "_rels/.rels",
            &relationships(&[relationship(1, "officeDocument", "ppt/presentation.xml")]),
        )?;
        put("ppt/presentation.xml", &self.presentation())?;
        put("ppt/_rels/presentation.xml.rels", &self.presentation_rels())?;
        put("ppt/slideMasters/slideMaster1.xml", &Self::slide_master())?;
        put(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &relationships(&[
                relationship(1, "slideLayout", "../slideLayouts/slideLayout1.xml"),
                relationship(2, "theme", "../theme/theme1.xml"),
            ]),
        )?;
        put("ppt/slideLayouts/slideLayout1.xml", &Self::slide_layout())?;
        put(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &relationships(&[relationship(1, "slideMaster", "../slideMasters/slideMaster1.xml")]),
        )?;
        put("ppt/notesMasters/notesMaster1.xml", &Self::notes_master())?;
        put(
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            &relationships(&[relationship(1, "theme", "../theme/theme2.xml")]),
        )?;
        put("ppt/theme/theme1.xml", theme)?;
        put("ppt/theme/theme2.xml", DEFAULT_THEME)?;

        for (index, slide) in self.slides.iter().enumerate() {
            let n = index + 1;
            put(&format!("ppt/slides/slide{}.xml", n), &Self::slide_xml(slide))?;
            put(
                &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                &Self::slide_rels(slide, n),
            )?;
            if let Some(notes) = &slide.notes {
                put(&format!("ppt/notesSlides/notesSlide{}.xml", n), &Self::notes_xml(notes))?;
                put(
                    &format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", n),
                    &Self::notes_rels(n),
                )?;
            }
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}
