//! Reuse of an uploaded template's theme part.

use std::io::{Cursor, Read};

use base64::Engine;
use zip::ZipArchive;

use crate::error::{ExportError, Result};

/// Theme part of a presentation package.
pub const THEME_PART: &str = "ppt/theme/theme1.xml";

/// Largest decompressed theme part accepted.
pub const MAX_THEME_BYTES: u64 = 2 * 1024 * 1024;

/// Decode a base64 `.pptx` upload and read its primary theme part.
pub fn extract_theme_xml(data: &str) -> Result<String> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| ExportError::InvalidTheme(format!("not base64: {}", e)))?;

    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExportError::InvalidTheme(format!("not a pptx package: {}", e)))?;

    let mut file = archive
        .by_name(THEME_PART)
        .map_err(|e| ExportError::InvalidTheme(format!("{} missing: {}", THEME_PART, e)))?;

    if file.size() > MAX_THEME_BYTES {
        return Err(ExportError::InvalidTheme(format!(
            "{} is {} bytes, limit is {}",
            THEME_PART,
            file.size(),
            MAX_THEME_BYTES
        )));
    }

    // The declared size is untrusted; never inflate past the limit.
    let mut xml = String::new();
    (&mut file).take(MAX_THEME_BYTES + 1).read_to_string(&mut xml)?;
    if xml.len() as u64 > MAX_THEME_BYTES {
        return Err(ExportError::InvalidTheme(format!(
            "{} exceeds {} bytes",
            THEME_PART, MAX_THEME_BYTES
        )));
    }

    if !xml.contains("<a:theme") {
        return Err(ExportError::InvalidTheme(format!(
            "{} is not a theme part",
            THEME_PART
        )));
    }
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn package(files: &[(&str, &str)]) -> String {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in files {
            let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        let bytes = zip.finish().unwrap().into_inner();
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn test_reads_theme_part() {
        let data = package(&[(THEME_PART, "<a:theme name=\"Brand\"></a:theme>")]);
        assert!(extract_theme_xml(&data).unwrap().contains("Brand"));
    }

    #[test]
    fn test_rejects_non_base64() {
        assert!(matches!(
            extract_theme_xml("%%%"),
            Err(ExportError::InvalidTheme(_))
        ));
    }

    #[test]
    fn test_rejects_package_without_theme() {
        let data = package(&[("ppt/presentation.xml", "<p:presentation/>")]);
        assert!(matches!(
            extract_theme_xml(&data),
            Err(ExportError::InvalidTheme(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_theme_part() {
        let body = "a".repeat(MAX_THEME_BYTES as usize + 1);
        let xml = format!("<a:theme name=\"Huge\">{}</a:theme>", body);
        let data = package(&[(THEME_PART, xml.as_str())]);
        match extract_theme_xml(&data) {
            Err(ExportError::InvalidTheme(reason)) => assert!(reason.contains("limit")),
            other => panic!("expected InvalidTheme, got {:?}", other.map(|xml| xml.len())),
        }
    }
}
