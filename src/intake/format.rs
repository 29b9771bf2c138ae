//! File format classification and the selected-file model.

use bytes::Bytes;

/// Extensions that can be previewed directly.
pub const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Geocoded raster extensions (preview is a placeholder).
pub const GEORASTER_EXTENSIONS: &[&str] = &["tiff", "geotiff"];

/// Warning shown when a selection falls outside the accepted formats.
pub const UNSUPPORTED_FORMAT_WARNING: &str =
    "Unsupported file format. Accepted: JPG, PNG, GeoTIFF.";

/// Broad format class derived from a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatClass {
    /// jpg, jpeg or png.
    Raster,
    /// tiff or geotiff.
    GeoRaster,
    Unsupported,
}

impl FormatClass {
    /// Classify a file name by its lowercase trailing extension.
    ///
    /// The extension is everything after the last `.`; a name without a dot
    /// is treated as its own extension.
    pub fn from_name(name: &str) -> Self {
        let ext = name.rsplit('.').next().unwrap_or(name).to_lowercase();

        if RASTER_EXTENSIONS.contains(&ext.as_str()) {
            FormatClass::Raster
        } else if GEORASTER_EXTENSIONS.contains(&ext.as_str()) {
            FormatClass::GeoRaster
        } else {
            FormatClass::Unsupported
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatClass::Raster => "raster",
            FormatClass::GeoRaster => "georaster",
            FormatClass::Unsupported => "unsupported",
        }
    }

    /// Whether a preview handle is acquired for this class.
    pub fn has_preview(&self) -> bool {
        matches!(self, FormatClass::Raster)
    }
}

/// The operator's chosen file. Replaced wholesale on every selection.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    bytes: Bytes,
    format: FormatClass,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let format = FormatClass::from_name(&name);
        Self {
            name,
            bytes: bytes.into(),
            format,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Payload handle; clones share the underlying buffer.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn format(&self) -> FormatClass {
        self.format
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type guessed from the file name, for the upload part.
    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(FormatClass::from_name("IMG.PNG"), FormatClass::Raster);
        assert_eq!(FormatClass::from_name("photo.Jpeg"), FormatClass::Raster);
        assert_eq!(FormatClass::from_name("a.jpg"), FormatClass::Raster);
        assert_eq!(FormatClass::from_name("scan.GeoTIFF"), FormatClass::GeoRaster);
        assert_eq!(FormatClass::from_name("scan.tiff"), FormatClass::GeoRaster);
        assert_eq!(FormatClass::from_name("notes.txt"), FormatClass::Unsupported);
    }

    #[test]
    fn test_classification_uses_last_extension_only() {
        assert_eq!(FormatClass::from_name("archive.png.zip"), FormatClass::Unsupported);
        assert_eq!(FormatClass::from_name("frame.tiff.png"), FormatClass::Raster);
        // "tif" is not in the accepted set
        assert_eq!(FormatClass::from_name("scan.tif"), FormatClass::Unsupported);
    }

    #[test]
    fn test_classification_without_dot() {
        assert_eq!(FormatClass::from_name("README"), FormatClass::Unsupported);
        assert_eq!(FormatClass::from_name("png"), FormatClass::Raster);
        assert_eq!(FormatClass::from_name("image."), FormatClass::Unsupported);
    }

    #[test]
    fn test_selected_file_derives_format_and_mime() {
        let file = SelectedFile::new("harbour.JPG", vec![1u8, 2, 3]);
        assert_eq!(file.format(), FormatClass::Raster);
        assert_eq!(file.len(), 3);
        assert_eq!(file.mime_type(), "image/jpeg");

        let unknown = SelectedFile::new("blob", Vec::new());
        assert!(unknown.is_empty());
        assert_eq!(unknown.mime_type(), "application/octet-stream");
    }
}
