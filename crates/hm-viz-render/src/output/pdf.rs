use crate::RenderError;

/// Convert an SVG document to PDF bytes.
pub fn svg_to_pdf(svg: &str, font_bytes: Option<&[u8]>) -> crate::Result<Vec<u8>> {
    let opt = super::usvg_options(font_bytes);
    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Pdf(e.to_string()))?;

    svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), svg2pdf::PageOptions::default())
        .map_err(|e| RenderError::Pdf(e.to_string()))
}
