use crate::plotting::{RenderedChart, StaticChart};
use egui::ColorImage;
use image::{ImageBuffer, Rgb};
use std::path::{Path, PathBuf};

/// Convert a rendered chart into an image egui can upload as a texture.
pub fn to_color_image(chart: &RenderedChart) -> ColorImage {
    ColorImage::from_rgb(chart.size, &chart.rgb)
}

/// Save a [`RenderedChart`] as a PNG file.
pub fn save_png(chart: &RenderedChart, path: &Path) -> Result<(), image::ImageError> {
    let [w, h] = chart.size;
    let Some(img) = ImageBuffer::<Rgb<u8>, _>::from_raw(w as u32, h as u32, chart.rgb.clone())
    else {
        return Err(image::ImageError::Parameter(
            image::error::ParameterError::from_kind(
                image::error::ParameterErrorKind::DimensionMismatch,
            ),
        ));
    };
    img.save(path)
}

/// Save every chart into `dir` as `<stem>.png` and return the written paths.
pub fn save_all_png(
    charts: &[(StaticChart, &RenderedChart)],
    dir: &Path,
) -> Result<Vec<PathBuf>, image::ImageError> {
    let mut written = Vec::with_capacity(charts.len());
    for (chart, rendered) in charts {
        let path = dir.join(format!("{}.png", chart.file_stem()));
        save_png(rendered, &path)?;
        written.push(path);
    }
    Ok(written)
}
