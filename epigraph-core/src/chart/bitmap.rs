use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use async_trait::async_trait;
use bytes::Bytes;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, register_font};
use tracing::{debug, info};

use super::ChartRenderer;
use super::layout::{
    CANVAS_HEIGHT, CANVAS_WIDTH, ChartSpec, X_AXIS_LABEL, Y_AXIS_LABEL,
};
use crate::error::{GraphError, Result};

const FONT_FAMILY: &str = "sans-serif";

// plotters keeps registered fonts in a process-wide table.
static FONTS_REGISTERED: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// TTF files used for chart text.
#[derive(Debug, Clone)]
pub struct FontSource {
    pub regular: PathBuf,
    /// Falls back to `regular` when unset.
    pub bold: Option<PathBuf>,
}

/// Renders locally with `plotters`, no credentials or network involved.
#[derive(Debug)]
pub struct BitmapRenderer {
    _private: (),
}

impl BitmapRenderer {
    /// Load and register the fonts, then hand back a renderer.
    ///
    /// Fonts are registered once per process; later calls reuse the first
    /// registration.
    pub fn new(fonts: &FontSource) -> Result<Self> {
        FONTS_REGISTERED
            .get_or_init(|| register_fonts(fonts))
            .clone()
            .map_err(GraphError::render)?;
        Ok(Self { _private: () })
    }
}

#[async_trait]
impl ChartRenderer for BitmapRenderer {
    async fn render(&self, spec: &ChartSpec) -> Result<Bytes> {
        let spec = spec.clone();
        let png = tokio::task::spawn_blocking(move || draw_png(&spec))
            .await
            .map_err(|err| GraphError::render(format!("render task failed: {err}")))??;
        Ok(Bytes::from(png))
    }

    fn backend(&self) -> &'static str {
        "bitmap"
    }
}

fn register_fonts(fonts: &FontSource) -> std::result::Result<(), String> {
    let regular = read_font(&fonts.regular)?;
    let bold = match &fonts.bold {
        Some(path) => read_font(path)?,
        None => regular,
    };

    register_font(FONT_FAMILY, FontStyle::Normal, regular)
        .map_err(|_| format!("invalid font file {}", fonts.regular.display()))?;
    register_font(FONT_FAMILY, FontStyle::Bold, bold)
        .map_err(|_| "invalid bold font file".to_string())?;

    info!(font = %fonts.regular.display(), "chart fonts registered");
    Ok(())
}

fn read_font(path: &Path) -> std::result::Result<&'static [u8], String> {
    let bytes = std::fs::read(path)
        .map_err(|err| format!("cannot read font {}: {err}", path.display()))?;
    Ok(Box::leak(bytes.into_boxed_slice()))
}

fn drawing_error<E: std::fmt::Display>(err: E) -> GraphError {
    GraphError::render(format!("drawing failed: {err}"))
}

fn draw_png(spec: &ChartSpec) -> Result<Vec<u8>> {
    let mut canvas = vec![0u8; (CANVAS_WIDTH * CANVAS_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut canvas, (CANVAS_WIDTH, CANVAS_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error)?;

        let (x_min, x_max) = spec.x_range();
        let (y_min, y_max) = spec.y_range();
        let caption = (FONT_FAMILY, 22).into_font().style(FontStyle::Bold);

        let mut chart = ChartBuilder::on(&root)
            .caption(spec.title(), caption)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(100)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(drawing_error)?;

        // x labels are drawn by hand below, only the first and last episode.
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .y_labels(spec.y_ticks().len())
            .x_desc(X_AXIS_LABEL)
            .y_desc(Y_AXIS_LABEL)
            .y_label_formatter(&|rating| format!("{rating:.1}"))
            .draw()
            .map_err(drawing_error)?;

        let tick_style = TextStyle::from((FONT_FAMILY, 14).into_font())
            .pos(Pos::new(HPos::Center, VPos::Top));
        for tick in spec.x_ticks() {
            let (px, py) = chart.backend_coord(&(tick, y_min));
            root.draw(&Text::new(tick.to_string(), (px, py + 6), &tick_style))
                .map_err(drawing_error)?;
        }

        for (idx, plot) in spec.plots().iter().enumerate() {
            let color = Palette99::pick(idx).to_rgba();
            chart
                .draw_series(LineSeries::new(plot.points(), color.stroke_width(2)))
                .map_err(drawing_error)?;
            chart
                .draw_series(
                    plot.points()
                        .map(|point| Circle::new(point, 3, color.filled())),
                )
                .map_err(drawing_error)?;
        }

        root.present().map_err(drawing_error)?;
    }

    let image = RgbImage::from_raw(CANVAS_WIDTH, CANVAS_HEIGHT, canvas)
        .ok_or_else(|| GraphError::render("canvas size does not match the image"))?;
    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|err| GraphError::render(format!("PNG encoding failed: {err}")))?;

    let png = png.into_inner();
    debug!(bytes = png.len(), "encoded chart");
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SeasonSeries;

    const DEJAVU: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
    const DEJAVU_BOLD: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf";

    #[tokio::test]
    async fn renders_a_full_size_png() {
        let renderer = BitmapRenderer::new(&FontSource {
            regular: PathBuf::from(DEJAVU),
            bold: Some(PathBuf::from(DEJAVU_BOLD)),
        })
        .unwrap();

        let mut series = SeasonSeries::new();
        series.push(1, 9.0);
        series.push(1, 9.5);
        series.push(2, 9.2);
        let spec = ChartSpec::new("Breaking Bad", &series);

        let png = renderer.render(&spec).await.unwrap();
        assert_eq!(renderer.backend(), "bitmap");

        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!(decoded.width(), CANVAS_WIDTH);
        assert_eq!(decoded.height(), CANVAS_HEIGHT);
    }

    #[test]
    fn missing_font_file_is_a_render_error() {
        let err = read_font(Path::new("/definitely/not/here.ttf")).unwrap_err();
        assert!(err.contains("cannot read font"));
    }
}
