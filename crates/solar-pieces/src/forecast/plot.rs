//! Observed vs. predicted comparison chart

use once_cell::sync::Lazy;
use plotters::prelude::*;
use plotters::style::{register_font, FontStyle};
use std::path::Path;

use crate::config::PlotConfig;
use crate::error::{Error, Result};

const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const CRIMSON: RGBColor = RGBColor(220, 20, 60);

/// Family every chart text element is drawn with
const FONT_FAMILY: &str = "sans-serif";

static FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Registers the bundled font once per process
static FONT_REGISTERED: Lazy<bool> =
    Lazy::new(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_DATA).is_ok());

fn ensure_font() -> Result<()> {
    if *FONT_REGISTERED {
        Ok(())
    } else {
        Err(Error::plot("bundled chart font could not be loaded"))
    }
}

/// Value range covering every finite value, padded by 5%
fn value_range<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// Finite points of a series against its row index
fn points(values: &[f64]) -> impl Iterator<Item = (f64, f64)> + Clone + '_ {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| (i as f64, *v))
}

/// Render both series over the row index into a PNG at `path`.
///
/// Observed values are drawn solid, predictions dashed. The bitmap backend
/// is dropped before returning, which releases the image buffer.
pub fn render_comparison(
    path: &Path,
    observed: &[f64],
    predicted: &[f64],
    config: &PlotConfig,
) -> Result<()> {
    ensure_font()?;

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(Error::plot)?;

    let (y_min, y_max) = value_range(observed.iter().chain(predicted));
    let x_max = observed.len().max(predicted.len()).max(2) - 1;

    let mut chart = ChartBuilder::on(&root)
        .caption(&config.title, (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0f64..x_max as f64, y_min..y_max)
        .map_err(Error::plot)?;

    chart
        .configure_mesh()
        .x_desc(config.x_label.as_str())
        .y_desc(config.y_label.as_str())
        .label_style((FONT_FAMILY, 14))
        .bold_line_style(BLACK.mix(0.3))
        .light_line_style(BLACK.mix(0.08))
        .draw()
        .map_err(Error::plot)?;

    chart
        .draw_series(LineSeries::new(points(observed), STEEL_BLUE.stroke_width(2)))
        .map_err(Error::plot)?
        .label(config.observed_label.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], STEEL_BLUE));

    chart
        .draw_series(DashedLineSeries::new(
            points(predicted),
            10,
            6,
            CRIMSON.stroke_width(2),
        ))
        .map_err(Error::plot)?
        .label(config.predicted_label.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], CRIMSON));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT_FAMILY, 14))
        .draw()
        .map_err(Error::plot)?;

    root.present().map_err(Error::plot)?;
    Ok(())
}
