// src/plot_framework.rs

use plotters::backend::{BitMapBackend, DrawingBackend};
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{PathElement, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::ops::Range;

use crate::constants::{
    FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND, FONT_SIZE_MAIN_TITLE,
    FONT_SIZE_MESSAGE, LINE_WIDTH_LEGEND, PLOT_HEIGHT, PLOT_WIDTH,
};
use crate::types::TracePlotData;

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    pane_title: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (
        (x_range.end - x_range.start) as u32,
        (y_range.end - y_range.start) as u32,
    );
    let message = format!("{pane_title} Data Unavailable: {reason}");
    let text_style = ("sans-serif", FONT_SIZE_MESSAGE).into_font().color(&RED);
    area.draw(&Text::new(
        message,
        (width as i32 / 4, height as i32 / 2),
        text_style,
    ))?;
    Ok(())
}

fn draw_single_trace_chart(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    title: &str,
    x_range: Range<f64>,
    y_range: Range<f64>,
    series: &[PlotSeries],
    x_label: &str,
    y_label: &str,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", FONT_SIZE_CHART_TITLE))
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .x_labels(20)
        .y_labels(10)
        .y_label_formatter(&|y| {
            // Compact labels: "k" notation above a thousand, one decimal
            // for small fractional values.
            if y.abs() >= 1000.0 {
                format!("{:.0}k", y / 1000.0)
            } else if y.abs() < 10.0 && y.fract() != 0.0 {
                format!("{:.1}", y)
            } else {
                format!("{:.0}", y)
            }
        })
        .light_line_style(WHITE.mix(0.7))
        .label_style(("sans-serif", FONT_SIZE_AXIS_LABEL))
        .draw()?;

    let mut legend_series_count = 0;
    for s in series {
        if s.data.is_empty() {
            continue;
        }
        let color = s.color;
        let stroke = s.stroke_width;
        let drawn = chart.draw_series(LineSeries::new(
            s.data.iter().cloned(),
            color.stroke_width(stroke),
        ))?;
        if !s.label.is_empty() {
            drawn.label(&s.label).legend(move |(x, y)| {
                PathElement::new(
                    vec![(x, y), (x + 20, y)],
                    color.stroke_width(LINE_WIDTH_LEGEND),
                )
            });
            legend_series_count += 1;
        }
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", FONT_SIZE_LEGEND))
            .draw()?;
    }

    Ok(())
}

/// Creates a stacked plot image with `pane_count` rows of line charts.
///
/// `get_pane_plot_data` is called once per pane index; a `None` result or
/// an empty/degenerate pane renders a placeholder message instead.
pub fn draw_stacked_plot<'a, F>(
    output_filename: &'a str,
    root_name: &str,
    pane_count: usize,
    mut get_pane_plot_data: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnMut(usize) -> Option<TracePlotData>,
    <BitMapBackend<'a> as DrawingBackend>::ErrorType: 'static,
{
    let root_area =
        BitMapBackend::new(output_filename, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        root_name,
        (10, 10),
        ("sans-serif", FONT_SIZE_MAIN_TITLE)
            .into_font()
            .color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly((pane_count, 1));
    let mut any_pane_plotted = false;

    for (pane_index, area) in sub_plot_areas.iter().enumerate() {
        match get_pane_plot_data(pane_index) {
            Some((chart_title, x_range, y_range, series_data, x_label, y_label)) => {
                let has_data = series_data.iter().any(|s| !s.data.is_empty());
                let valid_ranges = x_range.end > x_range.start && y_range.end > y_range.start;
                if has_data && valid_ranges {
                    draw_single_trace_chart(
                        area,
                        &chart_title,
                        x_range,
                        y_range,
                        &series_data,
                        &x_label,
                        &y_label,
                    )?;
                    any_pane_plotted = true;
                } else {
                    let reason = if !has_data { "No data points" } else { "Invalid ranges" };
                    draw_unavailable_message(area, &chart_title, reason)?;
                }
            }
            None => {
                draw_unavailable_message(area, "Trace", "Calculation/Data Extraction Failed")?;
            }
        }
    }

    root_area.present()?;
    if any_pane_plotted {
        println!("  Stacked plot saved as '{output_filename}'.");
    } else {
        println!(
            "  '{output_filename}' contains only placeholder messages: no data was available."
        );
    }
    Ok(())
}
