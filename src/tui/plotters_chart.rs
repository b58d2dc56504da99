//! Plotters-powered sales chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::{Series, format_x};

/// Series palette, index-aligned with the terminal legend colors in
/// `tui::LEGEND_COLORS`. High-contrast picks that survive terminal cells.
pub const SERIES_COLORS: [RGBColor; 8] = [
    RGBColor(0, 255, 255),   // cyan
    RGBColor(255, 255, 0),   // yellow
    RGBColor(0, 255, 0),     // green
    RGBColor(255, 0, 255),   // magenta
    RGBColor(110, 110, 255), // blue
    RGBColor(255, 0, 0),     // red
    RGBColor(160, 255, 255), // light cyan
    RGBColor(255, 160, 255), // light magenta
];

/// A lightweight, render-only chart description.
///
/// The widget is intentionally data-driven: all series and bounds are
/// computed outside the render call (see `chart::time_series_spec`), which
/// keeps `render()` focused on drawing and the binding logic testable
/// without a terminal.
pub struct SalesChart<'a> {
    /// One line per product, palette color by `color_index`.
    pub series: &'a [Series],
    /// X bounds (days from CE, fractional hours for hourly data).
    pub x_bounds: [f64; 2],
    /// Y bounds (units sold).
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
}

impl<'a> Widget for SalesChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite())
            || x1 <= x0
            || y1 <= y0
        {
            return;
        }

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res; date labels need a bit of room.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels. The mesh lines are disabled to reduce
            // visual clutter in low-resolution terminal rendering.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(4)
                .y_labels(5)
                .x_label_formatter(&|v| format_x(*v))
                .y_label_formatter(&|v| format!("{v:.1}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for s in self.series {
                let color = SERIES_COLORS[s.color_index % SERIES_COLORS.len()];
                chart.draw_series(LineSeries::new(s.points.iter().copied(), &color))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
