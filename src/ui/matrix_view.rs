//! Matrix view: header, axis titles, heatmap and legend.

use super::formatters::{format_stat_value, format_total, truncate_to_width};
use crate::app::App;
use crate::render::{axis_titles, blit_layers, legend_samples};
use crate::ui::ThemeColors;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw the matrix view.
pub fn draw_matrix(f: &mut Frame<'_>, area: Rect, app: &mut App, colors: &ThemeColors) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.bg2))
        .title(format!(
            " {} x {} | {} ",
            app.input.variable.name_x,
            app.input.variable.name_y,
            app.mode().name()
        ))
        .title_style(Style::default().fg(colors.yellow))
        .style(Style::default().bg(colors.bg0));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let view = &app.config.view;
    let legend_height = app.config.legend.height;
    let label_width = view.axis_label_width;
    if inner.width <= label_width + 2 || inner.height < 4 + legend_height {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(view.axis_label_height),
            Constraint::Length(legend_height),
        ])
        .split(inner);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(label_width), Constraint::Min(1)])
        .split(rows[1]);

    draw_header(f, rows[0], app, colors);

    let (horizontal, vertical) = axis_titles(&app.input.variable, app.axis_inverted);
    let vertical_title = Paragraph::new(truncate_to_width(vertical, usize::from(label_width)))
        .style(Style::default().fg(colors.green));
    f.render_widget(vertical_title, columns[0]);
    let horizontal_title = Paragraph::new(truncate_to_width(horizontal, usize::from(rows[2].width)))
        .style(Style::default().fg(colors.green))
        .alignment(Alignment::Center);
    f.render_widget(horizontal_title, rows[2]);

    let matrix_area = columns[1];
    app.set_matrix_area(matrix_area);
    app.frame(colors.selection);
    let scroll = app.viewport.scroll_pixels();
    let (base, overlay) = app.surfaces();
    blit_layers(base, overlay, f.buffer_mut(), matrix_area, scroll);

    draw_legend(f, rows[3], app, colors);
}

fn draw_header(f: &mut Frame<'_>, area: Rect, app: &App, colors: &ThemeColors) {
    let target = match app.target {
        Some(t) => app.slice_label(t),
        None => "all".to_string(),
    };
    let spans = vec![
        Span::styled("Total: ", Style::default().fg(colors.green)),
        Span::styled(format_total(app.matrix.grand_total), Style::default().fg(colors.aqua)),
        Span::styled("  Layout: ", Style::default().fg(colors.green)),
        Span::styled(app.layout.name(), Style::default().fg(colors.aqua)),
        Span::styled("  Contrast: ", Style::default().fg(colors.green)),
        Span::styled(format!("{}", app.contrast), Style::default().fg(colors.aqua)),
        Span::styled("  Zoom: ", Style::default().fg(colors.green)),
        Span::styled(format!("{:.1}x", app.viewport.zoom()), Style::default().fg(colors.aqua)),
        Span::styled("  Target: ", Style::default().fg(colors.green)),
        Span::styled(target, Style::default().fg(colors.orange)),
    ];
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_legend(f: &mut Frame<'_>, area: Rect, app: &App, colors: &ThemeColors) {
    let (min, max) = app.values.range(&app.input.min_max_values);
    let min_label = format_stat_value(min);
    let max_label = format_stat_value(max);
    let reserved = min_label.len() + max_label.len() + 2;
    let width = app
        .config
        .legend
        .width
        .min(usize::from(area.width).saturating_sub(reserved));

    let mut spans = vec![Span::styled(
        format!("{} ", min_label),
        Style::default().fg(colors.green),
    )];
    spans.extend(
        legend_samples(app.mode(), width)
            .into_iter()
            .map(|color| Span::styled("█", Style::default().fg(color.to_color()))),
    );
    spans.push(Span::styled(
        format!(" {}", max_label),
        Style::default().fg(colors.green),
    ));
    f.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}
