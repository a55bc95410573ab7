use ratatui::layout::Rect;

use crate::aggregate::Series;
use crate::scale::ChartDomains;

/// What the tooltip shows for one hovered point, plus where to anchor it.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipPayload {
    pub year: i32,
    pub series_label: String,
    pub value: f64,
    pub tooltip_label: &'static str,
    pub cell: (u16, u16),
}

/// Hover state machine. Hidden and Shown are the only states; moving between
/// two points of the same series/year repositions without a hide flicker.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TooltipState {
    #[default]
    Hidden,
    Shown(TooltipPayload),
}

impl TooltipState {
    pub fn on_pointer(&mut self, hit: Option<TooltipPayload>) {
        let prev = std::mem::take(self);
        *self = match (prev, hit) {
            (_, None) => TooltipState::Hidden,
            (TooltipState::Shown(current), Some(next))
                if current.year == next.year && current.series_label == next.series_label =>
            {
                // Same point, possibly a new anchor cell.
                TooltipState::Shown(TooltipPayload {
                    cell: next.cell,
                    ..current
                })
            }
            (_, Some(next)) => TooltipState::Shown(next),
        };
    }

    pub fn payload(&self) -> Option<&TooltipPayload> {
        match self {
            TooltipState::Hidden => None,
            TooltipState::Shown(payload) => Some(payload),
        }
    }
}

/// Map a data point into a terminal cell inside the plot rect. Returns None
/// for points outside the domains or a degenerate plot area. The row axis is
/// inverted: larger values sit nearer the top of the rect.
pub fn data_to_cell(domains: &ChartDomains, plot: Rect, point: (f64, f64)) -> Option<(u16, u16)> {
    if plot.width < 2 || plot.height < 2 {
        return None;
    }
    let x_span = domains.x[1] - domains.x[0];
    let y_span = domains.y[1] - domains.y[0];
    if x_span <= 0.0 || y_span <= 0.0 || !domains.contains(point) {
        return None;
    }
    let fx = (point.0 - domains.x[0]) / x_span;
    let fy = (point.1 - domains.y[0]) / y_span;
    let col = plot.x + (fx * f64::from(plot.width - 1)).round() as u16;
    let row = plot.y + plot.height - 1 - (fy * f64::from(plot.height - 1)).round() as u16;
    Some((col, row))
}

pub const HIT_RADIUS: u16 = 1;

/// Find the plotted point nearest the pointer cell within HIT_RADIUS.
/// Series are scanned back to front so team lines win ties against the
/// league lines drawn beneath them.
pub fn hit_test(
    series: &[Series],
    domains: &ChartDomains,
    plot: Rect,
    pointer: (u16, u16),
) -> Option<TooltipPayload> {
    let mut best: Option<(u32, TooltipPayload)> = None;
    for s in series.iter().rev() {
        for &point in &s.points {
            let Some(cell) = data_to_cell(domains, plot, point) else {
                continue;
            };
            let dx = cell.0.abs_diff(pointer.0);
            let dy = cell.1.abs_diff(pointer.1);
            if dx > HIT_RADIUS || dy > HIT_RADIUS {
                continue;
            }
            let dist = u32::from(dx) * u32::from(dx) + u32::from(dy) * u32::from(dy);
            if best.as_ref().is_none_or(|(best_dist, _)| dist < *best_dist) {
                best = Some((
                    dist,
                    TooltipPayload {
                        year: point.0.round() as i32,
                        series_label: s.label.clone(),
                        value: point.1,
                        tooltip_label: s.metric.info().tooltip_label,
                        cell,
                    },
                ));
            }
        }
    }
    best.map(|(_, payload)| payload)
}

/// Place the popup beside its anchor cell, flipping and clamping so the
/// whole rect stays inside `bounds`. The anchor can be stale after a
/// terminal resize with no mouse event in between; an anchor outside
/// `bounds` yields None instead of a partly off-screen rect.
pub fn popup_rect(cell: (u16, u16), width: u16, height: u16, bounds: Rect) -> Option<Rect> {
    let (col, row) = cell;
    if width == 0 || height == 0 || width > bounds.width || height > bounds.height {
        return None;
    }
    if col < bounds.x
        || col >= bounds.x + bounds.width
        || row < bounds.y
        || row >= bounds.y + bounds.height
    {
        return None;
    }
    let x = if col + 2 + width <= bounds.x + bounds.width {
        col + 2
    } else {
        col.saturating_sub(width + 1).max(bounds.x)
    };
    let y = if row + 1 + height <= bounds.y + bounds.height {
        row + 1
    } else {
        row.saturating_sub(height).max(bounds.y)
    };
    let x = x.min(bounds.x + bounds.width - width);
    let y = y.min(bounds.y + bounds.height - height);
    Some(Rect::new(x, y, width, height))
}

/// Text lines for the tooltip popup.
pub fn tooltip_lines(payload: &TooltipPayload) -> [String; 3] {
    [
        payload.series_label.clone(),
        format!("Year: {}", payload.year),
        format!("{}: {:.2}", payload.tooltip_label, payload.value),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot() -> Rect {
        Rect::new(2, 1, 41, 21)
    }

    fn domains() -> ChartDomains {
        ChartDomains {
            x: [2000.0, 2010.0],
            y: [0.0, 10.0],
        }
    }

    #[test]
    fn corners_map_to_plot_corners() {
        let d = domains();
        let p = plot();
        assert_eq!(data_to_cell(&d, p, (2000.0, 0.0)), Some((p.x, p.y + p.height - 1)));
        assert_eq!(data_to_cell(&d, p, (2010.0, 10.0)), Some((p.x + p.width - 1, p.y)));
    }

    #[test]
    fn out_of_domain_points_do_not_map() {
        assert_eq!(data_to_cell(&domains(), plot(), (1999.0, 5.0)), None);
        assert_eq!(data_to_cell(&domains(), plot(), (2005.0, 11.0)), None);
    }

    #[test]
    fn pointer_off_every_point_hides() {
        let mut state = TooltipState::Shown(TooltipPayload {
            year: 2005,
            series_label: "AL avg runs/game".into(),
            value: 4.5,
            tooltip_label: "Runs/Game",
            cell: (10, 10),
        });
        state.on_pointer(None);
        assert_eq!(state, TooltipState::Hidden);
    }

    #[test]
    fn popup_drops_stale_anchor_after_shrink() {
        // Anchor captured on a 200-col frame, rendered on an 80-col one.
        let bounds = Rect::new(0, 0, 80, 24);
        assert_eq!(popup_rect((190, 10), 24, 5, bounds), None);
        assert_eq!(popup_rect((40, 30), 24, 5, bounds), None);
    }

    #[test]
    fn popup_never_leaves_the_frame() {
        let bounds = Rect::new(0, 0, 80, 24);
        for col in [0u16, 40, 79] {
            for row in [0u16, 12, 23] {
                let popup = popup_rect((col, row), 24, 5, bounds).unwrap();
                assert!(popup.x + popup.width <= bounds.width);
                assert!(popup.y + popup.height <= bounds.height);
            }
        }
        // Popup larger than the frame cannot be placed at all.
        assert_eq!(popup_rect((5, 5), 100, 5, bounds), None);
    }

    #[test]
    fn same_point_repositions_without_hiding() {
        let payload = TooltipPayload {
            year: 2005,
            series_label: "AL avg runs/game".into(),
            value: 4.5,
            tooltip_label: "Runs/Game",
            cell: (10, 10),
        };
        let mut state = TooltipState::Shown(payload.clone());
        state.on_pointer(Some(TooltipPayload {
            cell: (11, 10),
            ..payload.clone()
        }));
        let shown = state.payload().expect("still shown");
        assert_eq!(shown.cell, (11, 10));
        assert_eq!(shown.value, payload.value);
    }
}
