use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Format, Workbook};

use crate::chart::ChartModel;
use crate::filter::FilterState;

/// What a completed export produced, for the status log.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub series: usize,
    pub points: usize,
}

pub fn default_export_path() -> PathBuf {
    PathBuf::from(format!(
        "pennant_series_{}.xlsx",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

/// Write the current view to a workbook: one sheet of plotted points, one
/// sheet describing the filter that produced them.
pub fn export_chart(chart: &ChartModel, filter: &FilterState, path: &Path) -> Result<ExportReport> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet().set_name("Series")?;
    sheet.write_with_format(0, 0, "Series", &bold)?;
    sheet.write_with_format(0, 1, "Year", &bold)?;
    sheet.write_with_format(0, 2, "Value", &bold)?;

    let mut row: u32 = 1;
    let mut points = 0usize;
    for series in &chart.series {
        for &(year, value) in &series.points {
            sheet.write(row, 0, series.label.as_str())?;
            sheet.write(row, 1, year)?;
            sheet.write(row, 2, value)?;
            row += 1;
            points += 1;
        }
    }

    let view = workbook.add_worksheet().set_name("View")?;
    let (year_lo, year_hi) = filter.year_range();
    let entries: [(&str, String); 5] = [
        ("Title", chart.title.clone()),
        ("League", filter.league().label().to_string()),
        ("Team", filter.team().label().to_string()),
        ("Metric", filter.mode().label().to_string()),
        ("Years", format!("{}-{}", year_lo, year_hi)),
    ];
    for (i, (key, value)) in entries.iter().enumerate() {
        let r = i as u32;
        view.write_with_format(r, 0, *key, &bold)?;
        view.write(r, 1, value.as_str())?;
    }

    workbook
        .save(path)
        .with_context(|| format!("saving workbook to {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        series: chart.series.len(),
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartModel;
    use crate::dataset::{EraBounds, RawTeamSeason, normalize};
    use crate::filter::FilterState;

    #[test]
    fn export_writes_workbook_and_counts_points() {
        let rows: Vec<RawTeamSeason> = (2000..2005)
            .map(|year| RawTeamSeason {
                year: Some(year),
                league: Some("AL".into()),
                team: Some("Boston Red Sox".into()),
                games: Some(162.0),
                runs: Some(800.0),
                hits: Some(1400.0),
                strikeouts: Some(1100.0),
                runs_allowed: Some(750.0),
            })
            .collect();
        let dataset = normalize(
            &rows,
            &EraBounds {
                min_year: 1960,
                max_year: 2015,
            },
        )
        .unwrap();
        let filter = FilterState::new(&dataset);
        let chart = ChartModel::build(&dataset, &filter);

        let path = std::env::temp_dir().join("pennant_export_test.xlsx");
        let report = export_chart(&chart, &filter, &path).unwrap();
        assert_eq!(report.points, 5);
        assert_eq!(report.series, 1);
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
