use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;

use crate::dataset::{Dataset, EraBounds, LoadError, RawTeamSeason, normalize};
use crate::fetch::fetch_text_cached;
use crate::sample_data::sample_rows;
use crate::state::LoadEvent;

/// Where the season table comes from, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
    Sample,
}

impl DataSource {
    /// TEAMS_CSV wins over TEAMS_CSV_URL; neither set means the built-in
    /// sample dataset.
    pub fn from_env() -> DataSource {
        if let Some(path) = non_empty_env("TEAMS_CSV") {
            return DataSource::Path(PathBuf::from(path));
        }
        if let Some(url) = non_empty_env("TEAMS_CSV_URL") {
            return DataSource::Url(url);
        }
        DataSource::Sample
    }

    pub fn label(&self) -> String {
        match self {
            DataSource::Path(path) => format!("file {}", path.display()),
            DataSource::Url(url) => format!("url {}", url),
            DataSource::Sample => "built-in sample".to_string(),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load off the UI thread; the event loop stays responsive and renders the
/// loading panel until Loaded or Failed arrives on the channel.
pub fn spawn_loader(source: DataSource, tx: Sender<LoadEvent>) {
    thread::spawn(move || {
        let _ = tx.send(LoadEvent::Log(format!(
            "[INFO] Loading season data from {}",
            source.label()
        )));
        let event = match load_dataset(&source) {
            Ok(dataset) => LoadEvent::Loaded(dataset),
            Err(err) => LoadEvent::Failed(err),
        };
        let _ = tx.send(event);
    });
}

pub fn load_dataset(source: &DataSource) -> Result<Dataset, LoadError> {
    let rows = match source {
        DataSource::Path(path) => {
            let text = fs::read_to_string(path)
                .map_err(|err| LoadError::Source(format!("{}: {}", path.display(), err)))?;
            parse_teams_csv(&text)?
        }
        DataSource::Url(url) => {
            let text = fetch_text_cached(url).map_err(|err| LoadError::Source(err.to_string()))?;
            parse_teams_csv(&text)?
        }
        DataSource::Sample => sample_rows(),
    };
    normalize(&rows, &EraBounds::from_env())
}

/// Parse the Lahman Teams table. Individual bad rows are skipped and
/// counted; the parse only fails when nothing usable came out of it.
pub fn parse_teams_csv(text: &str) -> Result<Vec<RawTeamSeason>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for result in reader.deserialize::<RawTeamSeason>() {
        match result {
            Ok(row) => rows.push(row),
            Err(_) => skipped += 1,
        }
    }

    if rows.is_empty() {
        return Err(LoadError::Source(format!(
            "no parseable rows in CSV ({} skipped)",
            skipped
        )));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_labels_name_their_origin() {
        assert!(DataSource::Path(PathBuf::from("/tmp/Teams.csv"))
            .label()
            .contains("Teams.csv"));
        assert!(DataSource::Url("https://x/Teams.csv".into())
            .label()
            .starts_with("url "));
        assert_eq!(DataSource::Sample.label(), "built-in sample");
    }

    #[test]
    fn garbage_csv_is_a_source_error() {
        let err = parse_teams_csv("not,a\nteams;;table").unwrap_err();
        assert!(matches!(err, LoadError::Source(_)));
    }

    #[test]
    fn blank_numeric_fields_become_none() {
        let csv = "yearID,lgID,name,G,R,H,SO,RA\n2001,AL,Boston Red Sox,161,772,,1131,745\n";
        let rows = parse_teams_csv(csv).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].hits, None);
        assert_eq!(rows[0].runs, Some(772.0));
    }
}
