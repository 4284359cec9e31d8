use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::core::persistence::storage_path::{series_dir_path, series_file_path_in};
use crate::domain::common::model::HourlySeries;
use crate::errors::UsageError;

use super::series_fs_adapter_trait::SeriesFsAdapterTrait;

const HEADER: &str = "DATETIME|VALUE";

/// Stores each series as a pipe-delimited text file: `DATETIME|VALUE` header,
/// then one `RFC3339|value` row per hour.
#[derive(Debug, Clone)]
pub struct SeriesFsAdapter {
    base_dir: PathBuf,
}

impl SeriesFsAdapter {
    pub fn new() -> Self {
        Self {
            base_dir: series_dir_path(),
        }
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn format_row(time: &DateTime<Utc>, value: f64) -> String {
        format!(
            "{}|{}\n",
            time.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            value
        )
    }

    fn parse_line(line: &str) -> Option<(DateTime<Utc>, f64)> {
        let (time, value) = line.split_once('|')?;
        let time = DateTime::parse_from_rfc3339(time.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .ok()?;
        let value = value.trim().parse::<f64>().ok()?;
        Some((time, value))
    }
}

impl Default for SeriesFsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SeriesFsAdapterTrait for SeriesFsAdapter {
    fn write(&self, name: &str, series: &HourlySeries) -> Result<()> {
        let path = series_file_path_in(&self.base_dir, name)?;
        let parent = path.parent().unwrap_or(self.base_dir.as_path());
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create series dir {:?}", parent))?;

        // stage in a uniquely named sibling, then rename into place
        let staged = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create staging file in {:?}", parent))?;
        {
            let mut writer = BufWriter::new(staged.as_file());
            writer.write_all(HEADER.as_bytes())?;
            writer.write_all(b"\n")?;
            for (time, value) in series {
                writer.write_all(Self::format_row(time, *value).as_bytes())?;
            }
            writer.flush()?;
        }
        staged
            .persist(&path)
            .with_context(|| format!("Failed to move series into {:?}", path))?;

        tracing::debug!("Wrote {} points to {:?}", series.len(), path);
        Ok(())
    }

    fn read(&self, name: &str) -> Result<HourlySeries> {
        let path = series_file_path_in(&self.base_dir, name)?;
        if !path.is_file() {
            return Err(UsageError::SeriesNotFound(name.to_string()).into());
        }

        let file = File::open(&path).with_context(|| format!("Failed to open {:?}", path))?;
        let reader = BufReader::new(file);

        let mut points = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with(HEADER) {
                continue;
            }
            match Self::parse_line(&line) {
                Some(point) => points.push(point),
                None => tracing::warn!("Skipping malformed line {} in {:?}", idx + 1, path),
            }
        }

        Ok(HourlySeries::from_points(points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hour(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, h, 0, 0).unwrap()
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = SeriesFsAdapter::with_base_dir(dir.path());
        let series = HourlySeries::from_points(vec![(hour(0), -3.0), (hour(1), 2.5)]);

        adapter.write("acct/distance.series", &series).unwrap();

        let text = fs::read_to_string(dir.path().join("acct/distance.series")).unwrap();
        assert_eq!(
            text,
            "DATETIME|VALUE\n2024-02-01T00:00:00Z|-3\n2024-02-01T01:00:00Z|2.5\n"
        );
        assert_eq!(adapter.read("acct/distance.series").unwrap(), series);
    }

    #[test]
    fn overwrite_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = SeriesFsAdapter::with_base_dir(dir.path());

        adapter.write("q", &HourlySeries::from_points(vec![(hour(0), 1.0), (hour(1), 1.0)])).unwrap();
        adapter.write("q", &HourlySeries::from_points(vec![(hour(5), 9.0)])).unwrap();

        let back = adapter.read("q").unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.get(&hour(5)), Some(9.0));
    }

    #[test]
    fn writes_never_clobber_neighbouring_names() {
        let dir = tempfile::tempdir().unwrap();
        let adapter = SeriesFsAdapter::with_base_dir(dir.path());

        adapter.write("acct.tmp", &HourlySeries::from_points(vec![(hour(0), 7.0)])).unwrap();
        adapter.write("acct", &HourlySeries::from_points(vec![(hour(1), 1.0)])).unwrap();
        adapter.write("x.a", &HourlySeries::from_points(vec![(hour(2), 2.0)])).unwrap();
        adapter.write("x.b", &HourlySeries::from_points(vec![(hour(3), 3.0)])).unwrap();

        assert_eq!(adapter.read("acct.tmp").unwrap().get(&hour(0)), Some(7.0));
        assert_eq!(adapter.read("acct").unwrap().get(&hour(1)), Some(1.0));
        assert_eq!(adapter.read("x.a").unwrap().get(&hour(2)), Some(2.0));
        assert_eq!(adapter.read("x.b").unwrap().get(&hour(3)), Some(3.0));

        // no staging files left behind
        let mut names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["acct", "acct.tmp", "x.a", "x.b"]);
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("t"),
            "DATETIME|VALUE\n2024-02-01T00:00:00Z|5\ngarbage\n2024-02-01T01:00:00Z|x\n2024-02-01T02:00:00Z|5\n",
        )
        .unwrap();

        let back = SeriesFsAdapter::with_base_dir(dir.path()).read("t").unwrap();
        assert_eq!(back.len(), 2);
    }

    #[test]
    fn missing_series_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = SeriesFsAdapter::with_base_dir(dir.path()).read("nope").unwrap_err();
        assert_eq!(
            err.downcast_ref::<UsageError>(),
            Some(&UsageError::SeriesNotFound("nope".into()))
        );
    }
}
