//! Output writers for simulation results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::metrics::{CsvSummaryRow, GameMetrics};
use crate::types::OutputFormat;

/// Per-game detail (JSONL or one JSON array) plus a CSV summary row per game.
pub struct OutputWriter {
    detail: Box<dyn Write + Send>,
    format: OutputFormat,
    games_written: usize,
    csv_writer: csv::Writer<BufWriter<File>>,
    detail_path: PathBuf,
    csv_path: PathBuf,
}

impl OutputWriter {
    pub fn new(
        output_dir: &str,
        format: &OutputFormat,
        compress: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = Path::new(output_dir);
        std::fs::create_dir_all(dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| "unknown".to_string())
            .replace(':', "-");

        let ext = match format {
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Json => "json",
        };
        let mut detail_path = dir.join(format!("simulation_{timestamp}.{ext}"));
        let detail: Box<dyn Write + Send> = if compress {
            detail_path.set_extension(format!("{ext}.gz"));
            Box::new(BufWriter::new(GzEncoder::new(
                File::create(&detail_path)?,
                Compression::default(),
            )))
        } else {
            Box::new(BufWriter::new(File::create(&detail_path)?))
        };

        // Header row comes from the first serialized record.
        let csv_path = dir.join(format!("simulation_{timestamp}_summary.csv"));
        let csv_writer = csv::Writer::from_writer(BufWriter::new(File::create(&csv_path)?));

        let mut writer = Self {
            detail,
            format: format.clone(),
            games_written: 0,
            csv_writer,
            detail_path,
            csv_path,
        };
        if matches!(writer.format, OutputFormat::Json) {
            writer.detail.write_all(b"[\n")?;
        }
        Ok(writer)
    }

    pub fn write_game(&mut self, metrics: &GameMetrics) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(metrics)?;
        match self.format {
            OutputFormat::Jsonl => writeln!(self.detail, "{json}")?,
            OutputFormat::Json => {
                if self.games_written > 0 {
                    self.detail.write_all(b",\n")?;
                }
                self.detail.write_all(json.as_bytes())?;
            }
        }
        self.games_written += 1;

        let row: CsvSummaryRow = metrics.into();
        self.csv_writer.serialize(&row)?;
        self.csv_writer.flush()?;
        Ok(())
    }

    /// Close the JSON array if any and flush both files.
    pub fn finish(mut self) -> Result<(), Box<dyn std::error::Error>> {
        if matches!(self.format, OutputFormat::Json) {
            self.detail.write_all(b"\n]\n")?;
        }
        self.detail.flush()?;
        self.csv_writer.flush()?;
        Ok(())
    }

    pub fn output_paths(&self) -> (&PathBuf, &PathBuf) {
        (&self.detail_path, &self.csv_path)
    }
}
