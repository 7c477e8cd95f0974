use {
    crate::domain::Candle,
    anyhow::{Context, Result, bail},
    std::fs::File,
    std::io::{BufReader, Read},
    std::path::Path,
};

/// On-disk layouts the loader understands, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleFormat {
    /// `[{"t":..,"o":..,"h":..,"l":..,"c":..}, ...]`, long field names also accepted.
    Json,
    /// Header row `timestamp,open,high,low,close` (short names also accepted).
    Csv,
}

impl CandleFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

pub fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    let file = File::open(path).with_context(|| format!("Failed to open candle file: {:?}", path))?;
    let reader = BufReader::new(file);

    let candles = match CandleFormat::from_path(path) {
        CandleFormat::Json => parse_json(reader),
        CandleFormat::Csv => parse_csv(reader),
    }
    .with_context(|| format!("Failed to parse candles from {:?}", path))?;

    if candles.is_empty() {
        bail!("No candles found in {:?}", path);
    }

    log::info!("Loaded {} candles from {:?}", candles.len(), path);
    Ok(candles)
}

pub fn parse_json<R: Read>(reader: R) -> Result<Vec<Candle>> {
    let candles: Vec<Candle> = serde_json::from_reader(reader)?;
    Ok(candles)
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Candle>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut candles = Vec::new();
    for (row, result) in csv_reader.deserialize().enumerate() {
        let candle: Candle = result.with_context(|| format!("Failed to parse CSV row {}", row + 1))?;
        candles.push(candle);
    }
    Ok(candles)
}
