// CSV ingestion: legacy-encoding recovery, delimiter sniffing, header skip.

use std::io::Read;
use std::path::Path;

/// Read all data rows (header excluded) as strings.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);

    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Read a file as UTF-8, falling back to Windows-1252 for
/// Excel-exported CSVs with legacy encodings.
pub fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut bytes = Vec::new();
    std::fs::File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|e| format!("{}: {e}", path.display()))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Pick the delimiter whose field count is consistent across the first
/// lines. Comma wins ties and empty input.
fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content.lines().take(8).collect();
    if sample.is_empty() {
        return b',';
    }

    let mut best = (b',', 0u64);
    for &delim in &[b',', b';', b'\t', b'|'] {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| field_count(line, delim))
            .collect();

        let first = counts[0];
        if first <= 1 {
            continue;
        }
        let consistent = counts.iter().filter(|&&c| c == first).count() as u64;
        let score = consistent * first as u64;
        if score > best.1 {
            best = (delim, score);
        }
    }
    best.0
}

fn field_count(line: &str, delimiter: u8) -> usize {
    ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(Result::ok)
        .map(|r| r.len())
        .unwrap_or(1)
}
