//! Reader for the whitespace-separated placement text format.
//!
//! ```text
//! <W> <H>
//! <num_cells>
//! <id> <x> <y> <w> <h> [fixed]            × num_cells
//! <num_nets>
//! <net_id> <num_pins> [<cell_id> <off_x> <off_y>]…   × num_nets
//! ```
//!
//! The parser is tolerant: a malformed record is skipped (and reported as
//! a note) rather than failing the whole file, and a truncated file simply
//! yields fewer records. Only an unreadable file is an error.

use mosaic_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use mosaic_place::{Cell, CellId, Net, NetId, Pin, Placement};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while reading a placement file.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The input file could not be read.
    #[error("cannot read input file {path}: {source}")]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Reads a placement from a text-format file.
///
/// Malformed records are skipped and reported through the sink; an empty
/// or entirely malformed file yields an empty placement, which the caller
/// decides how to treat.
pub fn read_placement(path: &Path, sink: &DiagnosticSink) -> Result<Placement, ReadError> {
    let content = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_placement(&content, sink))
}

/// Parses placement text. See the module docs for the format.
pub fn parse_placement(content: &str, sink: &DiagnosticSink) -> Placement {
    let mut lines = content.lines();

    let (width, height) = lines.next().and_then(parse_grid_line).unwrap_or((0, 0));
    let mut pl = Placement::new(width, height);

    let num_cells = lines.next().and_then(parse_count).unwrap_or(0);
    for _ in 0..num_cells {
        let Some(line) = lines.next() else { break };
        match parse_cell_line(line) {
            Some(cell) => pl.add_cell(cell),
            None => skip_record(sink, "cell", line),
        }
    }

    let num_nets = lines.next().and_then(parse_count).unwrap_or(0);
    for _ in 0..num_nets {
        let Some(line) = lines.next() else { break };
        match parse_net_line(line) {
            Some(net) => pl.add_net(net),
            None => skip_record(sink, "net", line),
        }
    }

    pl.refresh_grid();
    pl
}

fn skip_record(sink: &DiagnosticSink, kind: &str, line: &str) {
    sink.emit(Diagnostic::note(
        DiagnosticCode::new(Category::Io, 201),
        format!("skipped malformed {kind} record: '{}'", line.trim()),
    ));
}

fn parse_grid_line(line: &str) -> Option<(i32, i32)> {
    let mut tokens = line.split_whitespace();
    let w: i32 = tokens.next()?.parse().ok()?;
    let h: i32 = tokens.next()?.parse().ok()?;
    Some((w, h))
}

fn parse_count(line: &str) -> Option<usize> {
    line.split_whitespace().next()?.parse().ok()
}

/// Parses `id x y w h [fixed]`. Records with non-positive dimensions are
/// treated as malformed.
fn parse_cell_line(line: &str) -> Option<Cell> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 5 {
        return None;
    }
    let id: u32 = tokens[0].parse().ok()?;
    let x: i32 = tokens[1].parse().ok()?;
    let y: i32 = tokens[2].parse().ok()?;
    let w: i32 = tokens[3].parse().ok()?;
    let h: i32 = tokens[4].parse().ok()?;
    if w < 1 || h < 1 {
        return None;
    }

    let fixed = matches!(tokens.get(5), Some(&"fixed") | Some(&"1") | Some(&"true"));

    let mut cell = Cell::new(CellId::from_raw(id), x, y, w, h);
    cell.fixed = fixed;
    Some(cell)
}

/// Parses `net_id num_pins [cell_id off_x off_y]…`. Pins are collected
/// until the declared count is reached or tokens run out; a short record
/// still yields a net with the pins that did parse.
fn parse_net_line(line: &str) -> Option<Net> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 {
        return None;
    }
    let id: u32 = tokens[0].parse().ok()?;
    let num_pins: usize = tokens[1].parse().ok()?;

    let mut pins = Vec::new();
    for i in 0..num_pins {
        let base = 2 + 3 * i;
        let Some(chunk) = tokens.get(base..base + 3) else {
            break;
        };
        let (Ok(cell_id), Ok(off_x), Ok(off_y)) = (
            chunk[0].parse::<u32>(),
            chunk[1].parse::<i32>(),
            chunk[2].parse::<i32>(),
        ) else {
            break;
        };
        pins.push(Pin::new(CellId::from_raw(cell_id), off_x, off_y));
    }

    Some(Net::new(NetId::from_raw(id), pins))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (Placement, DiagnosticSink) {
        let sink = DiagnosticSink::new();
        let pl = parse_placement(content, &sink);
        (pl, sink)
    }

    #[test]
    fn parses_complete_input() {
        let input = "\
10 10
2
0 0 0 2 2
1 8 8 2 2 fixed
1
0 2 0 0 0 1 1 1
";
        let (pl, sink) = parse(input);

        assert_eq!(pl.grid.width, 10);
        assert_eq!(pl.grid.height, 10);
        assert_eq!(pl.cell_count(), 2);
        assert!(!pl.cells[0].fixed);
        assert!(pl.cells[1].fixed);
        assert_eq!(pl.net_count(), 1);
        assert_eq!(pl.nets[0].pins.len(), 2);
        assert_eq!(pl.nets[0].pins[1].offset_x, 1);
        assert!(!sink.has_errors());
    }

    #[test]
    fn fixed_token_variants() {
        let input = "\
10 10
3
0 0 0 1 1 fixed
1 2 0 1 1 1
2 4 0 1 1 true
0
";
        let (pl, _) = parse(input);
        assert!(pl.cells.iter().all(|c| c.fixed));
    }

    #[test]
    fn unknown_fixed_token_means_movable() {
        let input = "10 10\n1\n0 0 0 1 1 yes\n0\n";
        let (pl, _) = parse(input);
        assert!(!pl.cells[0].fixed);
    }

    #[test]
    fn malformed_cell_record_is_skipped() {
        let input = "\
10 10
3
0 0 0 2 2
banana
2 4 4 2 2
0
";
        let (pl, sink) = parse(input);
        assert_eq!(pl.cell_count(), 2);
        assert_eq!(sink.diagnostics().len(), 1);
        assert!(!sink.has_errors());
    }

    #[test]
    fn zero_dimension_cell_is_malformed() {
        let input = "10 10\n1\n0 0 0 0 2\n0\n";
        let (pl, sink) = parse(input);
        assert_eq!(pl.cell_count(), 0);
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn short_net_record_keeps_parsed_pins() {
        let input = "10 10\n1\n0 0 0 2 2\n1\n0 3 0 0 0 0 1\n";
        let (pl, _) = parse(input);
        assert_eq!(pl.net_count(), 1);
        assert_eq!(pl.nets[0].pins.len(), 1);
    }

    #[test]
    fn truncated_file_yields_partial_placement() {
        let input = "10 10\n5\n0 0 0 2 2\n";
        let (pl, _) = parse(input);
        assert_eq!(pl.cell_count(), 1);
        assert_eq!(pl.net_count(), 0);
    }

    #[test]
    fn empty_input_yields_empty_placement() {
        let (pl, _) = parse("");
        assert_eq!(pl.grid.width, 0);
        assert_eq!(pl.grid.height, 0);
        assert_eq!(pl.cell_count(), 0);
    }

    #[test]
    fn grid_is_refreshed_after_parse() {
        let input = "10 10\n1\n0 3 4 2 2\n0\n";
        let (pl, _) = parse(input);
        assert_eq!(pl.grid.occupant(3, 4), Some(CellId::from_raw(0)));
        assert_eq!(pl.grid.occupant(5, 4), None);
    }

    #[test]
    fn read_placement_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "4 4\n1\n0 0 0 2 2\n0\n").unwrap();

        let sink = DiagnosticSink::new();
        let pl = read_placement(&path, &sink).unwrap();
        assert_eq!(pl.cell_count(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let sink = DiagnosticSink::new();
        let err = read_placement(Path::new("/nonexistent/input.txt"), &sink).unwrap_err();
        assert!(err.to_string().contains("cannot read input file"));
    }
}
