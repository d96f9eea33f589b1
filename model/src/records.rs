use std::io::{BufRead, BufReader};

use anyhow::Result;
use geom::Pt2D;

use crate::{Frame, PedestrianName, Record};

/// Parse headerless rows of `frame id x y`, whitespace-separated. The real
/// datasets mix tabs and runs of spaces, so this splits on any whitespace
/// rather than a fixed delimiter. Any malformed row fails the whole load.
pub fn load<R: std::io::Read>(reader: R) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            bail!(
                "line {}: expected 4 fields, got {} in {:?}",
                idx + 1,
                fields.len(),
                line
            );
        }
        let frame = Frame(parse_int(fields[0], "frame number", idx + 1)?);
        let name = PedestrianName(parse_int(fields[1], "pedestrian id", idx + 1)?);
        let x = parse_float(fields[2], "x", idx + 1)?;
        let y = parse_float(fields[3], "y", idx + 1)?;
        records.push(Record {
            frame,
            name,
            pos: Pt2D::new(x, y),
        });
    }
    Ok(records)
}

fn parse_int(field: &str, what: &str, line: usize) -> Result<i64> {
    match field.parse() {
        Ok(x) => Ok(x),
        Err(_) => bail!("line {}: {} isn't an integer: {:?}", line, what, field),
    }
}

fn parse_float(field: &str, what: &str, line: usize) -> Result<f64> {
    let x: f64 = match field.parse() {
        Ok(x) => x,
        Err(_) => bail!("line {}: {} isn't a number: {:?}", line, what, field),
    };
    if !x.is_finite() {
        bail!("line {}: {} isn't finite: {:?}", line, what, field);
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_whitespace() {
        let input = "0\t17 1.0   2.5\n\n8 17\t-3.25 0.0\n";
        let records = load(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].frame, Frame(0));
        assert_eq!(records[0].name, PedestrianName(17));
        assert_eq!(records[1].pos.x(), -3.25);
    }

    #[test]
    fn errors_carry_line_numbers() {
        let err = load("0 1 2.0 3.0\nnot a row\n".as_bytes())
            .unwrap_err()
            .to_string();
        assert!(err.contains("line 2"), "{}", err);
    }
}
