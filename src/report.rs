//! Tab-separated sweep reports.
//!
//! A sweep table has one column per walk length and one row per sweep point
//! (attack-edge count for escape runs, trial number for utility runs). The
//! report file carries every trial's table followed by a per-cell average
//! table, all in the same format.

use std::io::{self, Write};

/// One row of a sweep table.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepRow {
    pub label: String,
    pub cells: Vec<f64>,
}

/// A walk-length-by-sweep-point result table.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepTable {
    columns: Vec<u32>,
    rows: Vec<SweepRow>,
}

impl SweepTable {
    /// Create an empty table with the given walk-length columns.
    pub fn new(columns: Vec<u32>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row. The cell count must match the column count.
    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<f64>) {
        debug_assert_eq!(cells.len(), self.columns.len());
        self.rows.push(SweepRow {
            label: label.into(),
            cells,
        });
    }

    pub fn columns(&self) -> &[u32] {
        &self.columns
    }

    pub fn rows(&self) -> &[SweepRow] {
        &self.rows
    }

    /// Write the table: a header line of column values, then one line per
    /// row, all tab-separated with a leading label field.
    pub fn write_tsv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for column in &self.columns {
            write!(out, "\t{column}")?;
        }
        writeln!(out)?;

        for row in &self.rows {
            write!(out, "{}", row.label)?;
            for cell in &row.cells {
                write!(out, "\t{cell}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    /// Per-cell average of same-shaped tables. `None` when the input is
    /// empty or the shapes disagree.
    pub fn averaged(tables: &[SweepTable]) -> Option<SweepTable> {
        let first = tables.first()?;
        let same_shape = tables.iter().all(|t| {
            t.columns == first.columns
                && t.rows.len() == first.rows.len()
                && t.rows
                    .iter()
                    .zip(&first.rows)
                    .all(|(a, b)| a.label == b.label && a.cells.len() == b.cells.len())
        });
        if !same_shape {
            return None;
        }

        let count = tables.len() as f64;
        let mut averaged = SweepTable::new(first.columns.clone());
        for (index, row) in first.rows.iter().enumerate() {
            let cells = (0..row.cells.len())
                .map(|cell| {
                    tables.iter().map(|t| t.rows[index].cells[cell]).sum::<f64>() / count
                })
                .collect();
            averaged.push_row(row.label.clone(), cells);
        }
        Some(averaged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tsv_layout() {
        let mut table = SweepTable::new(vec![10, 20]);
        table.push_row("5", vec![3.0, 7.0]);
        table.push_row("15", vec![1.5, 0.0]);

        let mut out = Vec::new();
        table.write_tsv(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\t10\t20\n5\t3\t7\n15\t1.5\t0\n"
        );
    }

    #[test]
    fn test_averaged_tables() {
        let mut a = SweepTable::new(vec![10]);
        a.push_row("1", vec![2.0]);
        let mut b = SweepTable::new(vec![10]);
        b.push_row("1", vec![4.0]);

        let averaged = SweepTable::averaged(&[a, b]).unwrap();
        assert_eq!(averaged.rows()[0].cells, vec![3.0]);
        assert_eq!(averaged.rows()[0].label, "1");
    }

    #[test]
    fn test_averaged_rejects_shape_mismatch() {
        let mut a = SweepTable::new(vec![10]);
        a.push_row("1", vec![2.0]);
        let b = SweepTable::new(vec![10, 20]);

        assert!(SweepTable::averaged(&[a, b]).is_none());
        assert!(SweepTable::averaged(&[]).is_none());
    }
}
