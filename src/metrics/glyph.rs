use super::CellSize;

/// A rasterized line of text: a grid of cells that are either lit or dark.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphRun {
    cells: Vec<Vec<bool>>,
    columns: usize,
}

impl GlyphRun {
    /// Build a run out of ASCII art, where any non whitespace character is a lit cell.
    pub fn from_art(art: &str) -> Self {
        let cells: Vec<Vec<bool>> =
            art.lines().map(|line| line.chars().map(|c| !c.is_whitespace()).collect()).collect();
        let columns = cells.iter().map(Vec::len).max().unwrap_or(0);
        let cells = cells
            .into_iter()
            .map(|mut row| {
                row.resize(columns, false);
                row
            })
            .collect();
        Self { cells, columns }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0
    }

    pub fn is_lit(&self, row: usize, column: usize) -> bool {
        self.cells.get(row).and_then(|cells| cells.get(column)).copied().unwrap_or(false)
    }

    /// The width of this run in pixels.
    pub fn width_px(&self, cell: CellSize) -> f32 {
        self.columns as f32 * cell.width_px
    }

    /// Scale this run using nearest neighbor sampling.
    pub fn scaled(&self, scale: f32) -> GlyphRun {
        if !scale.is_finite() || scale <= 0.0 || self.is_empty() {
            return GlyphRun::default();
        }
        let target_rows = ((self.rows() as f32 * scale).round() as usize).max(1);
        let target_columns = ((self.columns as f32 * scale).round() as usize).max(1);
        let source = |index: usize, len: usize| (((index as f32 + 0.5) / scale) as usize).min(len - 1);

        let cells = (0..target_rows)
            .map(|row| {
                let source_row = &self.cells[source(row, self.rows())];
                (0..target_columns).map(|column| source_row[source(column, self.columns)]).collect()
            })
            .collect();
        Self { cells, columns: target_columns }
    }
}
