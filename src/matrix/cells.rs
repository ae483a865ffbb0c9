//! Cell models and their statistics.
//!
//! The cell list is built once per matrix input and never changes shape.
//! Only the canvas geometry and the displayed value are rewritten in place
//! on each redraw, so references into the list must not outlive a redraw.

use super::context::ContextIndex;
use super::mode::MatrixMode;
use super::partition::{breakpoints, AxisLayout};
use super::stats::{compute_hellinger, compute_mutual_info, compute_prob, compute_target_mutual_info};
use crate::data::MatrixInput;
use ndarray::IxDyn;

/// A percentage holding both layouts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutValue {
    /// Value in the standard layout.
    pub standard: f64,
    /// Value in the frequency layout.
    pub frequency: f64,
}

impl LayoutValue {
    /// Get the value for a layout.
    pub fn get(&self, layout: AxisLayout) -> f64 {
        match layout {
            AxisLayout::Standard => self.standard,
            AxisLayout::Frequency => self.frequency,
        }
    }
}

/// Auxiliary result of a value computation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CellExtra {
    /// Nothing to report.
    #[default]
    None,
    /// Empty cell where a value was expected.
    ZeroException,
    /// Absolute companion value (squared Hellinger contribution).
    Absolute(f64),
}

impl CellExtra {
    /// Check if the cell is a zero exception.
    pub fn is_zero_exception(&self) -> bool {
        matches!(self, Self::ZeroException)
    }
}

/// Value shown for a cell on the last redraw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayedValue {
    /// Mode the value was computed for.
    pub mode: MatrixMode,
    /// Scalar value.
    pub value: f64,
    /// Effective cell frequency.
    pub freq: f64,
    /// Frequency expected under independence.
    pub expected_freq: f64,
    /// Auxiliary result.
    pub extra: CellExtra,
}

/// One (x, y) position of the matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CellModel {
    /// Position in the flat cell list.
    pub index: usize,
    /// Part index along the x axis.
    pub x_index: usize,
    /// Part index along the y axis.
    pub y_index: usize,
    /// Cluster identity of the x part.
    pub xaxis_part: String,
    /// Cluster identity of the y part.
    pub yaxis_part: String,
    /// Display label of the x part.
    pub xaxis_part_label: String,
    /// Display label of the y part.
    pub yaxis_part_label: String,
    /// Left edge, in percent.
    pub x: LayoutValue,
    /// Bottom edge, in percent.
    pub y: LayoutValue,
    /// Width, in percent.
    pub w: LayoutValue,
    /// Height, in percent.
    pub h: LayoutValue,
    /// Left edge on the canvas.
    pub x_canvas: f64,
    /// Bottom edge on the canvas.
    pub y_canvas: f64,
    /// Width on the canvas.
    pub w_canvas: f64,
    /// Height on the canvas.
    pub h_canvas: f64,
    /// Cell frequency per context slice.
    pub cell_freqs: Vec<f64>,
    /// Table total per context slice.
    pub matrix_total: Vec<f64>,
    /// Column marginal per context slice.
    pub freq_col_vals: Vec<f64>,
    /// Row marginal per context slice.
    pub freq_line_vals: Vec<f64>,
    /// `f / C` per context slice.
    pub cell_probs: Vec<f64>,
    /// `f / L` per context slice.
    pub cell_probs_rev: Vec<f64>,
    /// Mutual information per context slice.
    pub infos_mut_value: Vec<f64>,
    /// Zero-exception flag per context slice.
    pub infos_mut_extra: Vec<bool>,
    /// Signed Hellinger contribution per context slice.
    pub cell_hellinger_value: Vec<f64>,
    /// Squared Hellinger contribution per context slice.
    pub cell_hellinger_absolute_value: Vec<f64>,
    /// Target-with-cell mutual information per context slice.
    pub cell_interests: Vec<f64>,
    /// Value set by the last redraw.
    pub displayed_value: Option<DisplayedValue>,
}

impl CellModel {
    /// Recompute canvas geometry for a layout and a canvas size.
    ///
    /// `x_extent`/`y_extent` are the pixel lengths of the x and y data axes.
    pub fn update_canvas(&mut self, layout: AxisLayout, x_extent: f64, y_extent: f64) {
        self.x_canvas = self.x.get(layout) * x_extent / 100.0;
        self.y_canvas = self.y.get(layout) * y_extent / 100.0;
        self.w_canvas = self.w.get(layout) * x_extent / 100.0;
        self.h_canvas = self.h.get(layout) * y_extent / 100.0;
    }

    /// Center of the cell in canvas data coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x_canvas + self.w_canvas / 2.0,
            self.y_canvas + self.h_canvas / 2.0,
        )
    }

    /// Check if a canvas data point lies in the cell.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_canvas
            && x < self.x_canvas + self.w_canvas
            && y >= self.y_canvas
            && y < self.y_canvas + self.h_canvas
    }

    /// Number of context slices carried by the cell.
    pub fn series_len(&self) -> usize {
        self.cell_freqs.len()
    }
}

/// Cells of a matrix and their shared context enumeration.
#[derive(Debug, Clone)]
pub struct MatrixCells {
    /// Cells, `x_index * y_parts + y_index`.
    pub cells: Vec<CellModel>,
    /// Context combinations indexing every per-cell series.
    pub context: ContextIndex,
    /// Number of x parts.
    pub x_parts: usize,
    /// Number of y parts.
    pub y_parts: usize,
    /// Sum of every frequency.
    pub grand_total: f64,
}

impl MatrixCells {
    /// Recompute canvas geometry of every cell.
    pub fn update_canvas(&mut self, layout: AxisLayout, x_extent: f64, y_extent: f64) {
        for cell in &mut self.cells {
            cell.update_canvas(layout, x_extent, y_extent);
        }
    }

    /// Check if the matrix has context slices.
    pub fn has_context(&self) -> bool {
        self.context.dimensions() > 0
    }
}

/// Builds cell models from a matrix input.
#[derive(Debug)]
pub struct CellStatisticsBuilder<'a> {
    input: &'a MatrixInput,
}

impl<'a> CellStatisticsBuilder<'a> {
    /// Create a builder over an input.
    pub fn new(input: &'a MatrixInput) -> Self {
        Self { input }
    }

    /// Build every cell with geometry and per-slice statistics.
    pub fn build(&self) -> MatrixCells {
        let input = self.input;
        let nx = input.x.parts();
        let ny = input.y.parts();
        let context_sizes: Vec<usize> = input.contexts.iter().map(|d| d.parts()).collect();
        let context = ContextIndex::new(&context_sizes);
        let slices = context.len();

        // freqs[k][i * ny + j]
        let mut freqs = vec![vec![0.0; nx * ny]; slices];
        for (k, slice) in freqs.iter_mut().enumerate() {
            let key = context.key(k).unwrap_or(&[]);
            let mut idx = Vec::with_capacity(2 + key.len());
            for i in 0..nx {
                for j in 0..ny {
                    idx.clear();
                    idx.push(i);
                    idx.push(j);
                    idx.extend_from_slice(key);
                    slice[i * ny + j] = input.frequencies.get(IxDyn(&idx)).copied().unwrap_or(0.0);
                }
            }
        }

        let totals: Vec<f64> = freqs.iter().map(|s| s.iter().sum()).collect();
        let col_vals: Vec<Vec<f64>> = freqs
            .iter()
            .map(|s| (0..nx).map(|i| s[i * ny..(i + 1) * ny].iter().sum()).collect())
            .collect();
        let line_vals: Vec<Vec<f64>> = freqs
            .iter()
            .map(|s| (0..ny).map(|j| (0..nx).map(|i| s[i * ny + j]).sum()).collect())
            .collect();
        let grand_total: f64 = totals.iter().sum();

        let x_marginals: Vec<f64> = (0..nx)
            .map(|i| col_vals.iter().map(|c| c[i]).sum())
            .collect();
        let y_marginals: Vec<f64> = (0..ny)
            .map(|j| line_vals.iter().map(|l| l[j]).sum())
            .collect();

        let xs = breakpoints(&input.x, &x_marginals, AxisLayout::Standard);
        let xf = breakpoints(&input.x, &x_marginals, AxisLayout::Frequency);
        let ys = breakpoints(&input.y, &y_marginals, AxisLayout::Standard);
        let yf = breakpoints(&input.y, &y_marginals, AxisLayout::Frequency);

        let x_names = input.x.part_names();
        let y_names = input.y.part_names();
        let x_labels = input.x.part_labels();
        let y_labels = input.y.part_labels();

        let mut cells = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            for j in 0..ny {
                let mut cell = CellModel {
                    index: i * ny + j,
                    x_index: i,
                    y_index: j,
                    xaxis_part: x_names[i].clone(),
                    yaxis_part: y_names[j].clone(),
                    xaxis_part_label: x_labels[i].clone(),
                    yaxis_part_label: y_labels[j].clone(),
                    x: LayoutValue {
                        standard: xs[i],
                        frequency: xf[i],
                    },
                    y: LayoutValue {
                        standard: ys[j],
                        frequency: yf[j],
                    },
                    w: LayoutValue {
                        standard: xs[i + 1] - xs[i],
                        frequency: xf[i + 1] - xf[i],
                    },
                    h: LayoutValue {
                        standard: ys[j + 1] - ys[j],
                        frequency: yf[j + 1] - yf[j],
                    },
                    x_canvas: 0.0,
                    y_canvas: 0.0,
                    w_canvas: 0.0,
                    h_canvas: 0.0,
                    cell_freqs: Vec::with_capacity(slices),
                    matrix_total: Vec::with_capacity(slices),
                    freq_col_vals: Vec::with_capacity(slices),
                    freq_line_vals: Vec::with_capacity(slices),
                    cell_probs: Vec::with_capacity(slices),
                    cell_probs_rev: Vec::with_capacity(slices),
                    infos_mut_value: Vec::with_capacity(slices),
                    infos_mut_extra: Vec::with_capacity(slices),
                    cell_hellinger_value: Vec::with_capacity(slices),
                    cell_hellinger_absolute_value: Vec::with_capacity(slices),
                    cell_interests: Vec::with_capacity(slices),
                    displayed_value: None,
                };

                let cell_total: f64 = freqs.iter().map(|s| s[i * ny + j]).sum();
                for k in 0..slices {
                    let f = freqs[k][i * ny + j];
                    let t = totals[k];
                    let c = col_vals[k][i];
                    let l = line_vals[k][j];

                    let (mi, mi_extra) = compute_mutual_info(f, t, c, l);
                    let (hellinger, hellinger_abs) = compute_hellinger(f, t, c, l);
                    let (interest, _) = compute_target_mutual_info(f, grand_total, cell_total, t);

                    cell.cell_freqs.push(f);
                    cell.matrix_total.push(t);
                    cell.freq_col_vals.push(c);
                    cell.freq_line_vals.push(l);
                    cell.cell_probs.push(compute_prob(f, c));
                    cell.cell_probs_rev.push(compute_prob(f, l));
                    cell.infos_mut_value.push(mi);
                    cell.infos_mut_extra.push(mi_extra);
                    cell.cell_hellinger_value.push(hellinger);
                    cell.cell_hellinger_absolute_value.push(hellinger_abs);
                    cell.cell_interests.push(interest);
                }
                cells.push(cell);
            }
        }

        tracing::debug!(
            "Built {} cells ({}x{}) over {} context slices",
            cells.len(),
            nx,
            ny,
            slices
        );

        MatrixCells {
            cells,
            context,
            x_parts: nx,
            y_parts: ny,
            grand_total,
        }
    }
}
