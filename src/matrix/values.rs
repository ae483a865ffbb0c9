//! Reduction of per-slice cell series to displayed values.

use super::cells::{CellExtra, DisplayedValue, MatrixCells};
use super::context::ContextSelection;
use super::mode::MatrixMode;
use super::stats::{
    compute_expected_frequency, compute_hellinger, compute_mutual_info, compute_prob,
    compute_target_mutual_info,
};
use std::collections::HashMap;

/// One scalar per cell for a mode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedValues {
    /// Mode the values were computed for.
    pub mode: MatrixMode,
    /// Displayed values.
    pub values: Vec<f64>,
    /// Auxiliary results.
    pub extras: Vec<CellExtra>,
    /// Effective cell frequencies.
    pub freqs: Vec<f64>,
    /// Frequencies expected under independence.
    pub expected_freqs: Vec<f64>,
}

impl ComputedValues {
    /// Smallest and largest finite value, `None` when there is none.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Value range, preferring an externally supplied one for the mode.
    pub fn range(&self, external: &HashMap<MatrixMode, (f64, f64)>) -> (f64, f64) {
        external
            .get(&self.mode)
            .copied()
            .or_else(|| self.min_max())
            .unwrap_or((0.0, 0.0))
    }

    /// Largest absolute bound of the value range.
    pub fn max_abs(&self, external: &HashMap<MatrixMode, (f64, f64)>) -> f64 {
        let (min, max) = self.range(external);
        min.abs().max(max.abs())
    }

    /// Sum of every value.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Effective series sums of one cell over the selected slices.
#[derive(Debug, Clone, Copy, Default)]
struct SliceSums {
    freq: f64,
    total: f64,
    col: f64,
    line: f64,
    interest: f64,
}

/// Computes displayed values for every cell.
#[derive(Debug, Clone, Copy)]
pub struct MatrixValueComputer<'a> {
    matrix: &'a MatrixCells,
}

impl<'a> MatrixValueComputer<'a> {
    /// Create a computer over a built matrix.
    pub fn new(matrix: &'a MatrixCells) -> Self {
        Self { matrix }
    }

    /// Series positions contributing to the displayed values.
    ///
    /// A context selection wins over a target index; with neither, every
    /// slice contributes.
    pub fn slice_positions(
        &self,
        selection: &ContextSelection,
        target: Option<usize>,
    ) -> Vec<usize> {
        let context = &self.matrix.context;
        if !selection.is_empty() {
            context.expand(selection)
        } else if let Some(t) = target {
            if t < context.len() {
                vec![t]
            } else {
                Vec::new()
            }
        } else {
            (0..context.len()).collect()
        }
    }

    /// Compute one value per cell.
    pub fn compute(
        &self,
        mode: MatrixMode,
        selection: &ContextSelection,
        target: Option<usize>,
    ) -> ComputedValues {
        let positions = self.slice_positions(selection, target);
        let grand_total = self.matrix.grand_total;
        let n = self.matrix.cells.len();

        let mut out = ComputedValues {
            mode,
            values: Vec::with_capacity(n),
            extras: Vec::with_capacity(n),
            freqs: Vec::with_capacity(n),
            expected_freqs: Vec::with_capacity(n),
        };

        for cell in &self.matrix.cells {
            let sums = positions.iter().fold(SliceSums::default(), |acc, &k| SliceSums {
                freq: acc.freq + cell.cell_freqs[k],
                total: acc.total + cell.matrix_total[k],
                col: acc.col + cell.freq_col_vals[k],
                line: acc.line + cell.freq_line_vals[k],
                interest: acc.interest + cell.cell_interests[k],
            });
            let cell_total: f64 = cell.cell_freqs.iter().sum();
            let SliceSums {
                freq: f,
                total: t,
                col: c,
                line: l,
                interest,
            } = sums;

            let (value, extra) = match mode {
                MatrixMode::Frequency => (f, CellExtra::None),
                MatrixMode::MutualInfo => zero_exception(compute_mutual_info(f, t, c, l)),
                MatrixMode::Hellinger => {
                    let (h, abs) = compute_hellinger(f, t, c, l);
                    (h, CellExtra::Absolute(abs))
                },
                MatrixMode::ProbCell => (compute_prob(f, c), CellExtra::None),
                MatrixMode::ProbCellReverse => (compute_prob(f, l), CellExtra::None),
                MatrixMode::CellInterest => (interest, CellExtra::None),
                MatrixMode::MutualInfoTargetWithCell => {
                    zero_exception(compute_target_mutual_info(f, grand_total, cell_total, t))
                },
                MatrixMode::ProbTargetWithCell => (compute_prob(f, cell_total), CellExtra::None),
                MatrixMode::ProbCellWithTarget => (compute_prob(f, t), CellExtra::None),
                MatrixMode::ConditionalFrequency => (compute_prob(f, t) * 100.0, CellExtra::None),
            };

            out.values.push(value);
            out.extras.push(extra);
            out.freqs.push(f);
            out.expected_freqs.push(compute_expected_frequency(t, c, l));
        }

        out
    }
}

fn zero_exception((value, flagged): (f64, bool)) -> (f64, CellExtra) {
    if flagged {
        (value, CellExtra::ZeroException)
    } else {
        (value, CellExtra::None)
    }
}

/// Store computed values on the cells for the next redraw.
pub fn apply_displayed_values(matrix: &mut MatrixCells, values: &ComputedValues) {
    for (i, cell) in matrix.cells.iter_mut().enumerate() {
        cell.displayed_value = values.values.get(i).map(|&value| DisplayedValue {
            mode: values.mode,
            value,
            freq: values.freqs[i],
            expected_freq: values.expected_freqs[i],
            extra: values.extras[i],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::{context_input, small_input};
    use crate::matrix::cells::CellStatisticsBuilder;
    use crate::matrix::stats::total_mutual_info;

    fn aggregated_table(matrix: &MatrixCells) -> Vec<Vec<f64>> {
        (0..matrix.x_parts)
            .map(|i| {
                (0..matrix.y_parts)
                    .map(|j| matrix.cells[i * matrix.y_parts + j].cell_freqs.iter().sum())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_frequency_mode_without_context() {
        let input = small_input();
        let matrix = CellStatisticsBuilder::new(&input).build();
        let values = MatrixValueComputer::new(&matrix).compute(
            MatrixMode::Frequency,
            &ContextSelection::default(),
            None,
        );
        assert_eq!(values.values, vec![10.0, 20.0, 10.0, 5.0, 35.0, 20.0]);
        // (L * C) / T for cell (A, c): 15 * 40 / 100
        assert_eq!(values.expected_freqs[0], 6.0);
        assert_eq!(values.min_max(), Some((5.0, 35.0)));
    }

    #[test]
    fn test_mutual_info_sums_to_total() {
        for input in [small_input(), context_input()] {
            let matrix = CellStatisticsBuilder::new(&input).build();
            let values = MatrixValueComputer::new(&matrix).compute(
                MatrixMode::MutualInfo,
                &ContextSelection::default(),
                None,
            );
            let expected = total_mutual_info(&aggregated_table(&matrix));
            assert!((values.total() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_target_index_picks_one_slice() {
        let input = context_input();
        let matrix = CellStatisticsBuilder::new(&input).build();
        let computer = MatrixValueComputer::new(&matrix);
        let yes = computer.compute(MatrixMode::Frequency, &ContextSelection::default(), Some(0));
        assert_eq!(yes.values, vec![8.0, 1.0, 3.0, 0.0]);
        let missing = computer.compute(MatrixMode::Frequency, &ContextSelection::default(), Some(9));
        assert_eq!(missing.values, vec![0.0; 4]);
    }

    #[test]
    fn test_context_selection_overrides_target() {
        let input = context_input();
        let matrix = CellStatisticsBuilder::new(&input).build();
        let computer = MatrixValueComputer::new(&matrix);
        let mut sel = ContextSelection::default();
        sel.set(0, vec![1]);
        let no = computer.compute(MatrixMode::Frequency, &sel, Some(0));
        assert_eq!(no.values, vec![2.0, 9.0, 3.0, 4.0]);

        // Folder-level selection covering every part equals the aggregate
        sel.set(0, vec![0, 1]);
        let all = computer.compute(MatrixMode::MutualInfo, &sel, None);
        let aggregate = computer.compute(MatrixMode::MutualInfo, &ContextSelection::default(), None);
        assert_eq!(all.values, aggregate.values);
    }

    #[test]
    fn test_target_modes() {
        let input = context_input();
        let matrix = CellStatisticsBuilder::new(&input).build();
        let computer = MatrixValueComputer::new(&matrix);
        let none = ContextSelection::default();

        // Cell (A, [0,1]) holds 8 "yes" out of 10; "yes" totals 12 out of 30
        let p_target = computer.compute(MatrixMode::ProbTargetWithCell, &none, Some(0));
        assert!((p_target.values[0] - 0.8).abs() < 1e-12);
        let p_cell = computer.compute(MatrixMode::ProbCellWithTarget, &none, Some(0));
        assert!((p_cell.values[0] - 8.0 / 12.0).abs() < 1e-12);
        let cond = computer.compute(MatrixMode::ConditionalFrequency, &none, Some(0));
        assert!((cond.values[0] - 800.0 / 12.0).abs() < 1e-9);

        let mi = computer.compute(MatrixMode::MutualInfoTargetWithCell, &none, Some(0));
        let expected = (8.0 / 30.0) * (30.0 * 8.0 / (10.0 * 12.0_f64)).ln();
        assert!((mi.values[0] - expected).abs() < 1e-12);
        // (B, ]1,3]) has no "yes" individual
        assert!(mi.extras[3].is_zero_exception());

        let interest = computer.compute(MatrixMode::CellInterest, &none, Some(0));
        assert!((interest.values[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_hellinger_extra_is_square() {
        let input = small_input();
        let matrix = CellStatisticsBuilder::new(&input).build();
        let values = MatrixValueComputer::new(&matrix).compute(
            MatrixMode::Hellinger,
            &ContextSelection::default(),
            None,
        );
        for (v, extra) in values.values.iter().zip(&values.extras) {
            assert_eq!(*extra, CellExtra::Absolute(v * v));
        }
    }

    #[test]
    fn test_external_range_wins() {
        let input = small_input();
        let matrix = CellStatisticsBuilder::new(&input).build();
        let values = MatrixValueComputer::new(&matrix).compute(
            MatrixMode::Frequency,
            &ContextSelection::default(),
            None,
        );
        let mut external = HashMap::new();
        assert_eq!(values.max_abs(&external), 35.0);
        external.insert(MatrixMode::Frequency, (-50.0, 10.0));
        assert_eq!(values.range(&external), (-50.0, 10.0));
        assert_eq!(values.max_abs(&external), 50.0);
    }

    #[test]
    fn test_apply_displayed_values() {
        let input = small_input();
        let mut matrix = CellStatisticsBuilder::new(&input).build();
        let values = MatrixValueComputer::new(&matrix).compute(
            MatrixMode::ProbCell,
            &ContextSelection::default(),
            None,
        );
        apply_displayed_values(&mut matrix, &values);
        let shown = matrix.cells[0].displayed_value.unwrap();
        assert_eq!(shown.mode, MatrixMode::ProbCell);
        assert_eq!(shown.value, 0.25);
        assert_eq!(shown.freq, 10.0);
    }
}
