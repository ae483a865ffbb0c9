//! Per-cell statistics of a contingency table.
//!
//! Every function here is total: divisions by zero and logarithms of zero
//! resolve to 0 instead of leaking NaN or infinities into rendering.

/// Mutual information contributed by one cell.
///
/// `MI = (f / T) * ln(T * f / (C * L))`. Returns the value and whether the
/// cell is a zero exception (empty cell, or an undefined result).
pub fn compute_mutual_info(
    cell_freq: f64,
    total: f64,
    freq_col: f64,
    freq_line: f64,
) -> (f64, bool) {
    let mi = (cell_freq / total) * (total * cell_freq / (freq_col * freq_line)).ln();
    if cell_freq == 0.0 || mi.is_nan() {
        (0.0, true)
    } else if !mi.is_finite() {
        (0.0, false)
    } else {
        (mi, false)
    }
}

/// Signed Hellinger contribution of one cell and its square.
///
/// `H = sqrt(f / T) - sqrt((C / T) * L / T)`.
pub fn compute_hellinger(cell_freq: f64, total: f64, freq_col: f64, freq_line: f64) -> (f64, f64) {
    let h = (cell_freq / total).sqrt() - (freq_col / total * freq_line / total).sqrt();
    if h.is_finite() {
        (h, h * h)
    } else {
        (0.0, 0.0)
    }
}

/// Frequency expected under independence, `(L * C) / T`.
pub fn compute_expected_frequency(total: f64, freq_col: f64, freq_line: f64) -> f64 {
    let expected = (freq_line * freq_col) / total;
    if expected.is_finite() {
        expected
    } else {
        0.0
    }
}

/// Guarded ratio, 0 when undefined.
pub fn compute_prob(numerator: f64, denominator: f64) -> f64 {
    let p = numerator / denominator;
    if p.is_finite() {
        p
    } else {
        0.0
    }
}

/// Mutual information between a target slice and a cell.
///
/// `(f / N) * ln(N * f / (F * T))` with `N` the grand total, `F` the cell
/// frequency over every slice and `T` the slice total.
pub fn compute_target_mutual_info(
    cell_freq: f64,
    grand_total: f64,
    cell_total: f64,
    slice_total: f64,
) -> (f64, bool) {
    compute_mutual_info(cell_freq, grand_total, cell_total, slice_total)
}

/// Total mutual information of a 2D table given as `table[x][y]`.
pub fn total_mutual_info(table: &[Vec<f64>]) -> f64 {
    let total: f64 = table.iter().flatten().sum();
    let cols: Vec<f64> = table.iter().map(|row| row.iter().sum()).collect();
    let ny = table.first().map(Vec::len).unwrap_or(0);
    let lines: Vec<f64> = (0..ny)
        .map(|j| table.iter().map(|row| row[j]).sum())
        .collect();
    table
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            let col = cols[i];
            let lines = &lines;
            row.iter()
                .enumerate()
                .map(move |(j, &f)| compute_mutual_info(f, total, col, lines[j]).0)
        })
        .sum()
}
