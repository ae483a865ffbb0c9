//! Plain-text report of a matrix, printed by `--summary`.

use crate::data::MatrixInput;
use crate::matrix::{CellStatisticsBuilder, ContextSelection, MatrixValueComputer, ModeSelection};
use crate::ui::{format_stat_value, format_total};

/// Build the report: variables, dimensions and the value range of every mode.
pub fn matrix_summary(input: &MatrixInput) -> String {
    let matrix = CellStatisticsBuilder::new(input).build();
    let computer = MatrixValueComputer::new(&matrix);
    let none = ContextSelection::default();

    let mut text = format!(
        "Matrix: {} x {}\n",
        input.variable.name_x, input.variable.name_y
    );
    text.push_str(&"=".repeat(60));
    text.push('\n');
    text.push_str(&format!(
        "X: {} ({:?}, {} parts)\n",
        input.x.name,
        input.x.dimension_type(),
        input.x.parts()
    ));
    text.push_str(&format!(
        "Y: {} ({:?}, {} parts)\n",
        input.y.name,
        input.y.dimension_type(),
        input.y.parts()
    ));
    for dim in &input.contexts {
        text.push_str(&format!(
            "Context: {} ({:?}, {} parts)\n",
            dim.name,
            dim.dimension_type(),
            dim.parts()
        ));
    }
    text.push_str(&format!(
        "Cells: {}  Slices: {}  Total: {}\n\n",
        matrix.cells.len(),
        matrix.context.len(),
        format_total(matrix.grand_total)
    ));

    text.push_str(&format!(
        "{:<32} {:>12} {:>12} {:>12}\n",
        "Mode", "Min", "Max", "Sum"
    ));
    for mode in ModeSelection::for_matrix(matrix.has_context()).types {
        let values = computer.compute(mode, &none, None);
        let (min, max) = values.range(&input.min_max_values);
        text.push_str(&format!(
            "{:<32} {:>12} {:>12} {:>12}\n",
            mode.key(),
            format_stat_value(min),
            format_stat_value(max),
            format_stat_value(values.total())
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures::{context_input, small_input};

    #[test]
    fn test_summary_lists_modes() {
        let text = matrix_summary(&small_input());
        assert!(text.starts_with("Matrix: "));
        assert!(text.contains("Cells: 6  Slices: 1  Total: 100"));
        assert!(text.contains("MUTUAL_INFO "));
        assert!(!text.contains("CONDITIONAL_FREQUENCY"));
    }

    #[test]
    fn test_summary_with_context() {
        let text = matrix_summary(&context_input());
        assert!(text.contains("Context: T"));
        assert!(text.contains("CONDITIONAL_FREQUENCY"));
    }
}
