//! Statistical modes of the matrix and the mode selection surface.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Statistic displayed by the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatrixMode {
    /// Joint frequency of the cell.
    #[default]
    Frequency,
    /// Contribution of the cell to the mutual information.
    MutualInfo,
    /// Signed Hellinger contribution of the cell.
    Hellinger,
    /// Probability of the cell given its column.
    ProbCell,
    /// Probability of the cell given its row.
    ProbCellReverse,
    /// Precomputed interest of the cell.
    CellInterest,
    /// Mutual information between the target slice and the cell.
    MutualInfoTargetWithCell,
    /// Probability of the target slice given the cell.
    ProbTargetWithCell,
    /// Probability of the cell given the target slice.
    ProbCellWithTarget,
    /// Cell frequency relative to its conditioning slice, in percent.
    ConditionalFrequency,
}

impl MatrixMode {
    /// Every mode, in declaration order.
    pub const ALL: [MatrixMode; 10] = [
        MatrixMode::Frequency,
        MatrixMode::MutualInfo,
        MatrixMode::Hellinger,
        MatrixMode::ProbCell,
        MatrixMode::ProbCellReverse,
        MatrixMode::CellInterest,
        MatrixMode::MutualInfoTargetWithCell,
        MatrixMode::ProbTargetWithCell,
        MatrixMode::ProbCellWithTarget,
        MatrixMode::ConditionalFrequency,
    ];

    /// Stable key used in documents and settings.
    pub fn key(self) -> &'static str {
        match self {
            Self::Frequency => "FREQUENCY",
            Self::MutualInfo => "MUTUAL_INFO",
            Self::Hellinger => "HELLINGER",
            Self::ProbCell => "PROB_CELL",
            Self::ProbCellReverse => "PROB_CELL_REVERSE",
            Self::CellInterest => "CELL_INTEREST",
            Self::MutualInfoTargetWithCell => "MUTUAL_INFO_TARGET_WITH_CELL",
            Self::ProbTargetWithCell => "PROB_TARGET_WITH_CELL",
            Self::ProbCellWithTarget => "PROB_CELL_WITH_TARGET",
            Self::ConditionalFrequency => "CONDITIONAL_FREQUENCY",
        }
    }

    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Frequency => "Frequency",
            Self::MutualInfo => "Mutual information",
            Self::Hellinger => "Hellinger distance",
            Self::ProbCell => "P(cell | column)",
            Self::ProbCellReverse => "P(cell | row)",
            Self::CellInterest => "Cell interest",
            Self::MutualInfoTargetWithCell => "Mutual information target/cell",
            Self::ProbTargetWithCell => "P(target | cell)",
            Self::ProbCellWithTarget => "P(cell | target)",
            Self::ConditionalFrequency => "Conditional frequency",
        }
    }

    /// Whether values are signed and drawn with the diverging palette.
    pub fn is_diverging(self) -> bool {
        matches!(
            self,
            Self::MutualInfo | Self::Hellinger | Self::MutualInfoTargetWithCell
        )
    }

    /// Whether the mode flags empty cells as zero exceptions.
    pub fn flags_zero_exceptions(self) -> bool {
        matches!(self, Self::MutualInfo | Self::MutualInfoTargetWithCell)
    }

    /// Whether the mode only makes sense with context slices.
    pub fn needs_context(self) -> bool {
        matches!(
            self,
            Self::CellInterest
                | Self::MutualInfoTargetWithCell
                | Self::ProbTargetWithCell
                | Self::ProbCellWithTarget
                | Self::ConditionalFrequency
        )
    }
}

impl fmt::Display for MatrixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown matrix mode '{0}'")]
pub struct ParseModeError(pub String);

impl FromStr for MatrixMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase().replace('-', "_");
        if key == "FREQUENCY_CELL" {
            return Ok(Self::Frequency);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.key() == key)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// Available modes and the selected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSelection {
    /// Modes offered to the user.
    pub types: Vec<MatrixMode>,
    /// Currently selected mode.
    pub selected: MatrixMode,
}

impl ModeSelection {
    /// Modes offered for a matrix, with or without context slices.
    pub fn for_matrix(has_context: bool) -> Self {
        let types: Vec<MatrixMode> = MatrixMode::ALL
            .iter()
            .copied()
            .filter(|mode| has_context || !mode.needs_context())
            .collect();
        Self {
            selected: MatrixMode::MutualInfo,
            types,
        }
    }

    /// Index of the selected mode within `types`.
    pub fn selected_index(&self) -> usize {
        self.types
            .iter()
            .position(|m| *m == self.selected)
            .unwrap_or(0)
    }

    /// Select by index, ignoring out-of-range indices.
    pub fn select_index(&mut self, idx: usize) {
        if let Some(&mode) = self.types.get(idx) {
            self.selected = mode;
        }
    }

    /// Select a mode if it is offered.
    pub fn select(&mut self, mode: MatrixMode) -> bool {
        if self.types.contains(&mode) {
            self.selected = mode;
            true
        } else {
            false
        }
    }

    /// Cycle to the next mode.
    pub fn select_next(&mut self) {
        if !self.types.is_empty() {
            let idx = (self.selected_index() + 1) % self.types.len();
            self.selected = self.types[idx];
        }
    }

    /// Cycle to the previous mode.
    pub fn select_prev(&mut self) {
        if !self.types.is_empty() {
            let len = self.types.len();
            let idx = (self.selected_index() + len - 1) % len;
            self.selected = self.types[idx];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keys_and_alias() {
        assert_eq!("MUTUAL_INFO".parse::<MatrixMode>(), Ok(MatrixMode::MutualInfo));
        assert_eq!("frequency-cell".parse::<MatrixMode>(), Ok(MatrixMode::Frequency));
        assert_eq!(
            "prob_cell_reverse".parse::<MatrixMode>(),
            Ok(MatrixMode::ProbCellReverse)
        );
        assert!("nope".parse::<MatrixMode>().is_err());
        for mode in MatrixMode::ALL {
            assert_eq!(mode.key().parse::<MatrixMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_parse_error_message() {
        let err = "nope".parse::<MatrixMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown matrix mode 'nope'");
        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_zero_exceptions_only_for_mutual_information() {
        assert!(MatrixMode::MutualInfo.flags_zero_exceptions());
        assert!(MatrixMode::MutualInfoTargetWithCell.flags_zero_exceptions());
        assert!(!MatrixMode::Hellinger.flags_zero_exceptions());
        assert!(!MatrixMode::Frequency.flags_zero_exceptions());
    }

    #[test]
    fn test_selection_without_context_hides_target_modes() {
        let sel = ModeSelection::for_matrix(false);
        assert_eq!(sel.types.len(), 5);
        assert!(sel.types.iter().all(|m| !m.needs_context()));
        assert_eq!(ModeSelection::for_matrix(true).types.len(), 10);
    }

    #[test]
    fn test_cycle_wraps() {
        let mut sel = ModeSelection::for_matrix(false);
        sel.select_index(4);
        let last = sel.selected;
        sel.select_next();
        assert_eq!(sel.selected, sel.types[0]);
        sel.select_prev();
        assert_eq!(sel.selected, last);
        assert!(!sel.select(MatrixMode::CellInterest));
    }
}
