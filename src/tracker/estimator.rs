use crate::error::{Result, TrackerError};
use crate::models::{Intake, SavedFood};

/// Foods picked during one estimator session.
///
/// Holds copies, so deleting a saved food mid-session does not affect the selection.
#[derive(Debug, Clone, Default)]
pub struct EstimatorSelection {
    items: Vec<SavedFood>,
}

impl EstimatorSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a copy of `food`. The same food may be picked more than once.
    pub fn add(&mut self, food: &SavedFood) {
        self.items.push(food.clone());
    }

    /// Remove the item at `index`.
    pub fn remove(&mut self, index: usize) -> Result<SavedFood> {
        if index >= self.items.len() {
            return Err(TrackerError::validation(format!(
                "no selected item at position {}",
                index + 1
            )));
        }
        Ok(self.items.remove(index))
    }

    pub fn items(&self) -> &[SavedFood] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Summed (calories, protein) of everything selected.
    pub fn totals(&self) -> (f64, f64) {
        self.items
            .iter()
            .fold((0.0, 0.0), |(cal, pro), f| (cal + f.calories, pro + f.protein))
    }

    /// Collapse the selection into a single intake event.
    pub fn confirm(self) -> Result<Intake> {
        if self.is_empty() {
            return Err(TrackerError::validation("select at least one food to estimate"));
        }
        let (calories, protein) = self.totals();
        Intake::from_amounts(calories, protein)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(id: u64, name: &str, cal: f64, pro: f64) -> SavedFood {
        SavedFood::new(id, name, cal, pro).unwrap()
    }

    #[test]
    fn test_totals_and_confirm() {
        let mut selection = EstimatorSelection::new();
        selection.add(&food(1, "Chicken", 300.0, 20.0));
        selection.add(&food(2, "Rice", 200.0, 10.0));

        assert_eq!(selection.totals(), (500.0, 30.0));
        assert_eq!(selection.confirm().unwrap(), Intake::new(500, 30));
    }

    #[test]
    fn test_duplicates_and_remove() {
        let toast = food(1, "Toast", 80.0, 3.0);
        let mut selection = EstimatorSelection::new();
        selection.add(&toast);
        selection.add(&toast);
        assert_eq!(selection.len(), 2);

        selection.remove(0).unwrap();
        assert_eq!(selection.len(), 1);
        assert!(selection.remove(5).is_err());
    }

    #[test]
    fn test_confirm_empty_fails() {
        assert!(EstimatorSelection::new().confirm().is_err());
    }

    #[test]
    fn test_fractional_amounts_round_once() {
        let mut selection = EstimatorSelection::new();
        selection.add(&food(1, "A", 100.4, 0.3));
        selection.add(&food(2, "B", 100.4, 0.3));
        // 200.8 / 0.6, not 100 + 100 / 0 + 0
        assert_eq!(selection.confirm().unwrap(), Intake::new(201, 1));
    }
}
