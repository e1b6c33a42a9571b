//! Category discovery and ordering

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Distinct categories of one variable, in table order.
#[derive(Debug, Default)]
pub struct Categories {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Categories {
    /// Collect the distinct values and sort them: numerically when every
    /// value reads as a number, otherwise as plain strings.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut labels: Vec<String> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for value in values {
            if seen.insert(value) {
                labels.push(value.to_string());
            }
        }

        sort_labels(&mut labels);

        let positions = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();

        Self { labels, positions }
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn into_labels(self) -> Vec<String> {
        self.labels
    }
}

fn sort_labels(labels: &mut [String]) {
    let numeric: Option<Vec<f64>> = labels.iter().map(|l| l.trim().parse::<f64>().ok()).collect();

    match numeric {
        Some(_) => labels.sort_by(|a, b| {
            let x: f64 = a.trim().parse().unwrap_or(f64::NAN);
            let y: f64 = b.trim().parse().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal).then_with(|| a.cmp(b))
        }),
        None => labels.sort(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_categories_sorted() {
        let cats = Categories::from_values(["South", "North", "South", "East"]);
        assert_eq!(cats.len(), 3);
        assert_eq!(cats.position("East"), Some(0));
        assert_eq!(cats.into_labels(), vec!["East", "North", "South"]);
    }

    #[test]
    fn test_numeric_categories_sorted_by_value() {
        let cats = Categories::from_values(["10", "9", "100", "9"]);
        assert_eq!(cats.into_labels(), vec!["9", "10", "100"]);
    }

    #[test]
    fn test_mixed_categories_sorted_as_text() {
        let cats = Categories::from_values(["10", "9", "n/a-ish"]);
        assert_eq!(cats.into_labels(), vec!["10", "9", "n/a-ish"]);
    }
}
