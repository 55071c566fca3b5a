use std::collections::BTreeSet;

/// What changed between two checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertChange {
    /// Alerting set is non-empty and differs from the last check
    Raised,
    /// Alerting set became empty
    Cleared,
    Unchanged,
}

/// Last seen set of alerting keys
#[derive(Debug, Default)]
pub struct AlertSet {
    current: BTreeSet<String>,
}

impl AlertSet {
    pub fn update(&mut self, keys: BTreeSet<String>) -> AlertChange {
        if keys == self.current {
            return AlertChange::Unchanged;
        }
        let change = if keys.is_empty() {
            AlertChange::Cleared
        } else {
            AlertChange::Raised
        };
        self.current = keys;
        change
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(keys: &[&str]) -> BTreeSet<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_logs_only_on_change() {
        let mut alerts = AlertSet::default();
        assert_eq!(alerts.update(set(&[])), AlertChange::Unchanged);
        assert_eq!(alerts.update(set(&["Queso"])), AlertChange::Raised);
        assert_eq!(alerts.update(set(&["Queso"])), AlertChange::Unchanged);
        assert_eq!(alerts.update(set(&["Queso", "Arroz"])), AlertChange::Raised);
        assert_eq!(alerts.update(set(&[])), AlertChange::Cleared);
        assert_eq!(alerts.update(set(&[])), AlertChange::Unchanged);
    }
}
