// Optimization priority list (persisted under `priorityOrder`)
use super::optimizer::Objective;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row of the drag-and-drop priority grid. `priority` is 1-based and
/// stored as a string, matching what the page wrote into `data-priority`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityItem {
    pub priority: String,
    pub text: String,
    pub icon: String,
}

const DEFAULT_ITEMS: [(&str, &str, Objective); 5] = [
    ("Maximize Throughput", "🛢️", Objective::FlowBpd),
    ("Minimize Demulsifier", "🧪", Objective::Demulsifier),
    ("Minimize Wash Water", "💧", Objective::WashPercent),
    ("Minimize Temperature", "🌡️", Objective::Temperature),
    ("Minimize Voltage", "⚡", Objective::Voltage),
];

#[derive(Debug, Error, PartialEq)]
#[error("cannot move item {from} to {to} in a list of {len}")]
pub struct ReorderError {
    pub from: usize,
    pub to: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityList {
    items: Vec<PriorityItem>,
}

impl Default for PriorityList {
    fn default() -> Self {
        let items = DEFAULT_ITEMS
            .iter()
            .map(|(text, icon, _)| PriorityItem {
                priority: String::new(),
                text: text.to_string(),
                icon: icon.to_string(),
            })
            .collect();
        let mut list = Self { items };
        list.renumber();
        list
    }
}

impl PriorityList {
    pub fn items(&self) -> &[PriorityItem] {
        &self.items
    }

    fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.priority = (index + 1).to_string();
        }
    }

    /// Move the item at `from` so it ends up at `to`, then renumber.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), ReorderError> {
        let len = self.items.len();
        if from >= len || to >= len {
            return Err(ReorderError { from, to, len });
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        self.renumber();
        Ok(())
    }

    /// Restore a saved order. Saved entries are matched to the default
    /// items by `text`; unknown entries are skipped and items missing from
    /// the saved list keep their relative order at the end.
    pub fn restore(saved: &[PriorityItem]) -> Self {
        let mut remaining = Self::default().items;
        let mut items = Vec::with_capacity(remaining.len());

        for entry in saved {
            if let Some(pos) = remaining.iter().position(|i| i.text == entry.text) {
                items.push(remaining.remove(pos));
            }
        }
        items.extend(remaining);

        let mut list = Self { items };
        list.renumber();
        list
    }

    /// Optimizer keys in priority order.
    pub fn objectives(&self) -> Vec<Objective> {
        self.items
            .iter()
            .filter_map(|item| {
                DEFAULT_ITEMS
                    .iter()
                    .find(|(text, _, _)| *text == item.text)
                    .map(|(_, _, objective)| *objective)
            })
            .collect()
    }
}
