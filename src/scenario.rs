//! Named prize wheels ("scenarios") and prize editing
//!
//! Edits here never touch a spin in flight: the spin driver works on its own
//! snapshot of the prize set.

use serde::{Deserialize, Serialize};

use crate::palette_color;
use crate::wheel::{Prize, PrizeSet, clamp_weight};

/// A named prize wheel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelScenario {
    pub id: String,
    pub name: String,
    pub prizes: Vec<Prize>,
    /// Unix timestamp (ms) when created
    pub created_at: i64,
}

impl WheelScenario {
    pub fn new(id: impl Into<String>, name: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prizes: Vec::new(),
            created_at,
        }
    }

    /// Prize set for spinning (weights clamped)
    pub fn prize_set(&self) -> PrizeSet {
        PrizeSet::new(self.prizes.clone())
    }

    /// Append a prize with the next palette color
    ///
    /// Returns the new prize id, or None if the label is blank.
    pub fn add_prize(&mut self, id: impl Into<String>, label: &str, weight: i64) -> Option<String> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let id = id.into();
        let color = palette_color(self.prizes.len());
        self.prizes.push(Prize {
            id: id.clone(),
            label: label.to_string(),
            weight: clamp_weight(weight),
            color: color.to_string(),
        });
        Some(id)
    }

    /// Remove a prize by id
    pub fn remove_prize(&mut self, id: &str) -> bool {
        let before = self.prizes.len();
        self.prizes.retain(|p| p.id != id);
        self.prizes.len() != before
    }

    /// Change a prize's weight (clamped to >= 1)
    pub fn set_weight(&mut self, id: &str, weight: i64) -> bool {
        match self.prizes.iter_mut().find(|p| p.id == id) {
            Some(prize) => {
                prize.weight = clamp_weight(weight);
                true
            }
            None => false,
        }
    }
}

/// Why a scenario could not be deleted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteRefused {
    /// At least one scenario must remain
    LastScenario,
    /// No scenario with that id
    NotFound,
}

/// What a spin takes from the selected wheel when it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinSource {
    /// Wheel name, for announcing the winner
    pub name: String,
    pub prizes: PrizeSet,
}

/// All scenarios plus the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioBook {
    scenarios: Vec<WheelScenario>,
    current_id: String,
}

impl Default for ScenarioBook {
    fn default() -> Self {
        Self::new(default_scenarios(0), None)
    }
}

impl ScenarioBook {
    /// Build a book, selecting `current_id` if it exists (else the first scenario)
    ///
    /// An empty list is replaced by the built-in defaults.
    pub fn new(scenarios: Vec<WheelScenario>, current_id: Option<String>) -> Self {
        let scenarios = if scenarios.is_empty() {
            default_scenarios(0)
        } else {
            scenarios
        };
        let current_id = current_id
            .filter(|id| scenarios.iter().any(|s| &s.id == id))
            .unwrap_or_else(|| scenarios[0].id.clone());
        Self {
            scenarios,
            current_id,
        }
    }

    pub fn scenarios(&self) -> &[WheelScenario] {
        &self.scenarios
    }

    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    /// The selected scenario (falls back to the first)
    pub fn current(&self) -> &WheelScenario {
        self.scenarios
            .iter()
            .find(|s| s.id == self.current_id)
            .unwrap_or(&self.scenarios[0])
    }

    /// Mutable access to the selected scenario
    pub fn current_mut(&mut self) -> &mut WheelScenario {
        let index = self
            .scenarios
            .iter()
            .position(|s| s.id == self.current_id)
            .unwrap_or(0);
        &mut self.scenarios[index]
    }

    /// Select a scenario by id
    pub fn switch_to(&mut self, id: &str) -> bool {
        if self.scenarios.iter().any(|s| s.id == id) {
            self.current_id = id.to_string();
            true
        } else {
            false
        }
    }

    /// Create an empty scenario and select it
    pub fn add_scenario(&mut self, id: impl Into<String>, name: &str, now: i64) -> &WheelScenario {
        let scenario = WheelScenario::new(id, name.trim(), now);
        self.current_id = scenario.id.clone();
        self.scenarios.push(scenario);
        self.current()
    }

    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        match self.scenarios.iter_mut().find(|s| s.id == id) {
            Some(scenario) => {
                scenario.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Delete a scenario; the last one can never be deleted
    pub fn delete(&mut self, id: &str) -> Result<(), DeleteRefused> {
        if self.scenarios.len() <= 1 {
            return Err(DeleteRefused::LastScenario);
        }
        let index = self
            .scenarios
            .iter()
            .position(|s| s.id == id)
            .ok_or(DeleteRefused::NotFound)?;
        self.scenarios.remove(index);
        if self.current_id == id {
            self.current_id = self.scenarios[0].id.clone();
        }
        Ok(())
    }

    /// Replace the selected scenario's prizes
    pub fn update_prizes(&mut self, prizes: Vec<Prize>) {
        self.current_mut().prizes = prizes;
    }

    /// Capture the selected wheel for a new spin
    pub fn spin_source(&self) -> SpinSource {
        let scenario = self.current();
        SpinSource {
            name: scenario.name.clone(),
            prizes: scenario.prize_set(),
        }
    }
}

fn prize(id: &str, label: &str, weight: u32, color: &str) -> Prize {
    Prize::new(id, label, weight, color)
}

/// Built-in scenarios used on first launch or after corrupt storage
pub fn default_scenarios(now: i64) -> Vec<WheelScenario> {
    // Weights encode the intended odds: 1 -> 1/40, 2 -> 1/20, 4 -> 1/10, 6 -> 3/20
    let student = vec![
        prize("1", "Mystery Gift", 1, "#F87171"),
        prize("2", "Badminton Hour", 1, "#FB923C"),
        prize("3", "One Game Round", 1, "#FACC15"),
        prize("4", "Strategy Lesson", 1, "#A3E635"),
        prize("5", "Crafts (20 min)", 2, "#34D399"),
        prize("6", "Music (20 min)", 2, "#22D3EE"),
        prize("7", "Drawing (20 min)", 2, "#60A5FA"),
        prize("8", "Gymnastics (20 min)", 2, "#818CF8"),
        prize("9", "Advanced Topic", 4, "#A78BFA"),
        prize("10", "Chat (20 min)", 4, "#E879F9"),
        prize("11", "A Notebook", 4, "#FB7185"),
        prize("12", "A Hug", 6, "#F472B6"),
        prize("13", "A High Five", 6, "#38BDF8"),
    ];
    let lunch = vec![
        prize("101", "Burgers", 2, "#F87171"),
        prize("102", "Noodle Soup", 2, "#FB923C"),
        prize("103", "Salad", 2, "#A3E635"),
        prize("104", "Spicy Hot Pot", 2, "#FACC15"),
        prize("105", "Braised Chicken Rice", 2, "#34D399"),
        prize("106", "Packed Lunch", 4, "#22D3EE"),
        prize("107", "Skip Lunch", 1, "#A78BFA"),
        prize("108", "Convenience Store", 2, "#FB7185"),
    ];

    vec![
        WheelScenario {
            id: "default-student".to_string(),
            name: "Student Rewards".to_string(),
            prizes: student,
            created_at: now,
        },
        WheelScenario {
            id: "default-lunch".to_string(),
            name: "What's for Lunch".to_string(),
            prizes: lunch,
            created_at: now + 1,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let book = ScenarioBook::default();
        assert_eq!(book.scenarios().len(), 2);
        assert_eq!(book.current_id(), "default-student");
        assert_eq!(book.current().prizes.len(), 13);
        assert_eq!(book.current().prize_set().total_weight(), 36);
    }

    #[test]
    fn test_unknown_current_id_falls_back() {
        let book = ScenarioBook::new(default_scenarios(0), Some("gone".into()));
        assert_eq!(book.current_id(), "default-student");

        let book = ScenarioBook::new(Vec::new(), Some("default-lunch".into()));
        assert_eq!(book.current().name, "What's for Lunch");
    }

    #[test]
    fn test_add_switch_rename() {
        let mut book = ScenarioBook::default();
        book.add_scenario("s1", "  Friday Treats ", 1000);
        assert_eq!(book.current_id(), "s1");
        assert_eq!(book.current().name, "Friday Treats");
        assert!(book.current().prizes.is_empty());

        assert!(book.switch_to("default-lunch"));
        assert!(!book.switch_to("missing"));
        assert_eq!(book.current_id(), "default-lunch");

        assert!(book.rename("s1", "Weekend"));
        assert!(!book.rename("s1", "   "));
        assert_eq!(book.scenarios()[2].name, "Weekend");
    }

    #[test]
    fn test_delete_rules() {
        let mut book = ScenarioBook::default();
        assert!(book.switch_to("default-lunch"));
        assert_eq!(book.delete("nope"), Err(DeleteRefused::NotFound));
        assert_eq!(book.delete("default-lunch"), Ok(()));
        assert_eq!(book.current_id(), "default-student");
        assert_eq!(book.delete("default-student"), Err(DeleteRefused::LastScenario));
    }

    #[test]
    fn test_prize_edits() {
        let mut scenario = WheelScenario::new("x", "X", 0);
        assert_eq!(scenario.add_prize("p1", "  Cake ", 0), Some("p1".to_string()));
        assert_eq!(scenario.add_prize("p2", "   ", 3), None);
        scenario.add_prize("p2", "Tea", 3);

        assert_eq!(scenario.prizes[0].label, "Cake");
        assert_eq!(scenario.prizes[0].weight, 1);
        assert_eq!(scenario.prizes[1].color, palette_color(1));

        assert!(scenario.set_weight("p2", -4));
        assert_eq!(scenario.prizes[1].weight, 1);
        assert!(!scenario.set_weight("nope", 2));

        assert!(scenario.remove_prize("p1"));
        assert!(!scenario.remove_prize("p1"));
        assert_eq!(scenario.prizes.len(), 1);
    }

    #[test]
    fn test_spin_source_outlives_switch() {
        let mut book = ScenarioBook::default();
        let source = book.spin_source();
        assert_eq!(source.name, "Student Rewards");

        assert!(book.switch_to("default-lunch"));
        book.current_mut().add_prize("x", "Soup", 2);

        assert_eq!(source.name, "Student Rewards");
        assert_eq!(source.prizes.len(), 13);
        assert_eq!(book.spin_source().name, "What's for Lunch");
    }

    #[test]
    fn test_scenario_json_shape() {
        let json = serde_json::to_string(&default_scenarios(5)[1]).unwrap();
        assert!(json.contains("\"createdAt\":6"));
        assert!(json.contains("\"name\":\"Burgers\""));
    }
}
