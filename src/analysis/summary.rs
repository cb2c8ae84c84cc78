// Per-group aggregation of trial outcomes
//
// The outcome set is scanned exactly once; everything downstream works on
// the fixed-shape summaries.

use crate::simulation::{Group, TrialOutcomeSet};
use serde::{Deserialize, Serialize};

/// Users and conversions observed in one group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub users: u64,
    pub conversions: u64,
}

impl GroupSummary {
    /// Observed conversion rate (0.0 for an empty group)
    pub fn rate(&self) -> f64 {
        if self.users == 0 {
            0.0
        } else {
            self.conversions as f64 / self.users as f64
        }
    }
}

/// Summaries for both experiment groups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummaries {
    pub control: GroupSummary,
    pub treatment: GroupSummary,
}

impl GroupSummaries {
    /// Aggregate an outcome set in a single pass
    pub fn from_outcomes(outcomes: &TrialOutcomeSet) -> Self {
        let mut summaries = Self::default();
        for record in outcomes.records() {
            let summary = summaries.get_mut(record.group);
            summary.users += 1;
            summary.conversions += u64::from(record.converted);
        }
        summaries
    }

    pub fn get(&self, group: Group) -> &GroupSummary {
        match group {
            Group::Control => &self.control,
            Group::Treatment => &self.treatment,
        }
    }

    fn get_mut(&mut self, group: Group) -> &mut GroupSummary {
        match group {
            Group::Control => &mut self.control,
            Group::Treatment => &mut self.treatment,
        }
    }
}
