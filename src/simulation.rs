//! Synthetic outcome generation for two-group conversion experiments
//!
//! Each user is an independent Bernoulli trial. The caller owns the random
//! source, so runs are reproducible when the generator is seeded and
//! concurrent runs never share generator state.

use crate::error::{ExperimentError, Result};
use rand::distributions::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Experiment arm a user was assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Control,
    Treatment,
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Group::Control => write!(f, "control"),
            Group::Treatment => write!(f, "treatment"),
        }
    }
}

/// One user's outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub group: Group,
    pub converted: bool,
}

/// Per-user outcomes for both groups
///
/// Invariant: both groups hold the same non-zero number of records. Control
/// records always precede treatment records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialOutcomeSet {
    records: Vec<TrialRecord>,
    users_per_group: u64,
}

impl TrialOutcomeSet {
    /// Build an outcome set from externally supplied records
    ///
    /// Records may arrive in any order; they are stored control-first. Fails
    /// when either group is empty or the group sizes differ.
    pub fn from_records(records: Vec<TrialRecord>) -> Result<Self> {
        let (mut control, treatment): (Vec<_>, Vec<_>) = records
            .into_iter()
            .partition(|r| r.group == Group::Control);

        if control.is_empty() || treatment.is_empty() {
            return Err(ExperimentError::invalid(format!(
                "both groups need at least one record (control={}, treatment={})",
                control.len(),
                treatment.len()
            )));
        }
        if control.len() != treatment.len() {
            return Err(ExperimentError::invalid(format!(
                "group sizes must be equal (control={}, treatment={})",
                control.len(),
                treatment.len()
            )));
        }

        let users_per_group = control.len() as u64;
        control.extend(treatment);
        Ok(Self {
            records: control,
            users_per_group,
        })
    }

    /// All records, control group first
    pub fn records(&self) -> &[TrialRecord] {
        &self.records
    }

    /// Records belonging to one group
    pub fn group(&self, group: Group) -> &[TrialRecord] {
        let split = self.users_per_group as usize;
        match group {
            Group::Control => &self.records[..split],
            Group::Treatment => &self.records[split..],
        }
    }

    pub fn users_per_group(&self) -> u64 {
        self.users_per_group
    }

    /// Total number of records across both groups
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ExperimentError::invalid(format!(
            "{} must be in [0, 1], got {}",
            name, p
        )));
    }
    Ok(())
}

/// Check simulation inputs without drawing any outcomes
pub fn validate_inputs(n_users: u64, cr_control: f64, cr_treatment: f64) -> Result<()> {
    if n_users == 0 {
        return Err(ExperimentError::invalid("n_users must be >= 1, got 0"));
    }
    check_probability("cr_control", cr_control)?;
    check_probability("cr_treatment", cr_treatment)
}

fn bernoulli(name: &str, p: f64) -> Result<Bernoulli> {
    Bernoulli::new(p).map_err(|e| ExperimentError::invalid(format!("{}: {}", name, e)))
}

/// Simulate an experiment with `n_users` per group
///
/// Draws `n_users` Bernoulli(`cr_control`) outcomes followed by `n_users`
/// Bernoulli(`cr_treatment`) outcomes from `rng`.
///
/// # Example
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use splitcheck::simulation::{simulate, Group};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let outcomes = simulate(1000, 0.10, 0.12, &mut rng).unwrap();
/// assert_eq!(outcomes.group(Group::Control).len(), 1000);
/// assert_eq!(outcomes.group(Group::Treatment).len(), 1000);
/// ```
pub fn simulate<R: Rng + ?Sized>(
    n_users: u64,
    cr_control: f64,
    cr_treatment: f64,
    rng: &mut R,
) -> Result<TrialOutcomeSet> {
    validate_inputs(n_users, cr_control, cr_treatment)?;
    let control = bernoulli("cr_control", cr_control)?;
    let treatment = bernoulli("cr_treatment", cr_treatment)?;

    let per_group = usize::try_from(n_users)
        .map_err(|_| ExperimentError::invalid(format!("n_users too large: {}", n_users)))?;

    let mut records = Vec::with_capacity(per_group.saturating_mul(2));
    records.extend((0..per_group).map(|_| TrialRecord {
        group: Group::Control,
        converted: control.sample(rng),
    }));
    records.extend((0..per_group).map(|_| TrialRecord {
        group: Group::Treatment,
        converted: treatment.sample(rng),
    }));

    tracing::debug!(
        n_users,
        cr_control,
        cr_treatment,
        "simulated experiment outcomes"
    );

    Ok(TrialOutcomeSet {
        records,
        users_per_group: n_users,
    })
}

/// Simulate with a fresh `StdRng` seeded from `seed`
pub fn simulate_seeded(
    n_users: u64,
    cr_control: f64,
    cr_treatment: f64,
    seed: u64,
) -> Result<TrialOutcomeSet> {
    let mut rng = StdRng::seed_from_u64(seed);
    simulate(n_users, cr_control, cr_treatment, &mut rng)
}
