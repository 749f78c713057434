//! Read-only aggregates for the dashboards.
//!
//! Everything is computed from a [`Snapshot`] loaded once, so a dashboard
//! costs one list call per collection regardless of how many programs exist.

use crate::action::Action;
use crate::deliverable::Deliverable;
use crate::error::Result;
use crate::evidence::Evidence;
use crate::indicator::Indicator;
use crate::program::Program;
use crate::readiness::{self, Readiness};
use crate::repository::{Repository, RepositoryExt};
use crate::risk::Risk;
use crate::types::ActionStatus;
use crate::unit::Unit;
use crate::user::UserProfile;
use serde::Serialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

pub struct Snapshot {
    pub units: Vec<Unit>,
    pub programs: Vec<Program>,
    pub actions: Vec<Action>,
    pub indicators: Vec<Indicator>,
    pub deliverables: Vec<Deliverable>,
    pub evidence: Vec<Evidence>,
    pub risks: Vec<Risk>,
}

impl Snapshot {
    pub fn load<R: Repository + ?Sized>(repo: &R) -> Result<Self> {
        Ok(Self {
            units: repo.list_all()?,
            programs: repo.list_all()?,
            actions: repo.list_all()?,
            indicators: repo.list_all()?,
            deliverables: repo.list_all()?,
            evidence: repo.list_all()?,
            risks: repo.list_all()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub not_started: usize,
    pub in_progress: usize,
    pub delayed: usize,
    pub completed: usize,
    pub total: usize,
}

impl StatusCounts {
    fn add(&mut self, status: ActionStatus) {
        match status {
            ActionStatus::NotStarted => self.not_started += 1,
            ActionStatus::InProgress => self.in_progress += 1,
            ActionStatus::Delayed => self.delayed += 1,
            ActionStatus::Completed => self.completed += 1,
        }
        self.total += 1;
    }

    fn merge(&mut self, other: &StatusCounts) {
        self.not_started += other.not_started;
        self.in_progress += other.in_progress;
        self.delayed += other.delayed;
        self.completed += other.completed;
        self.total += other.total;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgramSummary {
    pub program_id: String,
    pub name: String,
    pub unit_id: String,
    pub axis_id: String,
    pub actions: StatusCounts,
    /// Completed weight over total weight, 0–100.
    pub progress_percent: f64,
    pub indicators: usize,
    pub deliverables: usize,
    pub evidence: usize,
    pub risks: usize,
    pub max_risk_severity: Option<u8>,
    pub readiness: Readiness,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitSummary {
    pub unit_id: String,
    pub name: String,
    pub acronym: String,
    pub actions: StatusCounts,
    pub programs: Vec<ProgramSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub units: Vec<UnitSummary>,
    pub totals: StatusCounts,
    /// `risk_matrix[impact - 1][probability - 1]` = number of risks.
    pub risk_matrix: [[usize; 5]; 5],
}

/// Weighted completion of `actions` as a percentage.
pub fn weighted_progress(actions: &[&Action]) -> f64 {
    let total: f64 = actions.iter().map(|a| a.weight).sum();
    if total <= 0.0 {
        return 0.0;
    }
    let done: f64 = actions
        .iter()
        .filter(|a| a.status == ActionStatus::Completed)
        .map(|a| a.weight)
        .sum();
    done / total * 100.0
}

fn count_by<'a, I>(keys: I) -> HashMap<&'a str, usize>
where
    I: Iterator<Item = &'a str>,
{
    let mut map = HashMap::new();
    for k in keys {
        *map.entry(k).or_insert(0) += 1;
    }
    map
}

impl Snapshot {
    pub fn program_summary(&self, program: &Program) -> ProgramSummary {
        let actions: Vec<&Action> = self
            .actions
            .iter()
            .filter(|a| a.program_id == program.id)
            .collect();
        let indicators: Vec<Indicator> = self
            .indicators
            .iter()
            .filter(|i| i.program_id == program.id)
            .cloned()
            .collect();
        let risks: Vec<&Risk> = self
            .risks
            .iter()
            .filter(|r| r.program_id == program.id)
            .collect();

        let deliverables_by_action =
            count_by(self.deliverables.iter().map(|d| d.action_id.as_str()));
        let evidence_by_action = count_by(self.evidence.iter().map(|e| e.action_id.as_str()));

        let mut counts = StatusCounts::default();
        for a in &actions {
            counts.add(a.status);
        }
        let of = |map: &HashMap<&str, usize>| -> usize {
            actions
                .iter()
                .map(|a| map.get(a.id.as_str()).copied().unwrap_or(0))
                .sum()
        };

        let owned_actions: Vec<Action> = actions.iter().map(|a| (*a).clone()).collect();
        let readiness = readiness::evaluate(&indicators, &owned_actions, |id| {
            deliverables_by_action.get(id).copied().unwrap_or(0)
        });

        ProgramSummary {
            program_id: program.id.clone(),
            name: program.name.clone(),
            unit_id: program.unit_id.clone(),
            axis_id: program.axis_id.clone(),
            progress_percent: weighted_progress(&actions),
            actions: counts,
            indicators: indicators.len(),
            deliverables: of(&deliverables_by_action),
            evidence: of(&evidence_by_action),
            risks: risks.len(),
            max_risk_severity: risks.iter().map(|r| r.severity).max(),
            readiness,
        }
    }

    pub fn unit_summary(&self, unit: &Unit) -> UnitSummary {
        let programs: Vec<ProgramSummary> = self
            .programs
            .iter()
            .filter(|p| p.unit_id == unit.id)
            .map(|p| self.program_summary(p))
            .collect();
        let mut actions = StatusCounts::default();
        for p in &programs {
            actions.merge(&p.actions);
        }
        UnitSummary {
            unit_id: unit.id.clone(),
            name: unit.name.clone(),
            acronym: unit.acronym.clone(),
            actions,
            programs,
        }
    }

    /// Dashboard across every unit `viewer` may see (all units when `None`).
    pub fn overview(&self, viewer: Option<&UserProfile>) -> Overview {
        let units: Vec<UnitSummary> = self
            .units
            .iter()
            .filter(|u| viewer.map_or(true, |v| v.can_view(&u.id)))
            .map(|u| self.unit_summary(u))
            .collect();

        let mut totals = StatusCounts::default();
        for u in &units {
            totals.merge(&u.actions);
        }

        let visible: std::collections::HashSet<&str> = units
            .iter()
            .flat_map(|u| u.programs.iter().map(|p| p.program_id.as_str()))
            .collect();
        let mut risk_matrix = [[0usize; 5]; 5];
        for r in self
            .risks
            .iter()
            .filter(|r| visible.contains(r.program_id.as_str()))
        {
            if (1..=5).contains(&r.impact) && (1..=5).contains(&r.probability) {
                risk_matrix[r.impact as usize - 1][r.probability as usize - 1] += 1;
            }
        }

        Overview {
            units,
            totals,
            risk_matrix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqlStore;
    use crate::types::Role;
    use crate::unit::default_axes;

    struct Fixture {
        repo: SqlStore,
        unit: Unit,
        other_unit: Unit,
        program: Program,
    }

    fn fixture() -> Fixture {
        let repo = SqlStore::open_in_memory().unwrap();
        let unit = Unit::new("Secretaria de Educação", "SEMED");
        let other_unit = Unit::new("Secretaria de Obras", "SEMOB");
        repo.insert_record(&unit).unwrap();
        repo.insert_record(&other_unit).unwrap();
        let axis = default_axes().remove(0);
        repo.insert_record(&axis).unwrap();
        let program = Program::new(&unit.id, &axis.id, "Escola Integral");
        Program::create(&repo, &program, 5).unwrap();
        Fixture {
            repo,
            unit,
            other_unit,
            program,
        }
    }

    #[test]
    fn progress_is_weighted() {
        let mut done = Action::new("p", "done");
        done.status = ActionStatus::Completed;
        done.weight = 3.0;
        let open = Action::new("p", "open");
        assert_eq!(weighted_progress(&[&done, &open]), 75.0);
        assert_eq!(weighted_progress(&[]), 0.0);
    }

    #[test]
    fn zero_weight_progress_is_zero() {
        let mut a = Action::new("p", "a");
        a.weight = 0.0;
        a.status = ActionStatus::Completed;
        assert_eq!(weighted_progress(&[&a]), 0.0);
    }

    #[test]
    fn program_summary_counts_children() {
        let f = fixture();
        let mut a1 = Action::new(&f.program.id, "A1");
        a1.status = ActionStatus::Delayed;
        let a2 = Action::new(&f.program.id, "A2");
        f.repo.insert_record(&a1).unwrap();
        f.repo.insert_record(&a2).unwrap();
        f.repo
            .insert_record(&Deliverable::new(&a1.id, "Salas", 3.0, "salas"))
            .unwrap();
        f.repo
            .insert_record(&Evidence::new(&a1.id, "Foto", "https://x/1.jpg"))
            .unwrap();
        f.repo
            .insert_record(&Risk::new(&f.program.id, "Chuva", 4, 4))
            .unwrap();
        f.repo
            .insert_record(&Risk::new(&f.program.id, "Greve", 2, 3))
            .unwrap();

        let snap = Snapshot::load(&f.repo).unwrap();
        let s = snap.program_summary(&f.program);
        assert_eq!(s.actions.total, 2);
        assert_eq!(s.actions.delayed, 1);
        assert_eq!(s.actions.not_started, 1);
        assert_eq!(s.deliverables, 1);
        assert_eq!(s.evidence, 1);
        assert_eq!(s.risks, 2);
        assert_eq!(s.max_risk_severity, Some(16));
        assert!(!s.readiness.is_valid);
        // no indicator + A2 without deliverable
        assert_eq!(s.readiness.errors.len(), 2);
    }

    #[test]
    fn overview_respects_viewer_scope() {
        let f = fixture();
        f.repo
            .insert_record(&Risk::new(&f.program.id, "Chuva", 5, 1))
            .unwrap();
        let snap = Snapshot::load(&f.repo).unwrap();

        let all = snap.overview(None);
        assert_eq!(all.units.len(), 2);
        assert_eq!(all.risk_matrix[4][0], 1);

        let gestor = UserProfile::new("Ana", Role::Gestor).in_unit(&f.other_unit.id);
        let scoped = snap.overview(Some(&gestor));
        assert_eq!(scoped.units.len(), 1);
        assert_eq!(scoped.units[0].unit_id, f.other_unit.id);
        assert_eq!(scoped.risk_matrix[4][0], 0);

        let unit = snap.unit_summary(&f.unit);
        assert_eq!(unit.programs.len(), 1);
    }
}
