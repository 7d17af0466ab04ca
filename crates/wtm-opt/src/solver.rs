//! Model construction, solve invocation, and result extraction.
//!
//! Exact mixed binary formulation solved through HiGHS. The pipeline is
//! build → solve → extract: each stage consumes or borrows the previous
//! stage's value, so extraction can never run against a failed solve.

use crate::costs::MaintenanceCosts;
use crate::error::{MaintenanceError, MaintenanceResult};
use crate::problem::{MaintenanceProblem, ProblemIndex};
use crate::solution::{MaintenanceDecision, MaintenanceOutcome};
use chrono::NaiveDate;
use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, Constraint, Expression, ResolutionError, Solution,
    SolverModel, Variable,
};
use std::collections::BTreeMap;
use std::time::Instant;
use wtm_core::FaultKind;

/// An assembled, not-yet-solved maintenance model.
///
/// Holds the variable families keyed by fault type / (fault type, day), the
/// coverage and exclusivity constraints, and the objective expression.
pub struct MaintenanceModel {
    vars: good_lp::ProblemVariables,
    objective: Expression,
    constraints: Vec<Constraint>,
    internal: BTreeMap<FaultKind, Variable>,
    external: BTreeMap<(FaultKind, NaiveDate), Variable>,
    preventative: BTreeMap<FaultKind, Variable>,
    costs: MaintenanceCosts,
    index: ProblemIndex,
}

impl MaintenanceModel {
    /// Number of internal maintenance variables (one per active fault type).
    pub fn num_internal_vars(&self) -> usize {
        self.internal.len()
    }

    /// Number of external maintenance variables (one per observed pair).
    pub fn num_external_vars(&self) -> usize {
        self.external.len()
    }

    /// Number of preventative maintenance variables.
    pub fn num_preventative_vars(&self) -> usize {
        self.preventative.len()
    }

    /// Number of coverage + exclusivity constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Whether any variable family covers the given fault type.
    pub fn has_variables_for(&self, fault: &FaultKind) -> bool {
        self.internal.contains_key(fault) || self.preventative.contains_key(fault)
    }
}

/// Build the decision model for one problem.
///
/// Creates `internal[f]` and `preventative[f]` binaries per active fault
/// type, `external[f,d]` binaries per observed (fault type, day) pair, and
/// the coverage/exclusivity constraint pair per observed pair. A fault type
/// with no observed days keeps its internal/preventative variables free of
/// any pair constraint.
pub fn build_model(problem: &MaintenanceProblem) -> MaintenanceResult<MaintenanceModel> {
    let index = problem.index()?;
    let costs = problem.costs.clone();

    let mut vars = variables!();

    let mut internal: BTreeMap<FaultKind, Variable> = BTreeMap::new();
    let mut preventative: BTreeMap<FaultKind, Variable> = BTreeMap::new();
    for fault in &index.active_faults {
        internal.insert(fault.clone(), vars.add(variable().binary()));
        preventative.insert(fault.clone(), vars.add(variable().binary()));
    }

    let mut external: BTreeMap<(FaultKind, NaiveDate), Variable> = BTreeMap::new();
    for pair in &index.pairs {
        external.insert(pair.clone(), vars.add(variable().binary()));
    }

    // Objective: total revenue minus maintenance costs and fault losses.
    // The revenue terms are constants; the variables only carry costs.
    let mut objective = Expression::from(index.total_revenue - index.lost_revenue);
    for var in internal.values() {
        objective = objective - costs.internal_cost * *var;
    }
    for ((_, day), var) in &external {
        let month = index.day_month[day];
        objective = objective - costs.external_rate(month) * *var;
    }
    for var in preventative.values() {
        objective = objective - costs.preventative_cost * *var;
    }

    // Exactly one reactive action per observed pair: coverage forces at
    // least one of internal/external, exclusivity forbids both.
    // Preventative stays unconstrained.
    let mut constraints = Vec::with_capacity(index.pairs.len() * 2);
    for (fault, day) in &index.pairs {
        let internal_var = internal[fault];
        let external_var = external[&(fault.clone(), *day)];
        constraints.push(constraint!(internal_var + external_var >= 1.0));
        constraints.push(constraint!(internal_var + external_var <= 1.0));
    }

    Ok(MaintenanceModel {
        vars,
        objective,
        constraints,
        internal,
        external,
        preventative,
        costs,
        index,
    })
}

/// A successfully solved model with its realized variable assignment.
///
/// Only produced by [`solve`] on an optimal termination; infeasible or
/// abnormal solver outcomes surface as errors instead, so this value always
/// carries a meaningful assignment.
#[derive(Debug, Clone)]
pub struct SolvedMaintenance {
    internal: BTreeMap<FaultKind, bool>,
    external: BTreeMap<(FaultKind, NaiveDate), bool>,
    preventative: BTreeMap<FaultKind, bool>,
    objective_value: f64,
    solve_time: std::time::Duration,
    costs: MaintenanceCosts,
    index: ProblemIndex,
}

impl SolvedMaintenance {
    /// Realized objective value (revenue constants minus chosen costs).
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Wall-clock time of the solve call.
    pub fn solve_time(&self) -> std::time::Duration {
        self.solve_time
    }

    /// Whether internal maintenance was chosen for a fault type.
    pub fn internal_chosen(&self, fault: &FaultKind) -> bool {
        self.internal.get(fault).copied().unwrap_or(false)
    }

    /// Whether external maintenance was chosen for a (fault type, day) pair.
    pub fn external_chosen(&self, fault: &FaultKind, day: NaiveDate) -> bool {
        self.external
            .get(&(fault.clone(), day))
            .copied()
            .unwrap_or(false)
    }

    /// Whether preventative maintenance was chosen for a fault type.
    pub fn preventative_chosen(&self, fault: &FaultKind) -> bool {
        self.preventative.get(fault).copied().unwrap_or(false)
    }
}

/// Solve the assembled model, blocking until the solver returns.
///
/// Solver defaults apply; no time limit or custom branching is configured.
/// Infeasibility and abnormal terminations are distinguished errors, never
/// a readable assignment.
pub fn solve(model: MaintenanceModel) -> MaintenanceResult<SolvedMaintenance> {
    let MaintenanceModel {
        vars,
        objective,
        constraints,
        internal,
        external,
        preventative,
        costs,
        index,
    } = model;

    let start = Instant::now();
    let mut solver_model = vars.maximise(objective.clone()).using(highs);
    for constraint in constraints {
        solver_model = solver_model.with(constraint);
    }

    let solution = solver_model.solve().map_err(|err| match err {
        ResolutionError::Infeasible => MaintenanceError::Infeasible(
            "no assignment satisfies the coverage/exclusivity constraints".to_string(),
        ),
        other => MaintenanceError::Solver(other.to_string()),
    })?;
    let solve_time = start.elapsed();

    let realized = |var: Variable| solution.value(var) > 0.5;
    Ok(SolvedMaintenance {
        internal: internal
            .iter()
            .map(|(fault, var)| (fault.clone(), realized(*var)))
            .collect(),
        external: external
            .iter()
            .map(|(key, var)| (key.clone(), realized(*var)))
            .collect(),
        preventative: preventative
            .iter()
            .map(|(fault, var)| (fault.clone(), realized(*var)))
            .collect(),
        objective_value: solution.eval(&objective),
        solve_time,
        costs,
        index,
    })
}

/// Read the cost breakdown and chosen maintenance mix out of a solved model.
///
/// Each cost component substitutes the realized 0/1 values back into the
/// objective's cost formulas, so the reported breakdown always reconciles
/// with the objective value.
pub fn extract_results(solved: &SolvedMaintenance) -> MaintenanceOutcome {
    let costs = &solved.costs;
    let index = &solved.index;

    let optimized_internal_cost: f64 = solved
        .internal
        .values()
        .filter(|chosen| **chosen)
        .map(|_| costs.internal_cost)
        .sum();
    let optimized_external_cost: f64 = solved
        .external
        .iter()
        .filter(|(_, chosen)| **chosen)
        .map(|((_, day), _)| costs.external_rate(index.day_month[day]))
        .sum();
    let optimized_preventative_cost: f64 = solved
        .preventative
        .values()
        .filter(|chosen| **chosen)
        .map(|_| costs.preventative_cost)
        .sum();
    let total_cost =
        optimized_internal_cost + optimized_external_cost + optimized_preventative_cost;

    let mut decisions: Vec<MaintenanceDecision> = index
        .active_faults
        .iter()
        .map(|fault| MaintenanceDecision {
            fault: fault.clone(),
            internal: solved.internal_chosen(fault),
            preventative: solved.preventative_chosen(fault),
            external_days: Vec::new(),
        })
        .collect();
    for ((fault, day), chosen) in &solved.external {
        if *chosen {
            if let Some(decision) = decisions.iter_mut().find(|d| &d.fault == fault) {
                decision.external_days.push(*day);
            }
        }
    }

    MaintenanceOutcome {
        optimized_internal_cost,
        optimized_external_cost,
        optimized_preventative_cost,
        total_cost,
        // Inverts the cost subtraction in the objective. This is revenue
        // net of fault losses, not gross revenue; the field name is kept
        // for report compatibility.
        total_revenue: solved.objective_value + total_cost,
        objective_value: solved.objective_value,
        decisions,
    }
}
