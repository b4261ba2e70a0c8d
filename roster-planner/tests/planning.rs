use std::time::Duration;

use chrono::NaiveDate;

use roster_planner::config::{HeadcountRequirements, RoleRequirements};
use roster_planner::eligibility::EligibilityTable;
use roster_planner::lp::{LinearModel, SolverOptions, SolverOutput};
use roster_planner::model::{
    AvailabilityEntry, AvailabilityMatrix, Grade, Person, PriorityTable, Qualification, Registry, Requirement, Role,
    Slot,
};
use roster_planner::schedule::Category;
use roster_planner::{
    logging, ConstraintMode, MilpBackend, PlanError, PlanOutcome, Planner, PlannerConfig, PlanningInput, SolveStatus,
    SolverBackend,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
}

fn slot(n: u8) -> Slot {
    Slot::new(n).unwrap()
}

fn person(id: &str, grade: u8, quals: &[Qualification]) -> Person {
    Person::new(id, id.to_uppercase(), Grade::new(grade).unwrap()).with_qualifications(quals.iter().copied())
}

/// Everyone available on every slot of every listed day.
fn open_availability(ids: &[&str], days: &[NaiveDate]) -> AvailabilityMatrix {
    let mut matrix = AvailabilityMatrix::new();
    for id in ids {
        for &d in days {
            for s in Slot::ALL {
                matrix.insert(*id, d, s, AvailabilityEntry::available(1.0)).unwrap();
            }
        }
    }
    matrix
}

fn config(headcount: [u32; 3], roles: &[(Role, u32)], soft: bool) -> PlannerConfig {
    let mut role_requirements = RoleRequirements::none();
    for &(role, count) in roles {
        role_requirements.set(role, count);
    }
    let mut config = PlannerConfig {
        headcount: HeadcountRequirements {
            slot1: headcount[0],
            slot2: headcount[1],
            slot4: headcount[2],
        },
        roles: role_requirements,
        soft_constraints: soft,
        ..PlannerConfig::default()
    };
    config.solver.time_budget_secs = 30.0;
    config
}

fn plan(input: &PlanningInput, config: PlannerConfig) -> PlanOutcome {
    logging::init_test();
    Planner::new(config, MilpBackend::new()).unwrap().plan(input).unwrap()
}

/// Coverage identities, role exclusivity, availability and eligibility.
fn assert_roster_invariants(input: &PlanningInput, config: &PlannerConfig, outcome: &PlanOutcome) {
    let days = input.horizon().unwrap();
    let eligibility = EligibilityTable::build(&input.registry);
    let roster = &outcome.roster;

    for &d in &days {
        for s in Slot::HEADCOUNT {
            let req = Requirement::Headcount(s);
            assert_eq!(
                roster.filled(d, req) + roster.shortage(d, req),
                config.required_headcount(s),
                "{} {}",
                d,
                req
            );
        }
        for role in Role::ALL {
            let req = Requirement::Role(role);
            assert_eq!(
                roster.filled(d, req) + roster.shortage(d, req),
                config.required_role(role),
                "{} {}",
                d,
                req
            );
        }
        for p in input.registry.iter() {
            assert!(roster.roles_of(&p.id, d).len() <= 1, "{} holds several roles on {}", p.id, d);
        }
    }

    for row in &roster.rows {
        let Some(id) = row.person_id.as_deref() else {
            assert_eq!(row.category, Category::Shortage);
            assert!(row.shortage_count.unwrap() > 0);
            continue;
        };
        assert!(input.availability.is_available(id, row.day, row.slot), "{} unavailable on {}", id, row.day);
        if let Some(role) = row.role {
            let index = input.registry.position(id).unwrap();
            assert!(eligibility.allows(index, role), "{} not eligible for {}", id, role);
        }
    }
}

#[test]
fn trivial_case_fills_the_single_seat() {
    let days = [day(1)];
    let ids = ["a", "b", "c"];
    let registry = Registry::new(ids.iter().map(|id| person(id, 3, &[])).collect()).unwrap();
    let input = PlanningInput::new(registry, open_availability(&ids, &days), PriorityTable::new());
    let config = config([1, 0, 0], &[(Role::AmbulanceChief, 1)], true);

    let outcome = plan(&input, config.clone());
    assert_roster_invariants(&input, &config, &outcome);

    let headcount: Vec<_> = outcome
        .roster
        .rows
        .iter()
        .filter(|r| r.category == Category::Headcount)
        .collect();
    assert_eq!(headcount.len(), 1);
    assert_eq!(headcount[0].slot, slot(1));
    assert_eq!(outcome.roster.total_shortage(), 0);
    assert_eq!(outcome.report.status, SolveStatus::Optimal);
    assert!(outcome.report.optimal);
}

#[test]
fn uncoverable_role_is_reported_as_shortage() {
    let days = [day(1)];
    let ids = ["a", "b"];
    let registry = Registry::new(ids.iter().map(|id| person(id, 1, &[Qualification::Suap])).collect()).unwrap();
    let input = PlanningInput::new(registry, open_availability(&ids, &days), PriorityTable::new());
    let config = config([0, 0, 0], &[(Role::EngineChief, 2)], true);

    let outcome = plan(&input, config.clone());
    assert_roster_invariants(&input, &config, &outcome);

    let req = Requirement::Role(Role::EngineChief);
    assert_eq!(outcome.roster.filled(day(1), req), 0);
    assert_eq!(outcome.roster.shortage(day(1), req), 2);
    let shortage_rows: Vec<_> = outcome
        .roster
        .rows
        .iter()
        .filter(|r| r.category == Category::Shortage)
        .collect();
    assert_eq!(shortage_rows.len(), 1);
    assert_eq!(shortage_rows[0].slot, Slot::STANDBY);
    assert_eq!(shortage_rows[0].shortage_count, Some(2));
    assert_eq!(outcome.report.role_shortage, 2);
    assert!(!outcome.diagnostics.is_clear());
}

#[test]
fn one_person_never_holds_two_roles() {
    let days = [day(1)];
    let registry = Registry::new(vec![person("adj", 4, &[Qualification::Inc])]).unwrap();
    let input = PlanningInput::new(registry, open_availability(&["adj"], &days), PriorityTable::new());
    let config = config([0, 0, 0], &[(Role::AmbulanceChief, 2), (Role::EngineChief, 2)], true);

    let outcome = plan(&input, config.clone());
    assert_roster_invariants(&input, &config, &outcome);

    assert_eq!(outcome.roster.roles_of("adj", day(1)).len(), 1);
    assert_eq!(outcome.report.role_shortage, 3);
    // Each role on its own is short of supply.
    assert_eq!(outcome.diagnostics.shortfalls.len(), 2);
}

#[test]
fn symmetric_people_share_the_standby_days() {
    let days = [day(1), day(2)];
    let ids = ["a", "b"];
    let registry = Registry::new(ids.iter().map(|id| person(id, 3, &[])).collect()).unwrap();
    let input = PlanningInput::new(registry, open_availability(&ids, &days), PriorityTable::new());
    let config = config([0, 0, 0], &[(Role::AmbulanceChief, 1)], true);

    let outcome = plan(&input, config.clone());
    assert_roster_invariants(&input, &config, &outcome);

    assert_eq!(outcome.report.spread, 0);
    for count in &outcome.report.duty_counts {
        assert_eq!(count.standby_days, 1, "{} worked {}", count.person_id, count.standby_days);
    }
}

#[test]
fn identical_inputs_give_identical_shortage_and_objective() {
    let days = [day(1), day(2), day(3)];
    let ids = ["a", "b", "c", "d"];
    let registry = Registry::new(vec![
        person("a", 4, &[Qualification::Inc, Qualification::Suap]),
        person("b", 3, &[Qualification::Suap, Qualification::Cod0, Qualification::B]),
        person("c", 1, &[Qualification::Inc]),
        person("d", 2, &[]),
    ])
    .unwrap();
    let mut availability = open_availability(&ids, &days);
    availability
        .insert("c", day(2), Slot::STANDBY, AvailabilityEntry::unavailable())
        .unwrap();
    let input = PlanningInput::new(registry, availability, PriorityTable::new());
    let config = config(
        [2, 1, 0],
        &[(Role::AmbulanceChief, 1), (Role::AmbulanceDriver, 1), (Role::EngineFireEquipier, 1)],
        true,
    );

    let first = plan(&input, config.clone());
    let second = plan(&input, config.clone());
    assert_roster_invariants(&input, &config, &first);
    assert_eq!(first.roster.total_shortage(), second.roster.total_shortage());
    assert!((first.report.objective - second.report.objective).abs() < 1e-6);
}

#[test]
fn weak_shortage_penalty_still_prefers_filling() {
    let days = [day(1)];
    let registry = Registry::new(vec![person("sap", 1, &[Qualification::Suap])]).unwrap();
    let mut priorities = PriorityTable::new();
    priorities.insert(Grade::MIN, Role::AmbulanceCareEquipier, 10);
    let input = PlanningInput::new(registry, open_availability(&["sap"], &days), priorities);
    let mut config = config([0, 0, 0], &[(Role::AmbulanceCareEquipier, 1)], true);
    config.weights.role_shortage = 1.0;

    let outcome = plan(&input, config.clone());
    assert_roster_invariants(&input, &config, &outcome);
    assert_eq!(outcome.roster.filled(day(1), Requirement::Role(Role::AmbulanceCareEquipier)), 1);
    assert_eq!(outcome.report.total_shortage(), 0);
    assert!(outcome.report.penalties.role > 45.0);
}

#[test]
fn hard_mode_reports_infeasibility_with_context() {
    logging::init_test();
    let days = [day(1), day(2)];
    let ids = ["a", "b"];
    let registry = Registry::new(ids.iter().map(|id| person(id, 1, &[])).collect()).unwrap();
    let input = PlanningInput::new(registry, open_availability(&ids, &days), PriorityTable::new());
    let config = config([1, 0, 0], &[(Role::EngineChief, 1)], false);

    let err = Planner::new(config, MilpBackend::new()).unwrap().plan(&input).unwrap_err();
    match err {
        PlanError::Infeasible { mode, days, persons } => {
            assert_eq!(mode, ConstraintMode::Hard);
            assert_eq!(days, 2);
            assert_eq!(persons, 2);
        }
        other => panic!("expected infeasibility, got {:?}", other),
    }
}

#[test]
fn hard_mode_solves_when_supply_suffices() {
    let days = [day(1)];
    let ids = ["a", "b"];
    let registry = Registry::new(ids.iter().map(|id| person(id, 3, &[])).collect()).unwrap();
    let input = PlanningInput::new(registry, open_availability(&ids, &days), PriorityTable::new());
    let config = config([2, 0, 1], &[(Role::AmbulanceChief, 2)], false);

    let outcome = plan(&input, config.clone());
    assert_roster_invariants(&input, &config, &outcome);
    assert!(outcome.roster.rows.iter().all(|r| r.category != Category::Shortage));
}

/// Person holding the single standby role of `d`.
fn standby_holder(outcome: &PlanOutcome, d: NaiveDate) -> String {
    let holders: Vec<&str> = outcome
        .roster
        .rows
        .iter()
        .filter(|r| r.day == d && r.category == Category::Role)
        .filter_map(|r| r.person_id.as_deref())
        .collect();
    assert_eq!(holders.len(), 1, "{} has {:?}", d, holders);
    holders[0].to_string()
}

#[test]
fn rest_term_alternates_single_day_streaks() {
    let days = [day(1), day(2), day(3)];
    let ids = ["a", "b"];
    let registry = Registry::new(ids.iter().map(|id| person(id, 3, &[])).collect()).unwrap();
    let input = PlanningInput::new(registry, open_availability(&ids, &days), PriorityTable::new());
    let mut config = config([0, 0, 0], &[(Role::AmbulanceChief, 1)], true);
    config.max_consecutive_standby_days = 1;

    let outcome = plan(&input, config.clone());
    assert_roster_invariants(&input, &config, &outcome);

    let holders: Vec<String> = days.iter().map(|&d| standby_holder(&outcome, d)).collect();
    assert_ne!(holders[0], holders[1]);
    assert_ne!(holders[1], holders[2]);
    assert_eq!(outcome.report.consecutive_overage, 0);
    assert_eq!(outcome.report.spread, 1);
}

#[test]
fn priority_term_picks_the_preferred_grade() {
    let days = [day(1)];
    let ids = ["sgt", "adj"];
    let registry = Registry::new(vec![person("sgt", 3, &[]), person("adj", 4, &[])]).unwrap();
    let mut priorities = PriorityTable::new();
    priorities.insert(Grade::new(3).unwrap(), Role::AmbulanceChief, 1);
    priorities.insert(Grade::new(4).unwrap(), Role::AmbulanceChief, 4);
    let input = PlanningInput::new(registry, open_availability(&ids, &days), priorities);
    let config = config([0, 0, 0], &[(Role::AmbulanceChief, 1)], true);

    let outcome = plan(&input, config.clone());
    assert_roster_invariants(&input, &config, &outcome);

    assert_eq!(standby_holder(&outcome, day(1)), "sgt");
    assert_eq!(outcome.report.priority_penalty, 0);
}

#[test]
fn preference_term_picks_the_keener_volunteer() {
    let days = [day(1)];
    let ids = ["a", "b"];
    let registry = Registry::new(ids.iter().map(|id| person(id, 1, &[])).collect()).unwrap();
    let mut availability = open_availability(&ids, &days);
    availability
        .insert("b", day(1), slot(1), AvailabilityEntry::available(5.0))
        .unwrap();
    let input = PlanningInput::new(registry, availability, PriorityTable::new());
    let config = config([1, 0, 0], &[], true);

    let outcome = plan(&input, config.clone());
    assert_roster_invariants(&input, &config, &outcome);

    let seated: Vec<&str> = outcome
        .roster
        .rows
        .iter()
        .filter(|r| r.category == Category::Headcount)
        .filter_map(|r| r.person_id.as_deref())
        .collect();
    assert_eq!(seated, ["b"]);
    assert_eq!(outcome.report.preference_bonus, 5.0);
}

/// Backend that never finishes within its budget.
struct ExhaustedBackend;

impl SolverBackend for ExhaustedBackend {
    fn name(&self) -> &str {
        "exhausted"
    }

    fn solve(&self, _model: &LinearModel, _options: &SolverOptions) -> roster_planner::Result<SolverOutput> {
        Ok(SolverOutput::unknown())
    }
}

/// Backend that claims every model is infeasible.
struct RefusingBackend;

impl SolverBackend for RefusingBackend {
    fn name(&self) -> &str {
        "refusing"
    }

    fn solve(&self, _model: &LinearModel, _options: &SolverOptions) -> roster_planner::Result<SolverOutput> {
        Ok(SolverOutput::infeasible())
    }
}

#[test]
fn timeout_falls_back_to_a_non_optimal_incumbent() {
    logging::init_test();
    let days = [day(1), day(2), day(3), day(4)];
    let ids = ["a", "b", "c"];
    let registry = Registry::new(vec![
        person("a", 4, &[Qualification::Inc]),
        person("b", 3, &[Qualification::Suap]),
        person("c", 1, &[Qualification::Suap]),
    ])
    .unwrap();
    let input = PlanningInput::new(registry, open_availability(&ids, &days), PriorityTable::new());
    let config = config(
        [1, 2, 4],
        &[(Role::AmbulanceChief, 1), (Role::AmbulanceCareEquipier, 2), (Role::EngineChief, 1)],
        true,
    );

    let outcome = Planner::new(config.clone(), ExhaustedBackend).unwrap().plan(&input).unwrap();
    assert_roster_invariants(&input, &config, &outcome);
    assert_eq!(outcome.report.status, SolveStatus::Feasible);
    assert!(!outcome.report.optimal);
    // Four seats on slot 4 from three people.
    assert_eq!(outcome.report.headcount_shortage, 4);
}

#[test]
fn hard_mode_timeout_without_coverage_is_no_solution() {
    logging::init_test();
    let days = [day(1)];
    let registry = Registry::new(vec![person("a", 1, &[])]).unwrap();
    let input = PlanningInput::new(registry, open_availability(&["a"], &days), PriorityTable::new());
    let mut config = config([2, 0, 0], &[], false);
    config.solver.time_budget_secs = 1.5;

    let err = Planner::new(config, ExhaustedBackend).unwrap().plan(&input).unwrap_err();
    match err {
        PlanError::NoSolution { mode, budget } => {
            assert_eq!(mode, ConstraintMode::Hard);
            assert_eq!(budget, Duration::from_millis(1500));
        }
        other => panic!("expected no solution, got {:?}", other),
    }
}

#[test]
fn infeasible_soft_model_is_surfaced() {
    logging::init_test();
    let days = [day(1)];
    let registry = Registry::new(vec![person("a", 3, &[])]).unwrap();
    let input = PlanningInput::new(registry, open_availability(&["a"], &days), PriorityTable::new());
    let config = config([1, 0, 0], &[], true);

    let err = Planner::new(config, RefusingBackend).unwrap().plan(&input).unwrap_err();
    assert!(matches!(err, PlanError::Infeasible { mode: ConstraintMode::Soft, days: 1, persons: 1 }));
}

#[test]
fn empty_inputs_fail_before_solving() {
    let registry = Registry::new(vec![person("a", 3, &[])]).unwrap();
    let input = PlanningInput::new(registry, AvailabilityMatrix::new(), PriorityTable::new());
    let planner = Planner::new(PlannerConfig::default(), RefusingBackend).unwrap();
    assert!(matches!(planner.plan(&input), Err(PlanError::EmptyHorizon)));
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    let mut config = PlannerConfig::default();
    config.weights.fairness = f64::NAN;
    assert!(matches!(
        Planner::new(config, MilpBackend::new()),
        Err(PlanError::InvalidConfig(_))
    ));

    let mut config = PlannerConfig::default();
    config.solver.time_budget_secs = 1e30;
    assert!(matches!(
        Planner::new(config, MilpBackend::new()),
        Err(PlanError::InvalidConfig(_))
    ));
}

#[test]
fn independent_runs_proceed_in_parallel() {
    let days = [day(1), day(2)];
    let ids = ["a", "b"];
    let registry = Registry::new(ids.iter().map(|id| person(id, 3, &[])).collect()).unwrap();
    let input = PlanningInput::new(registry, open_availability(&ids, &days), PriorityTable::new());
    let config = config([1, 0, 0], &[(Role::AmbulanceChief, 1)], true);
    let planner = Planner::new(config, MilpBackend::new()).unwrap();

    let outcomes: Vec<PlanOutcome> = std::thread::scope(|scope| {
        let runs: Vec<_> = (0..2).map(|_| scope.spawn(|| planner.plan(&input).unwrap())).collect();
        runs.into_iter().map(|run| run.join().unwrap()).collect()
    });
    assert_eq!(outcomes[0].roster.total_shortage(), outcomes[1].roster.total_shortage());
    assert_eq!(outcomes[0].report.spread, 0);
}
