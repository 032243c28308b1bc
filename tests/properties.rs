//! Property tests over small random rosters.

use proptest::prelude::*;

use u_roster::builder::{is_eligible, RosterModelBuilder};
use u_roster::lp::SolveStatus;
use u_roster::models::{
    AvailabilityEdge, Nurse, Parameters, RosterInstance, Shift, SkillCompatibility, SkillLevel,
};
use u_roster::scheduler::generate_schedule;
use u_roster::validation::validate_instance;

const TOL: f64 = 1e-6;

fn skill(icu: bool) -> SkillLevel {
    if icu {
        SkillLevel::Icu
    } else {
        SkillLevel::General
    }
}

fn roster_strategy() -> impl Strategy<Value = (RosterInstance, Parameters)> {
    (1usize..=4, 1usize..=4).prop_flat_map(|(nn, ns)| {
        (
            prop::collection::vec(
                (
                    any::<bool>(),
                    prop::sample::select(vec![8.0f64, 16.0, 24.0, 40.0]),
                ),
                nn,
            ),
            prop::collection::vec(
                (any::<bool>(), prop::sample::select(vec![4.0f64, 8.0, 12.0]), 0i32..=3),
                ns,
            ),
            prop::collection::vec(any::<bool>(), nn * ns),
            prop::collection::vec(prop::option::of(-5.0f64..5.0), nn * ns),
            (any::<bool>(), any::<bool>(), any::<bool>()),
            (0.0f64..20.0, 0.0f64..20.0, 0.0f64..3.0),
        )
            .prop_map(
                move |(nurses, shifts, avail, prefs, (ot, us, exact), (w_ot, w_us, w_pref))| {
                    let mut instance = RosterInstance::new();
                    for (i, (icu, cap)) in nurses.into_iter().enumerate() {
                        instance =
                            instance.with_nurse(Nurse::new(format!("N{i}"), skill(icu), cap));
                    }
                    for (j, (icu, hours, demand)) in shifts.into_iter().enumerate() {
                        let shift = Shift::new(format!("S{j}"), hours, demand, skill(icu));
                        instance = instance.with_shift(shift);
                    }
                    for i in 0..nn {
                        for j in 0..ns {
                            let k = i * ns + j;
                            instance = instance.with_availability(AvailabilityEdge::new(
                                format!("N{i}"),
                                format!("S{j}"),
                                avail[k],
                            ));
                            if let Some(score) = prefs[k] {
                                instance = instance.with_preference(
                                    format!("N{i}"),
                                    format!("S{j}"),
                                    score,
                                );
                            }
                        }
                    }
                    let rule = if exact {
                        SkillCompatibility::Exact
                    } else {
                        SkillCompatibility::Hierarchical
                    };
                    let params = Parameters::default()
                        .with_overtime(ot)
                        .with_understaffing(us)
                        .with_overtime_weight(w_ot)
                        .with_understaff_weight(w_us)
                        .with_preference_weight(w_pref)
                        .with_skill_compatibility(rule);
                    (instance, params)
                },
            )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn variables_exist_only_for_eligible_pairs((instance, params) in roster_strategy()) {
        let validated = validate_instance(instance).unwrap();
        let built = RosterModelBuilder::new(&validated, &params).build();

        for n in 0..validated.nurses().len() {
            for s in 0..validated.shifts().len() {
                let eligible = is_eligible(&validated, params.skill_compatibility, n, s);
                prop_assert_eq!(built.index.assignment_var(n, s).is_some(), eligible);
            }
        }
        prop_assert_eq!(built.index.overtime_vars().is_some(), params.allow_overtime);
        prop_assert_eq!(built.index.unmet_vars().is_some(), params.allow_understaffing);
    }

    #[test]
    fn solved_plans_cover_demand_and_respect_hours((instance, params) in roster_strategy()) {
        let r = generate_schedule(instance.clone(), &params).unwrap();

        if r.status == SolveStatus::Infeasible {
            // All-slack is always feasible when understaffing is allowed
            prop_assert!(!params.allow_understaffing);
            return Ok(());
        }
        prop_assert_eq!(r.status, SolveStatus::Optimal);
        let plan = r.plan.unwrap();

        if !params.allow_understaffing {
            prop_assert!(plan.unmet_by_shift.is_none());
        }
        for shift in &instance.shifts {
            let covered =
                plan.nurse_count_for_shift(&shift.id) as f64 + plan.unmet_for(&shift.id);
            prop_assert!(covered + TOL >= f64::from(shift.demand));
        }

        for nurse in &instance.nurses {
            let worked: f64 = plan
                .assignments_for_nurse(&nurse.id)
                .iter()
                .filter_map(|a| instance.shifts.iter().find(|s| s.id == a.shift_id))
                .map(|s| s.hours)
                .sum();
            let ot = plan.overtime_for(&nurse.id);
            if !params.allow_overtime {
                prop_assert!(ot.abs() < TOL);
            }
            prop_assert!(worked <= nurse.max_hours_per_week + ot + TOL);
        }
    }

    #[test]
    fn repeated_runs_agree((instance, params) in roster_strategy()) {
        let first = generate_schedule(instance.clone(), &params).unwrap();
        let second = generate_schedule(instance, &params).unwrap();

        prop_assert_eq!(first.status, second.status);
        match (first.objective_value(), second.objective_value()) {
            (Some(a), Some(b)) => prop_assert!((a - b).abs() < TOL),
            (None, None) => {}
            _ => prop_assert!(false, "plan presence differs between runs"),
        }
    }
}
