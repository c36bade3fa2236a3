/*!
 * Ledger Invariant Property Tests
 * Random request / release / tick sequences never break the bookkeeping
 */

use os_sim_kernel::{Algorithm, ResourceVector, Scheduler};
use proptest::prelude::*;

const SYSTEM: [u32; 3] = [6, 4, 5];
const PIDS: [&str; 3] = ["A", "B", "C"];

#[derive(Debug, Clone)]
enum Op {
    Request(usize, [u32; 3]),
    Release(usize, [u32; 3]),
    Tick,
}

fn vector() -> impl Strategy<Value = [u32; 3]> {
    [0..=SYSTEM[0], 0..=SYSTEM[1], 0..=SYSTEM[2]]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..PIDS.len(), vector()).prop_map(|(p, v)| Op::Request(p, v)),
        2 => (0..PIDS.len(), vector()).prop_map(|(p, v)| Op::Release(p, v)),
        1 => Just(Op::Tick),
    ]
}

fn setup(algorithm: Algorithm, maxes: &[[u32; 3]; 3]) -> Scheduler {
    let mut scheduler = Scheduler::builder()
        .with_algorithm(algorithm)
        .with_system_resources(SYSTEM)
        .build()
        .unwrap();
    for (pid, max) in PIDS.iter().zip(maxes) {
        scheduler.create_process(*pid, 0, 6, 0).unwrap();
        scheduler.declare_max(pid, *max).unwrap();
    }
    scheduler.tick();
    scheduler
}

fn total_allocated(scheduler: &Scheduler) -> Vec<u32> {
    let mut total = vec![0; SYSTEM.len()];
    for record in scheduler.all_processes() {
        for (sum, held) in total.iter_mut().zip(record.claim().allocated().as_slice()) {
            *sum += held;
        }
    }
    total
}

fn check_invariants(scheduler: &Scheduler) -> Result<(), TestCaseError> {
    for record in scheduler.all_processes() {
        prop_assert!(record.claim().is_consistent(), "{} inconsistent", record.pid());
        if record.is_finished() {
            prop_assert!(record.claim().allocated().is_zero());
        }
    }

    // Nothing is created or lost: free plus held is the system total
    let allocated = total_allocated(scheduler);
    let available = scheduler.available_resources().as_slice();
    for class in 0..SYSTEM.len() {
        prop_assert_eq!(available[class] + allocated[class], SYSTEM[class]);
    }

    // Every granted state stays safe
    prop_assert!(scheduler.safe_sequence().is_some());
    Ok(())
}

proptest! {
    #[test]
    fn ledger_invariants_hold(
        maxes in [vector(), vector(), vector()],
        ops in prop::collection::vec(op(), 1..40),
        rr in any::<bool>(),
    ) {
        let algorithm = if rr { Algorithm::RoundRobin } else { Algorithm::Fcfs };
        let mut scheduler = setup(algorithm, &maxes);
        check_invariants(&scheduler)?;

        for op in ops {
            match op {
                Op::Request(p, v) => {
                    let _ = scheduler.try_request(PIDS[p], v);
                }
                Op::Release(p, v) => {
                    // Only release what is held; over-release is a caller bug
                    let held = scheduler.process(PIDS[p]).unwrap().claim().allocated().clone();
                    let amount = ResourceVector::from(v).min(&held);
                    scheduler.release(PIDS[p], amount).unwrap();
                }
                Op::Tick => {
                    scheduler.tick();
                }
            }
            check_invariants(&scheduler)?;
        }
    }

    #[test]
    fn rejected_requests_change_nothing(
        maxes in [vector(), vector(), vector()],
        grants in prop::collection::vec((0..PIDS.len(), vector()), 0..6),
        target in 0..PIDS.len(),
        request in vector(),
    ) {
        let mut scheduler = setup(Algorithm::Fcfs, &maxes);
        for (p, v) in grants {
            let _ = scheduler.try_request(PIDS[p], v);
        }

        let snapshot: Vec<_> = scheduler.all_processes().map(|r| r.claim().clone()).collect();
        let available = scheduler.available_resources().clone();

        if scheduler.try_request(PIDS[target], request).is_err() {
            let after: Vec<_> = scheduler.all_processes().map(|r| r.claim().clone()).collect();
            prop_assert_eq!(snapshot, after);
            prop_assert_eq!(scheduler.available_resources(), &available);
        }
    }

    #[test]
    fn request_release_round_trip(
        maxes in [vector(), vector(), vector()],
        target in 0..PIDS.len(),
        request in vector(),
    ) {
        let mut scheduler = setup(Algorithm::Fcfs, &maxes);
        let snapshot: Vec<_> = scheduler.all_processes().map(|r| r.claim().clone()).collect();
        let available = scheduler.available_resources().clone();

        if scheduler.try_request(PIDS[target], request).is_ok() {
            scheduler.release(PIDS[target], request).unwrap();
            let after: Vec<_> = scheduler.all_processes().map(|r| r.claim().clone()).collect();
            prop_assert_eq!(snapshot, after);
            prop_assert_eq!(scheduler.available_resources(), &available);
        }
    }
}
