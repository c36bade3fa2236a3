/*!
 * Runner Tests
 * Run-to-completion, stall watchdog and tick budget
 */

use os_sim_kernel::{Algorithm, KernelError, Runner, Scheduler, Workload};
use pretty_assertions::assert_eq;

#[test]
fn test_every_algorithm_completes_demo() {
    for algorithm in Algorithm::ALL {
        let mut scheduler = Workload::demo().scheduler(algorithm).unwrap();
        let ticks = Runner::default().run_to_completion(&mut scheduler).unwrap();
        assert_eq!(ticks, 9, "{}", algorithm);
        assert_eq!(scheduler.report().finished, 3);
    }
}

#[test]
fn test_run_with_observes_each_tick() {
    let mut scheduler = Workload::demo().scheduler(Algorithm::Fcfs).unwrap();
    let mut ran = Vec::new();
    Runner::default()
        .run_with(&mut scheduler, |_, report| {
            ran.push(report.ran.as_ref().map(|p| p.to_string()));
        })
        .unwrap();

    assert_eq!(ran.len(), 9);
    assert_eq!(ran[0].as_deref(), Some("P1"));
    assert_eq!(ran[8].as_deref(), Some("P3"));
}

#[test]
fn test_stall_when_everyone_is_blocked() {
    let mut scheduler = Scheduler::new(Algorithm::RoundRobin);
    scheduler.create_process("A", 0, 5, 0).unwrap();
    scheduler.create_process("B", 0, 5, 0).unwrap();
    let runner = Runner::new(100);

    runner.step_n(&mut scheduler, 1);
    scheduler.block_current().unwrap();
    runner.step_n(&mut scheduler, 1);
    scheduler.block_current().unwrap();

    let err = runner.run_to_completion(&mut scheduler).unwrap_err();
    assert!(matches!(err, KernelError::Stalled { time: 2, unfinished: 2 }));

    // Waking one lets the run continue until the other is the only one left
    scheduler.wake("A").unwrap();
    let err = runner.run_to_completion(&mut scheduler).unwrap_err();
    assert!(matches!(err, KernelError::Stalled { unfinished: 1, .. }));
    assert!(scheduler.process("A").unwrap().is_finished());
}

#[test]
fn test_future_arrival_is_not_a_stall() {
    let mut scheduler = Scheduler::new(Algorithm::Fcfs);
    scheduler.create_process("A", 20, 1, 0).unwrap();
    assert_eq!(Runner::new(50).run_to_completion(&mut scheduler).unwrap(), 21);
}

#[test]
fn test_budget_exhausted() {
    let mut scheduler = Scheduler::new(Algorithm::Fcfs);
    scheduler.create_process("A", 0, 1_000, 0).unwrap();
    let err = Runner::new(10).run_to_completion(&mut scheduler).unwrap_err();
    assert!(matches!(err, KernelError::BudgetExhausted { budget: 10 }));
    assert_eq!(scheduler.process("A").unwrap().remaining(), 990);
}
