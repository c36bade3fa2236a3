/*!
 * Scheduling Policy Tests
 * FCFS, round-robin and feedback-queue traces over the same workload
 */

use os_sim_kernel::{Algorithm, Pid, Runner, Scheduler, Segment, Workload};
use pretty_assertions::assert_eq;

fn run(algorithm: Algorithm) -> Scheduler {
    let mut scheduler = Workload::demo().scheduler(algorithm).unwrap();
    Runner::default().run_to_completion(&mut scheduler).unwrap();
    scheduler
}

fn finish(scheduler: &Scheduler, pid: &str) -> u64 {
    scheduler.process(pid).and_then(|r| r.finish()).unwrap()
}

fn segments(scheduler: &Scheduler) -> Vec<(String, u64, u64)> {
    scheduler
        .trace()
        .segments()
        .iter()
        .map(|s: &Segment| (s.pid.to_string(), s.start, s.end))
        .collect()
}

fn seg(pid: &str, start: u64, end: u64) -> (String, u64, u64) {
    (pid.to_string(), start, end)
}

#[test]
fn test_fcfs_runs_in_arrival_order() {
    let scheduler = run(Algorithm::Fcfs);

    assert_eq!(finish(&scheduler, "P1"), 5);
    assert_eq!(finish(&scheduler, "P2"), 8);
    assert_eq!(finish(&scheduler, "P3"), 9);
    assert_eq!(
        segments(&scheduler),
        vec![seg("P1", 0, 5), seg("P2", 5, 8), seg("P3", 8, 9)]
    );
    assert_eq!(scheduler.counters().preemptions, 0);
    assert_eq!(scheduler.counters().quantum_expirations, 0);
}

#[test]
fn test_round_robin_interleaves() {
    let scheduler = run(Algorithm::RoundRobin);

    assert_eq!(
        segments(&scheduler),
        vec![
            seg("P1", 0, 2),
            seg("P1", 2, 4),
            seg("P2", 4, 6),
            seg("P1", 6, 7),
            seg("P3", 7, 8),
            seg("P2", 8, 9),
        ]
    );
    assert_eq!(finish(&scheduler, "P1"), 7);
    assert_eq!(finish(&scheduler, "P3"), 8);
    assert_eq!(finish(&scheduler, "P2"), 9);
    assert!(finish(&scheduler, "P1") > 5);
}

#[test]
fn test_mlfq_favours_short_jobs() {
    let scheduler = run(Algorithm::Mlfq);

    assert_eq!(finish(&scheduler, "P3"), 5);
    assert_eq!(finish(&scheduler, "P2"), 7);
    assert_eq!(finish(&scheduler, "P1"), 9);
    assert_eq!(scheduler.counters().preemptions, 2);
    assert_eq!(scheduler.report().completion_order(), vec!["P3", "P2", "P1"]);
}

#[test]
fn test_mlfq_demotion_saturates_at_lowest_level() {
    let mut scheduler = Scheduler::builder()
        .with_algorithm(Algorithm::Mlfq)
        .with_mlfq_quanta(vec![1, 2])
        .build()
        .unwrap();
    scheduler.create_process("long", 0, 10, 0).unwrap();

    for _ in 0..6 {
        scheduler.tick();
    }
    assert_eq!(scheduler.process("long").unwrap().level(), 1);
}

#[test]
fn test_mlfq_preemption_keeps_level() {
    let mut scheduler = Scheduler::new(Algorithm::Mlfq);
    scheduler.create_process("A", 0, 10, 0).unwrap();
    scheduler.create_process("B", 2, 1, 0).unwrap();

    // A: level 0 slice at t0, then level 1 from t1
    scheduler.tick();
    scheduler.tick();
    assert_eq!(scheduler.process("A").unwrap().level(), 1);

    // B arrives at level 0 and preempts A, which stays at level 1
    let report = scheduler.tick();
    assert_eq!(report.ran, Some(Pid::from("B")));
    assert_eq!(scheduler.process("A").unwrap().level(), 1);
    assert_eq!(scheduler.counters().preemptions, 1);
}

#[test]
fn test_average_turnaround() {
    let fcfs = run(Algorithm::Fcfs);
    // (5 - 0) + (8 - 2) + (9 - 4) = 16
    assert_eq!(fcfs.average_turnaround(), Some(16.0 / 3.0));
    // 5/5 + 6/3 + 5/1 = 8
    assert_eq!(fcfs.average_weighted_turnaround(), Some(8.0 / 3.0));

    let mlfq = run(Algorithm::Mlfq);
    // 9 + 5 + 1 = 15
    assert_eq!(mlfq.average_turnaround(), Some(5.0));
}

#[test]
fn test_report_does_not_mutate() {
    let scheduler = run(Algorithm::RoundRobin);
    let before: Vec<_> = scheduler.all_processes().cloned().map(|r| r.finish()).collect();
    let report = scheduler.report();
    let after: Vec<_> = scheduler.all_processes().map(|r| r.finish()).collect();

    assert_eq!(before, after);
    assert_eq!(report.finished, 3);
    assert_eq!(report.unfinished, 0);
    assert_eq!(report.time, 9);
    assert_eq!(report.counters.busy_ticks, 9);
}

#[test]
fn test_idle_gap_before_arrival() {
    let mut scheduler = Scheduler::new(Algorithm::RoundRobin);
    scheduler.create_process("late", 3, 1, 0).unwrap();
    let ticks = Runner::default().run_to_completion(&mut scheduler).unwrap();

    assert_eq!(ticks, 4);
    assert_eq!(scheduler.counters().idle_ticks, 3);
    assert_eq!(scheduler.process("late").unwrap().response_time(), Some(0));
}

#[test]
fn test_trace_render() {
    let scheduler = run(Algorithm::Fcfs);
    let rendered = scheduler.trace().render();
    let first = rendered.lines().next().unwrap();
    assert!(first.contains("P1"));
    assert!(first.contains("Start:   0"));
    assert!(first.contains("End:   5"));
}
