/*!
 * OS Simulation Kernel - Main Entry Point
 *
 * Runs a workload under every scheduling algorithm and prints each
 * execution trace followed by a comparison of the statistics.
 *
 * Usage: kernel [workload.json]
 */

use miette::IntoDiagnostic;
use os_sim_kernel::{init_tracing, Algorithm, Runner, ScheduleReport, Workload};
use tracing::info;

fn main() -> miette::Result<()> {
    init_tracing();

    let workload = match std::env::args().nth(1) {
        Some(path) => Workload::from_file(&path)?,
        None => {
            info!("No workload given, running the built-in demo");
            Workload::demo()
        }
    };
    let config = workload.config.clone().with_env_overrides()?;
    let workload = Workload { config, ..workload };
    let runner = Runner::from_config(&workload.config);

    let mut reports = Vec::with_capacity(Algorithm::ALL.len());
    for algorithm in Algorithm::ALL {
        let mut scheduler = workload.scheduler(algorithm)?;
        runner.run_to_completion(&mut scheduler)?;

        println!("== {} ==", algorithm);
        print!("{}", scheduler.trace().render());
        println!();
        reports.push(scheduler.report());
    }

    print_comparison(&reports);

    if std::env::var_os("KERNEL_REPORT_JSON").is_some() {
        println!("{}", serde_json::to_string_pretty(&reports).into_diagnostic()?);
    }
    Ok(())
}

fn print_comparison(reports: &[ScheduleReport]) {
    let fmt = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));

    println!(
        "{:<6} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "algo", "turnaround", "weighted", "waiting", "response", "switches"
    );
    for report in reports {
        println!(
            "{:<6} {:>10} {:>10} {:>10} {:>10} {:>10}",
            report.algorithm.as_str(),
            fmt(report.average_turnaround),
            fmt(report.average_weighted_turnaround),
            fmt(report.average_waiting),
            fmt(report.average_response),
            report.counters.context_switches,
        );
    }
}
