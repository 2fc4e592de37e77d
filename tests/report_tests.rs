use latency_agent::hooks::Probe;
use latency_agent::output::read_report;
use latency_agent::parser::AgentConfig;
use latency_agent::report::dump_to;
use latency_agent::StatsAggregator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

fn config_in(dir: &tempfile::TempDir, top_n: usize) -> AgentConfig {
    AgentConfig {
        top_n,
        output_path: dir.path().join("out").join("latency-metrics.json"),
        ..Default::default()
    }
}

#[test]
fn test_empty_dump_prints_banners_and_persists_empty_array() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, 10);
    let stats = StatsAggregator::new(0);

    let mut out = Vec::new();
    let report = dump_to(&stats, &config, &mut out);

    assert!(report.is_empty());
    assert!(read_report(&config.output_path).unwrap().is_empty());

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("SLOWEST METHODS"));
    assert!(text.contains("calls"));
    assert!(!text.lines().any(|l| l.starts_with(|c: char| c.is_ascii_digit())));
}

#[test]
fn test_dump_ties_are_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, 3);
    let stats = StatsAggregator::new(0);
    for id in ["delta", "alpha", "charlie", "bravo"] {
        stats.record(id, 500);
    }

    let report = dump_to(&stats, &config, &mut Vec::new());

    let ids: Vec<&str> = report.iter().map(|e| e.identifier.as_str()).collect();
    assert_eq!(ids, vec!["alpha", "bravo", "charlie"]);
}

#[test]
fn test_dump_while_probes_record() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, 5);
    let stats = Arc::new(StatsAggregator::new(0));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let probe = Probe::new(Arc::clone(&stats));
            thread::spawn(move || {
                for _ in 0..5_000 {
                    probe.exit("busy", probe.enter());
                }
            })
        })
        .collect();

    let mid = dump_to(&stats, &config, &mut Vec::new());
    assert!(mid.len() <= 1);

    for worker in workers {
        worker.join().unwrap();
    }

    let report = dump_to(&stats, &config, &mut Vec::new());
    assert_eq!(report.entries[0].call_count, 20_000);
}

#[test]
fn test_persisted_identifier_with_quotes_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(&dir, 10);
    let stats = StatsAggregator::new(0);
    stats.record("Parser.parse(\"x\")\u{1}", 1_000);

    dump_to(&stats, &config, &mut Vec::new());

    let entries = read_report(&config.output_path).unwrap();
    assert_eq!(entries[0].identifier, "Parser.parse(\"x\")\u{1}");
    let raw = std::fs::read_to_string(&config.output_path).unwrap();
    assert!(raw.contains("\\u0001"));
}

#[test]
fn test_dump_with_verbose_workers_tracking_new_identifiers() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .try_init();

    let dir = tempfile::tempdir().unwrap();
    let config = Arc::new(AgentConfig {
        verbose: true,
        ..config_in(&dir, 5)
    });
    let stats = Arc::new(StatsAggregator::with_config(&config));
    let stop = Arc::new(AtomicBool::new(false));

    let workers: Vec<_> = (0..4)
        .map(|w| {
            let stats = Arc::clone(&stats);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut i = 0u64;
                while i < 50_000 && !stop.load(Ordering::Relaxed) {
                    stats.record(&format!("worker-{}-op-{}", w, i), 1_000 + i);
                    i += 1;
                }
            })
        })
        .collect();

    // Let the workers populate the map before dumping
    thread::sleep(Duration::from_millis(20));

    let (tx, rx) = mpsc::channel();
    let dumper = {
        let stats = Arc::clone(&stats);
        let config = Arc::clone(&config);
        thread::spawn(move || {
            // Holding stderr for the whole dump is the worst case an embedder can pick
            let stderr = std::io::stderr();
            let mut locked = stderr.lock();
            let first = dump_to(&stats, &config, &mut locked);
            drop(locked);

            let second = latency_agent::report::dump(&stats, &config);
            let _ = tx.send((first.len(), second.len()));
        })
    };

    let outcome = rx.recv_timeout(Duration::from_secs(20));
    stop.store(true, Ordering::Relaxed);

    let (first, second) = outcome.expect("dump did not finish while workers were recording");
    assert_eq!(first, 5);
    assert_eq!(second, 5);

    dumper.join().unwrap();
    for worker in workers {
        worker.join().unwrap();
    }
    assert_eq!(read_report(&config.output_path).unwrap().len(), 5);
}
