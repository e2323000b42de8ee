//! Scheduler tests over `tokio::io::duplex` pipes

use std::time::Duration;

use tokio::io::{AsyncWriteExt, DuplexStream};

use pingwatch_core::dashboard::RecordingDashboard;
use pingwatch_core::monitoring::{MonitorConfig, Scheduler, WindowSpec};
use pingwatch_core::probe::{ProbeSettings, ProbeStream};

fn test_config(hosts: &[&str]) -> MonitorConfig {
    MonitorConfig {
        hosts: hosts.iter().map(ToString::to_string).collect(),
        windows: vec![
            WindowSpec::from_secs(10.0),
            WindowSpec::from_secs(60.0),
            WindowSpec::from_secs(600.0),
        ],
        refresh_interval: Duration::from_millis(50),
        wait_timeout: Duration::from_millis(10),
        read_chunk_bytes: 256,
        probe: ProbeSettings::default(),
    }
}

/// Scheduler with one duplex-backed probe per host; returns the write ends
fn piped_scheduler(hosts: &[&str]) -> (Scheduler, Vec<DuplexStream>) {
    let mut scheduler = Scheduler::new(test_config(hosts));
    let writers = hosts
        .iter()
        .map(|host| {
            let (tx, rx) = tokio::io::duplex(4096);
            scheduler.attach(ProbeStream::from_reader(*host, rx));
            tx
        })
        .collect();
    (scheduler, writers)
}

fn reply(ts: f64, seq: u32, ms: f64) -> String {
    format!("[{ts:.6}] 64 bytes from 192.0.2.1: icmp_seq={seq} ttl=57 time={ms} ms\n")
}

fn timeout(ts: f64, seq: u32) -> String {
    format!("[{ts:.6}] no answer yet for icmp_seq={seq}\n")
}

async fn drain(scheduler: &mut Scheduler) {
    for _ in 0..4 {
        scheduler.poll_ready().await;
    }
}

#[tokio::test]
async fn test_reference_scenario() {
    let (mut scheduler, mut writers) = piped_scheduler(&["a"]);
    let log = format!(
        "{}{}{}",
        reply(0.0, 1, 20.0),
        timeout(1.0, 2),
        reply(2.0, 3, 40.0)
    );
    writers[0].write_all(log.as_bytes()).await.unwrap();
    drain(&mut scheduler).await;

    let snapshot = scheduler.tick_at(2.0);
    let metrics = snapshot.hosts[0].windows[0].metrics.unwrap();
    assert_eq!(metrics.min_ms, 20.0);
    assert_eq!(metrics.max_ms, 40.0);
    assert_eq!(metrics.p50_ms, 40.0);
    assert_eq!(metrics.hit_count, 2);
    assert_eq!(metrics.miss_count, 1);
    assert!((metrics.miss_percent - 100.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_line_split_byte_by_byte() {
    let (mut scheduler, mut writers) = piped_scheduler(&["a"]);
    let line = reply(100.0, 1, 12.5);
    let (last, head) = line.as_bytes().split_last().unwrap();

    for byte in head {
        writers[0].write_all(&[*byte]).await.unwrap();
        scheduler.poll_ready().await;
    }
    assert_eq!(scheduler.hosts()[0].series().len(), 0);

    writers[0].write_all(&[*last]).await.unwrap();
    scheduler.poll_ready().await;
    assert_eq!(scheduler.hosts()[0].series().len(), 1);
    assert_eq!(scheduler.hosts()[0].last_label(), Some("12.5ms"));
}

#[tokio::test]
async fn test_dead_host_does_not_stall_others() {
    let (mut scheduler, mut writers) = piped_scheduler(&["a", "b", "c"]);
    let b = writers.remove(1);
    drop(b);

    for seq in 1..=5 {
        let ts = 100.0 + f64::from(seq);
        writers[0]
            .write_all(reply(ts, seq, 10.0).as_bytes())
            .await
            .unwrap();
        writers[1]
            .write_all(timeout(ts, seq).as_bytes())
            .await
            .unwrap();
        drain(&mut scheduler).await;
    }

    assert_eq!(scheduler.open_streams(), 2);
    let snapshot = scheduler.tick_at(106.0);
    assert_eq!(snapshot.live_hosts(), 2);

    let a = snapshot.host("a").unwrap();
    assert_eq!(a.samples, 5);
    assert_eq!(a.windows[0].metrics.unwrap().hit_count, 5);

    let b = snapshot.host("b").unwrap();
    assert!(b.dead);
    assert_eq!(b.status_display(), "closed");
    assert!(b.windows.is_empty());

    let c = snapshot.host("c").unwrap();
    assert_eq!(c.last_label.as_deref(), Some("miss"));
    assert!(c.windows.iter().all(|w| w.metrics.is_none()));
}

#[tokio::test]
async fn test_all_streams_closed_keeps_loop_alive() {
    let (mut scheduler, writers) = piped_scheduler(&["a", "b"]);
    drop(writers);
    drain(&mut scheduler).await;
    assert_eq!(scheduler.open_streams(), 0);
    assert_eq!(scheduler.live_hosts(), 0);

    // Sleeps instead of returning immediately
    let started = std::time::Instant::now();
    assert_eq!(scheduler.poll_ready().await, 0);
    assert!(started.elapsed() >= Duration::from_millis(10));
}

#[tokio::test]
async fn test_windows_reported_in_configured_order() {
    let mut config = test_config(&["a"]);
    config.windows = vec![
        WindowSpec::from_secs(600.0),
        WindowSpec::from_secs(10.0),
        WindowSpec::from_secs(60.0),
    ];
    let mut scheduler = Scheduler::new(config);
    let (mut tx, rx) = tokio::io::duplex(4096);
    scheduler.attach(ProbeStream::from_reader("a", rx));

    let log = format!("{}{}", reply(1000.0, 1, 5.0), reply(1590.0, 2, 7.0));
    tx.write_all(log.as_bytes()).await.unwrap();
    drain(&mut scheduler).await;

    let snapshot = scheduler.tick_at(1595.0);
    let windows: Vec<String> = snapshot.hosts[0]
        .windows
        .iter()
        .map(|w| w.window.to_string())
        .collect();
    assert_eq!(windows, ["10m", "10s", "1m"]);

    let counts: Vec<usize> = snapshot.hosts[0]
        .windows
        .iter()
        .map(|w| w.metrics.map_or(0, |m| m.hit_count))
        .collect();
    assert_eq!(counts, [2, 1, 1]);
}

#[tokio::test]
async fn test_run_until_shutdown() {
    let (mut scheduler, mut writers) = piped_scheduler(&["a"]);
    let now = pingwatch_core::monitoring::unix_now();
    writers[0]
        .write_all(reply(now, 1, 3.0).as_bytes())
        .await
        .unwrap();

    let mut dashboard = RecordingDashboard::default();
    scheduler
        .run(&mut dashboard, tokio::time::sleep(Duration::from_millis(120)))
        .await
        .unwrap();

    let last = dashboard.snapshots.last().unwrap();
    assert_eq!(last.hosts.len(), 1);
    let metrics = last.hosts[0].windows[0].metrics.unwrap();
    assert_eq!(metrics.hit_count, 1);
    assert_eq!(metrics.p95_ms, 3.0);
}
