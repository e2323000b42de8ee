//! Property-based tests for the streaming line parser

use proptest::prelude::*;

use pingwatch_core::monitoring::{Sample, SampleParser};

// ============================================================================
// Strategies
// ============================================================================

/// One probe output line and the sample it should yield, if any
fn arb_line() -> impl Strategy<Value = (String, Option<Sample>)> {
    prop_oneof![
        // Reply
        (1_000u32..2_000_000u32, 1u32..65_536, 1u32..100_000).prop_map(|(ts, seq, tenths)| {
            let timestamp = f64::from(ts) / 1000.0;
            let latency = f64::from(tenths) / 10.0;
            (
                format!(
                    "[{timestamp:.3}] 64 bytes from 192.0.2.7: icmp_seq={seq} ttl=57 time={latency:.1} ms"
                ),
                Some(Sample::hit(timestamp, latency)),
            )
        }),
        // Timeout
        (1_000u32..2_000_000u32, 1u32..65_536).prop_map(|(ts, seq)| {
            let timestamp = f64::from(ts) / 1000.0;
            (
                format!("[{timestamp:.3}] no answer yet for icmp_seq={seq}"),
                Some(Sample::miss(timestamp)),
            )
        }),
        // Banner and summary noise
        Just((
            "PING 192.0.2.7 (192.0.2.7) 56(84) bytes of data.".to_string(),
            None
        )),
        Just(("--- 192.0.2.7 ping statistics ---".to_string(), None)),
        "[a-z ]{0,40}".prop_map(|s| (s, None)),
    ]
}

fn arb_output() -> impl Strategy<Value = (Vec<u8>, Vec<Sample>)> {
    prop::collection::vec(arb_line(), 0..40).prop_map(|lines| {
        let mut bytes = Vec::new();
        let mut expected = Vec::new();
        for (text, sample) in lines {
            bytes.extend_from_slice(text.as_bytes());
            bytes.push(b'\n');
            expected.extend(sample);
        }
        (bytes, expected)
    })
}

fn collect_chunked(bytes: &[u8], cuts: &[usize]) -> (Vec<Sample>, usize) {
    let mut parser = SampleParser::new();
    let mut samples = Vec::new();
    let mut start = 0;
    let mut points: Vec<usize> = cuts.iter().map(|c| c % (bytes.len() + 1)).collect();
    points.sort_unstable();
    for point in points.into_iter().chain(std::iter::once(bytes.len())) {
        samples.extend(parser.feed(&bytes[start..point]));
        start = point;
    }
    (samples, parser.pending())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Splitting the byte stream anywhere never changes the parsed samples
    #[test]
    fn chunking_is_invisible(
        (bytes, expected) in arb_output(),
        cuts in prop::collection::vec(any::<usize>(), 0..12),
    ) {
        let (samples, pending) = collect_chunked(&bytes, &cuts);
        prop_assert_eq!(samples, expected);
        prop_assert_eq!(pending, 0);
    }

    /// Bytes after the last newline stay buffered until completed
    #[test]
    fn partial_line_stays_pending(
        (bytes, expected) in arb_output(),
        tail in "\\[[0-9]{1,6}\\.[0-9]{3}\\] 64 bytes from h: icmp_seq=[0-9]{1,3} ttl=",
    ) {
        let mut parser = SampleParser::new();
        let mut input = bytes.clone();
        input.extend_from_slice(tail.as_bytes());

        let samples: Vec<Sample> = parser.feed(&input).collect();
        prop_assert_eq!(samples, expected);
        prop_assert_eq!(parser.pending(), tail.len());

        let rest: Vec<Sample> = parser.feed(b"64 time=3.5 ms\n").collect();
        prop_assert_eq!(rest.len(), 1);
        prop_assert_eq!(rest[0].latency_ms(), Some(3.5));
        prop_assert_eq!(parser.pending(), 0);
    }

    /// Arbitrary bytes never panic and never yield more samples than lines
    #[test]
    fn garbage_is_tolerated(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut parser = SampleParser::new();
        let lines = bytes.iter().filter(|&&b| b == b'\n').count();
        let samples: Vec<Sample> = parser.feed(&bytes).collect();
        prop_assert!(samples.len() <= lines);
    }
}

#[test]
fn test_carriage_returns_are_ignored() {
    let mut parser = SampleParser::new();
    let samples: Vec<Sample> = parser
        .feed(b"[5.0] 64 bytes from h: icmp_seq=1 ttl=1 time=2.0 ms\r\n")
        .collect();
    assert_eq!(samples, vec![Sample::hit(5.0, 2.0)]);
}
