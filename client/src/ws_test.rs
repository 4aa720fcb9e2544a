use super::*;

#[test]
fn backoff_doubles_up_to_cap() {
    let mut backoff = Backoff::new(1_000, 10_000);
    let delays: Vec<u32> = (0..6).map(|_| backoff.next_delay()).collect();
    assert_eq!(delays, vec![1_000, 2_000, 4_000, 8_000, 10_000, 10_000]);
}

#[test]
fn backoff_reset_starts_over() {
    let mut backoff = Backoff::new(500, 4_000);
    backoff.next_delay();
    backoff.next_delay();
    backoff.reset();
    assert_eq!(backoff.next_delay(), 500);
    assert_eq!(backoff.next_delay(), 1_000);
}

#[test]
fn backoff_cap_below_initial_is_raised() {
    let mut backoff = Backoff::new(2_000, 100);
    assert_eq!(backoff.next_delay(), 2_000);
    assert_eq!(backoff.next_delay(), 2_000);
}

#[test]
fn backoff_does_not_overflow() {
    let mut backoff = Backoff::new(u32::MAX / 2 + 1, u32::MAX);
    backoff.next_delay();
    assert_eq!(backoff.next_delay(), u32::MAX);
}

#[test]
fn short_payloads_are_logged_whole() {
    assert_eq!(snippet("{\"data\":1}"), "{\"data\":1}");
}

#[test]
fn long_payloads_are_truncated_on_char_boundaries() {
    let text = "é".repeat(300);
    let short = snippet(&text);
    assert!(short.ends_with("..."));
    assert_eq!(short.chars().count(), SNIPPET_CHARS + 3);
}

#[test]
fn line_frame_decodes() {
    let frame = r##"{"type":"line","data":{"points":[{"x":1,"y":2},{"x":3,"y":4}],"color":"#ff0000","lineWidth":1}}"##;
    let message = decode_frame(frame).expect("line frame");
    assert_eq!(message.data.color, "#ff0000");
}

#[test]
fn malformed_frames_leave_the_board_unchanged() {
    use crate::state::Board;
    use syncboard_shared::{Line, LinesSnapshot, Point};

    let mut board = Board::new("#000000", 1);
    let line = Line::segment(Point::new(0.0, 0.0), Point::new(10.0, 10.0), "#000000", 1);
    let _ = board.load_snapshot(LinesSnapshot {
        lines: vec![line.clone()],
    });
    for frame in ["not json", r#"{"type":"line"}"#, r#"{"data":{"color":1}}"#, ""] {
        if let Some(message) = decode_frame(frame) {
            let _ = board.receive(message);
        }
    }
    assert_eq!(board.lines(), &[line]);
}
