use super::*;

fn sample(x: f64, y: f64) -> PointerSample {
    PointerSample {
        pointer_id: 7,
        button: 0,
        is_primary: true,
        x,
        y,
    }
}

fn moved(x: f64, y: f64) -> PointerSample {
    PointerSample {
        button: -1,
        ..sample(x, y)
    }
}

fn line(color: &str, from: (f64, f64), to: (f64, f64)) -> Line {
    Line::segment(Point::new(from.0, from.1), Point::new(to.0, to.1), color, 1)
}

fn outgoing_line(change: Change) -> Line {
    match change {
        Change::Outgoing(ClientMessage::Line { data }) => data,
        other => panic!("expected outgoing line, got {other:?}"),
    }
}

#[test]
fn snapshot_replaces_store_in_received_order() {
    let mut board = Board::new("#000000", 1);
    let _ = board.receive(ServerMessage {
        data: line("#00ff00", (1.0, 1.0), (2.0, 2.0)),
    });
    let lines = vec![
        line("#000000", (0.0, 0.0), (10.0, 10.0)),
        line("#0000ff", (3.0, 3.0), (4.0, 4.0)),
    ];
    let change = board.load_snapshot(LinesSnapshot {
        lines: lines.clone(),
    });
    assert_eq!(change, Change::Lines);
    assert_eq!(board.lines(), lines.as_slice());
}

#[test]
fn incoming_lines_append_in_arrival_order() {
    let mut board = Board::new("#000000", 1);
    let snapshot = vec![line("#000000", (0.0, 0.0), (1.0, 1.0))];
    let _ = board.load_snapshot(LinesSnapshot {
        lines: snapshot.clone(),
    });
    let incoming: Vec<Line> = (0..5)
        .map(|i| line("#ff0000", (i as f64, 0.0), (i as f64, 1.0)))
        .collect();
    for data in &incoming {
        assert!(board.receive(ServerMessage { data: data.clone() }).needs_redraw());
    }
    let mut expected = snapshot;
    expected.extend(incoming);
    assert_eq!(board.lines(), expected.as_slice());
}

#[test]
fn snapshot_then_live_line_scenario() {
    let mut board = Board::new("#000000", 1);
    let snapshot = syncboard_shared::decode_snapshot(
        r##"{"lines": [{"points":[{"x":0,"y":0},{"x":10,"y":10}],"color":"#000000","lineWidth":1}]}"##,
    )
    .expect("snapshot");
    let _ = board.load_snapshot(snapshot);
    assert_eq!(board.lines().len(), 1);
    assert_eq!(
        board.lines()[0].points,
        vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)]
    );

    let message = syncboard_shared::decode_server_message(
        r##"{"data":{"points":[{"x":5,"y":5},{"x":15,"y":15}],"color":"#ff0000","lineWidth":1}}"##,
    )
    .expect("message");
    let _ = board.receive(message);
    assert_eq!(board.lines().len(), 2);
    assert_eq!(board.lines()[0].color, "#000000");
    assert_eq!(board.lines()[1].color, "#ff0000");
}

#[test]
fn pan_drag_moves_view_by_exact_delta_and_keeps_lines() {
    let mut board = Board::new("#000000", 1);
    let _ = board.load_snapshot(LinesSnapshot {
        lines: vec![line("#000000", (0.0, 0.0), (1.0, 1.0))],
    });
    let _ = board.set_mode(Mode::Pan);
    assert_eq!(board.pointer_down(sample(100.0, 100.0)), Change::Cursor);
    assert_eq!(board.pointer_move(moved(110.0, 95.0)), Change::View);
    assert_eq!(board.pointer_move(moved(125.0, 80.0)), Change::View);
    assert_eq!(board.pointer_up(sample(125.0, 80.0)), Change::Cursor);
    assert_eq!(
        board.view(),
        ViewState {
            translate_x: 25.0,
            translate_y: -20.0,
        }
    );
    assert_eq!(board.lines().len(), 1);
}

#[test]
fn draw_drag_sends_one_message_per_move_in_board_coordinates() {
    let mut board = Board::new("#000000", 1);
    let _ = board.set_mode(Mode::Pan);
    let _ = board.pointer_down(sample(0.0, 0.0));
    let _ = board.pointer_move(moved(30.0, 40.0));
    let _ = board.pointer_up(sample(30.0, 40.0));
    let _ = board.set_mode(Mode::Draw);
    board.set_color("#ff8800".to_string());

    let _ = board.pointer_down(sample(50.0, 50.0));
    let first = outgoing_line(board.pointer_move(moved(60.0, 55.0)));
    let second = outgoing_line(board.pointer_move(moved(70.0, 70.0)));

    assert_eq!(first.points, vec![Point::new(20.0, 10.0), Point::new(30.0, 15.0)]);
    assert_eq!(second.points, vec![Point::new(30.0, 15.0), Point::new(40.0, 30.0)]);
    assert_eq!(first.color, "#ff8800");
    assert_eq!(first.line_width, 1);
}

#[test]
fn drawing_does_not_touch_the_store() {
    let mut board = Board::new("#000000", 1);
    let _ = board.pointer_down(sample(0.0, 0.0));
    let change = board.pointer_move(moved(5.0, 5.0));
    assert!(!change.needs_redraw());
    assert!(board.lines().is_empty());
}

#[test]
fn move_without_press_changes_nothing() {
    let mut board = Board::new("#000000", 1);
    assert_eq!(board.pointer_move(moved(5.0, 5.0)), Change::None);
    assert_eq!(board.view(), ViewState::default());
}

#[test]
fn cancel_stops_panning() {
    let mut board = Board::new("#000000", 1);
    let _ = board.set_mode(Mode::Pan);
    let _ = board.pointer_down(sample(0.0, 0.0));
    assert_eq!(board.pointer_cancel(moved(4.0, 4.0)), Change::Cursor);
    assert_eq!(board.cursor(), "grab");
    assert_eq!(board.pointer_move(moved(9.0, 9.0)), Change::None);
    assert_eq!(board.view(), ViewState::default());
}

#[test]
fn view_maps_screen_points_back_to_board() {
    let mut view = ViewState::default();
    view.pan(-4.0, 6.5);
    assert_eq!(view.to_board(Point::new(0.0, 0.0)), Point::new(4.0, -6.5));
}

#[test]
fn line_store_appends_and_replaces() {
    let mut store = LineStore::new();
    assert!(store.is_empty());
    store.append(line("#000000", (0.0, 0.0), (1.0, 1.0)));
    store.append(line("#111111", (0.0, 0.0), (1.0, 1.0)));
    assert_eq!(store.len(), 2);
    store.replace(Vec::new());
    assert!(store.is_empty());
}
