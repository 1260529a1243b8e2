use checkers_link::cli::{describe_outcome, parse_command, render_board, UiCommand};
use checkers_link::{Board, Outcome};

#[test]
fn renders_standard_board_from_local_seat() {
    let text = render_board(&Board::standard());
    let lines: Vec<&str> = text.lines().collect();
    let rows = lines[2..10].concat();
    assert_eq!(rows.matches('o').count(), 12);
    assert_eq!(rows.matches('x').count(), 12);
    // Row 0 (opponent) at the top, row 7 (ours) at the bottom.
    assert!(lines[2].starts_with(" 0 ") && lines[2].contains('x'));
    assert!(lines[9].starts_with(" 7 ") && lines[9].contains('o'));
    assert!(text.contains("you: 12   opponent: 12"));
}

#[test]
fn outcomes_have_messages() {
    for outcome in [
        Outcome::LocalWin,
        Outcome::RemoteWin,
        Outcome::Draw,
        Outcome::Abandoned,
    ] {
        assert!(!describe_outcome(outcome).is_empty());
    }
}

#[test]
fn parses_a_typical_session() {
    let script = ["move 2 5 3 4", "say hi there", "draw", "reject", "end", "quit"];
    let parsed: Vec<UiCommand> = script.iter().map(|l| parse_command(l).unwrap()).collect();
    assert_eq!(
        parsed,
        vec![
            UiCommand::Move {
                x: 2,
                y: 5,
                tx: 3,
                ty: 4
            },
            UiCommand::Say("hi there".to_string()),
            UiCommand::Draw,
            UiCommand::RespondDraw(false),
            UiCommand::EndTurn,
            UiCommand::Quit,
        ]
    );
}
