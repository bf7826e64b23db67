use super::*;
use crate::net::types::TaskList;
use crate::test_helpers::make_card;

fn list(id: &str, title: &str) -> TaskList {
    TaskList { id: id.into(), board_id: "b1".into(), title: title.into(), position: 0, created_at: None }
}

fn board(title: &str, description: Option<&str>) -> Board {
    Board {
        id: "b1".into(),
        title: title.into(),
        description: description.map(str::to_string),
        background: None,
        owner_id: None,
        members: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn truncate_counts_chars() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("abcdefgh", 5), "abcd~");
    assert_eq!(truncate("ééééé", 3), "éé~");
    assert_eq!(truncate("anything", 0), "");
}

#[test]
fn boards_listing_shows_optional_description() {
    let out = render_boards(&[board("Roadmap", Some("Q3 plans")), board("Chores", Some(""))]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, vec!["b1  Roadmap  (Q3 plans)", "b1  Chores"]);
    assert_eq!(render_boards(&[]), "No boards yet\n");
}

#[test]
fn board_lays_out_columns_side_by_side() {
    let todo = list("l1", "Todo");
    let done = list("l2", "Done");
    let a = make_card("c1", "b1", "l1", "Write tests", 0);
    let b = make_card("c2", "b1", "l1", "Ship", 1);
    let c = make_card("c3", "b1", "l2", "Plan", 0);
    let columns = vec![Column { list: &todo, cards: vec![&a, &b] }, Column { list: &done, cards: vec![&c] }];

    let out = render_board(Some(&board("Roadmap", None)), &columns);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "# Roadmap");
    assert!(lines[2].starts_with("Todo (2)"));
    assert!(lines[2].contains("Done (1)"));
    assert_eq!(lines[4].find("Plan"), Some(COLUMN_WIDTH + GUTTER.len()));
    assert_eq!(lines[5].trim(), "Ship [medium]");
    assert_eq!(lines.len(), 6);
}

#[test]
fn board_without_lists_says_so() {
    assert_eq!(render_board(None, &[]), "No lists yet\n");
}

#[test]
fn card_detail_marks_missing_description() {
    let mut card = make_card("c1", "b1", "l1", "Ship", 0);
    assert!(render_card(&card).ends_with("(no description)\n"));

    card.description = Some("Tag the release".into());
    card.labels = vec!["release".into()];
    let out = render_card(&card);
    assert!(out.contains("labels: release"));
    assert!(out.ends_with("Tag the release\n"));
}

#[test]
fn inbox_lists_one_card_per_line() {
    let cards = vec![make_card("c1", "b1", "l1", "Buy milk", 0)];
    assert_eq!(render_inbox(&cards), "c1  Buy milk [medium]\n");
    assert_eq!(render_inbox(&[]), "Inbox is empty\n");
}
