//! Tests for seeded board generation.

use codenames_core::{Board, BoardError, Team, TeamCounts, generate_board, normalize_words};
use std::collections::HashSet;

fn word_list(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("WORD{:03}", i)).collect()
}

#[test]
fn test_same_seed_same_board() {
    let words = word_list(100);
    let first = generate_board(&words, 5, 1234).expect("board");
    let second = generate_board(&words, 5, 1234).expect("board");
    assert_eq!(first, second);
}

#[test]
fn test_different_seeds_differ() {
    let words = word_list(100);
    let first = generate_board(&words, 5, 1).expect("board");
    let second = generate_board(&words, 5, 2).expect("board");
    assert_ne!(first, second);
}

#[test]
fn test_standard_board_counts() {
    let board = generate_board(&word_list(60), 5, 7).expect("board");
    assert_eq!(board.len(), 25);
    assert_eq!(board.side_length(), 5);

    let counts = board.counts();
    assert_eq!(*counts.killer(), 1);
    assert_eq!(*counts.neutral(), 7);
    assert_eq!(*counts.team_b(), 8);
    assert_eq!(*counts.team_a(), 9);
    assert_eq!(counts, TeamCounts::for_side_length(5));
}

#[test]
fn test_words_unique_and_from_list() {
    let words = word_list(30);
    let board = generate_board(&words, 5, 99).expect("board");
    let unique: HashSet<_> = board.words().iter().collect();
    assert_eq!(unique.len(), 25);
    assert!(board.words().iter().all(|w| words.contains(w)));
}

#[test]
fn test_other_side_lengths() {
    let board = generate_board(&word_list(64), 6, 3).expect("board");
    assert_eq!(board.len(), 36);
    assert_eq!(*board.counts().team_a(), 20);

    let board = generate_board(&word_list(16), 4, 3).expect("board");
    assert_eq!(*board.counts().team_a(), 0);
    assert_eq!(board.counts().total(), 16);
}

#[test]
fn test_small_board_rejected() {
    let err = generate_board(&word_list(20), 3, 0).unwrap_err();
    assert_eq!(err, BoardError::TooSmall { side_length: 3 });
    assert_eq!(*TeamCounts::for_side_length(3).team_a(), 0);
}

#[test]
fn test_not_enough_distinct_words() {
    let mut words = word_list(20);
    words.extend(word_list(10));
    words.push("   ".to_string());
    let err = generate_board(&words, 5, 0).unwrap_err();
    assert_eq!(
        err,
        BoardError::NotEnoughWords {
            needed: 25,
            available: 20
        }
    );
}

#[test]
fn test_normalize_trims_and_dedups() {
    let raw = ["  apple ", "pear", "", "apple", "\tplum\n"];
    assert_eq!(normalize_words(&raw), vec!["apple", "pear", "plum"]);
}

#[test]
fn test_whitespace_variants_give_same_board() {
    let clean = word_list(40);
    let padded: Vec<String> = clean.iter().map(|w| format!("  {} ", w)).collect();
    assert_eq!(
        generate_board(&clean, 5, 5).expect("board"),
        generate_board(&padded, 5, 5).expect("board")
    );
}

#[test]
fn test_explicit_board_validation() {
    let err = Board::new(vec!["A".into(), "A".into()], vec![Team::TeamA, Team::TeamB]).unwrap_err();
    assert_eq!(err, BoardError::DuplicateWord("A".into()));

    let err = Board::new(vec!["A".into()], vec![]).unwrap_err();
    assert_eq!(
        err,
        BoardError::LengthMismatch {
            words: 1,
            assignments: 0
        }
    );
}

/// 4x4 board: K0 killer, N0-N6 neutral, B0-B7 team B.
fn small_board_parts() -> (Vec<String>, Vec<Team>) {
    let mut words = vec!["K0".to_string()];
    let mut assignment = vec![Team::Killer];
    for (prefix, team, count) in [("N", Team::Neutral, 7), ("B", Team::TeamB, 8)] {
        for i in 0..count {
            words.push(format!("{}{}", prefix, i));
            assignment.push(team);
        }
    }
    (words, assignment)
}

#[test]
fn test_explicit_board_label_counts() {
    let (words, mut assignment) = small_board_parts();
    assert!(Board::new(words.clone(), assignment.clone()).is_ok());

    assignment[0] = Team::Neutral;
    match Board::new(words, assignment).unwrap_err() {
        BoardError::WrongCounts { expected, found } => {
            assert_eq!(expected, TeamCounts::for_side_length(4));
            assert_eq!(*found.killer(), 0);
            assert_eq!(*found.neutral(), 8);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_explicit_board_must_be_square_and_large_enough() {
    let err = Board::new(
        vec!["CAT".into(), "DOG".into()],
        vec![Team::Killer, Team::TeamB],
    )
    .unwrap_err();
    assert_eq!(err, BoardError::TooSmall { side_length: 1 });

    let (mut words, mut assignment) = small_board_parts();
    words.push("EXTRA".into());
    assignment.push(Team::TeamA);
    assert!(matches!(
        Board::new(words, assignment),
        Err(BoardError::WrongCounts { .. })
    ));
}

#[test]
fn test_lookup_helpers() {
    let (words, assignment) = small_board_parts();
    let board = Board::new(words, assignment).expect("board");
    assert_eq!(board.team_of("B3"), Some(Team::TeamB));
    assert_eq!(board.team_of("EMU"), None);
    assert_eq!(board.card(0), Some(("K0", Team::Killer)));
    assert_eq!(board.card(16), None);
    assert_eq!(board.words_of(Team::Killer), vec!["K0".to_string()]);
    assert_eq!(board.side_length(), 4);
    assert_eq!(board.counts(), TeamCounts::for_side_length(4));
}
