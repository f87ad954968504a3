//! Tests for board-index game sessions.

use codenames_spymaster::{
    GameSession, GameStatus, ScriptedOracle, Side, SpymasterConfig, Team, WordList,
    generate_board,
};
use std::sync::Arc;

fn config(seed: u64) -> SpymasterConfig {
    SpymasterConfig::default().with_seed(Some(seed))
}

fn session(replies: &[&str]) -> (GameSession, Arc<ScriptedOracle>) {
    let oracle = Arc::new(ScriptedOracle::new(replies.iter().copied()));
    let words = WordList::default_for("en").expect("built-in list");
    let session = GameSession::new("test".to_string(), &config(42), words, oracle.clone())
        .expect("session");
    (session, oracle)
}

fn index_of(session: &GameSession, team: Team) -> usize {
    session
        .cards()
        .iter()
        .find(|c| c.team == team && !c.revealed)
        .map(|c| c.index)
        .expect("card for team")
}

#[test]
fn test_same_seed_same_board() {
    let (first, _) = session(&[]);
    let (second, _) = session(&[]);
    assert_eq!(first.board(), second.board());
    assert_eq!(first.seed(), 42);
    assert_eq!(first.cards().len(), 25);
}

#[tokio::test]
async fn test_guess_reveals_card() {
    let (mut session, _oracle) = session(&["RIVER - 2"]);
    let (text, status) = session.play().await.expect("hint");
    assert_eq!(text, ":blue[RIVER - 2]");
    assert_eq!(status, GameStatus::Continue);

    let index = index_of(&session, Team::TeamA);
    assert_eq!(session.guess(index).expect("guess"), Team::TeamA);

    let card = &session.cards()[index];
    assert!(card.revealed);
    assert_eq!(card.color(), Some("blue"));
    assert_eq!(session.cards().iter().filter(|c| c.revealed).count(), 1);
    assert_eq!(session.spymaster().words_remaining(Team::TeamA), 8);
}

#[tokio::test]
async fn test_revealed_card_cannot_be_guessed_twice() {
    let (mut session, _oracle) = session(&["RIVER - 2"]);
    session.play().await.expect("hint");
    let index = index_of(&session, Team::TeamA);
    session.guess(index).expect("guess");

    let err = session.guess(index).unwrap_err();
    assert!(err.message.contains("already revealed"));
    assert!(session.guess(999).is_err());
}

#[tokio::test]
async fn test_killer_guess_locks_the_board() {
    let (mut session, _oracle) = session(&["RIVER - 2"]);
    session.play().await.expect("hint");

    let killer = index_of(&session, Team::Killer);
    session.guess(killer).expect("guess");
    assert_eq!(session.current_team(), Side::A);

    let neutral = index_of(&session, Team::Neutral);
    let err = session.guess(neutral).unwrap_err();
    assert!(err.message.contains("Game is over"));
    assert_eq!(session.status(), GameStatus::LostKiller);
    assert!(!session.cards()[neutral].revealed);
    assert_eq!(session.current_team(), Side::A);

    let (text, status) = session.play().await.expect("evaluate");
    assert_eq!(status, GameStatus::LostKiller);
    assert!(text.starts_with(":blue["));
}

#[tokio::test]
async fn test_rejected_guess_keeps_membership_error() {
    let (mut session, _oracle) = session(&["RIVER - 2"]);
    let others: Vec<String> = (0..25).map(|i| format!("OTHER{:02}", i)).collect();
    let other_board = generate_board(&others, 5, 1).expect("board");
    session.spymaster_mut().update_words(&other_board);

    let (word, team) = session.board().card(0).expect("card");
    let (word, team) = (word.to_string(), team);
    let err = session.guess(0).unwrap_err();

    let source = err.membership.as_ref().expect("membership source");
    assert_eq!(source.word, word);
    assert_eq!(source.team, team);
    assert!(std::error::Error::source(&err).is_some());
    assert!(!session.cards()[0].revealed);
}

#[tokio::test]
async fn test_pass_and_history() {
    let (mut session, oracle) = session(&["RIVER - 2", "HILL - 1"]);
    session.play().await.expect("hint");
    session.pass();
    assert_eq!(session.current_team(), Side::B);

    let (text, _) = session.play().await.expect("hint");
    assert_eq!(text, ":red[HILL - 1]");
    assert_eq!(oracle.calls(), 2);
    assert_eq!(session.history(Side::A), vec!["RIVER - 2".to_string()]);
    assert_eq!(session.history(Side::B), vec!["HILL - 1".to_string()]);
}

#[tokio::test]
async fn test_restart_with_same_seed_reproduces_board() {
    let (mut session, _oracle) = session(&["RIVER - 2"]);
    let original = session.board().clone();
    session.play().await.expect("hint");
    session.guess(index_of(&session, Team::TeamB)).expect("guess");

    session.restart(Some(42)).expect("restart");
    assert_eq!(session.board(), &original);
    assert!(session.cards().iter().all(|c| !c.revealed));
    assert_eq!(session.current_team(), Side::A);
    assert!(session.history(Side::A).is_empty());
    assert_eq!(session.status(), GameStatus::Continue);

    session.restart(Some(7)).expect("restart");
    assert_ne!(session.board(), &original);
    assert_eq!(session.seed(), 7);
}

#[tokio::test]
async fn test_settings_flow_from_config() {
    let toml = r#"
llm_model = "gpt-4o-mini"
use_full_history = false
retry_budget = 0
prompt_template = "Mine: {SLF}"
instruction = "Answer WORD - N."
seed = 3
"#;
    let config = SpymasterConfig::from_toml(toml).expect("config");
    let oracle = Arc::new(ScriptedOracle::new(["bad reply", "RIVER - 1"]));
    let mut session =
        GameSession::from_config("cfg".to_string(), &config, oracle.clone()).expect("session");

    assert!(session.play().await.is_err());
    assert_eq!(oracle.calls(), 1);

    let request = &oracle.requests()[0];
    assert_eq!(request.model, "gpt-4o-mini");
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].text, "Answer WORD - N.");
    assert!(request.messages[1].text.starts_with("Mine: "));

    session.spymaster_mut().set_retry_budget(2);
    let (text, _) = session.play().await.expect("hint");
    assert_eq!(text, ":blue[RIVER - 1]");
}
