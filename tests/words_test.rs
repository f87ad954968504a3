//! Tests for language word lists.

use codenames_spymaster::{WordList, available_languages, generate_board};
use std::fs;

#[test]
fn test_builtin_lists_make_boards() {
    for language in ["en", "fr"] {
        let list = WordList::default_for(language).expect("built-in");
        assert_eq!(list.language(), language);
        assert!(list.len() >= 100);
        assert!(generate_board(list.words(), 5, 1).is_ok());
    }
    assert!(WordList::default_for("xx").is_err());
}

#[test]
fn test_parse_trims_and_dedups() {
    let list = WordList::parse("en", "  apple\n\nPEAR \napple\r\nplum");
    assert_eq!(list.words(), &vec!["apple".to_string(), "PEAR".to_string(), "plum".to_string()]);
}

#[test]
fn test_directory_overrides_and_extends() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("de.txt"), "HUND\nKATZE\n").expect("write");
    fs::write(dir.path().join("en.txt"), "ONLY\nTHREE\nWORDS\n").expect("write");
    fs::write(dir.path().join("notes.md"), "ignored").expect("write");

    assert_eq!(
        available_languages(Some(dir.path())),
        vec!["de".to_string(), "en".to_string(), "fr".to_string()]
    );

    let en = WordList::load("en", Some(dir.path())).expect("load");
    assert_eq!(en.len(), 3);
    let fr = WordList::load("fr", Some(dir.path())).expect("load");
    assert!(fr.len() >= 100);
    let de = WordList::load("de", Some(dir.path())).expect("load");
    assert_eq!(de.words(), &vec!["HUND".to_string(), "KATZE".to_string()]);
}

#[test]
fn test_available_languages_without_dir() {
    assert_eq!(available_languages(None), vec!["en".to_string(), "fr".to_string()]);
}

#[test]
fn test_missing_file_errors() {
    assert!(WordList::from_file("en", "/no/such/words.txt").is_err());
}
