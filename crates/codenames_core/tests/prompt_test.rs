//! Tests for prompt templates.

use codenames_core::{DEFAULT_PROMPT, PromptTemplate, PromptWords, TemplateError};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

#[test]
fn test_render_substitutes_all_lists() {
    let own = words(&["KING", "BANK"]);
    let opponent = words(&["EAGLE"]);
    let neutral = words(&["BEE", "SLIP"]);
    let killer = words(&["PLATYPUS"]);
    let template = PromptTemplate::new("{SLF} | {OPP} | {NTR} | {KLL}");

    let rendered = template
        .render(&PromptWords {
            own: &own,
            opponent: &opponent,
            neutral: &neutral,
            killer: &killer,
        })
        .expect("render");

    assert_eq!(rendered, "KING, BANK | EAGLE | BEE, SLIP | PLATYPUS");
}

#[test]
fn test_escaped_braces() {
    let template = PromptTemplate::new("{{literal}} {KLL}");
    let killer = words(&["X"]);
    let rendered = template
        .render(&PromptWords {
            own: &[],
            opponent: &[],
            neutral: &[],
            killer: &killer,
        })
        .expect("render");
    assert_eq!(rendered, "{literal} X");
}

#[test]
fn test_unknown_placeholder() {
    let template = PromptTemplate::new("Words: {SELF}");
    assert_eq!(
        template.validate(),
        Err(TemplateError::UnknownPlaceholder("SELF".into()))
    );
}

#[test]
fn test_unbalanced_braces() {
    assert_eq!(
        PromptTemplate::new("oops {SLF").validate(),
        Err(TemplateError::UnclosedBrace(5))
    );
    assert_eq!(
        PromptTemplate::new("oops }").validate(),
        Err(TemplateError::UnmatchedBrace(5))
    );
}

#[test]
fn test_default_template_is_valid_and_previews() {
    let template = PromptTemplate::default();
    assert_eq!(template.as_str(), DEFAULT_PROMPT);
    assert!(template.validate().is_ok());

    let preview = template.preview().expect("preview");
    assert!(preview.contains("King, Apple, Bank"));
    assert!(preview.contains("Platypus"));
}

#[test]
fn test_non_ascii_template() {
    let template = PromptTemplate::new("Mots à deviner : {SLF}, évitez {KLL}.");
    let own = words(&["CHAT"]);
    let killer = words(&["LOUP"]);
    let rendered = template
        .render(&PromptWords {
            own: &own,
            opponent: &[],
            neutral: &[],
            killer: &killer,
        })
        .expect("render");
    assert_eq!(rendered, "Mots à deviner : CHAT, évitez LOUP.");
}
