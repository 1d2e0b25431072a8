use pretty_assertions::assert_eq;
use prosetag_engine::{Cmd, Document, ScanDepthOracle, Syntax, TagStore, reclassify};
use rstest::rstest;
use xi_rope::Rope;

/// Renders one line per document line: its classification and its text.
fn render_classification(doc: &Document) -> String {
    let text = doc.text();
    let mut out = String::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let stripped = line.trim_end_matches('\n');
        if stripped.trim().is_empty() {
            out.push_str("sep\n");
        } else if doc.is_prose_line(offset) {
            out.push_str(&format!("prose: {stripped}\n"));
        } else {
            out.push_str(&format!("code: {stripped}\n"));
        }
        offset += line.len();
    }
    out
}

#[test]
fn scenario_code_and_two_prose_paragraphs() {
    let doc = Document::from_bytes(b"(foo)\n\nPlain text here.\n\nNot quite ) balanced.\n")
        .unwrap();

    insta::assert_snapshot!(render_classification(&doc), @r"
    code: (foo)
    sep
    prose: Plain text here.
    sep
    prose: Not quite ) balanced.
    ");

    // the first prose paragraph's newline carries the non-terminating mark,
    // the document-final one does not
    assert!(doc.tags().is_non_terminating_newline(23));
    assert!(!doc.tags().is_non_terminating_newline(46));
}

#[test]
fn scenario_docstring_inside_defun_stays_code() {
    let doc = Document::from_bytes(b"(defun f ()\n  \"doc\"\n  body)\n").unwrap();
    assert!(!doc.is_prose_line(0));
    assert!(!doc.is_prose_line(12));
    assert!(!doc.is_prose_line(20));
    assert!(doc.tags().is_empty());
}

#[rstest]
#[case::open_bracket("(foo bar)\n", false)]
#[case::square_bracket("[foo bar]\n", false)]
#[case::quote_then_bracket("`(foo bar)\n", false)]
#[case::bare_quote_at_eol("`\n", false)]
#[case::comment_marker(";; remark\n", false)]
#[case::ordinary_words("Plain words.\n", true)]
#[case::quote_then_word("`foo is quoted prose\n", true)]
#[case::punctuation("-- dashes are not code --\n", true)]
fn first_line_determinism(#[case] text: &str, #[case] prose: bool) {
    let doc = Document::from_bytes(text.as_bytes()).unwrap();
    assert_eq!(doc.is_prose_line(0), prose, "document: {text:?}");
}

#[test]
fn indented_paragraph_under_open_expression_is_code() {
    // depth > 0 at the indented paragraph start, so leading characters are
    // never consulted
    let doc = Document::from_bytes(b"(let ((x 1))\n\n  Words that look like prose\n").unwrap();
    assert!(!doc.is_prose_line(15));
}

#[test]
fn unindented_paragraph_after_separator_ignores_depth() {
    // same dangling open bracket, but the new paragraph starts at column
    // zero, so only its leading characters decide
    let doc = Document::from_bytes(b"(let ((x 1))\n\nWords at column zero\n").unwrap();
    assert!(doc.is_prose_line(14));
}

#[test]
fn continuation_lines_inherit_across_the_paragraph() {
    let doc = Document::from_bytes(b"Prose opener\n;;; comment-ish\n(bracket-ish)\n").unwrap();
    // every line of the paragraph is prose, whatever its own first chars say
    assert!(doc.is_prose_line(0));
    assert!(doc.is_prose_line(13));
    assert!(doc.is_prose_line(29));
}

#[test]
fn classification_is_uniform_within_each_paragraph() {
    let text = "(foo)\n(bar)\n\nOne prose line\nand another\n\n;; code again\nstill code\n";
    let doc = Document::from_bytes(text.as_bytes()).unwrap();

    let mut offset = 0;
    let mut paragraphs: Vec<Vec<bool>> = vec![Vec::new()];
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if !paragraphs.last().unwrap().is_empty() {
                paragraphs.push(Vec::new());
            }
        } else {
            paragraphs.last_mut().unwrap().push(doc.is_prose_line(offset));
        }
        offset += line.len();
    }

    for para in paragraphs.iter().filter(|p| !p.is_empty()) {
        assert!(
            para.iter().all(|&p| p == para[0]),
            "mixed classification in {para:?}"
        );
    }
}

#[test]
fn reclassification_is_idempotent() {
    let text = "(foo)\n\nPlain text here.\n\nNot quite ) balanced.\n";
    let rope = Rope::from(text);
    let syntax = Syntax::default();
    let mut tags = TagStore::new();
    let mut oracle = ScanDepthOracle::new(syntax.clone());

    reclassify(&rope, &mut tags, &mut oracle, &syntax, 0, rope.len());
    let once: Vec<_> = tags.iter().collect();
    reclassify(&rope, &mut tags, &mut oracle, &syntax, 0, rope.len());
    let twice: Vec<_> = tags.iter().collect();
    assert_eq!(once, twice);
}

#[test]
fn edits_converge_to_the_same_tags_as_a_fresh_load() {
    let mut doc = Document::from_bytes(b"(foo)\n\nfirst draft\n").unwrap();
    doc.apply(Cmd::ReplaceRange {
        range: 7..18,
        text: "Plain text here.".to_string(),
    });
    doc.apply(Cmd::InsertText {
        at: doc.len(),
        text: "\nNot quite ) balanced.\n".to_string(),
    });

    let fresh = Document::from_bytes(doc.text().as_bytes()).unwrap();
    let edited: Vec<_> = doc.tags().iter().collect();
    let reloaded: Vec<_> = fresh.tags().iter().collect();
    assert_eq!(edited, reloaded);
}

#[test]
fn flipping_a_paragraph_start_reflows_its_continuations() {
    let mut doc = Document::from_bytes(b"(code start\n;; tail one\n;; tail two\n").unwrap();
    assert!(!doc.is_prose_line(12));

    // replacing the opener with words flips the whole paragraph to prose
    doc.apply(Cmd::ReplaceRange {
        range: 0..11,
        text: "Prose start".to_string(),
    });
    assert!(doc.is_prose_line(0));
    assert!(doc.is_prose_line(12));
    assert!(doc.is_prose_line(24));
}

#[test]
fn custom_syntax_markers_are_honored() {
    let syntax = Syntax {
        open_brackets: vec!['{'],
        close_brackets: vec!['}'],
        quote_char: '\'',
        comment_marker: '#',
        string_delim: '"',
    };
    let doc = Document::with_syntax(b"# comment\n\n(not a bracket here)\n", syntax).unwrap();
    assert!(!doc.is_prose_line(0));
    assert!(doc.is_prose_line(11));
}
