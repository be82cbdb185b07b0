//! Integration tests for markdown conversion.

use hpcreport::content::{ContentSource, EmbeddedContent, DOCUMENT_NAMES};
use hpcreport::markdown::{to_html, to_plain_text, BlockState, LineKind};

#[test]
fn test_example_document() {
    let markdown = "# Title\n\nSome *text* here.";

    assert_eq!(
        to_html(markdown),
        "<h1>Title</h1>\n\n<p>\nSome <em>text</em> here.\n</p>"
    );
    assert_eq!(to_plain_text(markdown), "Title\n\nSome text here.");
}

#[test]
fn test_conversion_is_total() {
    let inputs = [
        "",
        "#",
        "######",
        "*",
        "***",
        "****",
        "_ _ _",
        "[",
        "[label](",
        "](x)",
        "`",
        "```",
        "```\nunterminated",
        "<",
        "<div",
        "- ",
        "1.",
        "|||",
        "\n\n\n\n",
        "漢字 **emoji 🎉**",
        "\t# tabbed",
    ];

    for input in inputs {
        let _ = to_html(input);
        let _ = to_plain_text(input);
    }
}

#[test]
fn test_each_heading_level_independent() {
    let markdown = "# one\n## two\n### three\n#### four\n##### five\n###### six";
    let html = to_html(markdown);

    assert!(html.contains("<h1>one</h1>"));
    assert!(html.contains("<h2>two</h2>"));
    assert!(html.contains("<h3>three</h3>"));
    assert!(html.contains("<h4>four</h4>"));
    assert!(html.contains("<h5>five</h5>"));
    assert!(html.contains("<h6>six</h6>"));
    assert!(!html.contains('#'));
    assert!(!html.contains("<p>"));
}

#[test]
fn test_six_hashes_never_lower_level() {
    for level in 1..=6 {
        let markdown = format!("{} x", "#".repeat(level));
        assert_eq!(to_html(&markdown), format!("<h{0}>x</h{0}>", level));
    }
    // Seven hashes is not a heading.
    assert!(to_html("####### x").contains("<p>"));
}

#[test]
fn test_strongest_emphasis_first() {
    assert_eq!(to_html("***a***"), "<p>\n<strong><em>a</em></strong>\n</p>");
    assert_eq!(to_html("___a___"), "<p>\n<strong><em>a</em></strong>\n</p>");
    assert_eq!(to_html("**a** and *b*"), "<p>\n<strong>a</strong> and <em>b</em>\n</p>");
    assert_eq!(to_plain_text("***a***"), "a");
}

#[test]
fn test_links_open_in_new_context() {
    let html = to_html("[UA HPC](https://hpc.arizona.edu)");
    assert!(html.contains(
        r#"<a href="https://hpc.arizona.edu" target="_blank" rel="noopener">UA HPC</a>"#
    ));
    assert_eq!(to_plain_text("[UA HPC](https://hpc.arizona.edu)"), "UA HPC");
}

#[test]
fn test_inline_code_and_rules() {
    assert_eq!(to_html("`sbatch`"), "<p>\n<code>sbatch</code>\n</p>");
    assert_eq!(to_html("a\n---\nb"), "<p>\na\n</p>\n<hr>\n<p>\nb\n</p>");
    assert_eq!(to_html("===="), "<hr>");
    assert_eq!(to_plain_text("a\n---\nb"), "a\n\nb");
}

#[test]
fn test_mixed_list_runs_merge() {
    let html = to_html("- apples\n1. first\n* pears");
    assert_eq!(html.matches("<ul>").count(), 1);
    assert_eq!(html.matches("<li>").count(), 3);
    assert!(!html.contains("<ol>"));
    assert!(!html.contains("<p>"));
}

#[test]
fn test_separate_lists_stay_separate() {
    let html = to_html("- a\n\n- b");
    assert_eq!(html.matches("<ul>").count(), 2);
}

#[test]
fn test_blank_lines_close_paragraph_once() {
    let html = to_html("first\nstill first\n\n\n\nsecond");
    assert_eq!(html.matches("<p>").count(), 2);
    assert_eq!(html.matches("</p>").count(), 2);
    assert!(html.starts_with("<p>\nfirst\nstill first\n</p>"));
}

#[test]
fn test_paragraph_closed_by_block_constructs() {
    let html = to_html("text\n## Heading\nmore\n- item");
    assert_eq!(
        html,
        "<p>\ntext\n</p>\n<h2>Heading</h2>\n<p>\nmore\n</p>\n<ul>\n<li>item</li>\n</ul>"
    );
}

#[test]
fn test_plain_text_strips_all_tags() {
    let markdown = "# H\n\n**b** _i_ [l](u) `c`\n\n- item\n1. item\n\n---\n\n<div class=\"x\">raw</div>";
    let text = to_plain_text(markdown);

    assert!(!text.contains('<'), "{}", text);
    assert!(!text.contains('>'), "{}", text);
    assert!(text.contains("raw"));
}

#[test]
fn test_plain_text_heading_indentation() {
    let text = to_plain_text("intro\n## Two\n### Three\n#### Four\n###### Six\nend");
    assert_eq!(text, "intro\n\n  Two\n\n   Three\n    Four\n      Six\nend");
}

#[test]
fn test_plain_text_bullets_and_pipes() {
    assert_eq!(
        to_plain_text("intro\n- one\n+ two\n* three"),
        "intro\n  • one\n  • two\n  • three"
    );
    assert_eq!(to_plain_text("a|b"), "a | b");
}

#[test]
fn test_plain_text_removes_fenced_code() {
    assert_eq!(
        to_plain_text("before\n```\nmodule load gcc\n```\nafter `inline`"),
        "before\n\nafter inline"
    );
}

#[test]
fn test_plain_text_collapses_blank_lines() {
    assert_eq!(to_plain_text("\n\na\n\n\n\n\nb\n\n"), "a\n\nb");
}

#[test]
fn test_line_classification_matches_html_rules() {
    let html = to_html("# h\n- item\n---\ntext");
    let kinds: Vec<LineKind> = html.lines().map(LineKind::classify).collect();
    assert!(kinds.contains(&LineKind::Heading));
    assert!(kinds.contains(&LineKind::ListOpen));
    assert!(kinds.contains(&LineKind::ListItem));
    assert!(kinds.contains(&LineKind::ListClose));
    assert!(kinds.contains(&LineKind::Rule));

    let step = BlockState::Idle.transition(LineKind::Text);
    assert!(step.open_paragraph);
    assert_eq!(step.next, BlockState::InParagraph);
}

#[test]
fn test_embedded_documents_convert() {
    for name in DOCUMENT_NAMES {
        let markdown = EmbeddedContent.fetch(name).unwrap();

        let html = to_html(&markdown);
        assert!(html.starts_with("<h1>"), "{}", name);
        assert_eq!(
            html.matches("<p>").count(),
            html.matches("</p>").count(),
            "{}",
            name
        );

        let text = to_plain_text(&markdown);
        assert!(!text.is_empty());
        assert!(!text.contains("<h"), "{}", name);
        assert!(!text.contains("\n\n\n"), "{}", name);
    }
}
