//! Ordered rewrite rules for the markdown subset.
//!
//! Every output mode is an ordered list of `pattern → replacement` rules.
//! Precedence is the order of the list: a rule only ever sees the output of
//! the rules before it, and replacements emit resolved target markup rather
//! than markdown, so later rules do not re-enter consumed spans.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};

/// How a rule rewrites its matches.
#[derive(Clone, Copy)]
pub enum Replacement {
    /// A `regex` replacement template (`${1}` style group references).
    Template(&'static str),
    /// A function computing the replacement from the match.
    Func(fn(&Captures<'_>) -> String),
}

/// A single named rewrite rule.
#[derive(Clone)]
pub struct Rule {
    name: &'static str,
    pattern: Regex,
    replacement: Replacement,
}

impl Rule {
    /// Create a rule from a constant pattern and a replacement template.
    pub fn template(name: &'static str, pattern: &str, template: &'static str) -> Self {
        Self::new(name, pattern, Replacement::Template(template))
    }

    /// Create a rule whose replacement is computed by a function.
    pub fn func(name: &'static str, pattern: &str, func: fn(&Captures<'_>) -> String) -> Self {
        Self::new(name, pattern, Replacement::Func(func))
    }

    fn new(name: &'static str, pattern: &str, replacement: Replacement) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    /// Rule name, used in debug logging and tests.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply this rule to every match in `text`.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match self.replacement {
            Replacement::Template(template) => self.pattern.replace_all(text, template),
            Replacement::Func(func) => self.pattern.replace_all(text, func),
        }
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// An ordered list of rules applied one after another.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; it runs after every rule already in the set.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Builder form of [`RuleSet::push`].
    pub fn with(mut self, rule: Rule) -> Self {
        self.push(rule);
        self
    }

    /// Names of the rules in application order.
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(Rule::name).collect()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in order over `text`.
    pub fn apply(&self, text: &str) -> String {
        let mut output = text.to_string();
        for rule in &self.rules {
            if let Cow::Owned(rewritten) = rule.apply(&output) {
                output = rewritten;
            }
        }
        output
    }

    /// Rules shared by both output modes for emphasis, strongest marker first.
    ///
    /// `templates` holds the replacements for triple (bold+italic), double
    /// (bold) and single (italic) markers, in that order.
    fn emphasis(mut self, templates: [&'static str; 3]) -> Self {
        let [triple, double, single] = templates;
        self.push(Rule::template("strong_em_star", r"\*\*\*(.+?)\*\*\*", triple));
        self.push(Rule::template("strong_star", r"\*\*(.+?)\*\*", double));
        self.push(Rule::template("em_star", r"\*(.+?)\*", single));
        self.push(Rule::template("strong_em_underscore", r"___(.+?)___", triple));
        self.push(Rule::template("strong_underscore", r"__(.+?)__", double));
        self.push(Rule::template("em_underscore", r"_(.+?)_", single));
        self
    }

    /// The HTML rule list, up to but excluding paragraph wrapping.
    pub fn html() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::new()
                .with(Rule::template("h6", r"(?m)^######[ \t]+(.+)$", "<h6>${1}</h6>"))
                .with(Rule::template("h5", r"(?m)^#####[ \t]+(.+)$", "<h5>${1}</h5>"))
                .with(Rule::template("h4", r"(?m)^####[ \t]+(.+)$", "<h4>${1}</h4>"))
                .with(Rule::template("h3", r"(?m)^###[ \t]+(.+)$", "<h3>${1}</h3>"))
                .with(Rule::template("h2", r"(?m)^##[ \t]+(.+)$", "<h2>${1}</h2>"))
                .with(Rule::template("h1", r"(?m)^#[ \t]+(.+)$", "<h1>${1}</h1>"))
                .emphasis([
                    "<strong><em>${1}</em></strong>",
                    "<strong>${1}</strong>",
                    "<em>${1}</em>",
                ])
                .with(Rule::template(
                    "link",
                    r"\[([^\]\n]+)\]\(([^)\n]+)\)",
                    r#"<a href="${2}" target="_blank" rel="noopener">${1}</a>"#,
                ))
                .with(Rule::template("code", r"`([^`\n]+)`", "<code>${1}</code>"))
                .with(Rule::template("rule_dash", r"(?m)^-{3,}$", "<hr>"))
                .with(Rule::template("rule_equals", r"(?m)^={3,}$", "<hr>"))
                .with(Rule::template(
                    "bullet_item",
                    r"(?m)^[ \t]*[*+-][ \t]+(.+)$",
                    "<li>${1}</li>",
                ))
                .with(Rule::template(
                    "ordered_item",
                    r"(?m)^[ \t]*\d+\.[ \t]+(.+)$",
                    "<li>${1}</li>",
                ))
                .with(Rule::func("list_group", r"(?m)(?:^<li>.*</li>$\n?)+", group_list))
        })
    }

    /// The plain-text rule list, including blank-line collapsing.
    pub fn plain_text() -> &'static RuleSet {
        static RULES: OnceLock<RuleSet> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::new()
                .with(Rule::template("strip_tags", r"<[^>\n]*>", ""))
                .with(Rule::template("h6", r"(?m)^######[ \t]+(.+)$", "      ${1}"))
                .with(Rule::template("h5", r"(?m)^#####[ \t]+(.+)$", "     ${1}"))
                .with(Rule::template("h4", r"(?m)^####[ \t]+(.+)$", "    ${1}"))
                .with(Rule::template("h3", r"(?m)^###[ \t]+(.+)$", "\n   ${1}"))
                .with(Rule::template("h2", r"(?m)^##[ \t]+(.+)$", "\n  ${1}"))
                .with(Rule::template("h1", r"(?m)^#[ \t]+(.+)$", "\n${1}\n"))
                .with(Rule::template("table_pipe", r"\|", " | "))
                .emphasis(["${1}", "${1}", "${1}"])
                .with(Rule::template("link", r"\[([^\]\n]+)\]\(([^)\n]+)\)", "${1}"))
                .with(Rule::template("code_fence", r"(?s)```.*?```", ""))
                .with(Rule::template("code", r"`([^`\n]+)`", "${1}"))
                .with(Rule::template("rule_dash", r"(?m)^-{3,}$", ""))
                .with(Rule::template("rule_equals", r"(?m)^={3,}$", ""))
                .with(Rule::template("bullet_item", r"(?m)^[ \t]*[*+-][ \t]+", "  • "))
                .with(Rule::template("blank_lines", r"\n{3,}", "\n\n"))
        })
    }
}

/// Wrap a run of consecutive `<li>` lines in one list container.
///
/// Ordered and unordered items share the container; adjacent runs of both
/// kinds become a single list.
fn group_list(caps: &Captures<'_>) -> String {
    let items = &caps[0];
    if items.ends_with('\n') {
        format!("<ul>\n{}</ul>\n", items)
    } else {
        format!("<ul>\n{}\n</ul>", items)
    }
}
