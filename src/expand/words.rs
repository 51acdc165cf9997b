//! Shell word lexing: quoting, escapes, tilde and parameter expansion
//!
//! Produces the words a POSIX shell would hand to pathname expansion, with
//! each word carrying a glob pattern in which quoted characters are escaped.
//! Quote removal and word boundaries are tracked here; tilde and variable
//! substitution inside each segment is done by `shellexpand`. Command
//! substitution is refused rather than executed.

use crate::error::IncludeError;
use std::collections::HashSet;
use std::env::VarError;
use std::iter::Peekable;
use std::str::Chars;

/// One shell word after quote removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Word {
    text: String,
    pattern: String,
    quoted: bool,
    after_star: bool,
}

impl Word {
    /// The word with quotes removed, as a shell would print it.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Glob pattern for the word; quoted metacharacters are escaped.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether any part of the word came from a quoted or escaped region.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    fn push_literal_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.pattern.push_str(&glob::Pattern::escape(s));
        self.after_star = false;
    }

    /// `**` has no recursive meaning in a shell word, so runs of `*` collapse to one.
    fn push_active(&mut self, c: char) {
        self.text.push(c);
        if c == '*' && self.after_star {
            return;
        }
        self.pattern.push(c);
        self.after_star = c == '*';
    }

    fn is_untouched(&self) -> bool {
        self.text.is_empty() && !self.quoted
    }
}

/// Raw text of one word before substitution.
#[derive(Debug)]
enum Segment {
    /// Unquoted: tilde and variables expand, the result is field-split and glob-active.
    Bare(String),
    /// Double-quoted: variables expand, the result is literal.
    Soft(String),
    /// Single-quoted or backslash-escaped.
    Literal(String),
}

#[derive(Debug, Default)]
struct RawWord {
    segments: Vec<Segment>,
    quoted: bool,
}

impl RawWord {
    fn bare(&mut self, s: &str) {
        match self.segments.last_mut() {
            Some(Segment::Bare(text)) => text.push_str(s),
            _ => self.segments.push(Segment::Bare(s.to_string())),
        }
    }

    fn soft(&mut self, s: &str) {
        match self.segments.last_mut() {
            Some(Segment::Soft(text)) => text.push_str(s),
            _ => self.segments.push(Segment::Soft(s.to_string())),
        }
    }

    fn literal(&mut self, c: char) {
        self.quoted = true;
        match self.segments.last_mut() {
            Some(Segment::Literal(text)) => text.push(c),
            _ => self.segments.push(Segment::Literal(c.to_string())),
        }
    }

    fn is_empty(&self) -> bool {
        self.segments.is_empty() && !self.quoted
    }
}

/// Knobs and lookups used while lexing.
pub struct Lexer<F> {
    lookup: F,
    strict_variables: bool,
}

impl<F> Lexer<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// `lookup` resolves variable names; `HOME` is also used for `~`.
    pub fn new(lookup: F) -> Self {
        Self { lookup, strict_variables: false }
    }

    /// Treat unset variables as an error instead of the empty string.
    pub fn strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }

    /// Split `input` into words.
    pub fn split(&self, input: &str) -> Result<Vec<Word>, IncludeError> {
        let mut words = Vec::new();
        for raw in self.scan(input)? {
            self.substitute(raw, &mut words)?;
        }
        Ok(words)
    }

    /// Find word boundaries and quoted regions without substituting anything.
    fn scan(&self, input: &str) -> Result<Vec<RawWord>, IncludeError> {
        let mut words = Vec::new();
        let mut current = RawWord::default();
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                ' ' | '\t' => {
                    if !current.is_empty() {
                        words.push(std::mem::take(&mut current));
                    }
                }
                '\n' | '|' | '&' | ';' | '<' | '>' | '(' | ')' | '{' | '}' => {
                    return Err(IncludeError::expansion(format!("illegal character '{}'", c.escape_default())));
                }
                '`' => return Err(IncludeError::expansion("command substitution is not supported")),
                '\\' => match chars.next() {
                    Some('\n') => {}
                    Some(next) => current.literal(next),
                    None => return Err(IncludeError::expansion("trailing backslash")),
                },
                '\'' => {
                    current.quoted = true;
                    loop {
                        match chars.next() {
                            Some('\'') => break,
                            Some(ch) => current.literal(ch),
                            None => return Err(IncludeError::expansion("unterminated single quote")),
                        }
                    }
                }
                '"' => {
                    current.quoted = true;
                    self.scan_double_quoted(&mut chars, &mut current)?;
                }
                '$' => {
                    let parameter = self.scan_parameter(&mut chars)?;
                    current.bare(&parameter);
                }
                other => current.bare(other.encode_utf8(&mut [0u8; 4])),
            }
        }
        if !current.is_empty() {
            words.push(current);
        }

        Ok(words)
    }

    fn scan_double_quoted(&self, chars: &mut Peekable<Chars<'_>>, current: &mut RawWord) -> Result<(), IncludeError> {
        loop {
            match chars.next() {
                Some('"') => return Ok(()),
                Some('\\') => match chars.peek().copied() {
                    Some(next @ ('$' | '"' | '\\' | '`')) => {
                        chars.next();
                        current.literal(next);
                    }
                    Some('\n') => {
                        chars.next();
                    }
                    _ => current.literal('\\'),
                },
                Some('$') => {
                    let parameter = self.scan_parameter(chars)?;
                    current.soft(&parameter);
                }
                Some('`') => return Err(IncludeError::expansion("command substitution is not supported")),
                Some(ch) => current.soft(ch.encode_utf8(&mut [0u8; 4])),
                None => return Err(IncludeError::expansion("unterminated double quote")),
            }
        }
    }

    /// Raw text of the parameter reference starting at a `$`, kept whole for substitution.
    fn scan_parameter(&self, chars: &mut Peekable<Chars<'_>>) -> Result<String, IncludeError> {
        match chars.peek().copied() {
            Some('(') => Err(IncludeError::expansion("command substitution is not supported")),
            Some('{') => {
                chars.next();
                let mut body = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => body.push(ch),
                        None => return Err(IncludeError::expansion("unterminated '${'")),
                    }
                }
                // The default of `${NAME:-word}` is itself expanded before use.
                if let Some((name, default)) = body.split_once(":-").filter(|(name, _)| !name.is_empty()) {
                    let default = self.expand_env(default)?;
                    return Ok(format!("${{{name}:-{default}}}"));
                }
                Ok(format!("${{{body}}}"))
            }
            _ => Ok("$".to_string()),
        }
    }

    fn substitute(&self, raw: RawWord, words: &mut Vec<Word>) -> Result<(), IncludeError> {
        let mut current = Word { quoted: raw.quoted, ..Word::default() };
        let more_follow = raw.segments.len() > 1;

        for (idx, segment) in raw.segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => current.push_literal_str(text),
                Segment::Soft(text) => current.push_literal_str(&self.expand_env(text)?),
                Segment::Bare(text) => {
                    let rest = if idx == 0 { self.expand_tilde(text, more_follow, &mut current) } else { text };
                    for ch in self.expand_env(rest)?.chars() {
                        if matches!(ch, ' ' | '\t' | '\n') {
                            finish(words, &mut current);
                        } else {
                            current.push_active(ch);
                        }
                    }
                }
            }
        }
        finish(words, &mut current);

        Ok(())
    }

    /// Expand a leading `~` or `~/`; the home directory is pushed as literal text.
    /// `~user` and a `~` followed by a quoted segment stay as written.
    fn expand_tilde<'t>(&self, text: &'t str, more_follow: bool, current: &mut Word) -> &'t str {
        if !text.starts_with('~') {
            return text;
        }
        let split = text.find('/').unwrap_or(text.len());
        if split == text.len() && more_follow {
            return text;
        }

        let (head, tail) = text.split_at(split);
        let expanded = shellexpand::tilde_with_context(head, || self.home());
        if expanded == head {
            return text;
        }
        current.push_literal_str(&expanded);
        current.quoted = true;
        tail
    }

    /// Substitute `$NAME`, `${NAME}` and `${NAME:-word}` in `text`.
    ///
    /// Unset names are an error in strict mode and expand to nothing otherwise.
    fn expand_env(&self, text: &str) -> Result<String, IncludeError> {
        let mut blank: HashSet<String> = HashSet::new();
        loop {
            let context = |name: &str| match (self.lookup)(name) {
                Some(value) => Ok(Some(value)),
                None if blank.contains(name) => Ok(Some(String::new())),
                None => Err(VarError::NotPresent),
            };
            match shellexpand::env_with_context(text, context) {
                Ok(expanded) => return Ok(expanded.into_owned()),
                Err(err) if !self.strict_variables && blank.insert(err.var_name.clone()) => continue,
                Err(err) => {
                    return Err(IncludeError::expansion(format!("undefined variable '{}'", err.var_name)));
                }
            }
        }
    }

    fn home(&self) -> Option<String> {
        (self.lookup)("HOME")
            .filter(|h| !h.is_empty())
            .or_else(|| dirs::home_dir().and_then(|p| p.to_str().map(str::to_string)))
    }
}

fn finish(words: &mut Vec<Word>, current: &mut Word) {
    if !current.is_untouched() {
        words.push(std::mem::take(current));
    }
}
