use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(source: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(source).expect("lexer pattern must compile"),
        handler,
    }
}

lazy_static! {
    // Order matters: the first pattern matching at the cursor wins, so
    // longer operators are listed before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern(r#"^(?i:rb|br|fr|rf|r|b|u|f)?(?:"""(?s:.*?)"""|'''(?s:.*?)'''|"(?:[^"\\\n]|\\(?s:.))*"|'(?:[^'\\\n]|\\(?s:.))*')"#, string_handler),
        pattern(r"^[\p{L}_][\p{L}\p{N}_]*", symbol_handler),
        pattern(r"^(?:0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|(?:[0-9][0-9_]*(?:\.[0-9_]*)?|\.[0-9][0-9_]*)(?:[eE][+-]?[0-9_]+)?[jJ]?)", number_handler),
        pattern(r"^\r?\n", newline_handler),
        pattern(r"^\\\r?\n", continuation_handler),
        pattern(r"^[ \t\x0C\r]+", skip_handler),
        pattern(r"^#[^\n]*", skip_handler),
        pattern(r"^\*\*=", MK_DEFAULT_HANDLER!(TokenKind::DoubleStarEquals, "**=")),
        pattern(r"^//=", MK_DEFAULT_HANDLER!(TokenKind::DoubleSlashEquals, "//=")),
        pattern(r"^<<=", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeftEquals, "<<=")),
        pattern(r"^>>=", MK_DEFAULT_HANDLER!(TokenKind::ShiftRightEquals, ">>=")),
        pattern(r"^\.\.\.", MK_DEFAULT_HANDLER!(TokenKind::Ellipsis, "...")),
        pattern(r"^\*\*", MK_DEFAULT_HANDLER!(TokenKind::DoubleStar, "**")),
        pattern(r"^//", MK_DEFAULT_HANDLER!(TokenKind::DoubleSlash, "//")),
        pattern(r"^->", MK_DEFAULT_HANDLER!(TokenKind::Arrow, "->")),
        pattern(r"^:=", MK_DEFAULT_HANDLER!(TokenKind::ColonEquals, ":=")),
        pattern(r"^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern(r"^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern(r"^<<", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft, "<<")),
        pattern(r"^>>", MK_DEFAULT_HANDLER!(TokenKind::ShiftRight, ">>")),
        pattern(r"^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern(r"^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern(r"^\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
        pattern(r"^-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
        pattern(r"^\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
        pattern(r"^/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
        pattern(r"^%=", MK_DEFAULT_HANDLER!(TokenKind::PercentEquals, "%=")),
        pattern(r"^@=", MK_DEFAULT_HANDLER!(TokenKind::AtEquals, "@=")),
        pattern(r"^&=", MK_DEFAULT_HANDLER!(TokenKind::AmpersandEquals, "&=")),
        pattern(r"^\|=", MK_DEFAULT_HANDLER!(TokenKind::PipeEquals, "|=")),
        pattern(r"^\^=", MK_DEFAULT_HANDLER!(TokenKind::CaretEquals, "^=")),
        pattern(r"^\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern(r"^\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern(r"^\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern(r"^\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern(r"^\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern(r"^\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern(r"^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern(r"^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern(r"^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern(r"^\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern(r"^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern(r"^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern(r"^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern(r"^@", MK_DEFAULT_HANDLER!(TokenKind::At, "@")),
        pattern(r"^\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern(r"^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern(r"^\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern(r"^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern(r"^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern(r"^~", MK_DEFAULT_HANDLER!(TokenKind::Tilde, "~")),
        pattern(r"^&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
        pattern(r"^\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
        pattern(r"^\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
    ];
}

/// Tokenizer state for one lambda block.
///
/// Besides the cursor it tracks the bracket depth (line breaks inside
/// brackets are not statement boundaries) and the stack of indentation
/// widths used to emit `Indent`/`Dedent` tokens.
pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
    line_start: usize,
    depth: usize,
    indents: Vec<usize>,
    at_line_start: bool,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("<lambda>"))
        };

        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line: 1,
            line_start: 0,
            depth: 0,
            indents: vec![0],
            at_line_start: true,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    /// Advances over `text`, keeping line bookkeeping for embedded newlines.
    pub fn advance_over(&mut self, text: &str) {
        for (offset, c) in text.char_indices() {
            if c == '\n' {
                self.line += 1;
                self.line_start = self.pos + offset + 1;
            }
        }
        self.pos += text.len();
    }

    pub fn push(&mut self, token: Token) {
        if token.kind.opens_group() {
            self.depth += 1;
        } else if token.kind.closes_group() {
            self.depth = self.depth.saturating_sub(1);
        }
        self.tokens.push(token);
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, (self.pos - self.line_start) as u32 + 1, &self.file)
    }

    /// Span of `text` starting at the cursor, assuming it stays on one line.
    pub fn span_of(&self, text: &str) -> Span {
        let start = self.position();
        let mut end = start.clone();
        end.column += text.chars().count() as u32;
        Span { start, end }
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn last_kind(&self) -> Option<TokenKind> {
        self.tokens.last().map(|token| token.kind)
    }

    fn push_marker(&mut self, kind: TokenKind) {
        let span = self.span_of("");
        self.push(MK_TOKEN!(kind, String::new(), span));
    }

    fn handle_indentation(&mut self) -> Result<(), Error> {
        self.at_line_start = false;

        let mut width = 0;
        let mut consumed = 0;
        for c in self.remainder().chars() {
            match c {
                ' ' => width += 1,
                '\t' => width = (width / 8 + 1) * 8,
                '\x0C' => width = 0,
                _ => break,
            }
            consumed += 1;
        }

        let rest = &self.remainder()[consumed..];
        let blank = rest.is_empty()
            || rest.starts_with('\n')
            || rest.starts_with("\r\n")
            || rest.starts_with('#');
        self.advance_n(consumed);
        if blank {
            return Ok(());
        }

        let current = *self.indents.last().unwrap_or(&0);
        if width > current {
            self.indents.push(width);
            self.push_marker(TokenKind::Indent);
            return Ok(());
        }

        while width < *self.indents.last().unwrap_or(&0) {
            self.indents.pop();
            self.push_marker(TokenKind::Dedent);
        }

        if width != *self.indents.last().unwrap_or(&0) {
            return Err(Error::new(ErrorImpl::InconsistentIndentation, self.position()));
        }

        Ok(())
    }

    fn finish(&mut self) {
        if !matches!(self.last_kind(), None | Some(TokenKind::Newline)) {
            self.push_marker(TokenKind::Newline);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push_marker(TokenKind::Dedent);
        }
        self.push_marker(TokenKind::EOF);
    }
}

fn matched<'a>(lexer: &'a Lexer, regex: &Regex) -> &'a str {
    regex
        .find(lexer.remainder())
        .map(|found| found.as_str())
        .unwrap_or("")
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = matched(lexer, regex).to_string();
    let span = lexer.span_of(&value);
    lexer.advance_n(value.len());
    lexer.push(MK_TOKEN!(TokenKind::Number, value, span));
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let skipped = matched(lexer, regex).len();
    lexer.advance_n(skipped);
}

fn newline_handler(lexer: &mut Lexer, regex: &Regex) {
    if lexer.depth == 0 && !matches!(lexer.last_kind(), None | Some(TokenKind::Newline)) {
        let span = lexer.span_of("");
        lexer.push(MK_TOKEN!(TokenKind::Newline, String::from("\n"), span));
    }

    let text = matched(lexer, regex).to_string();
    lexer.advance_over(&text);
    lexer.at_line_start = lexer.depth == 0;
}

fn continuation_handler(lexer: &mut Lexer, regex: &Regex) {
    let text = matched(lexer, regex).to_string();
    lexer.advance_over(&text);
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let literal = matched(lexer, regex).to_string();
    let prefix = &literal[..literal.find(['"', '\'']).unwrap_or(0)];
    let kind = if prefix.contains(['f', 'F']) {
        TokenKind::FormattedString
    } else {
        TokenKind::String
    };

    let start = lexer.position();
    lexer.advance_over(&literal);
    let end = lexer.position();

    lexer.push(MK_TOKEN!(kind, literal, Span { start, end }));
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = matched(lexer, regex).to_string();
    let span = lexer.span_of(&value);
    lexer.advance_n(value.len());

    if let Some(kind) = RESERVED_LOOKUP.get(value.as_str()) {
        lexer.push(MK_TOKEN!(*kind, value, span));
    } else {
        lexer.push(MK_TOKEN!(TokenKind::Identifier, value, span));
    }
}

/// Splits lambda block source into tokens.
///
/// The returned stream always ends with `Newline` (unless empty), the
/// `Dedent`s closing every open block, and `EOF`.
pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        if lex.at_line_start && lex.depth == 0 {
            lex.handle_indentation()?;
            if lex.at_eof() {
                break;
            }
        }

        let mut matched = false;

        for pattern in PATTERNS.iter() {
            if pattern.regex.is_match(lex.remainder()) {
                (pattern.handler)(&mut lex, &pattern.regex);
                matched = true;
                break;
            }
        }

        if !matched {
            let token = lex.at();
            let error = if token == '"' || token == '\'' {
                ErrorImpl::UnterminatedString
            } else {
                ErrorImpl::UnrecognisedToken {
                    token: token.to_string(),
                }
            };
            return Err(Error::new(error, lex.position()));
        }
    }

    lex.finish();
    Ok(lex.tokens)
}
