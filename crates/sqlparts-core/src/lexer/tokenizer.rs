//! SQL tokenizer implementation.

use tracing::trace;

use super::{
    Flavour, Keyword, LexMode, LexerConfig, ParamSpecKey, Span, SyntaxError, Token, TokenKind,
};

/// Words that follow `END` to close a construct that never opened a block.
const NEUTRAL_CLOSERS: [&str; 4] = ["IF", "WHILE", "REPEAT", "FOR"];

/// Words that, after `CREATE`, introduce an Oracle routine body.
const ORACLE_ROUTINES: [&str; 5] = ["PROCEDURE", "FUNCTION", "PACKAGE", "TRIGGER", "TYPE"];

/// The construct that opened a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Begin,
    Loop,
    Case,
}

/// Scanner state. Saved on the context stack for lookahead and restored
/// when the lookahead does not match.
#[derive(Debug, Clone)]
struct ScanState {
    pos: usize,
    start: usize,
    blocks: Vec<BlockKind>,
    ignore_semi: bool,
    in_param_spec: bool,
    delimiter: String,
    statement_tokens: usize,
    seen_create: bool,
    seen_routine: bool,
    end_qualifier: bool,
}

/// A lexer that tokenizes SQL input.
///
/// Besides splitting text into tokens, the lexer tracks `BEGIN`/`END`
/// nesting so that a delimiter inside a procedural block is returned as a
/// [`TokenKind::RawString`] instead of a [`TokenKind::Semicolon`].
pub struct Lexer<'a> {
    input: &'a str,
    flavour: Flavour,
    mode: LexMode,
    state: ScanState,
    contexts: Vec<ScanState>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer with the default configuration.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, &LexerConfig::default())
    }

    /// Creates a lexer with an explicit configuration.
    #[must_use]
    pub fn with_config(input: &'a str, config: &LexerConfig) -> Self {
        Self {
            input,
            flavour: config.flavour,
            mode: config.mode,
            state: ScanState {
                pos: 0,
                start: 0,
                blocks: Vec::new(),
                ignore_semi: false,
                in_param_spec: false,
                delimiter: config.delimiter.clone(),
                statement_tokens: 0,
                seen_create: false,
                seen_routine: false,
                end_qualifier: false,
            },
            contexts: Vec::new(),
        }
    }

    /// Returns the current block nesting level.
    #[must_use]
    pub fn block_level(&self) -> usize {
        self.state.blocks.len()
    }

    /// Returns the current statement delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.state.delimiter
    }

    /// Returns the flavour this lexer was configured with.
    #[must_use]
    pub const fn flavour(&self) -> Flavour {
        self.flavour
    }

    fn rest(&self) -> &'a str {
        &self.input[self.state.pos..]
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.state.pos += c.len_utf8();
        Some(c)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    fn at_delimiter(&self) -> bool {
        self.rest().starts_with(self.state.delimiter.as_str())
    }

    /// Creates a span from start to current position.
    fn make_span(&self) -> Span {
        Span::new(self.state.start, self.state.pos)
    }

    /// Creates a token with the current span.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.make_span())
    }

    fn illegal(&self, message: &str) -> Token {
        self.make_token(TokenKind::Illegal(String::from(message)))
    }

    fn push_context(&mut self) {
        self.contexts.push(self.state.clone());
    }

    fn pop_context(&mut self) {
        if let Some(saved) = self.contexts.pop() {
            self.state = saved;
        }
    }

    /// Keeps the scanning done since the last push.
    fn merge_context(&mut self) {
        self.contexts.pop();
    }

    /// Scans the next token, merging two-word keywords and updating block
    /// tracking.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        let token = self.scan_token();
        let token = self.merge_composite(token);
        self.track_blocks(&token);
        token
    }

    /// Tokenizes the entire input and returns all tokens, including
    /// whitespace and comments, ending with [`TokenKind::Eof`].
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    /// Returns the tokens of the next statement, without its delimiter.
    ///
    /// Comments are dropped. Whitespace is dropped in parse mode and
    /// inside parameter blocks, and trimmed from both ends in delimit mode.
    /// Empty statements are skipped. Returns `None` once the input is
    /// exhausted. An illegal token aborts scanning of the whole input.
    pub fn next_statement(&mut self) -> Option<Result<Vec<Token>, SyntaxError>> {
        let mut tokens: Vec<Token> = Vec::new();
        loop {
            let in_param_spec = self.state.in_param_spec;
            let token = self.next_token();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    if tokens.iter().any(|t| !t.is_trivia()) {
                        break;
                    }
                    tokens.clear();
                }
                TokenKind::Illegal(ref message) => {
                    let err = SyntaxError::illegal(self.input, token.span, message.clone());
                    self.state.pos = self.input.len();
                    return Some(Err(err));
                }
                TokenKind::Comment => {}
                TokenKind::Space if self.mode == LexMode::Parse || in_param_spec => {}
                _ => tokens.push(token),
            }
        }
        while tokens.last().is_some_and(Token::is_trivia) {
            tokens.pop();
        }
        let first = tokens.iter().position(|t| !t.is_trivia())?;
        tokens.drain(..first);
        Some(Ok(tokens))
    }

    fn scan_token(&mut self) -> Token {
        self.state.start = self.state.pos;

        if self.state.pos >= self.input.len() {
            return self.make_token(TokenKind::Eof);
        }

        if self.at_delimiter() {
            self.state.pos += self.state.delimiter.len();
            if !self.state.ignore_semi && self.state.blocks.is_empty() {
                return self.make_token(TokenKind::Semicolon);
            }
            let text = self.state.delimiter.clone();
            return self.make_token(TokenKind::RawString(text));
        }

        if self.state.in_param_spec {
            if let Some(token) = self.scan_param_spec_part() {
                return token;
            }
        }

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };
        let delimit = self.mode == LexMode::Delimit;

        match c {
            c if c.is_whitespace() => {
                self.advance_while(char::is_whitespace);
                self.make_token(TokenKind::Space)
            }
            '-' if self.peek() == Some('-') => {
                self.advance_while(|c| c != '\n');
                self.make_token(TokenKind::Comment)
            }
            '-' => self.make_token(TokenKind::Minus),
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Comma),
            '*' => self.make_token(TokenKind::Star),
            '/' if self.peek() == Some('*') => self.scan_slash_star(),
            '<' => {
                let kind = match self.peek() {
                    Some('=') => TokenKind::LtEq,
                    Some('>') => TokenKind::NotEq,
                    Some('<') => TokenKind::LeftShift,
                    _ => return self.make_token(TokenKind::Lt),
                };
                self.advance();
                self.make_token(kind)
            }
            '>' => {
                let kind = match self.peek() {
                    Some('=') => TokenKind::GtEq,
                    Some('>') => TokenKind::RightShift,
                    _ => return self.make_token(TokenKind::Gt),
                };
                self.advance();
                self.make_token(kind)
            }
            '\'' => self.scan_string(),
            '"' | '`' => self.scan_quoted_identifier(c),
            'x' | 'X' if matches!(self.peek(), Some('\'' | '"')) => self.scan_blob(),
            '#' => self.scan_hash(),
            '$' => self.scan_dollar(),
            '?' if self.flavour == Flavour::Sqlite => {
                self.advance_while(|c| c.is_ascii_digit());
                let name = &self.input[self.state.start + 1..self.state.pos];
                self.make_token(TokenKind::Param(String::from(name)))
            }
            ':' if self.peek() == Some(':') => {
                self.advance();
                self.make_token(TokenKind::PgCast)
            }
            ':' | '@' if self.flavour == Flavour::Sqlite => {
                self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                let name = &self.input[self.state.start + 1..self.state.pos];
                self.make_token(TokenKind::Param(String::from(name)))
            }
            '|' if delimit => self.make_token(TokenKind::RawString(String::from("|"))),
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_id_start(c) => self.scan_word(),
            _ if delimit => self.scan_raw(),
            _ => self.scan_operator(c),
        }
    }

    /// Scans operators that only exist in parse mode.
    fn scan_operator(&mut self, c: char) -> Token {
        match c {
            '+' => self.make_token(TokenKind::Plus),
            '%' => self.make_token(TokenKind::Percent),
            '/' => self.make_token(TokenKind::Slash),
            '&' => self.make_token(TokenKind::BitAnd),
            '=' => {
                if self.peek() == Some('=') {
                    self.advance();
                }
                self.make_token(TokenKind::Eq)
            }
            '!' => match (self.peek(), self.peek_next()) {
                (Some('='), _) => {
                    self.advance();
                    self.make_token(TokenKind::NotEq)
                }
                (Some('~'), Some('*')) => {
                    self.advance();
                    self.advance();
                    self.make_token(TokenKind::NotRegexpCi)
                }
                (Some('~'), _) => {
                    self.advance();
                    self.make_token(TokenKind::NotRegexp)
                }
                _ => self.illegal("Unexpected character: !"),
            },
            '|' => {
                if self.peek() == Some('|') {
                    self.advance();
                    self.make_token(TokenKind::Concat)
                } else {
                    self.make_token(TokenKind::BitOr)
                }
            }
            '~' => {
                if self.peek() == Some('*') {
                    self.advance();
                    self.make_token(TokenKind::RegexpCi)
                } else if self.flavour == Flavour::Postgresql {
                    self.make_token(TokenKind::Regexp)
                } else {
                    self.make_token(TokenKind::BitNot)
                }
            }
            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.scan_number()
                } else {
                    self.make_token(TokenKind::Dot)
                }
            }
            c => self.make_token(TokenKind::Illegal(format!("Unexpected character: {c}"))),
        }
    }

    /// Scans a run of text the tokenizer does not interpret (delimit mode).
    fn scan_raw(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '*' | '\'' | '"' | '#') || self.at_delimiter() {
                break;
            }
            self.advance();
        }
        let text = &self.input[self.state.start..self.state.pos];
        self.make_token(TokenKind::RawString(String::from(text)))
    }

    /// Scans an identifier or keyword.
    fn scan_word(&mut self) -> Token {
        while self.peek().is_some_and(is_id_char) && !self.at_delimiter() {
            self.advance();
        }
        let text = &self.input[self.state.start..self.state.pos];
        match Keyword::lookup(text, self.flavour) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None if self.mode == LexMode::Delimit => {
                self.make_token(TokenKind::RawString(String::from(text)))
            }
            None => self.make_token(TokenKind::Identifier(String::from(text))),
        }
    }

    /// Reads a quoted run starting at the opening quote. Doubled quotes and
    /// backslash escapes are unescaped. Returns `None` if unterminated.
    fn read_quoted(&mut self, quote: char) -> Option<String> {
        self.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.advance()? {
                c if c == quote => {
                    if self.peek() == Some(quote) {
                        self.advance();
                        value.push(quote);
                    } else {
                        return Some(value);
                    }
                }
                '\\' => {
                    let escaped = self.advance()?;
                    if escaped != quote && escaped != '\\' {
                        value.push('\\');
                    }
                    value.push(escaped);
                }
                c => value.push(c),
            }
        }
    }

    /// Scans a string literal.
    fn scan_string(&mut self) -> Token {
        self.state.pos = self.state.start;
        match self.read_quoted('\'') {
            Some(value) => self.make_token(TokenKind::String(value)),
            None => self.illegal("Unterminated string literal"),
        }
    }

    /// Scans a quoted identifier (e.g., "column name" or `column name`).
    fn scan_quoted_identifier(&mut self, quote: char) -> Token {
        self.state.pos = self.state.start;
        match self.read_quoted(quote) {
            Some(value) => self.make_token(TokenKind::Identifier(value)),
            None => self.illegal("Unterminated quoted identifier"),
        }
    }

    /// Scans a number (decimal or hexadecimal integer, or float).
    fn scan_number(&mut self) -> Token {
        self.state.pos = self.state.start;
        let rest = self.rest();
        let hex = (rest.starts_with("0x") || rest.starts_with("0X")) && rest.len() > 2;
        let mut is_float = false;

        if hex {
            self.state.pos += 2;
            self.advance_while(|c| c.is_ascii_hexdigit());
        } else {
            self.advance_while(|c| c.is_ascii_digit());
            if self.peek() == Some('.') {
                is_float = true;
                self.advance();
                self.advance_while(|c| c.is_ascii_digit());
            }
            if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
                let after = &self.rest()[1..];
                let digits = after.trim_start_matches(['+', '-']);
                let sign_len = after.len() - digits.len();
                if sign_len <= 1 && digits.starts_with(|c: char| c.is_ascii_digit()) {
                    is_float = true;
                    self.state.pos += 1 + sign_len;
                    self.advance_while(|c| c.is_ascii_digit());
                }
            }
        }

        if self.peek().is_some_and(is_id_char) {
            self.advance_while(is_id_char);
            let text = &self.input[self.state.start..self.state.pos];
            return match self.mode {
                LexMode::Delimit => self.make_token(TokenKind::RawString(String::from(text))),
                LexMode::Parse => self.illegal("Invalid numeric literal"),
            };
        }

        let text = &self.input[self.state.start..self.state.pos];
        if hex {
            return match i64::from_str_radix(&text[2..], 16) {
                Ok(i) => self.make_token(TokenKind::Integer(i)),
                Err(e) => self.make_token(TokenKind::Illegal(format!("Invalid integer: {e}"))),
            };
        }
        if is_float {
            match text.parse::<f64>() {
                Ok(f) => self.make_token(TokenKind::Float(f)),
                Err(e) => self.make_token(TokenKind::Illegal(format!("Invalid float: {e}"))),
            }
        } else {
            match text.parse::<i64>() {
                Ok(i) => self.make_token(TokenKind::Integer(i)),
                Err(e) => self.make_token(TokenKind::Illegal(format!("Invalid integer: {e}"))),
            }
        }
    }

    /// Scans a blob literal (X'...' or x'...').
    fn scan_blob(&mut self) -> Token {
        let Some(quote) = self.advance() else {
            return self.illegal("Unterminated blob literal");
        };
        let digits_start = self.state.pos;
        loop {
            match self.peek() {
                Some(c) if c == quote => break,
                Some(c) if c.is_ascii_hexdigit() => {
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                    return self.illegal("Invalid character in blob literal");
                }
                None => return self.illegal("Unterminated blob literal"),
            }
        }
        let digits = &self.input[digits_start..self.state.pos];
        self.advance(); // closing quote
        if digits.len() % 2 != 0 {
            return self.illegal("Odd number of hex digits in blob literal");
        }
        let bytes = digits
            .as_bytes()
            .chunks(2)
            .filter_map(|pair| std::str::from_utf8(pair).ok())
            .filter_map(|pair| u8::from_str_radix(pair, 16).ok())
            .collect();
        self.make_token(TokenKind::Blob(bytes))
    }

    /// Scans `##name` parameters, `##` unspecified values and MySQL `#`
    /// comments.
    fn scan_hash(&mut self) -> Token {
        if self.peek() == Some('#') {
            self.advance();
            let name_start = self.state.pos;
            while let Some(c) = self.peek() {
                let allowed = is_id_char(c) || matches!(c, '+' | '-' | '.' | ':' | '|' | '@' | '?');
                if !allowed || self.at_delimiter() {
                    break;
                }
                self.advance();
            }
            if self.state.pos == name_start {
                return self.make_token(TokenKind::UnspecifiedValue);
            }
            let name = &self.input[name_start..self.state.pos];
            return self.make_token(TokenKind::Param(String::from(name)));
        }
        if self.flavour == Flavour::Mysql {
            self.advance_while(|c| c != '\n');
            return self.make_token(TokenKind::Comment);
        }
        self.illegal("Unexpected character: #")
    }

    /// Scans PostgreSQL dollar-quoted strings and SQLite `$name` parameters.
    fn scan_dollar(&mut self) -> Token {
        match self.flavour {
            Flavour::Postgresql => {
                self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
                if self.peek() != Some('$') {
                    return self.scan_word();
                }
                self.advance();
                let tag = &self.input[self.state.start..self.state.pos];
                let Some(len) = self.rest().find(tag) else {
                    self.state.pos = self.input.len();
                    return self.illegal("Unterminated dollar-quoted string");
                };
                let body = &self.rest()[..len];
                self.state.pos += len + tag.len();
                self.make_token(TokenKind::String(strip_line_comments(body)))
            }
            Flavour::Sqlite => {
                self.advance_while(|c| c.is_ascii_alphanumeric());
                let name = &self.input[self.state.start + 1..self.state.pos];
                self.make_token(TokenKind::Param(String::from(name)))
            }
            _ => self.scan_word(),
        }
    }

    /// Scans `/*`: either the start of a parameter block or a comment.
    fn scan_slash_star(&mut self) -> Token {
        self.advance(); // *
        let body = self.rest().trim_start();
        if ParamSpecKey::PREFIXES
            .iter()
            .any(|(prefix, _)| body.starts_with(prefix))
        {
            self.state.in_param_spec = true;
            return self.make_token(TokenKind::ParamSpecOpen);
        }
        match self.rest().find("*/") {
            Some(len) => {
                self.state.pos += len + 2;
                self.make_token(TokenKind::Comment)
            }
            None => {
                self.state.pos = self.input.len();
                self.illegal("Unterminated comment")
            }
        }
    }

    /// Scans `key:value` attributes and the closing `*/` of a parameter
    /// block. Returns `None` for anything else.
    fn scan_param_spec_part(&mut self) -> Option<Token> {
        let rest = self.rest();
        if rest.starts_with("*/") {
            self.state.pos += 2;
            self.state.in_param_spec = false;
            return Some(self.make_token(TokenKind::ParamSpecClose));
        }
        let (prefix, key) = ParamSpecKey::PREFIXES
            .iter()
            .copied()
            .find(|(prefix, _)| rest.starts_with(prefix))?;
        self.state.pos += prefix.len();
        let value = match self.peek() {
            Some(quote @ ('\'' | '"')) => self.read_quoted(quote).unwrap_or_default(),
            _ => {
                let value_start = self.state.pos;
                while self
                    .peek()
                    .is_some_and(|c| !c.is_whitespace() && !self.rest().starts_with("*/"))
                {
                    self.advance();
                }
                String::from(&self.input[value_start..self.state.pos])
            }
        };
        Some(self.make_token(TokenKind::ParamSpecAttr(key, value)))
    }

    /// Merges `IS NULL`, `NOT NULL`, `NOT LIKE`, `NOT ILIKE`, `END LOOP` and
    /// `SIMILAR TO` into one token.
    fn merge_composite(&mut self, token: Token) -> Token {
        let TokenKind::Keyword(first) = token.kind else {
            return token;
        };
        let merged = match first {
            Keyword::End => self.merge_next(Keyword::Loop),
            Keyword::Is => self.merge_next(Keyword::Null),
            Keyword::Not => {
                let mut merged = None;
                for second in [Keyword::Null, Keyword::Like, Keyword::Ilike] {
                    merged = self.merge_next(second);
                    if merged.is_some() {
                        break;
                    }
                }
                merged
            }
            Keyword::Similar => self.merge_next(Keyword::To),
            _ => None,
        };
        let Some((second, span)) = merged else {
            return token;
        };
        let kind = match (first, second) {
            (Keyword::End, _) => TokenKind::EndLoop,
            (Keyword::Is, _) => TokenKind::IsNull,
            (Keyword::Not, Keyword::Null) => TokenKind::NotNull,
            (Keyword::Not, Keyword::Like) => TokenKind::NotLike,
            (Keyword::Not, _) => TokenKind::NotIlike,
            _ => TokenKind::SimilarTo,
        };
        Token::new(kind, token.span.merge(span))
    }

    /// Looks one token ahead (skipping whitespace) for `second`. On a match
    /// the lookahead is kept, otherwise it is rolled back.
    fn merge_next(&mut self, second: Keyword) -> Option<(Keyword, Span)> {
        self.push_context();
        let mut next = self.scan_token();
        if next.kind == TokenKind::Space {
            next = self.scan_token();
        }
        if next.is_keyword(second) {
            self.merge_context();
            Some((second, next.span))
        } else {
            self.pop_context();
            None
        }
    }

    /// Returns the next token that is not whitespace or a comment, then
    /// rolls the scanner back.
    fn peek_significant(&mut self) -> Token {
        self.push_context();
        let mut next = self.scan_token();
        while next.is_trivia() {
            next = self.scan_token();
        }
        self.pop_context();
        next
    }

    fn track_blocks(&mut self, token: &Token) {
        if token.is_trivia() {
            return;
        }
        let first = self.state.statement_tokens == 0;
        let qualifier = std::mem::take(&mut self.state.end_qualifier);

        match &token.kind {
            TokenKind::Semicolon | TokenKind::Eof => {
                self.reset_statement();
                return;
            }
            // START shares the keyword but never opens a block.
            TokenKind::Keyword(Keyword::Begin)
                if token.text(self.input).eq_ignore_ascii_case("BEGIN") =>
            {
                if !first || !self.begins_transaction() {
                    self.open_block(BlockKind::Begin);
                }
            }
            TokenKind::Keyword(Keyword::Loop) if !qualifier => self.open_block(BlockKind::Loop),
            TokenKind::Keyword(Keyword::Case) if !qualifier => self.open_block(BlockKind::Case),
            TokenKind::Keyword(Keyword::End) if !first => {
                // A CASE expression is closed by a bare END whatever follows.
                let in_case = self.state.blocks.last() == Some(&BlockKind::Case);
                let next = self.peek_significant();
                let word = next.text(self.input).to_ascii_uppercase();
                if in_case || !NEUTRAL_CLOSERS.contains(&word.as_str()) {
                    self.close_block();
                }
                self.state.end_qualifier = true;
            }
            TokenKind::EndLoop => self.close_block(),
            TokenKind::Keyword(Keyword::Declare) => self.state.ignore_semi = true,
            TokenKind::Keyword(Keyword::Create) => self.state.seen_create = true,
            TokenKind::Keyword(Keyword::As | Keyword::Is)
                if self.flavour == Flavour::Oracle && self.state.seen_routine =>
            {
                self.state.ignore_semi = true;
            }
            TokenKind::Keyword(Keyword::Delimiter) if self.flavour == Flavour::Mysql => {
                self.redefine_delimiter();
            }
            TokenKind::Identifier(_) | TokenKind::RawString(_) if self.state.seen_create => {
                let word = token.text(self.input).to_ascii_uppercase();
                if ORACLE_ROUTINES.contains(&word.as_str()) {
                    self.state.seen_routine = true;
                }
            }
            _ => {}
        }
        self.state.statement_tokens += 1;
    }

    /// A leading `BEGIN` starts a transaction when followed by the end of
    /// the statement or by transaction options.
    fn begins_transaction(&mut self) -> bool {
        let next = self.peek_significant();
        match &next.kind {
            TokenKind::Semicolon | TokenKind::Eof => true,
            TokenKind::RawString(text) => *text == self.state.delimiter,
            TokenKind::Keyword(keyword) => matches!(
                keyword,
                Keyword::Transaction
                    | Keyword::Isolation
                    | Keyword::Deferred
                    | Keyword::Immediate
                    | Keyword::Exclusive
                    | Keyword::Read
            ),
            _ => false,
        }
    }

    fn open_block(&mut self, kind: BlockKind) {
        self.state.blocks.push(kind);
        trace!(?kind, level = self.state.blocks.len(), "block opened");
    }

    fn close_block(&mut self) {
        self.state.blocks.pop();
        if self.state.blocks.is_empty() {
            self.state.ignore_semi = false;
        }
        trace!(level = self.state.blocks.len(), "block closed");
    }

    fn reset_statement(&mut self) {
        self.state.statement_tokens = 0;
        self.state.seen_create = false;
        self.state.seen_routine = false;
        self.state.end_qualifier = false;
    }

    /// Reads the word following `DELIMITER` and makes it the delimiter.
    fn redefine_delimiter(&mut self) {
        let rest = self.rest().trim_start_matches([' ', '\t']);
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..end];
        if !word.is_empty() {
            trace!(delimiter = word, "delimiter redefined");
            self.state.delimiter = String::from(word);
        }
    }
}

/// Characters that may continue an identifier.
fn is_id_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || !c.is_ascii()
}

/// Characters that may start an identifier.
fn is_id_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || !c.is_ascii()
}

/// Removes `--` comment lines from a dollar-quoted body.
fn strip_line_comments(body: &str) -> String {
    body.split_inclusive('\n')
        .map(|line| {
            if line.starts_with("--") {
                if line.ends_with('\n') {
                    "\n"
                } else {
                    ""
                }
            } else {
                line
            }
        })
        .collect()
}
