use crate::error::{ErrorKind, ErrorStream};
use crate::intern::{Interner, Name};
use crate::source::{SourceLocation, SourceReader, Span};
use crate::token::{single_char_token, Token, TokenKind, TokenValue, MULTI_CHAR_TOKENS};

/// Hand-written scanner. Produces one token per [`next_token`] call with a
/// single slot of lookahead; never fails — malformed input becomes an
/// `Unexpected` surrogate token plus a diagnostic, so the parser can keep
/// going.
///
/// [`next_token`]: Lexer::next_token
pub struct Lexer<'e, 'i> {
    reader: SourceReader,
    interner: &'i mut Interner,
    errors: &'e ErrorStream,
    input_name: Name,
    token_start: SourceLocation,
    lookahead: Option<Token>,
}

impl<'e, 'i> Lexer<'e, 'i> {
    pub fn new(
        input_name: &str,
        source: &str,
        interner: &'i mut Interner,
        errors: &'e ErrorStream,
    ) -> Self {
        let input_name = interner.intern(input_name);
        Lexer {
            reader: SourceReader::new(source),
            interner,
            errors,
            input_name,
            token_start: SourceLocation::new(1, 1),
            lookahead: None,
        }
    }

    pub fn input_name(&self) -> Name {
        self.input_name
    }

    pub fn interner(&self) -> &Interner {
        self.interner
    }

    /// Position of the next unread character; the end of input once the
    /// source is exhausted.
    pub fn current_location(&self) -> SourceLocation {
        self.reader.location()
    }

    pub fn next_token(&mut self) -> Token {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.extract_token(),
        }
    }

    pub fn peek_token(&mut self) -> Token {
        if self.lookahead.is_none() {
            let token = self.extract_token();
            self.lookahead = Some(token);
        }
        self.lookahead.unwrap()
    }

    pub fn eof(&mut self) -> bool {
        self.peek_token().kind == TokenKind::EndOfInput
    }

    fn span_from_start(&self) -> Span {
        Span::new(self.input_name, self.token_start, self.reader.location())
    }

    fn token(&mut self, kind: TokenKind, text: &str, value: Option<TokenValue>) -> Token {
        Token::new(kind, self.interner.intern(text), value, self.span_from_start())
    }

    fn extract_token(&mut self) -> Token {
        self.discard_trivia();
        self.token_start = self.reader.location();

        if self.reader.eof() {
            return self.token(TokenKind::EndOfInput, "<EOF>", None);
        }

        // Multi-character operators and keywords first; several share a
        // first character with a single-character token.
        for &(text, kind) in MULTI_CHAR_TOKENS {
            let is_keyword = text.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
            let matched = if is_keyword {
                self.match_keyword(text)
            } else {
                self.reader.match_literal(text)
            };
            if matched {
                let value = match kind {
                    TokenKind::KwTrue => Some(TokenValue::Bool(true)),
                    TokenKind::KwFalse => Some(TokenValue::Bool(false)),
                    _ => None,
                };
                return self.token(kind, text, value);
            }
        }

        let c = self.reader.peek(0);

        // A '-' directly followed by a digit is a signed literal, not the
        // subtraction operator.
        if c == '-' && self.reader.peek(1).is_ascii_digit() {
            return self.extract_number();
        }

        if let Some(kind) = single_char_token(c) {
            self.reader.next();
            return self.token(kind, &c.to_string(), None);
        }

        if c.is_ascii_alphabetic() || c == '_' {
            return self.extract_identifier();
        }

        if c.is_ascii_digit() {
            return self.extract_number();
        }

        self.reader.next();
        let span = self.span_from_start();
        self.errors.error(
            ErrorKind::UnexpectedCharacter,
            span,
            format!("Invalid character '{}' (0x{:X})", c, c as u32),
        );
        Token::new(
            TokenKind::Unexpected,
            self.interner.intern(&c.to_string()),
            None,
            span,
        )
    }

    /// Matches `keyword` only when the character after it cannot continue
    /// an identifier, so `iffy` stays an identifier.
    fn match_keyword(&mut self, keyword: &str) -> bool {
        let len = keyword.chars().count();
        for (k, expected) in keyword.chars().enumerate() {
            if self.reader.peek(k) != expected {
                return false;
            }
        }
        let boundary = self.reader.peek(len);
        if boundary.is_ascii_alphanumeric() || boundary == '_' {
            return false;
        }
        for _ in 0..len {
            self.reader.next();
        }
        true
    }

    fn extract_identifier(&mut self) -> Token {
        let mut text = String::new();
        text.push(self.reader.next());
        loop {
            let c = self.reader.peek(0);
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            text.push(self.reader.next());
        }
        self.token(TokenKind::Ident, &text, None)
    }

    fn extract_number(&mut self) -> Token {
        let mut text = String::new();
        text.push(self.reader.next());
        loop {
            let c = self.reader.peek(0);
            if !c.is_ascii_digit() && c != '.' {
                break;
            }
            text.push(self.reader.next());
        }

        if !text.contains('.') {
            match text.parse::<i32>() {
                Ok(value) => self.token(TokenKind::LitInt, &text, Some(TokenValue::Int32(value))),
                Err(_) => {
                    let span = self.span_from_start();
                    self.errors.error(
                        ErrorKind::InvalidLiteralInt32,
                        span,
                        format!("Invalid literal int '{}'", text),
                    );
                    self.token(TokenKind::Unexpected, &text, None)
                }
            }
        } else {
            match text.parse::<f32>() {
                Ok(value) => self.token(TokenKind::LitFloat, &text, Some(TokenValue::Float(value))),
                Err(_) => {
                    let span = self.span_from_start();
                    self.errors.error(
                        ErrorKind::InvalidLiteralFloat,
                        span,
                        format!("Invalid literal float '{}'", text),
                    );
                    self.token(TokenKind::Unexpected, &text, None)
                }
            }
        }
    }

    fn discard_trivia(&mut self) {
        loop {
            if self.discard_line_comment() {
                continue;
            }
            if self.discard_block_comment() {
                continue;
            }
            if self.discard_whitespace() {
                continue;
            }
            break;
        }
    }

    fn discard_whitespace(&mut self) -> bool {
        let mut discarded = false;
        while !self.reader.eof() && self.reader.peek(0).is_whitespace() {
            self.reader.next();
            discarded = true;
        }
        discarded
    }

    /// `# ...` to the end of the line.
    fn discard_line_comment(&mut self) -> bool {
        if !self.reader.match_literal("#") {
            return false;
        }
        while self.reader.peek(0) != '\n' && !self.reader.eof() {
            self.reader.next();
        }
        self.reader.next();
        true
    }

    /// `(# ... #)`, nesting to arbitrary depth.
    fn discard_block_comment(&mut self) -> bool {
        let open_location = self.reader.location();
        if !self.reader.match_literal("(#") {
            return false;
        }
        let mut depth = 1usize;
        while depth > 0 {
            if self.reader.eof() {
                self.errors.error(
                    ErrorKind::UnterminatedComment,
                    Span::new(self.input_name, open_location, self.reader.location()),
                    "Unexpected end of input in multi-line comment",
                );
                break;
            }
            if self.reader.match_literal("(#") {
                depth += 1;
                continue;
            }
            if self.reader.match_literal("#)") {
                depth -= 1;
                continue;
            }
            self.reader.next();
        }
        true
    }
}
