//! Keystroke lexer.
//!
//! Accepts `[$0HLMbhjklmwx\n]`, a single `[1-9]` count before any of those but `m`, and command lines of the
//! form `:…q\n`:
//!
//! ```text
//! Idle --[$0HLMbhjklmwx\n]--> Idle
//! Idle --[1-9]--> Count --[$0HLMbhjklwx\n]--> Idle
//! Idle --:--> CommandLine --q--> CommandQuit --\n--> Idle
//!             CommandLine --[^q]--> CommandLine
//! ```
//!
//! Tokens are emitted on the transitions that land back in `Idle`.

use core::fmt;

use crate::LexError;

pub const ENTER: char = '\n';

/// Cursor movement keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Motion {
    /// `h`
    Left,
    /// `j`
    Down,
    /// `k`
    Up,
    /// `l`
    Right,
    /// `0`
    LineStart,
    /// `$`
    LineEnd,
    /// `H`
    Top,
    /// `M`
    Middle,
    /// `L`
    Bottom,
    /// Enter
    NextLine,
    /// `w`
    NextUnswept,
    /// `b`
    PrevUnswept,
}

impl Motion {
    pub const fn from_symbol(symbol: char) -> Option<Self> {
        Some(match symbol {
            'h' => Self::Left,
            'j' => Self::Down,
            'k' => Self::Up,
            'l' => Self::Right,
            '0' => Self::LineStart,
            '$' => Self::LineEnd,
            'H' => Self::Top,
            'M' => Self::Middle,
            'L' => Self::Bottom,
            ENTER => Self::NextLine,
            'w' => Self::NextUnswept,
            'b' => Self::PrevUnswept,
            _ => return None,
        })
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::Left => 'h',
            Self::Down => 'j',
            Self::Up => 'k',
            Self::Right => 'l',
            Self::LineStart => '0',
            Self::LineEnd => '$',
            Self::Top => 'H',
            Self::Middle => 'M',
            Self::Bottom => 'L',
            Self::NextLine => ENTER,
            Self::NextUnswept => 'w',
            Self::PrevUnswept => 'b',
        }
    }
}

/// A complete command read from the keystroke stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Cursor motion with an optional repeat count.
    Motion { motion: Motion, count: Option<u8> },
    /// `x` with an optional repeat count.
    Sweep { count: Option<u8> },
    /// `m`
    Flag,
    /// `:` command line, holding the text between the colon and Enter.
    Command(String),
}

impl Token {
    pub const QUIT: &'static str = "q";

    pub fn is_quit(&self) -> bool {
        matches!(self, Self::Command(text) if text == Self::QUIT)
    }

    /// How many times the token applies; one when no count was typed.
    pub fn repeat(&self) -> u8 {
        match self {
            Self::Motion { count, .. } | Self::Sweep { count } => count.unwrap_or(1),
            Self::Flag | Self::Command(_) => 1,
        }
    }

    /// Token for a key that completes a command by itself. Flags take no count.
    fn single(symbol: char, count: Option<u8>) -> Option<Self> {
        match symbol {
            'x' => Some(Self::Sweep { count }),
            'm' if count.is_none() => Some(Self::Flag),
            _ => Motion::from_symbol(symbol).map(|motion| Self::Motion { motion, count }),
        }
    }
}

/// Writes the keys that produced the token, e.g. `3h` or `:q\n`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (count, symbol) = match self {
            Self::Motion { motion, count } => (*count, motion.symbol()),
            Self::Sweep { count } => (*count, 'x'),
            Self::Flag => (None, 'm'),
            Self::Command(text) => return write!(f, ":{text}{ENTER}"),
        };
        if let Some(count) = count {
            write!(f, "{count}")?;
        }
        write!(f, "{symbol}")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LexState {
    /// Waiting for a fresh command.
    #[default]
    Idle,
    /// Read a count digit.
    Count(u8),
    /// Inside a `:` command line.
    CommandLine(String),
    /// Command line ended in `q`, waiting for Enter.
    CommandQuit(String),
}

impl LexState {
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Keys landing in these states are shown back to the player.
    pub const fn echoes(&self) -> bool {
        matches!(self, Self::CommandLine(_) | Self::CommandQuit(_))
    }
}

impl fmt::Display for LexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Count(count) => write!(f, "reading count {count}"),
            Self::CommandLine(text) => write!(f, "reading command line :{text}"),
            Self::CommandQuit(text) => write!(f, "waiting for Enter after :{text}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub state: LexState,
    pub token: Option<Token>,
    pub echo: Option<char>,
}

/// One transition of the lexer.
///
/// On error the caller keeps its previous state; nothing is consumed.
pub fn transition(state: &LexState, symbol: char) -> Result<Step, LexError> {
    use LexState::*;

    let unexpected = || LexError::UnexpectedSymbol {
        state: state.clone(),
        symbol,
    };

    let (state, token) = match state {
        Idle => match symbol {
            '1'..='9' => (Count(symbol as u8 - b'0'), None),
            ':' => (CommandLine(String::new()), None),
            _ => (Idle, Some(Token::single(symbol, None).ok_or_else(unexpected)?)),
        },
        Count(count) => (
            Idle,
            Some(Token::single(symbol, Some(*count)).ok_or_else(unexpected)?),
        ),
        CommandLine(text) => {
            let mut text = text.clone();
            text.push(symbol);
            if symbol == 'q' {
                (CommandQuit(text), None)
            } else {
                (CommandLine(text), None)
            }
        }
        CommandQuit(text) if symbol == ENTER => (Idle, Some(Token::Command(text.clone()))),
        CommandQuit(_) => return Err(unexpected()),
    };

    let echo = state.echoes().then_some(symbol);
    Ok(Step { state, token, echo })
}

/// Stateful wrapper over [`transition`].
#[derive(Clone, Debug, Default)]
pub struct Lexer {
    state: LexState,
}

/// What feeding one symbol produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Feed {
    pub token: Option<Token>,
    pub echo: Option<char>,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LexState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state.is_idle()
    }

    pub fn feed(&mut self, symbol: char) -> Result<Feed, LexError> {
        let Step { state, token, echo } = transition(&self.state, symbol)?;
        if let Some(token) = &token {
            log::trace!("Lexed token {:?}", token.to_string());
        }
        self.state = state;
        Ok(Feed { token, echo })
    }

    /// Lexes a whole symbol stream. Iteration stops after the first error.
    pub fn tokens<I>(symbols: I) -> Tokens<I::IntoIter>
    where
        I: IntoIterator<Item = char>,
    {
        Tokens {
            lexer: Lexer::new(),
            symbols: symbols.into_iter(),
            failed: false,
        }
    }
}

#[derive(Debug)]
pub struct Tokens<I> {
    lexer: Lexer,
    symbols: I,
    failed: bool,
}

impl<I> Tokens<I> {
    /// Lexer state after the symbols consumed so far.
    pub fn state(&self) -> &LexState {
        self.lexer.state()
    }
}

impl<I: Iterator<Item = char>> Iterator for Tokens<I> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for symbol in self.symbols.by_ref() {
            match self.lexer.feed(symbol) {
                Ok(Feed { token: Some(token), .. }) => return Some(Ok(token)),
                Ok(_) => continue,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}
