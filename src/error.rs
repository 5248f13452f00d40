use thiserror::Error;

/// Errors that can occur while reading or evaluating Lisp code.
///
/// Errors are plain values: they propagate from the point of detection
/// straight to the top-level caller, and the REPL prints one line and
/// moves on to the next form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LispError {
    /// Unreadable input: stray `)`, misplaced `.`, unterminated list.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Symbol lookup failed in every enclosing environment.
    #[error("unbound symbol '{0}'")]
    Unbound(String),

    /// Wrong number of arguments to a special form, builtin, or closure.
    #[error("wrong number of arguments: {0}")]
    Args(String),

    /// Wrong tag where another was required.
    #[error("type error: {0}")]
    Type(String),

    /// The cell arena is at capacity.
    #[error("pair heap exhausted")]
    HeapExhausted,
}

pub type LispResult<T> = Result<T, LispError>;
