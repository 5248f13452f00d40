//! A small Lisp interpreter.
//!
//! Values are a tagged union over an index-addressed pair heap with
//! mark-and-sweep collection. The evaluator is an iterative trampoline
//! over heap-allocated frames, giving proper tail calls and call depth
//! bounded by the heap rather than the native stack, with unhygienic
//! macros and variadic parameter binding. The reader uppercases atoms
//! and rewrites `'`, `` ` ``, `,`, and `,@` to their long forms.
//!
//! ```
//! use minilisp::eval::Machine;
//! use minilisp::printer::print_val;
//!
//! let mut machine = Machine::new(1 << 16).unwrap();
//! machine.load_prelude().unwrap();
//! let val = machine.eval_str("(let ((x 2)) (* x 21))").unwrap();
//! assert_eq!(print_val(val, &machine.heap, &machine.symbols), "42");
//! ```

pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod heap;
pub mod printer;
pub mod reader;
pub mod symbol;
pub mod value;

pub use error::{LispError, LispResult};
pub use eval::Machine;
pub use value::Value;
