//! Environments are heap data: a frame is the pair `(parent . bindings)`
//! where `bindings` is a list of `(symbol . value)` cells and the root
//! frame's parent is Nil. Keeping frames on the pair heap means the
//! collector traces captured environments for free, cycles included.

use crate::error::{LispError, LispResult};
use crate::heap::Heap;
use crate::symbol::SymbolTable;
use crate::value::{PairId, SymbolId, Value};

/// Create a new frame with the given parent (Nil for the root).
pub fn create(heap: &mut Heap, parent: Value) -> LispResult<Value> {
    let id = heap.alloc(parent, Value::Nil)?;
    Ok(Value::Pair(id))
}

/// Look up a symbol: the frame's own bindings first, then the parent
/// chain. Returns None when unbound everywhere.
pub fn get(heap: &Heap, env: Value, name: SymbolId) -> Option<Value> {
    let mut frame = env;
    while let Value::Pair(fid) = frame {
        if let Some(cell) = find_binding(heap, fid, name) {
            return Some(heap.cdr(cell));
        }
        frame = heap.car(fid);
    }
    None
}

/// Assign a symbol: the nearest enclosing binding anywhere on the chain
/// is updated in place; if none exists, a fresh binding is prepended to
/// `env` itself. Top-level `define` passes the global frame, so later
/// redefinitions are visible through every closure that captured it.
pub fn set(heap: &mut Heap, env: Value, name: SymbolId, value: Value) -> LispResult<()> {
    let mut frame = env;
    while let Value::Pair(fid) = frame {
        if let Some(cell) = find_binding(heap, fid, name) {
            heap.set_cdr(cell, value);
            return Ok(());
        }
        frame = heap.car(fid);
    }
    bind(heap, env, name, value)
}

/// Bind a symbol in `env` itself, shadowing any outer binding. This is
/// what parameter binding uses: a closure's parameters must never write
/// through to the captured chain.
pub fn bind(heap: &mut Heap, env: Value, name: SymbolId, value: Value) -> LispResult<()> {
    let Value::Pair(fid) = env else {
        return Err(LispError::Type("environment is not a frame".into()));
    };
    if let Some(cell) = find_binding(heap, fid, name) {
        heap.set_cdr(cell, value);
        return Ok(());
    }
    let binding = heap.alloc(Value::Symbol(name), value)?;
    let bindings = heap.cdr(fid);
    let node = heap.alloc(Value::Pair(binding), bindings)?;
    heap.set_cdr(fid, Value::Pair(node));
    Ok(())
}

/// Names bound in a frame's own binding list, newest first. The REPL
/// uses this for its `:env` listing.
pub fn names(heap: &Heap, symbols: &SymbolTable, env: Value) -> Vec<String> {
    let mut out = Vec::new();
    let Value::Pair(fid) = env else {
        return out;
    };
    let mut node = heap.cdr(fid);
    while let Value::Pair(nid) = node {
        if let Value::Pair(bid) = heap.car(nid) {
            if let Value::Symbol(sym) = heap.car(bid) {
                out.push(symbols.name(sym).to_string());
            }
        }
        node = heap.cdr(nid);
    }
    out
}

/// Scan one frame's binding list for a symbol. Returns the binding cell.
fn find_binding(heap: &Heap, frame: PairId, name: SymbolId) -> Option<PairId> {
    let mut node = heap.cdr(frame);
    while let Value::Pair(nid) = node {
        if let Value::Pair(bid) = heap.car(nid) {
            if heap.car(bid) == Value::Symbol(name) {
                return Some(bid);
            }
        }
        node = heap.cdr(nid);
    }
    None
}
