//! Native functions bound in the root environment. Each builtin receives
//! its already-evaluated argument list as a proper heap list; wrong
//! counts reject with Args and wrong tags with Type.
//!
//! Arithmetic and comparison are deliberately 2-ary: the variadic and
//! unary surface forms are user-level rebindings in the prelude.

use crate::env;
use crate::error::{LispError, LispResult};
use crate::heap::Heap;
use crate::symbol::sym;
use crate::value::{NativeFn, SymbolId, Value};

/// The APPLY builtin as a named constant, so the evaluator can recognize
/// it by identity and route it through its tail-call frame machinery.
pub const NATIVE_APPLY: NativeFn = NativeFn {
    name: "APPLY",
    run: apply,
};

const BUILTINS: &[(SymbolId, NativeFn)] = &[
    (sym::CAR, NativeFn { name: "CAR", run: car }),
    (sym::CDR, NativeFn { name: "CDR", run: cdr }),
    (sym::CONS, NativeFn { name: "CONS", run: cons }),
    (sym::PAIR_P, NativeFn { name: "PAIR?", run: pair_p }),
    (sym::EQ_P, NativeFn { name: "EQ?", run: eq_p }),
    (sym::ADD, NativeFn { name: "+", run: add }),
    (sym::SUB, NativeFn { name: "-", run: sub }),
    (sym::MUL, NativeFn { name: "*", run: mul }),
    (sym::DIV, NativeFn { name: "/", run: div }),
    (sym::NUM_EQ, NativeFn { name: "=", run: num_eq }),
    (sym::LT, NativeFn { name: "<", run: lt }),
    (sym::LE, NativeFn { name: "<=", run: le }),
    (sym::GT, NativeFn { name: ">", run: gt }),
    (sym::GE, NativeFn { name: ">=", run: ge }),
    (sym::APPLY, NATIVE_APPLY),
];

/// Install the truth symbol and every builtin into a fresh root frame.
pub fn install(heap: &mut Heap, env: Value) -> LispResult<()> {
    env::bind(heap, env, sym::T, Value::Symbol(sym::T))?;
    for &(name, func) in BUILTINS {
        env::bind(heap, env, name, Value::Builtin(func))?;
    }
    Ok(())
}

/// True if `f` is the APPLY builtin.
pub fn is_apply(f: NativeFn) -> bool {
    f == NATIVE_APPLY
}

/// Split an argument list into exactly N values.
fn expect<const N: usize>(name: &str, args: Value, heap: &Heap) -> LispResult<[Value; N]> {
    let mut out = [Value::Nil; N];
    let mut current = args;
    for slot in out.iter_mut() {
        let Value::Pair(id) = current else {
            return Err(arity(name, N));
        };
        *slot = heap.car(id);
        current = heap.cdr(id);
    }
    if !current.is_nil() {
        return Err(arity(name, N));
    }
    Ok(out)
}

fn arity(name: &str, n: usize) -> LispError {
    let plural = if n == 1 { "" } else { "s" };
    LispError::Args(format!("{} expects {} argument{}", name, n, plural))
}

fn integer(name: &str, val: Value) -> LispResult<i64> {
    match val {
        Value::Integer(n) => Ok(n),
        _ => Err(LispError::Type(format!(
            "{} expects integer arguments",
            name
        ))),
    }
}

fn truth(cond: bool) -> Value {
    if cond {
        Value::Symbol(sym::T)
    } else {
        Value::Nil
    }
}

/// (CAR x): head of a pair; Nil for Nil.
pub fn car(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [x] = expect("CAR", args, heap)?;
    heap.car_val(x)
}

/// (CDR x): tail of a pair; Nil for Nil.
pub fn cdr(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [x] = expect("CDR", args, heap)?;
    heap.cdr_val(x)
}

/// (CONS a d): a fresh pair.
pub fn cons(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [a, d] = expect("CONS", args, heap)?;
    let id = heap.alloc(a, d)?;
    Ok(Value::Pair(id))
}

/// (PAIR? x): T for pairs, Nil for every other tag.
pub fn pair_p(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [x] = expect("PAIR?", args, heap)?;
    Ok(truth(x.is_pair()))
}

/// (EQ? a b): identity: matching tags and identical payloads.
/// Integers compare by value, symbols by interned id, heap values by
/// cell index, builtins by function pointer.
pub fn eq_p(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [a, b] = expect("EQ?", args, heap)?;
    Ok(truth(a == b))
}

pub fn add(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [a, b] = expect("+", args, heap)?;
    Ok(Value::Integer(integer("+", a)?.wrapping_add(integer("+", b)?)))
}

pub fn sub(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [a, b] = expect("-", args, heap)?;
    Ok(Value::Integer(integer("-", a)?.wrapping_sub(integer("-", b)?)))
}

pub fn mul(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [a, b] = expect("*", args, heap)?;
    Ok(Value::Integer(integer("*", a)?.wrapping_mul(integer("*", b)?)))
}

pub fn div(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [a, b] = expect("/", args, heap)?;
    let n = integer("/", a)?;
    let d = integer("/", b)?;
    if d == 0 {
        return Err(LispError::Type("division by zero".into()));
    }
    Ok(Value::Integer(n.wrapping_div(d)))
}

pub fn num_eq(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [a, b] = expect("=", args, heap)?;
    Ok(truth(integer("=", a)? == integer("=", b)?))
}

pub fn lt(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [a, b] = expect("<", args, heap)?;
    Ok(truth(integer("<", a)? < integer("<", b)?))
}

pub fn le(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [a, b] = expect("<=", args, heap)?;
    Ok(truth(integer("<=", a)? <= integer("<=", b)?))
}

pub fn gt(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [a, b] = expect(">", args, heap)?;
    Ok(truth(integer(">", a)? > integer(">", b)?))
}

pub fn ge(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [a, b] = expect(">=", args, heap)?;
    Ok(truth(integer(">=", a)? >= integer(">=", b)?))
}

/// (APPLY f args): call `f` with the elements of a proper list.
///
/// When an operator evaluates to this builtin the evaluator replaces its
/// active frame instead of calling here, which is what makes applied
/// closures tail-call. Invoked directly, only builtin operators can be
/// applied; closures need the evaluator's frames.
pub fn apply(args: Value, heap: &mut Heap) -> LispResult<Value> {
    let [f, arglist] = expect("APPLY", args, heap)?;
    if !heap.is_proper_list(arglist) {
        return Err(LispError::Syntax(
            "APPLY arguments must be a proper list".into(),
        ));
    }
    match f {
        Value::Builtin(native) if !is_apply(native) => (native.run)(arglist, heap),
        _ => Err(LispError::Type(
            "APPLY outside the evaluator requires a builtin operator".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two(heap: &mut Heap, a: Value, b: Value) -> Value {
        heap.list(&[a, b]).unwrap()
    }

    #[test]
    fn arithmetic_is_strictly_binary() {
        let mut heap = Heap::new(64);
        let args = two(&mut heap, Value::Integer(1), Value::Integer(2));
        assert_eq!(add(args, &mut heap), Ok(Value::Integer(3)));

        let one = heap.list(&[Value::Integer(1)]).unwrap();
        assert!(matches!(add(one, &mut heap), Err(LispError::Args(_))));
        let three = heap
            .list(&[Value::Integer(1), Value::Integer(2), Value::Integer(3)])
            .unwrap();
        assert!(matches!(add(three, &mut heap), Err(LispError::Args(_))));
    }

    #[test]
    fn arithmetic_rejects_non_integers() {
        let mut heap = Heap::new(64);
        let args = two(&mut heap, Value::Integer(1), Value::Symbol(sym::T));
        assert!(matches!(mul(args, &mut heap), Err(LispError::Type(_))));
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let mut heap = Heap::new(64);
        let args = two(&mut heap, Value::Integer(1), Value::Integer(0));
        assert!(matches!(div(args, &mut heap), Err(LispError::Type(_))));
    }

    #[test]
    fn comparisons_yield_truth_or_nil() {
        let mut heap = Heap::new(64);
        let args = two(&mut heap, Value::Integer(1), Value::Integer(2));
        assert_eq!(lt(args, &mut heap), Ok(Value::Symbol(sym::T)));
        let args = two(&mut heap, Value::Integer(2), Value::Integer(2));
        assert_eq!(gt(args, &mut heap), Ok(Value::Nil));
        assert_eq!(ge(two(&mut heap, Value::Integer(2), Value::Integer(2)), &mut heap), Ok(Value::Symbol(sym::T)));
    }

    #[test]
    fn car_cdr_policy() {
        let mut heap = Heap::new(64);
        let pair = heap.alloc(Value::Integer(1), Value::Integer(2)).unwrap();

        let args = heap.list(&[Value::Pair(pair)]).unwrap();
        assert_eq!(car(args, &mut heap), Ok(Value::Integer(1)));
        let args = heap.list(&[Value::Pair(pair)]).unwrap();
        assert_eq!(cdr(args, &mut heap), Ok(Value::Integer(2)));

        // Nil passes through, any other atom is a type error.
        let args = heap.list(&[Value::Nil]).unwrap();
        assert_eq!(car(args, &mut heap), Ok(Value::Nil));
        let args = heap.list(&[Value::Integer(5)]).unwrap();
        assert!(matches!(car(args, &mut heap), Err(LispError::Type(_))));
    }

    #[test]
    fn eq_is_identity_not_structure() {
        let mut heap = Heap::new(64);
        let a = heap.list(&[Value::Integer(1)]).unwrap();
        let b = heap.list(&[Value::Integer(1)]).unwrap();

        let args = two(&mut heap, a, b);
        assert_eq!(eq_p(args, &mut heap), Ok(Value::Nil));
        let args = two(&mut heap, a, a);
        assert_eq!(eq_p(args, &mut heap), Ok(Value::Symbol(sym::T)));
        let args = two(&mut heap, Value::Integer(7), Value::Integer(7));
        assert_eq!(eq_p(args, &mut heap), Ok(Value::Symbol(sym::T)));
    }

    #[test]
    fn apply_calls_builtins_directly() {
        let mut heap = Heap::new(64);
        let nums = two(&mut heap, Value::Integer(4), Value::Integer(5));
        let args = two(&mut heap, Value::Builtin(NativeFn { name: "+", run: add }), nums);
        assert_eq!(apply(args, &mut heap), Ok(Value::Integer(9)));
    }
}
