use crate::heap::Heap;
use crate::symbol::SymbolTable;
use crate::value::Value;

/// Print a value to a string in readable s-expression form.
///
/// Every value round-trips through the reader except builtins, closures,
/// and macros, which print as opaque `#<...>` tags.
pub fn print_val(val: Value, heap: &Heap, symbols: &SymbolTable) -> String {
    let mut out = String::new();
    print_inner(val, heap, symbols, &mut out, 0);
    out
}

fn print_inner(val: Value, heap: &Heap, symbols: &SymbolTable, out: &mut String, depth: usize) {
    if depth > 1000 {
        out.push_str("...");
        return;
    }

    match val {
        Value::Nil => out.push_str("NIL"),
        Value::Integer(n) => out.push_str(&n.to_string()),
        Value::Symbol(id) => out.push_str(symbols.name(id)),
        Value::Builtin(f) => {
            out.push_str("#<builtin ");
            out.push_str(f.name);
            out.push('>');
        }
        Value::Closure(_) => out.push_str("#<closure>"),
        Value::Macro(_) => out.push_str("#<macro>"),
        Value::Pair(id) => {
            out.push('(');
            print_inner(heap.car(id), heap, symbols, out, depth + 1);

            let mut current = heap.cdr(id);
            loop {
                match current {
                    Value::Nil => break,
                    Value::Pair(pid) => {
                        out.push(' ');
                        print_inner(heap.car(pid), heap, symbols, out, depth + 1);
                        current = heap.cdr(pid);
                    }
                    _ => {
                        out.push_str(" . ");
                        print_inner(current, heap, symbols, out, depth + 1);
                        break;
                    }
                }
            }
            out.push(')');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read_str;
    use crate::symbol::sym;
    use crate::value::NativeFn;

    #[test]
    fn atoms_print() {
        let heap = Heap::new(16);
        let symbols = SymbolTable::new();
        assert_eq!(print_val(Value::Nil, &heap, &symbols), "NIL");
        assert_eq!(print_val(Value::Integer(-7), &heap, &symbols), "-7");
        assert_eq!(print_val(Value::Symbol(sym::LAMBDA), &heap, &symbols), "LAMBDA");
    }

    #[test]
    fn opaque_tags() {
        let mut heap = Heap::new(16);
        let symbols = SymbolTable::new();
        let f = NativeFn {
            name: "CONS",
            run: crate::builtins::cons,
        };
        assert_eq!(print_val(Value::Builtin(f), &heap, &symbols), "#<builtin CONS>");

        let cell = heap.alloc(Value::Nil, Value::Nil).unwrap();
        assert_eq!(print_val(Value::Closure(cell), &heap, &symbols), "#<closure>");
        assert_eq!(print_val(Value::Macro(cell), &heap, &symbols), "#<macro>");
    }

    #[test]
    fn print_then_read_is_identity() {
        let mut heap = Heap::new(4096);
        let mut symbols = SymbolTable::new();
        for text in [
            "NIL",
            "42",
            "-42",
            "FOO",
            "(A B C)",
            "(A B . C)",
            "(1 (2 NIL) 3)",
            "(QUOTE X)",
        ] {
            let val = read_str(text, &mut heap, &mut symbols).unwrap();
            assert_eq!(print_val(val, &heap, &symbols), text);
        }
    }
}
