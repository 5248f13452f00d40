use crate::error::{LispError, LispResult};
use crate::value::{PairId, Value};

/// A single two-slot cell in the arena.
pub struct Cell {
    pub car: Value,
    pub cdr: Value,
    pub mark: bool,
}

/// The cell arena. Every pair is allocated here, and so is every
/// closure and macro, which are pairs under a different tag. PairId is
/// an index into `cells`, so collection never moves live data and
/// cyclic graphs cost nothing to represent.
pub struct Heap {
    cells: Vec<Cell>,
    free_list: Vec<PairId>,
    capacity: usize,
}

impl Heap {
    pub fn new(capacity: usize) -> Self {
        Heap {
            cells: Vec::with_capacity(1024.min(capacity)),
            free_list: Vec::new(),
            capacity,
        }
    }

    /// Allocate a new cell. Returns Err(HeapExhausted) once the arena is
    /// full; collection is the caller's job and only runs at evaluator
    /// safepoints, never from inside an allocation.
    pub fn alloc(&mut self, car: Value, cdr: Value) -> LispResult<PairId> {
        if let Some(id) = self.free_list.pop() {
            let cell = &mut self.cells[id.0 as usize];
            cell.car = car;
            cell.cdr = cdr;
            cell.mark = false;
            return Ok(id);
        }

        if self.cells.len() >= self.capacity {
            return Err(LispError::HeapExhausted);
        }

        let id = PairId(self.cells.len() as u32);
        self.cells.push(Cell {
            car,
            cdr,
            mark: false,
        });
        Ok(id)
    }

    #[inline]
    pub fn car(&self, id: PairId) -> Value {
        self.cells[id.0 as usize].car
    }

    #[inline]
    pub fn cdr(&self, id: PairId) -> Value {
        self.cells[id.0 as usize].cdr
    }

    #[inline]
    pub fn set_car(&mut self, id: PairId, val: Value) {
        self.cells[id.0 as usize].car = val;
    }

    #[inline]
    pub fn set_cdr(&mut self, id: PairId, val: Value) {
        self.cells[id.0 as usize].cdr = val;
    }

    /// Head of a value: Nil for Nil, the car slot for a pair, and a type
    /// error for any other atom. The one policy for non-pair arguments,
    /// used by the builtins and the evaluator alike.
    pub fn car_val(&self, val: Value) -> LispResult<Value> {
        match val {
            Value::Nil => Ok(Value::Nil),
            Value::Pair(id) => Ok(self.car(id)),
            _ => Err(LispError::Type("car of a non-pair atom".into())),
        }
    }

    /// Tail of a value, under the same policy as [`Heap::car_val`].
    pub fn cdr_val(&self, val: Value) -> LispResult<Value> {
        match val {
            Value::Nil => Ok(Value::Nil),
            Value::Pair(id) => Ok(self.cdr(id)),
            _ => Err(LispError::Type("cdr of a non-pair atom".into())),
        }
    }

    /// Build a proper list from a slice of values.
    pub fn list(&mut self, values: &[Value]) -> LispResult<Value> {
        let mut result = Value::Nil;
        for &val in values.iter().rev() {
            let pair = self.alloc(val, result)?;
            result = Value::Pair(pair);
        }
        Ok(result)
    }

    /// Returns true if this value is a proper list (a pair chain ending
    /// in Nil, or Nil itself).
    pub fn is_proper_list(&self, val: Value) -> bool {
        let mut current = val;
        loop {
            match current {
                Value::Nil => return true,
                Value::Pair(id) => current = self.cdr(id),
                _ => return false,
            }
        }
    }

    /// Collect a proper list into a Vec. Returns None if not a proper list.
    pub fn list_to_vec(&self, val: Value) -> Option<Vec<Value>> {
        let mut result = Vec::new();
        let mut current = val;
        loop {
            match current {
                Value::Nil => return Some(result),
                Value::Pair(id) => {
                    result.push(self.car(id));
                    current = self.cdr(id);
                }
                _ => return None,
            }
        }
    }

    /// Shallow copy of a list spine: fresh cells, shared elements.
    /// The evaluator copies argument lists before any in-place operation
    /// so source forms are never modified.
    pub fn copy_list(&mut self, val: Value) -> LispResult<Value> {
        let mut items = Vec::new();
        let mut current = val;
        while let Value::Pair(id) = current {
            items.push(self.car(id));
            current = self.cdr(id);
        }
        let mut result = current;
        for &item in items.iter().rev() {
            let pair = self.alloc(item, result)?;
            result = Value::Pair(pair);
        }
        Ok(result)
    }

    /// Destructively reverse a list spine. Allocation-free, so safe even
    /// on a full heap; only ever applied to freshly consed lists.
    pub fn reverse_in_place(&mut self, list: Value) -> Value {
        let mut prev = Value::Nil;
        let mut current = list;
        while let Value::Pair(id) = current {
            let next = self.cdr(id);
            self.set_cdr(id, prev);
            prev = Value::Pair(id);
            current = next;
        }
        prev
    }

    /// Number of allocated cells (including free-listed ones).
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells on the free list.
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Number of live cells (accurate immediately after a sweep).
    pub fn live_count(&self) -> usize {
        self.cells.len() - self.free_list.len()
    }

    // === GC phases ===

    /// Clear all mark bits (phase 1 of mark-sweep).
    pub fn clear_marks(&mut self) {
        for cell in &mut self.cells {
            cell.mark = false;
        }
    }

    /// Mark a value as reachable. Heap-backed values (pairs, closures,
    /// macros) are marked and queued; the mark-bit test before queueing
    /// is what makes cyclic graphs terminate.
    pub fn mark_value(&mut self, val: Value, worklist: &mut Vec<PairId>) {
        if let Some(id) = val.heap_id() {
            if !self.cells[id.0 as usize].mark {
                self.cells[id.0 as usize].mark = true;
                worklist.push(id);
            }
        }
    }

    /// Drain the mark worklist: for each reached cell, mark its car and
    /// cdr. Iterative, so arbitrarily deep structures cannot overflow
    /// the native stack.
    pub fn process_worklist(&mut self, worklist: &mut Vec<PairId>) {
        while let Some(id) = worklist.pop() {
            let car = self.cells[id.0 as usize].car;
            let cdr = self.cells[id.0 as usize].cdr;
            self.mark_value(car, worklist);
            self.mark_value(cdr, worklist);
        }
    }

    /// Sweep: move unmarked cells to the free list and clear survivor
    /// marks (phase 2 of mark-sweep). Freed cells are reset to Nil so a
    /// stale reference reads as obvious garbage rather than stale data.
    pub fn sweep(&mut self) {
        self.free_list.clear();
        for i in 0..self.cells.len() {
            if self.cells[i].mark {
                self.cells[i].mark = false;
            } else {
                self.free_list.push(PairId(i as u32));
                self.cells[i].car = Value::Nil;
                self.cells[i].cdr = Value::Nil;
            }
        }
    }
}
