//! The chart (spec §4.2), the work queue (spec §4.3) and the transient set
//! (spec §4.4) — the three item populations the driver in `recognizer.rs`
//! cycles through to a fixpoint once per input position.

use std::collections::{HashSet, VecDeque};

use log::{debug, trace};
use multimap::MultiMap;
use smol_str::SmolStr;

use crate::network::RuleNetwork;
use crate::node::{Node, NodeHandle};
use crate::precedence::{PrecPredicate, Precedence};

/// `(start, node, φ?)` from spec §3. Compared by value; node identity is
/// pointer identity (see `node::NodeHandle`).
#[derive(Clone, PartialEq, Eq)]
pub struct Item<T> {
    pub start: usize,
    pub node: NodeHandle<T>,
    pub predicate: Option<PrecPredicate>,
}

impl<T> Item<T> {
    pub fn new(start: usize, node: NodeHandle<T>, predicate: Option<PrecPredicate>) -> Self {
        Self { start, node, predicate }
    }
}

/// The per-position work queue. FIFO here; spec §5 notes LIFO would reach the
/// same fixpoint.
#[derive(Default)]
pub struct WorkQueue<T>(VecDeque<Item<T>>);

impl<T> WorkQueue<T> {
    pub fn new() -> Self {
        Self(VecDeque::new())
    }

    pub fn push(&mut self, item: Item<T>) {
        self.0.push_back(item);
    }

    pub fn pop(&mut self) -> Option<Item<T>> {
        self.0.pop_front()
    }
}

/// Items whose dot sits immediately before a terminal, parked until the next
/// input symbol arrives (spec §3, "Transients contain only scan-kind items").
pub type TransientSet<T> = Vec<Item<T>>;

/// One chart slot per input position: kernel waiters keyed by awaited
/// non-terminal, plus the set of completed reductions.
struct ChartSlot<T> {
    kernels: MultiMap<SmolStr, Item<T>>,
    reductions: HashSet<(usize, SmolStr, Precedence)>,
}

impl<T> ChartSlot<T> {
    fn new() -> Self {
        Self {
            kernels: MultiMap::new(),
            reductions: HashSet::new(),
        }
    }
}

/// The full chart: one `ChartSlot` per input position read so far, including
/// position 0 (before any symbol is consumed).
pub struct Chart<T> {
    slots: Vec<ChartSlot<T>>,
}

impl<T: PartialEq + Clone> Chart<T> {
    pub fn new() -> Self {
        Self { slots: vec![ChartSlot::new()] }
    }

    /// Extend the chart by one fresh, empty slot (spec §4.4 step 2).
    pub fn push_slot(&mut self) {
        self.slots.push(ChartSlot::new());
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `register_kernel` from spec §4.2.
    ///
    /// `name` is the non-terminal the waiting item is predicting/constraining
    /// on; `waiting_start`/`waiting_node` describe the continuation to resume
    /// once `name` reduces; `pos` is the chart slot this registration targets;
    /// `phi` is the precedence predicate attached by a `Constrain`, if any.
    pub fn register_kernel(
        &mut self,
        name: &SmolStr,
        waiting_start: usize,
        waiting_node: NodeHandle<T>,
        pos: usize,
        phi: Option<PrecPredicate>,
        network: &RuleNetwork<T>,
        queue: &mut WorkQueue<T>,
    ) {
        let already_predicted = self.slots[pos].kernels.contains_key(name);
        if !already_predicted {
            debug!("predict {name} @ {pos}");
            for (precedence, head) in network.rules_for(name) {
                if let Some(caller_phi) = &phi {
                    if !caller_phi.test(*precedence) {
                        continue;
                    }
                }
                queue.push(Item::new(pos, head.clone(), None));
            }
        }
        self.slots[pos]
            .kernels
            .insert(name.clone(), Item::new(waiting_start, waiting_node, phi));
    }

    /// `register_reduction` from spec §4.2: the sole place a kernel item's
    /// inherited predicate is re-checked, against the reducer's own declared
    /// precedence.
    pub fn register_reduction(
        &mut self,
        name: &SmolStr,
        start: usize,
        pos: usize,
        precedence: Precedence,
        queue: &mut WorkQueue<T>,
    ) {
        let key = (start, name.clone(), precedence);
        if self.slots[pos].reductions.contains(&key) {
            return;
        }
        self.slots[pos].reductions.insert(key);
        debug!("reduce {name}[{precedence}] {start}..{pos}");

        if let Some(waiters) = self.slots[start].kernels.get_vec(name) {
            for waiter in waiters {
                let wakes = waiter.predicate.map_or(true, |phi| phi.test(precedence));
                if wakes {
                    trace!("wake waiter for {name} at {start}");
                    queue.push(waiter.clone());
                }
            }
        }
    }

    /// `scan` from spec §4.2: park a transient, predicate dropped (precedence
    /// predicates never propagate through terminals).
    pub fn scan(item: Item<T>, transients: &mut TransientSet<T>) {
        transients.push(item);
    }

    /// `accepted` from spec §4.2.
    pub fn accepted(&self, start_name: &str, pos: usize, top_predicate: Option<PrecPredicate>) -> bool {
        self.slots[pos].reductions.iter().any(|(start, name, p)| {
            *start == 0 && name == start_name && top_predicate.map_or(true, |phi| phi.test(*p))
        })
    }

    /// Drain the work queue to a fixpoint at `pos` (spec §4.3).
    pub fn drain(
        &mut self,
        queue: &mut WorkQueue<T>,
        transients: &mut TransientSet<T>,
        network: &RuleNetwork<T>,
        pos: usize,
    ) {
        while let Some(item) = queue.pop() {
            trace!("dequeue start={} @ {pos}", item.start);
            match item.node.as_ref() {
                Node::Scan { .. } => Self::scan(item.clone(), transients),
                Node::Predict { name, next } => {
                    self.register_kernel(name, item.start, next.clone(), pos, None, network, queue)
                }
                Node::Constrain { name, predicate, next } => self.register_kernel(
                    name,
                    item.start,
                    next.clone(),
                    pos,
                    Some(*predicate),
                    network,
                    queue,
                ),
                Node::Branch { alternatives } => {
                    for alt in alternatives {
                        queue.push(Item::new(item.start, alt.clone(), item.predicate));
                    }
                }
                Node::Reduce { name, precedence } => {
                    self.register_reduction(name, item.start, pos, *precedence, queue)
                }
            }
        }
    }

    /// Every `(start, name, precedence)` reduction recorded at `pos`, for
    /// invariant tests.
    #[cfg(test)]
    pub fn reductions_at(&self, pos: usize) -> impl Iterator<Item = &(usize, SmolStr, Precedence)> {
        self.slots[pos].reductions.iter()
    }
}
