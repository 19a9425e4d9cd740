//! The driver (spec §4.4, §4.5): seeds the start symbol, drains the work
//! queue to a fixpoint once per input position, and answers whether the
//! start symbol has been fully reduced over everything read so far.

use std::rc::Rc;

use log::info;
use smol_str::SmolStr;

use crate::chart::{Chart, Item, TransientSet, WorkQueue};
use crate::network::RuleNetwork;
use crate::node::{sentinel_node, Node};
use crate::precedence::PrecPredicate;

/// A single, append-only recognition run against a compiled `RuleNetwork`.
///
/// Not reusable for unrelated input: once `feed` has been called, the chart
/// only ever grows. Build a fresh `Recognizer` to recognize a new input.
pub struct Recognizer<T> {
    network: Rc<RuleNetwork<T>>,
    start_name: SmolStr,
    top_predicate: Option<PrecPredicate>,
    chart: Chart<T>,
    transients: TransientSet<T>,
    pos: usize,
}

impl<T: PartialEq + Clone> Recognizer<T> {
    /// Seed the chart for `start_name` (spec §4.5) and drain to a fixpoint
    /// before any input is read.
    pub fn new(start_name: &str, network: Rc<RuleNetwork<T>>, top_predicate: Option<PrecPredicate>) -> Self {
        let mut chart = Chart::new();
        let mut transients = TransientSet::new();
        let mut queue = WorkQueue::new();
        let start_name = SmolStr::new(start_name);

        chart.register_kernel(
            &start_name,
            0,
            sentinel_node(),
            0,
            top_predicate,
            &network,
            &mut queue,
        );
        chart.drain(&mut queue, &mut transients, &network, 0);

        Self { network, start_name, top_predicate, chart, transients, pos: 0 }
    }

    /// Feed a chunk of input symbols, advancing the chart one symbol at a
    /// time (spec §4.4). May be called any number of times; `feed(s1);
    /// feed(s2)` is equivalent to one `feed` of the concatenation (spec §8,
    /// deterministic streaming).
    pub fn feed(&mut self, symbols: impl IntoIterator<Item = T>) {
        for symbol in symbols {
            self.advance(symbol);
        }
    }

    fn advance(&mut self, symbol: T) {
        self.pos += 1;
        self.chart.push_slot();

        let mut queue = WorkQueue::new();
        for item in self.transients.drain(..) {
            if let Node::Scan { terminal, next } = item.node.as_ref() {
                if *terminal == symbol {
                    queue.push(Item::new(item.start, next.clone(), None));
                }
            }
        }
        self.chart.drain(&mut queue, &mut self.transients, &self.network, self.pos);
        info!("fed 1 symbol, chart now at position {}", self.pos);
    }

    /// Pure query: has the start symbol been fully reduced over the entire
    /// prefix read so far?
    pub fn accepted(&self) -> bool {
        self.chart.accepted(&self.start_name, self.pos, self.top_predicate)
    }

    /// Number of input symbols consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of chart slots currently held (`position() + 1`), exposed for
    /// the prefix-monotonicity property test.
    pub fn chart_len(&self) -> usize {
        self.chart.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{nt, term, GrammarBuilder};

    #[test]
    fn empty_input_is_not_accepted_for_a_nonempty_rule() {
        let network = GrammarBuilder::new().rule("S", term('a')).compile("S").unwrap();
        let recognizer: Recognizer<char> = Recognizer::new("S", Rc::new(network), None);
        assert!(!recognizer.accepted());
    }

    #[test]
    fn single_terminal_rule_accepts_its_terminal() {
        let network = GrammarBuilder::new().rule("S", term('a')).compile("S").unwrap();
        let mut recognizer: Recognizer<char> = Recognizer::new("S", Rc::new(network), None);
        recognizer.feed("a".chars());
        assert!(recognizer.accepted());
    }

    #[test]
    fn prefix_monotonicity_of_chart_growth() {
        let network = GrammarBuilder::new()
            .rule("S", term('a') + nt("S"))
            .rule("S", term('a'))
            .compile("S")
            .unwrap();
        let mut recognizer: Recognizer<char> = Recognizer::new("S", Rc::new(network), None);
        recognizer.feed("aaa".chars());
        assert_eq!(recognizer.chart_len(), "aaa".len() + 1);
    }
}
