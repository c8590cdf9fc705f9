//! Renders the expression tree behind a node as an indented audit string.

use std::collections::HashMap;
use std::fmt::Write;

use crate::graph::Node;

/// Formats the expression tree rooted at `target`.
///
/// Values cached by `compute` are shown as `[8.000]`; nodes not yet
/// evaluated show `[?]`. A sub-DAG shared between several derived nodes is
/// printed once and referenced by its level afterwards.
pub fn format_trace(target: &Node) -> String {
    let mut tracer = Tracer {
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    let _ = writeln!(tracer.output, "EVAL TRACE for node '{}':", target.name());
    let _ = writeln!(tracer.output, "--------------------------------------------------");
    tracer.trace_node(target, 1, "");
    tracer.output
}

struct Tracer {
    visited_at_level: HashMap<usize, usize>,
    output: String,
}

impl Tracer {
    fn trace_node(&mut self, node: &Node, level: usize, prefix: &str) {
        if let Some(&first_seen) = self.visited_at_level.get(&node.key()) {
            let _ = writeln!(self.output, "{}-> (Ref to L{})", prefix, first_seen);
            return;
        }
        self.visited_at_level.insert(node.key(), level);

        let line_header = format!("[L{}] {}{}", level, node.name(), format_value(node));

        match node.operands() {
            None => {
                let _ = writeln!(self.output, "{}{} -> Leaf", prefix, line_header);
            }
            Some((left, right, op)) => {
                let formula = format!(
                    "{}{} {} {}{}",
                    left.name(),
                    format_value(left),
                    op.symbol(),
                    right.name(),
                    format_value(right),
                );
                let _ = writeln!(self.output, "{}{} = {}", prefix, line_header, formula);

                let stem = build_child_stem(prefix);
                for (i, operand) in [left, right].into_iter().enumerate() {
                    let connector = if i == 1 { "`--" } else { "|--" };
                    let full_prefix = format!("{}{}", stem, connector);
                    self.trace_node(operand, level + 1, &full_prefix);
                }
            }
        }
    }
}

fn format_value(node: &Node) -> String {
    match node.value() {
        Some(v) => format!("[{:.3}]", v),
        None => "[?]".to_string(),
    }
}

fn build_child_stem(current_prefix: &str) -> String {
    current_prefix.replace("`--", "   ").replace("|--", "|  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_shows_formula_and_values() {
        let a = Node::leaf("a", 3.0);
        let b = Node::leaf("b", 5.0);
        let c = &a + &b;
        c.compute();

        let trace = format_trace(&c);
        assert!(trace.contains("EVAL TRACE for node '(a + b)':"));
        assert!(trace.contains("[L1] (a + b)[8.000] = a[3.000] + b[5.000]"));
        assert!(trace.contains("|--[L2] a[3.000] -> Leaf"));
        assert!(trace.contains("`--[L2] b[5.000] -> Leaf"));
    }

    #[test]
    fn test_trace_marks_uncomputed_values() {
        let a = Node::leaf("a", 3.0);
        let b = Node::leaf("b", 5.0);
        let c = &a + &b;

        let trace = format_trace(&c);
        assert!(trace.contains("(a + b)[?]"));
    }

    #[test]
    fn test_trace_references_shared_subgraphs() {
        let a = Node::leaf("a", 2.0);
        let sq = &a * &a;
        let quad = &sq + &sq;
        quad.compute();

        let trace = format_trace(&quad);
        assert!(trace.contains("(Ref to L2)"));
    }
}
