//! Plain-text renderers for the catalog views
//!
//! Renderers return strings without color so they can be tested and piped.

use std::collections::HashMap;
use std::fmt::Display;

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{FlattenedTree, Forest, GroupedView, Node};

/// Label for the parentless bucket of the grouped view.
pub const ORPHANS_HEADING: &str = "(no parent)";

pub fn label<T: Display>(node: &Node<T>) -> String {
    format!("#{} {}", node.id, node.payload)
}

/// One heading per group, children indented below it.
pub fn render_groups<T: Display>(view: &GroupedView<'_, T>, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = String::new();
    for group in view {
        match group.parent {
            Some(parent) => out.push_str(&label(parent)),
            None => out.push_str(ORPHANS_HEADING),
        }
        out.push('\n');
        for child in &group.children {
            out.push_str(&format!("{pad}- {}\n", label(*child)));
        }
    }
    out
}

/// One line per record, indented by `indent` spaces per level.
pub fn render_flattened<T: Display>(tree: &FlattenedTree<'_, T>, indent: usize) -> String {
    tree.iter()
        .map(|entry| format!("{}{}\n", " ".repeat(entry.level * indent), label(entry.node)))
        .collect()
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<T: Display> TreeNodeConvert for Forest<'_, T> {
    /// Built bottom-up from a post-order walk, so chain depth never grows the call stack.
    fn to_tree_string(&self) -> Tree<String> {
        let mut built: HashMap<Index, Tree<String>> = HashMap::with_capacity(self.len());
        for (idx, node) in self.iter_postorder() {
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|child| built.remove(child))
                .collect();
            built.insert(idx, Tree::new(label(node.node)).with_leaves(leaves));
        }

        let leaves: Vec<_> = self
            .roots()
            .iter()
            .filter_map(|root| built.remove(root))
            .collect();
        Tree::new("catalog".to_string()).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build_flattened, build_forest, build_groups};

    fn catalog() -> Vec<Node<&'static str>> {
        vec![
            Node::root(1, "root"),
            Node::new(2, Some(1), "child"),
            Node::new(3, Some(2), "grandchild"),
            Node::new(9, Some(99), "stray"),
        ]
    }

    #[test]
    fn given_catalog_when_rendering_groups_then_orphans_last() {
        let nodes = catalog();

        let text = render_groups(&build_groups(&nodes), 2);

        assert_eq!(
            text,
            "#1 root\n  - #2 child\n#2 child\n  - #3 grandchild\n(no parent)\n  - #9 stray\n"
        );
    }

    #[test]
    fn given_catalog_when_rendering_flattened_then_indents_per_level() {
        let nodes = catalog();

        let text = render_flattened(&build_flattened(&nodes), 4);

        assert_eq!(text, "#1 root\n    #2 child\n        #3 grandchild\n#9 stray\n");
    }

    #[test]
    fn given_catalog_when_rendering_tree_then_nests_under_catalog() {
        let nodes = catalog();

        let text = build_forest(&nodes).to_tree_string().to_string();

        assert!(text.starts_with("catalog\n"));
        assert!(text.contains("#3 grandchild"));
        assert!(text.contains("#9 stray"));
    }

    #[test]
    fn given_deep_chain_when_rendering_tree_then_every_level_present() {
        let depth: i64 = 1000;
        let nodes: Vec<Node<&str>> = (1..=depth)
            .map(|id| Node::new(id, (id > 1).then(|| id - 1), "level"))
            .collect();

        let text = build_forest(&nodes).to_tree_string().to_string();

        assert_eq!(text.lines().count(), depth as usize + 1);
        assert!(text.lines().last().is_some_and(|line| line.ends_with("#1000 level")));
    }
}
