//! Macro-expansion of component tags.
//!
//! Every element whose tag is not a native HTML tag is rendered through the
//! resolver, normalized, expanded in turn and spliced in its place until no
//! such element remains.

use crate::component::ComponentResolver;
use crate::error::{ExpandError, ExpandResult};
use htmlc_common::{Diagnostic, DiagnosticSink};
use htmlc_dom::tags::{self, CHILDREN_TAG, FRAGMENT_TAG, OPAQUE_TAG};
use htmlc_dom::{normalize, Attributes, Dom, NodeId};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
pub struct ExpandOptions {
    /// Maximum number of nested component expansions
    pub max_depth: usize,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Expand every component under `root` with the default options
pub fn expand(
    dom: &mut Dom,
    root: NodeId,
    resolver: &dyn ComponentResolver,
    sink: &mut dyn DiagnosticSink,
) -> ExpandResult<NodeId> {
    expand_with(dom, root, resolver, &ExpandOptions::default(), sink)
}

/// Expand every component under `root`.
///
/// Works on a copy of the tree and commits it only when the whole pass
/// succeeds, so `dom` is untouched on error. Returns the root, which
/// differs from `root` when the root itself was a component.
#[instrument(skip_all)]
pub fn expand_with(
    dom: &mut Dom,
    root: NodeId,
    resolver: &dyn ComponentResolver,
    options: &ExpandOptions,
    sink: &mut dyn DiagnosticSink,
) -> ExpandResult<NodeId> {
    let mut working = dom.clone();
    let mut expander = Expander {
        resolver,
        options,
        sink,
        stack: Vec::new(),
        head: scan(&working, root).head,
    };

    let root = expander.expand_tree(&mut working, root)?;
    *dom = working;
    Ok(root)
}

struct Expander<'a> {
    resolver: &'a dyn ComponentResolver,
    options: &'a ExpandOptions,
    sink: &'a mut dyn DiagnosticSink,
    /// Tags currently being expanded, outermost first
    stack: Vec<String>,
    /// The document head, shared by every nested expansion
    head: Option<NodeId>,
}

/// Component elements of one pass plus the first head
struct Scan {
    targets: Vec<NodeId>,
    head: Option<NodeId>,
}

fn scan(dom: &Dom, root: NodeId) -> Scan {
    let mut scan = Scan {
        targets: Vec::new(),
        head: None,
    };
    let mut pending = vec![root];

    while let Some(id) = pending.pop() {
        if let Some(tag) = dom.tag(id) {
            if tags::is_target(tag) {
                scan.targets.push(id);
                continue;
            }
            if tags::tag_eq(tag, OPAQUE_TAG) {
                continue;
            }
            if scan.head.is_none() && tags::tag_eq(tag, "head") {
                scan.head = Some(id);
            }
        }
        let mut children = dom.children(id);
        children.reverse();
        pending.extend(children);
    }

    scan
}

impl<'a> Expander<'a> {
    fn expand_tree(&mut self, dom: &mut Dom, root: NodeId) -> ExpandResult<NodeId> {
        let mut root = root;

        loop {
            let targets = scan(dom, root).targets;
            if targets.is_empty() {
                return Ok(root);
            }

            for target in targets {
                let replacement = self.expand_target(dom, target)?;
                if target == root {
                    root = replacement;
                }
            }
        }
    }

    /// Expand one component element; returns the node now standing in
    /// its place
    fn expand_target(&mut self, dom: &mut Dom, target: NodeId) -> ExpandResult<NodeId> {
        let (tag, attributes) = match (dom.tag(target), dom.attributes(target)) {
            (Some(tag), Some(attributes)) => (tag.to_string(), attributes.clone()),
            _ => return Ok(target),
        };

        let fragment = self.instantiate(dom, &tag, &attributes)?;

        if dom.is_element(fragment, "head") {
            return Ok(self.merge_head(dom, target, fragment));
        }

        let fragment = self.insert_children(dom, target, fragment);
        let fragment = self.expand_tree(dom, fragment)?;

        Ok(splice(dom, target, fragment))
    }

    /// Resolve, render, normalize and expand the output of a component
    fn instantiate(
        &mut self,
        dom: &mut Dom,
        tag: &str,
        attributes: &Attributes,
    ) -> ExpandResult<NodeId> {
        if self.stack.iter().any(|active| tags::tag_eq(active, tag)) {
            let mut chain = self.stack.clone();
            chain.push(tag.to_string());
            warn!(tag, chain = ?chain, "cyclic component");
            return Err(ExpandError::CyclicComponent {
                tag: tag.to_string(),
                chain,
            });
        }
        if self.stack.len() >= self.options.max_depth {
            return Err(ExpandError::ExpansionTooDeep {
                tag: tag.to_string(),
                depth: self.options.max_depth,
            });
        }

        let mut markup = String::new();
        {
            let renderer = self.resolver.resolve(tag, attributes).map_err(|source| {
                ExpandError::UnresolvedComponent {
                    tag: tag.to_string(),
                    source,
                }
            })?;
            for message in renderer.warnings() {
                self.sink
                    .report(Diagnostic::warning(message).with_source(format!("<{}>", tag)));
            }
            renderer
                .render(&mut markup)
                .map_err(|source| ExpandError::Render {
                    tag: tag.to_string(),
                    source,
                })?;
        }
        debug!(tag, depth = self.stack.len(), bytes = markup.len(), "rendered component");

        let fragment = normalize(dom, &markup).map_err(|source| ExpandError::Dom {
            tag: tag.to_string(),
            source,
        })?;

        self.stack.push(tag.to_string());
        let expanded = self.expand_tree(dom, fragment);
        self.stack.pop();
        expanded
    }

    /// Put head-only output into the document head, however deeply the
    /// component is nested
    fn merge_head(&mut self, dom: &mut Dom, target: NodeId, fragment: NodeId) -> NodeId {
        match self.head {
            Some(existing) => {
                dom.move_children(fragment, existing);
                dom.remove(fragment);
                dom.remove(target);
                existing
            }
            None => {
                dom.retag(target, "head");
                dom.move_children(fragment, target);
                dom.remove(fragment);
                self.head = Some(target);
                target
            }
        }
    }

    /// Move the caller's children into the component output
    fn insert_children(&mut self, dom: &mut Dom, target: NodeId, fragment: NodeId) -> NodeId {
        match dom.find_element(fragment, CHILDREN_TAG) {
            Some(placeholder) if placeholder == fragment => {
                let wrapper = dom.create_element(FRAGMENT_TAG, Attributes::new());
                dom.move_children(target, wrapper);
                dom.remove(placeholder);
                wrapper
            }
            Some(placeholder) => {
                dom.move_children_before(target, placeholder);
                dom.remove(placeholder);
                fragment
            }
            None => {
                dom.move_children(target, fragment);
                fragment
            }
        }
    }
}

/// Replace `target` by `fragment`; a `fragment` element contributes only
/// its children. Returns the new root when `target` was detached.
fn splice(dom: &mut Dom, target: NodeId, fragment: NodeId) -> NodeId {
    let is_marker = dom.is_element(fragment, FRAGMENT_TAG);

    if dom.parent(target).is_none() {
        dom.remove(target);
        if is_marker {
            if let [only] = dom.significant_children(fragment)[..] {
                dom.detach(only);
                dom.remove(fragment);
                return only;
            }
        }
        return fragment;
    }

    if is_marker {
        dom.move_children_before(fragment, target);
        dom.remove(fragment);
        dom.remove(target);
        return target;
    }

    dom.replace(target, fragment);
    fragment
}
