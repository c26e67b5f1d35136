//! View descriptions produced by component `render()` methods.
//!
//! Rendering is a pure function of component state. Hosts turn these trees
//! into whatever their display layer needs.

use std::collections::{BTreeMap, BTreeSet};

use crate::content::RenderedContent;
use crate::spinner::SpinnerKind;

/// Root element of a rendered component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostView {
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub z_index: Option<u32>,
    pub children: Vec<ViewNode>,
}

impl HostView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Merge passthrough attributes. Existing keys are overwritten.
    pub fn attrs(mut self, attributes: &BTreeMap<String, String>) -> Self {
        self.attributes
            .extend(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Add a class when `enabled`.
    pub fn class_if(mut self, class: impl Into<String>, enabled: bool) -> Self {
        if enabled {
            self.classes.insert(class.into());
        }
        self
    }

    /// Add several classes.
    pub fn classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classes.extend(classes.into_iter().map(Into::into));
        self
    }

    pub fn z_index(mut self, z_index: u32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn child(mut self, child: ViewNode) -> Self {
        self.children.push(child);
        self
    }

    /// Find the first node with the given id, depth first.
    pub fn find(&self, id: &str) -> Option<&ViewNode> {
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Every node matching `pred`, in document order.
    pub fn nodes(&self, pred: &dyn Fn(&ViewNode) -> bool) -> Vec<&ViewNode> {
        let mut out = Vec::new();
        for child in &self.children {
            child.collect(pred, &mut out);
        }
        out
    }

    /// Check for a class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// A node inside a rendered component.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    /// Dimmed layer behind the dialog.
    Backdrop { visible: bool, tappable: bool },
    /// Invisible focusable element that keeps tab focus inside the overlay.
    FocusSentinel,
    /// Generic container.
    Container {
        class: String,
        id: Option<String>,
        children: Vec<ViewNode>,
    },
    /// Text or markup content.
    Content {
        class: String,
        id: Option<String>,
        content: RenderedContent,
    },
    Spinner { kind: SpinnerKind, paused: bool },
    Icon { name: String },
    Input {
        id: String,
        input_type: String,
        name: Option<String>,
        label: Option<String>,
        value: Option<String>,
        checked: bool,
        disabled: bool,
    },
    Button {
        id: Option<String>,
        text: String,
        role: Option<String>,
        classes: Vec<String>,
    },
}

impl ViewNode {
    /// Container shorthand.
    pub fn container(class: impl Into<String>, children: Vec<ViewNode>) -> Self {
        ViewNode::Container {
            class: class.into(),
            id: None,
            children,
        }
    }

    /// Element id, if the node has one.
    pub fn id(&self) -> Option<&str> {
        match self {
            ViewNode::Container { id, .. }
            | ViewNode::Content { id, .. }
            | ViewNode::Button { id, .. } => id.as_deref(),
            ViewNode::Input { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Find a node by id in this subtree.
    pub fn find(&self, id: &str) -> Option<&ViewNode> {
        if self.id() == Some(id) {
            return Some(self);
        }
        match self {
            ViewNode::Container { children, .. } => children.iter().find_map(|c| c.find(id)),
            _ => None,
        }
    }

    /// Collect every node matching `pred` in this subtree.
    pub fn collect<'a>(&'a self, pred: &dyn Fn(&ViewNode) -> bool, out: &mut Vec<&'a ViewNode>) {
        if pred(self) {
            out.push(self);
        }
        if let ViewNode::Container { children, .. } = self {
            for child in children {
                child.collect(pred, out);
            }
        }
    }
}
