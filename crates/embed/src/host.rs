//! In-memory host document: owns the DOM, the activation listeners and every upgraded widget,
//! and drives the widget lifecycle the way a browser's custom element machinery would.

use crate::config::WidgetOptions;
use crate::error::{ConfigError, EmbedError, HostError};
use crate::events::{Listeners, UiEvent};
use crate::fallback::degrade_all;
use crate::lifecycle::{CustomElement, LazyEmbed};
use crate::timing::{NavigationTiming, ReadyState, report_dom_complete};
use html::dom_utils::{
    Position, assign_node_ids, assign_node_ids_after, collect_elements_named, detach_node,
    find_node_by_id, find_node_by_id_mut, insert_child, max_node_id, outline_from_dom,
};
use html::{Id, Node, outer_html, parse_document, parse_fragment};
use std::collections::{BTreeMap, HashMap};

/// Platform capabilities the host offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    pub custom_elements: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            custom_elements: true,
        }
    }
}

/// Outcome of the one-time registration step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The tag was defined; existing elements were upgraded.
    Defined {
        mounted: Vec<Id>,
        failed: Vec<(Id, EmbedError)>,
    },
    /// No custom element support; existing elements were rewritten as plain embeds.
    Degraded { rewritten: Vec<Id> },
}

#[derive(Debug)]
pub struct Host {
    document: Node,
    environment: Environment,
    options: WidgetOptions,
    instances: BTreeMap<Id, LazyEmbed>,
    listeners: Listeners,
    detached: HashMap<Id, (Position, Node)>,
    registration: Option<Registration>,
}

impl Host {
    pub fn new(
        mut document: Node,
        environment: Environment,
        options: WidgetOptions,
    ) -> Result<Self, ConfigError> {
        let options = options.validate()?;
        assign_node_ids(&mut document);
        Ok(Self {
            document,
            environment,
            options,
            instances: BTreeMap::new(),
            listeners: Listeners::new(),
            detached: HashMap::new(),
            registration: None,
        })
    }

    pub fn parse(
        markup: &str,
        environment: Environment,
        options: WidgetOptions,
    ) -> Result<Self, ConfigError> {
        Self::new(parse_document(markup), environment, options)
    }

    pub fn document(&self) -> &Node {
        &self.document
    }

    pub fn options(&self) -> &WidgetOptions {
        &self.options
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    pub fn instance(&self, id: Id) -> Option<&LazyEmbed> {
        self.instances.get(&id)
    }

    pub fn instances(&self) -> impl Iterator<Item = &LazyEmbed> {
        self.instances.values()
    }

    /// Widget elements currently in the document, upgraded or not, in document order.
    pub fn widget_ids(&self) -> Vec<Id> {
        let mut ids = Vec::new();
        collect_elements_named(&self.document, &self.options.tag_name, &mut ids);
        ids
    }

    /// Defines the widget tag, or degrades every widget element when the environment has no
    /// custom element support. Runs once; later calls return the first outcome.
    pub fn register(&mut self) -> &Registration {
        let outcome = match self.registration.take() {
            Some(done) => done,
            None => self.run_registration(),
        };
        self.registration.insert(outcome)
    }

    pub fn registration(&self) -> Option<&Registration> {
        self.registration.as_ref()
    }

    fn run_registration(&mut self) -> Registration {
        if !self.environment.custom_elements {
            let tag_name = &self.options.tag_name;
            let mut rewritten = degrade_all(&mut self.document, tag_name);
            for (_, node) in self.detached.values_mut() {
                rewritten.extend(degrade_all(node, tag_name));
            }
            return Registration::Degraded { rewritten };
        }

        let (mounted, failed) = self.upgrade_all(self.widget_ids());
        log::info!(
            target: "embed.host",
            "defined <{}>: {} mounted, {} failed",
            self.options.tag_name,
            mounted.len(),
            failed.len()
        );
        Registration::Defined { mounted, failed }
    }

    fn is_defined(&self) -> bool {
        matches!(self.registration, Some(Registration::Defined { .. }))
    }

    fn is_degraded(&self) -> bool {
        matches!(self.registration, Some(Registration::Degraded { .. }))
    }

    /// Constructs and connects each element. A failing element is left as authored and
    /// reported; it never affects its siblings.
    fn upgrade_all(&mut self, ids: Vec<Id>) -> (Vec<Id>, Vec<(Id, EmbedError)>) {
        let mut mounted = Vec::new();
        let mut failed = Vec::new();
        for id in ids {
            if self.instances.contains_key(&id) {
                continue;
            }
            let Some(element) = find_node_by_id_mut(&mut self.document, id) else {
                continue;
            };
            match LazyEmbed::construct(element, &self.options) {
                Ok(mut instance) => {
                    instance.connected(&mut self.listeners);
                    self.instances.insert(id, instance);
                    mounted.push(id);
                }
                Err(err) => {
                    log::warn!(target: "embed.host", "{id:?}: not upgraded: {err}");
                    failed.push((id, err));
                }
            }
        }
        (mounted, failed)
    }

    /// Parses `markup` and inserts it under `parent` at `index` (clamped to the child count).
    /// Widget elements in the new content are upgraded immediately when the tag is defined,
    /// or rewritten as plain embeds when registration degraded.
    pub fn insert_html(
        &mut self,
        parent: Id,
        index: usize,
        markup: &str,
    ) -> Result<Vec<(Id, EmbedError)>, HostError> {
        if find_node_by_id(&self.document, parent).is_none() {
            return Err(HostError::UnknownElement(parent));
        }
        // Number the fragment after every id handed out so far, detached subtrees included.
        let mut fragment = Node::Document {
            id: self.highest_id(),
            doctype: None,
            children: parse_fragment(markup),
        };
        assign_node_ids(&mut fragment);
        if self.is_degraded() {
            degrade_all(&mut fragment, &self.options.tag_name);
        }
        let mut new_widgets = Vec::new();
        collect_elements_named(&fragment, &self.options.tag_name, &mut new_widgets);
        let nodes = fragment
            .children_mut()
            .map(std::mem::take)
            .unwrap_or_default();

        for (offset, node) in nodes.into_iter().enumerate() {
            insert_child(&mut self.document, parent, index.saturating_add(offset), node)
                .map_err(|_| HostError::UnknownElement(parent))?;
        }

        if !self.is_defined() {
            return Ok(Vec::new());
        }
        let (_, failed) = self.upgrade_all(new_widgets);
        Ok(failed)
    }

    fn highest_id(&self) -> Id {
        self.detached
            .values()
            .map(|(_, node)| max_node_id(node))
            .fold(max_node_id(&self.document), Ord::max)
    }

    /// Removes the element from the live document, disconnecting any widgets inside it.
    pub fn detach(&mut self, id: Id) -> Result<(), HostError> {
        if id == self.document.id() {
            return Err(HostError::RootDetach);
        }
        let (position, node) =
            detach_node(&mut self.document, id).ok_or(HostError::UnknownElement(id))?;

        let mut widgets = Vec::new();
        collect_elements_named(&node, &self.options.tag_name, &mut widgets);
        for widget in widgets {
            if let Some(instance) = self.instances.get_mut(&widget) {
                instance.disconnected(&mut self.listeners);
            }
        }
        self.detached.insert(id, (position, node));
        Ok(())
    }

    /// Puts a detached element back where it was and reconnects its widgets. Widgets that were
    /// detached when registration ran are upgraded or degraded now.
    pub fn reattach(&mut self, id: Id) -> Result<(), HostError> {
        let (position, mut node) = self.detached.remove(&id).ok_or(HostError::NotDetached(id))?;
        if self.is_degraded() {
            degrade_all(&mut node, &self.options.tag_name);
        }

        let mut widgets = Vec::new();
        collect_elements_named(&node, &self.options.tag_name, &mut widgets);
        if let Err(node) = insert_child(&mut self.document, position.parent, position.index, node)
        {
            self.detached.insert(id, (position, node));
            return Err(HostError::NoParent(id));
        }
        for widget in &widgets {
            if let Some(instance) = self.instances.get_mut(widget) {
                instance.connected(&mut self.listeners);
            }
        }
        if self.is_defined() {
            self.upgrade_all(widgets);
        }
        Ok(())
    }

    /// Delivers a UI event to `target`. Returns whether a widget swapped in its embed.
    pub fn dispatch(&mut self, target: Id, event: UiEvent) -> bool {
        if !event.is_activation() {
            return false;
        }
        if self.listeners.for_target(target).next().is_none() {
            log::trace!(target: "embed.host", "{target:?}: {event:?} has no listener");
            return false;
        }
        self.instances
            .get_mut(&target)
            .is_some_and(|instance| instance.activate(&mut self.listeners))
    }

    pub fn click(&mut self, target: Id) -> bool {
        self.dispatch(target, UiEvent::Click)
    }

    pub fn report_timing(&mut self, state: ReadyState, timing: NavigationTiming) -> usize {
        let written = report_dom_complete(&mut self.document, state, timing);
        let floor = self.highest_id();
        assign_node_ids_after(&mut self.document, floor);
        written
    }

    /// The document with each upgraded widget's shadow root attached as a declarative
    /// `<template shadowrootmode="open">` first child.
    pub fn composed(&self) -> Node {
        let mut composed = self.document.clone();
        for (id, instance) in &self.instances {
            let Some(children) = find_node_by_id_mut(&mut composed, *id).and_then(Node::children_mut)
            else {
                continue;
            };
            children.insert(0, instance.shadow_root().to_template());
        }
        composed
    }

    pub fn render(&self) -> String {
        outer_html(&self.composed())
    }

    pub fn outline(&self, cap: usize) -> Vec<String> {
        outline_from_dom(&self.composed(), cap)
    }
}
