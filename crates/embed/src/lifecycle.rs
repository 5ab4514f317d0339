//! Widget instance and its `Idle → Armed → Activated` state machine.

use crate::builder::build_artifact;
use crate::config::WidgetOptions;
use crate::error::EmbedError;
use crate::events::{ListenerId, Listeners};
use crate::placeholder::{ShadowRoot, render_placeholder};
use crate::resolver::{ResolvedSource, resolve};
use html::{Id, Node};

/// The three hook points a host's component model calls.
pub trait CustomElement: Sized {
    /// Runs once when the host upgrades `element`. A failure means no instance exists.
    fn construct(element: &mut Node, options: &WidgetOptions) -> Result<Self, EmbedError>;
    /// The element entered the live document.
    fn connected(&mut self, listeners: &mut Listeners);
    /// The element left the live document.
    fn disconnected(&mut self, listeners: &mut Listeners);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Armed(ListenerId),
    Activated,
}

/// One upgraded widget element.
#[derive(Debug)]
pub struct LazyEmbed {
    host: Id,
    source: ResolvedSource,
    shadow: ShadowRoot,
    artifact: Option<Node>,
    state: LifecycleState,
}

impl LazyEmbed {
    pub fn host(&self) -> Id {
        self.host
    }

    pub fn source(&self) -> &ResolvedSource {
        &self.source
    }

    pub fn shadow_root(&self) -> &ShadowRoot {
        &self.shadow
    }

    /// The embed waiting for activation; `None` once swapped in.
    pub fn pending_embed(&self) -> Option<&Node> {
        self.artifact.as_ref()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_activated(&self) -> bool {
        self.state == LifecycleState::Activated
    }

    /// Performs the one-shot swap if armed. Returns whether the swap happened.
    pub fn activate(&mut self, listeners: &mut Listeners) -> bool {
        let LifecycleState::Armed(listener) = self.state else {
            log::trace!(target: "embed.lifecycle", "{:?}: activation ignored in {:?}", self.host, self.state);
            return false;
        };
        let Some(embed) = self.artifact.take() else {
            return false;
        };
        self.shadow.replace_contents(embed);
        listeners.remove(listener);
        self.state = LifecycleState::Activated;
        log::debug!(target: "embed.lifecycle", "{:?}: swapped in embed for {}", self.host, self.source.video_id);
        true
    }
}

impl CustomElement for LazyEmbed {
    fn construct(element: &mut Node, options: &WidgetOptions) -> Result<Self, EmbedError> {
        let mut resolution = resolve(element)?;
        let artifact = build_artifact(element, &options.tag_name, &mut resolution);
        let shadow = render_placeholder(&resolution.source, options);
        log::debug!(
            target: "embed.lifecycle",
            "{:?}: constructed ({:?}, {}x{})",
            element.id(),
            resolution.source.mode,
            resolution.source.width,
            resolution.source.height
        );
        Ok(Self {
            host: element.id(),
            source: resolution.source,
            shadow,
            artifact: Some(artifact),
            state: LifecycleState::Idle,
        })
    }

    fn connected(&mut self, listeners: &mut Listeners) {
        if self.state != LifecycleState::Idle {
            return;
        }
        let listener = listeners.add(self.host);
        self.state = LifecycleState::Armed(listener);
        log::debug!(target: "embed.lifecycle", "{:?}: armed", self.host);
    }

    fn disconnected(&mut self, listeners: &mut Listeners) {
        if let LifecycleState::Armed(listener) = self.state {
            listeners.remove(listener);
            self.state = LifecycleState::Idle;
            log::debug!(target: "embed.lifecycle", "{:?}: disarmed", self.host);
        }
    }
}
