#![forbid(unsafe_code)]

//! Deferred image loading and link prefetch hints.
//!
//! Both behaviors are one-shot per element: an image swaps in its real
//! source on its first intersection and is unobserved; an external link
//! injects its prefetch hint on the first hover only.

use folio_core::{Dom, ElementId, IntersectionEntry, ObserverKind, Patch};

use crate::config::ObserverConfig;
use crate::markup::{ExternalLink, LazyImage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LazyImageState {
    Deferred,
    Loaded,
}

#[derive(Debug, Clone)]
pub struct PerformanceOptimizer {
    images: Vec<(LazyImage, LazyImageState)>,
    links: Vec<(ExternalLink, bool)>,
}

impl PerformanceOptimizer {
    pub fn new<D: Dom>(
        images: Vec<LazyImage>,
        links: Vec<ExternalLink>,
        observer: &ObserverConfig,
        dom: &mut D,
    ) -> Self {
        if !images.is_empty() {
            dom.apply(Patch::CreateObserver {
                observer: ObserverKind::LazyImage,
                options: observer.to_options(),
            });
        }
        for image in &images {
            dom.apply(Patch::Observe {
                observer: ObserverKind::LazyImage,
                target: image.element,
            });
        }
        Self {
            images: images
                .into_iter()
                .map(|image| (image, LazyImageState::Deferred))
                .collect(),
            links: links.into_iter().map(|link| (link, false)).collect(),
        }
    }

    #[must_use]
    pub fn image_state(&self, element: ElementId) -> Option<LazyImageState> {
        self.images
            .iter()
            .find(|(image, _)| image.element == element)
            .map(|(_, state)| *state)
    }

    /// Whether the link's prefetch hint has been injected.
    #[must_use]
    pub fn is_prefetched(&self, element: ElementId) -> bool {
        self.links
            .iter()
            .any(|(link, done)| link.element == element && *done)
    }

    pub fn on_intersect<D: Dom>(&mut self, entry: IntersectionEntry, dom: &mut D) {
        if entry.observer != ObserverKind::LazyImage || !entry.is_intersecting {
            return;
        }
        let Some((image, state)) = self
            .images
            .iter_mut()
            .find(|(image, _)| image.element == entry.target)
        else {
            return;
        };
        if *state == LazyImageState::Loaded {
            return;
        }
        *state = LazyImageState::Loaded;
        tracing::debug!(src = %image.src, "lazy image loaded");
        dom.set_attribute(image.element, "src", image.src.clone());
        dom.apply(Patch::RemoveAttribute {
            target: image.element,
            name: "data-src",
        });
        dom.apply(Patch::Unobserve {
            observer: ObserverKind::LazyImage,
            target: image.element,
        });
    }

    /// Pointer entered `target`; hovered external links get one prefetch hint.
    pub fn on_mouse_enter<D: Dom>(&mut self, target: ElementId, dom: &mut D) {
        let Some((link, done)) = self
            .links
            .iter_mut()
            .find(|(link, _)| link.element == target)
        else {
            return;
        };
        if *done {
            return;
        }
        *done = true;
        dom.apply(Patch::AppendHeadLink {
            rel: "prefetch",
            href: link.href.clone(),
        });
    }
}
