#![forbid(unsafe_code)]

//! Construction-time controller configuration.

use std::fmt;

use dragsort_core::event::PointerEvent;
use dragsort_core::style::StyleValue;
use web_time::Duration;

use crate::error::ResolveError;
use crate::options::ReorderOptions;
use crate::session::DiffSide;

/// Maps a pointer-down to the node that should be dragged.
///
/// `Ok(None)` and `Err(_)` both mean "no drag for this gesture".
pub type DragElementResolver<N> = Box<dyn FnMut(&PointerEvent<N>) -> Result<Option<N>, ResolveError>>;

/// Called once per drag session that moved, with the `old` and `new` sides.
pub type DragEndCallback<N> = Box<dyn FnMut(&DiffSide<N>, &DiffSide<N>)>;

/// Builder for a [`ReorderController`](crate::ReorderController).
pub struct ReorderConfig<N> {
    pub(crate) group_element: Option<N>,
    pub(crate) scroll_element: Option<N>,
    pub(crate) drag_element: Option<DragElementResolver<N>>,
    pub(crate) drag_end: Option<DragEndCallback<N>>,
    pub(crate) options: ReorderOptions,
}

impl<N> Default for ReorderConfig<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: fmt::Debug> fmt::Debug for ReorderConfig<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReorderConfig")
            .field("group_element", &self.group_element)
            .field("scroll_element", &self.scroll_element)
            .field("drag_element", &self.drag_element.is_some())
            .field("drag_end", &self.drag_end.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl<N> ReorderConfig<N> {
    /// Empty configuration. A group element must be set before use.
    #[must_use]
    pub fn new() -> Self {
        Self {
            group_element: None,
            scroll_element: None,
            drag_element: None,
            drag_end: None,
            options: ReorderOptions::default(),
        }
    }

    /// Container whose children are reorderable.
    #[must_use]
    pub fn group_element(mut self, group: N) -> Self {
        self.group_element = Some(group);
        self
    }

    /// Element whose scrolling invalidates geometry. Defaults to the group.
    #[must_use]
    pub fn scroll_element(mut self, scroll: N) -> Self {
        self.scroll_element = Some(scroll);
        self
    }

    /// Resolver picking the node to drag for a pointer-down.
    #[must_use]
    pub fn drag_element<F>(mut self, resolver: F) -> Self
    where
        F: FnMut(&PointerEvent<N>) -> Result<Option<N>, ResolveError> + 'static,
    {
        self.drag_element = Some(Box::new(resolver));
        self
    }

    /// Completion callback.
    #[must_use]
    pub fn drag_end<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&DiffSide<N>, &DiffSide<N>) + 'static,
    {
        self.drag_end = Some(Box::new(callback));
        self
    }

    /// Add one inline style applied to the drag overlay.
    ///
    /// Styles are applied in property-name order, not call order; setting a
    /// property twice keeps the last value.
    #[must_use]
    pub fn clone_element_style(
        mut self,
        property: impl Into<String>,
        value: impl Into<StyleValue>,
    ) -> Self {
        self.options
            .clone_element_style
            .insert(property.into(), value.into());
        self
    }

    /// Class applied to the drag overlay.
    #[must_use]
    pub fn clone_element_class(mut self, class: impl Into<String>) -> Self {
        self.options.clone_element_class = Some(class.into());
        self
    }

    /// Displacement animation length.
    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.options.delay_ms = delay.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Geometry refresh debounce window.
    #[must_use]
    pub fn refresh_debounce(mut self, window: Duration) -> Self {
        self.options.refresh_debounce_ms = window.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Replace every plain-data option at once.
    #[must_use]
    pub fn with_options(mut self, options: ReorderOptions) -> Self {
        self.options = options;
        self
    }

    /// Current plain-data options.
    #[must_use]
    pub fn options(&self) -> &ReorderOptions {
        &self.options
    }
}
