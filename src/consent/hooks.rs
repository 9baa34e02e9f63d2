//! Gating hook: activation of optional tracking integrations.
//!
//! The consent layer never loads tracking itself. It calls one activation callback per
//! enabled optional category and leaves the rest to the host. Callbacks may be invoked
//! again after every explicit decision, so they should be idempotent on their side;
//! the dispatcher does not remember what it activated before.

use crate::consent::{Category, PreferenceRecord};

/// Activation callbacks for the optional categories.
pub trait ActivationHooks {
    fn activate_analytics(&mut self);
    fn activate_marketing(&mut self);
    fn activate_preferences(&mut self);

    /// Routes `category` to its callback. `Essential` has nothing to activate.
    fn activate(&mut self, category: Category) {
        match category {
            Category::Essential => {}
            Category::Analytics => self.activate_analytics(),
            Category::Marketing => self.activate_marketing(),
            Category::Preferences => self.activate_preferences(),
        }
    }
}

/// Hooks that activate nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl ActivationHooks for NoopHooks {
    fn activate_analytics(&mut self) {}
    fn activate_marketing(&mut self) {}
    fn activate_preferences(&mut self) {}
}

type Callback = Box<dyn FnMut()>;

/// Closure-backed [`ActivationHooks`]. Unset callbacks are no-ops.
///
/// ```rust
/// use cookie_consent::Integrations;
///
/// let hooks = Integrations::new()
///     .on_analytics(|| log::info!("loading analytics"))
///     .on_marketing(|| log::info!("loading marketing pixels"));
/// # let _ = hooks;
/// ```
#[derive(Default)]
pub struct Integrations {
    analytics: Option<Callback>,
    marketing: Option<Callback>,
    preferences: Option<Callback>,
}

impl Integrations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_analytics(mut self, f: impl FnMut() + 'static) -> Self {
        self.analytics = Some(Box::new(f));
        self
    }

    pub fn on_marketing(mut self, f: impl FnMut() + 'static) -> Self {
        self.marketing = Some(Box::new(f));
        self
    }

    pub fn on_preferences(mut self, f: impl FnMut() + 'static) -> Self {
        self.preferences = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for Integrations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Integrations")
            .field("analytics", &self.analytics.is_some())
            .field("marketing", &self.marketing.is_some())
            .field("preferences", &self.preferences.is_some())
            .finish()
    }
}

impl ActivationHooks for Integrations {
    fn activate_analytics(&mut self) {
        if let Some(f) = self.analytics.as_mut() {
            f();
        }
    }

    fn activate_marketing(&mut self) {
        if let Some(f) = self.marketing.as_mut() {
            f();
        }
    }

    fn activate_preferences(&mut self) {
        if let Some(f) = self.preferences.as_mut() {
            f();
        }
    }
}

/// Invokes the callback of every enabled optional category in `record`, once each.
///
/// Returns the categories that were activated.
pub fn dispatch_activations(record: &PreferenceRecord, hooks: &mut dyn ActivationHooks) -> Vec<Category> {
    let activated: Vec<Category> = record.enabled_optional().collect();
    for category in &activated {
        log::debug!("activating {} integrations", category);
        hooks.activate(*category);
    }
    activated
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording() -> (Integrations, Rc<RefCell<Vec<Category>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, m, p) = (log.clone(), log.clone(), log.clone());
        let hooks = Integrations::new()
            .on_analytics(move || a.borrow_mut().push(Category::Analytics))
            .on_marketing(move || m.borrow_mut().push(Category::Marketing))
            .on_preferences(move || p.borrow_mut().push(Category::Preferences));
        (hooks, log)
    }

    #[test]
    fn only_enabled_categories_are_activated() {
        let (mut hooks, log) = recording();
        let activated = dispatch_activations(&PreferenceRecord::new(true, false, true), &mut hooks);

        assert_eq!(activated, vec![Category::Analytics, Category::Preferences]);
        assert_eq!(*log.borrow(), vec![Category::Analytics, Category::Preferences]);
    }

    #[test]
    fn essential_only_activates_nothing() {
        let (mut hooks, log) = recording();
        assert!(dispatch_activations(&PreferenceRecord::default(), &mut hooks).is_empty());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn repeated_dispatch_is_not_suppressed() {
        let (mut hooks, log) = recording();
        let record = PreferenceRecord::new(false, true, false);
        dispatch_activations(&record, &mut hooks);
        dispatch_activations(&record, &mut hooks);
        assert_eq!(*log.borrow(), vec![Category::Marketing, Category::Marketing]);
    }

    #[test]
    fn unset_callbacks_are_noops() {
        let mut hooks = Integrations::new();
        assert_eq!(dispatch_activations(&PreferenceRecord::all_granted(), &mut hooks).len(), 3);
        hooks.activate(Category::Essential);
        NoopHooks.activate(Category::Analytics);
    }
}
