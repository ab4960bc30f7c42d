//! Template event router — render context → `Bake.*` events.
//!
//! One router is built per render pass. It pairs the render context with a
//! listener that declares which callbacks it handles, then:
//!   1. matches every table entry against the context's source path
//!   2. keeps the entries the listener declared
//!   3. emits `<namespace>.<callback>` for each, in table order
//!
//! Construction has no side effects. Subscribing the router to a bus (so the
//! wrapped listener receives the events it asked for) is a separate, explicit
//! [`EventBus::subscribe`](crate::bus::EventBus::subscribe) call.
//!
//! Matching is plain substring containment of `<root>/<fragment>.<ext>` in the
//! source path. It is not anchored: `OtherBake/Model/table.ctp` also counts as
//! `Model/table`.

mod bundle;

pub use bundle::HandlerBundle;

use crate::bus::{Event, EventDispatcher, EventListener};
use crate::callback::{Callback, CallbackSet};
use crate::context::RenderContext;
use crate::types::{Error, Result, RouterConfig};
use std::sync::Arc;

/// A listener that declares the callbacks it handles up front.
pub trait TemplateListener: Send + Sync {
    /// Callbacks this listener handles. Anything outside the set is never
    /// emitted on its behalf.
    fn capabilities(&self) -> CallbackSet;

    /// Handle a routed event for one of the declared callbacks.
    fn handle(&self, callback: Callback, event: &Event) -> Result<()>;
}

/// Routes one render pass to the callbacks its listener declared.
#[derive(Debug)]
pub struct TemplateRouter<L> {
    context: Arc<RenderContext>,
    listener: L,
    config: RouterConfig,
}

impl<L: TemplateListener> TemplateRouter<L> {
    /// Router using the default `Bake` namespace and `Bake/<fragment>.ctp` layout.
    pub fn new(context: Arc<RenderContext>, listener: L) -> Self {
        Self {
            context,
            listener,
            config: RouterConfig::default(),
        }
    }

    pub fn with_config(
        context: Arc<RenderContext>,
        listener: L,
        config: RouterConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            context,
            listener,
            config,
        })
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Whether the template being rendered is `fragment` (e.g. `"Model/table"`).
    ///
    /// A context without a string source path never matches.
    pub fn is_type(&self, fragment: &str) -> bool {
        let Some(source_path) = self.context.source_path() else {
            tracing::debug!("Render context has no source path; {} does not match", fragment);
            return false;
        };

        source_path.contains(&self.config.template_marker(fragment))
    }

    /// Whether the template being rendered is any of `fragments`.
    pub fn is_any_type<S: AsRef<str>>(&self, fragments: &[S]) -> bool {
        fragments.iter().any(|f| self.is_type(f.as_ref()))
    }

    /// Fully-qualified event name → callback, for every table entry that
    /// matches this render pass and that the listener declared. Table order.
    pub fn implemented_callbacks(&self) -> Vec<(String, Callback)> {
        let capabilities = self.listener.capabilities();

        Callback::ALL
            .into_iter()
            .filter(|c| self.is_type(c.template()) && capabilities.contains(*c))
            .map(|c| (self.config.event_name(c.name()), c))
            .collect()
    }

    /// Emit one event per implemented callback, targeting the context subject.
    ///
    /// Returns the number of events emitted. A handler error aborts the pass;
    /// events already emitted stay emitted.
    pub fn execute<D>(&self, dispatcher: &D) -> Result<usize>
    where
        D: EventDispatcher + ?Sized,
    {
        let events = self.implemented_callbacks();

        for (name, _) in &events {
            dispatcher.dispatch(Event::new(name.clone(), self.context.subject.clone()))?;
        }

        tracing::debug!(
            "Render pass source={:?} emitted {} events",
            self.context.source_path(),
            events.len()
        );

        Ok(events.len())
    }

    /// Map an incoming event name back to a declared callback.
    fn resolve(&self, event_name: &str) -> Result<Callback> {
        let callback = event_name
            .strip_prefix(self.config.namespace.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(|name| name.parse::<Callback>().ok())
            .filter(|c| self.listener.capabilities().contains(*c))
            .ok_or_else(|| {
                Error::not_found(format!("Event not handled by this router: {}", event_name))
            })?;

        Ok(callback)
    }
}

impl<L: TemplateListener> EventListener for TemplateRouter<L> {
    fn implemented_events(&self) -> Vec<String> {
        self.implemented_callbacks()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    fn handle_event(&self, event: &Event) -> Result<()> {
        let callback = self.resolve(&event.name)?;
        self.listener.handle(callback, event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventBus;
    use mockall::{mock, Sequence};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Mutex;

    mock! {
        Dispatcher {}

        impl EventDispatcher for Dispatcher {
            fn dispatch(&self, event: Event) -> Result<usize>;
        }
    }

    /// Declares a fixed set and records every handled callback.
    struct Declared {
        set: CallbackSet,
        seen: Mutex<Vec<Callback>>,
    }

    impl Declared {
        fn new(callbacks: &[Callback]) -> Self {
            Self {
                set: callbacks.iter().copied().collect(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl TemplateListener for Declared {
        fn capabilities(&self) -> CallbackSet {
            self.set
        }

        fn handle(&self, callback: Callback, _event: &Event) -> Result<()> {
            self.seen.lock().unwrap().push(callback);
            Ok(())
        }
    }

    fn context(path: &str) -> Arc<RenderContext> {
        Arc::new(RenderContext::for_template(json!({"view": "BakeView"}), path))
    }

    /// Source path containing every table marker.
    fn context_matching_everything() -> Arc<RenderContext> {
        let config = RouterConfig::default();
        let path = Callback::ALL
            .iter()
            .map(|c| config.template_marker(c.template()))
            .collect::<Vec<_>>()
            .join("|");
        context(&path)
    }

    // =========================================================================
    // is_type
    // =========================================================================

    #[test]
    fn test_is_type_matches_marker() {
        let router = TemplateRouter::new(
            context("templates/Bake/Model/table.ctp"),
            Declared::new(&[]),
        );
        assert!(router.is_type("Model/table"));
        assert!(!router.is_type("Model/entity"));
        assert!(!router.is_type("Model"));
        // No mutation between calls
        assert_eq!(router.is_type("Model/table"), router.is_type("Model/table"));
    }

    #[test]
    fn test_is_type_requires_extension() {
        let router = TemplateRouter::new(
            context("templates/Bake/Model/table.twig"),
            Declared::new(&[]),
        );
        assert!(!router.is_type("Model/table"));
    }

    #[test]
    fn test_is_type_unanchored_match() {
        let router = TemplateRouter::new(
            context("plugins/OtherBake/Model/table.ctp.orig"),
            Declared::new(&[]),
        );
        assert!(router.is_type("Model/table"));
    }

    #[test]
    fn test_is_type_without_source_path() {
        let ctx = Arc::new(RenderContext::new(json!(null), vec![]));
        let router = TemplateRouter::new(ctx, Declared::new(&[]));
        assert!(!router.is_type("Model/table"));

        let ctx = Arc::new(RenderContext::new(json!(null), vec![json!(["Bake/Model/table.ctp"])]));
        let router = TemplateRouter::new(ctx, Declared::new(&[]));
        assert!(!router.is_type("Model/table"));
    }

    #[test]
    fn test_is_any_type() {
        let router = TemplateRouter::new(
            context("templates/Bake/View/cell.ctp"),
            Declared::new(&[]),
        );
        assert!(router.is_any_type(&["View/helper", "View/cell"]));
        assert!(!router.is_any_type(&["View/helper", "Model/table"]));
        assert!(!router.is_any_type::<&str>(&[]));
    }

    #[test]
    fn test_custom_layout() {
        let config = RouterConfig {
            namespace: "Generate".to_string(),
            template_root: "bake".to_string(),
            template_extension: "twig".to_string(),
        };
        let router = TemplateRouter::with_config(
            context("templates/bake/Model/table.twig"),
            Declared::new(&[Callback::BeforeRenderTable]),
            config,
        )
        .unwrap();

        assert_eq!(
            router.implemented_callbacks(),
            vec![(
                "Generate.beforeRenderTable".to_string(),
                Callback::BeforeRenderTable
            )]
        );
    }

    #[test]
    fn test_with_config_validates() {
        let config = RouterConfig {
            template_extension: String::new(),
            ..RouterConfig::default()
        };
        let result = TemplateRouter::with_config(context("x"), Declared::new(&[]), config);
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    // =========================================================================
    // implemented_callbacks
    // =========================================================================

    #[test]
    fn test_no_declared_callbacks() {
        let router = TemplateRouter::new(context_matching_everything(), Declared::new(&[]));
        assert!(router.implemented_callbacks().is_empty());
    }

    #[test]
    fn test_declared_but_not_matching() {
        let router = TemplateRouter::new(
            context("templates/Bake/Shell/shell.ctp"),
            Declared::new(&[Callback::BeforeRenderTable]),
        );
        assert!(router.implemented_callbacks().is_empty());
    }

    #[test]
    fn test_single_match() {
        let router = TemplateRouter::new(
            context("templates/Bake/Model/table.ctp"),
            Declared::new(&[Callback::BeforeRenderTable, Callback::BeforeRenderEntity]),
        );
        assert_eq!(
            router.implemented_callbacks(),
            vec![(
                "Bake.beforeRenderTable".to_string(),
                Callback::BeforeRenderTable
            )]
        );
    }

    #[test]
    fn test_everything_follows_table_order() {
        let router = TemplateRouter::new(
            context_matching_everything(),
            Declared::new(&[Callback::BeforeRenderTestCase, Callback::BeforeRenderRoutes]),
        );
        assert_eq!(
            router.implemented_callbacks(),
            vec![
                (
                    "Bake.beforeRenderRoutes".to_string(),
                    Callback::BeforeRenderRoutes
                ),
                (
                    "Bake.beforeRenderTestCase".to_string(),
                    Callback::BeforeRenderTestCase
                ),
            ]
        );
    }

    // =========================================================================
    // execute
    // =========================================================================

    #[test]
    fn test_execute_emits_in_table_order() {
        let router = TemplateRouter::new(
            context_matching_everything(),
            Declared::new(&Callback::ALL),
        );

        let mut seq = Sequence::new();
        let mut dispatcher = MockDispatcher::new();
        for callback in Callback::ALL {
            let expected = format!("Bake.{}", callback.name());
            dispatcher
                .expect_dispatch()
                .withf(move |event: &Event| {
                    event.name == expected
                        && event.subject == json!({"view": "BakeView"})
                        && event.data.is_none()
                })
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(0));
        }

        assert_eq!(router.execute(&dispatcher).unwrap(), Callback::ALL.len());
    }

    #[test]
    fn test_execute_nothing_to_emit() {
        let router = TemplateRouter::new(
            context("templates/Bake/Shell/shell.ctp"),
            Declared::new(&[]),
        );

        let mut dispatcher = MockDispatcher::new();
        dispatcher.expect_dispatch().never();

        assert_eq!(router.execute(&dispatcher).unwrap(), 0);
    }

    #[test]
    fn test_execute_propagates_dispatch_error() {
        let router = TemplateRouter::new(
            context("Bake/Model/table.ctp Bake/Model/entity.ctp"),
            Declared::new(&[Callback::BeforeRenderEntity, Callback::BeforeRenderTable]),
        );

        let mut dispatcher = MockDispatcher::new();
        dispatcher
            .expect_dispatch()
            .times(1)
            .returning(|event| Err(Error::handler(event.name, "rejected")));

        let err = router.execute(&dispatcher).unwrap_err();
        match err {
            Error::Handler { event, .. } => assert_eq!(event, "Bake.beforeRenderEntity"),
            other => panic!("unexpected error: {other}"),
        }
    }

    // =========================================================================
    // EventListener side
    // =========================================================================

    #[test]
    fn test_router_as_listener() {
        let router = TemplateRouter::new(
            context("templates/Bake/Model/entity.ctp"),
            Declared::new(&[Callback::BeforeRenderEntity, Callback::BeforeRenderTable]),
        );

        assert_eq!(
            router.implemented_events(),
            vec!["Bake.beforeRenderEntity".to_string()]
        );

        router
            .handle_event(&Event::new("Bake.beforeRenderEntity", json!(null)))
            .unwrap();
        assert_eq!(
            *router.listener().seen.lock().unwrap(),
            vec![Callback::BeforeRenderEntity]
        );
    }

    #[test]
    fn test_router_rejects_foreign_events() {
        let router = TemplateRouter::new(
            context("templates/Bake/Model/entity.ctp"),
            Declared::new(&[Callback::BeforeRenderEntity]),
        );

        for name in [
            "Bake.beforeRenderCell",
            "Other.beforeRenderEntity",
            "Bakery.beforeRenderEntity",
            "Bake.unknown",
        ] {
            let err = router
                .handle_event(&Event::new(name, json!(null)))
                .unwrap_err();
            assert!(matches!(err, Error::NotFound(_)), "{name}");
        }
        assert!(router.listener().seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_subscribed_router_receives_its_own_events() {
        let router = Arc::new(TemplateRouter::new(
            context("templates/Bake/Model/table.ctp"),
            Declared::new(&[Callback::BeforeRenderTable]),
        ));

        let mut bus = EventBus::new();
        bus.subscribe(router.clone());

        assert_eq!(router.execute(&bus).unwrap(), 1);
        assert_eq!(
            *router.listener().seen.lock().unwrap(),
            vec![Callback::BeforeRenderTable]
        );
    }
}
