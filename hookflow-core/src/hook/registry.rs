use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::RegistryError;
use crate::hook::{Hook, HookEvent};

/// Registry shared between the loading phase and the executor
pub type SharedRegistry = Arc<RwLock<HookRegistry>>;

/// Registry of hooks, indexed by the event they subscribe to.
///
/// Each per-event list is kept sorted by ascending priority. The sort is
/// stable, so hooks sharing a priority stay in registration order.
#[derive(Default)]
pub struct HookRegistry {
    handlers: HashMap<HookEvent, Vec<Arc<dyn Hook>>>,
    ids: HashMap<String, HookEvent>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }

    /// Add a hook. Ids are unique across every event.
    pub fn register(&mut self, hook: Arc<dyn Hook>) -> Result<(), RegistryError> {
        let id = hook.id().to_string();
        if let Some(event) = self.ids.get(&id) {
            return Err(RegistryError::DuplicateId { id, event: *event });
        }

        let event = hook.event();
        log::debug!("Registering hook '{}' for '{}' with priority {}", id, event, hook.priority());

        let handlers = self.handlers.entry(event).or_default();
        handlers.push(hook);
        handlers.sort_by_key(|it| it.priority());

        self.ids.insert(id, event);
        Ok(())
    }

    /// Remove a hook by id. Returns `false` if nothing was registered under it.
    pub fn unregister(&mut self, id: &str) -> bool {
        let Some(event) = self.ids.remove(id) else {
            return false;
        };
        if let Some(handlers) = self.handlers.get_mut(&event) {
            handlers.retain(|it| it.id() != id);
            if handlers.is_empty() {
                self.handlers.remove(&event);
            }
        }
        log::debug!("Unregistered hook '{}' from '{}'", id, event);
        true
    }

    /// Hooks for `event` in run order, restricted to those whose filter
    /// accepts `command`. Without a command no filtering is applied.
    pub fn get_handlers(&self, event: HookEvent, command: Option<&str>) -> Vec<Arc<dyn Hook>> {
        let Some(handlers) = self.handlers.get(&event) else {
            return Vec::new();
        };
        handlers
            .iter()
            .filter(|hook| match (command, hook.filter()) {
                (Some(command), Some(filter)) => filter.matches(command),
                _ => true,
            })
            .cloned()
            .collect()
    }

    pub fn has(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Hook>> {
        let event = self.ids.get(id)?;
        self.handlers
            .get(event)?
            .iter()
            .find(|it| it.id() == id)
            .cloned()
    }

    /// Drop every hook. Meant for test isolation.
    pub fn clear(&mut self) {
        self.handlers.clear();
        self.ids.clear();
    }

    /// Every registered hook, grouped by event in declaration order of [`HookEvent::ALL`]
    pub fn get_all_handlers(&self) -> Vec<Arc<dyn Hook>> {
        HookEvent::ALL
            .iter()
            .filter_map(|event| self.handlers.get(event))
            .flat_map(|handlers| handlers.iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HookError;
    use crate::hook::context::HookContext;
    use crate::hook::filter::HookFilter;
    use crate::hook::result::HookResult;
    use async_trait::async_trait;

    struct StaticHook {
        id: String,
        event: HookEvent,
        priority: i32,
        filter: Option<HookFilter>,
    }

    impl StaticHook {
        fn new(id: &str, event: HookEvent, priority: i32) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                event,
                priority,
                filter: None,
            })
        }

        fn filtered(id: &str, filter: HookFilter) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                event: HookEvent::PreCommand,
                priority: 100,
                filter: Some(filter),
            })
        }
    }

    #[async_trait]
    impl Hook for StaticHook {
        fn id(&self) -> &str {
            &self.id
        }
        fn event(&self) -> HookEvent {
            self.event
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn filter(&self) -> Option<&HookFilter> {
            self.filter.as_ref()
        }
        async fn execute(&self, _context: &HookContext) -> Result<HookResult, HookError> {
            Ok(HookResult::Continue)
        }
    }

    fn ids(handlers: &[Arc<dyn Hook>]) -> Vec<&str> {
        handlers.iter().map(|it| it.id()).collect()
    }

    #[test]
    fn handlers_are_sorted_by_priority() {
        let mut registry = HookRegistry::new();
        registry.register(StaticHook::new("late", HookEvent::PreCommand, 300)).unwrap();
        registry.register(StaticHook::new("early", HookEvent::PreCommand, -5)).unwrap();
        registry.register(StaticHook::new("middle", HookEvent::PreCommand, 100)).unwrap();

        let handlers = registry.get_handlers(HookEvent::PreCommand, None);
        assert_eq!(ids(&handlers), vec!["early", "middle", "late"]);
    }

    #[test]
    fn equal_priorities_keep_registration_order() {
        let mut registry = HookRegistry::new();
        for id in ["first", "second", "third"] {
            registry.register(StaticHook::new(id, HookEvent::OnDeploy, 10)).unwrap();
        }
        let handlers = registry.get_handlers(HookEvent::OnDeploy, None);
        assert_eq!(ids(&handlers), vec!["first", "second", "third"]);
    }

    #[test]
    fn duplicate_id_is_rejected_across_events() {
        let mut registry = HookRegistry::new();
        registry.register(StaticHook::new("tracer", HookEvent::PreCommand, 1)).unwrap();

        let error = registry
            .register(StaticHook::new("tracer", HookEvent::PostCommand, 1))
            .unwrap_err();
        assert!(error.to_string().contains("tracer"));
        assert!(registry.get_handlers(HookEvent::PostCommand, None).is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_leaves_no_trace() {
        let mut registry = HookRegistry::new();
        registry.register(StaticHook::new("namer", HookEvent::PostCommand, 1)).unwrap();

        assert!(registry.unregister("namer"));
        assert!(!registry.has("namer"));
        assert!(registry.get("namer").is_none());
        assert!(registry.get_handlers(HookEvent::PostCommand, None).is_empty());
        assert!(!registry.unregister("namer"));

        registry.register(StaticHook::new("namer", HookEvent::OnError, 1)).unwrap();
        assert!(registry.has("namer"));
    }

    #[test]
    fn get_finds_hooks_of_any_event() {
        let mut registry = HookRegistry::new();
        registry.register(StaticHook::new("a", HookEvent::PreCommand, 1)).unwrap();
        registry.register(StaticHook::new("b", HookEvent::OnDeploy, 1)).unwrap();

        assert_eq!(registry.get("b").map(|it| it.event()), Some(HookEvent::OnDeploy));
        assert!(registry.has("a"));
        assert!(!registry.has("c"));
    }

    #[test]
    fn command_filter_applies_only_when_command_given() {
        let mut registry = HookRegistry::new();
        registry.register(StaticHook::filtered("only-use", HookFilter::commands(["use"]))).unwrap();
        registry.register(StaticHook::filtered("not-help", HookFilter::exclude(["help"]))).unwrap();
        registry.register(StaticHook::new("always", HookEvent::PreCommand, 200)).unwrap();

        let help = registry.get_handlers(HookEvent::PreCommand, Some("help"));
        assert_eq!(ids(&help), vec!["always"]);

        let use_ = registry.get_handlers(HookEvent::PreCommand, Some("use"));
        assert_eq!(ids(&use_), vec!["only-use", "not-help", "always"]);

        let all = registry.get_handlers(HookEvent::PreCommand, None);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn clear_and_get_all_handlers() {
        let mut registry = HookRegistry::new();
        registry.register(StaticHook::new("deploy", HookEvent::OnDeploy, 1)).unwrap();
        registry.register(StaticHook::new("pre", HookEvent::PreCommand, 1)).unwrap();
        registry.register(StaticHook::new("error", HookEvent::OnError, 1)).unwrap();

        assert_eq!(ids(&registry.get_all_handlers()), vec!["pre", "error", "deploy"]);

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get_all_handlers().is_empty());
    }
}
