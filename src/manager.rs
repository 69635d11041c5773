use std::sync::Arc;

use snipman_core::{
    resolve_unique_name, CoreError, EventBus, HostContext, Notification, Playlist, Resource,
    ResourceLoader, RunRequest, Runner, Snippet, SnippetId, SnippetStore, StorageEvent,
    Validator,
};

use crate::config::DEFAULT_RUNNER_URL;

/// Whether `save` rejects a name already used by another snippet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamePolicy {
    /// Unique names are only suggested when snippets are created.
    #[default]
    Suggest,
    /// `save` fails with `DuplicateName` when another snippet has the same name.
    Enforce,
}

/// Suffix used when duplicating a snippet without an explicit one.
pub const COPY_SUFFIX: &str = "copy";

/// Orchestrates the snippet lifecycle for one host.
///
/// Every mutation is validated first, applied to the store, and then announced
/// on the bus as a [`StorageEvent`].
pub struct SnippetManager<S, L, R>
where
    S: SnippetStore,
    L: ResourceLoader,
    R: Runner,
{
    host: HostContext,
    store: Arc<S>,
    loader: Arc<L>,
    runner: Arc<R>,
    bus: Arc<EventBus>,
    runner_url: String,
    name_policy: NamePolicy,
}

impl<S, L, R> SnippetManager<S, L, R>
where
    S: SnippetStore,
    L: ResourceLoader,
    R: Runner,
{
    pub fn new(
        host: HostContext,
        store: Arc<S>,
        loader: Arc<L>,
        runner: Arc<R>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self {
            host,
            store,
            loader,
            runner,
            bus,
            runner_url: DEFAULT_RUNNER_URL.to_string(),
            name_policy: NamePolicy::default(),
        }
    }

    pub fn with_runner_url(mut self, url: impl Into<String>) -> Self {
        self.runner_url = url.into();
        self
    }

    pub fn with_name_policy(mut self, policy: NamePolicy) -> Self {
        self.name_policy = policy;
        self
    }

    /// Start a snippet from the host's default template, or open a copy of
    /// the stored snippet with `id`.
    ///
    /// A template whose name is already taken gets a unique name derived from
    /// it (and `suffix`). The result is not saved.
    pub async fn create(
        &self,
        id: Option<&SnippetId>,
        suffix: Option<&str>,
    ) -> Result<Snippet, CoreError> {
        match id {
            None => self.create_from_template(suffix).await,
            Some(id) => self
                .store
                .get(id)?
                .ok_or_else(|| CoreError::NotFound(id.clone())),
        }
    }

    async fn create_from_template(&self, suffix: Option<&str>) -> Result<Snippet, CoreError> {
        let mut snippet = self
            .loader
            .load_default_template(&self.host)
            .await
            .ok_or_else(|| CoreError::ResourceUnavailable {
                resource: Resource::Template,
                location: self.host.default_template_path(),
            })?;

        snippet.id = SnippetId::generate();
        let existing = self.store.values()?;
        if self.name_exists(&existing, snippet.trimmed_name()) {
            snippet.name = resolve_unique_name(
                existing.iter().map(|s| s.name.as_str()),
                &snippet.name,
                suffix,
            );
        }

        tracing::debug!("Created snippet {} ({}) from template", snippet.id, snippet.name);
        Ok(snippet)
    }

    /// Copy a stored snippet under a fresh id and a unique name. Not saved.
    pub async fn duplicate(
        &self,
        id: &SnippetId,
        suffix: Option<&str>,
    ) -> Result<Snippet, CoreError> {
        let source = self
            .store
            .get(id)?
            .ok_or_else(|| CoreError::NotFound(id.clone()))?;

        let existing = self.store.values()?;
        let mut copy = source.clone();
        copy.id = SnippetId::generate();
        copy.name = resolve_unique_name(
            existing.iter().map(|s| s.name.as_str()),
            &source.name,
            Some(suffix.unwrap_or(COPY_SUFFIX)),
        );

        tracing::debug!("Duplicated snippet {} as {} ({})", id, copy.id, copy.name);
        Ok(copy)
    }

    /// Look up a stored snippet.
    pub async fn find(&self, id: &SnippetId) -> Result<Option<Snippet>, CoreError> {
        Ok(self.store.get(id)?)
    }

    /// Validate and store a snippet, replacing any previous version.
    pub async fn save(&self, snippet: Snippet) -> Result<Snippet, CoreError> {
        Validator::validate(&snippet)?;

        if self.name_policy == NamePolicy::Enforce {
            let existing = self.store.values()?;
            let taken = existing
                .iter()
                .any(|s| s.id != snippet.id && s.trimmed_name() == snippet.trimmed_name());
            if taken {
                return Err(CoreError::DuplicateName(snippet.trimmed_name().to_string()));
            }
        }

        let saved = self.store.insert(snippet)?;
        tracing::info!("Saved snippet {} ({})", saved.id, saved.name);
        self.bus
            .publish(Notification::Storage(StorageEvent::changed(saved.clone())));
        Ok(saved)
    }

    /// Validate and remove a snippet by id. Returns what was removed, if anything.
    ///
    /// The change is announced with `snippet` even when nothing was removed.
    pub async fn delete(&self, snippet: &Snippet) -> Result<Option<Snippet>, CoreError> {
        Validator::validate(snippet)?;

        let removed = self.store.remove(&snippet.id)?;
        match &removed {
            Some(_) => tracing::info!("Deleted snippet {} ({})", snippet.id, snippet.name),
            None => tracing::debug!("Delete of unknown snippet {}", snippet.id),
        }
        self.bus
            .publish(Notification::Storage(StorageEvent::changed(snippet.clone())));
        Ok(removed)
    }

    /// Remove every snippet of this host.
    pub async fn clear(&self) -> Result<bool, CoreError> {
        self.store.clear()?;
        tracing::info!("Cleared all {} snippets", self.host);
        self.bus.publish(Notification::Storage(StorageEvent::cleared()));
        Ok(true)
    }

    /// Snapshot of the stored snippets, in no particular order.
    pub fn local(&self) -> Result<Vec<Snippet>, CoreError> {
        Ok(self.store.values()?)
    }

    /// The example catalog, as published.
    pub async fn templates(&self, location: Option<&str>) -> Result<Playlist, CoreError> {
        self.loader
            .load_catalog(&self.host, location)
            .await
            .ok_or_else(|| CoreError::ResourceUnavailable {
                resource: Resource::Catalog,
                location: location
                    .map(str::to_string)
                    .unwrap_or_else(|| self.host.catalog_path()),
            })
    }

    /// Submit a snippet for remote execution. Returns once the request is
    /// handed to the runner; the remote outcome is not observed.
    pub async fn run(&self, snippet: &Snippet) -> Result<bool, CoreError> {
        Validator::validate(snippet)?;

        let yaml =
            serde_yaml::to_string(snippet).map_err(|e| CoreError::Serialization(e.to_string()))?;
        let request = RunRequest::new(self.runner_url.clone()).with_field("snippet", yaml);

        self.runner.submit(request).await?;
        tracing::info!("Submitted snippet {} to {}", snippet.id, self.runner_url);
        Ok(true)
    }

    fn name_exists(&self, existing: &[Snippet], name: &str) -> bool {
        existing.iter().any(|s| s.trimmed_name() == name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snipman_core::{
        InMemorySnippetStore, ListenerError, PlaylistItem, RemoteError, ValidationError,
    };
    use std::sync::Mutex;

    struct FixedLoader {
        template: Option<Snippet>,
        catalog: Option<Playlist>,
    }

    impl FixedLoader {
        fn with_template(name: &str) -> Self {
            Self {
                template: Some(
                    Snippet::new(name)
                        .with_id("")
                        .with_field("script", "console.log('hello');"),
                ),
                catalog: Some(Playlist {
                    name: "Microsoft".to_string(),
                    items: vec![PlaylistItem {
                        id: "abc".to_string(),
                        name: "Set formulas".to_string(),
                        group: "Range Manipulation".to_string(),
                        description: None,
                    }],
                }),
            }
        }

        fn empty() -> Self {
            Self {
                template: None,
                catalog: None,
            }
        }
    }

    impl ResourceLoader for FixedLoader {
        async fn load_default_template(&self, _host: &HostContext) -> Option<Snippet> {
            self.template.clone()
        }

        async fn load_catalog(
            &self,
            _host: &HostContext,
            _location: Option<&str>,
        ) -> Option<Playlist> {
            self.catalog.clone()
        }
    }

    #[derive(Default)]
    struct RecordingRunner {
        requests: Mutex<Vec<RunRequest>>,
    }

    impl Runner for RecordingRunner {
        async fn submit(&self, request: RunRequest) -> Result<(), RemoteError> {
            self.requests.lock().unwrap().push(request);
            Ok(())
        }
    }

    type TestManager = SnippetManager<InMemorySnippetStore, FixedLoader, RecordingRunner>;

    struct Harness {
        manager: TestManager,
        store: Arc<InMemorySnippetStore>,
        runner: Arc<RecordingRunner>,
        events: Arc<Mutex<Vec<StorageEvent>>>,
    }

    fn harness(loader: FixedLoader, snippets: Vec<Snippet>) -> Harness {
        let store = Arc::new(InMemorySnippetStore::with_snippets(snippets));
        let runner = Arc::new(RecordingRunner::default());
        let bus = Arc::new(EventBus::new());
        let events = Arc::new(Mutex::new(Vec::new()));

        let sink = events.clone();
        bus.subscribe(move |n: &Notification| -> Result<(), ListenerError> {
            if let Notification::Storage(event) = n {
                sink.lock().unwrap().push(event.clone());
            }
            Ok(())
        });

        let manager = SnippetManager::new(
            HostContext::new("Excel"),
            store.clone(),
            Arc::new(loader),
            runner.clone(),
            bus,
        );

        Harness {
            manager,
            store,
            runner,
            events,
        }
    }

    #[tokio::test]
    async fn test_create_from_template() {
        let h = harness(FixedLoader::with_template("Original Code"), vec![]);

        let snippet = h.manager.create(None, None).await.unwrap();
        assert_eq!(snippet.name, "Original Code");
        assert!(!snippet.id.is_blank());
        assert_eq!(snippet.content["script"], "console.log('hello');");

        // create does not save
        assert!(h.store.is_empty());
        assert!(h.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_resolves_name_collision() {
        let h = harness(
            FixedLoader::with_template("Original Code"),
            vec![Snippet::new("Original Code").with_id("a")],
        );

        let first = h.manager.create(None, None).await.unwrap();
        assert_eq!(first.name, "Original Code - 1");

        h.manager.save(first).await.unwrap();
        let second = h.manager.create(None, None).await.unwrap();
        assert_eq!(second.name, "Original Code - 2");
    }

    #[tokio::test]
    async fn test_create_uses_suffix_on_collision() {
        let h = harness(
            FixedLoader::with_template("Original Code"),
            vec![Snippet::new("Original Code").with_id("a")],
        );

        let snippet = h.manager.create(None, Some("imported")).await.unwrap();
        assert_eq!(snippet.name, "Original Code - imported - 1");
    }

    #[tokio::test]
    async fn test_create_without_template_fails() {
        let h = harness(FixedLoader::empty(), vec![]);

        let err = h.manager.create(None, None).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::ResourceUnavailable { resource: Resource::Template, .. }
        ));
    }

    #[tokio::test]
    async fn test_create_with_unknown_id_fails() {
        let h = harness(FixedLoader::with_template("Original Code"), vec![]);

        let err = h
            .manager
            .create(Some(&SnippetId::from("x")), None)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(id) if id.as_str() == "x"));
    }

    #[tokio::test]
    async fn test_create_with_id_returns_copy_of_stored() {
        let stored = Snippet::new("Mine").with_id("m").with_field("script", "x()");
        let h = harness(FixedLoader::empty(), vec![stored.clone()]);

        let mut opened = h
            .manager
            .create(Some(&SnippetId::from("m")), None)
            .await
            .unwrap();
        assert_eq!(opened, stored);

        opened.name = "Changed".to_string();
        let still = h.store.get(&SnippetId::from("m")).unwrap().unwrap();
        assert_eq!(still.name, "Mine");
    }

    #[tokio::test]
    async fn test_duplicate() {
        let h = harness(
            FixedLoader::empty(),
            vec![Snippet::new("Chart").with_id("c").with_field("script", "draw()")],
        );

        let copy = h
            .manager
            .duplicate(&SnippetId::from("c"), None)
            .await
            .unwrap();
        assert_ne!(copy.id.as_str(), "c");
        assert_eq!(copy.name, "Chart - copy - 1");
        assert_eq!(copy.content["script"], "draw()");

        h.manager.save(copy).await.unwrap();
        let again = h
            .manager
            .duplicate(&SnippetId::from("c"), None)
            .await
            .unwrap();
        assert_eq!(again.name, "Chart - copy - 2");
    }

    #[tokio::test]
    async fn test_save_publishes_event() {
        let h = harness(FixedLoader::empty(), vec![]);

        let saved = h.manager.save(Snippet::new("A").with_id("a")).await.unwrap();
        assert_eq!(saved.name, "A");
        assert_eq!(h.store.len(), 1);

        let events = h.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].snippet.as_ref().map(|s| s.id.as_str()), Some("a"));
    }

    #[tokio::test]
    async fn test_save_empty_name_leaves_store_unchanged() {
        let h = harness(
            FixedLoader::empty(),
            vec![Snippet::new("Keep").with_id("a")],
        );

        let err = h
            .manager
            .save(Snippet::new("  ").with_id("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyName)));

        let stored = h.store.get(&SnippetId::from("a")).unwrap().unwrap();
        assert_eq!(stored.name, "Keep");
        assert!(h.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_allows_duplicate_names_by_default() {
        let h = harness(FixedLoader::empty(), vec![]);

        h.manager.save(Snippet::new("A").with_id("a")).await.unwrap();
        h.manager.save(Snippet::new("A").with_id("b")).await.unwrap();
        assert_eq!(h.manager.local().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_save_enforces_unique_names_when_configured() {
        let mut h = harness(FixedLoader::empty(), vec![]);
        h.manager = h.manager.with_name_policy(NamePolicy::Enforce);

        h.manager.save(Snippet::new("A").with_id("a")).await.unwrap();
        // re-saving the same snippet is fine
        h.manager.save(Snippet::new(" A ").with_id("a")).await.unwrap();

        let err = h
            .manager
            .save(Snippet::new("A").with_id("b"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::DuplicateName(name) if name == "A"));
        assert_eq!(h.store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let h = harness(FixedLoader::empty(), vec![Snippet::new("A").with_id("a")]);

        let removed = h
            .manager
            .delete(&Snippet::new("A").with_id("a"))
            .await
            .unwrap();
        assert_eq!(removed.map(|s| s.name), Some("A".to_string()));
        assert!(h.store.is_empty());
        assert_eq!(h.events.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_still_announces() {
        let h = harness(FixedLoader::empty(), vec![]);

        let attempted = Snippet::new("Ghost").with_id("g");
        let removed = h.manager.delete(&attempted).await.unwrap();
        assert!(removed.is_none());

        let events = h.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].snippet.as_ref(), Some(&attempted));
    }

    #[tokio::test]
    async fn test_delete_invalid_snippet() {
        let h = harness(FixedLoader::empty(), vec![]);

        let err = h.manager.delete(&Snippet::default()).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyEntity)));
        assert!(h.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let h = harness(
            FixedLoader::empty(),
            vec![
                Snippet::new("A").with_id("a"),
                Snippet::new("B").with_id("b"),
            ],
        );

        assert!(h.manager.clear().await.unwrap());
        assert!(h.manager.local().unwrap().is_empty());

        let events = h.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_clear());
    }

    #[tokio::test]
    async fn test_templates() {
        let h = harness(FixedLoader::with_template("Original Code"), vec![]);
        let playlist = h.manager.templates(None).await.unwrap();
        assert_eq!(playlist.name, "Microsoft");

        let h = harness(FixedLoader::empty(), vec![]);
        let err = h.manager.templates(Some("custom.json")).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::ResourceUnavailable { resource: Resource::Catalog, ref location }
                if location == "custom.json"
        ));
        assert!(err.message().contains("custom.json"));
    }

    #[tokio::test]
    async fn test_run_submits_yaml_form() {
        let h = harness(FixedLoader::empty(), vec![]);
        let snippet = Snippet::new("Runner")
            .with_id("r")
            .with_field("script", "go()");

        assert!(h.manager.run(&snippet).await.unwrap());

        let requests = h.runner.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].endpoint, DEFAULT_RUNNER_URL);

        let yaml = requests[0].field("snippet").unwrap();
        let parsed: Snippet = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed, snippet);
    }
}
